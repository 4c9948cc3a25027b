use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::time::Instant;
use tracing::{error, info};

use crate::error::AppResult;
use crate::http::{HttpTransport, Transport, TransportErrorKind, TransportFailure};
use crate::payload::PayloadFactory;

use super::event::{EventSender, TrialEvent, emit};
use super::runner::{TrialSettings, run_trial};
use super::{BatchConfig, TrialResult};

/// Fans a batch of trials out over one shared transport and gathers every
/// result back in index order.
pub struct BatchDispatcher<T: ?Sized> {
    config: BatchConfig,
    transport: Arc<T>,
    factory: PayloadFactory,
    events: Option<EventSender>,
}

impl<T> BatchDispatcher<T>
where
    T: Transport + ?Sized + 'static,
{
    #[must_use]
    pub fn new(config: BatchConfig, transport: Arc<T>) -> Self {
        let factory = PayloadFactory::new(config.payload.clone());
        Self {
            config,
            transport,
            factory,
            events: None,
        }
    }

    /// Streams probe and completion events to `events` while the batch runs.
    #[must_use]
    pub fn with_events(mut self, events: EventSender) -> Self {
        self.events = Some(events);
        self
    }

    #[must_use]
    pub const fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Runs every trial to completion. The result for trial `i` is at
    /// position `i - 1` whatever order the trials finished in.
    pub async fn run(&self) -> Vec<TrialResult> {
        let batch_start = Instant::now();
        let requests = self.factory.make_batch(self.config.trial_count.get());
        let settings = TrialSettings::from(&self.config);
        let permits = Arc::new(Semaphore::new(self.config.max_connections.get()));

        info!(
            "Launching {} trials against {} (max {} connections)",
            requests.len(),
            self.config.target_url,
            self.config.max_connections.get()
        );

        let mut handles = Vec::with_capacity(requests.len());
        for request in &requests {
            let transport = Arc::clone(&self.transport);
            let permits = Arc::clone(&permits);
            let events = self.events.clone();
            let request = request.clone();
            handles.push(tokio::spawn(async move {
                // The semaphore is never closed, so acquiring only waits.
                let _permit = permits.acquire_owned().await.ok();
                run_trial(
                    transport.as_ref(),
                    settings,
                    &request,
                    batch_start,
                    events.as_ref(),
                )
                .await
            }));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (request, handle) in requests.iter().zip(handles) {
            let result = match handle.await {
                Ok(result) => result,
                Err(err) => {
                    error!("Trial {} task ended abnormally: {}", request.index, err);
                    let failure =
                        TransportFailure::new(TransportErrorKind::Aborted, err.to_string());
                    let result =
                        TrialResult::from_failure(request, failure, None, batch_start.elapsed());
                    emit(self.events.as_ref(), TrialEvent::Finished(result.clone()));
                    result
                }
            };
            results.push(result);
        }

        info!(
            "Batch finished in {}ms",
            batch_start.elapsed().as_millis()
        );
        results
    }
}

/// Runs a batch over a fresh reqwest transport built from `config`.
///
/// # Errors
///
/// Returns an error only when the transport cannot be built (invalid URL or
/// header). Individual trial failures are part of the returned results.
pub async fn run_batch(config: BatchConfig) -> AppResult<Vec<TrialResult>> {
    let transport = Arc::new(HttpTransport::new(&config)?);
    Ok(BatchDispatcher::new(config, transport).run().await)
}
