use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, timeout_at};
use tracing::{debug, warn};

use crate::http::{ResponseBody, Transport, TransportFailure};
use crate::payload::TrialRequest;

use super::event::{EventSender, TrialEvent, emit};
use super::{BatchConfig, ResponseRecord, TrialResult};

/// The per-trial slice of [`BatchConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialSettings {
    pub timeout: Duration,
    pub expected_status: u16,
    pub probe: bool,
}

impl From<&BatchConfig> for TrialSettings {
    fn from(config: &BatchConfig) -> Self {
        Self {
            timeout: config.timeout,
            expected_status: config.expected_status,
            probe: config.probe,
        }
    }
}

/// Runs one trial: an optional capability probe, then the submission.
///
/// Probe failures are logged and emitted as events but never change the
/// result. The probe and the submission each get the full timeout, so a
/// stalled probe cannot eat into the submission's budget. Every submission
/// failure, including hitting its timeout, becomes a `TransportError` result
/// rather than an error.
pub async fn run_trial<T>(
    transport: &T,
    settings: TrialSettings,
    request: &TrialRequest,
    batch_start: Instant,
    events: Option<&EventSender>,
) -> TrialResult
where
    T: Transport + ?Sized,
{
    if settings.probe {
        let deadline = Instant::now().checked_add(settings.timeout);
        let outcome = bounded(deadline, transport.probe(request))
            .await
            .unwrap_or_else(|| Err(TransportFailure::timeout(settings.timeout)));
        match &outcome {
            Ok(probe) => debug!(
                "Trial {} probe: {} ({} access-control headers)",
                request.index,
                probe.status,
                probe.access_control.len()
            ),
            Err(failure) => warn!("Trial {} probe failed: {}", request.index, failure),
        }
        emit(
            events,
            TrialEvent::Probed {
                index: request.index,
                outcome,
            },
        );
    }

    let submit_start = Instant::now();
    let reply = bounded(
        submit_start.checked_add(settings.timeout),
        transport.submit(request),
    )
        .await
        .unwrap_or_else(|| Err(TransportFailure::timeout(settings.timeout)));

    let result = match reply {
        Ok(raw) => {
            let record = ResponseRecord {
                status: raw.status,
                headers: raw.headers,
                body: ResponseBody::decode(&raw.body),
            };
            let elapsed = submit_start.elapsed();
            debug!(
                "Trial {} submit: {} in {}ms",
                request.index,
                record.status,
                elapsed.as_millis()
            );
            TrialResult::from_response(
                request,
                record,
                settings.expected_status,
                elapsed,
                batch_start.elapsed(),
            )
        }
        Err(failure) => {
            warn!("Trial {} submit failed: {}", request.index, failure);
            TrialResult::from_failure(
                request,
                failure,
                Some(submit_start.elapsed()),
                batch_start.elapsed(),
            )
        }
    };

    emit(events, TrialEvent::Finished(result.clone()));
    result
}

/// `None` when the deadline passed first. An unrepresentable deadline means
/// no bound at all.
async fn bounded<F>(deadline: Option<Instant>, future: F) -> Option<F::Output>
where
    F: Future,
{
    match deadline {
        Some(deadline) => timeout_at(deadline, future).await.ok(),
        None => Some(future.await),
    }
}
