use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::args::OutputFormat;
use crate::batch::{BatchConfig, BatchDispatcher, event_channel};
use crate::config::RunSettings;
use crate::error::{AppError, AppResult};
use crate::http::HttpTransport;
use crate::metrics::summarize;

use super::{export, report};

/// Runs one batch and reports it according to `settings`.
///
/// # Errors
///
/// Returns an error when the transport cannot be built, an export cannot be
/// written, or `fail_on_error` is set and at least one trial failed.
pub async fn run(config: BatchConfig, settings: RunSettings) -> AppResult<()> {
    let transport = match HttpTransport::new(&config) {
        Ok(transport) => Arc::new(transport),
        Err(err) => {
            error!("Failed to set up transport: {}", err);
            return Err(err);
        }
    };
    let started_at = Utc::now();

    if settings.output_format == OutputFormat::Text {
        for line in report::run_header_lines(&config) {
            println!("{}", line);
        }
        println!();
    }

    let (events_tx, events_rx) = event_channel();
    let printer = match settings.output_format {
        OutputFormat::Text => Some(report::spawn_event_printer(events_rx, settings.brief)),
        OutputFormat::Json | OutputFormat::Quiet => {
            drop(events_rx);
            None
        }
    };

    let dispatcher = BatchDispatcher::new(config, transport).with_events(events_tx);
    let results = dispatcher.run().await;
    let config = dispatcher.config().clone();
    drop(dispatcher);
    if let Some(printer) = printer {
        printer.await?;
    }

    let summary = summarize(&results);
    info!(
        "{} of {} trials succeeded",
        summary.success_count, summary.total_trials
    );

    let needs_document =
        settings.output_format == OutputFormat::Json || settings.export_json.is_some();
    let document = needs_document
        .then(|| report::run_document(&config, started_at, &summary, &results));

    match settings.output_format {
        OutputFormat::Text => {
            println!();
            for line in report::summary_lines(&summary) {
                println!("{}", line);
            }
        }
        OutputFormat::Json => {
            if let Some(document) = document.as_ref() {
                println!("{}", serde_json::to_string_pretty(document)?);
            }
        }
        OutputFormat::Quiet => {}
    }

    if let (Some(path), Some(document)) = (settings.export_json.as_deref(), document.as_ref()) {
        export::export_json(path, document).await?;
        info!("Wrote {}", path.display());
    }
    if let Some(path) = settings.export_jsonl.as_deref() {
        export::export_jsonl(path, &summary, &results).await?;
        info!("Wrote {}", path.display());
    }

    if settings.fail_on_error && summary.failure_count > 0 {
        warn!(
            "{} of {} trials failed",
            summary.failure_count, summary.total_trials
        );
        return Err(AppError::TrialsFailed {
            failed: summary.failure_count,
            total: summary.total_trials,
        });
    }
    Ok(())
}
