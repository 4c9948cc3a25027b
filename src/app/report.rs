use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value, json};
use tokio::task::JoinHandle;

use crate::batch::{BatchConfig, EventReceiver, TrialEvent, TrialReply, TrialResult};
use crate::http::{ProbeResponse, TransportFailure};
use crate::metrics::{BatchSummary, LatencyStats};

/// Hundredths of a percent per percent.
const PERCENT_DIVISOR: u64 = 100;
/// Microseconds per millisecond.
const US_PER_MS: u128 = 1_000;
/// Indent for response headers and bodies under a trial line.
const DETAIL_INDENT: &str = "    ";

/// `12.345ms`, microsecond precision.
pub(crate) fn format_ms(duration: Duration) -> String {
    let micros = duration.as_micros();
    format!("{}.{:03}ms", micros / US_PER_MS, micros % US_PER_MS)
}

fn micros(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}

pub(crate) fn run_header_lines(config: &BatchConfig) -> Vec<String> {
    let mut lines = vec![
        format!("Target: {}", config.target_url),
        format!(
            "Trials: {} (max connections: {}, timeout: {}, expecting {})",
            config.trial_count.get(),
            config.max_connections.get(),
            format_ms(config.timeout),
            config.expected_status
        ),
    ];
    if !config.probe {
        lines.push("Capability probe: disabled".to_owned());
    }
    lines.push("Headers:".to_owned());
    lines.extend(
        config
            .headers
            .iter()
            .map(|(key, value)| format!("{}{}: {}", DETAIL_INDENT, key, value)),
    );
    lines
}

pub(crate) fn event_lines(event: &TrialEvent, brief: bool) -> Vec<String> {
    match event {
        TrialEvent::Probed { index, outcome } => vec![probe_line(*index, outcome)],
        TrialEvent::Finished(result) => trial_lines(result, brief),
    }
}

fn probe_line(index: usize, outcome: &Result<ProbeResponse, TransportFailure>) -> String {
    match outcome {
        Ok(probe) if probe.access_control.is_empty() => {
            format!("[#{}] probe {} (no access-control headers)", index, probe.status)
        }
        Ok(probe) => format!(
            "[#{}] probe {} {}",
            index,
            probe.status,
            join_pairs(&probe.access_control, "=")
        ),
        Err(failure) => format!("[#{}] probe failed: {}", index, failure),
    }
}

pub(crate) fn trial_lines(result: &TrialResult, brief: bool) -> Vec<String> {
    let timing = match result.elapsed() {
        Some(elapsed) => format!(
            "in {} (+{} since start)",
            format_ms(elapsed),
            format_ms(result.elapsed_since_batch_start())
        ),
        None => format!("at +{}", format_ms(result.elapsed_since_batch_start())),
    };

    match result.reply() {
        TrialReply::Response(response) => {
            let mut lines = vec![format!(
                "[#{}] {} {} {} {}",
                result.index(),
                response.status,
                result.outcome(),
                timing,
                result.unique_field()
            )];
            if !brief {
                lines.extend(
                    response
                        .headers
                        .iter()
                        .map(|(key, value)| format!("{}{}: {}", DETAIL_INDENT, key, value)),
                );
                lines.extend(
                    response
                        .body
                        .to_string()
                        .lines()
                        .map(|line| format!("{}{}", DETAIL_INDENT, line)),
                );
            }
            lines
        }
        TrialReply::Failed(failure) => vec![format!(
            "[#{}] {} {} {}: {}",
            result.index(),
            result.outcome(),
            timing,
            result.unique_field(),
            failure
        )],
    }
}

pub(crate) fn summary_lines(summary: &BatchSummary) -> Vec<String> {
    let rate = summary.success_rate_x100();
    let mut lines = vec![
        format!("Total Elapsed: {}", format_ms(summary.total_elapsed)),
        format!("Trials: {}", summary.total_trials),
        format!(
            "Successful: {} ({}.{:02}%)",
            summary.success_count,
            rate / PERCENT_DIVISOR,
            rate % PERCENT_DIVISOR
        ),
        format!(
            "Failed: {} (HTTP: {}, Transport: {})",
            summary.failure_count, summary.http_failure_count, summary.transport_error_count
        ),
    ];
    if !summary.status_counts.is_empty() {
        lines.push(format!(
            "Status Codes: {}",
            join_pairs(&summary.status_counts, "=")
        ));
    }
    lines.extend(latency_lines("all", summary.latency.as_ref()));
    lines.extend(latency_lines("ok", summary.success_latency.as_ref()));
    lines
}

fn latency_lines(label: &str, stats: Option<&LatencyStats>) -> Vec<String> {
    let Some(stats) = stats else {
        return vec![format!("Latency ({}): no data", label)];
    };
    vec![
        format!(
            "Avg/Min/Max Latency ({}): {} / {} / {}",
            label,
            format_ms(stats.avg),
            format_ms(stats.min),
            format_ms(stats.max)
        ),
        format!(
            "P50/P90/P99 Latency ({}): {} / {} / {}",
            label,
            format_ms(stats.p50),
            format_ms(stats.p90),
            format_ms(stats.p99)
        ),
    ]
}

fn join_pairs<K, V>(pairs: &BTreeMap<K, V>, separator: &str) -> String
where
    K: std::fmt::Display,
    V: std::fmt::Display,
{
    pairs
        .iter()
        .map(|(key, value)| format!("{}{}{}", key, separator, value))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Prints events as they arrive; ends once every sender is gone.
pub(crate) fn spawn_event_printer(mut events: EventReceiver, brief: bool) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            for line in event_lines(&event, brief) {
                println!("{}", line);
            }
        }
    })
}

pub(crate) fn run_json(config: &BatchConfig, started_at: DateTime<Utc>) -> Value {
    json!({
        "started_at": started_at.to_rfc3339(),
        "target_url": config.target_url,
        "trials": config.trial_count.get(),
        "max_connections": config.max_connections.get(),
        "timeout_ms": u64::try_from(config.timeout.as_millis()).unwrap_or(u64::MAX),
        "expected_status": config.expected_status,
        "probe": config.probe,
    })
}

fn latency_json(stats: Option<&LatencyStats>) -> Value {
    stats.map_or(Value::Null, |stats| {
        json!({
            "count": stats.count,
            "min_us": micros(stats.min),
            "avg_us": micros(stats.avg),
            "max_us": micros(stats.max),
            "p50_us": micros(stats.p50),
            "p90_us": micros(stats.p90),
            "p99_us": micros(stats.p99),
        })
    })
}

pub(crate) fn summary_json(summary: &BatchSummary) -> Value {
    let status_counts: Map<String, Value> = summary
        .status_counts
        .iter()
        .map(|(status, count)| (status.to_string(), json!(count)))
        .collect();
    json!({
        "total_trials": summary.total_trials,
        "success_count": summary.success_count,
        "failure_count": summary.failure_count,
        "http_failure_count": summary.http_failure_count,
        "transport_error_count": summary.transport_error_count,
        "success_rate_x100": summary.success_rate_x100(),
        "total_elapsed_us": micros(summary.total_elapsed),
        "status_counts": status_counts,
        "latency": latency_json(summary.latency.as_ref()),
        "success_latency": latency_json(summary.success_latency.as_ref()),
    })
}

/// Absent parts of a result serialize as `null`.
pub(crate) fn trial_json(result: &TrialResult) -> Value {
    json!({
        "index": result.index(),
        "unique_field": result.unique_field(),
        "outcome": result.outcome().as_str(),
        "status_code": result.status_code(),
        "elapsed_us": result.elapsed().map(micros),
        "elapsed_since_batch_start_us": micros(result.elapsed_since_batch_start()),
        "response_headers": result.response_headers(),
        "body": result.body().map(crate::http::ResponseBody::to_json),
        "error": result.error_detail().map(|failure| json!({
            "kind": failure.kind.as_str(),
            "message": failure.message,
        })),
    })
}

pub(crate) fn run_document(
    config: &BatchConfig,
    started_at: DateTime<Utc>,
    summary: &BatchSummary,
    results: &[TrialResult],
) -> Value {
    json!({
        "run": run_json(config, started_at),
        "summary": summary_json(summary),
        "trials": results.iter().map(trial_json).collect::<Vec<_>>(),
    })
}

/// Adds a `"type"` discriminator to a JSON object.
pub(crate) fn tagged(kind: &str, value: Value) -> Value {
    match value {
        Value::Object(mut fields) => {
            fields.insert("type".to_owned(), Value::String(kind.to_owned()));
            Value::Object(fields)
        }
        other @ (Value::Null
        | Value::Bool(_)
        | Value::Number(_)
        | Value::String(_)
        | Value::Array(_)) => json!({ "type": kind, "value": other }),
    }
}
