use std::collections::BTreeMap;
use std::time::Duration;

use super::*;
use crate::batch::{ResponseRecord, TrialResult};
use crate::http::{ResponseBody, TransportErrorKind, TransportFailure};
use crate::payload::TrialRequest;

fn request(index: usize) -> TrialRequest {
    TrialRequest {
        index,
        unique_key: "email".to_owned(),
        unique_field: format!("user_{}@example.com", index),
        fixed_fields: BTreeMap::new(),
    }
}

fn response(index: usize, status: u16, elapsed_ms: u64) -> TrialResult {
    TrialResult::from_response(
        &request(index),
        ResponseRecord {
            status,
            headers: BTreeMap::new(),
            body: ResponseBody::Raw(String::new()),
        },
        200,
        Duration::from_millis(elapsed_ms),
        Duration::from_millis(elapsed_ms.saturating_add(5)),
    )
}

fn failure(index: usize, elapsed_ms: Option<u64>) -> TrialResult {
    TrialResult::from_failure(
        &request(index),
        TransportFailure::new(TransportErrorKind::Connect, "refused"),
        elapsed_ms.map(Duration::from_millis),
        Duration::from_millis(elapsed_ms.unwrap_or(1)),
    )
}

#[test]
fn summarize_empty_has_no_latency_data() -> Result<(), String> {
    let summary = summarize(&[]);
    if summary.total_trials != 0 || summary.success_count != 0 || summary.failure_count != 0 {
        return Err(format!("Unexpected counts: {:?}", summary));
    }
    if summary.latency.is_some() || summary.success_latency.is_some() {
        return Err("Expected absent latency for an empty batch".to_owned());
    }
    if summary.success_rate_x100() != 0 || summary.total_elapsed != Duration::ZERO {
        return Err(format!("Unexpected totals: {:?}", summary));
    }
    Ok(())
}

#[test]
fn summarize_is_idempotent() -> Result<(), String> {
    let results = vec![response(1, 200, 10), response(2, 409, 30), failure(3, Some(5))];
    let first = summarize(&results);
    let second = summarize(&results);
    if first != second {
        return Err(format!("Summaries differ: {:?} vs {:?}", first, second));
    }
    Ok(())
}

#[test]
fn summarize_partitions_outcomes() -> Result<(), String> {
    let results = vec![
        response(1, 200, 10),
        response(2, 409, 30),
        response(3, 200, 20),
        failure(4, Some(40)),
    ];
    let summary = summarize(&results);
    if summary.success_count != 2
        || summary.failure_count != 2
        || summary.http_failure_count != 1
        || summary.transport_error_count != 1
    {
        return Err(format!("Unexpected counts: {:?}", summary));
    }
    if summary.status_counts != BTreeMap::from([(200, 2), (409, 1)]) {
        return Err(format!("Unexpected status counts: {:?}", summary.status_counts));
    }
    if summary.success_rate_x100() != 5_000 {
        return Err(format!("Unexpected rate: {}", summary.success_rate_x100()));
    }
    if summary.total_elapsed != Duration::from_millis(40) {
        return Err(format!("Unexpected total: {:?}", summary.total_elapsed));
    }
    Ok(())
}

#[test]
fn latency_covers_every_timed_trial() -> Result<(), String> {
    let results = vec![
        response(1, 200, 10),
        response(2, 409, 30),
        response(3, 200, 20),
        failure(4, Some(40)),
        failure(5, None),
    ];
    let summary = summarize(&results);

    let all = summary.latency.ok_or_else(|| "Missing latency".to_owned())?;
    if all.count != 4
        || all.min != Duration::from_millis(10)
        || all.max != Duration::from_millis(40)
        || all.avg != Duration::from_millis(25)
    {
        return Err(format!("Unexpected latency: {:?}", all));
    }

    let ok = summary
        .success_latency
        .ok_or_else(|| "Missing success latency".to_owned())?;
    if ok.count != 2 || ok.min != Duration::from_millis(10) || ok.avg != Duration::from_millis(15)
    {
        return Err(format!("Unexpected success latency: {:?}", ok));
    }
    Ok(())
}

#[test]
fn only_untimed_failures_yield_no_latency() -> Result<(), String> {
    let summary = summarize(&[failure(1, None), failure(2, None)]);
    if summary.latency.is_some() || summary.success_latency.is_some() {
        return Err(format!("Expected no latency data: {:?}", summary));
    }
    if summary.failure_count != 2 {
        return Err(format!("Unexpected failures: {}", summary.failure_count));
    }
    Ok(())
}

#[test]
fn percentiles_use_nearest_rank() -> Result<(), String> {
    let samples: Vec<Duration> = (1..=10).map(Duration::from_millis).collect();
    let stats = LatencyStats::from_samples(&samples).ok_or_else(|| "Missing stats".to_owned())?;
    if stats.p50 != Duration::from_millis(5)
        || stats.p90 != Duration::from_millis(9)
        || stats.p99 != Duration::from_millis(10)
    {
        return Err(format!("Unexpected percentiles: {:?}", stats));
    }
    Ok(())
}

#[test]
fn percentile_ranks_round_up() -> Result<(), String> {
    let cases: [(u64, [u64; 3]); 3] = [
        (1, [1, 1, 1]),
        (4, [2, 4, 4]),
        (100, [50, 90, 99]),
    ];
    for (count, [p50, p90, p99]) in cases {
        let samples: Vec<Duration> = (1..=count).map(Duration::from_millis).collect();
        let stats =
            LatencyStats::from_samples(&samples).ok_or_else(|| "Missing stats".to_owned())?;
        let observed = [stats.p50, stats.p90, stats.p99];
        let expected = [p50, p90, p99].map(Duration::from_millis);
        if observed != expected {
            return Err(format!(
                "{} samples: expected {:?}, got {:?}",
                count, expected, observed
            ));
        }
    }
    Ok(())
}
