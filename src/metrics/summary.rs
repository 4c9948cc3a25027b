use std::collections::BTreeMap;
use std::time::Duration;

use crate::batch::{TrialOutcome, TrialResult};

/// Basis points per whole.
const PERCENT_SCALE_X100: u128 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyStats {
    pub count: usize,
    pub min: Duration,
    pub avg: Duration,
    pub max: Duration,
    pub p50: Duration,
    pub p90: Duration,
    pub p99: Duration,
}

impl LatencyStats {
    /// `None` for an empty sample set.
    #[must_use]
    pub fn from_samples(samples: &[Duration]) -> Option<Self> {
        let mut sorted = samples.to_vec();
        sorted.sort_unstable();

        let min = *sorted.first()?;
        let max = *sorted.last()?;
        let total = sorted
            .iter()
            .fold(Duration::ZERO, |acc, sample| acc.saturating_add(*sample));
        let avg = u32::try_from(sorted.len())
            .ok()
            .and_then(|count| total.checked_div(count))
            .unwrap_or(max);

        Some(Self {
            count: sorted.len(),
            min,
            avg,
            max,
            p50: percentile(&sorted, 50),
            p90: percentile(&sorted, 90),
            p99: percentile(&sorted, 99),
        })
    }
}

/// Nearest-rank percentile over sorted samples: the value at 1-based rank
/// `ceil(p * n / 100)`, never below the first sample.
fn percentile(sorted: &[Duration], percentile: usize) -> Duration {
    let rank = percentile
        .saturating_mul(sorted.len())
        .saturating_add(99)
        .checked_div(100)
        .unwrap_or(0)
        .max(1);
    let last = sorted.len().saturating_sub(1);
    sorted
        .get(rank.saturating_sub(1).min(last))
        .copied()
        .unwrap_or(Duration::ZERO)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub total_trials: usize,
    pub success_count: usize,
    /// Everything that was not a success: HTTP failures plus transport errors.
    pub failure_count: usize,
    pub http_failure_count: usize,
    pub transport_error_count: usize,
    /// Batch start to the last trial's completion.
    pub total_elapsed: Duration,
    pub status_counts: BTreeMap<u16, usize>,
    /// Over every trial that recorded a submission time, whatever its outcome.
    pub latency: Option<LatencyStats>,
    /// Over successful trials only.
    pub success_latency: Option<LatencyStats>,
}

impl BatchSummary {
    /// Success rate in hundredths of a percent; zero for an empty batch.
    #[must_use]
    pub fn success_rate_x100(&self) -> u64 {
        let scaled = u128::try_from(self.success_count)
            .unwrap_or(u128::MAX)
            .saturating_mul(PERCENT_SCALE_X100)
            .checked_div(u128::try_from(self.total_trials).unwrap_or(u128::MAX))
            .unwrap_or(0);
        u64::try_from(scaled).unwrap_or(u64::MAX)
    }
}

/// Aggregates a finished batch. Pure: same input, same summary.
#[must_use]
pub fn summarize(results: &[TrialResult]) -> BatchSummary {
    let mut success_count: usize = 0;
    let mut http_failure_count: usize = 0;
    let mut transport_error_count: usize = 0;
    let mut status_counts: BTreeMap<u16, usize> = BTreeMap::new();
    let mut timed = Vec::with_capacity(results.len());
    let mut timed_success = Vec::with_capacity(results.len());
    let mut total_elapsed = Duration::ZERO;

    for result in results {
        match result.outcome() {
            TrialOutcome::Success => success_count = success_count.saturating_add(1),
            TrialOutcome::HttpFailure => http_failure_count = http_failure_count.saturating_add(1),
            TrialOutcome::TransportError => {
                transport_error_count = transport_error_count.saturating_add(1);
            }
        }
        if let Some(status) = result.status_code() {
            let count = status_counts.entry(status).or_insert(0);
            *count = count.saturating_add(1);
        }
        if let Some(elapsed) = result.elapsed() {
            timed.push(elapsed);
            if result.is_success() {
                timed_success.push(elapsed);
            }
        }
        total_elapsed = total_elapsed.max(result.elapsed_since_batch_start());
    }

    BatchSummary {
        total_trials: results.len(),
        success_count,
        failure_count: results.len().saturating_sub(success_count),
        http_failure_count,
        transport_error_count,
        total_elapsed,
        status_counts,
        latency: LatencyStats::from_samples(&timed),
        success_latency: LatencyStats::from_samples(&timed_success),
    }
}
