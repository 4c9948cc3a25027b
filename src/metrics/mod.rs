//! Batch aggregation: outcome counts and latency statistics.
mod summary;

#[cfg(test)]
mod tests;

pub use summary::{BatchSummary, LatencyStats, summarize};
