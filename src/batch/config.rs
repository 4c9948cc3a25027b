use std::collections::BTreeMap;
use std::time::Duration;

use crate::args::{
    DEFAULT_EXPECTED_STATUS, DEFAULT_TIMEOUT, DEFAULT_TRIALS, DEFAULT_URL, PositiveUsize,
    default_headers, default_payload_config,
};
use crate::payload::PayloadConfig;

/// Everything a batch needs; fixed for the lifetime of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    pub target_url: String,
    /// Sent with both the probe and the submission.
    pub headers: BTreeMap<String, String>,
    pub trial_count: PositiveUsize,
    pub max_connections: PositiveUsize,
    /// Upper bound for each network step of a trial (probe, then submission).
    pub timeout: Duration,
    /// Status that counts as success; compared for exact equality.
    pub expected_status: u16,
    pub probe: bool,
    pub payload: PayloadConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            target_url: DEFAULT_URL.to_owned(),
            headers: default_headers(),
            trial_count: DEFAULT_TRIALS,
            max_connections: DEFAULT_TRIALS,
            timeout: DEFAULT_TIMEOUT,
            expected_status: DEFAULT_EXPECTED_STATUS,
            probe: true,
            payload: default_payload_config(),
        }
    }
}
