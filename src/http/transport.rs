use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::header::HeaderMap;

use crate::payload::TrialRequest;

use super::TransportFailure;

/// Prefix of the CORS response headers kept from a capability probe.
const ACCESS_CONTROL_PREFIX: &str = "access-control-";

/// Issues the two requests of a trial against one configured target.
///
/// Implementations are shared by all trials of a batch at once, so they must
/// only issue requests and never reconfigure themselves mid-flight.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends the pre-flight style "which operations are allowed" request.
    async fn probe(&self, request: &TrialRequest) -> Result<ProbeResponse, TransportFailure>;

    /// Sends the registration itself and reads the full response body.
    async fn submit(&self, request: &TrialRequest) -> Result<RawResponse, TransportFailure>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: u16,
    /// Only the `access-control-*` response headers, lowercase names.
    pub access_control: BTreeMap<String, String>,
}

impl ProbeResponse {
    #[must_use]
    pub fn from_headers(status: u16, headers: &BTreeMap<String, String>) -> Self {
        let access_control = headers
            .iter()
            .filter(|(name, _)| name.to_ascii_lowercase().starts_with(ACCESS_CONTROL_PREFIX))
            .map(|(name, value)| (name.to_ascii_lowercase(), value.clone()))
            .collect();
        Self {
            status,
            access_control,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
}

/// Flattens a header map; repeated headers are joined with `", "`.
pub(crate) fn collect_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut collected: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        collected
            .entry(name.as_str().to_owned())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    collected
}
