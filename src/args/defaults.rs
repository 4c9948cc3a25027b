//! Compiled-in run configuration, used whenever neither a flag nor a config
//! file says otherwise.
use std::collections::BTreeMap;
use std::time::Duration;

use crate::payload::{DEFAULT_SUFFIX_LEN, PayloadConfig};

use super::PositiveUsize;

pub const DEFAULT_URL: &str = "http://localhost:8001/register";
pub const DEFAULT_TRIALS: PositiveUsize = PositiveUsize::from_const(10);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_EXPECTED_STATUS: u16 = 200;
pub const DEFAULT_UNIQUE_FIELD: &str = "email";
pub const DEFAULT_TEMPLATE: &str = "user_{{unique}}@example.com";

pub const DEFAULT_USER_AGENT: &str = concat!("regburst/", env!("CARGO_PKG_VERSION"));

/// Origin the requests pretend to come from (an Expo dev server).
const DEFAULT_ORIGIN: &str = "http://localhost:8081";

/// Browser-like header set sent with both the probe and the submission.
#[must_use]
pub fn default_headers() -> BTreeMap<String, String> {
    [
        ("Content-Type", "application/json"),
        ("Accept", "application/json"),
        ("User-Agent", DEFAULT_USER_AGENT),
        ("Origin", DEFAULT_ORIGIN),
        ("Referer", "http://localhost:8081/"),
        ("Access-Control-Request-Method", "POST"),
        ("Access-Control-Request-Headers", "content-type"),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_owned(), value.to_owned()))
    .collect()
}

#[must_use]
pub fn default_fixed_fields() -> BTreeMap<String, String> {
    [
        ("nit", "901234567"),
        ("nombre", "Concurrent Tester"),
        ("password", "Tester12*"),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_owned(), value.to_owned()))
    .collect()
}

#[must_use]
pub fn default_payload_config() -> PayloadConfig {
    PayloadConfig {
        unique_field: DEFAULT_UNIQUE_FIELD.to_owned(),
        template: DEFAULT_TEMPLATE.to_owned(),
        suffix_len: DEFAULT_SUFFIX_LEN,
        fixed_fields: default_fixed_fields(),
    }
}
