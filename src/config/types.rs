use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::args::OutputFormat;
use crate::error::ConfigError;

/// On-disk configuration. Every key is optional.
///
/// ```toml
/// url = "http://localhost:8001/register"
/// trials = 10
/// timeout = "30s"
///
/// [headers]
/// Origin = "http://localhost:8081"
///
/// [payload]
/// template = "user_{{unique}}@example.com"
///
/// [payload.fields]
/// nit = "901234567"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub url: Option<String>,
    pub headers: Option<BTreeMap<String, String>>,
    pub trials: Option<usize>,
    #[serde(alias = "concurrency", alias = "connections")]
    pub max_connections: Option<usize>,
    pub timeout: Option<DurationValue>,
    pub status: Option<u16>,
    pub probe: Option<bool>,
    pub payload: Option<PayloadSection>,
    pub output_format: Option<OutputFormat>,
    pub brief: Option<bool>,
    pub export_json: Option<String>,
    pub export_jsonl: Option<String>,
    pub fail_on_error: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PayloadSection {
    pub unique_field: Option<String>,
    pub template: Option<String>,
    pub suffix_len: Option<usize>,
    pub fields: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ConfigError> {
        match self {
            DurationValue::Seconds(0) => Err(ConfigError::DurationZero),
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => super::parse_duration_value(text),
        }
    }
}

/// How a run is presented, as opposed to what it sends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSettings {
    pub output_format: OutputFormat,
    pub brief: bool,
    pub export_json: Option<PathBuf>,
    pub export_jsonl: Option<PathBuf>,
    pub fail_on_error: bool,
}
