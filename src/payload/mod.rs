//! Unique registration payloads, one per trial.
//!
//! Every trial gets a [`TrialRequest`] whose unique field is rendered from a
//! template around a `<epoch-millis>_<suffix>_<index>` token. The random
//! suffix is drawn from `[a-z0-9]`, so six characters give 36^6 combinations
//! per millisecond before the trial index is even considered.
mod template;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::seq::SliceRandom;
use rand::thread_rng;

pub(crate) use template::{placeholder_keys, render_template};

/// Template placeholder replaced by the unique token.
pub const UNIQUE_PLACEHOLDER: &str = "unique";
/// Random suffix length used unless configured otherwise.
pub const DEFAULT_SUFFIX_LEN: usize = 6;

const SUFFIX_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadConfig {
    /// JSON key that carries the unique value (e.g. `email`).
    pub unique_field: String,
    /// Template rendered into the unique value; must reference `{{unique}}`.
    pub template: String,
    pub suffix_len: usize,
    pub fixed_fields: BTreeMap<String, String>,
}

/// Request body for a single trial. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialRequest {
    pub index: usize,
    pub unique_key: String,
    pub unique_field: String,
    pub fixed_fields: BTreeMap<String, String>,
}

impl TrialRequest {
    /// JSON object sent as the submission body. The unique key wins over a
    /// fixed field of the same name.
    #[must_use]
    pub fn body(&self) -> serde_json::Value {
        let mut object = serde_json::Map::new();
        for (key, value) in &self.fixed_fields {
            object.insert(key.clone(), serde_json::Value::String(value.clone()));
        }
        object.insert(
            self.unique_key.clone(),
            serde_json::Value::String(self.unique_field.clone()),
        );
        serde_json::Value::Object(object)
    }
}

#[derive(Debug, Clone)]
pub struct PayloadFactory {
    config: Arc<PayloadConfig>,
}

impl PayloadFactory {
    #[must_use]
    pub fn new(config: PayloadConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Builds the payload for trial `index`. Reads the wall clock and the
    /// thread-local RNG; never fails.
    #[must_use]
    pub fn make_payload(&self, index: usize) -> TrialRequest {
        let timestamp_ms = epoch_millis();
        let suffix = random_suffix(self.config.suffix_len);
        let token = unique_token(timestamp_ms, &suffix, index);

        let vars = BTreeMap::from([
            (UNIQUE_PLACEHOLDER, token),
            ("index", index.to_string()),
            ("suffix", suffix),
            ("timestamp_ms", timestamp_ms.to_string()),
        ]);

        TrialRequest {
            index,
            unique_key: self.config.unique_field.clone(),
            unique_field: render_template(&self.config.template, &vars),
            fixed_fields: self.config.fixed_fields.clone(),
        }
    }

    /// Payloads for indices `1..=count`.
    #[must_use]
    pub fn make_batch(&self, count: usize) -> Vec<TrialRequest> {
        (1..=count).map(|index| self.make_payload(index)).collect()
    }
}

pub(crate) fn unique_token(timestamp_ms: u128, suffix: &str, index: usize) -> String {
    format!("{}_{}_{}", timestamp_ms, suffix, index)
}

fn epoch_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_millis())
}

fn random_suffix(len: usize) -> String {
    let mut rng = thread_rng();
    let mut suffix = String::with_capacity(len);
    for _ in 0..len {
        if let Some(byte) = SUFFIX_CHARSET.choose(&mut rng) {
            suffix.push(char::from(*byte));
        }
    }
    suffix
}
