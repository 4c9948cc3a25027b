use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::debug;

use crate::args::{
    DEFAULT_EXPECTED_STATUS, DEFAULT_TEMPLATE, DEFAULT_TIMEOUT, DEFAULT_TRIALS,
    DEFAULT_UNIQUE_FIELD, DEFAULT_URL, PositiveUsize, RunArgs, default_fixed_fields,
    default_headers,
};
use crate::batch::BatchConfig;
use crate::error::{AppError, AppResult, ConfigError};
use crate::payload::{DEFAULT_SUFFIX_LEN, PayloadConfig, UNIQUE_PLACEHOLDER, placeholder_keys};

use super::types::{ConfigFile, PayloadSection, RunSettings};

/// Merges CLI flags over the config file over the compiled-in defaults.
///
/// # Errors
///
/// Returns an error when a resolved value is out of range: zero trials or
/// connections, a zero timeout, an empty unique field name or a template
/// without the `{{unique}}` placeholder.
pub fn resolve_run(
    args: &RunArgs,
    file: Option<ConfigFile>,
) -> AppResult<(BatchConfig, RunSettings)> {
    let file = file.unwrap_or_default();

    let target_url = args
        .url
        .clone()
        .or(file.url)
        .unwrap_or_else(|| DEFAULT_URL.to_owned());
    if target_url.trim().is_empty() {
        return Err(AppError::config(ConfigError::FieldEmpty { field: "url" }));
    }

    let mut headers = default_headers();
    for (key, value) in file.headers.unwrap_or_default() {
        set_header(&mut headers, key, value);
    }
    for (key, value) in &args.headers {
        set_header(&mut headers, key.clone(), value.clone());
    }

    let trial_count = match (args.trials, file.trials) {
        (Some(trials), _) => trials,
        (None, Some(trials)) => positive("trials", trials)?,
        (None, None) => DEFAULT_TRIALS,
    };
    let max_connections = match (args.max_connections, file.max_connections) {
        (Some(limit), _) => limit,
        (None, Some(limit)) => positive("max_connections", limit)?,
        (None, None) => trial_count,
    };
    let timeout = match (args.timeout, file.timeout.as_ref()) {
        (Some(timeout), _) => timeout,
        (None, Some(value)) => value.to_duration().map_err(AppError::config)?,
        (None, None) => DEFAULT_TIMEOUT,
    };

    let payload = resolve_payload(args, file.payload.unwrap_or_default())?;

    let batch = BatchConfig {
        target_url,
        headers,
        trial_count,
        max_connections,
        timeout,
        expected_status: args
            .status
            .or(file.status)
            .unwrap_or(DEFAULT_EXPECTED_STATUS),
        probe: !args.no_probe && file.probe.unwrap_or(true),
        payload,
    };

    let settings = RunSettings {
        output_format: args.output_format.or(file.output_format).unwrap_or_default(),
        brief: args.brief || file.brief.unwrap_or(false),
        export_json: args
            .export_json
            .clone()
            .or(file.export_json)
            .map(PathBuf::from),
        export_jsonl: args
            .export_jsonl
            .clone()
            .or(file.export_jsonl)
            .map(PathBuf::from),
        fail_on_error: args.fail_on_error || file.fail_on_error.unwrap_or(false),
    };

    debug!(
        "Resolved run: {} trials, {} connections, {}ms timeout against {}",
        batch.trial_count.get(),
        batch.max_connections.get(),
        batch.timeout.as_millis(),
        batch.target_url
    );
    Ok((batch, settings))
}

fn resolve_payload(args: &RunArgs, section: PayloadSection) -> AppResult<PayloadConfig> {
    let unique_field = args
        .unique_field
        .clone()
        .or(section.unique_field)
        .unwrap_or_else(|| DEFAULT_UNIQUE_FIELD.to_owned());
    if unique_field.trim().is_empty() {
        return Err(AppError::config(ConfigError::FieldEmpty {
            field: "payload.unique_field",
        }));
    }

    let template = args
        .template
        .clone()
        .or(section.template)
        .unwrap_or_else(|| DEFAULT_TEMPLATE.to_owned());
    if !placeholder_keys(&template).contains(&UNIQUE_PLACEHOLDER) {
        return Err(AppError::config(ConfigError::TemplateMissingPlaceholder {
            template,
        }));
    }

    let suffix_len = match section.suffix_len {
        Some(len) => positive("payload.suffix_len", len)?.get(),
        None => DEFAULT_SUFFIX_LEN,
    };

    let mut fixed_fields = default_fixed_fields();
    fixed_fields.extend(section.fields.unwrap_or_default());
    fixed_fields.extend(args.fields.iter().cloned());

    Ok(PayloadConfig {
        unique_field,
        template,
        suffix_len,
        fixed_fields,
    })
}

fn positive(field: &'static str, value: usize) -> AppResult<PositiveUsize> {
    PositiveUsize::try_from(value)
        .map_err(|_err| AppError::config(ConfigError::FieldMustBePositive { field }))
}

/// Header names are case-insensitive; the latest spelling wins.
fn set_header(headers: &mut BTreeMap<String, String>, key: String, value: String) {
    headers.retain(|existing, _| !existing.eq_ignore_ascii_case(&key));
    headers.insert(key, value);
}
