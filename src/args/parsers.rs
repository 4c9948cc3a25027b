use std::time::Duration;

use super::types::PositiveUsize;
use crate::config::parse_duration_value;
use crate::error::{AppError, AppResult, ValidationError};

pub(crate) fn parse_header(s: &str) -> Result<(String, String), ValidationError> {
    match s.split_once(':') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_owned(), value.trim().to_owned()))
        }
        _ => Err(ValidationError::InvalidHeaderFormat {
            value: s.to_owned(),
        }),
    }
}

/// `name=value`; the value may be empty and may itself contain `=`.
pub(crate) fn parse_field(s: &str) -> Result<(String, String), ValidationError> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| ValidationError::InvalidFieldFormat {
            value: s.to_owned(),
        })?;
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::FieldNameEmpty {
            value: s.to_owned(),
        });
    }
    Ok((name.to_owned(), value.to_owned()))
}

pub(super) fn parse_positive_usize(s: &str) -> AppResult<PositiveUsize> {
    s.parse::<PositiveUsize>().map_err(AppError::from)
}

pub(super) fn parse_duration_arg(s: &str) -> AppResult<Duration> {
    parse_duration_value(s).map_err(AppError::from)
}
