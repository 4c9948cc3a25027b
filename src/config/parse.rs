use std::time::Duration;

use crate::error::ConfigError;

/// Parses `<n>` (seconds) or `<n>ms|s|m|h`. Zero is rejected.
pub(crate) fn parse_duration_value(value: &str) -> Result<Duration, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::DurationEmpty);
    }

    let digits_len = value
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(value.len());
    if digits_len == 0 {
        return Err(ConfigError::InvalidDurationFormat {
            value: value.to_owned(),
        });
    }
    let (num_part, unit_part) = value.split_at(digits_len);
    let number: u64 = num_part
        .parse()
        .map_err(|err| ConfigError::InvalidDurationNumber {
            value: value.to_owned(),
            source: err,
        })?;

    let seconds_per_unit: u64 = match unit_part.trim() {
        "ms" => return non_zero(Duration::from_millis(number)),
        "" | "s" => 1,
        "m" => 60,
        "h" => 3_600,
        unit => {
            return Err(ConfigError::InvalidDurationUnit {
                unit: unit.to_owned(),
            });
        }
    };
    let secs = number
        .checked_mul(seconds_per_unit)
        .ok_or(ConfigError::DurationOverflow)?;
    non_zero(Duration::from_secs(secs))
}

fn non_zero(duration: Duration) -> Result<Duration, ConfigError> {
    if duration.is_zero() {
        Err(ConfigError::DurationZero)
    } else {
        Ok(duration)
    }
}
