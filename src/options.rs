//! Option value parsers shared by the subcommands
//!
//! These are pure and fail loudly: invalid input is an [`OptionError`], never a
//! silently substituted default. The one documented sentinel is a zero timeout,
//! which means "no timeout" and parses to `None`.

use regex::Regex;
use serde::Deserialize;
use std::borrow::Cow;
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;

static TIMEOUT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([0-9]+(?:\.[0-9]+)?)(s|m|h)?$").expect("timeout pattern is valid")
});

#[derive(Debug, Error, PartialEq)]
pub enum OptionError {
    #[error("{name} must be a positive integer")]
    NotPositiveInteger { name: String },

    #[error(r#"Invalid timeout format: "{value}". Expected format: "30s", "10m", "1h", or a number"#)]
    InvalidTimeout { value: String },

    #[error("Timeout must be a non-negative number")]
    NegativeTimeout,

    #[error(r#"Timeout "{value}" is too large"#)]
    TimeoutTooLarge { value: String },
}

/// An option value as supplied by the command line (text) or a config file (either)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Number(f64),
    Text(String),
}

impl OptionValue {
    /// Numeric coercion: text is trimmed, blank text counts as zero, garbage is NaN
    fn to_number(&self) -> f64 {
        match self {
            Self::Number(n) => *n,
            Self::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    0.0
                } else {
                    parse_number(text)
                }
            }
        }
    }

    /// Textual form, used when a config file gives a timeout as a bare number
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Number(n) => Cow::Owned(n.to_string()),
            Self::Text(text) => Cow::Borrowed(text),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for OptionValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

/// Decimal or exponent notation, or an unsigned `0x`/`0o`/`0b` literal
fn parse_number(text: &str) -> f64 {
    let radix = match text.get(..2) {
        Some("0x" | "0X") => 16,
        Some("0o" | "0O") => 8,
        Some("0b" | "0B") => 2,
        _ => return text.parse().unwrap_or(f64::NAN),
    };

    let digits = &text[2..];
    if digits.is_empty() || !digits.chars().all(|ch| ch.is_ascii_alphanumeric()) {
        return f64::NAN;
    }
    u128::from_str_radix(digits, radix).map_or(f64::NAN, |n| n as f64)
}

/// Parse an optional positive integer option
///
/// `None` means the option was not supplied. `name` is used in the error message.
pub fn parse_positive_integer<V: Into<OptionValue>>(
    value: Option<V>,
    name: &str,
) -> Result<Option<usize>, OptionError> {
    let Some(value) = value else {
        return Ok(None);
    };

    let num = value.into().to_number();
    if !num.is_finite() || num.fract() != 0.0 || num < 1.0 || num > usize::MAX as f64 {
        return Err(OptionError::NotPositiveInteger {
            name: name.to_string(),
        });
    }

    Ok(Some(num as usize))
}

/// Parse a timeout such as `30s`, `10m`, `1h` or `45` (seconds)
///
/// Returns `Ok(None)` for any zero value (`0`, `0s`, `0.0m`): no timeout.
pub fn parse_timeout(value: &str) -> Result<Option<Duration>, OptionError> {
    let captures = TIMEOUT_PATTERN
        .captures(value)
        .ok_or_else(|| OptionError::InvalidTimeout {
            value: value.to_string(),
        })?;

    let num: f64 = captures[1]
        .parse()
        .map_err(|_| OptionError::InvalidTimeout {
            value: value.to_string(),
        })?;

    let multiplier = match captures.get(2).map(|unit| unit.as_str().to_ascii_lowercase()) {
        None => 1.0,
        Some(unit) if unit == "s" => 1.0,
        Some(unit) if unit == "m" => 60.0,
        Some(unit) if unit == "h" => 3600.0,
        Some(_) => {
            return Err(OptionError::InvalidTimeout {
                value: value.to_string(),
            });
        }
    };

    let seconds = num * multiplier;
    if seconds == 0.0 {
        return Ok(None);
    }
    if seconds < 0.0 || !seconds.is_finite() {
        return Err(OptionError::NegativeTimeout);
    }

    Duration::try_from_secs_f64(seconds)
        .map(Some)
        .map_err(|_| OptionError::TimeoutTooLarge {
            value: value.to_string(),
        })
}
