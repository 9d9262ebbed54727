//! Boundary types for the loosely typed JSON the booking API returns.
//!
//! Decimal columns arrive either as JSON numbers or as numeric strings, flags
//! sometimes as `0`/`1`, and collections as `null`. Everything is normalized
//! here, once, so the rest of the workspace only sees proper Rust types.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A numeric field as sent over the wire: a JSON number or a decimal string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireNumber {
    Number(f64),
    Text(String),
}

impl WireNumber {
    /// Normalize to a finite `f64`.
    ///
    /// Text is trimmed and its longest leading decimal is used, so
    /// `"12.50 USD"` reads as `12.5`. Text without a numeric prefix and
    /// non-finite values (`NaN`, `inf`) yield `None`.
    pub fn resolve(&self) -> Option<f64> {
        let value = match self {
            WireNumber::Number(n) => *n,
            WireNumber::Text(text) => leading_decimal(text.trim())?,
        };
        value.is_finite().then_some(value)
    }
}

/// Parse the longest prefix of `text` shaped like `[+-]digits[.digits][e[+-]digits]`.
fn leading_decimal(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let digits_from = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - end - 1;
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_end = digits_from(end + 1 + sign);
        if exp_end > end + 1 + sign {
            end = exp_end;
        }
    }
    text[..end].parse().ok()
}

impl From<f64> for WireNumber {
    fn from(value: f64) -> Self {
        WireNumber::Number(value)
    }
}

impl From<&str> for WireNumber {
    fn from(value: &str) -> Self {
        WireNumber::Text(value.to_string())
    }
}

/// Deserialize an optional [`WireNumber`]; booleans, arrays and objects read as `None`.
pub fn lenient_number<'de, D>(deserializer: D) -> Result<Option<WireNumber>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64().map(WireNumber::Number),
        Some(Value::String(s)) => Some(WireNumber::Text(s)),
        _ => None,
    })
}

/// Deserialize a flag that may be a bool, a number or a string.
pub fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => matches!(s.trim(), "true" | "1"),
        _ => false,
    })
}

/// Treat an explicit `null` the same as a missing field.
pub fn nullable_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Accept `YYYY-MM-DD` as well as full timestamps such as
/// `2025-06-01T00:00:00.000Z`; only the calendar date is kept.
pub fn calendar_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_calendar_date(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid calendar date: {raw}")))
}

pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let head = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}
