//! Coercion of parameter extraction results into sub-ratings.
//!
//! The extraction service returns a JSON object mapping parameter names to
//! free-text values such as `"5 kg"` or the sentinel `"Not available"`. An
//! object carrying an `error` key is an explicit failure of the whole call.

use crate::error::{RankerError, Result};
use crate::profile::KindProfile;
use crate::types::report::Warning;
use crate::types::scoring::Score;
use serde_json::Value;
use std::collections::BTreeMap;

pub const NOT_AVAILABLE: &str = "Not available";

pub type ParameterMap = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub enum ExtractedValue {
    Numeric(Score),
    Missing,
    Unparseable(String),
}

/// Parses a collaborator payload, rejecting explicit failures.
pub fn parse_payload(payload: &str) -> Result<ParameterMap> {
    let value: Value = serde_json::from_str(payload)
        .map_err(|err| RankerError::ExtractionFailed(format!("payload is not valid JSON: {err}")))?;
    let Value::Object(map) = value else {
        return Err(RankerError::ExtractionFailed(
            "payload must be a JSON object of parameter names to values".to_string(),
        ));
    };
    if let Some(error) = map.get("error") {
        let detail = error
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(RankerError::ExtractionFailed(detail));
    }
    Ok(map.into_iter().collect())
}

/// First numeric token in `text`, ignoring surrounding units and words.
/// A minus sign directly before the digits belongs to the number.
pub fn leading_number(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let start = (0..bytes.len()).find(|&index| {
        bytes[index].is_ascii_digit()
            || (bytes[index] == b'.' && bytes.get(index + 1).is_some_and(u8::is_ascii_digit))
    })?;

    let mut end = start;
    let mut seen_point = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => end += 1,
            b'.' if !seen_point && bytes.get(end + 1).is_some_and(u8::is_ascii_digit) => {
                seen_point = true;
                end += 1;
            }
            _ => break,
        }
    }
    let value: f64 = text[start..end].parse().ok()?;
    let prefix = &text[..start];
    if prefix.ends_with('-') || prefix.ends_with('\u{2212}') {
        Some(-value)
    } else {
        Some(value)
    }
}

pub fn coerce(raw: &Value) -> ExtractedValue {
    match raw {
        Value::Null => ExtractedValue::Missing,
        Value::Number(number) => number
            .as_f64()
            .map(ExtractedValue::Numeric)
            .unwrap_or_else(|| ExtractedValue::Unparseable(number.to_string())),
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(NOT_AVAILABLE) {
                ExtractedValue::Missing
            } else {
                leading_number(trimmed)
                    .map(ExtractedValue::Numeric)
                    .unwrap_or_else(|| ExtractedValue::Unparseable(trimmed.to_string()))
            }
        }
        other => ExtractedValue::Unparseable(other.to_string()),
    }
}

/// Maps extracted parameters onto the profile's sub-parameters. Missing and
/// unparseable values are left out so their weight is never applied.
pub fn ratings_from_parameters(
    profile: &KindProfile,
    parameters: &ParameterMap,
) -> (BTreeMap<String, Score>, Vec<Warning>) {
    let mut ratings = BTreeMap::new();
    let mut warnings = Vec::new();

    for (parameter, raw) in parameters {
        let Some(target) = profile.extraction_target(parameter) else {
            tracing::debug!(parameter = %parameter, kind = %profile.kind, "ignoring unmapped parameter");
            continue;
        };
        match coerce(raw) {
            ExtractedValue::Numeric(value) => {
                ratings.insert(target.to_string(), value);
            }
            ExtractedValue::Missing => {
                tracing::info!(parameter = %parameter, "parameter not available, excluded");
                warnings.push(Warning::new(
                    "extraction.not_available",
                    format!("{parameter}: not available, excluded from {target}"),
                ));
            }
            ExtractedValue::Unparseable(text) => {
                tracing::warn!(parameter = %parameter, value = %text, "no numeric value, excluded");
                warnings.push(Warning::new(
                    "extraction.unparseable",
                    format!("{parameter}: no numeric value in '{text}', excluded from {target}"),
                ));
            }
        }
    }

    (ratings, warnings)
}
