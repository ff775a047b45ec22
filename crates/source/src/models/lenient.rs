//! Lenient numeric input.
//!
//! The platform is inconsistent about numbers: the same field can arrive as
//! `12.5`, `"12.5"`, `""` or `null` depending on the endpoint.

use log::warn;
use rust_decimal::Decimal;
use serde::{self, Deserialize, Deserializer};
use serde_json::Number;
use std::str::FromStr;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumericInput {
    String(String),
    Number(Number),
    Null,
}

fn parse_decimal_value(value: &str) -> Result<Decimal, String> {
    let trimmed = value.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|e| format!("Invalid decimal value '{}': {}", value, e))
}

pub fn option_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<NumericInput>::deserialize(deserializer)?;
    match raw {
        None | Some(NumericInput::Null) => Ok(None),
        Some(NumericInput::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            parse_decimal_value(trimmed)
                .map(Some)
                .map_err(serde::de::Error::custom)
        }
        Some(NumericInput::Number(n)) => parse_decimal_value(&n.to_string())
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Month numbers; anything missing or unparsable becomes `0`, which no
/// calendar month matches. Unparsable values are logged.
pub fn month<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<NumericInput>::deserialize(deserializer)?;
    let parsed = match &raw {
        None | Some(NumericInput::Null) => return Ok(0),
        Some(NumericInput::String(s)) => s.trim().parse().ok(),
        Some(NumericInput::Number(n)) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
    };
    Ok(parsed.unwrap_or_else(|| {
        warn!("Ignoring record with unparsable month {:?}", raw_text(raw.as_ref()));
        0
    }))
}

fn raw_text(raw: Option<&NumericInput>) -> String {
    match raw {
        Some(NumericInput::String(s)) => s.clone(),
        Some(NumericInput::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}
