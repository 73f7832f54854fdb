//! Serde helpers for vendor payloads that send numbers either as JSON numbers or as
//! numeric strings (eismoinfo.lt does both, sometimes within the same response).

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Int(i64),
    Float(f64),
    Text(String),
}

impl NumberOrString {
    fn into_f64<E: serde::de::Error>(self) -> Result<Option<f64>, E> {
        match self {
            NumberOrString::Int(v) => Ok(Some(v as f64)),
            NumberOrString::Float(v) => Ok(Some(v)),
            NumberOrString::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                trimmed
                    .replace(',', ".")
                    .parse::<f64>()
                    .map(Some)
                    .map_err(|_| E::custom(format!("expected a number, got '{}'", s)))
            }
        }
    }
}

/// `null`, `""`, `12`, `12.5` and `"12.5"` all deserialize; the first two as `None`.
pub fn option_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(value) => value.into_f64(),
    }
}

pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    option_number(deserializer)?.ok_or_else(|| D::Error::custom("missing numeric value"))
}

pub fn integer<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Int(v) => Ok(v),
        NumberOrString::Float(v) if v.fract() == 0.0 => Ok(v as i64),
        NumberOrString::Float(v) => Err(D::Error::custom(format!("expected an integer, got {}", v))),
        NumberOrString::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| D::Error::custom(format!("expected an integer, got '{}'", s))),
    }
}

pub fn identifier<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = integer(deserializer)?;
    u32::try_from(value).map_err(|_| D::Error::custom(format!("identifier {} out of range", value)))
}
