//! Django renders `DecimalField`s as strings, hand-written endpoints send floats.

use serde::{de, Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Decimal {
    Number(f64),
    Text(String),
    Null(()),
}

impl Decimal {
    fn into_f64<E: de::Error>(self) -> Result<Option<f64>, E> {
        match self {
            Decimal::Number(n) => Ok(Some(n)),
            Decimal::Text(s) if s.trim().is_empty() => Ok(None),
            Decimal::Text(s) => s.trim().parse().map(Some).map_err(de::Error::custom),
            Decimal::Null(()) => Ok(None),
        }
    }
}

/// Number or numeric string; null or blank reads as zero.
pub fn decimal<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Decimal::deserialize(deserializer)?
        .into_f64()?
        .unwrap_or(0.0))
}

/// Number or numeric string; null or blank reads as `None`.
pub fn optional_decimal<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Decimal::deserialize(deserializer)?.into_f64()
}
