//! Boundary schemas and normalised entities
//!
//! Every backend payload is decoded into a per-endpoint record type and converted into
//! one internal entity right away, so nothing past this module cares whether a field
//! was called `power` or `power_kw`, or whether a timestamp carried an offset.

pub mod asset;
pub mod forecast;
pub mod log_row;
pub mod measurement;
pub mod panel;
pub mod site;

pub use asset::{Asset, AssetDraft, AssetKind, AssetStatus};
pub use forecast::Forecast;
pub use log_row::{BatteryAction, LogRow, RewardSign};
pub use measurement::{Measurement, Reading};
pub use panel::SolarPanel;
pub use site::{SiteConfig, SiteDraft};

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Opaque backend identifier. The backend uses integers today; strings are accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<u64> for RecordId {
    fn from(n: u64) -> Self {
        Self::new(n.to_string())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Int(n) => RecordId(n.to_string()),
            RawId::Text(s) => RecordId(s),
        })
    }
}

/// Parse a backend timestamp. Offsets are honoured; naive timestamps are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

pub(crate) fn de_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", raw)))
}

pub(crate) fn de_opt_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_timestamp(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", s))),
    }
}

/// Numbers sometimes arrive pre-formatted as strings (`"4.82"`); accept both.
pub(crate) fn de_opt_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<f64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawNumber {
        Number(f64),
        Text(String),
    }

    match Option::<RawNumber>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawNumber::Number(n)) => Ok(Some(n)),
        Some(RawNumber::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(RawNumber::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid number '{}'", s))),
    }
}

/// Round to two decimals, the precision every power figure is shown with.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_accepts_int_and_string() {
        let ids: Vec<RecordId> = serde_json::from_str(r#"[7, "a-1"]"#).unwrap();
        assert_eq!(ids[0].as_str(), "7");
        assert_eq!(ids[1].as_str(), "a-1");
    }

    #[test]
    fn parse_timestamp_with_offset() {
        let ts = parse_timestamp("2025-12-16T10:00:00+03:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2025-12-16T07:00:00+00:00");
    }

    #[test]
    fn parse_timestamp_naive_is_utc() {
        let ts = parse_timestamp("2025-12-16T10:00:00.123456").unwrap();
        assert_eq!(ts.format("%H:%M:%S").to_string(), "10:00:00");
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn round2_keeps_two_decimals() {
        assert_eq!(round2(4.826), 4.83);
        assert_eq!(round2(1.0 / 3.0), 0.33);
    }
}
