//! Solar site configurations used to parameterise generation modelling
//!
//! A site configuration lives in the same backend collection as solar systems but
//! carries the location and array geometry instead of a rated power.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{de_opt_number, de_opt_timestamp, RecordId};
use crate::validation::{FieldValue, FormPayload};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteConfig {
    pub id: RecordId,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<String>,
    pub tilt: Option<f64>,
    pub azimuth: Option<f64>,
    pub target_kw: Option<f64>,
    pub module_power_stc: Option<f64>,
    pub albedo: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
}

/// `GET solar/solar_system/` item, read with the site fields
#[derive(Debug, Deserialize)]
pub struct SiteConfigRecord {
    pub id: RecordId,
    pub name: String,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub tilt: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub azimuth: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub target_kw: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub module_power_stc: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub albedo: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<SiteConfigRecord> for SiteConfig {
    fn from(record: SiteConfigRecord) -> Self {
        SiteConfig {
            id: record.id,
            name: record.name,
            latitude: record.latitude,
            longitude: record.longitude,
            timezone: record.timezone.filter(|tz| !tz.trim().is_empty()),
            tilt: record.tilt,
            azimuth: record.azimuth,
            target_kw: record.target_kw,
            module_power_stc: record.module_power_stc,
            albedo: record.albedo,
            created_at: record.created_at,
        }
    }
}

/// Site configuration form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteDraft {
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: String,
    pub tilt: Option<f64>,
    pub azimuth: Option<f64>,
    pub target_kw: Option<f64>,
    pub module_power_stc: Option<f64>,
    pub albedo: Option<f64>,
}

impl SiteDraft {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude: Some(latitude),
            longitude: Some(longitude),
            ..Default::default()
        }
    }

    pub fn to_wire(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name.trim(),
            "latitude": self.latitude,
            "longitude": self.longitude,
            "timezone": Some(self.timezone.trim()).filter(|tz| !tz.is_empty()),
            "tilt": self.tilt,
            "azimuth": self.azimuth,
            "target_kw": self.target_kw,
            "module_power_stc": self.module_power_stc,
            "albedo": self.albedo,
        })
    }
}

impl FormPayload for SiteDraft {
    fn value(&self, field: &str) -> Option<FieldValue<'_>> {
        let number = |v: Option<f64>| Some(FieldValue::Number(v));
        match field {
            "name" => Some(FieldValue::Text(&self.name)),
            "latitude" => number(self.latitude),
            "longitude" => number(self.longitude),
            "timezone" => Some(FieldValue::Text(&self.timezone)),
            "tilt" => number(self.tilt),
            "azimuth" => number(self.azimuth),
            "target_kw" => number(self.target_kw),
            "module_power_stc" => number(self.module_power_stc),
            "albedo" => number(self.albedo),
            _ => None,
        }
    }
}
