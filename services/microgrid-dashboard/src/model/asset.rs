//! Solar systems and wind turbines

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{de_opt_number, de_opt_timestamp, RecordId};
use crate::validation::{FieldValue, FormPayload};

/// Which asset collection a record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Solar,
    Wind,
}

impl AssetKind {
    pub fn label(&self) -> &'static str {
        match self {
            AssetKind::Solar => "solar system",
            AssetKind::Wind => "wind turbine",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Solar => write!(f, "solar"),
            AssetKind::Wind => write!(f, "wind"),
        }
    }
}

impl FromStr for AssetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solar" => Ok(AssetKind::Solar),
            "wind" => Ok(AssetKind::Wind),
            other => Err(format!("unknown asset kind '{}'", other)),
        }
    }
}

/// Operating status. The backend stores the Russian labels; English is accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AssetStatus {
    #[default]
    #[serde(rename = "Активна", alias = "Active", alias = "active")]
    Active,
    #[serde(rename = "Неактивна", alias = "Inactive", alias = "inactive")]
    Inactive,
    #[serde(
        rename = "На обслуживании",
        alias = "Maintenance",
        alias = "maintenance"
    )]
    Maintenance,
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetStatus::Active => write!(f, "Active"),
            AssetStatus::Inactive => write!(f, "Inactive"),
            AssetStatus::Maintenance => write!(f, "Maintenance"),
        }
    }
}

impl FromStr for AssetStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "active" | "Active" | "Активна" => Ok(AssetStatus::Active),
            "inactive" | "Inactive" | "Неактивна" => Ok(AssetStatus::Inactive),
            "maintenance" | "Maintenance" | "На обслуживании" => Ok(AssetStatus::Maintenance),
            other => Err(format!("unknown status '{}'", other)),
        }
    }
}

/// A solar system or wind turbine, normalised from either backend shape
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Asset {
    pub id: RecordId,
    pub kind: AssetKind,
    pub name: String,
    pub rated_power_kw: f64,
    pub efficiency_pct: Option<f64>,
    pub status: AssetStatus,
    pub location: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Asset {
    pub fn is_active(&self) -> bool {
        self.status == AssetStatus::Active
    }

    /// Power shown on a wind turbine's detail page: nothing is generated unless it is active.
    pub fn display_power_kw(&self) -> f64 {
        if self.is_active() {
            self.rated_power_kw
        } else {
            0.0
        }
    }
}

/// `GET solar/solar_system/` item
#[derive(Debug, Deserialize)]
pub struct SolarSystemRecord {
    pub id: RecordId,
    pub name: String,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub power_kw: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub efficiency: Option<f64>,
    #[serde(default)]
    pub status: Option<AssetStatus>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "de_opt_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<SolarSystemRecord> for Asset {
    fn from(record: SolarSystemRecord) -> Self {
        Asset {
            id: record.id,
            kind: AssetKind::Solar,
            name: record.name,
            rated_power_kw: record.power_kw.unwrap_or(0.0),
            efficiency_pct: record.efficiency,
            status: record.status.unwrap_or_default(),
            location: record.location.filter(|l| !l.trim().is_empty()),
            created_at: record.created_at,
        }
    }
}

/// `GET wind/wind_turbines/` item
#[derive(Debug, Deserialize)]
pub struct WindTurbineRecord {
    pub id: RecordId,
    pub name: String,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub power: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub efficiency: Option<f64>,
    #[serde(default)]
    pub status: Option<AssetStatus>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "de_opt_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<WindTurbineRecord> for Asset {
    fn from(record: WindTurbineRecord) -> Self {
        Asset {
            id: record.id,
            kind: AssetKind::Wind,
            name: record.name,
            rated_power_kw: record.power.unwrap_or(0.0),
            efficiency_pct: record.efficiency,
            status: record.status.unwrap_or_default(),
            location: record.location.filter(|l| !l.trim().is_empty()),
            created_at: record.created_at,
        }
    }
}

/// Candidate payload from a create or edit form, validated before it is sent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "power", alias = "power_kw")]
    pub rated_power_kw: Option<f64>,
    #[serde(default, alias = "efficiency")]
    pub efficiency_pct: Option<f64>,
    #[serde(default)]
    pub status: AssetStatus,
    #[serde(default)]
    pub location: Option<String>,
}

impl AssetDraft {
    pub fn new(name: impl Into<String>, rated_power_kw: f64) -> Self {
        Self {
            name: name.into(),
            rated_power_kw: Some(rated_power_kw),
            ..Default::default()
        }
    }

    /// Pre-filled edit form for an existing asset
    pub fn from_asset(asset: &Asset) -> Self {
        Self {
            name: asset.name.clone(),
            rated_power_kw: Some(asset.rated_power_kw),
            efficiency_pct: asset.efficiency_pct,
            status: asset.status,
            location: asset.location.clone(),
        }
    }

    /// Request body in the shape the backend expects for this kind
    pub fn to_wire(&self, kind: AssetKind) -> serde_json::Value {
        let name = self.name.trim();
        let power = self.rated_power_kw.unwrap_or(0.0);
        match kind {
            AssetKind::Solar => serde_json::json!({
                "name": name,
                "power_kw": power,
                "efficiency": self.efficiency_pct,
                "status": self.status,
            }),
            AssetKind::Wind => serde_json::json!({
                "name": name,
                "power": power,
                "location": self
                    .location
                    .as_deref()
                    .map(str::trim)
                    .filter(|l| !l.is_empty()),
                "status": self.status,
            }),
        }
    }
}

impl FormPayload for AssetDraft {
    fn value(&self, field: &str) -> Option<FieldValue<'_>> {
        match field {
            "name" => Some(FieldValue::Text(&self.name)),
            "power" => Some(FieldValue::Number(self.rated_power_kw)),
            "efficiency" => Some(FieldValue::Number(self.efficiency_pct)),
            "location" => Some(FieldValue::Text(self.location.as_deref().unwrap_or(""))),
            _ => None,
        }
    }
}
