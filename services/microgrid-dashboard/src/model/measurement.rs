//! Solar and wind measurements

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{de_opt_number, de_timestamp, RecordId};

/// Kind-specific readings carried next to the generated power
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reading {
    Solar {
        irradiance: f64,
        temp_air: Option<f64>,
    },
    Wind {
        wind_speed: Option<f64>,
        air_density: Option<f64>,
    },
}

/// One read-only sample, power already converted to kW
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    pub id: RecordId,
    pub taken_at: DateTime<Utc>,
    pub power_kw: f64,
    pub reading: Reading,
}

impl Measurement {
    /// The value charted next to power: irradiance for solar, wind speed for wind.
    pub fn secondary(&self) -> Option<f64> {
        match &self.reading {
            Reading::Solar { irradiance, .. } => Some(*irradiance),
            Reading::Wind { wind_speed, .. } => *wind_speed,
        }
    }
}

/// `GET solar_data/` item. `ac_power` is in W.
#[derive(Debug, Deserialize)]
pub struct SolarDataRecord {
    pub id: RecordId,
    #[serde(deserialize_with = "de_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub ac_power: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub ghi: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub poa_global: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub temp_air: Option<f64>,
}

impl From<SolarDataRecord> for Measurement {
    fn from(record: SolarDataRecord) -> Self {
        // zero GHI counts as missing
        let irradiance = record
            .ghi
            .filter(|v| *v != 0.0)
            .or(record.poa_global)
            .unwrap_or(0.0);
        Measurement {
            id: record.id,
            taken_at: record.created_at,
            power_kw: record.ac_power.unwrap_or(0.0) / 1000.0,
            reading: Reading::Solar {
                irradiance,
                temp_air: record.temp_air,
            },
        }
    }
}

/// `GET wind/wind_data/` item. `power_ac_W` is in W.
#[derive(Debug, Deserialize)]
pub struct WindDataRecord {
    pub id: RecordId,
    #[serde(deserialize_with = "de_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "power_ac_W", default, deserialize_with = "de_opt_number")]
    pub power_ac_w: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub wind_speed: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub rho: Option<f64>,
}

impl From<WindDataRecord> for Measurement {
    fn from(record: WindDataRecord) -> Self {
        Measurement {
            id: record.id,
            taken_at: record.created_at,
            power_kw: record.power_ac_w.unwrap_or(0.0) / 1000.0,
            reading: Reading::Wind {
                wind_speed: record.wind_speed,
                air_density: record.rho,
            },
        }
    }
}
