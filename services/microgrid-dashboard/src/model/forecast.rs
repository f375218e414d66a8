//! Solar and wind forecasts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{de_opt_number, de_opt_timestamp, RecordId};

/// A predicted value for one future instant, power in kW
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub id: RecordId,
    pub target_time: DateTime<Utc>,
    pub power_kw: f64,
    pub wind_speed: Option<f64>,
}

/// `GET solar/solar_system/solar_forecasts/` item. `predicted_power` is in W.
#[derive(Debug, Deserialize)]
pub struct SolarForecastRecord {
    pub id: RecordId,
    #[serde(default, deserialize_with = "de_opt_timestamp")]
    pub target_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de_opt_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub predicted_power: Option<f64>,
}

impl SolarForecastRecord {
    /// Records carrying neither `target_time` nor `timestamp` cannot be placed on a time axis.
    pub fn into_forecast(self) -> Option<Forecast> {
        let target_time = self.target_time.or(self.timestamp)?;
        Some(Forecast {
            id: self.id,
            target_time,
            power_kw: self.predicted_power.unwrap_or(0.0) / 1000.0,
            wind_speed: None,
        })
    }
}

/// `GET wind/wind_forecasts/` item. Power is already in kW.
#[derive(Debug, Deserialize)]
pub struct WindForecastRecord {
    pub id: RecordId,
    #[serde(default, deserialize_with = "de_opt_timestamp")]
    pub target_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de_opt_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub wind_power_kw_forecast: Option<f64>,
    #[serde(default, deserialize_with = "de_opt_number")]
    pub wind_speed_forecast: Option<f64>,
}

impl WindForecastRecord {
    pub fn into_forecast(self) -> Option<Forecast> {
        let target_time = self.target_time.or(self.timestamp)?;
        Some(Forecast {
            id: self.id,
            target_time,
            power_kw: self.wind_power_kw_forecast.unwrap_or(0.0),
            wind_speed: self.wind_speed_forecast,
        })
    }
}

/// Sort ascending by target time, the order every forecast view uses.
pub fn sort_by_target(forecasts: &mut [Forecast]) {
    forecasts.sort_by_key(|f| f.target_time);
}
