//! Chart series projection
//!
//! Measurements and forecasts are projected into one sequence of display points.
//! The two parts are concatenated, not aligned by timestamp: a measurement and a
//! forecast at the same clock time stay two separate points.

use std::fmt::Display;

use chrono::TimeZone;
use serde::Serialize;

use crate::model::forecast::sort_by_target;
use crate::model::{round2, Forecast, Measurement};

/// One point on a power chart, labelled with local `HH:MM`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_kw: Option<f64>,
    /// Irradiance for solar, wind speed for wind
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_secondary: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast_kw: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast_secondary: Option<f64>,
}

impl ChartPoint {
    pub fn is_actual(&self) -> bool {
        self.actual_kw.is_some()
    }

    pub fn is_forecast(&self) -> bool {
        self.forecast_kw.is_some()
    }
}

fn label<Tz>(ts: &chrono::DateTime<chrono::Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    ts.with_timezone(tz).format("%H:%M").to_string()
}

fn actual_point<Tz>(m: &Measurement, tz: &Tz) -> ChartPoint
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    ChartPoint {
        time: label(&m.taken_at, tz),
        actual_kw: Some(round2(m.power_kw)),
        actual_secondary: m.secondary(),
        forecast_kw: None,
        forecast_secondary: None,
    }
}

/// Detail chart: the last `window` measurements in received order, then the
/// first `window` forecasts by ascending target time.
pub fn project_detail<Tz>(
    measurements: &[Measurement],
    forecasts: &[Forecast],
    window: usize,
    tz: &Tz,
) -> Vec<ChartPoint>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let skip = measurements.len().saturating_sub(window);
    let mut upcoming = forecasts.to_vec();
    sort_by_target(&mut upcoming);

    measurements[skip..]
        .iter()
        .map(|m| actual_point(m, tz))
        .chain(upcoming.iter().take(window).map(|f| ChartPoint {
            time: label(&f.target_time, tz),
            actual_kw: None,
            actual_secondary: None,
            forecast_kw: Some(round2(f.power_kw)),
            forecast_secondary: f.wind_speed,
        }))
        .collect()
}

/// Overview chart: every measurement, actual values only
pub fn project_series<Tz>(measurements: &[Measurement], tz: &Tz) -> Vec<ChartPoint>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    measurements.iter().map(|m| actual_point(m, tz)).collect()
}
