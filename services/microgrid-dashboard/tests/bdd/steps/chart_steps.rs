//! BDD step definitions for chart projection

use chrono::{DateTime, Duration, FixedOffset, Utc};
use cucumber::{given, then, when};

use microgrid_dashboard::chart::project_detail;
use microgrid_dashboard::model::{Forecast, Measurement, Reading, RecordId};

use crate::world::DashboardWorld;

fn parse_time(raw: &str) -> DateTime<Utc> {
    raw.parse().expect("bad RFC 3339 timestamp")
}

#[given(expr = "{int} hourly solar measurement(s) starting at {string}")]
fn hourly_measurements(world: &mut DashboardWorld, count: usize, start: String) {
    let start = parse_time(&start);
    world.measurements = (0..count)
        .map(|i| Measurement {
            id: RecordId::from(i as u64 + 1),
            taken_at: start + Duration::hours(i as i64),
            power_kw: 1.0 + i as f64,
            reading: Reading::Solar {
                irradiance: 400.0,
                temp_air: None,
            },
        })
        .collect();
}

#[given(expr = "{int} hourly forecast(s) starting at {string}")]
fn hourly_forecasts(world: &mut DashboardWorld, count: usize, start: String) {
    let start = parse_time(&start);
    // stored newest first to show the projection sorts them
    world.forecasts = (0..count)
        .rev()
        .map(|i| Forecast {
            id: RecordId::from(i as u64 + 100),
            target_time: start + Duration::hours(i as i64),
            power_kw: 2.0 + i as f64,
            wind_speed: None,
        })
        .collect();
}

#[when(expr = "the detail chart is projected with a window of {int} at UTC offset {int}")]
fn project(world: &mut DashboardWorld, window: usize, offset_hours: i32) {
    let tz = FixedOffset::east_opt(offset_hours * 3600).expect("bad offset");
    world.chart = project_detail(&world.measurements, &world.forecasts, window, &tz);
}

#[then(expr = "the chart has {int} point(s)")]
fn chart_has_points(world: &mut DashboardWorld, count: usize) {
    assert_eq!(world.chart.len(), count);
}

#[then(expr = "points {int} to {int} carry only actual values")]
fn only_actual(world: &mut DashboardWorld, from: usize, to: usize) {
    for p in &world.chart[from - 1..to] {
        assert!(p.actual_kw.is_some() && p.forecast_kw.is_none(), "{:?}", p);
    }
}

#[then(expr = "points {int} to {int} carry only forecast values")]
fn only_forecast(world: &mut DashboardWorld, from: usize, to: usize) {
    for p in &world.chart[from - 1..to] {
        assert!(p.forecast_kw.is_some() && p.actual_kw.is_none(), "{:?}", p);
    }
}

#[then(expr = "the chart labels are {string}")]
fn chart_labels(world: &mut DashboardWorld, labels: String) {
    let actual: Vec<&str> = world.chart.iter().map(|p| p.time.as_str()).collect();
    let expected: Vec<&str> = labels.split(',').map(str::trim).collect();
    assert_eq!(actual, expected);
}
