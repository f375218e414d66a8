//! Fixed sample datasets shown when the backend cannot be reached
//!
//! Everything here is generated from a constant seed, so the same failure always
//! shows the same data.

use std::f64::consts::PI;

use chrono::{DateTime, Duration, TimeZone, Timelike, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::model::log_row::sort_newest_first;
use crate::model::{
    round2, Asset, AssetKind, AssetStatus, BatteryAction, Forecast, LogRow, Measurement, Reading,
    RecordId, SiteConfig, SolarPanel,
};

const SAMPLE_SEED: u64 = 20_251_216;

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 12, day, hour, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Instant the sample series end at (measurements) or start after (forecasts)
pub fn sample_now() -> DateTime<Utc> {
    at(16, 10)
}

fn rng_for(kind: AssetKind) -> StdRng {
    let offset = match kind {
        AssetKind::Solar => 1,
        AssetKind::Wind => 2,
    };
    StdRng::seed_from_u64(SAMPLE_SEED + offset)
}

/// Thirty battery decisions, newest first
pub fn sample_logs() -> Vec<LogRow> {
    let fixed = [
        (1, 10, 4.82, 8.15, 10.2, 0.78, BatteryAction::Discharge, 0.92),
        (2, 9, 3.21, 7.90, 9.8, 0.82, BatteryAction::Charge, -0.15),
        (3, 8, 1.10, 9.45, 11.5, 0.75, BatteryAction::Discharge, 0.88),
    ];
    let mut rows: Vec<LogRow> = fixed
        .into_iter()
        .map(|(id, hour, solar, wind, load, soc, action, reward)| LogRow {
            id: RecordId::from(id as u64),
            timestamp: Some(at(16, hour)),
            solar_ac: Some(solar),
            wind_ac: Some(wind),
            load: Some(load),
            soc: Some(soc),
            action,
            reward: Some(reward),
        })
        .collect();

    let mut rng = StdRng::seed_from_u64(SAMPLE_SEED);
    for i in 0..27u32 {
        let action = match rng.gen_range(0..3) {
            0 => BatteryAction::Charge,
            1 => BatteryAction::Discharge,
            _ => BatteryAction::Idle,
        };
        rows.push(LogRow {
            id: RecordId::from(u64::from(i) + 4),
            timestamp: Some(at(16, 7 - (i % 8))),
            solar_ac: Some(round2(rng.gen_range(0.5..6.5))),
            wind_ac: Some(round2(rng.gen_range(2.0..14.0))),
            load: Some(round2(rng.gen_range(5.0..20.0))),
            soc: Some(rng.gen_range(0.3..0.9)),
            action,
            reward: Some(round2(rng.gen_range(-0.5..1.5))),
        });
    }

    sort_newest_first(&mut rows);
    rows
}

/// Three assets per kind with mixed statuses
pub fn sample_assets(kind: AssetKind) -> Vec<Asset> {
    let rows: [(u64, &str, f64, Option<f64>, AssetStatus, Option<&str>); 3] = match kind {
        AssetKind::Solar => [
            (1, "Karaganda PV-1", 50.0, Some(19.5), AssetStatus::Active, None),
            (2, "Temirtau Rooftop", 12.5, Some(18.2), AssetStatus::Active, None),
            (3, "Campus Carport", 8.0, Some(17.0), AssetStatus::Maintenance, None),
        ],
        AssetKind::Wind => [
            (1, "Steppe WT-1", 2500.0, None, AssetStatus::Active, Some("Karaganda")),
            (2, "Steppe WT-2", 2500.0, None, AssetStatus::Inactive, Some("Karaganda")),
            (3, "Test Rig", 10.0, None, AssetStatus::Active, Some("Campus")),
        ],
    };
    rows.into_iter()
        .map(|(id, name, power, efficiency, status, location)| Asset {
            id: RecordId::from(id),
            kind,
            name: name.to_string(),
            rated_power_kw: power,
            efficiency_pct: efficiency,
            status,
            location: location.map(str::to_string),
            created_at: Some(at(1, 8)),
        })
        .collect()
}

/// The sample asset with this id, or a placeholder named after it.
pub fn sample_asset(kind: AssetKind, id: &RecordId) -> Asset {
    sample_assets(kind)
        .into_iter()
        .find(|a| &a.id == id)
        .unwrap_or_else(|| Asset {
            id: id.clone(),
            kind,
            name: format!("{} {}", kind.label(), id),
            rated_power_kw: 0.0,
            efficiency_pct: None,
            status: AssetStatus::Inactive,
            location: None,
            created_at: None,
        })
}

fn daylight(ts: DateTime<Utc>) -> f64 {
    let hour = f64::from(ts.hour());
    (PI * (hour - 6.0) / 12.0).sin().max(0.0)
}

/// Hourly measurements ending at [`sample_now`], oldest first
pub fn sample_measurements(kind: AssetKind, count: usize) -> Vec<Measurement> {
    let mut rng = rng_for(kind);
    let end = sample_now();
    (0..count)
        .map(|i| {
            let taken_at = end - Duration::hours((count - 1 - i) as i64);
            let id = RecordId::from(i as u64 + 1);
            match kind {
                AssetKind::Solar => {
                    let sun = daylight(taken_at);
                    Measurement {
                        id,
                        taken_at,
                        power_kw: round2(sun * rng.gen_range(30.0..45.0)),
                        reading: Reading::Solar {
                            irradiance: (sun * rng.gen_range(600.0f64..800.0)).round(),
                            temp_air: Some(round2(rng.gen_range(-12.0..-2.0))),
                        },
                    }
                }
                AssetKind::Wind => {
                    let speed: f64 = round2(rng.gen_range(3.0..12.0));
                    Measurement {
                        id,
                        taken_at,
                        power_kw: round2((1.5 * speed.powi(3)).min(2500.0)),
                        reading: Reading::Wind {
                            wind_speed: Some(speed),
                            air_density: Some(
                                (rng.gen_range(1.20f64..1.30) * 1000.0).round() / 1000.0,
                            ),
                        },
                    }
                }
            }
        })
        .collect()
}

/// Hourly forecasts starting one hour after [`sample_now`], ascending
pub fn sample_forecasts(kind: AssetKind, count: usize) -> Vec<Forecast> {
    let mut rng = rng_for(kind);
    let start = sample_now();
    (0..count)
        .map(|i| {
            let target_time = start + Duration::hours(i as i64 + 1);
            let id = RecordId::from(i as u64 + 1);
            match kind {
                AssetKind::Solar => Forecast {
                    id,
                    target_time,
                    power_kw: round2(daylight(target_time) * rng.gen_range(28.0..42.0)),
                    wind_speed: None,
                },
                AssetKind::Wind => {
                    let speed: f64 = round2(rng.gen_range(3.0..12.0));
                    Forecast {
                        id,
                        target_time,
                        power_kw: round2((1.5 * speed.powi(3)).min(2500.0)),
                        wind_speed: Some(speed),
                    }
                }
            }
        })
        .collect()
}

/// Twelve 0.45 kW panels; the last two are out of service
pub fn sample_panels(system_id: &RecordId) -> Vec<SolarPanel> {
    (1..=12u64)
        .map(|n| SolarPanel {
            id: RecordId::from(n),
            system_id: Some(system_id.clone()),
            power_kw: 0.45,
            status: match n {
                11 => AssetStatus::Maintenance,
                12 => AssetStatus::Inactive,
                _ => AssetStatus::Active,
            },
        })
        .collect()
}

/// Two site configurations around Karaganda
pub fn sample_sites() -> Vec<SiteConfig> {
    let site = |id: u64, name: &str, latitude: f64, longitude: f64, target_kw: f64| SiteConfig {
        id: RecordId::from(id),
        name: name.to_string(),
        latitude: Some(latitude),
        longitude: Some(longitude),
        timezone: Some("Asia/Almaty".to_string()),
        tilt: Some(35.0),
        azimuth: Some(180.0),
        target_kw: Some(target_kw),
        module_power_stc: Some(450.0),
        albedo: Some(0.2),
        created_at: Some(at(1, 8)),
    };
    vec![
        site(1, "Karaganda PV-1", 49.80, 73.10, 50.0),
        site(2, "Temirtau Rooftop", 50.05, 72.96, 12.5),
    ]
}
