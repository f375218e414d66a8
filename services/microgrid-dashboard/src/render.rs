//! Plain-text tables for the CLI

use std::fmt::Write as _;

use crate::model::log_row::{kw_cell, MISSING};
use crate::model::{Asset, AssetKind, SiteConfig};
use crate::pages::{AssetDetailView, LogPageView, PageStatus};
use crate::settings::MicrogridSettings;

fn status_line(out: &mut String, what: &str, status: &PageStatus) {
    if let Some(cause) = &status.cause {
        let _ = writeln!(out, "! {} unavailable, showing sample data ({})", what, cause);
    }
}

fn opt(value: Option<f64>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| MISSING.to_string())
}

pub fn asset_table(
    kind: AssetKind,
    assets: &[Asset],
    status: &PageStatus,
    total_kw: f64,
) -> String {
    let mut out = String::new();
    status_line(&mut out, kind.label(), status);
    let _ = writeln!(
        out,
        "{:<6} {:<24} {:>10} {:>8} {:<12} {}",
        "ID", "NAME", "POWER kW", "EFF %", "STATUS", "LOCATION"
    );
    for a in assets {
        let _ = writeln!(
            out,
            "{:<6} {:<24} {:>10.2} {:>8} {:<12} {}",
            a.id.as_str(),
            a.name,
            a.rated_power_kw,
            opt(a.efficiency_pct),
            a.status.to_string(),
            a.location.as_deref().unwrap_or(MISSING)
        );
    }
    let _ = writeln!(out, "{} total, {:.2} kW active", assets.len(), total_kw);
    out
}

pub fn detail(view: &AssetDetailView) -> String {
    let mut out = String::new();
    status_line(&mut out, view.asset.kind.label(), &view.asset_status);
    status_line(&mut out, "measurements", &view.measurements_status);
    status_line(&mut out, "forecasts", &view.forecasts_status);
    if let Some(panels_status) = &view.panels_status {
        status_line(&mut out, "panels", panels_status);
    }

    let a = &view.asset;
    let _ = writeln!(out, "{} #{}: {}", a.kind.label(), a.id, a.name);
    let _ = writeln!(out, "  status:   {}", a.status);
    let _ = writeln!(out, "  rated:    {:.2} kW", a.rated_power_kw);
    let _ = writeln!(out, "  current:  {:.2} kW", view.display_power_kw);
    if !view.panels.is_empty() {
        let active = view.panels.iter().filter(|p| p.is_active()).count();
        let _ = writeln!(out, "  panels:   {} of {} active", active, view.panels.len());
    }
    if let Some(location) = &a.location {
        let _ = writeln!(out, "  location: {}", location);
    }

    let _ = writeln!(out, "\nChart ({} points)", view.chart.len());
    for p in &view.chart {
        let (label, kw, secondary) = if p.is_actual() {
            ("actual", p.actual_kw, p.actual_secondary)
        } else {
            ("forecast", p.forecast_kw, p.forecast_secondary)
        };
        let _ = writeln!(
            out,
            "  {} {:<8} {:>8} kW  {}",
            p.time,
            label,
            kw_cell(kw),
            kw_cell(secondary)
        );
    }

    let _ = writeln!(out, "\nRecent measurements");
    for m in &view.recent_measurements {
        let _ = writeln!(
            out,
            "  {}  {:>8.2} kW  {}",
            m.taken_at.format("%d.%m.%Y %H:%M"),
            m.power_kw,
            kw_cell(m.secondary())
        );
    }

    let _ = writeln!(out, "\nUpcoming forecasts");
    for f in &view.upcoming_forecasts {
        let _ = writeln!(
            out,
            "  {}  {:>8.2} kW",
            f.target_time.format("%d.%m.%Y %H:%M"),
            f.power_kw
        );
    }
    out
}

pub fn site_table(sites: &[SiteConfig], status: &PageStatus) -> String {
    let mut out = String::new();
    status_line(&mut out, "site configurations", status);
    let _ = writeln!(
        out,
        "{:<6} {:<20} {:>9} {:>9} {:>6} {:>8} {:>9} {:>7} {}",
        "ID", "NAME", "LAT", "LON", "TILT", "AZIMUTH", "TARGET kW", "ALBEDO", "TIMEZONE"
    );
    for site in sites {
        let _ = writeln!(
            out,
            "{:<6} {:<20} {:>9} {:>9} {:>6} {:>8} {:>9} {:>7} {}",
            site.id.as_str(),
            site.name,
            opt(site.latitude),
            opt(site.longitude),
            opt(site.tilt),
            opt(site.azimuth),
            opt(site.target_kw),
            opt(site.albedo),
            site.timezone.as_deref().unwrap_or(MISSING)
        );
    }
    let _ = writeln!(out, "{} sites", sites.len());
    out
}

pub fn log_table(view: &LogPageView) -> String {
    let mut out = String::new();
    status_line(&mut out, "logs", &view.status);
    let _ = writeln!(
        out,
        "{:<17} {:>8} {:>8} {:>8} {:>7} {:<12} {:>7}",
        "TIME", "SOLAR", "WIND", "LOAD", "SOC", "ACTION", "REWARD"
    );
    for row in &view.rows {
        let _ = writeln!(
            out,
            "{:<17} {:>8} {:>8} {:>8} {:>7} {:<12} {:>7}",
            row.time_label(),
            kw_cell(row.solar_ac),
            kw_cell(row.wind_ac),
            kw_cell(row.load),
            row.soc_label(),
            row.action.label(),
            row.reward_label()
        );
    }
    let _ = writeln!(
        out,
        "page {}/{} ({} rows)",
        view.page, view.total_pages, view.total
    );
    out
}

pub fn settings(settings: &MicrogridSettings) -> String {
    let yes_no = |b: bool| if b { "yes" } else { "no" };
    let mut out = String::new();
    let _ = writeln!(out, "battery capacity   {} kWh", settings.battery_capacity_kwh);
    let _ = writeln!(out, "max charge         {} kW", settings.max_charge_kw);
    let _ = writeln!(out, "max discharge      {} kW", settings.max_discharge_kw);
    let _ = writeln!(
        out,
        "SoC window         {}% .. {}% ({:.1} kWh usable)",
        settings.min_soc_pct,
        settings.max_soc_pct,
        settings.usable_capacity_kwh()
    );
    let _ = writeln!(out, "grid export        {}", yes_no(settings.grid_export_enabled));
    let _ = writeln!(out, "grid import        {}", yes_no(settings.grid_import_enabled));
    let _ = writeln!(out, "simulation step    {} min", settings.simulation_step_minutes);
    let _ = writeln!(out, "location           {}", settings.location);
    let _ = writeln!(out, "timezone           {}", settings.timezone);
    out
}
