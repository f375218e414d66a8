//! Single asset detail: record, measurements, forecasts and the combined chart

use serde::Serialize;

use super::PageStatus;
use crate::api::ApiClient;
use crate::chart::{project_detail, ChartPoint};
use crate::config::PagesConfig;
use crate::fallback::{fetch_or_fallback, LoadState};
use crate::model::forecast::sort_by_target;
use crate::model::panel::active_panel_power_kw;
use crate::model::{Asset, AssetKind, Forecast, Measurement, RecordId, SolarPanel};
use crate::samples;

/// Everything the detail page renders
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetDetailView {
    pub asset: Asset,
    /// Solar: power of the active panels. Wind: rated power if the turbine is active.
    pub display_power_kw: f64,
    /// Solar systems only
    pub panels: Vec<SolarPanel>,
    pub chart: Vec<ChartPoint>,
    /// Newest first
    pub recent_measurements: Vec<Measurement>,
    /// Soonest first
    pub upcoming_forecasts: Vec<Forecast>,
    pub asset_status: PageStatus,
    pub measurements_status: PageStatus,
    pub forecasts_status: PageStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub panels_status: Option<PageStatus>,
}

impl AssetDetailView {
    /// True when any of the fetches fell back to sample data.
    pub fn uses_sample_data(&self) -> bool {
        [
            Some(&self.asset_status),
            Some(&self.measurements_status),
            Some(&self.forecasts_status),
            self.panels_status.as_ref(),
        ]
        .into_iter()
        .flatten()
        .any(|s| s.cause.is_some())
    }
}

async fn load_panels(
    api: &ApiClient,
    kind: AssetKind,
    id: &RecordId,
) -> Option<LoadState<Vec<SolarPanel>>> {
    match kind {
        AssetKind::Solar => Some(
            fetch_or_fallback("panels", api.panels(id), || samples::sample_panels(id)).await,
        ),
        AssetKind::Wind => None,
    }
}

/// Fetch the asset, its measurements, its forecasts and (for solar systems) its
/// panels concurrently.
///
/// Each request falls back on its own; a failing forecast endpoint does not
/// discard measurements that did arrive.
pub async fn load_detail(
    api: &ApiClient,
    pages: &PagesConfig,
    kind: AssetKind,
    id: &RecordId,
) -> AssetDetailView {
    let (asset, measurements, forecasts, panels) = tokio::join!(
        fetch_or_fallback(kind.label(), api.get_asset(kind, id), || {
            samples::sample_asset(kind, id)
        }),
        fetch_or_fallback(
            "measurements",
            api.measurements(kind, id, pages.measurement_limit),
            || samples::sample_measurements(kind, pages.measurement_limit),
        ),
        fetch_or_fallback("forecasts", api.forecasts(kind, id), || {
            samples::sample_forecasts(kind, pages.chart_window)
        }),
        load_panels(api, kind, id),
    );

    let asset_status = PageStatus::of(&asset);
    let measurements_status = PageStatus::of(&measurements);
    let forecasts_status = PageStatus::of(&forecasts);
    let panels_status = panels.as_ref().map(PageStatus::of);

    let asset = asset
        .into_data()
        .unwrap_or_else(|| samples::sample_asset(kind, id));
    let measurements = measurements.into_data().unwrap_or_default();
    let mut forecasts = forecasts.into_data().unwrap_or_default();
    let panels = panels
        .and_then(LoadState::into_data)
        .unwrap_or_default();
    let display_power_kw = match kind {
        AssetKind::Solar => active_panel_power_kw(&panels),
        AssetKind::Wind => asset.display_power_kw(),
    };

    let chart = project_detail(
        &measurements,
        &forecasts,
        pages.chart_window,
        &pages.display_offset(),
    );

    let recent_measurements = measurements
        .iter()
        .rev()
        .take(pages.recent_rows)
        .cloned()
        .collect();
    sort_by_target(&mut forecasts);
    forecasts.truncate(pages.recent_rows);

    tracing::debug!(
        "Detail for {} {}: {} chart points",
        kind.label(),
        id,
        chart.len()
    );

    AssetDetailView {
        asset,
        display_power_kw,
        panels,
        chart,
        recent_measurements,
        upcoming_forecasts: forecasts,
        asset_status,
        measurements_status,
        forecasts_status,
        panels_status,
    }
}
