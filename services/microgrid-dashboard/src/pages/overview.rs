//! Overview page: live microgrid figures, event feed and generation charts

use serde::Serialize;
use tokio::sync::watch;

use super::PageStatus;
use crate::api::ApiClient;
use crate::chart::{project_series, ChartPoint};
use crate::config::{Config, PagesConfig};
use crate::fallback::{fetch_or_fallback, LoadState};
use crate::model::{round2, AssetKind};
use crate::samples;
use crate::stats::{
    BalanceLabel, BatteryLevel, GridEvent, GridSnapshot, OverviewStats, StatsTicker,
};

/// Owns the stats ticker for as long as the page is mounted
#[derive(Debug)]
pub struct OverviewPage {
    ticker: StatsTicker,
    solar_series: LoadState<Vec<ChartPoint>>,
    wind_series: LoadState<Vec<ChartPoint>>,
}

/// Serializable overview with the derived figures filled in
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewView {
    pub snapshot: GridSnapshot,
    pub total_generation_kw: f64,
    pub balance_kw: f64,
    pub balance: BalanceLabel,
    pub battery_level: BatteryLevel,
    pub events: Vec<GridEvent>,
    pub tick: u64,
    pub solar_series: Vec<ChartPoint>,
    pub wind_series: Vec<ChartPoint>,
    pub solar_status: PageStatus,
    pub wind_status: PageStatus,
}

async fn load_series(
    api: &ApiClient,
    pages: &PagesConfig,
    kind: AssetKind,
) -> LoadState<Vec<ChartPoint>> {
    let offset = pages.display_offset();
    fetch_or_fallback(
        kind.label(),
        async {
            api.recent_measurements(kind, pages.dashboard_limit)
                .await
                .map(|measurements| project_series(&measurements, &offset))
        },
        || {
            project_series(
                &samples::sample_measurements(kind, pages.dashboard_limit),
                &offset,
            )
        },
    )
    .await
}

impl OverviewPage {
    /// Start the ticker and fetch both generation series concurrently.
    pub async fn mount(api: &ApiClient, config: &Config) -> Self {
        let ticker = StatsTicker::start(&config.stats);
        let (solar_series, wind_series) = tokio::join!(
            load_series(api, &config.pages, AssetKind::Solar),
            load_series(api, &config.pages, AssetKind::Wind),
        );
        tracing::info!(
            "Overview mounted ({} solar, {} wind points)",
            solar_series.data().map_or(0, Vec::len),
            wind_series.data().map_or(0, Vec::len)
        );

        Self {
            ticker,
            solar_series,
            wind_series,
        }
    }

    pub fn stats(&self) -> OverviewStats {
        self.ticker.latest()
    }

    pub fn subscribe(&self) -> watch::Receiver<OverviewStats> {
        self.ticker.subscribe()
    }

    pub fn view(&self) -> OverviewView {
        let stats = self.stats();
        let snapshot = stats.snapshot;
        OverviewView {
            total_generation_kw: round2(snapshot.total_generation_kw()),
            balance_kw: round2(snapshot.balance_kw()),
            balance: snapshot.balance_label(),
            battery_level: snapshot.battery_level(),
            snapshot,
            events: stats.events,
            tick: stats.tick,
            solar_series: self.solar_series.data().cloned().unwrap_or_default(),
            wind_series: self.wind_series.data().cloned().unwrap_or_default(),
            solar_status: PageStatus::of(&self.solar_series),
            wind_status: PageStatus::of(&self.wind_series),
        }
    }

    /// Stop the ticker and wait for it.
    pub async fn teardown(self) {
        self.ticker.shutdown().await;
        tracing::info!("Overview torn down");
    }
}
