//! BDD test world for the microgrid dashboard

use cucumber::World;
use microgrid_dashboard::chart::ChartPoint;
use microgrid_dashboard::model::{Forecast, Measurement};
use microgrid_dashboard::pages::{AssetListPage, LogPage, PageStatus};
use microgrid_dashboard::validation::FieldErrors;
use microgrid_dashboard::DashboardError;

use crate::common::FakeBackend;

#[derive(Debug, Default, World)]
pub struct DashboardWorld {
    pub backend: FakeBackend,

    // Asset list testing
    pub asset_page: Option<AssetListPage>,
    pub page_status: Option<PageStatus>,
    pub write_result: Option<Result<(), DashboardError>>,

    // Log page testing
    pub log_page: Option<LogPage>,

    // Validation testing
    pub field_errors: Option<FieldErrors>,

    // Chart testing
    pub measurements: Vec<Measurement>,
    pub forecasts: Vec<Forecast>,
    pub chart: Vec<ChartPoint>,
}

impl DashboardWorld {
    pub fn asset_page(&self) -> &AssetListPage {
        self.asset_page.as_ref().expect("asset page not mounted")
    }

    pub fn log_page(&mut self) -> &mut LogPage {
        self.log_page.as_mut().expect("log page not mounted")
    }
}
