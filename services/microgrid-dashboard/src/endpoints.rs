//! Backend resource paths and their query parameters

use crate::model::{AssetKind, RecordId};

/// A path relative to the API base plus its query string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub path: String,
    pub query: Vec<(&'static str, String)>,
}

impl Endpoint {
    fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    fn with(mut self, key: &'static str, value: impl ToString) -> Self {
        self.query.push((key, value.to_string()));
        self
    }

    /// Collection of solar systems or wind turbines
    pub fn assets(kind: AssetKind) -> Self {
        match kind {
            AssetKind::Solar => Self::new("solar/solar_system/"),
            AssetKind::Wind => Self::new("wind/wind_turbines/"),
        }
    }

    /// A single asset, also the target of PUT and DELETE
    pub fn asset(kind: AssetKind, id: &RecordId) -> Self {
        match kind {
            AssetKind::Solar => Self::new(format!("solar/solar_system/{}", id)),
            AssetKind::Wind => Self::new(format!("wind/wind_turbines/{}", id)),
        }
    }

    /// Measurements of one asset, at most `limit` records
    pub fn measurements(kind: AssetKind, id: &RecordId, limit: usize) -> Self {
        match kind {
            AssetKind::Solar => Self::new("solar_data/")
                .with("system_id", id)
                .with("limit", limit),
            AssetKind::Wind => Self::new("wind/wind_data/")
                .with("wind_turbine_id", id)
                .with("limit", limit),
        }
    }

    /// Latest measurements across every asset of a kind
    pub fn recent_measurements(kind: AssetKind, limit: usize) -> Self {
        match kind {
            AssetKind::Solar => Self::new("solar_data/").with("limit", limit),
            AssetKind::Wind => Self::new("wind/wind_data/").with("limit", limit),
        }
    }

    pub fn forecasts(kind: AssetKind, id: &RecordId) -> Self {
        match kind {
            AssetKind::Solar => {
                Self::new("solar/solar_system/solar_forecasts/").with("system_id", id)
            }
            AssetKind::Wind => Self::new("wind/wind_forecasts/").with("turbine_id", id),
        }
    }

    /// Panels of one solar system
    pub fn panels(system_id: &RecordId) -> Self {
        Self::new("solar_panels/").with("system_id", system_id)
    }

    /// Solar site configurations share the solar system collection
    pub fn sites() -> Self {
        Self::assets(AssetKind::Solar)
    }

    pub fn site(id: &RecordId) -> Self {
        Self::asset(AssetKind::Solar, id)
    }

    pub fn logs() -> Self {
        Self::new("logs")
    }

    /// Absolute URL under `base_url`, without the query string.
    pub fn url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.path)
    }

    pub fn query_pairs(&self) -> Vec<(&str, &str)> {
        self.query.iter().map(|(k, v)| (*k, v.as_str())).collect()
    }
}
