//! Configuration types for the microgrid dashboard

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub pages: PagesConfig,
    #[serde(default)]
    pub stats: StatsConfig,
    #[serde(default)]
    pub view_server: ViewServerConfig,
    /// Where microgrid settings are persisted; unset keeps them in memory only
    #[serde(default)]
    pub settings_path: Option<PathBuf>,
}

/// REST backend location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Fetch windows and page sizes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagesConfig {
    #[serde(default = "default_rows_per_page")]
    pub rows_per_page: usize,
    #[serde(default = "default_measurement_limit")]
    pub measurement_limit: usize,
    #[serde(default = "default_chart_window")]
    pub chart_window: usize,
    #[serde(default = "default_dashboard_limit")]
    pub dashboard_limit: usize,
    #[serde(default = "default_recent_rows")]
    pub recent_rows: usize,
    /// Offset used for chart time labels
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            rows_per_page: default_rows_per_page(),
            measurement_limit: default_measurement_limit(),
            chart_window: default_chart_window(),
            dashboard_limit: default_dashboard_limit(),
            recent_rows: default_recent_rows(),
            utc_offset_minutes: default_utc_offset_minutes(),
        }
    }
}

impl PagesConfig {
    pub fn display_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| Utc.fix())
    }
}

/// Synthetic overview statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    #[serde(default = "default_stats_interval")]
    pub interval_seconds: u64,
    /// Fixed seed for reproducible runs
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_stats_interval(),
            seed: None,
            event_capacity: default_event_capacity(),
        }
    }
}

/// JSON view server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewServerConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_view_port")]
    pub port: u16,
}

impl Default for ViewServerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: default_view_port(),
        }
    }
}

impl Config {
    /// Reject values no page can work with
    pub fn validate(&self) -> crate::Result<()> {
        let url = &self.backend.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(crate::DashboardError::Config(format!(
                "backend.base_url must start with http:// or https://, got '{}'",
                url
            )));
        }
        if self.pages.rows_per_page == 0 {
            return Err(crate::DashboardError::Config(
                "pages.rows_per_page must be greater than 0".to_string(),
            ));
        }
        if self.pages.chart_window == 0 {
            return Err(crate::DashboardError::Config(
                "pages.chart_window must be greater than 0".to_string(),
            ));
        }
        if self.stats.interval_seconds == 0 {
            return Err(crate::DashboardError::Config(
                "stats.interval_seconds must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_base_url() -> String {
    "http://localhost:8000/api/v1".to_string()
}

fn default_rows_per_page() -> usize {
    10
}

fn default_measurement_limit() -> usize {
    168
}

fn default_chart_window() -> usize {
    24
}

fn default_dashboard_limit() -> usize {
    48
}

fn default_recent_rows() -> usize {
    10
}

fn default_utc_offset_minutes() -> i32 {
    300
}

fn default_stats_interval() -> u64 {
    4
}

fn default_event_capacity() -> usize {
    10
}

fn default_true() -> bool {
    true
}

fn default_view_port() -> u16 {
    11120
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::DashboardError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}
