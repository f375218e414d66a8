//! Error types for the microgrid dashboard

use crate::validation::FieldErrors;

/// Errors that can occur while talking to the backend or driving a page
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("{method} {url} returned status {status}")]
    Status {
        method: &'static str,
        url: String,
        status: u16,
        body: String,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Request already in flight: {0}")]
    Busy(String),

    #[error("Showing sample data, reload before changing records: {0}")]
    Unsynced(String),

    #[error("Dashboard error: {0}")]
    Dashboard(String),
}

impl DashboardError {
    /// Transport failures, non-2xx answers and undecodable bodies.
    ///
    /// Read paths substitute fallback data for these; write paths surface them.
    pub fn is_network_failure(&self) -> bool {
        matches!(
            self,
            DashboardError::Http(_) | DashboardError::Status { .. } | DashboardError::Json(_)
        )
    }
}

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;
