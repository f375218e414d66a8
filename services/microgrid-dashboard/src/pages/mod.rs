//! Page controllers
//!
//! Each page owns its own collections and fetches once on mount. Read failures
//! degrade to sample data; write failures are returned to the caller untouched.

pub mod assets;
pub mod detail;
pub mod logs;
pub mod overview;
pub mod sites;

pub use assets::AssetListPage;
pub use detail::{load_detail, AssetDetailView};
pub use logs::{LogPage, LogPageView};
pub use overview::{OverviewPage, OverviewView};
pub use sites::SiteListPage;

use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

use crate::error::{DashboardError, Result};
use crate::fallback::{LoadState, LoadStatus};

/// Load status of a page plus the failure that forced sample data, if any
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageStatus {
    pub status: LoadStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl PageStatus {
    pub fn loading() -> Self {
        Self {
            status: LoadStatus::Loading,
            cause: None,
        }
    }

    pub fn of<T>(state: &LoadState<T>) -> Self {
        Self {
            status: state.status(),
            cause: state.cause().map(str::to_string),
        }
    }

    /// Writes are refused while the page shows sample records: their ids mean
    /// nothing to the backend.
    pub(crate) fn ensure_synced(&self, what: &str) -> Result<()> {
        if self.status == LoadStatus::Fallback {
            return Err(DashboardError::Unsynced(what.to_string()));
        }
        Ok(())
    }
}

/// Held while a write request is in flight; releases the flag on drop
#[derive(Debug)]
pub(crate) struct WriteGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> WriteGuard<'a> {
    /// Fails with [`DashboardError::Busy`] when another write holds the flag.
    pub(crate) fn acquire(flag: &'a AtomicBool, what: &str) -> Result<Self> {
        if flag.swap(true, Ordering::AcqRel) {
            return Err(DashboardError::Busy(format!(
                "{} ignored: another change is still being saved",
                what
            )));
        }
        Ok(Self { flag })
    }
}

impl Drop for WriteGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
