//! Battery agent log page

use serde::Serialize;

use super::PageStatus;
use crate::api::ApiClient;
use crate::fallback::fetch_or_fallback;
use crate::model::log_row::sort_newest_first;
use crate::model::LogRow;
use crate::pagination::PageWindow;
use crate::samples;
use crate::store::Collection;

/// Log rows fetched once and paged locally, newest first
#[derive(Debug)]
pub struct LogPage {
    api: ApiClient,
    rows: Collection<LogRow>,
    window: PageWindow,
    status: PageStatus,
}

/// One rendered page of the log table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogPageView {
    pub rows: Vec<LogRow>,
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
    pub has_prev: bool,
    pub has_next: bool,
    pub status: PageStatus,
}

impl LogPage {
    pub fn new(api: ApiClient, rows_per_page: usize) -> Self {
        Self {
            api,
            rows: Collection::new(),
            window: PageWindow::new(rows_per_page, 0),
            status: PageStatus::loading(),
        }
    }

    /// Fetch all rows and go back to page one. Falls back to the sample log.
    pub async fn mount(&mut self) -> PageStatus {
        self.status = PageStatus::loading();

        let state = fetch_or_fallback("logs", self.api.logs(), samples::sample_logs).await;
        self.status = PageStatus::of(&state);

        let mut rows = state.into_data().unwrap_or_default();
        sort_newest_first(&mut rows);
        tracing::debug!("Loaded {} log rows", rows.len());

        self.window = PageWindow::new(self.window.page_size(), rows.len());
        self.rows.replace_all(rows);
        self.status.clone()
    }

    pub fn status(&self) -> &PageStatus {
        &self.status
    }

    pub fn window(&self) -> &PageWindow {
        &self.window
    }

    pub fn rows(&self) -> &[LogRow] {
        self.rows.items()
    }

    /// Rows on the current page
    pub fn visible(&self) -> &[LogRow] {
        self.window.visible(self.rows.items())
    }

    pub fn next_page(&mut self) -> usize {
        self.window.next_page()
    }

    pub fn prev_page(&mut self) -> usize {
        self.window.prev_page()
    }

    /// Jump to `page`, clamped to the available pages.
    pub fn set_page(&mut self, page: usize) -> usize {
        self.window.set_page(page)
    }

    pub fn view(&self) -> LogPageView {
        LogPageView {
            rows: self.visible().to_vec(),
            page: self.window.page(),
            total_pages: self.window.total_pages(),
            total: self.window.total(),
            has_prev: self.window.has_prev(),
            has_next: self.window.has_next(),
            status: self.status.clone(),
        }
    }
}
