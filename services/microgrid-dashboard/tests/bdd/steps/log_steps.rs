//! BDD step definitions for the log page and pagination

use cucumber::{given, then, when};

use microgrid_dashboard::fallback::LoadStatus;
use microgrid_dashboard::pages::LogPage;
use microgrid_dashboard::samples::sample_logs;

use crate::common::log_rows;
use crate::world::DashboardWorld;

#[given(expr = "the backend has {int} log rows")]
fn backend_has_log_rows(world: &mut DashboardWorld, count: usize) {
    world.backend.seed("logs", log_rows(count));
}

#[when(expr = "the log page is mounted with {int} rows per page")]
async fn mount_log_page(world: &mut DashboardWorld, rows_per_page: usize) {
    let mut page = LogPage::new(world.backend.client(), rows_per_page);
    page.mount().await;
    world.log_page = Some(page);
}

#[when(expr = "I go to the next page {int} time(s)")]
fn next_page(world: &mut DashboardWorld, times: usize) {
    let page = world.log_page();
    for _ in 0..times {
        page.next_page();
    }
}

#[when(expr = "I go to the previous page {int} time(s)")]
fn prev_page(world: &mut DashboardWorld, times: usize) {
    let page = world.log_page();
    for _ in 0..times {
        page.prev_page();
    }
}

#[when(expr = "I jump to page {int}")]
fn jump_to_page(world: &mut DashboardWorld, page: usize) {
    world.log_page().set_page(page);
}

#[then(expr = "the log has {int} page(s)")]
fn log_has_pages(world: &mut DashboardWorld, pages: usize) {
    assert_eq!(world.log_page().window().total_pages(), pages);
}

#[then(expr = "the current page is {int}")]
fn current_page_is(world: &mut DashboardWorld, page: usize) {
    assert_eq!(world.log_page().window().page(), page);
}

#[then(expr = "the current page shows {int} row(s)")]
fn current_page_shows(world: &mut DashboardWorld, rows: usize) {
    assert_eq!(world.log_page().visible().len(), rows);
}

#[then(expr = "the first visible row has id {int}")]
fn first_visible_row(world: &mut DashboardWorld, id: u64) {
    let page = world.log_page();
    let first = page.visible().first().expect("no visible rows");
    assert_eq!(first.id.as_str(), id.to_string());
}

#[then("the log page shows the sample log")]
fn log_shows_samples(world: &mut DashboardWorld) {
    let page = world.log_page();
    assert_eq!(page.status().status, LoadStatus::Fallback);
    assert_eq!(page.rows(), sample_logs().as_slice());
}
