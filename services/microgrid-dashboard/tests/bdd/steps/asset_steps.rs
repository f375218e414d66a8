//! BDD step definitions for asset list, fallback and CRUD features

use cucumber::{given, then, when};

use microgrid_dashboard::fallback::LoadStatus;
use microgrid_dashboard::model::{AssetDraft, AssetKind, RecordId};
use microgrid_dashboard::pages::AssetListPage;
use microgrid_dashboard::samples::sample_assets;
use microgrid_dashboard::DashboardError;

use crate::common::{solar_system, wind_turbine};
use crate::world::DashboardWorld;

fn parse_kind(s: &str) -> AssetKind {
    match s {
        "solar" => AssetKind::Solar,
        "wind" => AssetKind::Wind,
        other => panic!("Unknown asset kind: {}", other),
    }
}

fn parse_status(s: &str) -> LoadStatus {
    match s {
        "loading" => LoadStatus::Loading,
        "ready" => LoadStatus::Ready,
        "fallback" => LoadStatus::Fallback,
        other => panic!("Unknown load status: {}", other),
    }
}

async fn mount(world: &mut DashboardWorld, kind: AssetKind) {
    let page = AssetListPage::new(kind, world.backend.client());
    world.page_status = Some(page.mount().await);
    world.asset_page = Some(page);
}

#[given("the backend is offline")]
fn backend_offline(world: &mut DashboardWorld) {
    world.backend.set_offline(true);
}

#[when("the backend is back online")]
fn backend_back_online(world: &mut DashboardWorld) {
    world.backend.set_offline(false);
}

#[given("the backend rejects writes")]
fn backend_rejects_writes(world: &mut DashboardWorld) {
    world.backend.set_failing_writes(true);
}

#[given(expr = "the backend has solar systems {string}")]
fn backend_has_solar_systems(world: &mut DashboardWorld, list: String) {
    // "1:Roof A:10, 2:Roof B:4.5"
    let records = list
        .split(',')
        .map(|entry| {
            let parts: Vec<&str> = entry.trim().split(':').collect();
            let id: u64 = parts[0].parse().expect("bad id");
            let power: f64 = parts[2].parse().expect("bad power");
            solar_system(id, parts[1], power, "Активна")
        })
        .collect();
    world.backend.seed("solar/solar_system/", records);
}

#[given(expr = "the backend has wind turbine {int} named {string} with {float} kW, status {string}")]
fn backend_has_wind_turbine(
    world: &mut DashboardWorld,
    id: u64,
    name: String,
    power: f64,
    status: String,
) {
    let mut records = world.backend.records("wind/wind_turbines/");
    records.push(wind_turbine(id, &name, power, &status));
    world.backend.seed("wind/wind_turbines/", records);
}

#[given(expr = "a mounted {word} list page")]
async fn given_mounted_page(world: &mut DashboardWorld, kind: String) {
    mount(world, parse_kind(&kind)).await;
}

#[when(expr = "the {word} list page is mounted")]
async fn when_page_mounted(world: &mut DashboardWorld, kind: String) {
    mount(world, parse_kind(&kind)).await;
}

#[when(expr = "I create a {word} asset named {string} with {float} kW")]
async fn create_asset(world: &mut DashboardWorld, _kind: String, name: String, power: f64) {
    let result = world
        .asset_page()
        .create(&AssetDraft::new(name, power))
        .await
        .map(|_| ());
    world.write_result = Some(result);
}

#[when(expr = "I change asset {int} to {string} with {float} kW")]
async fn update_asset(world: &mut DashboardWorld, id: u64, name: String, power: f64) {
    let result = world
        .asset_page()
        .update(&RecordId::from(id), &AssetDraft::new(name, power))
        .await
        .map(|_| ());
    world.write_result = Some(result);
}

#[when(expr = "I delete asset {int}")]
async fn delete_asset(world: &mut DashboardWorld, id: u64) {
    let result = world.asset_page().delete(&RecordId::from(id)).await;
    world.write_result = Some(result);
}

#[then(expr = "the page status is {string}")]
fn page_status_is(world: &mut DashboardWorld, status: String) {
    let actual = world.page_status.as_ref().expect("page not mounted");
    assert_eq!(actual.status, parse_status(&status));
}

#[then(expr = "the fallback cause mentions {string}")]
fn fallback_cause_mentions(world: &mut DashboardWorld, text: String) {
    let status = world.page_status.as_ref().expect("page not mounted");
    let cause = status.cause.as_deref().expect("no fallback cause");
    assert!(
        cause.contains(&text),
        "Expected cause to mention '{}', got '{}'",
        text,
        cause
    );
}

#[then(expr = "the list shows the {word} sample assets")]
async fn list_shows_samples(world: &mut DashboardWorld, kind: String) {
    let assets = world.asset_page().assets().await;
    assert_eq!(assets, sample_assets(parse_kind(&kind)));
}

#[then(expr = "the list contains {int} asset(s)")]
async fn list_contains(world: &mut DashboardWorld, count: usize) {
    assert_eq!(world.asset_page().len().await, count);
}

#[then(expr = "asset {int} is named {string} with {float} kW")]
async fn asset_is(world: &mut DashboardWorld, id: u64, name: String, power: f64) {
    let asset = world
        .asset_page()
        .get(&RecordId::from(id))
        .await
        .unwrap_or_else(|| panic!("asset {} not in list", id));
    assert_eq!(asset.name, name);
    assert_eq!(asset.rated_power_kw, power);
}

#[then(expr = "the list contains an asset named {string} with {float} kW")]
async fn list_contains_named(world: &mut DashboardWorld, name: String, power: f64) {
    let assets = world.asset_page().assets().await;
    let found = assets
        .iter()
        .find(|a| a.name == name)
        .unwrap_or_else(|| panic!("no asset named '{}'", name));
    assert_eq!(found.rated_power_kw, power);
    assert!(!found.id.as_str().is_empty());
}

#[then(expr = "the list has no asset with id {int}")]
async fn list_has_no_id(world: &mut DashboardWorld, id: u64) {
    assert!(world.asset_page().get(&RecordId::from(id)).await.is_none());
}

#[then(expr = "the total active power is {float} kW")]
async fn total_active_power(world: &mut DashboardWorld, power: f64) {
    assert_eq!(world.asset_page().total_active_power_kw().await, power);
}

#[then("the write succeeds")]
fn write_succeeds(world: &mut DashboardWorld) {
    let result = world.write_result.as_ref().expect("no write attempted");
    assert!(result.is_ok(), "write failed: {:?}", result);
}

#[then("the write fails with a network error")]
fn write_fails_network(world: &mut DashboardWorld) {
    match world.write_result.as_ref().expect("no write attempted") {
        Err(e) => assert!(e.is_network_failure(), "unexpected error: {:?}", e),
        Ok(()) => panic!("write unexpectedly succeeded"),
    }
}

#[then("the write fails because the asset is unknown")]
fn write_fails_not_found(world: &mut DashboardWorld) {
    let result = world.write_result.as_ref().expect("no write attempted");
    assert!(
        matches!(result, Err(DashboardError::NotFound(_))),
        "expected NotFound, got {:?}",
        result
    );
}

#[then("the write fails validation")]
fn write_fails_validation(world: &mut DashboardWorld) {
    let result = world.write_result.as_ref().expect("no write attempted");
    assert!(
        matches!(result, Err(DashboardError::Validation(_))),
        "expected Validation, got {:?}",
        result
    );
}

#[then("the write is refused because the page shows sample data")]
fn write_refused_unsynced(world: &mut DashboardWorld) {
    let result = world.write_result.as_ref().expect("no write attempted");
    assert!(
        matches!(result, Err(DashboardError::Unsynced(_))),
        "expected Unsynced, got {:?}",
        result
    );
}

#[then(expr = "the backend holds {int} record(s) at {string}")]
fn backend_holds(world: &mut DashboardWorld, count: usize, path: String) {
    assert_eq!(world.backend.records(&path).len(), count);
}

#[then(expr = "the backend received {int} {word} request(s)")]
fn backend_received(world: &mut DashboardWorld, count: usize, method: String) {
    assert_eq!(
        world.backend.count(&method),
        count,
        "requests: {:?}",
        world.backend.requests()
    );
}
