//! JSON view server
//!
//! Exposes every page as already-shaped JSON so a front-end only has to render.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::api::ApiClient;
use crate::config::Config;
use crate::error::{DashboardError, Result};
use crate::model::{Asset, AssetDraft, AssetKind, RecordId, SiteConfig, SiteDraft};
use crate::pages::{
    load_detail, AssetDetailView, AssetListPage, LogPage, OverviewPage, PageStatus,
    SiteListPage,
};
use crate::settings::{MicrogridSettings, SettingsStore};
use crate::validation::FieldErrors;

/// Every page the server can show, shared across requests
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    pub api: ApiClient,
    pub solar: AssetListPage,
    pub wind: AssetListPage,
    pub sites: SiteListPage,
    pub logs: RwLock<LogPage>,
    pub settings: RwLock<SettingsStore>,
    pub overview: RwLock<Option<OverviewPage>>,
}

pub type AppHandle = Arc<AppState>;

impl AppState {
    pub fn new(config: Config, api: ApiClient, settings: SettingsStore) -> Self {
        Self {
            solar: AssetListPage::new(AssetKind::Solar, api.clone()),
            wind: AssetListPage::new(AssetKind::Wind, api.clone()),
            sites: SiteListPage::new(api.clone()),
            logs: RwLock::new(LogPage::new(api.clone(), config.pages.rows_per_page)),
            settings: RwLock::new(settings),
            overview: RwLock::new(None),
            config,
            api,
        }
    }

    pub fn assets(&self, kind: AssetKind) -> &AssetListPage {
        match kind {
            AssetKind::Solar => &self.solar,
            AssetKind::Wind => &self.wind,
        }
    }

    /// Mount all pages concurrently. Read failures already fell back, so this cannot fail.
    pub async fn mount(&self) {
        let (_, _, _, _, overview) = tokio::join!(
            self.solar.mount(),
            self.wind.mount(),
            self.sites.mount(),
            async { self.logs.write().await.mount().await },
            OverviewPage::mount(&self.api, &self.config),
        );
        if let Some(previous) = self.overview.write().await.replace(overview) {
            previous.teardown().await;
        }
    }

    /// Stop the overview ticker.
    pub async fn teardown(&self) {
        let overview = self.overview.write().await.take();
        if let Some(overview) = overview {
            overview.teardown().await;
        }
    }
}

/// Build the view server router
pub fn build_router(state: AppHandle) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/overview", get(overview_handler))
        .route("/api/logs", get(logs_handler))
        .route("/api/logs/refresh", post(logs_refresh_handler))
        .route(
            "/api/settings",
            get(settings_handler).put(settings_update_handler),
        )
        .route("/api/sites", get(sites_handler).post(site_create_handler))
        .route("/api/sites/{id}", delete(site_delete_handler))
        .route(
            "/api/{kind}",
            get(assets_handler).post(asset_create_handler),
        )
        .route(
            "/api/{kind}/{id}",
            get(asset_detail_handler)
                .put(asset_update_handler)
                .delete(asset_delete_handler),
        )
        .with_state(state)
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = match &self {
            DashboardError::Validation(errors) => {
                let body = serde_json::json!({ "errors": errors });
                return (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response();
            }
            DashboardError::Busy(_) | DashboardError::Unsynced(_) => StatusCode::CONFLICT,
            DashboardError::NotFound(_) => StatusCode::NOT_FOUND,
            e if e.is_network_failure() => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}

fn parse_kind(raw: &str) -> Result<AssetKind> {
    raw.parse().map_err(DashboardError::NotFound)
}

/// Unreadable request bodies are reported like any other form error.
fn form_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            tracing::debug!("Rejected request body: {}", rejection.body_text());
            let mut errors = FieldErrors::new();
            errors.insert("body", rejection.body_text());
            Err(DashboardError::Validation(errors))
        }
    }
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}

async fn overview_handler(State(app): State<AppHandle>) -> Response {
    match app.overview.read().await.as_ref() {
        Some(page) => Json(page.view()).into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "overview not mounted").into_response(),
    }
}

#[derive(Debug, Serialize)]
struct AssetListView {
    kind: AssetKind,
    status: PageStatus,
    total_active_power_kw: f64,
    assets: Vec<Asset>,
}

async fn assets_handler(
    State(app): State<AppHandle>,
    Path(kind): Path<String>,
) -> Result<Json<AssetListView>> {
    let kind = parse_kind(&kind)?;
    let page = app.assets(kind);
    Ok(Json(AssetListView {
        kind,
        status: page.status().await,
        total_active_power_kw: page.total_active_power_kw().await,
        assets: page.assets().await,
    }))
}

async fn asset_create_handler(
    State(app): State<AppHandle>,
    Path(kind): Path<String>,
    payload: std::result::Result<Json<AssetDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Asset>)> {
    let kind = parse_kind(&kind)?;
    let draft = form_body(payload)?;
    let created = app.assets(kind).create(&draft).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn asset_detail_handler(
    State(app): State<AppHandle>,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Json<AssetDetailView>> {
    let kind = parse_kind(&kind)?;
    let view = load_detail(&app.api, &app.config.pages, kind, &RecordId::from(id)).await;
    Ok(Json(view))
}

async fn asset_update_handler(
    State(app): State<AppHandle>,
    Path((kind, id)): Path<(String, String)>,
    payload: std::result::Result<Json<AssetDraft>, JsonRejection>,
) -> Result<Json<Asset>> {
    let kind = parse_kind(&kind)?;
    let draft = form_body(payload)?;
    let updated = app
        .assets(kind)
        .update(&RecordId::from(id), &draft)
        .await?;
    Ok(Json(updated))
}

async fn asset_delete_handler(
    State(app): State<AppHandle>,
    Path((kind, id)): Path<(String, String)>,
) -> Result<StatusCode> {
    let kind = parse_kind(&kind)?;
    app.assets(kind).delete(&RecordId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
struct SiteListView {
    status: PageStatus,
    sites: Vec<SiteConfig>,
}

async fn sites_handler(State(app): State<AppHandle>) -> Json<SiteListView> {
    Json(SiteListView {
        status: app.sites.status().await,
        sites: app.sites.sites().await,
    })
}

async fn site_create_handler(
    State(app): State<AppHandle>,
    payload: std::result::Result<Json<SiteDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<SiteConfig>)> {
    let draft = form_body(payload)?;
    let created = app.sites.create(&draft).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn site_delete_handler(
    State(app): State<AppHandle>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    app.sites.delete(&RecordId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    page: Option<usize>,
}

async fn logs_handler(
    State(app): State<AppHandle>,
    Query(query): Query<PageQuery>,
) -> impl IntoResponse {
    let mut logs = app.logs.write().await;
    if let Some(page) = query.page {
        logs.set_page(page);
    }
    Json(logs.view())
}

async fn logs_refresh_handler(State(app): State<AppHandle>) -> impl IntoResponse {
    let mut logs = app.logs.write().await;
    logs.mount().await;
    Json(logs.view())
}

async fn settings_handler(State(app): State<AppHandle>) -> Json<MicrogridSettings> {
    Json(app.settings.read().await.current().clone())
}

async fn settings_update_handler(
    State(app): State<AppHandle>,
    payload: std::result::Result<Json<MicrogridSettings>, JsonRejection>,
) -> Result<Json<MicrogridSettings>> {
    let settings = form_body(payload)?;
    let mut store = app.settings.write().await;
    store.update(settings)?;
    tracing::info!("Settings updated");
    Ok(Json(store.current().clone()))
}
