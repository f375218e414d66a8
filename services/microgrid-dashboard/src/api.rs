//! Typed REST client for the microgrid backend

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::endpoints::Endpoint;
use crate::error::{DashboardError, Result};
use crate::io::{HttpClient, HttpResponse};
use crate::model::asset::{SolarSystemRecord, WindTurbineRecord};
use crate::model::forecast::{SolarForecastRecord, WindForecastRecord};
use crate::model::measurement::{SolarDataRecord, WindDataRecord};
use crate::model::panel::SolarPanelRecord;
use crate::model::site::SiteConfigRecord;
use crate::model::{
    Asset, AssetDraft, AssetKind, Forecast, LogRow, Measurement, RecordId, SiteConfig, SiteDraft,
    SolarPanel,
};

/// One request, one response; no retries
#[derive(Clone)]
pub struct ApiClient {
    http: Arc<dyn HttpClient>,
    base_url: String,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ApiClient {
    pub fn new(http: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<T> {
        let url = endpoint.url(&self.base_url);
        let response = self.http.get(&url, &endpoint.query_pairs()).await?;
        let response = check("GET", &url, response)?;
        Ok(serde_json::from_str(&response.body)?)
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        body: &serde_json::Value,
    ) -> Result<T> {
        let url = endpoint.url(&self.base_url);
        let response = self.http.post_json(&url, body).await?;
        let response = check("POST", &url, response)?;
        Ok(serde_json::from_str(&response.body)?)
    }

    pub async fn put<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        body: &serde_json::Value,
    ) -> Result<T> {
        let url = endpoint.url(&self.base_url);
        let response = self.http.put_json(&url, body).await?;
        let response = check("PUT", &url, response)?;
        Ok(serde_json::from_str(&response.body)?)
    }

    /// The response body, if any, is ignored.
    pub async fn delete(&self, endpoint: &Endpoint) -> Result<()> {
        let url = endpoint.url(&self.base_url);
        let response = self.http.delete(&url).await?;
        check("DELETE", &url, response)?;
        Ok(())
    }
}

fn check(method: &'static str, url: &str, response: HttpResponse) -> Result<HttpResponse> {
    if response.is_success() {
        return Ok(response);
    }
    tracing::debug!("{} {} returned {}", method, url, response.status);
    if response.status == 404 {
        return Err(DashboardError::NotFound(url.to_string()));
    }
    Err(DashboardError::Status {
        method,
        url: url.to_string(),
        status: response.status,
        body: response.body,
    })
}

// Resource operations, each normalising the backend record on the way in
impl ApiClient {
    pub async fn list_assets(&self, kind: AssetKind) -> Result<Vec<Asset>> {
        let endpoint = Endpoint::assets(kind);
        Ok(match kind {
            AssetKind::Solar => self
                .get::<Vec<SolarSystemRecord>>(&endpoint)
                .await?
                .into_iter()
                .map(Asset::from)
                .collect(),
            AssetKind::Wind => self
                .get::<Vec<WindTurbineRecord>>(&endpoint)
                .await?
                .into_iter()
                .map(Asset::from)
                .collect(),
        })
    }

    pub async fn get_asset(&self, kind: AssetKind, id: &RecordId) -> Result<Asset> {
        let endpoint = Endpoint::asset(kind, id);
        Ok(match kind {
            AssetKind::Solar => self.get::<SolarSystemRecord>(&endpoint).await?.into(),
            AssetKind::Wind => self.get::<WindTurbineRecord>(&endpoint).await?.into(),
        })
    }

    /// Returns the stored record, carrying the id the backend assigned.
    pub async fn create_asset(&self, kind: AssetKind, draft: &AssetDraft) -> Result<Asset> {
        let endpoint = Endpoint::assets(kind);
        let body = draft.to_wire(kind);
        Ok(match kind {
            AssetKind::Solar => self.post::<SolarSystemRecord>(&endpoint, &body).await?.into(),
            AssetKind::Wind => self.post::<WindTurbineRecord>(&endpoint, &body).await?.into(),
        })
    }

    pub async fn update_asset(
        &self,
        kind: AssetKind,
        id: &RecordId,
        draft: &AssetDraft,
    ) -> Result<Asset> {
        let endpoint = Endpoint::asset(kind, id);
        let body = draft.to_wire(kind);
        Ok(match kind {
            AssetKind::Solar => self.put::<SolarSystemRecord>(&endpoint, &body).await?.into(),
            AssetKind::Wind => self.put::<WindTurbineRecord>(&endpoint, &body).await?.into(),
        })
    }

    pub async fn delete_asset(&self, kind: AssetKind, id: &RecordId) -> Result<()> {
        self.delete(&Endpoint::asset(kind, id)).await
    }

    pub async fn measurements(
        &self,
        kind: AssetKind,
        id: &RecordId,
        limit: usize,
    ) -> Result<Vec<Measurement>> {
        self.fetch_measurements(kind, &Endpoint::measurements(kind, id, limit))
            .await
    }

    pub async fn recent_measurements(
        &self,
        kind: AssetKind,
        limit: usize,
    ) -> Result<Vec<Measurement>> {
        self.fetch_measurements(kind, &Endpoint::recent_measurements(kind, limit))
            .await
    }

    async fn fetch_measurements(
        &self,
        kind: AssetKind,
        endpoint: &Endpoint,
    ) -> Result<Vec<Measurement>> {
        Ok(match kind {
            AssetKind::Solar => self
                .get::<Vec<SolarDataRecord>>(endpoint)
                .await?
                .into_iter()
                .map(Measurement::from)
                .collect(),
            AssetKind::Wind => self
                .get::<Vec<WindDataRecord>>(endpoint)
                .await?
                .into_iter()
                .map(Measurement::from)
                .collect(),
        })
    }

    /// Records without any target time are dropped; order is as received.
    pub async fn forecasts(&self, kind: AssetKind, id: &RecordId) -> Result<Vec<Forecast>> {
        let endpoint = Endpoint::forecasts(kind, id);
        Ok(match kind {
            AssetKind::Solar => self
                .get::<Vec<SolarForecastRecord>>(&endpoint)
                .await?
                .into_iter()
                .filter_map(SolarForecastRecord::into_forecast)
                .collect(),
            AssetKind::Wind => self
                .get::<Vec<WindForecastRecord>>(&endpoint)
                .await?
                .into_iter()
                .filter_map(WindForecastRecord::into_forecast)
                .collect(),
        })
    }

    pub async fn panels(&self, system_id: &RecordId) -> Result<Vec<SolarPanel>> {
        Ok(self
            .get::<Vec<SolarPanelRecord>>(&Endpoint::panels(system_id))
            .await?
            .into_iter()
            .map(SolarPanel::from)
            .collect())
    }

    pub async fn list_sites(&self) -> Result<Vec<SiteConfig>> {
        Ok(self
            .get::<Vec<SiteConfigRecord>>(&Endpoint::sites())
            .await?
            .into_iter()
            .map(SiteConfig::from)
            .collect())
    }

    pub async fn create_site(&self, draft: &SiteDraft) -> Result<SiteConfig> {
        let record: SiteConfigRecord = self.post(&Endpoint::sites(), &draft.to_wire()).await?;
        Ok(record.into())
    }

    pub async fn delete_site(&self, id: &RecordId) -> Result<()> {
        self.delete(&Endpoint::site(id)).await
    }

    pub async fn logs(&self) -> Result<Vec<LogRow>> {
        self.get(&Endpoint::logs()).await
    }
}
