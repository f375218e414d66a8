//! Solar site configuration page

use std::sync::atomic::AtomicBool;

use tokio::sync::RwLock;

use super::{PageStatus, WriteGuard};
use crate::api::ApiClient;
use crate::error::{DashboardError, Result};
use crate::fallback::fetch_or_fallback;
use crate::model::{RecordId, SiteConfig, SiteDraft};
use crate::samples;
use crate::store::Collection;
use crate::validation::site_rules;

/// Site configurations with create and delete, same write rules as the asset lists
#[derive(Debug)]
pub struct SiteListPage {
    api: ApiClient,
    sites: RwLock<Collection<SiteConfig>>,
    status: RwLock<PageStatus>,
    writing: AtomicBool,
}

impl SiteListPage {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            sites: RwLock::new(Collection::new()),
            status: RwLock::new(PageStatus::loading()),
            writing: AtomicBool::new(false),
        }
    }

    pub async fn mount(&self) -> PageStatus {
        *self.status.write().await = PageStatus::loading();

        let state = fetch_or_fallback(
            "site configurations",
            self.api.list_sites(),
            samples::sample_sites,
        )
        .await;
        let status = PageStatus::of(&state);
        if let Some(items) = state.into_data() {
            tracing::debug!("Loaded {} site configurations", items.len());
            self.sites.write().await.replace_all(items);
        }
        *self.status.write().await = status.clone();
        status
    }

    pub async fn status(&self) -> PageStatus {
        self.status.read().await.clone()
    }

    pub async fn sites(&self) -> Vec<SiteConfig> {
        self.sites.read().await.items().to_vec()
    }

    pub async fn len(&self) -> usize {
        self.sites.read().await.len()
    }

    pub async fn create(&self, draft: &SiteDraft) -> Result<SiteConfig> {
        site_rules().validate(draft).into_result()?;
        self.status
            .read()
            .await
            .ensure_synced("create site configuration")?;
        let _guard = WriteGuard::acquire(&self.writing, "create")?;

        let created = self.api.create_site(draft).await.inspect_err(|e| {
            tracing::warn!("Failed to create site configuration: {}", e);
        })?;
        tracing::info!("Created site configuration {} '{}'", created.id, created.name);
        self.sites.write().await.append(created.clone());
        Ok(created)
    }

    pub async fn delete(&self, id: &RecordId) -> Result<()> {
        self.status
            .read()
            .await
            .ensure_synced("delete site configuration")?;
        let _guard = WriteGuard::acquire(&self.writing, "delete")?;
        if !self.sites.read().await.contains(id) {
            return Err(DashboardError::NotFound(format!("site configuration {}", id)));
        }

        self.api.delete_site(id).await.inspect_err(|e| {
            tracing::warn!("Failed to delete site configuration {}: {}", id, e);
        })?;
        self.sites.write().await.remove_by_id(id);
        tracing::info!("Deleted site configuration {}", id);
        Ok(())
    }
}
