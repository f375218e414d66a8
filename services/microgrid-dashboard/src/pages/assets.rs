//! Solar system and wind turbine list pages

use std::sync::atomic::AtomicBool;

use tokio::sync::{watch, RwLock};

use super::{PageStatus, WriteGuard};
use crate::api::ApiClient;
use crate::error::{DashboardError, Result};
use crate::fallback::fetch_or_fallback;
use crate::model::{round2, Asset, AssetDraft, AssetKind, RecordId};
use crate::samples;
use crate::store::Collection;
use crate::validation::asset_rules;

/// List page for one asset kind with create, update and delete
///
/// The local collection changes only after the backend accepted a write. One
/// write may be in flight at a time; a second one fails with
/// [`DashboardError::Busy`] without sending anything. While the page shows
/// sample assets every write fails with [`DashboardError::Unsynced`].
#[derive(Debug)]
pub struct AssetListPage {
    kind: AssetKind,
    api: ApiClient,
    assets: RwLock<Collection<Asset>>,
    status: RwLock<PageStatus>,
    writing: AtomicBool,
}

impl AssetListPage {
    pub fn new(kind: AssetKind, api: ApiClient) -> Self {
        Self {
            kind,
            api,
            assets: RwLock::new(Collection::new()),
            status: RwLock::new(PageStatus::loading()),
            writing: AtomicBool::new(false),
        }
    }

    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    /// Fetch the list, or show the sample assets when that fails.
    pub async fn mount(&self) -> PageStatus {
        *self.status.write().await = PageStatus::loading();

        let kind = self.kind;
        let state = fetch_or_fallback(
            kind.label(),
            self.api.list_assets(kind),
            || samples::sample_assets(kind),
        )
        .await;
        let status = PageStatus::of(&state);

        if let Some(items) = state.into_data() {
            tracing::debug!("Loaded {} {} records", items.len(), kind);
            self.assets.write().await.replace_all(items);
        }
        *self.status.write().await = status.clone();
        status
    }

    pub async fn status(&self) -> PageStatus {
        self.status.read().await.clone()
    }

    pub async fn assets(&self) -> Vec<Asset> {
        self.assets.read().await.items().to_vec()
    }

    pub async fn get(&self, id: &RecordId) -> Option<Asset> {
        self.assets.read().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.assets.read().await.len()
    }

    pub async fn subscribe(&self) -> watch::Receiver<u64> {
        self.assets.read().await.subscribe()
    }

    /// Sum of rated power over active assets, in kW
    pub async fn total_active_power_kw(&self) -> f64 {
        let assets = self.assets.read().await;
        round2(
            assets
                .items()
                .iter()
                .filter(|a| a.is_active())
                .map(|a| a.rated_power_kw)
                .sum(),
        )
    }

    /// Validate, send, then append the record the backend returned.
    pub async fn create(&self, draft: &AssetDraft) -> Result<Asset> {
        asset_rules().validate(draft).into_result()?;
        self.ensure_synced("create").await?;
        let _guard = WriteGuard::acquire(&self.writing, "create")?;

        let created = self
            .api
            .create_asset(self.kind, draft)
            .await
            .inspect_err(|e| {
                tracing::warn!("Failed to create {}: {}", self.kind.label(), e);
            })?;

        tracing::info!(
            "Created {} {} '{}'",
            self.kind.label(),
            created.id,
            created.name
        );
        self.assets.write().await.append(created.clone());
        Ok(created)
    }

    /// Validate, send, then replace the matching entity with the returned record.
    pub async fn update(&self, id: &RecordId, draft: &AssetDraft) -> Result<Asset> {
        asset_rules().validate(draft).into_result()?;
        self.ensure_synced("update").await?;
        let _guard = WriteGuard::acquire(&self.writing, "update")?;
        self.ensure_known(id).await?;

        let updated = self
            .api
            .update_asset(self.kind, id, draft)
            .await
            .inspect_err(|e| {
                tracing::warn!("Failed to update {} {}: {}", self.kind.label(), id, e);
            })?;

        if !self.assets.write().await.update_by_id(id, updated.clone()) {
            return Err(self.not_found(id));
        }
        tracing::info!("Updated {} {}", self.kind.label(), id);
        Ok(updated)
    }

    /// Send the delete, then drop the entity locally.
    pub async fn delete(&self, id: &RecordId) -> Result<()> {
        self.ensure_synced("delete").await?;
        let _guard = WriteGuard::acquire(&self.writing, "delete")?;
        self.ensure_known(id).await?;

        self.api
            .delete_asset(self.kind, id)
            .await
            .inspect_err(|e| {
                tracing::warn!("Failed to delete {} {}: {}", self.kind.label(), id, e);
            })?;

        self.assets.write().await.remove_by_id(id);
        tracing::info!("Deleted {} {}", self.kind.label(), id);
        Ok(())
    }

    async fn ensure_synced(&self, action: &str) -> Result<()> {
        self.status
            .read()
            .await
            .ensure_synced(&format!("{} {}", action, self.kind.label()))
    }

    async fn ensure_known(&self, id: &RecordId) -> Result<()> {
        if self.assets.read().await.contains(id) {
            Ok(())
        } else {
            Err(self.not_found(id))
        }
    }

    fn not_found(&self, id: &RecordId) -> DashboardError {
        DashboardError::NotFound(format!("{} {}", self.kind.label(), id))
    }
}
