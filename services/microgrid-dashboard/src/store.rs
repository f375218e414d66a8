//! In-memory collection of one entity type
//!
//! The collection is a cache of server state. It is only mutated after the
//! corresponding remote call has succeeded, and every effective mutation bumps a
//! revision counter that observers watch.

use tokio::sync::watch;

use crate::model::{Asset, LogRow, RecordId, SiteConfig};

/// Entities addressable by their backend id
pub trait Keyed {
    fn key(&self) -> &RecordId;
}

impl Keyed for Asset {
    fn key(&self) -> &RecordId {
        &self.id
    }
}

impl Keyed for LogRow {
    fn key(&self) -> &RecordId {
        &self.id
    }
}

impl Keyed for SiteConfig {
    fn key(&self) -> &RecordId {
        &self.id
    }
}

/// Ordered entities plus a change notifier
#[derive(Debug)]
pub struct Collection<T> {
    items: Vec<T>,
    revision: watch::Sender<u64>,
}

impl<T: Keyed> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Keyed> Collection<T> {
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            items: Vec::new(),
            revision,
        }
    }

    /// Overwrite everything, used after a fetch.
    pub fn replace_all(&mut self, items: Vec<T>) {
        self.items = items;
        self.bump();
    }

    /// Add one entity after a successful create. Ids are trusted, not de-duplicated.
    pub fn append(&mut self, item: T) {
        self.items.push(item);
        self.bump();
    }

    /// Replace the entity with this id in place. Returns false, and changes
    /// nothing, when no such entity is held.
    pub fn update_by_id(&mut self, id: &RecordId, item: T) -> bool {
        match self.items.iter_mut().find(|existing| existing.key() == id) {
            Some(slot) => {
                *slot = item;
                self.bump();
                true
            }
            None => false,
        }
    }

    /// Drop every entity with this id. Returns whether anything was removed.
    pub fn remove_by_id(&mut self, id: &RecordId) -> bool {
        let before = self.items.len();
        self.items.retain(|existing| existing.key() != id);
        let removed = self.items.len() != before;
        if removed {
            self.bump();
        }
        removed
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, id: &RecordId) -> Option<&T> {
        self.items.iter().find(|item| item.key() == id)
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Receiver that sees the revision change on every effective mutation.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }
}
