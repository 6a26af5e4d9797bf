//! In-memory `MerchandiseRepository` adapter.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{MerchandisePersistenceError, MerchandiseRepository};
use crate::domain::{MerchandiseFilter, MerchandiseId, MerchandiseItem};

/// Merchandise store backed by a locked hash map.
///
/// Contents live for the lifetime of the process.
#[derive(Debug, Default)]
pub struct InMemoryMerchandiseRepository {
    items: RwLock<HashMap<MerchandiseId, MerchandiseItem>>,
}

impl InMemoryMerchandiseRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MerchandiseRepository for InMemoryMerchandiseRepository {
    async fn list(
        &self,
        filter: &MerchandiseFilter,
    ) -> Result<Vec<MerchandiseItem>, MerchandisePersistenceError> {
        let items = self.items.read().await;
        let mut matching: Vec<MerchandiseItem> = items
            .values()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| a.name().cmp(b.name()))
        });
        Ok(matching)
    }

    async fn find_by_id(
        &self,
        id: &MerchandiseId,
    ) -> Result<Option<MerchandiseItem>, MerchandisePersistenceError> {
        Ok(self.items.read().await.get(id).cloned())
    }

    async fn save(&self, item: &MerchandiseItem) -> Result<(), MerchandisePersistenceError> {
        self.items.write().await.insert(item.id(), item.clone());
        Ok(())
    }

    async fn replace(&self, item: &MerchandiseItem) -> Result<bool, MerchandisePersistenceError> {
        let mut items = self.items.write().await;
        match items.get_mut(&item.id()) {
            Some(stored) => {
                *stored = item.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &MerchandiseId) -> Result<bool, MerchandisePersistenceError> {
        Ok(self.items.write().await.remove(id).is_some())
    }
}
