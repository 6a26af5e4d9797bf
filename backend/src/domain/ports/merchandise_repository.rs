//! Driven port for merchandise persistence.

use async_trait::async_trait;

use crate::domain::{MerchandiseFilter, MerchandiseId, MerchandiseItem};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by merchandise repository adapters.
    pub enum MerchandisePersistenceError {
        /// Store could not be reached.
        Connection { message: String } => "merchandise repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "merchandise repository query failed: {message}",
    }
}

/// Storage for merchandise items.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MerchandiseRepository: Send + Sync {
    /// Items passing `filter`, newest first.
    async fn list(
        &self,
        filter: &MerchandiseFilter,
    ) -> Result<Vec<MerchandiseItem>, MerchandisePersistenceError>;

    /// Fetch one item.
    async fn find_by_id(
        &self,
        id: &MerchandiseId,
    ) -> Result<Option<MerchandiseItem>, MerchandisePersistenceError>;

    /// Insert or overwrite an item.
    async fn save(&self, item: &MerchandiseItem) -> Result<(), MerchandisePersistenceError>;

    /// Overwrite a stored item. Returns `false` when it no longer exists, in
    /// which case nothing is written.
    async fn replace(&self, item: &MerchandiseItem) -> Result<bool, MerchandisePersistenceError>;

    /// Remove an item. Returns `false` when it did not exist.
    async fn delete(&self, id: &MerchandiseId) -> Result<bool, MerchandisePersistenceError>;
}
