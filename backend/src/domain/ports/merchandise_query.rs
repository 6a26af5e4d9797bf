//! Driving port for the public merchandise listing.

use async_trait::async_trait;

use crate::domain::{Error, MerchandiseFilter, MerchandiseItem};

/// Domain use-case port for reading merchandise.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MerchandiseQuery: Send + Sync {
    /// Items passing `filter`.
    async fn list(&self, filter: &MerchandiseFilter) -> Result<Vec<MerchandiseItem>, Error>;
}

/// Fixture query with an empty catalogue.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMerchandiseQuery;

#[async_trait]
impl MerchandiseQuery for FixtureMerchandiseQuery {
    async fn list(&self, _filter: &MerchandiseFilter) -> Result<Vec<MerchandiseItem>, Error> {
        Ok(Vec::new())
    }
}
