//! Driving port for merchandise mutations.
//!
//! HTTP handlers call this port once the request has been authorised and the
//! payload validated. Implementations own image storage and persistence, and
//! undo uploaded images when the write fails.

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    Error, ImageFolder, ImageUpload, MerchandiseDraft, MerchandiseId, MerchandiseItem,
    MerchandisePatch,
};

use super::{FixtureImageStore, ImageStore};

/// Domain use-case port for creating, revising and deleting merchandise.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MerchandiseCommand: Send + Sync {
    /// Store `images` and create a new item from `draft`.
    async fn create(
        &self,
        draft: MerchandiseDraft,
        images: Vec<ImageUpload>,
    ) -> Result<MerchandiseItem, Error>;

    /// Apply `patch`. A non-empty `images` list replaces the stored images.
    ///
    /// # Errors
    ///
    /// Returns `not_found` when no item has `id`.
    async fn update(
        &self,
        id: MerchandiseId,
        patch: MerchandisePatch,
        images: Vec<ImageUpload>,
    ) -> Result<MerchandiseItem, Error>;

    /// Delete an item and its images.
    ///
    /// # Errors
    ///
    /// Returns `not_found` when no item has `id`.
    async fn delete(&self, id: MerchandiseId) -> Result<(), Error>;
}

/// Fixture command that echoes its input without persisting anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMerchandiseCommand;

#[async_trait]
impl MerchandiseCommand for FixtureMerchandiseCommand {
    async fn create(
        &self,
        draft: MerchandiseDraft,
        images: Vec<ImageUpload>,
    ) -> Result<MerchandiseItem, Error> {
        let mut stored = Vec::with_capacity(images.len());
        for upload in &images {
            let image = FixtureImageStore
                .store(ImageFolder::Merchandise, upload)
                .await
                .map_err(|err| Error::internal(format!("fixture image store failed: {err}")))?;
            stored.push(image);
        }
        Ok(draft.into_item(MerchandiseId::random(), stored, Utc::now()))
    }

    async fn update(
        &self,
        id: MerchandiseId,
        _patch: MerchandisePatch,
        _images: Vec<ImageUpload>,
    ) -> Result<MerchandiseItem, Error> {
        Err(Error::not_found(format!("merchandise item {id} not found")))
    }

    async fn delete(&self, id: MerchandiseId) -> Result<(), Error> {
        Err(Error::not_found(format!("merchandise item {id} not found")))
    }
}
