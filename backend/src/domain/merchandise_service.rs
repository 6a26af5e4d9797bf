//! Merchandise domain service.
//!
//! Implements the merchandise driving ports on top of a repository and an
//! image store. A mutation either completes fully or leaves no new images
//! behind: uploads made before a failed write are removed again.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    ImageStore, ImageStoreError, MerchandiseCommand, MerchandisePersistenceError,
    MerchandiseQuery, MerchandiseRepository,
};
use crate::domain::{
    Error, ImageFolder, ImageRef, ImageUpload, MerchandiseDraft, MerchandiseFilter, MerchandiseId,
    MerchandiseItem, MerchandisePatch,
};

/// Merchandise service implementing [`MerchandiseCommand`] and
/// [`MerchandiseQuery`].
#[derive(Clone)]
pub struct MerchandiseService<R, S> {
    repo: Arc<R>,
    images: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<R, S> MerchandiseService<R, S> {
    /// Create a new service.
    pub fn new(repo: Arc<R>, images: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repo,
            images,
            clock,
        }
    }
}

pub(crate) fn map_persistence_error(error: MerchandisePersistenceError) -> Error {
    match error {
        MerchandisePersistenceError::Connection { message } => {
            Error::service_unavailable(format!("merchandise repository unavailable: {message}"))
        }
        MerchandisePersistenceError::Query { message } => {
            Error::internal(format!("merchandise repository error: {message}"))
        }
    }
}

pub(crate) fn map_image_error(error: ImageStoreError) -> Error {
    match error {
        ImageStoreError::Rejected { message } => {
            Error::invalid_request(format!("image rejected: {message}"))
        }
        ImageStoreError::Io { message } => {
            Error::service_unavailable(format!("image storage unavailable: {message}"))
        }
    }
}

/// Store every upload, removing the ones already stored if any fails.
pub(crate) async fn store_all<S: ImageStore + ?Sized>(
    store: &S,
    folder: ImageFolder,
    uploads: &[ImageUpload],
) -> Result<Vec<ImageRef>, Error> {
    let mut stored = Vec::with_capacity(uploads.len());
    for upload in uploads {
        match store.store(folder, upload).await {
            Ok(image) => stored.push(image),
            Err(error) => {
                discard(store, &stored).await;
                return Err(map_image_error(error));
            }
        }
    }
    Ok(stored)
}

/// Remove images, logging failures instead of surfacing them.
pub(crate) async fn discard<S: ImageStore + ?Sized>(store: &S, images: &[ImageRef]) {
    for image in images {
        if let Err(error) = store.remove(image.public_id()).await {
            warn!(public_id = image.public_id(), %error, "failed to remove orphaned image");
        }
    }
}

fn not_found(id: MerchandiseId) -> Error {
    Error::not_found(format!("merchandise item {id} not found"))
}

impl<R, S> MerchandiseService<R, S>
where
    R: MerchandiseRepository,
    S: ImageStore,
{
    async fn load(&self, id: MerchandiseId) -> Result<MerchandiseItem, Error> {
        self.repo
            .find_by_id(&id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| not_found(id))
    }
}

#[async_trait]
impl<R, S> MerchandiseCommand for MerchandiseService<R, S>
where
    R: MerchandiseRepository,
    S: ImageStore,
{
    async fn create(
        &self,
        draft: MerchandiseDraft,
        images: Vec<ImageUpload>,
    ) -> Result<MerchandiseItem, Error> {
        let stored = store_all(self.images.as_ref(), ImageFolder::Merchandise, &images).await?;
        let item = draft.into_item(MerchandiseId::random(), stored, self.clock.utc());

        if let Err(error) = self.repo.save(&item).await {
            discard(self.images.as_ref(), item.images()).await;
            return Err(map_persistence_error(error));
        }
        info!(id = %item.id(), images = item.images().len(), "merchandise item created");
        Ok(item)
    }

    async fn update(
        &self,
        id: MerchandiseId,
        patch: MerchandisePatch,
        images: Vec<ImageUpload>,
    ) -> Result<MerchandiseItem, Error> {
        let mut item = self.load(id).await?;
        item.apply(patch, self.clock.utc());

        let previous = if images.is_empty() {
            Vec::new()
        } else {
            let stored =
                store_all(self.images.as_ref(), ImageFolder::Merchandise, &images).await?;
            item.replace_images(stored)
        };

        let written = self.repo.replace(&item).await;
        if !matches!(written, Ok(true)) && !images.is_empty() {
            discard(self.images.as_ref(), item.images()).await;
        }
        if !written.map_err(map_persistence_error)? {
            return Err(not_found(id));
        }
        discard(self.images.as_ref(), &previous).await;
        info!(%id, replaced_images = !images.is_empty(), "merchandise item updated");
        Ok(item)
    }

    async fn delete(&self, id: MerchandiseId) -> Result<(), Error> {
        let item = self.load(id).await?;
        let removed = self
            .repo
            .delete(&id)
            .await
            .map_err(map_persistence_error)?;
        if !removed {
            return Err(not_found(id));
        }
        discard(self.images.as_ref(), item.images()).await;
        info!(%id, "merchandise item deleted");
        Ok(())
    }
}

#[async_trait]
impl<R, S> MerchandiseQuery for MerchandiseService<R, S>
where
    R: MerchandiseRepository,
    S: ImageStore,
{
    async fn list(&self, filter: &MerchandiseFilter) -> Result<Vec<MerchandiseItem>, Error> {
        self.repo.list(filter).await.map_err(map_persistence_error)
    }
}
