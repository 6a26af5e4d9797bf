//! Driven port for image hosting.
//!
//! Adapters persist uploaded bytes and hand back an [`ImageRef`] whose
//! `imagePublicId` is later used to delete the object.

use async_trait::async_trait;

use crate::domain::{ImageFolder, ImageRef, ImageUpload};

use super::define_port_error;

define_port_error! {
    /// Errors raised by image store adapters.
    pub enum ImageStoreError {
        /// The store refused the upload.
        Rejected { message: String } => "image rejected: {message}",
        /// The backing storage could not be written or read.
        Io { message: String } => "image storage failed: {message}",
    }
}

/// Upload and delete images.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist `upload` under `folder`.
    async fn store(
        &self,
        folder: ImageFolder,
        upload: &ImageUpload,
    ) -> Result<ImageRef, ImageStoreError>;

    /// Delete a stored image. Missing objects are not an error.
    async fn remove(&self, public_id: &str) -> Result<(), ImageStoreError>;
}

/// Image store that accepts everything and keeps nothing.
///
/// Returned references point at `memory://` URLs, which is enough for handler
/// tests that never dereference them.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureImageStore;

#[async_trait]
impl ImageStore for FixtureImageStore {
    async fn store(
        &self,
        folder: ImageFolder,
        upload: &ImageUpload,
    ) -> Result<ImageRef, ImageStoreError> {
        let public_id = format!(
            "{}/{}.{}",
            folder.as_str(),
            uuid::Uuid::new_v4(),
            upload.extension()
        );
        Ok(ImageRef::new(format!("memory://{public_id}"), public_id))
    }

    async fn remove(&self, _public_id: &str) -> Result<(), ImageStoreError> {
        Ok(())
    }
}
