//! Filesystem `ImageStore` adapter.
//!
//! Files land in `<root>/<folder>/<uuid>.<ext>` inside a `cap_std` directory
//! handle, so public ids can never address anything outside the upload root.
//! Public URLs are the configured base URL joined with the public id; serving
//! the directory is left to whatever fronts that URL.

use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::domain::ports::{ImageStore, ImageStoreError};
use crate::domain::{ImageFolder, ImageRef, ImageUpload};

/// Errors raised while opening the upload root.
#[derive(Debug, thiserror::Error)]
pub enum LocalImageStoreError {
    #[error("failed to open upload directory {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("public base URL {url} cannot be used as a base")]
    BaseUrl { url: Url },
}

/// Image store writing into a sandboxed directory.
#[derive(Clone)]
pub struct LocalImageStore {
    root: Arc<Dir>,
    base_url: Url,
}

impl LocalImageStore {
    /// Open (creating if needed) `root` and serve files under `base_url`.
    ///
    /// A missing trailing slash on `base_url` is added so joins keep its
    /// last path segment.
    pub fn open(root: &Path, mut base_url: Url) -> Result<Self, LocalImageStoreError> {
        if base_url.cannot_be_a_base() {
            return Err(LocalImageStoreError::BaseUrl { url: base_url });
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let open_error = |source| LocalImageStoreError::Open {
            path: root.to_path_buf(),
            source,
        };
        Dir::create_ambient_dir_all(root, ambient_authority()).map_err(open_error)?;
        let dir = Dir::open_ambient_dir(root, ambient_authority()).map_err(open_error)?;
        Ok(Self {
            root: Arc::new(dir),
            base_url,
        })
    }

    fn public_url(&self, public_id: &str) -> Result<String, ImageStoreError> {
        self.base_url
            .join(public_id)
            .map(String::from)
            .map_err(|err| ImageStoreError::io(format!("invalid public URL: {err}")))
    }
}

fn relative_path(public_id: &str) -> Result<PathBuf, ImageStoreError> {
    let path = PathBuf::from(public_id);
    let mut components = path.components();
    match (components.next(), components.next(), components.next()) {
        (Some(Component::Normal(_)), Some(Component::Normal(_)), None) => Ok(path),
        _ => Err(ImageStoreError::rejected(format!(
            "malformed image id {public_id}"
        ))),
    }
}

async fn blocking<T, F>(task: F) -> Result<T, ImageStoreError>
where
    T: Send + 'static,
    F: FnOnce() -> io::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| ImageStoreError::io(err.to_string()))?
        .map_err(|err| ImageStoreError::io(err.to_string()))
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn store(
        &self,
        folder: ImageFolder,
        upload: &ImageUpload,
    ) -> Result<ImageRef, ImageStoreError> {
        if upload.bytes().is_empty() {
            return Err(ImageStoreError::rejected(format!(
                "{} is empty",
                upload.file_name()
            )));
        }
        let public_id = format!(
            "{}/{}.{}",
            folder.as_str(),
            Uuid::new_v4().simple(),
            upload.extension()
        );
        let url = self.public_url(&public_id)?;
        let root = Arc::clone(&self.root);
        let target = relative_path(&public_id)?;
        let bytes = upload.bytes().to_vec();
        let folder_name = folder.as_str();
        blocking(move || {
            root.create_dir_all(folder_name)?;
            root.write(&target, bytes)
        })
        .await?;
        debug!(public_id, size = upload.bytes().len(), "stored image");
        Ok(ImageRef::new(url, public_id))
    }

    async fn remove(&self, public_id: &str) -> Result<(), ImageStoreError> {
        let target = relative_path(public_id)?;
        let root = Arc::clone(&self.root);
        let removed = blocking(move || match root.remove_file(&target) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err),
        })
        .await?;
        if !removed {
            warn!(public_id, "image already absent");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    use crate::test_support::png;

    struct Harness {
        dir: TempDir,
        store: LocalImageStore,
    }

    #[fixture]
    fn harness() -> Harness {
        let dir = TempDir::new().expect("temp dir");
        let base = Url::parse("http://localhost:8080/uploads").expect("base url");
        let store = LocalImageStore::open(&dir.path().join("images"), base).expect("open store");
        Harness { dir, store }
    }

    #[rstest]
    #[tokio::test]
    async fn store_writes_file_and_builds_public_url(harness: Harness) {
        let image = harness
            .store
            .store(ImageFolder::Merchandise, &png("shirt.png"))
            .await
            .expect("store");

        assert!(image.public_id().starts_with("merch/"));
        assert!(image.public_id().ends_with(".png"));
        assert_eq!(
            image.url(),
            format!("http://localhost:8080/uploads/{}", image.public_id())
        );
        let written = std::fs::read(harness.dir.path().join("images").join(image.public_id()))
            .expect("file on disk");
        assert_eq!(written, png("shirt.png").bytes());
    }

    #[rstest]
    #[tokio::test]
    async fn remove_deletes_and_tolerates_missing_files(harness: Harness) {
        let image = harness
            .store
            .store(ImageFolder::Avatars, &png("me.png"))
            .await
            .expect("store");
        let on_disk = harness.dir.path().join("images").join(image.public_id());

        harness.store.remove(image.public_id()).await.expect("remove");
        assert!(!on_disk.exists());
        harness
            .store
            .remove(image.public_id())
            .await
            .expect("repeat remove is a no-op");
    }

    #[rstest]
    #[case("../outside.png")]
    #[case("/etc/passwd")]
    #[case("merch/nested/file.png")]
    #[case("loose.png")]
    #[tokio::test]
    async fn remove_rejects_ids_outside_folder_layout(harness: Harness, #[case] public_id: &str) {
        let err = harness
            .store
            .remove(public_id)
            .await
            .expect_err("malformed id");
        assert!(matches!(err, ImageStoreError::Rejected { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn empty_upload_is_rejected(harness: Harness) {
        let upload = ImageUpload::new("blank.png", "image/png", Vec::new());
        let err = harness
            .store
            .store(ImageFolder::Merchandise, &upload)
            .await
            .expect_err("empty upload");
        assert!(matches!(err, ImageStoreError::Rejected { .. }));
    }

    #[rstest]
    fn opaque_base_url_is_refused() {
        let dir = TempDir::new().expect("temp dir");
        let base = Url::parse("mailto:uploads@example.edu").expect("url");
        let result = LocalImageStore::open(dir.path(), base);
        assert!(matches!(result, Err(LocalImageStoreError::BaseUrl { .. })));
    }
}
