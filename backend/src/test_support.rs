//! Shared doubles for unit tests in `src/`.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::ports::{FixtureImageStore, ImageStore, ImageStoreError};
use crate::domain::{ImageFolder, ImageRef, ImageUpload};

/// Fixed instant used by service tests.
pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

/// Clock frozen at [`fixture_timestamp`].
pub(crate) struct FixtureClock;

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        fixture_timestamp().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        fixture_timestamp()
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock)
}

/// Image store that records every call and can be told to fail uploads.
#[derive(Default)]
pub(crate) struct RecordingImageStore {
    stored: Mutex<Vec<String>>,
    removed: Mutex<Vec<String>>,
    fail_after: Mutex<Option<usize>>,
}

impl RecordingImageStore {
    /// Fail every upload once `count` uploads have succeeded.
    pub(crate) fn failing_after(count: usize) -> Self {
        let store = Self::default();
        *store.fail_after.lock().expect("fail_after lock") = Some(count);
        store
    }

    pub(crate) fn stored(&self) -> Vec<String> {
        self.stored.lock().expect("stored lock").clone()
    }

    pub(crate) fn removed(&self) -> Vec<String> {
        self.removed.lock().expect("removed lock").clone()
    }
}

#[async_trait]
impl ImageStore for RecordingImageStore {
    async fn store(
        &self,
        folder: ImageFolder,
        upload: &ImageUpload,
    ) -> Result<ImageRef, ImageStoreError> {
        let stored_so_far = self.stored.lock().expect("stored lock").len();
        if self
            .fail_after
            .lock()
            .expect("fail_after lock")
            .is_some_and(|limit| stored_so_far >= limit)
        {
            return Err(ImageStoreError::io("disk full"));
        }
        let image = FixtureImageStore.store(folder, upload).await?;
        self.stored
            .lock()
            .expect("stored lock")
            .push(image.public_id().to_owned());
        Ok(image)
    }

    async fn remove(&self, public_id: &str) -> Result<(), ImageStoreError> {
        self.removed
            .lock()
            .expect("removed lock")
            .push(public_id.to_owned());
        Ok(())
    }
}

/// A small PNG-typed upload.
pub(crate) fn png(name: &str) -> ImageUpload {
    ImageUpload::new(name, "image/png", vec![0x89, b'P', b'N', b'G'])
}
