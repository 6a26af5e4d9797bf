//! Image storage adapters.

mod local_image_store;

pub use local_image_store::{LocalImageStore, LocalImageStoreError};
