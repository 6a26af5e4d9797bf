//! Stored image references and pending uploads.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Reference to an image held by the image store.
///
/// `image` is the public URL clients render; `image_public_id` is the
/// storage-provider key used to delete the object later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    #[schema(example = "http://localhost:8080/uploads/merch/5b1c.png")]
    image: String,
    #[schema(example = "merch/5b1c.png")]
    image_public_id: String,
}

impl ImageRef {
    /// Pair a public URL with its storage key.
    pub fn new(image: impl Into<String>, image_public_id: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            image_public_id: image_public_id.into(),
        }
    }

    /// Public URL of the stored image.
    pub fn url(&self) -> &str {
        self.image.as_str()
    }

    /// Storage-provider identifier.
    pub fn public_id(&self) -> &str {
        self.image_public_id.as_str()
    }
}

/// Folder an upload is filed under in the image store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFolder {
    /// Merchandise photos.
    Merchandise,
    /// Profile avatars.
    Avatars,
}

impl ImageFolder {
    /// Directory name used by storage adapters.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Merchandise => "merch",
            Self::Avatars => "avatars",
        }
    }
}

/// Image file received from a client, not yet stored.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

impl ImageUpload {
    /// Wrap an uploaded file.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Client-supplied file name.
    pub fn file_name(&self) -> &str {
        self.file_name.as_str()
    }

    /// Declared MIME type, for example `image/png`.
    pub fn content_type(&self) -> &str {
        self.content_type.as_str()
    }

    /// File contents.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Lower-case extension derived from the MIME subtype.
    pub fn extension(&self) -> &str {
        match self.content_type.split_once('/') {
            Some((_, "jpeg")) => "jpg",
            Some((_, "svg+xml")) => "svg",
            Some((_, subtype)) if subtype.chars().all(|c| c.is_ascii_alphanumeric()) => subtype,
            _ => "bin",
        }
    }
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}
