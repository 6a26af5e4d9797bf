//! Request bodies for mutations.
//!
//! A form with attachments goes out as `multipart/form-data`: each file under
//! the layout's file field, every other value JSON-encoded under its blob
//! field. A form without attachments goes out as plain JSON. The choice is
//! made once, in [`MutationPayload::resolve`].

use reqwest::RequestBuilder;
use reqwest::multipart::{Form, Part};
use serde_json::{Map, Value};

use crate::error::ClientError;

/// Multipart field names used by one kind of form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormLayout {
    /// Field carrying the JSON-encoded non-file values.
    pub blob_field: &'static str,
    /// Field carrying each attached file.
    pub file_field: &'static str,
}

impl FormLayout {
    /// `merch` blob plus `images` files.
    pub const MERCHANDISE: Self = Self {
        blob_field: "merch",
        file_field: "images",
    };

    /// `user` blob plus a single `avatar` file.
    pub const PROFILE: Self = Self {
        blob_field: "user",
        file_field: "avatar",
    };
}

/// A file attached to a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    /// Name reported to the server.
    pub file_name: String,
    /// MIME type, such as `image/png`.
    pub content_type: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl FileUpload {
    /// Describe an attachment.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }
}

/// One part of a multipart body, in send order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadPart<'a> {
    /// JSON-encoded form values.
    Blob {
        /// Multipart field name.
        name: &'static str,
        /// Encoded JSON object.
        json: String,
    },
    /// An attached file.
    File {
        /// Multipart field name.
        name: &'static str,
        /// The attachment.
        upload: &'a FileUpload,
    },
}

/// A mutation body resolved from a form.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationPayload {
    /// No attachments: the fields are the JSON body.
    Json(Map<String, Value>),
    /// Attachments present: fields go under the blob field.
    Multipart {
        /// Field names for this form.
        layout: FormLayout,
        /// Non-file form values.
        fields: Map<String, Value>,
        /// Attachments, in submission order.
        files: Vec<FileUpload>,
    },
}

impl MutationPayload {
    /// Pick the body shape for a submitted form.
    ///
    /// # Examples
    /// ```
    /// use portal_client::{FormLayout, MutationPayload};
    /// use serde_json::Map;
    ///
    /// let payload = MutationPayload::resolve(FormLayout::PROFILE, Map::new(), Vec::new());
    /// assert!(!payload.is_multipart());
    /// ```
    #[must_use]
    pub fn resolve(layout: FormLayout, fields: Map<String, Value>, files: Vec<FileUpload>) -> Self {
        if files.is_empty() {
            Self::Json(fields)
        } else {
            Self::Multipart {
                layout,
                fields,
                files,
            }
        }
    }

    /// Whether the payload is sent as `multipart/form-data`.
    #[must_use]
    pub const fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart { .. })
    }

    /// Non-file form values.
    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        match self {
            Self::Json(fields) | Self::Multipart { fields, .. } => fields,
        }
    }

    /// Multipart parts in send order; empty for JSON payloads.
    ///
    /// # Errors
    /// Returns [`ClientError::Decode`] when the fields cannot be encoded.
    pub fn parts(&self) -> Result<Vec<PayloadPart<'_>>, ClientError> {
        let Self::Multipart {
            layout,
            fields,
            files,
        } = self
        else {
            return Ok(Vec::new());
        };
        let mut parts = Vec::with_capacity(files.len() + 1);
        parts.push(PayloadPart::Blob {
            name: layout.blob_field,
            json: serde_json::to_string(fields)?,
        });
        parts.extend(files.iter().map(|upload| PayloadPart::File {
            name: layout.file_field,
            upload,
        }));
        Ok(parts)
    }

    /// Attach the body to `request`.
    pub(crate) fn encode(&self, request: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        match self {
            Self::Json(fields) => Ok(request.json(fields)),
            Self::Multipart { .. } => {
                let form = self.parts()?.into_iter().try_fold(Form::new(), add_part)?;
                Ok(request.multipart(form))
            }
        }
    }
}

fn add_part(form: Form, part: PayloadPart<'_>) -> Result<Form, ClientError> {
    match part {
        PayloadPart::Blob { name, json } => Ok(form.text(name, json)),
        PayloadPart::File { name, upload } => {
            let file = Part::bytes(upload.bytes.clone())
                .file_name(upload.file_name.clone())
                .mime_str(&upload.content_type)?;
            Ok(form.part(name, file))
        }
    }
}
