//! Mutation bodies that arrive either as JSON or as multipart forms.
//!
//! Forms with files are sent as `multipart/form-data`: each file under the
//! layout's file field and every other value JSON-encoded under its blob
//! field. Forms without files are plain JSON. [`FormSubmission`] accepts
//! both and hands handlers one shape: a JSON object plus the uploaded images.

use std::marker::PhantomData;

use actix_multipart::{Field, Multipart};
use actix_web::http::header::CONTENT_TYPE;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::TryStreamExt;
use futures_util::future::{LocalBoxFuture, ready};
use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::{
    Error, FieldViolation, ImageUpload, PayloadSchema, ValidationError, ViolationCode,
};
use crate::inbound::http::state::{HttpState, UploadPolicy};

const MAX_BLOB_BYTES: usize = 64 * 1024;

/// Field names used by one kind of form.
pub trait FormLayout {
    /// Multipart field carrying the JSON-encoded non-file values.
    const BLOB_FIELD: &'static str;
    /// Multipart field carrying uploaded files.
    const FILE_FIELD: &'static str;
    /// Most files accepted in one submission.
    const MAX_FILES: usize;
}

/// Merchandise forms: `merch` blob plus any number of `images`.
#[derive(Debug, Clone, Copy)]
pub struct MerchandiseLayout;

impl FormLayout for MerchandiseLayout {
    const BLOB_FIELD: &'static str = "merch";
    const FILE_FIELD: &'static str = "images";
    const MAX_FILES: usize = 10;
}

/// Profile forms: `user` blob plus a single `avatar`.
#[derive(Debug, Clone, Copy)]
pub struct ProfileLayout;

impl FormLayout for ProfileLayout {
    const BLOB_FIELD: &'static str = "user";
    const FILE_FIELD: &'static str = "avatar";
    const MAX_FILES: usize = 1;
}

/// A decoded mutation body.
#[derive(Debug)]
pub struct FormSubmission<L> {
    fields: Value,
    files: Vec<ImageUpload>,
    layout: PhantomData<L>,
}

impl<L> FormSubmission<L> {
    fn new(fields: Value, files: Vec<ImageUpload>) -> Self {
        Self {
            fields,
            files,
            layout: PhantomData,
        }
    }

    /// Non-file values as sent by the client.
    pub fn fields(&self) -> &Value {
        &self.fields
    }

    /// Uploaded images in submission order.
    pub fn files(&self) -> &[ImageUpload] {
        &self.files
    }

    /// Whether any file was uploaded.
    pub fn has_files(&self) -> bool {
        !self.files.is_empty()
    }

    /// Run `schema` over the non-file values.
    pub fn validate<S>(&self, schema: &S) -> Result<S::Output, Error>
    where
        S: PayloadSchema<Input = Value>,
    {
        schema.validate(&self.fields).map_err(Error::from)
    }

    /// Take the uploaded images.
    pub fn into_files(self) -> Vec<ImageUpload> {
        self.files
    }
}

fn rejected(field: &str, code: ViolationCode, message: impl Into<String>) -> Error {
    ValidationError::single(FieldViolation::new(field, code, message)).into()
}

fn parse_blob(field: &str, bytes: &[u8]) -> Result<Value, Error> {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(_) => Err(rejected(
            field,
            ViolationCode::InvalidType,
            "must be a JSON object",
        )),
        Err(error) => Err(rejected(
            field,
            ViolationCode::InvalidFormat,
            format!("malformed JSON: {error}"),
        )),
    }
}

async fn read_limited(field: &mut Field, name: &str, limit: usize) -> Result<Vec<u8>, Error> {
    let mut buffer = Vec::new();
    while let Some(chunk) = field
        .try_next()
        .await
        .map_err(|error| Error::invalid_request(format!("malformed multipart body: {error}")))?
    {
        if buffer.len().saturating_add(chunk.len()) > limit {
            return Err(rejected(
                name,
                ViolationCode::OutOfRange,
                format!("file must not exceed {limit} bytes"),
            ));
        }
        buffer.extend_from_slice(&chunk);
    }
    Ok(buffer)
}

async fn read_multipart<L: FormLayout>(
    mut multipart: Multipart,
    policy: UploadPolicy,
) -> Result<FormSubmission<L>, Error> {
    let mut fields = None;
    let mut files = Vec::new();

    while let Some(mut field) = multipart
        .try_next()
        .await
        .map_err(|error| Error::invalid_request(format!("malformed multipart body: {error}")))?
    {
        let name = field.name().unwrap_or_default().to_owned();
        if name == L::BLOB_FIELD {
            let bytes = read_limited(&mut field, L::BLOB_FIELD, MAX_BLOB_BYTES).await?;
            fields = Some(parse_blob(L::BLOB_FIELD, &bytes)?);
        } else if name == L::FILE_FIELD {
            if files.len() >= L::MAX_FILES {
                return Err(rejected(
                    L::FILE_FIELD,
                    ViolationCode::OutOfRange,
                    format!("at most {} file(s) may be uploaded", L::MAX_FILES),
                ));
            }
            let content_type = field
                .content_type()
                .map(ToString::to_string)
                .unwrap_or_default();
            if !policy.accepts(&content_type) {
                return Err(rejected(
                    L::FILE_FIELD,
                    ViolationCode::InvalidFormat,
                    "only image uploads are accepted",
                ));
            }
            let file_name = field
                .content_disposition()
                .and_then(|disposition| disposition.get_filename())
                .unwrap_or("upload")
                .to_owned();
            let bytes = read_limited(&mut field, L::FILE_FIELD, policy.max_file_bytes()).await?;
            files.push(ImageUpload::new(file_name, content_type, bytes));
        } else {
            debug!(field = %name, "ignoring unexpected multipart field");
        }
    }

    Ok(FormSubmission::new(
        fields.unwrap_or_else(|| Value::Object(Map::new())),
        files,
    ))
}

fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

impl<L: FormLayout + 'static> FromRequest for FormSubmission<L> {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let policy = req
            .app_data::<web::Data<HttpState>>()
            .map(|state| state.uploads)
            .unwrap_or_default();
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(essence)
            .unwrap_or_default();

        match content_type.as_str() {
            "multipart/form-data" => {
                let multipart = Multipart::new(req.headers(), payload.take());
                Box::pin(read_multipart::<L>(multipart, policy))
            }
            "application/json" => {
                let body = web::Bytes::from_request(req, payload);
                Box::pin(async move {
                    let bytes = body.await.map_err(|error| {
                        Error::invalid_request(format!("could not read request body: {error}"))
                    })?;
                    let fields = serde_json::from_slice(&bytes).map_err(|error| {
                        Error::invalid_request(format!("malformed JSON body: {error}"))
                    })?;
                    Ok(FormSubmission::new(fields, Vec::new()))
                })
            }
            _ => Box::pin(ready(Err(Error::invalid_request(
                "request body must be JSON or multipart/form-data",
            )))),
        }
    }
}
