//! Payload schemas and field-level validation errors.
//!
//! Every mutating request passes through a [`PayloadSchema`] before a service
//! sees it. Schemas read loosely typed JSON (either a request body or the
//! JSON blob carried in a multipart form) and produce a typed domain value or
//! a [`ValidationError`] listing every offending field.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value, json};

use super::Error;

/// Machine-readable reason attached to a [`FieldViolation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCode {
    /// A required field was absent, null, or blank.
    Required,
    /// The field had the wrong JSON type.
    InvalidType,
    /// A numeric field fell outside its allowed range.
    OutOfRange,
    /// A string field did not match the expected format.
    InvalidFormat,
    /// A string field was shorter than its minimum length.
    TooShort,
    /// The value is not one of the accepted options.
    UnknownVariant,
    /// A partial update carried no fields at all.
    EmptyPatch,
}

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    field: String,
    code: ViolationCode,
    message: String,
}

impl FieldViolation {
    /// Describe a rejected field.
    pub fn new(field: impl Into<String>, code: ViolationCode, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code,
            message: message.into(),
        }
    }

    /// Name of the offending field.
    pub fn field(&self) -> &str {
        self.field.as_str()
    }

    /// Reason code.
    pub fn code(&self) -> ViolationCode {
        self.code
    }

    /// Human-readable description.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Non-empty list of field violations produced by a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    first: FieldViolation,
    rest: Vec<FieldViolation>,
}

impl ValidationError {
    /// Wrap a single violation.
    pub fn single(violation: FieldViolation) -> Self {
        Self {
            first: violation,
            rest: Vec::new(),
        }
    }

    /// Build from a list, returning `None` when nothing was rejected.
    pub fn from_violations(violations: Vec<FieldViolation>) -> Option<Self> {
        let mut iter = violations.into_iter();
        let first = iter.next()?;
        Some(Self {
            first,
            rest: iter.collect(),
        })
    }

    /// Iterate over every violation in the order they were found.
    pub fn violations(&self) -> impl Iterator<Item = &FieldViolation> {
        std::iter::once(&self.first).chain(self.rest.iter())
    }

    /// The first violation, used for the summary message.
    pub fn primary(&self) -> &FieldViolation {
        &self.first
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.first.message())
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for Error {
    fn from(value: ValidationError) -> Self {
        let primary = value.primary();
        let violations: Vec<&FieldViolation> = value.violations().collect();
        Error::invalid_request(primary.message()).with_details(json!({
            "field": primary.field(),
            "code": primary.code(),
            "violations": violations,
        }))
    }
}

/// Typed validator for one kind of request payload.
///
/// # Examples
/// ```
/// use portal_backend::domain::{MerchandiseCreationSchema, PayloadSchema};
/// use serde_json::json;
///
/// let draft = MerchandiseCreationSchema
///     .validate(&json!({ "name": "Shirt", "description": "Blue shirt", "price": 150 }))
///     .expect("valid payload");
/// assert_eq!(draft.name(), "Shirt");
/// ```
pub trait PayloadSchema {
    /// Raw input inspected by the schema.
    type Input: ?Sized;
    /// Typed value produced on success.
    type Output;

    /// Check `input` and convert it into [`Self::Output`].
    fn validate(&self, input: &Self::Input) -> Result<Self::Output, ValidationError>;
}

/// Cursor over a JSON object that accumulates violations while fields are read.
pub(crate) struct FieldReader<'a> {
    fields: &'a Map<String, Value>,
    violations: Vec<FieldViolation>,
}

impl<'a> FieldReader<'a> {
    /// Start reading `payload`, which must be a JSON object.
    pub(crate) fn new(payload: &'a Value) -> Result<Self, ValidationError> {
        match payload {
            Value::Object(fields) => Ok(Self {
                fields,
                violations: Vec::new(),
            }),
            _ => Err(ValidationError::single(FieldViolation::new(
                "body",
                ViolationCode::InvalidType,
                "request body must be a JSON object",
            ))),
        }
    }

    /// True when at least one of `names` carries a value.
    pub(crate) fn any_present(&self, names: &[&str]) -> bool {
        names.iter().any(|name| self.fields.contains_key(*name))
    }

    pub(crate) fn reject(&mut self, field: &str, code: ViolationCode, message: impl Into<String>) {
        self.violations
            .push(FieldViolation::new(field, code, message));
    }

    fn present(&self, field: &str) -> Option<&'a Value> {
        match self.fields.get(field) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value),
        }
    }

    /// Trimmed non-empty string.
    pub(crate) fn required_text(&mut self, field: &str) -> Option<String> {
        match self.optional_text(field) {
            Some(text) if !text.is_empty() => Some(text),
            Some(_) | None if self.has_violation(field) => None,
            _ => {
                self.reject(field, ViolationCode::Required, format!("{field} is required"));
                None
            }
        }
    }

    /// Trimmed string; absent and null both yield `None`.
    pub(crate) fn optional_text(&mut self, field: &str) -> Option<String> {
        match self.present(field)? {
            Value::String(text) => Some(text.trim().to_owned()),
            _ => {
                self.reject(
                    field,
                    ViolationCode::InvalidType,
                    format!("{field} must be a string"),
                );
                None
            }
        }
    }

    /// Present, non-blank text for a partial update.
    pub(crate) fn patch_text(&mut self, field: &str) -> Option<String> {
        let text = self.optional_text(field)?;
        if text.is_empty() {
            self.reject(
                field,
                ViolationCode::Required,
                format!("{field} must not be blank"),
            );
            return None;
        }
        Some(text)
    }

    /// Number within `range`; absent and null yield `None`.
    pub(crate) fn optional_number(
        &mut self,
        field: &str,
        range: std::ops::RangeInclusive<f64>,
    ) -> Option<f64> {
        let value = self.present(field)?;
        let Some(number) = value.as_f64().filter(|n| n.is_finite()) else {
            self.reject(
                field,
                ViolationCode::InvalidType,
                format!("{field} must be a number"),
            );
            return None;
        };
        if !range.contains(&number) {
            self.reject(
                field,
                ViolationCode::OutOfRange,
                format!(
                    "{field} must be between {} and {}",
                    range.start(),
                    range.end()
                ),
            );
            return None;
        }
        Some(number)
    }

    /// Required number within `range`.
    pub(crate) fn required_number(
        &mut self,
        field: &str,
        range: std::ops::RangeInclusive<f64>,
    ) -> Option<f64> {
        if self.present(field).is_none() {
            self.reject(field, ViolationCode::Required, format!("{field} is required"));
            return None;
        }
        self.optional_number(field, range)
    }

    /// Non-negative integer that fits in `u32`.
    pub(crate) fn optional_count(&mut self, field: &str) -> Option<u32> {
        let value = self.present(field)?;
        match value.as_u64().and_then(|n| u32::try_from(n).ok()) {
            Some(count) => Some(count),
            None => {
                self.reject(
                    field,
                    ViolationCode::InvalidType,
                    format!("{field} must be a non-negative whole number"),
                );
                None
            }
        }
    }

    /// Raw value for fields with bespoke parsing.
    pub(crate) fn raw(&self, field: &str) -> Option<&'a Value> {
        self.present(field)
    }

    fn has_violation(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field() == field)
    }

    /// Finish reading, yielding `value` when no field was rejected.
    pub(crate) fn finish<T>(self, value: impl FnOnce() -> Option<T>) -> Result<T, ValidationError> {
        if let Some(error) = ValidationError::from_violations(self.violations) {
            return Err(error);
        }
        value().ok_or_else(|| {
            ValidationError::single(FieldViolation::new(
                "body",
                ViolationCode::InvalidType,
                "request body is incomplete",
            ))
        })
    }
}
