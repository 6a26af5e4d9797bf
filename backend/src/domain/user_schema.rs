//! Payload schemas for profile revisions and id-addressed user routes.

use serde_json::Value;

use super::validation::{FieldReader, FieldViolation, PayloadSchema, ValidationError, ViolationCode};
use super::{
    AcademicYear, Course, EmailAddress, PersonName, ProfilePatch, Rfid, UserId, UserValidationError,
};

const PROFILE_FIELDS: [&str; 7] = [
    "firstname",
    "lastname",
    "email",
    "course",
    "year",
    "rfid",
    "showPublic",
];

/// Schema for `PATCH /user/current-user` and `PATCH /user/{id}`.
///
/// Every field is optional. `year` accepts a number or a numeric string,
/// `rfid` accepts a blank string to clear the tag and `showPublic` accepts a
/// boolean or a string, where only `"true"` means visible.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProfileRevisionSchema {
    allow_empty: bool,
}

impl ProfileRevisionSchema {
    /// Accept a body with no field changes, used when an avatar is uploaded.
    pub fn allowing_empty(self) -> Self {
        Self { allow_empty: true }
    }
}

impl PayloadSchema for ProfileRevisionSchema {
    type Input = Value;
    type Output = ProfilePatch;

    fn validate(&self, input: &Value) -> Result<ProfilePatch, ValidationError> {
        let mut reader = FieldReader::new(input)?;
        if !self.allow_empty && !reader.any_present(&PROFILE_FIELDS) {
            reader.reject(
                "body",
                ViolationCode::EmptyPatch,
                "at least one field must be provided",
            );
        }

        let firstname = name_field(&mut reader, "firstname");
        let lastname = name_field(&mut reader, "lastname");
        let email = reader
            .optional_text("email")
            .and_then(|raw| parsed(&mut reader, "email", EmailAddress::new(&raw)));
        let course = reader
            .optional_text("course")
            .and_then(|raw| parsed(&mut reader, "course", raw.parse::<Course>()));
        let year = year_field(&mut reader);
        let rfid = if reader.any_present(&["rfid"]) {
            match reader.optional_text("rfid") {
                Some(raw) => parsed(&mut reader, "rfid", Rfid::parse_optional(&raw)),
                None => Some(None),
            }
        } else {
            None
        };
        let show_public = show_public_field(&mut reader);

        let patch = ProfilePatch {
            firstname,
            lastname,
            email,
            course,
            year,
            rfid,
            show_public,
        };
        reader.finish(|| Some(patch))
    }
}

fn parsed<T>(
    reader: &mut FieldReader<'_>,
    field: &str,
    result: Result<T, UserValidationError>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            let code = match error {
                UserValidationError::NameTooShort { .. } => ViolationCode::TooShort,
                UserValidationError::UnknownCourse => ViolationCode::UnknownVariant,
                UserValidationError::InvalidYear => ViolationCode::OutOfRange,
                _ => ViolationCode::InvalidFormat,
            };
            reader.reject(field, code, error.to_string());
            None
        }
    }
}

fn name_field(reader: &mut FieldReader<'_>, field: &str) -> Option<PersonName> {
    let raw = reader.optional_text(field)?;
    parsed(reader, field, PersonName::new(&raw))
}

fn year_field(reader: &mut FieldReader<'_>) -> Option<AcademicYear> {
    let raw = reader.raw("year")?;
    let result = match raw {
        Value::Number(number) => number
            .as_u64()
            .and_then(|n| u8::try_from(n).ok())
            .ok_or(UserValidationError::InvalidYear)
            .and_then(AcademicYear::try_from),
        Value::String(text) => text.parse(),
        _ => {
            reader.reject("year", ViolationCode::InvalidType, "year must be a number");
            return None;
        }
    };
    parsed(reader, "year", result)
}

fn show_public_field(reader: &mut FieldReader<'_>) -> Option<bool> {
    match reader.raw("showPublic")? {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) => Some(text == "true"),
        _ => {
            reader.reject(
                "showPublic",
                ViolationCode::InvalidType,
                "showPublic must be a boolean",
            );
            None
        }
    }
}

/// Schema for the `{id}` segment of admin user routes.
#[derive(Debug, Default, Clone, Copy)]
pub struct PathIdSchema;

impl PayloadSchema for PathIdSchema {
    type Input = str;
    type Output = UserId;

    fn validate(&self, input: &str) -> Result<UserId, ValidationError> {
        UserId::new(input.trim()).map_err(|error| {
            ValidationError::single(FieldViolation::new(
                "id",
                ViolationCode::InvalidFormat,
                error.to_string(),
            ))
        })
    }
}
