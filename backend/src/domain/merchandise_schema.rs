//! Payload schemas for merchandise creation, revision and deletion.

use serde_json::Value;

use super::merchandise::{DISCOUNT_RANGE, PRICE_MIN, RATINGS_RANGE};
use super::validation::{FieldReader, FieldViolation, PayloadSchema, ValidationError, ViolationCode};
use super::{MerchandiseDraft, MerchandiseId, MerchandisePatch};

const PATCH_FIELDS: [&str; 8] = [
    "name",
    "description",
    "price",
    "discount",
    "stocks",
    "size",
    "color",
    "ratings",
];

/// Schema for `POST /merch`.
///
/// `name` and `description` are required non-empty strings and `price` a
/// non-negative number. `discount` may be a percentage or null; keys the
/// schema does not know (such as a client-side `images` list) are ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct MerchandiseCreationSchema;

impl PayloadSchema for MerchandiseCreationSchema {
    type Input = Value;
    type Output = MerchandiseDraft;

    fn validate(&self, input: &Value) -> Result<MerchandiseDraft, ValidationError> {
        let mut reader = FieldReader::new(input)?;
        let name = reader.required_text("name");
        let description = reader.required_text("description");
        let price = reader.required_number("price", PRICE_MIN..=f64::MAX);
        let discount = reader.optional_number("discount", DISCOUNT_RANGE);
        let stocks = reader.optional_count("stocks");
        let size = reader.optional_text("size");
        let color = reader.optional_text("color");

        reader.finish(|| {
            Some(MerchandiseDraft {
                name: name?,
                description: description?,
                price: price?,
                discount,
                stocks: stocks.unwrap_or_default(),
                size: size.unwrap_or_default(),
                color: color.unwrap_or_default(),
            })
        })
    }
}

/// Schema for `PATCH /merch/{id}`.
///
/// Applies the creation rules to whichever fields are present and also
/// accepts `ratings`. A body that names none of the editable fields is
/// rejected unless `allow_empty` is set, which the controller does when the
/// request carries replacement images.
#[derive(Debug, Default, Clone, Copy)]
pub struct MerchandiseRevisionSchema {
    allow_empty: bool,
}

impl MerchandiseRevisionSchema {
    /// Accept a body with no field changes.
    pub fn allowing_empty(self) -> Self {
        Self { allow_empty: true }
    }
}

impl PayloadSchema for MerchandiseRevisionSchema {
    type Input = Value;
    type Output = MerchandisePatch;

    fn validate(&self, input: &Value) -> Result<MerchandisePatch, ValidationError> {
        let mut reader = FieldReader::new(input)?;
        if !self.allow_empty && !reader.any_present(&PATCH_FIELDS) {
            reader.reject(
                "body",
                ViolationCode::EmptyPatch,
                "at least one field must be provided",
            );
        }

        let discount = if reader.any_present(&["discount"]) {
            Some(reader.optional_number("discount", DISCOUNT_RANGE))
        } else {
            None
        };
        let patch = MerchandisePatch {
            name: reader.patch_text("name"),
            description: reader.patch_text("description"),
            price: reader.optional_number("price", PRICE_MIN..=f64::MAX),
            discount,
            stocks: reader.optional_count("stocks"),
            size: reader.optional_text("size"),
            color: reader.optional_text("color"),
            ratings: reader.optional_number("ratings", RATINGS_RANGE),
        };
        reader.finish(|| Some(patch))
    }
}

/// Schema for the `{id}` segment of merchandise routes.
#[derive(Debug, Default, Clone, Copy)]
pub struct MerchandisePathIdSchema;

impl PayloadSchema for MerchandisePathIdSchema {
    type Input = str;
    type Output = MerchandiseId;

    fn validate(&self, input: &str) -> Result<MerchandiseId, ValidationError> {
        input.trim().parse().map_err(|_| {
            ValidationError::single(FieldViolation::new(
                "id",
                ViolationCode::InvalidFormat,
                "id must be a valid UUID",
            ))
        })
    }
}

/// Schema for `DELETE /merch/{id}`.
///
/// Only the path identifier is checked here; whether the item exists is the
/// service's concern and surfaces as `404`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MerchandiseDeletionSchema;

impl PayloadSchema for MerchandiseDeletionSchema {
    type Input = str;
    type Output = MerchandiseId;

    fn validate(&self, input: &str) -> Result<MerchandiseId, ValidationError> {
        MerchandisePathIdSchema.validate(input)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn creation_applies_defaults() {
        let draft = MerchandiseCreationSchema
            .validate(&json!({
                "name": "Shirt",
                "description": "Blue shirt",
                "price": 150,
                "discount": null,
                "images": [],
            }))
            .expect("valid payload");

        assert_eq!(draft.name(), "Shirt");
        assert_eq!(draft.price(), 150.0);
        assert_eq!(draft.discount(), None);
        assert_eq!(draft.stocks, 0);
        assert_eq!(draft.size, "");
    }

    #[rstest]
    #[case(json!({ "description": "d", "price": 1 }), "name")]
    #[case(json!({ "name": "n", "price": 1 }), "description")]
    #[case(json!({ "name": "n", "description": "d" }), "price")]
    #[case(json!({ "name": "n", "description": "d", "price": -5 }), "price")]
    #[case(json!({ "name": "n", "description": "d", "price": 1, "discount": 140 }), "discount")]
    #[case(json!({ "name": "n", "description": "d", "price": 1, "stocks": -1 }), "stocks")]
    fn creation_rejects_bad_fields(#[case] payload: Value, #[case] field: &str) {
        let err = MerchandiseCreationSchema
            .validate(&payload)
            .expect_err("invalid payload");
        assert_eq!(err.primary().field(), field);
    }

    #[rstest]
    fn creation_reports_every_violation() {
        let err = MerchandiseCreationSchema
            .validate(&json!({}))
            .expect_err("empty payload");
        let fields: Vec<&str> = err.violations().map(FieldViolation::field).collect();
        assert_eq!(fields, ["name", "description", "price"]);
    }

    #[rstest]
    fn revision_rejects_empty_patch() {
        let err = MerchandiseRevisionSchema::default()
            .validate(&json!({ "images": [] }))
            .expect_err("empty patch");
        assert_eq!(err.primary().code(), ViolationCode::EmptyPatch);
    }

    #[rstest]
    fn revision_allows_empty_patch_with_images() {
        let patch = MerchandiseRevisionSchema::default()
            .allowing_empty()
            .validate(&json!({}))
            .expect("empty allowed");
        assert!(patch.is_empty());
    }

    #[rstest]
    fn revision_distinguishes_cleared_discount() {
        let patch = MerchandiseRevisionSchema::default()
            .validate(&json!({ "discount": null, "ratings": 4.5 }))
            .expect("valid patch");
        assert_eq!(patch.discount, Some(None));
        assert_eq!(patch.ratings, Some(4.5));
    }

    #[rstest]
    #[case(json!({ "ratings": 6 }), "ratings")]
    #[case(json!({ "name": "  " }), "name")]
    fn revision_rejects_bad_fields(#[case] payload: Value, #[case] field: &str) {
        let err = MerchandiseRevisionSchema::default()
            .validate(&payload)
            .expect_err("invalid patch");
        assert_eq!(err.primary().field(), field);
    }

    #[rstest]
    #[case("3fa85f64-5717-4562-b3fc-2c963f66afa6", true)]
    #[case("not-a-uuid", false)]
    fn deletion_checks_identifier_shape(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(MerchandiseDeletionSchema.validate(raw).is_ok(), ok);
    }

    #[rstest]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6 ")]
    #[case("3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    fn path_id_accepts_padded_uuid(#[case] raw: &str) {
        let id = MerchandisePathIdSchema.validate(raw).expect("valid id");
        assert_eq!(id.to_string(), raw.trim());
    }

    #[rstest]
    fn path_id_rejection_names_the_id_field() {
        let err = MerchandisePathIdSchema
            .validate("42")
            .expect_err("not a uuid");
        assert_eq!(err.primary().field(), "id");
        assert_eq!(err.primary().code(), ViolationCode::InvalidFormat);
    }
}
