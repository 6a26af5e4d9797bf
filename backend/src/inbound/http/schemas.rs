//! OpenAPI-only descriptions of mutation bodies.
//!
//! Mutation payloads are validated from raw JSON by the domain schemas, so
//! there is no request struct to derive `ToSchema` on. These mirrors document
//! the accepted fields for Swagger UI and the generated document.

use utoipa::ToSchema;

/// Fields accepted by `POST /merch` and `PATCH /merch/{id}`.
///
/// With uploads, send `multipart/form-data` with these fields JSON-encoded
/// under `merch` and each file under `images`.
#[derive(ToSchema)]
#[schema(as = MerchandiseFields)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct MerchandiseFieldsSchema {
    #[schema(example = "Org shirt")]
    name: Option<String>,
    #[schema(example = "Cotton shirt with the org logo")]
    description: Option<String>,
    #[schema(minimum = 0, example = 350)]
    price: Option<f64>,
    #[schema(minimum = 0, maximum = 100, example = 10)]
    discount: Option<f64>,
    #[schema(minimum = 0, example = 25)]
    stocks: Option<u32>,
    #[schema(example = "M")]
    size: Option<String>,
    #[schema(example = "navy")]
    color: Option<String>,
    /// Accepted on update only.
    #[schema(minimum = 0, maximum = 5)]
    ratings: Option<f64>,
}

/// Fields accepted by the profile update routes.
///
/// With an avatar upload, send `multipart/form-data` with these fields
/// JSON-encoded under `user` and the file under `avatar`.
#[derive(ToSchema)]
#[schema(as = ProfileFields, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ProfileFieldsSchema {
    #[schema(min_length = 2, example = "Ada")]
    firstname: Option<String>,
    #[schema(min_length = 2, example = "Lovelace")]
    lastname: Option<String>,
    #[schema(example = "ada@example.edu")]
    email: Option<String>,
    #[schema(example = "BSCS")]
    course: Option<String>,
    #[schema(minimum = 1, maximum = 4, example = 2)]
    year: Option<u8>,
    /// Empty string clears the stored tag.
    #[schema(example = "04A1B2C3")]
    rfid: Option<String>,
    /// Also accepts the strings `"true"` and `"false"`.
    show_public: Option<bool>,
}
