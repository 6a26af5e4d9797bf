//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler in the inbound layer, the resource and
//! envelope schemas they return, and the session cookie security scheme.
//! The document backs Swagger UI in debug builds and is exported with
//! `cargo run --bin openapi-dump`.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    AcademicYear, Course, Error, ErrorCode, ImageRef, MerchandiseItem, Principal, PublicProfile,
    Role, UserPage, UserProfile,
};
use crate::inbound::http::auth::{LoginRequest, LoginResponse};
use crate::inbound::http::responses::{
    MerchandiseListResponse, MerchandiseMutationResponse, MessageResponse, PublicUsersResponse,
    UserMutationResponse, UserResponse,
};
use crate::inbound::http::schemas::{MerchandiseFieldsSchema, ProfileFieldsSchema};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Campus portal API",
        description = "Merchandise catalogue and member profiles behind a session cookie.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::merchandise::list_merchandise,
        crate::inbound::http::merchandise::create_merchandise,
        crate::inbound::http::merchandise::update_merchandise,
        crate::inbound::http::merchandise::delete_merchandise,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::update_current_user,
        crate::inbound::http::users::list_public_users,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        ImageRef,
        MerchandiseItem,
        UserProfile,
        PublicProfile,
        UserPage,
        Course,
        AcademicYear,
        Role,
        Principal,
        LoginRequest,
        LoginResponse,
        MessageResponse,
        MerchandiseListResponse,
        MerchandiseMutationResponse,
        UserResponse,
        UserMutationResponse,
        PublicUsersResponse,
        MerchandiseFieldsSchema,
        ProfileFieldsSchema,
    )),
    tags(
        (name = "auth", description = "Signing in and out"),
        (name = "merchandise", description = "Organisation merchandise catalogue"),
        (name = "users", description = "Member profiles and the public directory"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
