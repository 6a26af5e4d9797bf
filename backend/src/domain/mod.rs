//! Domain primitives, schemas and services.
//!
//! Purpose: define the merchandise and member-profile model, the schemas that
//! guard every mutation, and the services behind the driving ports. Nothing
//! here depends on Actix; inbound adapters translate HTTP into these types.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure envelope.
//! - MerchandiseItem, UserProfile and friends: resource models.
//! - PayloadSchema implementations: typed request validators.
//! - MerchandiseService, UserProfileService: driving-port implementations.

pub mod auth;
pub mod error;
pub mod image;
pub mod merchandise;
pub mod merchandise_schema;
pub mod merchandise_service;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_schema;
pub mod user_service;
pub mod validation;

pub use self::auth::{LoginCredentials, LoginValidationError, Principal, Role, UnknownRole};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::image::{ImageFolder, ImageRef, ImageUpload};
pub use self::merchandise::{
    MerchandiseDraft, MerchandiseFilter, MerchandiseId, MerchandiseItem, MerchandisePatch,
};
pub use self::merchandise_schema::{
    MerchandiseCreationSchema, MerchandiseDeletionSchema, MerchandisePathIdSchema,
    MerchandiseRevisionSchema,
};
pub use self::merchandise_service::MerchandiseService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    AcademicYear, Course, EmailAddress, PersonName, ProfilePatch, PublicProfile, Rfid, UserId,
    UserListQuery, UserPage, UserProfile, UserValidationError,
};
pub use self::user_schema::{PathIdSchema, ProfileRevisionSchema};
pub use self::user_service::UserProfileService;
pub use self::validation::{FieldViolation, PayloadSchema, ValidationError, ViolationCode};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use portal_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("admin role required"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
