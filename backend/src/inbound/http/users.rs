//! Member profile handlers.
//!
//! ```text
//! GET    /api/v1/user/current-user
//! PATCH  /api/v1/user/current-user   (JSON or multipart `user` + `avatar`)
//! GET    /api/v1/user/public
//! GET    /api/v1/user?page=2&search=ada        (admin)
//! GET    /api/v1/user/{id}                     (admin)
//! PATCH  /api/v1/user/{id}                     (admin)
//! DELETE /api/v1/user/{id}                     (admin)
//! ```
//!
//! The fixed `current-user` and `public` segments must be registered ahead
//! of `{id}` so the matcher does not treat them as identifiers.

use actix_web::{delete, get, patch, web};
use serde::Deserialize;
use tracing::info;

use crate::domain::{
    Error, PathIdSchema, PayloadSchema, ProfilePatch, ProfileRevisionSchema, UserId,
    UserListQuery, UserPage,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::payload::{FormSubmission, ProfileLayout};
use crate::inbound::http::responses::{
    MessageResponse, PublicUsersResponse, UserMutationResponse, UserResponse,
};
use crate::inbound::http::schemas::ProfileFieldsSchema;
use crate::inbound::http::session::Authenticated;
use crate::inbound::http::state::HttpState;
use crate::middleware::RequireSession;

/// Query string accepted by `GET /user`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct UserListParams {
    /// One-based page number; values below 1 are treated as 1.
    pub page: Option<usize>,
    /// Case-insensitive text matched against names and email.
    pub search: Option<String>,
}

impl From<&UserListParams> for UserListQuery {
    fn from(params: &UserListParams) -> Self {
        Self::new(params.page, params.search.as_deref())
    }
}

fn revision_schema(form: &FormSubmission<ProfileLayout>) -> ProfileRevisionSchema {
    if form.has_files() {
        ProfileRevisionSchema::default().allowing_empty()
    } else {
        ProfileRevisionSchema::default()
    }
}

async fn apply_revision(
    state: &HttpState,
    id: UserId,
    form: FormSubmission<ProfileLayout>,
) -> ApiResult<UserMutationResponse> {
    let patch: ProfilePatch = form.validate(&revision_schema(&form))?;
    let avatar = form.into_files().into_iter().next();
    let user = state.profiles.update(id, patch, avatar).await?;
    Ok(UserMutationResponse {
        message: "Profile updated".to_owned(),
        user,
    })
}

/// Profile of the signed-in member.
#[utoipa::path(
    get,
    path = "/api/v1/user/current-user",
    responses(
        (status = 200, description = "Current profile", body = UserResponse),
        (status = 401, description = "Not signed in", body = Error),
        (status = 404, description = "Account has no profile", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/user/current-user", wrap = "RequireSession::authenticated()")]
pub async fn current_user(
    state: web::Data<HttpState>,
    Authenticated(principal): Authenticated,
) -> ApiResult<web::Json<UserResponse>> {
    let user = state.profiles_query.fetch(&principal.user_id()).await?;
    Ok(web::Json(UserResponse { user }))
}

/// Update the signed-in member's profile. An uploaded avatar replaces the
/// current one.
#[utoipa::path(
    patch,
    path = "/api/v1/user/current-user",
    request_body(content = ProfileFieldsSchema, description = "Changed fields; multipart `user` + `avatar` when uploading"),
    responses(
        (status = 200, description = "Updated", body = UserMutationResponse),
        (status = 400, description = "Invalid payload", body = Error),
        (status = 401, description = "Not signed in", body = Error),
        (status = 409, description = "RFID already registered", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateCurrentUser"
)]
#[patch("/user/current-user", wrap = "RequireSession::authenticated()")]
pub async fn update_current_user(
    state: web::Data<HttpState>,
    Authenticated(principal): Authenticated,
    form: FormSubmission<ProfileLayout>,
) -> ApiResult<web::Json<UserMutationResponse>> {
    let response = apply_revision(&state, principal.user_id(), form).await?;
    info!(user_id = %principal.user_id(), "profile updated by owner");
    Ok(web::Json(response))
}

/// Members who opted into the public directory.
#[utoipa::path(
    get,
    path = "/api/v1/user/public",
    responses((status = 200, description = "Public directory", body = PublicUsersResponse)),
    tags = ["users"],
    operation_id = "listPublicUsers",
    security([])
)]
#[get("/user/public")]
pub async fn list_public_users(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<PublicUsersResponse>> {
    let users = state.profiles_query.list_public().await?;
    Ok(web::Json(PublicUsersResponse { users }))
}

/// Paged member listing for officers.
#[utoipa::path(
    get,
    path = "/api/v1/user",
    params(UserListParams),
    responses(
        (status = 200, description = "One page of profiles", body = UserPage),
        (status = 401, description = "Not signed in", body = Error),
        (status = 403, description = "Admin role required", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/user", wrap = "RequireSession::admin()")]
pub async fn list_users(
    state: web::Data<HttpState>,
    params: web::Query<UserListParams>,
) -> ApiResult<web::Json<UserPage>> {
    let page = state.profiles_query.list(&UserListQuery::from(&*params)).await?;
    Ok(web::Json(page))
}

/// Any member's profile.
#[utoipa::path(
    get,
    path = "/api/v1/user/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Profile", body = UserResponse),
        (status = 400, description = "Malformed id", body = Error),
        (status = 401, description = "Not signed in", body = Error),
        (status = 403, description = "Admin role required", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/user/{id}", wrap = "RequireSession::admin()")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserResponse>> {
    let id = PathIdSchema.validate(path.as_str())?;
    let user = state.profiles_query.fetch(&id).await?;
    Ok(web::Json(UserResponse { user }))
}

/// Update any member's profile.
#[utoipa::path(
    patch,
    path = "/api/v1/user/{id}",
    params(("id" = String, Path, description = "User identifier")),
    request_body(content = ProfileFieldsSchema, description = "Changed fields; multipart `user` + `avatar` when uploading"),
    responses(
        (status = 200, description = "Updated", body = UserMutationResponse),
        (status = 400, description = "Invalid payload", body = Error),
        (status = 401, description = "Not signed in", body = Error),
        (status = 403, description = "Admin role required", body = Error),
        (status = 404, description = "Unknown user", body = Error),
        (status = 409, description = "RFID already registered", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[patch("/user/{id}", wrap = "RequireSession::admin()")]
pub async fn update_user(
    state: web::Data<HttpState>,
    Authenticated(principal): Authenticated,
    path: web::Path<String>,
    form: FormSubmission<ProfileLayout>,
) -> ApiResult<web::Json<UserMutationResponse>> {
    let id = PathIdSchema.validate(path.as_str())?;
    let response = apply_revision(&state, id, form).await?;
    info!(user_id = %id, officer = %principal.user_id(), "profile updated by officer");
    Ok(web::Json(response))
}

/// Remove a member's profile and avatar.
#[utoipa::path(
    delete,
    path = "/api/v1/user/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 400, description = "Malformed id", body = Error),
        (status = 401, description = "Not signed in", body = Error),
        (status = 403, description = "Admin role required", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/user/{id}", wrap = "RequireSession::admin()")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    Authenticated(principal): Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id = PathIdSchema.validate(path.as_str())?;
    state.profiles.delete(id).await?;
    info!(user_id = %id, officer = %principal.user_id(), "profile deleted");
    Ok(web::Json(MessageResponse::new("User deleted")))
}

/// Register the profile routes in matching order.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(current_user)
        .service(update_current_user)
        .service(list_public_users)
        .service(list_users)
        .service(get_user)
        .service(update_user)
        .service(delete_user);
}
