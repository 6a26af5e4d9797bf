//! Merchandise API handlers.
//!
//! ```text
//! GET    /api/v1/merch?search=shirt
//! POST   /api/v1/merch           (admin; JSON or multipart `merch` + `images`)
//! PATCH  /api/v1/merch/{id}      (admin; JSON or multipart `merch` + `images`)
//! DELETE /api/v1/merch/{id}      (admin)
//! ```
//!
//! The session guard wraps each mutating route, so the payload is only read
//! once the caller is known to be an officer.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::Deserialize;

use crate::domain::{
    Error, MerchandiseCreationSchema, MerchandiseDeletionSchema, MerchandiseFilter,
    MerchandisePathIdSchema, MerchandiseRevisionSchema, PayloadSchema,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::payload::{FormSubmission, MerchandiseLayout};
use crate::inbound::http::responses::{
    MerchandiseListResponse, MerchandiseMutationResponse, MessageResponse,
};
use crate::inbound::http::schemas::MerchandiseFieldsSchema;
use crate::inbound::http::state::HttpState;
use crate::middleware::RequireSession;

/// Query string accepted by `GET /merch`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct MerchandiseListQuery {
    /// Case-insensitive text matched against name and description.
    pub search: Option<String>,
}

/// List merchandise, optionally filtered.
#[utoipa::path(
    get,
    path = "/api/v1/merch",
    params(MerchandiseListQuery),
    responses(
        (status = 200, description = "Merchandise catalogue", body = MerchandiseListResponse),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["merchandise"],
    operation_id = "listMerchandise",
    security([])
)]
#[get("/merch")]
pub async fn list_merchandise(
    state: web::Data<HttpState>,
    query: web::Query<MerchandiseListQuery>,
) -> ApiResult<web::Json<MerchandiseListResponse>> {
    let filter = MerchandiseFilter::new(query.search.as_deref());
    let merchandise = state.merchandise_query.list(&filter).await?;
    Ok(web::Json(MerchandiseListResponse { merchandise }))
}

/// Create a merchandise item.
#[utoipa::path(
    post,
    path = "/api/v1/merch",
    request_body(content = MerchandiseFieldsSchema, description = "Item fields; multipart `merch` + `images` when uploading"),
    responses(
        (status = 201, description = "Created", body = MerchandiseMutationResponse),
        (status = 400, description = "Invalid payload", body = Error),
        (status = 401, description = "Not signed in", body = Error),
        (status = 403, description = "Admin role required", body = Error)
    ),
    tags = ["merchandise"],
    operation_id = "createMerchandise"
)]
#[post("/merch", wrap = "RequireSession::admin()")]
pub async fn create_merchandise(
    state: web::Data<HttpState>,
    form: FormSubmission<MerchandiseLayout>,
) -> ApiResult<HttpResponse> {
    let draft = form.validate(&MerchandiseCreationSchema)?;
    let item = state.merchandise.create(draft, form.into_files()).await?;
    Ok(HttpResponse::Created().json(MerchandiseMutationResponse {
        message: format!("{} has been added to the merchandise", item.name()),
        item,
    }))
}

/// Update a merchandise item. Uploaded images replace the current ones.
#[utoipa::path(
    patch,
    path = "/api/v1/merch/{id}",
    params(("id" = String, Path, description = "Merchandise identifier")),
    request_body(content = MerchandiseFieldsSchema, description = "Changed fields; multipart `merch` + `images` when uploading"),
    responses(
        (status = 200, description = "Updated", body = MerchandiseMutationResponse),
        (status = 400, description = "Invalid payload", body = Error),
        (status = 401, description = "Not signed in", body = Error),
        (status = 403, description = "Admin role required", body = Error),
        (status = 404, description = "Unknown item", body = Error)
    ),
    tags = ["merchandise"],
    operation_id = "updateMerchandise"
)]
#[patch("/merch/{id}", wrap = "RequireSession::admin()")]
pub async fn update_merchandise(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    form: FormSubmission<MerchandiseLayout>,
) -> ApiResult<web::Json<MerchandiseMutationResponse>> {
    let id = MerchandisePathIdSchema.validate(path.as_str())?;
    let schema = if form.has_files() {
        MerchandiseRevisionSchema::default().allowing_empty()
    } else {
        MerchandiseRevisionSchema::default()
    };
    let patch = form.validate(&schema)?;
    let item = state
        .merchandise
        .update(id, patch, form.into_files())
        .await?;
    Ok(web::Json(MerchandiseMutationResponse {
        message: format!("{} has been updated", item.name()),
        item,
    }))
}

/// Delete a merchandise item and its images.
#[utoipa::path(
    delete,
    path = "/api/v1/merch/{id}",
    params(("id" = String, Path, description = "Merchandise identifier")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 400, description = "Malformed id", body = Error),
        (status = 401, description = "Not signed in", body = Error),
        (status = 403, description = "Admin role required", body = Error),
        (status = 404, description = "Unknown item", body = Error)
    ),
    tags = ["merchandise"],
    operation_id = "deleteMerchandise"
)]
#[delete("/merch/{id}", wrap = "RequireSession::admin()")]
pub async fn delete_merchandise(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageResponse>> {
    let id = MerchandiseDeletionSchema.validate(path.as_str())?;
    state.merchandise.delete(id).await?;
    Ok(web::Json(MessageResponse::new("Merchandise item deleted")))
}

#[cfg(test)]
mod tests;
