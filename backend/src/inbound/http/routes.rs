//! Route table for the versioned API.
//!
//! ```text
//! /api/v1/login, /api/v1/logout
//! /api/v1/merch[/{id}]
//! /api/v1/user[/current-user | /public | /{id}]
//! ```
//!
//! Health checks sit outside the versioned scope and are registered by the
//! server alongside [`super::health::HealthState`].

use actix_web::web;

use super::auth::{login, logout};
use super::merchandise::{
    create_merchandise, delete_merchandise, list_merchandise, update_merchandise,
};
use super::users;

/// Prefix shared by every API route.
pub const API_PREFIX: &str = "/api/v1";

/// Mount the versioned API on `cfg`.
///
/// The caller supplies [`super::state::HttpState`] as app data and wraps the
/// app in the session middleware.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope(API_PREFIX)
            .service(login)
            .service(logout)
            .service(list_merchandise)
            .service(create_merchandise)
            .service(update_merchandise)
            .service(delete_merchandise)
            .configure(users::configure),
    );
}
