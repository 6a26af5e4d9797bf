//! Request middleware.
//!
//! Purpose: request lifecycle concerns shared by every route: trace
//! correlation and the session guard that gates protected routes.

pub mod auth;
pub mod trace;

pub use auth::RequireSession;
pub use trace::Trace;
