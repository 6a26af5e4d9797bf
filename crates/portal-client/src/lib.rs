//! Typed client for the campus portal API.
//!
//! The crate mirrors what the portal frontend does around each request:
//! forms are checked against a client-side schema, resolved into a JSON or
//! multipart [`MutationPayload`], sent through [`MerchandiseApi`] or
//! [`UserApi`], and the outcome invalidates cached reads and raises a
//! [`Notification`]. It is independent of the backend crate and speaks only
//! the wire format.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use portal_client::{MerchandiseForm, PortalContext, PortalHttp, TracingNotifier};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let http = PortalHttp::new("http://localhost:8080")?;
//! let ctx = PortalContext::new(http, Arc::new(TracingNotifier));
//! ctx.sign_in("admin", "password").await?;
//!
//! let form = MerchandiseForm::new("Shirt", "Blue shirt", 150.0);
//! ctx.mutations().create_merchandise(form).await?;
//!
//! let catalogue = ctx.merchandise_list(None).await?;
//! assert_eq!(catalogue.merchandise.len(), 1);
//! # Ok(())
//! # }
//! ```

mod cache;
mod context;
mod error;
mod flow;
mod forms;
mod http;
mod models;
mod notify;
mod payload;
mod resources;

pub use cache::{QueryCache, QueryKey, Resource};
pub use context::PortalContext;
pub use error::{ApiErrorBody, ClientError, GENERIC_FAILURE_MESSAGE};
pub use flow::{FlowError, MutationFlow};
pub use forms::{FormError, MerchandiseForm, MerchandiseRevisionForm, PortalForm, ProfileForm};
pub use http::{API_PREFIX, PortalHttp};
pub use models::{
    Acknowledged, Course, ImageRef, LoginResponse, MerchandiseItem, MerchandiseList, Mutation,
    MutationAck, Principal, PublicProfile, Role, UserPage, UserProfile,
};
pub use notify::{Notification, NotificationKind, NotificationLog, Notifier, TracingNotifier};
pub use payload::{FileUpload, FormLayout, MutationPayload, PayloadPart};
pub use resources::{MerchandiseApi, UserApi};
