//! Campus portal backend library.
//!
//! Layered as domain, inbound adapters (HTTP) and outbound adapters (memory
//! and file storage). The binary in `main.rs` wires them into a server.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(test)]
mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Request tracing middleware attaching a trace id to every request.
pub use middleware::Trace;
