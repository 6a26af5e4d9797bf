//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **memory**: lock-guarded in-memory accounts, merchandise and profiles
//! - **storage**: filesystem image store sandboxed with `cap_std`
//!
//! Adapters are thin translators between domain types and infrastructure.
//! They contain no business logic.

pub mod memory;
pub mod storage;
