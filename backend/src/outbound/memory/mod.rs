//! In-memory adapters for accounts, merchandise and profiles.
//!
//! Each adapter guards its map with a `tokio` read-write lock. Data is lost
//! on restart; a database-backed adapter would implement the same ports.

mod account_store;
mod merchandise_repository;
mod user_profile_repository;

pub use account_store::InMemoryAccountStore;
pub use merchandise_repository::InMemoryMerchandiseRepository;
pub use user_profile_repository::InMemoryUserProfileRepository;
