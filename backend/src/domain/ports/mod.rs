//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`*Command`, `*Query`, [`LoginService`]) are what inbound
//! adapters call. Driven ports (repositories and [`ImageStore`]) are what
//! services call; each exposes a typed error enum so adapters map their
//! failures into predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod image_store;
mod login_service;
mod merchandise_command;
mod merchandise_query;
mod merchandise_repository;
mod user_profile_command;
mod user_profile_query;
mod user_profile_repository;

#[cfg(test)]
pub use image_store::MockImageStore;
pub use image_store::{FixtureImageStore, ImageStore, ImageStoreError};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{
    FIXTURE_ADMIN_ID, FIXTURE_MEMBER_ID, FixtureLoginService, LoginService,
};
#[cfg(test)]
pub use merchandise_command::MockMerchandiseCommand;
pub use merchandise_command::{FixtureMerchandiseCommand, MerchandiseCommand};
#[cfg(test)]
pub use merchandise_query::MockMerchandiseQuery;
pub use merchandise_query::{FixtureMerchandiseQuery, MerchandiseQuery};
#[cfg(test)]
pub use merchandise_repository::MockMerchandiseRepository;
pub use merchandise_repository::{MerchandisePersistenceError, MerchandiseRepository};
#[cfg(test)]
pub use user_profile_command::MockUserProfileCommand;
pub use user_profile_command::{FixtureUserProfileCommand, UserProfileCommand};
#[cfg(test)]
pub use user_profile_query::MockUserProfileQuery;
pub use user_profile_query::{FixtureUserProfileQuery, UserProfileQuery};
#[cfg(test)]
pub use user_profile_repository::MockUserProfileRepository;
pub use user_profile_repository::{UserProfilePersistenceError, UserProfileRepository};
