//! Driving port for profile reads.
//!
//! Covers the signed-in member's own profile, the admin listing and the
//! public directory. The public directory never exposes email or RFID.

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    EmailAddress, Error, PersonName, PublicProfile, UserId, UserListQuery, UserPage, UserProfile,
    UserValidationError,
};

/// Domain use-case port for reading member profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileQuery: Send + Sync {
    /// Profile of `id`.
    ///
    /// # Errors
    ///
    /// Returns `not_found` when the account has no profile.
    async fn fetch(&self, id: &UserId) -> Result<UserProfile, Error>;

    /// One page of profiles matching `query`.
    async fn list(&self, query: &UserListQuery) -> Result<UserPage, Error>;

    /// Profiles that opted into the public directory.
    async fn list_public(&self) -> Result<Vec<PublicProfile>, Error>;
}

/// Fixture query that invents a profile for any requested id.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserProfileQuery;

impl FixtureUserProfileQuery {
    fn profile(id: UserId) -> Result<UserProfile, Error> {
        let invalid =
            |err: UserValidationError| Error::internal(format!("invalid fixture profile: {err}"));
        Ok(UserProfile::new(
            id,
            PersonName::new("Ada").map_err(invalid)?,
            PersonName::new("Lovelace").map_err(invalid)?,
            EmailAddress::new("ada@example.edu").map_err(invalid)?,
            Utc::now(),
        ))
    }
}

#[async_trait]
impl UserProfileQuery for FixtureUserProfileQuery {
    async fn fetch(&self, id: &UserId) -> Result<UserProfile, Error> {
        Self::profile(*id)
    }

    async fn list(&self, query: &UserListQuery) -> Result<UserPage, Error> {
        Ok(UserPage::paginate(Vec::new(), query.page()))
    }

    async fn list_public(&self) -> Result<Vec<PublicProfile>, Error> {
        Ok(Vec::new())
    }
}
