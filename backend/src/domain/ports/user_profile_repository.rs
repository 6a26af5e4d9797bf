//! Driven port for member profile persistence.

use async_trait::async_trait;

use crate::domain::{Rfid, UserId, UserProfile};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by profile repository adapters.
    pub enum UserProfilePersistenceError {
        /// Store could not be reached.
        Connection { message: String } => "profile repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "profile repository query failed: {message}",
        /// Another profile already holds the RFID being written.
        DuplicateRfid { rfid: String } => "rfid {rfid} is held by another profile",
    }
}

/// Storage for member profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileRepository: Send + Sync {
    /// Every profile, ordered by last name then first name.
    async fn list(&self) -> Result<Vec<UserProfile>, UserProfilePersistenceError>;

    /// Fetch one profile.
    async fn find_by_id(
        &self,
        id: &UserId,
    ) -> Result<Option<UserProfile>, UserProfilePersistenceError>;

    /// Profile holding `rfid`, if any.
    async fn find_by_rfid(
        &self,
        rfid: &Rfid,
    ) -> Result<Option<UserProfile>, UserProfilePersistenceError>;

    /// Insert or overwrite a profile.
    ///
    /// Fails with `DuplicateRfid` when another profile holds its RFID.
    async fn save(&self, profile: &UserProfile) -> Result<(), UserProfilePersistenceError>;

    /// Overwrite a stored profile, checking RFID ownership in the same write.
    ///
    /// Returns `false` when the profile no longer exists; nothing is written.
    async fn replace(&self, profile: &UserProfile) -> Result<bool, UserProfilePersistenceError>;

    /// Remove a profile. Returns `false` when it did not exist.
    async fn delete(&self, id: &UserId) -> Result<bool, UserProfilePersistenceError>;
}
