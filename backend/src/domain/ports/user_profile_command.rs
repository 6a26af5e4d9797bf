//! Driving port for profile mutations.

use async_trait::async_trait;

use crate::domain::{Error, ImageUpload, ProfilePatch, UserId, UserProfile};

/// Domain use-case port for editing and removing member profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileCommand: Send + Sync {
    /// Apply `patch` to the profile of `id`, replacing the avatar when one is
    /// supplied.
    ///
    /// # Errors
    ///
    /// Returns `not_found` for unknown profiles and `conflict` when the new
    /// RFID already belongs to someone else.
    async fn update(
        &self,
        id: UserId,
        patch: ProfilePatch,
        avatar: Option<ImageUpload>,
    ) -> Result<UserProfile, Error>;

    /// Remove a profile and its avatar.
    async fn delete(&self, id: UserId) -> Result<(), Error>;
}

/// Fixture command for an empty directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserProfileCommand;

#[async_trait]
impl UserProfileCommand for FixtureUserProfileCommand {
    async fn update(
        &self,
        id: UserId,
        _patch: ProfilePatch,
        _avatar: Option<ImageUpload>,
    ) -> Result<UserProfile, Error> {
        Err(Error::not_found(format!("user {id} not found")))
    }

    async fn delete(&self, id: UserId) -> Result<(), Error> {
        Err(Error::not_found(format!("user {id} not found")))
    }
}
