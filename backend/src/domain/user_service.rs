//! Member profile domain service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::merchandise_service::{discard, map_image_error};
use crate::domain::ports::{
    ImageStore, UserProfileCommand, UserProfilePersistenceError, UserProfileQuery,
    UserProfileRepository,
};
use crate::domain::{
    Error, ImageFolder, ImageUpload, ProfilePatch, PublicProfile, UserId, UserListQuery, UserPage,
    UserProfile,
};

/// Profile service implementing [`UserProfileCommand`] and
/// [`UserProfileQuery`].
#[derive(Clone)]
pub struct UserProfileService<R, S> {
    repo: Arc<R>,
    images: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<R, S> UserProfileService<R, S> {
    /// Create a new service.
    pub fn new(repo: Arc<R>, images: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repo,
            images,
            clock,
        }
    }
}

fn rfid_taken() -> Error {
    Error::conflict("rfid is already registered to another member")
        .with_details(json!({ "field": "rfid", "code": "duplicate" }))
}

fn map_persistence_error(error: UserProfilePersistenceError) -> Error {
    match error {
        UserProfilePersistenceError::DuplicateRfid { .. } => rfid_taken(),
        UserProfilePersistenceError::Connection { message } => {
            Error::service_unavailable(format!("profile repository unavailable: {message}"))
        }
        UserProfilePersistenceError::Query { message } => {
            Error::internal(format!("profile repository error: {message}"))
        }
    }
}

fn not_found(id: UserId) -> Error {
    Error::not_found(format!("user {id} not found"))
}

impl<R, S> UserProfileService<R, S>
where
    R: UserProfileRepository,
    S: ImageStore,
{
    async fn load(&self, id: UserId) -> Result<UserProfile, Error> {
        self.repo
            .find_by_id(&id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| not_found(id))
    }

    /// Early rejection before any upload; the repository re-checks on write.
    async fn ensure_rfid_free(&self, id: UserId, patch: &ProfilePatch) -> Result<(), Error> {
        let Some(rfid) = patch.new_rfid() else {
            return Ok(());
        };
        let holder = self
            .repo
            .find_by_rfid(rfid)
            .await
            .map_err(map_persistence_error)?;
        match holder {
            Some(other) if other.id() != id => Err(rfid_taken()),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<R, S> UserProfileCommand for UserProfileService<R, S>
where
    R: UserProfileRepository,
    S: ImageStore,
{
    async fn update(
        &self,
        id: UserId,
        patch: ProfilePatch,
        avatar: Option<ImageUpload>,
    ) -> Result<UserProfile, Error> {
        let mut profile = self.load(id).await?;
        self.ensure_rfid_free(id, &patch).await?;
        profile.apply(patch, self.clock.utc());

        let previous = match &avatar {
            Some(upload) => {
                let stored = self
                    .images
                    .store(ImageFolder::Avatars, upload)
                    .await
                    .map_err(map_image_error)?;
                profile.replace_avatar(Some(stored))
            }
            None => None,
        };

        let written = self.repo.replace(&profile).await;
        if !matches!(written, Ok(true)) && avatar.is_some() {
            discard(self.images.as_ref(), profile.avatar().cloned().as_slice()).await;
        }
        if !written.map_err(map_persistence_error)? {
            return Err(not_found(id));
        }
        if avatar.is_some() {
            discard(self.images.as_ref(), previous.as_slice()).await;
        }
        info!(%id, avatar_replaced = avatar.is_some(), "profile updated");
        Ok(profile)
    }

    async fn delete(&self, id: UserId) -> Result<(), Error> {
        let profile = self.load(id).await?;
        let removed = self
            .repo
            .delete(&id)
            .await
            .map_err(map_persistence_error)?;
        if !removed {
            return Err(not_found(id));
        }
        discard(self.images.as_ref(), profile.avatar().cloned().as_slice()).await;
        info!(%id, "profile deleted");
        Ok(())
    }
}

#[async_trait]
impl<R, S> UserProfileQuery for UserProfileService<R, S>
where
    R: UserProfileRepository,
    S: ImageStore,
{
    async fn fetch(&self, id: &UserId) -> Result<UserProfile, Error> {
        self.load(*id).await
    }

    async fn list(&self, query: &UserListQuery) -> Result<UserPage, Error> {
        let profiles = self.repo.list().await.map_err(map_persistence_error)?;
        let matching = match query.search() {
            Some(needle) => profiles
                .into_iter()
                .filter(|profile| profile.matches(needle))
                .collect(),
            None => profiles,
        };
        Ok(UserPage::paginate(matching, query.page()))
    }

    async fn list_public(&self) -> Result<Vec<PublicProfile>, Error> {
        let profiles = self.repo.list().await.map_err(map_persistence_error)?;
        Ok(profiles.iter().filter_map(PublicProfile::project).collect())
    }
}
