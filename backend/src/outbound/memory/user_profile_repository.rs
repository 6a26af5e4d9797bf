//! In-memory `UserProfileRepository` adapter.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{UserProfilePersistenceError, UserProfileRepository};
use crate::domain::{Rfid, UserId, UserProfile};

/// Profile store backed by a locked hash map.
#[derive(Debug, Default)]
pub struct InMemoryUserProfileRepository {
    profiles: RwLock<HashMap<UserId, UserProfile>>,
}

impl InMemoryUserProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Reject `profile` when a different profile already holds its RFID.
fn check_rfid(
    profiles: &HashMap<UserId, UserProfile>,
    profile: &UserProfile,
) -> Result<(), UserProfilePersistenceError> {
    let Some(rfid) = profile.rfid() else {
        return Ok(());
    };
    let taken = profiles
        .values()
        .any(|other| other.id() != profile.id() && other.rfid() == Some(rfid));
    if taken {
        return Err(UserProfilePersistenceError::duplicate_rfid(AsRef::<str>::as_ref(rfid)));
    }
    Ok(())
}

#[async_trait]
impl UserProfileRepository for InMemoryUserProfileRepository {
    async fn list(&self) -> Result<Vec<UserProfile>, UserProfilePersistenceError> {
        let mut profiles: Vec<UserProfile> =
            self.profiles.read().await.values().cloned().collect();
        profiles.sort_by(|a, b| {
            a.lastname()
                .cmp(b.lastname())
                .then_with(|| a.firstname().cmp(b.firstname()))
        });
        Ok(profiles)
    }

    async fn find_by_id(
        &self,
        id: &UserId,
    ) -> Result<Option<UserProfile>, UserProfilePersistenceError> {
        Ok(self.profiles.read().await.get(id).cloned())
    }

    async fn find_by_rfid(
        &self,
        rfid: &Rfid,
    ) -> Result<Option<UserProfile>, UserProfilePersistenceError> {
        Ok(self
            .profiles
            .read()
            .await
            .values()
            .find(|profile| profile.rfid() == Some(rfid))
            .cloned())
    }

    async fn save(&self, profile: &UserProfile) -> Result<(), UserProfilePersistenceError> {
        let mut profiles = self.profiles.write().await;
        check_rfid(&profiles, profile)?;
        profiles.insert(profile.id(), profile.clone());
        Ok(())
    }

    async fn replace(&self, profile: &UserProfile) -> Result<bool, UserProfilePersistenceError> {
        let mut profiles = self.profiles.write().await;
        if !profiles.contains_key(&profile.id()) {
            return Ok(false);
        }
        check_rfid(&profiles, profile)?;
        profiles.insert(profile.id(), profile.clone());
        Ok(true)
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserProfilePersistenceError> {
        Ok(self.profiles.write().await.remove(id).is_some())
    }
}
