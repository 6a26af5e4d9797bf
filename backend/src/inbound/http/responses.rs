//! JSON envelopes returned by the resource handlers.
//!
//! Collections are nested under a named field and every mutation carries a
//! human-readable `message` that clients show verbatim.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{MerchandiseItem, PublicProfile, UserProfile};

/// Bare acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `GET /merch` body.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MerchandiseListResponse {
    pub merchandise: Vec<MerchandiseItem>,
}

/// Body of a merchandise create or update.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MerchandiseMutationResponse {
    pub message: String,
    pub item: MerchandiseItem,
}

/// Single profile, as returned by the current-user and by-id reads.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    pub user: UserProfile,
}

/// Body of a profile update.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserMutationResponse {
    pub message: String,
    pub user: UserProfile,
}

/// `GET /user/public` body.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PublicUsersResponse {
    pub users: Vec<PublicProfile>,
}
