//! Wire models returned by the portal API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored image: public URL plus storage-provider identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    /// Public URL of the image.
    pub image: String,
    /// Identifier used by the server to delete the stored object.
    pub image_public_id: String,
}

/// One catalogue entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchandiseItem {
    /// Item identifier (UUID).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Price before discount.
    pub price: f64,
    /// Discount percentage, absent when the item is not discounted.
    #[serde(default)]
    pub discount: Option<f64>,
    /// Units in stock.
    #[serde(default)]
    pub stocks: u32,
    /// Images in display order.
    #[serde(default)]
    pub images: Vec<ImageRef>,
    /// Size label.
    #[serde(default)]
    pub size: String,
    /// Colour label.
    #[serde(default)]
    pub color: String,
    /// Average rating, 0 to 5.
    #[serde(default)]
    pub ratings: f64,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// `GET /merch` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchandiseList {
    /// Matching items, newest first.
    pub merchandise: Vec<MerchandiseItem>,
}

/// Account role carried by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular member.
    Member,
    /// Organisation officer.
    Admin,
}

/// Signed-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    /// Profile identifier of the account.
    pub user_id: String,
    /// Role granted to the session.
    pub role: Role,
}

/// `POST /login` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Confirmation shown to the user.
    pub message: String,
    /// The account now bound to the session cookie.
    pub user: Principal,
}

/// Degree programme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Course {
    /// BS Information Technology.
    Bsit,
    /// BS Computer Science.
    Bscs,
    /// Associate in Computer Technology.
    Act,
}

/// Full profile, visible to its owner and officers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Profile identifier (UUID).
    pub id: String,
    /// Given name.
    pub firstname: String,
    /// Family name.
    pub lastname: String,
    /// Contact email.
    pub email: String,
    /// Avatar image, if uploaded.
    #[serde(default)]
    pub avatar: Option<ImageRef>,
    /// Enrolled course.
    #[serde(default)]
    pub course: Option<Course>,
    /// Year level, 1 to 4.
    #[serde(default)]
    pub year: Option<u8>,
    /// RFID tag bound to the member card.
    #[serde(default)]
    pub rfid: Option<String>,
    /// Whether the profile appears in the public directory.
    #[serde(default)]
    pub show_public: bool,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Public directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    /// Profile identifier (UUID).
    pub id: String,
    /// Given name.
    pub firstname: String,
    /// Family name.
    pub lastname: String,
    /// Avatar image, if uploaded.
    #[serde(default)]
    pub avatar: Option<ImageRef>,
    /// Enrolled course.
    #[serde(default)]
    pub course: Option<Course>,
    /// Year level.
    #[serde(default)]
    pub year: Option<u8>,
}

/// One page of the officer user listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPage {
    /// Profiles on this page.
    pub users: Vec<UserProfile>,
    /// One-based page number.
    pub page: usize,
    /// Number of pages for the current search.
    pub total_pages: usize,
    /// Number of matching profiles.
    pub total: usize,
}

/// Mutation response carrying the stored entity.
///
/// The server nests the entity under `item` for merchandise and `user` for
/// profiles; both decode into [`Mutation::entity`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mutation<T> {
    /// Confirmation shown to the user.
    pub message: String,
    /// Entity as stored after the mutation.
    #[serde(alias = "item", alias = "user")]
    pub entity: T,
}

/// Mutation response without an entity, such as a delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationAck {
    /// Confirmation shown to the user.
    pub message: String,
}

/// Responses that carry a message for the success notification.
pub trait Acknowledged {
    /// Server-provided confirmation.
    fn message(&self) -> &str;
}

impl<T> Acknowledged for Mutation<T> {
    fn message(&self) -> &str {
        self.message.as_str()
    }
}

impl Acknowledged for MutationAck {
    fn message(&self) -> &str {
        self.message.as_str()
    }
}

#[derive(Deserialize)]
pub(crate) struct UserEnvelope {
    pub(crate) user: UserProfile,
}

#[derive(Deserialize)]
pub(crate) struct PublicUsersEnvelope {
    pub(crate) users: Vec<PublicProfile>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!({"message": "Org shirt has been updated", "item": {"id": "1"}}))]
    #[case(json!({"message": "Profile updated", "user": {"id": "1"}}))]
    fn mutation_entity_accepts_either_envelope(#[case] body: serde_json::Value) {
        let decoded: Mutation<serde_json::Value> =
            serde_json::from_value(body).expect("mutation body");
        assert_eq!(decoded.entity, json!({"id": "1"}));
    }

    #[rstest]
    fn merchandise_defaults_fill_omitted_fields() {
        let item: MerchandiseItem = serde_json::from_value(json!({
            "id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
            "name": "Shirt",
            "description": "Blue shirt",
            "price": 150.0,
            "createdAt": "2026-03-01T09:00:00Z",
            "updatedAt": "2026-03-01T09:00:00Z"
        }))
        .expect("item");
        assert_eq!(item.discount, None);
        assert_eq!(item.stocks, 0);
        assert!(item.images.is_empty());
    }
}
