//! Merchandise catalogue model.
//!
//! Items are created by administrators, revised through partial patches and
//! listed publicly. Prices are plain decimal amounts; discounts are optional
//! percentages where an absent value means the item is sold at full price.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::ImageRef;

/// Lowest accepted price.
pub const PRICE_MIN: f64 = 0.0;
/// Accepted discount range, in percent.
pub const DISCOUNT_RANGE: std::ops::RangeInclusive<f64> = 0.0..=100.0;
/// Accepted rating range.
pub const RATINGS_RANGE: std::ops::RangeInclusive<f64> = 0.0..=5.0;

/// Stable merchandise identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MerchandiseId(Uuid);

impl MerchandiseId {
    /// Generate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for MerchandiseId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl FromStr for MerchandiseId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl fmt::Display for MerchandiseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A merchandise item as stored and returned to clients.
///
/// ## Invariants
/// - `name` and `description` are non-empty once trimmed.
/// - `price` is finite and not negative.
/// - `discount`, when present, lies within [`DISCOUNT_RANGE`].
/// - `ratings` lies within [`RATINGS_RANGE`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MerchandiseItem {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: MerchandiseId,
    #[schema(example = "Shirt")]
    name: String,
    #[schema(example = "Blue shirt")]
    description: String,
    #[schema(example = 150.0)]
    price: f64,
    #[schema(example = 10.0)]
    discount: Option<f64>,
    stocks: u32,
    images: Vec<ImageRef>,
    size: String,
    color: String,
    ratings: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MerchandiseItem {
    /// Stable identifier.
    pub fn id(&self) -> MerchandiseId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Long-form description.
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Price before discount.
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Discount percentage, if any.
    pub fn discount(&self) -> Option<f64> {
        self.discount
    }

    /// Units in stock.
    pub fn stocks(&self) -> u32 {
        self.stocks
    }

    /// Ordered image references.
    pub fn images(&self) -> &[ImageRef] {
        &self.images
    }

    /// Free-form size label.
    pub fn size(&self) -> &str {
        self.size.as_str()
    }

    /// Free-form colour label.
    pub fn color(&self) -> &str {
        self.color.as_str()
    }

    /// Average rating.
    pub fn ratings(&self) -> f64 {
        self.ratings
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last modification timestamp.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Swap the image list, returning the previous one.
    pub fn replace_images(&mut self, images: Vec<ImageRef>) -> Vec<ImageRef> {
        std::mem::replace(&mut self.images, images)
    }

    /// Apply a validated patch and bump `updated_at`.
    pub fn apply(&mut self, patch: MerchandisePatch, now: DateTime<Utc>) {
        let MerchandisePatch {
            name,
            description,
            price,
            discount,
            stocks,
            size,
            color,
            ratings,
        } = patch;
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(price) = price {
            self.price = price;
        }
        if let Some(discount) = discount {
            self.discount = discount;
        }
        if let Some(stocks) = stocks {
            self.stocks = stocks;
        }
        if let Some(size) = size {
            self.size = size;
        }
        if let Some(color) = color {
            self.color = color;
        }
        if let Some(ratings) = ratings {
            self.ratings = ratings;
        }
        self.updated_at = now;
    }
}

/// Validated creation payload.
#[derive(Debug, Clone, PartialEq)]
pub struct MerchandiseDraft {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) price: f64,
    pub(crate) discount: Option<f64>,
    pub(crate) stocks: u32,
    pub(crate) size: String,
    pub(crate) color: String,
}

impl MerchandiseDraft {
    /// Display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Long-form description.
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Price before discount.
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Discount percentage, if any.
    pub fn discount(&self) -> Option<f64> {
        self.discount
    }

    /// Turn the draft into a stored item.
    pub fn into_item(
        self,
        id: MerchandiseId,
        images: Vec<ImageRef>,
        now: DateTime<Utc>,
    ) -> MerchandiseItem {
        MerchandiseItem {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            discount: self.discount,
            stocks: self.stocks,
            images,
            size: self.size,
            color: self.color,
            ratings: 0.0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Validated partial update.
///
/// `discount` is doubly optional: `Some(None)` clears an existing discount.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MerchandisePatch {
    pub(crate) name: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) price: Option<f64>,
    pub(crate) discount: Option<Option<f64>>,
    pub(crate) stocks: Option<u32>,
    pub(crate) size: Option<String>,
    pub(crate) color: Option<String>,
    pub(crate) ratings: Option<f64>,
}

impl MerchandisePatch {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Listing filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MerchandiseFilter {
    search: Option<String>,
}

impl MerchandiseFilter {
    /// Filter by a case-insensitive substring; blank input matches everything.
    pub fn new(search: Option<&str>) -> Self {
        let search = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        Self { search }
    }

    /// Normalised search term.
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Whether `item` passes the filter.
    pub fn matches(&self, item: &MerchandiseItem) -> bool {
        self.search.as_deref().is_none_or(|needle| {
            item.name.to_lowercase().contains(needle)
                || item.description.to_lowercase().contains(needle)
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
            .single()
            .expect("valid fixture timestamp")
    }

    #[fixture]
    fn item(now: DateTime<Utc>) -> MerchandiseItem {
        MerchandiseDraft {
            name: "Shirt".into(),
            description: "Blue shirt".into(),
            price: 150.0,
            discount: Some(10.0),
            stocks: 4,
            size: "M".into(),
            color: "blue".into(),
        }
        .into_item(MerchandiseId::random(), Vec::new(), now)
    }

    #[rstest]
    fn draft_becomes_unrated_item(item: MerchandiseItem, now: DateTime<Utc>) {
        assert_eq!(item.ratings(), 0.0);
        assert_eq!(item.created_at(), now);
        assert_eq!(item.updated_at(), now);
    }

    #[rstest]
    fn patch_updates_only_present_fields(mut item: MerchandiseItem, now: DateTime<Utc>) {
        let later = now + chrono::Duration::minutes(5);
        item.apply(
            MerchandisePatch {
                price: Some(120.0),
                discount: Some(None),
                ..MerchandisePatch::default()
            },
            later,
        );
        assert_eq!(item.price(), 120.0);
        assert_eq!(item.discount(), None);
        assert_eq!(item.name(), "Shirt");
        assert_eq!(item.updated_at(), later);
    }

    #[rstest]
    #[case(None, true)]
    #[case(Some("  "), true)]
    #[case(Some("SHIRT"), true)]
    #[case(Some("blue"), true)]
    #[case(Some("mug"), false)]
    fn filter_matches_name_or_description(
        item: MerchandiseItem,
        #[case] search: Option<&str>,
        #[case] expected: bool,
    ) {
        assert_eq!(MerchandiseFilter::new(search).matches(&item), expected);
    }

    #[rstest]
    fn serialises_camel_case(item: MerchandiseItem) {
        let value = serde_json::to_value(&item).expect("serialise");
        assert!(value.get("createdAt").is_some());
        assert_eq!(value["discount"], 10.0);
        assert_eq!(value["images"], serde_json::json!([]));
    }
}
