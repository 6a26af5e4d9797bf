//! Client-side form schemas.
//!
//! Each form checks what a user can get wrong before anything is sent, then
//! resolves itself into a [`MutationPayload`]. The server validates again;
//! these checks only spare a round trip.

use serde_json::{Map, Value, json};
use thiserror::Error;

use crate::models::Course;
use crate::payload::{FileUpload, FormLayout, MutationPayload};

const NAME_MIN: usize = 2;
const DISCOUNT_MAX: f64 = 100.0;
const RATINGS_MAX: f64 = 5.0;

/// A field the client schema rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FormError {
    /// Wire name of the offending field.
    pub field: &'static str,
    /// Message shown to the user.
    pub message: String,
}

impl FormError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// A submittable form.
pub trait PortalForm {
    /// Multipart field names for this form.
    const LAYOUT: FormLayout;

    /// Check the form before submission.
    ///
    /// # Errors
    /// Returns the first [`FormError`] found.
    fn validate(&self) -> Result<(), FormError>;

    /// Resolve the form into a request body.
    fn into_payload(self) -> MutationPayload;
}

fn require_text(field: &'static str, value: &str) -> Result<(), FormError> {
    if value.trim().is_empty() {
        return Err(FormError::new(field, format!("{field} is required")));
    }
    Ok(())
}

fn check_price(price: f64) -> Result<(), FormError> {
    if !price.is_finite() || price < 0.0 {
        return Err(FormError::new("price", "price must be a non-negative number"));
    }
    Ok(())
}

/// NaN means "no discount" and passes.
fn check_discount(discount: Option<f64>) -> Result<(), FormError> {
    match discount {
        Some(value) if !value.is_nan() && !(0.0..=DISCOUNT_MAX).contains(&value) => Err(
            FormError::new("discount", "discount must be between 0 and 100"),
        ),
        _ => Ok(()),
    }
}

fn insert_discount(fields: &mut Map<String, Value>, discount: Option<f64>) {
    if let Some(value) = discount.filter(|value| !value.is_nan()) {
        fields.insert("discount".to_owned(), json!(value));
    }
}

fn insert_text(fields: &mut Map<String, Value>, key: &str, value: Option<String>) {
    if let Some(text) = value {
        fields.insert(key.to_owned(), Value::String(text));
    }
}

/// New merchandise item.
#[derive(Debug, Clone, PartialEq)]
pub struct MerchandiseForm {
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Price before discount.
    pub price: f64,
    /// Discount percentage; `None` or NaN for no discount.
    pub discount: Option<f64>,
    /// Units in stock.
    pub stocks: Option<u32>,
    /// Size label.
    pub size: Option<String>,
    /// Colour label.
    pub color: Option<String>,
    /// Attached images.
    pub images: Vec<FileUpload>,
}

impl MerchandiseForm {
    /// Form with the required fields set.
    pub fn new(name: impl Into<String>, description: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            price,
            discount: None,
            stocks: None,
            size: None,
            color: None,
            images: Vec::new(),
        }
    }
}

impl PortalForm for MerchandiseForm {
    const LAYOUT: FormLayout = FormLayout::MERCHANDISE;

    fn validate(&self) -> Result<(), FormError> {
        require_text("name", &self.name)?;
        require_text("description", &self.description)?;
        check_price(self.price)?;
        check_discount(self.discount)
    }

    fn into_payload(self) -> MutationPayload {
        let mut fields = Map::new();
        fields.insert("name".to_owned(), Value::String(self.name));
        fields.insert("description".to_owned(), Value::String(self.description));
        fields.insert("price".to_owned(), json!(self.price));
        insert_discount(&mut fields, self.discount);
        if let Some(stocks) = self.stocks {
            fields.insert("stocks".to_owned(), json!(stocks));
        }
        insert_text(&mut fields, "size", self.size);
        insert_text(&mut fields, "color", self.color);
        MutationPayload::resolve(Self::LAYOUT, fields, self.images)
    }
}

/// Partial update of a merchandise item.
///
/// Attached images replace the item's current images.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MerchandiseRevisionForm {
    /// New display name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New price.
    pub price: Option<f64>,
    /// New discount percentage.
    pub discount: Option<f64>,
    /// New stock count.
    pub stocks: Option<u32>,
    /// New size label.
    pub size: Option<String>,
    /// New colour label.
    pub color: Option<String>,
    /// New rating, 0 to 5.
    pub ratings: Option<f64>,
    /// Replacement images.
    pub images: Vec<FileUpload>,
}

impl MerchandiseRevisionForm {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.discount.is_none()
            && self.stocks.is_none()
            && self.size.is_none()
            && self.color.is_none()
            && self.ratings.is_none()
            && self.images.is_empty()
    }
}

impl PortalForm for MerchandiseRevisionForm {
    const LAYOUT: FormLayout = FormLayout::MERCHANDISE;

    fn validate(&self) -> Result<(), FormError> {
        if self.is_empty() {
            return Err(FormError::new("body", "nothing to update"));
        }
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        if let Some(description) = &self.description {
            require_text("description", description)?;
        }
        if let Some(price) = self.price {
            check_price(price)?;
        }
        check_discount(self.discount)?;
        match self.ratings {
            Some(ratings) if !(0.0..=RATINGS_MAX).contains(&ratings) => Err(FormError::new(
                "ratings",
                "ratings must be between 0 and 5",
            )),
            _ => Ok(()),
        }
    }

    fn into_payload(self) -> MutationPayload {
        let mut fields = Map::new();
        insert_text(&mut fields, "name", self.name);
        insert_text(&mut fields, "description", self.description);
        if let Some(price) = self.price {
            fields.insert("price".to_owned(), json!(price));
        }
        insert_discount(&mut fields, self.discount);
        if let Some(stocks) = self.stocks {
            fields.insert("stocks".to_owned(), json!(stocks));
        }
        insert_text(&mut fields, "size", self.size);
        insert_text(&mut fields, "color", self.color);
        if let Some(ratings) = self.ratings {
            fields.insert("ratings".to_owned(), json!(ratings));
        }
        MutationPayload::resolve(Self::LAYOUT, fields, self.images)
    }
}

/// Partial update of a member profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    /// New given name.
    pub firstname: Option<String>,
    /// New family name.
    pub lastname: Option<String>,
    /// New contact email.
    pub email: Option<String>,
    /// New course.
    pub course: Option<Course>,
    /// New year level, 1 to 4.
    pub year: Option<u8>,
    /// New RFID tag.
    pub rfid: Option<String>,
    /// Directory visibility.
    pub show_public: Option<bool>,
    /// Replacement avatar.
    pub avatar: Option<FileUpload>,
}

impl ProfileForm {
    fn is_empty(&self) -> bool {
        self.firstname.is_none()
            && self.lastname.is_none()
            && self.email.is_none()
            && self.course.is_none()
            && self.year.is_none()
            && self.rfid.is_none()
            && self.show_public.is_none()
            && self.avatar.is_none()
    }
}

fn check_name(field: &'static str, value: &str) -> Result<(), FormError> {
    if value.trim().chars().count() < NAME_MIN {
        return Err(FormError::new(
            field,
            format!("{field} must be at least {NAME_MIN} characters"),
        ));
    }
    Ok(())
}

fn check_email(value: &str) -> Result<(), FormError> {
    let valid = value
        .trim()
        .split_once('@')
        .is_some_and(|(local, domain)| {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        });
    if valid {
        Ok(())
    } else {
        Err(FormError::new("email", "email must be a valid address"))
    }
}

impl PortalForm for ProfileForm {
    const LAYOUT: FormLayout = FormLayout::PROFILE;

    fn validate(&self) -> Result<(), FormError> {
        if self.is_empty() {
            return Err(FormError::new("body", "nothing to update"));
        }
        if let Some(firstname) = &self.firstname {
            check_name("firstname", firstname)?;
        }
        if let Some(lastname) = &self.lastname {
            check_name("lastname", lastname)?;
        }
        if let Some(email) = &self.email {
            check_email(email)?;
        }
        if self.year.is_some_and(|year| !(1..=4).contains(&year)) {
            return Err(FormError::new("year", "year must be between 1 and 4"));
        }
        if let Some(rfid) = &self.rfid {
            let trimmed = rfid.trim();
            if trimmed.is_empty() || !trimmed.chars().all(char::is_alphanumeric) {
                return Err(FormError::new("rfid", "rfid must be alphanumeric"));
            }
        }
        Ok(())
    }

    fn into_payload(self) -> MutationPayload {
        let mut fields = Map::new();
        insert_text(&mut fields, "firstname", self.firstname);
        insert_text(&mut fields, "lastname", self.lastname);
        insert_text(&mut fields, "email", self.email);
        if let Some(course) = self.course {
            fields.insert("course".to_owned(), json!(course));
        }
        if let Some(year) = self.year {
            fields.insert("year".to_owned(), json!(year));
        }
        insert_text(&mut fields, "rfid", self.rfid);
        if let Some(show_public) = self.show_public {
            fields.insert("showPublic".to_owned(), Value::Bool(show_public));
        }
        MutationPayload::resolve(Self::LAYOUT, fields, self.avatar.into_iter().collect())
    }
}
