//! Member profile model.
//!
//! Profiles belong to accounts created elsewhere; this module only covers the
//! fields members and administrators can edit, and the public projection
//! shown on the members directory.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::ImageRef;

/// Minimum length of first and last names.
pub const NAME_MIN: usize = 2;
/// Profiles returned per page by the admin listing.
pub const USERS_PAGE_SIZE: usize = 10;

/// Validation errors returned by the profile value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Identifier was not a UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// Name shorter than [`NAME_MIN`] once trimmed.
    #[error("name must be at least {min} characters")]
    NameTooShort {
        /// Required minimum.
        min: usize,
    },
    /// Email did not look like `local@domain.tld`.
    #[error("email must be a valid email address")]
    InvalidEmail,
    /// Course code not offered.
    #[error("course must be one of BSIT, BSCS, ACT")]
    UnknownCourse,
    /// Year level outside 1 to 4.
    #[error("year must be between 1 and 4")]
    InvalidYear,
    /// RFID contained characters other than ASCII letters and digits.
    #[error("rfid may only contain letters and digits")]
    InvalidRfid,
}

/// Stable user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from text.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        id.as_ref().parse()
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl FromStr for UserId {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() != s {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Degree programme offered by the organisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Course {
    /// BS Information Technology.
    Bsit,
    /// BS Computer Science.
    Bscs,
    /// Associate in Computer Technology.
    Act,
}

impl FromStr for Course {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BSIT" => Ok(Self::Bsit),
            "BSCS" => Ok(Self::Bscs),
            "ACT" => Ok(Self::Act),
            _ => Err(UserValidationError::UnknownCourse),
        }
    }
}

/// Year level, 1 to 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "u8", into = "u8")]
#[schema(value_type = u8)]
pub struct AcademicYear(u8);

impl AcademicYear {
    /// Numeric year level.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for AcademicYear {
    type Error = UserValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (1..=4).contains(&value) {
            Ok(Self(value))
        } else {
            Err(UserValidationError::InvalidYear)
        }
    }
}

impl From<AcademicYear> for u8 {
    fn from(value: AcademicYear) -> Self {
        value.0
    }
}

impl FromStr for AcademicYear {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .map_err(|_| UserValidationError::InvalidYear)
            .and_then(Self::try_from)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Contact email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise an address. The domain part is lower-cased.
    pub fn new(raw: &str) -> Result<Self, UserValidationError> {
        let trimmed = raw.trim();
        if !email_regex().is_match(trimmed) {
            return Err(UserValidationError::InvalidEmail);
        }
        let normalised = match trimmed.rsplit_once('@') {
            Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
            None => return Err(UserValidationError::InvalidEmail),
        };
        Ok(Self(normalised))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// First or last name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PersonName(String);

impl PersonName {
    /// Trim and check the minimum length.
    pub fn new(raw: &str) -> Result<Self, UserValidationError> {
        let trimmed = raw.trim();
        if trimmed.chars().count() < NAME_MIN {
            return Err(UserValidationError::NameTooShort { min: NAME_MIN });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for PersonName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<PersonName> for String {
    fn from(value: PersonName) -> Self {
        value.0
    }
}

/// Campus ID card tag, unique across profiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rfid(String);

impl Rfid {
    /// Validate a tag. Returns `Ok(None)` for blank input, which clears the tag.
    pub fn parse_optional(raw: &str) -> Result<Option<Self>, UserValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(UserValidationError::InvalidRfid);
        }
        Ok(Some(Self(trimmed.to_owned())))
    }
}

impl AsRef<str> for Rfid {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for Rfid {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_optional(&value)?.ok_or(UserValidationError::InvalidRfid)
    }
}

impl From<Rfid> for String {
    fn from(value: Rfid) -> Self {
        value.0
    }
}

/// Full member profile, visible to its owner and administrators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: UserId,
    #[schema(value_type = String, example = "Ada")]
    firstname: PersonName,
    #[schema(value_type = String, example = "Lovelace")]
    lastname: PersonName,
    #[schema(value_type = String, example = "ada@example.edu")]
    email: EmailAddress,
    avatar: Option<ImageRef>,
    course: Option<Course>,
    #[schema(value_type = Option<u8>, minimum = 1, maximum = 4)]
    year: Option<AcademicYear>,
    #[schema(value_type = Option<String>)]
    rfid: Option<Rfid>,
    show_public: bool,
    updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Fresh profile with only the identity fields set.
    pub fn new(
        id: UserId,
        firstname: PersonName,
        lastname: PersonName,
        email: EmailAddress,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            firstname,
            lastname,
            email,
            avatar: None,
            course: None,
            year: None,
            rfid: None,
            show_public: false,
            updated_at: now,
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// First name.
    pub fn firstname(&self) -> &str {
        self.firstname.as_ref()
    }

    /// Last name.
    pub fn lastname(&self) -> &str {
        self.lastname.as_ref()
    }

    /// Contact email.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Avatar, when one was uploaded.
    pub fn avatar(&self) -> Option<&ImageRef> {
        self.avatar.as_ref()
    }

    /// Degree programme.
    pub fn course(&self) -> Option<Course> {
        self.course
    }

    /// Year level.
    pub fn year(&self) -> Option<AcademicYear> {
        self.year
    }

    /// ID card tag.
    pub fn rfid(&self) -> Option<&Rfid> {
        self.rfid.as_ref()
    }

    /// Whether the profile appears on the public directory.
    pub fn show_public(&self) -> bool {
        self.show_public
    }

    /// Last modification timestamp.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Swap the avatar, returning the previous one.
    pub fn replace_avatar(&mut self, avatar: Option<ImageRef>) -> Option<ImageRef> {
        std::mem::replace(&mut self.avatar, avatar)
    }

    /// Case-insensitive match on names and email.
    pub fn matches(&self, needle: &str) -> bool {
        [
            self.firstname.as_ref(),
            self.lastname.as_ref(),
            self.email.as_ref(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
    }

    /// Apply a validated patch and bump `updated_at`.
    pub fn apply(&mut self, patch: ProfilePatch, now: DateTime<Utc>) {
        let ProfilePatch {
            firstname,
            lastname,
            email,
            course,
            year,
            rfid,
            show_public,
        } = patch;
        if let Some(firstname) = firstname {
            self.firstname = firstname;
        }
        if let Some(lastname) = lastname {
            self.lastname = lastname;
        }
        if let Some(email) = email {
            self.email = email;
        }
        if let Some(course) = course {
            self.course = Some(course);
        }
        if let Some(year) = year {
            self.year = Some(year);
        }
        if let Some(rfid) = rfid {
            self.rfid = rfid;
        }
        if let Some(show_public) = show_public {
            self.show_public = show_public;
        }
        self.updated_at = now;
    }
}

/// Directory entry for profiles that opted into public listing.
///
/// Contact email and RFID are never part of this projection.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    #[schema(value_type = String)]
    id: UserId,
    #[schema(value_type = String)]
    firstname: PersonName,
    #[schema(value_type = String)]
    lastname: PersonName,
    avatar: Option<ImageRef>,
    course: Option<Course>,
    #[schema(value_type = Option<u8>, minimum = 1, maximum = 4)]
    year: Option<AcademicYear>,
}

impl PublicProfile {
    /// Project `profile` when it is visible; hidden profiles yield `None`.
    pub fn project(profile: &UserProfile) -> Option<Self> {
        profile.show_public.then(|| Self {
            id: profile.id,
            firstname: profile.firstname.clone(),
            lastname: profile.lastname.clone(),
            avatar: profile.avatar.clone(),
            course: profile.course,
            year: profile.year,
        })
    }

    /// Identifier of the underlying profile.
    pub fn id(&self) -> UserId {
        self.id
    }
}

/// Validated partial profile update.
///
/// `rfid` is doubly optional: `Some(None)` removes the stored tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    pub(crate) firstname: Option<PersonName>,
    pub(crate) lastname: Option<PersonName>,
    pub(crate) email: Option<EmailAddress>,
    pub(crate) course: Option<Course>,
    pub(crate) year: Option<AcademicYear>,
    pub(crate) rfid: Option<Option<Rfid>>,
    pub(crate) show_public: Option<bool>,
}

impl ProfilePatch {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// New RFID value, when the patch sets one.
    pub fn new_rfid(&self) -> Option<&Rfid> {
        self.rfid.as_ref().and_then(Option::as_ref)
    }

    /// New email, when the patch sets one.
    pub fn new_email(&self) -> Option<&EmailAddress> {
        self.email.as_ref()
    }
}

/// Admin listing query: one-based page plus optional search text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserListQuery {
    page: usize,
    search: Option<String>,
}

impl UserListQuery {
    /// Clamp `page` to at least 1 and normalise the search term.
    pub fn new(page: Option<usize>, search: Option<&str>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            search: search
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_lowercase),
        }
    }

    /// One-based page number.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Lower-cased search term.
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }
}

impl Default for UserListQuery {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of the admin user listing.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPage {
    users: Vec<UserProfile>,
    page: usize,
    total_pages: usize,
    total: usize,
}

impl UserPage {
    /// Slice `matching` into the requested page.
    pub fn paginate(matching: Vec<UserProfile>, page: usize) -> Self {
        let total = matching.len();
        let total_pages = total.div_ceil(USERS_PAGE_SIZE).max(1);
        let users = matching
            .into_iter()
            .skip(page.saturating_sub(1).saturating_mul(USERS_PAGE_SIZE))
            .take(USERS_PAGE_SIZE)
            .collect();
        Self {
            users,
            page,
            total_pages,
            total,
        }
    }

    /// Profiles on this page.
    pub fn users(&self) -> &[UserProfile] {
        &self.users
    }

    /// Total page count, at least 1.
    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Number of matching profiles across all pages.
    pub fn total(&self) -> usize {
        self.total
    }
}
