//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` so they depend only on driving
//! ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    FixtureLoginService, FixtureMerchandiseCommand, FixtureMerchandiseQuery,
    FixtureUserProfileCommand, FixtureUserProfileQuery, LoginService, MerchandiseCommand,
    MerchandiseQuery, UserProfileCommand, UserProfileQuery,
};

/// Default ceiling for a single uploaded image.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Limits applied to uploaded files before they reach a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPolicy {
    max_file_bytes: usize,
}

impl UploadPolicy {
    /// Accept image files up to `max_file_bytes` each.
    #[must_use]
    pub const fn new(max_file_bytes: usize) -> Self {
        Self { max_file_bytes }
    }

    /// Largest accepted file, in bytes.
    #[must_use]
    pub const fn max_file_bytes(&self) -> usize {
        self.max_file_bytes
    }

    /// Whether `content_type` names an image.
    #[must_use]
    pub fn accepts(&self, content_type: &str) -> bool {
        content_type
            .split_once('/')
            .is_some_and(|(kind, subtype)| kind.eq_ignore_ascii_case("image") && !subtype.is_empty())
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UPLOAD_BYTES)
    }
}

/// Parameter object bundling the driving ports.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub merchandise: Arc<dyn MerchandiseCommand>,
    pub merchandise_query: Arc<dyn MerchandiseQuery>,
    pub profiles: Arc<dyn UserProfileCommand>,
    pub profiles_query: Arc<dyn UserProfileQuery>,
}

impl HttpStatePorts {
    /// Fixture-backed ports for handler tests and local smoke runs.
    ///
    /// # Examples
    /// ```
    /// use portal_backend::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// let state = HttpState::new(HttpStatePorts::fixtures());
    /// assert_eq!(state.uploads.max_file_bytes(), 5 * 1024 * 1024);
    /// ```
    #[must_use]
    pub fn fixtures() -> Self {
        Self {
            login: Arc::new(FixtureLoginService),
            merchandise: Arc::new(FixtureMerchandiseCommand),
            merchandise_query: Arc::new(FixtureMerchandiseQuery),
            profiles: Arc::new(FixtureUserProfileCommand),
            profiles_query: Arc::new(FixtureUserProfileQuery),
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub merchandise: Arc<dyn MerchandiseCommand>,
    pub merchandise_query: Arc<dyn MerchandiseQuery>,
    pub profiles: Arc<dyn UserProfileCommand>,
    pub profiles_query: Arc<dyn UserProfileQuery>,
    pub uploads: UploadPolicy,
}

impl HttpState {
    /// Construct state with the default upload policy.
    #[must_use]
    pub fn new(ports: HttpStatePorts) -> Self {
        Self::with_upload_policy(ports, UploadPolicy::default())
    }

    /// Construct state with an explicit upload policy.
    #[must_use]
    pub fn with_upload_policy(ports: HttpStatePorts, uploads: UploadPolicy) -> Self {
        let HttpStatePorts {
            login,
            merchandise,
            merchandise_query,
            profiles,
            profiles_query,
        } = ports;
        Self {
            login,
            merchandise,
            merchandise_query,
            profiles,
            profiles_query,
            uploads,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("image/png", true)]
    #[case("IMAGE/JPEG", true)]
    #[case("image/", false)]
    #[case("application/pdf", false)]
    #[case("png", false)]
    fn upload_policy_accepts_only_images(#[case] content_type: &str, #[case] expected: bool) {
        assert_eq!(UploadPolicy::default().accepts(content_type), expected);
    }
}
