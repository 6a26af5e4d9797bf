//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::PathBuf;

use portal_backend::inbound::http::session_config::SessionSettings;
use portal_backend::inbound::http::state::UploadPolicy;
use portal_backend::settings::{PortalSettings, SettingsError};
use url::Url;

/// Officer account created at startup.
pub struct BootstrapAdmin {
    pub(crate) username: String,
    pub(crate) password: String,
    pub(crate) email: String,
}

/// Everything needed to build and bind the HTTP server.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) upload_dir: PathBuf,
    pub(crate) public_base_url: Url,
    pub(crate) uploads: UploadPolicy,
    pub(crate) bootstrap_admin: Option<BootstrapAdmin>,
}

impl ServerConfig {
    /// Combine loaded settings with validated session settings.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the bind address or public base URL
    /// cannot be parsed.
    pub fn from_settings(
        settings: &PortalSettings,
        session: SessionSettings,
    ) -> Result<Self, SettingsError> {
        let bootstrap_admin =
            settings
                .admin_credentials()
                .map(|(username, password)| BootstrapAdmin {
                    username: username.to_owned(),
                    password: password.to_owned(),
                    email: settings.admin_email().to_owned(),
                });
        Ok(Self {
            session,
            bind_addr: settings.bind_addr()?,
            upload_dir: settings.upload_dir(),
            public_base_url: settings.public_base_url()?,
            uploads: UploadPolicy::new(settings.max_upload_bytes()),
            bootstrap_admin,
        })
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
