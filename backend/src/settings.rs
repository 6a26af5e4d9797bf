//! Server settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `PORTAL_*` environment variables and an
//! optional configuration file, in that order of precedence.

use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8080/uploads/";
const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_EMAIL: &str = "officer@example.edu";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address {value}: {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("invalid public base URL {value}: {source}")]
    PublicBaseUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
}

/// Configuration values for the portal server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PORTAL")]
pub struct PortalSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Directory uploaded images are written to.
    pub upload_dir: Option<PathBuf>,
    /// URL under which the upload directory is publicly served.
    pub public_base_url: Option<String>,
    /// Largest accepted upload, per file, in bytes.
    #[ortho_config(default = 5_242_880)]
    pub max_upload_bytes: usize,
    /// Username of the officer account created at startup.
    pub admin_username: Option<String>,
    /// Password of the bootstrap officer. Without it no account is created.
    pub admin_password: Option<String>,
    /// Contact email on the bootstrap officer's profile.
    pub admin_email: Option<String>,
}

impl PortalSettings {
    /// Configured bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Upload directory, falling back to `./uploads`.
    pub fn upload_dir(&self) -> PathBuf {
        self.upload_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR))
    }

    /// Public image base URL.
    pub fn public_base_url(&self) -> Result<Url, SettingsError> {
        let value = self
            .public_base_url
            .as_deref()
            .unwrap_or(DEFAULT_PUBLIC_BASE_URL);
        Url::parse(value).map_err(|source| SettingsError::PublicBaseUrl {
            value: value.to_owned(),
            source,
        })
    }

    /// Per-file upload limit.
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// Bootstrap officer credentials, when a password is configured.
    pub fn admin_credentials(&self) -> Option<(&str, &str)> {
        let password = self.admin_password.as_deref()?;
        let username = self
            .admin_username
            .as_deref()
            .unwrap_or(DEFAULT_ADMIN_USERNAME);
        Some((username, password))
    }

    /// Contact email for the bootstrap officer's profile.
    pub fn admin_email(&self) -> &str {
        self.admin_email.as_deref().unwrap_or(DEFAULT_ADMIN_EMAIL)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for server settings parsing.

    use super::*;
    use std::ffi::OsString;

    use crate::inbound::http::state::DEFAULT_MAX_UPLOAD_BYTES;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 7] = [
        "PORTAL_BIND_ADDR",
        "PORTAL_UPLOAD_DIR",
        "PORTAL_PUBLIC_BASE_URL",
        "PORTAL_MAX_UPLOAD_BYTES",
        "PORTAL_ADMIN_USERNAME",
        "PORTAL_ADMIN_PASSWORD",
        "PORTAL_ADMIN_EMAIL",
    ];

    fn load_from_empty_args() -> PortalSettings {
        PortalSettings::load_from_iter([OsString::from("portal-backend")])
            .expect("config should load")
    }

    fn vars_with(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(vars_with(&[]));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default address"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("socket addr")
        );
        assert_eq!(settings.upload_dir(), PathBuf::from("uploads"));
        assert_eq!(
            settings.public_base_url().expect("default url").as_str(),
            DEFAULT_PUBLIC_BASE_URL
        );
        assert_eq!(settings.max_upload_bytes(), DEFAULT_MAX_UPLOAD_BYTES);
        assert!(settings.admin_credentials().is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(vars_with(&[
            ("PORTAL_BIND_ADDR", "127.0.0.1:9000"),
            ("PORTAL_MAX_UPLOAD_BYTES", "1024"),
            ("PORTAL_ADMIN_PASSWORD", "hunter22"),
            ("PORTAL_ADMIN_EMAIL", "chair@example.edu"),
        ]));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("address"),
            "127.0.0.1:9000".parse::<SocketAddr>().expect("socket addr")
        );
        assert_eq!(settings.max_upload_bytes(), 1024);
        assert_eq!(settings.admin_credentials(), Some(("admin", "hunter22")));
        assert_eq!(settings.admin_email(), "chair@example.edu");
    }

    #[rstest]
    fn malformed_values_are_reported() {
        let _guard = lock_env(vars_with(&[
            ("PORTAL_BIND_ADDR", "not-an-address"),
            ("PORTAL_PUBLIC_BASE_URL", "::::"),
        ]));

        let settings = load_from_empty_args();
        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::BindAddr { .. })
        ));
        assert!(matches!(
            settings.public_base_url(),
            Err(SettingsError::PublicBaseUrl { .. })
        ));
    }
}
