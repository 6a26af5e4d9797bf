//! Builders wiring adapters into the HTTP state.

use std::io;
use std::sync::Arc;

use actix_web::web;
use chrono::Utc;
use mockable::{Clock, DefaultClock};
use tracing::info;

use portal_backend::domain::ports::UserProfileRepository;
use portal_backend::domain::{
    EmailAddress, MerchandiseService, PersonName, Principal, Role, UserId, UserProfile,
    UserProfileService,
};
use portal_backend::inbound::http::state::{HttpState, HttpStatePorts};
use portal_backend::outbound::memory::{
    InMemoryAccountStore, InMemoryMerchandiseRepository, InMemoryUserProfileRepository,
};
use portal_backend::outbound::storage::LocalImageStore;

use super::config::{BootstrapAdmin, ServerConfig};

const BOOTSTRAP_FIRSTNAME: &str = "Portal";
const BOOTSTRAP_LASTNAME: &str = "Officer";

/// Register the bootstrap officer and give them a profile.
async fn seed_admin(
    admin: &BootstrapAdmin,
    accounts: &InMemoryAccountStore,
    profiles: &InMemoryUserProfileRepository,
) -> io::Result<()> {
    let invalid = |err: &dyn std::fmt::Display| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("bootstrap admin: {err}"),
        )
    };
    let user_id = UserId::random();
    accounts
        .register(
            &admin.username,
            &admin.password,
            Principal::new(user_id, Role::Admin),
        )
        .await
        .map_err(|err| invalid(&err))?;
    let profile = UserProfile::new(
        user_id,
        PersonName::new(BOOTSTRAP_FIRSTNAME).map_err(|err| invalid(&err))?,
        PersonName::new(BOOTSTRAP_LASTNAME).map_err(|err| invalid(&err))?,
        EmailAddress::new(&admin.email).map_err(|err| invalid(&err))?,
        Utc::now(),
    );
    profiles
        .save(&profile)
        .await
        .map_err(|err| io::Error::other(err.to_string()))?;
    info!(username = %admin.username, %user_id, "bootstrap officer registered");
    Ok(())
}

/// Build the shared HTTP state from in-memory stores and the upload directory.
///
/// # Errors
///
/// Fails when the upload directory cannot be opened or the bootstrap officer
/// is invalid.
pub(super) async fn build_http_state(config: &ServerConfig) -> io::Result<web::Data<HttpState>> {
    let images = Arc::new(
        LocalImageStore::open(&config.upload_dir, config.public_base_url.clone())
            .map_err(io::Error::other)?,
    );
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let accounts = Arc::new(InMemoryAccountStore::new());
    let profile_repo = Arc::new(InMemoryUserProfileRepository::new());

    if let Some(admin) = &config.bootstrap_admin {
        seed_admin(admin, &accounts, &profile_repo).await?;
    }

    let merchandise = Arc::new(MerchandiseService::new(
        Arc::new(InMemoryMerchandiseRepository::new()),
        Arc::clone(&images),
        Arc::clone(&clock),
    ));
    let profiles = Arc::new(UserProfileService::new(profile_repo, images, clock));

    let ports = HttpStatePorts {
        login: accounts,
        merchandise: merchandise.clone(),
        merchandise_query: merchandise,
        profiles: profiles.clone(),
        profiles_query: profiles,
    };
    Ok(web::Data::new(HttpState::with_upload_policy(
        ports,
        config.uploads,
    )))
}
