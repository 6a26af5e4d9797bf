//! Real portal server on a loopback listener.
//!
//! The server runs on a single-threaded Tokio runtime plus a `LocalSet`
//! because Actix uses `spawn_local` internally. Adapters are the production
//! ones: in-memory stores and a file image store rooted in a temporary
//! directory. Dropping the harness stops the server.

use std::future::Future;
use std::net::TcpListener;
use std::path::Path;
use std::sync::Arc;

use actix_web::dev::ServerHandle;
use actix_web::{App, HttpServer, web};
use chrono::Utc;
use mockable::{Clock, DefaultClock};
use portal_backend::Trace;
use portal_backend::domain::ports::UserProfileRepository;
use portal_backend::domain::{
    EmailAddress, MerchandiseService, PersonName, Principal, Role, UserId, UserProfile,
    UserProfileService,
};
use portal_backend::inbound::http::error::configure_extractor_errors;
use portal_backend::inbound::http::health::{HealthState, live, ready};
use portal_backend::inbound::http::routes::configure_api;
use portal_backend::inbound::http::session_config::{SessionSettings, session_middleware};
use portal_backend::inbound::http::state::{HttpState, HttpStatePorts};
use portal_backend::outbound::memory::{
    InMemoryAccountStore, InMemoryMerchandiseRepository, InMemoryUserProfileRepository,
};
use portal_backend::outbound::storage::LocalImageStore;
use tempfile::TempDir;
use tokio::runtime::Runtime;
use tokio::task::LocalSet;
use url::Url;

/// Password shared by the seeded accounts.
pub(crate) const PASSWORD: &str = "password";

/// Seeded account: username, role and profile names.
struct Seed {
    username: &'static str,
    role: Role,
    firstname: &'static str,
    lastname: &'static str,
}

const SEEDS: [Seed; 3] = [
    Seed {
        username: "admin",
        role: Role::Admin,
        firstname: "Portal",
        lastname: "Officer",
    },
    Seed {
        username: "ada",
        role: Role::Member,
        firstname: "Ada",
        lastname: "Lovelace",
    },
    Seed {
        username: "grace",
        role: Role::Member,
        firstname: "Grace",
        lastname: "Hopper",
    },
];

pub(crate) struct PortalServer {
    runtime: Runtime,
    local: LocalSet,
    base_url: String,
    handle: ServerHandle,
    uploads: TempDir,
    accounts: Vec<(&'static str, UserId)>,
}

impl PortalServer {
    pub(crate) fn start() -> Self {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("tokio runtime");
        let local = LocalSet::new();
        let uploads = TempDir::new().expect("upload dir");

        let (state, accounts) = local.block_on(&runtime, seeded_state(uploads.path()));
        let (base_url, handle) = local
            .block_on(&runtime, async { spawn(state) })
            .expect("server should start");

        Self {
            runtime,
            local,
            base_url,
            handle,
            uploads,
            accounts,
        }
    }

    /// Drive `future` on the server's runtime.
    pub(crate) fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.local.block_on(&self.runtime, future)
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn upload_root(&self) -> &Path {
        self.uploads.path()
    }

    /// Profile id of a seeded account.
    pub(crate) fn user_id(&self, username: &str) -> UserId {
        self.accounts
            .iter()
            .find(|(name, _)| *name == username)
            .map(|(_, id)| *id)
            .unwrap_or_else(|| panic!("no seeded account {username}"))
    }
}

impl Drop for PortalServer {
    fn drop(&mut self) {
        let handle = self.handle.clone();
        self.local.block_on(&self.runtime, async move {
            handle.stop(true).await;
        });
    }
}

async fn seeded_state(upload_root: &Path) -> (HttpState, Vec<(&'static str, UserId)>) {
    let images = Arc::new(
        LocalImageStore::open(
            upload_root,
            Url::parse("http://localhost/uploads/").expect("base url"),
        )
        .expect("image store"),
    );
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let logins = Arc::new(InMemoryAccountStore::new());
    let profile_repo = Arc::new(InMemoryUserProfileRepository::new());

    let mut accounts = Vec::with_capacity(SEEDS.len());
    for seed in &SEEDS {
        let id = UserId::random();
        logins
            .register(seed.username, PASSWORD, Principal::new(id, seed.role))
            .await
            .expect("register account");
        let profile = UserProfile::new(
            id,
            PersonName::new(seed.firstname).expect("firstname"),
            PersonName::new(seed.lastname).expect("lastname"),
            EmailAddress::new(&format!("{}@example.edu", seed.username)).expect("email"),
            Utc::now(),
        );
        profile_repo.save(&profile).await.expect("save profile");
        accounts.push((seed.username, id));
    }

    let merchandise = Arc::new(MerchandiseService::new(
        Arc::new(InMemoryMerchandiseRepository::new()),
        Arc::clone(&images),
        Arc::clone(&clock),
    ));
    let profiles = Arc::new(UserProfileService::new(profile_repo, images, clock));
    let state = HttpState::new(HttpStatePorts {
        login: logins,
        merchandise: merchandise.clone(),
        merchandise_query: merchandise,
        profiles: profiles.clone(),
        profiles_query: profiles,
    });
    (state, accounts)
}

fn spawn(state: HttpState) -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0").map_err(|err| err.to_string())?;
    let addr = listener.local_addr().map_err(|err| err.to_string())?;
    let http_state = web::Data::new(state);
    let health_state = web::Data::new(HealthState::new());
    health_state.mark_ready();
    let session = SessionSettings::ephemeral();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(http_state.clone())
            .app_data(health_state.clone())
            .configure(configure_extractor_errors)
            .wrap(session_middleware(&session))
            .wrap(Trace)
            .configure(configure_api)
            .service(ready)
            .service(live)
    })
    .disable_signals()
    .workers(1)
    .listen(listener)
    .map_err(|err| err.to_string())?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);
    Ok((format!("http://{addr}"), handle))
}
