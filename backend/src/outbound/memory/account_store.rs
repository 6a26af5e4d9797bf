//! In-memory `LoginService` adapter.
//!
//! Accounts are created at startup from configuration. Passwords are kept
//! only as salted SHA-256 digests.

use std::collections::HashMap;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::LoginService;
use crate::domain::{Error, LoginCredentials, Principal};

struct Account {
    salt: [u8; 16],
    digest: [u8; 32],
    principal: Principal,
}

fn digest(salt: &[u8], password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().into()
}

impl Account {
    /// Digest comparison that takes the same time wherever the bytes differ.
    fn accepts(&self, password: &str) -> bool {
        digest(&self.salt, password)[..].ct_eq(&self.digest[..]).into()
    }
}

/// Username-keyed account table.
#[derive(Default)]
pub struct InMemoryAccountStore {
    accounts: RwLock<HashMap<String, Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `username` with `password`, signing in as `principal`.
    ///
    /// # Errors
    ///
    /// Returns `conflict` when the username is taken and `invalid_request`
    /// when either value is blank.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        principal: Principal,
    ) -> Result<(), Error> {
        let credentials = LoginCredentials::try_from_parts(username, password)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(credentials.username()) {
            return Err(Error::conflict(format!(
                "account {} already exists",
                credentials.username()
            )));
        }
        let salt = *Uuid::new_v4().as_bytes();
        accounts.insert(
            credentials.username().to_owned(),
            Account {
                salt,
                digest: digest(&salt, credentials.password()),
                principal,
            },
        );
        Ok(())
    }
}

#[async_trait]
impl LoginService for InMemoryAccountStore {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Principal, Error> {
        let accounts = self.accounts.read().await;
        let account = accounts
            .get(credentials.username())
            .filter(|account| account.accepts(credentials.password()));
        match account {
            Some(account) => Ok(account.principal),
            None => {
                debug!(username = credentials.username(), "rejected credentials");
                Err(Error::unauthorized("invalid credentials"))
            }
        }
    }
}
