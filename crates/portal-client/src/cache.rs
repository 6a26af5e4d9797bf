//! Read cache keyed by resource.
//!
//! Concurrent reads of one key share a single in-flight request. A settled
//! read stays cached until its resource is invalidated; a failed read is
//! dropped so the next caller asks the server again.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use serde_json::Value;
use tracing::debug;

use crate::error::ClientError;

/// Cached query families. Mutations invalidate whole families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    /// Merchandise catalogue.
    Merch,
    /// Signed-in account's profile.
    CurrentUser,
    /// Officer user listing.
    Users,
    /// Public directory.
    PublicUsers,
}

impl Resource {
    /// Key name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Merch => "merch",
            Self::CurrentUser => "currentUser",
            Self::Users => "users",
            Self::PublicUsers => "publicUsers",
        }
    }
}

/// A resource plus the parameters of one read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    resource: Resource,
    params: String,
}

impl QueryKey {
    /// Key for a read without parameters.
    #[must_use]
    pub const fn new(resource: Resource) -> Self {
        Self {
            resource,
            params: String::new(),
        }
    }

    /// Key for a parameterised read, such as a filtered list.
    #[must_use]
    pub fn with_params(resource: Resource, params: impl Into<String>) -> Self {
        Self {
            resource,
            params: params.into(),
        }
    }

    /// Resource family of this key.
    #[must_use]
    pub const fn resource(&self) -> Resource {
        self.resource
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.params.is_empty() {
            f.write_str(self.resource.as_str())
        } else {
            write!(f, "{}?{}", self.resource.as_str(), self.params)
        }
    }
}

type SharedRead = Shared<BoxFuture<'static, Result<Value, ClientError>>>;

#[derive(Clone)]
struct Entry {
    generation: u64,
    read: SharedRead,
}

/// Read cache with in-flight de-duplication.
#[derive(Default)]
pub struct QueryCache {
    entries: Mutex<HashMap<QueryKey, Entry>>,
    generations: AtomicU64,
}

impl fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCache")
            .field("keys", &self.lock().keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl QueryCache {
    /// Empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `key`, running `fetch` only when no read
    /// is cached or in flight.
    ///
    /// # Errors
    /// Returns the error of the shared read; the failed entry is evicted.
    pub async fn read<F, Fut>(&self, key: QueryKey, fetch: F) -> Result<Value, ClientError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, ClientError>> + Send + 'static,
    {
        let entry = {
            let mut entries = self.lock();
            if let Some(entry) = entries.get(&key) {
                debug!(key = %key, "query cache hit");
                entry.clone()
            } else {
                debug!(key = %key, "query cache miss");
                let entry = Entry {
                    generation: self.generations.fetch_add(1, Ordering::Relaxed),
                    read: fetch().boxed().shared(),
                };
                entries.insert(key.clone(), entry.clone());
                entry
            }
        };

        let result = entry.read.await;
        if result.is_err() {
            self.evict(&key, entry.generation);
        }
        result
    }

    /// Drop every entry of `resource` so the next read refetches.
    pub fn invalidate(&self, resource: Resource) {
        let mut entries = self.lock();
        entries.retain(|key, _| key.resource != resource);
        debug!(resource = resource.as_str(), "query cache invalidated");
    }

    /// Drop everything, for example after the session changes.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Whether a read for `key` is cached or in flight.
    #[must_use]
    pub fn contains(&self, key: &QueryKey) -> bool {
        self.lock().contains_key(key)
    }

    fn evict(&self, key: &QueryKey, generation: u64) {
        let mut entries = self.lock();
        if entries
            .get(key)
            .is_some_and(|entry| entry.generation == generation)
        {
            entries.remove(key);
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<QueryKey, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn counting_fetch(
        calls: &Arc<AtomicUsize>,
        outcome: Result<Value, ClientError>,
    ) -> impl FnOnce() -> BoxFuture<'static, Result<Value, ClientError>> + use<> {
        let calls = Arc::clone(calls);
        move || {
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                outcome
            }
            .boxed()
        }
    }

    #[rstest]
    #[tokio::test]
    async fn concurrent_reads_share_one_request() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::new(Resource::Merch);

        let (first, second) = tokio::join!(
            cache.read(key.clone(), counting_fetch(&calls, Ok(json!({"merchandise": []})))),
            cache.read(key.clone(), counting_fetch(&calls, Ok(json!(null)))),
        );

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first.expect("first"), json!({"merchandise": []}));
        assert_eq!(second.expect("second"), json!({"merchandise": []}));
    }

    #[rstest]
    #[tokio::test]
    async fn invalidation_forces_refetch_for_that_resource_only() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let user = QueryKey::new(Resource::CurrentUser);
        let merch = QueryKey::with_params(Resource::Merch, "search=shirt");

        cache
            .read(user.clone(), counting_fetch(&calls, Ok(json!(1))))
            .await
            .expect("user");
        cache
            .read(merch.clone(), counting_fetch(&calls, Ok(json!(2))))
            .await
            .expect("merch");
        cache.invalidate(Resource::CurrentUser);

        assert!(!cache.contains(&user));
        assert!(cache.contains(&merch));
        let refreshed = cache
            .read(user, counting_fetch(&calls, Ok(json!(3))))
            .await
            .expect("user again");
        assert_eq!(refreshed, json!(3));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[rstest]
    #[tokio::test]
    async fn failed_reads_are_not_cached() {
        let cache = QueryCache::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::new(Resource::PublicUsers);
        let failure = ClientError::Api {
            status: 503,
            body: None,
        };

        let err = cache
            .read(key.clone(), counting_fetch(&calls, Err(failure)))
            .await
            .expect_err("failure");
        assert_eq!(err.status(), Some(503));
        assert!(!cache.contains(&key));
    }

    #[rstest]
    fn keys_render_resource_and_params() {
        assert_eq!(QueryKey::new(Resource::CurrentUser).to_string(), "currentUser");
        assert_eq!(
            QueryKey::with_params(Resource::Users, "page=2").to_string(),
            "users?page=2"
        );
    }
}
