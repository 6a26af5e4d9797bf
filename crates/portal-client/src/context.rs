//! Per-session client state.

use std::sync::Arc;

use crate::cache::{QueryCache, QueryKey, Resource};
use crate::error::ClientError;
use crate::flow::MutationFlow;
use crate::http::{PortalHttp, decode};
use crate::models::{
    MerchandiseList, Principal, PublicProfile, PublicUsersEnvelope, UserEnvelope, UserPage,
    UserProfile,
};
use crate::notify::Notifier;
use crate::resources::{MerchandiseApi, UserApi};

/// Everything a page needs to talk to the portal: the transport with its
/// session cookie, the read cache and the notification sink.
///
/// One context belongs to one signed-in session. Pass it to whatever needs
/// it rather than sharing it process-wide.
pub struct PortalContext {
    http: PortalHttp,
    cache: QueryCache,
    notifier: Arc<dyn Notifier>,
}

impl PortalContext {
    /// Bind a transport and a notification sink.
    #[must_use]
    pub fn new(http: PortalHttp, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            http,
            cache: QueryCache::new(),
            notifier,
        }
    }

    /// Transport used by this context.
    #[must_use]
    pub const fn http(&self) -> &PortalHttp {
        &self.http
    }

    /// Read cache.
    #[must_use]
    pub const fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub(crate) fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    /// Uncached merchandise endpoints.
    #[must_use]
    pub fn merchandise(&self) -> MerchandiseApi {
        MerchandiseApi::new(self.http.clone())
    }

    /// Uncached user endpoints.
    #[must_use]
    pub fn users(&self) -> UserApi {
        UserApi::new(self.http.clone())
    }

    /// Mutation flows bound to this context.
    #[must_use]
    pub const fn mutations(&self) -> MutationFlow<'_> {
        MutationFlow::new(self)
    }

    /// Sign in. Cached reads belong to the previous session and are dropped.
    ///
    /// # Errors
    /// Returns [`ClientError::Api`] with status 401 for wrong credentials.
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<Principal, ClientError> {
        let response = self.http.login(username, password).await?;
        self.cache.clear();
        Ok(response.user)
    }

    /// Sign out and drop cached reads.
    ///
    /// # Errors
    /// Propagates transport failures.
    pub async fn sign_out(&self) -> Result<(), ClientError> {
        self.http.logout().await?;
        self.cache.clear();
        Ok(())
    }

    /// Cached catalogue read.
    ///
    /// # Errors
    /// Propagates [`ClientError`] from the shared read.
    pub async fn merchandise_list(
        &self,
        search: Option<&str>,
    ) -> Result<MerchandiseList, ClientError> {
        let key = QueryKey::with_params(Resource::Merch, search.unwrap_or_default().trim());
        let api = self.merchandise();
        decode(self.cache.read(key, || api.list_request(search)).await?)
    }

    /// Cached read of the signed-in profile.
    ///
    /// # Errors
    /// Returns [`ClientError::Api`] with 401 without a session.
    pub async fn current_user(&self) -> Result<UserProfile, ClientError> {
        let api = self.users();
        let value = self
            .cache
            .read(QueryKey::new(Resource::CurrentUser), || {
                api.current_user_request()
            })
            .await?;
        let envelope: UserEnvelope = decode(value)?;
        Ok(envelope.user)
    }

    /// Cached officer listing.
    ///
    /// # Errors
    /// Returns [`ClientError::Api`] with 403 for members.
    pub async fn user_page(
        &self,
        search: Option<&str>,
        page: Option<usize>,
    ) -> Result<UserPage, ClientError> {
        let params = format!(
            "search={}&page={}",
            search.unwrap_or_default().trim(),
            page.unwrap_or(1)
        );
        let key = QueryKey::with_params(Resource::Users, params);
        let api = self.users();
        decode(self.cache.read(key, || api.list_request(search, page)).await?)
    }

    /// Cached public directory.
    ///
    /// # Errors
    /// Propagates [`ClientError`] from the shared read.
    pub async fn public_users(&self) -> Result<Vec<PublicProfile>, ClientError> {
        let api = self.users();
        let value = self
            .cache
            .read(QueryKey::new(Resource::PublicUsers), || api.public_request())
            .await?;
        let envelope: PublicUsersEnvelope = decode(value)?;
        Ok(envelope.users)
    }
}
