//! Transport-only wrappers around the resource endpoints.
//!
//! Nothing here validates input; payloads arrive already resolved and
//! failures propagate as [`ClientError`] for the caller to interpret.

use std::future::Future;

use reqwest::Method;
use serde_json::Value;
use url::Url;

use crate::error::ClientError;
use crate::http::{PortalHttp, decode};
use crate::models::{
    MerchandiseItem, MerchandiseList, Mutation, MutationAck, PublicProfile, PublicUsersEnvelope,
    UserEnvelope, UserPage, UserProfile,
};
use crate::payload::MutationPayload;

/// Issue a GET whose future owns its transport, so it can be cached.
pub(crate) fn fetch(
    http: &PortalHttp,
    url: Url,
    query: Vec<(&'static str, String)>,
) -> impl Future<Output = Result<Value, ClientError>> + Send + use<> {
    let http = http.clone();
    async move { http.get(url, &query).await }
}

fn search_query(search: Option<&str>) -> Vec<(&'static str, String)> {
    search
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(|term| ("search", term.to_owned()))
        .into_iter()
        .collect()
}

/// `/merch` endpoints.
#[derive(Debug, Clone)]
pub struct MerchandiseApi {
    http: PortalHttp,
}

impl MerchandiseApi {
    /// Wrap a transport.
    #[must_use]
    pub const fn new(http: PortalHttp) -> Self {
        Self { http }
    }

    pub(crate) fn list_request(
        &self,
        search: Option<&str>,
    ) -> impl Future<Output = Result<Value, ClientError>> + Send + use<> {
        fetch(&self.http, self.http.url(&["merch"]), search_query(search))
    }

    /// List the catalogue, optionally filtered by a search term.
    ///
    /// # Errors
    /// Propagates [`ClientError`] from the transport.
    pub async fn list(&self, search: Option<&str>) -> Result<MerchandiseList, ClientError> {
        decode(self.list_request(search).await?)
    }

    /// Create an item.
    ///
    /// # Errors
    /// Returns [`ClientError::Api`] with 401, 403 or 400 when the session or
    /// payload is rejected.
    pub async fn create(
        &self,
        payload: &MutationPayload,
    ) -> Result<Mutation<MerchandiseItem>, ClientError> {
        let url = self.http.url(&["merch"]);
        decode(self.http.send(Method::POST, url, Some(payload)).await?)
    }

    /// Patch an item.
    ///
    /// # Errors
    /// Returns [`ClientError::Api`] with 404 for an unknown id.
    pub async fn update_by_id(
        &self,
        id: &str,
        payload: &MutationPayload,
    ) -> Result<Mutation<MerchandiseItem>, ClientError> {
        let url = self.http.url(&["merch", id]);
        decode(self.http.send(Method::PATCH, url, Some(payload)).await?)
    }

    /// Delete an item and its images.
    ///
    /// # Errors
    /// Returns [`ClientError::Api`] with 404 for an unknown id.
    pub async fn delete_by_id(&self, id: &str) -> Result<MutationAck, ClientError> {
        let url = self.http.url(&["merch", id]);
        decode(self.http.send(Method::DELETE, url, None).await?)
    }
}

/// `/user` endpoints.
#[derive(Debug, Clone)]
pub struct UserApi {
    http: PortalHttp,
}

impl UserApi {
    /// Wrap a transport.
    #[must_use]
    pub const fn new(http: PortalHttp) -> Self {
        Self { http }
    }

    pub(crate) fn current_user_request(
        &self,
    ) -> impl Future<Output = Result<Value, ClientError>> + Send + use<> {
        fetch(
            &self.http,
            self.http.url(&["user", "current-user"]),
            Vec::new(),
        )
    }

    pub(crate) fn list_request(
        &self,
        search: Option<&str>,
        page: Option<usize>,
    ) -> impl Future<Output = Result<Value, ClientError>> + Send + use<> {
        let mut query = search_query(search);
        query.extend(page.map(|page| ("page", page.to_string())));
        fetch(&self.http, self.http.url(&["user"]), query)
    }

    pub(crate) fn public_request(
        &self,
    ) -> impl Future<Output = Result<Value, ClientError>> + Send + use<> {
        fetch(&self.http, self.http.url(&["user", "public"]), Vec::new())
    }

    /// Profile of the signed-in account.
    ///
    /// # Errors
    /// Returns [`ClientError::Api`] with 401 without a session.
    pub async fn current_user(&self) -> Result<UserProfile, ClientError> {
        let envelope: UserEnvelope = decode(self.current_user_request().await?)?;
        Ok(envelope.user)
    }

    /// Patch the signed-in account's profile.
    ///
    /// # Errors
    /// Returns [`ClientError::Api`] with 400 or 409 when the patch is
    /// rejected.
    pub async fn update_current_user(
        &self,
        payload: &MutationPayload,
    ) -> Result<Mutation<UserProfile>, ClientError> {
        decode(
            self.http
                .send(
                    Method::PATCH,
                    self.http.url(&["user", "current-user"]),
                    Some(payload),
                )
                .await?,
        )
    }

    /// Officer listing, paged and optionally filtered.
    ///
    /// # Errors
    /// Returns [`ClientError::Api`] with 403 for members.
    pub async fn list(
        &self,
        search: Option<&str>,
        page: Option<usize>,
    ) -> Result<UserPage, ClientError> {
        decode(self.list_request(search, page).await?)
    }

    /// Public directory.
    ///
    /// # Errors
    /// Propagates [`ClientError`] from the transport.
    pub async fn list_public(&self) -> Result<Vec<PublicProfile>, ClientError> {
        let envelope: PublicUsersEnvelope = decode(self.public_request().await?)?;
        Ok(envelope.users)
    }

    /// Any profile, by id.
    ///
    /// # Errors
    /// Returns [`ClientError::Api`] with 404 for an unknown id.
    pub async fn get_by_id(&self, id: &str) -> Result<UserProfile, ClientError> {
        let envelope: UserEnvelope =
            decode(fetch(&self.http, self.http.url(&["user", id]), Vec::new()).await?)?;
        Ok(envelope.user)
    }

    /// Patch any profile, by id.
    ///
    /// # Errors
    /// Returns [`ClientError::Api`] with 404 for an unknown id.
    pub async fn update_by_id(
        &self,
        id: &str,
        payload: &MutationPayload,
    ) -> Result<Mutation<UserProfile>, ClientError> {
        let url = self.http.url(&["user", id]);
        decode(self.http.send(Method::PATCH, url, Some(payload)).await?)
    }

    /// Delete a profile, by id.
    ///
    /// # Errors
    /// Returns [`ClientError::Api`] with 404 for an unknown id.
    pub async fn delete_by_id(&self, id: &str) -> Result<MutationAck, ClientError> {
        let url = self.http.url(&["user", id]);
        decode(self.http.send(Method::DELETE, url, None).await?)
    }
}
