//! Transport shared by every resource.

use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;
use url::Url;

use crate::error::{ApiErrorBody, ClientError};
use crate::models::{LoginResponse, MutationAck};
use crate::payload::MutationPayload;

/// Path prefix of the versioned API.
pub const API_PREFIX: &str = "/api/v1";

/// HTTP transport bound to one portal deployment.
///
/// The underlying client keeps a cookie store, so a successful
/// [`PortalHttp::login`] authenticates every later call made through this
/// value or its clones.
#[derive(Debug, Clone)]
pub struct PortalHttp {
    client: Client,
    base_url: String,
    api_root: Url,
}

impl PortalHttp {
    /// Build a transport for the server at `base_url`, such as
    /// `http://localhost:8080`.
    ///
    /// # Errors
    /// Returns [`ClientError::Transport`] when the HTTP client cannot be
    /// initialised and [`ClientError::BaseUrl`] when `base_url` is not an
    /// absolute URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = Client::builder().cookie_store(true).build()?;
        Self::with_client(client, base_url)
    }

    /// Use a preconfigured client. It should keep a cookie store for
    /// authenticated calls to work.
    ///
    /// # Errors
    /// Returns [`ClientError::BaseUrl`] when `base_url` is not an absolute
    /// URL.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        let api_root = Url::parse(&format!("{base_url}{API_PREFIX}"))
            .map_err(|err| ClientError::BaseUrl(format!("{base_url}: {err}")))?;
        if api_root.cannot_be_a_base() {
            return Err(ClientError::BaseUrl(format!("{base_url}: not a base URL")));
        }
        Ok(Self {
            client,
            base_url,
            api_root,
        })
    }

    /// Server origin without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Sign in and keep the session cookie.
    ///
    /// # Errors
    /// Returns [`ClientError::Api`] with status 401 for wrong credentials.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let request = self
            .client
            .post(self.url(&["login"]))
            .json(&json!({ "username": username, "password": password }));
        decode(read(request.send().await?).await?)
    }

    /// Clear the session.
    ///
    /// # Errors
    /// Propagates transport failures.
    pub async fn logout(&self) -> Result<MutationAck, ClientError> {
        let request = self.client.post(self.url(&["logout"]));
        decode(read(request.send().await?).await?)
    }

    pub(crate) async fn get(
        &self,
        url: Url,
        query: &[(&'static str, String)],
    ) -> Result<Value, ClientError> {
        let request = self.client.get(url).query(query);
        read(request.send().await?).await
    }

    pub(crate) async fn send(
        &self,
        method: Method,
        url: Url,
        payload: Option<&MutationPayload>,
    ) -> Result<Value, ClientError> {
        let mut request = self.client.request(method, url);
        if let Some(body) = payload {
            request = body.encode(request)?;
        }
        read(request.send().await?).await
    }

    /// API URL with each of `segments` percent-encoded as one path segment.
    pub(crate) fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.api_root.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

/// Turn a response into JSON, or into [`ClientError::Api`] on failure.
async fn read(response: Response) -> Result<Value, ClientError> {
    let status = response.status();
    let url = response.url().path().to_owned();
    let bytes = response.bytes().await?;
    if status.is_success() {
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        return Ok(serde_json::from_slice(&bytes)?);
    }
    let body = serde_json::from_slice::<ApiErrorBody>(&bytes).ok();
    debug!(
        status = status.as_u16(),
        path = %url,
        trace_id = body.as_ref().and_then(|b| b.trace_id.as_deref()),
        "portal request failed"
    );
    Err(ClientError::Api {
        status: status.as_u16(),
        body,
    })
}

pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ClientError> {
    Ok(serde_json::from_value(value)?)
}
