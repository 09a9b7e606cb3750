// Cluster REST API HTTP client
//
// Wraps `reqwest::Client` with bearer-token session handling, URL
// construction for path-addressed resources, and uniform error decoding.
// Endpoint groups (exports, shares, quotas, ...) are implemented as
// inherent methods in separate files to keep this module focused on
// transport mechanics.

use std::sync::RwLock;

use reqwest::header::AUTHORIZATION;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Error body shape returned by the cluster on non-2xx responses.
#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    error_class: Option<String>,
}

/// HTTP client for one cluster's administrative API.
///
/// The base URL is the node address and API port
/// (e.g. `https://10.0.0.10:8000`). All endpoint paths are rooted there.
pub struct ClusterClient {
    http: reqwest::Client,
    base_url: Url,
    /// Bearer token captured by `login()`, sent on every later request.
    bearer_token: RwLock<Option<SecretString>>,
}

impl ClusterClient {
    /// Create a new client from a `TransportConfig`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            bearer_token: RwLock::new(None),
        }
    }

    /// The underlying HTTP client (for auth flows that need direct access).
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The cluster base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Whether a session token is currently held.
    pub fn is_authenticated(&self) -> bool {
        self.bearer_token
            .read()
            .expect("token lock poisoned")
            .is_some()
    }

    // ── Session token management ─────────────────────────────────────

    pub(crate) fn set_bearer_token(&self, token: SecretString) {
        debug!("storing session token");
        *self.bearer_token.write().expect("token lock poisoned") = Some(token);
    }

    pub(crate) fn clear_bearer_token(&self) {
        *self.bearer_token.write().expect("token lock poisoned") = None;
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder, Error> {
        let guard = self.bearer_token.read().expect("token lock poisoned");
        match guard.as_ref() {
            Some(token) => Ok(builder.header(
                AUTHORIZATION,
                format!("Bearer {}", token.expose_secret()),
            )),
            None => Err(Error::SessionMissing),
        }
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a URL from path segments.
    ///
    /// Each segment is percent-encoded on its own, so a filesystem path such
    /// as `/home/alice` becomes the single segment `%2Fhome%2Falice`. A
    /// trailing empty segment yields the trailing slash collection endpoints
    /// expect (`["v1", "users", ""]` → `/v1/users/`).
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Resolve a server-supplied relative reference (e.g. a paging `next` link).
    pub(crate) fn join(&self, reference: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(reference)?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {url}");

        let resp = self.authorize(self.http.get(url))?.send().await?;
        Self::handle_response(resp).await
    }

    /// Send a POST request with a JSON body and decode the JSON response.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("POST {url}");

        let resp = self.authorize(self.http.post(url).json(body))?.send().await?;
        Self::handle_response(resp).await
    }

    /// Send a POST request whose response body is ignored.
    pub(crate) async fn post_no_response(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<(), Error> {
        debug!("POST {url}");

        let resp = self.authorize(self.http.post(url).json(body))?.send().await?;
        Self::handle_empty(resp).await
    }

    /// Send a PUT request whose response body is ignored.
    pub(crate) async fn put_no_response(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<(), Error> {
        debug!("PUT {url}");

        let resp = self.authorize(self.http.put(url).json(body))?.send().await?;
        Self::handle_empty(resp).await
    }

    /// Send a PATCH request whose response body is ignored.
    pub(crate) async fn patch_no_response(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<(), Error> {
        debug!("PATCH {url}");

        let resp = self
            .authorize(self.http.patch(url).json(body))?
            .send()
            .await?;
        Self::handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    pub(crate) async fn handle_response<T: DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            trace!(bytes = body.len(), "response body received");
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body: body.clone(),
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    pub(crate) async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Error::Authentication {
                message: "session expired or invalid credentials".into(),
            };
        }

        let raw = resp.text().await.unwrap_or_default();

        if let Ok(err) = serde_json::from_str::<ErrorResponse>(&raw) {
            Error::Api {
                status: status.as_u16(),
                message: err.description.unwrap_or_else(|| status.to_string()),
                code: err.error_class,
            }
        } else {
            Error::Api {
                status: status.as_u16(),
                message: if raw.is_empty() {
                    status.to_string()
                } else {
                    raw.chars().take(200).collect()
                },
                code: None,
            }
        }
    }
}
