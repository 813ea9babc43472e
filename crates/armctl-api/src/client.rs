// Hand-written async client for the Azure Resource Manager REST API.
//
// Base URL: the management endpoint (public cloud or an Azure Stack Hub
// `https://management.<region>.<fqdn>/`).
// Auth: `Authorization: Bearer` from the configured credential.
// Every request is versioned with `?api-version=` from the client's profile.

use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::auth::{Authenticator, Credentials};
use crate::error::Error;
use crate::models::ErrorEnvelope;
use crate::profile::ApiProfile;
use crate::response::OperationResponse;
use crate::transport::TransportConfig;

/// Correlation id the client sends with each request.
pub const CLIENT_REQUEST_ID_HEADER: &str = "x-ms-client-request-id";
/// Correlation id the service assigns to each request.
pub const REQUEST_ID_HEADER: &str = "x-ms-request-id";

/// Async client for the management API, scoped to one subscription.
pub struct ArmClient {
    http: reqwest::Client,
    base_url: Url,
    profile: ApiProfile,
    auth: Authenticator,
}

impl ArmClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client with its own HTTP stack from the transport config.
    pub fn new(
        endpoint: &str,
        credentials: Credentials,
        transport: &TransportConfig,
        profile: ApiProfile,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(endpoint, http, credentials, profile)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(
        endpoint: &str,
        http: reqwest::Client,
        credentials: Credentials,
        profile: ApiProfile,
    ) -> Result<Self, Error> {
        credentials.validate()?;
        let base_url = Self::normalize_base_url(endpoint)?;
        debug!(
            endpoint = %base_url,
            auth = %credentials.strategy(),
            api_profile = %profile.name,
            "management client ready"
        );
        Ok(Self {
            http,
            base_url,
            profile,
            auth: Authenticator::new(credentials),
        })
    }

    /// Require an http(s) URL and give it a trailing slash so joins append.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        url.set_query(None);
        Ok(url)
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn subscription_id(&self) -> &str {
        self.auth.credentials().subscription_id()
    }

    pub fn profile(&self) -> &ApiProfile {
        &self.profile
    }

    pub fn credentials(&self) -> &Credentials {
        self.auth.credentials()
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// `{base}/subscriptions/{sub}/{segments...}?api-version={version}`
    ///
    /// Segments are percent-encoded individually, so resource names cannot
    /// escape their path position.
    pub(crate) fn subscription_url(&self, segments: &[&str], api_version: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty()
                .extend(["subscriptions", self.subscription_id()])
                .extend(segments);
        }
        url.query_pairs_mut().append_pair("api-version", api_version);
        url
    }

    /// `.../resourceGroups/{rg}/providers/{provider}/{segments...}`
    pub(crate) fn resource_url(
        &self,
        resource_group: &str,
        provider: &str,
        segments: &[&str],
        api_version: &str,
    ) -> Url {
        let mut full = vec!["resourceGroups", resource_group, "providers", provider];
        full.extend_from_slice(segments);
        self.subscription_url(&full, api_version)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn request(&self, method: Method, url: Url) -> Result<reqwest::RequestBuilder, Error> {
        let token = self.auth.bearer(&self.http, &self.base_url).await?;
        let client_request_id = Uuid::new_v4();
        debug!(%client_request_id, "{method} {url}");
        Ok(self
            .http
            .request(method, url)
            .bearer_auth(token.expose_secret())
            .header(CLIENT_REQUEST_ID_HEADER, client_request_id.to_string()))
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
    ) -> Result<OperationResponse<T>, Error> {
        let resp = self.request(Method::GET, url).await?.send().await?;
        handle_response(resp).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<OperationResponse<T>, Error> {
        let resp = self
            .request(Method::PUT, url)
            .await?
            .json(body)
            .send()
            .await?;
        handle_response(resp).await
    }

    /// POST with an empty body (ARM action endpoints such as `register`).
    pub(crate) async fn post_action<T: DeserializeOwned>(
        &self,
        url: Url,
    ) -> Result<OperationResponse<T>, Error> {
        let resp = self
            .request(Method::POST, url)
            .await?
            .send()
            .await?;
        handle_response(resp).await
    }

    pub(crate) async fn delete(&self, url: Url) -> Result<OperationResponse<()>, Error> {
        let resp = self.request(Method::DELETE, url).await?.send().await?;
        let status = resp.status();
        if status.is_success() {
            Ok(OperationResponse::from_remote(
                status,
                request_id(resp.headers()),
                None,
            ))
        } else {
            Err(parse_error(status, resp).await)
        }
    }

    /// HEAD existence check: 204 means present, 404 means absent.
    pub(crate) async fn head_exists(&self, url: Url) -> Result<OperationResponse<bool>, Error> {
        let resp = self.request(Method::HEAD, url).await?.send().await?;
        let status = resp.status();
        let rid = request_id(resp.headers());
        match status {
            StatusCode::NOT_FOUND => Ok(OperationResponse::from_remote(status, rid, Some(false))),
            s if s.is_success() => Ok(OperationResponse::from_remote(status, rid, Some(true))),
            _ => Err(parse_error(status, resp).await),
        }
    }
}

// ── Response handling ────────────────────────────────────────────

async fn handle_response<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<OperationResponse<T>, Error> {
    let status = resp.status();
    if !status.is_success() {
        return Err(parse_error(status, resp).await);
    }

    let rid = request_id(resp.headers());
    let body = resp.text().await?;
    if body.trim().is_empty() {
        return Ok(OperationResponse::from_remote(status, rid, None));
    }

    let parsed = serde_json::from_str(&body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.clone(),
        }
    })?;
    Ok(OperationResponse::from_remote(status, rid, Some(parsed)))
}

async fn parse_error(status: StatusCode, resp: reqwest::Response) -> Error {
    if status == StatusCode::UNAUTHORIZED {
        return Error::InvalidToken;
    }

    let rid = request_id(resp.headers());
    let raw = resp.text().await.unwrap_or_default();

    match serde_json::from_str::<ErrorEnvelope>(&raw) {
        Ok(envelope) => Error::Arm {
            status: status.as_u16(),
            code: envelope.error.code,
            message: envelope.error.message.unwrap_or_else(|| status.to_string()),
            request_id: rid,
        },
        Err(_) => Error::Arm {
            status: status.as_u16(),
            code: None,
            message: if raw.is_empty() { status.to_string() } else { raw },
            request_id: rid,
        },
    }
}

fn request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}
