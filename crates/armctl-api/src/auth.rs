// Credentials and bearer-token acquisition for the management API.
//
// Two credential forms are accepted: a raw bearer token paired with an
// explicit subscription, or a service principal that exchanges its secret
// for a token (client-credentials grant) and carries a default subscription.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;
use url::Url;

use crate::error::Error;

/// Public-cloud login authority.
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";

/// Tokens are refreshed this long before they actually expire.
const EXPIRY_SKEW_SECS: i64 = 300;

/// Which credential form a client was built from.
///
/// Marker enum (no data) -- the secret material lives in [`Credentials`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum AuthStrategy {
    /// Caller-supplied bearer token.
    BearerToken,
    /// Client-credentials grant against the login authority.
    ServicePrincipal,
}

/// Service principal (application) credential.
#[derive(Debug, Clone)]
pub struct ServicePrincipal {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: SecretString,
    /// Login authority root, e.g. `https://login.microsoftonline.com` or an
    /// Azure Stack Hub ADFS/AAD authority.
    pub authority: Url,
    /// Subscription used when the caller does not name one.
    pub default_subscription_id: String,
}

/// Credentials for authenticating with the management endpoint.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// Pre-acquired bearer token plus the subscription to operate on.
    BearerToken {
        token: SecretString,
        subscription_id: String,
    },
    /// Service principal that acquires (and refreshes) its own token.
    ServicePrincipal(ServicePrincipal),
}

impl Credentials {
    /// The subscription every request is scoped to.
    pub fn subscription_id(&self) -> &str {
        match self {
            Self::BearerToken {
                subscription_id, ..
            } => subscription_id,
            Self::ServicePrincipal(sp) => &sp.default_subscription_id,
        }
    }

    pub fn strategy(&self) -> AuthStrategy {
        match self {
            Self::BearerToken { .. } => AuthStrategy::BearerToken,
            Self::ServicePrincipal(_) => AuthStrategy::ServicePrincipal,
        }
    }

    /// Reject credentials that could never produce a usable client.
    pub fn validate(&self) -> Result<(), Error> {
        if self.subscription_id().trim().is_empty() {
            return Err(Error::Authentication {
                message: "subscription id is empty".into(),
            });
        }
        match self {
            Self::BearerToken { token, .. } => {
                if token.expose_secret().trim().is_empty() {
                    return Err(Error::Authentication {
                        message: "bearer token is empty".into(),
                    });
                }
            }
            Self::ServicePrincipal(sp) => {
                if sp.tenant_id.is_empty()
                    || sp.client_id.is_empty()
                    || sp.client_secret.expose_secret().is_empty()
                {
                    return Err(Error::Authentication {
                        message: "tenant_id, client_id, and client_secret are all required".into(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// A bearer token with its (optional) expiry.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: SecretString,
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Whether the token is expired or close enough to expiry to refresh.
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|at| Utc::now() + ChronoDuration::seconds(EXPIRY_SKEW_SECS) >= at)
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Deserialize)]
struct TokenErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// Token endpoint for a tenant under the given authority.
pub(crate) fn token_url(authority: &Url, tenant_id: &str) -> Result<Url, Error> {
    let root = authority.as_str().trim_end_matches('/');
    Ok(Url::parse(&format!("{root}/{tenant_id}/oauth2/v2.0/token"))?)
}

/// OAuth2 scope for the management endpoint (`{endpoint}/.default`).
pub(crate) fn scope_for(endpoint: &Url) -> String {
    format!("{}/.default", endpoint.as_str().trim_end_matches('/'))
}

/// Hands out bearer tokens, caching service-principal tokens until expiry.
pub(crate) struct Authenticator {
    credentials: Credentials,
    cached: Mutex<Option<AccessToken>>,
}

impl Authenticator {
    pub(crate) fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            cached: Mutex::new(None),
        }
    }

    pub(crate) fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Return a bearer token valid for `endpoint`, acquiring one if needed.
    pub(crate) async fn bearer(
        &self,
        http: &reqwest::Client,
        endpoint: &Url,
    ) -> Result<SecretString, Error> {
        let sp = match &self.credentials {
            Credentials::BearerToken { token, .. } => return Ok(token.clone()),
            Credentials::ServicePrincipal(sp) => sp,
        };

        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| !t.is_expired()) {
            return Ok(token.token.clone());
        }

        let fresh = acquire_token(http, sp, endpoint).await?;
        let secret = fresh.token.clone();
        *cached = Some(fresh);
        Ok(secret)
    }
}

/// Exchange a service-principal secret for a bearer token.
pub async fn acquire_token(
    http: &reqwest::Client,
    sp: &ServicePrincipal,
    endpoint: &Url,
) -> Result<AccessToken, Error> {
    let url = token_url(&sp.authority, &sp.tenant_id)?;
    let scope = scope_for(endpoint);
    debug!(tenant = %sp.tenant_id, client_id = %sp.client_id, "requesting token from {url}");

    let form = [
        ("grant_type", "client_credentials"),
        ("client_id", sp.client_id.as_str()),
        ("client_secret", sp.client_secret.expose_secret()),
        ("scope", scope.as_str()),
    ];

    let resp = http.post(url).form(&form).send().await?;
    let status = resp.status();
    let body = resp.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<TokenErrorResponse>(&body)
            .ok()
            .and_then(|e| e.error_description.or(e.error))
            .unwrap_or_else(|| format!("token endpoint returned HTTP {status}"));
        return Err(Error::Authentication { message });
    }

    let parsed: TokenResponse =
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("token response: {e}"),
            body: String::new(),
        })?;

    Ok(AccessToken {
        token: SecretString::from(parsed.access_token),
        expires_at: parsed.expires_in.and_then(expiry_after),
    })
}

/// Absolute expiry `secs` from now; `None` when it falls outside chrono's range.
fn expiry_after(secs: i64) -> Option<DateTime<Utc>> {
    ChronoDuration::try_seconds(secs).and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
}
