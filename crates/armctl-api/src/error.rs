use thiserror::Error;

/// Top-level error type for the `armctl-api` crate.
///
/// Covers every failure mode of a management API call: token acquisition,
/// transport, ARM error bodies, and response decoding. `armctl-core` maps
/// these into its typed controller errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Token endpoint rejected the credential, or the credential is malformed.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The management endpoint answered 401 for a bearer token.
    #[error("Bearer token rejected by the management endpoint")]
    InvalidToken,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Management API ──────────────────────────────────────────────
    /// Structured `{ "error": { "code", "message" } }` body from ARM.
    #[error("Management API error (HTTP {status}): {message}")]
    Arm {
        status: u16,
        code: Option<String>,
        message: String,
        request_id: Option<String>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the management API answered with a non-success status.
    ///
    /// Transport and decoding failures return `false`: the request either
    /// never got an answer or the answer could not be read.
    pub fn is_api_status(&self) -> bool {
        matches!(self, Self::Arm { .. } | Self::InvalidToken)
    }

    /// HTTP status reported by the management endpoint, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Arm { status, .. } => Some(*status),
            Self::InvalidToken => Some(401),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Arm { status, .. } => matches!(status, 429 | 502 | 503 | 504),
            _ => false,
        }
    }

    /// Extract the ARM error code (e.g. `ResourceGroupNotFound`), if available.
    pub fn api_error_code(&self) -> Option<&str> {
        match self {
            Self::Arm { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}
