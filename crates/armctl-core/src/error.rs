// ── Core error types ──
//
// Every controller operation returns `Result<OperationResponse<T>, CoreError>`.
// Each variant knows which envelope status it renders as, so callers that
// want the flat `{status, reason}` shape can call `into_response` and never
// match on variants. The `From<armctl_api::Error>` impl folds transport and
// management-API failures into `Remote`.

use std::time::Duration;

use armctl_api::{OperationResponse, StatusCode};
use thiserror::Error;

/// Nginx-style "client closed request", used for cancelled operations.
const CLIENT_CLOSED_REQUEST: u16 = 499;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Client acquisition ───────────────────────────────────────────
    /// The controller was built without a usable credential.
    #[error("Client is not instantiated")]
    ClientNotInstantiated,

    /// Client construction failed (bad endpoint, unreadable CA, ...).
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Request errors ───────────────────────────────────────────────
    /// Caller input rejected before any remote call.
    #[error("{message}")]
    Validation { field: String, message: String },

    /// The management API or the transport to it failed.
    #[error("{message}")]
    Remote {
        /// HTTP status reported by the endpoint, if one was received.
        status: Option<u16>,
        /// ARM error code (e.g. `ResourceGroupNotFound`).
        code: Option<String>,
        message: String,
        request_id: Option<String>,
    },

    /// A prerequisite lookup failed, so the dependent operation never ran.
    #[error("{source}")]
    Dependency {
        resource: &'static str,
        name: String,
        #[source]
        source: Box<CoreError>,
    },

    // ── Provider registration ────────────────────────────────────────
    #[error(
        "Provider {provider} was not registered within {}s (last state: {})",
        .waited.as_secs(),
        .last_state.as_deref().unwrap_or("unknown")
    )]
    RegistrationTimedOut {
        provider: String,
        waited: Duration,
        last_state: Option<String>,
    },

    #[error("Registration of provider {provider} failed: {message}")]
    RegistrationFailed {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("{operation} was cancelled")]
    Cancelled { operation: String },
}

impl CoreError {
    pub(crate) fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Wrap a failed prerequisite lookup.
    pub(crate) fn dependency(resource: &'static str, name: impl Into<String>, source: Self) -> Self {
        Self::Dependency {
            resource,
            name: name.into(),
            source: Box::new(source),
        }
    }

    /// Envelope status this error renders as.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::ClientNotInstantiated => StatusCode::PRECONDITION_FAILED,
            Self::Dependency { source, .. } => source.status(),
            Self::RegistrationTimedOut { .. } => StatusCode::REQUEST_TIMEOUT,
            Self::Cancelled { .. } => {
                StatusCode::from_u16(CLIENT_CLOSED_REQUEST).unwrap_or(StatusCode::BAD_REQUEST)
            }
            Self::Config { .. }
            | Self::Validation { .. }
            | Self::Remote { .. }
            | Self::RegistrationFailed { .. } => StatusCode::BAD_REQUEST,
        }
    }

    /// The innermost failure, looking through dependency wrappers.
    pub fn root(&self) -> &Self {
        match self {
            Self::Dependency { source, .. } => source.root(),
            other => other,
        }
    }

    /// HTTP status the management endpoint actually returned, if any.
    pub fn remote_status(&self) -> Option<u16> {
        match self.root() {
            Self::Remote { status, .. } => *status,
            Self::RegistrationFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.remote_status() == Some(404)
    }

    /// Render as the uniform failure envelope: synthesized status, the
    /// error message as reason, no body.
    pub fn into_response<T>(self) -> OperationResponse<T> {
        let request_id = match self.root() {
            Self::Remote { request_id, .. } => request_id.clone(),
            _ => None,
        };
        let mut response = OperationResponse::failure(self.status(), self.to_string());
        response.request_id = request_id;
        response
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<armctl_api::Error> for CoreError {
    fn from(err: armctl_api::Error) -> Self {
        match err {
            armctl_api::Error::Arm {
                status,
                code,
                message,
                request_id,
            } => CoreError::Remote {
                status: Some(status),
                code,
                message,
                request_id,
            },
            armctl_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            armctl_api::Error::Tls(message) => CoreError::Config { message },
            other => CoreError::Remote {
                status: other.status(),
                code: other.api_error_code().map(str::to_owned),
                message: other.to_string(),
                request_id: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precondition_status_for_missing_client() {
        let resp: OperationResponse<()> = CoreError::ClientNotInstantiated.into_response();
        assert_eq!(resp.status, StatusCode::PRECONDITION_FAILED);
        assert_eq!(resp.reason, "Client is not instantiated");
        assert!(resp.body.is_none());
    }

    #[test]
    fn remote_failures_render_as_bad_request_with_message() {
        let err = CoreError::from(armctl_api::Error::Arm {
            status: 409,
            code: Some("Conflict".into()),
            message: "Another operation is in progress".into(),
            request_id: Some("req-1".into()),
        });
        assert_eq!(err.remote_status(), Some(409));

        let resp: OperationResponse<()> = err.into_response();
        assert_eq!(resp.status, StatusCode::BAD_REQUEST);
        assert_eq!(resp.reason, "Another operation is in progress");
        assert_eq!(resp.request_id.as_deref(), Some("req-1"));
    }

    #[test]
    fn dependency_envelope_is_the_prerequisites() {
        let inner = CoreError::Remote {
            status: Some(404),
            code: Some("NotFound".into()),
            message: "subnet 'web' not found".into(),
            request_id: None,
        };
        let err = CoreError::dependency("subnet", "web", inner);
        assert!(err.is_not_found());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "subnet 'web' not found");
    }

    #[test]
    fn timeout_and_cancel_statuses() {
        let timeout = CoreError::RegistrationTimedOut {
            provider: "Microsoft.Compute".into(),
            waited: Duration::from_secs(30),
            last_state: Some("Registering".into()),
        };
        assert_eq!(timeout.status(), StatusCode::REQUEST_TIMEOUT);
        assert!(timeout.to_string().contains("last state: Registering"));

        let cancelled = CoreError::Cancelled {
            operation: "provider registration".into(),
        };
        assert_eq!(cancelled.status().as_u16(), 499);
    }
}
