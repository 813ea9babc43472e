//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use armctl_config::ConfigError;
use armctl_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const INTERRUPTED: i32 = 130;
}

#[derive(Debug, Error, Diagnostic)]
#[allow(dead_code, unused_assignments)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the management endpoint: {message}")]
    #[diagnostic(
        code(armctl::connection_failed),
        help(
            "Check the endpoint URL and network access.\n\
             Azure Stack Hub endpoints with self-signed certificates need\n\
             ca_cert in the profile, or --insecure (-k) for lab setups."
        )
    )]
    ConnectionFailed { message: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(armctl::auth_failed),
        help(
            "The token was rejected or could not be acquired.\n\
             Refresh it, or store a new one with: armctl config set-secret --profile {profile}"
        )
    )]
    AuthFailed { profile: String, message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(armctl::no_credentials),
        help(
            "Configure credentials with: armctl config init\n\
             Or set the ARMCTL_TOKEN environment variable."
        )
    )]
    NoCredentials { profile: String },

    #[error("Client is not instantiated")]
    #[diagnostic(
        code(armctl::client_not_instantiated),
        help("No usable credential was available when the management client was created.")
    )]
    ClientNotInstantiated,

    #[error("Permission denied: {message}")]
    #[diagnostic(
        code(armctl::forbidden),
        help("The identity lacks a role assignment for this operation on the subscription.")
    )]
    Forbidden { message: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{message}")]
    #[diagnostic(code(armctl::not_found))]
    NotFound {
        message: String,
        code: Option<String>,
    },

    #[error("{message}")]
    #[diagnostic(code(armctl::conflict))]
    Conflict { message: String },

    #[error("{resource} '{name}' could not be read: {message}")]
    #[diagnostic(
        code(armctl::dependency),
        help("The {resource} must exist before it can be referenced.")
    )]
    Dependency {
        resource: String,
        name: String,
        message: String,
        status: u16,
    },

    // ── API ──────────────────────────────────────────────────────────

    #[error("API error ({status}): {message}")]
    #[diagnostic(code(armctl::api_error))]
    ApiError {
        status: u16,
        code: Option<String>,
        message: String,
        request_id: Option<String>,
    },

    // ── Providers ────────────────────────────────────────────────────

    #[error("Provider {provider} did not register within {seconds}s (last state: {last_state})")]
    #[diagnostic(
        code(armctl::registration_timeout),
        help("Registration can take several minutes. Retry with a larger --max-wait.")
    )]
    RegistrationTimedOut {
        provider: String,
        seconds: u64,
        last_state: String,
    },

    #[error("Registration of provider {provider} failed ({status}): {message}")]
    #[diagnostic(code(armctl::registration_failed))]
    RegistrationFailed {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("{operation} was cancelled")]
    #[diagnostic(code(armctl::cancelled))]
    Cancelled { operation: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(armctl::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(armctl::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: armctl config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No endpoint configured")]
    #[diagnostic(
        code(armctl::no_config),
        help(
            "Create a profile with: armctl config init\n\
             Or pass --endpoint, --subscription and --token.\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(armctl::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(armctl::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(armctl::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(armctl::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } | Self::ClientNotInstantiated => {
                exit_code::AUTH
            }
            Self::Forbidden { .. } => exit_code::PERMISSION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Dependency { status, .. } if *status == 404 => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::RegistrationTimedOut { .. } => exit_code::TIMEOUT,
            Self::Cancelled { .. } => exit_code::INTERRUPTED,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Attach the active profile name to auth errors raised by core.
    pub fn for_profile(self, profile_name: &str) -> Self {
        match self {
            Self::AuthFailed { message, .. } => Self::AuthFailed {
                profile: profile_name.into(),
                message,
            },
            other => other,
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::NoCredentials { profile, .. } => Self::NoCredentials { profile },
            ConfigError::ProfileNotFound { name, available } => Self::ProfileNotFound {
                name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            },
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config(other),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ClientNotInstantiated => Self::ClientNotInstantiated,

            CoreError::Config { message } => Self::Validation {
                field: "endpoint".into(),
                reason: message,
            },

            CoreError::Validation { field, message } => Self::Validation {
                field,
                reason: message,
            },

            CoreError::Remote {
                status,
                code,
                message,
                request_id,
            } => remote_error(status, code, message, request_id),

            CoreError::Dependency {
                resource,
                name,
                source,
            } => Self::Dependency {
                resource: resource.into(),
                name,
                status: source.status().as_u16(),
                message: source.to_string(),
            },

            CoreError::RegistrationTimedOut {
                provider,
                waited,
                last_state,
            } => Self::RegistrationTimedOut {
                provider,
                seconds: waited.as_secs(),
                last_state: last_state.unwrap_or_else(|| "unknown".into()),
            },

            CoreError::RegistrationFailed {
                provider,
                status,
                message,
            } => Self::RegistrationFailed {
                provider,
                status,
                message,
            },

            CoreError::Cancelled { operation } => Self::Cancelled { operation },
        }
    }
}

fn remote_error(
    status: Option<u16>,
    code: Option<String>,
    message: String,
    request_id: Option<String>,
) -> CliError {
    match status {
        None => CliError::ConnectionFailed { message },
        Some(401) => CliError::AuthFailed {
            profile: "current".into(),
            message,
        },
        Some(403) => CliError::Forbidden { message },
        Some(404) => CliError::NotFound { message, code },
        Some(409) => CliError::Conflict { message },
        Some(status) => CliError::ApiError {
            status,
            code,
            message,
            request_id,
        },
    }
}
