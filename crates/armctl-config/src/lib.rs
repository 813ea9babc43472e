//! Shared configuration for armctl: TOML profiles, credential resolution,
//! and translation to `armctl_core::ArmConfig`.
//!
//! The controllers never see these types; they receive a pre-built
//! `ArmConfig`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use armctl_core::{ApiProfile, ArmConfig, Credentials, ServicePrincipal, TlsVerification};

/// Keyring service name every stored secret lives under.
pub const KEYRING_SERVICE: &str = "armctl";

/// Authority used for service principals that do not name one.
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";

// ── Errors ───────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("No {secret} configured for profile '{profile}'")]
    NoCredentials {
        profile: String,
        secret: &'static str,
    },

    #[error("Profile '{name}' not found in configuration")]
    ProfileNotFound { name: String, available: Vec<String> },

    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error(transparent)]
    Serialization(#[from] toml::ser::Error),

    #[error(transparent)]
    Figment(#[from] Box<figment::Error>),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

// ── TOML config structs ──────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Look up a profile by name.
    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound {
                name: name.into(),
                available: self.profile_names(),
            })
    }

    /// Profile names, sorted.
    pub fn profile_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.profiles.keys().cloned().collect();
        names.sort();
        names
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_api_profile")]
    pub api_profile: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
            api_profile: default_api_profile(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_api_profile() -> String {
    "hybrid-2018-03-01".into()
}

/// One management endpoint plus the identity used against it.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Management endpoint, e.g. `https://management.local.azurestack.external`.
    pub endpoint: String,

    pub subscription_id: String,

    /// `"token"` (bearer token) or `"service-principal"`.
    #[serde(default = "default_auth_mode")]
    pub auth_mode: String,

    /// Bearer token (plaintext -- prefer keyring or env var).
    pub token: Option<String>,

    /// Environment variable holding the bearer token.
    pub token_env: Option<String>,

    pub tenant_id: Option<String>,
    pub client_id: Option<String>,

    /// Client secret (plaintext -- prefer keyring or env var).
    pub client_secret: Option<String>,

    /// Environment variable holding the client secret.
    pub client_secret_env: Option<String>,

    /// Login authority root; defaults to the public cloud.
    pub authority: Option<String>,

    /// `hybrid-2018-03-01` or `latest`; falls back to `defaults.api_profile`.
    pub api_profile: Option<String>,

    pub ca_cert: Option<PathBuf>,

    pub insecure: Option<bool>,

    pub timeout: Option<u64>,
}

fn default_auth_mode() -> String {
    "token".into()
}

// ── Config file path ─────────────────────────────────────────────────

/// Config file location per platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "armctl", "armctl")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        })
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("armctl");
    p
}

// ── Loading / saving ─────────────────────────────────────────────────

/// Load the config from the default path, layered with `ARMCTL_*` env vars.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Defaults, then the TOML file at `path`, then the environment.
///
/// Nested keys use a double underscore, e.g.
/// `ARMCTL_PROFILES__LAB__ENDPOINT`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("ARMCTL_").split("__"))
        .extract()?;
    Ok(config)
}

/// Load config, falling back to defaults on any error.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Write `config` to the default path.
pub fn save_config(config: &Config) -> Result<(), ConfigError> {
    save_config_to(config, &config_path())
}

pub fn save_config_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(config)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Secrets ──────────────────────────────────────────────────────────

/// Kinds of secret a profile can keep in the system keyring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretKind {
    Token,
    ClientSecret,
}

impl SecretKind {
    fn label(self) -> &'static str {
        match self {
            Self::Token => "token",
            Self::ClientSecret => "client-secret",
        }
    }

    /// Keyring account for this secret under `profile_name`.
    pub fn keyring_key(self, profile_name: &str) -> String {
        format!("{profile_name}/{}", self.label())
    }
}

/// Store a secret for `profile_name` in the system keyring.
pub fn store_secret(profile_name: &str, kind: SecretKind, secret: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &kind.keyring_key(profile_name))?;
    entry.set_password(secret)?;
    Ok(())
}

/// Env var named by the profile, then keyring, then plaintext config.
fn resolve_secret(
    env_name: Option<&str>,
    plaintext: Option<&str>,
    profile_name: &str,
    kind: SecretKind,
) -> Result<SecretString, ConfigError> {
    if let Some(val) = env_name.and_then(|name| std::env::var(name).ok()) {
        return Ok(SecretString::from(val));
    }

    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &kind.keyring_key(profile_name)) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    if let Some(val) = plaintext.filter(|v| !v.is_empty()) {
        return Ok(SecretString::from(val.to_owned()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
        secret: kind.label(),
    })
}

pub fn resolve_token(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    resolve_secret(
        profile.token_env.as_deref(),
        profile.token.as_deref(),
        profile_name,
        SecretKind::Token,
    )
}

pub fn resolve_client_secret(
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    resolve_secret(
        profile.client_secret_env.as_deref(),
        profile.client_secret.as_deref(),
        profile_name,
        SecretKind::ClientSecret,
    )
}

// ── Profile → ArmConfig ──────────────────────────────────────────────

/// Build credentials for the profile's auth mode.
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<Credentials, ConfigError> {
    if profile.subscription_id.trim().is_empty() {
        return Err(invalid("subscription_id", "must not be empty"));
    }

    match profile.auth_mode.as_str() {
        "token" => Ok(Credentials::BearerToken {
            token: resolve_token(profile, profile_name)?,
            subscription_id: profile.subscription_id.clone(),
        }),
        "service-principal" => {
            let tenant_id = required(profile.tenant_id.as_deref(), "tenant_id")?;
            let client_id = required(profile.client_id.as_deref(), "client_id")?;
            let authority_str = profile.authority.as_deref().unwrap_or(DEFAULT_AUTHORITY);
            let authority = url::Url::parse(authority_str)
                .map_err(|_| invalid("authority", format!("invalid URL: {authority_str}")))?;
            Ok(Credentials::ServicePrincipal(ServicePrincipal {
                tenant_id,
                client_id,
                client_secret: resolve_client_secret(profile, profile_name)?,
                authority,
                default_subscription_id: profile.subscription_id.clone(),
            }))
        }
        other => Err(invalid(
            "auth_mode",
            format!("expected 'token' or 'service-principal', got '{other}'"),
        )),
    }
}

fn required(value: Option<&str>, field: &str) -> Result<String, ConfigError> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(str::to_owned)
        .ok_or_else(|| invalid(field, "required for service-principal auth"))
}

/// Translate a profile into the runtime config the controllers consume.
pub fn profile_to_arm_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ArmConfig, ConfigError> {
    let endpoint = url::Url::parse(&profile.endpoint)
        .map_err(|_| invalid("endpoint", format!("invalid URL: {}", profile.endpoint)))?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let profile_str = profile.api_profile.as_deref().unwrap_or(&defaults.api_profile);
    let api_profile: ApiProfile = profile_str
        .parse()
        .map_err(|reason: String| invalid("api_profile", reason))?;

    Ok(ArmConfig {
        endpoint,
        credentials: Some(resolve_credentials(profile, profile_name)?),
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        api_profile,
    })
}
