// ── Runtime connection configuration ──
//
// These types describe *how* to reach the management endpoint. They carry
// credential data and transport tuning, but never touch disk. The CLI builds
// an `ArmConfig` (usually via armctl-config) and hands it in.

use std::time::Duration;

use armctl_api::{ApiProfile, ArmClient, Credentials, TlsMode, TransportConfig};
use url::Url;

use crate::error::CoreError;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file (typical for Azure Stack Hub).
    CustomCa(std::path::PathBuf),
    /// Skip verification (lab hubs with self-signed certs).
    DangerAcceptInvalid,
}

impl From<&TlsVerification> for TlsMode {
    fn from(tls: &TlsVerification) -> Self {
        match tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        }
    }
}

/// Everything a controller needs to build its management client.
///
/// `credentials` is optional: a controller built from a config without
/// credentials still constructs, but every operation fails with
/// [`CoreError::ClientNotInstantiated`].
#[derive(Debug, Clone)]
pub struct ArmConfig {
    /// Management endpoint, e.g. `https://management.local.azurestack.external/`.
    pub endpoint: Url,
    pub credentials: Option<Credentials>,
    pub tls: TlsVerification,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
    pub api_profile: ApiProfile,
}

impl ArmConfig {
    /// Config for `endpoint` with default transport settings and no credential.
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            credentials: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            api_profile: ApiProfile::default(),
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Transport settings for a client identifying itself as `user_agent`.
    pub fn transport(&self, user_agent: &str) -> TransportConfig {
        TransportConfig {
            tls: TlsMode::from(&self.tls),
            timeout: self.timeout,
            user_agent: user_agent.to_owned(),
        }
    }

    /// Build a management client, or fail if there is no credential.
    pub fn build_client(&self, user_agent: &str) -> Result<ArmClient, CoreError> {
        let credentials = self
            .credentials
            .clone()
            .ok_or(CoreError::ClientNotInstantiated)?;
        let client = ArmClient::new(
            self.endpoint.as_str(),
            credentials,
            &self.transport(user_agent),
            self.api_profile.clone(),
        )?;
        Ok(client)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    #[test]
    fn missing_credentials_cannot_build_a_client() {
        let config = ArmConfig::new(Url::parse("https://management.azure.com/").unwrap());
        assert!(matches!(
            config.build_client("armctl-test"),
            Err(CoreError::ClientNotInstantiated)
        ));
    }

    #[test]
    fn transport_carries_user_agent_and_tls() {
        let config = ArmConfig {
            tls: TlsVerification::DangerAcceptInvalid,
            timeout: Duration::from_secs(5),
            ..ArmConfig::new(Url::parse("https://management.local.azurestack.external/").unwrap())
                .with_credentials(Credentials::BearerToken {
                    token: SecretString::from("t".to_owned()),
                    subscription_id: "sub".into(),
                })
        };
        let transport = config.transport("armctl-network-controller/0.1.0");
        assert_eq!(transport.user_agent, "armctl-network-controller/0.1.0");
        assert_eq!(transport.timeout, Duration::from_secs(5));
        assert!(matches!(transport.tls, TlsMode::DangerAcceptInvalid));

        let client = config.build_client("ua").unwrap();
        assert_eq!(client.subscription_id(), "sub");
    }
}
