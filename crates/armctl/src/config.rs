//! CLI configuration: a thin layer over `armctl_config` that applies
//! `GlobalOpts` flag overrides (--endpoint, --token, ...) before the
//! profile is translated into an `ArmConfig`.

use secrecy::SecretString;

use armctl_config::ConfigError;
use armctl_core::{ArmConfig, Credentials};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use armctl_config::{Config, Profile, config_path, load_config_or_default};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build the runtime config from the config file, profile, and flags.
///
/// Without a matching profile the endpoint, subscription and token must all
/// come from flags or their environment variables.
pub fn resolve_arm_config(global: &GlobalOpts, config: &Config) -> Result<ArmConfig, CliError> {
    let profile_name = active_profile_name(global, config);

    let base = match config.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.profile.is_some() && global.endpoint.is_none() => {
            return Err(ConfigError::ProfileNotFound {
                available: config.profile_names(),
                name: profile_name,
            }
            .into());
        }
        None => {
            if global.endpoint.is_none() {
                return Err(CliError::NoConfig {
                    path: config_path().display().to_string(),
                });
            }
            if global.token.is_none() {
                return Err(CliError::NoCredentials {
                    profile: profile_name,
                });
            }
            Profile::default()
        }
    };

    let profile = apply_overrides(base, global);
    let mut arm = armctl_config::profile_to_arm_config(&profile, &profile_name, &config.defaults)?;

    // A token flag beats whatever the profile's own chain would resolve.
    if let Some(token) = &global.token {
        arm.credentials = Some(Credentials::BearerToken {
            token: SecretString::from(token.clone()),
            subscription_id: profile.subscription_id.clone(),
        });
    }

    Ok(arm)
}

/// Layer flag values over a profile; unset flags leave the profile alone.
fn apply_overrides(mut profile: Profile, global: &GlobalOpts) -> Profile {
    if let Some(endpoint) = &global.endpoint {
        profile.endpoint.clone_from(endpoint);
    }
    if let Some(subscription) = &global.subscription {
        profile.subscription_id.clone_from(subscription);
    }
    if let Some(token) = &global.token {
        profile.auth_mode = "token".into();
        profile.token = Some(token.clone());
        profile.token_env = None;
    }
    if let Some(api_profile) = &global.api_profile {
        profile.api_profile = Some(api_profile.clone());
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
    profile
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use clap::Parser;
    use secrecy::ExposeSecret;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["armctl"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["group", "exists", "rg"]);
        Cli::try_parse_from(argv).unwrap().global
    }

    fn config_with_hub() -> Config {
        let mut config = Config {
            default_profile: Some("hub".into()),
            ..Config::default()
        };
        config.profiles.insert(
            "hub".into(),
            Profile {
                endpoint: "https://management.local.azurestack.external".into(),
                subscription_id: "sub-hub".into(),
                token: Some("profile-token".into()),
                timeout: Some(90),
                auth_mode: "token".into(),
                ..Profile::default()
            },
        );
        config
    }

    #[test]
    fn flags_alone_build_a_config() {
        let global = global(&[
            "--endpoint",
            "https://management.azure.com",
            "--subscription",
            "sub-flag",
            "--token",
            "flag-token",
        ]);
        let arm = resolve_arm_config(&global, &Config::default()).unwrap();
        assert_eq!(arm.endpoint.as_str(), "https://management.azure.com/");
        assert_eq!(arm.credentials.unwrap().subscription_id(), "sub-flag");
    }

    #[test]
    fn no_profile_and_no_endpoint_is_no_config() {
        let err = resolve_arm_config(&global(&[]), &Config::default()).unwrap_err();
        assert!(matches!(err, CliError::NoConfig { .. }));
    }

    #[test]
    fn named_missing_profile_is_reported() {
        let err = resolve_arm_config(&global(&["--profile", "ghost"]), &config_with_hub()).unwrap_err();
        match err {
            CliError::ProfileNotFound { name, available } => {
                assert_eq!(name, "ghost");
                assert_eq!(available, "hub");
            }
            other => panic!("expected ProfileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn profile_values_survive_absent_flags() {
        let arm = resolve_arm_config(&global(&[]), &config_with_hub()).unwrap();
        assert_eq!(arm.timeout, Duration::from_secs(90));
        assert_eq!(arm.credentials.unwrap().subscription_id(), "sub-hub");
    }

    #[test]
    fn token_flag_beats_profile_token() {
        let arm = resolve_arm_config(&global(&["--token", "flag-token", "--timeout", "5"]), &config_with_hub())
            .unwrap();
        assert_eq!(arm.timeout, Duration::from_secs(5));
        match arm.credentials.unwrap() {
            Credentials::BearerToken { token, subscription_id } => {
                assert_eq!(token.expose_secret(), "flag-token");
                assert_eq!(subscription_id, "sub-hub");
            }
            Credentials::ServicePrincipal(_) => panic!("expected bearer token"),
        }
    }
}
