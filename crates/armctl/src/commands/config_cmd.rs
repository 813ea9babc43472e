//! Config subcommand handlers.

use std::io::{BufRead, IsTerminal};

use dialoguer::{Input, Password, Select};
use tabled::Tabled;

use armctl_config::{Config, Profile, SecretKind};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, SecretArg};
use crate::config;
use crate::error::CliError;
use crate::output;

const REDACTED: &str = "********";

// ── Helpers ─────────────────────────────────────────────────────────

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Copy of the config with plaintext secrets masked.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.token.is_some() {
            profile.token = Some(REDACTED.into());
        }
        if profile.client_secret.is_some() {
            profile.client_secret = Some(REDACTED.into());
        }
    }
    cfg
}

impl From<SecretArg> for SecretKind {
    fn from(arg: SecretArg) -> Self {
        match arg {
            SecretArg::Token => Self::Token,
            SecretArg::ClientSecret => Self::ClientSecret,
        }
    }
}

/// Secret from a hidden prompt, or the first stdin line when piped.
fn read_secret(prompt: &str) -> Result<String, CliError> {
    let secret = if std::io::stdin().is_terminal() {
        Password::new()
            .with_prompt(prompt)
            .interact()
            .map_err(prompt_err)?
    } else {
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        line.trim_end_matches(['\r', '\n']).to_owned()
    };
    if secret.is_empty() {
        return Err(CliError::Validation {
            field: "secret".into(),
            reason: "secret cannot be empty".into(),
        });
    }
    Ok(secret)
}

/// Offer keyring storage; returns the value to keep in the config file.
fn store_or_keep(
    profile_name: &str,
    kind: SecretKind,
    secret: String,
) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where to store the secret?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        armctl_config::store_secret(profile_name, kind, &secret)?;
        eprintln!("   ✓ Secret stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(secret))
    }
}

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "")]
    active: &'static str,
    #[tabled(rename = "Profile")]
    name: String,
    #[tabled(rename = "Endpoint")]
    endpoint: String,
    #[tabled(rename = "Auth")]
    auth_mode: String,
    #[tabled(rename = "Subscription")]
    subscription: String,
}

#[derive(serde::Serialize)]
struct ProfileEntry<'a> {
    name: &'a str,
    default: bool,
    #[serde(flatten)]
    profile: &'a Profile,
}

// ── Wizard ──────────────────────────────────────────────────────────

fn init() -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("armctl configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    let endpoint: String = Input::new()
        .with_prompt("Management endpoint")
        .default("https://management.azure.com".into())
        .interact_text()
        .map_err(prompt_err)?;

    let subscription_id: String = Input::new()
        .with_prompt("Subscription ID")
        .interact_text()
        .map_err(prompt_err)?;

    let api_choices = &["hybrid-2018-03-01 (Azure Stack Hub)", "latest"];
    let api_selection = Select::new()
        .with_prompt("API profile")
        .items(api_choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;
    let api_profile = if api_selection == 0 {
        "hybrid-2018-03-01"
    } else {
        "latest"
    };

    let auth_choices = &["Bearer token", "Service principal"];
    let auth_selection = Select::new()
        .with_prompt("Authentication method")
        .items(auth_choices)
        .default(1)
        .interact()
        .map_err(prompt_err)?;

    let mut profile = Profile {
        endpoint,
        subscription_id,
        api_profile: Some(api_profile.into()),
        ..Profile::default()
    };

    if auth_selection == 0 {
        let token = read_secret("Bearer token")?;
        profile.auth_mode = "token".into();
        profile.token = store_or_keep(&profile_name, SecretKind::Token, token)?;
    } else {
        profile.auth_mode = "service-principal".into();
        profile.tenant_id = Some(
            Input::new()
                .with_prompt("Tenant ID")
                .interact_text()
                .map_err(prompt_err)?,
        );
        profile.client_id = Some(
            Input::new()
                .with_prompt("Client (application) ID")
                .interact_text()
                .map_err(prompt_err)?,
        );
        let authority: String = Input::new()
            .with_prompt("Login authority")
            .default(armctl_config::DEFAULT_AUTHORITY.into())
            .interact_text()
            .map_err(prompt_err)?;
        if authority != armctl_config::DEFAULT_AUTHORITY {
            profile.authority = Some(authority);
        }
        let secret = read_secret("Client secret")?;
        profile.client_secret = store_or_keep(&profile_name, SecretKind::ClientSecret, secret)?;
    }

    // Keep existing profiles; a broken file is replaced.
    let mut cfg = armctl_config::load_config().unwrap_or_default();
    cfg.profiles.insert(profile_name.clone(), profile);
    if cfg.default_profile.is_none() || cfg.profiles.len() == 1 {
        cfg.default_profile = Some(profile_name.clone());
    }
    armctl_config::save_config(&cfg)?;

    eprintln!("\n✓ Configuration written to {}", config_path.display());
    eprintln!("  Profile: {profile_name}");
    eprintln!("\n  Test it: armctl group exists <name> --profile {profile_name}");
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(),

        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let out = output::render_single(
                global.output,
                &cfg,
                |c| toml::to_string_pretty(c).unwrap_or_else(|e| format!("<unrenderable: {e}>")),
                |c| c.default_profile.clone().unwrap_or_default(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = redacted(&config::load_config_or_default());
            let default = cfg.default_profile.as_deref();
            let names = cfg.profile_names();
            let entries: Vec<ProfileEntry<'_>> = names
                .iter()
                .filter_map(|name| {
                    cfg.profiles.get(name).map(|profile| ProfileEntry {
                        name,
                        default: default == Some(name.as_str()),
                        profile,
                    })
                })
                .collect();
            let out = output::render_list(
                global.output,
                &entries,
                |e| ProfileRow {
                    active: if e.default { "*" } else { "" },
                    name: e.name.to_owned(),
                    endpoint: e.profile.endpoint.clone(),
                    auth_mode: e.profile.auth_mode.clone(),
                    subscription: e.profile.subscription_id.clone(),
                },
                |e| e.name.to_owned(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = armctl_config::load_config()?;
            cfg.profile(&name)?;
            cfg.default_profile = Some(name.clone());
            armctl_config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Default profile set to '{name}'");
            }
            Ok(())
        }

        ConfigCommand::SetSecret { kind } => {
            let cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let kind = SecretKind::from(kind);
            let secret = read_secret("Secret")?;
            armctl_config::store_secret(&profile_name, kind, &secret)?;
            if !global.quiet {
                eprintln!("✓ Secret stored in system keyring for profile '{profile_name}'");
            }
            Ok(())
        }
    }
}
