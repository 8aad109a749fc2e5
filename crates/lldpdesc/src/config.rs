//! CLI configuration: thin wrapper around `lldpdesc_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides and falls back
//! to interactive prompts for credentials the profile doesn't supply.

use std::io::IsTerminal;
use std::time::Duration;

use dialoguer::Input;
use secrecy::SecretString;

use lldpdesc_core::{AuthCredentials, DeviceConfig, TlsVerification, TransportKind};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use lldpdesc_config::{
    Config, Profile, config_path, load_config_or_default, save_config,
};

use lldpdesc_config::{SecretSource, SystemSecrets};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Comma-separated profile names for help text.
pub fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        "(none)".into()
    } else {
        config.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

/// Look up the active profile.
///
/// An explicitly requested profile must exist; the implicit default may be
/// absent, in which case flags and env vars alone describe the devices.
pub fn active_profile(global: &GlobalOpts, config: &Config) -> Result<(String, Profile), CliError> {
    let name = active_profile_name(global, config);
    match config.profiles.get(&name) {
        Some(profile) => Ok((name, profile.clone())),
        None if global.profile.is_some() => Err(CliError::ProfileNotFound {
            available: available_profiles(config),
            name,
        }),
        None => Ok((name, Profile::default())),
    }
}

/// Everything needed to reach any device named on the command line.
///
/// Resolved once per run; `for_host` stamps out a `DeviceConfig` per device.
#[derive(Debug, Clone)]
pub struct DeviceTemplate {
    pub profile_name: String,
    pub transport: TransportKind,
    pub credentials: Option<AuthCredentials>,
    pub tls: TlsVerification,
    pub timeout: Duration,
}

impl DeviceTemplate {
    pub fn for_host(&self, host: &str) -> DeviceConfig {
        DeviceConfig {
            host: host.to_owned(),
            transport: self.transport.clone(),
            credentials: self.credentials.clone(),
            tls: self.tls.clone(),
            timeout: self.timeout,
        }
    }
}

/// Translate the active profile + global flags into a `DeviceTemplate`.
///
/// CLI flag overrides take priority over profile values. REST credentials
/// missing from every source are prompted for when stdin is a terminal.
pub fn resolve_template(global: &GlobalOpts, config: &Config) -> Result<DeviceTemplate, CliError> {
    resolve_template_with(global, config, &SystemSecrets)
}

/// [`resolve_template`] with the env/keyring lookups supplied by the caller.
pub fn resolve_template_with(
    global: &GlobalOpts,
    config: &Config,
    secrets: &impl SecretSource,
) -> Result<DeviceTemplate, CliError> {
    let (profile_name, mut profile) = active_profile(global, config)?;
    apply_overrides(&mut profile, global);

    // 1. Transport
    let transport = lldpdesc_config::profile_transport(&profile)?;

    // 2. TLS verification
    let tls = lldpdesc_config::profile_tls(&profile);

    // 3. Timeout (flag > profile > defaults)
    let timeout = global.timeout.map_or_else(
        || lldpdesc_config::profile_timeout(&profile, &config.defaults),
        Duration::from_secs,
    );

    // 4. Credentials (REST only)
    let credentials = match transport {
        TransportKind::Rest { .. } => {
            Some(resolve_credentials(&profile, &profile_name, secrets)?)
        }
        TransportKind::Local { .. } => None,
    };

    Ok(DeviceTemplate {
        profile_name,
        transport,
        credentials,
        tls,
        timeout,
    })
}

/// Fold `--transport`, `--scheme`, `--port`, `--user`, `--insecure` into
/// the profile.
fn apply_overrides(profile: &mut Profile, global: &GlobalOpts) {
    if let Some(transport) = global.transport {
        profile.transport = transport.as_str().into();
    }
    if let Some(scheme) = global.scheme {
        profile.scheme = Some(scheme.as_str().into());
    }
    if let Some(port) = global.port {
        profile.port = Some(port);
    }
    if let Some(ref user) = global.user {
        profile.username = Some(user.clone());
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
}

fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
    secrets: &impl SecretSource,
) -> Result<AuthCredentials, CliError> {
    let username = lldpdesc_config::resolve_username(profile, secrets);
    let password = lldpdesc_config::resolve_password(profile, profile_name, secrets);

    let (username, password) = match (username, password) {
        (Some(username), Some(password)) => return Ok(AuthCredentials { username, password }),
        partial => partial,
    };

    if !std::io::stdin().is_terminal() {
        return Err(CliError::NoCredentials {
            profile: profile_name.into(),
        });
    }

    let username = match username {
        Some(username) => username,
        None => Input::new()
            .with_prompt("Device Username")
            .interact_text()
            .map_err(prompt_err)?,
    };
    let password = match password {
        Some(password) => password,
        None => SecretString::from(
            rpassword::prompt_password("Device Password: ").map_err(prompt_err)?,
        ),
    };

    Ok(AuthCredentials { username, password })
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}
