//! Shared configuration for the `lldpdesc` CLI.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext), and
//! translation of a profile into the pieces of `lldpdesc_core::DeviceConfig`.
//! The CLI layers its flag overrides and interactive prompts on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use lldpdesc_core::{
    DEFAULT_CLI_PATH, DEFAULT_COMMIT_COMMENT, DEFAULT_REST_PORT, TlsVerification, TransportKind,
};

/// Service name under which passwords live in the system keyring.
pub const KEYRING_SERVICE: &str = "lldpdesc";

/// Environment variable consulted for the device password.
pub const PASSWORD_ENV: &str = "LLDPDESC_PASSWORD";

/// Environment variable consulted for the device username.
pub const USERNAME_ENV: &str = "LLDPDESC_USERNAME";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named device profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Devices synced in parallel.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Commit log comment for published changes.
    #[serde(default = "default_commit_comment")]
    pub commit_comment: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            concurrency: default_concurrency(),
            commit_comment: default_commit_comment(),
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
fn default_concurrency() -> usize {
    4
}
fn default_commit_comment() -> String {
    DEFAULT_COMMIT_COMMENT.into()
}

/// A named device profile: how to reach and log in to a set of devices.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Profile {
    /// "rest" or "local".
    #[serde(default = "default_transport")]
    pub transport: String,

    /// REST scheme, "http" or "https".
    pub scheme: Option<String>,

    /// REST service port.
    pub port: Option<u16>,

    pub username: Option<String>,

    /// Password (plaintext; prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Accept self-signed TLS certificates.
    pub insecure: Option<bool>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// Path to the Junos `cli` binary for the local transport.
    pub cli_path: Option<PathBuf>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            transport: default_transport(),
            scheme: None,
            port: None,
            username: None,
            password: None,
            password_env: None,
            insecure: None,
            ca_cert: None,
            timeout: None,
            cli_path: None,
        }
    }
}

fn default_transport() -> String {
    "rest".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "LLDPDESC_CONFIG";

/// Resolve the config file path: `LLDPDESC_CONFIG`, else XDG / platform
/// conventions.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("com", "lldpdesc", "lldpdesc").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("lldpdesc");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load a Config from `path`, layered over defaults and under `LLDPDESC_*`
/// environment overrides (`LLDPDESC_DEFAULTS__TIMEOUT=60`).
///
/// A missing file is not an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("LLDPDESC_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist or is broken.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

fn keyring_key(profile_name: &str) -> String {
    format!("{profile_name}/password")
}

/// Store a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &keyring_key(profile_name))?;
    entry.set_password(password)?;
    Ok(())
}

/// Where the credential chain looks beyond the profile itself.
pub trait SecretSource {
    fn env(&self, name: &str) -> Option<String>;
    fn keyring(&self, key: &str) -> Option<String>;
}

/// The process environment and the system keyring.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemSecrets;

impl SecretSource for SystemSecrets {
    fn env(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn keyring(&self, key: &str) -> Option<String> {
        keyring::Entry::new(KEYRING_SERVICE, key)
            .and_then(|entry| entry.get_password())
            .ok()
    }
}

/// Resolve a profile's password: `password_env` → `LLDPDESC_PASSWORD` →
/// keyring → plaintext. `None` when no source has one.
pub fn resolve_password(
    profile: &Profile,
    profile_name: &str,
    secrets: &impl SecretSource,
) -> Option<SecretString> {
    // 1. Profile's password_env → env var lookup
    if let Some(pw) = profile
        .password_env
        .as_deref()
        .and_then(|name| secrets.env(name))
    {
        return Some(SecretString::from(pw));
    }

    // 2. Well-known env var
    if let Some(pw) = secrets.env(PASSWORD_ENV) {
        return Some(SecretString::from(pw));
    }

    // 3. System keyring
    if let Some(pw) = secrets.keyring(&keyring_key(profile_name)) {
        return Some(SecretString::from(pw));
    }

    // 4. Plaintext in config
    profile.password.clone().map(SecretString::from)
}

/// Resolve the username: profile value, then `LLDPDESC_USERNAME`.
pub fn resolve_username(profile: &Profile, secrets: &impl SecretSource) -> Option<String> {
    profile
        .username
        .clone()
        .or_else(|| secrets.env(USERNAME_ENV))
}

// ── Profile → runtime pieces ────────────────────────────────────────

/// Build the transport kind a profile selects.
pub fn profile_transport(profile: &Profile) -> Result<TransportKind, ConfigError> {
    match profile.transport.as_str() {
        "rest" => {
            let scheme = profile.scheme.clone().unwrap_or_else(|| "http".into());
            if scheme != "http" && scheme != "https" {
                return Err(ConfigError::Validation {
                    field: "scheme".into(),
                    reason: format!("expected 'http' or 'https', got '{scheme}'"),
                });
            }
            Ok(TransportKind::Rest {
                scheme,
                port: profile.port.unwrap_or(DEFAULT_REST_PORT),
            })
        }
        "local" => Ok(TransportKind::Local {
            cli_path: profile
                .cli_path
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CLI_PATH)),
        }),
        other => Err(ConfigError::Validation {
            field: "transport".into(),
            reason: format!("expected 'rest' or 'local', got '{other}'"),
        }),
    }
}

pub fn profile_tls(profile: &Profile) -> TlsVerification {
    if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    }
}

/// Effective request timeout: the profile's override or the global default.
pub fn profile_timeout(profile: &Profile, defaults: &Defaults) -> Duration {
    Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout))
}
