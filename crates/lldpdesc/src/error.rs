//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text and process exit codes.

use miette::Diagnostic;
use thiserror::Error;

use lldpdesc_config::ConfigError;
use lldpdesc_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to {device}")]
    #[diagnostic(
        code(lldpdesc::connection_failed),
        help(
            "{reason}\n\
             Check that the REST service is enabled (set system services rest http)\n\
             and that --scheme / --port match it."
        )
    )]
    ConnectionFailed { device: String, reason: String },

    #[error("{device} did not answer within {seconds}s")]
    #[diagnostic(
        code(lldpdesc::timeout),
        help("Increase timeout with --timeout or check device responsiveness.")
    )]
    Timeout { device: String, seconds: u64 },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed on {device}")]
    #[diagnostic(
        code(lldpdesc::auth_failed),
        help(
            "{message}\n\
             Verify the username and password.\n\
             Run: lldpdesc config set-password --profile {profile}"
        )
    )]
    AuthFailed {
        device: String,
        profile: String,
        message: String,
    },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(lldpdesc::no_credentials),
        help(
            "Configure credentials with: lldpdesc config init\n\
             Or set LLDPDESC_USERNAME and LLDPDESC_PASSWORD."
        )
    )]
    NoCredentials { profile: String },

    // ── Device ───────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(lldpdesc::device_failed),
        help("Re-run with -vv to see the exchange with {device}.")
    )]
    DeviceFailed { device: String, message: String },

    #[error("{failed} of {total} devices failed")]
    #[diagnostic(
        code(lldpdesc::sync_failed),
        help("Re-run with -v for per-device detail.")
    )]
    SyncFailed { failed: usize, total: usize },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(lldpdesc::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(lldpdesc::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: lldpdesc config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(lldpdesc::config))]
    Config(ConfigError),

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Translate a per-device core error, naming `profile` in auth help.
    pub fn from_core(err: CoreError, profile: &str) -> Self {
        match err {
            CoreError::ConnectionFailed { device, reason } => {
                Self::ConnectionFailed { device, reason }
            }
            CoreError::AuthenticationFailed { device, message } => Self::AuthFailed {
                device,
                profile: profile.into(),
                message,
            },
            CoreError::Timeout {
                device,
                timeout_secs,
            } => Self::Timeout {
                device,
                seconds: timeout_secs,
            },
            CoreError::Config { message } => Self::Validation {
                field: "configuration".into(),
                reason: message,
            },
            other @ (CoreError::QueryFailed { .. } | CoreError::PublishFailed { .. }) => {
                Self::DeviceFailed {
                    device: other.device().unwrap_or_default().to_owned(),
                    message: other.to_string(),
                }
            }
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}
