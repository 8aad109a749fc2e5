// ── Core error types ──
//
// Per-device failures as the operator should see them. Consumers never see
// HTTP status codes or JSON parse failures directly: the session layer
// translates `lldpdesc_api::Error` into these variants with the device and
// the stage that failed attached.

use thiserror::Error;

/// Which collaborator call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Neighbors,
    Descriptions,
    Publish,
}

impl Stage {
    fn what(self) -> &'static str {
        match self {
            Self::Neighbors => "LLDP info",
            Self::Descriptions => "interface descriptions",
            Self::Publish => "description changes",
        }
    }
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to {device}: {reason}")]
    ConnectionFailed { device: String, reason: String },

    #[error("Authentication failed on {device}: {message}")]
    AuthenticationFailed { device: String, message: String },

    #[error("{device} did not answer within {timeout_secs}s")]
    Timeout { device: String, timeout_secs: u64 },

    // ── Collaborator errors ──────────────────────────────────────────
    #[error("Error retrieving {what} on {device}: {reason}")]
    QueryFailed {
        device: String,
        what: &'static str,
        reason: String,
    },

    #[error("Error committing description changes on {device}: {reason}")]
    PublishFailed { device: String, reason: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Translate a wire error raised while talking to `device`.
    pub fn from_api(device: &str, stage: Stage, err: lldpdesc_api::Error) -> Self {
        use lldpdesc_api::Error as Api;

        let device = device.to_owned();
        match err {
            Api::Authentication { message } => Self::AuthenticationFailed { device, message },
            Api::Timeout { timeout_secs } => Self::Timeout {
                device,
                timeout_secs,
            },
            Api::Transport(ref e) if e.is_connect() => Self::ConnectionFailed {
                device,
                reason: err.to_string(),
            },
            Api::Tls(reason) => Self::ConnectionFailed { device, reason },
            Api::InvalidUrl(e) => Self::Config {
                message: format!("invalid URL for {device}: {e}"),
            },
            other if stage == Stage::Publish => Self::PublishFailed {
                device,
                reason: other.to_string(),
            },
            other => Self::QueryFailed {
                device,
                what: stage.what(),
                reason: other.to_string(),
            },
        }
    }

    /// The device this error belongs to, if any.
    pub fn device(&self) -> Option<&str> {
        match self {
            Self::ConnectionFailed { device, .. }
            | Self::AuthenticationFailed { device, .. }
            | Self::Timeout { device, .. }
            | Self::QueryFailed { device, .. }
            | Self::PublishFailed { device, .. } => Some(device),
            Self::Config { .. } => None,
        }
    }
}
