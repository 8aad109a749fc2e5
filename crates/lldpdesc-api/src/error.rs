use thiserror::Error;

/// Top-level error type for the `lldpdesc-api` crate.
///
/// Covers every failure mode of both device transports: HTTP RPC and
/// on-box CLI execution. `lldpdesc-core` maps these into per-device
/// diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The device rejected the supplied username/password.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── RPC ─────────────────────────────────────────────────────────
    /// The device answered, but the RPC reported an error
    /// (`xnm:error`, non-success HTTP status, `error:` CLI output).
    #[error("RPC {rpc} failed: {message}")]
    Rpc { rpc: String, message: String },

    /// The configuration load/commit sequence did not complete cleanly.
    #[error("Commit failed: {message}")]
    Commit { message: String },

    // ── Local execution ─────────────────────────────────────────────
    /// The on-box `cli` binary could not be spawned or talked to.
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the device rejected our credentials.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Returns `true` if this is a connectivity problem rather than
    /// a complaint from the device itself.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }

    pub(crate) fn rpc(rpc: &str, message: impl Into<String>) -> Self {
        Self::Rpc {
            rpc: rpc.to_owned(),
            message: message.into(),
        }
    }
}

/// First 200 characters of a reply body, for error messages.
pub(crate) fn preview(body: &str) -> String {
    body.chars().take(200).collect()
}
