// ── Runtime device configuration ──
//
// Describes *how* to reach one device. Carries credential data and
// transport tuning, but never touches disk: the CLI resolves profiles and
// hands a `DeviceConfig` in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

pub use lldpdesc_api::local::DEFAULT_CLI_PATH;

/// Default REST API service port (`system services rest http port`).
pub const DEFAULT_REST_PORT: u16 = 3000;

/// Login credentials for the REST transport.
#[derive(Debug, Clone)]
pub struct AuthCredentials {
    pub username: String,
    pub password: SecretString,
}

/// Which adapter reads and writes the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportKind {
    /// Junos REST API over HTTP(S).
    Rest { scheme: String, port: u16 },
    /// The `cli` binary on the device itself.
    Local { cli_path: PathBuf },
}

impl Default for TransportKind {
    fn default() -> Self {
        Self::Rest {
            scheme: "http".into(),
            port: DEFAULT_REST_PORT,
        }
    }
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed management certificates).
    DangerAcceptInvalid,
}

/// Configuration for one managed device.
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Hostname or address, as given on the command line.
    pub host: String,
    pub transport: TransportKind,
    /// Required for [`TransportKind::Rest`]; ignored for `Local`.
    pub credentials: Option<AuthCredentials>,
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
}

impl DeviceConfig {
    pub fn new(host: impl Into<String>, transport: TransportKind) -> Self {
        Self {
            host: host.into(),
            transport,
            credentials: None,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }
}
