// ── Device sessions ──
//
// The engine only needs three things from a device: the live neighbor
// table, the current descriptions, and a way to commit new ones.
// `DeviceSession` is that contract; `Session` implements it over either
// wire client from `lldpdesc-api`.

use std::future::Future;

use tracing::debug;

use lldpdesc_api::{Credentials, LocalCli, RestClient, TlsMode, TransportConfig};

use crate::config::{DeviceConfig, TlsVerification, TransportKind};
use crate::convert;
use crate::error::{CoreError, Stage};
use crate::model::{DescriptionChangeSet, DescriptionTable, NeighborTable};

/// Outcome of asking a device for its LLDP neighbors.
///
/// Keeps "the query failed" and "the query worked and found nobody" apart:
/// the first aborts the device, the second is a valid empty table.
#[derive(Debug)]
pub enum NeighborQuery {
    Found(NeighborTable),
    Empty,
    QueryFailed(CoreError),
}

impl NeighborQuery {
    pub fn from_table(table: NeighborTable) -> Self {
        if table.is_empty() {
            Self::Empty
        } else {
            Self::Found(table)
        }
    }
}

impl From<Result<NeighborTable, CoreError>> for NeighborQuery {
    fn from(result: Result<NeighborTable, CoreError>) -> Self {
        match result {
            Ok(table) => Self::from_table(table),
            Err(err) => Self::QueryFailed(err),
        }
    }
}

/// Fetch/publish contract for one device.
pub trait DeviceSession {
    /// Name used in logs and reports.
    fn device(&self) -> &str;

    fn fetch_neighbors(&self) -> impl Future<Output = NeighborQuery> + Send;

    fn fetch_descriptions(
        &self,
    ) -> impl Future<Output = Result<DescriptionTable, CoreError>> + Send;

    /// Write every change and commit them as one transaction.
    fn publish(
        &self,
        changes: &DescriptionChangeSet,
        comment: &str,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}

enum Backend {
    Rest(RestClient),
    Local(LocalCli),
}

/// A device reached through one of the wire clients.
pub struct Session {
    device: String,
    backend: Backend,
}

impl Session {
    /// Build the client for `config`. No traffic is sent until the first
    /// fetch.
    pub fn open(config: &DeviceConfig) -> Result<Self, CoreError> {
        let backend = match &config.transport {
            TransportKind::Rest { scheme, port } => {
                let auth = config.credentials.as_ref().ok_or_else(|| CoreError::Config {
                    message: format!("no credentials for {} (REST transport)", config.host),
                })?;
                let transport = TransportConfig {
                    tls: match &config.tls {
                        TlsVerification::SystemDefaults => TlsMode::System,
                        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
                    },
                    timeout: config.timeout,
                };
                let credentials = Credentials::new(auth.username.clone(), auth.password.clone());
                let base_url = RestClient::endpoint(scheme, &config.host, *port)
                    .map_err(|e| CoreError::from_api(&config.host, Stage::Neighbors, e))?;
                debug!(device = %config.host, url = %base_url, "using REST transport");

                let client = RestClient::new(base_url, credentials, &transport)
                    .map_err(|e| CoreError::from_api(&config.host, Stage::Neighbors, e))?;
                Backend::Rest(client)
            }
            TransportKind::Local { cli_path } => {
                debug!(device = %config.host, cli = %cli_path.display(), "using on-box CLI");
                Backend::Local(LocalCli::new(cli_path.clone()))
            }
        };

        Ok(Self {
            device: config.host.clone(),
            backend,
        })
    }
}

impl DeviceSession for Session {
    fn device(&self) -> &str {
        &self.device
    }

    async fn fetch_neighbors(&self) -> NeighborQuery {
        let result = match &self.backend {
            Backend::Rest(client) => client.lldp_neighbors().await,
            Backend::Local(cli) => cli.lldp_neighbors().await,
        };
        result
            .map(convert::neighbor_table)
            .map_err(|e| CoreError::from_api(&self.device, Stage::Neighbors, e))
            .into()
    }

    async fn fetch_descriptions(&self) -> Result<DescriptionTable, CoreError> {
        let result = match &self.backend {
            Backend::Rest(client) => client.interface_descriptions().await,
            Backend::Local(cli) => cli.interface_descriptions().await,
        };
        result
            .map(convert::description_table)
            .map_err(|e| CoreError::from_api(&self.device, Stage::Descriptions, e))
    }

    async fn publish(&self, changes: &DescriptionChangeSet, comment: &str) -> Result<(), CoreError> {
        let result = match &self.backend {
            Backend::Rest(client) => client.load_descriptions(changes.as_map(), comment).await,
            Backend::Local(cli) => cli.load_descriptions(changes.as_map(), comment).await,
        };
        result.map_err(|e| CoreError::from_api(&self.device, Stage::Publish, e))
    }
}
