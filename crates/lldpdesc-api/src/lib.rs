// lldpdesc-api: Junos device clients for LLDP neighbors and interface
// descriptions, over the REST API or the on-box CLI.

pub mod auth;
pub mod error;
pub mod local;
pub mod models;
pub mod netconf;
pub mod rest;
pub mod transport;

pub use auth::Credentials;
pub use error::Error;
pub use local::LocalCli;
pub use models::{LldpNeighborEntry, PhysicalInterfaceEntry};
pub use rest::RestClient;
pub use transport::{TlsMode, TransportConfig};
