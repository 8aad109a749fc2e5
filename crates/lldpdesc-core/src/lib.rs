//! LLDP topology tracking in interface descriptions.
//!
//! Each device's interface descriptions double as its memory: the engine
//! reads what was recorded last time, compares it with what LLDP reports
//! now, and writes back the difference.
//!
//! - **[`codec`]**: the `[text ]LLDP: <system> <port>[(DOWN)]` grammar,
//!   [`decode`](codec::decode) / [`encode`](codec::encode).
//! - **[`reconcile()`]**: pure diff of a [`NeighborTable`] against a
//!   [`RecordedTable`], yielding [`ChangeEvent`]s and a
//!   [`DescriptionChangeSet`].
//! - **[`Session`]**: a [`DeviceSession`] over the Junos REST API or the
//!   on-box `cli`, built from a [`DeviceConfig`].
//! - **[`sync_device()`]**: one fetch → reconcile → publish pass.

pub mod codec;
pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod reconcile;
pub mod session;
pub mod sync;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{
    AuthCredentials, DEFAULT_CLI_PATH, DEFAULT_REST_PORT, DeviceConfig, TlsVerification,
    TransportKind,
};
pub use error::{CoreError, Stage};
pub use reconcile::{Reconciliation, reconcile};
pub use session::{DeviceSession, NeighborQuery, Session};
pub use sync::{DEFAULT_COMMIT_COMMENT, DeviceReport, SyncOptions, SyncOutcome, sync_device};

pub use model::{
    ChangeEvent, ChangeKind, DescriptionChangeSet, DescriptionTable, NeighborRecord,
    NeighborTable, RecordedState, RecordedTable, RemoteIdentity,
};
