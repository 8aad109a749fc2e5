// ── Live LLDP neighbor state ──
//
// Rebuilt from the device on every run; nothing here is persisted.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::debug;

/// A neighbor's advertised identity: remote system name and remote port.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RemoteIdentity {
    pub system: String,
    pub port: String,
}

impl RemoteIdentity {
    pub fn new(system: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            port: port.into(),
        }
    }
}

impl fmt::Display for RemoteIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.system, self.port)
    }
}

/// One local port observed as having an LLDP neighbor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NeighborRecord {
    pub local_port: String,
    pub remote: RemoteIdentity,
}

impl NeighborRecord {
    pub fn new(local_port: impl Into<String>, remote: RemoteIdentity) -> Self {
        Self {
            local_port: local_port.into(),
            remote,
        }
    }
}

/// Current neighbors keyed by local port. A port appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NeighborTable(BTreeMap<String, RemoteIdentity>);

impl NeighborTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record, replacing any earlier record for the same port.
    pub fn insert(&mut self, record: NeighborRecord) -> Option<RemoteIdentity> {
        let replaced = self.0.insert(record.local_port.clone(), record.remote);
        if let Some(ref old) = replaced {
            debug!(port = %record.local_port, was = %old, "duplicate LLDP neighbor row replaced");
        }
        replaced
    }

    pub fn get(&self, local_port: &str) -> Option<&RemoteIdentity> {
        self.0.get(local_port)
    }

    pub fn contains(&self, local_port: &str) -> bool {
        self.0.contains_key(local_port)
    }

    /// Ports in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RemoteIdentity)> {
        self.0.iter().map(|(port, remote)| (port.as_str(), remote))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<NeighborRecord> for NeighborTable {
    fn from_iter<I: IntoIterator<Item = NeighborRecord>>(iter: I) -> Self {
        let mut table = Self::new();
        for record in iter {
            table.insert(record);
        }
        table
    }
}
