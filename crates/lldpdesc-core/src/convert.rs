// ── API-to-domain conversions ──
//
// Bridges the flattened `lldpdesc_api` reply rows into the domain tables
// the reconciliation engine works on.

use tracing::debug;

use lldpdesc_api::{LldpNeighborEntry, PhysicalInterfaceEntry};

use crate::model::{DescriptionTable, NeighborRecord, NeighborTable, RemoteIdentity};

/// Turn one LLDP row into a record.
///
/// Rows without a local port, remote system, or remote port are dropped. A
/// half identity encodes to a description that never decodes back, so the
/// port would report Up on every run.
pub fn neighbor_record(entry: LldpNeighborEntry) -> Option<NeighborRecord> {
    let LldpNeighborEntry {
        local_port,
        remote_system,
        remote_port,
    } = entry;

    let Some(local_port) = local_port else {
        debug!("skipping LLDP row without a local port");
        return None;
    };
    let (Some(system), Some(port)) = (remote_system, remote_port) else {
        debug!(port = %local_port, "skipping LLDP row without a full remote identity");
        return None;
    };

    Some(NeighborRecord::new(local_port, RemoteIdentity::new(system, port)))
}

pub fn neighbor_table(entries: Vec<LldpNeighborEntry>) -> NeighborTable {
    entries.into_iter().filter_map(neighbor_record).collect()
}

/// Interfaces without a description map to an empty one.
pub fn description_table(entries: Vec<PhysicalInterfaceEntry>) -> DescriptionTable {
    entries
        .into_iter()
        .map(|entry| (entry.name, entry.description.unwrap_or_default()))
        .collect()
}
