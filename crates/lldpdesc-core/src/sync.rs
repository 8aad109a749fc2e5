// ── Per-device sync workflow ──
//
// fetch neighbors → fetch descriptions → decode → reconcile → publish.
// Each device is independent; a failure anywhere aborts only that device
// and nothing is written unless the whole change set can be committed.

use serde::Serialize;
use strum::Display;
use tracing::{info, warn};

use crate::error::CoreError;
use crate::model::{ChangeEvent, DescriptionChangeSet, NeighborTable, RecordedTable};
use crate::reconcile::reconcile;
use crate::session::{DeviceSession, NeighborQuery};

/// Commit log comment used when none is configured.
pub const DEFAULT_COMMIT_COMMENT: &str = "LLDP interface descriptions updated by lldpdesc";

#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Compute and report changes without committing them.
    pub dry_run: bool,
    pub commit_comment: String,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            commit_comment: DEFAULT_COMMIT_COMMENT.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SyncOutcome {
    /// Descriptions already matched LLDP; nothing was written.
    NoChanges,
    /// Changes were computed but not committed.
    DryRun,
    Committed,
}

/// What happened on one device.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceReport {
    pub device: String,
    /// Number of ports with a live LLDP neighbor.
    pub neighbors: usize,
    pub events: Vec<ChangeEvent>,
    pub changes: DescriptionChangeSet,
    pub outcome: SyncOutcome,
}

/// Run one reconciliation pass against a device.
pub async fn sync_device<S: DeviceSession>(
    session: &S,
    options: &SyncOptions,
) -> Result<DeviceReport, CoreError> {
    let device = session.device();

    info!(device, "getting LLDP information");
    let current = match session.fetch_neighbors().await {
        NeighborQuery::Found(table) => table,
        NeighborQuery::Empty => {
            warn!(device, "no LLDP neighbors; make sure LLDP is enabled");
            NeighborTable::new()
        }
        NeighborQuery::QueryFailed(err) => return Err(err),
    };

    info!(device, "getting interface descriptions");
    let descriptions = session.fetch_descriptions().await?;
    let previous = RecordedTable::from_descriptions(&descriptions);

    let result = reconcile(&current, &previous);
    for event in &result.events {
        info!(device, "{event}");
    }

    let outcome = if result.changes.is_empty() {
        info!(device, "no LLDP changes to configure");
        SyncOutcome::NoChanges
    } else if options.dry_run {
        info!(device, changes = result.changes.len(), "dry run; not committing");
        SyncOutcome::DryRun
    } else {
        session.publish(&result.changes, &options.commit_comment).await?;
        info!(device, changes = result.changes.len(), "committed configuration changes");
        SyncOutcome::Committed
    };

    Ok(DeviceReport {
        device: device.to_owned(),
        neighbors: current.len(),
        events: result.events,
        changes: result.changes,
        outcome,
    })
}
