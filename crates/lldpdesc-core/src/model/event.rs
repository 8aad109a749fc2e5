// ── LLDP transition events ──
//
// Produced by the reconciliation engine for operator visibility only.
// `Display` renders the canonical one-line form:
//
//   ge-0/0/1 LLDP Up. Now: r1 ge-0/0/10
//   ge-0/0/1 LLDP Up. Was: r1 ge-0/0/10 Now: r2 xe-1/0/0
//   ge-0/0/1 LLDP Change. Was: r1 ge-0/0/10 Now: r2 xe-1/0/0
//   ge-0/0/1 LLDP Down. Was: r1 ge-0/0/10

use std::fmt;

use serde::Serialize;
use strum::{Display, EnumString};

use super::neighbor::RemoteIdentity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString)]
pub enum ChangeKind {
    Up,
    Change,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEvent {
    pub local_port: String,
    pub kind: ChangeKind,
    /// What the description recorded, when there was a usable record.
    pub previous: Option<RemoteIdentity>,
    /// What LLDP reports now; absent for `Down`.
    pub current: Option<RemoteIdentity>,
}

impl ChangeEvent {
    pub fn up(local_port: &str, previous: Option<RemoteIdentity>, current: RemoteIdentity) -> Self {
        Self {
            local_port: local_port.to_owned(),
            kind: ChangeKind::Up,
            previous,
            current: Some(current),
        }
    }

    pub fn change(local_port: &str, previous: RemoteIdentity, current: RemoteIdentity) -> Self {
        Self {
            local_port: local_port.to_owned(),
            kind: ChangeKind::Change,
            previous: Some(previous),
            current: Some(current),
        }
    }

    pub fn down(local_port: &str, previous: RemoteIdentity) -> Self {
        Self {
            local_port: local_port.to_owned(),
            kind: ChangeKind::Down,
            previous: Some(previous),
            current: None,
        }
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} LLDP {}.", self.local_port, self.kind)?;
        if let Some(ref previous) = self.previous {
            write!(f, " Was: {previous}")?;
        }
        if let Some(ref current) = self.current {
            write!(f, " Now: {current}")?;
        }
        Ok(())
    }
}
