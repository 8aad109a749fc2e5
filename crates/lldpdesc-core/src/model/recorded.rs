// ── Persisted neighbor state ──
//
// The interface description is the only store. `RecordedTable` is decoded
// from a `DescriptionTable` at the start of every run.

use std::collections::BTreeMap;

use serde::Serialize;

use super::neighbor::RemoteIdentity;
use crate::codec;

/// What the last run recorded for one port, decoded from its description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecordedState {
    /// Operator-written text preceding the LLDP marker (right-trimmed).
    pub user_text: String,
    pub system: Option<String>,
    pub port: Option<String>,
    /// The neighbor was seen before but had disappeared on the last run.
    pub down: bool,
}

impl RecordedState {
    /// A description with no LLDP marker at all.
    pub fn unrecorded(user_text: impl Into<String>) -> Self {
        Self {
            user_text: user_text.into(),
            ..Self::default()
        }
    }

    /// The recorded neighbor, if both system and port are present and
    /// non-empty. Anything less counts as no record.
    pub fn identity(&self) -> Option<RemoteIdentity> {
        match (self.system.as_deref(), self.port.as_deref()) {
            (Some(system), Some(port)) if !system.is_empty() && !port.is_empty() => {
                Some(RemoteIdentity::new(system, port))
            }
            _ => None,
        }
    }
}

/// Raw interface descriptions keyed by local port.
///
/// A port with no description is the same as a port with an empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DescriptionTable(BTreeMap<String, String>);

impl DescriptionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, local_port: impl Into<String>, description: impl Into<String>) {
        self.0.insert(local_port.into(), description.into());
    }

    pub fn description(&self, local_port: &str) -> &str {
        self.0.get(local_port).map_or("", String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(port, text)| (port.as_str(), text.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<P: Into<String>, D: Into<String>> FromIterator<(P, D)> for DescriptionTable {
    fn from_iter<I: IntoIterator<Item = (P, D)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (port, description) in iter {
            table.insert(port, description);
        }
        table
    }
}

/// Decoded state for every described port.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RecordedTable(BTreeMap<String, RecordedState>);

impl RecordedTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode every description. Never fails; see [`codec::decode`].
    pub fn from_descriptions(descriptions: &DescriptionTable) -> Self {
        descriptions
            .iter()
            .map(|(port, text)| (port.to_owned(), codec::decode(text)))
            .collect()
    }

    pub fn insert(&mut self, local_port: impl Into<String>, state: RecordedState) {
        self.0.insert(local_port.into(), state);
    }

    pub fn get(&self, local_port: &str) -> Option<&RecordedState> {
        self.0.get(local_port)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RecordedState)> {
        self.0.iter().map(|(port, state)| (port.as_str(), state))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, RecordedState)> for RecordedTable {
    fn from_iter<I: IntoIterator<Item = (String, RecordedState)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
