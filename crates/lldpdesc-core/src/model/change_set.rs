// ── Description change set ──

use std::collections::BTreeMap;

use serde::Serialize;

/// New description text per local port: the only thing handed to the
/// publisher. Ports absent here are left untouched on the device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DescriptionChangeSet(BTreeMap<String, String>);

impl DescriptionChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, local_port: impl Into<String>, description: impl Into<String>) {
        self.0.insert(local_port.into(), description.into());
    }

    pub fn get(&self, local_port: &str) -> Option<&str> {
        self.0.get(local_port).map(String::as_str)
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

    /// Borrow as the port → text map the wire clients take.
    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }
}

impl<P: Into<String>, D: Into<String>> FromIterator<(P, D)> for DescriptionChangeSet {
    fn from_iter<I: IntoIterator<Item = (P, D)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (port, description) in iter {
            set.insert(port, description);
        }
        set
    }
}
