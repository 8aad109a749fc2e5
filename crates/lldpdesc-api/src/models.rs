// Junos JSON RPC reply shapes
//
// Junos renders every XML element as an array of objects and every text
// node as `{"data": "..."}`, so a single leaf value looks like
// `"lldp-local-port-id": [{"data": "ge-0/0/1"}]`. The types here mirror
// that layout and flatten it into plain records for `lldpdesc-core`.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, preview};

/// One `{"data": "..."}` text node.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Leaf {
    #[serde(default)]
    pub data: Option<String>,
}

/// First text value of a leaf array, whitespace-trimmed, if non-empty.
fn leaf_text(leaves: &[Leaf]) -> Option<String> {
    leaves
        .first()
        .and_then(|leaf| leaf.data.as_deref())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

// ── LLDP neighbors ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct LldpNeighborsReply {
    #[serde(rename = "lldp-neighbors-information")]
    information: Option<Vec<LldpNeighborsInformation>>,
}

#[derive(Debug, Deserialize)]
struct LldpNeighborsInformation {
    #[serde(rename = "lldp-neighbor-information", default)]
    neighbors: Vec<RawLldpNeighbor>,
}

#[derive(Debug, Deserialize)]
struct RawLldpNeighbor {
    #[serde(rename = "lldp-local-port-id", default)]
    local_port_id: Vec<Leaf>,
    #[serde(rename = "lldp-remote-system-name", default)]
    remote_system_name: Vec<Leaf>,
    #[serde(rename = "lldp-remote-port-id", default)]
    remote_port_id: Vec<Leaf>,
}

/// A single row of `get-lldp-neighbors-information`, flattened.
///
/// Fields are optional because Junos omits elements a neighbor did not
/// advertise; filtering happens in `lldpdesc-core`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LldpNeighborEntry {
    pub local_port: Option<String>,
    pub remote_system: Option<String>,
    pub remote_port: Option<String>,
}

/// Parse a `get-lldp-neighbors-information` JSON reply.
///
/// A reply without the `lldp-neighbors-information` container means the
/// RPC did not run (LLDP disabled, wrong platform) and is an error. A
/// container with no neighbor rows is a valid, empty answer.
pub fn parse_lldp_neighbors(body: &str) -> Result<Vec<LldpNeighborEntry>, Error> {
    let reply: LldpNeighborsReply = from_json(body)?;
    let information = reply.information.ok_or_else(|| {
        Error::rpc(
            "get-lldp-neighbors-information",
            "reply has no lldp-neighbors-information element",
        )
    })?;

    Ok(information
        .iter()
        .flat_map(|info| info.neighbors.iter())
        .map(|raw| LldpNeighborEntry {
            local_port: leaf_text(&raw.local_port_id),
            remote_system: leaf_text(&raw.remote_system_name),
            remote_port: leaf_text(&raw.remote_port_id),
        })
        .collect())
}

// ── Interface descriptions ──────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct InterfaceReply {
    #[serde(rename = "interface-information", default)]
    information: Vec<InterfaceInformation>,
}

#[derive(Debug, Deserialize)]
struct InterfaceInformation {
    #[serde(rename = "physical-interface", default)]
    physical: Vec<RawPhysicalInterface>,
}

#[derive(Debug, Deserialize)]
struct RawPhysicalInterface {
    #[serde(default)]
    name: Vec<Leaf>,
    #[serde(default)]
    description: Vec<Leaf>,
}

/// A physical interface and its configured description, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicalInterfaceEntry {
    pub name: String,
    pub description: Option<String>,
}

/// Parse a `get-interface-information` (descriptions) JSON reply.
///
/// Devices with no described interfaces return a reply without the
/// `physical-interface` list; that yields an empty vector.
pub fn parse_interface_descriptions(body: &str) -> Result<Vec<PhysicalInterfaceEntry>, Error> {
    let reply: InterfaceReply = from_json(body)?;

    Ok(reply
        .information
        .iter()
        .flat_map(|info| info.physical.iter())
        .filter_map(|raw| {
            Some(PhysicalInterfaceEntry {
                name: leaf_text(&raw.name)?,
                description: leaf_text(&raw.description),
            })
        })
        .collect())
}

fn from_json<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| {
        Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(body)),
            body: body.to_owned(),
        }
    })
}
