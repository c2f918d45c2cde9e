//! Core topology data structures (RFC8345, netomox dialect).
//!
//! Supports and link edges are named references, not owning pointers:
//! a support names a network/node/tp of another layer, and it is resolved
//! by string lookup within the same document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::attr::AttrBag;

/// A whole topology document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    #[serde(rename = "ietf-network:networks", default)]
    pub networks: Networks,
}

/// The `ietf-network:networks` container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Networks {
    #[serde(default)]
    pub network: Vec<Network>,
}

/// One network layer (layer3, ospf_area0, bgp_proc, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Network {
    #[serde(rename = "network-id")]
    pub name: String,
    #[serde(rename = "network-types", default)]
    pub network_types: Map<String, Value>,
    #[serde(
        rename = "supporting-network",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub supports: Vec<NetworkSupport>,
    #[serde(rename = "node", default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<Node>,
    #[serde(
        rename = "ietf-network-topology:link",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub links: Vec<Link>,
    /// Attribute containers and any other keys (e.g. `mddo-topology:network-attributes`).
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// A node inside one network.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "node-id")]
    pub name: String,
    #[serde(
        rename = "supporting-node",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub supports: Vec<NodeSupport>,
    #[serde(
        rename = "ietf-network-topology:termination-point",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub term_points: Vec<TermPoint>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// A termination point (interface) of a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TermPoint {
    #[serde(rename = "tp-id")]
    pub name: String,
    #[serde(
        rename = "supporting-termination-point",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub supports: Vec<TpSupport>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// A unidirectional link between two term points of the same network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    #[serde(rename = "link-id")]
    pub id: String,
    pub source: LinkSource,
    pub destination: LinkDestination,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSource {
    #[serde(rename = "source-node")]
    pub node: String,
    #[serde(rename = "source-tp")]
    pub tp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDestination {
    #[serde(rename = "dest-node")]
    pub node: String,
    #[serde(rename = "dest-tp")]
    pub tp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSupport {
    #[serde(rename = "network-ref")]
    pub network_ref: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSupport {
    #[serde(rename = "network-ref")]
    pub network_ref: String,
    #[serde(rename = "node-ref")]
    pub node_ref: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TpSupport {
    #[serde(rename = "network-ref")]
    pub network_ref: String,
    #[serde(rename = "node-ref")]
    pub node_ref: String,
    #[serde(rename = "tp-ref")]
    pub tp_ref: String,
}

/// A (node, term point) pair: one end of a link.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TpRef {
    pub node: String,
    pub tp: String,
}

impl TpRef {
    pub fn new(node: impl Into<String>, tp: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            tp: tp.into(),
        }
    }
}

impl std::fmt::Display for TpRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.node, self.tp)
    }
}

impl Topology {
    /// Return all networks in document order.
    pub fn networks(&self) -> &[Network] {
        &self.networks.network
    }

    /// Find a network by name.
    pub fn find_network(&self, name: &str) -> Option<&Network> {
        self.networks.network.iter().find(|nw| nw.name == name)
    }

}

impl Network {
    /// The first key of `network-types`.
    pub fn primary_network_type(&self) -> Option<&str> {
        self.network_types.keys().next().map(String::as_str)
    }

    pub fn find_node(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn find_node_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.name == name)
    }

    /// Find the link whose source edge is `node`/`tp`.
    pub fn find_link_by_source(&self, node: &str, tp: &str) -> Option<&Link> {
        self.links
            .iter()
            .find(|l| l.source.node == node && l.source.tp == tp)
    }

    pub fn attr(&self) -> AttrBag<'_> {
        AttrBag::of(&self.attributes)
    }
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn find_term_point(&self, name: &str) -> Option<&TermPoint> {
        self.term_points.iter().find(|tp| tp.name == name)
    }

    pub fn find_term_point_mut(&mut self, name: &str) -> Option<&mut TermPoint> {
        self.term_points.iter_mut().find(|tp| tp.name == name)
    }

    pub fn attr(&self) -> AttrBag<'_> {
        AttrBag::of(&self.attributes)
    }

    /// `node-type` attribute (`segment`, `node`, `endpoint`).
    pub fn node_type(&self) -> Option<&str> {
        self.attr().node_type()
    }

    pub fn is_segment(&self) -> bool {
        self.node_type() == Some("segment")
    }
}

impl TermPoint {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn attr(&self) -> AttrBag<'_> {
        AttrBag::of(&self.attributes)
    }

    /// True if the term point carries the `loopback` flag.
    pub fn is_loopback(&self) -> bool {
        self.attr().flags().contains(&"loopback")
    }
}

impl Link {
    /// Create a link, deriving its id from both edges.
    pub fn new(source: TpRef, destination: TpRef) -> Self {
        let id = format!(
            "{},{},{},{}",
            source.node, source.tp, destination.node, destination.tp
        );
        Self {
            id,
            source: LinkSource {
                node: source.node,
                tp: source.tp,
            },
            destination: LinkDestination {
                node: destination.node,
                tp: destination.tp,
            },
            attributes: Map::new(),
        }
    }

    pub fn source_ref(&self) -> TpRef {
        TpRef::new(&self.source.node, &self.source.tp)
    }

    pub fn destination_ref(&self) -> TpRef {
        TpRef::new(&self.destination.node, &self.destination.tp)
    }

    /// True if `other` is this link with its edges swapped.
    pub fn is_reverse_of(&self, other: &Link) -> bool {
        self.source_ref() == other.destination_ref() && self.destination_ref() == other.source_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn link_id_from_edges() {
        let link = Link::new(TpRef::new("R1", "eth0"), TpRef::new("R2", "eth1"));
        assert_eq!(link.id, "R1,eth0,R2,eth1");
        assert_eq!(link.source_ref(), TpRef::new("R1", "eth0"));
        assert_eq!(link.destination_ref(), TpRef::new("R2", "eth1"));
    }

    #[test]
    fn reverse_link_detection() {
        let fwd = Link::new(TpRef::new("A", "e0"), TpRef::new("B", "e1"));
        let rev = Link::new(TpRef::new("B", "e1"), TpRef::new("A", "e0"));
        let other = Link::new(TpRef::new("B", "e1"), TpRef::new("A", "e9"));
        assert!(fwd.is_reverse_of(&rev));
        assert!(rev.is_reverse_of(&fwd));
        assert!(!fwd.is_reverse_of(&other));
        assert!(!fwd.is_reverse_of(&fwd));
    }

    #[test]
    fn deserialize_netomox_node() {
        let node: Node = serde_json::from_value(json!({
            "node-id": "R1",
            "supporting-node": [{"network-ref": "layer2", "node-ref": "R1_ge-0/0/0"}],
            "ietf-network-topology:termination-point": [
                {
                    "tp-id": "lo0.0",
                    "mddo-topology:l3-termination-point-attributes": {
                        "ip-address": ["10.0.0.1/32"],
                        "flag": ["loopback"]
                    }
                }
            ],
            "mddo-topology:l3-node-attributes": {"node-type": "node"}
        }))
        .unwrap();

        assert_eq!(node.name, "R1");
        assert_eq!(node.supports[0].node_ref, "R1_ge-0/0/0");
        assert_eq!(node.node_type(), Some("node"));
        assert!(!node.is_segment());
        assert!(node.find_term_point("lo0.0").unwrap().is_loopback());
    }

    #[test]
    fn primary_network_type_is_first_key() {
        let nw: Network = serde_json::from_value(json!({
            "network-id": "ospf_area0",
            "network-types": {"mddo-topology:ospf-area-network": {}}
        }))
        .unwrap();
        assert_eq!(
            nw.primary_network_type(),
            Some(crate::nwtype::MDDO_OSPF_AREA)
        );
        assert!(nw.nodes.is_empty());
    }
}
