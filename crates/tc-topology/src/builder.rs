//! Incremental network and topology builders.

use serde_json::{Map, Value};

use crate::error::TopologyResult;
use crate::model::{Link, Network, NetworkSupport, Networks, Node, TermPoint, Topology, TpRef};
use crate::validate;

/// Builder for constructing one network incrementally.
///
/// Use `add_node`, `add_term_point` and `add_link` to build up the network,
/// then call `build()` to validate it.
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    network: Network,
}

impl NetworkBuilder {
    /// Create a builder for a network with one (primary) network type.
    pub fn new(name: impl Into<String>, network_type: &str) -> Self {
        let mut network_types = Map::new();
        network_types.insert(network_type.to_string(), Value::Object(Map::new()));
        Self {
            network: Network {
                name: name.into(),
                network_types,
                ..Default::default()
            },
        }
    }

    /// Create a builder that keeps an existing `network-types` map as-is.
    pub fn from_header(name: impl Into<String>, network_types: Map<String, Value>) -> Self {
        Self {
            network: Network {
                name: name.into(),
                network_types,
                ..Default::default()
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.network.name
    }

    pub fn add_support(&mut self, network_ref: impl Into<String>) -> &mut Self {
        self.network.supports.push(NetworkSupport {
            network_ref: network_ref.into(),
        });
        self
    }

    /// Set a top-level key of the network (e.g. an attribute container).
    pub fn set_attribute(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
        self.network.attributes.insert(key.into(), value);
        self
    }

    /// Add an empty node and return its index.
    pub fn add_node(&mut self, name: impl Into<String>) -> usize {
        self.push_node(Node::new(name))
    }

    /// Add a fully formed node and return its index.
    pub fn push_node(&mut self, node: Node) -> usize {
        self.network.nodes.push(node);
        self.network.nodes.len() - 1
    }

    /// Set a top-level key of a node (e.g. `mddo-topology:l3-node-attributes`).
    pub fn set_node_attribute(&mut self, node: usize, key: impl Into<String>, value: Value) {
        if let Some(n) = self.network.nodes.get_mut(node) {
            n.attributes.insert(key.into(), value);
        }
    }

    /// Add an empty term point to a node and return its index within the node.
    pub fn add_term_point(&mut self, node: usize, name: impl Into<String>) -> usize {
        self.push_term_point(node, TermPoint::new(name))
    }

    /// Add a fully formed term point to a node and return its index within the node.
    ///
    /// Out-of-range node indices are ignored (and caught by `build()` if a link refers to them).
    pub fn push_term_point(&mut self, node: usize, tp: TermPoint) -> usize {
        match self.network.nodes.get_mut(node) {
            Some(n) => {
                n.term_points.push(tp);
                n.term_points.len() - 1
            }
            None => 0,
        }
    }

    /// Add a unidirectional link.
    pub fn add_link(
        &mut self,
        src_node: impl Into<String>,
        src_tp: impl Into<String>,
        dst_node: impl Into<String>,
        dst_tp: impl Into<String>,
    ) -> &mut Self {
        self.push_link(Link::new(
            TpRef::new(src_node, src_tp),
            TpRef::new(dst_node, dst_tp),
        ))
    }

    /// Add a link pair (forward and reverse).
    pub fn add_bidirectional_link(
        &mut self,
        src_node: &str,
        src_tp: &str,
        dst_node: &str,
        dst_tp: &str,
    ) -> &mut Self {
        self.add_link(src_node, src_tp, dst_node, dst_tp);
        self.add_link(dst_node, dst_tp, src_node, src_tp)
    }

    pub fn push_link(&mut self, link: Link) -> &mut Self {
        self.network.links.push(link);
        self
    }

    /// Mutable access to the network under construction.
    pub fn network_mut(&mut self) -> &mut Network {
        &mut self.network
    }

    /// Validate and return the network.
    pub fn build(self) -> TopologyResult<Network> {
        validate::validate_network(&self.network)?;
        Ok(self.network)
    }
}

/// Builder for a topology document made of several networks.
#[derive(Debug, Default)]
pub struct TopologyBuilder {
    networks: Vec<Network>,
}

impl TopologyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_network(&mut self, network: Network) -> &mut Self {
        self.networks.push(network);
        self
    }

    /// Validate and return the topology.
    pub fn build(self) -> TopologyResult<Topology> {
        let topology = Topology {
            networks: Networks {
                network: self.networks,
            },
        };
        validate::validate_topology(&topology)?;
        Ok(topology)
    }
}
