//! Structural validation of networks and topologies.

use std::collections::HashSet;

use crate::error::{TopologyError, TopologyResult};
use crate::model::{Network, Topology};

/// Validate the structure of a single network.
///
/// Checks:
/// - Node ids are unique within the network.
/// - Term point ids are unique within each node.
/// - Link ids are unique within the network.
/// - Every link edge names an existing node and term point of this network.
///
/// Supports are not checked: they reference other layers by name.
pub fn validate_network(network: &Network) -> TopologyResult<()> {
    let mut node_names = HashSet::new();
    for node in &network.nodes {
        if !node_names.insert(node.name.as_str()) {
            return Err(TopologyError::DuplicateNode {
                network: network.name.clone(),
                node: node.name.clone(),
            });
        }

        let mut tp_names = HashSet::new();
        for tp in &node.term_points {
            if !tp_names.insert(tp.name.as_str()) {
                return Err(TopologyError::DuplicateTermPoint {
                    network: network.name.clone(),
                    node: node.name.clone(),
                    tp: tp.name.clone(),
                });
            }
        }
    }

    let mut link_ids = HashSet::new();
    for link in &network.links {
        if !link_ids.insert(link.id.as_str()) {
            return Err(TopologyError::DuplicateLink {
                network: network.name.clone(),
                link: link.id.clone(),
            });
        }

        for edge in [link.source_ref(), link.destination_ref()] {
            let exists = network
                .find_node(&edge.node)
                .and_then(|n| n.find_term_point(&edge.tp))
                .is_some();
            if !exists {
                return Err(TopologyError::DanglingLinkEdge {
                    network: network.name.clone(),
                    link: link.id.clone(),
                    node: edge.node,
                    tp: edge.tp,
                });
            }
        }
    }

    Ok(())
}

/// Validate every network plus network-id uniqueness.
pub fn validate_topology(topology: &Topology) -> TopologyResult<()> {
    let mut names = HashSet::new();
    for network in topology.networks() {
        if !names.insert(network.name.as_str()) {
            return Err(TopologyError::DuplicateNetwork {
                network: network.name.clone(),
            });
        }
        validate_network(network)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Link, Node, TermPoint, TpRef};

    fn two_node_network() -> Network {
        let mut r1 = Node::new("R1");
        r1.term_points.push(TermPoint::new("eth0"));
        let mut r2 = Node::new("R2");
        r2.term_points.push(TermPoint::new("eth0"));
        Network {
            name: "layer3".into(),
            nodes: vec![r1, r2],
            ..Default::default()
        }
    }

    #[test]
    fn valid_network_passes() {
        let mut nw = two_node_network();
        nw.links
            .push(Link::new(TpRef::new("R1", "eth0"), TpRef::new("R2", "eth0")));
        assert!(validate_network(&nw).is_ok());
    }

    #[test]
    fn duplicate_node_detected() {
        let mut nw = two_node_network();
        nw.nodes.push(Node::new("R1"));
        let err = validate_network(&nw).unwrap_err();
        assert!(matches!(err, TopologyError::DuplicateNode { .. }));
    }

    #[test]
    fn duplicate_term_point_detected() {
        let mut nw = two_node_network();
        nw.nodes[0].term_points.push(TermPoint::new("eth0"));
        let err = validate_network(&nw).unwrap_err();
        assert!(matches!(err, TopologyError::DuplicateTermPoint { .. }));
    }

    #[test]
    fn dangling_link_edge_detected() {
        let mut nw = two_node_network();
        nw.links
            .push(Link::new(TpRef::new("R1", "eth0"), TpRef::new("R3", "eth0")));
        let err = validate_network(&nw).unwrap_err();
        match err {
            TopologyError::DanglingLinkEdge { node, tp, .. } => {
                assert_eq!(node, "R3");
                assert_eq!(tp, "eth0");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_network_detected() {
        let mut topo = Topology::default();
        topo.networks.network.push(two_node_network());
        topo.networks.network.push(two_node_network());
        let err = validate_topology(&topo).unwrap_err();
        assert!(matches!(err, TopologyError::DuplicateNetwork { .. }));
    }
}
