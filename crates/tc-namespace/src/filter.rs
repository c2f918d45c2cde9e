//! Layer retention patterns and the rename-free layer filter.

use regex::Regex;
use tc_topology::{
    Link, Network, NetworkBuilder, Node, TermPoint, Topology, TopologyBuilder, nwtype,
};
use tracing::debug;

use crate::error::{NamespaceError, NamespaceResult};
use crate::keyconv::convert_entity_attributes;

/// Default retention patterns: layer 3 and the protocol layers above it.
pub const UPPER_LAYER3_PATTERNS: [&str; 4] =
    [r"^layer3$", r"^ospf_area\d+$", r"^bgp_proc$", r"^bgp_as$"];

/// Set of network-name patterns; a network is retained if any matches.
#[derive(Debug, Clone)]
pub struct LayerFilter {
    patterns: Vec<Regex>,
}

impl LayerFilter {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> NamespaceResult<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Regex::new(p.as_ref()).map_err(|e| NamespaceError::InvalidPattern {
                    pattern: p.as_ref().to_string(),
                    reason: e.to_string(),
                })
            })
            .collect::<NamespaceResult<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Retain layer 3, OSPF areas and the BGP layers by name.
    pub fn upper_layer3() -> Self {
        Self {
            patterns: UPPER_LAYER3_PATTERNS
                .iter()
                .map(|p| Regex::new(p).expect("built-in pattern is valid"))
                .collect(),
        }
    }

    /// Retain exactly the networks of `topology` whose type is layer 3 or above.
    pub fn from_network_types(topology: &Topology) -> Self {
        let patterns = topology
            .networks()
            .iter()
            .filter(|nw| {
                nw.primary_network_type()
                    .is_some_and(|t| nwtype::UPPER_LAYER3.contains(&t))
            })
            .map(|nw| {
                let exact = format!("^{}$", regex::escape(&nw.name));
                Regex::new(&exact).expect("escaped literal is a valid pattern")
            })
            .collect();
        Self { patterns }
    }

    pub fn retains(&self, network_name: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(network_name))
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(Regex::as_str)
    }
}

impl Default for LayerFilter {
    fn default() -> Self {
        Self::upper_layer3()
    }
}

/// Keep retained layers without renaming anything.
///
/// Attributes are key-converted and supports into dropped layers are removed,
/// so the result is self-contained.
pub fn filter_layers(source: &Topology, filter: &LayerFilter) -> NamespaceResult<Topology> {
    let mut topology = TopologyBuilder::new();
    for network in source.networks().iter().filter(|nw| filter.retains(&nw.name)) {
        topology.add_network(filter_network(network, filter)?);
    }
    let topology = topology.build()?;
    debug!(networks = topology.networks().len(), "layers filtered");
    Ok(topology)
}

fn filter_network(src: &Network, filter: &LayerFilter) -> NamespaceResult<Network> {
    let mut nw = NetworkBuilder::from_header(&src.name, src.network_types.clone());
    for support in &src.supports {
        nw.add_support(&support.network_ref);
    }
    for (key, value) in convert_entity_attributes(&src.attributes) {
        nw.set_attribute(key, value);
    }
    for node in &src.nodes {
        nw.push_node(filter_node(node, filter));
    }
    for link in &src.links {
        let mut dst = Link::new(link.source_ref(), link.destination_ref());
        dst.attributes = convert_entity_attributes(&link.attributes);
        nw.push_link(dst);
    }
    Ok(nw.build()?)
}

fn filter_node(src: &Node, filter: &LayerFilter) -> Node {
    Node {
        name: src.name.clone(),
        supports: src
            .supports
            .iter()
            .filter(|s| filter.retains(&s.network_ref))
            .cloned()
            .collect(),
        term_points: src
            .term_points
            .iter()
            .map(|tp| TermPoint {
                name: tp.name.clone(),
                supports: tp
                    .supports
                    .iter()
                    .filter(|s| filter.retains(&s.network_ref))
                    .cloned()
                    .collect(),
                attributes: convert_entity_attributes(&tp.attributes),
            })
            .collect(),
        attributes: convert_entity_attributes(&src.attributes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tc_topology::{NodeSupport, TpSupport};

    #[test]
    fn default_patterns() {
        let f = LayerFilter::default();
        assert!(f.retains("layer3"));
        assert!(f.retains("ospf_area0"));
        assert!(f.retains("ospf_area12"));
        assert!(f.retains("bgp_proc"));
        assert!(!f.retains("layer2"));
        assert!(!f.retains("ospf_area"));
        assert!(!f.retains("xlayer3"));
    }

    #[test]
    fn invalid_pattern() {
        let err = LayerFilter::new(&["ospf_area(\\d+"]).unwrap_err();
        assert!(matches!(err, NamespaceError::InvalidPattern { .. }));
    }

    #[test]
    fn filter_by_network_type() {
        let mut topo = TopologyBuilder::new();
        topo.add_network(NetworkBuilder::new("l2", nwtype::MDDO_L2).build().unwrap());
        topo.add_network(NetworkBuilder::new("l3.core", nwtype::MDDO_L3).build().unwrap());
        let topo = topo.build().unwrap();

        let f = LayerFilter::from_network_types(&topo);
        assert!(f.retains("l3.core"));
        assert!(!f.retains("l3xcore"));
        assert!(!f.retains("l2"));
    }

    #[test]
    fn filter_drops_layers_and_dangling_supports() {
        let mut l2 = NetworkBuilder::new("layer2", nwtype::MDDO_L2);
        l2.add_node("R1_ge-0/0/0");
        let mut l3 = NetworkBuilder::new("layer3", nwtype::MDDO_L3);
        l3.add_support("layer2");
        let mut node = Node::new("R1");
        node.supports.push(NodeSupport {
            network_ref: "layer2".into(),
            node_ref: "R1_ge-0/0/0".into(),
        });
        let mut tp = TermPoint::new("ge-0/0/0.0");
        tp.supports.push(TpSupport {
            network_ref: "layer2".into(),
            node_ref: "R1_ge-0/0/0".into(),
            tp_ref: "ge-0/0/0".into(),
        });
        tp.attributes.insert(
            "mddo-topology:l3-termination-point-attributes".into(),
            json!({"ip-address": ["10.0.0.1/30"]}),
        );
        node.term_points.push(tp);
        l3.push_node(node);

        let mut ospf = NetworkBuilder::new("ospf_area0", nwtype::MDDO_OSPF_AREA);
        ospf.add_support("layer3");
        let mut onode = Node::new("R1");
        onode.supports.push(NodeSupport {
            network_ref: "layer3".into(),
            node_ref: "R1".into(),
        });
        ospf.push_node(onode);

        let mut topo = TopologyBuilder::new();
        topo.add_network(l2.build().unwrap());
        topo.add_network(l3.build().unwrap());
        topo.add_network(ospf.build().unwrap());
        let filtered = filter_layers(&topo.build().unwrap(), &LayerFilter::default()).unwrap();

        assert_eq!(filtered.networks().len(), 2);
        assert!(filtered.find_network("layer2").is_none());

        let l3 = filtered.find_network("layer3").unwrap();
        // network-level supports are names only, kept as-is
        assert_eq!(l3.supports[0].network_ref, "layer2");
        let r1 = l3.find_node("R1").unwrap();
        assert!(r1.supports.is_empty());
        let tp = r1.find_term_point("ge-0/0/0.0").unwrap();
        assert!(tp.supports.is_empty());
        assert_eq!(tp.attr().ip_addresses(), vec!["10.0.0.1/30"]);
        assert!(tp.attributes["mddo-topology:l3-termination-point-attributes"]
            .get("ip_addr")
            .is_some());

        let onode = filtered.find_network("ospf_area0").unwrap().find_node("R1").unwrap();
        assert_eq!(onode.supports.len(), 1);
    }
}
