//! Key and record types shared by the alias tables.

use std::fmt;

use serde::{Deserialize, Serialize};
use tc_topology::TpRef;

/// Name of the layer whose node ids pack a (bridge, interface) pair.
pub const LAYER2_NETWORK: &str = "layer2";

/// Composite (node, term point) key of the term-point table.
pub type TpKey = TpRef;

/// (node, OSPF process tag) key of the OSPF process table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OspfProcKey {
    pub node: String,
    pub process: String,
}

impl OspfProcKey {
    pub fn new(node: impl Into<String>, process: impl Into<String>) -> Self {
        Self {
            node: node.into(),
            process: process.into(),
        }
    }
}

impl fmt::Display for OspfProcKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[ospf proc {}]", self.node, self.process)
    }
}

/// Static-route key.
///
/// Original keys leave `egress` empty. Converted keys keep the route's
/// `interface` and carry the selected egress term point in `egress`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StaticRouteKey {
    pub node: String,
    pub prefix: String,
    pub next_hop: Option<String>,
    pub interface: Option<String>,
    pub egress: Option<String>,
}

impl fmt::Display for StaticRouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}", self.node, self.prefix)?;
        if let Some(nh) = &self.next_hop {
            write!(f, " via {nh}")?;
        }
        if let Some(ifname) = &self.interface {
            write!(f, " dev {ifname}")?;
        }
        if let Some(egress) = &self.egress {
            write!(f, " egress {egress}")?;
        }
        write!(f, "]")
    }
}

/// Converted names of one node or term point.
///
/// `l3_model` is the converted identifier in the emulated L3 model.
/// `l1_principal` addresses the emulated instance (the OVS bridge for a
/// segment), `l1_agent` the name used in the instance's own configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRecord {
    pub l3_model: String,
    pub l1_principal: String,
    pub l1_agent: String,
}

impl NameRecord {
    /// Record whose three names are all `name`.
    pub fn uniform(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            l3_model: name.clone(),
            l1_principal: name.clone(),
            l1_agent: name,
        }
    }

    pub fn l1(&self) -> L1Alias {
        L1Alias {
            principal: self.l1_principal.clone(),
            agent: self.l1_agent.clone(),
        }
    }
}

/// Principal/agent pair used when wiring physical links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct L1Alias {
    pub principal: String,
    pub agent: String,
}

/// A layer-2 node id of the form `<bridge>_<interface>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedNodeTp {
    pub node: String,
    pub tp: String,
}

impl PackedNodeTp {
    /// Split at the first `_`. Both halves must be non-empty.
    pub fn parse(packed: &str) -> Option<Self> {
        let (node, tp) = packed.split_once('_')?;
        if node.is_empty() || tp.is_empty() {
            return None;
        }
        Some(Self {
            node: node.to_string(),
            tp: tp.to_string(),
        })
    }

    pub fn pack(&self) -> String {
        format!("{}_{}", self.node, self.tp)
    }

    pub fn as_tp_key(&self) -> TpKey {
        TpRef::new(&self.node, &self.tp)
    }
}

/// Lower-case slug used in segment term-point names.
pub(crate) fn slug(name: &str) -> String {
    name.replace(['_', '/'], "-").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_layer2_reference_splits_at_first_underscore() {
        let p = PackedNodeTp::parse("bridge1_ethA").unwrap();
        assert_eq!(p.node, "bridge1");
        assert_eq!(p.tp, "ethA");
        assert_eq!(p.pack(), "bridge1_ethA");

        let p = PackedNodeTp::parse("R1_ge-0/0/0_1").unwrap();
        assert_eq!(p.node, "R1");
        assert_eq!(p.tp, "ge-0/0/0_1");
    }

    #[test]
    fn packed_layer2_reference_rejects_unpacked_names() {
        assert!(PackedNodeTp::parse("bridge1").is_none());
        assert!(PackedNodeTp::parse("_ethA").is_none());
        assert!(PackedNodeTp::parse("bridge1_").is_none());
    }

    #[test]
    fn slug_lowercases_and_replaces_separators() {
        assert_eq!(slug("Region-A-PE1"), "region-a-pe1");
        assert_eq!(slug("Seg_10.0.0.0/24"), "seg-10.0.0.0-24");
    }

    #[test]
    fn static_route_key_display() {
        let key = StaticRouteKey {
            node: "R1".into(),
            prefix: "0.0.0.0/0".into(),
            next_hop: Some("10.0.0.2".into()),
            interface: None,
            egress: None,
        };
        assert_eq!(key.to_string(), "R1[0.0.0.0/0 via 10.0.0.2]");

        let converted = StaticRouteKey {
            interface: Some("dynamic".into()),
            egress: Some("eth1.0".into()),
            ..key
        };
        assert_eq!(
            converted.to_string(),
            "R1[0.0.0.0/0 via 10.0.0.2 dev dynamic egress eth1.0]"
        );
    }
}
