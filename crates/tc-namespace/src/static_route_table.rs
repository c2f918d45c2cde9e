//! Static-route egress alias table.
//!
//! Each static route of a base-layer node is keyed by (node, prefix,
//! next-hop, interface). The converted key keeps those fields and adds a
//! representative egress term point:
//!
//! 1. the route's own interface, if it names a term point of the node;
//! 2. else the first term point (sorted by name) whose address prefix
//!    contains the next hop;
//! 3. else `dynamic`, leaving egress resolution to the routing daemon.

use std::collections::BTreeMap;
use std::net::IpAddr;

use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};
use tc_topology::{Node, StaticRoute, Topology, TpRef};
use tracing::debug;

use crate::alias::{AliasEntry, AliasTable};
use crate::error::{NamespaceError, NamespaceResult};
use crate::keys::StaticRouteKey;
use crate::node_table::NodeNameAliasTable;
use crate::tp_table::TermPointAliasTable;

pub const STATIC_ROUTE_TABLE: &str = "static_route_tp_table";

/// Egress name used when no term point can be selected.
pub const DYNAMIC_EGRESS: &str = "dynamic";

/// One persisted route of a (node, prefix) bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEgress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_hop: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    pub egress: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StaticRouteTpAliasTable {
    aliases: AliasTable<StaticRouteKey>,
}

impl Default for StaticRouteTpAliasTable {
    fn default() -> Self {
        Self {
            aliases: AliasTable::new(STATIC_ROUTE_TABLE),
        }
    }
}

fn route_key(node: &str, route: &StaticRoute) -> StaticRouteKey {
    StaticRouteKey {
        node: node.to_string(),
        prefix: route.prefix.clone(),
        next_hop: route.next_hop.clone(),
        interface: route.interface.clone(),
        egress: None,
    }
}

/// Pick the representative egress term point of `route` on `node`.
fn select_egress(
    node: &Node,
    route: &StaticRoute,
    tps: &TermPointAliasTable,
) -> NamespaceResult<String> {
    if let Some(ifname) = route.interface.as_deref() {
        if node.find_term_point(ifname).is_some() {
            return Ok(tps.forward(&TpRef::new(&node.name, ifname))?.tp.clone());
        }
    }

    let next_hop = route
        .next_hop
        .as_deref()
        .and_then(|nh| nh.parse::<IpAddr>().ok());
    if let Some(next_hop) = next_hop {
        let mut candidates: Vec<_> = node.term_points.iter().collect();
        candidates.sort_by(|a, b| a.name.cmp(&b.name));
        for tp in candidates {
            let reachable = tp
                .attr()
                .ip_addresses()
                .iter()
                .filter_map(|addr| addr.parse::<IpNetwork>().ok())
                .any(|net| net.contains(next_hop));
            if reachable {
                return Ok(tps.forward(&TpRef::new(&node.name, &tp.name))?.tp.clone());
            }
        }
    }

    Ok(DYNAMIC_EGRESS.to_string())
}

impl StaticRouteTpAliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(
        &mut self,
        topology: &Topology,
        base_layer: &str,
        nodes: &NodeNameAliasTable,
        tps: &TermPointAliasTable,
    ) -> NamespaceResult<()> {
        let network =
            topology
                .find_network(base_layer)
                .ok_or_else(|| NamespaceError::NetworkNotFound {
                    name: base_layer.to_string(),
                    reason: "base layer for static routes".to_string(),
                })?;

        for node in network.nodes.iter().filter(|n| !n.is_segment()) {
            let routes = node.attr().static_routes();
            if routes.is_empty() {
                continue;
            }
            let converted_node = nodes.forward(&node.name)?;
            for route in &routes {
                let egress = select_egress(node, route, tps)?;
                let original = route_key(&node.name, route);
                let converted = StaticRouteKey {
                    node: converted_node.to_string(),
                    egress: Some(egress),
                    ..original.clone()
                };
                self.aliases.register(original, converted)?;
            }
        }

        debug!(routes = self.aliases.len(), "static route table built");
        Ok(())
    }

    /// Converted egress name of one route of an original node.
    pub fn convert(&self, node: &str, route: &StaticRoute) -> NamespaceResult<&str> {
        let converted = self.aliases.forward(&route_key(node, route))?;
        Ok(converted.egress.as_deref().unwrap_or(DYNAMIC_EGRESS))
    }

    pub fn forward(&self, original: &StaticRouteKey) -> NamespaceResult<&StaticRouteKey> {
        self.aliases.forward(original)
    }

    pub fn reverse(&self, converted: &StaticRouteKey) -> NamespaceResult<&StaticRouteKey> {
        self.aliases.reverse(converted)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Forward map: original node -> prefix -> routes.
    pub fn to_persisted(&self) -> BTreeMap<String, BTreeMap<String, Vec<RouteEgress>>> {
        let mut out: BTreeMap<String, BTreeMap<String, Vec<RouteEgress>>> = BTreeMap::new();
        for (original, converted) in self.aliases.iter() {
            out.entry(original.node.clone())
                .or_default()
                .entry(original.prefix.clone())
                .or_default()
                .push(RouteEgress {
                    next_hop: original.next_hop.clone(),
                    interface: original.interface.clone(),
                    egress: converted
                        .egress
                        .clone()
                        .unwrap_or_else(|| DYNAMIC_EGRESS.to_string()),
                });
        }
        out
    }

    pub fn from_persisted(
        data: BTreeMap<String, BTreeMap<String, Vec<RouteEgress>>>,
        nodes: &NodeNameAliasTable,
    ) -> NamespaceResult<Self> {
        let mut entries = Vec::new();
        for (node, prefixes) in data {
            let converted_node = nodes.forward(&node)?.to_string();
            for (prefix, routes) in prefixes {
                for route in routes {
                    let original = StaticRouteKey {
                        node: node.clone(),
                        prefix: prefix.clone(),
                        next_hop: route.next_hop,
                        interface: route.interface,
                        egress: None,
                    };
                    let converted = StaticRouteKey {
                        node: converted_node.clone(),
                        egress: Some(route.egress),
                        ..original.clone()
                    };
                    entries.push(AliasEntry {
                        original,
                        converted,
                    });
                }
            }
        }
        Ok(Self {
            aliases: AliasTable::from_persisted(STATIC_ROUTE_TABLE, entries)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node_table::IdentityNaming;
    use serde_json::json;
    use tc_topology::{NetworkBuilder, TermPoint, TopologyBuilder, nwtype};

    const L3_NODE_ATTR: &str = "mddo-topology:l3-node-attributes";
    const L3_TP_ATTR: &str = "mddo-topology:l3-termination-point-attributes";

    fn tp_with_addr(name: &str, addr: &str) -> TermPoint {
        let mut tp = TermPoint::new(name);
        tp.attributes
            .insert(L3_TP_ATTR.into(), json!({"ip-address": [addr]}));
        tp
    }

    fn topology() -> Topology {
        let mut nw = NetworkBuilder::new("layer3", nwtype::MDDO_L3);
        let r1 = nw.add_node("R1");
        nw.set_node_attribute(
            r1,
            L3_NODE_ATTR,
            json!({
                "node-type": "node",
                "static-route": [
                    {"prefix": "10.1.0.0/16", "next-hop": "192.168.0.2", "interface": "ge-0/0/1.0"},
                    {"prefix": "10.2.0.0/16", "next-hop": "172.16.0.6"},
                    {"prefix": "0.0.0.0/0", "next-hop": "203.0.113.1"},
                    {"prefix": "0.0.0.0/0", "next-hop": "172.16.0.5", "interface": "dynamic"}
                ]
            }),
        );
        nw.push_term_point(r1, tp_with_addr("ge-0/0/0.0", "172.16.0.5/30"));
        nw.push_term_point(r1, tp_with_addr("ge-0/0/1.0", "192.168.0.1/24"));

        let mut topo = TopologyBuilder::new();
        topo.add_network(nw.build().unwrap());
        topo.build().unwrap()
    }

    fn tables(topo: &Topology) -> (NodeNameAliasTable, StaticRouteTpAliasTable) {
        let mut nodes = NodeNameAliasTable::new();
        nodes.build(topo, "layer3", &IdentityNaming).unwrap();
        let mut tps = TermPointAliasTable::new();
        tps.build(topo, "layer3", &nodes).unwrap();
        let mut routes = StaticRouteTpAliasTable::new();
        routes.build(topo, "layer3", &nodes, &tps).unwrap();
        (nodes, routes)
    }

    fn route(prefix: &str, next_hop: &str, interface: Option<&str>) -> StaticRoute {
        StaticRoute {
            prefix: prefix.into(),
            next_hop: Some(next_hop.into()),
            interface: interface.map(str::to_string),
        }
    }

    #[test]
    fn egress_selection() {
        let (_, routes) = tables(&topology());
        assert_eq!(routes.len(), 4);

        // explicit interface
        let r = route("10.1.0.0/16", "192.168.0.2", Some("ge-0/0/1.0"));
        assert_eq!(routes.convert("R1", &r).unwrap(), "eth2.0");
        // next hop inside ge-0/0/0.0's subnet
        let r = route("10.2.0.0/16", "172.16.0.6", None);
        assert_eq!(routes.convert("R1", &r).unwrap(), "eth1.0");
        // unreachable next hop
        let r = route("0.0.0.0/0", "203.0.113.1", None);
        assert_eq!(routes.convert("R1", &r).unwrap(), DYNAMIC_EGRESS);
        // equal-cost default routes stay distinct
        let r = route("0.0.0.0/0", "172.16.0.5", Some("dynamic"));
        assert_eq!(routes.convert("R1", &r).unwrap(), "eth1.0");
    }

    #[test]
    fn routes_sharing_an_egress_stay_distinct() {
        let mut nw = NetworkBuilder::new("layer3", nwtype::MDDO_L3);
        let r1 = nw.add_node("R1");
        nw.set_node_attribute(
            r1,
            L3_NODE_ATTR,
            json!({
                "node-type": "node",
                "static-route": [
                    {"prefix": "10.1.0.0/16", "next-hop": "192.168.0.2", "interface": "ge-0/0/0.0"},
                    {"prefix": "10.1.0.0/16", "next-hop": "192.168.0.2", "interface": "dynamic"},
                    {"prefix": "10.9.0.0/16", "next-hop": "203.0.113.1"},
                    {"prefix": "10.9.0.0/16", "next-hop": "203.0.113.1", "interface": "dynamic"}
                ]
            }),
        );
        nw.push_term_point(r1, tp_with_addr("ge-0/0/0.0", "192.168.0.1/24"));
        let mut topo = TopologyBuilder::new();
        topo.add_network(nw.build().unwrap());
        let topo = topo.build().unwrap();

        let (nodes, routes) = tables(&topo);
        assert_eq!(routes.len(), 4);

        let by_tp = route("10.1.0.0/16", "192.168.0.2", Some("ge-0/0/0.0"));
        let by_next_hop = route("10.1.0.0/16", "192.168.0.2", Some("dynamic"));
        assert_eq!(routes.convert("R1", &by_tp).unwrap(), "eth1.0");
        assert_eq!(routes.convert("R1", &by_next_hop).unwrap(), "eth1.0");
        let unreachable = route("10.9.0.0/16", "203.0.113.1", None);
        assert_eq!(routes.convert("R1", &unreachable).unwrap(), DYNAMIC_EGRESS);
        let unreachable = route("10.9.0.0/16", "203.0.113.1", Some("dynamic"));
        assert_eq!(routes.convert("R1", &unreachable).unwrap(), DYNAMIC_EGRESS);

        let restored = StaticRouteTpAliasTable::from_persisted(routes.to_persisted(), &nodes).unwrap();
        assert_eq!(restored, routes);
    }

    #[test]
    fn unknown_route() {
        let (_, routes) = tables(&topology());
        let r = route("10.9.0.0/16", "192.168.0.2", None);
        assert!(matches!(
            routes.convert("R1", &r),
            Err(NamespaceError::AliasNotFound { .. })
        ));
    }

    #[test]
    fn persisted_round_trip() {
        let (nodes, routes) = tables(&topology());
        let persisted = routes.to_persisted();
        assert_eq!(persisted["R1"]["0.0.0.0/0"].len(), 2);
        let restored = StaticRouteTpAliasTable::from_persisted(persisted, &nodes).unwrap();
        assert_eq!(restored, routes);
    }
}
