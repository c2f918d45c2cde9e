//! Topology rewriting into the converted namespace.

use serde_json::{Map, Value};
use tc_topology::attr::container_mut;
use tc_topology::{
    Link, Network, NetworkBuilder, Node, NodeSupport, StaticRoute, TermPoint, Topology,
    TopologyBuilder, TpRef, TpSupport, nwtype,
};
use tracing::{debug, info, warn};

use crate::convert_table::ConvertTable;
use crate::error::{NamespaceError, NamespaceResult};
use crate::filter::LayerFilter;
use crate::keyconv::convert_entity_attributes;
use crate::keys::{LAYER2_NETWORK, PackedNodeTp};

/// Container created on a term point that has none when a description is set.
const L3_TP_ATTRIBUTES: &str = "mddo-topology:l3-termination-point-attributes";

/// Rewrites a source topology through a [`ConvertTable`].
///
/// The output holds only retained layers. Node, term point and link names,
/// support references into retained layers, static-route egress interfaces
/// and OSPF process ids are converted; attribute keys go through
/// [`crate::keyconv`].
#[derive(Debug, Clone)]
pub struct TopologyRewriter<'a> {
    table: &'a ConvertTable,
    filter: LayerFilter,
    description_layer: String,
}

impl<'a> TopologyRewriter<'a> {
    pub fn new(table: &'a ConvertTable, filter: LayerFilter) -> Self {
        Self {
            table,
            filter,
            description_layer: "layer3".to_string(),
        }
    }

    /// Layer whose term points get peer descriptions (default `layer3`).
    pub fn with_description_layer(mut self, layer: impl Into<String>) -> Self {
        self.description_layer = layer.into();
        self
    }

    pub fn filter(&self) -> &LayerFilter {
        &self.filter
    }

    pub fn rewrite(&self, source: &Topology) -> NamespaceResult<Topology> {
        let mut topology = TopologyBuilder::new();
        let mut dropped = 0usize;
        for network in source.networks() {
            if !self.filter.retains(&network.name) {
                dropped += 1;
                continue;
            }
            topology.add_network(self.rewrite_network(network)?);
        }
        let topology = topology.build()?;
        info!(
            networks = topology.networks().len(),
            dropped, "topology rewritten"
        );
        Ok(topology)
    }

    fn rewrite_network(&self, src: &Network) -> NamespaceResult<Network> {
        let mut nw = NetworkBuilder::from_header(&src.name, src.network_types.clone());
        for support in &src.supports {
            nw.add_support(&support.network_ref);
        }
        for (key, value) in convert_entity_attributes(&src.attributes) {
            nw.set_attribute(key, value);
        }

        let network_type = src.primary_network_type();
        for node in &src.nodes {
            let mut dst = self.rewrite_node(node)?;
            if !node.is_segment() {
                match network_type {
                    Some(nwtype::MDDO_L3) => self.rewrite_static_routes(node, &mut dst)?,
                    Some(nwtype::MDDO_OSPF_AREA) => self.rewrite_process_id(node, &mut dst)?,
                    _ => {}
                }
            }
            nw.push_node(dst);
        }

        for link in &src.links {
            let mut dst = Link::new(
                self.convert_tp(&link.source_ref())?,
                self.convert_tp(&link.destination_ref())?,
            );
            dst.attributes = convert_entity_attributes(&link.attributes);
            nw.push_link(dst);
        }

        if src.name == self.description_layer {
            self.describe_peers(nw.network_mut())?;
        }

        debug!(network = %src.name, nodes = src.nodes.len(), links = src.links.len(), "network rewritten");
        Ok(nw.build()?)
    }

    fn convert_tp(&self, original: &TpRef) -> NamespaceResult<TpRef> {
        Ok(self.table.tp_name().forward(original)?.clone())
    }

    fn rewrite_node(&self, src: &Node) -> NamespaceResult<Node> {
        let name = self.table.node_name().forward(&src.name)?.to_string();
        let supports = src
            .supports
            .iter()
            .map(|s| self.resolve_node_support(s))
            .collect::<NamespaceResult<Vec<_>>>()?;
        let term_points = src
            .term_points
            .iter()
            .map(|tp| self.rewrite_term_point(&src.name, tp))
            .collect::<NamespaceResult<Vec<_>>>()?;
        Ok(Node {
            name,
            supports,
            term_points,
            attributes: convert_entity_attributes(&src.attributes),
        })
    }

    fn rewrite_term_point(&self, node: &str, src: &TermPoint) -> NamespaceResult<TermPoint> {
        let converted = self.convert_tp(&TpRef::new(node, &src.name))?;
        let supports = src
            .supports
            .iter()
            .map(|s| self.resolve_tp_support(s))
            .collect::<NamespaceResult<Vec<_>>>()?;
        Ok(TermPoint {
            name: converted.tp,
            supports,
            attributes: convert_entity_attributes(&src.attributes),
        })
    }

    /// Re-pack a layer-2 `<node>_<tp>` reference from converted names.
    ///
    /// The tp half keeps its name if the pair is not in the table (layer-2
    /// interface names are physical, the table holds layer-3 ones).
    fn repack_layer2(&self, parsed: &PackedNodeTp) -> Option<PackedNodeTp> {
        let node = self.table.node_name().forward(&parsed.node).ok()?;
        let tp = self
            .table
            .tp_name()
            .forward(&parsed.as_tp_key())
            .map_or_else(|_| parsed.tp.clone(), |c| c.tp.clone());
        Some(PackedNodeTp {
            node: node.to_string(),
            tp,
        })
    }

    fn resolve_node_support(&self, support: &NodeSupport) -> NamespaceResult<NodeSupport> {
        if support.network_ref == LAYER2_NETWORK {
            let repacked = PackedNodeTp::parse(&support.node_ref)
                .and_then(|parsed| self.repack_layer2(&parsed));
            let node_ref = match repacked {
                Some(packed) => packed.pack(),
                None => {
                    warn!(node_ref = %support.node_ref, "unresolved layer2 node support kept");
                    support.node_ref.clone()
                }
            };
            return Ok(NodeSupport {
                network_ref: support.network_ref.clone(),
                node_ref,
            });
        }
        if !self.filter.retains(&support.network_ref) {
            return Ok(support.clone());
        }
        Ok(NodeSupport {
            network_ref: support.network_ref.clone(),
            node_ref: self
                .table
                .node_name()
                .forward(&support.node_ref)?
                .to_string(),
        })
    }

    fn resolve_tp_support(&self, support: &TpSupport) -> NamespaceResult<TpSupport> {
        if support.network_ref == LAYER2_NETWORK {
            let parsed = PackedNodeTp::parse(&support.node_ref);
            let Some((parsed, packed)) =
                parsed.and_then(|p| self.repack_layer2(&p).map(|packed| (p, packed)))
            else {
                warn!(node_ref = %support.node_ref, "unresolved layer2 tp support kept");
                return Ok(support.clone());
            };
            let tp_ref = self
                .table
                .tp_name()
                .forward(&TpRef::new(&parsed.node, &support.tp_ref))
                .map_or_else(|_| support.tp_ref.clone(), |c| c.tp.clone());
            return Ok(TpSupport {
                network_ref: support.network_ref.clone(),
                node_ref: packed.pack(),
                tp_ref,
            });
        }
        if !self.filter.retains(&support.network_ref) {
            return Ok(support.clone());
        }
        let converted = self.convert_tp(&TpRef::new(&support.node_ref, &support.tp_ref))?;
        Ok(TpSupport {
            network_ref: support.network_ref.clone(),
            node_ref: converted.node,
            tp_ref: converted.tp,
        })
    }

    fn rewrite_static_routes(&self, src: &Node, dst: &mut Node) -> NamespaceResult<()> {
        let Some(routes) = container_mut(&mut dst.attributes)
            .and_then(|attrs| attrs.get_mut("static_routes"))
            .and_then(Value::as_array_mut)
        else {
            return Ok(());
        };

        for route in routes.iter_mut().filter_map(Value::as_object_mut) {
            let Some(key) = route_of(route) else {
                continue;
            };
            let egress = self.table.static_route_tp().convert(&src.name, &key)?;
            route.insert("interface".to_string(), Value::from(egress));
        }
        Ok(())
    }

    fn rewrite_process_id(&self, src: &Node, dst: &mut Node) -> NamespaceResult<()> {
        let Some(process) = src.attr().process_id() else {
            return Ok(());
        };
        let converted = self.table.ospf_proc_id().convert(&src.name, &process)?;
        if let Some(attrs) = container_mut(&mut dst.attributes) {
            attrs.insert("process_id".to_string(), converted.to_value());
        }
        Ok(())
    }

    /// Set `description = to_<peer agent>_<peer tp agent>` on every link source tp.
    fn describe_peers(&self, network: &mut Network) -> NamespaceResult<()> {
        let mut descriptions = Vec::with_capacity(network.links.len());
        for link in &network.links {
            let peer = link.destination_ref();
            let peer_node = self.table.node_name().find_l1_alias(&peer.node)?;
            let peer_tp = self.table.tp_name().find_l1_alias(&peer.node, &peer.tp)?;
            descriptions.push((
                link.source_ref(),
                format!("to_{}_{}", peer_node.agent, peer_tp.agent),
            ));
        }

        for (target, description) in descriptions {
            let tp = network
                .find_node_mut(&target.node)
                .and_then(|n| n.find_term_point_mut(&target.tp))
                .ok_or_else(|| NamespaceError::AliasNotFound {
                    table: "layer3 term points",
                    key: target.to_string(),
                })?;
            if container_mut(&mut tp.attributes).is_none() {
                tp.attributes
                    .insert(L3_TP_ATTRIBUTES.to_string(), Value::Object(Map::new()));
            }
            if let Some(attrs) = container_mut(&mut tp.attributes) {
                attrs.insert("description".to_string(), Value::from(description));
            }
        }
        Ok(())
    }
}

/// Read a key-converted static route entry back into its lookup key.
fn route_of(route: &Map<String, Value>) -> Option<StaticRoute> {
    let text = |key: &str| route.get(key).and_then(Value::as_str).map(str::to_string);
    Some(StaticRoute {
        prefix: text("prefix")?,
        next_hop: text("next_hop"),
        interface: text("interface"),
    })
}
