//! ContainerLab topology descriptor.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tc_topology::{Link, Topology};
use tracing::{debug, info};

use crate::error::EmitResult;
use crate::image::{ClabNode, ImagePolicy, NodeKind, TemplateImagePolicy};
use crate::layer3_network;
use crate::view::L1AliasView;

pub const DEFAULT_ENV_NAME: &str = "emulated";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClabTopology {
    pub name: String,
    pub topology: ClabTopologyBody,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClabTopologyBody {
    pub links: Vec<ClabLink>,
    pub nodes: BTreeMap<String, ClabNode>,
}

/// Undirected link; endpoints are `"<node>:<interface>"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClabLink {
    pub endpoints: [String; 2],
}

impl ClabTopology {
    pub fn to_yaml(&self) -> EmitResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_json(&self) -> EmitResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Converts a layer-3 network into a ContainerLab topology.
pub struct ClabConverter<P = TemplateImagePolicy> {
    name: String,
    policy: P,
}

impl Default for ClabConverter<TemplateImagePolicy> {
    fn default() -> Self {
        Self::new(TemplateImagePolicy::default())
    }
}

impl<P: ImagePolicy> ClabConverter<P> {
    pub fn new(policy: P) -> Self {
        Self {
            name: DEFAULT_ENV_NAME.to_string(),
            policy,
        }
    }

    /// Environment (lab) name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn convert(
        &self,
        topology: &Topology,
        network: &str,
        view: &dyn L1AliasView,
    ) -> EmitResult<ClabTopology> {
        let network = layer3_network(topology, network)?;

        let mut nodes = BTreeMap::new();
        for node in &network.nodes {
            let kind = NodeKind::from_node_type(&node.name, node.node_type())?;
            let l1 = view.node_l1(&node.name)?;
            nodes.insert(l1.principal.clone(), self.policy.node_spec(&l1.principal, kind));
        }

        let mut links = Vec::new();
        for link in unique_links(&network.links) {
            links.push(ClabLink {
                endpoints: [
                    endpoint(view, &link.source.node, &link.source.tp)?,
                    endpoint(view, &link.destination.node, &link.destination.tp)?,
                ],
            });
        }
        debug!(
            network = %network.name,
            stored = network.links.len(),
            undirected = links.len(),
            "deduplicated links"
        );
        info!(name = %self.name, nodes = nodes.len(), links = links.len(), "containerlab topology generated");

        Ok(ClabTopology {
            name: self.name.clone(),
            topology: ClabTopologyBody { links, nodes },
        })
    }
}

fn endpoint(view: &dyn L1AliasView, node: &str, tp: &str) -> EmitResult<String> {
    let node_l1 = view.node_l1(node)?;
    let tp_l1 = view.tp_l1(node, tp)?;
    Ok(format!("{}:{}", node_l1.principal, tp_l1.principal))
}

/// Keep the first link of each bidirectional pair, in stored order.
fn unique_links(links: &[Link]) -> Vec<&Link> {
    let mut kept: Vec<&Link> = Vec::new();
    for link in links {
        if !kept.iter().any(|k| k.is_reverse_of(link) || *k == link) {
            kept.push(link);
        }
    }
    kept
}
