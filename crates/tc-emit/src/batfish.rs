//! Batfish layer-1 topology (`layer1_topology.json`).

use serde::{Deserialize, Serialize};
use tc_topology::Topology;
use tracing::info;

use crate::error::EmitResult;
use crate::layer3_network;
use crate::view::{L1AliasView, safe_node_name};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatfishL1Topology {
    pub edges: Vec<BatfishEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatfishEdge {
    pub node1: BatfishInterface,
    pub node2: BatfishInterface,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatfishInterface {
    pub hostname: String,
    pub interface_name: String,
}

impl BatfishL1Topology {
    pub fn to_json(&self) -> EmitResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Emits one edge per stored link; Batfish expects both directions listed.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatfishConverter;

impl BatfishConverter {
    pub fn convert(
        &self,
        topology: &Topology,
        network: &str,
        view: &dyn L1AliasView,
    ) -> EmitResult<BatfishL1Topology> {
        let network = layer3_network(topology, network)?;
        let edges = network
            .links
            .iter()
            .map(|link| {
                Ok(BatfishEdge {
                    node1: interface(view, &link.source.node, &link.source.tp)?,
                    node2: interface(view, &link.destination.node, &link.destination.tp)?,
                })
            })
            .collect::<EmitResult<Vec<_>>>()?;
        info!(network = %network.name, edges = edges.len(), "batfish layer1 topology generated");
        Ok(BatfishL1Topology { edges })
    }
}

fn interface(view: &dyn L1AliasView, node: &str, tp: &str) -> EmitResult<BatfishInterface> {
    let node_l1 = view.node_l1(node)?;
    let tp_l1 = view.tp_l1(node, tp)?;
    Ok(BatfishInterface {
        hostname: safe_node_name(&node_l1.agent),
        interface_name: tp_l1.agent,
    })
}
