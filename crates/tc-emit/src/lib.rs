//! tc-emit: deployment descriptors generated from a layer-3 topology.
//!
//! - [`ClabConverter`] emits a ContainerLab topology (undirected links,
//!   principal L1 names, container kind/image per node type)
//! - [`BatfishConverter`] emits Batfish layer-1 edges (one per stored link,
//!   agent L1 names)
//!
//! Both read names through an [`L1AliasView`]: the [`ConvertTable`] for a
//! rewritten graph, or [`PassThroughAliases`] for a graph that was not renamed.
//!
//! [`ConvertTable`]: tc_namespace::ConvertTable

pub mod batfish;
pub mod clab;
pub mod error;
pub mod image;
pub mod view;

pub use batfish::{BatfishConverter, BatfishEdge, BatfishInterface, BatfishL1Topology};
pub use clab::{ClabConverter, ClabLink, ClabTopology, ClabTopologyBody, DEFAULT_ENV_NAME};
pub use error::{EmitError, EmitResult};
pub use image::{ClabNode, ImagePolicy, NodeKind, NodeTemplate, TemplateImagePolicy};
pub use view::{L1AliasView, PassThroughAliases, safe_node_name};

use tc_topology::{Network, Topology, nwtype};

/// Find `name` and check it is a layer-3 network.
pub(crate) fn layer3_network<'a>(topology: &'a Topology, name: &str) -> EmitResult<&'a Network> {
    let network = topology
        .find_network(name)
        .ok_or_else(|| EmitError::NetworkNotFound {
            name: name.to_string(),
            reason: "no such network".into(),
        })?;
    if network.primary_network_type() != Some(nwtype::MDDO_L3) {
        return Err(EmitError::NetworkNotFound {
            name: name.to_string(),
            reason: format!(
                "not a layer3 network (type={})",
                network.primary_network_type().unwrap_or("<none>")
            ),
        });
    }
    Ok(network)
}
