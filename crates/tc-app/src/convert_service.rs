//! Rewrite, filter and emit pipelines.

use tc_emit::{BatfishConverter, BatfishL1Topology, ClabTopology, L1AliasView, PassThroughAliases};
use tc_namespace::{ConvertTable, TopologyRewriter, filter_layers};
use tc_topology::Topology;
use tracing::info;

use crate::config::AppConfig;
use crate::error::AppResult;

/// Rewrite the retained layers of `source` into the converted namespace.
pub fn rewrite_topology(
    source: &Topology,
    table: &ConvertTable,
    config: &AppConfig,
) -> AppResult<Topology> {
    let rewriter = TopologyRewriter::new(table, config.layer_filter()?)
        .with_description_layer(config.base_layer.clone());
    let out = rewriter.rewrite(source)?;
    info!(networks = out.networks().len(), "topology rewritten");
    Ok(out)
}

/// Keep the retained layers of `source` without renaming.
pub fn filter_topology(source: &Topology, config: &AppConfig) -> AppResult<Topology> {
    Ok(filter_layers(source, &config.layer_filter()?)?)
}

/// Emit a ContainerLab topology from the base layer of `topology`.
///
/// With a table, `topology` must already be rewritten; without one its names
/// are used as-is.
pub fn emit_containerlab(
    topology: &Topology,
    table: Option<&ConvertTable>,
    config: &AppConfig,
) -> AppResult<ClabTopology> {
    let view = alias_view(table);
    Ok(config
        .clab_converter()
        .convert(topology, &config.base_layer, view)?)
}

/// Emit Batfish layer-1 edges from the base layer of `topology`.
pub fn emit_batfish(
    topology: &Topology,
    table: Option<&ConvertTable>,
    config: &AppConfig,
) -> AppResult<BatfishL1Topology> {
    let view = alias_view(table);
    Ok(BatfishConverter.convert(topology, &config.base_layer, view)?)
}

fn alias_view(table: Option<&ConvertTable>) -> &dyn L1AliasView {
    match table {
        Some(table) => table,
        None => &PassThroughAliases,
    }
}
