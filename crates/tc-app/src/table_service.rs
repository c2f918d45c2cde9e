//! Topology and convert table loading, saving, building and lookup.

use std::path::Path;

use serde::Serialize;
use tc_namespace::{ConvertTable, IdentityNaming, NameRecord, PersistedConvertTable};
use tc_topology::{Topology, TpRef};
use tracing::info;

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};

/// Load and validate a topology JSON file.
pub fn load_topology(path: &Path) -> AppResult<Topology> {
    Ok(tc_topology::load_json(path)?)
}

pub fn save_topology(path: &Path, topology: &Topology) -> AppResult<()> {
    Ok(tc_topology::save_json(path, topology)?)
}

/// Build a convert table with the configured scope and identity node naming.
pub fn build_table(topology: &Topology, config: &AppConfig) -> AppResult<ConvertTable> {
    let scope = config.table_scope()?;
    let table = ConvertTable::build_with(topology, &scope, &IdentityNaming)?;
    info!(
        nodes = table.node_name().len(),
        term_points = table.tp_name().len(),
        "convert table built"
    );
    Ok(table)
}

/// Load a persisted convert table from a JSON file.
pub fn load_table(path: &Path) -> AppResult<ConvertTable> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::FileRead {
        kind: "table",
        path: path.to_path_buf(),
        source: e,
    })?;
    let persisted: PersistedConvertTable =
        serde_json::from_str(&content).map_err(|e| AppError::Parse {
            kind: "table",
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    Ok(ConvertTable::reload(persisted)?)
}

/// Serialize a convert table into its persisted JSON form.
pub fn table_to_json(table: &ConvertTable) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(&table.to_persisted())?)
}

/// Save a convert table to a JSON file.
pub fn save_table(path: &Path, table: &ConvertTable) -> AppResult<()> {
    let content = table_to_json(table)?;
    std::fs::write(path, content).map_err(|e| AppError::FileWrite {
        kind: "table",
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}

/// Which namespace a lookup key is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupDirection {
    /// Key is an original name.
    Forward,
    /// Key is a converted name.
    Reverse,
}

/// Both sides of one table entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NameLookup {
    pub original: String,
    pub converted: String,
    pub record: NameRecord,
}

pub fn lookup_node(
    table: &ConvertTable,
    name: &str,
    direction: LookupDirection,
) -> AppResult<NameLookup> {
    let nodes = table.node_name();
    let original = match direction {
        LookupDirection::Forward => name,
        LookupDirection::Reverse => nodes.reverse(name)?,
    };
    Ok(NameLookup {
        original: original.to_string(),
        converted: nodes.forward(original)?.to_string(),
        record: nodes.record(original)?.clone(),
    })
}

/// Look up a term point; `node` is in the same namespace as `tp`.
pub fn lookup_tp(
    table: &ConvertTable,
    node: &str,
    tp: &str,
    direction: LookupDirection,
) -> AppResult<NameLookup> {
    let tps = table.tp_name();
    let key = TpRef::new(node, tp);
    let original = match direction {
        LookupDirection::Forward => key,
        LookupDirection::Reverse => tps.reverse(&key)?.clone(),
    };
    let converted = tps.forward(&original)?;
    Ok(NameLookup {
        original: original.to_string(),
        converted: converted.to_string(),
        record: tps.record(&original)?.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tc_topology::{NetworkBuilder, TopologyBuilder, nwtype};

    fn topo() -> Topology {
        let mut nw = NetworkBuilder::new("layer3", nwtype::MDDO_L3);
        let seg = nw.add_node("Seg_A/1");
        nw.set_node_attribute(
            seg,
            "mddo-topology:l3-node-attributes",
            json!({"node-type": "segment"}),
        );
        nw.add_term_point(seg, "R1_ge-0/0/0.0");
        let r1 = nw.add_node("R1");
        nw.add_term_point(r1, "ge-0/0/0.0");
        let mut topo = TopologyBuilder::new();
        topo.add_network(nw.build().unwrap());
        topo.build().unwrap()
    }

    #[test]
    fn lookup_both_directions() {
        let table = build_table(&topo(), &AppConfig::default()).unwrap();

        let fwd = lookup_tp(&table, "R1", "ge-0/0/0.0", LookupDirection::Forward).unwrap();
        assert_eq!(fwd.converted, "R1[eth1.0]");
        assert_eq!(fwd.record.l1_agent, "eth1");

        let rev = lookup_tp(&table, "R1", "eth1.0", LookupDirection::Reverse).unwrap();
        assert_eq!(rev.original, "R1[ge-0/0/0.0]");

        let seg = lookup_node(&table, "Seg_A/1", LookupDirection::Forward).unwrap();
        assert_eq!(seg.record.l1_principal, "br0");
        assert_eq!(seg.record.l1_agent, "Seg-A-1");
    }

    #[test]
    fn lookup_miss_is_alias_not_found() {
        let table = build_table(&topo(), &AppConfig::default()).unwrap();
        let err = lookup_node(&table, "R9", LookupDirection::Forward).unwrap_err();
        assert!(matches!(
            err,
            AppError::Namespace(tc_namespace::NamespaceError::AliasNotFound { .. })
        ));
    }

    #[test]
    fn missing_base_layer() {
        let config = AppConfig {
            base_layer: "layer9".to_string(),
            ..AppConfig::default()
        };
        let err = build_table(&topo(), &config).unwrap_err();
        assert!(matches!(
            err,
            AppError::Namespace(tc_namespace::NamespaceError::NetworkNotFound { .. })
        ));
    }
}
