//! ConvertTable: the four alias tables, built in dependency order.
//!
//! Every table other than the node table is keyed over node names resolved
//! through the node table. [`ConvertTableBuilder`] carries the build stage in
//! its type so the tables can only be populated in the order
//! node -> term point -> OSPF process -> static route.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tc_topology::Topology;
use tracing::{debug, info};

use crate::error::{NamespaceError, NamespaceResult};
use crate::keys::NameRecord;
use crate::node_table::{IdentityNaming, NodeNameAliasTable, NodeNamingRule};
use crate::ospf_table::OspfProcAliasTable;
use crate::static_route_table::{RouteEgress, StaticRouteTpAliasTable};
use crate::tp_table::TermPointAliasTable;

/// Which layers feed the tables.
#[derive(Debug, Clone)]
pub struct TableScope {
    /// Layer whose nodes and term points are renamed.
    pub base_layer: String,
    /// Layers whose unknown nodes and term points keep their names.
    pub pass_through_layers: Vec<String>,
    /// Names of OSPF area layers.
    pub ospf_area_pattern: Regex,
}

impl Default for TableScope {
    fn default() -> Self {
        Self {
            base_layer: "layer3".to_string(),
            pass_through_layers: vec!["bgp_proc".to_string(), "bgp_as".to_string()],
            ospf_area_pattern: Regex::new(r"^ospf_area\d+$").expect("built-in pattern is valid"),
        }
    }
}

impl TableScope {
    pub fn with_ospf_area_pattern(mut self, pattern: &str) -> NamespaceResult<Self> {
        self.ospf_area_pattern =
            Regex::new(pattern).map_err(|e| NamespaceError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;
        Ok(self)
    }
}

/// Storage form of a [`ConvertTable`]: each table's forward map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedConvertTable {
    pub node_name_table: BTreeMap<String, NameRecord>,
    pub tp_name_table: BTreeMap<String, BTreeMap<String, NameRecord>>,
    #[serde(default)]
    pub ospf_proc_id_table: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(default)]
    pub static_route_tp_table: BTreeMap<String, BTreeMap<String, Vec<RouteEgress>>>,
}

/// The four alias tables of one conversion pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConvertTable {
    node_name: NodeNameAliasTable,
    tp_name: TermPointAliasTable,
    ospf_proc_id: OspfProcAliasTable,
    static_route_tp: StaticRouteTpAliasTable,
}

impl ConvertTable {
    /// Build all tables from `topology` with the default scope and identity naming.
    pub fn build(topology: &Topology) -> NamespaceResult<Self> {
        Self::build_with(topology, &TableScope::default(), &IdentityNaming)
    }

    pub fn build_with(
        topology: &Topology,
        scope: &TableScope,
        rule: &dyn NodeNamingRule,
    ) -> NamespaceResult<Self> {
        ConvertTableBuilder::new(topology, scope)
            .with_nodes(rule)?
            .with_term_points()?
            .with_ospf_procs()?
            .with_static_routes()?
            .build()
    }

    /// Scan `topology` again into the existing tables.
    ///
    /// Entries already present are left untouched, so extending with the
    /// topology the table was built from changes nothing.
    pub fn extend(
        self,
        topology: &Topology,
        scope: &TableScope,
        rule: &dyn NodeNamingRule,
    ) -> NamespaceResult<Self> {
        ConvertTableBuilder::from_table(self, topology, scope)
            .with_nodes(rule)?
            .with_term_points()?
            .with_ospf_procs()?
            .with_static_routes()?
            .build()
    }

    /// Restore tables from their persisted form without a topology.
    pub fn reload(persisted: PersistedConvertTable) -> NamespaceResult<Self> {
        let node_name = NodeNameAliasTable::from_persisted(persisted.node_name_table)?;
        let tp_name = TermPointAliasTable::from_persisted(persisted.tp_name_table, &node_name)?;
        let ospf_proc_id =
            OspfProcAliasTable::from_persisted(persisted.ospf_proc_id_table, &node_name)?;
        let static_route_tp =
            StaticRouteTpAliasTable::from_persisted(persisted.static_route_tp_table, &node_name)?;
        debug!(
            nodes = node_name.len(),
            term_points = tp_name.len(),
            "convert table reloaded"
        );
        Ok(Self {
            node_name,
            tp_name,
            ospf_proc_id,
            static_route_tp,
        })
    }

    pub fn to_persisted(&self) -> PersistedConvertTable {
        PersistedConvertTable {
            node_name_table: self.node_name.to_persisted(),
            tp_name_table: self.tp_name.to_persisted(),
            ospf_proc_id_table: self.ospf_proc_id.to_persisted(),
            static_route_tp_table: self.static_route_tp.to_persisted(),
        }
    }

    pub fn node_name(&self) -> &NodeNameAliasTable {
        &self.node_name
    }

    pub fn tp_name(&self) -> &TermPointAliasTable {
        &self.tp_name
    }

    pub fn ospf_proc_id(&self) -> &OspfProcAliasTable {
        &self.ospf_proc_id
    }

    pub fn static_route_tp(&self) -> &StaticRouteTpAliasTable {
        &self.static_route_tp
    }
}

/// Build stages of [`ConvertTableBuilder`].
pub mod stage {
    #[derive(Debug)]
    pub struct Empty;
    #[derive(Debug)]
    pub struct WithNodes;
    #[derive(Debug)]
    pub struct WithTermPoints;
    #[derive(Debug)]
    pub struct WithOspfProcs;
    #[derive(Debug)]
    pub struct Complete;
}

/// Staged builder; each `with_*` step is only callable after the previous one.
#[derive(Debug)]
pub struct ConvertTableBuilder<'a, S> {
    topology: &'a Topology,
    scope: &'a TableScope,
    table: ConvertTable,
    _stage: PhantomData<S>,
}

impl<'a, S> ConvertTableBuilder<'a, S> {
    fn advance<T>(self) -> ConvertTableBuilder<'a, T> {
        ConvertTableBuilder {
            topology: self.topology,
            scope: self.scope,
            table: self.table,
            _stage: PhantomData,
        }
    }
}

impl<'a> ConvertTableBuilder<'a, stage::Empty> {
    pub fn new(topology: &'a Topology, scope: &'a TableScope) -> Self {
        Self::from_table(ConvertTable::default(), topology, scope)
    }

    pub fn from_table(table: ConvertTable, topology: &'a Topology, scope: &'a TableScope) -> Self {
        Self {
            topology,
            scope,
            table,
            _stage: PhantomData,
        }
    }

    pub fn with_nodes(
        mut self,
        rule: &dyn NodeNamingRule,
    ) -> NamespaceResult<ConvertTableBuilder<'a, stage::WithNodes>> {
        self.table
            .node_name
            .build(self.topology, &self.scope.base_layer, rule)?;
        for layer in &self.scope.pass_through_layers {
            if let Some(network) = self.topology.find_network(layer) {
                self.table.node_name.extend_pass_through(network)?;
            }
        }
        Ok(self.advance())
    }
}

impl<'a> ConvertTableBuilder<'a, stage::WithNodes> {
    pub fn with_term_points(
        mut self,
    ) -> NamespaceResult<ConvertTableBuilder<'a, stage::WithTermPoints>> {
        let ConvertTable {
            node_name, tp_name, ..
        } = &mut self.table;
        tp_name.build(self.topology, &self.scope.base_layer, node_name)?;
        for layer in &self.scope.pass_through_layers {
            if let Some(network) = self.topology.find_network(layer) {
                tp_name.extend_pass_through(network, node_name)?;
            }
        }
        Ok(self.advance())
    }
}

impl<'a> ConvertTableBuilder<'a, stage::WithTermPoints> {
    pub fn with_ospf_procs(
        mut self,
    ) -> NamespaceResult<ConvertTableBuilder<'a, stage::WithOspfProcs>> {
        let ConvertTable {
            node_name,
            ospf_proc_id,
            ..
        } = &mut self.table;
        ospf_proc_id.build(self.topology, &self.scope.ospf_area_pattern, node_name)?;
        Ok(self.advance())
    }
}

impl<'a> ConvertTableBuilder<'a, stage::WithOspfProcs> {
    pub fn with_static_routes(
        mut self,
    ) -> NamespaceResult<ConvertTableBuilder<'a, stage::Complete>> {
        let ConvertTable {
            node_name,
            tp_name,
            static_route_tp,
            ..
        } = &mut self.table;
        static_route_tp.build(self.topology, &self.scope.base_layer, node_name, tp_name)?;
        Ok(self.advance())
    }
}

impl ConvertTableBuilder<'_, stage::Complete> {
    pub fn build(self) -> NamespaceResult<ConvertTable> {
        info!(
            nodes = self.table.node_name.len(),
            term_points = self.table.tp_name.len(),
            ospf_procs = self.table.ospf_proc_id.len(),
            static_routes = self.table.static_route_tp.len(),
            "convert table built"
        );
        Ok(self.table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tc_topology::{NetworkBuilder, TopologyBuilder, TpRef, nwtype};

    fn topology() -> Topology {
        let mut l3 = NetworkBuilder::new("layer3", nwtype::MDDO_L3);
        let r1 = l3.add_node("R1");
        l3.set_node_attribute(
            r1,
            "mddo-topology:l3-node-attributes",
            json!({"node-type": "node", "static-route": [{"prefix": "0.0.0.0/0", "next-hop": "10.0.0.2"}]}),
        );
        l3.add_term_point(r1, "ge-0/0/0.0");

        let mut bgp = NetworkBuilder::new("bgp_proc", nwtype::MDDO_BGP_PROC);
        let p = bgp.add_node("10.0.0.1");
        bgp.add_term_point(p, "peer_10.0.0.2");

        let mut ospf = NetworkBuilder::new("ospf_area0", nwtype::MDDO_OSPF_AREA);
        let o = ospf.add_node("R1");
        ospf.set_node_attribute(
            o,
            "mddo-topology:ospf-area-node-attributes",
            json!({"process-id": 1}),
        );

        let mut topo = TopologyBuilder::new();
        topo.add_network(l3.build().unwrap());
        topo.add_network(bgp.build().unwrap());
        topo.add_network(ospf.build().unwrap());
        topo.build().unwrap()
    }

    #[test]
    fn build_all_tables() {
        let table = ConvertTable::build(&topology()).unwrap();
        assert_eq!(table.node_name().len(), 2);
        assert_eq!(table.node_name().forward("10.0.0.1").unwrap(), "10.0.0.1");
        let tp = table
            .tp_name()
            .forward(&TpRef::new("10.0.0.1", "peer_10.0.0.2"))
            .unwrap();
        assert_eq!(tp.tp, "peer_10.0.0.2");
        assert_eq!(table.ospf_proc_id().len(), 1);
        assert_eq!(table.static_route_tp().len(), 1);
    }

    #[test]
    fn staged_builder_matches_build() {
        let topo = topology();
        let scope = TableScope::default();
        let staged = ConvertTableBuilder::new(&topo, &scope)
            .with_nodes(&IdentityNaming)
            .unwrap()
            .with_term_points()
            .unwrap()
            .with_ospf_procs()
            .unwrap()
            .with_static_routes()
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(staged, ConvertTable::build(&topo).unwrap());
    }

    #[test]
    fn missing_base_layer() {
        let scope = TableScope {
            base_layer: "layer9".into(),
            ..TableScope::default()
        };
        let err = ConvertTable::build_with(&topology(), &scope, &IdentityNaming).unwrap_err();
        assert!(matches!(err, NamespaceError::NetworkNotFound { name, .. } if name == "layer9"));
    }

    #[test]
    fn reload_round_trip() {
        let table = ConvertTable::build(&topology()).unwrap();
        let json = serde_json::to_string(&table.to_persisted()).unwrap();
        let persisted: PersistedConvertTable = serde_json::from_str(&json).unwrap();
        assert_eq!(ConvertTable::reload(persisted).unwrap(), table);
    }

    #[test]
    fn reload_rejects_tp_of_unknown_node() {
        let mut persisted = ConvertTable::build(&topology()).unwrap().to_persisted();
        persisted.node_name_table.remove("R1");
        assert!(matches!(
            ConvertTable::reload(persisted),
            Err(NamespaceError::AliasNotFound { .. })
        ));
    }

    #[test]
    fn custom_ospf_pattern() {
        let scope = TableScope::default()
            .with_ospf_area_pattern(r"^area_\d+$")
            .unwrap();
        let table = ConvertTable::build_with(&topology(), &scope, &IdentityNaming).unwrap();
        assert!(table.ospf_proc_id().is_empty());
        assert!(TableScope::default().with_ospf_area_pattern("(").is_err());
    }
}
