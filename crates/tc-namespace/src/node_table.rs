//! Node-name alias table.

use std::collections::BTreeMap;

use tc_topology::{Network, Node, Topology};
use tracing::debug;

use crate::alias::{AliasEntry, AliasTable};
use crate::error::{NamespaceError, NamespaceResult};
use crate::keys::{L1Alias, NameRecord};

pub const NODE_TABLE: &str = "node_name_table";

/// Derives the converted (L3 model) name of a base-layer node.
pub trait NodeNamingRule {
    fn l3_name(&self, node: &Node) -> String;
}

/// Nodes keep their original name in the emulated namespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityNaming;

impl NodeNamingRule for IdentityNaming {
    fn l3_name(&self, node: &Node) -> String {
        node.name.clone()
    }
}

/// Original node name -> converted name, plus the L1 names of each node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeNameAliasTable {
    aliases: AliasTable<String>,
    records: BTreeMap<String, NameRecord>,
}

impl Default for NodeNameAliasTable {
    fn default() -> Self {
        Self {
            aliases: AliasTable::new(NODE_TABLE),
            records: BTreeMap::new(),
        }
    }
}

impl NodeNameAliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every node of `base_layer` in stored order.
    ///
    /// Segment nodes get a short bridge name (`br<k>`, k counted over the
    /// segment nodes of the layer) as L1 principal.
    pub fn build(
        &mut self,
        topology: &Topology,
        base_layer: &str,
        rule: &dyn NodeNamingRule,
    ) -> NamespaceResult<()> {
        let network =
            topology
                .find_network(base_layer)
                .ok_or_else(|| NamespaceError::NetworkNotFound {
                    name: base_layer.to_string(),
                    reason: "base layer for node names".to_string(),
                })?;

        let mut segment_count = 0usize;
        for node in &network.nodes {
            let l3_model = rule.l3_name(node);
            let record = if node.is_segment() {
                let record = NameRecord {
                    l1_principal: format!("br{segment_count}"),
                    l1_agent: l3_model.replace(['/', '_'], "-"),
                    l3_model,
                };
                segment_count += 1;
                record
            } else {
                NameRecord::uniform(l3_model)
            };
            self.insert(node.name.clone(), record)?;
        }

        debug!(
            layer = base_layer,
            nodes = network.nodes.len(),
            segments = segment_count,
            "node name table built"
        );
        Ok(())
    }

    /// Register nodes of a layer that is not renamed, skipping known names.
    pub fn extend_pass_through(&mut self, network: &Network) -> NamespaceResult<()> {
        let mut added = 0usize;
        for node in &network.nodes {
            if self.contains(&node.name) {
                continue;
            }
            self.insert(node.name.clone(), NameRecord::uniform(&node.name))?;
            added += 1;
        }
        debug!(layer = %network.name, added, "node name table extended");
        Ok(())
    }

    fn insert(&mut self, original: String, record: NameRecord) -> NamespaceResult<()> {
        self.aliases
            .register(original.clone(), record.l3_model.clone())?;
        // First write wins, matching the alias registration above.
        self.records.entry(original).or_insert(record);
        Ok(())
    }

    /// Converted name of an original node.
    pub fn forward(&self, original: &str) -> NamespaceResult<&str> {
        self.aliases
            .forward(&original.to_string())
            .map(String::as_str)
    }

    /// Original name of a converted node.
    pub fn reverse(&self, converted: &str) -> NamespaceResult<&str> {
        self.aliases
            .reverse(&converted.to_string())
            .map(String::as_str)
    }

    /// Full name record of an original node.
    pub fn record(&self, original: &str) -> NamespaceResult<&NameRecord> {
        self.records
            .get(original)
            .ok_or_else(|| NamespaceError::AliasNotFound {
                table: NODE_TABLE,
                key: original.to_string(),
            })
    }

    /// L1 names of a node addressed by its converted name.
    pub fn find_l1_alias(&self, converted: &str) -> NamespaceResult<L1Alias> {
        let original = self.reverse(converted)?;
        Ok(self.record(original)?.l1())
    }

    pub fn contains(&self, original: &str) -> bool {
        self.records.contains_key(original)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Forward map: original name -> record.
    pub fn to_persisted(&self) -> BTreeMap<String, NameRecord> {
        self.records.clone()
    }

    pub fn from_persisted(data: BTreeMap<String, NameRecord>) -> NamespaceResult<Self> {
        let aliases = AliasTable::from_persisted(
            NODE_TABLE,
            data.iter().map(|(original, record)| AliasEntry {
                original: original.clone(),
                converted: record.l3_model.clone(),
            }),
        )?;
        Ok(Self {
            aliases,
            records: data,
        })
    }
}
