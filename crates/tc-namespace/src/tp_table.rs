//! Term-point alias table.
//!
//! Keys are (node, tp) pairs; the node half is always resolved through the
//! node-name table, so that table has to be populated first. Converted names
//! are assigned by 1-based index over the node's term points sorted by their
//! original name:
//!
//! | node kind | l3_model | l1_principal | l1_agent |
//! |---|---|---|---|
//! | segment | `<slug>_Ethernet<i>` | `<bridge>p<i-1>` | `Ethernet<i>` |
//! | other | `eth<i>.0` | `eth<i>` | `eth<i>` |
//! | loopback tp | `lo0.<n>` | `lo0.<n>` | `lo0.<n>` |
//!
//! Loopbacks are numbered separately and do not consume an `eth` index.

use std::collections::BTreeMap;

use tc_topology::{Network, Node, TermPoint, Topology, TpRef};
use tracing::debug;

use crate::alias::{AliasEntry, AliasTable};
use crate::error::{NamespaceError, NamespaceResult};
use crate::keys::{L1Alias, NameRecord, TpKey, slug};
use crate::node_table::NodeNameAliasTable;

pub const TP_TABLE: &str = "tp_name_table";

#[derive(Debug, Clone, PartialEq)]
pub struct TermPointAliasTable {
    aliases: AliasTable<TpKey>,
    records: BTreeMap<TpKey, NameRecord>,
}

impl Default for TermPointAliasTable {
    fn default() -> Self {
        Self {
            aliases: AliasTable::new(TP_TABLE),
            records: BTreeMap::new(),
        }
    }
}

fn sorted_term_points(node: &Node) -> Vec<&TermPoint> {
    let mut tps: Vec<&TermPoint> = node.term_points.iter().collect();
    tps.sort_by(|a, b| a.name.cmp(&b.name));
    tps
}

impl TermPointAliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name every term point of `base_layer`.
    pub fn build(
        &mut self,
        topology: &Topology,
        base_layer: &str,
        nodes: &NodeNameAliasTable,
    ) -> NamespaceResult<()> {
        let network =
            topology
                .find_network(base_layer)
                .ok_or_else(|| NamespaceError::NetworkNotFound {
                    name: base_layer.to_string(),
                    reason: "base layer for term point names".to_string(),
                })?;

        let mut count = 0usize;
        for node in &network.nodes {
            let node_record = nodes.record(&node.name)?;
            let tps = sorted_term_points(node);

            if node.is_segment() {
                let prefix = slug(&node_record.l3_model);
                for (i, tp) in tps.iter().enumerate() {
                    let index = i + 1;
                    let record = NameRecord {
                        l3_model: format!("{prefix}_Ethernet{index}"),
                        l1_principal: format!("{}p{}", node_record.l1_principal, i),
                        l1_agent: format!("Ethernet{index}"),
                    };
                    self.insert(&node.name, &tp.name, &node_record.l3_model, record)?;
                }
            } else {
                let (loopbacks, others): (Vec<&TermPoint>, Vec<&TermPoint>) =
                    tps.into_iter().partition(|tp| tp.is_loopback());
                for (n, tp) in loopbacks.iter().enumerate() {
                    let record = NameRecord::uniform(format!("lo0.{n}"));
                    self.insert(&node.name, &tp.name, &node_record.l3_model, record)?;
                }
                for (i, tp) in others.iter().enumerate() {
                    let index = i + 1;
                    let record = NameRecord {
                        l3_model: format!("eth{index}.0"),
                        l1_principal: format!("eth{index}"),
                        l1_agent: format!("eth{index}"),
                    };
                    self.insert(&node.name, &tp.name, &node_record.l3_model, record)?;
                }
            }
            count += node.term_points.len();
        }

        debug!(layer = base_layer, term_points = count, "tp name table built");
        Ok(())
    }

    /// Register term points of a layer that is not renamed, skipping known pairs.
    pub fn extend_pass_through(
        &mut self,
        network: &Network,
        nodes: &NodeNameAliasTable,
    ) -> NamespaceResult<()> {
        let mut added = 0usize;
        for node in &network.nodes {
            let converted_node = nodes.forward(&node.name)?;
            for tp in &node.term_points {
                if self.records.contains_key(&TpRef::new(&node.name, &tp.name)) {
                    continue;
                }
                let record = NameRecord::uniform(&tp.name);
                self.insert(&node.name, &tp.name, converted_node, record)?;
                added += 1;
            }
        }
        debug!(layer = %network.name, added, "tp name table extended");
        Ok(())
    }

    fn insert(
        &mut self,
        node: &str,
        tp: &str,
        converted_node: &str,
        record: NameRecord,
    ) -> NamespaceResult<()> {
        let original = TpRef::new(node, tp);
        let converted = TpRef::new(converted_node, &record.l3_model);
        self.aliases.register(original.clone(), converted)?;
        self.records.entry(original).or_insert(record);
        Ok(())
    }

    /// Converted (node, tp) of an original (node, tp).
    pub fn forward(&self, original: &TpKey) -> NamespaceResult<&TpKey> {
        self.aliases.forward(original)
    }

    /// Original (node, tp) of a converted (node, tp).
    pub fn reverse(&self, converted: &TpKey) -> NamespaceResult<&TpKey> {
        self.aliases.reverse(converted)
    }

    pub fn record(&self, original: &TpKey) -> NamespaceResult<&NameRecord> {
        self.records
            .get(original)
            .ok_or_else(|| self.aliases.not_found(original))
    }

    /// Principal/agent names of a term point addressed by converted names.
    pub fn find_l1_alias(&self, converted_node: &str, converted_tp: &str) -> NamespaceResult<L1Alias> {
        let original = self.reverse(&TpRef::new(converted_node, converted_tp))?;
        Ok(self.record(original)?.l1())
    }

    pub fn contains(&self, original: &TpKey) -> bool {
        self.records.contains_key(original)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Forward map: original node -> original tp -> record.
    pub fn to_persisted(&self) -> BTreeMap<String, BTreeMap<String, NameRecord>> {
        let mut out: BTreeMap<String, BTreeMap<String, NameRecord>> = BTreeMap::new();
        for (key, record) in &self.records {
            out.entry(key.node.clone())
                .or_default()
                .insert(key.tp.clone(), record.clone());
        }
        out
    }

    /// Rebuild from the persisted form; node names resolve through `nodes`.
    pub fn from_persisted(
        data: BTreeMap<String, BTreeMap<String, NameRecord>>,
        nodes: &NodeNameAliasTable,
    ) -> NamespaceResult<Self> {
        let mut entries = Vec::new();
        let mut records = BTreeMap::new();
        for (node, tps) in data {
            let converted_node = nodes.forward(&node)?.to_string();
            for (tp, record) in tps {
                let original = TpRef::new(&node, &tp);
                entries.push(AliasEntry {
                    original: original.clone(),
                    converted: TpRef::new(&converted_node, &record.l3_model),
                });
                records.insert(original, record);
            }
        }
        Ok(Self {
            aliases: AliasTable::from_persisted(TP_TABLE, entries)?,
            records,
        })
    }
}
