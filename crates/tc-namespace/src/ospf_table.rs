//! OSPF process-id alias table.
//!
//! The emulated routers run a single routing daemon whose main OSPF instance
//! is `default`, so the first process found on a node maps there. Any further
//! process on the same node gets a numeric id (`1`, `2`, ...).

use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;
use tc_topology::Topology;
use tracing::debug;

use crate::alias::{AliasEntry, AliasTable};
use crate::error::NamespaceResult;
use crate::keys::OspfProcKey;
use crate::node_table::NodeNameAliasTable;

pub const OSPF_TABLE: &str = "ospf_proc_id_table";

/// Converted OSPF process id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OspfProcId {
    Default,
    Numeric(u32),
}

impl OspfProcId {
    fn from_ordinal(ordinal: u32) -> Self {
        if ordinal == 0 {
            OspfProcId::Default
        } else {
            OspfProcId::Numeric(ordinal)
        }
    }

    /// Parse a stored tag; anything that is not a number is the default instance.
    pub fn from_tag(tag: &str) -> Self {
        tag.parse().map_or(OspfProcId::Default, OspfProcId::Numeric)
    }

    /// JSON form used in rewritten attributes: a number, or `"default"`.
    pub fn to_value(self) -> serde_json::Value {
        match self {
            OspfProcId::Default => serde_json::Value::from("default"),
            OspfProcId::Numeric(n) => serde_json::Value::from(n),
        }
    }
}

impl fmt::Display for OspfProcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OspfProcId::Default => write!(f, "default"),
            OspfProcId::Numeric(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OspfProcAliasTable {
    aliases: AliasTable<OspfProcKey>,
    per_node: BTreeMap<String, u32>,
}

impl Default for OspfProcAliasTable {
    fn default() -> Self {
        Self {
            aliases: AliasTable::new(OSPF_TABLE),
            per_node: BTreeMap::new(),
        }
    }
}

impl OspfProcAliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan every network whose name matches `area_pattern`.
    pub fn build(
        &mut self,
        topology: &Topology,
        area_pattern: &Regex,
        nodes: &NodeNameAliasTable,
    ) -> NamespaceResult<()> {
        let mut areas = 0usize;
        for network in topology
            .networks()
            .iter()
            .filter(|nw| area_pattern.is_match(&nw.name))
        {
            areas += 1;
            for node in &network.nodes {
                let Some(process) = node.attr().process_id() else {
                    continue;
                };
                let converted_node = nodes.forward(&node.name)?;
                self.insert(OspfProcKey::new(&node.name, process), converted_node)?;
            }
        }
        debug!(areas, processes = self.aliases.len(), "ospf proc id table built");
        Ok(())
    }

    fn insert(&mut self, original: OspfProcKey, converted_node: &str) -> NamespaceResult<()> {
        if self.aliases.contains_original(&original) {
            return Ok(());
        }
        let ordinal = self.per_node.get(converted_node).copied().unwrap_or(0);
        let converted = OspfProcKey::new(
            converted_node,
            OspfProcId::from_ordinal(ordinal).to_string(),
        );
        self.aliases.register(original, converted)?;
        self.per_node.insert(converted_node.to_string(), ordinal + 1);
        Ok(())
    }

    /// Converted process id of (original node, original process tag).
    pub fn convert(&self, node: &str, process: &str) -> NamespaceResult<OspfProcId> {
        let converted = self.aliases.forward(&OspfProcKey::new(node, process))?;
        Ok(OspfProcId::from_tag(&converted.process))
    }

    pub fn forward(&self, original: &OspfProcKey) -> NamespaceResult<&OspfProcKey> {
        self.aliases.forward(original)
    }

    pub fn reverse(&self, converted: &OspfProcKey) -> NamespaceResult<&OspfProcKey> {
        self.aliases.reverse(converted)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Forward map: original node -> original process tag -> converted tag.
    pub fn to_persisted(&self) -> BTreeMap<String, BTreeMap<String, String>> {
        let mut out: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        for (original, converted) in self.aliases.iter() {
            out.entry(original.node.clone())
                .or_default()
                .insert(original.process.clone(), converted.process.clone());
        }
        out
    }

    pub fn from_persisted(
        data: BTreeMap<String, BTreeMap<String, String>>,
        nodes: &NodeNameAliasTable,
    ) -> NamespaceResult<Self> {
        let mut entries = Vec::new();
        let mut per_node: BTreeMap<String, u32> = BTreeMap::new();
        for (node, procs) in data {
            let converted_node = nodes.forward(&node)?.to_string();
            for (process, converted) in procs {
                *per_node.entry(converted_node.clone()).or_default() += 1;
                entries.push(AliasEntry {
                    original: OspfProcKey::new(&node, process),
                    converted: OspfProcKey::new(&converted_node, converted),
                });
            }
        }
        Ok(Self {
            aliases: AliasTable::from_persisted(OSPF_TABLE, entries)?,
            per_node,
        })
    }
}
