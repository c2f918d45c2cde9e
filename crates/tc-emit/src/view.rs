//! Physical (L1) naming views over a topology's node and term point names.

use tc_namespace::{ConvertTable, L1Alias};

use crate::error::EmitResult;

/// Principal/agent names for nodes and term points of the graph being emitted.
pub trait L1AliasView {
    fn node_l1(&self, node: &str) -> EmitResult<L1Alias>;
    fn tp_l1(&self, node: &str, tp: &str) -> EmitResult<L1Alias>;
}

/// Views a graph already rewritten into the converted namespace.
impl L1AliasView for ConvertTable {
    fn node_l1(&self, node: &str) -> EmitResult<L1Alias> {
        Ok(self.node_name().find_l1_alias(node)?)
    }

    fn tp_l1(&self, node: &str, tp: &str) -> EmitResult<L1Alias> {
        Ok(self.tp_name().find_l1_alias(node, tp)?)
    }
}

/// Views a graph that was never renamed.
///
/// Node names are made safe for file and container names (`/` -> `-`); term
/// point names are used as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThroughAliases;

pub fn safe_node_name(name: &str) -> String {
    name.replace('/', "-")
}

impl L1AliasView for PassThroughAliases {
    fn node_l1(&self, node: &str) -> EmitResult<L1Alias> {
        let name = safe_node_name(node);
        Ok(L1Alias {
            principal: name.clone(),
            agent: name,
        })
    }

    fn tp_l1(&self, _node: &str, tp: &str) -> EmitResult<L1Alias> {
        Ok(L1Alias {
            principal: tp.to_string(),
            agent: tp.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_through_is_safe() {
        let view = PassThroughAliases;
        let node = view.node_l1("Seg_10.0.0.0/30").unwrap();
        assert_eq!(node.principal, "Seg_10.0.0.0-30");
        assert_eq!(node.agent, "Seg_10.0.0.0-30");
        assert_eq!(view.tp_l1("R1", "ge-0/0/0.0").unwrap().agent, "ge-0/0/0.0");
    }
}
