//! Generic bidirectional alias table.
//!
//! An `AliasTable<K>` maps an original identifier to a converted identifier of
//! the same shape and keeps the exact reverse map alongside. Both maps are
//! mutual inverses at all times: registration is first-write-wins for an
//! identical pair and rejects any pair that would make the mapping
//! non-injective in either direction.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{NamespaceError, NamespaceResult};

/// One (original, converted) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasEntry<K> {
    pub original: K,
    pub converted: K,
}

/// Bidirectional, injective mapping within one namespace scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTable<K> {
    scope: &'static str,
    forward: BTreeMap<K, K>,
    reverse: BTreeMap<K, K>,
}

impl<K> AliasTable<K>
where
    K: Ord + Clone + fmt::Display,
{
    /// Create an empty table; `scope` names the table in errors.
    pub fn new(scope: &'static str) -> Self {
        Self {
            scope,
            forward: BTreeMap::new(),
            reverse: BTreeMap::new(),
        }
    }

    pub fn scope(&self) -> &'static str {
        self.scope
    }

    /// Register `original -> converted`.
    ///
    /// No-op if the exact pair is already present. Fails with
    /// `AliasCollision` if either side is already paired with something else.
    pub fn register(&mut self, original: K, converted: K) -> NamespaceResult<()> {
        if let Some(existing) = self.forward.get(&original) {
            if *existing == converted {
                return Ok(());
            }
            return Err(self.collision(&original, &converted, existing));
        }
        if let Some(existing) = self.reverse.get(&converted) {
            return Err(self.collision(&original, &converted, existing));
        }

        self.forward.insert(original.clone(), converted.clone());
        self.reverse.insert(converted, original);
        Ok(())
    }

    /// Converted identifier for `original`.
    pub fn forward(&self, original: &K) -> NamespaceResult<&K> {
        self.forward
            .get(original)
            .ok_or_else(|| self.not_found(original))
    }

    /// Original identifier for `converted`.
    pub fn reverse(&self, converted: &K) -> NamespaceResult<&K> {
        self.reverse
            .get(converted)
            .ok_or_else(|| self.not_found(converted))
    }

    pub fn contains_original(&self, original: &K) -> bool {
        self.forward.contains_key(original)
    }

    pub fn contains_converted(&self, converted: &K) -> bool {
        self.reverse.contains_key(converted)
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Iterate over (original, converted) pairs in original-key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &K)> {
        self.forward.iter()
    }

    /// Full forward mapping as a list of entries (reverse is reconstructible).
    pub fn to_persisted(&self) -> Vec<AliasEntry<K>> {
        self.forward
            .iter()
            .map(|(original, converted)| AliasEntry {
                original: original.clone(),
                converted: converted.clone(),
            })
            .collect()
    }

    /// Rebuild a table from its persisted entries, re-checking injectivity.
    pub fn from_persisted(
        scope: &'static str,
        entries: impl IntoIterator<Item = AliasEntry<K>>,
    ) -> NamespaceResult<Self> {
        let mut table = Self::new(scope);
        for entry in entries {
            table.register(entry.original, entry.converted)?;
        }
        Ok(table)
    }

    pub(crate) fn not_found(&self, key: &K) -> NamespaceError {
        NamespaceError::AliasNotFound {
            table: self.scope,
            key: key.to_string(),
        }
    }

    fn collision(&self, original: &K, converted: &K, existing: &K) -> NamespaceError {
        NamespaceError::AliasCollision {
            table: self.scope,
            original: original.to_string(),
            converted: converted.to_string(),
            existing: existing.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> AliasTable<String> {
        AliasTable::new("test_table")
    }

    #[test]
    fn register_and_lookup() {
        let mut t = table();
        t.register("Seg_A".into(), "br0".into()).unwrap();
        assert_eq!(t.forward(&"Seg_A".into()).unwrap(), "br0");
        assert_eq!(t.reverse(&"br0".into()).unwrap(), "Seg_A");
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn identical_pair_is_noop() {
        let mut t = table();
        t.register("R1".into(), "R1".into()).unwrap();
        t.register("R1".into(), "R1".into()).unwrap();
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn forward_collision_rejected() {
        let mut t = table();
        t.register("R1".into(), "a".into()).unwrap();
        let err = t.register("R1".into(), "b".into()).unwrap_err();
        assert_eq!(
            err,
            NamespaceError::AliasCollision {
                table: "test_table",
                original: "R1".into(),
                converted: "b".into(),
                existing: "a".into(),
            }
        );
        // Table unchanged after the failed registration
        assert_eq!(t.forward(&"R1".into()).unwrap(), "a");
        assert!(!t.contains_converted(&"b".into()));
    }

    #[test]
    fn reverse_collision_rejected() {
        let mut t = table();
        t.register("R1".into(), "a".into()).unwrap();
        let err = t.register("R2".into(), "a".into()).unwrap_err();
        assert!(matches!(err, NamespaceError::AliasCollision { .. }));
        assert!(!t.contains_original(&"R2".into()));
    }

    #[test]
    fn missing_key_reports_scope() {
        let t = table();
        let err = t.forward(&"nope".into()).unwrap_err();
        assert_eq!(
            err,
            NamespaceError::AliasNotFound {
                table: "test_table",
                key: "nope".into(),
            }
        );
        assert!(t.reverse(&"nope".into()).is_err());
    }

    #[test]
    fn persisted_round_trip() {
        let mut t = table();
        t.register("b".into(), "2".into()).unwrap();
        t.register("a".into(), "1".into()).unwrap();
        let entries = t.to_persisted();
        assert_eq!(entries[0].original, "a");
        let restored = AliasTable::from_persisted("test_table", entries).unwrap();
        assert_eq!(t, restored);
    }

    #[test]
    fn corrupt_persisted_data_rejected() {
        let entries = vec![
            AliasEntry {
                original: "a".to_string(),
                converted: "x".to_string(),
            },
            AliasEntry {
                original: "b".to_string(),
                converted: "x".to_string(),
            },
        ];
        assert!(AliasTable::from_persisted("test_table", entries).is_err());
    }
}
