//! Attribute bag accessors.
//!
//! Entity attributes live in a namespaced container key such as
//! `mddo-topology:l3-node-attributes`. Source documents spell inner keys with
//! hyphens (`node-type`, `static-route`); key-converted documents use
//! underscores and plural forms (`node_type`, `static_routes`). Accessors here
//! accept both spellings so one API reads either namespace.

use serde_json::{Map, Value};

/// Read-only view over the attribute container of one entity.
#[derive(Debug, Clone, Copy)]
pub struct AttrBag<'a> {
    map: Option<&'a Map<String, Value>>,
}

/// One static route entry of a layer-3 node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticRoute {
    pub prefix: String,
    pub next_hop: Option<String>,
    pub interface: Option<String>,
}

/// True if `key` names an attribute container (as opposed to e.g. `_diff_state_`).
pub fn is_container_key(key: &str) -> bool {
    key.ends_with("attributes")
}

/// Mutable access to the attribute container inside an entity's extra keys.
pub fn container_mut(attributes: &mut Map<String, Value>) -> Option<&mut Map<String, Value>> {
    attributes
        .iter_mut()
        .find(|(k, v)| is_container_key(k) && v.is_object())
        .and_then(|(_, v)| v.as_object_mut())
}

/// Swap `-` and `_` so both spellings of a key can be tried.
fn alternate_spelling(key: &str) -> String {
    if key.contains('-') {
        key.replace('-', "_")
    } else {
        key.replace('_', "-")
    }
}

impl<'a> AttrBag<'a> {
    /// Pick the attribute container out of an entity's extra keys.
    pub fn of(attributes: &'a Map<String, Value>) -> Self {
        let map = attributes
            .iter()
            .find(|(k, v)| is_container_key(k) && v.is_object())
            .and_then(|(_, v)| v.as_object());
        Self { map }
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_none_or(Map::is_empty)
    }

    /// Look up a key in either hyphen or underscore spelling.
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        let map = self.map?;
        map.get(key).or_else(|| map.get(&alternate_spelling(key)))
    }

    /// Look up the first present key among several spellings.
    pub fn get_any(&self, keys: &[&str]) -> Option<&'a Value> {
        keys.iter().find_map(|k| self.get(k))
    }

    pub fn str(&self, key: &str) -> Option<&'a str> {
        self.get(key).and_then(Value::as_str)
    }

    /// String elements of an array-valued attribute (non-strings are skipped).
    pub fn strings(&self, keys: &[&str]) -> Vec<&'a str> {
        self.get_any(keys)
            .and_then(Value::as_array)
            .map(|arr| arr.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    pub fn node_type(&self) -> Option<&'a str> {
        self.str("node-type")
    }

    pub fn flags(&self) -> Vec<&'a str> {
        self.strings(&["flag", "flags"])
    }

    /// Interface addresses in CIDR form (`10.0.0.1/30`).
    pub fn ip_addresses(&self) -> Vec<&'a str> {
        self.strings(&["ip-address", "ip_addr", "ip_addrs"])
    }

    /// OSPF process id, normalized to a string (`1`, `default`).
    pub fn process_id(&self) -> Option<String> {
        match self.get("process-id")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn static_routes(&self) -> Vec<StaticRoute> {
        let Some(routes) = self
            .get_any(&["static-route", "static_routes"])
            .and_then(Value::as_array)
        else {
            return Vec::new();
        };

        routes
            .iter()
            .filter_map(|route| {
                let route = AttrBag {
                    map: route.as_object(),
                };
                Some(StaticRoute {
                    prefix: route.str("prefix")?.to_string(),
                    next_hop: route.str("next-hop").map(str::to_string),
                    interface: route.str("interface").map(str::to_string),
                })
            })
            .collect()
    }
}
