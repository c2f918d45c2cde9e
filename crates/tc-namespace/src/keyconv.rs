//! Recursive attribute key conversion.
//!
//! Source attribute keys are hyphenated and mostly singular (`static-route`,
//! `ip-address`); emulated-namespace keys are snake_case and plural for list
//! values (`static_routes`). `ip_address` always becomes `ip_addr`, whatever
//! the value shape.

use serde_json::{Map, Value};
use tc_topology::attr::is_container_key;

/// Keys removed at any depth before conversion.
pub const DROPPED_KEYS: [&str; 2] = ["_diff_state_", "router-id-source"];

/// snake_case key -> plural form, applied only to array values.
const PLURAL_KEYS: [(&str, &str); 10] = [
    ("static_route", "static_routes"),
    ("neighbor", "neighbors"),
    ("prefix", "prefixes"),
    ("flag", "flags"),
    ("confederation_member", "confederation_members"),
    ("peer_group", "peer_groups"),
    ("policy", "policies"),
    ("import_policy", "import_policies"),
    ("export_policy", "export_policies"),
    ("redistribute", "redistribute_list"),
];

fn is_dropped(key: &str) -> bool {
    DROPPED_KEYS.contains(&key)
}

/// Convert one key given the shape of its value.
pub fn convert_key(key: &str, value: &Value) -> String {
    let key = key.replace('-', "_");
    if value.is_array() {
        if let Some((_, plural)) = PLURAL_KEYS.iter().find(|(singular, _)| *singular == key) {
            return (*plural).to_string();
        }
    }
    if key == "ip_address" {
        return "ip_addr".to_string();
    }
    key
}

/// Convert every map key inside `value`, recursing through arrays and maps.
pub fn convert_value(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(convert_value).collect()),
        Value::Object(map) => Value::Object(convert_map(map)),
        other => other.clone(),
    }
}

fn convert_map(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .filter(|(k, _)| !is_dropped(k))
        .map(|(k, v)| (convert_key(k, v), convert_value(v)))
        .collect()
}

/// Convert the extra keys of a network/node/tp/link.
///
/// Attribute container names (`mddo-topology:l3-node-attributes`) are kept
/// as-is; their contents are converted. Other keys are dropped if diagnostic
/// and copied otherwise.
pub fn convert_entity_attributes(attributes: &Map<String, Value>) -> Map<String, Value> {
    attributes
        .iter()
        .filter(|(k, _)| !is_dropped(k))
        .map(|(k, v)| {
            let v = if is_container_key(k) {
                convert_value(v)
            } else {
                v.clone()
            };
            (k.clone(), v)
        })
        .collect()
}
