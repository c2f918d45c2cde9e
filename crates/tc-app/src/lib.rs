//! Shared application service layer for topoconv.
//!
//! Frontends go through this crate for config loading, convert table
//! build/reload/save, topology rewriting and descriptor emission.

pub mod config;
pub mod convert_service;
pub mod error;
pub mod table_service;

pub use config::{AppConfig, ClabConfig, load_config, load_config_or_default};
pub use convert_service::{emit_batfish, emit_containerlab, filter_topology, rewrite_topology};
pub use error::{AppError, AppResult};
pub use table_service::{
    LookupDirection, NameLookup, build_table, load_table, load_topology, lookup_node, lookup_tp,
    save_table, save_topology, table_to_json,
};
pub use tc_namespace::ConvertTable;
