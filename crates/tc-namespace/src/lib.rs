//! tc-namespace: namespace conversion between an original and an emulated
//! network topology.
//!
//! Provides:
//! - A generic bidirectional, injective [`AliasTable`]
//! - Node, term-point, OSPF-process and static-route alias tables
//! - [`ConvertTable`], built in dependency order by a staged builder, or
//!   reloaded from its persisted JSON form
//! - Recursive attribute key conversion
//! - [`TopologyRewriter`], which rewrites retained layers into the converted
//!   namespace
//!
//! # Example
//!
//! ```
//! use tc_namespace::{ConvertTable, LayerFilter, TopologyRewriter};
//! use tc_topology::{NetworkBuilder, TopologyBuilder, nwtype};
//!
//! let mut l3 = NetworkBuilder::new("layer3", nwtype::MDDO_L3);
//! let r1 = l3.add_node("R1");
//! let r2 = l3.add_node("R2");
//! l3.add_term_point(r1, "ge-0/0/0.0");
//! l3.add_term_point(r2, "ge-0/0/1.0");
//! l3.add_bidirectional_link("R1", "ge-0/0/0.0", "R2", "ge-0/0/1.0");
//! let mut topo = TopologyBuilder::new();
//! topo.add_network(l3.build().unwrap());
//! let source = topo.build().unwrap();
//!
//! let table = ConvertTable::build(&source).unwrap();
//! let emulated = TopologyRewriter::new(&table, LayerFilter::default())
//!     .rewrite(&source)
//!     .unwrap();
//!
//! let links = &emulated.find_network("layer3").unwrap().links;
//! assert_eq!(links[0].id, "R1,eth1.0,R2,eth1.0");
//! ```

pub mod alias;
pub mod convert_table;
pub mod error;
pub mod filter;
pub mod keyconv;
pub mod keys;
pub mod node_table;
pub mod ospf_table;
pub mod rewrite;
pub mod static_route_table;
pub mod tp_table;

pub use alias::{AliasEntry, AliasTable};
pub use convert_table::{ConvertTable, ConvertTableBuilder, PersistedConvertTable, TableScope};
pub use error::{NamespaceError, NamespaceResult};
pub use filter::{LayerFilter, filter_layers};
pub use keys::{L1Alias, NameRecord, OspfProcKey, PackedNodeTp, StaticRouteKey, TpKey};
pub use node_table::{IdentityNaming, NodeNameAliasTable, NodeNamingRule};
pub use ospf_table::{OspfProcAliasTable, OspfProcId};
pub use rewrite::TopologyRewriter;
pub use static_route_table::{RouteEgress, StaticRouteTpAliasTable};
pub use tp_table::TermPointAliasTable;
