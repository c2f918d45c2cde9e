//! tc-topology: multi-layer network topology model for topoconv.
//!
//! Provides:
//! - RFC8345-shaped data structures (networks, nodes, term points, links, supports)
//! - serde (de)serialization of the netomox JSON dialect
//! - Incremental network builder with structural validation
//! - Attribute accessors that read both source and key-converted spellings
//!
//! # Example
//!
//! ```
//! use tc_topology::{NetworkBuilder, TopologyBuilder, nwtype};
//!
//! let mut nw = NetworkBuilder::new("layer3", nwtype::MDDO_L3);
//! let r1 = nw.add_node("R1");
//! let r2 = nw.add_node("R2");
//! nw.add_term_point(r1, "eth0");
//! nw.add_term_point(r2, "eth0");
//! nw.add_bidirectional_link("R1", "eth0", "R2", "eth0");
//!
//! let mut topo = TopologyBuilder::new();
//! topo.add_network(nw.build().unwrap());
//! let topology = topo.build().unwrap();
//!
//! assert_eq!(topology.networks().len(), 1);
//! assert_eq!(topology.find_network("layer3").unwrap().links.len(), 2);
//! ```

pub mod attr;
pub mod builder;
pub mod error;
pub mod io;
pub mod model;
pub mod nwtype;
pub(crate) mod validate;

pub use attr::{AttrBag, StaticRoute};
pub use builder::{NetworkBuilder, TopologyBuilder};
pub use error::{TopologyError, TopologyResult};
pub use io::{from_json_str, load_json, save_json, to_json_string};
pub use model::{
    Link, LinkDestination, LinkSource, Network, NetworkSupport, Networks, Node, NodeSupport,
    TermPoint, Topology, TpRef, TpSupport,
};
