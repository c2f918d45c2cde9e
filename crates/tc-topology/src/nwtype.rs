//! Network type identifiers used in `network-types`.

pub const MDDO_L1: &str = "mddo-topology:l1-network";
pub const MDDO_L2: &str = "mddo-topology:l2-network";
pub const MDDO_L3: &str = "mddo-topology:l3-network";
pub const MDDO_OSPF_AREA: &str = "mddo-topology:ospf-area-network";
pub const MDDO_BGP_PROC: &str = "mddo-topology:bgp-proc-network";
pub const MDDO_BGP_AS: &str = "mddo-topology:bgp-as-network";

/// Network types at or above layer 3.
pub const UPPER_LAYER3: [&str; 4] = [MDDO_L3, MDDO_OSPF_AREA, MDDO_BGP_PROC, MDDO_BGP_AS];
