use serde_json::json;
use tc_topology::{NetworkBuilder, TopologyBuilder, from_json_str, load_json, nwtype, save_json};

const SAMPLE: &str = r#"{
  "ietf-network:networks": {
    "network": [
      {
        "network-id": "layer3",
        "network-types": {"mddo-topology:l3-network": {}},
        "supporting-network": [{"network-ref": "layer2"}],
        "node": [
          {
            "node-id": "R1",
            "supporting-node": [{"network-ref": "layer2", "node-ref": "R1_ge-0/0/0"}],
            "ietf-network-topology:termination-point": [
              {
                "tp-id": "ge-0/0/0.0",
                "supporting-termination-point": [
                  {"network-ref": "layer2", "node-ref": "R1_ge-0/0/0", "tp-ref": "ge-0/0/0"}
                ],
                "mddo-topology:l3-termination-point-attributes": {"ip-address": ["10.0.0.1/30"]}
              }
            ],
            "mddo-topology:l3-node-attributes": {"node-type": "node", "os-type": "juniper"}
          },
          {
            "node-id": "R2",
            "ietf-network-topology:termination-point": [{"tp-id": "ge-0/0/0.0"}],
            "mddo-topology:l3-node-attributes": {"node-type": "node"}
          }
        ],
        "ietf-network-topology:link": [
          {
            "link-id": "R1,ge-0/0/0.0,R2,ge-0/0/0.0",
            "source": {"source-node": "R1", "source-tp": "ge-0/0/0.0"},
            "destination": {"dest-node": "R2", "dest-tp": "ge-0/0/0.0"}
          }
        ]
      }
    ]
  }
}"#;

#[test]
fn parse_netomox_document() {
    let topo = from_json_str(SAMPLE).unwrap();
    let l3 = topo.find_network("layer3").unwrap();

    assert_eq!(l3.primary_network_type(), Some(nwtype::MDDO_L3));
    assert_eq!(l3.supports[0].network_ref, "layer2");
    assert_eq!(l3.nodes.len(), 2);
    assert_eq!(l3.links.len(), 1);

    let r1 = l3.find_node("R1").unwrap();
    assert_eq!(r1.node_type(), Some("node"));
    assert_eq!(r1.attr().str("os-type"), Some("juniper"));
    let tp = r1.find_term_point("ge-0/0/0.0").unwrap();
    assert_eq!(tp.supports[0].tp_ref, "ge-0/0/0");
    assert_eq!(tp.attr().ip_addresses(), vec!["10.0.0.1/30"]);

    assert!(l3.find_link_by_source("R1", "ge-0/0/0.0").is_some());
    assert!(l3.find_link_by_source("R2", "ge-0/0/0.0").is_none());
}

#[test]
fn reserialized_document_is_stable() {
    let topo = from_json_str(SAMPLE).unwrap();
    let first = tc_topology::to_json_string(&topo).unwrap();
    let reparsed = from_json_str(&first).unwrap();
    let second = tc_topology::to_json_string(&reparsed).unwrap();

    assert_eq!(topo, reparsed);
    assert_eq!(first, second);
}

#[test]
fn rejects_dangling_link() {
    let broken = SAMPLE.replace("\"dest-node\": \"R2\"", "\"dest-node\": \"R9\"");
    assert!(from_json_str(&broken).is_err());
}

#[test]
fn save_and_load_file() {
    let mut nw = NetworkBuilder::new("ospf_area0", nwtype::MDDO_OSPF_AREA);
    let r1 = nw.add_node("R1");
    nw.set_node_attribute(
        r1,
        "mddo-topology:ospf-area-node-attributes",
        json!({"node-type": "node", "process-id": 1}),
    );
    let mut topo = TopologyBuilder::new();
    topo.add_network(nw.build().unwrap());
    let topology = topo.build().unwrap();

    let path = std::env::temp_dir().join("tc_topology_save_and_load.json");
    save_json(&path, &topology).unwrap();
    let loaded = load_json(&path).unwrap();

    assert_eq!(topology, loaded);
    let node = &loaded.find_network("ospf_area0").unwrap().nodes[0];
    assert_eq!(node.attr().process_id().as_deref(), Some("1"));
}
