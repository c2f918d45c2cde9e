//! Container kind/image selection for ContainerLab nodes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EmitError, EmitResult};

/// Recognized topology node types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Shared broadcast domain, emulated as a bridge.
    Segment,
    /// Router.
    Router,
    /// Traffic generator / host.
    Endpoint,
}

impl NodeKind {
    pub fn from_node_type(node: &str, node_type: Option<&str>) -> EmitResult<Self> {
        match node_type {
            Some("segment") => Ok(NodeKind::Segment),
            Some("node") => Ok(NodeKind::Router),
            Some("endpoint") => Ok(NodeKind::Endpoint),
            other => Err(EmitError::UnknownNodeType {
                node: node.to_string(),
                node_type: other.unwrap_or("<none>").to_string(),
            }),
        }
    }
}

/// One entry of the ContainerLab `topology.nodes` map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClabNode {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(
        rename = "startup-config",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub startup_config: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub binds: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Value>,
}

/// Decides the container definition of each emitted node.
pub trait ImagePolicy {
    /// `name` is the node's L1 principal name.
    fn node_spec(&self, name: &str, kind: NodeKind) -> ClabNode;
}

/// Container template; `startup_config` emits `<node>.conf` when set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeTemplate {
    pub kind: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub startup_config: bool,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub binds: Vec<String>,
    #[serde(default)]
    pub components: Vec<Value>,
}

impl NodeTemplate {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            image: None,
            startup_config: false,
            license: None,
            binds: Vec::new(),
            components: Vec::new(),
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_startup_config(mut self) -> Self {
        self.startup_config = true;
        self
    }

    fn instantiate(&self, name: &str) -> ClabNode {
        ClabNode {
            kind: self.kind.clone(),
            image: self.image.clone(),
            startup_config: self.startup_config.then(|| format!("{name}.conf")),
            license: self.license.clone(),
            binds: self.binds.clone(),
            components: self.components.clone(),
        }
    }
}

/// Template per node kind, plus per-node overrides keyed by principal name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateImagePolicy {
    pub router: NodeTemplate,
    pub bridge: NodeTemplate,
    pub endpoint: NodeTemplate,
    pub overrides: BTreeMap<String, NodeTemplate>,
}

impl Default for TemplateImagePolicy {
    fn default() -> Self {
        Self {
            router: NodeTemplate::new("juniper_crpd")
                .with_image("crpd:22.1R1.10")
                .with_startup_config(),
            bridge: NodeTemplate::new("ovs-bridge"),
            endpoint: NodeTemplate::new("linux").with_image("ghcr.io/ool-mddo/ool-iperf:main"),
            overrides: BTreeMap::new(),
        }
    }
}

impl TemplateImagePolicy {
    /// Bind-mount a license file into every router container.
    pub fn with_license_bind(mut self, bind: impl Into<String>) -> Self {
        self.router.binds.push(bind.into());
        self
    }
}

impl ImagePolicy for TemplateImagePolicy {
    fn node_spec(&self, name: &str, kind: NodeKind) -> ClabNode {
        let template = self.overrides.get(name).unwrap_or(match kind {
            NodeKind::Segment => &self.bridge,
            NodeKind::Router => &self.router,
            NodeKind::Endpoint => &self.endpoint,
        });
        template.instantiate(name)
    }
}
