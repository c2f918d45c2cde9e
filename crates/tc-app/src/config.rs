//! Application configuration (YAML).
//!
//! Every field has a default, so an empty document or a missing file yields
//! the standard layer3/OSPF/BGP pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tc_emit::{ClabConverter, DEFAULT_ENV_NAME, TemplateImagePolicy};
use tc_namespace::{LayerFilter, TableScope, filter::UPPER_LAYER3_PATTERNS};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Layer whose nodes and term points are renamed.
    pub base_layer: String,
    /// Network-name patterns kept by rewrite and filter.
    pub retain_layers: Vec<String>,
    /// Layers whose nodes keep their names.
    pub pass_through_layers: Vec<String>,
    pub ospf_area_pattern: String,
    pub clab: ClabConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClabConfig {
    pub name: String,
    /// Extra bind for router containers, e.g. `license.key:/config/license.key`.
    pub license_bind: Option<String>,
    pub images: TemplateImagePolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        let scope = TableScope::default();
        Self {
            base_layer: scope.base_layer,
            retain_layers: UPPER_LAYER3_PATTERNS.iter().map(|p| p.to_string()).collect(),
            pass_through_layers: scope.pass_through_layers,
            ospf_area_pattern: scope.ospf_area_pattern.as_str().to_string(),
            clab: ClabConfig::default(),
        }
    }
}

impl Default for ClabConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_ENV_NAME.to_string(),
            license_bind: None,
            images: TemplateImagePolicy::default(),
        }
    }
}

impl AppConfig {
    pub fn table_scope(&self) -> AppResult<TableScope> {
        let scope = TableScope {
            base_layer: self.base_layer.clone(),
            pass_through_layers: self.pass_through_layers.clone(),
            ..TableScope::default()
        };
        Ok(scope.with_ospf_area_pattern(&self.ospf_area_pattern)?)
    }

    pub fn layer_filter(&self) -> AppResult<LayerFilter> {
        if self.retain_layers.is_empty() {
            return Err(AppError::Config("retain_layers must not be empty".to_string()));
        }
        Ok(LayerFilter::new(&self.retain_layers)?)
    }

    pub fn clab_converter(&self) -> ClabConverter {
        let mut policy = self.clab.images.clone();
        if let Some(bind) = &self.clab.license_bind {
            policy = policy.with_license_bind(bind.clone());
        }
        ClabConverter::new(policy).with_name(self.clab.name.clone())
    }
}

/// Load config from a YAML file.
pub fn load_config(path: &Path) -> AppResult<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::FileRead {
        kind: "config",
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_config(&content).map_err(|e| AppError::Parse {
        kind: "config",
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load config from `path` if given, defaults otherwise.
pub fn load_config_or_default(path: Option<&Path>) -> AppResult<AppConfig> {
    match path {
        Some(path) => load_config(path),
        None => Ok(AppConfig::default()),
    }
}

fn parse_config(content: &str) -> Result<AppConfig, serde_yaml::Error> {
    if content.trim().is_empty() {
        return Ok(AppConfig::default());
    }
    serde_yaml::from_str(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(parse_config("").unwrap(), AppConfig::default());
        assert_eq!(parse_config("{}").unwrap(), AppConfig::default());
    }

    #[test]
    fn partial_document() {
        let config = parse_config(
            "base_layer: l3\nretain_layers: ['^l3$']\nclab:\n  name: lab1\n  license_bind: license.key:/config/license.key\n",
        )
        .unwrap();
        assert_eq!(config.base_layer, "l3");
        assert_eq!(config.pass_through_layers, ["bgp_proc", "bgp_as"]);
        assert_eq!(config.clab.images.bridge.kind, "ovs-bridge");

        let filter = config.layer_filter().unwrap();
        assert!(filter.retains("l3"));
        assert!(!filter.retains("layer3"));
        assert_eq!(config.table_scope().unwrap().base_layer, "l3");
    }

    #[test]
    fn invalid_patterns() {
        let config = AppConfig {
            ospf_area_pattern: "ospf(".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(config.table_scope(), Err(AppError::Namespace(_))));

        let config = AppConfig {
            retain_layers: Vec::new(),
            ..AppConfig::default()
        };
        assert!(matches!(config.layer_filter(), Err(AppError::Config(_))));
    }

    #[test]
    fn default_filter_matches_library_default() {
        let filter = AppConfig::default().layer_filter().unwrap();
        let default_filter = LayerFilter::default();
        let library: Vec<&str> = default_filter.patterns().collect();
        assert_eq!(filter.patterns().collect::<Vec<_>>(), library);
    }
}
