use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Network;
use crate::diagrams::render::DiagramFiles;
use crate::diagrams::DiagramKind;

/// StoredConfig is one uploaded configuration with everything derived from it
#[derive(Debug, Clone)]
pub struct StoredConfig {
    pub id: String,
    pub filename: String,
    pub network: Network,
    /// Rendered images, only for the variants that rendered successfully
    pub diagrams: BTreeMap<DiagramKind, DiagramFiles>,
    /// Mermaid markup for every variant
    pub markup: BTreeMap<DiagramKind, String>,
    pub created_at: DateTime<Utc>,
}

impl StoredConfig {
    pub fn summary(&self) -> ConfigSummary {
        ConfigSummary {
            config_id: self.id.clone(),
            filename: self.filename.clone(),
            timestamp: self.created_at,
            device_count: self.network.devices.len(),
        }
    }
}

/// ConfigSummary is the list view of a stored configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSummary {
    pub config_id: String,
    pub filename: String,
    pub timestamp: DateTime<Utc>,
    pub device_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigListResponse {
    pub configs: Vec<ConfigSummary>,
}

/// UploadResponse returned after a configuration is parsed and rendered
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub config_id: String,
    pub filename: String,
    pub device_count: usize,
    pub interface_count: usize,
    pub vlan_count: usize,
    pub diagram_types: Vec<DiagramKind>,
}

impl UploadResponse {
    pub fn from_stored(config: &StoredConfig) -> Self {
        let devices = &config.network.devices;
        Self {
            config_id: config.id.clone(),
            filename: config.filename.clone(),
            device_count: devices.len(),
            interface_count: devices.iter().map(|d| d.interfaces.len()).sum(),
            vlan_count: devices.iter().map(|d| d.vlans().len()).sum(),
            diagram_types: config.diagrams.keys().copied().collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedConfigResponse {
    pub config_id: String,
    pub filename: String,
    pub network: Network,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagramsResponse {
    pub config_id: String,
    pub filename: String,
    pub diagrams: BTreeMap<DiagramKind, DiagramFiles>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MermaidResponse {
    pub config_id: String,
    pub filename: String,
    pub diagrams: BTreeMap<DiagramKind, String>,
}

/// Query parameters for a single diagram download
#[derive(Debug, Clone, Deserialize)]
pub struct DiagramQuery {
    #[serde(default = "default_diagram_type")]
    pub diagram_type: String,
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_diagram_type() -> String {
    "topology".to_string()
}

fn default_format() -> String {
    "png".to_string()
}
