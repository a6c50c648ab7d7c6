use serde::{Deserialize, Serialize};

/// Network is the top-level result of parsing one configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub devices: Vec<Device>,
    #[serde(default)]
    pub connections: Option<Vec<serde_json::Map<String, serde_json::Value>>>,
    #[serde(default)]
    pub topology: Option<String>,
}

/// Device represents a single parsed device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub hostname: String,
    pub interfaces: Vec<Interface>,
    #[serde(default)]
    pub routing: Option<Routing>,
}

impl Device {
    /// Static routes, empty when routing was never extracted
    pub fn routes(&self) -> &[Route] {
        self.routing.as_ref().map(|r| r.routes.as_slice()).unwrap_or(&[])
    }

    /// VLAN definitions, empty when routing was never extracted
    pub fn vlans(&self) -> &[Vlan] {
        self.routing.as_ref().map(|r| r.vlans.as_slice()).unwrap_or(&[])
    }

    pub fn interface(&self, name: &str) -> Option<&Interface> {
        self.interfaces.iter().find(|i| i.name == name)
    }
}

/// Routing section of a device: serialized as `{"routes": [...], "vlans": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Routing {
    pub routes: Vec<Route>,
    pub vlans: Vec<Vlan>,
}

/// Administrative state of an interface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceStatus {
    #[default]
    Enabled,
    Disabled,
}

/// Interface block extracted from the configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Interface {
    pub name: String,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: InterfaceStatus,
    /// Membership tokens as written in the config: VLAN names or numeric ids
    #[serde(default)]
    pub vlan_members: Vec<String>,
    #[serde(default)]
    pub port_mode: Option<String>,
}

impl Interface {
    /// Interface family prefix used for grouping, e.g. "ge" for "ge-0/0/3"
    pub fn family(&self) -> &str {
        match self.name.split_once('-') {
            Some((family, _)) => family,
            None => "other",
        }
    }

    /// Trailing port number, e.g. 47 for "ge-0/0/47"; 0 when there is none
    pub fn port_number(&self) -> u32 {
        let parts: Vec<&str> = self.name.split('/').collect();
        if parts.len() < 3 {
            return 0;
        }
        parts
            .last()
            .and_then(|p| p.parse().ok())
            .unwrap_or(0)
    }
}

/// VLAN definition plus the interfaces resolved into it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vlan {
    pub name: String,
    pub vlan_id: u32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<String>,
}

/// Static route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub destination: String,
    pub next_hop: String,
    #[serde(default = "default_protocol")]
    pub protocol: String,
    #[serde(default)]
    pub metric: Option<u32>,
    #[serde(default)]
    pub preference: Option<u32>,
}

impl Route {
    pub fn new_static(destination: &str, next_hop: &str) -> Self {
        Self {
            destination: destination.to_string(),
            next_hop: next_hop.to_string(),
            protocol: default_protocol(),
            metric: None,
            preference: None,
        }
    }
}

fn default_protocol() -> String {
    "static".to_string()
}
