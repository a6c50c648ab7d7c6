pub mod graphviz;
pub mod mermaid;
pub mod render;

use serde::{Deserialize, Serialize};

/// The diagram variants produced for every parsed configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramKind {
    Topology,
    Interfaces,
    Vlans,
    Routing,
    Overview,
}

impl DiagramKind {
    pub const ALL: [DiagramKind; 5] = [
        DiagramKind::Topology,
        DiagramKind::Interfaces,
        DiagramKind::Vlans,
        DiagramKind::Routing,
        DiagramKind::Overview,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DiagramKind::Topology => "topology",
            DiagramKind::Interfaces => "interfaces",
            DiagramKind::Vlans => "vlans",
            DiagramKind::Routing => "routing",
            DiagramKind::Overview => "overview",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }

    /// Human readable title used in rendered images
    pub fn title(&self) -> &'static str {
        match self {
            DiagramKind::Topology => "Network Topology",
            DiagramKind::Interfaces => "Interface Diagram",
            DiagramKind::Vlans => "VLAN Diagram",
            DiagramKind::Routing => "Routing Diagram",
            DiagramKind::Overview => "Network Overview",
        }
    }
}

impl std::fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-build identifier source. Each diagram build owns one, so repeated or
/// concurrent builds never share counters.
#[derive(Debug, Default)]
pub struct BuildContext {
    next: usize,
}

impl BuildContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next value of this build's counter, starting at 0
    pub fn next_id(&mut self) -> usize {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Convert arbitrary text into a node identifier: `[A-Za-z0-9_]` only and
/// starting with a letter
pub fn sanitize_id(text: &str) -> String {
    let sanitized: String = text
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    match sanitized.chars().next() {
        None => "node".to_string(),
        Some(first) if !first.is_ascii_alphabetic() => format!("node_{}", sanitized),
        Some(_) => sanitized,
    }
}
