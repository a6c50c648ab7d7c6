//! Mermaid flowchart markup for each diagram variant.

use std::collections::BTreeMap;

use super::{sanitize_id, BuildContext, DiagramKind};
use crate::models::{Device, Interface, Network};

const DEVICE_CLASS: &str = "classDef device fill:#e1f5fe,stroke:#01579b,stroke-width:3px,color:#000";
const INTERFACE_CLASS: &str = "classDef interface fill:#ffffff,stroke:#666,stroke-width:1px,color:#000";
const VLAN_INTERFACE_CLASS: &str =
    "classDef vlanInterface fill:#e8f5e8,stroke:#1b5e20,stroke-width:2px,color:#000";
const IP_INTERFACE_CLASS: &str =
    "classDef ipInterface fill:#f3e5f5,stroke:#4a148c,stroke-width:2px,color:#000";
const TRUNK_INTERFACE_CLASS: &str =
    "classDef trunkInterface fill:#fff3e0,stroke:#e65100,stroke-width:2px,color:#000";
const GROUP_CLASS: &str =
    "classDef interfaceGroup fill:#f3e5f5,stroke:#4a148c,stroke-width:2px,color:#000";
const VLAN_CLASS: &str = "classDef vlan fill:#e8f5e8,stroke:#1b5e20,stroke-width:2px,color:#000";
const MEMBER_CLASS: &str = "classDef interface fill:#f3e5f5,stroke:#4a148c,stroke-width:1px,color:#000";
const ROUTE_CLASS: &str = "classDef route fill:#fff3e0,stroke:#e65100,stroke-width:1px";

/// Markup for one diagram variant. Every call is an independent build.
pub fn generate(kind: DiagramKind, network: &Network) -> String {
    match kind {
        DiagramKind::Topology => topology(network),
        DiagramKind::Interfaces => interfaces(network),
        DiagramKind::Vlans => vlans(network),
        DiagramKind::Routing => routing(network),
        DiagramKind::Overview => overview(network),
    }
}

/// Markup for every variant
pub fn generate_all(network: &Network) -> BTreeMap<DiagramKind, String> {
    DiagramKind::ALL
        .into_iter()
        .map(|kind| (kind, generate(kind, network)))
        .collect()
}

/// Line accumulator for one flowchart build
struct Flowchart {
    lines: Vec<String>,
    ctx: BuildContext,
}

impl Flowchart {
    fn new(direction: &str, class_defs: &[&str]) -> Self {
        let mut lines = vec![format!("graph {}", direction)];
        lines.extend(class_defs.iter().map(|def| format!("    {}", def)));
        Self {
            lines,
            ctx: BuildContext::new(),
        }
    }

    fn node(&mut self, id: &str, label: &str) {
        self.lines.push(format!("    {}[\"{}\"]", id, escape_label(label)));
    }

    fn edge(&mut self, from: &str, to: &str) {
        self.lines.push(format!("    {} --> {}", from, to));
    }

    fn dotted_edge(&mut self, from: &str, to: &str) {
        self.lines.push(format!("    {} -.-> {}", from, to));
    }

    fn class(&mut self, id: &str, class: &str) {
        self.lines.push(format!("    class {} {}", id, class));
    }

    /// Device node, returns its id
    fn device(&mut self, device: &Device, styled: bool) -> String {
        let id = sanitize_id(&device.hostname);
        self.node(&id, &device.hostname);
        if styled {
            self.class(&id, "device");
        }
        id
    }

    fn finish(self) -> String {
        self.lines.join("\n")
    }
}

fn escape_label(label: &str) -> String {
    label.replace('"', "#quot;")
}

fn child_id(parent: &str, name: &str) -> String {
    format!("{}_{}", parent, sanitize_id(name))
}

fn topology(network: &Network) -> String {
    let mut chart = Flowchart::new(
        "LR",
        &[DEVICE_CLASS, INTERFACE_CLASS, VLAN_INTERFACE_CLASS, IP_INTERFACE_CLASS],
    );

    for device in &network.devices {
        let device_id = chart.device(device, true);
        for iface in &device.interfaces {
            let iface_id = child_id(&device_id, &iface.name);
            let mut label = vec![iface.name.clone()];
            label.extend(iface.ip.clone());
            label.extend(iface.description.clone());
            if !iface.vlan_members.is_empty() {
                label.push(format!("VLAN: {}", iface.vlan_members.join(", ")));
            }
            chart.node(&iface_id, &label.join("<br/>"));
            chart.edge(&device_id, &iface_id);

            let class = if !iface.vlan_members.is_empty() {
                "vlanInterface"
            } else if iface.ip.is_some() {
                "ipInterface"
            } else {
                "interface"
            };
            chart.class(&iface_id, class);
        }
    }

    chart.finish()
}

fn routing(network: &Network) -> String {
    let mut chart = Flowchart::new("LR", &[]);

    for device in &network.devices {
        let device_id = chart.device(device, false);
        for route in device.routes() {
            let route_id = format!("{}_route_{}", device_id, chart.ctx.next_id());
            chart.node(&route_id, &format!("{}<br/>via {}", route.destination, route.next_hop));
            chart.dotted_edge(&device_id, &route_id);
        }
    }

    chart.finish()
}

fn vlans(network: &Network) -> String {
    let mut chart = Flowchart::new("LR", &[DEVICE_CLASS, VLAN_CLASS, MEMBER_CLASS]);

    for device in &network.devices {
        let device_id = chart.device(device, true);
        for vlan in device.vlans() {
            let vlan_node = format!("{}_vlan_{}", device_id, vlan.vlan_id);
            let mut label = format!("VLAN {}<br/>{}", vlan.vlan_id, vlan.name);
            if let Some(desc) = &vlan.description {
                label.push_str("<br/>");
                label.push_str(desc);
            }
            chart.node(&vlan_node, &label);
            chart.edge(&device_id, &vlan_node);
            chart.class(&vlan_node, "vlan");

            for name in &vlan.interfaces {
                let iface_id = child_id(&vlan_node, name);
                let mut label = name.clone();
                if let Some(desc) = device.interface(name).and_then(|i| i.description.as_ref()) {
                    label.push_str("<br/>");
                    label.push_str(desc);
                }
                chart.node(&iface_id, &label);
                chart.edge(&vlan_node, &iface_id);
                chart.class(&iface_id, "interface");
            }
        }
    }

    chart.finish()
}

/// Interfaces grouped by family prefix, groups in order of first appearance
pub(crate) fn group_by_family(interfaces: &[Interface]) -> Vec<(String, Vec<&Interface>)> {
    let mut groups: Vec<(String, Vec<&Interface>)> = Vec::new();
    for iface in interfaces {
        let family = iface.family();
        match groups.iter_mut().find(|(name, _)| name == family) {
            Some((_, members)) => members.push(iface),
            None => groups.push((family.to_string(), vec![iface])),
        }
    }
    groups
}

fn interfaces(network: &Network) -> String {
    let mut chart = Flowchart::new(
        "LR",
        &[
            DEVICE_CLASS,
            GROUP_CLASS,
            INTERFACE_CLASS,
            VLAN_INTERFACE_CLASS,
            TRUNK_INTERFACE_CLASS,
        ],
    );

    for device in &network.devices {
        let device_id = chart.device(device, true);
        for (family, members) in group_by_family(&device.interfaces) {
            let group_id = child_id(&device_id, &family);
            chart.node(&group_id, &format!("{} Interfaces", family.to_uppercase()));
            chart.edge(&device_id, &group_id);
            chart.class(&group_id, "interfaceGroup");

            for iface in members {
                let iface_id = child_id(&group_id, &iface.name);
                let mut label = vec![iface.name.clone()];
                if let Some(ip) = &iface.ip {
                    label.push(format!("IP: {}", ip));
                }
                label.extend(iface.description.clone());
                if !iface.vlan_members.is_empty() {
                    label.push(format!("VLAN: {}", iface.vlan_members.join(", ")));
                }
                if let Some(mode) = &iface.port_mode {
                    label.push(format!("Mode: {}", mode));
                }
                chart.node(&iface_id, &label.join("<br/>"));
                chart.edge(&group_id, &iface_id);

                let class = if !iface.vlan_members.is_empty() {
                    "vlanInterface"
                } else if iface.port_mode.as_deref() == Some("trunk") {
                    "trunkInterface"
                } else {
                    "interface"
                };
                chart.class(&iface_id, class);
            }
        }
    }

    chart.finish()
}

fn overview(network: &Network) -> String {
    let mut chart = Flowchart::new(
        "TD",
        &[
            "classDef device fill:#e1f5fe,stroke:#01579b,stroke-width:2px",
            "classDef interface fill:#f3e5f5,stroke:#4a148c,stroke-width:1px",
            "classDef vlan fill:#e8f5e8,stroke:#1b5e20,stroke-width:1px",
            ROUTE_CLASS,
        ],
    );

    for device in &network.devices {
        let device_id = chart.device(device, true);

        // Addressed interfaces among the first five
        for iface in device.interfaces.iter().take(5) {
            let Some(ip) = iface.ip.as_deref() else {
                continue;
            };
            let iface_id = child_id(&device_id, &iface.name);
            chart.node(&iface_id, &format!("{}<br/>{}", iface.name, ip));
            chart.edge(&device_id, &iface_id);
            chart.class(&iface_id, "interface");
        }

        for vlan in device.vlans() {
            let vlan_node = format!("{}_vlan_{}", device_id, vlan.vlan_id);
            chart.node(&vlan_node, &format!("VLAN {}<br/>{}", vlan.vlan_id, vlan.name));
            chart.dotted_edge(&device_id, &vlan_node);
            chart.class(&vlan_node, "vlan");
        }
    }

    chart.finish()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::parser::{parse, tests::SAMPLE_CONFIG};

    fn node_ids(markup: &str) -> Vec<String> {
        markup
            .lines()
            .filter_map(|line| line.trim().split_once("[\""))
            .map(|(id, _)| id.to_string())
            .collect()
    }

    #[test]
    fn test_generate_all_covers_every_kind() {
        let network = parse(SAMPLE_CONFIG).unwrap();
        let all = generate_all(&network);
        assert_eq!(all.len(), 5);
        assert!(all[&DiagramKind::Overview].starts_with("graph TD"));
        assert!(all[&DiagramKind::Topology].starts_with("graph LR"));
    }

    #[test]
    fn test_node_ids_are_sanitized() {
        let network = parse(SAMPLE_CONFIG).unwrap();
        for (kind, markup) in generate_all(&network) {
            for id in node_ids(&markup) {
                assert!(
                    id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'),
                    "{} has bad id {}",
                    kind,
                    id
                );
                assert!(id.chars().next().unwrap().is_ascii_alphabetic());
            }
        }
    }

    #[test]
    fn test_topology_styles_interfaces() {
        let network = parse(SAMPLE_CONFIG).unwrap();
        let markup = generate(DiagramKind::Topology, &network);
        assert!(markup.contains("    ex3300_1[\"ex3300-1\"]"));
        assert!(markup.contains("    ex3300_1 --> ex3300_1_ge_0_0_0"));
        assert!(markup.contains("class ex3300_1_ge_0_0_0 vlanInterface"));
        assert!(markup.contains("class ex3300_1_vlan ipInterface"));
        assert!(markup.contains("class ex3300_1_ge_0_0_2 interface"));
    }

    /// Six ports; only ge-0/0/0 and ge-0/0/5 carry an address
    pub(crate) fn six_port_network() -> Network {
        let mut config = String::from("interfaces {\n");
        for port in 0..6 {
            if port == 0 || port == 5 {
                config.push_str(&format!(
                    "ge-0/0/{p} {{ unit 0 {{ family inet {{ address 10.0.{p}.1/24; }} }} }}\n",
                    p = port
                ));
            } else {
                config.push_str(&format!("ge-0/0/{} {{ unit 0; }}\n", port));
            }
        }
        config.push('}');
        parse(&config).unwrap()
    }

    #[test]
    fn test_overview_looks_at_first_five_interfaces() {
        let network = six_port_network();
        assert_eq!(network.devices[0].interfaces.len(), 6);
        let markup = generate(DiagramKind::Overview, &network);
        assert!(markup.contains("unknown_ge_0_0_0[\"ge-0/0/0<br/>10.0.0.1/24\"]"));
        assert!(!markup.contains("ge_0_0_5"));
        assert!(!markup.contains("ge_0_0_1"));
    }

    #[test]
    fn test_route_ids_restart_per_build() {
        let network = parse(SAMPLE_CONFIG).unwrap();
        let first = generate(DiagramKind::Routing, &network);
        let second = generate(DiagramKind::Routing, &network);
        assert_eq!(first, second);
        assert!(first.contains("ex3300_1_route_0[\"0.0.0.0/0<br/>via 192.168.254.254\"]"));
        assert!(first.contains("ex3300_1 -.-> ex3300_1_route_1"));
    }

    #[test]
    fn test_vlan_diagram_lists_resolved_members() {
        let network = parse(SAMPLE_CONFIG).unwrap();
        let markup = generate(DiagramKind::Vlans, &network);
        assert!(markup.contains("ex3300_1_vlan_200[\"VLAN 200<br/>newlab200<br/>vlan 200 for the lab\"]"));
        assert!(markup.contains("ex3300_1_vlan_200 --> ex3300_1_vlan_200_ge_0_0_1"));
        assert!(markup.contains("ex3300_1_vlan_200_ge_0_0_1[\"ge-0/0/1<br/>lab server\"]"));
    }

    #[test]
    fn test_interface_groups() {
        let network = parse(SAMPLE_CONFIG).unwrap();
        let markup = generate(DiagramKind::Interfaces, &network);
        assert!(markup.contains("ex3300_1_ge[\"GE Interfaces\"]"));
        assert!(markup.contains("ex3300_1_other[\"OTHER Interfaces\"]"));
        assert!(markup.contains("Mode: trunk"));
    }

    #[test]
    fn test_label_quotes_are_escaped() {
        let mut network = parse("").unwrap();
        network.devices[0].hostname = "sw\"1".to_string();
        let markup = generate(DiagramKind::Routing, &network);
        assert!(markup.contains("sw_1[\"sw#quot;1\"]"));
    }
}
