//! Graphviz DOT sources for each diagram variant, rendered to images by
//! [`super::render`].

use std::collections::HashSet;
use std::fmt::Write;

use super::mermaid::group_by_family;
use super::{BuildContext, DiagramKind};
use crate::models::{Device, Interface, Network};

/// Layout attributes per variant: wide left-to-right layouts for the busy
/// interface and VLAN views, top-to-bottom otherwise
fn graph_attrs(kind: DiagramKind) -> Vec<(&'static str, &'static str)> {
    let (rankdir, nodesep, ranksep) = match kind {
        DiagramKind::Interfaces => ("LR", "0.2", "0.4"),
        DiagramKind::Vlans => ("LR", "0.4", "0.8"),
        _ => ("TB", "0.3", "0.5"),
    };
    vec![
        ("rankdir", rankdir),
        ("fontsize", "10"),
        ("nodesep", nodesep),
        ("ranksep", ranksep),
        ("splines", "ortho"),
        ("concentrate", "true"),
        ("labelloc", "t"),
    ]
}

/// DOT source for one diagram variant. Every call is an independent build.
pub fn generate(kind: DiagramKind, network: &Network) -> String {
    let mut dot = Dot::new(kind);
    for device in &network.devices {
        match kind {
            DiagramKind::Topology => topology(&mut dot, device),
            DiagramKind::Interfaces => interfaces(&mut dot, device),
            DiagramKind::Vlans => vlans(&mut dot, device),
            DiagramKind::Routing => routing(&mut dot, device),
            DiagramKind::Overview => overview(&mut dot, device),
        }
    }
    dot.finish()
}

struct Dot {
    out: String,
    depth: usize,
    ctx: BuildContext,
}

impl Dot {
    fn new(kind: DiagramKind) -> Self {
        let mut out = String::from("digraph G {\n");
        let _ = writeln!(out, "    label=\"{}\";", escape(kind.title()));
        for (key, value) in graph_attrs(kind) {
            let _ = writeln!(out, "    {}=\"{}\";", key, value);
        }
        out.push_str("    node [fontsize=\"10\"];\n");
        Self {
            out,
            depth: 1,
            ctx: BuildContext::new(),
        }
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str("    ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    /// Emit a node and return its generated id
    fn node(&mut self, label: &str, attrs: &str) -> String {
        let id = format!("n{}", self.ctx.next_id());
        let line = if attrs.is_empty() {
            format!("{} [label=\"{}\"];", id, escape(label))
        } else {
            format!("{} [label=\"{}\", {}];", id, escape(label), attrs)
        };
        self.line(&line);
        id
    }

    fn edge(&mut self, from: &str, to: &str) {
        self.line(&format!("{} -> {};", from, to));
    }

    fn open_cluster(&mut self, label: &str) {
        let id = self.ctx.next_id();
        self.line(&format!("subgraph cluster_{} {{", id));
        self.depth += 1;
        self.line(&format!("label=\"{}\";", escape(label)));
    }

    fn close_cluster(&mut self) {
        self.depth -= 1;
        self.line("}");
    }

    fn finish(mut self) -> String {
        self.out.push_str("}\n");
        self.out
    }
}

const DEVICE_ATTRS: &str = "shape=box3d, style=filled, fillcolor=\"#e1f5fe\"";
const INTERFACE_ATTRS: &str = "shape=box";
const VLAN_ATTRS: &str = "shape=folder, style=filled, fillcolor=\"#e8f5e8\"";
const UNTAGGED_ATTRS: &str = "shape=folder, style=filled, fillcolor=lightsteelblue";

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

fn interface_label(iface: &Interface) -> String {
    let mut parts = vec![iface.name.as_str()];
    parts.extend(iface.ip.as_deref());
    parts.extend(iface.description.as_deref());
    parts.join("\n")
}

fn topology(dot: &mut Dot, device: &Device) {
    dot.open_cluster(&format!("Device: {}", device.hostname));
    let device_id = dot.node(&device.hostname, DEVICE_ATTRS);
    for iface in &device.interfaces {
        let iface_id = dot.node(&interface_label(iface), INTERFACE_ATTRS);
        dot.edge(&device_id, &iface_id);
    }
    dot.close_cluster();
}

fn interfaces(dot: &mut Dot, device: &Device) {
    dot.open_cluster(&format!("Device: {}", device.hostname));
    for (family, mut members) in group_by_family(&device.interfaces) {
        members.sort_by_key(|iface| iface.port_number());
        dot.open_cluster(&format!("{} Interfaces", family.to_uppercase()));
        for iface in members {
            dot.node(&interface_label(iface), INTERFACE_ATTRS);
        }
        dot.close_cluster();
    }
    dot.close_cluster();
}

fn vlans(dot: &mut Dot, device: &Device) {
    dot.open_cluster(&format!("Device: {}", device.hostname));

    let mut tagged: HashSet<&str> = HashSet::new();
    for vlan in device.vlans() {
        let mut label = format!("VLAN {}\n{}", vlan.vlan_id, vlan.name);
        if let Some(desc) = &vlan.description {
            label.push('\n');
            label.push_str(desc);
        }
        let vlan_id = dot.node(&label, VLAN_ATTRS);

        if vlan.interfaces.is_empty() {
            continue;
        }
        dot.open_cluster(&format!("{} Interfaces", vlan.name));
        for name in &vlan.interfaces {
            tagged.insert(name.as_str());
            let label = match device.interface(name) {
                Some(iface) => interface_label(iface),
                None => name.clone(),
            };
            let iface_id = dot.node(&label, INTERFACE_ATTRS);
            dot.edge(&vlan_id, &iface_id);
        }
        dot.close_cluster();
    }

    let untagged: Vec<&Interface> = device
        .interfaces
        .iter()
        .filter(|iface| !tagged.contains(iface.name.as_str()))
        .collect();
    if !untagged.is_empty() {
        dot.open_cluster("Untagged Ports (Default VLAN)");
        let default_id = dot.node("Default VLAN\n(Untagged)", UNTAGGED_ATTRS);
        for iface in untagged {
            let iface_id = dot.node(&interface_label(iface), INTERFACE_ATTRS);
            dot.edge(&default_id, &iface_id);
        }
        dot.close_cluster();
    }

    dot.close_cluster();
}

fn routing(dot: &mut Dot, device: &Device) {
    dot.open_cluster(&format!("Device: {}", device.hostname));
    let device_id = dot.node(&device.hostname, DEVICE_ATTRS);
    for route in device.routes() {
        let label = format!("{}\nvia {}", route.destination, route.next_hop);
        let route_id = dot.node(&label, INTERFACE_ATTRS);
        dot.edge(&device_id, &route_id);
    }
    dot.close_cluster();
}

fn overview(dot: &mut Dot, device: &Device) {
    dot.open_cluster(&format!("Device: {}", device.hostname));
    let device_id = dot.node(&device.hostname, DEVICE_ATTRS);
    for iface in device.interfaces.iter().filter(|i| i.ip.is_some()).take(5) {
        let iface_id = dot.node(&interface_label(iface), INTERFACE_ATTRS);
        dot.edge(&device_id, &iface_id);
    }
    for vlan in device.vlans() {
        let vlan_id = dot.node(&format!("VLAN {}\n{}", vlan.vlan_id, vlan.name), VLAN_ATTRS);
        dot.edge(&device_id, &vlan_id);
    }
    dot.close_cluster();
}
