//! Field extractors.
//!
//! Each extractor looks for a single statement shape in a block body (or the
//! whole document) and falls back to a default when it is absent. None of them
//! can fail.

use std::sync::LazyLock;

use regex_lite::Regex;

use super::blocks::Block;
use crate::models::{Interface, InterfaceStatus, Route, Vlan};

// A statement starts at the beginning of the text or after whitespace, `{` or `;`.
static HOST_NAME: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?:^|[\s{;])host-name\s+([^\s;]+)\s*;").ok());
static DESCRIPTION: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"(?:^|[\s{;])description\s+"([^"]*)"\s*;"#).ok());
static INET_ADDRESS: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?:^|[\s{;])address\s+(\d{1,3}(?:\.\d{1,3}){3}/\d{1,2})\s*[;{]").ok()
});
static MEMBERS: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?:^|[\s{;])members\s+(?:\[([^\]]*)\]|([\w.-]+))\s*;").ok()
});
static PORT_MODE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?:^|[\s{;])(?:port|interface)-mode\s+([\w-]+)\s*;").ok());
static DISABLE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?:^|[\s{;])disable\s*;").ok());
static STATIC_ROUTE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?:^|[\s{;])route\s+(\d{1,3}(?:\.\d{1,3}){3}/\d{1,2})\s+next-hop\s+(\d{1,3}(?:\.\d{1,3}){3})\s*;",
    )
    .ok()
});
static ROUTE_BLOCK_NAME: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^route (\d{1,3}(?:\.\d{1,3}){3}/\d{1,2})$").ok());
static NEXT_HOP: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?:^|[\s{;])next-hop\s+(\d{1,3}(?:\.\d{1,3}){3})\s*;").ok()
});
static METRIC: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?:^|[\s{;])metric\s+(\d+)\s*;").ok());
static VLAN_ID: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?:^|[\s{;])vlan-id\s+(\d+)\s*;").ok());
static PORT_NAME: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\w+-\d+/\d+/\d+$").ok());
static BARE_IDENTIFIER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.-]*$").ok());

fn first_capture(re: &LazyLock<Option<Regex>>, text: &str) -> Option<String> {
    let caps = re.as_ref()?.captures(text)?;
    caps.get(1).map(|m| m.as_str().to_string())
}

/// Block header of a physical port: `<word>-N/N/N`
pub fn is_port_name(name: &str) -> bool {
    PORT_NAME.as_ref().is_some_and(|re| re.is_match(name))
}

/// Block header of an interface: a physical port anywhere, or the routed-VLAN
/// interface `vlan` declared directly under `interfaces`. A `vlan { members ..; }`
/// block inside `ae0`, `irb` or `interface-range` is membership, not an interface.
pub fn is_interface_header(parent: Option<&str>, name: &str) -> bool {
    is_port_name(name) || (name == "vlan" && parent == Some("interfaces"))
}

/// Block header that could name a VLAN: one bare identifier
pub fn is_bare_identifier(name: &str) -> bool {
    BARE_IDENTIFIER.as_ref().is_some_and(|re| re.is_match(name))
}

/// `host-name <token>;` anywhere in the document, first match wins
pub fn hostname(doc: &str) -> String {
    first_capture(&HOST_NAME, doc).unwrap_or_else(|| "unknown".to_string())
}

/// `description "<text>";`, quoted text kept verbatim
pub fn description(body: &str) -> Option<String> {
    first_capture(&DESCRIPTION, body)
}

/// `port-mode <token>;` (or `interface-mode <token>;`)
pub fn port_mode(body: &str) -> Option<String> {
    first_capture(&PORT_MODE, body)
}

/// A `disable;` statement anywhere in the body disables the interface
pub fn status(body: &str) -> InterfaceStatus {
    match DISABLE.as_ref() {
        Some(re) if re.is_match(body) => InterfaceStatus::Disabled,
        _ => InterfaceStatus::Enabled,
    }
}

/// Address of the first `family inet` block nested in the interface
pub fn interface_ip(block: &Block, src: &str) -> Option<String> {
    block
        .descendants()
        .into_iter()
        .filter(|b| b.name == "family inet")
        .find_map(|b| first_capture(&INET_ADDRESS, b.body(src)))
}

/// Raw membership tokens of every `vlan { members ...; }` block in the interface
pub fn vlan_members(block: &Block, src: &str) -> Vec<String> {
    let Some(re) = MEMBERS.as_ref() else {
        return Vec::new();
    };

    let mut members = Vec::new();
    for vlan_block in block.descendants().into_iter().filter(|b| b.name == "vlan") {
        for caps in re.captures_iter(vlan_block.body(src)) {
            if let Some(list) = caps.get(1) {
                members.extend(list.as_str().split_whitespace().map(str::to_string));
            } else if let Some(single) = caps.get(2) {
                members.push(single.as_str().to_string());
            }
        }
    }
    members
}

/// Build an Interface from an interface block. VLAN membership stays unresolved.
pub fn interface(block: &Block, src: &str) -> Interface {
    let body = block.body(src);
    Interface {
        name: block.name.clone(),
        ip: interface_ip(block, src),
        description: description(body),
        status: status(body),
        vlan_members: vlan_members(block, src),
        port_mode: port_mode(body),
    }
}

/// Static routes in document order: `route <cidr> next-hop <ip>;` statements and
/// `route <cidr> { next-hop <ip>; metric <n>; }` blocks
pub fn static_routes(doc: &str, tree: &[Block]) -> Vec<Route> {
    let mut found: Vec<(usize, Route)> = Vec::new();

    if let Some(re) = STATIC_ROUTE.as_ref() {
        for caps in re.captures_iter(doc) {
            if let (Some(whole), Some(dest), Some(hop)) = (caps.get(0), caps.get(1), caps.get(2)) {
                found.push((whole.start(), Route::new_static(dest.as_str(), hop.as_str())));
            }
        }
    }

    for block in super::blocks::find_blocks(tree, |name| name.starts_with("route ")) {
        let Some(dest) = first_capture(&ROUTE_BLOCK_NAME, &block.name) else {
            continue;
        };
        let own = block.own_statements(doc);
        let Some(hop) = first_capture(&NEXT_HOP, &own) else {
            continue;
        };
        let mut route = Route::new_static(&dest, &hop);
        route.metric = first_capture(&METRIC, &own).and_then(|m| m.parse().ok());
        found.push((block.open, route));
    }

    found.sort_by_key(|(offset, _)| *offset);
    found.into_iter().map(|(_, route)| route).collect()
}

/// A VLAN from a block whose own statements carry both `description` and
/// `vlan-id`, in any order. Anything less yields no VLAN.
pub fn vlan(block: &Block, src: &str) -> Option<Vlan> {
    if !is_bare_identifier(&block.name) {
        return None;
    }
    let own = block.own_statements(src);
    let description = description(&own)?;
    let vlan_id = first_capture(&VLAN_ID, &own)?.parse::<u32>().ok()?;
    Some(Vlan {
        name: block.name.clone(),
        vlan_id,
        description: Some(description),
        interfaces: Vec::new(),
    })
}
