//! Junos-style configuration parser.
//!
//! `parse` turns configuration text into a [`Network`] holding a single
//! [`Device`]: text → block tree → field extraction → VLAN cross-references →
//! assembled model. The only hard failure is unterminated brace nesting.

pub mod blocks;
pub mod fields;
pub mod resolve;

use crate::models::{Device, Interface, Network, Route, Routing, Vlan};

/// Parse failure. Everything except broken nesting degrades to defaults instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A block was opened but the input ended before its closing brace
    MalformedBlock {
        name: String,
        offset: usize,
        line: usize,
    },
}

impl ParseError {
    pub(crate) fn malformed_block(src: &str, name: &str, offset: usize) -> Self {
        let line = src[..offset].bytes().filter(|b| *b == b'\n').count() + 1;
        ParseError::MalformedBlock {
            name: name.to_string(),
            offset,
            line,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::MalformedBlock { name, line, .. } if name.is_empty() => {
                write!(f, "malformed block: unterminated '{{' at line {}", line)
            }
            ParseError::MalformedBlock { name, line, .. } => {
                write!(f, "malformed block: '{}' opened at line {} is never closed", name, line)
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse one device configuration into a Network with exactly one Device
pub fn parse(text: &str) -> Result<Network, ParseError> {
    let tree = blocks::build_tree(text)?;

    let hostname = fields::hostname(text);

    let interfaces: Vec<Interface> = blocks::find_outermost_blocks(&tree, fields::is_interface_header)
        .into_iter()
        .map(|block| fields::interface(block, text))
        .collect();

    let routes = fields::static_routes(text, &tree);

    let mut vlans: Vec<Vlan> = blocks::find_blocks(&tree, fields::is_bare_identifier)
        .into_iter()
        .filter_map(|block| fields::vlan(block, text))
        .collect();

    for dangling in resolve::resolve_memberships(&interfaces, &mut vlans) {
        tracing::debug!(
            "Dropping VLAN member '{}' on {}: no VLAN with that name or id",
            dangling.token,
            dangling.interface
        );
    }

    Ok(assemble(hostname, interfaces, routes, vlans))
}

/// Wrap one device's parts into a single-device Network
pub fn assemble(
    hostname: String,
    interfaces: Vec<Interface>,
    routes: Vec<Route>,
    vlans: Vec<Vlan>,
) -> Network {
    let device = Device {
        hostname,
        interfaces,
        routing: Some(Routing { routes, vlans }),
    };
    Network {
        devices: vec![device],
        connections: Some(Vec::new()),
        topology: None,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::InterfaceStatus;
    use tokio_test::{assert_err, assert_ok};

    /// EX-series style switch configuration used across the test suite
    pub(crate) const SAMPLE_CONFIG: &str = r#"
## Last commit: 2024-03-01 10:00:00 UTC by admin
version 12.3R12.4;
system {
    host-name ex3300-1;
    root-authentication {
        encrypted-password "$1$abc"; ## SECRET-DATA
    }
}
interfaces {
    ge-0/0/0 {
        description "uplink to core";
        unit 0 {
            family ethernet-switching {
                port-mode trunk;
                vlan {
                    members [ newlab200 oob ];
                }
            }
        }
    }
    ge-0/0/1 {
        description "lab server";
        unit 0 {
            family ethernet-switching {
                vlan {
                    members 200;
                }
            }
        }
    }
    ge-0/0/2 {
        disable;
        unit 0 {
            family ethernet-switching;
        }
    }
    ge-0/0/3 {
        unit 0 {
            family ethernet-switching {
                vlan {
                    members voice;
                }
            }
        }
    }
    me0 {
        unit 0 {
            family inet {
                address 10.10.10.2/24;
            }
        }
    }
    vlan {
        unit 200 {
            family inet {
                address 192.168.200.1/24;
            }
        }
    }
}
routing-options {
    static {
        route 0.0.0.0/0 next-hop 192.168.254.254;
        route 10.0.0.0/8 next-hop 192.168.200.254;
    }
}
vlans {
    newlab200 {
        description "vlan 200 for the lab";
        vlan-id 200;
        l3-interface vlan.200;
    }
    oob {
        vlan-id 10;
        description "out of band";
    }
    default;
}
"#;

    fn device(network: &Network) -> &Device {
        assert_eq!(network.devices.len(), 1);
        &network.devices[0]
    }

    #[test]
    fn test_empty_input() {
        let network = assert_ok!(parse(""));
        let dev = device(&network);
        assert_eq!(dev.hostname, "unknown");
        assert!(dev.interfaces.is_empty());
        assert!(dev.routes().is_empty());
        assert!(dev.vlans().is_empty());
        assert_eq!(network.connections, Some(Vec::new()));
        assert_eq!(network.topology, None);
    }

    #[test]
    fn test_hostname_anywhere() {
        let network = assert_ok!(parse("interfaces { } host-name foo;"));
        assert_eq!(device(&network).hostname, "foo");
    }

    #[test]
    fn test_nested_interface_address() {
        let network = assert_ok!(parse(
            "interfaces { ge-0/0/0 { unit 0 { family inet { address 192.168.1.1/24; } } } }"
        ));
        let dev = device(&network);
        assert_eq!(dev.interfaces.len(), 1);
        assert_eq!(dev.interfaces[0].name, "ge-0/0/0");
        assert_eq!(dev.interfaces[0].ip.as_deref(), Some("192.168.1.1/24"));
    }

    #[test]
    fn test_vlan_resolved_by_numeric_id() {
        let config = r#"
            interfaces { ge-0/0/1 { unit 0 { family ethernet-switching { vlan { members 200; } } } } }
            vlans { newlab200 { description "vlan 200 for the lab"; vlan-id 200; } }
        "#;
        let network = assert_ok!(parse(config));
        let dev = device(&network);
        let vlan = &dev.vlans()[0];
        assert_eq!(vlan.name, "newlab200");
        assert_eq!(vlan.vlan_id, 200);
        assert_eq!(vlan.interfaces, vec!["ge-0/0/1"]);
        // Raw token is kept as authored.
        assert_eq!(dev.interfaces[0].vlan_members, vec!["200"]);
    }

    #[test]
    fn test_static_route() {
        let network = assert_ok!(parse("route 0.0.0.0/0 next-hop 192.168.254.254;"));
        let routes = device(&network).routes();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].destination, "0.0.0.0/0");
        assert_eq!(routes[0].next_hop, "192.168.254.254");
        assert_eq!(routes[0].protocol, "static");
    }

    #[test]
    fn test_unterminated_interface_fails() {
        let err = assert_err!(parse(
            "interfaces { ge-0/0/0 { unit 0 { family inet { address 10.0.0.1/24; } }"
        ));
        assert!(matches!(err, ParseError::MalformedBlock { .. }));
        assert!(err.to_string().contains("never closed"));
    }

    #[test]
    fn test_sample_config() {
        let network = assert_ok!(parse(SAMPLE_CONFIG));
        let dev = device(&network);
        assert_eq!(dev.hostname, "ex3300-1");

        // me0 does not have the interface shape; the nested `vlan` members blocks
        // must not show up as interfaces of their own.
        let names: Vec<&str> = dev.interfaces.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["ge-0/0/0", "ge-0/0/1", "ge-0/0/2", "ge-0/0/3", "vlan"]);

        let uplink = dev.interface("ge-0/0/0").unwrap();
        assert_eq!(uplink.description.as_deref(), Some("uplink to core"));
        assert_eq!(uplink.port_mode.as_deref(), Some("trunk"));
        assert_eq!(uplink.vlan_members, vec!["newlab200", "oob"]);

        assert_eq!(dev.interface("ge-0/0/2").unwrap().status, InterfaceStatus::Disabled);
        assert_eq!(dev.interface("ge-0/0/1").unwrap().status, InterfaceStatus::Enabled);
        assert_eq!(dev.interface("vlan").unwrap().ip.as_deref(), Some("192.168.200.1/24"));

        assert_eq!(dev.routes().len(), 2);
        assert_eq!(dev.routes()[1].next_hop, "192.168.200.254");

        let vlans = dev.vlans();
        assert_eq!(vlans.len(), 2);
        assert_eq!(vlans[0].name, "newlab200");
        assert_eq!(vlans[0].interfaces, vec!["ge-0/0/0", "ge-0/0/1"]);
        assert_eq!(vlans[1].name, "oob");
        assert_eq!(vlans[1].vlan_id, 10);
        assert_eq!(vlans[1].interfaces, vec!["ge-0/0/0"]);
    }

    #[test]
    fn test_membership_under_aggregate_and_range_is_not_an_interface() {
        let config = r#"
interfaces {
    ae0 {
        unit 0 {
            family ethernet-switching {
                vlan {
                    members data;
                }
            }
        }
    }
    interface-range access {
        member ge-0/0/10;
        unit 0 {
            family ethernet-switching {
                vlan {
                    members 100;
                }
            }
        }
    }
    ge-0/0/1 {
        unit 0 {
            family ethernet-switching {
                vlan {
                    members data;
                }
            }
        }
    }
    vlan {
        unit 100 {
            family inet {
                address 10.1.100.1/24;
            }
        }
    }
}
"#;
        let network = assert_ok!(parse(config));
        let dev = device(&network);
        let found: Vec<(&str, Vec<String>)> = dev
            .interfaces
            .iter()
            .map(|i| (i.name.as_str(), i.vlan_members.clone()))
            .collect();
        assert_eq!(
            found,
            vec![
                ("ge-0/0/1", vec!["data".to_string()]),
                ("vlan", Vec::new()),
            ]
        );
        assert_eq!(dev.interface("vlan").unwrap().ip.as_deref(), Some("10.1.100.1/24"));
    }

    #[test]
    fn test_braces_inside_quotes_do_not_nest() {
        let network = assert_ok!(parse(
            r#"interfaces { ge-0/0/0 { description "to {core"; } ge-0/0/1 { description "}"; } }"#
        ));
        let dev = device(&network);
        assert_eq!(dev.interfaces.len(), 2);
        assert_eq!(dev.interfaces[0].description.as_deref(), Some("to {core"));
        assert_eq!(dev.interfaces[1].description.as_deref(), Some("}"));
    }

    #[test]
    fn test_parse_is_deterministic() {
        assert_eq!(parse(SAMPLE_CONFIG).unwrap(), parse(SAMPLE_CONFIG).unwrap());
    }

    #[test]
    fn test_membership_consistency() {
        let network = parse(SAMPLE_CONFIG).unwrap();
        let dev = device(&network);
        let index = resolve::VlanIndex::build(dev.vlans());
        for iface in &dev.interfaces {
            for token in &iface.vlan_members {
                if let Some(idx) = index.resolve(token) {
                    assert!(dev.vlans()[idx].interfaces.contains(&iface.name));
                }
            }
        }
    }
}
