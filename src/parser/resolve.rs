use std::collections::HashMap;

use crate::models::{Interface, Vlan};

/// A membership token that matched neither a VLAN name nor a VLAN id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    pub interface: String,
    pub token: String,
}

/// Name and id lookups over one device's VLANs, built once per parse.
/// With duplicate names or ids the first VLAN in document order wins.
pub struct VlanIndex {
    by_name: HashMap<String, usize>,
    by_id: HashMap<u32, usize>,
}

impl VlanIndex {
    pub fn build(vlans: &[Vlan]) -> Self {
        let mut by_name = HashMap::with_capacity(vlans.len());
        let mut by_id = HashMap::with_capacity(vlans.len());
        for (idx, vlan) in vlans.iter().enumerate() {
            by_name.entry(vlan.name.clone()).or_insert(idx);
            by_id.entry(vlan.vlan_id).or_insert(idx);
        }
        Self { by_name, by_id }
    }

    /// Name match first, then the token read as a decimal VLAN id
    pub fn resolve(&self, token: &str) -> Option<usize> {
        if let Some(idx) = self.by_name.get(token) {
            return Some(*idx);
        }
        token
            .parse::<u32>()
            .ok()
            .and_then(|id| self.by_id.get(&id).copied())
    }
}

/// Record every interface in the VLANs its membership tokens resolve to.
/// Unresolvable tokens are returned rather than stored anywhere in the model.
pub fn resolve_memberships(interfaces: &[Interface], vlans: &mut [Vlan]) -> Vec<DanglingReference> {
    let index = VlanIndex::build(vlans);
    let mut dangling = Vec::new();

    for iface in interfaces {
        for token in &iface.vlan_members {
            match index.resolve(token) {
                Some(idx) => {
                    let members = &mut vlans[idx].interfaces;
                    if !members.contains(&iface.name) {
                        members.push(iface.name.clone());
                    }
                }
                None => dangling.push(DanglingReference {
                    interface: iface.name.clone(),
                    token: token.clone(),
                }),
            }
        }
    }

    dangling
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vlan(name: &str, id: u32) -> Vlan {
        Vlan {
            name: name.to_string(),
            vlan_id: id,
            description: None,
            interfaces: Vec::new(),
        }
    }

    fn iface(name: &str, members: &[&str]) -> Interface {
        Interface {
            name: name.to_string(),
            vlan_members: members.iter().map(|m| m.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_resolves_by_name_and_by_id() {
        let mut vlans = vec![vlan("newlab200", 200), vlan("oob", 10)];
        let interfaces = vec![iface("ge-0/0/1", &["200"]), iface("ge-0/0/2", &["oob"])];
        let dangling = resolve_memberships(&interfaces, &mut vlans);
        assert!(dangling.is_empty());
        assert_eq!(vlans[0].interfaces, vec!["ge-0/0/1"]);
        assert_eq!(vlans[1].interfaces, vec!["ge-0/0/2"]);
    }

    #[test]
    fn test_name_match_takes_precedence_over_id() {
        // A VLAN literally named "10" beats the VLAN whose id is 10.
        let mut vlans = vec![vlan("oob", 10), vlan("10", 300)];
        let interfaces = vec![iface("ge-0/0/3", &["10"])];
        resolve_memberships(&interfaces, &mut vlans);
        assert!(vlans[0].interfaces.is_empty());
        assert_eq!(vlans[1].interfaces, vec!["ge-0/0/3"]);
    }

    #[test]
    fn test_dangling_tokens_are_dropped() {
        let mut vlans = vec![vlan("data", 100)];
        let interfaces = vec![iface("ge-0/0/4", &["voice", "999"])];
        let dangling = resolve_memberships(&interfaces, &mut vlans);
        assert_eq!(dangling.len(), 2);
        assert_eq!(dangling[0].token, "voice");
        assert!(vlans[0].interfaces.is_empty());
    }

    #[test]
    fn test_multiple_interfaces_share_a_vlan() {
        let mut vlans = vec![vlan("data", 100), vlan("unused", 5)];
        let interfaces = vec![
            iface("ge-0/0/1", &["data"]),
            iface("ge-0/0/2", &["100"]),
            iface("ge-0/0/3", &["data", "100"]),
        ];
        resolve_memberships(&interfaces, &mut vlans);
        assert_eq!(vlans[0].interfaces, vec!["ge-0/0/1", "ge-0/0/2", "ge-0/0/3"]);
        assert!(vlans[1].interfaces.is_empty());
    }

    #[test]
    fn test_duplicate_ids_resolve_to_first() {
        let mut vlans = vec![vlan("a", 50), vlan("b", 50)];
        let interfaces = vec![iface("ge-0/0/6", &["50"])];
        resolve_memberships(&interfaces, &mut vlans);
        assert_eq!(vlans[0].interfaces, vec!["ge-0/0/6"]);
        assert!(vlans[1].interfaces.is_empty());
    }
}
