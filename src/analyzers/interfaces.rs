//! Interfaces section analyzer: identity by name, sorted-name ordering.

use super::change;
use crate::change::{Change, ChangeKind, Impact, Section};
use crate::model::Interface;
use crate::normalize::canonicalize_bare_ip;
use std::collections::{BTreeMap, BTreeSet};

pub(crate) fn analyze(
    old: &BTreeMap<String, Interface>,
    new: &BTreeMap<String, Interface>,
    normalize_display: bool,
) -> Vec<Change> {
    let names: BTreeSet<&String> = old.keys().chain(new.keys()).collect();
    let mut changes = Vec::new();

    for name in names {
        match (old.get(name), new.get(name)) {
            (Some(o), Some(n)) => changes.extend(modified(name, o, n, normalize_display)),
            (Some(o), None) => changes.push(removed(name, o)),
            (None, Some(n)) => changes.push(added(name, n)),
            (None, None) => unreachable!("name drawn from the union of both maps"),
        }
    }

    changes
}

fn display_address(raw: String, normalize_display: bool) -> String {
    if !normalize_display || raw.is_empty() {
        return raw;
    }
    canonicalize_bare_ip(&raw).unwrap_or(raw)
}

fn modified(name: &str, old: &Interface, new: &Interface, normalize_display: bool) -> Vec<Change> {
    let mut changes = Vec::new();
    let mut field = |suffix: &str, old_v: String, new_v: String, impact: Impact| {
        if old_v != new_v {
            let path = Change::dotted(&["interfaces", name, suffix]);
            changes.push(change(
                ChangeKind::Modified,
                Section::Interfaces,
                path.clone(),
                format!("{path} changed"),
                Some(old_v),
                Some(new_v),
                impact,
            ));
        }
    };
    // Address-bearing fields detect changes on the raw value but, per
    // `normalize_display`, emit canonicalized old/new strings.
    let mut address_field = |suffix: &str, old_v: String, new_v: String, impact: Impact| {
        if old_v != new_v {
            let path = Change::dotted(&["interfaces", name, suffix]);
            changes.push(change(
                ChangeKind::Modified,
                Section::Interfaces,
                path.clone(),
                format!("{path} changed"),
                Some(display_address(old_v, normalize_display)),
                Some(display_address(new_v, normalize_display)),
                impact,
            ));
        }
    };

    field(
        "enable",
        old.enabled.to_string(),
        new.enabled.to_string(),
        Impact::Unset,
    );
    field(
        "physical-if",
        old.physical_if.clone(),
        new.physical_if.clone(),
        Impact::Unset,
    );
    field(
        "type",
        old.if_type.clone(),
        new.if_type.clone(),
        Impact::Unset,
    );
    address_field(
        "ipAddress",
        old.ipv4_address.clone().unwrap_or_default(),
        new.ipv4_address.clone().unwrap_or_default(),
        Impact::Unset,
    );
    field(
        "subnetPrefix",
        old.subnet_prefix.map_or_else(String::new, |p| p.to_string()),
        new.subnet_prefix.map_or_else(String::new, |p| p.to_string()),
        Impact::Unset,
    );
    address_field(
        "ipv6Address",
        old.ipv6_address.clone().unwrap_or_default(),
        new.ipv6_address.clone().unwrap_or_default(),
        Impact::Unset,
    );
    field(
        "description",
        old.description.clone(),
        new.description.clone(),
        Impact::Unset,
    );
    field(
        "gateway",
        old.gateway.clone().unwrap_or_default(),
        new.gateway.clone().unwrap_or_default(),
        Impact::Unset,
    );
    field(
        "block-private",
        old.block_private.to_string(),
        new.block_private.to_string(),
        Impact::Unset,
    );
    field(
        "block-bogons",
        old.block_bogons.to_string(),
        new.block_bogons.to_string(),
        Impact::Unset,
    );

    changes
}

fn removed(name: &str, old: &Interface) -> Change {
    let path = Change::dotted(&["interfaces", name]);
    change(
        ChangeKind::Removed,
        Section::Interfaces,
        path,
        format!("interface {name} removed"),
        Some(old.physical_if.clone()),
        None,
        Impact::Unset,
    )
}

fn added(name: &str, new: &Interface) -> Change {
    let path = Change::dotted(&["interfaces", name]);
    change(
        ChangeKind::Added,
        Section::Interfaces,
        path,
        format!("interface {name} added"),
        None,
        Some(new.physical_if.clone()),
        Impact::Unset,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iface(physical_if: &str) -> Interface {
        Interface {
            name: "lan".to_string(),
            physical_if: physical_if.to_string(),
            enabled: true,
            if_type: "staticv4".to_string(),
            ipv4_address: Some("192.168.1.1".to_string()),
            subnet_prefix: Some(24),
            ipv6_address: None,
            description: String::new(),
            gateway: None,
            block_private: false,
            block_bogons: false,
        }
    }

    #[test]
    fn enable_change_path_matches_risk_pattern_suffix() {
        let mut old = BTreeMap::new();
        old.insert("lan".to_string(), iface("igb0"));
        let mut new = old.clone();
        new.get_mut("lan").unwrap().enabled = false;
        let changes = analyze(&old, &new, false);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].path, "interfaces.lan.enable");
    }

    #[test]
    fn ip_address_change_path_matches_spec_example() {
        let mut old = BTreeMap::new();
        old.insert("lan".to_string(), iface("igb0"));
        let mut new = old.clone();
        new.get_mut("lan").unwrap().ipv4_address = Some("192.168.2.1".to_string());
        let changes = analyze(&old, &new, false);
        assert_eq!(changes[0].path, "interfaces.lan.ipAddress");
    }

    #[test]
    fn normalize_display_canonicalizes_ip_address_values() {
        let mut old = BTreeMap::new();
        old.insert("wan".to_string(), {
            let mut i = iface("igb0");
            i.ipv4_address = Some("010.000.001.001".to_string());
            i
        });
        let mut new = old.clone();
        new.get_mut("wan").unwrap().ipv4_address = Some("010.000.001.002".to_string());
        let changes = analyze(&old, &new, true);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].old_value.as_deref(), Some("10.0.1.1"));
        assert_eq!(changes[0].new_value.as_deref(), Some("10.0.1.2"));
    }

    #[test]
    fn added_and_removed_interfaces_detected() {
        let mut old = BTreeMap::new();
        old.insert("lan".to_string(), iface("igb0"));
        let mut new = BTreeMap::new();
        new.insert("opt1".to_string(), iface("igb1"));
        let changes = analyze(&old, &new, false);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].kind, ChangeKind::Removed);
        assert_eq!(changes[0].path, "interfaces.lan");
        assert_eq!(changes[1].kind, ChangeKind::Added);
        assert_eq!(changes[1].path, "interfaces.opt1");
    }
}
