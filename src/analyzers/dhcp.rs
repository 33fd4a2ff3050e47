//! DHCP section analyzer: identity by interface key, reservations by MAC.

use super::change;
use crate::change::{Change, ChangeKind, Impact, Section};
use crate::model::{DhcpReservation, DhcpScope};
use std::collections::{BTreeMap, BTreeSet};

pub(crate) fn analyze(old: &[DhcpScope], new: &[DhcpScope]) -> Vec<Change> {
    let old_by_if: BTreeMap<&str, &DhcpScope> =
        old.iter().map(|s| (s.interface.as_str(), s)).collect();
    let new_by_if: BTreeMap<&str, &DhcpScope> =
        new.iter().map(|s| (s.interface.as_str(), s)).collect();
    let interfaces: BTreeSet<&str> = old_by_if.keys().chain(new_by_if.keys()).copied().collect();

    let mut changes = Vec::new();
    for iface in interfaces {
        match (old_by_if.get(iface), new_by_if.get(iface)) {
            (Some(o), Some(n)) => changes.extend(modified(iface, o, n)),
            (Some(o), None) => changes.push(removed(iface, o)),
            (None, Some(n)) => changes.push(added(iface, n)),
            (None, None) => unreachable!("interface drawn from the union of both maps"),
        }
    }
    changes
}

fn modified(iface: &str, old: &DhcpScope, new: &DhcpScope) -> Vec<Change> {
    let mut changes = Vec::new();
    let mut field = |suffix: &str, old_v: String, new_v: String| {
        if old_v != new_v {
            let path = Change::dotted(&["dhcp", iface, suffix]);
            changes.push(change(
                ChangeKind::Modified,
                Section::Dhcp,
                path.clone(),
                format!("{path} changed"),
                Some(old_v),
                Some(new_v),
                Impact::Unset,
            ));
        }
    };

    field(
        "enable",
        old.enabled.to_string(),
        new.enabled.to_string(),
    );
    field("range.from", old.range.from.clone(), new.range.from.clone());
    field("range.to", old.range.to.clone(), new.range.to.clone());
    field(
        "ddns-key",
        old.ddns_key.clone().unwrap_or_default(),
        new.ddns_key.clone().unwrap_or_default(),
    );

    changes.extend(reservations(iface, &old.reservations, &new.reservations));
    changes
}

fn reservations(iface: &str, old: &[DhcpReservation], new: &[DhcpReservation]) -> Vec<Change> {
    let old_by_mac: BTreeMap<&str, &DhcpReservation> =
        old.iter().map(|r| (r.mac.as_str(), r)).collect();
    let new_by_mac: BTreeMap<&str, &DhcpReservation> =
        new.iter().map(|r| (r.mac.as_str(), r)).collect();
    let macs: BTreeSet<&str> = old_by_mac.keys().chain(new_by_mac.keys()).copied().collect();

    let mut changes = Vec::new();
    for mac in macs {
        let path = Change::dotted(&["dhcp", iface, "reservations", mac]);
        match (old_by_mac.get(mac), new_by_mac.get(mac)) {
            (Some(o), Some(n)) => {
                if o != n {
                    changes.push(change(
                        ChangeKind::Modified,
                        Section::Dhcp,
                        path,
                        format!("DHCP reservation {mac} on {iface} modified"),
                        Some(format!("{}/{}", o.ip, o.hostname)),
                        Some(format!("{}/{}", n.ip, n.hostname)),
                        Impact::Unset,
                    ));
                }
            }
            (Some(o), None) => changes.push(change(
                ChangeKind::Removed,
                Section::Dhcp,
                path,
                format!("DHCP reservation {mac} on {iface} removed"),
                Some(format!("{}/{}", o.ip, o.hostname)),
                None,
                Impact::Unset,
            )),
            (None, Some(n)) => changes.push(change(
                ChangeKind::Added,
                Section::Dhcp,
                path,
                format!("DHCP reservation {mac} on {iface} added"),
                None,
                Some(format!("{}/{}", n.ip, n.hostname)),
                Impact::Unset,
            )),
            (None, None) => unreachable!("mac drawn from the union of both maps"),
        }
    }
    changes
}

fn removed(iface: &str, old: &DhcpScope) -> Change {
    change(
        ChangeKind::Removed,
        Section::Dhcp,
        Change::dotted(&["dhcp", iface]),
        format!("DHCP scope on {iface} removed"),
        Some(old.range.from.clone()),
        None,
        Impact::Unset,
    )
}

fn added(iface: &str, new: &DhcpScope) -> Change {
    change(
        ChangeKind::Added,
        Section::Dhcp,
        Change::dotted(&["dhcp", iface]),
        format!("DHCP scope on {iface} added"),
        None,
        Some(new.range.from.clone()),
        Impact::Unset,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DhcpRange;

    fn scope(iface: &str) -> DhcpScope {
        DhcpScope {
            interface: iface.to_string(),
            enabled: true,
            range: DhcpRange {
                from: "192.168.1.100".to_string(),
                to: "192.168.1.200".to_string(),
            },
            reservations: vec![],
            ddns_key: None,
        }
    }

    #[test]
    fn range_change_is_detected() {
        let old = vec![scope("lan")];
        let mut new = old.clone();
        new[0].range.to = "192.168.1.250".to_string();
        let changes = analyze(&old, &new);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].path, "dhcp.lan.range.to");
    }

    #[test]
    fn reservation_added_by_mac() {
        let old = vec![scope("lan")];
        let mut new = old.clone();
        new[0].reservations.push(DhcpReservation {
            mac: "aa:bb:cc:dd:ee:ff".to_string(),
            ip: "192.168.1.50".to_string(),
            hostname: "printer".to_string(),
            description: String::new(),
        });
        let changes = analyze(&old, &new);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind, ChangeKind::Added);
        assert!(changes[0].path.contains("aa:bb:cc:dd:ee:ff"));
    }
}
