//! Firewall section analyzer: UUID identity where present, positional
//! count-diff fallback otherwise, plus opt-in reorder detection and
//! display normalization.

use super::change;
use crate::change::{Change, ChangeKind, Impact, Section};
use crate::model::{Endpoint, FirewallRule};
use crate::normalize::canonicalize_address_str;
use std::collections::{BTreeMap, BTreeSet};

/// Options this analyzer consults, a subset of the engine's `CompareOptions`.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct FirewallOptions {
    pub detect_order: bool,
    pub normalize_display: bool,
}

pub(crate) fn analyze(
    old: &[FirewallRule],
    new: &[FirewallRule],
    options: FirewallOptions,
) -> Vec<Change> {
    let old_by_uuid: BTreeMap<&str, &FirewallRule> = old
        .iter()
        .filter_map(|r| r.uuid.as_deref().map(|u| (u, r)))
        .collect();
    let new_by_uuid: BTreeMap<&str, &FirewallRule> = new
        .iter()
        .filter_map(|r| r.uuid.as_deref().map(|u| (u, r)))
        .collect();

    let all_uuids: BTreeSet<&str> = old_by_uuid
        .keys()
        .chain(new_by_uuid.keys())
        .copied()
        .collect();

    let mut changes = Vec::new();
    let mut unchanged_uuids = Vec::new();

    for uuid in &all_uuids {
        match (old_by_uuid.get(uuid), new_by_uuid.get(uuid)) {
            (Some(o), Some(n)) => {
                if o == n {
                    unchanged_uuids.push(*uuid);
                } else {
                    changes.push(modified(uuid, o, n, options));
                }
            }
            (Some(o), None) => changes.push(removed(uuid, o, options)),
            (None, Some(n)) => changes.push(added(uuid, n, options)),
            (None, None) => unreachable!("uuid drawn from the union of both maps"),
        }
    }

    changes.extend(positional_count_diff(old, new));

    if options.detect_order {
        changes.extend(reorder_changes(old, new, &unchanged_uuids));
    }

    changes
}

fn render(rule: &FirewallRule, normalize_display: bool) -> String {
    format!(
        "{} {} {} {}->{} {}",
        rule.rule_type.as_str(),
        rule.protocol,
        rule.joined_interfaces(),
        render_endpoint(&rule.source, normalize_display),
        render_endpoint(&rule.destination, normalize_display),
        rule.description,
    )
}

fn render_endpoint(endpoint: &Endpoint, normalize_display: bool) -> String {
    let addr = endpoint.address.as_str();
    let addr = if normalize_display {
        canonicalize_address_str(addr).unwrap_or_else(|| addr.to_string())
    } else {
        addr.to_string()
    };
    format!("{addr}:{}", endpoint.port)
}

fn modified(uuid: &str, old: &FirewallRule, new: &FirewallRule, options: FirewallOptions) -> Change {
    let became_permissive = new.is_permissive() && !old.is_permissive();
    change(
        ChangeKind::Modified,
        Section::Firewall,
        Change::filter_rule_uuid_path(uuid),
        format!("firewall rule {uuid} modified"),
        Some(render(old, options.normalize_display)),
        Some(render(new, options.normalize_display)),
        if became_permissive {
            Impact::High
        } else {
            Impact::Unset
        },
    )
}

fn removed(uuid: &str, old: &FirewallRule, options: FirewallOptions) -> Change {
    change(
        ChangeKind::Removed,
        Section::Firewall,
        Change::filter_rule_uuid_path(uuid),
        format!("firewall rule {uuid} removed"),
        Some(render(old, options.normalize_display)),
        None,
        Impact::Medium,
    )
}

fn added(uuid: &str, new: &FirewallRule, options: FirewallOptions) -> Change {
    change(
        ChangeKind::Added,
        Section::Firewall,
        Change::filter_rule_uuid_path(uuid),
        format!("firewall rule {uuid} added"),
        None,
        Some(render(new, options.normalize_display)),
        if new.is_permissive() {
            Impact::High
        } else {
            Impact::Unset
        },
    )
}

/// UUID-less rules are matched by count only, per the design notes.
fn positional_count_diff(old: &[FirewallRule], new: &[FirewallRule]) -> Option<Change> {
    let old_count = old.iter().filter(|r| r.uuid.is_none()).count();
    let new_count = new.iter().filter(|r| r.uuid.is_none()).count();
    if old_count == new_count {
        return None;
    }
    let (kind, path, description) = if new_count > old_count {
        (
            ChangeKind::Added,
            Change::filter_rule_positional_path(old_count),
            format!("{} unnamed firewall rule(s) added", new_count - old_count),
        )
    } else {
        (
            ChangeKind::Removed,
            Change::filter_rule_positional_path(new_count),
            format!("{} unnamed firewall rule(s) removed", old_count - new_count),
        )
    };
    Some(change(
        kind,
        Section::Firewall,
        path,
        description,
        Some(old_count.to_string()),
        Some(new_count.to_string()),
        Impact::Unset,
    ))
}

fn reorder_changes(
    old: &[FirewallRule],
    new: &[FirewallRule],
    unchanged_uuids: &[&str],
) -> Vec<Change> {
    let unchanged: BTreeSet<&str> = unchanged_uuids.iter().copied().collect();

    let old_positions: BTreeMap<&str, usize> = old
        .iter()
        .filter_map(|r| r.uuid.as_deref())
        .filter(|u| unchanged.contains(u))
        .enumerate()
        .map(|(i, u)| (u, i))
        .collect();
    let new_positions: BTreeMap<&str, usize> = new
        .iter()
        .filter_map(|r| r.uuid.as_deref())
        .filter(|u| unchanged.contains(u))
        .enumerate()
        .map(|(i, u)| (u, i))
        .collect();

    unchanged_uuids
        .iter()
        .filter(|uuid| old_positions.get(*uuid) != new_positions.get(*uuid))
        .map(|uuid| {
            change(
                ChangeKind::Reordered,
                Section::Firewall,
                Change::filter_rule_uuid_path(uuid),
                format!("firewall rule {uuid} reordered"),
                old_positions.get(uuid).map(ToString::to_string),
                new_positions.get(uuid).map(ToString::to_string),
                Impact::Unset,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AddressSpec, RuleType};

    fn rule(uuid: Option<&str>, permissive: bool, description: &str) -> FirewallRule {
        FirewallRule {
            uuid: uuid.map(str::to_string),
            rule_type: if permissive {
                RuleType::Pass
            } else {
                RuleType::Block
            },
            interfaces: vec!["wan".to_string()],
            protocol: "tcp".to_string(),
            ip_protocol: "inet".to_string(),
            source: if permissive {
                Endpoint::any()
            } else {
                Endpoint {
                    address: AddressSpec::Value("10.0.0.0/24".to_string()),
                    port: "any".to_string(),
                    negated: false,
                }
            },
            destination: Endpoint::any(),
            state_type: "keep state".to_string(),
            direction: "in".to_string(),
            quick: true,
            description: description.to_string(),
            disabled: false,
        }
    }

    #[test]
    fn removed_rule_is_medium() {
        let old = vec![rule(Some("U1"), false, "")];
        let changes = analyze(&old, &[], FirewallOptions::default());
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind, ChangeKind::Removed);
        assert_eq!(changes[0].security_impact, Impact::Medium);
    }

    #[test]
    fn added_permissive_rule_is_high() {
        let new = vec![rule(Some("U1"), true, "")];
        let changes = analyze(&[], &new, FirewallOptions::default());
        assert_eq!(changes[0].kind, ChangeKind::Added);
        assert_eq!(changes[0].security_impact, Impact::High);
    }

    #[test]
    fn added_non_permissive_rule_is_unset() {
        let new = vec![rule(Some("U1"), false, "")];
        let changes = analyze(&[], &new, FirewallOptions::default());
        assert_eq!(changes[0].security_impact, Impact::Unset);
    }

    #[test]
    fn rule_becoming_permissive_is_high() {
        let old = vec![rule(Some("U1"), false, "x")];
        let new = vec![rule(Some("U1"), true, "x")];
        let changes = analyze(&old, &new, FirewallOptions::default());
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind, ChangeKind::Modified);
        assert_eq!(changes[0].security_impact, Impact::High);
    }

    #[test]
    fn identical_uuid_rules_produce_no_change() {
        let old = vec![rule(Some("U1"), false, "x")];
        let new = old.clone();
        assert!(analyze(&old, &new, FirewallOptions::default()).is_empty());
    }

    #[test]
    fn unnamed_rule_identity_is_count_only() {
        let old = vec![rule(None, false, "a")];
        let new = vec![rule(None, false, "a"), rule(None, false, "b")];
        let changes = analyze(&old, &new, FirewallOptions::default());
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind, ChangeKind::Added);
    }

    #[test]
    fn reorder_detected_only_for_content_unchanged_uuids() {
        let old = vec![rule(Some("U1"), false, "a"), rule(Some("U2"), false, "b")];
        let new = vec![rule(Some("U2"), false, "b"), rule(Some("U1"), false, "a")];
        let options = FirewallOptions {
            detect_order: true,
            normalize_display: false,
        };
        let changes = analyze(&old, &new, options);
        assert_eq!(changes.len(), 2);
        assert!(changes.iter().all(|c| c.kind == ChangeKind::Reordered));
    }

    #[test]
    fn content_change_suppresses_reorder_for_same_uuid() {
        let old = vec![rule(Some("U1"), false, "a"), rule(Some("U2"), false, "b")];
        let new = vec![rule(Some("U2"), false, "changed"), rule(Some("U1"), false, "a")];
        let options = FirewallOptions {
            detect_order: true,
            normalize_display: false,
        };
        let changes = analyze(&old, &new, options);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind, ChangeKind::Modified);
    }

    #[test]
    fn reorder_is_off_by_default() {
        let old = vec![rule(Some("U1"), false, "a"), rule(Some("U2"), false, "b")];
        let new = vec![rule(Some("U2"), false, "b"), rule(Some("U1"), false, "a")];
        assert!(analyze(&old, &new, FirewallOptions::default()).is_empty());
    }
}
