//! NAT section analyzer: identity is mode plus rule counts, not per-rule.

use super::change;
use crate::change::{Change, ChangeKind, Impact, Section};
use crate::model::Nat;

pub(crate) fn analyze(old: &Nat, new: &Nat) -> Vec<Change> {
    let mut changes = Vec::new();

    let old_mode = old.outbound_mode.map(|m| m.as_str()).unwrap_or("");
    let new_mode = new.outbound_mode.map(|m| m.as_str()).unwrap_or("");
    if old_mode != new_mode {
        changes.push(change(
            ChangeKind::Modified,
            Section::Nat,
            "nat.outbound.mode",
            "NAT outbound mode changed",
            Some(old_mode.to_string()),
            Some(new_mode.to_string()),
            Impact::Medium,
        ));
    }

    if old.outbound_rules.len() != new.outbound_rules.len() {
        changes.push(change(
            ChangeKind::Modified,
            Section::Nat,
            "nat.outbound.rules",
            "NAT outbound rule count changed",
            Some(old.outbound_rules.len().to_string()),
            Some(new.outbound_rules.len().to_string()),
            Impact::Unset,
        ));
    }

    if old.inbound_rules.len() != new.inbound_rules.len() {
        changes.push(change(
            ChangeKind::Modified,
            Section::Nat,
            "nat.inbound",
            "port-forward (inbound NAT) rule count changed",
            Some(old.inbound_rules.len().to_string()),
            Some(new.inbound_rules.len().to_string()),
            Impact::Medium,
        ));
    }

    if old.reflection_disabled != new.reflection_disabled {
        changes.push(change(
            ChangeKind::Modified,
            Section::Nat,
            "nat.reflection.disabled",
            "NAT reflection setting changed",
            Some(old.reflection_disabled.to_string()),
            Some(new.reflection_disabled.to_string()),
            Impact::Unset,
        ));
    }

    if old.share_forward != new.share_forward {
        changes.push(change(
            ChangeKind::Modified,
            Section::Nat,
            "nat.share-forward",
            "NAT share-forward setting changed",
            Some(old.share_forward.to_string()),
            Some(new.share_forward.to_string()),
            Impact::Unset,
        ));
    }

    changes
}
