//! VLANs section analyzer: identity by `vlan_if` key, sorted-key ordering.

use super::change;
use crate::change::{Change, ChangeKind, Impact, Section};
use crate::model::Vlan;
use std::collections::{BTreeMap, BTreeSet};

pub(crate) fn analyze(old: &BTreeMap<String, Vlan>, new: &BTreeMap<String, Vlan>) -> Vec<Change> {
    let keys: BTreeSet<&String> = old.keys().chain(new.keys()).collect();
    let mut changes = Vec::new();

    for key in keys {
        match (old.get(key), new.get(key)) {
            (Some(o), Some(n)) => changes.extend(modified(key, o, n)),
            (Some(o), None) => changes.push(removed(key, o)),
            (None, Some(n)) => changes.push(added(key, n)),
            (None, None) => unreachable!("key drawn from the union of both maps"),
        }
    }

    changes
}

fn modified(key: &str, old: &Vlan, new: &Vlan) -> Vec<Change> {
    let mut changes = Vec::new();
    let mut field = |suffix: &str, old_v: String, new_v: String| {
        if old_v != new_v {
            let path = Change::dotted(&["vlans", key, suffix]);
            changes.push(change(
                ChangeKind::Modified,
                Section::Vlans,
                path.clone(),
                format!("{path} changed"),
                Some(old_v),
                Some(new_v),
                Impact::Unset,
            ));
        }
    };

    field("tag", old.tag.to_string(), new.tag.to_string());
    field(
        "physical-if",
        old.physical_if.clone(),
        new.physical_if.clone(),
    );
    field(
        "description",
        old.description.clone(),
        new.description.clone(),
    );

    changes
}

fn removed(key: &str, old: &Vlan) -> Change {
    change(
        ChangeKind::Removed,
        Section::Vlans,
        Change::dotted(&["vlans", key]),
        format!("vlan {key} removed"),
        Some(old.tag.to_string()),
        None,
        Impact::Unset,
    )
}

fn added(key: &str, new: &Vlan) -> Change {
    change(
        ChangeKind::Added,
        Section::Vlans,
        Change::dotted(&["vlans", key]),
        format!("vlan {key} added"),
        None,
        Some(new.tag.to_string()),
        Impact::Unset,
    )
}
