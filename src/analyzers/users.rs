//! Users section analyzer: identity by name, sorted-name ordering.
//!
//! Local groups travel alongside users in the Common Device model (there is
//! no separate `groups` section in the taxonomy); this analyzer folds group
//! membership changes into the same `users` section using the same by-name
//! identity rule.

use super::change;
use crate::change::{Change, ChangeKind, Impact, Section};
use crate::model::{Group, User};
use std::collections::BTreeMap;

pub(crate) fn analyze(
    old_users: &[User],
    new_users: &[User],
    old_groups: &[Group],
    new_groups: &[Group],
) -> Vec<Change> {
    let mut changes = Vec::new();
    changes.extend(analyze_users(old_users, new_users));
    changes.extend(analyze_groups(old_groups, new_groups));
    changes
}

fn analyze_users(old: &[User], new: &[User]) -> Vec<Change> {
    let old_by_name: BTreeMap<&str, &User> = old.iter().map(|u| (u.name.as_str(), u)).collect();
    let new_by_name: BTreeMap<&str, &User> = new.iter().map(|u| (u.name.as_str(), u)).collect();
    let names: std::collections::BTreeSet<&str> =
        old_by_name.keys().chain(new_by_name.keys()).copied().collect();

    let mut changes = Vec::new();
    for name in names {
        match (old_by_name.get(name), new_by_name.get(name)) {
            (Some(o), Some(n)) => {
                if o != n {
                    changes.push(change(
                        ChangeKind::Modified,
                        Section::Users,
                        Change::dotted(&["users", name]),
                        format!("user {name} modified"),
                        Some(describe_user(o)),
                        Some(describe_user(n)),
                        Impact::Low,
                    ));
                }
            }
            (Some(o), None) => changes.push(change(
                ChangeKind::Removed,
                Section::Users,
                Change::dotted(&["users", name]),
                format!("user {name} removed"),
                Some(describe_user(o)),
                None,
                Impact::Medium,
            )),
            (None, Some(n)) => changes.push(change(
                ChangeKind::Added,
                Section::Users,
                Change::dotted(&["users", name]),
                format!("user {name} added"),
                None,
                Some(describe_user(n)),
                Impact::Medium,
            )),
            (None, None) => unreachable!("name drawn from the union of both maps"),
        }
    }
    changes
}

fn analyze_groups(old: &[Group], new: &[Group]) -> Vec<Change> {
    let old_by_name: BTreeMap<&str, &Group> = old.iter().map(|g| (g.name.as_str(), g)).collect();
    let new_by_name: BTreeMap<&str, &Group> = new.iter().map(|g| (g.name.as_str(), g)).collect();
    let names: std::collections::BTreeSet<&str> =
        old_by_name.keys().chain(new_by_name.keys()).copied().collect();

    let mut changes = Vec::new();
    for name in names {
        match (old_by_name.get(name), new_by_name.get(name)) {
            (Some(o), Some(n)) => {
                if o != n {
                    changes.push(change(
                        ChangeKind::Modified,
                        Section::Users,
                        Change::dotted(&["users", "groups", name]),
                        format!("group {name} modified"),
                        Some(o.gid.to_string()),
                        Some(n.gid.to_string()),
                        Impact::Unset,
                    ));
                }
            }
            (Some(o), None) => changes.push(change(
                ChangeKind::Removed,
                Section::Users,
                Change::dotted(&["users", "groups", name]),
                format!("group {name} removed"),
                Some(o.gid.to_string()),
                None,
                Impact::Unset,
            )),
            (None, Some(n)) => changes.push(change(
                ChangeKind::Added,
                Section::Users,
                Change::dotted(&["users", "groups", name]),
                format!("group {name} added"),
                None,
                Some(n.gid.to_string()),
                Impact::Unset,
            )),
            (None, None) => unreachable!("name drawn from the union of both maps"),
        }
    }
    changes
}

fn describe_user(user: &User) -> String {
    format!(
        "uid={} scope={} group={} disabled={}",
        user.uid,
        user.scope.as_str(),
        user.group_name,
        user.disabled
    )
}
