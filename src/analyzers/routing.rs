//! Routing section analyzer: static-route (and gateway) counts only, fixed.
//!
//! TODO: per-route structural comparison once `StaticRoute` gains a stable
//! identity field; today two routes with the same network but a changed
//! gateway only show up as a count delta, not a Modified change.

use super::change;
use crate::change::{Change, ChangeKind, Impact, Section};
use crate::model::Routing;

pub(crate) fn analyze(old: &Routing, new: &Routing) -> Vec<Change> {
    let mut changes = Vec::new();

    count_field(
        &mut changes,
        "routing.gateways",
        old.gateways.len(),
        new.gateways.len(),
    );
    count_field(
        &mut changes,
        "routing.gateway-groups",
        old.gateway_groups.len(),
        new.gateway_groups.len(),
    );
    count_field(
        &mut changes,
        "routing.static-routes",
        old.static_routes.len(),
        new.static_routes.len(),
    );

    changes
}

fn count_field(changes: &mut Vec<Change>, path: &str, old: usize, new: usize) {
    if old != new {
        let kind = if new > old {
            ChangeKind::Added
        } else {
            ChangeKind::Removed
        };
        changes.push(change(
            kind,
            Section::Routing,
            path,
            format!("{path} count changed"),
            Some(old.to_string()),
            Some(new.to_string()),
            Impact::Unset,
        ));
    }
}
