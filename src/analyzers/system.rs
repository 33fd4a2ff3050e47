//! System section analyzer: scalar field equality, fixed field order.

use super::change;
use crate::change::{Change, ChangeKind, Impact, Section};
use crate::model::System;

/// Compares two `system` subtrees field by field, in the fixed order named
/// in the design notes. Unlike the collection-keyed sections this never
/// needs an identity rule: there is exactly one `System` per config.
pub(crate) fn analyze(old: &System, new: &System) -> Vec<Change> {
    let mut changes = Vec::new();

    scalar(
        &mut changes,
        "system.hostname",
        &old.hostname,
        &new.hostname,
        Impact::Unset,
    );
    scalar(
        &mut changes,
        "system.domain",
        &old.domain,
        &new.domain,
        Impact::Unset,
    );
    scalar(
        &mut changes,
        "system.timezone",
        &old.timezone,
        &new.timezone,
        Impact::Unset,
    );
    if old.dns_servers != new.dns_servers {
        changes.push(change(
            ChangeKind::Modified,
            Section::System,
            "system.dnsserver",
            "DNS servers changed",
            Some(old.dns_servers.join(",")),
            Some(new.dns_servers.join(",")),
            Impact::Unset,
        ));
    }
    scalar(
        &mut changes,
        "system.webgui.protocol",
        &old.webgui.protocol,
        &new.webgui.protocol,
        // domain-authoritative per the design notes; the risk scorer would
        // assign the same medium impact via its own pattern, but an
        // analyzer-set impact always wins so we set it directly here too.
        Impact::Medium,
    );
    scalar(
        &mut changes,
        "system.ssh.group",
        &old.ssh.group,
        &new.ssh.group,
        Impact::Unset,
    );
    scalar(
        &mut changes,
        "system.bogons.interval",
        &old.bogons_interval,
        &new.bogons_interval,
        Impact::Unset,
    );
    scalar(
        &mut changes,
        "system.optimization",
        &old.optimization,
        &new.optimization,
        Impact::Unset,
    );
    bool_field(
        &mut changes,
        "system.hardware-offload.disable-checksum",
        old.hardware_offload.disable_checksum_offloading,
        new.hardware_offload.disable_checksum_offloading,
    );
    bool_field(
        &mut changes,
        "system.hardware-offload.disable-segmentation",
        old.hardware_offload.disable_segmentation_offloading,
        new.hardware_offload.disable_segmentation_offloading,
    );
    scalar(
        &mut changes,
        "system.theme",
        &old.theme,
        &new.theme,
        Impact::Unset,
    );

    let old_ids = old.ids.as_ref().map(|c| c.enabled).unwrap_or(false);
    let new_ids = new.ids.as_ref().map(|c| c.enabled).unwrap_or(false);
    bool_field(&mut changes, "system.ids.enabled", old_ids, new_ids);

    changes
}

fn scalar(changes: &mut Vec<Change>, path: &str, old: &str, new: &str, impact: Impact) {
    if old != new {
        changes.push(change(
            ChangeKind::Modified,
            Section::System,
            path,
            format!("{path} changed"),
            Some(old.to_string()),
            Some(new.to_string()),
            impact,
        ));
    }
}

fn bool_field(changes: &mut Vec<Change>, path: &str, old: bool, new: bool) {
    if old != new {
        changes.push(change(
            ChangeKind::Modified,
            Section::System,
            path,
            format!("{path} changed"),
            Some(old.to_string()),
            Some(new.to_string()),
            Impact::Unset,
        ));
    }
}
