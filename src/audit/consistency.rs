//! Consistency analyzer: cross-field and cross-collection invariants that
//! are not security findings in their own right, but point at a
//! configuration that will misbehave.

use super::finding;
use crate::model::CommonDevice;
use crate::report::{Finding, Severity};
use std::collections::BTreeSet;

pub(crate) fn analyze(cfg: &CommonDevice) -> Vec<Finding> {
    let mut findings = Vec::new();
    findings.extend(invalid_gateway_format(cfg));
    findings.extend(dhcp_without_interface_ip(cfg));
    findings.extend(dangling_group_references(cfg));
    findings
}

/// (a) Any interface with gateway + ipv4 + subnet but whose gateway string
/// does not contain `.` is flagged — a gateway alias name or malformed
/// value slipped in where an IPv4 literal belongs.
fn invalid_gateway_format(cfg: &CommonDevice) -> Vec<Finding> {
    cfg.interfaces
        .values()
        .filter(|iface| {
            iface.ipv4_address.is_some()
                && iface.subnet_prefix.is_some()
                && iface
                    .gateway
                    .as_deref()
                    .is_some_and(|gw| !gw.contains('.'))
        })
        .map(|iface| {
            finding(
                Severity::Medium,
                "invalid-gateway-format",
                "Invalid gateway format",
                format!(
                    "interface {} has a gateway value that does not look like an IPv4 address: {:?}",
                    iface.name, iface.gateway
                ),
                format!("interfaces.{}.gateway", iface.name),
            )
            .with_recommendation("set the gateway to the upstream router's IPv4 address")
        })
        .collect()
}

/// (b) The `lan` DHCP scope enabled with a configured range but the `lan`
/// interface has no IPv4 address is a high finding: DHCP will hand out
/// addresses the interface cannot itself reach.
fn dhcp_without_interface_ip(cfg: &CommonDevice) -> Vec<Finding> {
    let Some(lan_scope) = cfg.dhcp_scopes.iter().find(|s| s.interface == "lan") else {
        return Vec::new();
    };
    if !lan_scope.enabled || lan_scope.range.from.is_empty() {
        return Vec::new();
    }
    let lan_has_ip = cfg
        .interfaces
        .get("lan")
        .is_some_and(|iface| iface.ipv4_address.is_some());
    if lan_has_ip {
        return Vec::new();
    }
    vec![finding(
        Severity::High,
        "dhcp-without-interface-ip",
        "DHCP enabled without interface IP",
        "DHCP is enabled on lan with a configured range, but the lan interface has no IPv4 address",
        "dhcp.lan",
    )
    .with_recommendation("assign the lan interface a static IPv4 address or disable the DHCP scope")]
}

/// (c) Any user whose `group_name` references a group that does not exist
/// in `cfg.groups`.
fn dangling_group_references(cfg: &CommonDevice) -> Vec<Finding> {
    let group_names: BTreeSet<&str> = cfg.groups.iter().map(|g| g.name.as_str()).collect();
    cfg.users
        .iter()
        .filter(|u| !u.group_name.is_empty() && !group_names.contains(u.group_name.as_str()))
        .map(|u| {
            finding(
                Severity::Medium,
                "dangling-group-reference",
                "User references non-existent group",
                format!(
                    "user {} references group {:?}, which does not exist",
                    u.name, u.group_name
                ),
                format!("users.{}", u.name),
            )
            .with_recommendation("create the referenced group or reassign the user")
        })
        .collect()
}
