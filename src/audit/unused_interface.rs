//! Unused-interface analyzer: flags enabled interfaces that nothing on the
//! configuration actually references.

use super::finding;
use crate::model::CommonDevice;
use crate::report::{Finding, Severity};
use std::collections::BTreeSet;

pub(crate) fn analyze(cfg: &CommonDevice) -> Vec<Finding> {
    let used = used_interfaces(cfg);

    cfg.interfaces
        .values()
        .filter(|iface| iface.enabled && !used.contains(iface.name.as_str()))
        .map(|iface| {
            finding(
                Severity::Low,
                "unused-interface",
                "Unused interface",
                format!(
                    "interface {} is enabled but not referenced by any firewall rule, DHCP scope, or VPN binding",
                    iface.name
                ),
                format!("interfaces.{}", iface.name),
            )
        })
        .collect()
}

/// Collects every interface name this configuration actually references.
///
/// The `"lan"` fallback for Unbound/DNSMasq/WireGuard/load-balancer is a
/// conservative heuristic: those services bind to the management network
/// by convention on the devices this model is drawn from, but the model
/// does not carry an explicit per-service interface binding for them.
fn used_interfaces(cfg: &CommonDevice) -> BTreeSet<&str> {
    let mut used: BTreeSet<&str> = BTreeSet::new();

    for rule in &cfg.firewall_rules {
        for iface in &rule.interfaces {
            used.insert(iface.as_str());
        }
    }

    for scope in &cfg.dhcp_scopes {
        if scope.enabled {
            used.insert(scope.interface.as_str());
        }
    }

    for server in &cfg.services.openvpn.servers {
        used.insert(server.interface.as_str());
    }
    for client in &cfg.services.openvpn.clients {
        used.insert(client.interface.as_str());
    }

    let conservative_lan = cfg.services.wireguard.enabled
        || cfg.services.unbound.enabled
        || cfg.services.dnsmasq.enabled
        || !cfg.services.load_balancer.monitor_types.is_empty();
    if conservative_lan {
        used.insert("lan");
    }

    used
}
