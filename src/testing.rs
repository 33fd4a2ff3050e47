//! Shared configuration fixtures for unit and integration tests.
//!
//! The teacher workspace keeps this kind of fixture builder in a dedicated
//! `test-support` crate; this crate is a single package, so the same
//! convention collapses into an always-available module instead, usable from
//! both `#[cfg(test)]` unit tests and the `tests/` integration suite.

use crate::model::{
    AccountScope, CommonDevice, DeviceType, DnsMasq, Group, HardwareOffload, LoadBalancer, Nat,
    OpenVpn, OutboundMode, Routing, Services, Snmp, Ssh, System, Unbound, User, WebGui, WireGuard,
};
use std::collections::BTreeMap;

/// A minimal, valid `CommonDevice` with the given hostname and otherwise
/// empty collections. Every field is populated with a sensible, non-default
/// value where the normalizer would otherwise fill one, so fixtures built on
/// top of this are easy to reason about without tracing through defaults.
#[must_use]
pub fn minimal_device(hostname: &str) -> CommonDevice {
    CommonDevice {
        device_type: DeviceType {
            name: "opnsense".to_string(),
            version: Some("24.1".to_string()),
        },
        system: System {
            hostname: hostname.to_string(),
            domain: "example.com".to_string(),
            timezone: "UTC".to_string(),
            dns_servers: vec!["1.1.1.1".to_string()],
            webgui: WebGui {
                protocol: "https".to_string(),
            },
            ssh: Ssh {
                group: "admins".to_string(),
            },
            bogons_interval: "monthly".to_string(),
            optimization: "normal".to_string(),
            hardware_offload: HardwareOffload {
                disable_checksum_offloading: false,
                disable_segmentation_offloading: false,
            },
            theme: "opnsense".to_string(),
            ids: None,
        },
        interfaces: BTreeMap::new(),
        vlans: BTreeMap::new(),
        firewall_rules: vec![],
        nat: Nat {
            outbound_mode: Some(OutboundMode::Automatic),
            outbound_rules: vec![],
            inbound_rules: vec![],
            reflection_disabled: false,
            share_forward: false,
        },
        dhcp_scopes: vec![],
        users: vec![],
        groups: vec![],
        routing: Routing {
            gateways: vec![],
            gateway_groups: vec![],
            static_routes: vec![],
        },
        services: Services {
            unbound: Unbound { enabled: false },
            dnsmasq: DnsMasq { enabled: false },
            openvpn: OpenVpn {
                servers: vec![],
                clients: vec![],
            },
            wireguard: WireGuard {
                enabled: false,
                preshared_keys: vec![],
            },
            load_balancer: LoadBalancer {
                monitor_types: vec![],
            },
            snmp: Snmp {
                ro_community: String::new(),
            },
        },
        certificates: vec![],
        sysctl: vec![],
    }
}

/// An `admins`-group local user, the shape most audit/consistency fixtures need.
#[must_use]
pub fn admin_user(name: &str) -> User {
    User {
        name: name.to_string(),
        uid: 2000,
        scope: AccountScope::Local,
        group_name: "admins".to_string(),
        description: String::new(),
        disabled: false,
    }
}

/// The `admins` group referenced by [`admin_user`].
#[must_use]
pub fn admins_group() -> Group {
    Group {
        name: "admins".to_string(),
        gid: 1000,
        scope: AccountScope::Local,
    }
}
