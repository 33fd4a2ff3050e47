//! The Common Device domain model.
//!
//! This is the in-memory value tree produced by the (external) parser /
//! device-autodetection collaborator. The core treats every `CommonDevice`
//! as immutable: nothing in this module mutates a tree in place except the
//! [`crate::normalize`] pipeline, which always clones first.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifies the vendor/product family a configuration was parsed from.
///
/// The parser/autodetection step that produces this is out of scope; the
/// core only carries whatever string it is handed through to
/// `Result.deviceType`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceType {
    /// Product name, e.g. `"opnsense"`.
    pub name: String,
    /// Firmware/software version string, if known.
    pub version: Option<String>,
}

/// Top-level in-memory configuration tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonDevice {
    /// Device/firmware identity, carried verbatim from the parser.
    pub device_type: DeviceType,
    /// System-level settings.
    pub system: System,
    /// Logical interfaces keyed by name.
    pub interfaces: BTreeMap<String, Interface>,
    /// VLANs keyed by `vlan_if`.
    pub vlans: BTreeMap<String, Vlan>,
    /// Firewall rules in their on-device order.
    pub firewall_rules: Vec<FirewallRule>,
    /// NAT configuration.
    pub nat: Nat,
    /// DHCP scopes, at most one per interface.
    pub dhcp_scopes: Vec<DhcpScope>,
    /// Local user accounts.
    pub users: Vec<User>,
    /// Local groups.
    pub groups: Vec<Group>,
    /// Routing configuration.
    pub routing: Routing,
    /// Auxiliary services.
    pub services: Services,
    /// Certificates and their private keys. Not diffed (the `certificates`
    /// section has no live comparator) but present in the tree as a
    /// sensitive-field cloning concern for the normalizer.
    pub certificates: Vec<Certificate>,
    /// `sysctl` tunable overrides.
    pub sysctl: Vec<SysctlItem>,
}

/// A certificate/private-key pair stored in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    /// Certificate name/descr.
    pub name: String,
    /// PEM-encoded certificate body.
    pub certificate_pem: String,
    /// PEM-encoded private key. Sensitive.
    pub private_key_pem: String,
}

/// A single `sysctl` tunable override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SysctlItem {
    /// Tunable name, e.g. `"net.inet.ip.forwarding"`.
    pub tunable: String,
    /// Configured value.
    pub value: String,
    /// Free-text description.
    pub description: String,
}

/// System-level configuration subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct System {
    /// Device hostname.
    pub hostname: String,
    /// DNS domain suffix.
    pub domain: String,
    /// IANA timezone name.
    pub timezone: String,
    /// Ordered list of configured DNS resolvers.
    pub dns_servers: Vec<String>,
    /// Web management UI configuration.
    pub webgui: WebGui,
    /// SSH daemon configuration.
    pub ssh: Ssh,
    /// Bogon-list refresh interval, e.g. `"monthly"`.
    pub bogons_interval: String,
    /// Tuning profile, e.g. `"normal"`, `"aggressive"`.
    pub optimization: String,
    /// NIC hardware-offload toggles.
    pub hardware_offload: HardwareOffload,
    /// UI theme name.
    pub theme: String,
    /// Optional intrusion-detection subtree.
    pub ids: Option<IdsConfig>,
}

/// Web management UI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebGui {
    /// `"http"` or `"https"`.
    pub protocol: String,
}

/// SSH daemon configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ssh {
    /// Group permitted to authenticate over SSH.
    pub group: String,
}

/// Hardware checksum/segmentation offload toggles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareOffload {
    /// Checksum offload is disabled.
    pub disable_checksum_offloading: bool,
    /// TCP segmentation offload is disabled.
    pub disable_segmentation_offloading: bool,
}

/// Minimal intrusion-detection subtree; the IDS ruleset itself is out of
/// scope for this core, only its enablement is consulted by audits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdsConfig {
    /// Whether the IDS/IPS engine is enabled.
    pub enabled: bool,
}

/// A logical interface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interface {
    /// Logical interface name, e.g. `"lan"`, `"wan"`, `"opt1"`.
    pub name: String,
    /// Underlying physical interface, e.g. `"igb0"`.
    pub physical_if: String,
    /// Administrative enable state.
    pub enabled: bool,
    /// Interface type, e.g. `"staticv4"`, `"dhcp"`.
    pub if_type: String,
    /// IPv4 address, if statically assigned.
    pub ipv4_address: Option<String>,
    /// IPv4 subnet prefix length, e.g. `24`.
    pub subnet_prefix: Option<u8>,
    /// IPv6 address, if statically assigned.
    pub ipv6_address: Option<String>,
    /// Free-text description.
    pub description: String,
    /// Upstream gateway, if any.
    pub gateway: Option<String>,
    /// Block RFC1918 private address traffic.
    pub block_private: bool,
    /// Block traffic from bogon networks.
    pub block_bogons: bool,
}

/// A VLAN sub-interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vlan {
    /// Logical VLAN interface name, e.g. `"vlan0.100"`. This is also the map key.
    pub vlan_if: String,
    /// 802.1Q tag.
    pub tag: u16,
    /// Parent physical interface.
    pub physical_if: String,
    /// Free-text description.
    pub description: String,
}

/// The three-way endpoint address polymorphism described in the design
/// notes: `"any"` (wildcard), unset (empty string), and a concrete named
/// value (alias, bare IP, or CIDR).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum AddressSpec {
    /// Wildcard: matches anything.
    Any,
    /// Unspecified; distinct from `Any`.
    Unset,
    /// A concrete alias name, bare IP, or CIDR literal.
    Value(String),
}

impl AddressSpec {
    /// Parses the raw on-wire representation, where `"any"` and `""` carry
    /// the distinct meanings documented on [`AddressSpec`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("any") {
            Self::Any
        } else if raw.is_empty() {
            Self::Unset
        } else {
            Self::Value(raw.to_string())
        }
    }

    /// Renders back to the sentinel-string form used in `path`/value display.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Any => "any",
            Self::Unset => "",
            Self::Value(v) => v,
        }
    }

    /// True for the `Any` wildcard, case-sensitively matching the literal
    /// string `"any"` — the canonical form per the permissiveness predicate
    /// resolution in the design notes.
    #[must_use]
    pub const fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }
}

/// One side of a firewall rule's match criteria.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// The address/network/wildcard being matched.
    pub address: AddressSpec,
    /// Port or port range, `"any"`/`""` carrying the same dual meaning as
    /// address, anything else a literal port or range string.
    pub port: String,
    /// Whether the match is negated (`!`).
    pub negated: bool,
}

impl Endpoint {
    /// Convenience constructor for a wildcard endpoint.
    #[must_use]
    pub fn any() -> Self {
        Self {
            address: AddressSpec::Any,
            port: "any".to_string(),
            negated: false,
        }
    }

    /// Whether this endpoint's address is the wildcard, per the resolved
    /// Open Question in the design notes: match either the `Any` tag or the
    /// literal string `"any"` on a `Value`, case-sensitively.
    #[must_use]
    pub fn address_is_any(&self) -> bool {
        match &self.address {
            AddressSpec::Any => true,
            AddressSpec::Value(v) => v == "any",
            AddressSpec::Unset => false,
        }
    }
}

/// Firewall rule action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleType {
    /// Permit matching traffic.
    Pass,
    /// Silently drop matching traffic.
    Block,
    /// Drop matching traffic and notify the sender.
    Reject,
}

impl RuleType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Block => "block",
            Self::Reject => "reject",
        }
    }
}

/// A single firewall filter rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallRule {
    /// Stable identifier; absent (`None`) for rules the parser could not
    /// assign one to. Unique within a snapshot when present.
    pub uuid: Option<String>,
    /// Rule action.
    pub rule_type: RuleType,
    /// Interfaces this rule is attached to, in on-device order.
    pub interfaces: Vec<String>,
    /// Layer 4 protocol, e.g. `"tcp"`, `"udp"`, `"any"`.
    pub protocol: String,
    /// IP protocol family, e.g. `"inet"`, `"inet6"`, `"inet46"`.
    pub ip_protocol: String,
    /// Source match criteria.
    pub source: Endpoint,
    /// Destination match criteria.
    pub destination: Endpoint,
    /// Connection state tracking mode, e.g. `"keep state"`.
    pub state_type: String,
    /// Traffic direction, e.g. `"in"`, `"out"`.
    pub direction: String,
    /// Whether this is a `quick` (short-circuiting) rule.
    pub quick: bool,
    /// Free-text description.
    pub description: String,
    /// Administrative disable flag.
    pub disabled: bool,
}

impl FirewallRule {
    /// The interfaces list joined for use as part of a composite sort/equivalence key.
    #[must_use]
    pub fn joined_interfaces(&self) -> String {
        self.interfaces.join(",")
    }

    /// `isPermissive(rule) := rule.type == pass AND source.address == "any"
    /// AND destination.address == "any"`. The single source of truth for
    /// "permissive" used by both the firewall diff analyzer and the
    /// dead-rule/security audits.
    #[must_use]
    pub fn is_permissive(&self) -> bool {
        self.rule_type == RuleType::Pass
            && Self::address_is_any(&self.source)
            && Self::address_is_any(&self.destination)
    }

    fn address_is_any(endpoint: &Endpoint) -> bool {
        match &endpoint.address {
            AddressSpec::Any => true,
            AddressSpec::Value(v) => v == "any",
            AddressSpec::Unset => false,
        }
    }

    /// Rule-equivalence: two rules produce identical packet-filter behavior.
    /// Compares type, ip-protocol, joined interfaces, state-type, direction,
    /// protocol, quick flag, and both endpoints (address, port, negated).
    /// `description` is intentionally excluded — this is the predicate the
    /// dead-rule analyzer uses for duplicate detection, not the reorder
    /// analyzer's content-unchanged check (which uses full equality,
    /// description included).
    #[must_use]
    pub fn is_equivalent_to(&self, other: &Self) -> bool {
        self.rule_type == other.rule_type
            && self.ip_protocol == other.ip_protocol
            && self.joined_interfaces() == other.joined_interfaces()
            && self.state_type == other.state_type
            && self.direction == other.direction
            && self.protocol == other.protocol
            && self.quick == other.quick
            && Self::endpoints_equivalent(&self.source, &other.source)
            && Self::endpoints_equivalent(&self.destination, &other.destination)
    }

    fn endpoints_equivalent(a: &Endpoint, b: &Endpoint) -> bool {
        a.address == b.address && a.port == b.port && a.negated == b.negated
    }
}

/// NAT outbound translation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutboundMode {
    /// Fully automatic outbound NAT rule generation.
    Automatic,
    /// Automatic rules plus manually added ones.
    Hybrid,
    /// Exclusively manually managed rules.
    Manual,
    /// Outbound NAT disabled entirely.
    Disabled,
}

impl OutboundMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Automatic => "automatic",
            Self::Hybrid => "hybrid",
            Self::Manual => "manual",
            Self::Disabled => "disabled",
        }
    }
}

/// A NAT translation rule (outbound or inbound/port-forward).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NatRule {
    /// Interface the rule is bound to.
    pub interface: String,
    /// Layer 4 protocol.
    pub protocol: String,
    /// Match source.
    pub source: Endpoint,
    /// Match destination.
    pub destination: Endpoint,
    /// Translation target (address and/or port).
    pub target: String,
    /// Free-text description.
    pub description: String,
}

/// NAT configuration subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nat {
    /// Outbound translation mode. `None` means unset; the normalizer fills
    /// it with [`OutboundMode::Automatic`].
    pub outbound_mode: Option<OutboundMode>,
    /// Outbound NAT rules.
    pub outbound_rules: Vec<NatRule>,
    /// Inbound NAT (port-forward) rules.
    pub inbound_rules: Vec<NatRule>,
    /// NAT reflection disabled.
    pub reflection_disabled: bool,
    /// Share forwards between WANs.
    pub share_forward: bool,
}

/// A DHCP static reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DhcpReservation {
    /// Client MAC address.
    pub mac: String,
    /// Reserved IPv4 address.
    pub ip: String,
    /// Reserved hostname.
    pub hostname: String,
    /// Free-text description.
    pub description: String,
}

/// A DHCP address pool range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DhcpRange {
    /// First address in the pool.
    pub from: String,
    /// Last address in the pool.
    pub to: String,
}

/// A DHCP scope bound to one interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DhcpScope {
    /// Bound interface name.
    pub interface: String,
    /// Administrative enable state.
    pub enabled: bool,
    /// Dynamic address pool.
    pub range: DhcpRange,
    /// Static reservations, keyed by MAC for matching purposes.
    pub reservations: Vec<DhcpReservation>,
    /// Dynamic-DNS/TSIG update key, if configured. Sensitive.
    pub ddns_key: Option<String>,
}

/// Account scope: whether it lives in the local database or is a built-in
/// system account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountScope {
    /// Built-in system account.
    System,
    /// Locally managed account.
    Local,
}

impl AccountScope {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Local => "local",
        }
    }
}

/// A local user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Login name.
    pub name: String,
    /// Numeric user id.
    pub uid: u32,
    /// Account scope.
    pub scope: AccountScope,
    /// Primary group name.
    pub group_name: String,
    /// Free-text description.
    pub description: String,
    /// Administrative disable flag.
    pub disabled: bool,
}

/// A local group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Group name.
    pub name: String,
    /// Numeric group id.
    pub gid: u32,
    /// Group scope.
    pub scope: AccountScope,
}

/// A configured upstream gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gateway {
    /// Gateway name.
    pub name: String,
    /// Bound interface.
    pub interface: String,
    /// Gateway IP address.
    pub gateway_ip: String,
    /// Free-text description.
    pub description: String,
}

/// A group of gateways used for load-balancing/failover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayGroup {
    /// Group name.
    pub name: String,
    /// Member gateway names, in priority order.
    pub members: Vec<String>,
}

/// A static route entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticRoute {
    /// Destination network in CIDR form.
    pub network: String,
    /// Next-hop gateway name.
    pub gateway: String,
    /// Free-text description.
    pub description: String,
}

/// Routing configuration subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routing {
    /// Configured gateways.
    pub gateways: Vec<Gateway>,
    /// Configured gateway groups.
    pub gateway_groups: Vec<GatewayGroup>,
    /// Configured static routes.
    pub static_routes: Vec<StaticRoute>,
}

/// Unbound (DNS resolver) service toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unbound {
    /// Service enabled.
    pub enabled: bool,
}

/// DNSMasq (DNS forwarder) service toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsMasq {
    /// Service enabled.
    pub enabled: bool,
}

/// One OpenVPN server or client instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenVpnInstance {
    /// Bound interface.
    pub interface: String,
    /// Free-text description.
    pub description: String,
}

/// OpenVPN service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenVpn {
    /// Configured server instances.
    pub servers: Vec<OpenVpnInstance>,
    /// Configured client instances.
    pub clients: Vec<OpenVpnInstance>,
}

/// WireGuard service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireGuard {
    /// Service enabled.
    pub enabled: bool,
    /// Configured tunnel pre-shared keys. Sensitive.
    pub preshared_keys: Vec<String>,
}

/// Load-balancer (relayd-style) monitor configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancer {
    /// Configured monitor type names, e.g. `"icmp"`, `"tcp"`, `"http"`.
    pub monitor_types: Vec<String>,
}

/// SNMP agent configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snmp {
    /// Read-only community string.
    pub ro_community: String,
}

/// Auxiliary services subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Services {
    /// Unbound resolver.
    pub unbound: Unbound,
    /// DNSMasq forwarder.
    pub dnsmasq: DnsMasq,
    /// OpenVPN server/client instances.
    pub openvpn: OpenVpn,
    /// WireGuard.
    pub wireguard: WireGuard,
    /// Load balancer monitors.
    pub load_balancer: LoadBalancer,
    /// SNMP agent.
    pub snmp: Snmp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_spec_distinguishes_any_from_unset() {
        assert_eq!(AddressSpec::parse("any"), AddressSpec::Any);
        assert_eq!(AddressSpec::parse(""), AddressSpec::Unset);
        assert_eq!(
            AddressSpec::parse("192.168.1.0/24"),
            AddressSpec::Value("192.168.1.0/24".to_string())
        );
        assert_ne!(AddressSpec::Any, AddressSpec::Unset);
    }

    #[test]
    fn address_spec_any_is_case_insensitive_on_parse_but_canonical_on_compare() {
        assert!(AddressSpec::parse("ANY").is_any());
        assert!(!AddressSpec::Value("ANY".to_string()).is_any());
    }

    #[test]
    fn joined_interfaces_preserves_order() {
        let rule = FirewallRule {
            uuid: None,
            rule_type: RuleType::Pass,
            interfaces: vec!["wan".to_string(), "opt1".to_string()],
            protocol: "tcp".to_string(),
            ip_protocol: "inet".to_string(),
            source: Endpoint::any(),
            destination: Endpoint::any(),
            state_type: "keep state".to_string(),
            direction: "in".to_string(),
            quick: true,
            description: String::new(),
            disabled: false,
        };
        assert_eq!(rule.joined_interfaces(), "wan,opt1");
    }

    fn sample_rule(description: &str) -> FirewallRule {
        FirewallRule {
            uuid: None,
            rule_type: RuleType::Pass,
            interfaces: vec!["lan".to_string()],
            protocol: "tcp".to_string(),
            ip_protocol: "inet".to_string(),
            source: Endpoint::any(),
            destination: Endpoint::any(),
            state_type: "keep state".to_string(),
            direction: "in".to_string(),
            quick: true,
            description: description.to_string(),
            disabled: false,
        }
    }

    #[test]
    fn rule_equivalence_ignores_description() {
        let a = sample_rule("first");
        let b = sample_rule("second");
        assert!(a.is_equivalent_to(&b));
    }

    #[test]
    fn rule_equivalence_is_reflexive_and_symmetric() {
        let a = sample_rule("x");
        let b = sample_rule("y");
        assert!(a.is_equivalent_to(&a));
        assert_eq!(a.is_equivalent_to(&b), b.is_equivalent_to(&a));
    }

    #[test]
    fn rule_equivalence_detects_real_differences() {
        let a = sample_rule("x");
        let mut b = sample_rule("x");
        b.protocol = "udp".to_string();
        assert!(!a.is_equivalent_to(&b));
    }
}
