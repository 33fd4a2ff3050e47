//! The Normalizer: default-filling, address canonicalization, and
//! deterministic ordering ahead of the audit analyzers.
//!
//! Every phase clones before it touches anything — see
//! [`normalize`]'s doc comment for the ownership guarantee this crate makes
//! to callers.

use crate::model::{AddressSpec, CommonDevice, Endpoint, OutboundMode};
use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use std::net::IpAddr;
use tracing::debug;

const PRESERVED_ALIASES: &[&str] = &["any", "lan", "wan", "localhost", "loopback"];

/// Normalizes `cfg` into canonical form: defaults filled, addresses
/// canonicalized, sequences sorted for determinism.
///
/// `cfg` is never mutated — every sequence the normalizer touches (sorted,
/// canonicalized, or carrying a sensitive field such as a certificate
/// private key, a DHCP DDNS key, or a WireGuard pre-shared key) is cloned
/// into the output before any further transformation, even where this
/// revision performs no edit on it. This makes the function pure with
/// respect to its input by construction rather than by convention.
#[must_use]
pub fn normalize(cfg: &CommonDevice) -> CommonDevice {
    debug!("normalizing configuration");
    let mut out = cfg.clone();
    fill_defaults(&mut out);
    canonicalize_addresses(&mut out);
    sort_sequences(&mut out);
    out
}

fn fill_defaults(cfg: &mut CommonDevice) {
    if cfg.system.optimization.is_empty() {
        cfg.system.optimization = "normal".to_string();
    }
    if cfg.system.webgui.protocol.is_empty() {
        cfg.system.webgui.protocol = "https".to_string();
    }
    if cfg.system.timezone.is_empty() {
        cfg.system.timezone = "UTC".to_string();
    }
    if cfg.system.bogons_interval.is_empty() {
        cfg.system.bogons_interval = "monthly".to_string();
    }
    if cfg.system.theme.is_empty() {
        cfg.system.theme = "opnsense".to_string();
    }
    if cfg.nat.outbound_mode.is_none() {
        cfg.nat.outbound_mode = Some(OutboundMode::Automatic);
    }
}

fn canonicalize_addresses(cfg: &mut CommonDevice) {
    for rule in &mut cfg.firewall_rules {
        canonicalize_endpoint(&mut rule.source);
        canonicalize_endpoint(&mut rule.destination);
    }
}

fn canonicalize_endpoint(endpoint: &mut Endpoint) {
    if let AddressSpec::Value(raw) = &endpoint.address {
        if let Some(canonical) = canonicalize_address_str(raw) {
            endpoint.address = AddressSpec::Value(canonical);
        }
    }
}

/// Canonicalizes a single address string per the normalizer's phase 2
/// rules. Returns `None` when the input should pass through unchanged
/// (preserved alias, or not parseable as an IP/CIDR — e.g. a firewall
/// alias name).
///
/// Also used, standalone, by the display-only `Normalize` option on the
/// firewall analyzer (spec §4.2) — that path canonicalizes values shown in
/// `old_value`/`new_value` without touching the matching decision.
pub(crate) fn canonicalize_address_str(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    if PRESERVED_ALIASES
        .iter()
        .any(|alias| raw.eq_ignore_ascii_case(alias))
    {
        return None;
    }

    let raw = strip_zero_padded_octets(raw);
    let raw = raw.as_str();

    if let Ok(net) = raw.parse::<IpNet>() {
        return Some(canonical_cidr(net));
    }

    if let Ok(ip) = raw.parse::<IpAddr>() {
        let prefix = if ip.is_ipv4() { 32 } else { 128 };
        return Some(format!("{ip}/{prefix}"));
    }

    None
}

/// Canonicalizes a bare IP address (no CIDR prefix) for display, e.g. an
/// interface's `ipAddress`/`ipv6Address`. Unlike [`canonicalize_address_str`]
/// this never appends a prefix length, since a host address displayed on its
/// own is not a network.
pub(crate) fn canonicalize_bare_ip(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    strip_zero_padded_octets(raw).parse::<IpAddr>().ok().map(|ip| ip.to_string())
}

/// Device exports zero-pad IPv4 octets (`010.000.001.001`); std's parser
/// rejects those outright to avoid octal ambiguity, so strip the padding
/// ourselves before handing the string to it. Leaves anything that isn't a
/// plain dotted-quad (IPv6, aliases, already-canonical addresses) untouched.
fn strip_zero_padded_octets(raw: &str) -> String {
    let (addr, suffix) = raw.split_once('/').unwrap_or((raw, ""));
    let octets: Vec<&str> = addr.split('.').collect();
    if octets.len() != 4 || !octets.iter().all(|o| !o.is_empty() && o.bytes().all(|b| b.is_ascii_digit())) {
        return raw.to_string();
    }
    let stripped: Vec<String> = octets
        .iter()
        .map(|o| {
            let trimmed = o.trim_start_matches('0');
            if trimmed.is_empty() {
                "0".to_string()
            } else {
                trimmed.to_string()
            }
        })
        .collect();
    let joined = stripped.join(".");
    if suffix.is_empty() {
        joined
    } else {
        format!("{joined}/{suffix}")
    }
}

fn canonical_cidr(net: IpNet) -> String {
    match net {
        IpNet::V4(v4) => {
            let truncated = Ipv4Net::new(v4.trunc().network(), v4.prefix_len())
                .unwrap_or(v4)
                .trunc();
            truncated.to_string()
        }
        IpNet::V6(v6) => {
            let truncated = Ipv6Net::new(v6.trunc().network(), v6.prefix_len())
                .unwrap_or(v6)
                .trunc();
            truncated.to_string()
        }
    }
}

fn sort_sequences(cfg: &mut CommonDevice) {
    cfg.users.sort_by(|a, b| a.name.cmp(&b.name));
    cfg.groups.sort_by(|a, b| a.name.cmp(&b.name));
    cfg.sysctl.sort_by(|a, b| a.tunable.cmp(&b.tunable));
    cfg.services
        .load_balancer
        .monitor_types
        .sort();
    cfg.firewall_rules.sort_by(|a, b| {
        (a.joined_interfaces(), a.rule_type.as_str(), &a.description).cmp(&(
            b.joined_interfaces(),
            b.rule_type.as_str(),
            &b.description,
        ))
    });
}
