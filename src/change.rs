//! Change taxonomy: kinds, sections, and the `Change` record itself.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of structural delta a [`Change`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// The entity exists only in the new configuration.
    Added,
    /// The entity exists only in the old configuration.
    Removed,
    /// The entity exists in both but differs in at least one compared field.
    Modified,
    /// The entity is unchanged in content but moved position (opt-in, firewall only).
    Reordered,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Modified => "modified",
            Self::Reordered => "reordered",
        };
        write!(f, "{s}")
    }
}

/// A configuration section, as named in the Common Device model.
///
/// [`Section::all`] returns every section this taxonomy recognizes;
/// [`Section::implemented`] returns the subset with a live comparator in
/// [`crate::analyzers`]. The engine dispatches only to the latter but must
/// accept the former as valid `options.sections` filter input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    /// System-level settings.
    System,
    /// Firewall filter rules.
    Firewall,
    /// NAT configuration.
    Nat,
    /// Logical interfaces.
    Interfaces,
    /// VLANs.
    Vlans,
    /// DHCP scopes.
    Dhcp,
    /// DNS-related services (Unbound/DNSMasq).
    Dns,
    /// VPN services (OpenVPN/WireGuard).
    Vpn,
    /// Users and groups.
    Users,
    /// Routing configuration.
    Routing,
    /// Certificates (unimplemented comparator; valid filter target only).
    Certificates,
}

impl Section {
    /// Every section the taxonomy recognizes, in declaration order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::System,
            Self::Firewall,
            Self::Nat,
            Self::Interfaces,
            Self::Vlans,
            Self::Dhcp,
            Self::Dns,
            Self::Vpn,
            Self::Users,
            Self::Routing,
            Self::Certificates,
        ]
    }

    /// The sections with a live comparator in [`crate::analyzers`], in the
    /// order the engine dispatches to them.
    #[must_use]
    pub const fn implemented() -> &'static [Self] {
        &[
            Self::System,
            Self::Firewall,
            Self::Nat,
            Self::Interfaces,
            Self::Vlans,
            Self::Dhcp,
            Self::Users,
            Self::Routing,
        ]
    }

    /// Whether this section has a live comparator.
    #[must_use]
    pub fn is_implemented(self) -> bool {
        Self::implemented().contains(&self)
    }

    /// Parses a section name case-insensitively against [`Section::all`].
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|s| s.as_str().eq_ignore_ascii_case(name))
    }

    /// The canonical lower-case string form, matching `path` prefixes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Firewall => "firewall",
            Self::Nat => "nat",
            Self::Interfaces => "interfaces",
            Self::Vlans => "vlans",
            Self::Dhcp => "dhcp",
            Self::Dns => "dns",
            Self::Vpn => "vpn",
            Self::Users => "users",
            Self::Routing => "routing",
            Self::Certificates => "certificates",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Security impact classification assigned to a [`Change`] by a domain rule
/// (analyzer-authoritative) or the [`crate::risk::RiskScorer`] (pattern
/// fallback).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Impact {
    /// No classification yet.
    Unset,
    /// Low security impact.
    Low,
    /// Medium security impact.
    Medium,
    /// High security impact.
    High,
}

impl Impact {
    /// The aggregate scoring weight, per the risk-summary weighting table.
    #[must_use]
    pub const fn weight(self) -> u32 {
        match self {
            Self::Unset => 0,
            Self::Low => 1,
            Self::Medium => 5,
            Self::High => 10,
        }
    }

    /// Whether this impact is considered "set" (non-empty) for the purposes
    /// of `SecurityOnly` filtering.
    #[must_use]
    pub const fn is_set(self) -> bool {
        !matches!(self, Self::Unset)
    }

    /// The empty-string wire form used when serializing as `security-impact`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unset => "",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl Default for Impact {
    fn default() -> Self {
        Self::Unset
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for Impact {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Impact {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "high" => Self::High,
            "medium" => Self::Medium,
            "low" => Self::Low,
            _ => Self::Unset,
        })
    }
}

/// A single observed structural delta between two configurations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    /// The kind of delta.
    pub kind: ChangeKind,
    /// The section the change belongs to.
    pub section: Section,
    /// A stable dotted locator for the changed element.
    pub path: String,
    /// Human-readable description of what changed.
    pub description: String,
    /// The prior value, rendered for display (absent for `Added`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_value: Option<String>,
    /// The new value, rendered for display (absent for `Removed`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_value: Option<String>,
    /// Security impact, filled by a domain rule or the risk scorer.
    #[serde(default, skip_serializing_if = "impact_is_unset")]
    pub security_impact: Impact,
}

fn impact_is_unset(impact: &Impact) -> bool {
    !impact.is_set()
}

impl Change {
    /// Joins path segments with `.`, e.g. `dotted(&["system", "hostname"])`
    /// -> `"system.hostname"`.
    #[must_use]
    pub fn dotted(parts: &[&str]) -> String {
        parts.join(".")
    }

    /// Builds a firewall rule path of the form `filter.rule[uuid=<UUID>]`.
    ///
    /// Firewall rules live under the on-device `filter.rule` collection
    /// (the literal tag name), which is why this does not follow the
    /// `<section>.<collection>` convention used elsewhere.
    #[must_use]
    pub fn filter_rule_uuid_path(uuid: &str) -> String {
        format!("filter.rule[uuid={uuid}]")
    }

    /// Builds a firewall rule path of the form `filter.rule[<index>]`, used
    /// when the rule carries no UUID.
    #[must_use]
    pub fn filter_rule_positional_path(index: usize) -> String {
        format!("filter.rule[{index}]")
    }
}
