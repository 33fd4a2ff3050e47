//! Pattern-based security-risk classification and aggregation.

use crate::change::{Change, ChangeKind, Impact, Section};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// A single risk-scoring pattern.
///
/// A pattern matches a [`Change`] when every populated predicate matches;
/// unset predicates are wildcards. `section` and `change_kind` compare
/// case-insensitively (in practice this only matters for externally
/// constructed patterns, since [`Section`]/[`ChangeKind`] are already
/// normalized enums); `path_regex` is matched as a full-string match
/// against `change.path`.
#[derive(Clone)]
pub struct Pattern {
    /// Human-readable pattern name, used only for diagnostics.
    pub name: &'static str,
    /// Restrict to this section, if set.
    pub section: Option<Section>,
    /// Restrict to paths fully matching this regex, if set.
    pub path_regex: Option<Regex>,
    /// Restrict to this change kind, if set.
    pub change_kind: Option<ChangeKind>,
    /// Impact to assign when this pattern matches.
    pub impact: Impact,
}

impl Pattern {
    fn matches(&self, change: &Change) -> bool {
        if let Some(section) = self.section {
            if section != change.section {
                return false;
            }
        }
        if let Some(kind) = self.change_kind {
            if kind != change.kind {
                return false;
            }
        }
        if let Some(re) = &self.path_regex {
            if !full_match(re, &change.path) {
                return false;
            }
        }
        true
    }
}

fn full_match(re: &Regex, haystack: &str) -> bool {
    re.find(haystack)
        .is_some_and(|m| m.start() == 0 && m.end() == haystack.len())
}

fn anchored(pattern: &str) -> Regex {
    Regex::new(&format!("^(?:{pattern})$")).expect("built-in risk pattern regex must compile")
}

static WEBGUI_PROTOCOL: Lazy<Regex> = Lazy::new(|| anchored(r"system\.webgui\.protocol"));
static DNS_SERVER: Lazy<Regex> = Lazy::new(|| anchored(r"system\.dnsserver"));
static NAT_MODE: Lazy<Regex> = Lazy::new(|| anchored(r"nat\.outbound\.mode"));
static NAT_INBOUND: Lazy<Regex> = Lazy::new(|| anchored(r"nat\.inbound(?:\..*)?"));
static INTERFACE_ENABLE: Lazy<Regex> = Lazy::new(|| anchored(r".*\.enable"));

/// The built-in default pattern set described in the spec's risk-scorer
/// table, in priority order (order does not affect outcome since the
/// highest-matching impact always wins, but it matches the table's order
/// for readability).
fn default_patterns() -> Vec<Pattern> {
    vec![
        Pattern {
            name: "firewall-rule-removed",
            section: Some(Section::Firewall),
            path_regex: None,
            change_kind: Some(ChangeKind::Removed),
            impact: Impact::Medium,
        },
        Pattern {
            name: "firewall-rule-added",
            section: Some(Section::Firewall),
            path_regex: None,
            change_kind: Some(ChangeKind::Added),
            impact: Impact::Low,
        },
        Pattern {
            name: "webgui-protocol-change",
            section: Some(Section::System),
            path_regex: Some(WEBGUI_PROTOCOL.clone()),
            change_kind: None,
            impact: Impact::Medium,
        },
        Pattern {
            name: "dns-server-change",
            section: Some(Section::System),
            path_regex: Some(DNS_SERVER.clone()),
            change_kind: None,
            impact: Impact::Low,
        },
        Pattern {
            name: "nat-mode-change",
            section: Some(Section::Nat),
            path_regex: Some(NAT_MODE.clone()),
            change_kind: None,
            impact: Impact::Medium,
        },
        Pattern {
            name: "port-forward-change",
            section: Some(Section::Nat),
            path_regex: Some(NAT_INBOUND.clone()),
            change_kind: None,
            impact: Impact::Medium,
        },
        Pattern {
            name: "user-added",
            section: Some(Section::Users),
            path_regex: None,
            change_kind: Some(ChangeKind::Added),
            impact: Impact::Medium,
        },
        Pattern {
            name: "user-removed",
            section: Some(Section::Users),
            path_regex: None,
            change_kind: Some(ChangeKind::Removed),
            impact: Impact::Medium,
        },
        Pattern {
            name: "user-modified",
            section: Some(Section::Users),
            path_regex: None,
            change_kind: Some(ChangeKind::Modified),
            impact: Impact::Low,
        },
        Pattern {
            name: "interface-enable-change",
            section: Some(Section::Interfaces),
            path_regex: Some(INTERFACE_ENABLE.clone()),
            change_kind: None,
            impact: Impact::Medium,
        },
    ]
}

/// Pattern-based classifier for changes whose security impact an analyzer
/// did not already set authoritatively.
pub struct RiskScorer {
    patterns: Vec<Pattern>,
}

impl RiskScorer {
    /// Builds a scorer with the built-in default pattern set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            patterns: default_patterns(),
        }
    }

    /// Builds a scorer with a caller-supplied pattern set, replacing the
    /// defaults entirely.
    #[must_use]
    pub const fn with_patterns(patterns: Vec<Pattern>) -> Self {
        Self { patterns }
    }

    /// Returns the highest-impact pattern match for `change`, or
    /// [`Impact::Unset`] if nothing matches.
    #[must_use]
    pub fn classify(&self, change: &Change) -> Impact {
        let best = self
            .patterns
            .iter()
            .filter(|p| p.matches(change))
            .map(|p| p.impact)
            .max()
            .unwrap_or(Impact::Unset);
        trace!(path = %change.path, impact = %best, "risk scorer classification");
        best
    }

    /// Fills `security_impact` on `change` in place, per the rule: preserve
    /// any impact an analyzer already set; otherwise run the pattern set.
    pub fn fill(&self, change: &mut Change) {
        if !change.security_impact.is_set() {
            change.security_impact = self.classify(change);
        }
    }
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-impact counts accumulated over a set of changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactCounts {
    /// Count of high-impact changes.
    pub high: usize,
    /// Count of medium-impact changes.
    pub medium: usize,
    /// Count of low-impact changes.
    pub low: usize,
}

/// Aggregate risk assessment over an entire [`crate::Result`]'s changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskSummary {
    /// Weighted aggregate score: `10*high + 5*medium + 1*low`.
    pub score: u32,
    /// Per-impact counts.
    #[serde(flatten)]
    pub counts: ImpactCounts,
    /// Up to five changes picked by the tier-priority rule below.
    pub top_risks: Vec<Change>,
}

/// Computes the aggregate [`RiskSummary`] over an already-scored sequence
/// of changes.
///
/// Tier-priority rule for `top_risks`: include every high-impact change
/// first (in `changes`' traversal order); only once every high-impact
/// change has been collected, append medium-impact changes, and only if
/// the total high-impact count is zero — i.e. this is a categorical
/// either/or between the two tiers, not a running count, so a result is
/// never a mix of high and medium. Low-impact changes are never included.
/// Capped at five entries total.
#[must_use]
pub fn summarize(changes: &[Change]) -> RiskSummary {
    let mut counts = ImpactCounts::default();
    let mut score: u32 = 0;
    for change in changes {
        score += change.security_impact.weight();
        match change.security_impact {
            Impact::High => counts.high += 1,
            Impact::Medium => counts.medium += 1,
            Impact::Low => counts.low += 1,
            Impact::Unset => {}
        }
    }

    let mut top_risks: Vec<Change> = changes
        .iter()
        .filter(|c| c.security_impact == Impact::High)
        .take(5)
        .cloned()
        .collect();

    if counts.high == 0 {
        top_risks.extend(
            changes
                .iter()
                .filter(|c| c.security_impact == Impact::Medium)
                .take(5)
                .cloned(),
        );
    }

    RiskSummary {
        score,
        counts,
        top_risks,
    }
}
