//! Findings store and report assembly for the Configuration Processor.

use crate::model::{CommonDevice, DeviceType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::RwLock;

/// Finding severity, ordered least to most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl Default for Severity {
    /// The bucket a finding falls into is always set explicitly by its
    /// constructor; this only exists so `Finding`'s skipped `severity` field
    /// has somewhere to land when deserializing the wire format, which
    /// never carries it.
    fn default() -> Self {
        Self::Info
    }
}

/// A single audit finding, serialized per §3.4's stable wire format.
///
/// `severity` is the finding's bucket key in the store and in the report's
/// `findings{critical,high,medium,low,info}` grouping; it is not part of the
/// wire shape itself, so it is excluded from (de)serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    #[serde(skip)]
    pub severity: Severity,
    /// Finding category, e.g. `"dead-rule"` or `"insecure-webgui"`.
    #[serde(rename = "type")]
    pub finding_type: String,
    /// Short human-readable summary.
    pub title: String,
    /// Longer human-readable explanation.
    pub description: String,
    /// Path into the configuration this finding is about.
    pub component: String,
    /// Actionable follow-up, when the analyzer has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    /// External reference (advisory, documentation link), when applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl Finding {
    #[must_use]
    pub fn new(
        severity: Severity,
        finding_type: &str,
        title: impl Into<String>,
        description: impl Into<String>,
        component: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            finding_type: finding_type.to_string(),
            title: title.into(),
            description: description.into(),
            component: component.into(),
            recommendation: None,
            reference: None,
        }
    }

    #[must_use]
    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = Some(recommendation.into());
        self
    }

    #[must_use]
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}

/// The findings store: a single reader-writer lock around the whole
/// severity-bucketed aggregate. A concurrent append-list per bucket would
/// be overkill for the write volume a single `ProcessConfig` call produces.
#[derive(Default)]
pub struct FindingsStore {
    buckets: RwLock<BTreeMap<Severity, Vec<Finding>>>,
}

impl FindingsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one finding. Safe to call concurrently from independent
    /// audit analyzers running in parallel.
    pub fn push(&self, finding: Finding) {
        let mut buckets = self.buckets.write().expect("findings lock poisoned");
        buckets.entry(finding.severity).or_default().push(finding);
    }

    /// Appends every finding an analyzer produced in one call, under a
    /// single lock acquisition.
    pub fn extend(&self, findings: impl IntoIterator<Item = Finding>) {
        let mut buckets = self.buckets.write().expect("findings lock poisoned");
        for finding in findings {
            buckets.entry(finding.severity).or_default().push(finding);
        }
    }

    /// Total finding count across every severity.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets
            .read()
            .expect("findings lock poisoned")
            .values()
            .map(Vec::len)
            .sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flattens the store into a single vector, most severe first.
    #[must_use]
    pub fn into_sorted_vec(self) -> Vec<Finding> {
        let buckets = self.buckets.into_inner().expect("findings lock poisoned");
        buckets.into_values().rev().flatten().collect()
    }

    /// Buckets the store into the severity-keyed shape the report's
    /// `findings` field persists as, per §3.4.
    #[must_use]
    pub fn into_findings(self) -> Findings {
        let mut buckets = self.buckets.into_inner().expect("findings lock poisoned");
        Findings {
            critical: buckets.remove(&Severity::Critical).unwrap_or_default(),
            high: buckets.remove(&Severity::High).unwrap_or_default(),
            medium: buckets.remove(&Severity::Medium).unwrap_or_default(),
            low: buckets.remove(&Severity::Low).unwrap_or_default(),
            info: buckets.remove(&Severity::Info).unwrap_or_default(),
        }
    }
}

/// Findings grouped by severity bucket, the wire shape named in §3.4.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Findings {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub critical: Vec<Finding>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub high: Vec<Finding>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub medium: Vec<Finding>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub low: Vec<Finding>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub info: Vec<Finding>,
}

impl Findings {
    /// Total finding count across every bucket.
    #[must_use]
    pub fn total(&self) -> usize {
        self.critical.len() + self.high.len() + self.medium.len() + self.low.len() + self.info.len()
    }

    /// Iterates every finding, most severe bucket first.
    pub fn iter(&self) -> impl Iterator<Item = &Finding> {
        self.critical
            .iter()
            .chain(&self.high)
            .chain(&self.medium)
            .chain(&self.low)
            .chain(&self.info)
    }
}

/// Per-severity finding counts, kept alongside [`ConfigStatistics`] so a
/// caller doesn't need to re-derive severity distribution from `findings`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub info: usize,
}

/// Descriptive counts of the *normalized configuration itself* — how many
/// rules, interfaces, users, etc. it carries — plus the finding count the
/// audit passes produced. Distinct from the per-severity finding
/// distribution, which is always recoverable from `findings` directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigStatistics {
    pub firewall_rule_count: usize,
    pub enabled_firewall_rule_count: usize,
    pub disabled_firewall_rule_count: usize,
    pub interface_count: usize,
    pub enabled_interface_count: usize,
    pub vlan_count: usize,
    pub dhcp_scope_count: usize,
    pub nat_outbound_rule_count: usize,
    pub nat_inbound_rule_count: usize,
    pub user_count: usize,
    pub group_count: usize,
    pub finding_count: usize,
    pub severity_counts: SeverityCounts,
}

impl ConfigStatistics {
    /// Computes statistics from the already-normalized config and the
    /// findings the audit passes produced against it.
    #[must_use]
    pub fn compute(cfg: &CommonDevice, findings: &Findings) -> Self {
        let enabled_rules = cfg.firewall_rules.iter().filter(|r| !r.disabled).count();
        Self {
            firewall_rule_count: cfg.firewall_rules.len(),
            enabled_firewall_rule_count: enabled_rules,
            disabled_firewall_rule_count: cfg.firewall_rules.len() - enabled_rules,
            interface_count: cfg.interfaces.len(),
            enabled_interface_count: cfg.interfaces.values().filter(|i| i.enabled).count(),
            vlan_count: cfg.vlans.len(),
            dhcp_scope_count: cfg.dhcp_scopes.len(),
            nat_outbound_rule_count: cfg.nat.outbound_rules.len(),
            nat_inbound_rule_count: cfg.nat.inbound_rules.len(),
            user_count: cfg.users.len(),
            group_count: cfg.groups.len(),
            finding_count: findings.total(),
            severity_counts: SeverityCounts {
                critical: findings.critical.len(),
                high: findings.high.len(),
                medium: findings.medium.len(),
                low: findings.low.len(),
                info: findings.info.len(),
            },
        }
    }
}

/// Identity/summary information about the configuration that was processed,
/// carried through from the input `CommonDevice` (see §3.4 `configInfo`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigInfo {
    pub hostname: String,
    pub domain: String,
    pub device_type: DeviceType,
}

impl ConfigInfo {
    #[must_use]
    pub fn from_device(cfg: &CommonDevice) -> Self {
        Self {
            hostname: cfg.system.hostname.clone(),
            domain: cfg.system.domain.clone(),
            device_type: cfg.device_type.clone(),
        }
    }
}

/// Per-audit toggles for [`crate::process::process_config`], the options
/// surface named in spec §6.3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessorConfig {
    pub enable_stats: bool,
    pub enable_dead_rule_check: bool,
    pub enable_unused_interface_check: bool,
    pub enable_consistency_check: bool,
    pub enable_security_analysis: bool,
    pub enable_performance_analysis: bool,
    pub enable_compliance_check: bool,
    /// Firewall rule count above which the performance audit flags the
    /// configuration as large (medium finding). Default 500, per spec §4.6.
    pub performance_rule_threshold: usize,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            enable_stats: true,
            enable_dead_rule_check: true,
            enable_unused_interface_check: true,
            enable_consistency_check: true,
            enable_security_analysis: true,
            enable_performance_analysis: true,
            enable_compliance_check: true,
            performance_rule_threshold: 500,
        }
    }
}

/// The processor's final output (§3.4): a generated-at timestamp, identity
/// info about the processed config, the normalized config itself,
/// descriptive statistics, severity-bucketed findings, and the processor
/// options that produced this report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub config_info: ConfigInfo,
    pub normalized_config: CommonDevice,
    pub statistics: ConfigStatistics,
    pub findings: Findings,
    pub processor_config: ProcessorConfig,
}
