//! Performance audit: flags configuration choices that are likely to cost
//! throughput or that indicate a ruleset has grown past what one should
//! maintain by hand.

use super::finding;
use crate::model::CommonDevice;
use crate::report::{Finding, Severity};

/// Firewall rule count above which the ruleset is flagged as large, per
/// spec §4.6 (default 500). Overridden per call via
/// [`crate::report::ProcessorConfig::performance_rule_threshold`].
pub(crate) const DEFAULT_RULE_THRESHOLD: usize = 500;

/// Runs the performance audit with a caller-supplied rule-count threshold.
pub(crate) fn analyze_with_threshold(cfg: &CommonDevice, threshold: usize) -> Vec<Finding> {
    let mut findings = Vec::new();

    if cfg.system.hardware_offload.disable_checksum_offloading {
        findings.push(finding(
            Severity::Low,
            "disabled-checksum-offload",
            "Checksum offloading disabled",
            "checksum offloading is disabled, increasing CPU load on high-throughput interfaces",
            "system.hardwareOffload.disableChecksumOffloading",
        ));
    }

    if cfg.system.hardware_offload.disable_segmentation_offloading {
        findings.push(finding(
            Severity::Low,
            "disabled-segmentation-offload",
            "Segmentation offloading disabled",
            "TCP segmentation offloading is disabled, increasing CPU load on high-throughput interfaces",
            "system.hardwareOffload.disableSegmentationOffloading",
        ));
    }

    if cfg.firewall_rules.len() > threshold {
        findings.push(
            finding(
                Severity::Medium,
                "large-ruleset",
                "Firewall ruleset exceeds size threshold",
                format!(
                    "firewall ruleset has {} rules, above the {threshold}-rule threshold",
                    cfg.firewall_rules.len()
                ),
                "filter.rule",
            )
            .with_recommendation("consolidate rules or move repeated patterns into aliases"),
        );
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Endpoint, FirewallRule, RuleType};
    use crate::testing::minimal_device;

    #[test]
    fn disabled_checksum_offload_is_low() {
        let mut cfg = minimal_device("fw1");
        cfg.system.hardware_offload.disable_checksum_offloading = true;
        let findings = analyze_with_threshold(&cfg, DEFAULT_RULE_THRESHOLD);
        assert!(findings
            .iter()
            .any(|f| f.severity == Severity::Low && f.description.contains("checksum")));
    }

    #[test]
    fn disabled_segmentation_offload_is_low() {
        let mut cfg = minimal_device("fw1");
        cfg.system.hardware_offload.disable_segmentation_offloading = true;
        let findings = analyze_with_threshold(&cfg, DEFAULT_RULE_THRESHOLD);
        assert!(findings
            .iter()
            .any(|f| f.severity == Severity::Low && f.description.contains("segmentation")));
    }

    #[test]
    fn neither_offload_flag_set_produces_no_offload_findings() {
        let cfg = minimal_device("fw1");
        let findings = analyze_with_threshold(&cfg, DEFAULT_RULE_THRESHOLD);
        assert!(!findings.iter().any(|f| f.description.contains("offload")));
    }

    fn dummy_rule() -> FirewallRule {
        FirewallRule {
            uuid: None,
            rule_type: RuleType::Pass,
            interfaces: vec!["lan".to_string()],
            protocol: "any".to_string(),
            ip_protocol: "inet".to_string(),
            source: Endpoint::any(),
            destination: Endpoint::any(),
            state_type: "keep state".to_string(),
            direction: "in".to_string(),
            quick: true,
            description: String::new(),
            disabled: false,
        }
    }

    #[test]
    fn rule_count_above_threshold_is_medium() {
        let mut cfg = minimal_device("fw1");
        cfg.firewall_rules = (0..5).map(|_| dummy_rule()).collect();
        let findings = analyze_with_threshold(&cfg, 3);
        assert!(findings
            .iter()
            .any(|f| f.severity == Severity::Medium && f.description.contains("threshold")));
    }

    #[test]
    fn rule_count_at_or_below_threshold_is_not_flagged() {
        let mut cfg = minimal_device("fw1");
        cfg.firewall_rules = (0..3).map(|_| dummy_rule()).collect();
        let findings = analyze_with_threshold(&cfg, 3);
        assert!(!findings.iter().any(|f| f.description.contains("threshold")));
    }
}
