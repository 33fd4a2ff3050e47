//! Dead-rule analyzer: unreachable rules behind a block-all, duplicate
//! rules under the rule-equivalence relation, and overly broad pass rules.

use super::finding;
use crate::model::{CommonDevice, FirewallRule};
use crate::report::{Finding, Severity};
use std::collections::BTreeMap;

pub(crate) fn analyze(cfg: &CommonDevice) -> Vec<Finding> {
    let mut findings = Vec::new();
    let by_interface = group_by_interface(&cfg.firewall_rules);

    for (iface, rules) in &by_interface {
        findings.extend(block_all_shadowing(iface, rules));
        findings.extend(duplicates(iface, rules));
    }

    for rule in &cfg.firewall_rules {
        if rule.is_permissive() && rule.description.is_empty() {
            findings.push(finding(
                Severity::High,
                "overly-broad-pass-rule",
                "Overly broad pass rule",
                format!(
                    "overly broad pass rule on {} has no description",
                    rule.joined_interfaces()
                ),
                "filter.rule",
            ));
        }
    }

    findings
}

/// A rule attached to multiple interfaces contributes to each interface's
/// group, preserving the rule's position in `cfg.firewall_rules` within
/// every group it joins.
fn group_by_interface<'a>(rules: &'a [FirewallRule]) -> BTreeMap<&'a str, Vec<&'a FirewallRule>> {
    let mut groups: BTreeMap<&str, Vec<&FirewallRule>> = BTreeMap::new();
    for rule in rules {
        for iface in &rule.interfaces {
            groups.entry(iface.as_str()).or_default().push(rule);
        }
    }
    groups
}

fn is_block_all(rule: &FirewallRule) -> bool {
    use crate::model::RuleType;
    rule.rule_type == RuleType::Block
        && rule.source.address.as_str().eq_ignore_ascii_case("any")
        && rule.destination.address.as_str().eq_ignore_ascii_case("any")
}

fn block_all_shadowing(iface: &str, rules: &[&FirewallRule]) -> Option<Finding> {
    let len = rules.len();
    let block_all_pos = rules.iter().position(|r| is_block_all(r))?;
    if block_all_pos >= len.saturating_sub(1) {
        return None;
    }
    Some(finding(
        Severity::Medium,
        "unreachable-rule",
        "Unreachable firewall rule(s)",
        format!(
            "block-all rule at position {} on interface {iface} makes rule(s) {}..{} unreachable",
            block_all_pos + 1,
            block_all_pos + 2,
            len,
        ),
        format!("filter.rule[interface={iface}]"),
    ))
}

fn duplicates(iface: &str, rules: &[&FirewallRule]) -> Vec<Finding> {
    let mut findings = Vec::new();
    for i in 0..rules.len() {
        for j in (i + 1)..rules.len() {
            if rules[i].is_equivalent_to(rules[j]) {
                findings.push(finding(
                    Severity::Low,
                    "duplicate-rule",
                    "Duplicate firewall rule",
                    format!(
                        "duplicate rule on interface {iface}: position {} duplicates position {}",
                        j + 1,
                        i + 1,
                    ),
                    format!("filter.rule[interface={iface}]"),
                ));
            }
        }
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AddressSpec, Endpoint, RuleType};
    use crate::testing::minimal_device;

    fn rule(iface: &str, rule_type: RuleType, description: &str) -> FirewallRule {
        FirewallRule {
            uuid: None,
            rule_type,
            interfaces: vec![iface.to_string()],
            protocol: "any".to_string(),
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
    fn block_all_shadows_later_rules() {
        let mut cfg = minimal_device("fw1");
        cfg.firewall_rules = vec![
            rule("lan", RuleType::Block, "deny all"),
            rule("lan", RuleType::Pass, "allow ssh"),
        ];
        let findings = analyze(&cfg);
        assert!(findings
            .iter()
            .any(|f| f.description.contains("unreachable") && f.severity == Severity::Medium));
    }

    #[test]
    fn block_all_as_last_rule_is_not_shadowing() {
        let mut cfg = minimal_device("fw1");
        cfg.firewall_rules = vec![
            rule("lan", RuleType::Pass, "allow ssh"),
            rule("lan", RuleType::Block, "deny all"),
        ];
        let findings = analyze(&cfg);
        assert!(!findings.iter().any(|f| f.description.contains("unreachable")));
    }

    #[test]
    fn duplicate_rules_flagged_low() {
        let mut cfg = minimal_device("fw1");
        cfg.firewall_rules = vec![
            rule("lan", RuleType::Pass, "first"),
            rule("lan", RuleType::Pass, "second"),
        ];
        let findings = analyze(&cfg);
        assert!(findings
            .iter()
            .any(|f| f.description.contains("duplicate") && f.severity == Severity::Low));
    }

    #[test]
    fn permissive_pass_rule_without_description_is_high() {
        let mut cfg = minimal_device("fw1");
        cfg.firewall_rules = vec![rule("wan", RuleType::Pass, "")];
        let findings = analyze(&cfg);
        assert!(findings
            .iter()
            .any(|f| f.description.contains("overly broad") && f.severity == Severity::High));
    }

    #[test]
    fn permissive_pass_rule_with_description_is_not_flagged() {
        let mut cfg = minimal_device("fw1");
        cfg.firewall_rules = vec![rule("wan", RuleType::Pass, "intentional")];
        let findings = analyze(&cfg);
        assert!(!findings.iter().any(|f| f.description.contains("overly broad")));
    }

    #[test]
    fn non_permissive_rule_uses_address_spec_value() {
        let mut r = rule("lan", RuleType::Pass, "");
        r.source = Endpoint {
            address: AddressSpec::Value("10.0.0.0/24".to_string()),
            port: "any".to_string(),
            negated: false,
        };
        let mut cfg = minimal_device("fw1");
        cfg.firewall_rules = vec![r];
        let findings = analyze(&cfg);
        assert!(!findings.iter().any(|f| f.description.contains("overly broad")));
    }
}
