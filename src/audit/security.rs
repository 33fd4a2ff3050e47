//! Security audit: direct policy checks that are always critical/high
//! regardless of what changed, distinct from the diff engine's risk scorer
//! (which only classifies deltas between two snapshots).

use super::finding;
use crate::model::CommonDevice;
use crate::report::{Finding, Severity};

pub(crate) fn analyze(cfg: &CommonDevice) -> Vec<Finding> {
    let mut findings = Vec::new();
    findings.extend(insecure_webgui(cfg));
    findings.extend(default_snmp_community(cfg));
    findings.extend(permissive_wan_rules(cfg));
    findings
}

/// WebGUI protocol set but not `"https"` is critical: the management UI is
/// reachable over plaintext HTTP.
fn insecure_webgui(cfg: &CommonDevice) -> Vec<Finding> {
    if cfg.system.webgui.protocol.is_empty() || cfg.system.webgui.protocol == "https" {
        return Vec::new();
    }
    vec![finding(
        Severity::Critical,
        "insecure-webgui",
        "Insecure WebGUI protocol",
        format!(
            "WebGUI protocol is {:?}, not https",
            cfg.system.webgui.protocol
        ),
        "system.webgui.protocol",
    )
    .with_recommendation("switch the WebGUI protocol to https")]
}

/// SNMP read-only community string left at the well-known default.
fn default_snmp_community(cfg: &CommonDevice) -> Vec<Finding> {
    if cfg.services.snmp.ro_community != "public" {
        return Vec::new();
    }
    vec![finding(
        Severity::High,
        "default-snmp-community",
        "Default SNMP community string",
        "SNMP read-only community string is the default value \"public\"",
        "services.snmp.roCommunity",
    )
    .with_recommendation("set a unique, non-default SNMP community string")]
}

/// Any `pass` rule on the `wan` interface whose source is the wildcard
/// `"any"` exposes every service it permits to the entire internet.
fn permissive_wan_rules(cfg: &CommonDevice) -> Vec<Finding> {
    cfg.firewall_rules
        .iter()
        .enumerate()
        .filter(|(_, rule)| {
            rule.rule_type == crate::model::RuleType::Pass
                && rule.interfaces.iter().any(|i| i == "wan")
                && rule.source.address_is_any()
        })
        .map(|(i, rule)| {
            finding(
                Severity::High,
                "permissive-wan-rule",
                "Permissive WAN rule",
                format!(
                    "wan rule at position {} passes traffic from any source ({})",
                    i + 1,
                    if rule.description.is_empty() {
                        "no description"
                    } else {
                        rule.description.as_str()
                    }
                ),
                format!("filter.rule[{i}]"),
            )
            .with_recommendation("restrict the source to the specific networks that need access")
        })
        .collect()
}
