//! Compliance analyzer: baseline hygiene checks alongside the
//! security/performance audits. Gated by
//! [`crate::report::ProcessorConfig::enable_compliance_check`].

use super::finding;
use crate::model::CommonDevice;
use crate::report::{Finding, Severity};

pub(crate) fn analyze(cfg: &CommonDevice) -> Vec<Finding> {
    let mut findings = Vec::new();
    findings.extend(missing_ssh_group(cfg));
    findings.extend(disabled_admin_retains_group(cfg));
    findings.extend(rule_count_per_interface(cfg));
    findings
}

/// No explicit SSH access group configured while a `wan` interface exists:
/// management access control relies entirely on the WebGUI in that case.
fn missing_ssh_group(cfg: &CommonDevice) -> Vec<Finding> {
    let has_wan = cfg.interfaces.contains_key("wan");
    if !has_wan || !cfg.system.ssh.group.is_empty() {
        return Vec::new();
    }
    vec![finding(
        Severity::Low,
        "missing-ssh-group",
        "No SSH access group configured",
        "no SSH access group configured",
        "system.ssh.group",
    )
    .with_recommendation("restrict SSH access to a dedicated group")]
}

/// A disabled user that still belongs to an `admins`-named group (case-
/// insensitively) by convention.
fn disabled_admin_retains_group(cfg: &CommonDevice) -> Vec<Finding> {
    cfg.users
        .iter()
        .filter(|u| u.disabled && u.group_name.eq_ignore_ascii_case("admins"))
        .map(|u| {
            finding(
                Severity::Info,
                "disabled-user-retains-group",
                "Disabled user retains group membership",
                format!(
                    "disabled user {} retains membership in the {} group",
                    u.name, u.group_name
                ),
                format!("users.{}", u.name),
            )
            .with_recommendation("remove group membership when disabling an account")
        })
        .collect()
}

/// A documentation-aid summary finding per interface with at least one
/// firewall rule attached.
fn rule_count_per_interface(cfg: &CommonDevice) -> Vec<Finding> {
    use std::collections::BTreeMap;

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for rule in &cfg.firewall_rules {
        for iface in &rule.interfaces {
            *counts.entry(iface.as_str()).or_default() += 1;
        }
    }

    counts
        .into_iter()
        .map(|(iface, count)| {
            finding(
                Severity::Info,
                "interface-rule-count",
                "Interface rule count summary",
                format!("interface {iface} has {count} firewall rule(s) attached"),
                format!("interfaces.{iface}"),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Endpoint, FirewallRule, Interface, RuleType};
    use crate::testing::{admin_user, minimal_device};

    fn wan_interface() -> Interface {
        Interface {
            name: "wan".to_string(),
            physical_if: "igb0".to_string(),
            enabled: true,
            if_type: "dhcp".to_string(),
            ipv4_address: None,
            subnet_prefix: None,
            ipv6_address: None,
            description: String::new(),
            gateway: None,
            block_private: false,
            block_bogons: false,
        }
    }

    #[test]
    fn missing_ssh_group_with_wan_present_is_low() {
        let mut cfg = minimal_device("fw1");
        cfg.system.ssh.group = String::new();
        cfg.interfaces.insert("wan".to_string(), wan_interface());
        let findings = analyze(&cfg);
        assert!(findings
            .iter()
            .any(|f| f.severity == Severity::Low && f.description.contains("SSH access group")));
    }

    #[test]
    fn ssh_group_configured_is_not_flagged() {
        let mut cfg = minimal_device("fw1");
        cfg.interfaces.insert("wan".to_string(), wan_interface());
        let findings = analyze(&cfg);
        assert!(!findings.iter().any(|f| f.description.contains("SSH access group")));
    }

    #[test]
    fn disabled_admin_user_is_info() {
        let mut cfg = minimal_device("fw1");
        let mut user = admin_user("bob");
        user.disabled = true;
        cfg.users.push(user);
        let findings = analyze(&cfg);
        assert!(findings
            .iter()
            .any(|f| f.severity == Severity::Info && f.description.contains("retains membership")));
    }

    #[test]
    fn enabled_admin_user_is_not_flagged() {
        let mut cfg = minimal_device("fw1");
        cfg.users.push(admin_user("bob"));
        let findings = analyze(&cfg);
        assert!(!findings.iter().any(|f| f.description.contains("retains membership")));
    }

    #[test]
    fn rule_count_summary_emitted_per_interface() {
        let mut cfg = minimal_device("fw1");
        cfg.firewall_rules.push(FirewallRule {
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
        });
        let findings = analyze(&cfg);
        assert!(findings
            .iter()
            .any(|f| f.severity == Severity::Info && f.description.contains("lan has 1 firewall rule")));
    }
}
