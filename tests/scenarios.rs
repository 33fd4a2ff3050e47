//! End-to-end scenarios S1-S6 from spec §8, plus the targeted invariants
//! (5, 7, 8) that need specific fixtures rather than random generation.
//! Property-style invariants (1, 2, 3, 4, 6, 9) live in `tests/properties.rs`.

use fwcfg_diff::cancel::Cancellation;
use fwcfg_diff::change::{ChangeKind, Impact, Section};
use fwcfg_diff::engine::{compare_configs, CompareOptions};
use fwcfg_diff::model::{AddressSpec, Endpoint, FirewallRule, Interface, RuleType};
use fwcfg_diff::process::process_config;
use fwcfg_diff::report::{ProcessorConfig, Severity};
use fwcfg_diff::testing::minimal_device;

fn rule(uuid: Option<&str>, iface: &str, rule_type: RuleType, source: Endpoint, description: &str) -> FirewallRule {
    FirewallRule {
        uuid: uuid.map(str::to_string),
        rule_type,
        interfaces: vec![iface.to_string()],
        protocol: "any".to_string(),
        ip_protocol: "inet".to_string(),
        source,
        destination: Endpoint::any(),
        state_type: "keep state".to_string(),
        direction: "in".to_string(),
        quick: true,
        description: description.to_string(),
        disabled: false,
    }
}

fn interface(ipv4_address: &str) -> Interface {
    Interface {
        name: "wan".to_string(),
        physical_if: "igb0".to_string(),
        enabled: true,
        if_type: "staticv4".to_string(),
        ipv4_address: Some(ipv4_address.to_string()),
        subnet_prefix: Some(24),
        ipv6_address: None,
        description: String::new(),
        gateway: None,
        block_private: false,
        block_bogons: false,
    }
}

/// S1. Hostname change is a single modified change on `system.hostname`.
#[test]
fn s1_hostname_change() {
    let old = minimal_device("old-firewall");
    let new = minimal_device("new-firewall");
    let result =
        compare_configs(&old, &new, &CompareOptions::default(), &Cancellation::new()).unwrap();

    assert_eq!(result.changes.len(), 1);
    let change = &result.changes[0];
    assert_eq!(change.kind, ChangeKind::Modified);
    assert_eq!(change.path, "system.hostname");
    assert_eq!(change.old_value.as_deref(), Some("old-firewall"));
    assert_eq!(change.new_value.as_deref(), Some("new-firewall"));
    assert_eq!(result.summary.modified, 1);
}

/// S2. A permissive rule added from scratch is a single high-impact added change.
#[test]
fn s2_permissive_rule_added() {
    let old = minimal_device("fw1");
    let mut new = old.clone();
    new.firewall_rules
        .push(rule(Some("U1"), "wan", RuleType::Pass, Endpoint::any(), ""));

    let result =
        compare_configs(&old, &new, &CompareOptions::default(), &Cancellation::new()).unwrap();

    assert_eq!(result.changes.len(), 1);
    let change = &result.changes[0];
    assert_eq!(change.kind, ChangeKind::Added);
    assert_eq!(change.section, Section::Firewall);
    assert_eq!(change.path, "filter.rule[uuid=U1]");
    assert_eq!(change.security_impact, Impact::High);

    assert_eq!(result.risk.counts.high, 1);
    assert_eq!(result.risk.score, 10);
    assert_eq!(result.risk.top_risks.len(), 1);
    assert_eq!(result.risk.top_risks[0].security_impact, Impact::High);
}

/// S3. Reordering unchanged rules emits nothing with `detect_order=false`
/// and only reordered changes (no modified) with `detect_order=true`.
#[test]
fn s3_rule_reorder_without_content_change() {
    let mut cfg_old = minimal_device("fw1");
    let mut new = minimal_device("fw1");
    cfg_old.firewall_rules = vec![
        rule(Some("U1"), "lan", RuleType::Pass, Endpoint::any(), "a"),
        rule(Some("U2"), "lan", RuleType::Pass, Endpoint::any(), "b"),
        rule(Some("U3"), "lan", RuleType::Pass, Endpoint::any(), "c"),
    ];
    new.firewall_rules = vec![
        rule(Some("U3"), "lan", RuleType::Pass, Endpoint::any(), "c"),
        rule(Some("U1"), "lan", RuleType::Pass, Endpoint::any(), "a"),
        rule(Some("U2"), "lan", RuleType::Pass, Endpoint::any(), "b"),
    ];

    let without_order = compare_configs(
        &cfg_old,
        &new,
        &CompareOptions::default(),
        &Cancellation::new(),
    )
    .unwrap();
    assert!(without_order.changes.is_empty());

    let with_order = compare_configs(
        &cfg_old,
        &new,
        &CompareOptions {
            detect_order: true,
            ..CompareOptions::default()
        },
        &Cancellation::new(),
    )
    .unwrap();
    assert!(with_order.summary.reordered > 0);
    assert!(with_order
        .changes
        .iter()
        .all(|c| c.kind == ChangeKind::Reordered));
    assert!(!with_order
        .changes
        .iter()
        .any(|c| c.kind == ChangeKind::Modified));
}

/// S4. A reorder masked by a content change is reported as modified, not reordered.
#[test]
fn s4_reorder_masked_by_content_change() {
    let mut old = minimal_device("fw1");
    old.firewall_rules = vec![
        rule(Some("U1"), "lan", RuleType::Pass, Endpoint::any(), "a"),
        rule(Some("U2"), "lan", RuleType::Pass, Endpoint::any(), "b"),
    ];
    let mut new = minimal_device("fw1");
    new.firewall_rules = vec![
        rule(Some("U2"), "lan", RuleType::Pass, Endpoint::any(), "b-changed"),
        rule(Some("U1"), "lan", RuleType::Pass, Endpoint::any(), "a"),
    ];

    let result = compare_configs(
        &old,
        &new,
        &CompareOptions {
            detect_order: true,
            ..CompareOptions::default()
        },
        &Cancellation::new(),
    )
    .unwrap();

    assert_eq!(result.changes.len(), 1);
    assert_eq!(result.changes[0].kind, ChangeKind::Modified);
    assert_eq!(result.changes[0].path, "filter.rule[uuid=U2]");
}

/// S5. With `normalize=true`, an interface IP address change displays
/// canonical dotted-decimal values instead of the zero-padded on-device form.
#[test]
fn s5_normalize_display_of_interface_ips() {
    let mut old = minimal_device("fw1");
    old.interfaces
        .insert("wan".to_string(), interface("010.000.001.001"));
    let mut new = minimal_device("fw1");
    new.interfaces
        .insert("wan".to_string(), interface("010.000.001.002"));

    let result = compare_configs(
        &old,
        &new,
        &CompareOptions {
            normalize: true,
            ..CompareOptions::default()
        },
        &Cancellation::new(),
    )
    .unwrap();

    assert_eq!(result.changes.len(), 1);
    assert_eq!(result.changes[0].path, "interfaces.wan.ipAddress");
    assert_eq!(result.changes[0].old_value.as_deref(), Some("10.0.1.1"));
    assert_eq!(result.changes[0].new_value.as_deref(), Some("10.0.1.2"));
}

/// S6. Processing a config with a block-all rule shadowing a later pass
/// rule surfaces a medium dead-rule finding; an additional high finding
/// only appears when that pass rule also lacks a description and is
/// permissive (source/destination both wildcard).
#[test]
fn s6_process_finds_dead_rules() {
    let mut cfg = minimal_device("fw1");
    cfg.firewall_rules = vec![
        rule(None, "lan", RuleType::Block, Endpoint::any(), "deny all"),
        rule(
            None,
            "lan",
            RuleType::Pass,
            Endpoint {
                address: AddressSpec::Value("192.168.1.0/24".to_string()),
                port: "any".to_string(),
                negated: false,
            },
            "",
        ),
    ];

    let report = process_config(&cfg, &ProcessorConfig::default()).unwrap();

    assert!(report
        .findings
        .iter()
        .any(|f| f.finding_type == "unreachable-rule"
            && f.severity == Severity::Medium
            && f.description.contains("unreachable")));
    assert!(!report
        .findings
        .iter()
        .any(|f| f.description.contains("overly broad")));
}

/// S6 variant: the same shadowed pass rule, but now permissive and
/// undocumented, also trips the "overly broad pass rule" high finding.
#[test]
fn s6_variant_permissive_undocumented_pass_rule_is_also_high() {
    let mut cfg = minimal_device("fw1");
    cfg.firewall_rules = vec![
        rule(None, "lan", RuleType::Block, Endpoint::any(), "deny all"),
        rule(None, "lan", RuleType::Pass, Endpoint::any(), ""),
    ];

    let report = process_config(&cfg, &ProcessorConfig::default()).unwrap();

    assert!(report
        .findings
        .iter()
        .any(|f| f.finding_type == "unreachable-rule" && f.description.contains("unreachable")));
    assert!(report
        .findings
        .iter()
        .any(|f| f.severity == Severity::High && f.description.contains("overly broad")));
}

/// Invariant 5: every change carries a security-impact set by either its
/// analyzer or the scorer's highest-matching pattern (never silently left
/// unresolved for a pattern the scorer is known to cover).
#[test]
fn invariant5_scored_changes_have_a_resolved_impact() {
    let old = minimal_device("fw1");
    let mut new = old.clone();
    new.system.webgui.protocol = "http".to_string();

    let result =
        compare_configs(&old, &new, &CompareOptions::default(), &Cancellation::new()).unwrap();

    assert_eq!(result.changes.len(), 1);
    assert_eq!(result.changes[0].path, "system.webgui.protocol");
    assert!(result.changes[0].security_impact.is_set());
}

/// Invariant 7: with `security_only=true`, every surviving change has a
/// non-empty security-impact.
#[test]
fn invariant7_security_only_drops_unset_impact_changes() {
    let old = minimal_device("fw1");
    let mut new = old.clone();
    new.system.hostname = "renamed".to_string();
    new.system.webgui.protocol = "http".to_string();

    let result = compare_configs(
        &old,
        &new,
        &CompareOptions {
            security_only: true,
            ..CompareOptions::default()
        },
        &Cancellation::new(),
    )
    .unwrap();

    assert!(!result.changes.is_empty());
    assert!(result.changes.iter().all(|c| c.security_impact.is_set()));
    assert!(result
        .changes
        .iter()
        .all(|c| c.path != "system.hostname"));
}

/// Invariant 8: with `detect_order=true`, no path appears as both modified
/// and reordered in the same result.
#[test]
fn invariant8_detect_order_never_double_reports_a_path() {
    let mut old = minimal_device("fw1");
    old.firewall_rules = vec![
        rule(Some("U1"), "lan", RuleType::Pass, Endpoint::any(), "a"),
        rule(Some("U2"), "lan", RuleType::Pass, Endpoint::any(), "b"),
        rule(Some("U3"), "lan", RuleType::Pass, Endpoint::any(), "c"),
    ];
    let mut new = minimal_device("fw1");
    new.firewall_rules = vec![
        rule(Some("U3"), "lan", RuleType::Pass, Endpoint::any(), "c"),
        rule(Some("U2"), "lan", RuleType::Pass, Endpoint::any(), "b-changed"),
        rule(Some("U1"), "lan", RuleType::Pass, Endpoint::any(), "a"),
    ];

    let result = compare_configs(
        &old,
        &new,
        &CompareOptions {
            detect_order: true,
            ..CompareOptions::default()
        },
        &Cancellation::new(),
    )
    .unwrap();

    let modified_paths: Vec<&str> = result
        .changes
        .iter()
        .filter(|c| c.kind == ChangeKind::Modified)
        .map(|c| c.path.as_str())
        .collect();
    let reordered_paths: Vec<&str> = result
        .changes
        .iter()
        .filter(|c| c.kind == ChangeKind::Reordered)
        .map(|c| c.path.as_str())
        .collect();

    assert!(modified_paths
        .iter()
        .all(|p| !reordered_paths.contains(p)));
}
