//! The Diff Engine: single-pass, section-dispatched structural comparison.

use crate::analyzers::{self, FirewallOptions};
use crate::cancel::Cancellation;
use crate::change::{Change, ChangeKind, Section};
use crate::error::{CoreError, Result};
use crate::model::{CommonDevice, DeviceType};
use crate::risk::{self, RiskScorer, RiskSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Display hint passed through to an external formatter; not interpreted
/// by the core itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayMode {
    Unified,
    SideBySide,
}

impl Default for DisplayMode {
    fn default() -> Self {
        Self::Unified
    }
}

/// Options controlling a single [`compare_configs`] call.
#[derive(Debug, Clone, Default)]
pub struct CompareOptions {
    /// Case-insensitive allow-list of section names; empty means all
    /// implemented sections.
    pub sections: Vec<Section>,
    /// Drop changes whose security impact is still unset after scoring.
    pub security_only: bool,
    /// Canonicalize displayed IP/CIDR values (old/new value strings only).
    pub normalize: bool,
    /// Emit `reordered` changes for firewall rules whose content is
    /// unchanged but position moved.
    pub detect_order: bool,
    /// Display hint for an external formatter.
    pub mode: DisplayMode,
}

/// Per-kind change counts, accumulated as the engine runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
    pub reordered: usize,
    pub total: usize,
}

impl ChangeSummary {
    fn record(&mut self, kind: ChangeKind) {
        match kind {
            ChangeKind::Added => self.added += 1,
            ChangeKind::Removed => self.removed += 1,
            ChangeKind::Modified => self.modified += 1,
            ChangeKind::Reordered => self.reordered += 1,
        }
        self.total += 1;
    }
}

/// The old/new device identity pair carried through from the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceTypePair {
    pub old: DeviceType,
    pub new: DeviceType,
}

/// The full output of a [`compare_configs`] call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffResult {
    pub compared_at: DateTime<Utc>,
    pub tool_version: String,
    pub device_type: DeviceTypePair,
    pub changes: Vec<Change>,
    pub summary: ChangeSummary,
    pub risk: RiskSummary,
}

/// Compares `old` against `new` and produces an ordered, scored sequence of
/// structural changes.
///
/// Checks `cancel` once before any work begins; a signal already set at
/// call time fails fast with [`CoreError::Cancelled`] rather than returning
/// a partial result.
pub fn compare_configs(
    old: &CommonDevice,
    new: &CommonDevice,
    options: &CompareOptions,
    cancel: &Cancellation,
) -> Result<DiffResult> {
    if cancel.is_cancelled() {
        return Err(CoreError::Cancelled);
    }

    info!("comparing configurations");
    let scorer = RiskScorer::new();
    let mut changes = Vec::new();
    let mut summary = ChangeSummary::default();

    for section in Section::implemented() {
        if !section_selected(*section, &options.sections) {
            continue;
        }
        debug!(section = %section, "dispatching section analyzer");
        let mut section_changes = dispatch(*section, old, new, options);

        for change in &mut section_changes {
            scorer.fill(change);
        }

        if options.security_only {
            section_changes.retain(|c| c.security_impact.is_set());
        }

        for change in &section_changes {
            summary.record(change.kind);
        }

        changes.extend(section_changes);
    }

    warn_unimplemented_requested_sections(&options.sections);

    let risk = risk::summarize(&changes);

    Ok(DiffResult {
        compared_at: Utc::now(),
        tool_version: TOOL_VERSION.to_string(),
        device_type: DeviceTypePair {
            old: old.device_type.clone(),
            new: new.device_type.clone(),
        },
        changes,
        summary,
        risk,
    })
}

fn section_selected(section: Section, allow_list: &[Section]) -> bool {
    allow_list.is_empty() || allow_list.contains(&section)
}

fn warn_unimplemented_requested_sections(allow_list: &[Section]) {
    for section in allow_list {
        if !section.is_implemented() {
            warn!(section = %section, "requested section has no comparator; skipping");
        }
    }
}

fn dispatch(section: Section, old: &CommonDevice, new: &CommonDevice, options: &CompareOptions) -> Vec<Change> {
    match section {
        Section::System => analyzers::analyze_system(&old.system, &new.system),
        Section::Firewall => analyzers::analyze_firewall(
            &old.firewall_rules,
            &new.firewall_rules,
            FirewallOptions {
                detect_order: options.detect_order,
                normalize_display: options.normalize,
            },
        ),
        Section::Nat => analyzers::analyze_nat(&old.nat, &new.nat),
        Section::Interfaces => {
            analyzers::analyze_interfaces(&old.interfaces, &new.interfaces, options.normalize)
        }
        Section::Vlans => analyzers::analyze_vlans(&old.vlans, &new.vlans),
        Section::Dhcp => analyzers::analyze_dhcp(&old.dhcp_scopes, &new.dhcp_scopes),
        Section::Users => {
            analyzers::analyze_users(&old.users, &new.users, &old.groups, &new.groups)
        }
        Section::Routing => analyzers::analyze_routing(&old.routing, &new.routing),
        Section::Dns | Section::Vpn | Section::Certificates => Vec::new(),
    }
}
