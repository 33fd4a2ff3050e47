//! Section analyzers: one deterministic, identity-aware comparator per
//! implemented [`crate::change::Section`].
//!
//! Every analyzer returns its changes pre-sorted by the identity key named
//! in its own module; the engine in [`crate::engine`] never re-sorts.

mod dhcp;
mod firewall;
mod interfaces;
mod nat;
mod routing;
mod system;
mod users;
mod vlans;

pub(crate) use dhcp::analyze as analyze_dhcp;
pub(crate) use firewall::{analyze as analyze_firewall, FirewallOptions};
pub(crate) use interfaces::analyze as analyze_interfaces;
pub(crate) use nat::analyze as analyze_nat;
pub(crate) use routing::analyze as analyze_routing;
pub(crate) use system::analyze as analyze_system;
pub(crate) use users::analyze as analyze_users;
pub(crate) use vlans::analyze as analyze_vlans;

use crate::change::{Change, ChangeKind, Impact, Section};

/// Shorthand constructor used by every analyzer to keep call sites terse.
fn change(
    kind: ChangeKind,
    section: Section,
    path: impl Into<String>,
    description: impl Into<String>,
    old_value: Option<String>,
    new_value: Option<String>,
    security_impact: Impact,
) -> Change {
    Change {
        kind,
        section,
        path: path.into(),
        description: description.into(),
        old_value,
        new_value,
        security_impact,
    }
}
