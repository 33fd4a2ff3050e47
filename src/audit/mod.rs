//! Audit analyzers: independent, idempotent passes over a normalized
//! [`crate::model::CommonDevice`], each producing a set of [`crate::report::Finding`]s.
//!
//! Every analyzer here is a pure function of its input; running them in any
//! order, or concurrently (see [`crate::process`]), produces the same
//! findings set.

mod compliance;
mod consistency;
mod dead_rule;
mod performance;
mod security;
mod unused_interface;

pub(crate) use compliance::analyze as analyze_compliance;
pub(crate) use consistency::analyze as analyze_consistency;
pub(crate) use dead_rule::analyze as analyze_dead_rule;
pub(crate) use performance::analyze_with_threshold as analyze_performance_with_threshold;
pub(crate) use security::analyze as analyze_security;
pub(crate) use unused_interface::analyze as analyze_unused_interface;

use crate::report::{Finding, Severity};

/// Shorthand constructor used by every audit analyzer to keep call sites terse.
fn finding(
    severity: Severity,
    finding_type: &str,
    title: impl Into<String>,
    description: impl Into<String>,
    component: impl Into<String>,
) -> Finding {
    Finding::new(severity, finding_type, title, description, component)
}
