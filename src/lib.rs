//! Structural diff and audit engine for network-firewall device configurations.
//!
//! This crate compares two snapshots of a [`model::CommonDevice`] and
//! produces an ordered, scored sequence of [`change::Change`]s (the **Diff
//! Engine**, [`engine::compare_configs`]), and separately normalizes and
//! audits a single configuration into a [`report::Report`] (the
//! **Configuration Processor**, [`process::process_config`]).
//!
//! The parser that produces a [`model::CommonDevice`] from an on-device XML
//! export, and the formatters that render a [`engine::DiffResult`] or
//! [`report::Report`] to markdown/terminal/HTML, are out of scope for this
//! crate — it consumes and produces plain data, never touching I/O.
//!
//! # Quick start
//!
//! ```rust
//! use fwcfg_diff::{engine, cancel::Cancellation};
//!
//! # let old = fwcfg_diff::testing::minimal_device("fw1");
//! # let new = fwcfg_diff::testing::minimal_device("fw2");
//! let result = engine::compare_configs(
//!     &old,
//!     &new,
//!     &engine::CompareOptions::default(),
//!     &Cancellation::new(),
//! )
//! .expect("comparison should not be cancelled");
//! println!("{} changes, risk score {}", result.summary.total, result.risk.score);
//! ```
//!
//! # Architecture
//!
//! - [`model`] — the Common Device domain model shared by both subsystems.
//! - [`change`] — change taxonomy: kinds, sections, security impact.
//! - [`risk`] — pattern-based security-risk classification and aggregation.
//! - [`analyzers`] — one deterministic comparator per implemented section.
//! - [`engine`] — section dispatch, filtering, ordering, the Diff Engine.
//! - [`normalize`] — default-filling, address canonicalization, sorting.
//! - [`audit`] — dead-rule, unused-interface, consistency, security,
//!   performance, and compliance analyzers.
//! - [`report`] — the findings store and the Configuration Processor's report shape.
//! - [`process`] — the Configuration Processor's orchestration entry point.
//! - [`error`] — the core's typed error kinds.
//! - [`cancel`] — the cooperative cancellation token.
//! - [`format`] — the output-format enum shared by `Transform`/`ToFormat`.

pub mod analyzers;
pub mod audit;
pub mod cancel;
pub mod change;
pub mod engine;
pub mod error;
pub mod format;
pub mod model;
pub mod normalize;
pub mod process;
pub mod report;
pub mod risk;

pub mod testing;

pub use error::{CoreError, Result};

/// Re-exports of the types most callers need, mirroring the shape of
/// [`engine::compare_configs`] and [`process::process_config`]'s public
/// signatures.
pub mod prelude {
    pub use crate::cancel::Cancellation;
    pub use crate::change::{Change, ChangeKind, Impact, Section};
    pub use crate::engine::{compare_configs, CompareOptions, DiffResult};
    pub use crate::error::{CoreError, Result};
    pub use crate::format::Format;
    pub use crate::model::CommonDevice;
    pub use crate::process::process_config;
    pub use crate::report::{ProcessorConfig, Report};
}
