//! Error types for the diff/audit core.

use thiserror::Error;

/// Core error type returned from the public orchestration entry points
/// (`compare_configs`, `process_config`, `transform`, `to_format`).
#[derive(Error, Debug)]
pub enum CoreError {
    /// The caller's cancellation signal fired before or during the
    /// operation. Never recovered from; callers should treat the operation
    /// as not having happened.
    #[error("operation cancelled")]
    Cancelled,

    /// A required input was missing or a supplied option was invalid, e.g.
    /// a null configuration or an unsupported output format.
    #[error("invalid parameter: {0}")]
    Parameter(String),

    /// An internal invariant was violated; carries the panic message when
    /// the processor's panic-recovery boundary catches an analyzer panic.
    /// Unlike `Cancelled`/`Parameter` this is never surfaced from
    /// `process_config` directly — it becomes a critical finding instead —
    /// but remains available for callers assembling their own diagnostics.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Core result type.
pub type Result<T> = std::result::Result<T, CoreError>;
