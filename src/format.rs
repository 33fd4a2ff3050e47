//! The output-format enum shared by `Transform` (process reports) and
//! `ToFormat` (diff results).
//!
//! Output rendering itself is an external collaborator's concern (§6.2):
//! `Format::Markdown` always delegates to a caller-supplied formatter
//! closure, since terminal/markdown/HTML rendering is explicitly out of
//! scope for this crate. `Format::Json`/`Format::Yaml` are handled directly
//! here via `serde`, since their wire shape is fixed by the data model
//! (§6.4) and needs no external renderer.

use crate::error::{CoreError, Result};
use serde::Serialize;

/// A supported output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Caller-supplied markdown rendering; see [`transform`].
    Markdown,
    /// Direct `serde_json` serialization.
    Json,
    /// Direct `serde_yaml` serialization.
    Yaml,
}

impl Format {
    /// Parses a format name case-insensitively, for CLI-adjacent callers.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "markdown" | "md" => Some(Self::Markdown),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Renders `value` (a [`crate::report::Report`] or [`crate::engine::DiffResult`])
/// to `format`.
///
/// `Format::Json`/`Format::Yaml` are handled directly via `serde`.
/// `Format::Markdown` has no renderer inside the core — it delegates to
/// `markdown_renderer`, a caller-supplied formatter, and fails with
/// [`CoreError::Parameter`] if the caller passed `None` for it while
/// requesting markdown output.
pub fn render<T: Serialize>(
    value: &T,
    format: Format,
    markdown_renderer: Option<&dyn Fn(&T, Format) -> Result<String>>,
) -> Result<String> {
    match format {
        Format::Json => {
            serde_json::to_string_pretty(value).map_err(|e| CoreError::Parameter(e.to_string()))
        }
        Format::Yaml => {
            serde_yaml::to_string(value).map_err(|e| CoreError::Parameter(e.to_string()))
        }
        Format::Markdown => match markdown_renderer {
            Some(render_fn) => render_fn(value, format),
            None => Err(CoreError::Parameter(
                "markdown rendering requires a caller-supplied formatter".to_string(),
            )),
        },
    }
}
