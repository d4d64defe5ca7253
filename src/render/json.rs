//! JSON rendering for outlines.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::Outline;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert an outline to JSON.
pub fn to_json(outline: &Outline, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(outline),
        JsonFormat::Compact => serde_json::to_string(outline),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Render an outline and write it to `path` as UTF-8.
pub fn write_json(outline: &Outline, path: impl AsRef<Path>, format: JsonFormat) -> Result<()> {
    let path = path.as_ref();
    let mut json = to_json(outline, format)?;
    json.push('\n');
    fs::write(path, json).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}
