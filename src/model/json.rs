//! JSON form of the element tree.
//!
//! This is the hand-off format between an external markdown parser and the
//! renderers when they do not share a process.

use super::ElementTree;
use crate::error::{Error, Result};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize a tree to JSON.
pub fn to_json(tree: &ElementTree, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(tree),
        JsonFormat::Compact => serde_json::to_string(tree),
    };

    result.map_err(|e| Error::Json(format!("serialization error: {}", e)))
}

/// Load a tree from JSON and validate it.
pub fn from_json(input: &str) -> Result<ElementTree> {
    let tree: ElementTree = serde_json::from_str(input)
        .map_err(|e| Error::Json(format!("invalid element tree: {}", e)))?;
    tree.validate()?;
    Ok(tree)
}
