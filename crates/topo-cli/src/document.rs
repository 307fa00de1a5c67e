//! # Case Document Loading
//!
//! Reads a case document as a generic JSON value. Files ending in `.yaml`
//! or `.yml` are parsed as YAML, everything else as JSON.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

/// Parse the document at `path` into a JSON value.
pub fn load_document(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    );
    let value = if is_yaml {
        serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse YAML in {}", path.display()))?
    } else {
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse JSON in {}", path.display()))?
    };

    tracing::debug!(path = %path.display(), yaml = is_yaml, "loaded case document");
    Ok(value)
}

/// Select the sub-document at a JSON pointer. The empty pointer selects
/// the whole document.
pub fn select<'a>(document: &'a Value, pointer: &str) -> Result<&'a Value> {
    document
        .pointer(pointer)
        .ok_or_else(|| anyhow::anyhow!("nothing at JSON pointer {pointer:?}"))
}
