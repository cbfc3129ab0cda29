//! Core logic behind the `json-patch-ot` binary.
//!
//! `json-patch-ot <base> <left> <right>` merges two concurrently edited
//! versions of a base document: both edits are diffed against the base,
//! the left delta is applied first and the right delta is rebased onto it.

use serde_json::Value;

use crate::document::Document;
use crate::error::OtError;

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum CliError {
    Json(serde_json::Error),
    Transform(OtError),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Json(e)      => write!(f, "{e}"),
            CliError::Transform(e) => write!(f, "{e}"),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self { CliError::Json(e) }
}

impl From<OtError> for CliError {
    fn from(e: OtError) -> Self { CliError::Transform(e) }
}

// ── json-patch-ot ─────────────────────────────────────────────────────────

/// Three-way merge: `left` is applied first, `right` is rebased onto it.
pub fn merge_documents(base: &Value, left: &Value, right: &Value) -> Result<Document, OtError> {
    let doc = Document::new(base.clone());
    let left_delta = doc.generate_patch(left);
    let right_delta = doc.generate_patch(right);
    doc.transform(&left_delta)?.transform(&right_delta)
}

/// Parse the three documents, merge them and return the compact JSON result.
pub fn merge(base: &str, left: &str, right: &str) -> Result<String, CliError> {
    let base: Value = serde_json::from_str(base)?;
    let left: Value = serde_json::from_str(left)?;
    let right: Value = serde_json::from_str(right)?;
    let merged = merge_documents(&base, &left, &right)?;
    Ok(serde_json::to_string(merged.source())?)
}
