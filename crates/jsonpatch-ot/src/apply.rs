//! JSON Patch apply.
//!
//! RFC 6902 semantics over `serde_json::Value`. The informational payloads
//! of `remove` and `replace` are not checked against the document.

use jsonpatch_ot_pointer::{get, get_mut, parse_index};
use serde_json::Value;
use thiserror::Error;

use crate::operation::Operation;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PatchError {
    #[error("NOT_FOUND")]
    NotFound,
    #[error("TEST")]
    Test,
    #[error("INVALID_INDEX")]
    InvalidIndex,
    #[error("INVALID_TARGET")]
    InvalidTarget,
}

// ── Individual operation applicators ─────────────────────────────────────

fn container_mut<'a>(doc: &'a mut Value, parent: &[String]) -> Result<&'a mut Value, PatchError> {
    get_mut(doc, parent).ok_or(PatchError::NotFound)
}

fn apply_add(doc: &mut Value, path: &[String], value: Value) -> Result<(), PatchError> {
    let Some((key, parent_path)) = path.split_last() else {
        *doc = value;
        return Ok(());
    };
    match container_mut(doc, parent_path)? {
        Value::Object(map) => {
            map.insert(key.clone(), value);
            Ok(())
        }
        Value::Array(arr) => {
            if key == "-" {
                arr.push(value);
                return Ok(());
            }
            let idx = parse_index(key).ok_or(PatchError::InvalidIndex)?;
            if idx > arr.len() {
                return Err(PatchError::InvalidIndex);
            }
            arr.insert(idx, value);
            Ok(())
        }
        _ => Err(PatchError::InvalidTarget),
    }
}

fn apply_remove(doc: &mut Value, path: &[String]) -> Result<Value, PatchError> {
    let (key, parent_path) = path.split_last().ok_or(PatchError::InvalidTarget)?;
    match container_mut(doc, parent_path)? {
        Value::Object(map) => map.shift_remove(key).ok_or(PatchError::NotFound),
        Value::Array(arr) => {
            let idx = parse_index(key).ok_or(PatchError::InvalidIndex)?;
            if idx >= arr.len() {
                return Err(PatchError::NotFound);
            }
            Ok(arr.remove(idx))
        }
        _ => Err(PatchError::InvalidTarget),
    }
}

fn apply_replace(doc: &mut Value, path: &[String], value: Value) -> Result<(), PatchError> {
    let target = get_mut(doc, path).ok_or(PatchError::NotFound)?;
    *target = value;
    Ok(())
}

fn apply_copy(doc: &mut Value, path: &[String], from: &[String]) -> Result<(), PatchError> {
    let src = get(doc, from).ok_or(PatchError::NotFound)?.clone();
    apply_add(doc, path, src)
}

fn apply_move(doc: &mut Value, path: &[String], from: &[String]) -> Result<(), PatchError> {
    if path == from {
        return get(doc, from).map(|_| ()).ok_or(PatchError::NotFound);
    }
    // A value cannot be moved into one of its own children.
    if path.len() > from.len() && path.starts_with(from) {
        return Err(PatchError::InvalidTarget);
    }
    let value = apply_remove(doc, from)?;
    apply_add(doc, path, value)
}

fn apply_test(doc: &Value, path: &[String], value: &Value) -> Result<(), PatchError> {
    match get(doc, path) {
        Some(actual) if actual == value => Ok(()),
        _ => Err(PatchError::Test),
    }
}

// ── Main apply function ───────────────────────────────────────────────────

/// Apply a single operation to the document in place.
pub fn apply_op(doc: &mut Value, op: &Operation) -> Result<(), PatchError> {
    match op {
        Operation::Add { path, value } => apply_add(doc, path.segments(), value.clone()),
        Operation::Remove { path, .. } => apply_remove(doc, path.segments()).map(|_| ()),
        Operation::Replace { path, value, .. } => apply_replace(doc, path.segments(), value.clone()),
        Operation::Copy { path, from } => apply_copy(doc, path.segments(), from.segments()),
        Operation::Move { path, from } => apply_move(doc, path.segments(), from.segments()),
        Operation::Test { path, value } => apply_test(doc, path.segments(), value),
    }
}

/// Apply a sequence of operations, returning the patched document.
///
/// The input is consumed; on error it is dropped along with any partial
/// result, so callers keep their own copy if they need to roll back.
pub fn apply_patch(mut doc: Value, ops: &[Operation]) -> Result<Value, PatchError> {
    for op in ops {
        apply_op(&mut doc, op)?;
    }
    Ok(doc)
}

// ── Tests ─────────────────────────────────────────────────────────────────
