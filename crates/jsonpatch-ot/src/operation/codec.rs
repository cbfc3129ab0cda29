//! JSON wire codec for operations.
//!
//! ```text
//! {"op":"add","path":"<ptr>","value":<json>}
//! {"op":"remove","path":"<ptr>","value":<json>}
//! {"op":"replace","path":"<ptr>","value":<json>,"fromValue":<json>}
//! {"op":"move","path":"<ptr>","from":"<ptr>"}
//! {"op":"copy","path":"<ptr>","from":"<ptr>"}
//! {"op":"test","path":"<ptr>","value":<json>}
//! ```

use serde_json::{json, Map, Value};

use crate::error::OtError;
use crate::operation::{Operation, OperationKind};
use crate::path::Path;

// ── Member helpers ────────────────────────────────────────────────────────

fn decode_path(obj: &Map<String, Value>, member: &str) -> Result<Path, OtError> {
    let pointer = obj
        .get(member)
        .and_then(Value::as_str)
        .ok_or_else(|| OtError::InvalidOperation(format!("{member} must be a string")))?;
    Ok(Path::parse(pointer)?)
}

fn required(obj: &Map<String, Value>, member: &str, kind: OperationKind) -> Result<Value, OtError> {
    obj.get(member)
        .cloned()
        .ok_or_else(|| OtError::InvalidOperation(format!("{kind} requires {member}")))
}

/// Informational payloads decode as `null` when absent.
fn optional(obj: &Map<String, Value>, member: &str) -> Value {
    obj.get(member).cloned().unwrap_or(Value::Null)
}

// ── Serialization ─────────────────────────────────────────────────────────

pub fn to_json(op: &Operation) -> Value {
    match op {
        Operation::Add { path, value } => json!({
            "op": "add",
            "path": path.to_pointer(),
            "value": value
        }),
        Operation::Remove { path, value } => json!({
            "op": "remove",
            "path": path.to_pointer(),
            "value": value
        }),
        Operation::Replace {
            path,
            value,
            from_value,
        } => json!({
            "op": "replace",
            "path": path.to_pointer(),
            "value": value,
            "fromValue": from_value
        }),
        Operation::Move { path, from } => json!({
            "op": "move",
            "path": path.to_pointer(),
            "from": from.to_pointer()
        }),
        Operation::Copy { path, from } => json!({
            "op": "copy",
            "path": path.to_pointer(),
            "from": from.to_pointer()
        }),
        Operation::Test { path, value } => json!({
            "op": "test",
            "path": path.to_pointer(),
            "value": value
        }),
    }
}

pub fn to_json_patch(ops: &[Operation]) -> Value {
    Value::Array(ops.iter().map(to_json).collect())
}

// ── Deserialization ───────────────────────────────────────────────────────

pub fn from_json(v: &Value) -> Result<Operation, OtError> {
    let obj = v
        .as_object()
        .ok_or_else(|| OtError::InvalidOperation("operation must be an object".into()))?;
    let kind: OperationKind = obj
        .get("op")
        .and_then(Value::as_str)
        .ok_or_else(|| OtError::InvalidOperation("op must be a string".into()))?
        .parse()?;
    let path = decode_path(obj, "path")?;

    Ok(match kind {
        OperationKind::Add => Operation::Add {
            path,
            value: required(obj, "value", kind)?,
        },
        OperationKind::Remove => Operation::Remove {
            path,
            value: optional(obj, "value"),
        },
        OperationKind::Replace => Operation::Replace {
            path,
            value: required(obj, "value", kind)?,
            from_value: optional(obj, "fromValue"),
        },
        OperationKind::Move => Operation::Move {
            path,
            from: decode_path(obj, "from")?,
        },
        OperationKind::Copy => Operation::Copy {
            path,
            from: decode_path(obj, "from")?,
        },
        OperationKind::Test => Operation::Test {
            path,
            value: required(obj, "value", kind)?,
        },
    })
}

pub fn from_json_patch(v: &Value) -> Result<Vec<Operation>, OtError> {
    v.as_array()
        .ok_or_else(|| OtError::InvalidOperation("patch must be an array".into()))?
        .iter()
        .map(from_json)
        .collect()
}
