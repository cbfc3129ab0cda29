//! The closed set of JSON Patch operations the engine reasons about.
//!
//! Every operation carries enough payload to be undone: a `remove` keeps the
//! value it removed and a `replace` keeps the value it overwrote.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserialize, Deserializer};
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::OtError;
use crate::path::Path;
use crate::transform;

pub mod codec;

// ── Kind ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Add,
    Remove,
    Replace,
    Move,
    Copy,
    Test,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Add => "add",
            OperationKind::Remove => "remove",
            OperationKind::Replace => "replace",
            OperationKind::Move => "move",
            OperationKind::Copy => "copy",
            OperationKind::Test => "test",
        }
    }
}

impl FromStr for OperationKind {
    type Err = OtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(OperationKind::Add),
            "remove" => Ok(OperationKind::Remove),
            "replace" => Ok(OperationKind::Replace),
            "move" => Ok(OperationKind::Move),
            "copy" => Ok(OperationKind::Copy),
            "test" => Ok(OperationKind::Test),
            other => Err(OtError::UnknownOperation(other.to_string())),
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Operation ─────────────────────────────────────────────────────────────

/// A single JSON Patch operation.
///
/// Equality is structural: two operations are equal when kind, path and
/// payload all match.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Add {
        path: Path,
        value: Value,
    },
    /// `value` is the value being removed.
    Remove {
        path: Path,
        value: Value,
    },
    /// `from_value` is the value being overwritten.
    Replace {
        path: Path,
        value: Value,
        from_value: Value,
    },
    Move {
        path: Path,
        from: Path,
    },
    Copy {
        path: Path,
        from: Path,
    },
    Test {
        path: Path,
        value: Value,
    },
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Add { .. } => OperationKind::Add,
            Operation::Remove { .. } => OperationKind::Remove,
            Operation::Replace { .. } => OperationKind::Replace,
            Operation::Move { .. } => OperationKind::Move,
            Operation::Copy { .. } => OperationKind::Copy,
            Operation::Test { .. } => OperationKind::Test,
        }
    }

    /// The target path.
    pub fn path(&self) -> &Path {
        match self {
            Operation::Add { path, .. }
            | Operation::Remove { path, .. }
            | Operation::Replace { path, .. }
            | Operation::Move { path, .. }
            | Operation::Copy { path, .. }
            | Operation::Test { path, .. } => path,
        }
    }

    /// The source path of a `move` or `copy`.
    pub fn from(&self) -> Option<&Path> {
        match self {
            Operation::Move { from, .. } | Operation::Copy { from, .. } => Some(from),
            _ => None,
        }
    }

    /// The value payload, if the kind carries one.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Operation::Add { value, .. }
            | Operation::Remove { value, .. }
            | Operation::Replace { value, .. }
            | Operation::Test { value, .. } => Some(value),
            Operation::Move { .. } | Operation::Copy { .. } => None,
        }
    }

    /// Rebuild the operation with a different target path.
    pub fn with_path(&self, path: Path) -> Operation {
        let mut op = self.clone();
        match &mut op {
            Operation::Add { path: p, .. }
            | Operation::Remove { path: p, .. }
            | Operation::Replace { path: p, .. }
            | Operation::Move { path: p, .. }
            | Operation::Copy { path: p, .. }
            | Operation::Test { path: p, .. } => *p = path,
        }
        op
    }

    /// Rebuild the operation with `f` applied to its target path and, for
    /// `move`/`copy`, to its source path.
    pub fn map_paths(&self, f: impl Fn(&Path) -> Path) -> Operation {
        match self {
            Operation::Move { path, from } => Operation::Move {
                path: f(path),
                from: f(from),
            },
            Operation::Copy { path, from } => Operation::Copy {
                path: f(path),
                from: f(from),
            },
            op => op.with_path(f(op.path())),
        }
    }

    /// The operation that undoes this one.
    ///
    /// # Errors
    ///
    /// `test` asserts and changes nothing, and `copy` does not carry the
    /// copied value, so neither can be reversed.
    pub fn reverse(&self) -> Result<Operation, OtError> {
        match self {
            Operation::Add { path, value } => Ok(Operation::Remove {
                path: path.clone(),
                value: value.clone(),
            }),
            Operation::Remove { path, value } => Ok(Operation::Add {
                path: path.clone(),
                value: value.clone(),
            }),
            Operation::Replace {
                path,
                value,
                from_value,
            } => Ok(Operation::Replace {
                path: path.clone(),
                value: from_value.clone(),
                from_value: value.clone(),
            }),
            Operation::Move { path, from } => Ok(Operation::Move {
                path: from.clone(),
                from: path.clone(),
            }),
            Operation::Copy { .. } | Operation::Test { .. } => {
                Err(OtError::NotReversible(self.kind().as_str()))
            }
        }
    }

    /// Rewrite `candidates`, which were produced concurrently with `self`,
    /// so that they can be applied after `self` has been applied.
    ///
    /// The input is not modified; relative order of surviving candidates is
    /// preserved.
    pub fn transform(&self, candidates: &[Operation]) -> Vec<Operation> {
        transform::rebase(self, candidates)
    }

    /// Parse a wire object such as `{"op":"add","path":"/a","value":1}`.
    pub fn create(value: &Value) -> Result<Operation, OtError> {
        codec::from_json(value)
    }

    pub fn to_json(&self) -> Value {
        codec::to_json(self)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl Serialize for Operation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Operation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Operation::create(&value).map_err(de::Error::custom)
    }
}
