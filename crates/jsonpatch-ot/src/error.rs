//! Error types for the operational transform engine.

use thiserror::Error;

use jsonpatch_ot_pointer::JsonPointerError;

use crate::apply::PatchError;
use crate::path::Path;

// ── Error ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq)]
pub enum OtError {
    /// The `op` member names an operation outside the JSON Patch set.
    #[error("UNKNOWN_OPERATION: {0}")]
    UnknownOperation(String),
    /// The wire object is malformed (missing or mistyped member).
    #[error("INVALID_OPERATION: {0}")]
    InvalidOperation(String),
    #[error("INVALID_POINTER: {0}")]
    InvalidPointer(#[from] JsonPointerError),
    #[error("NOT_REVERSIBLE: {0}")]
    NotReversible(&'static str),
    /// A transformed delta did not apply structurally. This means the
    /// transform rules produced an operation whose target cannot exist.
    #[error("INCONSISTENT: {source} at \"{path}\"")]
    Inconsistent { path: Path, source: PatchError },
    #[error("TEST_FAILED at \"{path}\"")]
    TestFailed { path: Path },
    #[error("UNKNOWN_BASE_VERSION: delta {base} is ahead of document {current}")]
    UnknownBaseVersion { base: u64, current: u64 },
}
