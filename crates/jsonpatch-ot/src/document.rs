//! Versioned documents.
//!
//! A [`Document`] is an immutable snapshot: a JSON tree, its version, and
//! the deltas applied to reach it. Applying a delta returns a new snapshot
//! with the rebased delta appended to the history.

use std::fmt;

use serde_json::Value;
use tracing::debug;

use crate::apply::{apply_op, PatchError};
use crate::delta::Delta;
use crate::diff::{diff_with, DiffOptions};
use crate::error::OtError;

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    source: Value,
    version: u64,
    applied_deltas: Vec<Delta>,
}

impl Document {
    /// A document at version 0 with an empty history.
    pub fn new(source: Value) -> Self {
        Self {
            source,
            version: 0,
            applied_deltas: Vec::new(),
        }
    }

    pub fn source(&self) -> &Value {
        &self.source
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn applied_deltas(&self) -> &[Delta] {
        &self.applied_deltas
    }

    /// Rebase `delta` onto this document and apply it.
    ///
    /// # Errors
    ///
    /// - [`OtError::UnknownBaseVersion`] if the delta claims a base newer than this document
    /// - [`OtError::TestFailed`] if a surviving `test` operation does not hold
    /// - [`OtError::Inconsistent`] if a rebased operation does not resolve
    pub fn transform(&self, delta: &Delta) -> Result<Document, OtError> {
        if delta.version() > self.version {
            return Err(OtError::UnknownBaseVersion {
                base: delta.version(),
                current: self.version,
            });
        }

        let transformed = delta.transform(self);
        let mut source = self.source.clone();
        for op in transformed.operations() {
            apply_op(&mut source, op).map_err(|err| match err {
                PatchError::Test => OtError::TestFailed {
                    path: op.path().clone(),
                },
                other => OtError::Inconsistent {
                    path: op.path().clone(),
                    source: other,
                },
            })?;
        }

        debug!(
            from = self.version,
            to = self.version + 1,
            operations = transformed.operations().len(),
            "applied delta"
        );

        let mut applied_deltas = self.applied_deltas.clone();
        applied_deltas.push(transformed);
        Ok(Document {
            source,
            version: self.version + 1,
            applied_deltas,
        })
    }

    /// The delta that turns this document into `target`.
    pub fn generate_patch(&self, target: &Value) -> Delta {
        self.generate_patch_with(target, &DiffOptions::default())
    }

    pub fn generate_patch_with(&self, target: &Value, options: &DiffOptions) -> Delta {
        Delta::new(self.version, diff_with(&self.source, target, options))
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}
