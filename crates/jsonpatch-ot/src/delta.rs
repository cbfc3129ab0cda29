//! Versioned deltas.
//!
//! A [`Delta`] is an ordered list of operations tagged with the version of
//! the document it was computed against. Rebasing it onto a newer document
//! transforms it past every delta applied since that version.

use serde::de::{self, Deserialize, Deserializer};
use serde::{Serialize, Serializer};
use serde_json::Value;
use tracing::debug;

use crate::document::Document;
use crate::error::OtError;
use crate::operation::codec::{from_json_patch, to_json_patch};
use crate::operation::Operation;
use crate::transform::{drop_degenerate, expand_array_removals, filler_operations};

#[derive(Debug, Clone, PartialEq)]
pub struct Delta {
    version: u64,
    operations: Vec<Operation>,
}

impl Delta {
    pub fn new(version: u64, operations: Vec<Operation>) -> Self {
        Self { version, operations }
    }

    /// The document version this delta was computed against.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Operations of every delta in `document`'s history that this delta has
    /// not seen, in application order.
    pub fn applied_operations(&self, document: &Document) -> Vec<Operation> {
        document
            .applied_deltas()
            .iter()
            .filter(|delta| delta.version >= self.version)
            .flat_map(|delta| delta.operations.iter().cloned())
            .collect()
    }

    /// Rebase this delta onto `document`.
    ///
    /// Removals of whole arrays are split per element and degenerate entries
    /// are dropped. The result is tagged with `document`'s version and starts
    /// with the filler operations needed for its paths to resolve.
    pub fn transform(&self, document: &Document) -> Delta {
        let applied = self.applied_operations(document);
        let rebased = applied
            .iter()
            .fold(self.operations.clone(), |ops, accepted| accepted.transform(&ops));
        let expanded = expand_array_removals(&rebased, document.source());
        let kept = drop_degenerate(&expanded, document.source());
        let fillers = filler_operations(&kept, document.source());

        debug!(
            base = self.version,
            version = document.version(),
            applied = applied.len(),
            proposed = self.operations.len(),
            rebased = kept.len(),
            fillers = fillers.len(),
            "transformed delta"
        );

        Delta {
            version: document.version(),
            operations: fillers.into_iter().chain(kept).collect(),
        }
    }

    /// The delta that undoes this one when applied right after it.
    pub fn reverse(&self) -> Result<Delta, OtError> {
        let operations = self
            .operations
            .iter()
            .rev()
            .map(Operation::reverse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Delta {
            version: self.version + 1,
            operations,
        })
    }

    pub fn to_json(&self) -> Value {
        to_json_patch(&self.operations)
    }

    /// Parse a JSON array of wire operations computed against `version`.
    pub fn from_json(version: u64, value: &Value) -> Result<Delta, OtError> {
        Ok(Delta {
            version,
            operations: from_json_patch(value)?,
        })
    }
}

impl Serialize for Delta {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.operations.serialize(serializer)
    }
}

/// Deserializes a wire array as a delta against version 0.
impl<'de> Deserialize<'de> for Delta {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Delta::from_json(0, &value).map_err(de::Error::custom)
    }
}
