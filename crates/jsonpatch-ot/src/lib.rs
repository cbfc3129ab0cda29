//! jsonpatch-ot: operational transformation for JSON Patch deltas.
//!
//! Two replicas of a document that diverge through concurrent edits can
//! exchange their edits as [`Delta`]s. Each replica rebases the incoming
//! delta past the deltas it has already applied, and both converge on the
//! same tree whenever the edits are compatible.
//!
//! ```
//! use jsonpatch_ot::Document;
//! use serde_json::json;
//!
//! let base = Document::new(json!({"a": [1, 2, 3]}));
//! let left = base.generate_patch(&json!({"a": [1, 3]}));
//! let right = base.generate_patch(&json!({"a": [1, 2, 30]}));
//!
//! let one = base.transform(&left).unwrap().transform(&right).unwrap();
//! let two = base.transform(&right).unwrap().transform(&left).unwrap();
//! assert_eq!(one.source(), &json!({"a": [1, 30]}));
//! assert_eq!(one.source(), two.source());
//! ```

pub mod apply;
pub mod cli;
pub mod delta;
pub mod diff;
pub mod document;
pub mod error;
pub mod operation;
pub mod path;
pub mod transform;

pub use apply::{apply_op, apply_patch, PatchError};
pub use delta::Delta;
pub use diff::{diff, diff_with, DiffOptions};
pub use document::Document;
pub use error::OtError;
pub use operation::{Operation, OperationKind};
pub use path::Path;
pub use transform::{filler_operations, fillers_for, transform};
