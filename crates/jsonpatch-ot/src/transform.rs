//! Operational transformation for JSON Patch operations.
//!
//! `transform(accepted, proposed)` rewrites a list of *proposed* operations so
//! that they can be applied after the *accepted* operations have already been
//! applied. Each accepted operation rewrites the list in turn; the per-kind
//! rules live in the `x_*` functions below.
//!
//! A proposed list is a sequence: each operation was computed against the
//! state left by the ones before it. While an accepted operation walks the
//! list, it is itself rebased past every proposed operation, so that later
//! entries are compared against its effect in their own coordinates.
//!
//! This module also synthesizes filler operations for missing intermediate
//! containers and drops degenerate entries left over from the diff.

use jsonpatch_ot_pointer::{exists, get, is_valid_index};
use serde_json::Value;
use tracing::trace;

use crate::apply::apply_op;
use crate::operation::Operation;
use crate::path::Path;

// ── Path helpers ──────────────────────────────────────────────────────────

fn is_container(value: &Value) -> bool {
    value.is_object() || value.is_array()
}

fn shift_up(op: &Operation, inserted: &Path) -> Operation {
    op.map_paths(|p| p.replace_path_indices(inserted, true))
}

fn shift_down(op: &Operation, removed: &Path) -> Operation {
    op.map_paths(|p| p.replace_path_indices(removed, false))
}

/// Paths inside the moved subtree follow it; everything else sees a removal
/// at `from` followed by an insertion at `to`.
fn moved(path: &Path, from: &Path, to: &Path) -> Path {
    match path.rebase(from, to) {
        Some(rerooted) => rerooted,
        None => path
            .replace_path_indices(from, false)
            .replace_path_indices(to, true),
    }
}

/// True when `op` inserts a new element at exactly the array element `path`.
fn inserts_element_at(op: &Operation, path: &Path) -> bool {
    path.is_array_element()
        && op.path() == path
        && matches!(
            op,
            Operation::Add { .. } | Operation::Move { .. } | Operation::Copy { .. }
        )
}

// ── Proposed operation against an accepted one ────────────────────────────

/// Proposed `op` after an accepted `add` of `added` at `add_path`.
fn x_add(add_path: &Path, added: &Value, op: &Operation) -> Option<Operation> {
    if let Operation::Add { path, value } = op {
        if path == add_path && value == added {
            return None;
        }
    }
    if add_path.is_array_element() {
        return Some(shift_up(op, add_path));
    }
    // Nothing can be addressed below a scalar.
    if !is_container(added) && add_path.is_ancestor_of(op.path()) {
        return None;
    }
    match op {
        Operation::Add { path, value } if path == add_path => Some(Operation::Replace {
            path: path.clone(),
            value: value.clone(),
            from_value: added.clone(),
        }),
        _ => Some(op.clone()),
    }
}

/// Proposed `op` after an accepted `remove` at `rem_path`.
fn x_remove(rem_path: &Path, op: &Operation) -> Option<Operation> {
    if op.from().is_some_and(|from| from.intersects(rem_path)) {
        return None;
    }
    if op.path() == rem_path {
        return match op {
            Operation::Replace { path, value, .. } => Some(Operation::Add {
                path: path.clone(),
                value: value.clone(),
            }),
            Operation::Remove { .. } => None,
            // add, test, move and copy recreate or assert the removed target
            _ => Some(op.clone()),
        };
    }
    if op.path().intersects(rem_path) {
        return None;
    }
    if rem_path.is_array_element() {
        return Some(shift_down(op, rem_path));
    }
    Some(op.clone())
}

/// Proposed `op` after an accepted `replace` of `rep_path` with `replaced`.
///
/// A replace overwrites the whole subtree, so edits strictly below it are
/// dropped whatever the new value is.
fn x_replace(rep_path: &Path, replaced: &Value, op: &Operation) -> Option<Operation> {
    if rep_path.is_ancestor_of(op.path()) || op.from().is_some_and(|from| rep_path.is_ancestor_of(from)) {
        return None;
    }
    match op {
        Operation::Replace { path, value, .. } if path == rep_path => {
            if value == replaced {
                None
            } else {
                Some(Operation::Replace {
                    path: path.clone(),
                    value: value.clone(),
                    from_value: replaced.clone(),
                })
            }
        }
        Operation::Remove { path, value } if path == rep_path && value != replaced => None,
        _ => Some(op.clone()),
    }
}

/// Proposed `op` after an accepted `move` from `move_from` to `move_to`.
fn x_move(move_from: &Path, move_to: &Path, op: &Operation) -> Operation {
    op.map_paths(|p| moved(p, move_from, move_to))
}

/// Proposed `op` after an accepted `copy` into `copy_to`.
fn x_copy(copy_to: &Path, op: &Operation) -> Operation {
    if copy_to.is_array_element() {
        shift_up(op, copy_to)
    } else {
        op.clone()
    }
}

fn transform_candidate(accepted: &Operation, candidate: &Operation) -> Option<Operation> {
    match accepted {
        Operation::Add { path, value } => x_add(path, value, candidate),
        Operation::Remove { path, .. } => x_remove(path, candidate),
        Operation::Replace { path, value, .. } => x_replace(path, value, candidate),
        Operation::Move { path, from } => Some(x_move(from, path, candidate)),
        Operation::Copy { path, .. } => Some(x_copy(path, candidate)),
        Operation::Test { .. } => Some(candidate.clone()),
    }
}

// ── Accepted operation past a proposed one ────────────────────────────────

/// The accepted operation after a proposed element insertion at `path`.
///
/// An accepted insertion at the same index stays in front.
fn inserted_at(accepted: &Operation, path: &Path) -> Option<Operation> {
    if inserts_element_at(accepted, path) {
        return Some(accepted.clone());
    }
    Some(shift_up(accepted, path))
}

/// The accepted operation after a proposed overwrite of `path`.
fn overwritten_at(accepted: &Operation, path: &Path) -> Option<Operation> {
    if path.is_ancestor_of(accepted.path()) {
        return None;
    }
    if accepted.path() == path && !inserts_element_at(accepted, path) {
        return None;
    }
    Some(accepted.clone())
}

/// The accepted operation after a proposed removal of `removed` at `path`.
fn removed_at(accepted: &Operation, path: &Path, removed: &Value) -> Option<Operation> {
    if accepted.path() == path {
        return match accepted {
            _ if inserts_element_at(accepted, path) => Some(accepted.clone()),
            // The proposed removal was dropped as stale; the replace now
            // recreates the target for the operations that follow it.
            Operation::Replace { value, .. } if value != removed => Some(Operation::Add {
                path: path.clone(),
                value: value.clone(),
            }),
            _ => None,
        };
    }
    if path.is_ancestor_of(accepted.path()) || accepted.from().is_some_and(|f| f.intersects(path)) {
        return None;
    }
    if path.is_array_element() {
        return Some(shift_down(accepted, path));
    }
    Some(accepted.clone())
}

fn rebase_accepted(accepted: &Operation, candidate: &Operation) -> Option<Operation> {
    if let (Operation::Add { path: a, value: va }, Operation::Add { path: c, value: vc }) =
        (accepted, candidate)
    {
        if a == c && va == vc {
            return None;
        }
    }
    match candidate {
        Operation::Test { .. } => Some(accepted.clone()),
        Operation::Add { path, .. } | Operation::Copy { path, .. } if path.is_array_element() => {
            inserted_at(accepted, path)
        }
        Operation::Add { path, .. } | Operation::Copy { path, .. } | Operation::Replace { path, .. } => {
            overwritten_at(accepted, path)
        }
        Operation::Remove { path, value } => removed_at(accepted, path, value),
        Operation::Move { path, from } => Some(accepted.map_paths(|p| moved(p, from, path))),
    }
}

// ── Rebase ────────────────────────────────────────────────────────────────

/// Rewrite `candidates` so they apply after `accepted`.
///
/// Once the accepted operation is found to be already included in the
/// candidates (a duplicate, or overwritten by them), the remaining
/// candidates pass through unchanged.
pub(crate) fn rebase(accepted: &Operation, candidates: &[Operation]) -> Vec<Operation> {
    let (_, rebased) = candidates.iter().fold(
        (Some(accepted.clone()), Vec::with_capacity(candidates.len())),
        |(current, mut out), candidate| match current {
            Some(acc) => {
                let transformed = transform_candidate(&acc, candidate);
                trace!(accepted = %acc, candidate = %candidate, kept = transformed.is_some(), "rebase");
                out.extend(transformed);
                (rebase_accepted(&acc, candidate), out)
            }
            None => {
                out.push(candidate.clone());
                (None, out)
            }
        },
    );
    rebased
}

/// Transform `proposed` operations so they apply correctly after `accepted`
/// operations have already been applied.
pub fn transform(accepted: &[Operation], proposed: &[Operation]) -> Vec<Operation> {
    accepted
        .iter()
        .fold(proposed.to_vec(), |ops, acc| acc.transform(&ops))
}

// ── Filler synthesis ──────────────────────────────────────────────────────

/// The empty container that must exist at `ancestor` for `child_segment` to
/// be addressable below it.
fn filler(ancestor: Path, child_segment: &str) -> Operation {
    let value = if is_valid_index(child_segment) {
        Value::Array(Vec::new())
    } else {
        Value::Object(Default::default())
    };
    Operation::Add { path: ancestor, value }
}

/// Filler operations for the missing ancestors of a single `path`,
/// outermost first. The root and `path` itself are never filled.
pub fn fillers_for(path: &Path, source: &Value) -> Vec<Operation> {
    filler_operations(
        &[Operation::Test {
            path: path.clone(),
            value: Value::Null,
        }],
        source,
    )
}

/// Synthesize `add` operations for every container an operation in
/// `operations` needs but that neither `source` nor an earlier operation of
/// the list provides.
///
/// The list is replayed on a scratch copy of `source`, so each path is
/// checked in the coordinates it was written in. The fillers are
/// de-duplicated and ordered outermost first; callers prepend them to the
/// list.
pub fn filler_operations(operations: &[Operation], source: &Value) -> Vec<Operation> {
    let mut scratch = source.clone();
    let mut fillers: Vec<Operation> = Vec::new();
    for op in operations {
        let path = op.path();
        for depth in 1..path.len() {
            let ancestor = Path::from_segments(path.segments()[..depth].iter().cloned());
            let missing = !exists(source, ancestor.segments())
                && !exists(&scratch, ancestor.segments())
                && !fillers.iter().any(|f| f.path() == &ancestor);
            if missing {
                let fill = filler(ancestor, &path.segments()[depth]);
                replay(&mut scratch, &fill);
                fillers.push(fill);
            }
        }
        replay(&mut scratch, op);
    }
    fillers
}

/// Apply `op` to the scratch tree, skipping it if it does not apply.
fn replay(scratch: &mut Value, op: &Operation) {
    if let Err(err) = apply_op(scratch, op) {
        trace!(op = %op, %err, "skipped during replay");
    }
}

// ── Array removals ────────────────────────────────────────────────────────

/// Split every removal of a whole array into one removal per element,
/// highest index first, followed by the removal of the emptied array.
///
/// Each removal is judged against `source` with the operations before it
/// replayed.
pub fn expand_array_removals(operations: &[Operation], source: &Value) -> Vec<Operation> {
    let mut scratch = source.clone();
    let mut expanded = Vec::with_capacity(operations.len());
    for op in operations {
        if let Operation::Remove { path, .. } = op {
            if let Some(Value::Array(items)) = get(&scratch, path.segments()) {
                expanded.extend(items.iter().enumerate().rev().map(|(i, item)| Operation::Remove {
                    path: path.child(i.to_string()),
                    value: item.clone(),
                }));
                expanded.push(Operation::Remove {
                    path: path.clone(),
                    value: Value::Array(Vec::new()),
                });
                replay(&mut scratch, op);
                continue;
            }
        }
        replay(&mut scratch, op);
        expanded.push(op.clone());
    }
    expanded
}

// ── Degenerate entries ────────────────────────────────────────────────────

/// An `add` of an empty array over a non-element path that already resolves
/// is a no-op left by array expansion in the diff, unless an earlier
/// operation of the list has touched that path or one of its ancestors.
fn is_degenerate(op: &Operation, earlier: &[Operation], scratch: &Value) -> bool {
    match op {
        Operation::Add { path, value } => {
            value.as_array().is_some_and(Vec::is_empty)
                && !path.is_array_element()
                && exists(scratch, path.segments())
                && !earlier.iter().any(|e| path.intersects(e.path()))
        }
        _ => false,
    }
}

/// Drop degenerate entries. Each entry is judged against `source` with the
/// kept entries before it replayed.
pub fn drop_degenerate(operations: &[Operation], source: &Value) -> Vec<Operation> {
    let mut scratch = source.clone();
    let mut kept = Vec::with_capacity(operations.len());
    for (i, op) in operations.iter().enumerate() {
        if is_degenerate(op, &operations[..i], &scratch) {
            continue;
        }
        replay(&mut scratch, op);
        kept.push(op.clone());
    }
    kept
}
