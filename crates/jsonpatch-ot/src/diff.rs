//! JSON Patch diff: generate the operations that turn one document into
//! another.
//!
//! Only `add`, `remove` and `replace` are produced. Every `remove` carries the
//! removed value and every `replace` the overwritten one, so the output is
//! reversible and usable by the transform engine.

use serde_json::{Map, Value};

use crate::operation::Operation;
use crate::path::Path;

/// Flags controlling the shape of the generated operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffOptions {
    /// Emit a changed value as `remove` + `add` instead of `replace`.
    /// The document root is always replaced.
    pub replace_as_remove_add: bool,
    /// Remove trailing array elements from the highest index down.
    pub remove_from_end: bool,
    /// Emit a new array as an `add` of `[]` followed by one `add` per element.
    pub expand_arrays: bool,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            replace_as_remove_add: true,
            remove_from_end: true,
            expand_arrays: true,
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────

/// Generate the operations that transform `src` into `dst` with the default
/// options.
pub fn diff(src: &Value, dst: &Value) -> Vec<Operation> {
    diff_with(src, dst, &DiffOptions::default())
}

pub fn diff_with(src: &Value, dst: &Value, options: &DiffOptions) -> Vec<Operation> {
    let mut ops = Vec::new();
    diff_at_path(&mut ops, &Path::root(), src, dst, options);
    ops
}

// ── Core recursive differ ─────────────────────────────────────────────────

fn diff_at_path(ops: &mut Vec<Operation>, path: &Path, src: &Value, dst: &Value, options: &DiffOptions) {
    if src == dst {
        return;
    }
    match (src, dst) {
        (Value::Object(s), Value::Object(d)) => diff_obj(ops, path, s, d, options),
        (Value::Array(s), Value::Array(d)) => diff_arr(ops, path, s, d, options),
        _ => diff_val(ops, path, src, dst, options),
    }
}

fn diff_val(ops: &mut Vec<Operation>, path: &Path, src: &Value, dst: &Value, options: &DiffOptions) {
    if path.is_root() || !options.replace_as_remove_add {
        ops.push(Operation::Replace {
            path: path.clone(),
            value: dst.clone(),
            from_value: src.clone(),
        });
        return;
    }
    ops.push(Operation::Remove {
        path: path.clone(),
        value: src.clone(),
    });
    add_value(ops, path, dst, options);
}

fn add_value(ops: &mut Vec<Operation>, path: &Path, value: &Value, options: &DiffOptions) {
    match value {
        Value::Array(items) if options.expand_arrays => {
            ops.push(Operation::Add {
                path: path.clone(),
                value: Value::Array(Vec::new()),
            });
            for (i, item) in items.iter().enumerate() {
                add_value(ops, &path.child(i.to_string()), item, options);
            }
        }
        _ => ops.push(Operation::Add {
            path: path.clone(),
            value: value.clone(),
        }),
    }
}

fn diff_obj(
    ops: &mut Vec<Operation>,
    path: &Path,
    src: &Map<String, Value>,
    dst: &Map<String, Value>,
    options: &DiffOptions,
) {
    for (key, value) in src {
        if !dst.contains_key(key) {
            ops.push(Operation::Remove {
                path: path.child(key.as_str()),
                value: value.clone(),
            });
        }
    }
    for (key, value) in dst {
        let child = path.child(key.as_str());
        match src.get(key) {
            Some(old) => diff_at_path(ops, &child, old, value, options),
            None => add_value(ops, &child, value, options),
        }
    }
}

// ── Arrays ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edit {
    Keep,
    Delete(usize),
    Insert(usize),
}

/// Edit script from a longest-common-subsequence table. On ties a deletion
/// is preferred, so a changed element shows up as `Delete` then `Insert`.
fn lcs_script(src: &[Value], dst: &[Value]) -> Vec<Edit> {
    let (n, m) = (src.len(), dst.len());
    // table[i][j] = LCS length of src[i..] and dst[j..]
    let mut table = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[i][j] = if src[i] == dst[j] {
                table[i + 1][j + 1] + 1
            } else {
                table[i + 1][j].max(table[i][j + 1])
            };
        }
    }

    let mut script = Vec::with_capacity(n.max(m));
    let (mut i, mut j) = (0, 0);
    while i < n || j < m {
        if i < n && j < m && src[i] == dst[j] {
            script.push(Edit::Keep);
            i += 1;
            j += 1;
        } else if j == m || (i < n && table[i + 1][j] >= table[i][j + 1]) {
            script.push(Edit::Delete(i));
            i += 1;
        } else {
            script.push(Edit::Insert(j));
            j += 1;
        }
    }
    script
}

/// Whether a deleted element and the element inserted in its place are
/// diffed in place rather than removed and re-added.
fn diff_in_place(src: &Value, dst: &Value, options: &DiffOptions) -> bool {
    match (src, dst) {
        (Value::Object(_), Value::Object(_)) | (Value::Array(_), Value::Array(_)) => true,
        (Value::Object(_) | Value::Array(_), _) | (_, Value::Object(_) | Value::Array(_)) => false,
        _ => !options.replace_as_remove_add,
    }
}

fn diff_arr(ops: &mut Vec<Operation>, path: &Path, src: &[Value], dst: &[Value], options: &DiffOptions) {
    let script = lcs_script(src, dst);
    let trailing = script
        .iter()
        .rev()
        .take_while(|e| matches!(e, Edit::Delete(_)))
        .count();
    let (body, tail) = script.split_at(script.len() - trailing);

    let mut pos = 0usize;
    let mut k = 0;
    while k < body.len() {
        match body[k] {
            Edit::Keep => pos += 1,
            Edit::Delete(i) => match body.get(k + 1) {
                Some(&Edit::Insert(j)) if diff_in_place(&src[i], &dst[j], options) => {
                    diff_at_path(ops, &path.child(pos.to_string()), &src[i], &dst[j], options);
                    pos += 1;
                    k += 1;
                }
                _ => ops.push(Operation::Remove {
                    path: path.child(pos.to_string()),
                    value: src[i].clone(),
                }),
            },
            Edit::Insert(j) => {
                add_value(ops, &path.child(pos.to_string()), &dst[j], options);
                pos += 1;
            }
        }
        k += 1;
    }

    let removals = tail.iter().enumerate().filter_map(|(offset, edit)| match edit {
        Edit::Delete(i) => Some((offset, *i)),
        _ => None,
    });
    let removals: Vec<(usize, usize)> = if options.remove_from_end {
        removals.rev().collect()
    } else {
        removals.map(|(_, i)| (0, i)).collect()
    };
    for (offset, i) in removals {
        ops.push(Operation::Remove {
            path: path.child((pos + offset).to_string()),
            value: src[i].clone(),
        });
    }
}
