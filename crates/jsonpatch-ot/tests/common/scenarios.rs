#![allow(dead_code)]

use jsonpatch_ot::{Delta, Document, Operation, Path};
use serde_json::Value;

pub fn p(s: &str) -> Path {
    Path::parse(s).unwrap()
}

pub fn add(path: &str, value: Value) -> Operation {
    Operation::Add { path: p(path), value }
}

pub fn remove(path: &str, value: Value) -> Operation {
    Operation::Remove { path: p(path), value }
}

pub fn replace(path: &str, value: Value, from_value: Value) -> Operation {
    Operation::Replace { path: p(path), value, from_value }
}

/// Apply `first` then `second` to a fresh document over `base`, both
/// computed against version 0.
pub fn apply_in_order(base: &Value, first: &Delta, second: &Delta) -> Document {
    Document::new(base.clone())
        .transform(first)
        .unwrap()
        .transform(second)
        .unwrap()
}

/// Diff `left` and `right` against `base` and apply the two deltas in both
/// orders. Returns (left-then-right, right-then-left).
pub fn merge_both_ways(base: &Value, left: &Value, right: &Value) -> (Value, Value) {
    let doc = Document::new(base.clone());
    let left_delta = doc.generate_patch(left);
    let right_delta = doc.generate_patch(right);
    let lr = apply_in_order(base, &left_delta, &right_delta);
    let rl = apply_in_order(base, &right_delta, &left_delta);
    (lr.source().clone(), rl.source().clone())
}

pub fn assert_converges(base: Value, left: Value, right: Value, expected: Value) {
    let (lr, rl) = merge_both_ways(&base, &left, &right);
    assert_eq!(lr, expected, "left then right");
    assert_eq!(rl, expected, "right then left");
}
