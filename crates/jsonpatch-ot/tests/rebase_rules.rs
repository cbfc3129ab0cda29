mod common;

use common::scenarios::{add, p, remove, replace};
use jsonpatch_ot::{apply_patch, fillers_for, transform, Operation, Path};
use serde_json::json;

#[test]
fn remove_shifts_later_element_down() {
    let doc = json!({"a": [10, 20, 30]});
    let accepted = [remove("/a/1", json!(20))];
    let rebased = transform(&accepted, &[replace("/a/2", json!("X"), json!(30))]);
    assert_eq!(rebased, vec![replace("/a/1", json!("X"), json!(30))]);

    let doc = apply_patch(doc, &accepted).unwrap();
    assert_eq!(apply_patch(doc, &rebased).unwrap(), json!({"a": [10, "X"]}));
}

#[test]
fn insert_shifts_same_element_up() {
    let rebased = transform(&[add("/a/1", json!(99))], &[remove("/a/1", json!(20))]);
    assert_eq!(rebased, vec![remove("/a/2", json!(20))]);

    let doc = apply_patch(json!({"a": [10, 20, 30]}), &[add("/a/1", json!(99))]).unwrap();
    assert_eq!(apply_patch(doc, &rebased).unwrap(), json!({"a": [10, 99, 30]}));
}

#[test]
fn duplicate_add_is_suppressed() {
    assert!(transform(&[add("/a", json!(1))], &[add("/a", json!(1))]).is_empty());
}

#[test]
fn colliding_add_becomes_replace() {
    assert_eq!(
        transform(&[add("/a", json!(1))], &[add("/a", json!(2))]),
        vec![replace("/a", json!(2), json!(1))]
    );
}

#[test]
fn remove_whitelists_recreation() {
    let accepted = [remove("/a", json!("X"))];
    assert_eq!(transform(&accepted, &[add("/a", json!("Y"))]), vec![add("/a", json!("Y"))]);
    assert_eq!(
        transform(&accepted, &[replace("/a", json!("Y"), json!("X"))]),
        vec![add("/a", json!("Y"))]
    );
    assert!(transform(&accepted, &[remove("/a/anything", json!(1))]).is_empty());
    assert!(transform(&accepted, &[add("/a/anything", json!(1))]).is_empty());
}

#[test]
fn fold_order_matters() {
    // base [a, b]: accepted inserts x at 0 then removes b (now at 2)
    let accepted = [add("/l/0", json!("x")), remove("/l/2", json!("b"))];
    let proposed = [replace("/l/1", json!("B"), json!("b")), add("/l/2", json!("c"))];
    assert_eq!(
        transform(&accepted, &proposed),
        vec![add("/l/2", json!("B")), add("/l/3", json!("c"))]
    );
}

#[test]
fn transform_never_mutates_input() {
    let proposed = vec![remove("/a/3", json!(1)), add("/b/c", json!(2))];
    let snapshot = proposed.clone();
    let _ = transform(&[add("/a/0", json!(0)), remove("/b", json!({}))], &proposed);
    assert_eq!(proposed, snapshot);
}

#[test]
fn move_source_side_acts_like_remove() {
    let accepted = [Operation::Move { path: p("/z"), from: p("/a/0") }];
    assert_eq!(
        transform(&accepted, &[replace("/a/2", json!(1), json!(0))]),
        vec![replace("/a/1", json!(1), json!(0))]
    );
}

#[test]
fn move_destination_side_acts_like_add() {
    let accepted = [Operation::Move { path: p("/b/0"), from: p("/x") }];
    assert_eq!(
        transform(&accepted, &[remove("/b/0", json!(1))]),
        vec![remove("/b/1", json!(1))]
    );
}

#[test]
fn filler_paths_for_nested_array_pointer() {
    assert_eq!(
        fillers_for(&p("/a/0/b/0"), &json!({})),
        vec![add("/a", json!([])), add("/a/0", json!({})), add("/a/0/b", json!([]))]
    );
    assert!(fillers_for(&p("/a"), &json!({})).is_empty());
    assert!(fillers_for(&Path::root(), &json!(null)).is_empty());
}

#[test]
fn insert_before_huge_index_does_not_overflow() {
    let huge = format!("/a/{}", usize::MAX);
    let proposed = [remove(&huge, json!(1))];
    assert_eq!(transform(&[add("/a/0", json!(0))], &proposed), proposed);
}
