mod common;

use common::scenarios::{add, apply_in_order, assert_converges, merge_both_ways, remove};
use jsonpatch_ot::{Delta, DiffOptions, Document, OtError};
use serde_json::json;

#[test]
fn remove_against_element_edit() {
    let base = json!({"a": [1, 2, 3]});
    let left = Delta::new(0, vec![remove("/a/1", json!(2))]);
    let right = Delta::new(0, vec![remove("/a/2", json!(3)), add("/a/2", json!(30))]);

    assert_eq!(apply_in_order(&base, &left, &right).source(), &json!({"a": [1, 30]}));
    assert_eq!(apply_in_order(&base, &right, &left).source(), &json!({"a": [1, 30]}));
}

#[test]
fn disjoint_keys() {
    assert_converges(
        json!({"a": 1, "b": {"c": true}, "d": [1]}),
        json!({"a": 2, "b": {"c": true}, "d": [1], "e": "new"}),
        json!({"a": 1, "b": {"c": false, "x": null}, "d": [1]}),
        json!({"a": 2, "b": {"c": false, "x": null}, "d": [1], "e": "new"}),
    );
}

#[test]
fn scalar_conflict_last_writer_wins() {
    let (lr, rl) = merge_both_ways(&json!({"a": 1}), &json!({"a": 2}), &json!({"a": 3}));
    assert_eq!(lr, json!({"a": 3}));
    assert_eq!(rl, json!({"a": 2}));
}

#[test]
fn remove_against_update_of_same_key() {
    assert_converges(json!({"a": 1}), json!({}), json!({"a": 2}), json!({"a": 2}));
}

#[test]
fn inserts_at_both_ends() {
    assert_converges(
        json!({"a": [1, 2, 3]}),
        json!({"a": [0, 1, 2, 3]}),
        json!({"a": [1, 2, 3, 4]}),
        json!({"a": [0, 1, 2, 3, 4]}),
    );
}

#[test]
fn remove_against_insert_after_it() {
    assert_converges(
        json!({"a": [1, 2, 3]}),
        json!({"a": [2, 3]}),
        json!({"a": [1, 2, 9, 3]}),
        json!({"a": [2, 9, 3]}),
    );
}

#[test]
fn removed_parent_wins_over_child_edit() {
    assert_converges(json!({"a": {"x": 1}}), json!({}), json!({"a": {"x": 2}}), json!({}));
}

#[test]
fn root_type_change_wins_over_element_edit() {
    assert_converges(json!([1, 2]), json!([2]), json!({"k": 1}), json!({"k": 1}));
}

#[test]
fn container_replace_wins_over_edit_below_it() {
    let options = DiffOptions { replace_as_remove_add: false, ..DiffOptions::default() };
    let doc = Document::new(json!({"a": [1]}));
    let left = doc.generate_patch_with(&json!({"a": []}), &options);
    let right = doc.generate_patch_with(&json!({"a": {}}), &options);

    let lr = doc.transform(&left).unwrap().transform(&right).unwrap();
    let rl = doc.transform(&right).unwrap().transform(&left).unwrap();
    assert_eq!(lr.source(), &json!({"a": {}}));
    assert_eq!(rl.source(), &json!({"a": {}}));
}

#[test]
fn removed_array_wins_over_append() {
    assert_converges(
        json!({"a": [1, 2], "b": 0}),
        json!({"b": 0}),
        json!({"a": [1, 2, 3], "b": 0}),
        json!({"b": 0}),
    );
}

#[test]
fn both_create_the_same_array() {
    assert_converges(json!({}), json!({"a": [1]}), json!({"a": [1, 2]}), json!({"a": [1, 2]}));
}

#[test]
fn insert_shifts_nested_element_edit() {
    assert_converges(
        json!({"items": [{"n": 1}, {"n": 2}]}),
        json!({"items": [{"n": 1}, {"n": 20}]}),
        json!({"items": [{"n": 0}, {"n": 1}, {"n": 2}]}),
        json!({"items": [{"n": 0}, {"n": 1}, {"n": 20}]}),
    );
}

#[test]
fn both_remove_the_same_element() {
    assert_converges(
        json!({"a": [1, 2, 3]}),
        json!({"a": [1, 3]}),
        json!({"a": [1, 3]}),
        json!({"a": [1, 3]}),
    );
}

#[test]
fn concurrent_inserts_at_same_index_keep_both() {
    let (lr, rl) = merge_both_ways(&json!({"a": [1]}), &json!({"a": [1, 2]}), &json!({"a": [1, 3]}));
    for merged in [lr, rl] {
        let mut items: Vec<i64> = merged["a"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_i64().unwrap())
            .collect();
        items.sort_unstable();
        assert_eq!(items, [1, 2, 3]);
    }
}

#[test]
fn identical_deltas_apply_once() {
    let base = json!({"a": [1], "b": 1});
    let doc = Document::new(base.clone());
    let target = json!({"a": [1, {"c": [2]}], "b": 2});
    let delta = doc.generate_patch(&target);

    let once = doc.transform(&delta).unwrap();
    let twice = once.transform(&delta).unwrap();

    assert!(twice.applied_deltas()[1].is_empty());
    assert_eq!(twice.source(), &target);
    assert_eq!(twice.version(), 2);
}

#[test]
fn delta_is_rebased_only_past_unseen_history() {
    let base = json!({"a": [1, 2]});
    let doc = Document::new(base)
        .transform(&Delta::new(0, vec![add("/a/0", json!(0))]))
        .unwrap();
    // Computed after seeing version 1: [0, 1, 2]
    let seen = Delta::new(1, vec![remove("/a/2", json!(2))]);
    let doc = doc
        .transform(&Delta::new(1, vec![add("/a/0", json!(-1))]))
        .unwrap()
        .transform(&seen)
        .unwrap();
    assert_eq!(doc.source(), &json!({"a": [-1, 0, 1]}));
    assert_eq!(doc.applied_deltas()[2].version(), 2);
}

#[test]
fn fillers_materialize_missing_containers() {
    let doc = Document::new(json!({}));
    let delta = Delta::new(0, vec![add("/a/0/b/0", json!("X"))]);
    let next = doc.transform(&delta).unwrap();
    assert_eq!(next.source(), &json!({"a": [{"b": ["X"]}]}));
    assert_eq!(next.applied_deltas()[0].operations().len(), 4);
}

#[test]
fn deltas_from_the_future_are_rejected() {
    let doc = Document::new(json!({}));
    let err = doc.transform(&Delta::new(5, vec![add("/a", json!(1))])).unwrap_err();
    assert_eq!(err, OtError::UnknownBaseVersion { base: 5, current: 0 });
}

#[test]
fn three_replicas_converge() {
    let base = json!({"list": ["a", "b", "c"], "meta": {"count": 3}});
    let doc = Document::new(base.clone());
    let d1 = doc.generate_patch(&json!({"list": ["a", "b", "c", "d"], "meta": {"count": 3}}));
    let d2 = doc.generate_patch(&json!({"list": ["b", "c"], "meta": {"count": 3}}));
    let d3 = doc.generate_patch(&json!({"list": ["a", "b", "c"], "meta": {"count": 4}}));

    let orders = [[&d1, &d2, &d3], [&d3, &d2, &d1], [&d2, &d3, &d1]];
    for order in orders {
        let merged = order
            .iter()
            .try_fold(Document::new(base.clone()), |doc, delta| doc.transform(delta))
            .unwrap();
        assert_eq!(
            merged.source(),
            &json!({"list": ["b", "c", "d"], "meta": {"count": 4}}),
            "order {:?}",
            order.iter().map(|d| d.to_json()).collect::<Vec<_>>()
        );
    }
}
