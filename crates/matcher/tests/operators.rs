mod helpers;

use helpers::{compile, matches, parse_json, parse_with};
use matcher::{CaseInsensitiveComparator, ErrorKind, ParseContext, ParserOptions};
use serde_json::json;
use std::sync::Arc;

#[test]
fn test_comparisons_stay_within_type_brackets() {
    let expr = compile(json!({"a": {"$gt": 5}}));
    assert!(matches(&expr, json!({"a": 6})));
    assert!(matches(&expr, json!({"a": 5.5})));
    assert!(!matches(&expr, json!({"a": 5})));
    assert!(!matches(&expr, json!({"a": "6"})));
    assert!(!matches(&expr, json!({"a": true})));
    assert!(!matches(&expr, json!({})));

    let expr = compile(json!({"a": {"$lt": "m"}}));
    assert!(matches(&expr, json!({"a": "apple"})));
    assert!(!matches(&expr, json!({"a": "zebra"})));
    assert!(!matches(&expr, json!({"a": 1})));
}

#[test]
fn test_equality_with_null_matches_missing_fields() {
    let expr = compile(json!({"a": null}));
    assert!(matches(&expr, json!({})));
    assert!(matches(&expr, json!({"a": null})));
    assert!(!matches(&expr, json!({"a": 0})));

    let expr = compile(json!({"a": {"$gte": null}}));
    assert!(matches(&expr, json!({"b": 1})));

    let expr = compile(json!({"a": {"$gt": null}}));
    assert!(!matches(&expr, json!({"b": 1})));
}

#[test]
fn test_implicit_equality_on_arrays() {
    let expr = compile(json!({"tags": "red"}));
    assert!(matches(&expr, json!({"tags": ["blue", "red"]})));
    assert!(!matches(&expr, json!({"tags": ["blue"]})));

    let expr = compile(json!({"tags": ["blue", "red"]}));
    assert!(matches(&expr, json!({"tags": ["blue", "red"]})));
    assert!(matches(&expr, json!({"tags": [["blue", "red"], "x"]})));
    assert!(!matches(&expr, json!({"tags": ["red", "blue"]})));
}

#[test]
fn test_ne_and_nin_negate() {
    let expr = compile(json!({"a": {"$ne": 1}}));
    assert!(matches(&expr, json!({"a": 2})));
    assert!(matches(&expr, json!({})));
    assert!(!matches(&expr, json!({"a": [1, 2]})));

    let expr = compile(json!({"a": {"$nin": [1, 2]}}));
    assert!(matches(&expr, json!({"a": 3})));
    assert!(!matches(&expr, json!({"a": 2})));
}

#[test]
fn test_in_list_membership() {
    let expr = compile(json!({"a": {"$in": [1, "two", null]}}));
    assert!(matches(&expr, json!({"a": 1.0})));
    assert!(matches(&expr, json!({"a": "two"})));
    assert!(matches(&expr, json!({"a": [5, "two"]})));
    assert!(matches(&expr, json!({})));
    assert!(!matches(&expr, json!({"a": 3})));

    let err = parse_json(json!({"a": {"$in": 1}})).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FailedToParse);
}

#[test]
fn test_exists_follows_truthiness() {
    let present = compile(json!({"a": {"$exists": true}}));
    let absent = compile(json!({"a": {"$exists": 0}}));

    assert!(present.matches(&helpers::doc(json!({"a": null}))));
    assert!(!present.matches(&helpers::doc(json!({"b": 1}))));
    assert!(absent.matches(&helpers::doc(json!({"b": 1}))));
    assert!(!absent.matches(&helpers::doc(json!({"a": false}))));
}

#[test]
fn test_type_by_alias_and_code() {
    let expr = compile(json!({"a": {"$type": "string"}}));
    assert!(matches(&expr, json!({"a": "x"})));
    assert!(matches(&expr, json!({"a": [1, "x"]})));
    assert!(!matches(&expr, json!({"a": 1})));

    let expr = compile(json!({"a": {"$type": ["number", 10]}}));
    assert!(matches(&expr, json!({"a": 1.5})));
    assert!(matches(&expr, json!({"a": null})));
    assert!(!matches(&expr, json!({"a": {}})));

    let expr = compile(json!({"a": {"$type": "array"}}));
    assert!(matches(&expr, json!({"a": []})));
}

#[test]
fn test_size_counts_top_level_elements() {
    let expr = compile(json!({"a": {"$size": 2}}));
    assert!(matches(&expr, json!({"a": [1, [2, 3]]})));
    assert!(!matches(&expr, json!({"a": [1]})));
    assert!(!matches(&expr, json!({"a": "ab"})));

    let expr = compile(json!({"a": {"$size": -1}}));
    assert!(!matches(&expr, json!({"a": []})));

    assert_eq!(
        parse_json(json!({"a": {"$size": 1.5}})).unwrap_err().kind(),
        ErrorKind::FailedToParse
    );
}

#[test]
fn test_all_requires_every_value() {
    let expr = compile(json!({"a": {"$all": [1, 2]}}));
    assert!(matches(&expr, json!({"a": [2, 3, 1]})));
    assert!(!matches(&expr, json!({"a": [1, 3]})));

    let expr = compile(json!({"a": {"$all": []}}));
    assert!(!matches(&expr, json!({"a": []})));
    assert!(!matches(&expr, json!({"a": [1]})));

    let expr = compile(json!({"a": {"$all": [
        {"$elemMatch": {"x": 1}},
        {"$elemMatch": {"y": {"$gt": 1}}}
    ]}}));
    assert!(matches(&expr, json!({"a": [{"x": 1}, {"y": 2}]})));
    assert!(!matches(&expr, json!({"a": [{"x": 1}, {"y": 0}]})));
}

#[test]
fn test_elem_match_requires_a_single_element() {
    let expr = compile(json!({"a": {"$elemMatch": {"$gte": 2, "$lt": 4}}}));
    assert!(matches(&expr, json!({"a": [1, 3]})));
    assert!(!matches(&expr, json!({"a": [1, 5]})));
    assert!(!matches(&expr, json!({"a": 3})));
    assert!(!matches(&expr, json!({"a": [[3]]})));

    let expr = compile(json!({"a": {"$elemMatch": {"b": 1, "c": {"$exists": true}}}}));
    assert!(matches(&expr, json!({"a": [{"b": 1, "c": null}]})));
    assert!(!matches(&expr, json!({"a": [{"b": 1}, {"c": 1}]})));
}

#[test]
fn test_not_inverts_operator_documents() {
    let expr = compile(json!({"a": {"$not": {"$gt": 5}}}));
    assert!(matches(&expr, json!({"a": 3})));
    assert!(matches(&expr, json!({})));
    assert!(!matches(&expr, json!({"a": 6})));

    let err = parse_json(json!({"a": {"$not": 5}})).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FailedToParse);
}

#[test]
fn test_mod_tests_remainders() {
    let expr = compile(json!({"a": {"$mod": [4, 0]}}));
    assert!(matches(&expr, json!({"a": 8})));
    assert!(matches(&expr, json!({"a": 8.9})));
    assert!(matches(&expr, json!({"a": [1, 12]})));
    assert!(!matches(&expr, json!({"a": 7})));
    assert!(!matches(&expr, json!({"a": "8"})));

    let err = parse_json(json!({"a": {"$mod": [0, 1]}})).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FailedToParse);
}

#[test]
fn test_regex_matches_strings_only() {
    let expr = compile(json!({"name": {"$regex": "^jo", "$options": "i"}}));
    assert!(matches(&expr, json!({"name": "John"})));
    assert!(matches(&expr, json!({"name": ["x", "joe"]})));
    assert!(!matches(&expr, json!({"name": "Bob"})));
    assert!(!matches(&expr, json!({"name": 10})));

    let err = parse_json(json!({"name": {"$regex": "a", "$options": "q"}})).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FailedToParse);
}

#[test]
fn test_logical_combinators() {
    let expr = compile(json!({"$or": [{"a": 1}, {"b": {"$gt": 2}}]}));
    assert!(matches(&expr, json!({"a": 1})));
    assert!(matches(&expr, json!({"b": 3})));
    assert!(!matches(&expr, json!({"a": 2, "b": 2})));

    let expr = compile(json!({"$nor": [{"a": 1}, {"b": 1}]}));
    assert!(matches(&expr, json!({"a": 2})));
    assert!(!matches(&expr, json!({"b": 1})));

    let expr = compile(json!({
        "$and": [{"a": {"$gt": 1}}, {"a": {"$lt": 3}}],
        "$comment": "range"
    }));
    assert!(matches(&expr, json!({"a": 2})));
    assert!(!matches(&expr, json!({"a": 3})));

    for bad in [json!({"$and": []}), json!({"$or": {}}), json!({"$nor": [1]})] {
        assert_eq!(parse_json(bad).unwrap_err().kind(), ErrorKind::FailedToParse);
    }
}

#[test]
fn test_unknown_operators_are_bad_values() {
    for bad in [json!({"$foo": 1}), json!({"a": {"$foo": 1}})] {
        let err = parse_json(bad).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadValue);
        assert_eq!(err.code(), 2);
    }
}

#[test]
fn test_comparator_drives_string_comparisons() {
    let ctx = ParseContext::with_comparator(
        &ParserOptions::default(),
        Arc::new(CaseInsensitiveComparator),
    );

    let expr = parse_with(json!({"name": "ALICE"}), &ctx).unwrap();
    assert!(matches(&expr, json!({"name": "alice"})));

    let expr = parse_with(json!({"name": {"$in": ["BOB"]}}), &ctx).unwrap();
    assert!(matches(&expr, json!({"name": "bob"})));

    let expr = parse_with(json!({"doc": {"k": "V"}}), &ctx).unwrap();
    assert!(matches(&expr, json!({"doc": {"k": "v"}})));

    // Uniqueness is binary.
    let expr = parse_with(json!({"a": {"$_internalSchemaUniqueItems": true}}), &ctx).unwrap();
    assert!(matches(&expr, json!({"a": ["x", "X"]})));

    let simple = compile(json!({"name": "ALICE"}));
    assert!(!matches(&simple, json!({"name": "alice"})));
}
