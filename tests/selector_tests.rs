//! Tests for the scan engine
//!
//! These tests verify:
//! - Ascending/descending traversal order over the primary index
//! - Strict scope → conditions → matches filter ordering
//! - Stable sort, skip, and limit semantics

use std::collections::BTreeMap;

use radixdb::{CondOp, Engine, FormKind, Selector, Value, FIELD_KEY};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_engine_with_form() -> (TempDir, Engine) {
    let temp_dir = TempDir::new().unwrap();
    let engine = Engine::open_path(temp_dir.path()).unwrap();
    engine.create_database("db", "").unwrap();
    engine
        .create_form("db", "records", "", FormKind::Document)
        .unwrap();
    (temp_dir, engine)
}

fn user(name: &str, age: i64, city: &str) -> Value {
    let mut fields = BTreeMap::new();
    fields.insert("name".to_string(), Value::from(name));
    fields.insert("age".to_string(), Value::Int(age));
    fields.insert("city".to_string(), Value::from(city));
    Value::Map(fields)
}

fn select_all(engine: &Engine, selector: &Selector) -> Vec<Value> {
    engine.select("db", "records", FIELD_KEY, selector).unwrap()
}

// =============================================================================
// Traversal Order Tests
// =============================================================================

#[test]
fn test_ascending_scan_yields_numeric_key_order() {
    let (_temp, engine) = setup_engine_with_form();

    // Inserted in arbitrary order; identity routing puts numeric keys in
    // numeric tree order
    for key in [110_000u32, 10, 1_100, 1, 10_000, 100, 1_000, 110] {
        engine
            .put(
                "db",
                "records",
                Some(&key.to_string()),
                Value::Int(i64::from(key)),
                false,
            )
            .unwrap();
    }

    let ascending = select_all(&engine, &Selector::new());
    let expected: Vec<Value> = [1i64, 10, 100, 110, 1_000, 1_100, 10_000, 110_000]
        .into_iter()
        .map(Value::Int)
        .collect();
    assert_eq!(ascending, expected, "all 8 values exactly once, in order");
}

#[test]
fn test_descending_scan_is_the_exact_reverse() {
    let (_temp, engine) = setup_engine_with_form();

    for key in [110_000u32, 10, 1_100, 1, 10_000, 100, 1_000, 110] {
        engine
            .put(
                "db",
                "records",
                Some(&key.to_string()),
                Value::Int(i64::from(key)),
                false,
            )
            .unwrap();
    }

    let ascending = select_all(&engine, &Selector::new());
    let descending = select_all(&engine, &Selector::new().descending());

    let mut reversed = ascending.clone();
    reversed.reverse();
    assert_eq!(descending, reversed);
}

#[test]
fn test_empty_form_selects_nothing() {
    let (_temp, engine) = setup_engine_with_form();
    assert!(select_all(&engine, &Selector::new()).is_empty());
}

#[test]
fn test_unfiltered_scan_still_applies_skip_and_limit() {
    let (_temp, engine) = setup_engine_with_form();

    for n in 1..=8u32 {
        engine
            .put("db", "records", None, Value::Int(i64::from(n)), false)
            .unwrap();
    }

    let page = select_all(&engine, &Selector::new().skip(2).limit(3));
    assert_eq!(
        page,
        vec![Value::Int(3), Value::Int(4), Value::Int(5)]
    );

    // Skip past the end is empty, not an error
    assert!(select_all(&engine, &Selector::new().skip(100)).is_empty());
}

// =============================================================================
// Filter Tests
// =============================================================================

fn seed_users(engine: &Engine) {
    for (name, age, city) in [
        ("ana", 28, "lisbon"),
        ("bruno", 35, "porto"),
        ("carla", 41, "lisbon"),
        ("diego", 22, "faro"),
        ("eva", 35, "lisbon"),
    ] {
        engine
            .put("db", "records", Some(name), user(name, age, city), false)
            .unwrap();
    }
}

#[test]
fn test_conditions_filter_by_field() {
    let (_temp, engine) = setup_engine_with_form();
    seed_users(&engine);

    let over_30 = select_all(
        &engine,
        &Selector::new()
            .condition("age", CondOp::Gt, Value::Int(30))
            .sort_by("name", true),
    );
    let names: Vec<_> = over_30
        .iter()
        .map(|v| v.get_path("name").unwrap().clone())
        .collect();
    assert_eq!(
        names,
        vec![Value::from("bruno"), Value::from("carla"), Value::from("eva")]
    );

    let not_35 = select_all(
        &engine,
        &Selector::new().condition("age", CondOp::Dif, Value::Int(35)),
    );
    assert_eq!(not_35.len(), 3);

    let exactly_22 = select_all(
        &engine,
        &Selector::new().condition("age", CondOp::Eq, Value::Int(22)),
    );
    assert_eq!(exactly_22.len(), 1);
}

#[test]
fn test_matches_are_exact_equality() {
    let (_temp, engine) = setup_engine_with_form();
    seed_users(&engine);

    let lisbon = select_all(
        &engine,
        &Selector::new().match_field("city", Value::from("lisbon")),
    );
    assert_eq!(lisbon.len(), 3);

    let nowhere = select_all(
        &engine,
        &Selector::new().match_field("city", Value::from("berlin")),
    );
    assert!(nowhere.is_empty());
}

#[test]
fn test_scope_bounds_the_sort_field() {
    let (_temp, engine) = setup_engine_with_form();
    seed_users(&engine);

    let in_range = select_all(
        &engine,
        &Selector::new()
            .sort_by("age", true)
            .scope(Value::Int(25), Value::Int(36)),
    );
    let ages: Vec<_> = in_range
        .iter()
        .map(|v| v.get_path("age").unwrap().clone())
        .collect();
    assert_eq!(
        ages,
        vec![Value::Int(28), Value::Int(35), Value::Int(35)]
    );
}

#[test]
fn test_scope_without_sort_is_rejected() {
    let (_temp, engine) = setup_engine_with_form();
    seed_users(&engine);

    let err = engine
        .select(
            "db",
            "records",
            FIELD_KEY,
            &Selector::new().scope(Value::Int(0), Value::Int(100)),
        )
        .unwrap_err();
    assert!(matches!(err, radixdb::RadixError::InvalidFieldPath(_)));
}

#[test]
fn test_filters_compose_in_order() {
    let (_temp, engine) = setup_engine_with_form();
    seed_users(&engine);

    // scope on age, then a condition, then a match
    let result = select_all(
        &engine,
        &Selector::new()
            .sort_by("age", true)
            .scope(Value::Int(20), Value::Int(40))
            .condition("age", CondOp::Gt, Value::Int(25))
            .match_field("city", Value::from("lisbon")),
    );
    let names: Vec<_> = result
        .iter()
        .map(|v| v.get_path("name").unwrap().clone())
        .collect();
    assert_eq!(names, vec![Value::from("ana"), Value::from("eva")]);
}

// =============================================================================
// Sort / Pagination Tests
// =============================================================================

#[test]
fn test_sort_descending_with_pagination() {
    let (_temp, engine) = setup_engine_with_form();
    seed_users(&engine);

    let result = select_all(
        &engine,
        &Selector::new().sort_by("age", false).skip(1).limit(2),
    );
    let ages: Vec<_> = result
        .iter()
        .map(|v| v.get_path("age").unwrap().clone())
        .collect();
    // Ages sorted descending: 41, 35, 35, 28, 22 → skip 1, take 2
    assert_eq!(ages, vec![Value::Int(35), Value::Int(35)]);
}

#[test]
fn test_sort_is_stable_for_equal_keys() {
    let (_temp, engine) = setup_engine_with_form();
    seed_users(&engine);

    // bruno and eva share age 35; traversal order breaks the tie and must
    // be preserved by the stable sort
    let result = select_all(&engine, &Selector::new().sort_by("age", true));
    let pair: Vec<_> = result
        .iter()
        .filter(|v| v.get_path("age") == Some(&Value::Int(35)))
        .map(|v| v.get_path("name").unwrap().clone())
        .collect();

    let unsorted = select_all(&engine, &Selector::new());
    let traversal_pair: Vec<_> = unsorted
        .iter()
        .filter(|v| v.get_path("age") == Some(&Value::Int(35)))
        .map(|v| v.get_path("name").unwrap().clone())
        .collect();

    assert_eq!(pair, traversal_pair);
}

// =============================================================================
// Secondary Index Traversal Tests
// =============================================================================

#[test]
fn test_select_over_a_secondary_index() {
    let (_temp, engine) = setup_engine_with_form();
    engine.create_index("db", "records", "age").unwrap();
    seed_users(&engine);

    // Records sharing an indexed value share one Link (bruno and eva are
    // both 35, so the later write owns that bucket entry)
    let by_age = engine
        .select("db", "records", "age", &Selector::new())
        .unwrap();
    assert_eq!(by_age.len(), 4);

    let ages: Vec<_> = by_age
        .iter()
        .map(|v| v.get_path("age").unwrap().clone())
        .collect();
    assert_eq!(
        ages,
        vec![Value::Int(22), Value::Int(28), Value::Int(35), Value::Int(41)],
        "identity routing orders the age index numerically"
    );

    // Unknown index field is NotFound
    assert!(matches!(
        engine
            .select("db", "records", "height", &Selector::new())
            .unwrap_err(),
        radixdb::RadixError::NotFound(_)
    ));
}
