use ecommerce_dashboard::ingestion::{ingest_from_path, IngestionOptions};
use ecommerce_dashboard::processing::{
    group_by, inner_join, reduce, sort_by, to_datetime, to_float, AggOp, Aggregation,
    GroupByOptions, JoinOptions, NullKeys, ReduceOp, SortOrder,
};
use ecommerce_dashboard::types::{DataSet, DataType, Field, Schema, Value};
use ecommerce_dashboard::DashboardError;
use proptest::prelude::*;

fn load(name: &str) -> DataSet {
    ingest_from_path(format!("tests/fixtures/{name}"), &IngestionOptions::default()).unwrap()
}

fn keyed(key: &str, other: &str, rows: Vec<(Value, i64)>) -> DataSet {
    DataSet::new(
        Schema::new(vec![
            Field::new(key, DataType::Utf8),
            Field::new(other, DataType::Int64),
        ]),
        rows.into_iter().map(|(k, v)| vec![k, Value::Int64(v)]).collect(),
    )
}

fn s(v: &str) -> Value {
    Value::Utf8(v.to_string())
}

#[test]
fn join_matches_brute_force_nested_loop() {
    let left = keyed(
        "k",
        "a",
        vec![(s("x"), 1), (s("y"), 2), (Value::Null, 3), (s("x"), 4), (s("z"), 5)],
    );
    let right = keyed(
        "k",
        "b",
        vec![(s("x"), 10), (Value::Null, 20), (s("x"), 30), (s("y"), 40)],
    );

    let joined = inner_join(&left, &right, "k", "k", &JoinOptions::default()).unwrap();

    let mut expected = Vec::new();
    for l in &left.rows {
        for r in &right.rows {
            if !l[0].is_null() && l[0] == r[0] {
                expected.push(vec![l[0].clone(), l[1].clone(), r[1].clone()]);
            }
        }
    }
    assert_eq!(joined.rows, expected);
    assert_eq!(joined.schema.field_names().collect::<Vec<_>>(), vec!["k", "a", "b"]);
}

fn arb_keys() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(
        prop_oneof![
            Just(Value::Null),
            Just(s("a")),
            Just(s("b")),
            Just(s("c")),
            Just(s("d")),
        ],
        0..12,
    )
}

fn numbered(key: &str, other: &str, keys: Vec<Value>) -> DataSet {
    keyed(key, other, keys.into_iter().zip(0..).collect())
}

proptest! {
    #[test]
    fn join_agrees_with_nested_loop_on_random_keys(lk in arb_keys(), rk in arb_keys()) {
        let left = numbered("k", "a", lk);
        let right = numbered("k", "b", rk);
        let joined = inner_join(&left, &right, "k", "k", &JoinOptions::default()).unwrap();

        let mut expected = Vec::new();
        for l in &left.rows {
            for r in &right.rows {
                if !l[0].is_null() && l[0] == r[0] {
                    expected.push(vec![l[0].clone(), l[1].clone(), r[1].clone()]);
                }
            }
        }
        prop_assert!(joined.rows.iter().all(|row| !row[0].is_null()));
        prop_assert_eq!(joined.rows, expected);
    }
}

#[test]
fn fixture_joins_drop_unmatched_rows_on_both_sides() {
    let orders = load("data_1_orders.csv");
    let payments = load("data_2_payments.csv");
    let joined = inner_join(&orders, &payments, "order_id", "order_id", &JoinOptions::default()).unwrap();

    // o6 has no payment and o9 has no order; o3 has two payments.
    assert_eq!(joined.row_count(), 6);
    assert_eq!(
        joined.schema.fields.len(),
        orders.schema.fields.len() + payments.schema.fields.len() - 1
    );
    let ids: Vec<String> = joined
        .column_values("order_id")
        .unwrap()
        .map(|v| v.to_string())
        .collect();
    assert_eq!(ids, vec!["o1", "o2", "o3", "o3", "o4", "o5"]);
}

#[test]
fn zero_padded_ids_load_as_text_and_join() {
    let items = load("ids_items.csv");
    let products = load("ids_products.csv");
    assert_eq!(items.schema.fields[1].data_type, DataType::Utf8);
    assert_eq!(items.rows[1][1], s("007"));

    let joined = inner_join(&items, &products, "product_id", "product_id", &JoinOptions::default()).unwrap();
    assert_eq!(joined.row_count(), 2);
    let categories: Vec<String> = joined
        .column_values("product_category_name")
        .unwrap()
        .map(|v| v.to_string())
        .collect();
    assert_eq!(categories, vec!["perfumaria", "bebes"]);
}

#[test]
fn disjoint_join_is_empty_not_an_error() {
    let left = keyed("k", "a", vec![(s("x"), 1)]);
    let right = keyed("k", "b", vec![(s("y"), 2)]);
    let joined = inner_join(&left, &right, "k", "k", &JoinOptions::default()).unwrap();
    assert!(joined.is_empty());
    assert_eq!(joined.schema.fields.len(), 3);
}

#[test]
fn join_with_different_key_names_keeps_both_and_suffixes_collisions() {
    let left = keyed("id", "n", vec![(s("x"), 1)]);
    let right = keyed("ref", "n", vec![(s("x"), 2)]);
    let joined = inner_join(&left, &right, "id", "ref", &JoinOptions::default()).unwrap();
    assert_eq!(
        joined.schema.field_names().collect::<Vec<_>>(),
        vec!["id", "n_x", "ref", "n_y"]
    );
    assert_eq!(joined.rows, vec![vec![s("x"), Value::Int64(1), s("x"), Value::Int64(2)]]);

    let err = inner_join(&left, &right, "id", "missing", &JoinOptions::default()).unwrap_err();
    assert!(matches!(err, DashboardError::MissingColumn { .. }));
}

#[test]
fn coercions_are_idempotent_and_keep_rows() {
    let orders = load("data_1_orders.csv");
    let columns = ["order_purchase_timestamp", "order_approved_at"];
    let once = to_datetime(&orders, &columns).unwrap();
    let twice = to_datetime(&once, &columns).unwrap();
    assert_eq!(once, twice);
    assert_eq!(once.row_count(), orders.row_count());
    assert_eq!(once.schema.fields[3].data_type, DataType::Timestamp);
    // "not a date" becomes null rather than failing the run.
    assert_eq!(once.rows[4][3], Value::Null);
    assert!(matches!(once.rows[0][3], Value::Timestamp(_)));

    let items = load("data_3_items.csv");
    let once = to_float(&items, &["price", "freight_value"]).unwrap();
    assert_eq!(to_float(&once, &["price", "freight_value"]).unwrap(), once);
    assert_eq!(once.rows[0][6], Value::Float64(13.29));
    assert_eq!(once.rows[4][6], Value::Null);
}

#[test]
fn group_sizes_sum_to_row_count() {
    let customers = load("data_5_customers.csv");
    let grouped = group_by(
        &customers,
        &["customer_state"],
        &[Aggregation::new("customer_state", AggOp::Size, "n")],
        GroupByOptions::default(),
    )
    .unwrap();

    let total = reduce(&grouped, "n", ReduceOp::Sum).unwrap();
    assert_eq!(total.as_f64(), Some(customers.row_count() as f64));
    assert_eq!(grouped.rows[0][0], s("RJ"));
}

#[test]
fn sum_aggregation_conserves_column_total() {
    let payments = load("data_2_payments.csv");
    let grouped = group_by(
        &payments,
        &["payment_type"],
        &[Aggregation::new("payment_value", AggOp::Sum, "total")],
        GroupByOptions::default(),
    )
    .unwrap();

    let by_group = reduce(&grouped, "total", ReduceOp::Sum).and_then(|v| v.as_f64()).unwrap();
    let direct = reduce(&payments, "payment_value", ReduceOp::Sum).and_then(|v| v.as_f64()).unwrap();
    assert!((by_group - direct).abs() < 1e-9);
}

#[test]
fn null_keys_can_be_excluded() {
    let customers = load("data_5_customers.csv");
    let opts = GroupByOptions {
        null_keys: NullKeys::Exclude,
    };
    let grouped = group_by(
        &customers,
        &["customer_city"],
        &[Aggregation::new("customer_id", AggOp::Count, "n")],
        opts,
    )
    .unwrap();
    assert_eq!(grouped.row_count(), 4);
    assert!(grouped.rows.iter().all(|r| !r[0].is_null()));
}

#[test]
fn sort_is_stable_with_nulls_last() {
    let ds = keyed(
        "k",
        "v",
        vec![(s("a"), 2), (s("b"), 1), (s("c"), 2), (s("d"), 3)],
    );
    let sorted = sort_by(&ds, "v", SortOrder::Descending).unwrap();
    let keys: Vec<String> = sorted.rows.iter().map(|r| r[0].to_string()).collect();
    assert_eq!(keys, vec!["d", "a", "c", "b"]);

    let sorted = sort_by(&load("data_5_customers.csv"), "customer_city", SortOrder::Ascending).unwrap();
    assert_eq!(sorted.rows.last().unwrap()[3], Value::Null);
    assert_eq!(sorted.rows[0][3], s("franca"));
}

#[test]
fn reduce_count_distinct_ignores_nulls() {
    let customers = load("data_5_customers.csv");
    assert_eq!(
        reduce(&customers, "customer_city", ReduceOp::CountDistinct),
        Some(Value::Int64(4))
    );
    assert_eq!(reduce(&customers, "customer_city", ReduceOp::Count), Some(Value::Int64(7)));
    assert_eq!(reduce(&customers, "nope", ReduceOp::Count), None);
}
