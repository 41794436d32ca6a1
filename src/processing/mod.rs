//! In-memory data transformations.
//!
//! The processing layer operates on [`crate::types::DataSet`] values produced by ingestion.
//! Every function takes its input by reference and returns a new dataset.
//!
//! - [`inner_join()`]: equi-join with key de-duplication and collision suffixes
//! - [`to_datetime()`], [`to_float()`]: tolerant column type coercion
//! - [`group_by()`]: partition + per-group size/count/sum
//! - [`sort_by()`]: stable single-column ordering
//! - [`reduce()`]: whole-column count/distinct/sum/min/max
//!
//! Row-level predicates and mappers live on the dataset itself
//! ([`crate::types::DataSet::filter_rows`], [`crate::types::DataSet::map_rows`]).
//!
//! ## Example: join → coerce → group
//!
//! ```rust
//! use ecommerce_dashboard::processing::{
//!     group_by, inner_join, to_float, AggOp, Aggregation, GroupByOptions, JoinOptions,
//! };
//! use ecommerce_dashboard::types::{DataSet, DataType, Field, Schema, Value};
//!
//! let items = DataSet::new(
//!     Schema::new(vec![
//!         Field::new("product_id", DataType::Utf8),
//!         Field::new("price", DataType::Utf8),
//!     ]),
//!     vec![
//!         vec![Value::Utf8("p1".into()), Value::Utf8("10".into())],
//!         vec![Value::Utf8("p1".into()), Value::Utf8("2.5".into())],
//!     ],
//! );
//! let products = DataSet::new(
//!     Schema::new(vec![
//!         Field::new("product_id", DataType::Utf8),
//!         Field::new("product_category_name", DataType::Utf8),
//!     ]),
//!     vec![vec![Value::Utf8("p1".into()), Value::Utf8("perfumaria".into())]],
//! );
//!
//! let joined = inner_join(&items, &products, "product_id", "product_id", &JoinOptions::default()).unwrap();
//! let cleaned = to_float(&joined, &["price"]).unwrap();
//! let totals = group_by(
//!     &cleaned,
//!     &["product_category_name"],
//!     &[Aggregation::new("price", AggOp::Sum, "total_price")],
//!     GroupByOptions::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(totals.rows[0][1], Value::Float64(12.5));
//! ```

pub mod coerce;
pub mod group_by;
pub mod join;
pub mod reduce;
pub mod sort;

pub use coerce::{parse_timestamp, to_datetime, to_float};
pub use group_by::{group_by, AggOp, Aggregation, GroupByOptions, NullKeys};
pub use join::{inner_join, JoinOptions};
pub use reduce::{reduce, ReduceOp};
pub use sort::{sort_by, SortOrder};
