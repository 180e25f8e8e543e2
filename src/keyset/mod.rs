//! Keyset module
//!
//! Translates a multi-column sort order and a cursor's values into a
//! storage-independent seek condition.
//!
//! # Overview
//!
//! Storage adapters are expected to:
//! 1. [`decode_boundaries`] of the strategy request
//! 2. filter with [`Boundaries::filter`] (or [`keyset_filter`])
//! 3. order by [`query_order`] and fetch `limit` rows
//! 4. reverse the rows when `from_end` is set

mod builder;
mod types;

pub use builder::{
    build_boundary, decode_boundaries, keyset_filter, query_order, Boundaries,
};
pub use types::{BoundaryExpression, CompareOp};
