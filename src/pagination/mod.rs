//! Pagination module
//!
//! Relay cursor pagination over an injected fetch strategy.
//!
//! # Overview
//!
//! A [`Paginator`] is built once from a [`StrategyFn`] and a list of paginator
//! hooks, then called per request. The engine asks the strategy for one item
//! more than requested (`limit = first/last + 1`), uses the extra item to
//! derive `hasNextPage`/`hasPreviousPage`, and renders cursors lazily so that
//! skipped parts of the connection cost nothing.

mod engine;
mod types;

pub use engine::{validate_request, Paginator, PaginatorBuilder};
pub use types::{
    cursor_fn, downcast_node, erase_strategy, paginate_fn, strategy_fn, unerase_strategy,
    AnyNode, CursorFn, ErasedStrategy, LazyEdge, PaginateFn, StrategyFn, StrategyRequest,
    StrategyResponse,
};

#[cfg(test)]
mod tests;
