//! Pagination types and function shapes
//!
//! Defines the contract between the engine and the injected fetch strategy,
//! plus the boxed function shapes the hook chains wrap.

use crate::context::Context;
use crate::error::{Error, Result};
use crate::types::{Connection, Order, PaginateRequest};
use futures::future::{BoxFuture, FutureExt};
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

// ============================================================================
// Function Shapes
// ============================================================================

/// Deferred cursor renderer bound to one node
pub type CursorFn = Arc<dyn Fn(Context) -> BoxFuture<'static, Result<String>> + Send + Sync>;

/// Fetch strategy: turns a strategy request into lazily-rendered edges
pub type StrategyFn<T> = Arc<
    dyn Fn(Context, StrategyRequest) -> BoxFuture<'static, Result<StrategyResponse<T>>>
        + Send
        + Sync,
>;

/// The whole pagination contract, as wrapped by paginator hooks
pub type PaginateFn<T> =
    Arc<dyn Fn(Context, PaginateRequest) -> BoxFuture<'static, Result<Connection<T>>> + Send + Sync>;

/// Type-erased node, as seen by request-scoped hooks
pub type AnyNode = Box<dyn Any + Send>;

/// Strategy over type-erased nodes
pub type ErasedStrategy = StrategyFn<AnyNode>;

/// Wrap an async closure into a [`StrategyFn`]
pub fn strategy_fn<T, F, Fut>(f: F) -> StrategyFn<T>
where
    F: Fn(Context, StrategyRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<StrategyResponse<T>>> + Send + 'static,
{
    Arc::new(move |ctx, req| f(ctx, req).boxed())
}

/// Wrap an async closure into a [`CursorFn`]
pub fn cursor_fn<F, Fut>(f: F) -> CursorFn
where
    F: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String>> + Send + 'static,
{
    Arc::new(move |ctx| f(ctx).boxed())
}

/// Wrap an async closure into a [`PaginateFn`]
pub fn paginate_fn<T, F, Fut>(f: F) -> PaginateFn<T>
where
    F: Fn(Context, PaginateRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Connection<T>>> + Send + 'static,
{
    Arc::new(move |ctx, req| f(ctx, req).boxed())
}

// ============================================================================
// Lazy Edges
// ============================================================================

/// A node whose cursor has not been rendered yet
pub struct LazyEdge<T> {
    pub node: T,
    pub cursor: CursorFn,
}

impl<T> LazyEdge<T> {
    /// Create a lazy edge
    pub fn new(node: T, cursor: CursorFn) -> Self {
        Self { node, cursor }
    }

    /// Lazy edge with an already known cursor
    pub fn with_cursor(node: T, cursor: impl Into<String>) -> Self {
        let cursor = cursor.into();
        Self::new(
            node,
            cursor_fn(move |_ctx| {
                let cursor = cursor.clone();
                async move { Ok(cursor) }
            }),
        )
    }

    /// Render the cursor
    pub async fn render(&self, ctx: &Context) -> Result<String> {
        (self.cursor)(ctx.clone()).await
    }

    /// Replace the node, keeping the cursor renderer
    pub fn map_node<U>(self, f: impl FnOnce(T) -> U) -> LazyEdge<U> {
        LazyEdge {
            node: f(self.node),
            cursor: self.cursor,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for LazyEdge<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyEdge")
            .field("node", &self.node)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Strategy Contract
// ============================================================================

/// What the engine asks the strategy to fetch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrategyRequest {
    pub after: Option<String>,
    pub before: Option<String>,
    pub order_by: Vec<Order>,
    /// Requested count plus one
    pub limit: usize,
    /// Count from the tail (`last` was used)
    pub from_end: bool,
}

/// What the strategy hands back to the engine
pub struct StrategyResponse<T> {
    /// Edges in declared order, at most `limit` of them
    pub lazy_edges: Vec<LazyEdge<T>>,
    pub total_count: Option<i64>,
    /// Items exist past the `before` cursor
    pub has_before_or_next: bool,
    /// Items exist before the `after` cursor
    pub has_after_or_previous: bool,
}

impl<T> Default for StrategyResponse<T> {
    fn default() -> Self {
        Self {
            lazy_edges: Vec::new(),
            total_count: None,
            has_before_or_next: false,
            has_after_or_previous: false,
        }
    }
}

impl<T> StrategyResponse<T> {
    /// Create a response from lazy edges
    pub fn new(lazy_edges: Vec<LazyEdge<T>>) -> Self {
        Self {
            lazy_edges,
            ..Default::default()
        }
    }

    /// Set the total count
    #[must_use]
    pub fn with_total_count(mut self, total_count: i64) -> Self {
        self.total_count = Some(total_count);
        self
    }

    /// Map every node, keeping the cursors
    pub fn map_nodes<U>(self, mut f: impl FnMut(T) -> U) -> StrategyResponse<U> {
        StrategyResponse {
            lazy_edges: self
                .lazy_edges
                .into_iter()
                .map(|edge| edge.map_node(&mut f))
                .collect(),
            total_count: self.total_count,
            has_before_or_next: self.has_before_or_next,
            has_after_or_previous: self.has_after_or_previous,
        }
    }

    /// Map every node with a fallible function
    pub fn try_map_nodes<U>(
        self,
        mut f: impl FnMut(T) -> Result<U>,
    ) -> Result<StrategyResponse<U>> {
        let mut lazy_edges = Vec::with_capacity(self.lazy_edges.len());
        for edge in self.lazy_edges {
            lazy_edges.push(LazyEdge {
                node: f(edge.node)?,
                cursor: edge.cursor,
            });
        }
        Ok(StrategyResponse {
            lazy_edges,
            total_count: self.total_count,
            has_before_or_next: self.has_before_or_next,
            has_after_or_previous: self.has_after_or_previous,
        })
    }
}

impl<T: fmt::Debug> fmt::Debug for StrategyResponse<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyResponse")
            .field("lazy_edges", &self.lazy_edges)
            .field("total_count", &self.total_count)
            .field("has_before_or_next", &self.has_before_or_next)
            .field("has_after_or_previous", &self.has_after_or_previous)
            .finish()
    }
}

// ============================================================================
// Type Erasure
// ============================================================================

/// Recover a typed node from an erased one
pub fn downcast_node<T: 'static>(node: AnyNode) -> Result<T> {
    node.downcast::<T>()
        .map(|node| *node)
        .map_err(|_| Error::NodeType {
            expected: std::any::type_name::<T>(),
        })
}

/// Erase the node type of a strategy
pub fn erase_strategy<T: Send + 'static>(strategy: StrategyFn<T>) -> ErasedStrategy {
    strategy_fn(move |ctx, req| {
        let fut = strategy(ctx, req);
        async move {
            let response = fut.await?;
            Ok(response.map_nodes(|node| Box::new(node) as AnyNode))
        }
    })
}

/// Restore the node type of an erased strategy
pub fn unerase_strategy<T: Send + 'static>(strategy: ErasedStrategy) -> StrategyFn<T> {
    strategy_fn(move |ctx, req| {
        let fut = strategy(ctx, req);
        async move { fut.await?.try_map_nodes(downcast_node::<T>) }
    })
}
