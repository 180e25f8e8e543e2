//! Relay pagination engine
//!
//! Validates the request, overfetches by one, invokes the strategy, truncates
//! the window and renders only the parts of the connection the caller needs.

use super::types::{
    downcast_node, paginate_fn, AnyNode, CursorFn, LazyEdge, PaginateFn, StrategyFn,
    StrategyRequest,
};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::hooks::{apply_cursor_hooks, PaginatorHook};
use crate::types::{find_duplicate_field, Connection, Edge, PageInfo, PaginateRequest};
use tracing::{debug, warn};

// ============================================================================
// Paginator
// ============================================================================

/// Relay paginator: the engine plus its construction-time hooks
///
/// Immutable once built; clone it freely and share it across tasks.
pub struct Paginator<T> {
    paginate: PaginateFn<T>,
}

impl<T> Clone for Paginator<T> {
    fn clone(&self) -> Self {
        Self {
            paginate: self.paginate.clone(),
        }
    }
}

impl<T> Paginator<T>
where
    T: Clone + Send + 'static,
{
    /// Create a paginator without hooks
    pub fn new(strategy: StrategyFn<T>) -> Self {
        Self::builder().strategy(strategy).build()
    }

    /// Start building a paginator
    pub fn builder() -> PaginatorBuilder<T> {
        PaginatorBuilder {
            strategy: None,
            hooks: Vec::new(),
        }
    }

    /// Paginate one request
    pub async fn paginate(&self, ctx: &Context, request: PaginateRequest) -> Result<Connection<T>> {
        (self.paginate)(ctx.clone(), request).await
    }
}

/// Builder for [`Paginator`]
pub struct PaginatorBuilder<T> {
    strategy: Option<StrategyFn<T>>,
    hooks: Vec<PaginatorHook<T>>,
}

impl<T> PaginatorBuilder<T>
where
    T: Clone + Send + 'static,
{
    /// Set the fetch strategy
    #[must_use]
    pub fn strategy(mut self, strategy: StrategyFn<T>) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Add a paginator hook; earlier hooks run outermost
    #[must_use]
    pub fn hook(mut self, hook: PaginatorHook<T>) -> Self {
        self.hooks.push(hook);
        self
    }

    /// Add several paginator hooks
    #[must_use]
    pub fn hooks(mut self, hooks: impl IntoIterator<Item = PaginatorHook<T>>) -> Self {
        self.hooks.extend(hooks);
        self
    }

    /// Build the paginator
    ///
    /// # Panics
    ///
    /// Panics if no strategy was supplied.
    pub fn build(self) -> Paginator<T> {
        let Some(strategy) = self.strategy else {
            panic!("Paginator requires a fetch strategy");
        };

        let core = paginate_fn(move |ctx, request| paginate_core(strategy.clone(), ctx, request));
        let paginate = self
            .hooks
            .iter()
            .rev()
            .fold(core, |next, hook| hook(next));

        Paginator { paginate }
    }
}

// ============================================================================
// Core Algorithm
// ============================================================================

/// Validate a request the way the engine does
pub fn validate_request(request: &PaginateRequest) -> Result<()> {
    match (request.first, request.last) {
        (Some(_), Some(_)) => {
            return Err(Error::invalid_request(
                "first and last cannot be used together",
            ))
        }
        (None, None) => return Err(Error::invalid_request("first or last must be set")),
        (Some(first), None) if first < 0 => {
            return Err(Error::invalid_request(format!(
                "first must be a non-negative integer, got {first}"
            )))
        }
        (None, Some(last)) if last < 0 => {
            return Err(Error::invalid_request(format!(
                "last must be a non-negative integer, got {last}"
            )))
        }
        _ => {}
    }

    if let (Some(after), Some(before)) = (&request.after, &request.before) {
        if after == before {
            return Err(Error::invalid_request(
                "after and before cannot be the same cursor",
            ));
        }
    }

    if let Some(field) = find_duplicate_field(&request.order_by) {
        return Err(Error::duplicate_field(field));
    }

    Ok(())
}

async fn paginate_core<T>(
    strategy: StrategyFn<T>,
    ctx: Context,
    request: PaginateRequest,
) -> Result<Connection<T>>
where
    T: Clone + Send + 'static,
{
    validate_request(&request)?;

    let skip = ctx.skip();
    if skip.is_all() {
        return Ok(Connection::default());
    }

    // Validated above: exactly one side is set and it is non-negative.
    let first = request.first.map(|n| n as usize);
    let last = request.last.map(|n| n as usize);
    let count = first.or(last).unwrap_or_default();

    let strategy_request = StrategyRequest {
        after: request.after.clone(),
        before: request.before.clone(),
        order_by: request.order_by,
        limit: count + 1,
        from_end: last.is_some(),
    };

    debug!(
        limit = strategy_request.limit,
        from_end = strategy_request.from_end,
        has_after = strategy_request.after.is_some(),
        has_before = strategy_request.before.is_some(),
        "Invoking pagination strategy"
    );

    ctx.check_cancelled()?;
    let strategy = apply_cursor_hooks(&ctx, strategy);
    let response = strategy(ctx.clone(), strategy_request.clone())
        .await
        .map_err(|e| wrap_strategy_error(e, &strategy_request))?;

    let mut lazy_edges = response.lazy_edges;
    if lazy_edges.len() > strategy_request.limit {
        warn!(
            returned = lazy_edges.len(),
            limit = strategy_request.limit,
            "Strategy returned more edges than requested"
        );
    }

    if let Some(processor) = ctx.node_processor() {
        let mut processed = Vec::with_capacity(lazy_edges.len());
        for edge in lazy_edges {
            let node = processor.process(&ctx, Box::new(edge.node) as AnyNode).await?;
            processed.push(LazyEdge::new(downcast_node::<T>(node)?, edge.cursor));
        }
        lazy_edges = processed;
    }

    let mut has_next_page = false;
    let mut has_previous_page = false;

    if let Some(first) = first {
        if lazy_edges.len() > first {
            lazy_edges.truncate(first);
            has_next_page = true;
        }
    }
    if request.before.is_some() && response.has_before_or_next {
        has_next_page = true;
    }

    if let Some(last) = last {
        if lazy_edges.len() > last {
            lazy_edges.drain(..lazy_edges.len() - last);
            has_previous_page = true;
        }
    }
    if request.after.is_some() && response.has_after_or_previous {
        has_previous_page = true;
    }

    debug!(
        edges = lazy_edges.len(),
        has_next_page, has_previous_page, "Pagination window resolved"
    );

    let mut connection = Connection::default();

    let renderers: Vec<CursorFn> = lazy_edges.iter().map(|edge| edge.cursor.clone()).collect();

    let cursors = if skip.edges {
        None
    } else {
        let mut cursors = Vec::with_capacity(renderers.len());
        for (index, renderer) in renderers.iter().enumerate() {
            cursors.push(render_cursor(&ctx, index, renderer).await?);
        }
        Some(cursors)
    };

    if !skip.page_info {
        let (start_cursor, end_cursor) = match &cursors {
            Some(cursors) => (cursors.first().cloned(), cursors.last().cloned()),
            None => boundary_cursors(&ctx, &renderers).await?,
        };
        connection.page_info = Some(PageInfo {
            has_next_page,
            has_previous_page,
            start_cursor,
            end_cursor,
        });
    }

    if !skip.total_count {
        connection.total_count = response.total_count;
    }

    let nodes: Vec<T> = lazy_edges.into_iter().map(|edge| edge.node).collect();

    if let Some(cursors) = cursors {
        if !skip.nodes {
            connection.nodes = Some(nodes.clone());
        }
        connection.edges = Some(
            nodes
                .into_iter()
                .zip(cursors)
                .map(|(node, cursor)| Edge { node, cursor })
                .collect(),
        );
    } else if !skip.nodes {
        connection.nodes = Some(nodes);
    }

    Ok(connection)
}

/// Start and end cursors rendered straight from the lazy edges
async fn boundary_cursors(
    ctx: &Context,
    renderers: &[CursorFn],
) -> Result<(Option<String>, Option<String>)> {
    let Some(first) = renderers.first() else {
        return Ok((None, None));
    };

    let start = render_cursor(ctx, 0, first).await?;
    let last_index = renderers.len() - 1;
    let end = if last_index == 0 {
        start.clone()
    } else {
        render_cursor(ctx, last_index, &renderers[last_index]).await?
    };

    Ok((Some(start), Some(end)))
}

async fn render_cursor(ctx: &Context, index: usize, renderer: &CursorFn) -> Result<String> {
    ctx.check_cancelled()?;
    renderer(ctx.clone()).await.map_err(|e| match e {
        Error::Cancelled => e,
        e => Error::CursorRender {
            index,
            source: Box::new(e),
        },
    })
}

/// Client and cancellation errors keep their kind; anything else is opaque
fn wrap_strategy_error(error: Error, request: &StrategyRequest) -> Error {
    if error.is_client_error() || matches!(error, Error::Cancelled) {
        return error;
    }

    Error::Strategy {
        limit: request.limit,
        from_end: request.from_end,
        after: request.after.clone(),
        before: request.before.clone(),
        source: Box::new(error),
    }
}

