//! Limit clamping hook

use super::PaginatorHook;
use crate::pagination::{paginate_fn, PaginateFn};
use crate::types::PaginateRequest;
use std::sync::Arc;
use tracing::debug;

/// Normalize `first`/`last` before the engine validates them
///
/// - neither set: `default_limit` goes to `last` when only `before` is given,
///   otherwise to `first`
/// - negative: replaced with `default_limit`
/// - above `max_limit`: clamped to `max_limit`
///
/// Both set is left alone so the engine can reject it.
pub fn apply_limits(request: &mut PaginateRequest, default_limit: i64, max_limit: i64) {
    if request.first.is_none() && request.last.is_none() {
        if request.before.is_some() && request.after.is_none() {
            request.last = Some(default_limit);
        } else {
            request.first = Some(default_limit);
        }
        debug!(default_limit, "Applied default pagination limit");
    }

    for (side, limit) in [("first", &mut request.first), ("last", &mut request.last)] {
        if let Some(value) = limit {
            if *value < 0 {
                debug!(side, value = *value, default_limit, "Replacing negative limit");
                *value = default_limit;
            } else if *value > max_limit {
                debug!(side, value = *value, max_limit, "Clamping limit to maximum");
                *value = max_limit;
            }
        }
    }
}

/// Paginator hook that applies [`apply_limits`] to every request
///
/// # Panics
///
/// Panics if `default_limit` is negative or `max_limit < default_limit`.
pub fn ensure_limits<T: Send + 'static>(default_limit: i64, max_limit: i64) -> PaginatorHook<T> {
    assert!(
        default_limit >= 0,
        "ensure_limits: default_limit must be non-negative, got {default_limit}"
    );
    assert!(
        max_limit >= default_limit,
        "ensure_limits: max_limit ({max_limit}) must be >= default_limit ({default_limit})"
    );

    Arc::new(move |next: PaginateFn<T>| {
        paginate_fn(move |ctx, mut request| {
            let next = next.clone();
            async move {
                apply_limits(&mut request, default_limit, max_limit);
                next(ctx, request).await
            }
        })
    })
}
