//! Request-scoped strategy hooks

use crate::context::Context;
use crate::pagination::{erase_strategy, unerase_strategy, ErasedStrategy, StrategyFn};

/// Wraps the fetch strategy for one request
///
/// Hooks see type-erased nodes; they transform cursors and requests, never
/// the nodes themselves.
pub trait CursorHook: Send + Sync {
    /// Return a strategy that delegates to `next`
    fn wrap(&self, next: ErasedStrategy) -> ErasedStrategy;
}

impl<F> CursorHook for F
where
    F: Fn(ErasedStrategy) -> ErasedStrategy + Send + Sync,
{
    fn wrap(&self, next: ErasedStrategy) -> ErasedStrategy {
        self(next)
    }
}

/// Wrap `strategy` with every cursor hook of the context
///
/// The first hook in the context's list wraps the real strategy directly.
pub fn apply_cursor_hooks<T: Send + 'static>(ctx: &Context, strategy: StrategyFn<T>) -> StrategyFn<T> {
    let hooks = ctx.cursor_hooks();
    if hooks.is_empty() {
        return strategy;
    }

    let erased = hooks
        .iter()
        .fold(erase_strategy(strategy), |next, hook| hook.wrap(next));
    unerase_strategy(erased)
}
