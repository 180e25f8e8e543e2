//! Hooks module
//!
//! Two independent decorator chains with different lifetimes:
//!
//! - **Paginator hooks** wrap the whole pagination contract and are fixed when
//!   a `Paginator` is built. They run outermost-first, in the order given to
//!   the builder (`ensure_limits`, `ensure_primary_order_by`).
//! - **Cursor hooks** wrap only the fetch strategy and are carried per request
//!   through the [`Context`](crate::context::Context), so they can be attached
//!   deep inside a call chain (cursor envelopes).
//!
//! A per-node [`NodeProcessor`] can also be attached to the context; the engine
//! runs it over the overfetched window before truncation.

mod cursor;
mod limits;
mod node;
mod order;

pub use cursor::{apply_cursor_hooks, CursorHook};
pub use limits::{apply_limits, ensure_limits};
pub use node::{node_processor_fn, NodeProcessor};
pub use order::{append_primary_order_by, ensure_primary_order_by};

use crate::pagination::PaginateFn;
use std::sync::Arc;

/// Construction-time hook: receives the next stage, returns its replacement
pub type PaginatorHook<T> = Arc<dyn Fn(PaginateFn<T>) -> PaginateFn<T> + Send + Sync>;
