// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::type_complexity)]

//! # Relay Pagination
//!
//! Relay-style cursor pagination for Rust services, independent of the
//! storage backend behind it.
//!
//! ## Features
//!
//! - **Relay Engine**: `first`/`after`/`last`/`before` with overfetch-by-one
//!   page detection and lazily rendered cursors
//! - **Keyset Boundaries**: seek predicates for any multi-key ordering,
//!   expressed as a backend-independent expression tree
//! - **Opaque Cursors**: deterministic JSON cursors with Base64 or AES-GCM
//!   envelopes
//! - **Composable Hooks**: default/max limits and primary ordering at build
//!   time, cursor envelopes and node processors per request
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use relay_pagination::{
//!     ensure_limits, ensure_primary_order_by, strategy_fn, Context, Order, PaginateRequest,
//!     Paginator,
//! };
//!
//! let paginator = Paginator::builder()
//!     .strategy(strategy_fn(|ctx, request| async move { fetch_users(ctx, request).await }))
//!     .hook(ensure_limits(10, 100))
//!     .hook(ensure_primary_order_by(vec![Order::asc("ID")]))
//!     .build();
//!
//! let connection = paginator
//!     .paginate(&Context::new(), PaginateRequest::new().first(2).after(cursor))
//!     .await?;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 Paginator::paginate(ctx, request)               │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//!            paginator hooks (ensure_limits, primary order)
//!                                │
//! ┌─────────────────────────────────────────────────────────────────┐
//! │ Engine: validate → overfetch → strategy → truncate → render     │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//!           cursor hooks from Context (Base64 / AES-GCM envelope)
//!                                │
//! ┌──────────────────────┬──────────────────────┬───────────────────┐
//! │   Fetch Strategy     │   Keyset Builder     │   Cursor Codec    │
//! ├──────────────────────┼──────────────────────┼───────────────────┤
//! │ user supplied        │ OR-of-ANDs boundary  │ ordered JSON      │
//! │ returns LazyEdges    │ query_order          │ exact key sets    │
//! └──────────────────────┴──────────────────────┴───────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)] // TODO: Document enum variant fields before 1.0 release

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Request and connection types
pub mod types;

/// Request-scoped context
pub mod context;

/// Relay pagination engine
pub mod pagination;

/// Cursor codec and envelopes
pub mod cursor;

/// Keyset boundary builder
pub mod keyset;

/// Paginator and cursor hooks
pub mod hooks;

/// Paginator configuration
pub mod config;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::{CursorSecurity, PaginatorConfig};
pub use context::{CancelHandle, Context, Skip};
pub use cursor::{
    aes_gcm_envelope, base64_envelope, decode_cursor, encode_cursor, lazy_edge, CursorValues,
};
pub use hooks::{
    ensure_limits, ensure_primary_order_by, node_processor_fn, CursorHook, NodeProcessor,
    PaginatorHook,
};
pub use keyset::{
    build_boundary, decode_boundaries, keyset_filter, query_order, Boundaries, BoundaryExpression,
    CompareOp,
};
pub use pagination::{
    cursor_fn, strategy_fn, LazyEdge, Paginator, PaginatorBuilder, StrategyFn, StrategyRequest,
    StrategyResponse,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
