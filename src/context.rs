//! Request-scoped context
//!
//! A `Context` travels alongside every pagination call. It carries the
//! cancellation signal plus optional, rarely-needed configuration (skip flags,
//! a node processor, prepended cursor hooks) so that none of it widens the
//! engine's signatures. A context is immutable: every `with_*` method returns
//! a new snapshot and leaves the original untouched.

use crate::error::{Error, Result};
use crate::hooks::{CursorHook, NodeProcessor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

// ============================================================================
// Skip Flags
// ============================================================================

/// Which parts of a connection the caller does not need
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skip {
    #[serde(default)]
    pub edges: bool,
    #[serde(default)]
    pub nodes: bool,
    #[serde(default)]
    pub page_info: bool,
    #[serde(default)]
    pub total_count: bool,
}

impl Skip {
    /// Skip everything
    pub fn all() -> Self {
        Self {
            edges: true,
            nodes: true,
            page_info: true,
            total_count: true,
        }
    }

    /// Check if every aspect is skipped
    pub fn is_all(&self) -> bool {
        self.edges && self.nodes && self.page_info && self.total_count
    }

    /// Derive skip flags from the top-level connection fields a caller selected
    ///
    /// Recognized names are `edges`, `nodes`, `pageInfo` and `totalCount`;
    /// anything not selected is skipped.
    pub fn from_selection<S: AsRef<str>>(selected: &[S]) -> Self {
        let has = |name: &str| selected.iter().any(|s| s.as_ref() == name);
        Self {
            edges: !has("edges"),
            nodes: !has("nodes"),
            page_info: !has("pageInfo"),
            total_count: !has("totalCount"),
        }
    }
}

// ============================================================================
// Cancellation
// ============================================================================

/// Cancels every context derived from the one it was created with
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Signal cancellation
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Check if cancellation was signalled
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

// ============================================================================
// Context
// ============================================================================

#[derive(Clone, Default)]
struct ContextInner {
    cancel: Vec<watch::Receiver<bool>>,
    skip: Skip,
    node_processor: Option<Arc<dyn NodeProcessor>>,
    cursor_hooks: Vec<Arc<dyn CursorHook>>,
}

/// Immutable request-scoped configuration bag
#[derive(Clone, Default)]
pub struct Context {
    inner: Arc<ContextInner>,
}

impl Context {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    fn derive(&self, f: impl FnOnce(&mut ContextInner)) -> Self {
        let mut inner = (*self.inner).clone();
        f(&mut inner);
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Derive a cancellable context
    ///
    /// The child is cancelled when either the returned handle or any
    /// cancellation source of `self` fires.
    pub fn with_cancel(&self) -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        let ctx = self.derive(|inner| inner.cancel.push(rx));
        (ctx, CancelHandle { tx })
    }

    /// Check if the context was cancelled
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancel.iter().any(|rx| *rx.borrow())
    }

    /// Return `Error::Cancelled` if the context was cancelled
    pub fn check_cancelled(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Resolve once the context is cancelled
    ///
    /// Never resolves for a context without cancellation sources.
    pub async fn cancelled(&self) {
        let waits = self.inner.cancel.iter().cloned().map(|mut rx| {
            Box::pin(async move {
                loop {
                    if *rx.borrow_and_update() {
                        return;
                    }
                    if rx.changed().await.is_err() {
                        // Handle dropped without cancelling
                        futures::future::pending::<()>().await;
                    }
                }
            })
        });
        let waits: Vec<_> = waits.collect();
        if waits.is_empty() {
            futures::future::pending::<()>().await;
        } else {
            futures::future::select_all(waits).await;
        }
    }

    /// Skip flags for this call
    pub fn skip(&self) -> Skip {
        self.inner.skip
    }

    /// Derive a context with the given skip flags
    #[must_use]
    pub fn with_skip(&self, skip: Skip) -> Self {
        self.derive(|inner| inner.skip = skip)
    }

    /// Node processor for this call
    pub fn node_processor(&self) -> Option<&Arc<dyn NodeProcessor>> {
        self.inner.node_processor.as_ref()
    }

    /// Derive a context with a node processor
    #[must_use]
    pub fn with_node_processor(&self, processor: Arc<dyn NodeProcessor>) -> Self {
        self.derive(|inner| inner.node_processor = Some(processor))
    }

    /// Cursor hooks, innermost first
    pub fn cursor_hooks(&self) -> &[Arc<dyn CursorHook>] {
        &self.inner.cursor_hooks
    }

    /// Derive a context with extra cursor hooks in front of the existing ones
    ///
    /// Hooks are applied in list order, so the most recently prepended hook
    /// ends up closest to the real strategy.
    #[must_use]
    pub fn prepend_cursor_hooks(
        &self,
        hooks: impl IntoIterator<Item = Arc<dyn CursorHook>>,
    ) -> Self {
        self.derive(|inner| {
            let mut chain: Vec<_> = hooks.into_iter().collect();
            chain.append(&mut inner.cursor_hooks);
            inner.cursor_hooks = chain;
        })
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("cancelled", &self.is_cancelled())
            .field("skip", &self.inner.skip)
            .field("node_processor", &self.inner.node_processor.is_some())
            .field("cursor_hooks", &self.inner.cursor_hooks.len())
            .finish()
    }
}
