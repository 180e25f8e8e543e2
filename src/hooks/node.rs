//! Per-node post-processing

use crate::context::Context;
use crate::error::Result;
use crate::pagination::{downcast_node, AnyNode};
use async_trait::async_trait;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

/// Transforms every fetched node before the engine truncates the window
#[async_trait]
pub trait NodeProcessor: Send + Sync {
    /// Process one node
    async fn process(&self, ctx: &Context, node: AnyNode) -> Result<AnyNode>;
}

struct FnNodeProcessor<T, F> {
    f: F,
    _node: PhantomData<fn(T) -> T>,
}

#[async_trait]
impl<T, F, Fut> NodeProcessor for FnNodeProcessor<T, F>
where
    T: Send + 'static,
    F: Fn(Context, T) -> Fut + Send + Sync,
    Fut: Future<Output = Result<T>> + Send,
{
    async fn process(&self, ctx: &Context, node: AnyNode) -> Result<AnyNode> {
        let node = downcast_node::<T>(node)?;
        let node = (self.f)(ctx.clone(), node).await?;
        Ok(Box::new(node))
    }
}

/// Adapt a typed async closure into a [`NodeProcessor`]
///
/// Nodes of any other type fail with `Error::NodeType`.
pub fn node_processor_fn<T, F, Fut>(f: F) -> Arc<dyn NodeProcessor>
where
    T: Send + 'static,
    F: Fn(Context, T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    Arc::new(FnNodeProcessor {
        f,
        _node: PhantomData,
    })
}
