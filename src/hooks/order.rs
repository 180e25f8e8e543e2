//! Primary ordering hook

use super::PaginatorHook;
use crate::pagination::{paginate_fn, PaginateFn};
use crate::types::{find_duplicate_field, Order};
use std::sync::Arc;

/// Append every primary order whose field `order_by` does not mention yet
pub fn append_primary_order_by(order_by: &mut Vec<Order>, primary: &[Order]) {
    for order in primary {
        if !order_by.iter().any(|o| o.field == order.field) {
            order_by.push(order.clone());
        }
    }
}

/// Paginator hook guaranteeing a total order
///
/// Keyset pagination needs a unique sort, so the declared tail (typically the
/// primary key) is appended to any request that does not already order by it.
///
/// # Panics
///
/// Panics if `primary` names the same field twice.
pub fn ensure_primary_order_by<T: Send + 'static>(primary: Vec<Order>) -> PaginatorHook<T> {
    if let Some(field) = find_duplicate_field(&primary) {
        panic!("ensure_primary_order_by: duplicate field '{field}'");
    }
    let primary = Arc::new(primary);

    Arc::new(move |next: PaginateFn<T>| {
        let primary = primary.clone();
        paginate_fn(move |ctx, mut request| {
            let next = next.clone();
            append_primary_order_by(&mut request.order_by, &primary);
            async move { next(ctx, request).await }
        })
    })
}
