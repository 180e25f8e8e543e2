//! Tests for pagination module

use super::*;
use crate::context::{Context, Skip};
use crate::error::Error;
use crate::hooks::node_processor_fn;
use crate::types::{Order, PaginateRequest};
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use test_case::test_case;

// ============================================================================
// Helpers
// ============================================================================

#[derive(Default)]
struct Counters {
    strategy_calls: AtomicUsize,
    renders: AtomicUsize,
}

/// Strategy over the items `1..=available`, honoring `limit` and `from_end`
fn scripted(
    available: usize,
    has_before_or_next: bool,
    has_after_or_previous: bool,
    counters: Arc<Counters>,
) -> StrategyFn<i64> {
    strategy_fn(move |_ctx, request: StrategyRequest| {
        counters.strategy_calls.fetch_add(1, Ordering::SeqCst);
        let counters = counters.clone();
        async move {
            let items: Vec<i64> = (1..=available as i64).collect();
            let window: Vec<i64> = if request.from_end {
                let start = items.len().saturating_sub(request.limit);
                items[start..].to_vec()
            } else {
                items.into_iter().take(request.limit).collect()
            };

            let lazy_edges = window
                .into_iter()
                .map(|n| {
                    let counters = counters.clone();
                    LazyEdge::new(
                        n,
                        cursor_fn(move |_ctx| {
                            counters.renders.fetch_add(1, Ordering::SeqCst);
                            async move { Ok(format!("c{n}")) }
                        }),
                    )
                })
                .collect();

            Ok(StrategyResponse {
                lazy_edges,
                total_count: Some(available as i64),
                has_before_or_next,
                has_after_or_previous,
            })
        }
    })
}

fn paginator(available: usize) -> (Paginator<i64>, Arc<Counters>) {
    let counters = Arc::new(Counters::default());
    let paginator = Paginator::new(scripted(available, false, false, counters.clone()));
    (paginator, counters)
}

fn node_ids(connection: &crate::types::Connection<i64>) -> Vec<i64> {
    connection
        .edges
        .as_ref()
        .unwrap()
        .iter()
        .map(|e| e.node)
        .collect()
}

// ============================================================================
// Overfetch And Truncation
// ============================================================================

#[test_case(0 ; "empty")]
#[test_case(3 ; "short page")]
#[test_case(5 ; "exact page")]
#[test_case(6 ; "one extra")]
#[test_case(50 ; "many more")]
#[tokio::test]
async fn test_first_truncation(available: usize) {
    let (paginator, _) = paginator(available);
    let connection = paginator
        .paginate(&Context::new(), PaginateRequest::new().first(5))
        .await
        .unwrap();

    let expected: Vec<i64> = (1..=available.min(5) as i64).collect();
    assert_eq!(node_ids(&connection), expected);
    assert_eq!(connection.nodes, Some(expected));

    let page_info = connection.page_info.unwrap();
    assert_eq!(page_info.has_next_page, available > 5);
    assert!(!page_info.has_previous_page);
    assert_eq!(connection.total_count, Some(available as i64));
}

#[test_case(0 ; "empty")]
#[test_case(3 ; "short page")]
#[test_case(5 ; "exact page")]
#[test_case(6 ; "one extra")]
#[test_case(50 ; "many more")]
#[tokio::test]
async fn test_last_truncation(available: usize) {
    let (paginator, _) = paginator(available);
    let connection = paginator
        .paginate(&Context::new(), PaginateRequest::new().last(5))
        .await
        .unwrap();

    let start = available.saturating_sub(5) as i64 + 1;
    let expected: Vec<i64> = (start..=available as i64).collect();
    assert_eq!(node_ids(&connection), expected);

    let page_info = connection.page_info.unwrap();
    assert_eq!(page_info.has_previous_page, available > 5);
    assert!(!page_info.has_next_page);
}

#[tokio::test]
async fn test_strategy_request_shape() {
    let seen = Arc::new(std::sync::Mutex::new(None));
    let capture = seen.clone();
    let paginator = Paginator::new(strategy_fn(move |_ctx, request: StrategyRequest| {
        *capture.lock().unwrap() = Some(request);
        async { Ok(StrategyResponse::<i64>::default()) }
    }));

    paginator
        .paginate(
            &Context::new(),
            PaginateRequest::new()
                .last(7)
                .before("b")
                .order_by(vec![Order::asc("ID")]),
        )
        .await
        .unwrap();

    let request = seen.lock().unwrap().take().unwrap();
    assert_eq!(
        request,
        StrategyRequest {
            after: None,
            before: Some("b".into()),
            order_by: vec![Order::asc("ID")],
            limit: 8,
            from_end: true,
        }
    );
}

#[tokio::test]
async fn test_first_zero_probes_for_next_page() {
    let (paginator, _) = paginator(3);
    let connection = paginator
        .paginate(&Context::new(), PaginateRequest::new().first(0))
        .await
        .unwrap();

    assert_eq!(connection.edges, Some(vec![]));
    let page_info = connection.page_info.unwrap();
    assert!(page_info.has_next_page);
    assert_eq!(page_info.start_cursor, None);
    assert_eq!(page_info.end_cursor, None);
}

// ============================================================================
// Boundary Flags
// ============================================================================

#[tokio::test]
async fn test_boundary_flags_need_their_cursor() {
    let counters = Arc::new(Counters::default());
    let paginator = Paginator::new(scripted(3, true, true, counters));

    let connection = paginator
        .paginate(&Context::new(), PaginateRequest::new().first(5))
        .await
        .unwrap();
    let page_info = connection.page_info.unwrap();
    assert!(!page_info.has_next_page);
    assert!(!page_info.has_previous_page);

    let connection = paginator
        .paginate(
            &Context::new(),
            PaginateRequest::new().first(5).after("a").before("b"),
        )
        .await
        .unwrap();
    let page_info = connection.page_info.unwrap();
    assert!(page_info.has_next_page);
    assert!(page_info.has_previous_page);
}

#[tokio::test]
async fn test_overfetch_and_boundary_flag_combine() {
    let counters = Arc::new(Counters::default());
    let paginator = Paginator::new(scripted(10, false, true, counters));

    let connection = paginator
        .paginate(&Context::new(), PaginateRequest::new().first(2).after("a"))
        .await
        .unwrap();
    let page_info = connection.page_info.unwrap();
    assert!(page_info.has_next_page);
    assert!(page_info.has_previous_page);
    assert_eq!(page_info.start_cursor.as_deref(), Some("c1"));
    assert_eq!(page_info.end_cursor.as_deref(), Some("c2"));
}

// ============================================================================
// Validation
// ============================================================================

#[test_case(PaginateRequest::new() ; "neither first nor last")]
#[test_case(PaginateRequest::new().first(1).last(1) ; "both first and last")]
#[test_case(PaginateRequest::new().first(-1) ; "negative first")]
#[test_case(PaginateRequest::new().last(-3) ; "negative last")]
#[test_case(PaginateRequest::new().first(1).after("x").before("x") ; "identical cursors")]
#[tokio::test]
async fn test_invalid_requests_fail_fast(request: PaginateRequest) {
    let (paginator, counters) = paginator(10);
    let err = paginator
        .paginate(&Context::new(), request)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidRequest { .. }), "got {err:?}");
    assert_eq!(counters.strategy_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_duplicate_order_field_is_named() {
    let (paginator, _) = paginator(10);
    let request = PaginateRequest::new()
        .first(1)
        .order_by(vec![Order::asc("ID"), Order::desc("ID")]);

    let err = paginator
        .paginate(&Context::new(), request)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateOrderField { ref field } if field == "ID"));
    assert!(err.to_string().contains("ID"));
}

#[test]
#[should_panic(expected = "fetch strategy")]
fn test_build_without_strategy_panics() {
    let _ = Paginator::<i64>::builder().build();
}

// ============================================================================
// Skip Flags
// ============================================================================

#[tokio::test]
async fn test_skip_all_never_invokes_strategy() {
    let (paginator, counters) = paginator(10);

    let ctx = Context::new().with_skip(Skip::all());
    let connection = paginator
        .paginate(&ctx, PaginateRequest::new().first(1))
        .await
        .unwrap();
    assert!(connection.is_empty());
    assert_eq!(counters.strategy_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_skip_all_still_validates() {
    let (paginator, counters) = paginator(10);
    let ctx = Context::new().with_skip(Skip::all());

    let err = paginator
        .paginate(&ctx, PaginateRequest::new().first(1).last(1))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidRequest { .. }), "got {err:?}");

    let err = paginator
        .paginate(
            &ctx,
            PaginateRequest::new()
                .first(1)
                .order_by(vec![Order::asc("ID"), Order::desc("ID")]),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateOrderField { ref field } if field == "ID"));
    assert_eq!(counters.strategy_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_cursors_render_once_per_edge() {
    let (paginator, counters) = paginator(10);
    let connection = paginator
        .paginate(&Context::new(), PaginateRequest::new().first(4))
        .await
        .unwrap();

    assert_eq!(connection.edges.as_ref().unwrap().len(), 4);
    assert_eq!(counters.renders.load(Ordering::SeqCst), 4);
    let page_info = connection.page_info.unwrap();
    assert_eq!(page_info.start_cursor.as_deref(), Some("c1"));
    assert_eq!(page_info.end_cursor.as_deref(), Some("c4"));
}

#[tokio::test]
async fn test_skip_edges_renders_only_boundary_cursors() {
    let (paginator, counters) = paginator(10);
    let ctx = Context::new().with_skip(Skip {
        edges: true,
        ..Default::default()
    });

    let connection = paginator
        .paginate(&ctx, PaginateRequest::new().first(4))
        .await
        .unwrap();

    assert!(connection.edges.is_none());
    assert_eq!(connection.nodes, Some(vec![1, 2, 3, 4]));
    assert_eq!(counters.renders.load(Ordering::SeqCst), 2);

    let page_info = connection.page_info.unwrap();
    assert_eq!(page_info.start_cursor.as_deref(), Some("c1"));
    assert_eq!(page_info.end_cursor.as_deref(), Some("c4"));
}

#[tokio::test]
async fn test_skip_edges_single_node_renders_once() {
    let (paginator, counters) = paginator(1);
    let ctx = Context::new().with_skip(Skip {
        edges: true,
        ..Default::default()
    });

    let connection = paginator
        .paginate(&ctx, PaginateRequest::new().first(4))
        .await
        .unwrap();

    let page_info = connection.page_info.unwrap();
    assert_eq!(page_info.start_cursor, page_info.end_cursor);
    assert_eq!(counters.renders.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_skip_edges_and_page_info_renders_nothing() {
    let (paginator, counters) = paginator(10);
    let ctx = Context::new().with_skip(Skip {
        edges: true,
        page_info: true,
        ..Default::default()
    });

    let connection = paginator
        .paginate(&ctx, PaginateRequest::new().first(4))
        .await
        .unwrap();

    assert_eq!(connection.nodes, Some(vec![1, 2, 3, 4]));
    assert_eq!(connection.total_count, Some(10));
    assert!(connection.page_info.is_none());
    assert_eq!(counters.renders.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_skip_nodes_and_total_count() {
    let (paginator, _) = paginator(10);
    let ctx = Context::new().with_skip(Skip {
        nodes: true,
        total_count: true,
        ..Default::default()
    });

    let connection = paginator
        .paginate(&ctx, PaginateRequest::new().first(2))
        .await
        .unwrap();

    assert!(connection.nodes.is_none());
    assert!(connection.total_count.is_none());
    assert_eq!(node_ids(&connection), vec![1, 2]);
}

// ============================================================================
// Node Processor
// ============================================================================

#[tokio::test]
async fn test_node_processor_sees_overfetched_window() {
    let processed = Arc::new(AtomicUsize::new(0));
    let counter = processed.clone();
    let ctx = Context::new().with_node_processor(node_processor_fn(move |_ctx, node: i64| {
        counter.fetch_add(1, Ordering::SeqCst);
        async move { Ok(node * 100) }
    }));

    let (paginator, _) = paginator(10);
    let connection = paginator
        .paginate(&ctx, PaginateRequest::new().first(3))
        .await
        .unwrap();

    assert_eq!(processed.load(Ordering::SeqCst), 4);
    assert_eq!(node_ids(&connection), vec![100, 200, 300]);
    // Cursors stay bound to the original nodes
    assert_eq!(
        connection.page_info.unwrap().end_cursor.as_deref(),
        Some("c3")
    );
}

#[tokio::test]
async fn test_node_processor_error_propagates() {
    let ctx = Context::new().with_node_processor(node_processor_fn(|_ctx, _node: i64| async {
        Err::<i64, _>(Error::Other("redacted".into()))
    }));

    let (paginator, _) = paginator(10);
    let err = paginator
        .paginate(&ctx, PaginateRequest::new().first(3))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("redacted"));
}

// ============================================================================
// Errors
// ============================================================================

#[tokio::test]
async fn test_strategy_error_is_wrapped_with_context() {
    let paginator = Paginator::new(strategy_fn(|_ctx, _request| async {
        Err::<StrategyResponse<i64>, _>(Error::Other("connection refused".into()))
    }));

    let err = paginator
        .paginate(&Context::new(), PaginateRequest::new().first(5).after("a"))
        .await
        .unwrap_err();

    match &err {
        Error::Strategy {
            limit,
            from_end,
            after,
            ..
        } => {
            assert_eq!(*limit, 6);
            assert!(!from_end);
            assert_eq!(after.as_deref(), Some("a"));
        }
        other => panic!("Expected Strategy error, got {other:?}"),
    }
    assert!(err.to_string().contains("connection refused"));
    assert!(!err.is_client_error());
}

#[tokio::test]
async fn test_strategy_cursor_error_keeps_its_kind() {
    let paginator = Paginator::new(strategy_fn(|_ctx, _request| async {
        Err::<StrategyResponse<i64>, _>(Error::invalid_cursor("garbage"))
    }));

    let err = paginator
        .paginate(&Context::new(), PaginateRequest::new().first(5).after("a"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidCursor { .. }));
}

#[tokio::test]
async fn test_cursor_render_failure() {
    let paginator = Paginator::new(strategy_fn(|_ctx, _request| async {
        let failing = cursor_fn(|_ctx| async { Err(Error::Other("signer offline".into())) });
        Ok(StrategyResponse::new(vec![
            LazyEdge::with_cursor(1_i64, "c1"),
            LazyEdge::new(2_i64, failing),
        ]))
    }));

    let err = paginator
        .paginate(&Context::new(), PaginateRequest::new().first(5))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::CursorRender { index: 1, .. }), "got {err:?}");
}

// ============================================================================
// Cancellation
// ============================================================================

#[tokio::test]
async fn test_cancelled_context_skips_strategy() {
    let (paginator, counters) = paginator(10);
    let (ctx, handle) = Context::new().with_cancel();
    handle.cancel();

    let err = paginator
        .paginate(&ctx, PaginateRequest::new().first(5))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Cancelled));
    assert_eq!(counters.strategy_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_cancellation_during_strategy_returns_promptly() {
    let paginator = Paginator::new(strategy_fn(|ctx: Context, _request| async move {
        tokio::select! {
            () = ctx.cancelled() => Err(Error::Cancelled),
            () = tokio::time::sleep(Duration::from_secs(30)) => {
                Ok(StrategyResponse::<i64>::default())
            }
        }
    }));

    let (ctx, handle) = Context::new().with_cancel();
    let task = tokio::spawn({
        let paginator = paginator.clone();
        async move {
            paginator
                .paginate(&ctx, PaginateRequest::new().first(5))
                .await
        }
    });

    tokio::time::sleep(Duration::from_millis(10)).await;
    handle.cancel();

    let result = tokio::time::timeout(Duration::from_secs(1), task)
        .await
        .expect("paginate should return promptly")
        .unwrap();
    assert!(result.unwrap_err().is_cancelled());
}

#[tokio::test]
async fn test_paginator_shared_across_tasks() {
    let (paginator, counters) = paginator(20);
    let mut tasks = Vec::new();
    for first in 1..=8_i64 {
        let paginator = paginator.clone();
        tasks.push(tokio::spawn(async move {
            let connection = paginator
                .paginate(&Context::new(), PaginateRequest::new().first(first))
                .await
                .unwrap();
            (first, connection.edges.unwrap().len())
        }));
    }

    for task in tasks {
        let (first, len) = task.await.unwrap();
        assert_eq!(len as i64, first);
    }
    assert_eq!(counters.strategy_calls.load(Ordering::SeqCst), 8);
}
