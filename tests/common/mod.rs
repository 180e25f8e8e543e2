//! Shared fixtures: an in-memory keyset strategy over a user table

#![allow(dead_code)]

use relay_pagination::{
    build_boundary, decode_boundaries, lazy_edge, query_order, strategy_fn, BoundaryExpression,
    CompareOp, Context, CursorValues, JsonObject, JsonValue, Order, OrderDirection, Result,
    StrategyFn, StrategyRequest, StrategyResponse,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Age")]
    pub age: i64,
}

/// Users `1..=n` with a repeating age so that multi-key orderings tie
pub fn users(n: i64) -> Vec<User> {
    (1..=n)
        .map(|id| User {
            id,
            name: format!("name{id}"),
            age: 20 + id % 7,
        })
        .collect()
}

pub fn ids(users: &[User]) -> Vec<i64> {
    users.iter().map(|u| u.id).collect()
}

/// Keyset strategy over an in-memory table, shaped like a SQL adapter
pub fn memory_strategy(rows: Vec<User>) -> StrategyFn<User> {
    let rows = Arc::new(rows);
    strategy_fn(move |ctx: Context, request: StrategyRequest| {
        let rows = rows.clone();
        async move { fetch(&ctx, &rows, &request) }
    })
}

fn fetch(ctx: &Context, rows: &[User], request: &StrategyRequest) -> Result<StrategyResponse<User>> {
    let boundaries = decode_boundaries(request)?;
    let filter = boundaries.filter(&request.order_by, request.from_end)?;
    let order = query_order(&request.order_by, request.from_end);

    let objects: Vec<(JsonObject, &User)> = rows.iter().map(|u| (to_object(u), u)).collect();

    let mut matched: Vec<&(JsonObject, &User)> = objects
        .iter()
        .filter(|(obj, _)| filter.as_ref().map_or(true, |f| eval(f, obj)))
        .collect();
    matched.sort_by(|(a, _), (b, _)| compare_rows(&order, a, b));
    matched.truncate(request.limit);
    if request.from_end {
        matched.reverse();
    }

    let has_before_or_next = match &boundaries.before {
        Some(before) => exists_outside(&objects, &request.order_by, before, true)?,
        None => false,
    };
    let has_after_or_previous = match &boundaries.after {
        Some(after) => exists_outside(&objects, &request.order_by, after, false)?,
        None => false,
    };

    let lazy_edges = matched
        .into_iter()
        .map(|(_, user)| lazy_edge((*user).clone(), &request.order_by))
        .collect::<Result<Vec<_>>>()?;

    Ok(StrategyResponse {
        lazy_edges,
        total_count: (!ctx.skip().total_count).then_some(rows.len() as i64),
        has_before_or_next,
        has_after_or_previous,
    })
}

/// Whether any row sits at or beyond the cursor, looking away from the window
fn exists_outside(
    objects: &[(JsonObject, &User)],
    order_by: &[Order],
    cursor: &CursorValues,
    reverse: bool,
) -> Result<bool> {
    let inside = build_boundary(order_by, cursor, reverse)?;
    Ok(objects.iter().any(|(obj, _)| !eval(&inside, obj)))
}

fn to_object(user: &User) -> JsonObject {
    match serde_json::to_value(user) {
        Ok(JsonValue::Object(obj)) => obj,
        other => panic!("user must serialize to an object, got {other:?}"),
    }
}

pub fn eval(expr: &BoundaryExpression, row: &JsonObject) -> bool {
    match expr {
        BoundaryExpression::Compare { field, op, value } => {
            let ordering = compare_json(&row[field.as_str()], value);
            match op {
                CompareOp::Eq => ordering == Ordering::Equal,
                CompareOp::Gt => ordering == Ordering::Greater,
                CompareOp::Lt => ordering == Ordering::Less,
            }
        }
        BoundaryExpression::And(terms) => terms.iter().all(|t| eval(t, row)),
        BoundaryExpression::Or(terms) => terms.iter().any(|t| eval(t, row)),
    }
}

fn compare_json(a: &JsonValue, b: &JsonValue) -> Ordering {
    match (a, b) {
        (JsonValue::Number(a), JsonValue::Number(b)) => a
            .as_f64()
            .unwrap()
            .partial_cmp(&b.as_f64().unwrap())
            .unwrap(),
        (JsonValue::String(a), JsonValue::String(b)) => a.cmp(b),
        _ => panic!("unsupported comparison {a} vs {b}"),
    }
}

fn compare_rows(order: &[Order], a: &JsonObject, b: &JsonObject) -> Ordering {
    for key in order {
        let ordering = compare_json(&a[key.field.as_str()], &b[key.field.as_str()]);
        let ordering = match key.direction {
            OrderDirection::Asc => ordering,
            OrderDirection::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}
