//! Keyset boundary builder
//!
//! For a sort over keys `k0..kn`, "strictly after this cursor" is the
//! lexicographic tuple comparison `(k0, .., kn) > (v0, .., vn)`, decomposed
//! into per-key terms because most backends cannot compare row tuples:
//!
//! ```text
//! (k0 > v0) OR (k0 = v0 AND k1 > v1) OR ... OR (k0 = v0 AND .. AND kn > vn)
//! ```
//!
//! with `>` replaced by `<` for every key whose effective direction is
//! descending.

use super::types::{BoundaryExpression, CompareOp};
use crate::cursor::{decode_cursor, CursorValues};
use crate::error::{Error, Result};
use crate::pagination::StrategyRequest;
use crate::types::{flip_orders, order_fields, Order};

/// Build the seek condition for one cursor
///
/// `keys` is the ordering the query actually applies. With `reverse` every
/// key's direction is flipped, which seeks backwards (a `before` cursor).
pub fn build_boundary(
    keys: &[Order],
    values: &CursorValues,
    reverse: bool,
) -> Result<BoundaryExpression> {
    if keys.is_empty() {
        return Err(Error::invalid_request(
            "keyset pagination requires at least one orderBy key",
        ));
    }

    let mut key_values = Vec::with_capacity(keys.len());
    for key in keys {
        let value = values
            .get(&key.field)
            .ok_or_else(|| Error::missing_key(&key.field))?;
        key_values.push((key, value));
    }

    let mut disjuncts = Vec::with_capacity(keys.len());
    for (i, (key, value)) in key_values.iter().enumerate() {
        let mut terms: Vec<BoundaryExpression> = key_values[..i]
            .iter()
            .map(|(tie, tie_value)| {
                BoundaryExpression::compare(&tie.field, CompareOp::Eq, (*tie_value).clone())
            })
            .collect();

        let descending = key.direction.is_desc() != reverse;
        let op = if descending {
            CompareOp::Lt
        } else {
            CompareOp::Gt
        };
        terms.push(BoundaryExpression::compare(&key.field, op, (*value).clone()));

        disjuncts.push(BoundaryExpression::and(terms));
    }

    Ok(BoundaryExpression::or(disjuncts))
}

/// The ORDER BY an adapter must apply
///
/// Counting from the tail fetches in flipped order; the adapter reverses the
/// fetched slice back into declared order afterwards.
pub fn query_order(order_by: &[Order], from_end: bool) -> Vec<Order> {
    if from_end {
        flip_orders(order_by)
    } else {
        order_by.to_vec()
    }
}

/// Combined seek condition for an `after` and/or `before` cursor
///
/// Returns `None` when neither cursor is present.
pub fn keyset_filter(
    order_by: &[Order],
    after: Option<&CursorValues>,
    before: Option<&CursorValues>,
    from_end: bool,
) -> Result<Option<BoundaryExpression>> {
    let keys = query_order(order_by, from_end);

    let mut terms = Vec::with_capacity(2);
    if let Some(after) = after {
        terms.push(build_boundary(&keys, after, from_end)?);
    }
    if let Some(before) = before {
        terms.push(build_boundary(&keys, before, !from_end)?);
    }

    Ok(match terms.len() {
        0 => None,
        _ => Some(BoundaryExpression::and(terms)),
    })
}

/// Decoded boundary cursors of a strategy request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Boundaries {
    pub after: Option<CursorValues>,
    pub before: Option<CursorValues>,
}

impl Boundaries {
    /// Seek condition for these boundaries
    pub fn filter(&self, order_by: &[Order], from_end: bool) -> Result<Option<BoundaryExpression>> {
        keyset_filter(order_by, self.after.as_ref(), self.before.as_ref(), from_end)
    }
}

/// Decode `after`/`before` against the request's active key set
///
/// Rejects an empty ordering and an `after`/`before` pair that decodes to the
/// same position.
pub fn decode_boundaries(request: &StrategyRequest) -> Result<Boundaries> {
    if request.order_by.is_empty() {
        return Err(Error::invalid_request(
            "keyset pagination requires at least one orderBy key",
        ));
    }

    let keys = order_fields(&request.order_by);
    let decode = |cursor: &Option<String>| {
        cursor
            .as_deref()
            .map(|cursor| decode_cursor(cursor, &keys))
            .transpose()
    };

    let boundaries = Boundaries {
        after: decode(&request.after)?,
        before: decode(&request.before)?,
    };

    if let (Some(after), Some(before)) = (&boundaries.after, &boundaries.before) {
        if after == before {
            return Err(Error::invalid_request(
                "after and before cannot point at the same position",
            ));
        }
    }

    Ok(boundaries)
}
