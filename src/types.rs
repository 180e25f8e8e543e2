//! Common types used throughout relay pagination
//!
//! This module contains the request and response shapes of the Relay
//! connection contract, shared by the engine, the hooks and the adapters.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Ordering
// ============================================================================

/// Sort direction of a single ordering key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OrderDirection {
    #[default]
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
}

impl OrderDirection {
    /// The opposite direction
    #[must_use]
    pub fn flip(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Check if this is descending
    pub fn is_desc(self) -> bool {
        matches!(self, Self::Desc)
    }
}

/// One ordering key of a request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Order {
    /// Field name
    pub field: String,
    /// Sort direction
    #[serde(default)]
    pub direction: OrderDirection,
}

impl Order {
    /// Ascending order on a field
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: OrderDirection::Asc,
        }
    }

    /// Descending order on a field
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: OrderDirection::Desc,
        }
    }

    /// Same field, opposite direction
    #[must_use]
    pub fn flip(&self) -> Self {
        Self {
            field: self.field.clone(),
            direction: self.direction.flip(),
        }
    }
}

/// Flip every key of an ordering
pub fn flip_orders(orders: &[Order]) -> Vec<Order> {
    orders.iter().map(Order::flip).collect()
}

/// Field names of an ordering, in order
pub fn order_fields(orders: &[Order]) -> Vec<&str> {
    orders.iter().map(|o| o.field.as_str()).collect()
}

/// Return the first field name that appears more than once
pub fn find_duplicate_field(orders: &[Order]) -> Option<&str> {
    let mut seen = HashSet::new();
    orders
        .iter()
        .map(|o| o.field.as_str())
        .find(|field| !seen.insert(*field))
}

// ============================================================================
// Request
// ============================================================================

/// A Relay pagination request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginateRequest {
    /// Return items after this cursor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    /// Return items before this cursor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    /// Count from the head
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<i64>,
    /// Count from the tail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<i64>,
    /// Ordering keys
    #[serde(default)]
    pub order_by: Vec<Order>,
}

impl PaginateRequest {
    /// Create an empty request
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `first`
    #[must_use]
    pub fn first(mut self, first: i64) -> Self {
        self.first = Some(first);
        self
    }

    /// Set `last`
    #[must_use]
    pub fn last(mut self, last: i64) -> Self {
        self.last = Some(last);
        self
    }

    /// Set the `after` cursor
    #[must_use]
    pub fn after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }

    /// Set the `before` cursor
    #[must_use]
    pub fn before(mut self, cursor: impl Into<String>) -> Self {
        self.before = Some(cursor.into());
        self
    }

    /// Set the ordering keys
    #[must_use]
    pub fn order_by(mut self, orders: Vec<Order>) -> Self {
        self.order_by = orders;
        self
    }
}

// ============================================================================
// Response
// ============================================================================

/// A node paired with its rendered cursor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge<T> {
    pub node: T,
    pub cursor: String,
}

/// Page navigation info
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_cursor: Option<String>,
}

/// A Relay connection; every field is omitted when skipped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edges: Option<Vec<Edge<T>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<T>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_info: Option<PageInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<i64>,
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self {
            edges: None,
            nodes: None,
            page_info: None,
            total_count: None,
        }
    }
}

impl<T> Connection<T> {
    /// Check if nothing was materialized
    pub fn is_empty(&self) -> bool {
        self.edges.is_none()
            && self.nodes.is_none()
            && self.page_info.is_none()
            && self.total_count.is_none()
    }
}
