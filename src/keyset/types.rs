//! Boundary expression types
//!
//! A storage-independent boolean expression that adapters translate into
//! their own query language.

use crate::types::JsonValue;
use std::fmt;

/// Comparison operator of a boundary term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Gt,
    Lt,
}

impl CompareOp {
    /// SQL-like symbol
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Gt => ">",
            Self::Lt => "<",
        }
    }
}

/// Composite seek condition over sort keys
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryExpression {
    /// `field <op> value`
    Compare {
        field: String,
        op: CompareOp,
        value: JsonValue,
    },
    /// All terms hold
    And(Vec<BoundaryExpression>),
    /// Any term holds
    Or(Vec<BoundaryExpression>),
}

impl BoundaryExpression {
    /// Single comparison term
    pub fn compare(field: impl Into<String>, op: CompareOp, value: impl Into<JsonValue>) -> Self {
        Self::Compare {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Conjunction; a single term is returned as is
    pub fn and(mut terms: Vec<BoundaryExpression>) -> Self {
        if terms.len() == 1 {
            terms.remove(0)
        } else {
            Self::And(terms)
        }
    }

    /// Disjunction; a single term is returned as is
    pub fn or(mut terms: Vec<BoundaryExpression>) -> Self {
        if terms.len() == 1 {
            terms.remove(0)
        } else {
            Self::Or(terms)
        }
    }
}

impl fmt::Display for BoundaryExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compare { field, op, value } => write!(f, "{field} {} {value}", op.symbol()),
            Self::And(terms) => write_joined(f, terms, " AND "),
            Self::Or(terms) => write_joined(f, terms, " OR "),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, terms: &[BoundaryExpression], sep: &str) -> fmt::Result {
    for (i, term) in terms.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        match term {
            BoundaryExpression::Compare { .. } => write!(f, "{term}")?,
            _ => write!(f, "({term})")?,
        }
    }
    Ok(())
}
