//! Selector (Scan Engine)
//!
//! Traverses one index's tree depth-first in ascending or descending bucket
//! order, evaluating each Link's cached value against, in strict order:
//! scope, conditions, matches — then stable sort, skip, and limit over the
//! assembled set.
//!
//! Reads go straight to the tree and value cache; the write coordinator is
//! not involved.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::catalog::Index;
use crate::error::{RadixError, Result};
use crate::tree::Node;
use crate::value::Value;

/// Comparison operator for a condition filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CondOp {
    /// Field strictly greater than the operand
    Gt,
    /// Field strictly less than the operand
    Lt,
    /// Field equal to the operand
    Eq,
    /// Field different from the operand
    Dif,
}

/// One condition filter against a named field
#[derive(Debug, Clone)]
pub struct Condition {
    pub field: String,
    pub op: CondOp,
    pub value: Value,
}

/// One exact-equality filter against a named field
#[derive(Debug, Clone)]
pub struct Match {
    pub field: String,
    pub value: Value,
}

/// Sort directive applied after filtering
#[derive(Debug, Clone)]
pub struct Sort {
    pub field: String,
    pub ascending: bool,
}

/// A select request. Build with the fluent methods, run with [`Selector::run`].
///
/// With no scope/conditions/matches/sort this degenerates to an in-order
/// dump of all cached values in traversal order; skip and limit still apply.
#[derive(Debug, Clone, Default)]
pub struct Selector {
    /// Traverse buckets right-to-left (descending) instead of left-to-right
    reverse: bool,

    /// Keep values whose sort field falls within [start, end]
    scope: Option<(Value, Value)>,

    conditions: Vec<Condition>,
    matches: Vec<Match>,
    sort: Option<Sort>,
    skip: usize,
    limit: Option<usize>,
}

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Traverse in descending bucket order
    pub fn descending(mut self) -> Self {
        self.reverse = true;
        self
    }

    /// Bound the sort field to [start, end] (requires a sort field)
    pub fn scope(mut self, start: impl Into<Value>, end: impl Into<Value>) -> Self {
        self.scope = Some((start.into(), end.into()));
        self
    }

    /// Add a gt/lt/eq/dif condition on a field
    pub fn condition(mut self, field: &str, op: CondOp, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition {
            field: field.to_string(),
            op,
            value: value.into(),
        });
        self
    }

    /// Add an exact-equality match on a field
    pub fn match_field(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.matches.push(Match {
            field: field.to_string(),
            value: value.into(),
        });
        self
    }

    /// Stable-sort the filtered set by a field
    pub fn sort_by(mut self, field: &str, ascending: bool) -> Self {
        self.sort = Some(Sort {
            field: field.to_string(),
            ascending,
        });
        self
    }

    /// Drop the first `n` values of the final set
    pub fn skip(mut self, n: usize) -> Self {
        self.skip = n;
        self
    }

    /// Keep at most `n` values of the final set
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    // =========================================================================
    // Execution
    // =========================================================================

    /// Run this request against one index
    pub fn run(&self, index: &Arc<Index>) -> Result<Vec<Value>> {
        // Full in-order traversal first; filters evaluate in memory
        let mut values = Vec::new();
        collect(index.root(), self.reverse, &mut values);

        // Scope binds to the sort field
        if let Some((start, end)) = &self.scope {
            let field = self
                .sort
                .as_ref()
                .map(|sort| sort.field.clone())
                .ok_or_else(|| {
                    RadixError::InvalidFieldPath("scope requires a sort field".to_string())
                })?;
            values.retain(|value| match value.get_path(&field) {
                Some(v) => {
                    in_order(v.compare(start), &[Ordering::Greater, Ordering::Equal])
                        && in_order(v.compare(end), &[Ordering::Less, Ordering::Equal])
                }
                None => false,
            });
        }

        // Conditions, in declaration order
        for condition in &self.conditions {
            values.retain(|value| condition_holds(value, condition));
        }

        // Matches: exact equality
        for matcher in &self.matches {
            values.retain(|value| value.get_path(&matcher.field) == Some(&matcher.value));
        }

        // Stable sort over the fully filtered set
        if let Some(sort) = &self.sort {
            values.sort_by(|a, b| {
                let ordering = match (a.get_path(&sort.field), b.get_path(&sort.field)) {
                    (Some(x), Some(y)) => x.compare(y).unwrap_or(Ordering::Equal),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                };
                if sort.ascending {
                    ordering
                } else {
                    ordering.reverse()
                }
            });
        }

        // Skip then limit, applied logically even on the unfiltered fast path
        let values: Vec<Value> = match self.limit {
            Some(limit) => values.into_iter().skip(self.skip).take(limit).collect(),
            None => values.into_iter().skip(self.skip).collect(),
        };

        Ok(values)
    }
}

/// Depth-first in-order collection of cached values
fn collect(node: &Arc<Node>, reverse: bool, out: &mut Vec<Value>) {
    if node.is_leaf() {
        let links = node.links();
        if reverse {
            for link in links.iter().rev() {
                out.push(link.cached.clone());
            }
        } else {
            for link in links.iter() {
                out.push(link.cached.clone());
            }
        }
        return;
    }

    let children = node.children_snapshot();
    if reverse {
        for child in children.iter().rev() {
            collect(child, reverse, out);
        }
    } else {
        for child in children.iter() {
            collect(child, reverse, out);
        }
    }
}

fn in_order(actual: Option<Ordering>, accepted: &[Ordering]) -> bool {
    matches!(actual, Some(o) if accepted.contains(&o))
}

fn condition_holds(value: &Value, condition: &Condition) -> bool {
    let field = match value.get_path(&condition.field) {
        Some(v) => v,
        // Dif treats a missing or incomparable field as "different"
        None => return condition.op == CondOp::Dif,
    };
    let ordering = field.compare(&condition.value);
    match condition.op {
        CondOp::Gt => in_order(ordering, &[Ordering::Greater]),
        CondOp::Lt => in_order(ordering, &[Ordering::Less]),
        CondOp::Eq => in_order(ordering, &[Ordering::Equal]),
        CondOp::Dif => !in_order(ordering, &[Ordering::Equal]),
    }
}
