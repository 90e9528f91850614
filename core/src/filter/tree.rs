use compact_str::CompactString;
use sleet_types::Value;

use super::Operator;
use crate::error::{Result, SleetError};

/// Combinator key for conjunctions.
pub const AND: &str = "and";
/// Combinator key for disjunctions.
pub const OR: &str = "or";

/// A filter tree: an ordered mapping from column name (or `"and"` / `"or"`)
/// to a [`FilterNode`]. Sibling keys are AND-ed in declaration order; an
/// empty tree matches every row.
///
/// ```
/// use sleet_core::filter::{Operator, WhereOptions};
///
/// let filter = WhereOptions::new()
///     .eq("status", "active")
///     .op("age", Operator::Gte, 18)
///     .or([
///         WhereOptions::new().eq("country", "NZ"),
///         WhereOptions::new().any_of("country", ["AU", "UK"]),
///     ]);
/// assert_eq!(filter.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WhereOptions {
    entries: Vec<(CompactString, FilterNode)>,
}

/// The value side of a filter entry.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterNode {
    /// A single value: equality on a column
    Scalar(Value),
    /// A sequence: `IN` on a column, or the children of a combinator
    List(Vec<FilterNode>),
    /// A nested mapping: `{operator: value}` on a column, or a child tree
    /// inside a combinator
    Object(WhereOptions),
}

impl WhereOptions {
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Adds a raw entry. No validation happens until compilation.
    pub fn insert(mut self, key: impl Into<CompactString>, node: impl Into<FilterNode>) -> Self {
        self.entries.push((key.into(), node.into()));
        self
    }

    /// `column = value`
    pub fn eq(self, column: impl Into<CompactString>, value: impl Into<Value>) -> Self {
        self.insert(column, FilterNode::from(value.into()))
    }

    /// `column <op> value`
    pub fn op(
        self,
        column: impl Into<CompactString>,
        operator: Operator,
        value: impl Into<Value>,
    ) -> Self {
        let node = WhereOptions::new().insert(operator.key(), FilterNode::from(value.into()));
        self.insert(column, FilterNode::Object(node))
    }

    /// `column IN (values...)`
    pub fn any_of<V: Into<Value>>(
        self,
        column: impl Into<CompactString>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let items = values
            .into_iter()
            .map(|v| FilterNode::from(v.into()))
            .collect();
        self.insert(column, FilterNode::List(items))
    }

    /// `(child) AND (child) ...`
    pub fn and(self, children: impl IntoIterator<Item = WhereOptions>) -> Self {
        let items = children.into_iter().map(FilterNode::Object).collect();
        self.insert(AND, FilterNode::List(items))
    }

    /// `(child) OR (child) ...`
    pub fn or(self, children: impl IntoIterator<Item = WhereOptions>) -> Self {
        let items = children.into_iter().map(FilterNode::Object).collect();
        self.insert(OR, FilterNode::List(items))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterNode)> {
        self.entries.iter().map(|(k, n)| (k.as_str(), n))
    }
}

impl From<Value> for FilterNode {
    /// Arrays become lists so that `{col: [..]}` means `IN`.
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => {
                FilterNode::List(items.into_iter().map(FilterNode::from).collect())
            }
            scalar => FilterNode::Scalar(scalar),
        }
    }
}

impl From<WhereOptions> for FilterNode {
    fn from(tree: WhereOptions) -> Self {
        FilterNode::Object(tree)
    }
}

impl From<serde_json::Value> for FilterNode {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Object(map) => FilterNode::Object(WhereOptions {
                entries: map
                    .into_iter()
                    .map(|(k, v)| (CompactString::from(k), FilterNode::from(v)))
                    .collect(),
            }),
            serde_json::Value::Array(items) => {
                FilterNode::List(items.into_iter().map(FilterNode::from).collect())
            }
            scalar => FilterNode::Scalar(Value::from(scalar)),
        }
    }
}

impl TryFrom<serde_json::Value> for WhereOptions {
    type Error = SleetError;

    /// Converts a JSON object. Anything else is an invalid filter shape.
    fn try_from(value: serde_json::Value) -> Result<Self> {
        match FilterNode::from(value) {
            FilterNode::Object(tree) => Ok(tree),
            _ => Err(SleetError::shape("<root>", "filter must be an object")),
        }
    }
}

impl<K: Into<CompactString>, N: Into<FilterNode>> FromIterator<(K, N)> for WhereOptions {
    fn from_iter<I: IntoIterator<Item = (K, N)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, n)| (k.into(), n.into()))
                .collect(),
        }
    }
}
