use compact_str::CompactString;

use crate::filter::WhereOptions;

/// A request to join an associated entity into a query.
#[derive(Debug, Clone, PartialEq)]
pub struct Include {
    /// Target entity name
    pub target: CompactString,
    /// Association alias; defaults to the target's table name
    pub alias: Option<CompactString>,
    /// Filter on the target's columns
    pub filter: Option<WhereOptions>,
    /// `true` for an inner join, `false` (default) for a left outer join
    pub required: bool,
    /// Columns to project; all declared columns when `None`
    pub attributes: Option<Vec<CompactString>>,
}

impl Include {
    pub fn new(target: impl Into<CompactString>) -> Self {
        Self {
            target: target.into(),
            alias: None,
            filter: None,
            required: false,
            attributes: None,
        }
    }

    pub fn alias(mut self, alias: impl Into<CompactString>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn r#where(mut self, filter: WhereOptions) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn attributes<S: Into<CompactString>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.attributes = Some(columns.into_iter().map(Into::into).collect());
        self
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

/// A column reference: `column` on the root table or `alias.column`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    pub alias: Option<CompactString>,
    pub column: CompactString,
}

impl ColumnRef {
    /// Splits `alias.column` at the first dot.
    pub fn parse(reference: &str) -> Self {
        match reference.split_once('.') {
            Some((alias, column)) => Self {
                alias: Some(alias.into()),
                column: column.into(),
            },
            None => Self {
                alias: None,
                column: reference.into(),
            },
        }
    }
}

impl From<&str> for ColumnRef {
    fn from(reference: &str) -> Self {
        ColumnRef::parse(reference)
    }
}

/// One ORDER BY term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: ColumnRef,
    pub direction: Direction,
}

/// Options for a find or count call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    pub filter: Option<WhereOptions>,
    pub attributes: Option<Vec<CompactString>>,
    pub include: Vec<Include>,
    pub group: Vec<ColumnRef>,
    pub order: Vec<OrderBy>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn r#where(mut self, filter: WhereOptions) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn attributes<S: Into<CompactString>>(mut self, columns: impl IntoIterator<Item = S>) -> Self {
        self.attributes = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn include(mut self, include: Include) -> Self {
        self.include.push(include);
        self
    }

    pub fn group_by(mut self, column: impl Into<ColumnRef>) -> Self {
        self.group.push(column.into());
        self
    }

    pub fn order_by(mut self, column: impl Into<ColumnRef>, direction: Direction) -> Self {
        self.order.push(OrderBy {
            column: column.into(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }
}
