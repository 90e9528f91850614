//! Association join resolution.
//!
//! Turns the includes requested on a host entity into JOIN clauses, one per
//! association (two for belongsToMany), and compiles each include's filter
//! against the include's alias.

use compact_str::{CompactString, format_compact};

use crate::error::{Result, SleetError};
use crate::filter::compile_where;
use crate::params::ParamCounter;
use crate::schema::{Association, AssociationKind, Entity, Registry};
use crate::select::Include;
use crate::sql::{SQL, SQLChunk, Token};

/// The type of JOIN operation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum JoinType {
    /// Rows without a match are dropped, root included
    Inner,
    /// Rows without a match survive with nulled columns
    #[default]
    LeftOuter,
}

impl JoinType {
    #[inline]
    pub const fn from_required(required: bool) -> Self {
        if required { JoinType::Inner } else { JoinType::LeftOuter }
    }

    const fn token(&self) -> Token {
        match self {
            JoinType::Inner => Token::INNER_JOIN,
            JoinType::LeftOuter => Token::LEFT_OUTER_JOIN,
        }
    }
}

/// `alias.column`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedColumn {
    pub alias: CompactString,
    pub column: CompactString,
}

impl QualifiedColumn {
    pub fn new(alias: impl Into<CompactString>, column: impl Into<CompactString>) -> Self {
        Self {
            alias: alias.into(),
            column: column.into(),
        }
    }

    pub fn to_sql(&self) -> SQL {
        SQL::column(Some(&self.alias), &self.column)
    }
}

/// Equality predicate of a join: `left = right`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOn {
    pub left: QualifiedColumn,
    pub right: QualifiedColumn,
}

/// One JOIN of a select statement.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    /// Entity joined in
    pub entity: CompactString,
    /// Namespace-qualified table path
    pub table: CompactString,
    pub alias: CompactString,
    pub join_type: JoinType,
    pub on: JoinOn,
    /// Include filter, already qualified by `alias`
    pub filter: Option<SQL>,
}

impl JoinClause {
    /// `LEFT OUTER JOIN `table` AS `alias` ON `a`.`x` = `b`.`y``
    pub fn to_sql(&self) -> SQL {
        let mut sql = SQL::token(self.join_type.token());
        sql.push(SQLChunk::Ident(self.table.clone()));
        sql.push(SQLChunk::Token(Token::AS));
        sql.push(SQLChunk::Ident(self.alias.clone()));
        sql.push(SQLChunk::Token(Token::ON));
        sql.append(self.on.left.to_sql())
            .push_token(Token::EQ)
            .append(self.on.right.to_sql())
    }
}

/// Finds the association an include refers to: same alias (the target's
/// table name when the include names none) and same target entity.
pub fn find_association<'r>(
    registry: &'r Registry,
    host: &'r Entity,
    include: &Include,
) -> Result<(&'r Association, &'r Entity)> {
    let not_found = || SleetError::AssociationNotFound {
        host: host.name().to_string(),
        target: include.target.to_string(),
        alias: include.alias.as_deref().unwrap_or_default().to_string(),
    };
    let target = registry.get(&include.target).ok_or_else(not_found)?;
    let alias = include.alias.as_deref().unwrap_or(target.table());
    let association = host
        .associations()
        .iter()
        .find(|a| a.alias() == alias && a.target() == target.name())
        .ok_or_else(|| SleetError::AssociationNotFound {
            host: host.name().to_string(),
            target: include.target.to_string(),
            alias: alias.to_string(),
        })?;
    Ok((association, target))
}

/// Alias given to the through table of a belongsToMany include.
pub fn through_alias(alias: &str) -> CompactString {
    format_compact!("{alias}_through")
}

/// Resolves `includes` on `host` (aliased by its table name) into JOIN
/// clauses, in include order. Include filters draw parameter names from
/// `counter`.
pub fn resolve_joins(
    registry: &Registry,
    host: &Entity,
    includes: &[Include],
    counter: &mut ParamCounter,
) -> Result<Vec<JoinClause>> {
    let namespace = registry.namespace();
    let host_alias = host.table();
    let mut joins = Vec::with_capacity(includes.len());

    for include in includes {
        let (association, target) = find_association(registry, host, include)?;
        let alias = association.alias();
        let join_type = JoinType::from_required(include.required);
        let filter = include
            .filter
            .as_ref()
            .filter(|tree| !tree.is_empty())
            .map(|tree| compile_where(tree, Some(alias), counter))
            .transpose()?;

        match association.kind() {
            AssociationKind::BelongsTo => joins.push(JoinClause {
                entity: target.name().into(),
                table: namespace.qualify(target.table()),
                alias: alias.into(),
                join_type,
                on: JoinOn {
                    left: QualifiedColumn::new(host_alias, association.foreign_key()),
                    right: QualifiedColumn::new(alias, target.primary_key()),
                },
                filter,
            }),
            AssociationKind::HasOne | AssociationKind::HasMany => joins.push(JoinClause {
                entity: target.name().into(),
                table: namespace.qualify(target.table()),
                alias: alias.into(),
                join_type,
                on: JoinOn {
                    left: QualifiedColumn::new(host_alias, host.primary_key()),
                    right: QualifiedColumn::new(alias, association.foreign_key()),
                },
                filter,
            }),
            AssociationKind::BelongsToMany => {
                let (through, other_key) = registry.through_parts(host.name(), association)?;
                let link = through_alias(alias);
                joins.push(JoinClause {
                    entity: through.name().into(),
                    table: namespace.qualify(through.table()),
                    alias: link.clone(),
                    join_type,
                    on: JoinOn {
                        left: QualifiedColumn::new(host_alias, host.primary_key()),
                        right: QualifiedColumn::new(link.clone(), association.foreign_key()),
                    },
                    filter: None,
                });
                joins.push(JoinClause {
                    entity: target.name().into(),
                    table: namespace.qualify(target.table()),
                    alias: alias.into(),
                    join_type,
                    on: JoinOn {
                        left: QualifiedColumn::new(link, other_key),
                        right: QualifiedColumn::new(alias, target.primary_key()),
                    },
                    filter,
                });
            }
        }
    }

    Ok(joins)
}
