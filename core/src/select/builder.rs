use compact_str::CompactString;
use hashbrown::HashSet;

use super::{ColumnRef, Direction, FindOptions};
use crate::error::{Result, SleetError};
use crate::filter::compile_where;
use crate::join::{JoinClause, resolve_joins};
use crate::params::{CompiledStatement, ParamCounter};
use crate::reconstruct::{ResultShape, TableShape};
use crate::schema::{Entity, Registry};
use crate::sql::{SQL, SQLChunk, Token};

/// A compiled select and the shape its rows reconstruct into.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledSelect {
    pub statement: CompiledStatement,
    pub shape: ResultShape,
}

/// Compiles a find on `entity`.
///
/// ```
/// use sleet_core::schema::{Entity, Registry};
/// use sleet_core::select::{build_select, FindOptions};
/// use sleet_core::filter::WhereOptions;
/// use sleet_types::DataType;
///
/// let mut registry = Registry::new();
/// registry
///     .define(Entity::builder("User").table("users").attribute("age", DataType::Int64).build())
///     .unwrap();
///
/// let select = build_select(
///     &registry,
///     "User",
///     &FindOptions::new().r#where(WhereOptions::new().eq("age", 30)).limit(10),
/// )
/// .unwrap();
/// assert_eq!(
///     select.statement.sql,
///     "SELECT `users`.`id` AS `users_id`, `users`.`age` AS `users_age` \
///      FROM `users` AS `users` WHERE `users`.`age` = @param0 LIMIT 10"
/// );
/// ```
pub fn build_select(registry: &Registry, entity: &str, options: &FindOptions) -> Result<CompiledSelect> {
    let entity = registry.entity(entity)?;
    let Source { from, joins } = source(registry, entity, options)?;
    let shape = ResultShape::resolve(registry, entity, options)?;

    let projection = std::iter::once(&shape.root)
        .chain(shape.includes.iter().map(|i| &i.table))
        .flat_map(project_table);
    let mut sql = SQL::token(Token::SELECT)
        .append(SQL::comma_separated(projection))
        .append(from);

    if !options.group.is_empty() {
        let columns = options
            .group
            .iter()
            .map(|c| column_ref(registry, entity, &joins, c))
            .collect::<Result<Vec<_>>>()?;
        sql = sql
            .push_token(Token::GROUP_BY)
            .append(SQL::comma_separated(columns));
    }

    if !options.order.is_empty() {
        let mut terms = Vec::with_capacity(options.order.len());
        for order in &options.order {
            let column = column_ref(registry, entity, &joins, &order.column)?;
            terms.push(column.push_token(match order.direction {
                Direction::Asc => Token::ASC,
                Direction::Desc => Token::DESC,
            }));
        }
        sql = sql
            .push_token(Token::ORDER_BY)
            .append(SQL::comma_separated(terms));
    }

    if let Some(limit) = options.limit {
        sql = sql.push_token(Token::LIMIT).append(SQL::number(limit));
    }
    if let Some(offset) = options.offset {
        sql = sql.push_token(Token::OFFSET).append(SQL::number(offset));
    }

    let statement = sql.build();
    crate::sleet_trace_query!("select", &statement.sql, statement.params.len());
    Ok(CompiledSelect { statement, shape })
}

/// Compiles a count of distinct root rows matching `options`.
///
/// Projection, grouping, ordering and paging options are ignored.
pub fn build_count(registry: &Registry, entity: &str, options: &FindOptions) -> Result<CompiledStatement> {
    let entity = registry.entity(entity)?;
    let alias = entity.table();

    let counted = SQL::raw("COUNT")
        .push_token(Token::LPAREN)
        .push_token(Token::DISTINCT)
        .append(SQL::column(Some(alias), entity.primary_key()))
        .push_token(Token::RPAREN)
        .push_token(Token::AS)
        .append(SQL::ident("count"));

    let Source { from, .. } = source(registry, entity, options)?;
    let statement = SQL::token(Token::SELECT).append(counted).append(from).build();
    crate::sleet_trace_query!("count", &statement.sql, statement.params.len());
    Ok(statement)
}

/// The FROM, JOIN and WHERE clauses shared by selects and counts.
struct Source {
    from: SQL,
    joins: Vec<JoinClause>,
}

fn source(registry: &Registry, entity: &Entity, options: &FindOptions) -> Result<Source> {
    let alias = entity.table();
    if options
        .include
        .iter()
        .any(|i| i.alias.as_deref() == Some(alias))
    {
        return Err(SleetError::AmbiguousAlias(alias.to_string()));
    }

    // Root filter first so its parameters are numbered before include filters
    let mut counter = ParamCounter::new();
    let root_filter = options
        .filter
        .as_ref()
        .filter(|tree| !tree.is_empty())
        .map(|tree| compile_where(tree, Some(alias), &mut counter))
        .transpose()?;
    let joins = resolve_joins(registry, entity, &options.include, &mut counter)?;
    check_aliases(alias, &joins)?;

    let mut from = SQL::token(Token::FROM);
    from.push(SQLChunk::Ident(registry.namespace().qualify(entity.table())));
    from.push(SQLChunk::Token(Token::AS));
    from.push(SQLChunk::Ident(alias.into()));
    for join in &joins {
        from.extend(join.to_sql());
    }

    let filters: Vec<SQL> = root_filter
        .into_iter()
        .chain(joins.iter().filter_map(|j| j.filter.clone()))
        .collect();
    if !filters.is_empty() {
        from = from
            .push_token(Token::WHERE)
            .append(SQL::join_grouped(filters, Token::AND));
    }

    Ok(Source { from, joins })
}

/// Every table in one statement needs its own alias: the root, each include
/// and each through table.
fn check_aliases(root: &str, joins: &[JoinClause]) -> Result<()> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(joins.len() + 1);
    seen.insert(root);
    match joins.iter().find(|j| !seen.insert(j.alias.as_str())) {
        Some(join) => Err(SleetError::AmbiguousAlias(join.alias.to_string())),
        None => Ok(()),
    }
}

/// `` `alias`.`col` AS `alias_col` `` for every projected column.
fn project_table(table: &TableShape) -> impl Iterator<Item = SQL> + '_ {
    table.columns.iter().map(move |column| {
        SQL::column(Some(&table.alias), column)
            .push_token(Token::AS)
            .append(SQL::ident(table.label(column)))
    })
}

/// Resolves a caller column reference against the root or a joined alias.
fn column_ref(
    registry: &Registry,
    root: &Entity,
    joins: &[JoinClause],
    reference: &ColumnRef,
) -> Result<SQL> {
    let alias: &str = reference.alias.as_deref().unwrap_or(root.table());
    let entity = if alias == root.table() {
        root
    } else {
        let join = joins
            .iter()
            .find(|j| j.alias == alias)
            .ok_or_else(|| unknown(alias, &reference.column))?;
        registry.entity(&join.entity)?
    };
    if !entity.has_attribute(&reference.column) {
        return Err(unknown(entity.name(), &reference.column));
    }
    Ok(SQL::column(Some(alias), &reference.column))
}

fn unknown(entity: &str, attribute: &CompactString) -> SleetError {
    SleetError::UnknownAttribute {
        entity: entity.to_string(),
        attribute: attribute.to_string(),
    }
}
