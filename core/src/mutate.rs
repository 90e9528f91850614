//! INSERT, UPDATE and DELETE compilation.
//!
//! Values are always bound as parameters. UPDATE and DELETE always carry a
//! WHERE clause, `WHERE TRUE` when no filter is given, since the warehouse
//! rejects DML without one.

use crate::error::{Result, SleetError};
use crate::filter::{WhereOptions, compile_where};
use crate::params::{CompiledStatement, ParamCounter};
use crate::row::Row;
use crate::schema::{Entity, Registry};
use crate::sql::{SQL, SQLChunk, Token};

/// `INSERT INTO `t` (`a`, `b`) VALUES (@param0, @param1), ...`
///
/// The column list is every declared attribute that at least one row
/// supplies, in declaration order. Rows missing one of those columns bind
/// `NULL` for it.
pub fn build_insert(registry: &Registry, entity: &str, rows: &[Row]) -> Result<CompiledStatement> {
    let entity = registry.entity(entity)?;
    for row in rows {
        check_columns(entity, row)?;
    }

    let columns: Vec<&str> = entity
        .column_names()
        .filter(|column| rows.iter().any(|row| row.contains(column)))
        .collect();
    if columns.is_empty() {
        return Err(SleetError::NoValues(entity.name().to_string()));
    }

    let mut counter = ParamCounter::new();
    let mut tuples = Vec::with_capacity(rows.len());
    for row in rows {
        let params = columns
            .iter()
            .map(|column| SQL::param(counter.next_name(), row.get_or_null(column).clone()));
        tuples.push(SQL::comma_separated(params).parens());
    }

    let statement = target(registry, entity, Token::INSERT_INTO)
        .append(SQL::comma_separated(columns.iter().map(|c| SQL::ident(*c))).parens())
        .push_token(Token::VALUES)
        .append(SQL::comma_separated(tuples))
        .build();
    crate::sleet_trace_query!("insert", &statement.sql, statement.params.len());
    Ok(statement)
}

/// `UPDATE `t` SET `a` = @param0, ... WHERE ...`
///
/// Assignments follow the order of `values`.
pub fn build_update(
    registry: &Registry,
    entity: &str,
    values: &Row,
    filter: Option<&WhereOptions>,
) -> Result<CompiledStatement> {
    let entity = registry.entity(entity)?;
    if values.is_empty() {
        return Err(SleetError::NoValues(entity.name().to_string()));
    }
    check_columns(entity, values)?;

    let mut counter = ParamCounter::new();
    let assignments: Vec<SQL> = values
        .iter()
        .map(|(column, value)| {
            SQL::ident(column)
                .push_token(Token::EQ)
                .append(SQL::param(counter.next_name(), value.clone()))
        })
        .collect();

    let statement = target(registry, entity, Token::UPDATE)
        .push_token(Token::SET)
        .append(SQL::comma_separated(assignments))
        .append(where_clause(filter, &mut counter)?)
        .build();
    crate::sleet_trace_query!("update", &statement.sql, statement.params.len());
    Ok(statement)
}

/// `DELETE FROM `t` WHERE ...`
pub fn build_delete(
    registry: &Registry,
    entity: &str,
    filter: Option<&WhereOptions>,
) -> Result<CompiledStatement> {
    let entity = registry.entity(entity)?;
    let mut counter = ParamCounter::new();
    let statement = target(registry, entity, Token::DELETE_FROM)
        .append(where_clause(filter, &mut counter)?)
        .build();
    crate::sleet_trace_query!("delete", &statement.sql, statement.params.len());
    Ok(statement)
}

fn target(registry: &Registry, entity: &Entity, keyword: Token) -> SQL {
    let mut sql = SQL::token(keyword);
    sql.push(SQLChunk::Ident(registry.namespace().qualify(entity.table())));
    sql
}

fn where_clause(filter: Option<&WhereOptions>, counter: &mut ParamCounter) -> Result<SQL> {
    let predicate = match filter {
        Some(tree) => compile_where(tree, None, counter)?,
        None => SQL::token(Token::TRUE),
    };
    Ok(SQL::token(Token::WHERE).append(predicate))
}

fn check_columns(entity: &Entity, row: &Row) -> Result<()> {
    match row.iter().find(|(column, _)| !entity.has_attribute(column)) {
        Some((column, _)) => Err(SleetError::UnknownAttribute {
            entity: entity.name().to_string(),
            attribute: column.to_string(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use sleet_types::{DataType, Value};

    use super::*;
    use crate::filter::Operator;
    use crate::schema::Namespace;

    fn registry() -> Registry {
        let mut registry = Registry::with_namespace(Namespace::new().dataset("blog"));
        registry
            .define(
                Entity::builder("User")
                    .table("users")
                    .attribute("name", DataType::String)
                    .attribute("age", DataType::Int64)
                    .build(),
            )
            .unwrap();
        registry
    }

    #[test]
    fn insert_uses_column_union() {
        let rows = [
            Row::new().with("age", 30).with("name", "ann"),
            Row::new().with("name", "bob"),
        ];
        let statement = build_insert(&registry(), "User", &rows).unwrap();
        assert_eq!(
            statement.sql,
            "INSERT INTO `blog.users` (`name`, `age`) VALUES (@param0, @param1), (@param2, @param3)"
        );
        assert_eq!(statement.params.get("param1"), Some(&Value::Int64(30)));
        assert_eq!(statement.params.get("param3"), Some(&Value::Null));
    }

    #[test]
    fn insert_without_values_fails() {
        let err = build_insert(&registry(), "User", &[]).unwrap_err();
        assert!(matches!(err, SleetError::NoValues(_)));

        let err = build_insert(&registry(), "User", &[Row::new().with("email", "x")]).unwrap_err();
        assert!(matches!(err, SleetError::UnknownAttribute { .. }));
    }

    #[test]
    fn update_numbers_filter_after_assignments() {
        let filter = WhereOptions::new().op("age", Operator::Lt, 18);
        let statement = build_update(
            &registry(),
            "User",
            &Row::new().with("name", "minor"),
            Some(&filter),
        )
        .unwrap();
        assert_eq!(
            statement.sql,
            "UPDATE `blog.users` SET `name` = @param0 WHERE `age` < @param1"
        );
    }

    #[test]
    fn unfiltered_dml_uses_where_true() {
        let statement = build_delete(&registry(), "User", None).unwrap();
        assert_eq!(statement.sql, "DELETE FROM `blog.users` WHERE TRUE");

        let statement = build_update(&registry(), "User", &Row::new().with("age", 1), None).unwrap();
        assert_eq!(statement.sql, "UPDATE `blog.users` SET `age` = @param0 WHERE TRUE");
    }
}
