//! Filter tree to SQL boolean expression.

use sleet_types::Value;

use super::operator::Operand;
use super::{AND, FilterNode, OR, Operator, WhereOptions};
use crate::error::{Result, SleetError};
use crate::params::{CompiledStatement, ParamCounter};
use crate::sql::{SQL, Token};

/// Compiles `tree` with a fresh counter and no column qualifier.
///
/// ```
/// use sleet_core::filter::{compile, Operator, WhereOptions};
///
/// let statement = compile(&WhereOptions::new().op("age", Operator::Gt, 18)).unwrap();
/// assert_eq!(statement.sql, "`age` > @param0");
/// ```
pub fn compile(tree: &WhereOptions) -> Result<CompiledStatement> {
    let mut counter = ParamCounter::new();
    Ok(compile_where(tree, None, &mut counter)?.build())
}

/// Compiles `tree` into a boolean expression.
///
/// Columns are emitted as `` `qualifier`.`column` `` when a qualifier is
/// given. Parameter names are drawn from `counter`, which is left pointing
/// past the last name used. An empty tree compiles to `TRUE`.
pub fn compile_where(
    tree: &WhereOptions,
    qualifier: Option<&str>,
    counter: &mut ParamCounter,
) -> Result<SQL> {
    PredicateCompiler { qualifier, counter }.tree(tree, "")
}

struct PredicateCompiler<'c> {
    qualifier: Option<&'c str>,
    counter: &'c mut ParamCounter,
}

impl PredicateCompiler<'_> {
    fn tree(&mut self, tree: &WhereOptions, path: &str) -> Result<SQL> {
        if tree.is_empty() {
            return Ok(SQL::token(Token::TRUE));
        }
        let mut clauses = Vec::with_capacity(tree.len());
        for (key, node) in tree.iter() {
            let path = join_path(path, key);
            let clause = match key {
                AND => self.combinator(node, Token::AND, &path)?,
                OR => self.combinator(node, Token::OR, &path)?,
                column => self.column(column, node, &path)?,
            };
            clauses.push(clause);
        }
        Ok(SQL::join_grouped(clauses, Token::AND))
    }

    fn combinator(&mut self, node: &FilterNode, keyword: Token, path: &str) -> Result<SQL> {
        let FilterNode::List(children) = node else {
            return Err(SleetError::shape(path, "combinator expects a sequence of filters"));
        };
        if children.is_empty() {
            return Ok(SQL::token(Token::TRUE));
        }
        let mut parts = Vec::with_capacity(children.len());
        for (i, child) in children.iter().enumerate() {
            let FilterNode::Object(tree) = child else {
                return Err(SleetError::shape(
                    format!("{path}[{i}]"),
                    "combinator children must be filter objects",
                ));
            };
            parts.push(self.tree(tree, &format!("{path}[{i}]"))?.parens());
        }
        Ok(SQL::join(parts, keyword))
    }

    fn column(&mut self, column: &str, node: &FilterNode, path: &str) -> Result<SQL> {
        match node {
            FilterNode::Scalar(Value::Null) => Ok(self.col(column).push_token(Token::IS).push_token(Token::NULL)),
            FilterNode::Scalar(value) => Ok(self
                .col(column)
                .push_token(Token::EQ)
                .append(self.bind(value.clone()))),
            FilterNode::List(items) => self.list(column, Token::IN, items, path),
            FilterNode::Object(ops) => {
                let mut entries = ops.iter();
                let (Some((key, operand)), None) = (entries.next(), entries.next()) else {
                    return Err(SleetError::shape(
                        path,
                        "operator object must have exactly one key",
                    ));
                };
                let operator = Operator::from_key(key).ok_or_else(|| SleetError::InvalidOperator {
                    column: column.to_string(),
                    operator: key.to_string(),
                })?;
                self.operator(column, operator, operand, &join_path(path, key))
            }
        }
    }

    fn operator(
        &mut self,
        column: &str,
        operator: Operator,
        node: &FilterNode,
        path: &str,
    ) -> Result<SQL> {
        match operator.operand() {
            Operand::Binary(token) => {
                let value = scalar(node, path)?;
                match (value, token) {
                    (Value::Null, Token::EQ) => {
                        Ok(self.col(column).push_token(Token::IS).push_token(Token::NULL))
                    }
                    (Value::Null, Token::NE) => {
                        Ok(self.col(column).push_token(Token::IS_NOT).push_token(Token::NULL))
                    }
                    (Value::Null, _) => Err(SleetError::shape(
                        path,
                        format!("'{operator}' does not accept null"),
                    )),
                    (value, token) => Ok(self
                        .col(column)
                        .push_token(token)
                        .append(self.bind(value.clone()))),
                }
            }
            Operand::Keyword(token) => {
                let keyword = match scalar(node, path)? {
                    Value::Null => Token::NULL,
                    Value::Bool(true) => Token::TRUE,
                    Value::Bool(false) => Token::FALSE,
                    _ => {
                        return Err(SleetError::shape(
                            path,
                            format!("'{operator}' expects null or a boolean"),
                        ));
                    }
                };
                Ok(self.col(column).push_token(token).push_token(keyword))
            }
            Operand::List(token) => {
                let FilterNode::List(items) = node else {
                    return Err(SleetError::shape(path, format!("'{operator}' expects a sequence")));
                };
                self.list(column, token, items, path)
            }
            Operand::Range(token) => {
                let bounds = match node {
                    FilterNode::List(items) if items.len() == 2 => items,
                    _ => {
                        return Err(SleetError::shape(
                            path,
                            format!("'{operator}' expects a sequence of two values"),
                        ));
                    }
                };
                let low = scalar(&bounds[0], &format!("{path}[0]"))?.clone();
                let high = scalar(&bounds[1], &format!("{path}[1]"))?.clone();
                Ok(self
                    .col(column)
                    .push_token(token)
                    .append(self.bind(low))
                    .push_token(Token::AND)
                    .append(self.bind(high)))
            }
            Operand::Contains => {
                let value = scalar(node, path)?.clone();
                Ok(self
                    .bind(value)
                    .push_token(Token::IN)
                    .append(SQL::func("UNNEST", self.col(column))))
            }
            Operand::Contained => {
                let FilterNode::List(items) = node else {
                    return Err(SleetError::shape(path, format!("'{operator}' expects a sequence")));
                };
                let mut values = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    values.push(scalar(item, &format!("{path}[{i}]"))?.clone());
                }
                let array = self.bind(Value::Array(values));
                Ok(self
                    .col(column)
                    .push_token(Token::IN)
                    .append(SQL::func("UNNEST", array)))
            }
        }
    }

    /// `col IN (@p0, @p1, ...)`; an empty list is `FALSE` (`TRUE` for `NOT IN`).
    fn list(&mut self, column: &str, token: Token, items: &[FilterNode], path: &str) -> Result<SQL> {
        if items.is_empty() {
            let constant = if token == Token::NOT_IN { Token::TRUE } else { Token::FALSE };
            return Ok(SQL::token(constant));
        }
        let mut params = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let value = scalar(item, &format!("{path}[{i}]"))?;
            params.push(self.bind(value.clone()));
        }
        Ok(self
            .col(column)
            .push_token(token)
            .append(SQL::comma_separated(params).parens()))
    }

    #[inline]
    fn col(&self, column: &str) -> SQL {
        SQL::column(self.qualifier, column)
    }

    #[inline]
    fn bind(&mut self, value: Value) -> SQL {
        SQL::param(self.counter.next_name(), value)
    }
}

fn scalar<'n>(node: &'n FilterNode, path: &str) -> Result<&'n Value> {
    match node {
        FilterNode::Scalar(value) => Ok(value),
        FilterNode::List(_) => Err(SleetError::shape(path, "expected a scalar, found a sequence")),
        FilterNode::Object(_) => Err(SleetError::shape(path, "expected a scalar, found an object")),
    }
}

fn join_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn compile_json(value: serde_json::Value) -> Result<CompiledStatement> {
        compile(&WhereOptions::try_from(value)?)
    }

    #[test]
    fn combinator_parenthesizes_children() {
        let statement = compile_json(json!({"and": [{"a": 1}, {"b": 2}]})).unwrap();
        assert_eq!(statement.sql, "(`a` = @param0) AND (`b` = @param1)");
        assert_eq!(statement.params.get("param0"), Some(&Value::Int64(1)));
        assert_eq!(statement.params.get("param1"), Some(&Value::Int64(2)));
        assert_eq!(statement.params.len(), 2);
    }

    #[test]
    fn operator_leaf() {
        let statement = compile_json(json!({"age": {"gt": 18}})).unwrap();
        assert_eq!(statement.sql, "`age` > @param0");
        assert_eq!(statement.params.get("param0"), Some(&Value::Int64(18)));
    }

    #[test]
    fn sibling_keys_are_anded_in_order() {
        let statement = compile_json(json!({"name": "x", "age": {"lte": 3}})).unwrap();
        assert_eq!(statement.sql, "(`name` = @param0) AND (`age` <= @param1)");
    }

    #[test]
    fn sequence_leaf_binds_each_element() {
        let statement = compile_json(json!({"id": [3, 5, 8]})).unwrap();
        assert_eq!(statement.sql, "`id` IN (@param0, @param1, @param2)");
        assert_eq!(statement.params.get("param2"), Some(&Value::Int64(8)));
    }

    #[test]
    fn nested_combinators_share_one_counter() {
        let statement = compile_json(json!({
            "or": [
                {"and": [{"a": 1}, {"b": {"ne": 2}}]},
                {"c": [3, 4]},
                {"d": {"between": [5, 6]}}
            ]
        }))
        .unwrap();
        assert_eq!(
            statement.sql,
            "((`a` = @param0) AND (`b` != @param1)) OR (`c` IN (@param2, @param3)) OR (`d` BETWEEN @param4 AND @param5)"
        );
        let names: Vec<&str> = statement.params.names().collect();
        assert_eq!(names, ["param0", "param1", "param2", "param3", "param4", "param5"]);
    }

    #[test]
    fn counter_continues_from_caller_state() {
        let mut counter = ParamCounter::starting_at(4);
        let tree = WhereOptions::new().eq("a", 1).eq("b", 2);
        let sql = compile_where(&tree, Some("users"), &mut counter).unwrap();
        assert_eq!(counter.position(), 6);
        assert_eq!(sql.sql(), "(`users`.`a` = @param4) AND (`users`.`b` = @param5)");
    }

    #[test]
    fn qualifier_never_touches_values() {
        let tree = WhereOptions::new().eq("title", "title = `posts`.`title`");
        let mut counter = ParamCounter::new();
        let statement = compile_where(&tree, Some("posts"), &mut counter).unwrap().build();
        assert_eq!(statement.sql, "`posts`.`title` = @param0");
        assert_eq!(
            statement.params.get("param0"),
            Some(&Value::from("title = `posts`.`title`"))
        );
    }

    #[test]
    fn literals_never_reach_sql_text() {
        let hostile = "'; DROP TABLE users; --";
        let statement = compile_json(json!({
            "or": [{"name": hostile}, {"name": {"like": hostile}}, {"tag": [hostile]}]
        }))
        .unwrap();
        assert!(!statement.sql.contains("DROP"));
        assert_eq!(statement.params.len(), 3);
        assert!(statement.params.iter().all(|(_, v)| v == &Value::from(hostile)));
    }

    #[test]
    fn empty_tree_and_empty_combinator_are_true() {
        assert_eq!(compile(&WhereOptions::new()).unwrap().sql, "TRUE");
        assert_eq!(compile_json(json!({"or": []})).unwrap().sql, "TRUE");
    }

    #[test]
    fn empty_in_list() {
        assert_eq!(compile_json(json!({"id": []})).unwrap().sql, "FALSE");
        assert_eq!(compile_json(json!({"id": {"notIn": []}})).unwrap().sql, "TRUE");
    }

    #[test]
    fn null_handling() {
        assert_eq!(compile_json(json!({"deleted_at": null})).unwrap().sql, "`deleted_at` IS NULL");
        assert_eq!(
            compile_json(json!({"deleted_at": {"ne": null}})).unwrap().sql,
            "`deleted_at` IS NOT NULL"
        );
        assert_eq!(
            compile_json(json!({"active": {"not": true}})).unwrap().sql,
            "`active` IS NOT TRUE"
        );
        assert!(matches!(
            compile_json(json!({"age": {"gt": null}})),
            Err(SleetError::InvalidFilterShape { .. })
        ));
    }

    #[test]
    fn array_operators() {
        let statement = compile_json(json!({"tags": {"contains": "rust"}})).unwrap();
        assert_eq!(statement.sql, "@param0 IN UNNEST(`tags`)");

        let statement = compile_json(json!({"status": {"contained": ["a", "b"]}})).unwrap();
        assert_eq!(statement.sql, "`status` IN UNNEST(@param0)");
        assert_eq!(
            statement.params.get("param0"),
            Some(&Value::Array(vec!["a".into(), "b".into()]))
        );
    }

    #[test]
    fn unknown_operator_is_rejected() {
        let err = compile_json(json!({"age": {"greaterThan": 3}})).unwrap_err();
        match err {
            SleetError::InvalidOperator { column, operator } => {
                assert_eq!(column, "age");
                assert_eq!(operator, "greaterThan");
            }
            other => panic!("expected InvalidOperator, got {other:?}"),
        }
    }

    #[test]
    fn malformed_shapes() {
        let cases = [
            json!({"age": {"gt": 1, "lt": 5}}),
            json!({"age": {}}),
            json!({"and": {"a": 1}}),
            json!({"and": [1, 2]}),
            json!({"id": [[1]]}),
            json!({"id": [{"a": 1}]}),
            json!({"age": {"gt": [1]}}),
            json!({"age": {"between": [1]}}),
            json!({"age": {"in": 3}}),
            json!({"active": {"is": 1}}),
        ];
        for case in cases {
            assert!(
                matches!(compile_json(case.clone()), Err(SleetError::InvalidFilterShape { .. })),
                "{case} should be rejected"
            );
        }
        assert!(matches!(
            WhereOptions::try_from(json!([1, 2])),
            Err(SleetError::InvalidFilterShape { .. })
        ));
    }
}
