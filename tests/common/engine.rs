//! In-memory stand-ins for the warehouse.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use sleet::prelude::*;
use sleet::{CompiledSelect, CompiledStatement, JoinType, ParamCounter, resolve_joins};

/// Entity rows keyed by plain column name.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    rows: HashMap<String, Vec<Row>>,
}

impl Tables {
    pub fn insert(&mut self, entity: &str, row: Row) {
        self.rows.entry(entity.to_string()).or_default().push(row);
    }

    pub fn rows(&self, entity: &str) -> &[Row] {
        self.rows.get(entity).map(Vec::as_slice).unwrap_or_default()
    }

    /// Compiles a find and evaluates its joins over the stored rows, returning
    /// the flat labelled rows the engine would produce.
    ///
    /// Joins are nested loops on the ON equality. Filters are not evaluated.
    pub fn select(
        &self,
        registry: &Registry,
        entity: &str,
        options: &FindOptions,
    ) -> (CompiledSelect, Vec<Row>) {
        let select = build_select(registry, entity, options).unwrap();
        let root = registry.entity(entity).unwrap();
        let joins = resolve_joins(registry, root, &options.include, &mut ParamCounter::new()).unwrap();

        let mut combos: Vec<Vec<(&str, Option<&Row>)>> = self
            .rows(root.name())
            .iter()
            .map(|row| vec![(root.table(), Some(row))])
            .collect();

        for join in &joins {
            let mut next = Vec::new();
            for combo in combos {
                let left = combo
                    .iter()
                    .find(|(alias, _)| join.on.left.alias == *alias)
                    .and_then(|(_, row)| *row)
                    .map(|row| row.get_or_null(&join.on.left.column).clone())
                    .unwrap_or(Value::Null);
                let matches: Vec<&Row> = if left.is_null() {
                    Vec::new()
                } else {
                    self.rows(&join.entity)
                        .iter()
                        .filter(|row| row.get_or_null(&join.on.right.column) == &left)
                        .collect()
                };

                if matches.is_empty() {
                    if join.join_type == JoinType::LeftOuter {
                        let mut combo = combo.clone();
                        combo.push((join.alias.as_str(), None));
                        next.push(combo);
                    }
                    continue;
                }
                for row in matches {
                    let mut combo = combo.clone();
                    combo.push((join.alias.as_str(), Some(row)));
                    next.push(combo);
                }
            }
            combos = next;
        }

        let shape = &select.shape;
        let tables: Vec<_> = std::iter::once(&shape.root)
            .chain(shape.includes.iter().map(|i| &i.table))
            .collect();
        let rows = combos
            .iter()
            .map(|combo| {
                let mut out = Row::new();
                for table in &tables {
                    let source = combo
                        .iter()
                        .find(|(alias, _)| table.alias == *alias)
                        .and_then(|(_, row)| *row);
                    for column in &table.columns {
                        let value = source.map(|row| row.get_or_null(column).clone()).unwrap_or_default();
                        out.set(table.label(column), value);
                    }
                }
                out
            })
            .collect();

        (select, rows)
    }
}

/// Executor that records statements and replays queued responses.
///
/// With nothing queued, statements succeed with no rows.
#[derive(Debug, Default)]
pub struct MockExecutor {
    responses: RefCell<VecDeque<Result<Vec<Row>, ExecutionError>>>,
    log: RefCell<Vec<CompiledStatement>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, rows: Vec<Row>) -> Self {
        self.responses.borrow_mut().push_back(Ok(rows));
        self
    }

    pub fn fail(self, error: ExecutionError) -> Self {
        self.responses.borrow_mut().push_back(Err(error));
        self
    }

    pub fn statements(&self) -> Vec<CompiledStatement> {
        self.log.borrow().clone()
    }

    pub fn last(&self) -> CompiledStatement {
        self.log.borrow().last().cloned().expect("no statement executed")
    }
}

impl Executor for MockExecutor {
    async fn execute(&self, statement: &CompiledStatement) -> Result<Vec<Row>, ExecutionError> {
        self.log.borrow_mut().push(statement.clone());
        self.responses.borrow_mut().pop_front().unwrap_or(Ok(Vec::new()))
    }
}

/// Schema manager that records the qualified tables it was asked to ensure.
#[derive(Debug, Default)]
pub struct RecordingSchema {
    pub ensured: RefCell<Vec<String>>,
}

impl SchemaManager for RecordingSchema {
    async fn ensure_table(&self, entity: &Entity, namespace: &Namespace) -> Result<(), ExecutionError> {
        self.ensured
            .borrow_mut()
            .push(namespace.qualify(entity.table()).to_string());
        Ok(())
    }
}
