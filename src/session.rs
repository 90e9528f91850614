use std::borrow::Cow;

use sleet_core::sleet_types::Value;
use sleet_core::{
    CompiledStatement, FindOptions, Record, Registry, Result, Row, SleetError, WhereOptions,
    build_count, build_delete, build_insert, build_select, build_update, reconstruct,
};

use crate::config::Config;
use crate::executor::{Executor, SchemaManager};

/// Entry point: a registry of entities bound to an executor.
///
/// ```no_run
/// # use sleet::prelude::*;
/// # async fn run<E: Executor>(executor: E) -> sleet::Result<()> {
/// let config = Config::load()?;
/// let mut registry = config.registry();
/// registry.define(Entity::builder("User").table("users").attribute("name", DataType::String).build())?;
///
/// let db = Sleet::new(registry, executor).with_config(config);
/// let users = db
///     .find_all("User", &FindOptions::new().r#where(WhereOptions::new().eq("name", "ann")))
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Sleet<E> {
    registry: Registry,
    executor: E,
    config: Config,
}

impl<E: Executor> Sleet<E> {
    pub fn new(registry: Registry, executor: E) -> Self {
        Self {
            registry,
            executor,
            config: Config::default(),
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    #[inline]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[inline]
    pub fn executor(&self) -> &E {
        &self.executor
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Every matching record, reconstructed with its includes.
    ///
    /// The configured default limit applies when `options` has neither a
    /// limit nor includes. With includes a limit would cut rows, not records.
    pub async fn find_all(&self, entity: &str, options: &FindOptions) -> Result<Vec<Record>> {
        let options = match self.config.default_limit {
            Some(limit) if options.limit.is_none() && options.include.is_empty() => {
                Cow::Owned(options.clone().limit(limit))
            }
            _ => Cow::Borrowed(options),
        };
        let select = build_select(&self.registry, entity, &options)?;
        let rows = self.run("select", &select.statement).await?;
        Ok(reconstruct(&rows, &select.shape))
    }

    /// The first matching record.
    ///
    /// Without includes the statement is limited to one row. With includes
    /// every row is fetched so the first record's collections are complete.
    pub async fn find_one(&self, entity: &str, options: &FindOptions) -> Result<Option<Record>> {
        let options = if options.include.is_empty() {
            Cow::Owned(options.clone().limit(1))
        } else {
            Cow::Borrowed(options)
        };
        let select = build_select(&self.registry, entity, &options)?;
        let rows = self.run("select", &select.statement).await?;
        Ok(reconstruct(&rows, &select.shape).into_iter().next())
    }

    /// The record whose primary key equals `key`, further narrowed by any
    /// filter in `options`.
    pub async fn find_by_pk(
        &self,
        entity: &str,
        key: impl Into<Value>,
        options: &FindOptions,
    ) -> Result<Option<Record>> {
        let pk = self.registry.entity(entity)?.primary_key();
        let by_key = WhereOptions::new().eq(pk, key);
        let filter = match &options.filter {
            Some(filter) if !filter.is_empty() => WhereOptions::new().and([by_key, filter.clone()]),
            _ => by_key,
        };
        let options = options.clone().r#where(filter);
        self.find_one(entity, &options).await
    }

    /// Number of distinct root records matching `options`.
    pub async fn count(&self, entity: &str, options: &FindOptions) -> Result<u64> {
        let statement = build_count(&self.registry, entity, options)?;
        let rows = self.run("count", &statement).await?;
        let count = rows.first().and_then(|row| row.get("count"));
        match count {
            Some(Value::Int64(n)) if *n >= 0 => Ok(*n as u64),
            // Some engines report INT64 as a decimal string
            Some(Value::String(s)) => s
                .parse()
                .map_err(|_| SleetError::Mapping(format!("count is not an integer: '{s}'"))),
            Some(other) => Err(SleetError::Mapping(format!("count is not an integer: {other}"))),
            None => Err(SleetError::Mapping("count column missing from result".into())),
        }
    }

    /// Inserts one row.
    pub async fn create(&self, entity: &str, values: Row) -> Result<()> {
        self.bulk_create(entity, std::slice::from_ref(&values)).await
    }

    /// Inserts `rows` in a single statement.
    pub async fn bulk_create(&self, entity: &str, rows: &[Row]) -> Result<()> {
        let statement = build_insert(&self.registry, entity, rows)?;
        self.run("insert", &statement).await?;
        Ok(())
    }

    /// Updates matching rows; every row when `filter` is `None`.
    pub async fn update(&self, entity: &str, values: &Row, filter: Option<&WhereOptions>) -> Result<()> {
        let statement = build_update(&self.registry, entity, values, filter)?;
        self.run("update", &statement).await?;
        Ok(())
    }

    /// Deletes matching rows; every row when `filter` is `None`.
    pub async fn destroy(&self, entity: &str, filter: Option<&WhereOptions>) -> Result<()> {
        let statement = build_delete(&self.registry, entity, filter)?;
        self.run("delete", &statement).await?;
        Ok(())
    }

    /// Asks `manager` to create or verify the table of every entity, in name
    /// order.
    pub async fn sync<M: SchemaManager>(&self, manager: &M) -> Result<()> {
        let mut entities: Vec<_> = self.registry.entities().collect();
        entities.sort_by(|a, b| a.name().cmp(b.name()));
        for entity in entities {
            manager
                .ensure_table(entity, self.registry.namespace())
                .await
                .map_err(SleetError::from)?;
        }
        Ok(())
    }

    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    async fn run(&self, kind: &'static str, statement: &CompiledStatement) -> Result<Vec<Row>> {
        match self.executor.execute(statement).await {
            Ok(rows) => {
                sleet_core::sleet_trace_exec!(ok, kind, rows.len());
                Ok(rows)
            }
            Err(error) => {
                sleet_core::sleet_trace_exec!(err, kind, &error);
                Err(error.into())
            }
        }
    }
}
