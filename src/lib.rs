//! # sleet
//!
//! A declarative query compiler for BigQuery-style warehouses.
//!
//! Entities and their associations live in a [`Registry`]. Finds are
//! described with [`FindOptions`]: a [`WhereOptions`] filter tree, includes of
//! associated entities, ordering and paging. sleet compiles them into one
//! parameterized statement with backtick-quoted identifiers and `@param`
//! placeholders, hands it to an [`Executor`], and folds the flat result rows
//! back into nested [`Record`]s.
//!
//! ## Quick Start
//!
//! ```rust
//! use sleet::prelude::*;
//!
//! # fn main() -> sleet::Result<()> {
//! let mut registry = Registry::with_namespace(Namespace::new().dataset("blog"));
//! registry.define(Entity::builder("User").table("users").attribute("name", DataType::String).build())?;
//! registry.define(
//!     Entity::builder("Post")
//!         .table("posts")
//!         .attribute("user_id", DataType::Int64)
//!         .attribute("title", DataType::String)
//!         .build(),
//! )?;
//! registry.associate("User", Association::has_many("Post", "user_id"))?;
//!
//! let select = build_select(
//!     &registry,
//!     "User",
//!     &FindOptions::new()
//!         .r#where(WhereOptions::new().eq("name", "ann"))
//!         .include(Include::new("Post").attributes(["title"])),
//! )?;
//! assert_eq!(
//!     select.statement.sql,
//!     "SELECT `users`.`id` AS `users_id`, `users`.`name` AS `users_name`, \
//!      `posts`.`id` AS `posts_id`, `posts`.`title` AS `posts_title` \
//!      FROM `blog.users` AS `users` \
//!      LEFT OUTER JOIN `blog.posts` AS `posts` ON `users`.`id` = `posts`.`user_id` \
//!      WHERE `users`.`name` = @param0"
//! );
//!
//! let rows = [
//!     Row::new().with("users_id", 1).with("users_name", "ann").with("posts_id", 7).with("posts_title", "hi"),
//!     Row::new().with("users_id", 1).with("users_name", "ann").with("posts_id", 8).with("posts_title", "yo"),
//! ];
//! let users = reconstruct(&rows, &select.shape);
//! assert_eq!(users.len(), 1);
//! assert_eq!(users[0].many("posts").len(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! | Feature   | Default | Effect                                          |
//! |-----------|---------|-------------------------------------------------|
//! | `std`     | yes     | Standard library support                        |
//! | `tracing` | yes     | `tracing` events for compiled and run statements |

pub mod config;
pub mod executor;
mod session;

pub use config::{Config, ConfigError};
pub use executor::{ExecutionError, Executor, SchemaManager};
pub use session::Sleet;

pub use sleet_core::{
    Association, AssociationKind, CompiledSelect, CompiledStatement, Direction, Entity, Field,
    FilterNode, FindOptions, Include, JoinClause, JoinType, Namespace, Operator, ParamCounter,
    Params, Record, Registry, Result, ResultShape, Row, SQL, SleetError, WhereOptions,
    build_count, build_delete, build_insert, build_select, build_update, compile, compile_where,
    reconstruct, resolve_joins,
};
pub use sleet_core::{filter, join, mutate, params, schema, select, sql};
pub use sleet_types::{DataType, Value};

/// Everything needed to define entities, build finds and run them.
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::executor::{ExecutionError, Executor, SchemaManager};
    pub use crate::session::Sleet;
    pub use sleet_core::{
        Association, Direction, Entity, Field, FindOptions, Include, Namespace, Operator, Record,
        Registry, Row, SleetError, WhereOptions, build_count, build_delete, build_insert,
        build_select, build_update, reconstruct,
    };
    pub use sleet_types::{DataType, Value};
}
