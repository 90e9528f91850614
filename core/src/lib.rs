//! Query compilation and result reconstruction for sleet.
//!
//! Filter trees compile to parameterized predicates, includes resolve to
//! joins over a [`Registry`] of entities, and flat result rows fold back into
//! nested [`Record`]s.

mod trace;

pub mod error;
pub mod filter;
pub mod join;
pub mod mutate;
pub mod params;
pub mod reconstruct;
pub mod row;
pub mod schema;
pub mod select;
pub mod sql;

pub use error::{Result, SleetError};
pub use filter::{FilterNode, Operator, WhereOptions, compile, compile_where};
pub use join::{JoinClause, JoinType, resolve_joins};
pub use mutate::{build_delete, build_insert, build_update};
pub use params::{CompiledStatement, ParamCounter, Params};
pub use reconstruct::{Field, Record, ResultShape, reconstruct};
pub use row::Row;
pub use schema::{Association, AssociationKind, Entity, Namespace, Registry};
pub use select::{CompiledSelect, Direction, FindOptions, Include, build_count, build_select};
pub use sql::{SQL, SQLChunk, Token};

pub use sleet_types;
