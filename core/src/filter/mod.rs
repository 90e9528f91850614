//! Predicate compiler.
//!
//! A [`WhereOptions`] tree is compiled into a SQL boolean expression whose
//! literals are all bound as named parameters.

mod compile;
mod operator;
mod tree;

pub use compile::{compile, compile_where};
pub use operator::Operator;
pub use tree::{AND, FilterNode, OR, WhereOptions};
