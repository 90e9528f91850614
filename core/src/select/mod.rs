//! Select statement compilation.

mod builder;
mod options;

pub use builder::{CompiledSelect, build_count, build_select};
pub use options::{ColumnRef, Direction, FindOptions, Include, OrderBy};
