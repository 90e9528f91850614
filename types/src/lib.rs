//! Shared type definitions for Sleet
//!
//! This crate provides the value and type vocabulary used across the Sleet
//! crates:
//!
//! - [`Value`] - A bound parameter or result cell
//! - [`DataType`] - Declared warehouse column types
//!
//! # Features
//!
//! - `std` - Standard library support (enabled by default)

mod data_type;
mod value;

pub use data_type::{DataType, DataTypeParseError};
pub use value::Value;

/// Prelude module for commonly used types
pub mod prelude {
    pub use crate::{DataType, Value};
}
