#![allow(dead_code)]

pub mod engine;
pub mod schema;

pub use engine::*;
pub use schema::*;
