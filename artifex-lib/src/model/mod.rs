//! Typed models

mod row;

pub use row::*;
