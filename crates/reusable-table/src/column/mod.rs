//! Column definitions

pub mod field;

pub use field::{ColumnState, Field};
