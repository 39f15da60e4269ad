//! Core data types shared across the engine.

mod row;
mod value;

pub use row::RowId;
pub use row::RowIdentity;
pub use value::Value;
