//! Error types

mod fetch;
mod store;
mod validation;

pub use fetch::*;
pub use store::*;
pub use validation::*;
