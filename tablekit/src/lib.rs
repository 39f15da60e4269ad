//! Table configuration & query engine
//!
//! State engine for large, paginated, server-backed tables: column
//! visibility/order/pinning/sizing, a race-free query controller
//! (pagination, sort cycle, filters, debounced search), identity-keyed row
//! selection, and a facade that keeps it all synchronized with an
//! asynchronous remote data source. Rendering, formatting, transport, and
//! authentication are external collaborators.

pub mod column;
pub mod error;
pub mod model;
pub mod query;
pub mod selection;
pub mod session;
pub mod source;
pub mod store;

mod engine;

pub use engine::*;
