//! Query state: pagination, sort, filters, search.
//!
//! This module owns the canonical description of "what data to fetch".
//! User intents mutate a [`QueryState`] through the [`QueryController`]
//! state machine; the resulting state serializes to a canonical
//! [`fetch key`](QueryState::fetch_key) that identifies one logical remote
//! request.
//!
//! # Shared Types
//!
//! - [`Pagination`] - page index and size
//! - [`Sort`] - single active sort column and direction
//! - [`ColumnFilter`] / [`FilterSet`] - opaque per-column filter values
//! - [`QueryState`] - the canonical aggregate

mod controller;
mod filter;
mod page;
mod sort;
mod state;

pub use controller::QueryController;
pub use filter::ColumnFilter;
pub use filter::FilterSet;
pub use page::Pagination;
pub use sort::Sort;
pub use sort::SortDirection;
pub use state::QueryState;
