//! Canonical query state and its fetch key

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::json;

use super::FilterSet;
use super::Pagination;
use super::Sort;
use crate::model::Value;

/// The canonical description of "what data to fetch".
///
/// One `QueryState` corresponds to exactly one logical remote request. Two
/// states whose [`fetch_key`](Self::fetch_key) strings are equal are the
/// same request and are deduplicated by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryState {
    /// Page index and size.
    pub pagination: Pagination,
    /// The single active sort, if any.
    pub sort: Option<Sort>,
    /// Active per-column filters.
    pub filters: FilterSet,
    /// Free-text search term, if any.
    pub search: Option<String>,
}

impl QueryState {
    /// Creates a query state at page 0 with the given page size.
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            pagination: Pagination::with_size(page_size),
            ..Self::default()
        }
    }

    /// Canonical serialization of this state plus the caller's custom
    /// parameters.
    ///
    /// Filters are sorted by column id and object keys serialize in sorted
    /// order, so states that differ only in filter insertion order produce
    /// the same key.
    pub fn fetch_key(&self, params: &HashMap<String, Value>) -> String {
        let mut filters: Vec<_> = self.filters.iter().collect();
        filters.sort_by(|a, b| a.column_id.cmp(&b.column_id));
        let filters: Vec<_> = filters
            .iter()
            .map(|f| json!({ "column": f.column_id, "value": f.value }))
            .collect();

        let mut params: Vec<_> = params.iter().collect();
        params.sort_by(|a, b| a.0.cmp(b.0));
        let params: Vec<_> = params
            .iter()
            .map(|(k, v)| json!({ "key": k, "value": v }))
            .collect();

        json!({
            "page": self.pagination.page_index,
            "size": self.pagination.page_size,
            "sort": self.sort,
            "filters": filters,
            "search": self.search,
            "params": params,
        })
        .to_string()
    }
}
