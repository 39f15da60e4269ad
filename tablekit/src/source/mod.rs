//! Remote data source contract.
//!
//! The engine does not assume a specific transport; callers implement
//! [`DataSource`] over whatever endpoint serves their rows. The engine
//! guarantees that at most one logical fetch is active per table instance
//! and that superseded results are discarded (see
//! [`TableEngine`](crate::TableEngine)).

mod result;

pub use result::QueryResult;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::model::Value;
use crate::query::QueryState;

/// Asynchronous remote source of paginated rows.
///
/// One call to [`fetch`](Self::fetch) serves exactly one [`QueryState`]:
/// the page the state describes plus the total row count for the filtered
/// set. An empty result (`total == 0`) is a success, not a failure.
///
/// # Example
///
/// ```ignore
/// use tablekit::source::{DataSource, QueryResult};
///
/// struct ProductApi { client: HttpClient }
///
/// #[async_trait::async_trait]
/// impl DataSource<Product> for ProductApi {
///     async fn fetch(
///         &self,
///         table_id: &str,
///         query: &QueryState,
///         params: &HashMap<String, Value>,
///     ) -> Result<QueryResult<Product>, FetchError> {
///         let response = self.client.get_products(query, params).await
///             .map_err(|e| FetchError::network(e.to_string()))?;
///         Ok(QueryResult::new(response.items, response.total))
///     }
/// }
/// ```
#[async_trait]
pub trait DataSource<R>: Send + Sync {
    /// Fetches one page of rows for a query state.
    ///
    /// `params` are the caller's opaque extra parameters; implementations
    /// forward them to the endpoint without interpreting them.
    async fn fetch(
        &self,
        table_id: &str,
        query: &QueryState,
        params: &HashMap<String, Value>,
    ) -> Result<QueryResult<R>, FetchError>;
}
