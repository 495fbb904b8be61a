// SPDX-License-Identifier: MPL-2.0

//! The adapter interface every taxonomy deployment implements.

use super::composite::CompositeId;
use super::model::{LeafDetail, NodeId, TaxonomyNode};
use async_trait::async_trait;
use std::fmt::Debug;

/// Shortest query the search endpoint accepts.
pub const MIN_SEARCH_CHARS: usize = 2;

/// Default number of search results requested.
pub const SEARCH_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Request failed: {0}")]
    RequestFailed(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Request timed out")]
    TimedOut,
}

/// Read-only access to a three-level taxonomy.
#[async_trait]
pub trait TaxonomySource: Debug + Send + Sync {
    async fn list_top(&self) -> Result<Vec<TaxonomyNode>, FetchError>;

    async fn list_mid(&self, top: NodeId) -> Result<Vec<TaxonomyNode>, FetchError>;

    async fn list_leaf(&self, mid: NodeId) -> Result<Vec<TaxonomyNode>, FetchError>;

    /// Searches every leaf regardless of its ancestors.
    ///
    /// Queries shorter than [`MIN_SEARCH_CHARS`] yield an empty list.
    async fn search_leaf(&self, query: &str, limit: usize)
    -> Result<Vec<LeafDetail>, FetchError>;

    /// Resolves display records for the given identifiers in one request.
    ///
    /// Identifiers the service does not know are simply absent from the result.
    async fn leaf_details(&self, ids: &[CompositeId]) -> Result<Vec<LeafDetail>, FetchError>;
}

/// Returns true if the trimmed query is long enough to be sent.
pub fn is_searchable(query: &str) -> bool {
    query.trim().chars().count() >= MIN_SEARCH_CHARS
}

/// Stand-in for a deployment whose client could not be built. Every call
/// fails with the construction error so the picker shows it per column.
#[derive(Debug, Clone)]
pub struct UnavailableSource {
    pub error: FetchError,
}

#[async_trait]
impl TaxonomySource for UnavailableSource {
    async fn list_top(&self) -> Result<Vec<TaxonomyNode>, FetchError> {
        Err(self.error.clone())
    }

    async fn list_mid(&self, _top: NodeId) -> Result<Vec<TaxonomyNode>, FetchError> {
        Err(self.error.clone())
    }

    async fn list_leaf(&self, _mid: NodeId) -> Result<Vec<TaxonomyNode>, FetchError> {
        Err(self.error.clone())
    }

    async fn search_leaf(
        &self,
        _query: &str,
        _limit: usize,
    ) -> Result<Vec<LeafDetail>, FetchError> {
        Err(self.error.clone())
    }

    async fn leaf_details(&self, _ids: &[CompositeId]) -> Result<Vec<LeafDetail>, FetchError> {
        Err(self.error.clone())
    }
}
