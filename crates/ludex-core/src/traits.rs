//! Trait definitions for external dependencies.
//!
//! These seams abstract over the remote catalog API, the token supplier,
//! and the search index backend, enabling:
//!
//! - **Testability**: mock implementations for unit testing
//! - **Flexibility**: different backends behind the same harvest logic
//! - **Decoupling**: core logic independent of HTTP and Redis specifics

use std::future::Future;

use crate::error::{AppError, IndexError};
use crate::loader::IndexSchema;
use crate::models::{PageQuery, RawRecord};

/// Read-only client for the paginated remote catalog.
pub trait CatalogSource: Send + Sync {
    /// Total number of records the remote reports for the harvest filter.
    fn count(&self) -> impl Future<Output = Result<u64, AppError>> + Send;

    /// Fetches one page of raw records.
    ///
    /// The query carries an exclusive `id > after_id` lower bound so pages
    /// never re-address records from earlier windows, plus the offset and
    /// limit within the filtered range.
    fn fetch_page(
        &self,
        query: PageQuery,
    ) -> impl Future<Output = Result<Vec<RawRecord>, AppError>> + Send;
}

/// Supplier of a bearer token for the remote catalog API.
///
/// Fails with [`AppError::Auth`] when credentials are invalid or the token
/// endpoint is unreachable; that failure is fatal and aborts the harvest
/// before any fetch.
pub trait TokenProvider: Send + Sync {
    fn token(&self) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// Write-only handle to the full-text search index.
pub trait SearchIndex: Send + Sync {
    /// Creates the index with the given schema if it does not exist.
    ///
    /// Idempotent at the backend: recreating an existing index fails with
    /// [`IndexError::AlreadyExists`], which callers treat as success.
    fn ensure_schema(
        &self,
        schema: &IndexSchema,
    ) -> impl Future<Output = Result<(), IndexError>> + Send;

    /// Writes or overwrites the document stored under `key`.
    ///
    /// Last-write-wins per key; repeated loads of the same data converge
    /// to the same index state.
    fn upsert(
        &self,
        key: &str,
        fields: &[(String, String)],
    ) -> impl Future<Output = Result<(), IndexError>> + Send;
}
