// src/application/ports/search.rs
use crate::domain::errors::DomainResult;
use async_trait::async_trait;

/// Document type under which articles are indexed.
pub const NEWS_SEARCH_TYPE: &str = "news";

/// Search-index synchronizer. Callers treat failures as non-fatal: the
/// authoritative state is committed before any of these run.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    async fn reindex(&self, doc_type: &str, id: &str) -> DomainResult<()>;
    async fn unindex(&self, doc_type: &str, id: &str) -> DomainResult<()>;
}
