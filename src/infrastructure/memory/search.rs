// src/infrastructure/memory/search.rs
use crate::application::ports::search::SearchIndex;
use crate::domain::errors::{DomainError, DomainResult};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexOp {
    Reindex { doc_type: String, id: String },
    Unindex { doc_type: String, id: String },
}

/// Recording index used in tests; can be switched into a failing mode to
/// exercise the non-fatal reindex contract.
#[derive(Default)]
pub struct RecordingSearchIndex {
    operations: Mutex<Vec<IndexOp>>,
    failing: AtomicBool,
}

impl RecordingSearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn operations(&self) -> Vec<IndexOp> {
        self.operations.lock().expect("search index poisoned").clone()
    }

    pub fn unindexed_ids(&self) -> Vec<String> {
        self.operations()
            .into_iter()
            .filter_map(|op| match op {
                IndexOp::Unindex { id, .. } => Some(id),
                IndexOp::Reindex { .. } => None,
            })
            .collect()
    }

    pub fn reindexed_ids(&self) -> Vec<String> {
        self.operations()
            .into_iter()
            .filter_map(|op| match op {
                IndexOp::Reindex { id, .. } => Some(id),
                IndexOp::Unindex { .. } => None,
            })
            .collect()
    }

    fn check(&self) -> DomainResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(DomainError::Persistence("search backend unavailable".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SearchIndex for RecordingSearchIndex {
    async fn reindex(&self, doc_type: &str, id: &str) -> DomainResult<()> {
        self.check()?;
        self.operations
            .lock()
            .expect("search index poisoned")
            .push(IndexOp::Reindex {
                doc_type: doc_type.to_owned(),
                id: id.to_owned(),
            });
        Ok(())
    }

    async fn unindex(&self, doc_type: &str, id: &str) -> DomainResult<()> {
        self.check()?;
        self.operations
            .lock()
            .expect("search index poisoned")
            .push(IndexOp::Unindex {
                doc_type: doc_type.to_owned(),
                id: id.to_owned(),
            });
        Ok(())
    }
}
