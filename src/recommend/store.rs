use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::StoreError;
use crate::recommend::tables::split_label;
use crate::recommend::types::{Candidate, HistoryRecord, Platform};

/// Read-only source of practice problems.
pub trait CandidateRepository: Send + Sync {
    /// May return fewer than `limit` candidates, or none at all.
    fn fetch_candidates(
        &self,
        platform: Platform,
        difficulty_filter: Option<&str>,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Candidate>, StoreError>> + Send;
}

/// Read-only view of a learner's per-problem history.
pub trait HistoryStore: Send + Sync {
    fn get_history(
        &self,
        user_id: &str,
        candidate_id: &str,
    ) -> impl Future<Output = Result<Option<HistoryRecord>, StoreError>> + Send;

    fn list_history(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Vec<HistoryRecord>, StoreError>> + Send;
}

impl<T: CandidateRepository + ?Sized> CandidateRepository for Arc<T> {
    fn fetch_candidates(
        &self,
        platform: Platform,
        difficulty_filter: Option<&str>,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Candidate>, StoreError>> + Send {
        (**self).fetch_candidates(platform, difficulty_filter, limit)
    }
}

impl<T: HistoryStore + ?Sized> HistoryStore for Arc<T> {
    fn get_history(
        &self,
        user_id: &str,
        candidate_id: &str,
    ) -> impl Future<Output = Result<Option<HistoryRecord>, StoreError>> + Send {
        (**self).get_history(user_id, candidate_id)
    }

    fn list_history(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Vec<HistoryRecord>, StoreError>> + Send {
        (**self).list_history(user_id)
    }
}

/// In-process store backing both collaborator traits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    candidates: RwLock<Vec<Candidate>>,
    history: RwLock<HashMap<String, Vec<HistoryRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_candidates(candidates: Vec<Candidate>) -> Self {
        Self {
            candidates: RwLock::new(candidates),
            history: RwLock::new(HashMap::new()),
        }
    }

    pub fn add_candidate(&self, candidate: Candidate) {
        self.candidates.write().push(candidate);
    }

    /// Inserts or replaces the record for `(user_id, candidate_id)`.
    pub fn upsert_history(&self, record: HistoryRecord) {
        let mut history = self.history.write();
        let records = history.entry(record.user_id.clone()).or_default();
        match records
            .iter_mut()
            .find(|r| r.candidate_id == record.candidate_id)
        {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.read().len()
    }
}

impl CandidateRepository for MemoryStore {
    async fn fetch_candidates(
        &self,
        platform: Platform,
        difficulty_filter: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Candidate>, StoreError> {
        let candidates = self.candidates.read();
        Ok(candidates
            .iter()
            .filter(|c| c.platform == platform)
            .filter(|c| {
                difficulty_filter.map_or(true, |d| {
                    split_label(&c.difficulty).0.eq_ignore_ascii_case(split_label(d).0)
                })
            })
            .take(limit)
            .cloned()
            .collect())
    }
}

impl HistoryStore for MemoryStore {
    async fn get_history(
        &self,
        user_id: &str,
        candidate_id: &str,
    ) -> Result<Option<HistoryRecord>, StoreError> {
        Ok(self.history.read().get(user_id).and_then(|records| {
            records
                .iter()
                .find(|r| r.candidate_id == candidate_id)
                .cloned()
        }))
    }

    async fn list_history(&self, user_id: &str) -> Result<Vec<HistoryRecord>, StoreError> {
        Ok(self
            .history
            .read()
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }
}
