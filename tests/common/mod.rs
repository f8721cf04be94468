#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use practice_recommender::recommend::criteria::Criterion;
use practice_recommender::recommend::{
    CandidateRepository, HistoryStore, MemoryStore, ScoringObserver,
};
use practice_recommender::{
    Candidate, HistoryRecord, Platform, RecommendationEngine, RecommenderConfig, StoreError,
};

/// 2024-03-01T12:00:00Z
pub const FIXED_TIMESTAMP: i64 = 1_709_294_400;

pub fn fixed_now() -> DateTime<Utc> {
    DateTime::from_timestamp(FIXED_TIMESTAMP, 0).expect("valid timestamp")
}

pub fn days_ago(days: i64) -> DateTime<Utc> {
    fixed_now() - chrono::Duration::days(days)
}

pub fn leetcode(id: &str, difficulty: &str, tags: &[&str]) -> Candidate {
    Candidate::new(id, format!("Problem {id}"), difficulty, Platform::LeetCode)
        .with_tags(tags.iter().copied())
}

pub fn codeforces(id: &str, difficulty: &str, tags: &[&str]) -> Candidate {
    Candidate::new(id, format!("Problem {id}"), difficulty, Platform::Codeforces)
        .with_tags(tags.iter().copied())
}

/// Pool used by the headline ranking scenario.
pub fn scenario_pool() -> Vec<Candidate> {
    vec![
        leetcode("hard-graph", "Hard", &["Graph"]),
        leetcode("medium-dp", "Medium", &["DP"]),
        leetcode("easy-array", "Easy", &["Array"]),
    ]
}

pub fn engine_with<R, H>(repository: R, history: H) -> RecommendationEngine<R, H>
where
    R: CandidateRepository,
    H: HistoryStore,
{
    RecommendationEngine::new(RecommenderConfig::default(), repository, history)
        .expect("default config is valid")
}

pub type MemoryEngine = RecommendationEngine<Arc<MemoryStore>, Arc<MemoryStore>>;

pub fn memory_engine(store: Arc<MemoryStore>) -> MemoryEngine {
    engine_with(store.clone(), store)
}

// ============================================================================
// Failing collaborators
// ============================================================================

#[derive(Debug, Default)]
pub struct FailingHistory;

impl HistoryStore for FailingHistory {
    async fn get_history(
        &self,
        _user_id: &str,
        _candidate_id: &str,
    ) -> Result<Option<HistoryRecord>, StoreError> {
        Err(StoreError::Timeout(250))
    }

    async fn list_history(&self, _user_id: &str) -> Result<Vec<HistoryRecord>, StoreError> {
        Err(StoreError::Unavailable("history replica down".to_string()))
    }
}

#[derive(Debug, Default)]
pub struct FailingRepository;

impl CandidateRepository for FailingRepository {
    async fn fetch_candidates(
        &self,
        _platform: Platform,
        _difficulty_filter: Option<&str>,
        _limit: usize,
    ) -> Result<Vec<Candidate>, StoreError> {
        Err(StoreError::Backend("problem catalogue offline".to_string()))
    }
}

/// Fails lookups for a single candidate and delegates everything else.
pub struct FlakyHistory {
    pub inner: MemoryStore,
    pub failing_candidate: String,
}

impl HistoryStore for FlakyHistory {
    async fn get_history(
        &self,
        user_id: &str,
        candidate_id: &str,
    ) -> Result<Option<HistoryRecord>, StoreError> {
        if candidate_id == self.failing_candidate {
            return Err(StoreError::Timeout(100));
        }
        self.inner.get_history(user_id, candidate_id).await
    }

    async fn list_history(&self, user_id: &str) -> Result<Vec<HistoryRecord>, StoreError> {
        self.inner.list_history(user_id).await
    }
}

/// Answers out of order: later candidates resolve first.
#[derive(Debug, Default)]
pub struct SlowHistory;

impl HistoryStore for SlowHistory {
    async fn get_history(
        &self,
        _user_id: &str,
        candidate_id: &str,
    ) -> Result<Option<HistoryRecord>, StoreError> {
        let rank: u64 = candidate_id
            .trim_start_matches(|c: char| !c.is_ascii_digit())
            .parse()
            .unwrap_or(0);
        tokio::time::sleep(Duration::from_millis(40u64.saturating_sub(rank * 2))).await;
        Ok(None)
    }

    async fn list_history(&self, _user_id: &str) -> Result<Vec<HistoryRecord>, StoreError> {
        Ok(Vec::new())
    }
}

// ============================================================================
// Observer
// ============================================================================

#[derive(Debug, Default)]
pub struct CountingObserver {
    pub history_degraded: AtomicU64,
    pub timing_degraded: AtomicU64,
    pub history_unavailable: AtomicU64,
    pub selections: AtomicU64,
}

impl CountingObserver {
    pub fn load(counter: &AtomicU64) -> u64 {
        counter.load(Ordering::SeqCst)
    }
}

impl ScoringObserver for CountingObserver {
    fn criterion_degraded(
        &self,
        criterion: Criterion,
        _user_id: &str,
        _candidate_id: &str,
        _error: &StoreError,
    ) {
        match criterion {
            Criterion::History => self.history_degraded.fetch_add(1, Ordering::SeqCst),
            Criterion::Timing => self.timing_degraded.fetch_add(1, Ordering::SeqCst),
            _ => 0,
        };
    }

    fn history_unavailable(&self, _user_id: &str, _error: &StoreError) {
        self.history_unavailable.fetch_add(1, Ordering::SeqCst);
    }

    fn selection_completed(&self, _pool_size: usize, _returned: usize, _elapsed: Duration) {
        self.selections.fetch_add(1, Ordering::SeqCst);
    }
}
