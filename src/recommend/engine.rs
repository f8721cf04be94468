use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::RecommenderConfig;
use crate::error::RecommendError;
use crate::recommend::composite::CompositeScorer;
use crate::recommend::learning_path::LearningPathBuilder;
use crate::recommend::metrics::{ScoringMetrics, ScoringObserver};
use crate::recommend::selector::Selector;
use crate::recommend::store::{CandidateRepository, HistoryStore};
use crate::recommend::tables::ScoringTables;
use crate::recommend::types::{Candidate, Platform, QuestionScore, SelectionCriteria};

/// Entry point for hosts: ranks candidate pools and builds learning paths.
///
/// Tables and configuration are fixed at construction; the engine keeps no
/// per-call state, so repeated calls with the same inputs and clock agree.
pub struct RecommendationEngine<R, H> {
    config: RecommenderConfig,
    tables: Arc<ScoringTables>,
    scorer: CompositeScorer,
    repository: R,
    history: H,
    observer: Arc<dyn ScoringObserver>,
}

impl<R: CandidateRepository, H: HistoryStore> RecommendationEngine<R, H> {
    pub fn new(
        config: RecommenderConfig,
        repository: R,
        history: H,
    ) -> Result<Self, RecommendError> {
        let tables = config.load_tables()?;
        Self::with_tables(config, Arc::new(tables), repository, history)
    }

    pub fn with_tables(
        config: RecommenderConfig,
        tables: Arc<ScoringTables>,
        repository: R,
        history: H,
    ) -> Result<Self, RecommendError> {
        config.validate()?;
        let scorer = CompositeScorer::new(config.weights, config.thresholds)?;
        tracing::info!(
            default_limit = config.selection.default_limit,
            max_concurrency = config.selection.max_concurrency,
            platforms = tables.platforms.len(),
            "recommendation engine ready"
        );
        Ok(Self {
            config,
            tables,
            scorer,
            repository,
            history,
            observer: Arc::new(ScoringMetrics::new()),
        })
    }

    pub fn with_observer(mut self, observer: Arc<dyn ScoringObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    pub fn tables(&self) -> &ScoringTables {
        &self.tables
    }

    pub fn scorer(&self) -> &CompositeScorer {
        &self.scorer
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub async fn select_optimal_questions(
        &self,
        criteria: &SelectionCriteria,
        candidates: &[Candidate],
    ) -> Vec<QuestionScore> {
        self.select_optimal_questions_at(criteria, candidates, Utc::now())
            .await
    }

    pub async fn select_optimal_questions_at(
        &self,
        criteria: &SelectionCriteria,
        candidates: &[Candidate],
        now: DateTime<Utc>,
    ) -> Vec<QuestionScore> {
        self.selector()
            .select(criteria, candidates, self.config.selection.default_limit, now)
            .await
    }

    /// Fails only when the candidate pool cannot be fetched; a missing history
    /// degrades to a cold-start path at `target_difficulty`.
    pub async fn get_learning_path(
        &self,
        user_id: &str,
        platform: Platform,
        target_difficulty: &str,
        count: Option<usize>,
    ) -> Result<Vec<QuestionScore>, RecommendError> {
        self.get_learning_path_at(user_id, platform, target_difficulty, count, Utc::now())
            .await
    }

    pub async fn get_learning_path_at(
        &self,
        user_id: &str,
        platform: Platform,
        target_difficulty: &str,
        count: Option<usize>,
        now: DateTime<Utc>,
    ) -> Result<Vec<QuestionScore>, RecommendError> {
        let builder = LearningPathBuilder {
            repository: &self.repository,
            selector: self.selector(),
            selection: &self.config.selection,
        };
        let count = count.unwrap_or(self.config.selection.default_limit);
        builder
            .build(user_id, platform, target_difficulty, count, now)
            .await
    }

    fn selector(&self) -> Selector<'_, H> {
        Selector {
            scorer: &self.scorer,
            tables: &self.tables,
            history: &self.history,
            observer: self.observer.as_ref(),
            max_concurrency: self.config.selection.max_concurrency,
        }
    }
}
