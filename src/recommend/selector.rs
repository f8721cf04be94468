use std::time::Instant;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};

use crate::recommend::composite::{CompositeScore, CompositeScorer};
use crate::recommend::criteria::history;
use crate::recommend::metrics::ScoringObserver;
use crate::recommend::store::HistoryStore;
use crate::recommend::tables::ScoringTables;
use crate::recommend::types::{Candidate, QuestionScore, SelectionCriteria};

/// Fans candidate scoring out over the history store and joins the results
/// back in input order before ranking.
pub struct Selector<'a, H> {
    pub scorer: &'a CompositeScorer,
    pub tables: &'a ScoringTables,
    pub history: &'a H,
    pub observer: &'a dyn ScoringObserver,
    pub max_concurrency: usize,
}

impl<'a, H: HistoryStore> Selector<'a, H> {
    pub async fn select(
        &self,
        criteria: &SelectionCriteria,
        candidates: &[Candidate],
        limit: usize,
        now: DateTime<Utc>,
    ) -> Vec<QuestionScore> {
        let started = Instant::now();
        let tables = self.tables.platform(criteria.platform);

        let scored: Vec<QuestionScore> = stream::iter(candidates)
            .map(|candidate| async move {
                let lookup = history::lookup(self.history, &criteria.user_id, &candidate.id).await;
                let result = self.scorer.evaluate(
                    candidate,
                    criteria,
                    tables,
                    &lookup,
                    now,
                    self.observer,
                );
                question_score(candidate, result)
            })
            .buffered(self.max_concurrency.max(1))
            .collect()
            .await;

        let ranked = rank(scored, limit);
        self.observer
            .selection_completed(candidates.len(), ranked.len(), started.elapsed());
        tracing::debug!(
            user_id = %criteria.user_id,
            pool_size = candidates.len(),
            returned = ranked.len(),
            "selected practice questions"
        );
        ranked
    }
}

/// Drops non-positive scores, sorts descending (stable, so ties keep input
/// order) and keeps at most `limit`.
pub fn rank(scored: Vec<QuestionScore>, limit: usize) -> Vec<QuestionScore> {
    let mut ranked: Vec<QuestionScore> = scored.into_iter().filter(|s| s.score > 0.0).collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(limit);
    ranked
}

fn question_score(candidate: &Candidate, result: CompositeScore) -> QuestionScore {
    QuestionScore {
        question_id: candidate.id.clone(),
        title: candidate.title.clone(),
        difficulty: candidate.difficulty.clone(),
        platform: candidate.platform,
        url: candidate.url.clone(),
        score: result.total,
        reasons: result.reasons,
        breakdown: result.breakdown,
    }
}
