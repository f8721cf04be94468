use chrono::{DateTime, Utc};

use crate::config::{CriterionWeights, NotableThresholds};
use crate::error::ConfigError;
use crate::recommend::criteria::history::HistoryLookup;
use crate::recommend::criteria::{
    concept, difficulty, diversity, history, spacing, Criterion, DEGRADED_SCORE,
};
use crate::recommend::metrics::ScoringObserver;
use crate::recommend::tables::PlatformTables;
use crate::recommend::types::{Candidate, CriterionScores, SelectionCriteria};

pub const REASON_DIFFICULTY: &str = "Matches your current difficulty progression";
pub const REASON_MISSING_CONCEPTS: &str = "Covers missing concepts";
pub const REASON_TOPICS: &str = "Strong fit with your current topics";
pub const REASON_HISTORY: &str = "Fresh or worth retrying based on your history";
pub const REASON_TIMING: &str = "Due for spaced-repetition review";
pub const REASON_DIVERSITY: &str = "Introduces new topics";
pub const REASON_FALLBACK: &str = "Balanced pick for steady practice";

#[derive(Debug, Clone, PartialEq)]
pub struct CompositeScore {
    pub total: f64,
    pub breakdown: CriterionScores,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CompositeScorer {
    weights: CriterionWeights,
    thresholds: NotableThresholds,
}

impl Default for CompositeScorer {
    fn default() -> Self {
        Self {
            weights: CriterionWeights::default(),
            thresholds: NotableThresholds::default(),
        }
    }
}

impl CompositeScorer {
    pub fn new(
        weights: CriterionWeights,
        thresholds: NotableThresholds,
    ) -> Result<Self, ConfigError> {
        weights.validate()?;
        Ok(Self {
            weights,
            thresholds,
        })
    }

    pub fn weights(&self) -> &CriterionWeights {
        &self.weights
    }

    /// Weighted sum clamped to `[0, 1]`; a non-finite sum collapses to zero.
    pub fn combine(&self, scores: &CriterionScores) -> f64 {
        let w = &self.weights;
        let total = w.difficulty * scores.difficulty
            + w.concept * scores.concept
            + w.history * scores.history
            + w.timing * scores.timing
            + w.diversity * scores.diversity;
        if total.is_finite() {
            total.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn reasons(&self, scores: &CriterionScores, missing_covered: usize) -> Vec<String> {
        let t = &self.thresholds;
        let mut reasons = Vec::new();

        if scores.difficulty > t.difficulty {
            reasons.push(REASON_DIFFICULTY.to_string());
        }
        if missing_covered > 0 {
            reasons.push(REASON_MISSING_CONCEPTS.to_string());
        }
        if scores.concept > t.concept {
            reasons.push(REASON_TOPICS.to_string());
        }
        if scores.history > t.history {
            reasons.push(REASON_HISTORY.to_string());
        }
        if scores.timing > t.timing {
            reasons.push(REASON_TIMING.to_string());
        }
        if scores.diversity > t.diversity {
            reasons.push(REASON_DIVERSITY.to_string());
        }

        if reasons.is_empty() {
            reasons.push(REASON_FALLBACK.to_string());
        }
        reasons
    }

    /// Scores one candidate. A failed history lookup degrades the two
    /// history-backed criteria to neutral and is reported to `observer`.
    pub fn evaluate(
        &self,
        candidate: &Candidate,
        criteria: &SelectionCriteria,
        tables: &PlatformTables,
        lookup: &HistoryLookup,
        now: DateTime<Utc>,
        observer: &dyn ScoringObserver,
    ) -> CompositeScore {
        let concept = concept::score(candidate, criteria, tables);

        let (history_score, timing_score) = match lookup {
            Ok(record) => (
                history::score(record.as_ref(), now),
                spacing::score(record.as_ref(), now),
            ),
            Err(err) => {
                tracing::warn!(
                    user_id = %criteria.user_id,
                    candidate_id = %candidate.id,
                    error = %err,
                    "history lookup failed, scoring history and timing as neutral"
                );
                for criterion in [Criterion::History, Criterion::Timing] {
                    observer.criterion_degraded(criterion, &criteria.user_id, &candidate.id, err);
                }
                (DEGRADED_SCORE, DEGRADED_SCORE)
            }
        };

        let breakdown = CriterionScores {
            difficulty: difficulty::score(
                &candidate.difficulty,
                &criteria.current_difficulty,
                criteria.learning_style,
                tables,
            ),
            concept: concept.score,
            history: history_score,
            timing: timing_score,
            diversity: diversity::score(&candidate.tags, &criteria.topics),
        };

        CompositeScore {
            total: self.combine(&breakdown),
            reasons: self.reasons(&breakdown, concept.missing_covered),
            breakdown,
        }
    }
}
