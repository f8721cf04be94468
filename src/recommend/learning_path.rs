use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::SelectionConfig;
use crate::error::RecommendError;
use crate::recommend::selector::Selector;
use crate::recommend::store::{CandidateRepository, HistoryStore};
use crate::recommend::tables::{split_label, DifficultyBucket, DifficultyScale, PlatformTables};
use crate::recommend::types::{
    Candidate, HistoryRecord, HistoryStatus, LearningStyle, Platform, QuestionScore,
    SelectionCriteria,
};

/// Aggregate view of a learner derived from their history.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerProfile {
    pub level: String,
    pub bucket: Option<DifficultyBucket>,
    pub topics: BTreeSet<String>,
    pub missing_concepts: BTreeSet<String>,
}

pub fn derive_profile(
    records: &[HistoryRecord],
    scale: &DifficultyScale,
    fallback_level: &str,
    missing_sample: usize,
) -> LearnerProfile {
    let ordinals: Vec<f64> = records
        .iter()
        .filter_map(|r| r.difficulty.as_deref())
        .map(|label| scale.ordinal(label) as f64)
        .collect();

    let bucket = if ordinals.is_empty() {
        None
    } else {
        let mean = ordinals.iter().sum::<f64>() / ordinals.len() as f64;
        Some(DifficultyBucket::from_mean_ordinal(mean))
    };
    let level = match bucket {
        Some(bucket) => scale.bucket_label(bucket).to_string(),
        None => fallback_level.to_string(),
    };

    let topics: BTreeSet<String> = records
        .iter()
        .flat_map(|r| r.topics.iter().cloned())
        .collect();

    let mut seen = HashSet::new();
    let missing_concepts: BTreeSet<String> = records
        .iter()
        .filter(|r| r.status != HistoryStatus::Solved)
        .flat_map(|r| r.topics.iter())
        .filter(|topic| seen.insert(topic.to_lowercase()))
        .take(missing_sample)
        .cloned()
        .collect();

    LearnerProfile {
        level,
        bucket,
        topics,
        missing_concepts,
    }
}

/// Keeps candidates that are a reasonable step from the learner's tier on
/// platforms with a progression graph.
pub fn retain_sane_steps(
    candidates: Vec<Candidate>,
    learner_level: &str,
    tables: &PlatformTables,
    max_steps: usize,
) -> Vec<Candidate> {
    let Some(graph) = &tables.progression else {
        return candidates;
    };
    let (learner_tier, _) = split_label(learner_level);
    candidates
        .into_iter()
        .filter(|c| graph.is_sane_step(learner_tier, split_label(&c.difficulty).0, max_steps))
        .collect()
}

pub struct LearningPathBuilder<'a, R, H> {
    pub repository: &'a R,
    pub selector: Selector<'a, H>,
    pub selection: &'a SelectionConfig,
}

impl<'a, R: CandidateRepository, H: HistoryStore> LearningPathBuilder<'a, R, H> {
    pub async fn build(
        &self,
        user_id: &str,
        platform: Platform,
        target_difficulty: &str,
        count: usize,
        now: DateTime<Utc>,
    ) -> Result<Vec<QuestionScore>, RecommendError> {
        let records = match self.selector.history.list_history(user_id).await {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(
                    user_id = %user_id,
                    error = %err,
                    "history listing unavailable, building a cold-start path"
                );
                self.selector.observer.history_unavailable(user_id, &err);
                Vec::new()
            }
        };

        let tables = self.selector.tables.platform(platform);
        let profile = derive_profile(
            &records,
            &tables.difficulty_scale,
            target_difficulty,
            self.selection.missing_concept_sample,
        );

        let filter = Some(target_difficulty.trim()).filter(|d| !d.is_empty());
        let pool = self
            .repository
            .fetch_candidates(platform, filter, self.selection.candidate_pool_limit)
            .await
            .map_err(RecommendError::CandidatePool)?;
        let fetched = pool.len();
        let pool = retain_sane_steps(
            pool,
            &profile.level,
            tables,
            self.selection.max_progression_steps,
        );

        tracing::info!(
            user_id = %user_id,
            platform = platform.as_str(),
            level = %profile.level,
            history = records.len(),
            fetched,
            retained = pool.len(),
            "building learning path"
        );

        let criteria = SelectionCriteria {
            user_id: user_id.to_string(),
            current_difficulty: profile.level,
            topics: profile.topics,
            missing_concepts: profile.missing_concepts,
            platform,
            learning_style: LearningStyle::Progressive,
        };

        Ok(self.selector.select(&criteria, &pool, count, now).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommend::tables::ScoringTables;

    fn record(id: &str, status: HistoryStatus, difficulty: &str, topics: &[&str]) -> HistoryRecord {
        let mut r = HistoryRecord::new("u1", id, status);
        r.difficulty = Some(difficulty.to_string());
        r.topics = topics.iter().map(|s| s.to_string()).collect();
        r
    }

    #[test]
    fn test_profile_buckets_mean_ordinal() {
        let scale = DifficultyScale::generic();
        let records = vec![
            record("a", HistoryStatus::Solved, "Easy", &["Array"]),
            record("b", HistoryStatus::Solved, "Medium", &["String"]),
            record("c", HistoryStatus::Attempted, "Hard", &["DP"]),
        ];
        let profile = derive_profile(&records, &scale, "Easy", 5);
        assert_eq!(profile.bucket, Some(DifficultyBucket::Medium));
        assert_eq!(profile.level, "Medium");
        assert_eq!(profile.topics.len(), 3);
        assert_eq!(
            profile.missing_concepts.into_iter().collect::<Vec<_>>(),
            vec!["DP".to_string()]
        );
    }

    #[test]
    fn test_profile_without_history_uses_target() {
        let scale = DifficultyScale::generic();
        let profile = derive_profile(&[], &scale, "Hard", 5);
        assert_eq!(profile.level, "Hard");
        assert!(profile.bucket.is_none());
        assert!(profile.topics.is_empty());
    }

    #[test]
    fn test_missing_concepts_are_capped() {
        let scale = DifficultyScale::generic();
        let records = vec![
            record("a", HistoryStatus::Attempted, "Hard", &["A1", "A2", "A3"]),
            record("b", HistoryStatus::Unseen, "Hard", &["a1", "B1", "B2", "B3"]),
        ];
        let profile = derive_profile(&records, &scale, "Easy", 5);
        assert_eq!(profile.missing_concepts.len(), 5);
        assert!(!profile.missing_concepts.contains("a1"));
        assert!(!profile.missing_concepts.contains("B3"));
        assert_eq!(profile.level, "Hard");
    }

    #[test]
    fn test_contest_platform_level_uses_tier_labels() {
        let tables = ScoringTables::builtin();
        let scale = &tables.platform(Platform::Codeforces).difficulty_scale;
        let records = vec![
            record("a", HistoryStatus::Solved, "Div2-B", &[]),
            record("b", HistoryStatus::Solved, "1500", &[]),
        ];
        let profile = derive_profile(&records, scale, "Div3", 5);
        assert_eq!(profile.level, "Div2");
    }

    #[test]
    fn test_retain_sane_steps() {
        let tables = ScoringTables::builtin();
        let cf = tables.platform(Platform::Codeforces);
        let pool = vec![
            Candidate::new("near", "Near", "Div2-A", Platform::Codeforces),
            Candidate::new("far", "Far", "Div1-E", Platform::Codeforces),
            Candidate::new("rated", "Rated", "1700", Platform::Codeforces),
        ];
        let kept = retain_sane_steps(pool, "Div4", cf, 2);
        let ids: Vec<_> = kept.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "rated"]);
    }

    #[test]
    fn test_retain_sane_steps_ignores_label_case() {
        let tables = ScoringTables::builtin();
        let cf = tables.platform(Platform::Codeforces);
        let pool = vec![
            Candidate::new("upper", "Upper", "Div1-E", Platform::Codeforces),
            Candidate::new("lower", "Lower", "div1-e", Platform::Codeforces),
            Candidate::new("next", "Next", "div2-a", Platform::Codeforces),
        ];
        let kept = retain_sane_steps(pool, "Div3", cf, 1);
        let ids: Vec<_> = kept.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["next"]);
    }
}
