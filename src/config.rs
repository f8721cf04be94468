use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, TablesError};
use crate::recommend::tables::ScoringTables;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriterionWeights {
    pub difficulty: f64,
    pub concept: f64,
    pub history: f64,
    pub timing: f64,
    pub diversity: f64,
}

impl Default for CriterionWeights {
    fn default() -> Self {
        Self {
            difficulty: 0.25,
            concept: 0.30,
            history: 0.20,
            timing: 0.15,
            diversity: 0.10,
        }
    }
}

impl CriterionWeights {
    pub fn sum(&self) -> f64 {
        self.difficulty + self.concept + self.history + self.timing + self.diversity
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let named = [
            ("difficulty", self.difficulty),
            ("concept", self.concept),
            ("history", self.history),
            ("timing", self.timing),
            ("diversity", self.diversity),
        ];
        for (name, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight { name, value });
            }
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightSum(sum));
        }
        Ok(())
    }
}

/// Score a criterion must exceed before it contributes a reason.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotableThresholds {
    pub difficulty: f64,
    pub concept: f64,
    pub history: f64,
    pub timing: f64,
    pub diversity: f64,
}

impl Default for NotableThresholds {
    fn default() -> Self {
        Self {
            difficulty: 0.7,
            concept: 0.7,
            history: 0.6,
            timing: 0.6,
            diversity: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionConfig {
    pub default_limit: usize,
    pub max_concurrency: usize,
    pub candidate_pool_limit: usize,
    pub missing_concept_sample: usize,
    pub max_progression_steps: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            default_limit: 6,
            max_concurrency: 16,
            candidate_pool_limit: 50,
            missing_concept_sample: 5,
            max_progression_steps: 3,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommenderConfig {
    pub weights: CriterionWeights,
    pub thresholds: NotableThresholds,
    pub selection: SelectionConfig,
    pub tables_path: Option<PathBuf>,
}

impl RecommenderConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(v) = env_parse("RECOMMENDER_WEIGHT_DIFFICULTY") {
            config.weights.difficulty = v;
        }
        if let Some(v) = env_parse("RECOMMENDER_WEIGHT_CONCEPT") {
            config.weights.concept = v;
        }
        if let Some(v) = env_parse("RECOMMENDER_WEIGHT_HISTORY") {
            config.weights.history = v;
        }
        if let Some(v) = env_parse("RECOMMENDER_WEIGHT_TIMING") {
            config.weights.timing = v;
        }
        if let Some(v) = env_parse("RECOMMENDER_WEIGHT_DIVERSITY") {
            config.weights.diversity = v;
        }
        if let Some(v) = env_parse("RECOMMENDER_DEFAULT_LIMIT") {
            config.selection.default_limit = v;
        }
        if let Some(v) = env_parse("RECOMMENDER_MAX_CONCURRENCY") {
            config.selection.max_concurrency = v;
        }
        if let Some(v) = env_parse("RECOMMENDER_POOL_LIMIT") {
            config.selection.candidate_pool_limit = v;
        }
        if let Some(v) = env_parse("RECOMMENDER_MISSING_CONCEPT_SAMPLE") {
            config.selection.missing_concept_sample = v;
        }
        if let Some(v) = env_parse("RECOMMENDER_MAX_PROGRESSION_STEPS") {
            config.selection.max_progression_steps = v;
        }
        if let Ok(path) = std::env::var("RECOMMENDER_TABLES_PATH") {
            if !path.trim().is_empty() {
                config.tables_path = Some(PathBuf::from(path));
            }
        }

        config
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.weights.validate()?;
        if self.selection.max_concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        Ok(())
    }

    pub fn load_tables(&self) -> Result<ScoringTables, TablesError> {
        match &self.tables_path {
            Some(path) => ScoringTables::from_path(path),
            None => Ok(ScoringTables::builtin()),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
