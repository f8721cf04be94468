pub mod composite;
pub mod criteria;
pub mod engine;
pub mod learning_path;
pub mod metrics;
pub mod progression;
pub mod selector;
pub mod store;
pub mod tables;
pub mod types;

pub use composite::{CompositeScore, CompositeScorer};
pub use engine::RecommendationEngine;
pub use metrics::{OnlineStats, ScoringMetrics, ScoringObserver};
pub use progression::{ProgressionGraph, TierNode};
pub use store::{CandidateRepository, HistoryStore, MemoryStore};
pub use tables::{ConceptTierMap, DifficultyScale, PlatformTables, ScoringTables};
