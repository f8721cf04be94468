pub mod config;
pub mod error;
pub mod logging;
pub mod recommend;

pub use config::RecommenderConfig;
pub use error::{ConfigError, RecommendError, StoreError, TablesError};
pub use recommend::engine::RecommendationEngine;
pub use recommend::types::*;
