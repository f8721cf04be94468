use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store timed out after {0} ms")]
    Timeout(u64),
    #[error("store backend error: {0}")]
    Backend(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("weight `{name}` must be a finite non-negative number, got {value}")]
    InvalidWeight { name: &'static str, value: f64 },
    #[error("criterion weights must sum to 1.0, got {0}")]
    WeightSum(f64),
    #[error("max_concurrency must be at least 1")]
    ZeroConcurrency,
}

#[derive(Debug, thiserror::Error)]
pub enum TablesError {
    #[error("failed to read scoring tables from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid scoring tables: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum RecommendError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Tables(#[from] TablesError),
    #[error("candidate pool unavailable: {0}")]
    CandidatePool(#[source] StoreError),
}
