pub mod concept;
pub mod difficulty;
pub mod diversity;
pub mod history;
pub mod spacing;

use serde::Serialize;

/// Substituted for a criterion whose data source failed.
pub const DEGRADED_SCORE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Criterion {
    Difficulty,
    Concept,
    History,
    Timing,
    Diversity,
}

impl Criterion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Difficulty => "difficulty",
            Self::Concept => "concept",
            Self::History => "history",
            Self::Timing => "timing",
            Self::Diversity => "diversity",
        }
    }
}

/// Case-insensitive substring match in either direction, so `"dp"` matches
/// `"Tree DP"` and `"Graphs"` matches `"graph"`.
pub fn labels_overlap(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.contains(&b) || b.contains(&a)
}

pub(crate) fn matches_any<'a, I>(label: &str, others: I) -> bool
where
    I: IntoIterator<Item = &'a String>,
{
    others.into_iter().any(|other| labels_overlap(label, other))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_overlap() {
        assert!(labels_overlap("DP", "Tree DP"));
        assert!(labels_overlap("graph", "Graphs"));
        assert!(!labels_overlap("Array", "Graph"));
        assert!(!labels_overlap("", "Graph"));
    }
}
