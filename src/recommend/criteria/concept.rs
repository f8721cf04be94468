use crate::recommend::criteria::matches_any;
use crate::recommend::tables::{split_label, PlatformTables};
use crate::recommend::types::{Candidate, SelectionCriteria};

const NO_TAGS_SCORE: f64 = 0.5;
const MISSING_MAX: f64 = 0.4;
const TOPIC_MAX: f64 = 0.3;
const ALIGNMENT_STEP: f64 = 0.2;

const MISSING_WEIGHT: f64 = 1.0;
const TOPIC_WEIGHT: f64 = 0.6;
const ALIGNMENT_WEIGHT: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ConceptScore {
    pub score: f64,
    pub missing_covered: usize,
    pub topics_covered: usize,
}

pub fn score(
    candidate: &Candidate,
    criteria: &SelectionCriteria,
    tables: &PlatformTables,
) -> ConceptScore {
    if candidate.tags.is_empty() {
        return ConceptScore {
            score: NO_TAGS_SCORE,
            ..Default::default()
        };
    }

    let covered_missing: Vec<&String> = criteria
        .missing_concepts
        .iter()
        .filter(|concept| matches_any(concept, &candidate.tags))
        .collect();
    let topics_covered = criteria
        .topics
        .iter()
        .filter(|topic| matches_any(topic, &candidate.tags))
        .count();

    let missing = fraction(covered_missing.len(), criteria.missing_concepts.len()) * MISSING_MAX;
    let topical = fraction(topics_covered, criteria.topics.len()) * TOPIC_MAX;

    let (tier, group) = split_label(&candidate.difficulty);
    let aligned = covered_missing
        .iter()
        .filter(|concept| tables.concepts.aligns(concept, tier, group))
        .count();
    let alignment = (aligned as f64 * ALIGNMENT_STEP).min(1.0);

    let total = missing * MISSING_WEIGHT + topical * TOPIC_WEIGHT + alignment * ALIGNMENT_WEIGHT;

    ConceptScore {
        score: total.clamp(0.0, 1.0),
        missing_covered: covered_missing.len(),
        topics_covered,
    }
}

fn fraction(hits: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}
