use crate::recommend::progression::ProgressionGraph;
use crate::recommend::tables::{split_label, DifficultyScale, PlatformTables};
use crate::recommend::types::LearningStyle;

const NEXT_TIER_SCORE: f64 = 0.95;
const NEXT_TIER_CHALLENGING_SCORE: f64 = 1.0;
const REINFORCEMENT_SCORE: f64 = 0.7;

pub fn score(
    candidate_label: &str,
    learner_label: &str,
    style: LearningStyle,
    tables: &PlatformTables,
) -> f64 {
    if let Some(graph) = &tables.progression {
        let easier = ordinal_delta(candidate_label, learner_label, &tables.difficulty_scale) < 0;
        if let Some(value) = graph_score(graph, candidate_label, learner_label, style, easier) {
            return value;
        }
    }
    ordinal_score(
        candidate_label,
        learner_label,
        style,
        &tables.difficulty_scale,
    )
}

/// Tier-aware scoring. `None` means the graph has nothing to say about this
/// pair and the ordinal formula should decide. `candidate_easier` lets an
/// edge back into the learner's tier count as reinforcement even when the
/// graph also links the two tiers the other way.
pub fn graph_score(
    graph: &ProgressionGraph,
    candidate_label: &str,
    learner_label: &str,
    style: LearningStyle,
    candidate_easier: bool,
) -> Option<f64> {
    let (candidate_tier, _) = split_label(candidate_label);
    let (learner_tier, _) = split_label(learner_label);
    if !graph.contains(learner_tier) {
        return None;
    }

    if candidate_tier.eq_ignore_ascii_case(learner_tier) {
        return Some(match style {
            LearningStyle::Progressive => 0.8,
            LearningStyle::Mixed => 0.7,
            LearningStyle::Challenging => 0.6,
        });
    }
    if candidate_easier && graph.is_next(candidate_tier, learner_tier) {
        return Some(REINFORCEMENT_SCORE);
    }
    if graph.is_next(learner_tier, candidate_tier) {
        return Some(match style {
            LearningStyle::Challenging => NEXT_TIER_CHALLENGING_SCORE,
            _ => NEXT_TIER_SCORE,
        });
    }
    if graph.is_next(candidate_tier, learner_tier) {
        return Some(REINFORCEMENT_SCORE);
    }
    None
}

pub fn ordinal_score(
    candidate_label: &str,
    learner_label: &str,
    style: LearningStyle,
    scale: &DifficultyScale,
) -> f64 {
    ordinal_delta_score(ordinal_delta(candidate_label, learner_label, scale), style)
}

fn ordinal_delta(candidate_label: &str, learner_label: &str, scale: &DifficultyScale) -> i32 {
    scale
        .ordinal(candidate_label)
        .saturating_sub(scale.ordinal(learner_label))
}

pub fn ordinal_delta_score(delta: i32, style: LearningStyle) -> f64 {
    let distance = delta.unsigned_abs() as f64;
    match style {
        LearningStyle::Progressive => match delta {
            0 => 1.0,
            1 => 0.8,
            -1 => 0.6,
            _ => (1.0 - 0.2 * distance).max(0.0),
        },
        LearningStyle::Challenging => {
            if delta > 0 {
                (0.9 + 0.05 * distance).min(1.0)
            } else if delta == 0 {
                0.7
            } else {
                (0.5 - 0.1 * distance).max(0.0)
            }
        }
        LearningStyle::Mixed => match delta.unsigned_abs() {
            0 => 0.8,
            1 => 0.9,
            _ => 0.5,
        },
    }
}
