use std::collections::BTreeSet;

use crate::recommend::criteria::matches_any;

const NEW_TAGS_FOR_FULL_SCORE: f64 = 3.0;

pub fn score(tags: &BTreeSet<String>, topics: &BTreeSet<String>) -> f64 {
    let new_tags = tags.iter().filter(|tag| !matches_any(tag, topics)).count();
    (new_tags as f64 / NEW_TAGS_FOR_FULL_SCORE).min(1.0)
}
