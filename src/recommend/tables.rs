use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TablesError;
use crate::recommend::progression::{ProgressionGraph, TierNode};
use crate::recommend::types::Platform;

const MIDDLE_ORDINAL: i32 = 2;

/// Splits a contest label such as `Div2-C` into its tier and problem group.
pub fn split_label(label: &str) -> (&str, Option<&str>) {
    let label = label.trim();
    match label.split_once('-') {
        Some((tier, group)) if !tier.is_empty() && !group.trim().is_empty() => {
            (tier.trim(), Some(group.trim()))
        }
        _ => (label, None),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingBand {
    /// Exclusive upper bound; `None` catches everything above the previous band.
    pub up_to: Option<f64>,
    pub ordinal: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyBucket {
    Easy,
    Medium,
    Hard,
}

impl DifficultyBucket {
    pub fn from_mean_ordinal(mean: f64) -> Self {
        if mean < 1.5 {
            Self::Easy
        } else if mean < 2.5 {
            Self::Medium
        } else {
            Self::Hard
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketLabels {
    pub easy: String,
    pub medium: String,
    pub hard: String,
}

impl Default for BucketLabels {
    fn default() -> Self {
        Self::new("Easy", "Medium", "Hard")
    }
}

impl BucketLabels {
    pub fn new(easy: &str, medium: &str, hard: &str) -> Self {
        Self {
            easy: easy.to_string(),
            medium: medium.to_string(),
            hard: hard.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyScale {
    #[serde(default)]
    pub ordinals: HashMap<String, i32>,
    #[serde(default)]
    pub rating_bands: Vec<RatingBand>,
    #[serde(default = "default_ordinal")]
    pub default_ordinal: i32,
    /// How each aggregate bucket is spelled on this platform.
    #[serde(default)]
    pub bucket_labels: BucketLabels,
}

fn default_ordinal() -> i32 {
    MIDDLE_ORDINAL
}

impl Default for DifficultyScale {
    fn default() -> Self {
        Self::generic()
    }
}

impl DifficultyScale {
    pub fn generic() -> Self {
        Self {
            ordinals: ordinals(&[("easy", 1), ("medium", 2), ("hard", 3)]),
            rating_bands: Vec::new(),
            default_ordinal: MIDDLE_ORDINAL,
            bucket_labels: BucketLabels::default(),
        }
    }

    pub fn bucket_label(&self, bucket: DifficultyBucket) -> &str {
        match bucket {
            DifficultyBucket::Easy => &self.bucket_labels.easy,
            DifficultyBucket::Medium => &self.bucket_labels.medium,
            DifficultyBucket::Hard => &self.bucket_labels.hard,
        }
    }

    pub fn ordinal(&self, label: &str) -> i32 {
        let label = label.trim();
        if let Some(value) = self.lookup(label) {
            return value;
        }
        let (tier, _) = split_label(label);
        if let Some(value) = self.lookup(tier) {
            return value;
        }
        if let Ok(rating) = tier.parse::<f64>() {
            if let Some(value) = self.rating_ordinal(rating) {
                return value;
            }
        }
        self.default_ordinal
    }

    fn lookup(&self, key: &str) -> Option<i32> {
        self.ordinals
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| *v)
    }

    fn rating_ordinal(&self, rating: f64) -> Option<i32> {
        if !rating.is_finite() {
            return None;
        }
        self.rating_bands
            .iter()
            .find(|band| band.up_to.map_or(true, |limit| rating < limit))
            .map(|band| band.ordinal)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptTiers {
    #[serde(default)]
    pub representative_tiers: Vec<String>,
    #[serde(default)]
    pub representative_groups: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConceptTierMap {
    concepts: HashMap<String, ConceptTiers>,
}

impl ConceptTierMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_concept(
        mut self,
        concept: impl Into<String>,
        tiers: &[&str],
        groups: &[&str],
    ) -> Self {
        self.concepts.insert(
            concept.into(),
            ConceptTiers {
                representative_tiers: tiers.iter().map(|s| s.to_string()).collect(),
                representative_groups: groups.iter().map(|s| s.to_string()).collect(),
            },
        );
        self
    }

    pub fn get(&self, concept: &str) -> Option<&ConceptTiers> {
        let concept = concept.trim();
        self.concepts
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(concept))
            .map(|(_, v)| v)
    }

    /// True when the concept is known to typically appear at this tier or group.
    pub fn aligns(&self, concept: &str, tier: &str, group: Option<&str>) -> bool {
        let Some(entry) = self.get(concept) else {
            return false;
        };
        let tier_hit = entry
            .representative_tiers
            .iter()
            .any(|t| t.eq_ignore_ascii_case(tier));
        let group_hit = group.is_some_and(|g| {
            entry
                .representative_groups
                .iter()
                .any(|rg| rg.eq_ignore_ascii_case(g))
        });
        tier_hit || group_hit
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformTables {
    #[serde(default)]
    pub difficulty_scale: DifficultyScale,
    #[serde(default)]
    pub progression: Option<ProgressionGraph>,
    #[serde(default)]
    pub concepts: ConceptTierMap,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringTables {
    #[serde(default)]
    pub platforms: HashMap<Platform, PlatformTables>,
    #[serde(default)]
    pub fallback: PlatformTables,
}

impl Default for ScoringTables {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ScoringTables {
    pub fn builtin() -> Self {
        let mut platforms = HashMap::new();
        platforms.insert(Platform::LeetCode, leetcode_tables());
        platforms.insert(Platform::Codeforces, codeforces_tables());
        platforms.insert(Platform::AtCoder, atcoder_tables());
        Self {
            platforms,
            fallback: PlatformTables::default(),
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self, TablesError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, TablesError> {
        let raw = std::fs::read_to_string(path).map_err(|source| TablesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn platform(&self, platform: Platform) -> &PlatformTables {
        self.platforms.get(&platform).unwrap_or(&self.fallback)
    }
}

fn ordinals(entries: &[(&str, i32)]) -> HashMap<String, i32> {
    entries
        .iter()
        .map(|(label, ordinal)| (label.to_string(), *ordinal))
        .collect()
}

fn leetcode_tables() -> PlatformTables {
    PlatformTables {
        difficulty_scale: DifficultyScale::generic(),
        progression: None,
        concepts: ConceptTierMap::new(),
    }
}

fn codeforces_tables() -> PlatformTables {
    let progression = ProgressionGraph::new()
        .with_tier("Div4", TierNode::new(["Div3"], 0.6))
        .with_tier("Div3", TierNode::new(["Div2"], 0.8))
        .with_tier("Div2", TierNode::new(["Div1"], 1.0))
        .with_tier("Div1", TierNode::new(Vec::<String>::new(), 1.4));

    let concepts = ConceptTierMap::new()
        .with_concept("dp", &["Div2", "Div1"], &["C", "D", "E"])
        .with_concept("graphs", &["Div2", "Div1"], &["D", "E"])
        .with_concept("greedy", &["Div4", "Div3"], &["A", "B", "C"])
        .with_concept("math", &["Div3", "Div2"], &["B", "C"])
        .with_concept("data structures", &["Div2", "Div1"], &["D", "E", "F"]);

    PlatformTables {
        difficulty_scale: DifficultyScale {
            ordinals: ordinals(&[("div4", 1), ("div3", 1), ("div2", 2), ("div1", 3)]),
            rating_bands: vec![
                RatingBand {
                    up_to: Some(1200.0),
                    ordinal: 1,
                },
                RatingBand {
                    up_to: Some(1900.0),
                    ordinal: 2,
                },
                RatingBand {
                    up_to: None,
                    ordinal: 3,
                },
            ],
            default_ordinal: MIDDLE_ORDINAL,
            bucket_labels: BucketLabels::new("Div3", "Div2", "Div1"),
        },
        progression: Some(progression),
        concepts,
    }
}

fn atcoder_tables() -> PlatformTables {
    let progression = ProgressionGraph::new()
        .with_tier("ABC", TierNode::new(["ARC"], 0.7))
        .with_tier("ARC", TierNode::new(["AGC"], 1.0))
        .with_tier("AGC", TierNode::new(Vec::<String>::new(), 1.5));

    let concepts = ConceptTierMap::new()
        .with_concept("dp", &["ABC"], &["D", "E", "F"])
        .with_concept("graph", &["ABC", "ARC"], &["E", "F"])
        .with_concept("constructive", &["ARC", "AGC"], &["B", "C"])
        .with_concept("number theory", &["ARC"], &["C", "D"]);

    PlatformTables {
        difficulty_scale: DifficultyScale {
            ordinals: ordinals(&[("abc", 1), ("arc", 2), ("agc", 3)]),
            rating_bands: vec![
                RatingBand {
                    up_to: Some(800.0),
                    ordinal: 1,
                },
                RatingBand {
                    up_to: Some(2000.0),
                    ordinal: 2,
                },
                RatingBand {
                    up_to: None,
                    ordinal: 3,
                },
            ],
            default_ordinal: MIDDLE_ORDINAL,
            bucket_labels: BucketLabels::new("ABC", "ARC", "AGC"),
        },
        progression: Some(progression),
        concepts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_label() {
        assert_eq!(split_label("Div2-C"), ("Div2", Some("C")));
        assert_eq!(split_label(" ABC "), ("ABC", None));
        assert_eq!(split_label("ABC-"), ("ABC-", None));
    }

    #[test]
    fn test_generic_ordinals() {
        let scale = DifficultyScale::generic();
        assert_eq!(scale.ordinal("Easy"), 1);
        assert_eq!(scale.ordinal("MEDIUM"), 2);
        assert_eq!(scale.ordinal("hard"), 3);
        assert_eq!(scale.ordinal("legendary"), MIDDLE_ORDINAL);
    }

    #[test]
    fn test_codeforces_ratings_and_tiers() {
        let tables = ScoringTables::builtin();
        let scale = &tables.platform(Platform::Codeforces).difficulty_scale;
        assert_eq!(scale.ordinal("800"), 1);
        assert_eq!(scale.ordinal("1600"), 2);
        assert_eq!(scale.ordinal("2400"), 3);
        assert_eq!(scale.ordinal("Div2-D"), 2);
        assert_eq!(scale.ordinal("Div1"), 3);
    }

    #[test]
    fn test_bucket_thresholds_and_labels() {
        assert_eq!(DifficultyBucket::from_mean_ordinal(1.0), DifficultyBucket::Easy);
        assert_eq!(DifficultyBucket::from_mean_ordinal(1.5), DifficultyBucket::Medium);
        assert_eq!(DifficultyBucket::from_mean_ordinal(2.49), DifficultyBucket::Medium);
        assert_eq!(DifficultyBucket::from_mean_ordinal(2.5), DifficultyBucket::Hard);

        let tables = ScoringTables::builtin();
        let cf = &tables.platform(Platform::Codeforces).difficulty_scale;
        assert_eq!(cf.bucket_label(DifficultyBucket::Medium), "Div2");
        let generic = DifficultyScale::generic();
        assert_eq!(generic.bucket_label(DifficultyBucket::Hard), "Hard");
    }

    #[test]
    fn test_top_tiers_are_terminal() {
        let tables = ScoringTables::builtin();
        for (platform, top) in [(Platform::Codeforces, "Div1"), (Platform::AtCoder, "AGC")] {
            let graph = tables.platform(platform).progression.as_ref().expect("graph");
            assert!(graph.next_tiers(top).is_empty());
        }
    }

    #[test]
    fn test_unknown_platform_uses_fallback() {
        let tables = ScoringTables::builtin();
        let fallback = tables.platform(Platform::Other);
        assert!(fallback.progression.is_none());
        assert_eq!(fallback.difficulty_scale.ordinal("Hard"), 3);
    }

    #[test]
    fn test_concept_alignment() {
        let tables = ScoringTables::builtin();
        let concepts = &tables.platform(Platform::Codeforces).concepts;
        assert!(concepts.aligns("DP", "Div2", None));
        assert!(concepts.aligns("dp", "Div3", Some("D")));
        assert!(!concepts.aligns("dp", "Div4", Some("A")));
        assert!(!concepts.aligns("strings", "Div2", Some("C")));
    }

    #[test]
    fn test_tables_from_json() {
        let raw = r#"{
            "platforms": {
                "leetcode": {
                    "difficultyScale": { "ordinals": { "Easy": 1, "Medium": 3, "Hard": 5 }, "defaultOrdinal": 3 }
                }
            }
        }"#;
        let tables = ScoringTables::from_json_str(raw).expect("tables json");
        let scale = &tables.platform(Platform::LeetCode).difficulty_scale;
        assert_eq!(scale.ordinal("hard"), 5);
        assert_eq!(scale.ordinal("unknown"), 3);
        assert!(tables.platform(Platform::Codeforces).progression.is_none());
    }

    #[test]
    fn test_tables_from_missing_path() {
        let err = ScoringTables::from_path(Path::new("/definitely/not/here.json"))
            .expect_err("missing file");
        assert!(matches!(err, TablesError::Io { .. }));
    }
}
