use std::collections::{HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_STEPS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierNode {
    #[serde(default)]
    pub next_tiers: Vec<String>,
    /// Relative effort of the tier. Carried for hosts that display or order
    /// tiers; scoring only follows `next_tiers`.
    #[serde(default = "default_difficulty_weight")]
    pub difficulty_weight: f64,
}

fn default_difficulty_weight() -> f64 {
    1.0
}

impl TierNode {
    pub fn new<I, S>(next_tiers: I, difficulty_weight: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            next_tiers: next_tiers.into_iter().map(Into::into).collect(),
            difficulty_weight,
        }
    }
}

/// Directed graph of contest tiers. Cycles are allowed; every traversal is
/// bounded by a step count and a visited set. Tier names match
/// case-insensitively, like every other label in the tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressionGraph {
    nodes: HashMap<String, TierNode>,
}

impl ProgressionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tier(mut self, tier: impl Into<String>, node: TierNode) -> Self {
        self.nodes.insert(tier.into(), node);
        self
    }

    pub fn contains(&self, tier: &str) -> bool {
        self.entry(tier).is_some()
    }

    pub fn node(&self, tier: &str) -> Option<&TierNode> {
        self.entry(tier).map(|(_, node)| node)
    }

    pub fn next_tiers(&self, tier: &str) -> &[String] {
        self.node(tier)
            .map(|n| n.next_tiers.as_slice())
            .unwrap_or(&[])
    }

    pub fn difficulty_weight(&self, tier: &str) -> Option<f64> {
        self.node(tier).map(|n| n.difficulty_weight)
    }

    pub fn is_next(&self, from: &str, to: &str) -> bool {
        self.next_tiers(from)
            .iter()
            .any(|t| t.eq_ignore_ascii_case(to))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn reachable(&self, from: &str, to: &str, max_steps: usize) -> bool {
        if from.eq_ignore_ascii_case(to) {
            return true;
        }
        let Some((start, _)) = self.entry(from) else {
            return false;
        };

        let mut visited: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<(&str, usize)> = VecDeque::new();
        visited.insert(start.to_ascii_lowercase());
        queue.push_back((start, 0));

        while let Some((tier, depth)) = queue.pop_front() {
            if depth >= max_steps {
                continue;
            }
            for next in self.next_tiers(tier) {
                if next.eq_ignore_ascii_case(to) {
                    return true;
                }
                if visited.insert(next.to_ascii_lowercase()) {
                    queue.push_back((next.as_str(), depth + 1));
                }
            }
        }
        false
    }

    /// A step between two tiers is sane when one reaches the other within the
    /// bound. Tiers the graph does not know about are given the benefit of the doubt.
    pub fn is_sane_step(&self, from: &str, to: &str, max_steps: usize) -> bool {
        if !self.contains(from) || !self.contains(to) {
            return true;
        }
        self.reachable(from, to, max_steps) || self.reachable(to, from, max_steps)
    }

    fn entry(&self, tier: &str) -> Option<(&str, &TierNode)> {
        let tier = tier.trim();
        self.nodes
            .get_key_value(tier)
            .or_else(|| {
                self.nodes
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(tier))
            })
            .map(|(key, node)| (key.as_str(), node))
    }
}
