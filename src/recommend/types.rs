use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    LeetCode,
    Codeforces,
    AtCoder,
    #[serde(other)]
    Other,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LeetCode => "leetcode",
            Self::Codeforces => "codeforces",
            Self::AtCoder => "atcoder",
            Self::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "leetcode" => Self::LeetCode,
            "codeforces" => Self::Codeforces,
            "atcoder" => Self::AtCoder,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LearningStyle {
    #[default]
    Progressive,
    Mixed,
    Challenging,
}

impl LearningStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Progressive => "progressive",
            Self::Mixed => "mixed",
            Self::Challenging => "challenging",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "mixed" => Self::Mixed,
            "challenging" => Self::Challenging,
            _ => Self::Progressive,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: String,
    pub title: String,
    pub difficulty: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    pub platform: Platform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Candidate {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        difficulty: impl Into<String>,
        platform: Platform,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            difficulty: difficulty.into(),
            tags: BTreeSet::new(),
            platform,
            url: None,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionCriteria {
    pub user_id: String,
    pub current_difficulty: String,
    #[serde(default)]
    pub topics: BTreeSet<String>,
    #[serde(default)]
    pub missing_concepts: BTreeSet<String>,
    pub platform: Platform,
    #[serde(default)]
    pub learning_style: LearningStyle,
}

impl SelectionCriteria {
    pub fn new(
        user_id: impl Into<String>,
        current_difficulty: impl Into<String>,
        platform: Platform,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            current_difficulty: current_difficulty.into(),
            topics: BTreeSet::new(),
            missing_concepts: BTreeSet::new(),
            platform,
            learning_style: LearningStyle::default(),
        }
    }

    pub fn with_topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topics.extend(topics.into_iter().map(Into::into));
        self
    }

    pub fn with_missing_concepts<I, S>(mut self, concepts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.missing_concepts
            .extend(concepts.into_iter().map(Into::into));
        self
    }

    pub fn with_style(mut self, style: LearningStyle) -> Self {
        self.learning_style = style;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HistoryStatus {
    #[default]
    Unseen,
    Attempted,
    Solved,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub user_id: String,
    pub candidate_id: String,
    pub status: HistoryStatus,
    #[serde(default)]
    pub last_attempt_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub next_review_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub topics: BTreeSet<String>,
}

impl HistoryRecord {
    pub fn new(
        user_id: impl Into<String>,
        candidate_id: impl Into<String>,
        status: HistoryStatus,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            candidate_id: candidate_id.into(),
            status,
            last_attempt_date: None,
            next_review_date: None,
            difficulty: None,
            topics: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CriterionScores {
    pub difficulty: f64,
    pub concept: f64,
    pub history: f64,
    pub timing: f64,
    pub diversity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionScore {
    pub question_id: String,
    pub title: String,
    pub difficulty: String,
    pub platform: Platform,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub score: f64,
    pub reasons: Vec<String>,
    pub breakdown: CriterionScores,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_tags_collapse_duplicates() {
        let candidate = Candidate::new("q1", "Two Sum", "Easy", Platform::LeetCode)
            .with_tags(["Array", "Hash Table", "Array"]);
        assert_eq!(candidate.tags.len(), 2);
    }

    #[test]
    fn test_unknown_status_deserializes() {
        let record: HistoryRecord = serde_json::from_str(
            r#"{"userId":"u1","candidateId":"q1","status":"skipped"}"#,
        )
        .expect("record json");
        assert_eq!(record.status, HistoryStatus::Unknown);
        assert!(record.last_attempt_date.is_none());
    }

    #[test]
    fn test_platform_and_style_parse() {
        assert_eq!(Platform::parse("AtCoder"), Platform::AtCoder);
        assert_eq!(Platform::parse("hackerrank"), Platform::Other);
        assert_eq!(LearningStyle::parse("CHALLENGING"), LearningStyle::Challenging);
        assert_eq!(LearningStyle::parse(""), LearningStyle::Progressive);
    }

    #[test]
    fn test_question_score_serializes_camel_case() {
        let score = QuestionScore {
            question_id: "q1".to_string(),
            title: "Two Sum".to_string(),
            difficulty: "Easy".to_string(),
            platform: Platform::LeetCode,
            url: None,
            score: 0.5,
            reasons: vec!["Balanced pick for steady practice".to_string()],
            breakdown: CriterionScores::default(),
        };
        let json = serde_json::to_value(&score).expect("score json");
        assert_eq!(json["questionId"], "q1");
        assert_eq!(json["platform"], "leetcode");
        assert!(json.get("url").is_none());
    }
}
