use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::recommend::store::HistoryStore;
use crate::recommend::types::{HistoryRecord, HistoryStatus};

const NEVER_SEEN_SCORE: f64 = 0.8;
const ATTEMPTED_SCORE: f64 = 0.85;
const UNKNOWN_STATUS_SCORE: f64 = 0.6;

const SECONDS_PER_DAY: f64 = 86_400.0;

pub type HistoryLookup = Result<Option<HistoryRecord>, StoreError>;

pub async fn lookup<H: HistoryStore>(
    store: &H,
    user_id: &str,
    candidate_id: &str,
) -> HistoryLookup {
    store.get_history(user_id, candidate_id).await
}

pub fn score(record: Option<&HistoryRecord>, now: DateTime<Utc>) -> f64 {
    let Some(record) = record else {
        return NEVER_SEEN_SCORE;
    };

    match record.status {
        HistoryStatus::Solved => match record.last_attempt_date {
            Some(last) => solved_recency_score(days_between(last, now)),
            None => solved_recency_score(f64::INFINITY),
        },
        HistoryStatus::Attempted => ATTEMPTED_SCORE,
        HistoryStatus::Unseen | HistoryStatus::Unknown => UNKNOWN_STATUS_SCORE,
    }
}

fn solved_recency_score(days_since: f64) -> f64 {
    if days_since > 7.0 {
        0.9
    } else if days_since > 3.0 {
        0.7
    } else {
        0.4
    }
}

pub(crate) fn days_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    (later - earlier).num_seconds() as f64 / SECONDS_PER_DAY
}
