use chrono::{DateTime, Utc};

use crate::recommend::criteria::history::days_between;
use crate::recommend::types::{HistoryRecord, HistoryStatus};

const NOT_SCHEDULED_SCORE: f64 = 0.5;
const FLOOR: f64 = 0.2;
const DECAY_PER_DAY: f64 = 0.05;

/// Review urgency for previously solved problems. Anything without a review
/// date is neutral.
pub fn score(record: Option<&HistoryRecord>, now: DateTime<Utc>) -> f64 {
    let Some(record) = record else {
        return NOT_SCHEDULED_SCORE;
    };
    if record.status != HistoryStatus::Solved {
        return NOT_SCHEDULED_SCORE;
    }
    match record.next_review_date {
        Some(next_review) => urgency(days_until_review(next_review, now)),
        None => NOT_SCHEDULED_SCORE,
    }
}

pub fn days_until_review(next_review: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    days_between(now, next_review).ceil() as i64
}

pub fn urgency(days_until: i64) -> f64 {
    if days_until <= 0 {
        1.0
    } else if days_until <= 3 {
        0.8
    } else if days_until <= 7 {
        0.6
    } else {
        (1.0 - DECAY_PER_DAY * days_until as f64).max(FLOOR)
    }
}
