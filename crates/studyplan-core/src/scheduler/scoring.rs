//! Urgency scoring for assignments.
//!
//! Score = priority weight + deadline term. Deadline term by hours until
//! due: overdue +500, under 24h +200, under 72h +50.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::assignment::Assignment;

const OVERDUE_BONUS: i64 = 500;
const DUE_WITHIN_DAY_BONUS: i64 = 200;
const DUE_WITHIN_THREE_DAYS_BONUS: i64 = 50;

/// Urgency of `item` as seen at `now`. Higher is more urgent.
pub fn urgency_score(item: &Assignment, now: DateTime<Utc>) -> i64 {
    let hours_until_due = (item.due_date - now).num_milliseconds() as f64 / 3_600_000.0;

    let deadline = if hours_until_due < 0.0 {
        OVERDUE_BONUS
    } else if hours_until_due < 24.0 {
        DUE_WITHIN_DAY_BONUS
    } else if hours_until_due < 72.0 {
        DUE_WITHIN_THREE_DAYS_BONUS
    } else {
        0
    };

    item.priority.weight() + deadline
}

/// Total order used to rank assignments: score descending, then earlier
/// due date, then id ascending.
pub fn compare_urgency(a: &Assignment, b: &Assignment, now: DateTime<Utc>) -> Ordering {
    urgency_score(b, now)
        .cmp(&urgency_score(a, now))
        .then_with(|| a.due_date.cmp(&b.due_date))
        .then_with(|| a.id.cmp(&b.id))
}

/// Sort assignments most urgent first.
pub fn urgency_order(items: &mut [Assignment], now: DateTime<Utc>) {
    items.sort_by(|a, b| compare_urgency(a, b, now));
}
