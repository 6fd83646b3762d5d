//! Workload counters and the multi-day outlook shown next to the plan.

use chrono::{DateTime, Days, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::assignment::{Assignment, Priority};
use crate::calendar::BusyInterval;

/// Days covered by the outlook, today included.
pub const DEFAULT_PREVIEW_DAYS: u32 = 5;
/// How far ahead an upcoming deadline makes an assignment a day's focus.
pub const PREP_WINDOW_DAYS: i64 = 3;

/// Open work at a glance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadStats {
    /// Assignments not yet done.
    pub pending: usize,
    /// Pending assignments with urgent priority.
    pub urgent: usize,
}

impl WorkloadStats {
    pub fn from_assignments(items: &[Assignment]) -> Self {
        let pending = items.iter().filter(|a| a.is_pending());
        Self {
            pending: pending.clone().count(),
            urgent: pending.filter(|a| a.priority == Priority::Urgent).count(),
        }
    }
}

/// One day of the outlook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPreview {
    pub date: NaiveDate,
    /// "Today" for the first day, otherwise the short weekday ("Mon").
    pub label: String,
    /// Short date, e.g. "Oct 16".
    pub date_label: String,
    /// Calendar events starting that day.
    pub events_count: usize,
    /// Pending assignments due that day.
    pub due_count: usize,
    /// First assignment due that day, else the first one due within
    /// [`PREP_WINDOW_DAYS`] after the day's instant.
    pub focus: Option<Assignment>,
}

/// Outlook for `days` consecutive local days starting with the day of `now`.
///
/// Day `i` is measured from `now` moved `i` calendar days ahead at the same
/// wall-clock time. Items keep their input order when picking a focus;
/// done items are ignored.
pub fn weekly_preview<Tz: TimeZone>(
    items: &[Assignment],
    busy: &[BusyInterval],
    now: &DateTime<Tz>,
    days: u32,
) -> Vec<DayPreview> {
    let tz = now.timezone();
    let local_date = |instant: &DateTime<Utc>| instant.with_timezone(&tz).date_naive();
    let pending: Vec<&Assignment> = items.iter().filter(|a| a.is_pending()).collect();

    (0..days)
        .filter_map(|i| {
            let day = now.clone().checked_add_days(Days::new(u64::from(i)))?;
            let date = day.date_naive();
            let day_utc = day.with_timezone(&Utc);

            let events_count = busy.iter().filter(|e| local_date(&e.start) == date).count();
            let due: Vec<&Assignment> = pending
                .iter()
                .copied()
                .filter(|a| local_date(&a.due_date) == date)
                .collect();
            let prep = pending.iter().copied().find(|a| {
                let ahead = a.due_date - day_utc;
                ahead > Duration::zero() && ahead <= Duration::days(PREP_WINDOW_DAYS)
            });

            Some(DayPreview {
                date,
                label: if i == 0 {
                    "Today".to_string()
                } else {
                    date.format("%a").to_string()
                },
                date_label: date.format("%b %-d").to_string(),
                events_count,
                due_count: due.len(),
                focus: due.first().copied().or(prep).cloned(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::AssignmentStatus;
    use chrono::FixedOffset;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 8, 0, 0).unwrap()
    }

    fn due(id: &str, due_date: DateTime<Utc>, priority: Priority) -> Assignment {
        Assignment::new(id, format!("Task {id}"), due_date, priority, 30)
    }

    #[test]
    fn workload_counts_pending_and_urgent() {
        let items = vec![
            due("a", now(), Priority::Urgent),
            due("b", now(), Priority::Low),
            due("c", now(), Priority::Urgent).with_status(AssignmentStatus::Done),
            due("d", now(), Priority::High).with_status(AssignmentStatus::InProgress),
        ];
        let stats = WorkloadStats::from_assignments(&items);
        assert_eq!(stats, WorkloadStats { pending: 3, urgent: 1 });
    }

    #[test]
    fn preview_labels_days() {
        let preview = weekly_preview(&[], &[], &now(), DEFAULT_PREVIEW_DAYS);

        assert_eq!(preview.len(), 5);
        let labels: Vec<_> = preview.iter().map(|d| d.label.as_str()).collect();
        // 2026-10-16 is a Friday.
        assert_eq!(labels, ["Today", "Sat", "Sun", "Mon", "Tue"]);
        assert_eq!(preview[0].date_label, "Oct 16");
        assert_eq!(preview[4].date, NaiveDate::from_ymd_opt(2026, 10, 20).unwrap());
        assert!(preview.iter().all(|d| d.focus.is_none() && d.events_count == 0));
    }

    #[test]
    fn events_counted_on_their_start_day() {
        let busy = vec![
            BusyInterval::new(now() + Duration::hours(2), now() + Duration::hours(3)),
            BusyInterval::new(now() + Duration::hours(4), now() + Duration::hours(5)),
            BusyInterval::new(now() + Duration::days(2), now() + Duration::days(2) + Duration::hours(1)),
        ];
        let preview = weekly_preview(&[], &busy, &now(), 3);
        let counts: Vec<_> = preview.iter().map(|d| d.events_count).collect();
        assert_eq!(counts, [2, 0, 1]);
    }

    #[test]
    fn due_task_is_focus_before_prep_task() {
        let items = vec![
            due("soon", now() + Duration::days(2), Priority::High),
            due("today", now() + Duration::hours(6), Priority::Low),
            due("old", now() - Duration::days(1), Priority::Urgent),
        ];
        let preview = weekly_preview(&items, &[], &now(), 5);

        assert_eq!(preview[0].due_count, 1);
        assert_eq!(preview[0].focus.as_ref().unwrap().id, "today");
        // Nothing due tomorrow; "soon" is a day ahead.
        assert_eq!(preview[1].due_count, 0);
        assert_eq!(preview[1].focus.as_ref().unwrap().id, "soon");
        assert_eq!(preview[2].focus.as_ref().unwrap().id, "soon");
        assert!(preview[3].focus.is_none());
    }

    #[test]
    fn prep_window_is_inclusive_of_three_days() {
        let items = vec![due("edge", now() + Duration::days(3), Priority::Low)];
        let preview = weekly_preview(&items, &[], &now(), 1);
        assert_eq!(preview[0].focus.as_ref().unwrap().id, "edge");

        let items = vec![due("far", now() + Duration::days(3) + Duration::minutes(1), Priority::Low)];
        assert!(weekly_preview(&items, &[], &now(), 1)[0].focus.is_none());
    }

    #[test]
    fn done_items_never_become_focus() {
        let items = vec![due("x", now() + Duration::hours(1), Priority::Urgent).with_status(AssignmentStatus::Done)];
        let preview = weekly_preview(&items, &[], &now(), 1);
        assert_eq!(preview[0].due_count, 0);
        assert!(preview[0].focus.is_none());
    }

    #[test]
    fn days_follow_now_timezone() {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        // 2026-10-16 23:00 local is already the 17th in UTC.
        let local_now = tz.with_ymd_and_hms(2026, 10, 16, 23, 0, 0).unwrap();
        let event_start = tz.with_ymd_and_hms(2026, 10, 16, 23, 30, 0).unwrap().with_timezone(&Utc);
        let busy = vec![BusyInterval::new(event_start, event_start + Duration::minutes(20))];

        let preview = weekly_preview(&[], &busy, &local_now, 2);
        assert_eq!(preview[0].date, NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
        assert_eq!(preview[0].events_count, 1);
        assert_eq!(preview[1].events_count, 0);
    }
}
