//! Busy time supplied by external calendars.
//!
//! A [`BusySource`] fetches the windows a student is already booked for.
//! Fetch failures never reach the planner: [`busy_or_empty`] logs them and
//! substitutes an empty collection.

mod google;

pub use google::{parse_events, GoogleCalendarSource, DEFAULT_API_BASE, TOKEN_ENV};

use std::future::Future;

use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CalendarError;

/// A window during which the student cannot study.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl BusyInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Half-open overlap test against `[start, end)`.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start < self.end && end > self.start
    }

    /// Get duration in minutes
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Whether start strictly precedes end.
    pub fn is_well_formed(&self) -> bool {
        self.start < self.end
    }
}

/// Something that can report today's busy windows.
pub trait BusySource {
    /// Fetch busy intervals intersecting `[day_start, day_end]`.
    fn fetch_busy(
        &self,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> impl Future<Output = Result<Vec<BusyInterval>, CalendarError>> + Send;
}

/// Fetch busy windows, degrading any failure to an empty list.
///
/// Events that end at or before their start are dropped, so the result
/// always passes busy-interval validation.
pub async fn busy_or_empty<S: BusySource + Sync>(
    source: &S,
    day_start: DateTime<Utc>,
    day_end: DateTime<Utc>,
) -> Vec<BusyInterval> {
    match source.fetch_busy(day_start, day_end).await {
        Ok(busy) => {
            tracing::debug!(count = busy.len(), "fetched busy intervals");
            busy.into_iter()
                .filter(|b| {
                    if !b.is_well_formed() {
                        tracing::warn!(start = %b.start, end = %b.end, "dropping empty or inverted calendar event");
                        return false;
                    }
                    true
                })
                .collect()
        }
        Err(CalendarError::NotAuthenticated { service }) => {
            tracing::warn!(%service, "no calendar token; planning without busy time");
            Vec::new()
        }
        Err(e) => {
            tracing::warn!(error = %e, "calendar fetch failed; planning without busy time");
            Vec::new()
        }
    }
}

/// Local-day bounds (00:00:00.000 to 23:59:59.999) of `now`, in UTC.
pub fn today_bounds<Tz: TimeZone>(now: &DateTime<Tz>) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let tz = now.timezone();
    let date = now.date_naive();
    let start = tz
        .from_local_datetime(&date.and_time(NaiveTime::MIN))
        .earliest()?;
    let end = tz
        .from_local_datetime(&date.and_hms_milli_opt(23, 59, 59, 999)?)
        .latest()?;
    Some((start.with_timezone(&Utc), end.with_timezone(&Utc)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset};

    struct Failing;

    impl BusySource for Failing {
        async fn fetch_busy(
            &self,
            _day_start: DateTime<Utc>,
            _day_end: DateTime<Utc>,
        ) -> Result<Vec<BusyInterval>, CalendarError> {
            Err(CalendarError::Malformed("boom".into()))
        }
    }

    struct Fixed(Vec<BusyInterval>);

    impl BusySource for Fixed {
        async fn fetch_busy(
            &self,
            _day_start: DateTime<Utc>,
            _day_end: DateTime<Utc>,
        ) -> Result<Vec<BusyInterval>, CalendarError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn overlap_is_half_open() {
        let start = Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap();
        let busy = BusyInterval::new(start, start + Duration::minutes(30));

        assert!(busy.overlaps(start, start + Duration::minutes(1)));
        assert!(!busy.overlaps(start + Duration::minutes(30), start + Duration::minutes(60)));
        assert!(!busy.overlaps(start - Duration::minutes(15), start));
        assert_eq!(busy.duration_minutes(), 30);
    }

    #[tokio::test]
    async fn failing_source_degrades_to_empty() {
        let now = Utc::now();
        let busy = busy_or_empty(&Failing, now, now + Duration::hours(1)).await;
        assert!(busy.is_empty());
    }

    #[tokio::test]
    async fn working_source_passes_through() {
        let start = Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap();
        let source = Fixed(vec![BusyInterval::new(start, start + Duration::hours(1))]);
        let busy = busy_or_empty(&source, start, start + Duration::hours(12)).await;
        assert_eq!(busy.len(), 1);
    }

    #[test]
    fn today_bounds_follow_local_offset() {
        let tz = FixedOffset::east_opt(9 * 3600).unwrap();
        let now = tz.with_ymd_and_hms(2026, 10, 16, 14, 30, 0).unwrap();
        let (start, end) = today_bounds(&now).unwrap();

        assert_eq!(start, Utc.with_ymd_and_hms(2026, 10, 15, 15, 0, 0).unwrap());
        assert_eq!(
            end,
            Utc.with_ymd_and_hms(2026, 10, 16, 14, 59, 59).unwrap() + Duration::milliseconds(999)
        );
    }
}
