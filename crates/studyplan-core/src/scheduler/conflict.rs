//! Conflict lookup against busy intervals.

use chrono::{DateTime, Duration, Utc};

use crate::calendar::BusyInterval;

/// First interval in `busy` overlapping `[start, start + duration_minutes)`.
///
/// Order matters: the first match in the slice wins, so pass intervals
/// sorted by start to get the earliest conflict.
pub fn find_conflict(
    start: DateTime<Utc>,
    duration_minutes: i64,
    busy: &[BusyInterval],
) -> Option<&BusyInterval> {
    let end = start + Duration::minutes(duration_minutes);
    busy.iter().find(|interval| interval.overlaps(start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, h, m, 0).unwrap()
    }

    #[test]
    fn no_intervals_no_conflict() {
        assert!(find_conflict(at(9, 0), 60, &[]).is_none());
    }

    #[test]
    fn touching_edges_do_not_conflict() {
        let busy = vec![
            BusyInterval::new(at(8, 0), at(9, 0)),
            BusyInterval::new(at(10, 0), at(11, 0)),
        ];
        assert!(find_conflict(at(9, 0), 60, &busy).is_none());
    }

    #[test]
    fn partial_overlap_conflicts() {
        let busy = vec![BusyInterval::new(at(9, 50), at(10, 30)).with_title("Gym")];
        let hit = find_conflict(at(9, 0), 60, &busy).unwrap();
        assert_eq!(hit.title.as_deref(), Some("Gym"));
    }

    #[test]
    fn returns_first_in_input_order() {
        let busy = vec![
            BusyInterval::new(at(9, 40), at(10, 0)).with_title("later"),
            BusyInterval::new(at(9, 10), at(9, 20)).with_title("earlier"),
        ];
        let hit = find_conflict(at(9, 0), 60, &busy).unwrap();
        assert_eq!(hit.title.as_deref(), Some("later"));
    }

    #[test]
    fn enclosing_interval_conflicts() {
        let busy = vec![BusyInterval::new(at(8, 0), at(12, 0))];
        assert!(find_conflict(at(9, 0), 15, &busy).is_some());
    }
}
