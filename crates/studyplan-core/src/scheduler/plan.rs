//! Daily study plan generation.
//!
//! Walks forward from the preferred start hour, one decision per step:
//! - step over calendar conflicts as Busy slots
//! - place the most urgent assignment, preferring a change of subject
//! - rest for a short break between assignments
//!
//! The walk ends when the study budget, the day, or the queue runs out.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::conflict::find_conflict;
use super::scoring::urgency_order;
use crate::assignment::Assignment;
use crate::calendar::BusyInterval;

/// Reason attached to every placed assignment.
pub const WORK_REASON: &str = "Smart Pick";
/// Reason attached to break slots.
pub const BREAK_REASON: &str = "Rest";
/// Reason for busy slots whose calendar event has no title.
pub const BUSY_REASON: &str = "Busy (Calendar Event)";

/// What occupies a plan slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SlotKind {
    Work { assignment: Assignment },
    Break,
    Busy,
}

/// One entry of the day's plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSlot {
    pub kind: SlotKind,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Length rounded to the nearest minute.
    pub duration_minutes: i64,
    pub reason: String,
}

impl PlanSlot {
    fn new(kind: SlotKind, start: DateTime<Utc>, end: DateTime<Utc>, reason: String) -> Self {
        Self {
            kind,
            start,
            end,
            duration_minutes: rounded_minutes(end - start),
            reason,
        }
    }

    fn work(assignment: Assignment, start: DateTime<Utc>) -> Self {
        let end = start + Duration::minutes(i64::from(assignment.estimated_minutes));
        Self::new(SlotKind::Work { assignment }, start, end, WORK_REASON.to_string())
    }

    fn rest(start: DateTime<Utc>, minutes: i64) -> Self {
        Self::new(
            SlotKind::Break,
            start,
            start + Duration::minutes(minutes),
            BREAK_REASON.to_string(),
        )
    }

    fn busy(start: DateTime<Utc>, interval: &BusyInterval) -> Self {
        let reason = interval
            .title
            .clone()
            .unwrap_or_else(|| BUSY_REASON.to_string());
        Self::new(SlotKind::Busy, start, interval.end, reason)
    }

    /// The assignment placed in this slot, if it is a Work slot.
    pub fn assignment(&self) -> Option<&Assignment> {
        match &self.kind {
            SlotKind::Work { assignment } => Some(assignment),
            _ => None,
        }
    }

    pub fn is_work(&self) -> bool {
        matches!(self.kind, SlotKind::Work { .. })
    }

    pub fn is_break(&self) -> bool {
        matches!(self.kind, SlotKind::Break)
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.kind, SlotKind::Busy)
    }

    /// Start as `HH:MM` in the given timezone.
    pub fn start_label<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        self.start.with_timezone(tz).format("%H:%M").to_string()
    }
}

fn rounded_minutes(d: Duration) -> i64 {
    let secs = d.num_seconds();
    (secs as f64 / 60.0).round() as i64
}

/// Per-day inputs owned by the student's profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRequest {
    /// Local hour (0-23) at which the plan starts.
    pub start_hour: u32,
    /// Study budget for the day in minutes.
    pub minutes_available: u32,
}

impl Default for PlanRequest {
    fn default() -> Self {
        Self {
            start_hour: 9,
            minutes_available: 240,
        }
    }
}

/// Fixed knobs of the planning walk.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Local hour after which no slot may start.
    pub hard_stop_hour: u32,
    /// Window probed at the cursor for an ongoing calendar event (minutes).
    pub conflict_probe_minutes: i64,
    /// Break inserted between assignments (minutes).
    pub break_minutes: i64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            hard_stop_hour: 22,
            conflict_probe_minutes: 15,
            break_minutes: 10,
        }
    }
}

/// Greedy daily planner.
pub struct DailyPlanner {
    config: PlannerConfig,
}

impl DailyPlanner {
    /// Create a new planner with default config
    pub fn new() -> Self {
        Self {
            config: PlannerConfig::default(),
        }
    }

    /// Create with custom config
    pub fn with_config(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Plan the local day of `now`.
    ///
    /// # Arguments
    /// * `items` - Assignments; done ones are ignored
    /// * `busy` - Calendar busy windows, any order
    /// * `request` - Start hour and study budget
    /// * `now` - Current instant; its timezone defines "today"
    ///
    /// # Returns
    /// Slots ordered by start. Never fails; degenerate input gives an empty
    /// or short plan. A start or stop hour that falls into a DST gap moves
    /// forward to the first valid local time; a start hour outside 0-23
    /// yields an empty plan.
    pub fn plan<Tz: TimeZone>(
        &self,
        items: &[Assignment],
        busy: &[BusyInterval],
        request: &PlanRequest,
        now: &DateTime<Tz>,
    ) -> Vec<PlanSlot> {
        let now_utc = now.with_timezone(&Utc);

        let mut queue: Vec<Assignment> = items
            .iter()
            .filter(|a| a.is_pending())
            .filter(|a| {
                if a.estimated_minutes == 0 {
                    tracing::warn!(id = %a.id, "skipping assignment with zero estimated minutes");
                    return false;
                }
                true
            })
            .cloned()
            .collect();
        urgency_order(&mut queue, now_utc);

        let busy = sorted_busy(busy);

        let (Some(mut cursor), Some(hard_stop)) = (
            local_instant(now, request.start_hour),
            local_instant(now, self.config.hard_stop_hour),
        ) else {
            tracing::warn!(start_hour = request.start_hour, "cannot resolve planning day; empty plan");
            return Vec::new();
        };

        let capacity = i64::from(request.minutes_available);
        let mut minutes_studied: i64 = 0;
        let mut slots: Vec<PlanSlot> = Vec::new();

        while !queue.is_empty() && cursor < hard_stop && minutes_studied < capacity {
            // Already inside a calendar event?
            if let Some(conflict) = find_conflict(cursor, self.config.conflict_probe_minutes, &busy) {
                let start = cursor.max(conflict.start);
                if start >= hard_stop {
                    break;
                }
                tracing::debug!(%start, end = %conflict.end, "busy at cursor");
                slots.push(PlanSlot::busy(start, conflict));
                cursor = conflict.end;
                continue;
            }

            let idx = pick_candidate(&queue, &slots);
            let minutes = i64::from(queue[idx].estimated_minutes);

            if minutes_studied + minutes > capacity {
                tracing::debug!(
                    id = %queue[idx].id,
                    minutes,
                    remaining = capacity - minutes_studied,
                    "study budget exhausted"
                );
                break;
            }

            // Would the assignment run into a calendar event?
            if let Some(conflict) = find_conflict(cursor, minutes, &busy) {
                if conflict.start >= hard_stop {
                    break;
                }
                tracing::debug!(id = %queue[idx].id, busy_start = %conflict.start, "assignment does not fit before event");
                slots.push(PlanSlot::busy(conflict.start, conflict));
                cursor = conflict.end;
                continue;
            }

            let assignment = queue.remove(idx);
            tracing::debug!(id = %assignment.id, %cursor, minutes, "placed assignment");
            slots.push(PlanSlot::work(assignment, cursor));
            cursor += Duration::minutes(minutes);
            minutes_studied += minutes;

            let break_minutes = self.config.break_minutes;
            if !queue.is_empty()
                && minutes_studied < capacity
                && cursor < hard_stop
                && find_conflict(cursor, break_minutes, &busy).is_none()
            {
                slots.push(PlanSlot::rest(cursor, break_minutes));
                cursor += Duration::minutes(break_minutes);
            }
        }

        tracing::info!(
            slots = slots.len(),
            minutes_studied,
            unscheduled = queue.len(),
            "daily plan generated"
        );
        slots
    }
}

impl Default for DailyPlanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function to plan with default settings
pub fn generate_plan<Tz: TimeZone>(
    items: &[Assignment],
    busy: &[BusyInterval],
    request: &PlanRequest,
    now: &DateTime<Tz>,
) -> Vec<PlanSlot> {
    DailyPlanner::new().plan(items, busy, request, now)
}

/// Well-formed intervals, stably sorted by start.
fn sorted_busy(busy: &[BusyInterval]) -> Vec<BusyInterval> {
    let mut sorted: Vec<BusyInterval> = busy
        .iter()
        .filter(|b| {
            if !b.is_well_formed() {
                tracing::warn!(start = %b.start, end = %b.end, "ignoring inverted busy interval");
                return false;
            }
            true
        })
        .cloned()
        .collect();
    sorted.sort_by_key(|b| b.start);
    sorted
}

/// The subject of the study block the cursor just left, looking through a
/// trailing break. Busy slots reset the context.
fn previous_work(slots: &[PlanSlot]) -> Option<&Assignment> {
    let mut recent = slots.iter().rev();
    match recent.next()? {
        slot if slot.is_break() => recent.next().and_then(PlanSlot::assignment),
        slot => slot.assignment(),
    }
}

/// Index of the next assignment: the most urgent one, unless a different
/// subject than the previous block is available.
fn pick_candidate(queue: &[Assignment], slots: &[PlanSlot]) -> usize {
    let Some(prev) = previous_work(slots) else {
        return 0;
    };
    queue
        .iter()
        .position(|a| a.subject_id != prev.subject_id)
        .unwrap_or(0)
}

/// Longest clock jump searched past when `hour:00` does not exist locally.
const MAX_GAP_MINUTES: i64 = 180;

/// `hour:00:00` local time on the day of `now`, in UTC.
///
/// Inside a DST gap the first valid local minute after the requested time
/// is used (02:00 on a spring-forward night becomes 03:00).
fn local_instant<Tz: TimeZone>(now: &DateTime<Tz>, hour: u32) -> Option<DateTime<Utc>> {
    let naive = now.date_naive().and_hms_opt(hour, 0, 0)?;
    let tz = now.timezone();
    (0..=MAX_GAP_MINUTES)
        .find_map(|m| tz.from_local_datetime(&(naive + Duration::minutes(m))).earliest())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Totals shown alongside a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub work_minutes: i64,
    /// Work time in hours, one decimal.
    pub work_hours: f64,
    pub work_slots: usize,
    pub break_slots: usize,
    pub busy_slots: usize,
}

impl PlanSummary {
    pub fn from_slots(slots: &[PlanSlot]) -> Self {
        let work_minutes: i64 = slots
            .iter()
            .filter(|s| s.is_work())
            .map(|s| s.duration_minutes)
            .sum();

        Self {
            work_minutes,
            work_hours: (work_minutes as f64 / 60.0 * 10.0).round() / 10.0,
            work_slots: slots.iter().filter(|s| s.is_work()).count(),
            break_slots: slots.iter().filter(|s| s.is_break()).count(),
            busy_slots: slots.iter().filter(|s| s.is_busy()).count(),
        }
    }
}
