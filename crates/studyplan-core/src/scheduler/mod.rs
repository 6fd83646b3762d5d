//! Daily study plan scheduler.
//!
//! This module provides:
//! - Urgency scoring and ranking of assignments
//! - Conflict lookup against calendar busy windows
//! - The greedy daily planning walk producing Work/Break/Busy slots
//! - Workload counters and a few-day outlook of deadlines and events

mod conflict;
mod plan;
mod preview;
mod scoring;

pub use conflict::find_conflict;
pub use plan::{
    generate_plan, DailyPlanner, PlanRequest, PlanSlot, PlanSummary, PlannerConfig, SlotKind,
    BREAK_REASON, BUSY_REASON, WORK_REASON,
};
pub use preview::{weekly_preview, DayPreview, WorkloadStats, DEFAULT_PREVIEW_DAYS, PREP_WINDOW_DAYS};
pub use scoring::{compare_urgency, urgency_order, urgency_score};
