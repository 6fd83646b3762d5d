//! # Studyplan Core Library
//!
//! Builds a student's study plan for the day from pending assignments,
//! calendar busy windows, a preferred start hour and a daily study budget.
//! The CLI binary is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Scheduler**: pure, deterministic planning walk; "now" is injected
//! - **Calendar**: busy-window sources that degrade to "no busy time" on
//!   failure
//! - **Validation**: boundary checks callers run before planning
//! - **Storage**: TOML-based preferences
//!
//! ## Key Components
//!
//! - [`DailyPlanner`]: the planning walk
//! - [`urgency_score`]: assignment ranking
//! - [`GoogleCalendarSource`]: Google Calendar busy windows
//! - [`Config`]: preference management

pub mod assignment;
pub mod calendar;
pub mod error;
pub mod scheduler;
pub mod storage;
pub mod validation;

pub use assignment::{Assignment, AssignmentStatus, Priority};
pub use calendar::{busy_or_empty, today_bounds, BusyInterval, BusySource, GoogleCalendarSource};
pub use error::{CalendarError, ConfigError, CoreError, ValidationError};
pub use scheduler::{
    find_conflict, generate_plan, urgency_score, weekly_preview, DailyPlanner, DayPreview,
    PlanRequest, PlanSlot, PlanSummary, PlannerConfig, SlotKind, WorkloadStats,
};
pub use storage::Config;
