//! Assignment types supplied by the persistence layer.
//!
//! Assignments are read-only inputs to the planner. The planner copies the
//! eligible ones and never writes back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How important the student marked an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    /// Base urgency weight for this priority.
    pub fn weight(self) -> i64 {
        match self {
            Priority::Urgent => 300,
            Priority::High => 50,
            Priority::Medium => 20,
            Priority::Low => 10,
        }
    }
}

/// Lifecycle status of an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

/// A piece of pending coursework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: String,
    pub title: String,
    pub due_date: DateTime<Utc>,
    pub priority: Priority,
    pub estimated_minutes: u32,
    #[serde(default)]
    pub status: AssignmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_color: Option<String>,
}

impl Assignment {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        due_date: DateTime<Utc>,
        priority: Priority,
        estimated_minutes: u32,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            due_date,
            priority,
            estimated_minutes,
            status: AssignmentStatus::Todo,
            subject_id: None,
            subject_name: None,
            subject_color: None,
        }
    }

    pub fn with_subject(mut self, subject_id: impl Into<String>) -> Self {
        self.subject_id = Some(subject_id.into());
        self
    }

    pub fn with_status(mut self, status: AssignmentStatus) -> Self {
        self.status = status;
        self
    }

    /// Whether the planner may schedule this assignment.
    pub fn is_pending(&self) -> bool {
        self.status != AssignmentStatus::Done
    }
}
