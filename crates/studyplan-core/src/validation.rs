//! Input validation for the daily planner.
//!
//! The planner is total over any input, but callers should reject garbage
//! before it gets there. Detects:
//! - Empty and duplicate assignment IDs
//! - Assignments with a zero-minute estimate
//! - Busy intervals whose start is not before their end
//! - Start hours outside 0-23 and an empty study budget

use std::collections::HashSet;

use crate::assignment::Assignment;
use crate::calendar::BusyInterval;
use crate::error::ValidationError;
use crate::scheduler::PlanRequest;

/// Validation result carrying every detected problem.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// Check assignment identity and estimates.
pub fn validate_assignments(items: &[Assignment]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut ids = HashSet::new();

    for item in items {
        if item.id.trim().is_empty() {
            errors.push(ValidationError::invalid("id", format!("assignment '{}' has an empty id", item.title)));
        } else if !ids.insert(item.id.as_str()) {
            errors.push(ValidationError::DuplicateId(item.id.clone()));
        }

        if item.estimated_minutes == 0 {
            errors.push(ValidationError::invalid(
                "estimated_minutes",
                format!("assignment '{}' must take at least one minute", item.id),
            ));
        }
    }

    into_result(errors)
}

/// Check every busy interval is non-empty.
pub fn validate_busy_intervals(busy: &[BusyInterval]) -> ValidationResult {
    let errors = busy
        .iter()
        .filter(|b| !b.is_well_formed())
        .map(|b| ValidationError::InvalidTimeRange {
            start: b.start,
            end: b.end,
        })
        .collect();

    into_result(errors)
}

/// Check the per-day preferences.
pub fn validate_request(request: &PlanRequest) -> ValidationResult {
    let mut errors = Vec::new();

    if request.start_hour > 23 {
        errors.push(ValidationError::invalid(
            "start_hour",
            format!("{} is not an hour of the day (0-23)", request.start_hour),
        ));
    }
    if request.minutes_available == 0 {
        errors.push(ValidationError::invalid("minutes_available", "study budget must be positive"));
    }

    into_result(errors)
}

/// Run every check and collect all problems.
pub fn validate_inputs(
    items: &[Assignment],
    busy: &[BusyInterval],
    request: &PlanRequest,
) -> ValidationResult {
    let errors: Vec<ValidationError> = [
        validate_assignments(items),
        validate_busy_intervals(busy),
        validate_request(request),
    ]
    .into_iter()
    .filter_map(Result::err)
    .flatten()
    .collect();

    into_result(errors)
}

fn into_result(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
