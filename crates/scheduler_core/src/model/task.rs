//! Task records and write drafts.
//!
//! # Invariants
//! - `Task.id` is a positive store-assigned identifier.
//! - `title` contains at least one non-whitespace character.
//! - `date` was produced by the normalization policy at write time.

use crate::recurrence::date::CalendarDate;
use crate::recurrence::rule::RecurrenceRule;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned task identifier (SQLite rowid).
pub type TaskId = i64;

/// Validation failure for task records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty or whitespace only.
    EmptyTitle,
    /// Identifier is not a positive rowid.
    InvalidId(TaskId),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title is required"),
            Self::InvalidId(id) => write!(f, "invalid task id: {id}"),
        }
    }
}

impl Error for TaskValidationError {}

/// Canonical persisted task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Next date the task is due on.
    pub date: CalendarDate,
    pub title: String,
    /// Free-form note; empty when unset.
    pub comment: String,
    /// Recurrence rule; `RecurrenceRule::None` for one-off tasks.
    pub repeat: RecurrenceRule,
}

impl Task {
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id <= 0 {
            return Err(TaskValidationError::InvalidId(self.id));
        }
        validate_title(&self.title)
    }
}

/// Task content that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub date: CalendarDate,
    pub title: String,
    pub comment: String,
    pub repeat: RecurrenceRule,
}

impl NewTask {
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        validate_title(&self.title)
    }

    /// Attaches a store-assigned id.
    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            date: self.date,
            title: self.title,
            comment: self.comment,
            repeat: self.repeat,
        }
    }
}

/// Raw create/update input as received from callers.
///
/// `date` and `repeat` may be empty; both are parsed and normalized by the
/// task service before anything is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TaskDraft {
    pub date: String,
    pub title: String,
    pub comment: String,
    pub repeat: String,
}

impl TaskDraft {
    /// Checks fields that do not depend on date/rule parsing.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        validate_title(&self.title)
    }
}

fn validate_title(title: &str) -> Result<(), TaskValidationError> {
    if title.trim().is_empty() {
        return Err(TaskValidationError::EmptyTitle);
    }
    Ok(())
}
