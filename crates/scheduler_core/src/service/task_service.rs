//! Task use-case service.
//!
//! # Responsibility
//! - Provide create/update/get/list entry points for API callers.
//! - Apply the date normalization policy on every write.
//!
//! # Invariants
//! - Create and update share one normalization path.
//! - Rule text is parsed before any write, whatever the task date.
//! - A failed normalization never reaches the repository.

use crate::model::task::{NewTask, Task, TaskDraft, TaskId, TaskValidationError};
use crate::recurrence::date::CalendarDate;
use crate::recurrence::error::RecurrenceError;
use crate::recurrence::normalize::normalize_task_date;
use crate::recurrence::rule::RecurrenceRule;
use crate::repo::task_repo::{RepoError, TaskListQuery, TaskRepository};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for task use-cases.
#[derive(Debug)]
pub enum TaskServiceError {
    /// Draft failed record validation.
    Validation(TaskValidationError),
    /// Date or rule input was rejected by the recurrence engine.
    Recurrence(RecurrenceError),
    /// Target task does not exist.
    TaskNotFound(TaskId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Recurrence(err) => write!(f, "{err}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Recurrence(err) => Some(err),
            Self::TaskNotFound(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl TaskServiceError {
    /// Stable `error_code` label for rejection log events.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "invalid_task",
            Self::Recurrence(err) if err.is_invalid_date() => "invalid_date",
            Self::Recurrence(err) if err.is_invalid_rule() => "invalid_repeat",
            Self::Recurrence(_) => "date_out_of_range",
            Self::TaskNotFound(_) => "task_not_found",
            Self::Repo(_) => "storage_failed",
        }
    }
}

impl From<TaskValidationError> for TaskServiceError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RecurrenceError> for TaskServiceError {
    fn from(value: RecurrenceError) -> Self {
        Self::Recurrence(value)
    }
}

impl From<RepoError> for TaskServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::TaskNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

/// Task service facade over repository implementations.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates, normalizes and persists a new task.
    ///
    /// The repeat text is parsed even when `draft.date` is today or later
    /// and needs no recurrence step, so an unparseable rule is rejected
    /// before anything is stored.
    pub fn create_task(
        &self,
        today: CalendarDate,
        draft: &TaskDraft,
    ) -> Result<TaskId, TaskServiceError> {
        let task = prepare_task(today, draft).inspect_err(|err| {
            warn!(
                "event=task_create module=service status=rejected error_code={} error={}",
                err.error_code(),
                err
            );
        })?;
        let id = self.repo.create_task(&task)?;
        info!(
            "event=task_create module=service status=ok task_id={} date={} repeat=`{}`",
            id, task.date, task.repeat
        );
        Ok(id)
    }

    /// Replaces an existing task with normalized draft content.
    ///
    /// Returns the stored record on success, `TaskNotFound` when no row
    /// matches `id`. As with [`TaskService::create_task`], the repeat text
    /// must parse whatever the draft date is.
    pub fn update_task(
        &self,
        today: CalendarDate,
        id: TaskId,
        draft: &TaskDraft,
    ) -> Result<Task, TaskServiceError> {
        if id <= 0 {
            return Err(TaskValidationError::InvalidId(id).into());
        }

        let task = prepare_task(today, draft)
            .inspect_err(|err| {
                warn!(
                    "event=task_update module=service status=rejected task_id={} error_code={} error={}",
                    id,
                    err.error_code(),
                    err
                );
            })?
            .into_task(id);
        self.repo.update_task(&task)?;
        info!(
            "event=task_update module=service status=ok task_id={} date={} repeat=`{}`",
            id, task.date, task.repeat
        );
        Ok(task)
    }

    /// Gets one task by id.
    pub fn get_task(&self, id: TaskId) -> Result<Option<Task>, TaskServiceError> {
        Ok(self.repo.get_task(id)?)
    }

    /// Lists tasks by ascending date, using repository limit defaults.
    pub fn list_tasks(&self, limit: Option<u32>) -> Result<Vec<Task>, TaskServiceError> {
        let query = TaskListQuery { limit, offset: 0 };
        Ok(self.repo.list_tasks(&query)?)
    }
}

fn prepare_task(today: CalendarDate, draft: &TaskDraft) -> Result<NewTask, TaskServiceError> {
    draft.validate()?;
    let repeat = RecurrenceRule::parse(&draft.repeat)?;
    Ok(NewTask {
        date: normalize_task_date(today, &draft.date, &repeat)?,
        title: draft.title.clone(),
        comment: draft.comment.clone(),
        repeat,
    })
}
