//! Core domain logic for the task scheduler.
//! This crate is the single source of truth for recurrence and task invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod recurrence;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::task::{NewTask, Task, TaskDraft, TaskId, TaskValidationError};
pub use recurrence::date::CalendarDate;
pub use recurrence::engine::{next_date, next_date_text};
pub use recurrence::error::{RecurrenceError, RecurrenceResult};
pub use recurrence::normalize::normalize_task_date;
pub use recurrence::rule::{RecurrenceRule, MAX_REPEAT_DAYS};
pub use repo::task_repo::{
    RepoError, RepoResult, SqliteTaskRepository, TaskListQuery, TaskRepository,
};
pub use service::task_service::{TaskService, TaskServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
