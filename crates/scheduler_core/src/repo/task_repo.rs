//! Task repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/update/get/list APIs over the `scheduler` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths validate the record before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Dates are stored in canonical `YYYYMMDD` text, so `ORDER BY date`
//!   matches chronological order.

use crate::db::DbError;
use crate::model::task::{NewTask, Task, TaskId, TaskValidationError};
use crate::recurrence::date::CalendarDate;
use crate::recurrence::rule::RecurrenceRule;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    date,
    title,
    comment,
    repeat
FROM scheduler";

/// Default page size for task lists.
pub const TASKS_DEFAULT_LIMIT: u32 = 50;
/// Largest page size a caller may request.
pub const TASKS_LIMIT_MAX: u32 = 50;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for task persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(TaskValidationError),
    Db(DbError),
    NotFound(TaskId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted task data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<TaskValidationError> for RepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Pagination options for listing tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskListQuery {
    /// Maximum rows to return. Defaults to 50 and clamps to 50.
    pub limit: Option<u32>,
    /// Number of rows to skip.
    pub offset: u32,
}

/// Repository interface for task operations.
pub trait TaskRepository {
    /// Inserts a task and returns its store-assigned id.
    fn create_task(&self, task: &NewTask) -> RepoResult<TaskId>;
    /// Replaces all fields of an existing task.
    fn update_task(&self, task: &Task) -> RepoResult<()>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    /// Lists tasks ordered by `date ASC, id ASC`.
    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &NewTask) -> RepoResult<TaskId> {
        task.validate()?;

        self.conn.execute(
            "INSERT INTO scheduler (date, title, comment, repeat)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                task.date.to_string(),
                task.title.as_str(),
                task.comment.as_str(),
                task.repeat.to_string(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        task.validate()?;

        let changed = self.conn.execute(
            "UPDATE scheduler
             SET
                date = ?1,
                title = ?2,
                comment = ?3,
                repeat = ?4
             WHERE id = ?5;",
            params![
                task.date.to_string(),
                task.title.as_str(),
                task.comment.as_str(),
                task.repeat.to_string(),
                task.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(task.id));
        }

        Ok(())
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }

        Ok(None)
    }

    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>> {
        let limit = normalize_task_limit(query.limit);
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL}
             ORDER BY date ASC, id ASC
             LIMIT ?1 OFFSET ?2;"
        ))?;

        let mut rows = stmt.query(params![i64::from(limit), i64::from(query.offset)])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }
}

/// Applies list limit defaults: `None`/`0` -> 50, larger values clamp to 50.
pub fn normalize_task_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) | None => TASKS_DEFAULT_LIMIT,
        Some(value) => value.min(TASKS_LIMIT_MAX),
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id: TaskId = row.get("id")?;

    let date_text: String = row.get("date")?;
    let date = CalendarDate::parse(&date_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid date `{date_text}` in scheduler.date (id={id})"))
    })?;

    let repeat_text: String = row.get("repeat")?;
    let repeat = RecurrenceRule::parse(&repeat_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid repeat rule `{repeat_text}` in scheduler.repeat (id={id})"
        ))
    })?;

    let task = Task {
        id,
        date,
        title: row.get("title")?,
        comment: row.get("comment")?,
        repeat,
    };
    task.validate()?;
    Ok(task)
}
