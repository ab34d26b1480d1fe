//! Shared server state.
//!
//! # Invariants
//! - The SQLite connection is only reached through `with_task_service`,
//!   which holds the lock for the whole use case.
//! - The lock is never held across an `.await`.

use crate::error::ApiError;
use rusqlite::Connection;
use scheduler_core::{CalendarDate, SqliteTaskRepository, TaskService, TaskServiceError};
use std::sync::Mutex;

/// Source of the "today" reference used for normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    /// Local calendar date at request time.
    System,
    /// Pinned date, used by tests and replays.
    Fixed(CalendarDate),
}

impl Clock {
    pub fn today(self) -> CalendarDate {
        match self {
            Self::System => CalendarDate::today(),
            Self::Fixed(date) => date,
        }
    }
}

pub struct AppState {
    conn: Mutex<Connection>,
    clock: Clock,
}

impl AppState {
    /// Wraps a migrated connection from `scheduler_core::db`.
    pub fn new(conn: Connection, clock: Clock) -> Self {
        Self {
            conn: Mutex::new(conn),
            clock,
        }
    }

    pub fn today(&self) -> CalendarDate {
        self.clock.today()
    }

    /// Runs one task use case with exclusive access to the store.
    pub fn with_task_service<T>(
        &self,
        f: impl FnOnce(&TaskService<SqliteTaskRepository<'_>>) -> Result<T, TaskServiceError>,
    ) -> Result<T, ApiError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| ApiError::Internal("task store lock poisoned".to_string()))?;
        let service = TaskService::new(SqliteTaskRepository::new(&conn));
        f(&service).map_err(ApiError::from)
    }
}
