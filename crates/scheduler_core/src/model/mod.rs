//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record persisted by the task store.
//! - Define the write-side draft accepted by create/update use cases.
//!
//! # Invariants
//! - Persisted tasks always carry a canonical `CalendarDate` and a parsed rule.
//! - Titles are never blank.

pub mod task;
