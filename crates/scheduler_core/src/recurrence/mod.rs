//! Recurrence engine: calendar dates, rule grammar and next-date stepping.
//!
//! # Responsibility
//! - Own the canonical `YYYYMMDD` date type and the rule grammar.
//! - Compute next occurrences and the task date normalization policy.
//!
//! # Invariants
//! - Every function here is pure and safe to call concurrently.
//! - Dates are compared by calendar value, never by string.

pub mod date;
pub mod engine;
pub mod error;
pub mod normalize;
pub mod rule;
