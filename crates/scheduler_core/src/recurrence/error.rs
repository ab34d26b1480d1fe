//! Typed failures for date parsing, rule parsing and recurrence stepping.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RecurrenceResult<T> = Result<T, RecurrenceError>;

/// Error raised by date/rule parsing and next-date computation.
///
/// Every variant is detected synchronously; no partial result is ever
/// produced alongside an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceError {
    /// Input is not an 8-digit `YYYYMMDD` calendar date.
    InvalidDateFormat {
        /// Logical input name (`date`, `now`, ...).
        field: &'static str,
        value: String,
    },
    /// A rule is required but the rule text is empty.
    EmptyRule,
    /// Day count outside `[1, 400]` or malformed/out-of-range weekday list.
    InvalidRepeatCount { rule: String },
    /// Rule text matches none of the supported grammars.
    UnsupportedRule { rule: String },
    /// Stepping would produce a date outside `00000101..=99991231`.
    DateOutOfRange,
}

impl RecurrenceError {
    /// Re-labels an `InvalidDateFormat` error with the caller's input name.
    pub fn with_field(self, field: &'static str) -> Self {
        match self {
            Self::InvalidDateFormat { value, .. } => Self::InvalidDateFormat { field, value },
            other => other,
        }
    }

    /// Whether the failure originates from the rule rather than a date.
    pub fn is_invalid_rule(&self) -> bool {
        matches!(
            self,
            Self::EmptyRule | Self::InvalidRepeatCount { .. } | Self::UnsupportedRule { .. }
        )
    }

    /// Whether the failure originates from an unparseable date input.
    pub fn is_invalid_date(&self) -> bool {
        matches!(self, Self::InvalidDateFormat { .. })
    }
}

impl Display for RecurrenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDateFormat { field, value } => {
                write!(f, "invalid {field} format `{value}`: expected YYYYMMDD")
            }
            Self::EmptyRule => write!(f, "repeat rule is empty"),
            Self::InvalidRepeatCount { rule } => write!(f, "invalid repeat rule: `{rule}`"),
            Self::UnsupportedRule { rule } => write!(f, "unsupported repeat rule: `{rule}`"),
            Self::DateOutOfRange => write!(f, "next date is outside the YYYYMMDD range"),
        }
    }
}

impl Error for RecurrenceError {}
