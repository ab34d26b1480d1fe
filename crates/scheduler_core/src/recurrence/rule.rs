//! Recurrence rule grammar.
//!
//! # Responsibility
//! - Parse rule text (`""`, `y`, `d <N>`, `w <d1,d2,...>`) into a typed rule.
//! - Render the canonical text form used for storage.
//!
//! # Invariants
//! - `EveryNDays.days` is within `[1, MAX_REPEAT_DAYS]` for parsed rules.
//! - `WeeklyOnDays.days_of_week` is non-empty and every entry is in `[1, 7]`.

use super::error::{RecurrenceError, RecurrenceResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Largest accepted `d <N>` interval.
pub const MAX_REPEAT_DAYS: u16 = 400;

static DAY_COUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+$").expect("valid day count regex"));
static WEEKDAY_LIST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+(,[0-9]+)*$").expect("valid weekday list regex"));

/// Typed recurrence rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum RecurrenceRule {
    /// No recurrence; rule text is empty.
    #[default]
    None,
    /// One calendar year per step.
    Yearly,
    /// `days` calendar days per step.
    EveryNDays { days: u16 },
    /// Weekday list (1 = Monday .. 7 = Sunday).
    ///
    /// The list is validated but the step is always one calendar day.
    WeeklyOnDays { days_of_week: BTreeSet<u8> },
}

impl RecurrenceRule {
    /// Parses rule text.
    ///
    /// Empty text parses to `RecurrenceRule::None`; callers that require a
    /// rule reject it later with `EmptyRule`.
    ///
    /// # Errors
    /// - `InvalidRepeatCount` when a `d `/`w ` payload is malformed or out of
    ///   range.
    /// - `UnsupportedRule` for any other non-empty text.
    pub fn parse(text: &str) -> RecurrenceResult<Self> {
        if text.is_empty() {
            return Ok(Self::None);
        }
        if text == "y" {
            return Ok(Self::Yearly);
        }
        if let Some(payload) = text.strip_prefix("d ") {
            return parse_day_count(text, payload.trim());
        }
        if let Some(payload) = text.strip_prefix("w ") {
            return parse_weekdays(text, payload.trim());
        }

        Err(RecurrenceError::UnsupportedRule {
            rule: text.to_string(),
        })
    }

    /// Returns whether this rule means "no recurrence".
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Checks payload invariants for rules built without `parse`.
    pub fn validate(&self) -> RecurrenceResult<()> {
        let valid = match self {
            Self::None => return Err(RecurrenceError::EmptyRule),
            Self::Yearly => true,
            Self::EveryNDays { days } => (1..=MAX_REPEAT_DAYS).contains(days),
            Self::WeeklyOnDays { days_of_week } => {
                !days_of_week.is_empty() && days_of_week.iter().all(|day| (1..=7).contains(day))
            }
        };

        if valid {
            Ok(())
        } else {
            Err(RecurrenceError::InvalidRepeatCount {
                rule: self.to_string(),
            })
        }
    }
}

fn parse_day_count(text: &str, payload: &str) -> RecurrenceResult<RecurrenceRule> {
    let invalid = || RecurrenceError::InvalidRepeatCount {
        rule: text.to_string(),
    };

    if !DAY_COUNT_RE.is_match(payload) {
        return Err(invalid());
    }

    payload
        .parse::<u16>()
        .ok()
        .filter(|days| (1..=MAX_REPEAT_DAYS).contains(days))
        .map(|days| RecurrenceRule::EveryNDays { days })
        .ok_or_else(invalid)
}

fn parse_weekdays(text: &str, payload: &str) -> RecurrenceResult<RecurrenceRule> {
    let invalid = || RecurrenceError::InvalidRepeatCount {
        rule: text.to_string(),
    };

    if !WEEKDAY_LIST_RE.is_match(payload) {
        return Err(invalid());
    }

    let mut days_of_week = BTreeSet::new();
    for token in payload.split(',') {
        let day = token
            .parse::<u8>()
            .ok()
            .filter(|day| (1..=7).contains(day))
            .ok_or_else(invalid)?;
        days_of_week.insert(day);
    }

    Ok(RecurrenceRule::WeeklyOnDays { days_of_week })
}

impl Display for RecurrenceRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => Ok(()),
            Self::Yearly => write!(f, "y"),
            Self::EveryNDays { days } => write!(f, "d {days}"),
            Self::WeeklyOnDays { days_of_week } => {
                let joined = days_of_week
                    .iter()
                    .map(u8::to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                write!(f, "w {joined}")
            }
        }
    }
}

impl FromStr for RecurrenceRule {
    type Err = RecurrenceError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

impl Serialize for RecurrenceRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RecurrenceRule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::RecurrenceRule;
    use crate::recurrence::error::RecurrenceError;
    use std::collections::BTreeSet;

    fn invalid_count(text: &str) -> bool {
        matches!(
            RecurrenceRule::parse(text),
            Err(RecurrenceError::InvalidRepeatCount { .. })
        )
    }

    #[test]
    fn parses_each_supported_grammar() {
        assert_eq!(RecurrenceRule::parse("").unwrap(), RecurrenceRule::None);
        assert_eq!(RecurrenceRule::parse("y").unwrap(), RecurrenceRule::Yearly);
        assert_eq!(
            RecurrenceRule::parse("d 7").unwrap(),
            RecurrenceRule::EveryNDays { days: 7 }
        );
        assert_eq!(
            RecurrenceRule::parse("w 5,1,3").unwrap(),
            RecurrenceRule::WeeklyOnDays {
                days_of_week: BTreeSet::from([1, 3, 5])
            }
        );
    }

    #[test]
    fn day_count_bounds_are_inclusive() {
        assert!(RecurrenceRule::parse("d 1").is_ok());
        assert!(RecurrenceRule::parse("d 400").is_ok());
        for text in ["d 0", "d 401", "d 500", "d abc", "d ", "d -3", "d 7 7", "d 99999999999"] {
            assert!(invalid_count(text), "`{text}` should be an invalid count");
        }
    }

    #[test]
    fn weekday_tokens_must_be_in_range() {
        for text in ["w 0,8", "w 8", "w 1,,2", "w ", "w 1,x", "w 1, 2", "w 300"] {
            assert!(invalid_count(text), "`{text}` should be an invalid count");
        }
    }

    #[test]
    fn unknown_forms_are_unsupported() {
        for text in ["x", "m 1", "d", "w", "Y", " y", "y 1", "d7"] {
            assert!(
                matches!(
                    RecurrenceRule::parse(text),
                    Err(RecurrenceError::UnsupportedRule { .. })
                ),
                "`{text}` should be unsupported"
            );
        }
    }

    #[test]
    fn canonical_text_sorts_and_deduplicates_weekdays() {
        let rule = RecurrenceRule::parse("w 7,2,2,4").unwrap();
        assert_eq!(rule.to_string(), "w 2,4,7");
        assert_eq!(RecurrenceRule::parse(&rule.to_string()).unwrap(), rule);
        assert_eq!(RecurrenceRule::None.to_string(), "");
    }

    #[test]
    fn validate_rejects_hand_built_payloads() {
        assert_eq!(RecurrenceRule::None.validate(), Err(RecurrenceError::EmptyRule));
        assert!(RecurrenceRule::EveryNDays { days: 0 }.validate().is_err());
        assert!(RecurrenceRule::WeeklyOnDays {
            days_of_week: BTreeSet::new()
        }
        .validate()
        .is_err());
        assert!(RecurrenceRule::EveryNDays { days: 401 }.validate().is_err());
        assert!(RecurrenceRule::EveryNDays { days: 30 }.validate().is_ok());
    }
}
