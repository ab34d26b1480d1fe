//! Task date normalization policy.
//!
//! Applied on every task create/update to decide whether the stored date is
//! kept, reset to today, or rolled forward to its next occurrence.

use super::date::CalendarDate;
use super::engine::next_date;
use super::error::RecurrenceResult;
use super::rule::RecurrenceRule;

/// Resolves the date a task should carry as of `today`.
///
/// # Contract
/// - Empty `input_date` -> `today`.
/// - `input_date >= today` -> unchanged, whatever the rule.
/// - `input_date < today` without a rule -> `today`.
/// - `input_date < today` with a rule -> `next_date(today, input_date, rule)`.
///
/// # Errors
/// - `InvalidDateFormat` when `input_date` is non-empty and unparseable.
/// - Any `next_date` failure when recurrence is applied.
pub fn normalize_task_date(
    today: CalendarDate,
    input_date: &str,
    rule: &RecurrenceRule,
) -> RecurrenceResult<CalendarDate> {
    if input_date.is_empty() {
        return Ok(today);
    }

    let date = CalendarDate::parse(input_date)?;
    if date >= today {
        return Ok(date);
    }
    if rule.is_none() {
        return Ok(today);
    }

    next_date(today, date, rule)
}

#[cfg(test)]
mod tests {
    use super::normalize_task_date;
    use crate::recurrence::date::CalendarDate;
    use crate::recurrence::error::RecurrenceError;
    use crate::recurrence::rule::RecurrenceRule;

    fn date(value: &str) -> CalendarDate {
        CalendarDate::parse(value).expect("test date should parse")
    }

    fn today() -> CalendarDate {
        date("20240301")
    }

    #[test]
    fn empty_input_uses_today() {
        assert_eq!(
            normalize_task_date(today(), "", &RecurrenceRule::Yearly).unwrap(),
            today()
        );
    }

    #[test]
    fn past_date_with_rule_rolls_forward() {
        assert_eq!(
            normalize_task_date(today(), "20230301", &RecurrenceRule::Yearly).unwrap(),
            date("20250301")
        );
        assert_eq!(
            normalize_task_date(today(), "20240101", &RecurrenceRule::EveryNDays { days: 7 })
                .unwrap(),
            date("20240304")
        );
    }

    #[test]
    fn past_date_without_rule_resets_to_today() {
        assert_eq!(
            normalize_task_date(today(), "20231231", &RecurrenceRule::None).unwrap(),
            today()
        );
    }

    #[test]
    fn present_and_future_dates_are_kept_even_with_rule() {
        let weekly = RecurrenceRule::EveryNDays { days: 7 };
        assert_eq!(
            normalize_task_date(today(), "20240315", &weekly).unwrap(),
            date("20240315")
        );
        assert_eq!(
            normalize_task_date(today(), "20240301", &RecurrenceRule::Yearly).unwrap(),
            today()
        );
    }

    #[test]
    fn normalization_is_idempotent() {
        let rules = [
            RecurrenceRule::None,
            RecurrenceRule::Yearly,
            RecurrenceRule::EveryNDays { days: 3 },
            RecurrenceRule::parse("w 2,4").unwrap(),
        ];
        for rule in &rules {
            for input in ["", "20200229", "20231231", "20240301", "20240420"] {
                let first = normalize_task_date(today(), input, rule).unwrap();
                let second = normalize_task_date(today(), &first.to_string(), rule).unwrap();
                assert_eq!(first, second, "rule `{rule}` input `{input}`");
            }
        }
    }

    #[test]
    fn unparseable_input_fails() {
        assert!(matches!(
            normalize_task_date(today(), "tomorrow", &RecurrenceRule::None),
            Err(RecurrenceError::InvalidDateFormat { .. })
        ));
    }

    #[test]
    fn hand_built_invalid_rule_fails_only_for_past_dates() {
        let rule = RecurrenceRule::EveryNDays { days: 0 };
        assert!(normalize_task_date(today(), "20240310", &rule).is_ok());
        assert!(matches!(
            normalize_task_date(today(), "20240101", &rule),
            Err(RecurrenceError::InvalidRepeatCount { .. })
        ));
    }
}
