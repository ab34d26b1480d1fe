//! Next-occurrence computation.
//!
//! # Responsibility
//! - Advance an anchor date by a rule's fixed step until it passes `today`.
//! - Expose the string boundary used by the `nextdate` API and CLI.
//!
//! # Invariants
//! - The result is strictly after `today`.
//! - The result is the first such date reachable from `anchor` in whole
//!   steps; an anchor already after `today` moves exactly one step.
//! - Pure: no state, no I/O.

use super::date::CalendarDate;
use super::error::{RecurrenceError, RecurrenceResult};
use super::rule::RecurrenceRule;
use log::debug;

/// Computes the next occurrence strictly after `today`.
///
/// # Errors
/// - `EmptyRule` for `RecurrenceRule::None`.
/// - `InvalidRepeatCount` for payloads outside their ranges.
/// - `DateOutOfRange` when the next step leaves the 4-digit year range.
pub fn next_date(
    today: CalendarDate,
    anchor: CalendarDate,
    rule: &RecurrenceRule,
) -> RecurrenceResult<CalendarDate> {
    rule.validate()?;

    match rule {
        RecurrenceRule::None => Err(RecurrenceError::EmptyRule),
        RecurrenceRule::Yearly => advance_yearly(today, anchor),
        RecurrenceRule::EveryNDays { days } => advance_by_days(today, anchor, u64::from(*days)),
        // Weekday list is validated only; stepping stays day-by-day.
        RecurrenceRule::WeeklyOnDays { .. } => advance_by_days(today, anchor, 1),
    }
}

/// String boundary for standalone next-date requests.
///
/// Inputs are parsed in order `now`, `date`, `repeat`; the first failure is
/// returned. Output is canonical `YYYYMMDD`.
pub fn next_date_text(now: &str, date: &str, repeat: &str) -> RecurrenceResult<String> {
    let today = CalendarDate::parse(now).map_err(|err| err.with_field("now"))?;
    let anchor = CalendarDate::parse(date)?;
    let rule = RecurrenceRule::parse(repeat)?;
    let next = next_date(today, anchor, &rule)?;

    debug!(
        "event=next_date module=recurrence status=ok now={} date={} repeat=`{}` next={}",
        today, anchor, rule, next
    );
    Ok(next.to_string())
}

fn advance_yearly(today: CalendarDate, anchor: CalendarDate) -> RecurrenceResult<CalendarDate> {
    // Terminates: add_years fails once the year passes 9999.
    let mut next = anchor.add_years(1)?;
    while next <= today {
        next = next.add_years(1)?;
    }
    Ok(next)
}

fn advance_by_days(
    today: CalendarDate,
    anchor: CalendarDate,
    step: u64,
) -> RecurrenceResult<CalendarDate> {
    // Skips whole steps arithmetically; identical to stepping one at a time.
    let steps = match u64::try_from(anchor.days_until(today)) {
        Ok(elapsed) => elapsed / step + 1,
        Err(_) => 1,
    };
    let offset = steps
        .checked_mul(step)
        .ok_or(RecurrenceError::DateOutOfRange)?;
    anchor.add_days(offset)
}
