//! Human date input for due dates: `YYYY-MM-DD`, full timestamps, `today`,
//! `tomorrow`, `yesterday`, `+N` days and weekday names.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc, Weekday};

use crate::error::{Result, TaskmanError};
use crate::model::timestamp;

fn midnight(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

fn weekday(name: &str) -> Option<Weekday> {
    match name {
        "mon" | "monday" => Some(Weekday::Mon),
        "tue" | "tuesday" => Some(Weekday::Tue),
        "wed" | "wednesday" => Some(Weekday::Wed),
        "thu" | "thursday" => Some(Weekday::Thu),
        "fri" | "friday" => Some(Weekday::Fri),
        "sat" | "saturday" => Some(Weekday::Sat),
        "sun" | "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

pub fn parse_due_date(input: &str) -> Result<DateTime<Utc>> {
    parse_due_date_at(input, Utc::now())
}

/// Resolve `input` relative to `now`. Relative forms land on midnight UTC; a
/// weekday name means its next occurrence after today.
pub fn parse_due_date_at(input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let raw = input.trim().to_lowercase();
    let today = now.date_naive();

    let shift = |days: i64| {
        Duration::try_days(days)
            .and_then(|delta| today.checked_add_signed(delta))
            .ok_or_else(|| invalid(input))
    };

    let day = match raw.as_str() {
        "today" => Some(today),
        "tomorrow" => Some(shift(1)?),
        "yesterday" => Some(shift(-1)?),
        other => {
            if let Some(n) = other.strip_prefix('+') {
                let days: i64 = n.parse().map_err(|_| invalid(input))?;
                Some(shift(days)?)
            } else if let Some(wd) = weekday(other) {
                let ahead = (7 + i64::from(wd.num_days_from_monday())
                    - i64::from(today.weekday().num_days_from_monday()))
                    % 7;
                Some(shift(if ahead == 0 { 7 } else { ahead })?)
            } else {
                None
            }
        }
    };

    match day {
        Some(day) => Ok(midnight(day)),
        None => timestamp::parse(input).ok_or_else(|| invalid(input)),
    }
}

fn invalid(input: &str) -> TaskmanError {
    TaskmanError::validation(format!(
        "invalid date '{input}' (use YYYY-MM-DD, today, tomorrow, +N or a weekday)"
    ))
}

pub fn parse_day(input: &str) -> Result<NaiveDate> {
    parse_due_date(input).map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        // Wednesday afternoon.
        Utc.with_ymd_and_hms(2030, 1, 16, 15, 30, 0).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn relative_words() {
        assert_eq!(parse_due_date_at("today", now()).unwrap(), day(2030, 1, 16));
        assert_eq!(parse_due_date_at("Tomorrow", now()).unwrap(), day(2030, 1, 17));
        assert_eq!(parse_due_date_at("yesterday", now()).unwrap(), day(2030, 1, 15));
        assert_eq!(parse_due_date_at("+10", now()).unwrap(), day(2030, 1, 26));
    }

    #[test]
    fn weekday_is_next_occurrence() {
        assert_eq!(parse_due_date_at("friday", now()).unwrap(), day(2030, 1, 18));
        assert_eq!(parse_due_date_at("mon", now()).unwrap(), day(2030, 1, 21));
        assert_eq!(parse_due_date_at("wednesday", now()).unwrap(), day(2030, 1, 23));
    }

    #[test]
    fn absolute_forms() {
        assert_eq!(parse_due_date_at("2030-02-03", now()).unwrap(), day(2030, 2, 3));
        assert_eq!(
            parse_due_date_at("2030-02-03T10:15", now()).unwrap(),
            Utc.with_ymd_and_hms(2030, 2, 3, 10, 15, 0).unwrap()
        );
        assert_eq!(
            parse_due_date_at("2030-02-03T10:15:00+02:00", now()).unwrap(),
            Utc.with_ymd_and_hms(2030, 2, 3, 8, 15, 0).unwrap()
        );
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["soon", "+x", "2030-13-01", ""] {
            let err = parse_due_date_at(bad, now()).unwrap_err();
            assert_eq!(err.code(), "validation_error");
        }
    }

    #[test]
    fn out_of_range_offsets_are_rejected() {
        for bad in ["+999999999999", "+9223372036854775807"] {
            let err = parse_due_date_at(bad, now()).unwrap_err();
            assert_eq!(err.code(), "validation_error");
        }
        let last_day = midnight(NaiveDate::MAX);
        for bad in ["+1", "tomorrow", "monday"] {
            assert!(parse_due_date_at(bad, last_day).is_err(), "{bad}");
        }
    }
}
