use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, Duration,
    OffsetDateTime, Time, UtcOffset,
};

use crate::error::AppError;

/// Calendar day of `ts` as seen from `offset`.
pub fn day_of(ts: OffsetDateTime, offset: UtcOffset) -> Date {
    ts.to_offset(offset).date()
}

pub fn today(offset: UtcOffset) -> Date {
    day_of(OffsetDateTime::now_utc(), offset)
}

pub fn start_of_day(date: Date, offset: UtcOffset) -> OffsetDateTime {
    date.midnight().assume_offset(offset)
}

/// Half-open timestamp bounds `[start 00:00, end + 1 day 00:00)` covering
/// every instant whose calendar day lies in `[start, end]`.
pub fn day_range_bounds(
    start: Date,
    end: Date,
    offset: UtcOffset,
) -> (OffsetDateTime, OffsetDateTime) {
    let from = start_of_day(start, offset);
    let to = match end.next_day() {
        Some(next) => start_of_day(next, offset),
        None => end
            .with_time(Time::from_hms(23, 59, 59).unwrap_or(Time::MIDNIGHT))
            .assume_offset(offset),
    };
    (from, to)
}

pub fn month_start(date: Date) -> Date {
    date.replace_day(1).unwrap_or(date)
}

/// First day of a window of `days` calendar days ending on `end` (inclusive).
pub fn window_start(end: Date, days: u16) -> Date {
    let back = i64::from(days.saturating_sub(1));
    end.checked_sub(Duration::days(back)).unwrap_or(Date::MIN)
}

/// Every calendar day in `[start, end]`, ascending.
pub fn days_between(start: Date, end: Date) -> impl Iterator<Item = Date> {
    std::iter::successors(Some(start), |d| d.next_day()).take_while(move |d| *d <= end)
}

pub fn format_day(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

pub fn parse_iso_day(raw: &str) -> Result<Date, time::error::Parse> {
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
}

/// Accepts either `YYYY-MM-DD` or a full RFC 3339 timestamp; timestamps are
/// reduced to their calendar day in `offset`.
pub fn parse_day(raw: &str, offset: UtcOffset) -> Result<Date, AppError> {
    let raw = raw.trim();
    if let Ok(date) = parse_iso_day(raw) {
        return Ok(date);
    }
    OffsetDateTime::parse(raw, &Rfc3339)
        .map(|ts| day_of(ts, offset))
        .map_err(|_| AppError::Validation(format!("invalid date: {raw}")))
}

// Serde adapter for `YYYY-MM-DD` day keys.
time::serde::format_description!(pub iso_date, Date, "[year]-[month]-[day]");
