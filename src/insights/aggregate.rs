use std::collections::BTreeMap;

use serde::Serialize;
use time::{Date, OffsetDateTime, UtcOffset};

use crate::dates;

/// Anything with a timestamp and a calorie count can be summed per day.
pub trait Logged {
    fn logged_at(&self) -> OffsetDateTime;
    fn calories(&self) -> u32;
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct DailyTotal {
    #[serde(with = "crate::dates::iso_date")]
    pub date: Date,
    pub calories: u32,
}

/// Sum of calories per calendar day (in `offset`), keyed by day.
///
/// A day appears in the map as soon as one entry falls on it, even if that
/// entry carries zero calories.
pub fn totals_by_day<'a, E, I>(entries: I, offset: UtcOffset) -> BTreeMap<Date, u32>
where
    E: Logged + 'a,
    I: IntoIterator<Item = &'a E>,
{
    let mut totals = BTreeMap::new();
    for entry in entries {
        let day = dates::day_of(entry.logged_at(), offset);
        let sum: &mut u32 = totals.entry(day).or_default();
        *sum = sum.saturating_add(entry.calories());
    }
    totals
}

/// Per-day totals for the days in `[start, end]` that have at least one
/// entry, ascending by date. Days without entries are not emitted; see
/// [`pad_days`].
pub fn daily_totals<'a, E, I>(
    entries: I,
    start: Date,
    end: Date,
    offset: UtcOffset,
) -> Vec<DailyTotal>
where
    E: Logged + 'a,
    I: IntoIterator<Item = &'a E>,
{
    totals_by_day(entries, offset)
        .range(start..=end)
        .map(|(date, calories)| DailyTotal {
            date: *date,
            calories: *calories,
        })
        .collect()
}

/// One point per calendar day in `[start, end]`, zero where `totals` has none.
pub fn pad_days(totals: &[DailyTotal], start: Date, end: Date) -> Vec<DailyTotal> {
    let observed: BTreeMap<Date, u32> = totals.iter().map(|t| (t.date, t.calories)).collect();
    dates::days_between(start, end)
        .map(|date| DailyTotal {
            date,
            calories: observed.get(&date).copied().unwrap_or(0),
        })
        .collect()
}

pub fn grand_total(totals: &[DailyTotal]) -> u32 {
    totals
        .iter()
        .fold(0u32, |acc, t| acc.saturating_add(t.calories))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime, offset};

    struct Item(OffsetDateTime, u32);

    impl Logged for Item {
        fn logged_at(&self) -> OffsetDateTime {
            self.0
        }
        fn calories(&self) -> u32 {
            self.1
        }
    }

    fn sample() -> Vec<Item> {
        vec![
            Item(datetime!(2026-10-09 08:00 UTC), 400),
            Item(datetime!(2026-10-09 19:30 UTC), 650),
            Item(datetime!(2026-10-11 12:00 UTC), 0),
            Item(datetime!(2026-10-12 23:59:59 UTC), 300),
            Item(datetime!(2026-10-13 00:00 UTC), 200),
            Item(datetime!(2026-10-20 09:00 UTC), 999),
        ]
    }

    #[test]
    fn groups_and_sums_inside_window() {
        let entries = sample();
        let totals = daily_totals(&entries, date!(2026 - 10 - 09), date!(2026 - 10 - 15), offset!(UTC));
        assert_eq!(
            totals,
            vec![
                DailyTotal { date: date!(2026 - 10 - 09), calories: 1050 },
                DailyTotal { date: date!(2026 - 10 - 11), calories: 0 },
                DailyTotal { date: date!(2026 - 10 - 12), calories: 300 },
                DailyTotal { date: date!(2026 - 10 - 13), calories: 200 },
            ]
        );
    }

    #[test]
    fn calendar_day_depends_on_offset() {
        let entries = sample();
        let totals = daily_totals(&entries, date!(2026 - 10 - 12), date!(2026 - 10 - 13), offset!(+1));
        // 23:59:59 UTC on the 12th is already the 13th at +01:00
        assert_eq!(
            totals,
            vec![DailyTotal { date: date!(2026 - 10 - 13), calories: 500 }]
        );
    }

    #[test]
    fn padding_fills_every_day() {
        let entries = sample();
        let start = date!(2026 - 10 - 09);
        let end = date!(2026 - 10 - 15);
        let padded = pad_days(&daily_totals(&entries, start, end, offset!(UTC)), start, end);
        assert_eq!(padded.len(), 7);
        assert_eq!(padded[0].calories, 1050);
        assert_eq!(padded[1], DailyTotal { date: date!(2026 - 10 - 10), calories: 0 });
        assert_eq!(padded[6].date, end);
        assert!(padded.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn partitioned_sum_matches_whole() {
        let entries = sample();
        let whole = grand_total(&daily_totals(&entries, date!(2026 - 10 - 01), date!(2026 - 10 - 31), offset!(UTC)));

        let per_day: u32 = dates::days_between(date!(2026 - 10 - 01), date!(2026 - 10 - 31))
            .map(|d| grand_total(&daily_totals(&entries, d, d, offset!(UTC))))
            .sum();

        assert_eq!(whole, per_day);
        assert_eq!(whole, entries.iter().map(|e| e.1).sum::<u32>());
    }

    #[test]
    fn repeated_calls_agree() {
        let entries = sample();
        let a = totals_by_day(&entries, offset!(UTC));
        let b = totals_by_day(&entries, offset!(UTC));
        assert_eq!(a, b);
    }

    #[test]
    fn serializes_iso_day_keys() {
        let json = serde_json::to_value(DailyTotal { date: date!(2026 - 10 - 09), calories: 5 }).unwrap();
        assert_eq!(json, serde_json::json!({ "date": "2026-10-09", "calories": 5 }));
    }
}
