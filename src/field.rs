//! Field Domain: the per-field "which values are admissible" representation
//! shared by both dialects, plus the calendar-extension markers (`L`, `W`,
//! `#`) that only apply to day-of-month and day-of-week.
//!
//! Tagged variants, not inheritance: a day-of-month value is either a plain
//! day or one of three calendar markers; a day-of-week value is either a
//! plain weekday or one of two calendar markers. Resolving a marker always
//! needs a concrete `(year, month)` — see [`DomField::matches`] and
//! [`DowField::matches`].

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};

/// A plain field: second, minute, hour, month, or year. No calendar markers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Field {
    values: BTreeSet<u16>,
    wildcard: bool,
}

impl Field {
    pub fn new(values: BTreeSet<u16>, wildcard: bool) -> Self {
        Self { values, wildcard }
    }

    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    pub fn values(&self) -> &BTreeSet<u16> {
        &self.values
    }

    /// The smallest admissible value `>= at`, if any.
    pub fn ceil(&self, at: u16) -> Option<u16> {
        self.values.range(at..).next().copied()
    }

    /// The smallest admissible value overall.
    pub fn min(&self) -> Option<u16> {
        self.values.iter().next().copied()
    }

    pub fn contains(&self, value: u16) -> bool {
        self.values.contains(&value)
    }
}

/// A day-of-month value: a plain day or one of the `L`/`W` markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomValue {
    Day(u8),
    /// `L` — the last day of the month.
    LastDay,
    /// `LW` — the last weekday (Mon-Fri) of the month.
    LastWeekday,
    /// `dW` — the weekday nearest day `d`.
    NearestWeekday(u8),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DomField {
    values: Vec<DomValue>,
    wildcard: bool,
}

impl DomField {
    pub fn new(values: Vec<DomValue>, wildcard: bool) -> Self {
        Self { values, wildcard }
    }

    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    #[cfg(test)]
    pub fn values(&self) -> &[DomValue] {
        &self.values
    }

    /// Does `day` (within `year`/`month`) satisfy any value in this field?
    pub fn matches(&self, year: i32, month: u32, day: u32) -> bool {
        self.values
            .iter()
            .any(|value| dom_value_matches(*value, year, month, day))
    }
}

fn dom_value_matches(value: DomValue, year: i32, month: u32, day: u32) -> bool {
    match value {
        DomValue::Day(d) => u32::from(d) == day,
        DomValue::LastDay => day == last_day_of_month(year, month),
        DomValue::LastWeekday => day == last_weekday_of_month(year, month),
        DomValue::NearestWeekday(d) => nearest_weekday(year, month, u32::from(d)) == Some(day),
    }
}

/// A day-of-week value: a plain weekday (0 = Sunday) or one of the `L`/`#`
/// markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DowValue {
    Day(u8),
    /// `wL` — the last occurrence of weekday `w` in the month.
    LastDow(u8),
    /// `w#n` — the `n`-th occurrence of weekday `w` in the month (1-5).
    NthDow(u8, u8),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DowField {
    values: Vec<DowValue>,
    wildcard: bool,
}

impl DowField {
    pub fn new(values: Vec<DowValue>, wildcard: bool) -> Self {
        Self { values, wildcard }
    }

    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    #[cfg(test)]
    pub fn values(&self) -> &[DowValue] {
        &self.values
    }

    /// Does `day` (within `year`/`month`) satisfy any value in this field?
    /// An empty value set (systemd's "no weekday clause") imposes no
    /// constraint and matches every day.
    pub fn matches(&self, year: i32, month: u32, day: u32) -> bool {
        if self.values.is_empty() {
            return true;
        }
        let Some(dow) = weekday_number(year, month, day) else {
            return false;
        };
        self.values
            .iter()
            .any(|value| dow_value_matches(*value, year, month, day, dow))
    }
}

fn dow_value_matches(value: DowValue, year: i32, month: u32, day: u32, dow: u32) -> bool {
    match value {
        DowValue::Day(w) => u32::from(w) == dow,
        DowValue::LastDow(w) => {
            u32::from(w) == dow && day + 7 > last_day_of_month(year, month)
        }
        DowValue::NthDow(w, n) => {
            u32::from(w) == dow && (day - 1) / 7 + 1 == u32::from(n)
        }
    }
}

/// Sunday-first day-of-week number (0-6), matching cron's convention.
pub fn weekday_number(year: i32, month: u32, day: u32) -> Option<u32> {
    NaiveDate::from_ymd_opt(year, month, day).map(|d| d.weekday().num_days_from_sunday())
}

/// Number of days in `year`-`month`, or 0 if the month is invalid.
pub fn last_day_of_month(year: i32, month: u32) -> u32 {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return 0;
    };
    let next_month_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    match next_month_first {
        Some(next) => u32::try_from((next - first).num_days()).unwrap_or(0),
        None => 0,
    }
}

/// The last weekday (Mon-Fri) on or before the last day of `year`-`month`.
pub fn last_weekday_of_month(year: i32, month: u32) -> u32 {
    let last = last_day_of_month(year, month);
    let mut day = last;
    while day > 0 {
        if let Some(dow) = weekday_number(year, month, day) {
            if (1..=5).contains(&dow) {
                return day;
            }
        }
        day -= 1;
    }
    last
}

/// The weekday (Mon-Fri) nearest day `d` within the same month, per the
/// Vixie-cron/Quartz `W` rule: Saturday rolls back to Friday unless that
/// crosses into the previous month (then forward to Monday); Sunday rolls
/// forward to Monday unless that crosses into the next month (then back to
/// Friday).
pub fn nearest_weekday(year: i32, month: u32, d: u32) -> Option<u32> {
    let last = last_day_of_month(year, month);
    if d == 0 || d > last {
        return None;
    }
    let dow = weekday_number(year, month, d)?;
    match dow {
        1..=5 => Some(d),
        6 => {
            // Saturday: prefer the preceding Friday, unless d == 1.
            if d > 1 {
                Some(d - 1)
            } else {
                Some(d + 2).filter(|&nd| nd <= last)
            }
        }
        _ => {
            // Sunday: prefer the following Monday, unless that's next month.
            if d < last {
                Some(d + 1)
            } else {
                Some(d - 2)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn ceil_finds_next_or_none() {
        let field = Field::new(BTreeSet::from([5, 15, 25]), false);
        assert_eq!(field.ceil(0), Some(5));
        assert_eq!(field.ceil(16), Some(25));
        assert_eq!(field.ceil(26), None);
    }

    #[test]
    fn last_day_handles_leap_years() {
        assert_eq!(last_day_of_month(2024, 2), 29);
        assert_eq!(last_day_of_month(2023, 2), 28);
        assert_eq!(last_day_of_month(2023, 4), 30);
    }

    #[test]
    fn last_weekday_skips_weekend() {
        // November 2013: the 30th is a Saturday, so LW -> 29th (Friday).
        assert_eq!(last_weekday_of_month(2013, 11), 29);
        // September 2013: the 30th is a Monday already.
        assert_eq!(last_weekday_of_month(2013, 9), 30);
    }

    #[test]
    fn nearest_weekday_rolls_back_from_saturday() {
        // 2013-09-14 is a Saturday -> nearest weekday is the 13th (Friday).
        assert_eq!(nearest_weekday(2013, 9, 14), Some(13));
    }

    #[test]
    fn nearest_weekday_does_not_cross_month_boundary() {
        // If day 1 is a Saturday, 1W rolls forward to Monday the 3rd, not
        // back into the previous month.
        // 2016-10-01 is a Saturday.
        assert_eq!(nearest_weekday(2016, 10, 1), Some(3));
    }

    #[test]
    fn nth_dow_matches_only_the_nth_occurrence() {
        let field = DowField::new(vec![DowValue::NthDow(6, 5)], false);
        // 2013-11-30 is the fifth Saturday of Q4 2013's only 5-Saturday month.
        assert!(field.matches(2013, 11, 30));
        assert!(!field.matches(2013, 11, 23));
    }

    #[test]
    fn empty_dow_field_imposes_no_constraint() {
        // systemd's "no weekday clause" form: every day matches.
        let field = DowField::new(Vec::new(), true);
        assert!(field.matches(2013, 11, 30));
        assert!(field.matches(2013, 11, 23));
    }
}
