//! The Next-Fire Engine: given an [`Expression`] and an instant, find the
//! smallest strictly-later instant that satisfies every field.
//!
//! The walk never scans second-by-second across the common case. Each
//! field is advanced by a `BTreeSet`/slice ceiling lookup; day selection
//! loops at most across one month's days (bounded, not a time scan) to
//! resolve the dom/dow coupling and the `L`/`W`/`#` calendar markers.
//!
//! DST reconciliation (spec.md §4.5) wraps [`crate::zone::classify`]. The
//! one case the ordinary civil-time walk cannot see on its own is a
//! fall-back repeated wall-clock moment: the walk always starts its search
//! one second past `from`'s own civil reading, so if `from` is exactly the
//! *earlier* occurrence of an ambiguous moment that the expression matches,
//! the *later* occurrence of that same civil moment — a perfectly valid,
//! strictly-greater-in-absolute-time candidate — would otherwise never be
//! considered, since the walk never revisits a civil second it has already
//! passed. [`next`] checks for that case explicitly and compares it against
//! the ordinary forward walk, returning whichever resolves to the smaller
//! absolute instant. This one rule covers both halves of spec.md §4.5's
//! Ambiguous case (wildcard-hour and specific-hour) without a separate code
//! path for each: a wildcard field's forward walk always lands one tick
//! later in the same occurrence (smaller), while a fully-specific field's
//! forward walk has nowhere to land but the next civil day (larger), so the
//! same "take the smaller of the two" comparison produces the right answer
//! either way.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};
use chrono_tz::Tz;

use crate::expression::{Dialect, Expression};
use crate::zone::{classify, Classification};

/// The smallest instant strictly greater than `from` satisfying `expr`, or
/// `None` if the year domain is exhausted first.
pub fn next(expr: &Expression, from: DateTime<Tz>) -> Option<DateTime<Tz>> {
    let zone = expr.zone_override.unwrap_or_else(|| from.timezone());
    let from_eff = from.with_timezone(&zone);
    let wall0 = from_eff.naive_local();

    let same_wall = fields_match(expr, wall0).then(|| resolve_after(&zone, wall0, from_eff)).flatten();

    let mut wall = (from_eff + Duration::seconds(1)).naive_local();
    let advanced = loop {
        let Some(candidate) = next_field_valid(expr, wall) else {
            break None;
        };
        match classify(&zone, candidate) {
            Classification::Nonexistent(gap_end) => wall = gap_end,
            Classification::Unique(dt) => break Some(dt),
            Classification::Ambiguous(earlier, later) => {
                if earlier > from_eff {
                    break Some(earlier);
                } else if later > from_eff {
                    break Some(later);
                }
                // Every occurrence of this civil moment is already behind
                // `from_eff`; keep walking forward from here.
                wall = candidate + Duration::seconds(1);
            }
        }
    };

    match (same_wall, advanced) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (Some(a), None) | (None, Some(a)) => Some(a),
        (None, None) => None,
    }
}

/// `next`, iterated `n` times. Stops early (returning a shorter `Vec`) as
/// soon as the year domain is exhausted, per spec.md §4.6.
pub fn next_n(expr: &Expression, from: DateTime<Tz>, n: usize) -> Vec<DateTime<Tz>> {
    let mut out = Vec::with_capacity(n);
    let mut cursor = from;
    for _ in 0..n {
        match next(expr, cursor) {
            Some(dt) => {
                out.push(dt);
                cursor = dt;
            }
            None => break,
        }
    }
    out
}

/// Resolves a civil wall time already known to satisfy every field to the
/// smallest absolute instant strictly greater than `from_eff`, or `None` if
/// neither of its occurrence(s) qualifies (both already behind `from_eff`).
fn resolve_after(zone: &Tz, wall: NaiveDateTime, from_eff: DateTime<Tz>) -> Option<DateTime<Tz>> {
    match classify(zone, wall) {
        Classification::Unique(dt) => (dt > from_eff).then_some(dt),
        Classification::Ambiguous(earlier, later) => {
            if earlier > from_eff {
                Some(earlier)
            } else if later > from_eff {
                Some(later)
            } else {
                None
            }
        }
        Classification::Nonexistent(_) => None,
    }
}

/// Does this exact wall-clock moment satisfy every field? Used by [`next`]
/// to check whether `from` itself sits on a civil moment the expression
/// matches; the happy-path walk in [`next_field_valid`] checks the same
/// conditions while also computing the next candidate when they fail.
fn fields_match(expr: &Expression, wall: NaiveDateTime) -> bool {
    let Ok(year) = u16::try_from(wall.year()) else {
        return false;
    };
    let Ok(month) = u16::try_from(wall.month()) else {
        return false;
    };
    let Ok(hour) = u16::try_from(wall.hour()) else {
        return false;
    };
    let Ok(minute) = u16::try_from(wall.minute()) else {
        return false;
    };
    let Ok(second) = u16::try_from(wall.second()) else {
        return false;
    };
    expr.year.contains(year)
        && expr.month.contains(month)
        && day_matches(expr, wall.year(), wall.month(), wall.day())
        && expr.hour.contains(hour)
        && expr.minute.contains(minute)
        && expr.second.contains(second)
}

/// The field-carry walk, ignoring DST: the smallest wall-clock time `>=
/// wall` whose (year, month, day, hour, minute, second) all satisfy `expr`.
fn next_field_valid(expr: &Expression, mut wall: NaiveDateTime) -> Option<NaiveDateTime> {
    loop {
        let year_u16 = u16::try_from(wall.year()).ok()?;
        match expr.year.ceil(year_u16) {
            Some(y) if y == year_u16 => {}
            Some(y) => {
                wall = at(i32::from(y), 1, 1, 0, 0, 0)?;
                continue;
            }
            None => return None,
        }

        let month_u16 = u16::try_from(wall.month()).ok()?;
        match expr.month.ceil(month_u16) {
            Some(m) if u32::from(m) == wall.month() => {}
            Some(m) => {
                wall = at(wall.year(), u32::from(m), 1, 0, 0, 0)?;
                continue;
            }
            None => {
                let next_year_month = expr.month.min()?;
                wall = at(wall.year() + 1, u32::from(next_year_month), 1, 0, 0, 0)?;
                continue;
            }
        }

        match next_valid_day(expr, wall.year(), wall.month(), wall.day()) {
            Some(d) if d == wall.day() => {}
            Some(d) => {
                wall = at(wall.year(), wall.month(), d, 0, 0, 0)?;
                continue;
            }
            None => {
                let (ny, nm) = if wall.month() == 12 {
                    (wall.year() + 1, 1)
                } else {
                    (wall.year(), wall.month() + 1)
                };
                wall = at(ny, nm, 1, 0, 0, 0)?;
                continue;
            }
        }

        let hour_u16 = u16::try_from(wall.hour()).ok()?;
        match expr.hour.ceil(hour_u16) {
            Some(h) if u32::from(h) == wall.hour() => {}
            Some(h) => {
                wall = at(wall.year(), wall.month(), wall.day(), u32::from(h), 0, 0)?;
                continue;
            }
            None => {
                wall = day_after(wall)?;
                continue;
            }
        }

        let minute_u16 = u16::try_from(wall.minute()).ok()?;
        match expr.minute.ceil(minute_u16) {
            Some(mi) if u32::from(mi) == wall.minute() => {}
            Some(mi) => {
                wall = at(
                    wall.year(),
                    wall.month(),
                    wall.day(),
                    wall.hour(),
                    u32::from(mi),
                    0,
                )?;
                continue;
            }
            None => {
                wall = hour_after(wall)?;
                continue;
            }
        }

        let second_u16 = u16::try_from(wall.second()).ok()?;
        match expr.second.ceil(second_u16) {
            Some(s) if u32::from(s) == wall.second() => {}
            Some(s) => {
                wall = at(
                    wall.year(),
                    wall.month(),
                    wall.day(),
                    wall.hour(),
                    wall.minute(),
                    u32::from(s),
                )?;
                continue;
            }
            None => {
                wall = minute_after(wall)?;
                continue;
            }
        }

        return Some(wall);
    }
}

/// Finds the smallest day `>= start_day` in `year`-`month` satisfying the
/// dom/dow coupling (§4.2 for cron's OR rule, §4.3 for systemd's AND rule).
/// Bounded to one month's worth of days — never a scan across years.
fn next_valid_day(expr: &Expression, year: i32, month: u32, start_day: u32) -> Option<u32> {
    let last = crate::field::last_day_of_month(year, month);
    (start_day..=last).find(|&day| day_matches(expr, year, month, day))
}

fn day_matches(expr: &Expression, year: i32, month: u32, day: u32) -> bool {
    let dom_ok = expr.dom.matches(year, month, day);
    let dow_ok = expr.dow.matches(year, month, day);
    match expr.dialect {
        Dialect::Cron => match (expr.dom.is_wildcard(), expr.dow.is_wildcard()) {
            (true, true) => true,
            (true, false) => dow_ok,
            (false, true) => dom_ok,
            (false, false) => dom_ok || dow_ok,
        },
        Dialect::Systemd => dom_ok && dow_ok,
    }
}

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)
}

fn day_after(wall: NaiveDateTime) -> Option<NaiveDateTime> {
    wall.date().succ_opt()?.and_hms_opt(0, 0, 0)
}

fn hour_after(wall: NaiveDateTime) -> Option<NaiveDateTime> {
    if wall.hour() == 23 {
        day_after(wall)
    } else {
        at(wall.year(), wall.month(), wall.day(), wall.hour() + 1, 0, 0)
    }
}

fn minute_after(wall: NaiveDateTime) -> Option<NaiveDateTime> {
    if wall.minute() == 59 {
        hour_after(wall)
    } else {
        at(
            wall.year(),
            wall.month(),
            wall.day(),
            wall.hour(),
            wall.minute() + 1,
            0,
        )
    }
}
