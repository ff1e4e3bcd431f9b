//! systemd calendar dialect parser (spec.md §4.3/§6): `[weekdays] [date]
//! [time] [zone]`, or a named shortcut plus an optional trailing zone.
//!
//! Unlike cron, systemd's dom/dow coupling is AND, not OR (spec.md §4.3),
//! so this parser never sets calendar markers — `DomValue::Day`/
//! `DowValue::Day` only — and tags the built [`Expression`] with
//! [`Dialect::Systemd`] so [`crate::engine`] picks the right coupling rule.
//!
//! This parser does not reconstruct systemd's own canonical string form; it
//! only needs to resolve any denormalized input to the same [`Field`]s that
//! parsing the canonical form would produce, since only `next`/`next_n`
//! results need to agree (spec.md §8, "Parser idempotence").

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono_tz::Tz;

use crate::error::ParseError;
use crate::expression::{Dialect, Expression};
use crate::field::{DomField, DomValue, DowField, DowValue, Field};
use crate::syntax::{parse_name_only, split_commas, split_whitespace_with_offsets, DOW_NAMES};

/// Parses a systemd calendar expression into an [`Expression`].
///
/// # Errors
/// Returns [`ParseError`] for a malformed token, an out-of-range value, an
/// inverted `a..b` range, a step `>=` the field's period, or an unrecognized
/// trailing zone name.
pub fn parse(source: &str) -> Result<Expression, ParseError> {
    let trimmed = source.trim();
    let trim_offset = source.len() - source.trim_start().len();
    let raw = split_whitespace_with_offsets(trimmed);
    if raw.is_empty() {
        return Err(ParseError::syntax(source, 0, source));
    }
    let tokens: Vec<&str> = raw.iter().map(|&(_, t)| t).collect();
    let offs: Vec<usize> = raw.iter().map(|&(o, _)| trim_offset + o).collect();

    if let Some(shortcut) = shortcut_fields(tokens[0]) {
        let zone = match tokens.len() {
            1 => None,
            2 => Some(parse_zone(source, offs[1], tokens[1])?),
            _ => return Err(ParseError::syntax(source, offs[2], tokens[2])),
        };
        let (second, minute, hour, dom, month, dow, year) = shortcut;
        return Ok(Expression {
            second,
            minute,
            hour,
            dom,
            month,
            dow,
            year,
            dialect: Dialect::Systemd,
            zone_override: zone,
        });
    }

    let mut idx = 0;
    let dow = if looks_like_weekdays(tokens[0]) {
        idx += 1;
        parse_weekdays(source, offs[0], tokens[0])?
    } else {
        DowField::new(Vec::new(), true)
    };

    let (year, month, dom) = if idx < tokens.len() && tokens[idx].contains('-') {
        let fields = parse_date(source, offs[idx], tokens[idx])?;
        idx += 1;
        fields
    } else {
        (
            Field::new((1970..=2099).collect(), true),
            Field::new((1..=12).collect(), true),
            DomField::new((1..=31u8).map(DomValue::Day).collect(), true),
        )
    };

    let (hour, minute, second) = if idx < tokens.len() && tokens[idx].contains(':') {
        let fields = parse_time(source, offs[idx], tokens[idx])?;
        idx += 1;
        fields
    } else {
        (
            Field::new(BTreeSet::from([0]), false),
            Field::new(BTreeSet::from([0]), false),
            Field::new(BTreeSet::from([0]), false),
        )
    };

    let zone_override = if idx < tokens.len() {
        let z = Some(parse_zone(source, offs[idx], tokens[idx])?);
        idx += 1;
        z
    } else {
        None
    };

    if idx != tokens.len() {
        return Err(ParseError::syntax(source, offs[idx], tokens[idx]));
    }

    Ok(Expression {
        second,
        minute,
        hour,
        dom,
        month,
        dow,
        year,
        dialect: Dialect::Systemd,
        zone_override,
    })
}

type ShortcutFields = (Field, Field, Field, DomField, Field, DowField, Field);

/// Expands a named shortcut (spec.md §4.3) into its seven fields, or `None`
/// if `token` is not a recognized shortcut.
fn shortcut_fields(token: &str) -> Option<ShortcutFields> {
    let any_year = || Field::new((1970..=2099).collect(), true);
    let any_month = || Field::new((1..=12).collect(), true);
    let any_hour = || Field::new((0..=23).collect(), true);
    let any_minute = || Field::new((0..=59).collect(), true);
    let zero = || Field::new(BTreeSet::from([0]), false);
    let day_one = || DomField::new(vec![DomValue::Day(1)], false);
    let any_day = || DomField::new((1..=31u8).map(DomValue::Day).collect(), true);
    let any_dow = || DowField::new(Vec::new(), true);
    let monday = || DowField::new(vec![DowValue::Day(1)], false);

    match token.to_ascii_lowercase().as_str() {
        "minutely" => Some((zero(), any_minute(), any_hour(), any_day(), any_month(), any_dow(), any_year())),
        "hourly" => Some((zero(), zero(), any_hour(), any_day(), any_month(), any_dow(), any_year())),
        "daily" => Some((zero(), zero(), zero(), any_day(), any_month(), any_dow(), any_year())),
        "weekly" => Some((zero(), zero(), zero(), any_day(), any_month(), monday(), any_year())),
        "monthly" => Some((zero(), zero(), zero(), day_one(), any_month(), any_dow(), any_year())),
        "yearly" | "annually" => Some((
            zero(),
            zero(),
            zero(),
            day_one(),
            Field::new(BTreeSet::from([1]), false),
            any_dow(),
            any_year(),
        )),
        "quarterly" => Some((
            zero(),
            zero(),
            zero(),
            day_one(),
            Field::new(BTreeSet::from([1, 4, 7, 10]), false),
            any_dow(),
            any_year(),
        )),
        "semiannually" => Some((
            zero(),
            zero(),
            zero(),
            day_one(),
            Field::new(BTreeSet::from([1, 7]), false),
            any_dow(),
            any_year(),
        )),
        _ => None,
    }
}

fn looks_like_weekdays(token: &str) -> bool {
    let token = token.trim_end_matches(',');
    if token.is_empty() {
        return false;
    }
    split_commas(token).iter().all(|(_, part)| {
        let part = part.trim_end_matches(',');
        if part.is_empty() {
            return true;
        }
        part.split("..")
            .all(|w| parse_name_only(w, DOW_NAMES).is_some())
    })
}

fn parse_weekdays(source: &str, base_offset: usize, token: &str) -> Result<DowField, ParseError> {
    let token = token.trim_end_matches(',');
    let mut values = Vec::new();
    for (offset, part) in split_commas(token) {
        let offset = base_offset + offset;
        let part = part.trim_end_matches(',');
        if part.is_empty() {
            continue;
        }
        if let Some((a, b)) = part.split_once("..") {
            let lo = parse_name_only(a, DOW_NAMES)
                .ok_or_else(|| ParseError::syntax(source, offset, part))?;
            let hi = parse_name_only(b, DOW_NAMES)
                .ok_or_else(|| ParseError::syntax(source, offset, part))?;
            let (lo, hi) = (u8::try_from(lo).unwrap_or(0), u8::try_from(hi).unwrap_or(0));
            let mut d = lo;
            loop {
                values.push(DowValue::Day(d));
                if d == hi {
                    break;
                }
                d = (d + 1) % 7;
            }
        } else {
            let d = parse_name_only(part, DOW_NAMES)
                .ok_or_else(|| ParseError::syntax(source, offset, part))?;
            values.push(DowValue::Day(u8::try_from(d).unwrap_or(0)));
        }
    }
    if values.is_empty() {
        return Err(ParseError::syntax(source, base_offset, token));
    }
    Ok(DowField::new(values, false))
}

/// Splits `token` on top-level occurrences of `sep`, returning each piece
/// with its byte offset within `token` -- the same contract as
/// [`split_commas`], generalized to the `-`/`:` separators `parse_date`/
/// `parse_time` need.
fn split_on(token: &str, sep: char) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut start = 0;
    for (i, c) in token.char_indices() {
        if c == sep {
            out.push((start, &token[start..i]));
            start = i + 1;
        }
    }
    out.push((start, &token[start..]));
    out
}

/// `y-m-d` (or, with the leading year omitted, `m-d`).
fn parse_date(
    source: &str,
    base_offset: usize,
    token: &str,
) -> Result<(Field, Field, DomField), ParseError> {
    let parts = split_on(token, '-');
    let ((yo, y), (mo, m), (d_off, d)) = match parts.as_slice() {
        [y, m, d] => (*y, *m, *d),
        [m, d] => ((0, "*"), *m, *d),
        _ => return Err(ParseError::syntax(source, base_offset, token)),
    };

    let year = parse_numeric_component(source, base_offset + yo, y, 1970, 2099, 130, true)?;
    let month = parse_numeric_component(source, base_offset + mo, m, 1, 12, 12, false)?;
    let day_field = parse_numeric_component(source, base_offset + d_off, d, 1, 31, 31, false)?;
    let dom = DomField::new(
        day_field
            .values()
            .iter()
            .map(|&v| DomValue::Day(u8::try_from(v).unwrap_or(31)))
            .collect(),
        day_field.is_wildcard(),
    );
    Ok((year, month, dom))
}

/// `h:mi[:s]`.
fn parse_time(
    source: &str,
    base_offset: usize,
    token: &str,
) -> Result<(Field, Field, Field), ParseError> {
    let parts = split_on(token, ':');
    let ((ho, h), (mo, mi), (so, s)) = match parts.as_slice() {
        [h, mi, s] => (*h, *mi, *s),
        [h, mi] => (*h, *mi, (mi.0 + mi.1.len() + 1, "00")),
        _ => return Err(ParseError::syntax(source, base_offset, token)),
    };
    let hour = parse_numeric_component(source, base_offset + ho, h, 0, 23, 24, false)?;
    let minute = parse_numeric_component(source, base_offset + mo, mi, 0, 59, 60, false)?;
    let second = parse_numeric_component(source, base_offset + so, s, 0, 59, 60, false)?;
    Ok((hour, minute, second))
}

/// Parses one `*`/number/list/range(`..`)/step(`/`) component shared by the
/// date and time sub-grammars. `base_offset` is the byte offset of `token`
/// within `source`.
fn parse_numeric_component(
    source: &str,
    base_offset: usize,
    token: &str,
    min: u16,
    max: u16,
    period: u16,
    year_expand: bool,
) -> Result<Field, ParseError> {
    let wildcard = token == "*";
    let mut values = BTreeSet::new();
    for (offset, part) in split_commas(token) {
        let offset = base_offset + offset;
        if part.is_empty() {
            continue;
        }
        let (head, step) = match part.split_once('/') {
            Some((h, s)) => (h, Some(s)),
            None => (part, None),
        };
        let step = match step {
            Some(s) => {
                let step: u16 = s
                    .parse()
                    .map_err(|e| crate::error::int_error(source, offset, part, e))?;
                if step == 0 || step >= period {
                    return Err(ParseError::invalid_range(source, offset, part));
                }
                Some(step)
            }
            None => None,
        };

        let (lo, hi) = if head == "*" {
            (min, min + period - 1)
        } else if let Some((a, b)) = head.split_once("..") {
            let lo = parse_component_value(source, offset, a, min, max, year_expand)?;
            let hi = parse_component_value(source, offset, b, min, max, year_expand)?;
            if lo > hi {
                return Err(ParseError::invalid_range(source, offset, part));
            }
            (lo, hi)
        } else {
            let v = parse_component_value(source, offset, head, min, max, year_expand)?;
            // `a/s` with no explicit `..` range steps from `a` through the
            // field's max, e.g. `*:2/3` normalizing to `02/3` meaning
            // minutes 2, 5, 8, ..., 59.
            if step.is_some() {
                (v, min + period - 1)
            } else {
                (v, v)
            }
        };

        let step = step.unwrap_or(1);
        let mut v = lo;
        while v <= hi {
            values.insert(v);
            let Some(next) = v.checked_add(step) else {
                break;
            };
            v = next;
        }
    }
    if values.is_empty() {
        return Err(ParseError::syntax(source, base_offset, token));
    }
    Ok(Field::new(values, wildcard))
}

fn parse_component_value(
    source: &str,
    offset: usize,
    token: &str,
    min: u16,
    max: u16,
    year_expand: bool,
) -> Result<u16, ParseError> {
    let mut v: u16 = token
        .parse()
        .map_err(|e| crate::error::int_error(source, offset, token, e))?;
    if year_expand && token.len() <= 2 {
        v += 2000;
    }
    if v < min || v > max {
        return Err(ParseError::out_of_range(
            source,
            offset,
            token,
            i64::from(min),
            i64::from(max),
        ));
    }
    Ok(v)
}

fn parse_zone(source: &str, offset: usize, token: &str) -> Result<Tz, ParseError> {
    Tz::from_str(token).map_err(|_| ParseError::unknown_zone(source, offset, token))
}
