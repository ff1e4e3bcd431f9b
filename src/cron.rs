//! Classic cron dialect parser: 5, 6, or 7 whitespace-separated fields, plus
//! the `@hourly`/`@daily`/... named shortcuts (spec.md §4.2).
//!
//! This is the generalization of the teacher's `parse_field`/`parse`: instead
//! of producing one `BTreeSet<u32>` per call site, [`parse`] builds all seven
//! [`crate::field`] domains at once and folds them into an [`Expression`]
//! tagged [`Dialect::Cron`], so the dom/dow OR coupling (§4.2) is resolved by
//! the engine rather than baked into the field values themselves.

use std::collections::BTreeSet;

use crate::error::ParseError;
use crate::expression::{Dialect, Expression};
use crate::field::{DomField, DomValue, DowField, DowValue, Field};
use crate::syntax::{
    parse_named_value, split_commas, split_step, split_whitespace_with_offsets, DOW_NAMES,
    MONTH_NAMES,
};

/// Parses a cron expression (5, 6, or 7 fields, or an `@` shortcut) into an
/// [`Expression`].
///
/// # Errors
/// Returns [`ParseError`] for a malformed token, wrong field count, an
/// out-of-range value, an inverted range, a step `>=` the field's period, or
/// `@reboot`.
pub fn parse(source: &str) -> Result<Expression, ParseError> {
    let expanded = expand_shortcut(source)?;
    let body = expanded.as_deref().unwrap_or(source);

    let raw: Vec<(usize, &str)> = split_whitespace_with_offsets(body);
    let tokens: Vec<&str> = raw.iter().map(|&(_, t)| t).collect();
    let offs: Vec<usize> = raw.iter().map(|&(o, _)| o).collect();

    // Synthetic fields inserted for the 5/6-field forms (the implicit
    // second or year) never appear in the source text, so they carry
    // offset 0 -- they are always a hardcoded valid literal and can never
    // themselves be the offending token.
    let (fields, field_offs): ([&str; 7], [usize; 7]) = match tokens.len() {
        5 => (
            ["0", tokens[0], tokens[1], tokens[2], tokens[3], tokens[4], "*"],
            [0, offs[0], offs[1], offs[2], offs[3], offs[4], 0],
        ),
        6 => (
            [
                "0", tokens[0], tokens[1], tokens[2], tokens[3], tokens[4], tokens[5],
            ],
            [0, offs[0], offs[1], offs[2], offs[3], offs[4], offs[5]],
        ),
        7 => (
            [
                tokens[0], tokens[1], tokens[2], tokens[3], tokens[4], tokens[5], tokens[6],
            ],
            [
                offs[0], offs[1], offs[2], offs[3], offs[4], offs[5], offs[6],
            ],
        ),
        _ => return Err(ParseError::syntax(source, 0, body)),
    };

    let second = parse_plain_field(source, fields[0], field_offs[0], 0, 59)?;
    let minute = parse_plain_field(source, fields[1], field_offs[1], 0, 59)?;
    let hour = parse_plain_field(source, fields[2], field_offs[2], 0, 23)?;
    let dom = parse_dom_field(source, fields[3], field_offs[3])?;
    let month = parse_named_field(source, fields[4], field_offs[4], 1, 12, MONTH_NAMES)?;
    let dow = parse_dow_field(source, fields[5], field_offs[5])?;
    let year = parse_plain_field(source, fields[6], field_offs[6], 1970, 2099)?;

    Ok(Expression {
        second,
        minute,
        hour,
        dom,
        month,
        dow,
        year,
        dialect: Dialect::Cron,
        zone_override: None,
    })
}

/// Expands a named `@` shortcut to its five/seven-field equivalent. Returns
/// `Ok(None)` when `source` is not a shortcut at all.
fn expand_shortcut(source: &str) -> Result<Option<String>, ParseError> {
    let trimmed = source.trim();
    let expanded = match trimmed {
        "@yearly" | "@annually" => "0 0 1 1 *",
        "@monthly" => "0 0 1 * *",
        "@weekly" => "0 0 * * 0",
        "@daily" | "@midnight" => "0 0 * * *",
        // Seven fields, not six: a six-field string dispatches as
        // `minute hour dom month dow year` (see `parse` above), which would
        // make this `minute=0, hour=0` -- a literal midnight, not hourly.
        // The explicit second/minute/hour/dom/month/dow/year form hits the
        // unambiguous 7-field dispatch instead.
        "@hourly" => "0 0 * * * * *",
        "@reboot" => return Err(ParseError::unsupported_directive(source, 0, "@reboot")),
        other if other.starts_with('@') => {
            return Err(ParseError::syntax(source, 0, other));
        }
        _ => return Ok(None),
    };
    Ok(Some(expanded.to_string()))
}

fn parse_plain_field(
    source: &str,
    token: &str,
    base_offset: usize,
    min: u16,
    max: u16,
) -> Result<Field, ParseError> {
    parse_named_field(source, token, base_offset, min, max, &[])
}

/// Parses a field with no calendar markers, given an optional name table
/// (months, weekdays) in addition to bare integers. `base_offset` is the
/// byte offset of `token` itself within `source`, so errors can point at
/// the true position of the offending character rather than its position
/// within the extracted field.
fn parse_named_field(
    source: &str,
    token: &str,
    base_offset: usize,
    min: u16,
    max: u16,
    names: &[(&str, u16)],
) -> Result<Field, ParseError> {
    let wildcard = token == "*";
    let mut values = BTreeSet::new();
    for (offset, part) in split_commas(token) {
        if part.is_empty() {
            continue;
        }
        add_range(source, base_offset + offset, part, min, max, names, &mut values)?;
    }
    if values.is_empty() {
        return Err(ParseError::syntax(source, base_offset, token));
    }
    Ok(Field::new(values, wildcard))
}

/// Resolves one comma-separated component (`*`, `*/s`, `a`, `a-b`, `a-b/s`,
/// `a/s`) into the value set, appending the byte `offset` of `part` within
/// the enclosing field for error reporting.
fn add_range(
    source: &str,
    offset: usize,
    part: &str,
    min: u16,
    max: u16,
    names: &[(&str, u16)],
    values: &mut BTreeSet<u16>,
) -> Result<(), ParseError> {
    add_range_with_period(source, offset, part, min, max, max - min + 1, names, values)
}

/// Like [`add_range`], but with the field's natural period given explicitly
/// rather than derived from `max - min + 1`. Needed for day-of-week, whose
/// native period is 7 even though `7` is accepted as an alias for `0`
/// (making the accepted range `0..=7`, one wider than the period).
fn add_range_with_period(
    source: &str,
    offset: usize,
    part: &str,
    min: u16,
    max: u16,
    period: u16,
    names: &[(&str, u16)],
    values: &mut BTreeSet<u16>,
) -> Result<(), ParseError> {
    let (head, step) = split_step(part);
    let step = match step {
        Some(s) => Some(parse_step(source, offset, part, s, period)?),
        None => None,
    };

    let (lo, hi) = if head == "*" {
        (min, min + period - 1)
    } else if let Some((a, b)) = head.split_once('-') {
        let lo = parse_token_value(source, offset, a, min, max, names)?;
        let hi = parse_token_value(source, offset, b, min, max, names)?;
        if lo > hi {
            return Err(ParseError::invalid_range(source, offset, part));
        }
        (lo, hi)
    } else {
        let v = parse_token_value(source, offset, head, min, max, names)?;
        // `a/s` with no explicit range steps from `a` through the field's
        // natural max (e.g. cron's `1/6` on minutes means 1,7,13,...,55),
        // unlike a bare `a` which is just that one value. `min + period - 1`
        // rather than `max` itself, since day-of-week's accepted `max` (7,
        // the Sunday alias) is one past its natural period (7 values, 0-6).
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
    Ok(())
}

fn parse_step(
    source: &str,
    offset: usize,
    part: &str,
    s: &str,
    period: u16,
) -> Result<u16, ParseError> {
    let step: u16 = s
        .parse()
        .map_err(|e| crate::error::int_error(source, offset, part, e))?;
    if step == 0 || step >= period {
        return Err(ParseError::invalid_range(source, offset, part));
    }
    Ok(step)
}

fn parse_token_value(
    source: &str,
    offset: usize,
    token: &str,
    min: u16,
    max: u16,
    names: &[(&str, u16)],
) -> Result<u16, ParseError> {
    let v = parse_named_value(token, names)
        .ok_or_else(|| ParseError::syntax(source, offset, token))?;
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

fn parse_dom_field(source: &str, token: &str, base_offset: usize) -> Result<DomField, ParseError> {
    let wildcard = token == "*";
    let mut values = Vec::new();
    for (offset, part) in split_commas(token) {
        if part.is_empty() {
            continue;
        }
        let offset = base_offset + offset;
        if let Some(v) = parse_dom_marker(source, offset, part)? {
            values.push(v);
            continue;
        }
        let mut set = BTreeSet::new();
        add_range(source, offset, part, 1, 31, &[], &mut set)?;
        values.extend(
            set.into_iter()
                .map(|d| DomValue::Day(u8::try_from(d).unwrap_or(31))),
        );
    }
    if values.is_empty() {
        return Err(ParseError::syntax(source, base_offset, token));
    }
    Ok(DomField::new(values, wildcard))
}

fn parse_dom_marker(
    source: &str,
    offset: usize,
    part: &str,
) -> Result<Option<DomValue>, ParseError> {
    if part.eq_ignore_ascii_case("L") {
        return Ok(Some(DomValue::LastDay));
    }
    if part.eq_ignore_ascii_case("LW") || part.eq_ignore_ascii_case("WL") {
        return Ok(Some(DomValue::LastWeekday));
    }
    if let Some(day) = part.strip_suffix(['W', 'w']) {
        let d: u8 = day
            .parse()
            .map_err(|e| crate::error::int_error(source, offset, part, e))?;
        if !(1..=31).contains(&d) {
            return Err(ParseError::out_of_range(source, offset, part, 1, 31));
        }
        return Ok(Some(DomValue::NearestWeekday(d)));
    }
    Ok(None)
}

fn parse_dow_field(source: &str, token: &str, base_offset: usize) -> Result<DowField, ParseError> {
    let wildcard = token == "*";
    let mut values = Vec::new();
    for (offset, part) in split_commas(token) {
        if part.is_empty() {
            continue;
        }
        let offset = base_offset + offset;
        if let Some(v) = parse_dow_marker(source, offset, part)? {
            values.push(v);
            continue;
        }
        let mut set = BTreeSet::new();
        add_range_with_period(source, offset, part, 0, 7, 7, DOW_NAMES, &mut set)?;
        for d in set {
            let d = if d == 7 { 0 } else { d };
            values.push(DowValue::Day(u8::try_from(d).unwrap_or(0)));
        }
    }
    if values.is_empty() {
        return Err(ParseError::syntax(source, base_offset, token));
    }
    Ok(DowField::new(values, wildcard))
}

fn parse_dow_marker(
    source: &str,
    offset: usize,
    part: &str,
) -> Result<Option<DowValue>, ParseError> {
    if let Some((w, n)) = part.split_once('#') {
        let dow = parse_marker_dow(source, offset, part, w)?;
        let n: u8 = n
            .parse()
            .map_err(|e| crate::error::int_error(source, offset, part, e))?;
        if !(1..=5).contains(&n) {
            return Err(ParseError::out_of_range(source, offset, part, 1, 5));
        }
        return Ok(Some(DowValue::NthDow(dow, n)));
    }
    if let Some(w) = part.strip_suffix(['L', 'l']) {
        if w.is_empty() {
            return Ok(None);
        }
        let dow = parse_marker_dow(source, offset, part, w)?;
        return Ok(Some(DowValue::LastDow(dow)));
    }
    Ok(None)
}

/// Resolves the weekday half of a `w#n`/`wL` marker, validating it against
/// the same `0..=7` range (7 aliased to Sunday) as a plain dow value.
fn parse_marker_dow(source: &str, offset: usize, part: &str, w: &str) -> Result<u8, ParseError> {
    let dow = parse_named_value(w, DOW_NAMES).ok_or_else(|| ParseError::syntax(source, offset, part))?;
    if dow > 7 {
        return Err(ParseError::out_of_range(source, offset, part, 0, 7));
    }
    let dow = if dow == 7 { 0 } else { dow };
    Ok(u8::try_from(dow).unwrap_or(0))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn five_fields_default_second_and_year() {
        let expr = parse("*/5 * * * *").unwrap();
        assert!(expr.second.contains(0) && expr.second.values().len() == 1);
        assert_eq!(expr.year.min(), Some(1970));
        assert_eq!(expr.year.values().iter().next_back(), Some(&2099));
    }

    #[test]
    fn shortcuts_expand() {
        let hourly = parse("@hourly").unwrap();
        assert_eq!(hourly.minute.min(), Some(0));
        assert_eq!(hourly.second.min(), Some(0));
        // `min() == Some(0)` alone can't distinguish a wildcard hour from a
        // literal `hour=0`, since 0 is the smallest element of both sets --
        // pin the actual wildcard-ness that makes this fire hourly, not daily.
        assert!(hourly.hour.is_wildcard());
        assert_eq!(hourly.hour.values().len(), 24);

        let weekly = parse("@weekly").unwrap();
        assert!(weekly.dow.values().iter().any(|v| matches!(v, DowValue::Day(0))));
    }

    #[test]
    fn reboot_is_rejected() {
        assert!(matches!(
            parse("@reboot"),
            Err(ParseError::UnsupportedDirective { .. })
        ));
    }

    #[test]
    fn step_ge_period_is_invalid_range() {
        assert!(matches!(
            parse("*/60 * * * * *"),
            Err(ParseError::InvalidRange { .. })
        ));
        assert!(matches!(
            parse("2-20/61 * * * * *"),
            Err(ParseError::InvalidRange { .. })
        ));
    }

    #[test]
    fn inverted_range_errors() {
        assert!(matches!(
            parse("* 8-5 * * *"),
            Err(ParseError::InvalidRange { .. })
        ));
    }

    #[test]
    fn dow_names_and_seven_as_sunday() {
        let expr = parse("0 0 * * Fri").unwrap();
        assert!(expr.dow.values().iter().any(|v| matches!(v, DowValue::Day(5))));
        let expr = parse("0 0 * * 7").unwrap();
        assert!(expr.dow.values().iter().any(|v| matches!(v, DowValue::Day(0))));
    }

    #[test]
    fn calendar_markers_parse() {
        let expr = parse("0 0 L * *").unwrap();
        assert!(matches!(expr.dom.values()[0], DomValue::LastDay));

        let expr = parse("0 0 14W * *").unwrap();
        assert!(matches!(expr.dom.values()[0], DomValue::NearestWeekday(14)));

        let expr = parse("0 0 * * 6#5").unwrap();
        assert!(matches!(expr.dow.values()[0], DowValue::NthDow(6, 5)));
    }

    #[test]
    fn marker_dow_out_of_range_is_rejected() {
        assert!(matches!(
            parse("0 0 * * 9#1"),
            Err(ParseError::OutOfRange { .. })
        ));
        assert!(matches!(
            parse("0 0 * * 8L"),
            Err(ParseError::OutOfRange { .. })
        ));
    }

    #[test]
    fn wrong_field_count_is_syntax_error() {
        assert!(matches!(parse("*/5 * * *"), Err(ParseError::Syntax { .. })));
        assert!(matches!(
            parse("* * * * * * * *"),
            Err(ParseError::Syntax { .. })
        ));
    }

    #[test]
    fn empty_comma_parts_are_tolerated() {
        assert!(parse("2-3,9,*/15,1-8,11,9,4,5,,,, * * * *").is_ok());
    }
}
