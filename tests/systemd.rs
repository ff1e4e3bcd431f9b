//! Systemd-specific integration tests: the AND dom/dow coupling (as opposed
//! to cron's OR), shortcuts, zone suffixes, and two-digit year expansion,
//! each exercised through `next`/`next_n` rather than internal field state.

#![allow(clippy::unwrap_used)]

use chrono::TimeZone;
use chrono_tz::{Tz, UTC};
use recur_expr::{parse_cron, parse_systemd, ParseError};

#[test]
fn dom_and_dow_are_anded_unlike_cron() {
    // The 15th of the month, but only when it's also a Monday: systemd ANDs
    // the two fields, so a non-Monday 15th is skipped entirely.
    let expr = parse_systemd("Mon *-*-15 00:00:00").unwrap();
    let from = UTC.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    let next = expr.next(from).unwrap();
    assert_eq!(next.format("%Y-%m-%d").to_string(), "2020-06-15");
    assert_eq!(next.format("%A").to_string(), "Monday");

    // The same two restrictions under cron OR together: every 15th, plus
    // every Monday.
    let cron_expr = parse_cron("0 0 15 * 1").unwrap();
    let cron_next = cron_expr.next(from).unwrap();
    assert_eq!(cron_next.format("%Y-%m-%d").to_string(), "2020-01-06");
}

#[test]
fn shortcut_weekly_fires_monday_midnight() {
    let expr = parse_systemd("weekly").unwrap();
    let from = UTC.with_ymd_and_hms(2020, 1, 1, 12, 0, 0).unwrap();
    let next = expr.next(from).unwrap();
    assert_eq!(next.format("%Y-%m-%d %H:%M:%S %A").to_string(), "2020-01-06 00:00:00 Monday");
}

#[test]
fn shortcut_quarterly_fires_first_of_quarter() {
    let expr = parse_systemd("quarterly").unwrap();
    let from = UTC.with_ymd_and_hms(2020, 2, 1, 0, 0, 0).unwrap();
    let next_three = expr.next_n(from, 3);
    let got: Vec<String> = next_three
        .iter()
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .collect();
    assert_eq!(got, vec!["2020-04-01", "2020-07-01", "2020-10-01"]);
}

#[test]
fn two_digit_year_expansion_in_a_schedule() {
    let expr = parse_systemd("24-06-15 00:00:00").unwrap();
    let from = UTC.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    let next = expr.next(from).unwrap();
    assert_eq!(next.format("%Y-%m-%d").to_string(), "2024-06-15");
}

#[test]
fn zone_suffix_is_evaluated_in_the_named_zone() {
    let expr = parse_systemd("daily Pacific/Auckland").unwrap();
    let from: chrono::DateTime<Tz> = UTC.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    let next = expr.next(from).unwrap();
    assert_eq!(next.format("%Z").to_string(), "+13");
}

#[test]
fn unknown_zone_suffix_errors_at_parse_time() {
    assert!(matches!(
        parse_systemd("daily Mars/OlympusMons"),
        Err(ParseError::UnknownZone { .. })
    ));
}

#[test]
fn omitted_time_defaults_to_midnight() {
    let expr = parse_systemd("*-*-01").unwrap();
    let from = UTC.with_ymd_and_hms(2020, 1, 15, 12, 0, 0).unwrap();
    let next = expr.next(from).unwrap();
    assert_eq!(next.format("%Y-%m-%d %H:%M:%S").to_string(), "2020-02-01 00:00:00");
}
