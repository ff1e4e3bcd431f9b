//! Parses cron and systemd calendar expressions and computes next-fire
//! instants, with IANA timezone and DST awareness.
//!
//! Two dialects share one [`Expression`] model and one next-fire search
//! engine: classic cron (`parse_cron`, with the `L`/`W`/`#` calendar
//! extensions) and the systemd calendar syntax (`parse_systemd`). Both
//! produce an [`Expression`] whose [`Expression::next`]/[`Expression::next_n`]
//! walk a civil-time cursor forward, field by field, reconciling the result
//! against DST transitions via [`chrono_tz`].
//!
//! ```
//! use chrono::TimeZone;
//! use chrono_tz::America::Los_Angeles;
//! use recur_expr::parse_cron;
//!
//! let expr = parse_cron("*/5 * * * *").unwrap();
//! let from = Los_Angeles.with_ymd_and_hms(2013, 9, 2, 8, 44, 32).unwrap();
//! let next = expr.next(from).unwrap();
//! assert_eq!(next.to_string(), "2013-09-02 08:45:00 PDT");
//! ```
//!
//! ```
//! use chrono::TimeZone;
//! use chrono_tz::America::Los_Angeles;
//! use recur_expr::parse_systemd;
//!
//! // The last day of February, whenever it falls.
//! let expr = parse_systemd("*-02-29 01:00:00").unwrap();
//! let from = Los_Angeles.with_ymd_and_hms(2019, 1, 4, 0, 0, 0).unwrap();
//! let next = expr.next(from).unwrap();
//! assert_eq!(next.format("%Y-%m-%d").to_string(), "2020-02-29");
//! ```

mod cron;
mod engine;
mod error;
mod expression;
mod field;
mod syntax;
mod systemd;
mod zone;

pub use error::ParseError;
pub use expression::{Dialect, Expression};
pub use zone::Classification;

/// Parses `source` under the given [`Dialect`].
///
/// # Errors
/// See [`parse_cron`] and [`parse_systemd`].
pub fn parse(dialect: Dialect, source: &str) -> Result<Expression, ParseError> {
    match dialect {
        Dialect::Cron => parse_cron(source),
        Dialect::Systemd => parse_systemd(source),
    }
}

/// Parses a classic cron expression: 5, 6, or 7 whitespace-separated
/// fields, or an `@hourly`/`@daily`/... shortcut.
///
/// ```
/// use recur_expr::parse_cron;
/// assert!(parse_cron("*/5 * * * *").is_ok());
/// assert!(parse_cron("0 0 LW * *").is_ok());
/// assert!(parse_cron("@reboot").is_err());
/// ```
///
/// # Errors
/// Returns [`ParseError`] for a malformed token, the wrong field count, an
/// out-of-range value, an inverted range, a step `>=` the field's period, or
/// the unsupported `@reboot` directive.
pub fn parse_cron(source: &str) -> Result<Expression, ParseError> {
    cron::parse(source)
}

/// Parses a systemd calendar expression: `[weekdays] [date] [time] [zone]`,
/// or a named shortcut (`daily`, `weekly`, ...) with an optional trailing
/// zone.
///
/// ```
/// use recur_expr::parse_systemd;
/// assert!(parse_systemd("Mon..Fri 09:00:00").is_ok());
/// assert!(parse_systemd("weekly Pacific/Auckland").is_ok());
/// ```
///
/// # Errors
/// Returns [`ParseError`] for a malformed token, an out-of-range value, an
/// inverted `a..b` range, a step `>=` the field's period, or a trailing zone
/// name that is not a known IANA zone.
pub fn parse_systemd(source: &str) -> Result<Expression, ParseError> {
    systemd::parse(source)
}

/// Parses `source` under the given dialect, panicking on error. Intended
/// for literals and tests, matching spec.md §4.6's `must_parse`.
///
/// # Panics
/// Panics if `source` fails to parse; see [`parse`].
#[must_use]
#[allow(clippy::panic)]
pub fn must_parse(dialect: Dialect, source: &str) -> Expression {
    parse(dialect, source).unwrap_or_else(|e| panic!("must_parse({source:?}): {e}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::UTC;

    #[test]
    fn parse_dispatches_on_dialect() {
        assert!(parse(Dialect::Cron, "* * * * *").is_ok());
        assert!(parse(Dialect::Systemd, "daily").is_ok());
    }

    #[test]
    fn must_parse_panics_on_bad_input() {
        let result = std::panic::catch_unwind(|| must_parse(Dialect::Cron, "not a cron string"));
        assert!(result.is_err());
    }

    #[test]
    fn next_is_strictly_increasing() {
        let expr = must_parse(Dialect::Cron, "*/5 * * * *");
        let from = UTC.with_ymd_and_hms(2013, 9, 2, 8, 44, 32).unwrap();
        let next = expr.next(from).unwrap();
        assert!(next > from);
    }
}
