//! Structured parse errors.
//!
//! `next`/`next_n` never fail (see [`crate::Expression::next`]) — every
//! fallible operation in this crate happens at parse time, and every error
//! carries the source string, the offending substring, and its byte offset
//! so a caller can build a compiler-style diagnostic.

use std::fmt;
use std::num::ParseIntError;

/// A parse error produced by [`crate::parse_cron`] or [`crate::parse_systemd`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Malformed token, wrong field count, or unknown name.
    Syntax {
        source: String,
        offset: usize,
        found: String,
    },
    /// A value fell outside the field's native range.
    OutOfRange {
        source: String,
        offset: usize,
        found: String,
        min: i64,
        max: i64,
    },
    /// An inverted `a-b` range, or a step `>=` the field's period.
    InvalidRange {
        source: String,
        offset: usize,
        found: String,
    },
    /// `@reboot` or another directive this crate does not schedule.
    UnsupportedDirective {
        source: String,
        offset: usize,
        found: String,
    },
    /// The systemd zone suffix did not name a known IANA zone.
    UnknownZone {
        source: String,
        offset: usize,
        zone: String,
    },
}

impl ParseError {
    pub(crate) fn syntax(source: &str, offset: usize, found: impl Into<String>) -> Self {
        Self::Syntax {
            source: source.into(),
            offset,
            found: found.into(),
        }
    }

    pub(crate) fn out_of_range(
        source: &str,
        offset: usize,
        found: impl Into<String>,
        min: i64,
        max: i64,
    ) -> Self {
        Self::OutOfRange {
            source: source.into(),
            offset,
            found: found.into(),
            min,
            max,
        }
    }

    pub(crate) fn invalid_range(source: &str, offset: usize, found: impl Into<String>) -> Self {
        Self::InvalidRange {
            source: source.into(),
            offset,
            found: found.into(),
        }
    }

    pub(crate) fn unsupported_directive(
        source: &str,
        offset: usize,
        found: impl Into<String>,
    ) -> Self {
        Self::UnsupportedDirective {
            source: source.into(),
            offset,
            found: found.into(),
        }
    }

    pub(crate) fn unknown_zone(source: &str, offset: usize, zone: impl Into<String>) -> Self {
        Self::UnknownZone {
            source: source.into(),
            offset,
            zone: zone.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax {
                source,
                offset,
                found,
            } => write!(
                f,
                "{source}: unexpected token '{found}' at byte {offset}"
            ),
            Self::OutOfRange {
                source,
                offset,
                found,
                min,
                max,
            } => write!(
                f,
                "{source}: value '{found}' at byte {offset} is out of range {min}-{max}"
            ),
            Self::InvalidRange {
                source,
                offset,
                found,
            } => write!(
                f,
                "{source}: invalid range '{found}' at byte {offset}"
            ),
            Self::UnsupportedDirective {
                source,
                offset,
                found,
            } => write!(
                f,
                "{source}: unsupported directive '{found}' at byte {offset}"
            ),
            Self::UnknownZone {
                source,
                offset,
                zone,
            } => write!(
                f,
                "{source}: unknown timezone '{zone}' at byte {offset}"
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// Wraps a failed integer parse with the context needed to build a
/// [`ParseError::Syntax`] at the call site; kept as a free function (rather
/// than a `From` impl) because every call site already knows the byte
/// offset and the `ParseIntError` alone does not carry it.
pub(crate) fn int_error(source: &str, offset: usize, found: &str, _err: ParseIntError) -> ParseError {
    ParseError::syntax(source, offset, found)
}
