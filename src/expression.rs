//! The parsed, dialect-tagged schedule and its public-facing methods.
//!
//! [`Expression`] is the common target both [`crate::cron`] and
//! [`crate::systemd`] build into; [`crate::engine`] is the only thing that
//! reads it afterwards. Keeping the two parsers reduce to one shared type
//! is what lets `next`/`next_n` be written once instead of per dialect.

use chrono::DateTime;
use chrono_tz::Tz;

use crate::engine;
use crate::field::{DomField, DowField, Field};

/// Which grammar produced this [`Expression`], governing how the
/// day-of-month and day-of-week fields combine (spec.md §4.2/§4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Classic cron: dom and dow are OR'd together when both are
    /// restricted.
    Cron,
    /// systemd calendar: dom and dow are AND'ed together.
    Systemd,
}

/// A parsed recurring-time expression, ready to compute fire times.
///
/// Construct one with [`crate::parse`], [`crate::parse_cron`], or
/// [`crate::parse_systemd`]; `Expression` itself has no public
/// constructor, since its invariants (field ranges, dialect-appropriate
/// markers) are only enforced by those parsers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    pub(crate) second: Field,
    pub(crate) minute: Field,
    pub(crate) hour: Field,
    pub(crate) dom: DomField,
    pub(crate) month: Field,
    pub(crate) dow: DowField,
    pub(crate) year: Field,
    pub(crate) dialect: Dialect,
    /// An IANA zone named in the expression itself (systemd's trailing
    /// zone suffix). Takes precedence over the zone of the `from` instant
    /// passed to `next`/`next_n`.
    pub(crate) zone_override: Option<Tz>,
}

impl Expression {
    /// Which dialect produced this expression.
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// The zone named by a systemd calendar expression's trailing suffix,
    /// if any. Cron expressions never carry one.
    #[must_use]
    pub const fn zone_override(&self) -> Option<Tz> {
        self.zone_override
    }

    /// The smallest instant strictly after `from` that this expression
    /// matches, reconciled against DST transitions per spec.md §4.5.
    /// `None` only when the year field's admissible values are exhausted.
    #[must_use]
    pub fn next(&self, from: DateTime<Tz>) -> Option<DateTime<Tz>> {
        engine::next(self, from)
    }

    /// The next `n` fire times after `from`, each one feeding the next
    /// call to [`Expression::next`]. Returns fewer than `n` entries if the
    /// year field is exhausted first.
    #[must_use]
    pub fn next_n(&self, from: DateTime<Tz>, n: usize) -> Vec<DateTime<Tz>> {
        engine::next_n(self, from, n)
    }
}
