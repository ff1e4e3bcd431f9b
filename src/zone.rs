//! Time-Zone Adapter: a thin wrapper over `chrono`'s own zone resolution
//! that restores the three-way distinction spec.md §9 requires (`Unique`,
//! `Ambiguous`, `Nonexistent`) — `chrono::LocalResult::None` alone does not
//! carry the "when does the gap end" information the DST reconciliation
//! rules in spec.md §4.5 need, so this module adds it via a bounded forward
//! probe.
//!
//! The engine consults this module read-only; it is pure, allocates no
//! shared state, and is safe to call from any thread (spec.md §5).

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

/// The three-way classification of a civil (wall-clock) time under a zone.
pub enum Classification {
    /// The wall time corresponds to exactly one instant.
    Unique(DateTime<Tz>),
    /// The wall time occurs twice, in a fall-back repeated window. The
    /// first field is the earlier occurrence, the second the later one.
    Ambiguous(DateTime<Tz>, DateTime<Tz>),
    /// The wall time never occurs, in a spring-forward gap. The field is
    /// the first wall-clock time after the gap closes.
    Nonexistent(NaiveDateTime),
}

/// How far to probe forward, in one-minute steps, looking for the end of a
/// spring-forward gap. The longest real-world DST gap is one hour; this
/// gives ample margin without risking an unbounded scan.
const GAP_PROBE_MINUTES: i64 = 4 * 60;

/// Classify `wall` (a naive, zone-less civil time) under `zone`.
pub fn classify(zone: &Tz, wall: NaiveDateTime) -> Classification {
    match zone.from_local_datetime(&wall) {
        LocalResult::Single(dt) => Classification::Unique(dt),
        LocalResult::Ambiguous(earlier, later) => Classification::Ambiguous(earlier, later),
        LocalResult::None => {
            let mut probe = wall;
            for _ in 0..GAP_PROBE_MINUTES {
                probe += Duration::minutes(1);
                if let LocalResult::Single(_) | LocalResult::Ambiguous(_, _) =
                    zone.from_local_datetime(&probe)
                {
                    return Classification::Nonexistent(probe);
                }
            }
            // No real IANA zone has a gap this long; fall back to the probe
            // bound itself rather than looping forever.
            Classification::Nonexistent(probe)
        }
    }
}
