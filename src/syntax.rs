//! Small parsing helpers shared by the cron and systemd grammars: splitting
//! a comma-separated field into its components (each carrying its byte
//! offset within the token for error reporting) and resolving a
//! numeric-or-named token to its field value.

/// Splits `token` on top-level commas, returning each piece together with
/// its byte offset within `token`.
pub(crate) fn split_commas(token: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut start = 0;
    for (i, c) in token.char_indices() {
        if c == ',' {
            out.push((start, &token[start..i]));
            start = i + 1;
        }
    }
    out.push((start, &token[start..]));
    out
}

/// Splits `s` on runs of ASCII whitespace, returning each token together
/// with its byte offset within `s` -- so a caller can report a parse error
/// at its true position in the original source string rather than only
/// within the extracted token.
pub(crate) fn split_whitespace_with_offsets(s: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut start = None;
    for (i, c) in s.char_indices() {
        if c.is_ascii_whitespace() {
            if let Some(b) = start.take() {
                out.push((b, &s[b..i]));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(b) = start {
        out.push((b, &s[b..]));
    }
    out
}

/// Resolves `s` to a field value: a bare integer, or a case-insensitive
/// match against `names`.
pub(crate) fn parse_named_value(s: &str, names: &[(&str, u16)]) -> Option<u16> {
    if let Ok(v) = s.parse::<u16>() {
        return Some(v);
    }
    parse_name_only(s, names)
}

/// Resolves `s` against `names` only, rejecting bare integers -- used for
/// systemd's weekday tokens, whose grammar (spec.md §6) admits weekday
/// names but not numbers, unlike cron's dow field.
pub(crate) fn parse_name_only(s: &str, names: &[(&str, u16)]) -> Option<u16> {
    names
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(s))
        .map(|(_, v)| *v)
}

pub(crate) const MONTH_NAMES: &[(&str, u16)] = &[
    ("jan", 1),
    ("january", 1),
    ("feb", 2),
    ("february", 2),
    ("mar", 3),
    ("march", 3),
    ("apr", 4),
    ("april", 4),
    ("may", 5),
    ("jun", 6),
    ("june", 6),
    ("jul", 7),
    ("july", 7),
    ("aug", 8),
    ("august", 8),
    ("sep", 9),
    ("september", 9),
    ("oct", 10),
    ("october", 10),
    ("nov", 11),
    ("november", 11),
    ("dec", 12),
    ("december", 12),
];

/// Sunday-first (0-6), matching cron's convention; both three-letter and
/// full spellings resolve to the same value, per spec.md §4.1.
pub(crate) const DOW_NAMES: &[(&str, u16)] = &[
    ("sun", 0),
    ("sunday", 0),
    ("mon", 1),
    ("monday", 1),
    ("tue", 2),
    ("tuesday", 2),
    ("wed", 3),
    ("wednesday", 3),
    ("thu", 4),
    ("thursday", 4),
    ("fri", 5),
    ("friday", 5),
    ("sat", 6),
    ("saturday", 6),
];

/// Splits a `token` into `(head, Some(step))` on the first top-level `/`,
/// or `(token, None)` if it has none.
pub(crate) fn split_step(token: &str) -> (&str, Option<&str>) {
    match token.split_once('/') {
        Some((head, step)) => (head, Some(step)),
        None => (token, None),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn split_commas_tracks_offsets() {
        let parts = split_commas("1,2-4,*/5");
        assert_eq!(parts, vec![(0, "1"), (2, "2-4"), (6, "*/5")]);
    }

    #[test]
    fn parse_named_value_accepts_name_or_number() {
        assert_eq!(parse_named_value("7", MONTH_NAMES), Some(7));
        assert_eq!(parse_named_value("Jul", MONTH_NAMES), Some(7));
        assert_eq!(parse_named_value("jul", MONTH_NAMES), Some(7));
        assert_eq!(parse_named_value("nope", MONTH_NAMES), None);
    }

    #[test]
    fn split_whitespace_tracks_offsets() {
        let parts = split_whitespace_with_offsets("*/5  * * * *");
        assert_eq!(
            parts,
            vec![(0, "*/5"), (5, "*"), (7, "*"), (9, "*"), (11, "*")]
        );
    }
}
