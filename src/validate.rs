//! # Line Validation
//!
//! The single source of truth for accepting personalization text.
//!
//! Lines are checked in order and validation stops at the first failure:
//!
//! 1. Case-fold to upper and trim surrounding whitespace.
//! 2. Refuse an empty line.
//! 3. Refuse a line longer than the effective column count.
//! 4. Refuse a line containing a character outside the allow-list.
//!
//! ```
//! use pavers::validate::validate_lines;
//! use pavers::error::Rejection;
//!
//! let lines = validate_lines(2, 15, &["  in memory of ", "mom & dad"]).unwrap();
//! assert_eq!(lines[0].as_str(), "IN MEMORY OF");
//!
//! let err = validate_lines(2, 15, &["ok", "a<b"]).unwrap_err();
//! assert_eq!(err, Rejection::DisallowedCharacter(2));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::charset;
use crate::error::Rejection;

/// One accepted line: upper-case, trimmed, within width, allow-listed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineValue(String);

impl LineValue {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Width in characters.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for LineValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LineValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validate one line. `index` is 1-based and only used for the rejection.
pub fn validate_line(index: usize, columns: usize, raw: &str) -> Result<LineValue, Rejection> {
    let folded = charset::fold(raw);
    let value = folded.trim();

    if value.is_empty() {
        return Err(Rejection::EmptyLine(index));
    }
    if value.chars().count() > columns {
        return Err(Rejection::LineTooLong {
            index,
            max: columns,
        });
    }
    if !value.chars().all(charset::is_allowed) {
        return Err(Rejection::DisallowedCharacter(index));
    }

    Ok(LineValue(value.to_string()))
}

/// Validate `required_lines` candidate lines against `columns`.
///
/// `raw[i]` is the candidate for line `i + 1`. Missing candidates count as
/// empty lines; candidates beyond `required_lines` are ignored.
pub fn validate_lines<S: AsRef<str>>(
    required_lines: usize,
    columns: usize,
    raw: &[S],
) -> Result<Vec<LineValue>, Rejection> {
    (1..=required_lines)
        .map(|index| {
            let candidate = raw.get(index - 1).map(AsRef::as_ref).unwrap_or("");
            validate_line(index, columns, candidate)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn texts(lines: &[LineValue]) -> Vec<&str> {
        lines.iter().map(LineValue::as_str).collect()
    }

    #[test]
    fn test_missing_third_line() {
        assert_eq!(
            validate_lines(3, 15, &["JOHN SMITH", "1950-2020"]),
            Err(Rejection::EmptyLine(3))
        );
        assert_eq!(
            validate_lines(3, 15, &["JOHN SMITH", "1950-2020", "   "]),
            Err(Rejection::EmptyLine(3))
        );
    }

    #[test]
    fn test_width_boundary() {
        let fifteen = "ABCDEFGHIJKLMNO";
        let sixteen = "ABCDEFGHIJKLMNOP";
        assert!(validate_lines(1, 15, &[fifteen]).is_ok());
        assert_eq!(
            validate_lines(2, 15, &[fifteen, sixteen]),
            Err(Rejection::LineTooLong { index: 2, max: 15 })
        );
    }

    #[test]
    fn test_disallowed_character() {
        assert_eq!(
            validate_lines(1, 15, &["ABC<D"]),
            Err(Rejection::DisallowedCharacter(1))
        );
        assert_eq!(texts(&validate_lines(1, 15, &["ABC&D"]).unwrap()), ["ABC&D"]);
    }

    #[test]
    fn test_multi_char_upper_case_is_refused() {
        assert_eq!(
            validate_lines(1, 15, &["straße"]),
            Err(Rejection::DisallowedCharacter(1))
        );
        assert_eq!(
            validate_lines(1, 15, &["ﬁne"]),
            Err(Rejection::DisallowedCharacter(1))
        );
        // Counted as eight characters, so the width check passes first.
        assert_eq!(
            validate_lines(1, 15, &["ßßßßßßßß"]),
            Err(Rejection::DisallowedCharacter(1))
        );
    }

    #[test]
    fn test_first_failure_wins() {
        // Line 1 too long and line 2 empty: line 1 is reported.
        assert_eq!(
            validate_lines(2, 3, &["ABCD", ""]),
            Err(Rejection::LineTooLong { index: 1, max: 3 })
        );
    }

    #[test]
    fn test_length_checked_before_characters() {
        assert_eq!(
            validate_lines(1, 3, &["<<<<"]),
            Err(Rejection::LineTooLong { index: 1, max: 3 })
        );
    }

    #[test]
    fn test_folds_and_trims_but_keeps_interior_spaces() {
        let lines = validate_lines(1, 15, &["  god  bless \t"]).unwrap();
        assert_eq!(texts(&lines), ["GOD  BLESS"]);
    }

    #[test]
    fn test_extra_candidates_ignored() {
        let lines = validate_lines(1, 15, &["ONE", "<TWO>"]).unwrap();
        assert_eq!(texts(&lines), ["ONE"]);
    }

    #[test]
    fn test_revalidating_accepted_lines_is_stable() {
        let first = validate_lines(2, 12, &["  a.b. c ", "x/y\\z"]).unwrap();
        let second = validate_lines(2, 12, &first).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_deterministic() {
        let raw = ["abc", "d<e"];
        assert_eq!(validate_lines(2, 15, &raw), validate_lines(2, 15, &raw));
    }
}
