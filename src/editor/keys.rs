//! Editor-side character policy.
//!
//! A local copy of the engraving allow-list used to refuse keystrokes and
//! paste fragments immediately. It must accept exactly what
//! [`crate::charset::is_allowed`] accepts; the parity test suite enforces it.
//! The advisory line check here is likewise a convenience for instant
//! feedback, never a substitute for [`crate::validate::validate_lines`].

use crate::error::Rejection;

/// Upper-case a typed character. Characters whose upper-case form is more
/// than one character (such as `ß`) come back as `None`.
#[inline]
pub fn fold_key(c: char) -> Option<char> {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => Some(u),
        _ => None,
    }
}

/// True if the editor lets `c` into a cell. `c` must already be folded.
#[inline]
pub fn accepts(c: char) -> bool {
    matches!(
        c,
        ' ' | 'A'..='Z'
            | '0'..='9'
            | '.' | ',' | '-' | '_' | '\'' | '"' | '/' | '\\' | '&' | '(' | ')'
            | ':' | ';' | '!' | '?' | '+' | '#' | '@' | '*' | '$' | '%' | '='
    )
}

/// Instant feedback over the editor's current line values.
///
/// Mirrors the authoritative rules: fold, trim, non-empty, width, allow-list,
/// first failure wins. Characters [`fold_key`] refuses stay as they are and
/// fail the allow-list.
pub fn advisory_check<S: AsRef<str>>(columns: usize, lines: &[S]) -> Result<(), Rejection> {
    for (i, line) in lines.iter().enumerate() {
        let index = i + 1;
        let folded: String = line
            .as_ref()
            .chars()
            .map(|c| fold_key(c).unwrap_or(c))
            .collect();
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
        if value.chars().any(|c| !accepts(c)) {
            return Err(Rejection::DisallowedCharacter(index));
        }
    }
    Ok(())
}
