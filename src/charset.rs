//! # Engraving Character Policy
//!
//! The authoritative allow-list applied to every line at acceptance time.
//!
//! Allowed: space, `A-Z`, `0-9`, and the punctuation in [`PUNCTUATION`].
//! Input is case-folded to upper one character at a time before checking, so
//! `a` is accepted as `A`. A character whose upper case is longer than one
//! character (`ß`, `ﬁ`) is left as it is and refused, never expanded. Angle
//! brackets, tabs, control characters and everything non-ASCII are refused.
//!
//! The grid editor keeps its own copy of this list; the two are held equal
//! by the shared fixture in `tests/charset_parity.rs`.

/// Punctuation an engraver can cut, in the order it is documented to buyers.
pub const PUNCTUATION: &str = ".,-_'\"/\\&():;!?+#@*$%=";

/// The allow-list as a regular-expression character class.
pub const PATTERN: &str = r#"^[ A-Z0-9.,\-_'"/\\&():;!?+#@*$%=]*$"#;

/// True if `c` may appear in an accepted line. `c` must already be upper-case.
#[inline]
pub fn is_allowed(c: char) -> bool {
    c == ' ' || c.is_ascii_uppercase() || c.is_ascii_digit() || PUNCTUATION.contains(c)
}

/// Case-fold a line the way acceptance does. The result has exactly as many
/// characters as `text`.
#[inline]
pub fn fold(text: &str) -> String {
    text.chars().map(fold_char).collect()
}

/// Upper case of `c`, or `c` itself when the upper case is several characters.
#[inline]
pub fn fold_char(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

/// Every allowed character, in ascending order.
pub fn allowed_chars() -> Vec<char> {
    let mut chars: Vec<char> = (' '..='~').filter(|&c| is_allowed(c)).collect();
    chars.sort_unstable();
    chars
}
