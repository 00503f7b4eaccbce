//! # Grid Editor
//!
//! Interactive state for typing an engraving one character cell at a time.
//!
//! The editor holds `lines × columns` cells and a cursor. Every mutating
//! event re-syncs the per-line values that are submitted with the form:
//! cells concatenated, empty cells rendered as spaces, trailing spaces
//! trimmed.
//!
//! ```text
//!  col  0   1   2
//!     ┌───┬───┬───┐
//! r0  │ A │ B │   │  -> "AB"
//!     ├───┼───┼───┤
//! r1  │ C │ D │ E │  -> "CDE"
//!     └───┴───┴───┘
//! ```
//!
//! Refused characters are dropped silently. The editor's check is advisory;
//! acceptance always re-runs [`crate::validate::validate_lines`].
//!
//! Toggling the cross or a graphic can shrink the column count. That reflow
//! is destructive: each line is cut to the new width and the excess is lost.
//!
//! ## Example
//!
//! ```
//! use pavers::editor::{EditorEvent, GridEditor};
//!
//! let mut editor = GridEditor::new(2, 3);
//! editor.apply(EditorEvent::Paste("ab\ncde".into()));
//! assert_eq!(editor.line_values(), ["AB", "CDE"]);
//! ```

pub mod keys;
mod navigation;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Rejection;
use crate::rules::{GridRule, SessionFlags};

/// A cell coordinate, zero-based.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellPosition {
    pub row: usize,
    pub col: usize,
}

impl CellPosition {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// One discrete input to the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum EditorEvent {
    Type(char),
    Backspace,
    Move(Direction),
    Paste(String),
    SetFlags(SessionFlags),
}

/// The character grid and its cursor.
#[derive(Debug, Clone)]
pub struct GridEditor {
    rows: Vec<Vec<Option<char>>>,
    cursor: CellPosition,
    rule: Option<GridRule>,
    flags: SessionFlags,
    values: Vec<String>,
}

impl GridEditor {
    /// Empty grid. Zero dimensions are raised to one.
    pub fn new(lines: usize, columns: usize) -> Self {
        let lines = lines.max(1);
        let columns = columns.max(1);
        let mut editor = Self {
            rows: vec![vec![None; columns]; lines],
            cursor: CellPosition::default(),
            rule: None,
            flags: SessionFlags::default(),
            values: Vec::new(),
        };
        editor.sync();
        editor
    }

    /// Empty grid shaped by a product rule and the current add-ons.
    pub fn for_rule(rule: &GridRule, flags: SessionFlags) -> Self {
        let flags = rule.sanitize_flags(flags);
        let mut editor = Self::new(rule.lines, rule.effective_columns(flags));
        editor.rule = Some(*rule);
        editor.flags = flags;
        editor
    }

    /// Grid pre-filled from earlier line values, e.g. after a refused
    /// submission. Characters go through the same filter as a paste (folded,
    /// tabs as spaces, refused ones dropped) and are cut to the grid width.
    pub fn with_values<S: AsRef<str>>(mut self, values: &[S]) -> Self {
        let columns = self.columns();
        for (row, value) in self.rows.iter_mut().zip(values) {
            let admitted: String = value
                .as_ref()
                .chars()
                .filter_map(|c| admit(if c == '\t' { ' ' } else { c }))
                .collect();
            *row = reflow(&admitted, columns);
        }
        self.sync();
        self
    }

    #[inline]
    pub fn cursor(&self) -> CellPosition {
        self.cursor
    }

    #[inline]
    pub fn lines(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn columns(&self) -> usize {
        self.rows[0].len()
    }

    #[inline]
    pub fn flags(&self) -> SessionFlags {
        self.flags
    }

    /// Content of one cell, `None` when empty or out of range.
    pub fn cell(&self, row: usize, col: usize) -> Option<char> {
        self.rows.get(row)?.get(col).copied().flatten()
    }

    /// Current submission values, one per line.
    #[inline]
    pub fn line_values(&self) -> &[String] {
        &self.values
    }

    /// Instant feedback using the editor's own allow-list.
    pub fn advisory_check(&self) -> Result<(), Rejection> {
        keys::advisory_check(self.columns(), &self.values)
    }

    /// Dispatch one event. Returns `true` if cell content changed.
    pub fn apply(&mut self, event: EditorEvent) -> bool {
        match event {
            EditorEvent::Type(c) => self.type_char(c),
            EditorEvent::Backspace => self.backspace(),
            EditorEvent::Move(direction) => {
                self.move_cursor(direction);
                false
            }
            EditorEvent::Paste(text) => self.paste(&text),
            EditorEvent::SetFlags(flags) => self.set_flags(flags),
        }
    }

    /// Type one character at the cursor.
    ///
    /// An accepted character fills the cell and advances the cursor, wrapping
    /// to the next row; at the very last cell the cursor stays put. A refused
    /// character clears the cell and leaves the cursor where it is.
    pub fn type_char(&mut self, c: char) -> bool {
        let CellPosition { row, col } = self.cursor;

        match admit(c) {
            Some(c) => {
                self.rows[row][col] = Some(c);
                if let Some(next) = self.step_forward(self.cursor) {
                    self.cursor = next;
                }
            }
            None => {
                self.rows[row][col] = None;
            }
        }

        self.sync();
        true
    }

    /// Clear the cursor cell, or step back one cell if it is already empty.
    pub fn backspace(&mut self) -> bool {
        let CellPosition { row, col } = self.cursor;

        if self.rows[row][col].take().is_some() {
            self.sync();
            return true;
        }
        if let Some(prev) = self.step_back(self.cursor) {
            self.cursor = prev;
        }
        false
    }

    /// Distribute pasted text from the cursor onward.
    ///
    /// Line breaks move to the start of the next row (a CRLF pair counts
    /// once, and a break right after filling a row does not skip another
    /// row). Tabs become spaces. Refused characters are skipped without
    /// using a cell. Filling stops when the text runs out or the last cell is
    /// written.
    pub fn paste(&mut self, text: &str) -> bool {
        let mut pos = self.cursor;
        let mut wrapped = false;
        let mut changed = false;
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '\r' || c == '\n' {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                if wrapped {
                    wrapped = false;
                    continue;
                }
                match self.next_row_start(pos) {
                    Some(next) => pos = next,
                    None => break,
                }
                continue;
            }

            let c = if c == '\t' { ' ' } else { c };
            let Some(c) = admit(c) else {
                continue;
            };

            self.rows[pos.row][pos.col] = Some(c);
            changed = true;
            match self.step_forward(pos) {
                Some(next) => {
                    wrapped = next.row != pos.row;
                    pos = next;
                }
                None => break,
            }
        }

        self.cursor = pos;
        if changed {
            self.sync();
        }
        changed
    }

    /// Reshape to `columns` cells per row.
    ///
    /// Each row's value is cut to the new width and the grid rebuilt from
    /// those values. Characters beyond the new width are lost.
    pub fn resize(&mut self, columns: usize) -> bool {
        let columns = columns.max(1);
        if columns == self.columns() {
            return false;
        }

        debug!(from = self.columns(), to = columns, "reflowing grid");
        self.rows = self
            .values
            .iter()
            .map(|value| reflow(value, columns))
            .collect();
        self.cursor.col = self.cursor.col.min(columns - 1);
        self.sync();
        true
    }

    /// Apply new add-on toggles, reshaping when the effective width changes.
    pub fn set_flags(&mut self, flags: SessionFlags) -> bool {
        match self.rule {
            Some(rule) => {
                self.flags = rule.sanitize_flags(flags);
                self.resize(rule.effective_columns(self.flags))
            }
            None => {
                self.flags = flags;
                false
            }
        }
    }

    fn sync(&mut self) {
        self.values = self.rows.iter().map(|row| linearize(row)).collect();
    }
}

/// Folded form of `c` if the editor lets it into a cell.
fn admit(c: char) -> Option<char> {
    keys::fold_key(c).filter(|&c| keys::accepts(c))
}

/// Row cells as a line value: empty cells as spaces, trailing spaces trimmed.
fn linearize(row: &[Option<char>]) -> String {
    let line: String = row.iter().map(|cell| cell.unwrap_or(' ')).collect();
    line.trim_end().to_string()
}

/// A line value as `columns` cells, truncating any excess.
fn reflow(value: &str, columns: usize) -> Vec<Option<char>> {
    let mut cells: Vec<Option<char>> = value.chars().take(columns).map(Some).collect();
    cells.resize(columns, None);
    cells
}
