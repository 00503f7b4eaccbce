//! Cursor movement for the grid editor.
//!
//! Arrow keys clamp at the grid edges and never wrap between rows. Typing and
//! backspace step across row boundaries through [`GridEditor::step_forward`]
//! and [`GridEditor::step_back`].

use super::{CellPosition, Direction, GridEditor};

impl GridEditor {
    /// Move the cursor one cell without touching content.
    pub fn move_cursor(&mut self, direction: Direction) {
        let CellPosition { row, col } = self.cursor;

        match direction {
            Direction::Left => {
                if col > 0 {
                    self.cursor.col -= 1;
                }
            }
            Direction::Right => {
                if col + 1 < self.row_width(row) {
                    self.cursor.col += 1;
                }
            }
            Direction::Up => {
                if row > 0 {
                    self.cursor = self.clamped(row - 1, col);
                }
            }
            Direction::Down => {
                if row + 1 < self.rows.len() {
                    self.cursor = self.clamped(row + 1, col);
                }
            }
        }
    }

    /// Place the cursor, clamping to the grid.
    pub fn set_cursor(&mut self, row: usize, col: usize) {
        let row = row.min(self.rows.len() - 1);
        self.cursor = self.clamped(row, col);
    }

    /// Cell after `pos` in reading order, or `None` at the last cell.
    pub(super) fn step_forward(&self, pos: CellPosition) -> Option<CellPosition> {
        if pos.col + 1 < self.row_width(pos.row) {
            Some(CellPosition::new(pos.row, pos.col + 1))
        } else if pos.row + 1 < self.rows.len() {
            Some(CellPosition::new(pos.row + 1, 0))
        } else {
            None
        }
    }

    /// Cell before `pos` in reading order, or `None` at the first cell.
    pub(super) fn step_back(&self, pos: CellPosition) -> Option<CellPosition> {
        if pos.col > 0 {
            Some(CellPosition::new(pos.row, pos.col - 1))
        } else if pos.row > 0 {
            let prev = pos.row - 1;
            Some(CellPosition::new(prev, self.row_width(prev) - 1))
        } else {
            None
        }
    }

    /// Start of the row below `pos`, or `None` on the last row.
    pub(super) fn next_row_start(&self, pos: CellPosition) -> Option<CellPosition> {
        (pos.row + 1 < self.rows.len()).then(|| CellPosition::new(pos.row + 1, 0))
    }

    fn row_width(&self, row: usize) -> usize {
        self.rows[row].len()
    }

    fn clamped(&self, row: usize, col: usize) -> CellPosition {
        CellPosition::new(row, col.min(self.row_width(row) - 1))
    }
}
