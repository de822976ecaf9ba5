//! Collision validator.
//!
//! Pure and reentrant: it only reads the board it is given, so callers can
//! test a placement against a hypothetical board as easily as the live one.

use crate::board::Board;
use crate::pieces::Shape;
use crate::types::{BOARD_HEIGHT, BOARD_WIDTH};

/// Board-relative anchor of a shape's top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: i8,
    pub y: i8,
}

impl Position {
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// Shifted anchor, or `None` when the result leaves the `i8` range.
    pub fn checked_offset(&self, dx: i8, dy: i8) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }
}

/// Decide whether `shape` may occupy `position` on `board`.
///
/// Side walls and the floor reject; cells above the top edge (negative rows)
/// are allowed and never checked against board contents.
pub fn is_valid(shape: &Shape, position: Position, board: &Board) -> bool {
    shape.cells().all(|(c, r, _)| {
        let x = position.x as i16 + c as i16;
        let y = position.y as i16 + r as i16;

        if x < 0 || x >= BOARD_WIDTH as i16 || y >= BOARD_HEIGHT as i16 {
            return false;
        }
        if y < 0 {
            return true;
        }
        !board.is_occupied(x as i8, y as i8)
    })
}
