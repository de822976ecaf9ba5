//! Pieces module - the static tetromino catalog
//!
//! Every kind owns a fixed, ordered list of rotation states. Rotating a piece
//! means stepping to the next entry (modulo the state count); shapes are never
//! derived by a matrix transform.
//!
//! A shape is a small rectangular matrix. Non-zero entries are filled cells and
//! carry the kind's cell value so locking can copy them straight into the board.

use crate::types::PieceKind;

/// A rotation state: rectangular matrix, row-major, top row first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    rows: &'static [&'static [u8]],
}

impl Shape {
    const fn new(rows: &'static [&'static [u8]]) -> Self {
        Self { rows }
    }

    /// Matrix rows, top to bottom
    pub fn rows(&self) -> &'static [&'static [u8]] {
        self.rows
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, |row| row.len())
    }

    /// Filled cells as `(col, row, value)` relative to the shape's top-left corner
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8, u8)> + '_ {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|&(_, &v)| v != 0)
                .map(move |(c, &v)| (c as i8, r as i8, v))
        })
    }
}

const I_STATES: &[Shape] = &[Shape::new(&[&[1, 1, 1, 1]])];

const O_STATES: &[Shape] = &[Shape::new(&[&[2, 2], &[2, 2]])];

const T_STATES: &[Shape] = &[
    Shape::new(&[&[0, 3, 0], &[3, 3, 3]]),
    Shape::new(&[&[3, 0], &[3, 3], &[3, 0]]),
    Shape::new(&[&[3, 3, 3], &[0, 3, 0]]),
    Shape::new(&[&[0, 3], &[3, 3], &[0, 3]]),
];

const S_STATES: &[Shape] = &[
    Shape::new(&[&[0, 4, 4], &[4, 4, 0]]),
    Shape::new(&[&[4, 0], &[4, 4], &[0, 4]]),
];

const Z_STATES: &[Shape] = &[
    Shape::new(&[&[5, 5, 0], &[0, 5, 5]]),
    Shape::new(&[&[0, 5], &[5, 5], &[5, 0]]),
];

const J_STATES: &[Shape] = &[
    Shape::new(&[&[6, 0, 0], &[6, 6, 6]]),
    Shape::new(&[&[6, 6], &[6, 0], &[6, 0]]),
    Shape::new(&[&[6, 6, 6], &[0, 0, 6]]),
    Shape::new(&[&[0, 6], &[0, 6], &[6, 6]]),
];

const L_STATES: &[Shape] = &[
    Shape::new(&[&[0, 0, 7], &[7, 7, 7]]),
    Shape::new(&[&[7, 0], &[7, 0], &[7, 7]]),
    Shape::new(&[&[7, 7, 7], &[7, 0, 0]]),
    Shape::new(&[&[7, 7], &[0, 7], &[0, 7]]),
];

/// All rotation states of a kind, in rotation order
pub fn rotation_states(kind: PieceKind) -> &'static [Shape] {
    match kind {
        PieceKind::I => I_STATES,
        PieceKind::O => O_STATES,
        PieceKind::T => T_STATES,
        PieceKind::S => S_STATES,
        PieceKind::Z => Z_STATES,
        PieceKind::J => J_STATES,
        PieceKind::L => L_STATES,
    }
}

/// Number of rotation states of a kind
pub fn state_count(kind: PieceKind) -> usize {
    rotation_states(kind).len()
}

/// Shape for a kind at a rotation index; the index wraps modulo the state count
pub fn get_shape(kind: PieceKind, rotation: usize) -> Shape {
    let states = rotation_states(kind);
    states[rotation % states.len()]
}

/// Rotation index that follows `rotation`
pub fn next_rotation(kind: PieceKind, rotation: usize) -> usize {
    (rotation + 1) % state_count(kind)
}

/// Rotation-0 shape, used for spawning and the next-piece preview
pub fn get_spawn_shape(kind: PieceKind) -> Shape {
    get_shape(kind, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_counts_match_catalog() {
        let counts: Vec<usize> = PieceKind::ALL.iter().map(|&k| state_count(k)).collect();
        assert_eq!(counts, vec![1, 1, 4, 2, 2, 4, 4]);
    }

    #[test]
    fn every_state_has_four_cells_of_its_kind() {
        for kind in PieceKind::ALL {
            for shape in rotation_states(kind) {
                let cells: Vec<_> = shape.cells().collect();
                assert_eq!(cells.len(), 4, "{:?} state has wrong cell count", kind);
                assert!(cells.iter().all(|&(_, _, v)| v == kind.cell_value()));
            }
        }
    }

    #[test]
    fn every_state_is_rectangular() {
        for kind in PieceKind::ALL {
            for shape in rotation_states(kind) {
                let w = shape.width();
                assert!(shape.rows().iter().all(|row| row.len() == w));
            }
        }
    }

    #[test]
    fn rotation_index_wraps() {
        assert_eq!(next_rotation(PieceKind::T, 3), 0);
        assert_eq!(next_rotation(PieceKind::S, 1), 0);
        assert_eq!(next_rotation(PieceKind::O, 0), 0);
        assert_eq!(get_shape(PieceKind::J, 5), get_shape(PieceKind::J, 1));
    }

    #[test]
    fn i_piece_is_a_single_horizontal_bar() {
        let shape = get_spawn_shape(PieceKind::I);
        assert_eq!(shape.width(), 4);
        assert_eq!(shape.height(), 1);
        assert_eq!(next_rotation(PieceKind::I, 0), 0);
    }
}
