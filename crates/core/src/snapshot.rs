//! Read-only views of a session, handed to renderers and observers.

use crate::board::Row;
use crate::game_state::ActivePiece;
use crate::particles::Particle;
use crate::pieces::Shape;
use crate::types::{PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: usize,
    pub shape: Shape,
    pub x: i8,
    pub y: i8,
}

impl From<ActivePiece> for ActiveSnapshot {
    fn from(value: ActivePiece) -> Self {
        Self {
            kind: value.kind,
            rotation: value.rotation,
            shape: value.shape(),
            x: value.position.x,
            y: value.position.y,
        }
    }
}

impl ActiveSnapshot {
    /// Board coordinates of the filled cells
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8, u8)> + '_ {
        self.shape
            .cells()
            .map(move |(c, r, v)| (self.x + c, self.y + r, v))
    }
}

/// Queued piece with its preview shape (rotation state 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NextSnapshot {
    pub kind: PieceKind,
    pub shape: Shape,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    pub board: [Row; BOARD_HEIGHT],
    pub active: Option<ActiveSnapshot>,
    pub next: Option<NextSnapshot>,
    pub particles: Vec<Particle>,
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    pub game_started: bool,
    pub game_over: bool,
    pub is_paused: bool,
    pub is_fast_drop: bool,
    pub episode_id: u32,
}

impl GameSnapshot {
    /// Board merged with the active piece, as a renderer would draw it
    pub fn composed_board(&self) -> [Row; BOARD_HEIGHT] {
        let mut grid = self.board;
        if let Some(active) = &self.active {
            for (x, y, v) in active.cells() {
                if (0..BOARD_WIDTH as i8).contains(&x) && (0..BOARD_HEIGHT as i8).contains(&y) {
                    grid[y as usize][x as usize] = v;
                }
            }
        }
        grid
    }

    pub fn playable(&self) -> bool {
        self.game_started && !self.game_over && !self.is_paused
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[0; BOARD_WIDTH]; BOARD_HEIGHT],
            active: None,
            next: None,
            particles: Vec::new(),
            score: 0,
            lines: 0,
            level: 1,
            game_started: false,
            game_over: false,
            is_paused: false,
            is_fast_drop: false,
            episode_id: 0,
        }
    }
}
