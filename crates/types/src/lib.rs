//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no external dependencies, so they can be used
//! by the engine, the input layer and any rendering collaborator alike.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19)
//! - **Spawn anchor**: (4, 0), i.e. `floor(width / 2) - 1`
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `FRAME_MS` | 16 | Host frame cadence (~60 FPS) |
//! | `BASE_DROP_INTERVAL_MS` | 500 | Gravity at level 1 |
//! | `LEVEL_STEP_MS` | 50 | Interval reduction per level |
//! | `MIN_DROP_INTERVAL_MS` | 50 | Gravity floor |
//! | `FAST_DROP_INTERVAL_MS` | 30 | Gravity while soft drop is held |
//! | `KEY_REPEAT_DELAY_MS` | 150 | Delay before a held key repeats |
//! | `KEY_REPEAT_INTERVAL_MS` | 50 | Interval between repeats |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{GameCommand, PieceKind, RepeatKey, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let piece = PieceKind::from_cell(3).unwrap();
//! assert_eq!(piece, PieceKind::T);
//! assert_eq!(piece.as_str(), "t");
//!
//! assert_eq!(RepeatKey::Left.command(), GameCommand::Move { dx: -1, dy: 0 });
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

use std::fmt;

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: usize = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: usize = 20;

/// Spawn anchor column: `floor(BOARD_WIDTH / 2) - 1`
pub const SPAWN_X: i8 = (BOARD_WIDTH / 2) as i8 - 1;

/// Spawn anchor row
pub const SPAWN_Y: i8 = 0;

/// Host frame cadence in milliseconds (16ms ≈ 60 FPS)
pub const FRAME_MS: u64 = 16;

/// Gravity interval at level 1
pub const BASE_DROP_INTERVAL_MS: u64 = 500;

/// Gravity interval reduction per level above 1
pub const LEVEL_STEP_MS: u64 = 50;

/// Level-derived gravity never gets faster than this
pub const MIN_DROP_INTERVAL_MS: u64 = 50;

/// Gravity interval while fast drop is held
pub const FAST_DROP_INTERVAL_MS: u64 = 30;

/// Delay between the first action of a held key and its first repeat window
pub const KEY_REPEAT_DELAY_MS: u64 = 150;

/// Interval between repeats of a held key
pub const KEY_REPEAT_INTERVAL_MS: u64 = 50;

/// Lines needed to advance one level
pub const LINES_PER_LEVEL: u32 = 10;

/// Base points for clearing N rows at once, multiplied by the current level.
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Pixel-equivalent size of one cell (particle coordinates use this unit)
pub const CELL_PX: f32 = 30.0;

/// Particles spawned per cleared row
pub const PARTICLES_PER_ROW: usize = 20;

/// Downward acceleration applied to particles each frame
pub const PARTICLE_GRAVITY: f32 = 0.15;

/// Life lost by each particle per frame
pub const PARTICLE_LIFE_DECAY: f32 = 0.015;

/// Empty board cell
pub const EMPTY_CELL: Cell = 0;

/// A cell on the game board
///
/// - `0`: empty
/// - `1..=7`: filled by a locked piece, see [`PieceKind::cell_value`]
pub type Cell = u8;


/// The seven tetromino piece kinds
///
/// The cell value written into the board when a piece locks identifies its
/// kind (and therefore its colour):
/// - **I** = 1, **O** = 2, **T** = 3, **S** = 4, **Z** = 5, **J** = 6, **L** = 7
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds in catalog order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }

    /// Non-zero board value for cells filled by this kind
    pub fn cell_value(&self) -> Cell {
        match self {
            PieceKind::I => 1,
            PieceKind::O => 2,
            PieceKind::T => 3,
            PieceKind::S => 4,
            PieceKind::Z => 5,
            PieceKind::J => 6,
            PieceKind::L => 7,
        }
    }

    /// Inverse of [`PieceKind::cell_value`]; `None` for empty or unknown cells
    pub fn from_cell(cell: Cell) -> Option<Self> {
        match cell {
            1..=7 => Some(Self::ALL[(cell - 1) as usize]),
            _ => None,
        }
    }
}

/// Keys whose action repeats while held.
///
/// Rotation and pause are deliberately absent: they fire once per key-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepeatKey {
    Left,
    Right,
    SoftDrop,
}

impl RepeatKey {
    pub const COUNT: usize = 3;
    pub const ALL: [RepeatKey; Self::COUNT] = [RepeatKey::Left, RepeatKey::Right, RepeatKey::SoftDrop];

    /// Stable index used by fixed-size timer tables
    pub fn index(&self) -> usize {
        match self {
            RepeatKey::Left => 0,
            RepeatKey::Right => 1,
            RepeatKey::SoftDrop => 2,
        }
    }

    /// The command issued on press and on every repeat
    pub fn command(&self) -> GameCommand {
        match self {
            RepeatKey::Left => GameCommand::Move { dx: -1, dy: 0 },
            RepeatKey::Right => GameCommand::Move { dx: 1, dy: 0 },
            RepeatKey::SoftDrop => GameCommand::Move { dx: 0, dy: 1 },
        }
    }

    /// Holding this key also raises the fast-drop flag
    pub fn is_fast_drop(&self) -> bool {
        matches!(self, RepeatKey::SoftDrop)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RepeatKey::Left => "left",
            RepeatKey::Right => "right",
            RepeatKey::SoftDrop => "softDrop",
        }
    }
}

/// Mutations accepted by the game session.
///
/// Every input source (manual input, repeat timers, the drop scheduler)
/// expresses its intent as one of these, so they all funnel through the same
/// serialized entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameCommand {
    /// Start a fresh game (also used to restart after game over)
    Start,
    /// Toggle between running and paused
    TogglePause,
    /// Move the active piece; a blocked downward move locks it
    Move { dx: i8, dy: i8 },
    /// Advance to the next rotation state if it fits
    Rotate,
    /// Raise or clear the fast-drop flag
    SetFastDrop(bool),
}

/// Fire-and-forget messages for a toast/log collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    LinesCleared { lines: u32, points: u32 },
    GameOver { score: u32 },
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::LinesCleared { lines, points } => {
                let plural = if *lines > 1 { "s" } else { "" };
                write!(f, "{} line{} cleared! +{} points", lines, plural, points)
            }
            Notification::GameOver { .. } => write!(f, "Game Over!"),
        }
    }
}
