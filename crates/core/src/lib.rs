//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains all the game rules, state management, and simulation logic.
//! It has **no dependencies** on terminals, async runtimes, or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical games
//! - **Testable**: Unit tests cover every rule and transition
//! - **Portable**: Can be driven by any host (terminal, headless, tests)
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 grid, row completion and compaction
//! - [`collision`]: Pure placement validator
//! - [`game_state`]: The session: active piece, lock transaction, lifecycle
//! - [`particles`]: Decorative bursts spawned by line clears
//! - [`pieces`]: Static rotation tables for the seven kinds
//! - [`rng`]: Uniform, seedable piece generator
//! - [`scheduler`]: Gravity driven by the frame clock
//! - [`scoring`]: Line-clear points, levels and drop intervals
//! - [`snapshot`]: Read-only views for renderers
//!
//! # Game Rules
//!
//! - **Uniform randomizer**: every draw is independent, repeats are allowed
//! - **Table rotation**: stepping through fixed states, no wall kicks
//! - **Immediate lock**: a blocked downward move locks the piece on the spot
//! - **Game over**: a piece locks while its anchor is still on the spawn row
//!
//! # Example
//!
//! ```
//! use blockfall_core::{GameSession, MoveOutcome};
//! use blockfall_core::types::GameCommand;
//!
//! let mut game = GameSession::new(12345);
//! game.start_game();
//!
//! game.apply(GameCommand::Move { dx: 1, dy: 0 });
//! game.apply(GameCommand::Rotate);
//!
//! // Drop until the piece locks.
//! while !matches!(game.move_piece(0, 1), MoveOutcome::Locked(_)) {}
//! assert!(game.board().filled_count() > 0);
//! ```
//!
//! # Timing
//!
//! Gravity is owned by [`DropScheduler`], which the host calls once per frame
//! with a millisecond timestamp. Nothing in this crate reads a clock.

pub mod board;
pub mod collision;
pub mod game_state;
pub mod particles;
pub mod pieces;
pub mod rng;
pub mod scheduler;
pub mod scoring;
pub mod snapshot;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, CompletedRows, Row};
pub use collision::{is_valid, Position};
pub use game_state::{ActivePiece, GameSession, LockOutcome, MoveOutcome, Phase};
pub use particles::{Hsl, Particle, ParticleField};
pub use pieces::{get_shape, get_spawn_shape, next_rotation, Shape};
pub use rng::PieceGenerator;
pub use scheduler::DropScheduler;
pub use scoring::{calculate_level, calculate_line_score, drop_interval_ms};
pub use snapshot::{ActiveSnapshot, GameSnapshot, NextSnapshot};
