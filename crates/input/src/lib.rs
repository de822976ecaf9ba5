//! Input module (engine-facing).
//!
//! This crate is intentionally independent of the game session. It turns
//! discrete key-down/key-up events into [`crate::types::GameCommand`]s:
//!
//! - [`map`]: `crossterm` key codes to bindings
//! - [`held`]: raw keys currently held, used to ignore OS auto-repeat
//! - [`repeat`]: initial-delay plus fixed-interval repeat timers, driven by a
//!   millisecond clock supplied by the caller

pub mod held;
pub mod map;
pub mod repeat;

pub use blockfall_types as types;

pub use held::HeldKeys;
pub use map::{binding_for, should_quit, Binding};
pub use repeat::KeyRepeatController;

pub use crossterm::event::KeyCode;
