//! Session runtime: the single owner of a game and the loop that feeds it.
//!
//! - [`config`]: tunables, with environment overrides
//! - [`driver`]: [`GameDriver`], the one place commands reach the session
//! - [`host`]: tokio task that owns a driver and serves channels
//!
//! Everything that can change the game (key events, repeat timers, gravity)
//! is funnelled through [`GameDriver::dispatch`] or [`GameDriver::frame`], so
//! updates are applied one at a time in the order they were emitted.

pub mod config;
pub mod driver;
pub mod host;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use config::SessionConfig;
pub use driver::{ControlEvent, GameDriver};
pub use host::{run_session, SessionHandle, SessionHost};
