//! Blockfall (workspace facade crate).
//!
//! Re-exports the workspace crates under one roof so that the binary,
//! integration tests and benches can use `blockfall::{core, input, runtime, types}`.

pub mod term;

pub use blockfall_core as core;
pub use blockfall_input as input;
pub use blockfall_runtime as runtime;
pub use blockfall_types as types;
