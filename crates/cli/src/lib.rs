//! Operator shell over the routing engine.
//!
//! Each invocation loads the saved network, runs one command, saves the result
//! and returns the text to print.

pub mod commands;
pub mod render;

pub use commands::{AuditCommand, Command, run};
