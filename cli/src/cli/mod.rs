//! CLI module for n8r.

pub mod args;
pub mod commands;

pub use args::{Cli, Commands};
