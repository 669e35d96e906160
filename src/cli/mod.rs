//! CLI module for red - command-line arguments.

pub mod commands;

pub use commands::Cli;
