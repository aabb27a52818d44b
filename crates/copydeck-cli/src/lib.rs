//! Copydeck CLI library.
//!
//! Command definitions and output helpers for the `copydeck` binary.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use error::CliError;
