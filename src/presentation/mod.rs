//! Presentation Layer
//!
//! Command-line argument parsing and translation into override records.

pub mod cli;

pub use cli::{Cli, TranslateError};
