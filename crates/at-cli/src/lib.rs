//! Airtime CLI library.
//!
//! This crate provides the CLI interface for the schedule timeline engine.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, LibraryAction};
pub use config::Config;
