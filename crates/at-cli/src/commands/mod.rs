//! CLI subcommand implementations.

pub mod export;
pub mod import;
pub mod library;
pub mod publish;
pub mod status;
pub mod timeline;
