//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Broadcast schedule timeline.
///
/// Compacts authored schedules into a gapless playout timeline and splits it
/// at calendar-day boundaries.
#[derive(Debug, Parser)]
#[command(name = "airtime", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Replace the stored schedule with the contents of a schedule file.
    Import {
        /// Schedule file with one quoted record per line.
        file: PathBuf,
    },

    /// Show the compacted timeline, one section per calendar day.
    Timeline {
        /// First day to show (YYYY-MM-DD). Defaults to the first scheduled day.
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Number of days to show.
        #[arg(long)]
        days: Option<u32>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Write the compacted timeline back as the stored schedule.
    Publish {
        /// Report what would change without writing.
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the compacted schedule in the schedule file format.
    Export {
        /// Write to a file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Manage the media library.
    #[command(subcommand)]
    Library(LibraryAction),

    /// Show stored schedule status.
    Status,
}

/// Library subcommands.
#[derive(Debug, Subcommand)]
pub enum LibraryAction {
    /// Replace the library with the contents of a library file.
    Import {
        /// Library file with one quoted record per line.
        file: PathBuf,
    },

    /// List library entries.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_timeline_flags() {
        let cli = Cli::parse_from([
            "airtime", "timeline", "--from", "2026-03-02", "--days", "3", "--json",
        ]);
        match cli.command {
            Some(Commands::Timeline { from, days, json }) => {
                assert_eq!(from, NaiveDate::from_ymd_opt(2026, 3, 2));
                assert_eq!(days, Some(3));
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = Cli::parse_from(["airtime", "status", "-v", "-c", "/tmp/airtime.toml"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/airtime.toml")));
        assert!(matches!(cli.command, Some(Commands::Status)));
    }

    #[test]
    fn parses_library_subcommands() {
        let cli = Cli::parse_from(["airtime", "library", "list", "--json"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Library(LibraryAction::List { json: true }))
        ));
    }

    #[test]
    fn rejects_malformed_from_date() {
        assert!(Cli::try_parse_from(["airtime", "timeline", "--from", "March"]).is_err());
    }
}
