use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use at_cli::commands::{export, import, library, publish, status, timeline};
use at_cli::{Cli, Commands, Config, LibraryAction};

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(at_db::Database, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = at_db::Database::open(&config.database_path).context("failed to open database")?;
    Ok((db, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so command output stays pipeable.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let mut stdout = io::stdout().lock();

    match &cli.command {
        Some(Commands::Import { file }) => {
            let (mut db, _config) = open_database(cli.config.as_deref())?;
            import::run(&mut stdout, &mut db, file)?;
        }
        Some(Commands::Timeline { from, days, json }) => {
            let (db, config) = open_database(cli.config.as_deref())?;
            let window = timeline::DayWindow {
                from: *from,
                days: *days,
            };
            timeline::run(&mut stdout, &db, &config.timeline_config(), window, *json)?;
        }
        Some(Commands::Publish { dry_run }) => {
            let (mut db, config) = open_database(cli.config.as_deref())?;
            publish::run(&mut stdout, &mut db, &config.timeline_config(), *dry_run)?;
        }
        Some(Commands::Export { output }) => {
            let (db, config) = open_database(cli.config.as_deref())?;
            let timeline_config = config.timeline_config();
            if let Some(path) = output {
                let file = File::create(path)
                    .with_context(|| format!("failed to create {}", path.display()))?;
                let written = export::run(&mut BufWriter::new(file), &db, &timeline_config)?;
                tracing::info!(written, path = %path.display(), "exported schedule");
            } else {
                export::run(&mut stdout, &db, &timeline_config)?;
            }
        }
        Some(Commands::Library(action)) => {
            let (mut db, _config) = open_database(cli.config.as_deref())?;
            match action {
                LibraryAction::Import { file } => {
                    library::import(&mut stdout, &mut db, file)?;
                }
                LibraryAction::List { json } => library::list(&mut stdout, &db, *json)?,
            }
        }
        Some(Commands::Status) => {
            let (db, config) = open_database(cli.config.as_deref())?;
            status::run(
                &mut stdout,
                &db,
                &config.database_path,
                &config.timeline_config(),
            )?;
        }
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
