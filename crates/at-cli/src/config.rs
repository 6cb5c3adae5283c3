//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use at_core::{TieBreak, TimelineConfig};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,

    /// How items sharing an intended slot are ordered.
    pub tie_break: TieBreak,

    /// Longest duration a single item may occupy, in minutes.
    pub max_item_minutes: f64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_path", &self.database_path)
            .field("tie_break", &self.tie_break)
            .field("max_item_minutes", &self.max_item_minutes)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        let timeline = TimelineConfig::default();
        Self {
            database_path: data_dir.join("airtime.db"),
            tie_break: timeline.tie_break,
            max_item_minutes: timeline.max_item_minutes,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    ///
    /// Later sources override earlier ones: defaults, the user config file,
    /// `config_path`, then `AIRTIME_*` environment variables.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // AIRTIME_DATABASE_PATH, AIRTIME_TIE_BREAK, AIRTIME_MAX_ITEM_MINUTES
        figment = figment.merge(Env::prefixed("AIRTIME_"));

        figment.extract()
    }

    /// Sequencing options for the timeline pipeline.
    ///
    /// An invalid ceiling is passed through; the pipeline replaces it with
    /// the default (see [`TimelineConfig::item_ceiling`]).
    pub const fn timeline_config(&self) -> TimelineConfig {
        TimelineConfig {
            tie_break: self.tie_break,
            max_item_minutes: self.max_item_minutes,
        }
    }
}

/// Returns the platform-specific config directory for airtime.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("airtime"))
}

/// Returns the platform-specific data directory for airtime.
///
/// On Linux: `~/.local/share/airtime`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("airtime"))
}
