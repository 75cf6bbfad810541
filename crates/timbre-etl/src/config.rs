use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::de::{self, Deserializer, Unexpected};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use timbre_core::DEFAULT_TOP_N;

/// Configuration for timbre.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (TIMBRE_* prefix)
/// 3. Config file (~/.config/timbre/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the SQLite catalog database.
    ///
    /// Can be set via:
    /// - CLI: --db /path/to/db
    /// - ENV: TIMBRE_DATABASE_PATH
    /// - Config: database_path = "/path/to/db"
    /// - Default: ~/.local/share/timbre/timbre.db
    pub database_path: PathBuf,

    /// Number of recommendations to show when `-n` is not given.
    ///
    /// Can be set via:
    /// - CLI: recommend -n 8
    /// - ENV: TIMBRE_TOP_N
    /// - Config: top_n = 8
    #[serde(deserialize_with = "deserialize_count")]
    pub top_n: usize,

    /// Log level: error, warn, info, debug or trace.
    ///
    /// Can be set via:
    /// - CLI: -v / -vv (raises to debug / trace)
    /// - ENV: TIMBRE_LOG_LEVEL
    /// - Config: log_level = "debug"
    pub log_level: String,

    /// Column names used when reading CSV files.
    pub columns: ColumnConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_db_path(),
            top_n: DEFAULT_TOP_N,
            log_level: String::from("info"),
            columns: ColumnConfig::default(),
        }
    }
}

/// Names of the CSV columns that carry each catalog field.
///
/// Defaults match the clustered music dataset the tool was built around.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    /// Key column shared by the catalog and feature tables. When neither
    /// table has it, rows are paired by position.
    pub id: String,
    pub title: String,
    pub genres: String,
    pub artist: String,
    pub cluster_id: String,
    pub cluster_name: String,
    /// Feature-table columns that are not features.
    pub ignore: Vec<String>,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            id: String::from("id"),
            title: String::from("name_song"),
            genres: String::from("genres"),
            artist: String::from("name_artists"),
            cluster_id: String::from("Clusters"),
            cluster_name: String::from("Cluster_Name"),
            ignore: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/timbre/config.toml
    /// Reads environment variables with TIMBRE_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("timbre");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build().context("Failed to build configuration")?;

        Ok(config)
    }

    /// Load configuration with custom database path.
    ///
    /// This is used when the --db CLI flag is provided.
    pub fn load_with_db_path(db_path: PathBuf) -> Result<Self> {
        let mut config = Self::load()?;
        config.database_path = db_path;
        Ok(config)
    }
}

/// Accept a count written either as an integer or as a numeric string.
/// Environment values reach the config as strings.
fn deserialize_count<'de, D>(deserializer: D) -> std::result::Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Num(usize),
        Str(String),
    }

    match Count::deserialize(deserializer)? {
        Count::Num(n) => Ok(n),
        Count::Str(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::invalid_value(Unexpected::Str(&s), &"a non-negative integer")),
    }
}

/// Get the default database path.
///
/// Returns: ~/.local/share/timbre/timbre.db (or platform equivalent)
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("timbre")
        .join("timbre.db")
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/timbre/config.toml
/// - macOS: ~/Library/Application Support/timbre/config.toml
/// - Windows: %APPDATA%\timbre\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("timbre")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Timbre Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (TIMBRE_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Path to the SQLite catalog database
#
# Holds the most recently imported song catalog and feature vectors.
#
# Can also be set via:
# - CLI: timbre --db /custom/path.db recommend "Song"
# - Environment: TIMBRE_DATABASE_PATH=/custom/path.db
#
# Default: Platform-specific data directory
#database_path = "/path/to/custom/timbre.db"

# Number of recommendations shown when -n is not given
top_n = 5

# Log level: error, warn, info, debug, trace
log_level = "info"

# CSV column names
#
# `id` is the key column shared by the catalog and feature files. If neither
# file has it, rows are paired by position and both files must have the same
# number of rows.
[columns]
id = "id"
title = "name_song"
genres = "genres"
artist = "name_artists"
cluster_id = "Clusters"
cluster_name = "Cluster_Name"
# Columns of the feature file that are not features
ignore = []
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.database_path.as_os_str().is_empty());
        assert_eq!(config.top_n, 5);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.columns.title, "name_song");
        assert_eq!(config.columns.cluster_id, "Clusters");
    }

    #[test]
    fn test_config_load() {
        // Should not fail even if config file doesn't exist
        let result = Config::load();
        assert!(result.is_ok());
    }

    #[test]
    fn test_config_with_custom_db_path() {
        let custom_path = PathBuf::from("/tmp/test.db");
        let config = Config::load_with_db_path(custom_path.clone());
        assert!(config.is_ok());
        assert_eq!(config.unwrap().database_path, custom_path);
    }

    #[test]
    fn test_example_config_matches_defaults() {
        let parsed: Config = toml::from_str(example_config()).unwrap();
        let defaults = Config::default();
        assert_eq!(parsed.top_n, defaults.top_n);
        assert_eq!(parsed.log_level, defaults.log_level);
        assert_eq!(parsed.columns, defaults.columns);
        assert_eq!(parsed.database_path, defaults.database_path);
    }

    #[test]
    fn test_top_n_accepts_numeric_string() {
        let parsed: Config = toml::from_str("top_n = '7'").unwrap();
        assert_eq!(parsed.top_n, 7);

        let parsed: Config = toml::from_str("top_n = 9").unwrap();
        assert_eq!(parsed.top_n, 9);

        assert!(toml::from_str::<Config>("top_n = 'many'").is_err());
        assert!(toml::from_str::<Config>("top_n = -2").is_err());
    }

    #[test]
    fn test_top_n_from_environment() {
        std::env::set_var("TIMBRE_TOP_N", "7");
        let result = Config::load();
        std::env::remove_var("TIMBRE_TOP_N");

        assert_eq!(result.unwrap().top_n, 7);
    }

    #[test]
    fn test_partial_columns_table_keeps_other_defaults() {
        let parsed: Config = toml::from_str("[columns]\ntitle = \"track\"\n").unwrap();
        assert_eq!(parsed.columns.title, "track");
        assert_eq!(parsed.columns.artist, "name_artists");
    }
}
