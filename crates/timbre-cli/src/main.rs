use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use timbre_etl::Config;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "timbre", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the database (default: ~/.local/share/timbre/timbre.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Import a clustered song catalog and its feature vectors
    ///
    /// Reads two CSV files: the catalog (one row per song with title, genres,
    /// artist, cluster id and cluster name) and the feature table (one row of
    /// numeric audio features per song).
    ///
    /// Rows are paired by the key column (`id` by default) when both files
    /// have it, and by position when neither does. Both files must describe
    /// exactly the same songs and every feature vector must have the same
    /// length; otherwise nothing is imported.
    ///
    /// A successful import replaces the previously stored dataset.
    Import {
        /// Catalog CSV file
        #[arg(long)]
        catalog: PathBuf,
        /// Feature CSV file
        #[arg(long)]
        features: PathBuf,
    },
    /// Recommend songs similar to a given title
    ///
    /// Looks the title up (exact match), then ranks the other songs of the
    /// same cluster by cosine similarity of their audio features.
    Recommend {
        /// Song title, exactly as it appears in the catalog
        title: String,
        /// Number of recommendations (default: top_n from config)
        #[arg(short = 'n', long)]
        top_n: Option<usize>,
        /// Print the response as JSON
        #[arg(long)]
        json: bool,
        /// Read the catalog from this CSV instead of the database
        #[arg(long, requires = "features")]
        catalog: Option<PathBuf>,
        /// Read the features from this CSV instead of the database
        #[arg(long, requires = "catalog")]
        features: Option<PathBuf>,
    },
    /// List song titles
    Songs {
        /// Only titles containing this text (case-insensitive)
        filter: Option<String>,
        /// Maximum number of titles to show
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
    /// Show how songs are distributed across clusters
    Clusters,
    /// Show database status
    Status,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Print one setting, or the whole config file
    Get { key: Option<String> },
    /// Change a setting in the config file
    Set { key: String, value: String },
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file with defaults
    Init,
}

fn init_logging(level: &str, verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => match level.to_ascii_lowercase().as_str() {
            "error" => twyg::LogLevel::Error,
            "warn" | "warning" => twyg::LogLevel::Warn,
            "debug" => twyg::LogLevel::Debug,
            "trace" => twyg::LogLevel::Trace,
            _ => twyg::LogLevel::Info,
        },
        1 => twyg::LogLevel::Debug,
        _ => twyg::LogLevel::Trace,
    };

    let opts = twyg::OptsBuilder::new()
        .coloured(true)
        .output(twyg::Output::Stderr)
        .level(level)
        .report_caller(false)
        .build()
        .map_err(|e| anyhow::anyhow!("Invalid logging options: {e:?}"))?;
    twyg::setup(opts).map_err(|e| anyhow::anyhow!("Failed to set up logging: {e:?}"))?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.db {
        Some(db_path) => Config::load_with_db_path(db_path)?,
        None => Config::load()?,
    };

    init_logging(&config.log_level, cli.verbose)?;

    // Ensure database directory exists
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create database directory")?;
    }

    match cli.command {
        Commands::Import { catalog, features } => {
            commands::run_import(&config, catalog, features)?;
        }
        Commands::Recommend {
            title,
            top_n,
            json,
            catalog,
            features,
        } => {
            let source = commands::DatasetSource::from_args(catalog, features);
            let top_n = top_n.unwrap_or(config.top_n);
            commands::run_recommend(&config, &source, &title, top_n, json)?;
        }
        Commands::Songs { filter, limit } => {
            commands::list_songs(&config, filter, limit)?;
        }
        Commands::Clusters => {
            commands::show_clusters(&config)?;
        }
        Commands::Status => {
            commands::show_status(&config)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show_config(&config)?,
            ConfigAction::Get { key } => commands::config::get_config(&config, key)?,
            ConfigAction::Set { key, value } => commands::config::set_config(key, value)?,
            ConfigAction::Path => commands::config::show_path()?,
            ConfigAction::Example => commands::config::show_example()?,
            ConfigAction::Init => commands::config::init_config()?,
        },
    }

    Ok(())
}
