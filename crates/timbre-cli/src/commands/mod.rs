pub mod clusters;
pub mod config;
pub mod import;
pub mod recommend;
pub mod songs;
pub mod status;

pub use clusters::show_clusters;
pub use import::run_import;
pub use recommend::run_recommend;
pub use songs::list_songs;
pub use status::show_status;

use anyhow::{Context, Result};
use std::path::PathBuf;
use timbre_core::schema::Database;
use timbre_core::Dataset;
use timbre_etl::Config;

/// Where a command reads its dataset from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    /// The dataset stored by the last `timbre import`.
    Database,
    /// A catalog CSV and a feature CSV, read directly.
    Csv { catalog: PathBuf, features: PathBuf },
}

impl DatasetSource {
    /// Build from the optional `--catalog` / `--features` pair. clap makes
    /// sure the two are given together.
    pub fn from_args(catalog: Option<PathBuf>, features: Option<PathBuf>) -> Self {
        match (catalog, features) {
            (Some(catalog), Some(features)) => Self::Csv { catalog, features },
            _ => Self::Database,
        }
    }
}

/// Load the dataset a command works on.
pub fn load_dataset(config: &Config, source: &DatasetSource) -> Result<Dataset> {
    match source {
        DatasetSource::Csv { catalog, features } => {
            let loaded = timbre_etl::load_csv(catalog, features, &config.columns)
                .with_context(|| {
                    format!(
                        "Failed to load {} and {}",
                        catalog.display(),
                        features.display()
                    )
                })?;
            Ok(loaded.dataset)
        }
        DatasetSource::Database => {
            let db = Database::open(&config.database_path).with_context(|| {
                format!("Failed to open database {}", config.database_path.display())
            })?;
            if db.latest_import()?.is_none() {
                anyhow::bail!(
                    "No dataset imported yet.\n\nRun 'timbre import --catalog <csv> --features <csv>' first."
                );
            }
            db.load_dataset().context("Stored dataset failed validation")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_source_from_args() {
        assert_eq!(DatasetSource::from_args(None, None), DatasetSource::Database);
        assert_eq!(
            DatasetSource::from_args(Some("a.csv".into()), Some("b.csv".into())),
            DatasetSource::Csv {
                catalog: "a.csv".into(),
                features: "b.csv".into()
            }
        );
    }
}
