use anyhow::{Context, Result};
use std::path::PathBuf;
use timbre_core::schema::Database;
use timbre_etl::Config;

pub fn run_import(config: &Config, catalog: PathBuf, features: PathBuf) -> Result<()> {
    log::info!(
        "Importing {} with features from {}",
        catalog.display(),
        features.display()
    );

    let db = Database::open(&config.database_path).with_context(|| {
        format!("Failed to open database {}", config.database_path.display())
    })?;

    let import = timbre_etl::import_csv(&db, &catalog, &features, &config.columns)
        .context("Import failed; the stored dataset was left unchanged")?;

    println!("\n✓ Import complete\n");
    println!("  Songs:      {}", import.song_count);
    println!("  Clusters:   {}", import.cluster_count);
    println!("  Features:   {}", import.dimension);
    println!("  Database:   {}", config.database_path.display());

    Ok(())
}
