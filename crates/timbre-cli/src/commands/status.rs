use anyhow::Result;
use timbre_core::schema::Database;
use timbre_etl::Config;

pub fn show_status(config: &Config) -> Result<()> {
    let db = Database::open(&config.database_path)?;

    println!("\n📊 Timbre Status\n");
    println!("  Database: {}", config.database_path.display());

    let Some(import) = db.latest_import()? else {
        println!("  No dataset imported yet.");
        println!("\n  Run `timbre import --catalog <csv> --features <csv>` to add one");
        return Ok(());
    };

    println!("  Songs: {}", db.song_count()?);
    println!("  Clusters: {}", import.cluster_count);
    println!("  Feature dimensions: {}", import.dimension);
    if !import.feature_names.is_empty() {
        println!("  Features: {}", import.feature_names.join(", "));
    }
    println!("\n  Last import: {}", import.imported_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("    catalog:  {}", import.catalog_source);
    println!("    features: {}", import.features_source);

    Ok(())
}
