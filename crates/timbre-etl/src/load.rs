//! Pairing catalog and feature tables, and importing the result.

use std::path::Path;

use timbre_core::schema::Database;
use timbre_core::{Dataset, ImportRecord};

use crate::catalog::{read_catalog_path, CatalogTable};
use crate::config::ColumnConfig;
use crate::error::{LoadError, LoadResult};
use crate::features::{read_features_path, FeatureTable};

/// A validated dataset together with the names of its features.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub dataset: Dataset,
    pub feature_names: Vec<String>,
}

/// Pair a catalog table with a feature table.
///
/// Tables that both carry the key column are joined by key. Tables that
/// both lack it are paired by row position. Anything else is refused.
pub fn pair_tables(
    catalog: CatalogTable,
    features: FeatureTable,
    columns: &ColumnConfig,
) -> LoadResult<LoadedDataset> {
    let dataset = match (catalog.keyed, features.keyed) {
        (true, true) => Dataset::join(catalog.songs, features.ids.into_iter().zip(features.vectors))?,
        (false, false) => {
            log::info!(
                "No `{}` column in either table, pairing rows by position",
                columns.id
            );
            Dataset::from_aligned(catalog.songs, features.vectors)?
        }
        (true, false) => {
            return Err(LoadError::KeyColumnMismatch {
                column: columns.id.clone(),
                present_in: String::from("the catalog"),
                missing_in: String::from("the feature table"),
            });
        }
        (false, true) => {
            return Err(LoadError::KeyColumnMismatch {
                column: columns.id.clone(),
                present_in: String::from("the feature table"),
                missing_in: String::from("the catalog"),
            });
        }
    };

    Ok(LoadedDataset {
        dataset,
        feature_names: features.names,
    })
}

/// Read and pair a catalog CSV and a feature CSV.
pub fn load_csv(
    catalog_path: &Path,
    features_path: &Path,
    columns: &ColumnConfig,
) -> LoadResult<LoadedDataset> {
    let catalog = read_catalog_path(catalog_path, columns)?;
    let features = read_features_path(features_path, columns)?;
    pair_tables(catalog, features, columns)
}

/// Load a catalog CSV and a feature CSV and replace the database's dataset
/// with them.
///
/// Nothing is written unless both files load and pair cleanly.
pub fn import_csv(
    db: &Database,
    catalog_path: &Path,
    features_path: &Path,
    columns: &ColumnConfig,
) -> LoadResult<ImportRecord> {
    let loaded = load_csv(catalog_path, features_path, columns)?;

    let import = ImportRecord::for_dataset(
        &loaded.dataset,
        catalog_path.display().to_string(),
        features_path.display().to_string(),
    )
    .with_feature_names(loaded.feature_names);

    db.replace_dataset(&loaded.dataset, &import)?;
    Ok(import)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::read_catalog;
    use crate::features::read_features;
    use timbre_core::model::ClusterId;
    use timbre_core::IntegrityError;

    fn tables(catalog: &str, features: &str) -> (CatalogTable, FeatureTable) {
        let columns = ColumnConfig::default();
        (
            read_catalog(catalog.as_bytes(), "catalog", &columns).unwrap(),
            read_features(features.as_bytes(), "features", &columns).unwrap(),
        )
    }

    #[test]
    fn test_positional_pairing() {
        let (catalog, features) = tables(
            "name_song,Clusters\nA,1\nB,1\n",
            "energy,valence\n1,0\n0,1\n",
        );
        let loaded = pair_tables(catalog, features, &ColumnConfig::default()).unwrap();

        assert_eq!(loaded.dataset.len(), 2);
        assert_eq!(loaded.feature_names, vec!["energy", "valence"]);
        let (row, _) = loaded.dataset.find("B").unwrap();
        assert_eq!(loaded.dataset.features(row).unwrap().values(), &[0.0, 1.0]);
    }

    #[test]
    fn test_positional_pairing_rejects_row_count_mismatch() {
        let (catalog, features) = tables("name_song,Clusters\nA,1\nB,1\n", "energy\n1\n");
        let err = pair_tables(catalog, features, &ColumnConfig::default()).unwrap_err();

        assert!(err.is_integrity());
        assert!(matches!(
            err,
            LoadError::Integrity(IntegrityError::LengthMismatch {
                songs: 2,
                vectors: 1
            })
        ));
    }

    #[test]
    fn test_keyed_pairing_survives_reordering() {
        let (catalog, features) = tables(
            "id,name_song,Clusters\ns1,A,1\ns2,B,2\n",
            "id,energy\ns2,0.2\ns1,0.9\n",
        );
        let loaded = pair_tables(catalog, features, &ColumnConfig::default()).unwrap();

        let (row, song) = loaded.dataset.find("A").unwrap();
        assert_eq!(song.cluster_id, ClusterId::new(1));
        assert_eq!(loaded.dataset.features(row).unwrap().values(), &[0.9]);
    }

    #[test]
    fn test_keyed_pairing_rejects_missing_vector() {
        let (catalog, features) = tables(
            "id,name_song,Clusters\ns1,A,1\ns2,B,2\n",
            "id,energy\ns1,0.9\n",
        );
        let err = pair_tables(catalog, features, &ColumnConfig::default()).unwrap_err();
        assert!(err.is_integrity());
    }

    #[test]
    fn test_key_in_one_table_only() {
        let (catalog, features) = tables("id,name_song,Clusters\ns1,A,1\n", "energy\n0.9\n");
        let err = pair_tables(catalog, features, &ColumnConfig::default()).unwrap_err();
        assert!(matches!(err, LoadError::KeyColumnMismatch { .. }));
        assert!(err.to_string().contains("present in the catalog"));
    }
}
