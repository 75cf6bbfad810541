//! Integration tests for the CSV → database → recommendation path.
//!
//! These tests write small catalog and feature files to a temporary
//! directory, import them, and query the stored dataset.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use timbre_core::schema::Database;
use timbre_etl::{import_csv, load_csv, ColumnConfig, LoadError};
use timbre_search::{RecommendRequest, Recommender};

const CATALOG: &str = "\
name_song,genres,name_artists,Clusters,Cluster_Name
A,pop,Artist A,1,Upbeat
B,pop,Artist B,1,Upbeat
C,rock,Artist C,1,Upbeat
D,ambient,Artist D,2,Calm
";

// sim(A,B) = 0.9, sim(A,C) = 0.5
const FEATURES: &str = "\
,f1,f2
0,1.0,0.0
1,0.9,0.4358898943540674
2,0.5,0.8660254037844386
3,1.0,0.0
";

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// Test that CSV files load and recommend directly, without a database
#[test]
fn test_recommend_from_csv() {
    let temp_dir = TempDir::new().unwrap();
    let catalog = write(temp_dir.path(), "catalog.csv", CATALOG);
    let features = write(temp_dir.path(), "features.csv", FEATURES);

    let loaded = load_csv(&catalog, &features, &ColumnConfig::default()).unwrap();
    assert_eq!(loaded.feature_names, vec!["f1", "f2"]);

    let recommender = Recommender::new(Arc::new(loaded.dataset));
    let titles: Vec<String> = recommender
        .recommend("A", 2)
        .into_iter()
        .map(|r| r.title)
        .collect();
    assert_eq!(titles, vec!["B", "C"]);
}

/// Test the full import path and querying the stored dataset
#[test]
fn test_import_then_recommend() {
    let temp_dir = TempDir::new().unwrap();
    let catalog = write(temp_dir.path(), "catalog.csv", CATALOG);
    let features = write(temp_dir.path(), "features.csv", FEATURES);
    let db_path = temp_dir.path().join("timbre.db");

    let db = Database::open(&db_path).expect("Failed to open database");
    let import = import_csv(&db, &catalog, &features, &ColumnConfig::default()).unwrap();
    assert_eq!(import.song_count, 4);
    assert_eq!(import.cluster_count, 2);
    assert_eq!(import.dimension, 2);
    drop(db);

    // Reopen to make sure the data was committed
    let db = Database::open(&db_path).expect("Failed to reopen database");
    let latest = db.latest_import().unwrap().expect("import should be recorded");
    assert_eq!(latest.feature_names, vec!["f1", "f2"]);

    let recommender = Recommender::new(Arc::new(db.load_dataset().unwrap()));

    let response = recommender.query(&RecommendRequest::new("A").with_top_n(5));
    assert!(response.found);
    let titles: Vec<&str> = response
        .recommendations
        .iter()
        .map(|r| r.title.as_str())
        .collect();
    assert_eq!(titles, vec!["B", "C"]);
    assert!(response
        .recommendations
        .iter()
        .all(|r| r.cluster_name == "Upbeat"));

    let lonely = recommender.query(&RecommendRequest::new("D"));
    assert!(lonely.found);
    assert!(lonely.recommendations.is_empty());

    let missing = recommender.query(&RecommendRequest::new("Z"));
    assert!(!missing.found);
}

/// Test that a misaligned import fails and leaves the previous dataset intact
#[test]
fn test_failed_import_keeps_previous_dataset() {
    let temp_dir = TempDir::new().unwrap();
    let catalog = write(temp_dir.path(), "catalog.csv", CATALOG);
    let features = write(temp_dir.path(), "features.csv", FEATURES);
    let short_features = write(temp_dir.path(), "short.csv", "f1,f2\n1.0,0.0\n");

    let db = Database::open_in_memory().unwrap();
    import_csv(&db, &catalog, &features, &ColumnConfig::default()).unwrap();

    let err = import_csv(&db, &catalog, &short_features, &ColumnConfig::default()).unwrap_err();
    assert!(err.is_integrity());

    assert_eq!(db.song_count().unwrap(), 4);
    let latest = db.latest_import().unwrap().unwrap();
    assert!(latest.features_source.ends_with("features.csv"));
}

/// Test that a missing file surfaces as a CSV error
#[test]
fn test_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let features = write(temp_dir.path(), "features.csv", FEATURES);

    let err = load_csv(
        &temp_dir.path().join("nope.csv"),
        &features,
        &ColumnConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, LoadError::Csv(_)));
}
