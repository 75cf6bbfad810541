use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;

/// Record of one dataset import into the catalog database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRecord {
    /// Where the song catalog was read from (usually a file path).
    pub catalog_source: String,

    /// Where the feature vectors were read from.
    pub features_source: String,

    pub song_count: usize,
    pub cluster_count: usize,

    /// Length of every feature vector.
    pub dimension: usize,

    /// Feature column names, in vector order. Empty when unknown.
    pub feature_names: Vec<String>,

    pub imported_at: DateTime<Utc>,
}

impl ImportRecord {
    /// Describe an import of `dataset`, stamped with the current time.
    #[must_use]
    pub fn for_dataset(
        dataset: &Dataset,
        catalog_source: impl Into<String>,
        features_source: impl Into<String>,
    ) -> Self {
        Self {
            catalog_source: catalog_source.into(),
            features_source: features_source.into(),
            song_count: dataset.len(),
            cluster_count: dataset.cluster_count(),
            dimension: dataset.dimension(),
            feature_names: Vec::new(),
            imported_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_feature_names(mut self, names: Vec<String>) -> Self {
        self.feature_names = names;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClusterId, FeatureVector, SongId, SongRecord};

    #[test]
    fn test_for_dataset_counts() {
        let songs = vec![
            SongRecord::new(SongId::new("0"), "A", ClusterId::new(1)),
            SongRecord::new(SongId::new("1"), "B", ClusterId::new(2)),
        ];
        let vectors = vec![
            FeatureVector::new(vec![1.0, 0.0, 0.5]),
            FeatureVector::new(vec![0.0, 1.0, 0.5]),
        ];
        let dataset = Dataset::from_aligned(songs, vectors).unwrap();

        let record = ImportRecord::for_dataset(&dataset, "songs.csv", "features.csv")
            .with_feature_names(vec!["energy".into(), "tempo".into(), "valence".into()]);

        assert_eq!(record.song_count, 2);
        assert_eq!(record.cluster_count, 2);
        assert_eq!(record.dimension, 3);
        assert_eq!(record.catalog_source, "songs.csv");
        assert_eq!(record.feature_names.len(), 3);
    }
}
