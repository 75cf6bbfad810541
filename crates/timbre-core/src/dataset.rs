//! The immutable pairing of a song catalog with its feature vectors.
//!
//! A [`Dataset`] can only be built through [`Dataset::join`] (rows matched by
//! [`SongId`]) or [`Dataset::from_aligned`] (rows matched by position). Both
//! validate the pairing and fail with an [`IntegrityError`] rather than
//! produce a dataset in which a song could be scored against another song's
//! vector. Once built, a dataset is never mutated; share it behind an `Arc`.

use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::IntegrityError;
use crate::model::{ClusterId, FeatureVector, SongId, SongRecord};

/// Size and label of one cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub cluster_id: ClusterId,
    /// Name carried by the cluster's first song in catalog order.
    pub cluster_name: String,
    pub song_count: usize,
}

/// Catalog rows and feature vectors, aligned by row index.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    songs: Vec<SongRecord>,
    features: Vec<FeatureVector>,
    dimension: usize,
    /// Title to the row of its first occurrence.
    titles: HashMap<String, usize>,
    /// Cluster to its member rows, in catalog order.
    clusters: BTreeMap<ClusterId, Vec<usize>>,
}

impl Dataset {
    /// A dataset with no songs.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Pair each song with the vector carrying the same [`SongId`].
    ///
    /// Catalog order is kept; the order of `vectors` is irrelevant. Every song
    /// needs exactly one vector and every vector needs a song.
    pub fn join<I>(songs: Vec<SongRecord>, vectors: I) -> Result<Self, IntegrityError>
    where
        I: IntoIterator<Item = (SongId, FeatureVector)>,
    {
        let mut by_id: HashMap<SongId, FeatureVector> = HashMap::new();
        for (id, vector) in vectors {
            match by_id.entry(id) {
                Entry::Occupied(entry) => {
                    return Err(IntegrityError::DuplicateFeatures(entry.key().clone()));
                }
                Entry::Vacant(entry) => {
                    entry.insert(vector);
                }
            }
        }

        check_unique_ids(&songs)?;

        let mut features = Vec::with_capacity(songs.len());
        for song in &songs {
            let vector = by_id
                .remove(&song.id)
                .ok_or_else(|| IntegrityError::MissingFeatures(song.id.clone()))?;
            features.push(vector);
        }

        if let Some(orphan) = by_id.into_keys().min() {
            return Err(IntegrityError::OrphanFeatures(orphan));
        }

        Self::assemble(songs, features)
    }

    /// Pair the song at each row with the vector at the same row.
    ///
    /// Only safe when both sources were produced together in the same order;
    /// the length check is the one thing that can be verified here.
    pub fn from_aligned(
        songs: Vec<SongRecord>,
        vectors: Vec<FeatureVector>,
    ) -> Result<Self, IntegrityError> {
        if songs.len() != vectors.len() {
            return Err(IntegrityError::LengthMismatch {
                songs: songs.len(),
                vectors: vectors.len(),
            });
        }
        check_unique_ids(&songs)?;
        Self::assemble(songs, vectors)
    }

    fn assemble(
        songs: Vec<SongRecord>,
        features: Vec<FeatureVector>,
    ) -> Result<Self, IntegrityError> {
        let dimension = features.first().map_or(0, FeatureVector::len);

        for (song, vector) in songs.iter().zip(&features) {
            if vector.is_empty() {
                return Err(IntegrityError::EmptyVector(song.id.clone()));
            }
            if vector.len() != dimension {
                return Err(IntegrityError::DimensionMismatch {
                    id: song.id.clone(),
                    expected: dimension,
                    found: vector.len(),
                });
            }
            if let Some(position) = vector.first_non_finite() {
                return Err(IntegrityError::NonFinite {
                    id: song.id.clone(),
                    position,
                });
            }
        }

        let mut titles = HashMap::new();
        let mut clusters: BTreeMap<ClusterId, Vec<usize>> = BTreeMap::new();
        for (row, song) in songs.iter().enumerate() {
            titles.entry(song.title.clone()).or_insert(row);
            clusters.entry(song.cluster_id).or_default().push(row);
        }

        log::debug!(
            "Assembled dataset: {} songs, {} clusters, {} dimensions",
            songs.len(),
            clusters.len(),
            dimension
        );

        Ok(Self {
            songs,
            features,
            dimension,
            titles,
            clusters,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.songs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// Length shared by every feature vector (0 for an empty dataset).
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    #[must_use]
    pub fn songs(&self) -> &[SongRecord] {
        &self.songs
    }

    #[must_use]
    pub fn song(&self, row: usize) -> Option<&SongRecord> {
        self.songs.get(row)
    }

    #[must_use]
    pub fn features(&self, row: usize) -> Option<&FeatureVector> {
        self.features.get(row)
    }

    /// Songs paired with their vectors, in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&SongRecord, &FeatureVector)> {
        self.songs.iter().zip(&self.features)
    }

    /// Exact-match title lookup. Duplicate titles resolve to the first row.
    #[must_use]
    pub fn find(&self, title: &str) -> Option<(usize, &SongRecord)> {
        let row = *self.titles.get(title)?;
        Some((row, &self.songs[row]))
    }

    /// Rows belonging to `cluster_id`, in catalog order.
    #[must_use]
    pub fn cluster_members(&self, cluster_id: ClusterId) -> &[usize] {
        self.clusters
            .get(&cluster_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    /// Song counts per cluster, ordered by cluster id.
    #[must_use]
    pub fn cluster_summaries(&self) -> Vec<ClusterSummary> {
        self.clusters
            .iter()
            .map(|(&cluster_id, rows)| ClusterSummary {
                cluster_id,
                cluster_name: rows
                    .first()
                    .map(|&row| self.songs[row].cluster_name.clone())
                    .unwrap_or_default(),
                song_count: rows.len(),
            })
            .collect()
    }

    /// Distinct titles in catalog order.
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.songs
            .iter()
            .enumerate()
            .filter(|(row, song)| self.titles.get(&song.title) == Some(row))
            .map(|(_, song)| song.title.as_str())
    }
}

fn check_unique_ids(songs: &[SongRecord]) -> Result<(), IntegrityError> {
    let mut seen = HashSet::with_capacity(songs.len());
    for song in songs {
        if !seen.insert(&song.id) {
            return Err(IntegrityError::DuplicateSongId(song.id.clone()));
        }
    }
    Ok(())
}
