use thiserror::Error;

use crate::model::SongId;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("dataset integrity error: {0}")]
    Integrity(#[from] IntegrityError),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

/// Problems that make a catalog and its feature vectors unsafe to pair.
///
/// These are raised while a [`Dataset`](crate::Dataset) is assembled, never
/// during a lookup. A dataset that exists has passed every one of them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityError {
    /// Positional pairing was requested but the two sides differ in length.
    #[error("catalog has {songs} songs but {vectors} feature vectors were supplied")]
    LengthMismatch { songs: usize, vectors: usize },

    #[error("song id {0} appears more than once in the catalog")]
    DuplicateSongId(SongId),

    #[error("song {0} has no feature vector")]
    MissingFeatures(SongId),

    #[error("feature vector {0} has no catalog entry")]
    OrphanFeatures(SongId),

    #[error("song {0} has more than one feature vector")]
    DuplicateFeatures(SongId),

    #[error("feature vector for {id} has {found} dimensions, expected {expected}")]
    DimensionMismatch {
        id: SongId,
        expected: usize,
        found: usize,
    },

    #[error("feature vector for {0} is empty")]
    EmptyVector(SongId),

    #[error("feature vector for {id} has a non-finite value at position {position}")]
    NonFinite { id: SongId, position: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
