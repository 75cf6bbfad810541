//! Dataset loading error types.

use thiserror::Error;
use timbre_core::IntegrityError;

/// Errors that can occur while reading or importing a dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The CSV reader failed (unreadable file, malformed row, ragged row).
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row.
    #[error("{source_name}: missing column `{column}`")]
    MissingColumn { source_name: String, column: String },

    /// A field could not be parsed into the type its column requires.
    #[error("{source_name}, line {line}: invalid value {value:?} in column `{column}`")]
    InvalidValue {
        source_name: String,
        line: u64,
        column: String,
        value: String,
    },

    /// The key column exists in one table but not the other, so rows can
    /// be joined neither by key nor by position.
    #[error("key column `{column}` is present in {present_in} but not in {missing_in}")]
    KeyColumnMismatch {
        column: String,
        present_in: String,
        missing_in: String,
    },

    /// The feature table has no numeric columns left after exclusions.
    #[error("{source_name}: no feature columns")]
    NoFeatureColumns { source_name: String },

    /// The catalog and feature tables cannot be paired safely.
    #[error("dataset integrity error: {0}")]
    Integrity(#[from] IntegrityError),

    /// An error propagated from the core layer (database access).
    #[error("database error: {0}")]
    Core(#[from] timbre_core::Error),
}

impl LoadError {
    /// Returns `true` when the inputs were readable but disagree with each
    /// other.
    pub fn is_integrity(&self) -> bool {
        matches!(
            self,
            Self::Integrity(_)
                | Self::KeyColumnMismatch { .. }
                | Self::Core(timbre_core::Error::Integrity(_))
        )
    }
}

/// Convenience alias for loading results.
pub type LoadResult<T> = std::result::Result<T, LoadError>;
