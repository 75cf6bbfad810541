//! Core domain model for timbre.
//!
//! This crate defines the song catalog model, the immutable [`Dataset`]
//! that joins catalog rows to their audio feature vectors, the integrity
//! checks performed when a dataset is assembled, and the SQLite schema used
//! to persist imported datasets.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod dataset;
pub mod error;
pub mod import;
pub mod model;
pub mod schema;

pub use dataset::{ClusterSummary, Dataset};
pub use error::{Error, IntegrityError, Result};
pub use import::ImportRecord;

/// Number of recommendations returned when the caller does not say.
pub const DEFAULT_TOP_N: usize = 5;
