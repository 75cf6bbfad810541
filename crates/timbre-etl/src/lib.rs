//! Configuration and dataset loading for timbre.
//!
//! Reads the song catalog and feature tables from CSV, pairs them into a
//! validated [`Dataset`](timbre_core::Dataset), and imports the result into
//! the catalog database.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod features;
pub mod load;

pub use catalog::{read_catalog, read_catalog_path, CatalogTable};
pub use config::{ColumnConfig, Config};
pub use error::{LoadError, LoadResult};
pub use features::{read_features, read_features_path, FeatureTable};
pub use load::{import_csv, load_csv, pair_tables, LoadedDataset};
