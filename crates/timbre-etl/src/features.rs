//! Feature table CSV reader.

use std::io::Read;
use std::path::Path;

use timbre_core::model::{FeatureVector, SongId};

use crate::catalog::{column_index, line_of};
use crate::config::ColumnConfig;
use crate::error::{LoadError, LoadResult};

/// Feature vectors read from a feature file.
#[derive(Debug, Clone)]
pub struct FeatureTable {
    /// Feature column names, in vector order.
    pub names: Vec<String>,
    pub ids: Vec<SongId>,
    pub vectors: Vec<FeatureVector>,
    /// Whether ids came from the key column rather than row positions.
    pub keyed: bool,
}

/// Read a feature CSV file.
pub fn read_features_path(path: &Path, columns: &ColumnConfig) -> LoadResult<FeatureTable> {
    let reader = csv::Reader::from_path(path)?;
    read_features_csv(reader, &path.display().to_string(), columns)
}

/// Read feature CSV data from any reader. `source_name` labels errors.
///
/// Every column other than the key column, the configured ignored columns
/// and blank-headed columns (a dataframe's unnamed index) is a feature.
pub fn read_features<R: Read>(
    reader: R,
    source_name: &str,
    columns: &ColumnConfig,
) -> LoadResult<FeatureTable> {
    read_features_csv(csv::Reader::from_reader(reader), source_name, columns)
}

fn read_features_csv<R: Read>(
    mut reader: csv::Reader<R>,
    source_name: &str,
    columns: &ColumnConfig,
) -> LoadResult<FeatureTable> {
    let headers = reader.headers()?.clone();
    let id_col = column_index(&headers, &columns.id);

    let mut feature_cols = Vec::new();
    let mut names = Vec::new();
    for (index, header) in headers.iter().enumerate() {
        let header = header.trim();
        if Some(index) == id_col || columns.ignore.iter().any(|c| c == header) {
            continue;
        }
        if header.is_empty() {
            log::warn!("{}: skipping unnamed column {}", source_name, index);
            continue;
        }
        feature_cols.push(index);
        names.push(header.to_string());
    }

    if feature_cols.is_empty() {
        return Err(LoadError::NoFeatureColumns {
            source_name: source_name.to_string(),
        });
    }

    let mut ids = Vec::new();
    let mut vectors = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;

        let mut values = Vec::with_capacity(feature_cols.len());
        for (&col, name) in feature_cols.iter().zip(&names) {
            let raw = record.get(col).unwrap_or_default();
            let value = raw
                .trim()
                .parse::<f64>()
                .map_err(|_| LoadError::InvalidValue {
                    source_name: source_name.to_string(),
                    line: line_of(&record),
                    column: name.clone(),
                    value: raw.to_string(),
                })?;
            values.push(value);
        }

        let id = match id_col.and_then(|c| record.get(c)) {
            Some(key) => SongId::new(key.trim()),
            None => SongId::from_position(row),
        };
        ids.push(id);
        vectors.push(FeatureVector::new(values));
    }

    log::info!(
        "Read {} feature vectors ({} features) from {}",
        vectors.len(),
        names.len(),
        source_name
    );
    Ok(FeatureTable {
        names,
        ids,
        vectors,
        keyed: id_col.is_some(),
    })
}
