//! Song catalog CSV reader.

use std::io::Read;
use std::path::Path;

use timbre_core::model::{ClusterId, SongId, SongRecord};

use crate::config::ColumnConfig;
use crate::error::{LoadError, LoadResult};

/// Song rows read from a catalog file.
#[derive(Debug, Clone)]
pub struct CatalogTable {
    pub songs: Vec<SongRecord>,
    /// Whether ids came from the key column rather than row positions.
    pub keyed: bool,
}

/// Read a catalog CSV file.
pub fn read_catalog_path(path: &Path, columns: &ColumnConfig) -> LoadResult<CatalogTable> {
    let reader = csv::Reader::from_path(path)?;
    read_catalog_csv(reader, &path.display().to_string(), columns)
}

/// Read catalog CSV data from any reader. `source_name` labels errors.
pub fn read_catalog<R: Read>(
    reader: R,
    source_name: &str,
    columns: &ColumnConfig,
) -> LoadResult<CatalogTable> {
    read_catalog_csv(csv::Reader::from_reader(reader), source_name, columns)
}

fn read_catalog_csv<R: Read>(
    mut reader: csv::Reader<R>,
    source_name: &str,
    columns: &ColumnConfig,
) -> LoadResult<CatalogTable> {
    let headers = reader.headers()?.clone();

    let required = |name: &str| {
        column_index(&headers, name).ok_or_else(|| LoadError::MissingColumn {
            source_name: source_name.to_string(),
            column: name.to_string(),
        })
    };
    let optional = |name: &str| {
        let index = column_index(&headers, name);
        if index.is_none() {
            log::warn!("{}: no `{}` column, leaving it blank", source_name, name);
        }
        index
    };

    let title_col = required(&columns.title)?;
    let cluster_col = required(&columns.cluster_id)?;
    let genres_col = optional(&columns.genres);
    let artist_col = optional(&columns.artist);
    let cluster_name_col = optional(&columns.cluster_name);
    let id_col = column_index(&headers, &columns.id);

    let mut songs = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        // Text fields are kept verbatim; titles are matched exactly.
        let field = |col: Option<usize>| {
            col.and_then(|c| record.get(c))
                .unwrap_or_default()
                .to_string()
        };

        let raw_cluster = record.get(cluster_col).unwrap_or_default();
        let cluster_id = parse_cluster_id(raw_cluster).ok_or_else(|| LoadError::InvalidValue {
            source_name: source_name.to_string(),
            line: line_of(&record),
            column: columns.cluster_id.clone(),
            value: raw_cluster.to_string(),
        })?;

        let id = match id_col {
            Some(_) => SongId::new(field(id_col).trim()),
            None => SongId::from_position(row),
        };

        songs.push(SongRecord {
            id,
            title: field(Some(title_col)),
            genres: field(genres_col),
            artist: field(artist_col),
            cluster_id,
            cluster_name: field(cluster_name_col),
        });
    }

    log::info!("Read {} songs from {}", songs.len(), source_name);
    Ok(CatalogTable {
        songs,
        keyed: id_col.is_some(),
    })
}

/// Position of the column named `name`, ignoring surrounding whitespace.
pub(crate) fn column_index(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == name)
}

/// 1-based line number of a record, or 0 if unknown.
pub(crate) fn line_of(record: &csv::StringRecord) -> u64 {
    record.position().map_or(0, |p| p.line())
}

/// Parse a cluster label. Integral floats such as `3.0` are accepted, since
/// clustering tools often write labels that way.
fn parse_cluster_id(raw: &str) -> Option<ClusterId> {
    let raw = raw.trim();
    if let Ok(id) = raw.parse::<i64>() {
        return Some(ClusterId::new(id));
    }
    let value = raw.parse::<f64>().ok()?;
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e15 {
        #[allow(clippy::cast_possible_truncation)]
        let id = value as i64;
        Some(ClusterId::new(id))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = "\
name_song,genres,name_artists,Clusters,Cluster_Name
Nightcall,synthwave,Kavinsky,0,Neon Drive
Tadow,\"jazz, soul\",Masego,1,Smooth
Midnight City,,M83,0.0,Neon Drive
";

    #[test]
    fn test_reads_default_columns() {
        let table = read_catalog(CATALOG.as_bytes(), "catalog", &ColumnConfig::default()).unwrap();

        assert!(!table.keyed);
        assert_eq!(table.songs.len(), 3);
        assert_eq!(table.songs[1].title, "Tadow");
        assert_eq!(table.songs[1].genres, "jazz, soul");
        assert_eq!(table.songs[1].artist, "Masego");
        assert_eq!(table.songs[1].cluster_id, ClusterId::new(1));
        assert_eq!(table.songs[1].cluster_name, "Smooth");
        assert_eq!(table.songs[2].cluster_id, ClusterId::new(0));
        assert_eq!(table.songs[2].genres, "");
    }

    #[test]
    fn test_positional_ids_without_key_column() {
        let table = read_catalog(CATALOG.as_bytes(), "catalog", &ColumnConfig::default()).unwrap();
        let ids: Vec<&str> = table.songs.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["0", "1", "2"]);
    }

    #[test]
    fn test_key_column_supplies_ids() {
        let data = "id,name_song,Clusters\nx9,First,2\na1,Second,2\n";
        let table = read_catalog(data.as_bytes(), "catalog", &ColumnConfig::default()).unwrap();

        assert!(table.keyed);
        assert_eq!(table.songs[0].id, SongId::new("x9"));
        assert_eq!(table.songs[1].id, SongId::new("a1"));
        assert_eq!(table.songs[0].artist, "");
    }

    #[test]
    fn test_title_whitespace_is_preserved() {
        let data = "id,name_song,Clusters\n x1 ,  Padded Title ,1\n";
        let table = read_catalog(data.as_bytes(), "catalog", &ColumnConfig::default()).unwrap();
        assert_eq!(table.songs[0].title, "  Padded Title ");
        assert_eq!(table.songs[0].id, SongId::new("x1"));
    }

    #[test]
    fn test_custom_column_names() {
        let columns = ColumnConfig {
            title: "track".into(),
            cluster_id: "cluster".into(),
            ..ColumnConfig::default()
        };
        let data = "track,cluster\nOne,4\n";
        let table = read_catalog(data.as_bytes(), "catalog", &columns).unwrap();
        assert_eq!(table.songs[0].title, "One");
        assert_eq!(table.songs[0].cluster_id, ClusterId::new(4));
    }

    #[test]
    fn test_missing_required_column() {
        let data = "name_song,genres\nOne,pop\n";
        let err = read_catalog(data.as_bytes(), "catalog", &ColumnConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingColumn { ref column, .. } if column == "Clusters"
        ));
    }

    #[test]
    fn test_invalid_cluster_id_reports_line() {
        let data = "name_song,Clusters\nOne,1\nTwo,lots\n";
        let err = read_catalog(data.as_bytes(), "catalog", &ColumnConfig::default()).unwrap_err();
        match err {
            LoadError::InvalidValue {
                line, column, value, ..
            } => {
                assert_eq!(line, 3);
                assert_eq!(column, "Clusters");
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_cluster_id() {
        assert_eq!(parse_cluster_id("7"), Some(ClusterId::new(7)));
        assert_eq!(parse_cluster_id(" -2 "), Some(ClusterId::new(-2)));
        assert_eq!(parse_cluster_id("3.0"), Some(ClusterId::new(3)));
        assert_eq!(parse_cluster_id("3.5"), None);
        assert_eq!(parse_cluster_id("NaN"), None);
        assert_eq!(parse_cluster_id(""), None);
    }
}
