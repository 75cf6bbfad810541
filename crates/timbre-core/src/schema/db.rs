use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

use crate::dataset::Dataset;
use crate::error::Result;
use crate::import::ImportRecord;
use crate::model::{ClusterId, FeatureVector, SongId, SongRecord};

use super::migrations::MIGRATIONS;

/// A catalog database holding the most recently imported dataset.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) a database at the given path and apply migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.apply_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.apply_migrations()?;
        Ok(db)
    }

    /// Get a reference to the underlying connection (for advanced queries).
    #[must_use]
    pub const fn conn(&self) -> &Connection {
        &self.conn
    }

    fn apply_migrations(&self) -> Result<()> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
            [],
        )?;

        let mut stmt = self
            .conn
            .prepare("SELECT version FROM schema_migrations ORDER BY version")?;
        let applied: Vec<u32> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        for migration in MIGRATIONS {
            if !applied.contains(&migration.version) {
                log::info!(
                    "Applying migration {} ({})",
                    migration.version,
                    migration.name
                );
                self.conn.execute_batch(migration.sql)?;
                self.conn.execute(
                    "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
                    rusqlite::params![migration.version, migration.name],
                )?;
            }
        }

        Ok(())
    }
}

// Dataset storage
impl Database {
    /// Replace the stored dataset with `dataset` and log the import.
    ///
    /// Runs in one transaction: readers see either the old dataset or the
    /// new one, never a mix.
    pub fn replace_dataset(&self, dataset: &Dataset, import: &ImportRecord) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM features", [])?;
        tx.execute("DELETE FROM songs", [])?;

        {
            let mut insert_song = tx.prepare(
                "INSERT INTO songs (id, position, title, genres, artist, cluster_id, cluster_name)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            let mut insert_vector =
                tx.prepare("INSERT INTO features (song_id, vector) VALUES (?1, ?2)")?;

            for (position, (song, vector)) in dataset.iter().enumerate() {
                insert_song.execute(rusqlite::params![
                    song.id.as_str(),
                    i64::try_from(position).unwrap_or(i64::MAX),
                    song.title,
                    song.genres,
                    song.artist,
                    song.cluster_id.get(),
                    song.cluster_name,
                ])?;
                insert_vector.execute(rusqlite::params![
                    song.id.as_str(),
                    serde_json::to_string(vector)?,
                ])?;
            }
        }

        tx.execute(
            "INSERT INTO imports (
                catalog_source, features_source, song_count, cluster_count,
                dimension, feature_names, imported_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                import.catalog_source,
                import.features_source,
                i64::try_from(import.song_count).unwrap_or(i64::MAX),
                i64::try_from(import.cluster_count).unwrap_or(i64::MAX),
                i64::try_from(import.dimension).unwrap_or(i64::MAX),
                serde_json::to_string(&import.feature_names)?,
                import.imported_at.to_rfc3339(),
            ],
        )?;

        tx.commit()?;
        log::info!(
            "Stored {} songs ({} clusters, {} dimensions)",
            import.song_count,
            import.cluster_count,
            import.dimension
        );
        Ok(())
    }

    /// Load the stored dataset, re-validating the song/vector pairing.
    ///
    /// Returns an empty dataset if nothing has been imported yet.
    pub fn load_dataset(&self) -> Result<Dataset> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, genres, artist, cluster_id, cluster_name
             FROM songs
             ORDER BY position",
        )?;
        let songs = stmt
            .query_map([], |row| Self::row_to_song(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = self.conn.prepare("SELECT song_id, vector FROM features")?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut vectors = Vec::with_capacity(rows.len());
        for (id, json) in rows {
            let vector: FeatureVector = serde_json::from_str(&json)?;
            vectors.push((SongId::new(id), vector));
        }

        let dataset = Dataset::join(songs, vectors)?;
        log::debug!("Loaded {} songs from database", dataset.len());
        Ok(dataset)
    }

    /// Number of stored songs.
    pub fn song_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM songs", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// The most recent import, if any.
    pub fn latest_import(&self) -> Result<Option<ImportRecord>> {
        let row = self
            .conn
            .query_row(
                "SELECT catalog_source, features_source, song_count, cluster_count,
                        dimension, feature_names, imported_at
                 FROM imports
                 ORDER BY id DESC
                 LIMIT 1",
                [],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)?,
                        row.get::<_, i64>(3)?,
                        row.get::<_, i64>(4)?,
                        row.get::<_, String>(5)?,
                        row.get::<_, String>(6)?,
                    ))
                },
            )
            .optional()?;

        let Some((
            catalog_source,
            features_source,
            song_count,
            cluster_count,
            dimension,
            feature_names,
            imported_at,
        )) = row
        else {
            return Ok(None);
        };

        let imported_at = chrono::DateTime::parse_from_rfc3339(&imported_at)
            .map_err(|e| crate::Error::InvalidData(format!("bad import timestamp: {e}")))?
            .into();

        Ok(Some(ImportRecord {
            catalog_source,
            features_source,
            song_count: usize::try_from(song_count).unwrap_or(0),
            cluster_count: usize::try_from(cluster_count).unwrap_or(0),
            dimension: usize::try_from(dimension).unwrap_or(0),
            feature_names: serde_json::from_str(&feature_names)?,
            imported_at,
        }))
    }

    fn row_to_song(row: &rusqlite::Row) -> rusqlite::Result<SongRecord> {
        Ok(SongRecord {
            id: SongId::new(row.get::<_, String>(0)?),
            title: row.get(1)?,
            genres: row.get(2)?,
            artist: row.get(3)?,
            cluster_id: ClusterId::new(row.get(4)?),
            cluster_name: row.get(5)?,
        })
    }
}
