/// A schema migration.
#[derive(Debug)]
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    pub sql: &'static str,
}

const MIGRATION_001: &str = r#"
-- Song catalog (one row per song, `position` keeps catalog order)
CREATE TABLE IF NOT EXISTS songs (
    id TEXT PRIMARY KEY,
    position INTEGER NOT NULL UNIQUE,
    title TEXT NOT NULL,
    genres TEXT NOT NULL DEFAULT '',
    artist TEXT NOT NULL DEFAULT '',
    cluster_id INTEGER NOT NULL,
    cluster_name TEXT NOT NULL DEFAULT ''
);

CREATE INDEX IF NOT EXISTS idx_songs_title ON songs(title);
CREATE INDEX IF NOT EXISTS idx_songs_cluster_id ON songs(cluster_id);

-- Feature vectors, keyed by song (JSON array of numbers)
CREATE TABLE IF NOT EXISTS features (
    song_id TEXT PRIMARY KEY REFERENCES songs(id),
    vector TEXT NOT NULL
);

-- Import history
CREATE TABLE IF NOT EXISTS imports (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    catalog_source TEXT NOT NULL,
    features_source TEXT NOT NULL,
    song_count INTEGER NOT NULL,
    cluster_count INTEGER NOT NULL,
    dimension INTEGER NOT NULL,
    feature_names TEXT NOT NULL,
    imported_at TEXT NOT NULL
);
"#;

pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: MIGRATION_001,
}];
