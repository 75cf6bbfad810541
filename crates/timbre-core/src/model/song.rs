use serde::{Deserialize, Serialize};

use crate::model::ids::{ClusterId, SongId};

/// A row of the song catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongRecord {
    pub id: SongId,

    /// Track title. Used as the lookup key for recommendations; not
    /// guaranteed unique.
    pub title: String,

    /// Genre string as supplied by the source (may list several genres).
    pub genres: String,

    /// Artist name(s) as supplied by the source.
    pub artist: String,

    /// Cluster assigned by the offline clustering step.
    pub cluster_id: ClusterId,

    /// Human-readable label of the cluster (e.g. "Chill Acoustic").
    pub cluster_name: String,
}

impl SongRecord {
    #[must_use]
    pub fn new(id: SongId, title: impl Into<String>, cluster_id: ClusterId) -> Self {
        Self {
            id,
            title: title.into(),
            genres: String::new(),
            artist: String::new(),
            cluster_id,
            cluster_name: String::new(),
        }
    }

    #[must_use]
    pub fn with_genres(mut self, genres: impl Into<String>) -> Self {
        self.genres = genres.into();
        self
    }

    #[must_use]
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = artist.into();
        self
    }

    #[must_use]
    pub fn with_cluster_name(mut self, name: impl Into<String>) -> Self {
        self.cluster_name = name.into();
        self
    }
}

/// A recommended song: the display columns of a catalog row plus the
/// similarity that ranked it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub genres: String,
    pub artist: String,
    pub cluster_name: String,
    pub cluster_id: ClusterId,
    pub similarity: f64,
}

impl Recommendation {
    #[must_use]
    pub fn from_record(record: &SongRecord, similarity: f64) -> Self {
        Self {
            title: record.title.clone(),
            genres: record.genres.clone(),
            artist: record.artist.clone(),
            cluster_name: record.cluster_name.clone(),
            cluster_id: record.cluster_id,
            similarity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_song_record_builder() {
        let song = SongRecord::new(SongId::new("1"), "Blue in Green", ClusterId::new(2))
            .with_artist("Miles Davis")
            .with_genres("jazz, modal")
            .with_cluster_name("Late Night");

        assert_eq!(song.title, "Blue in Green");
        assert_eq!(song.artist, "Miles Davis");
        assert_eq!(song.genres, "jazz, modal");
        assert_eq!(song.cluster_name, "Late Night");
        assert_eq!(song.cluster_id, ClusterId::new(2));
    }

    #[test]
    fn test_recommendation_projects_display_columns() {
        let song = SongRecord::new(SongId::new("9"), "So What", ClusterId::new(2))
            .with_artist("Miles Davis")
            .with_cluster_name("Late Night");

        let rec = Recommendation::from_record(&song, 0.75);
        assert_eq!(rec.title, "So What");
        assert_eq!(rec.artist, "Miles Davis");
        assert_eq!(rec.cluster_name, "Late Night");
        assert_eq!(rec.cluster_id, song.cluster_id);
        assert!((rec.similarity - 0.75).abs() < f64::EPSILON);
    }
}
