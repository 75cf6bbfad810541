//! Song recommendations from within a cluster.
//!
//! Given a title, the [`Recommender`] finds the song's row, takes every other
//! member of the same cluster, scores each with [`cosine`] against the
//! song's vector and returns the best `top_n`, most similar first.
//!
//! The query row is removed from the candidates by identity before ranking.
//! A second catalog row carrying the same title is an ordinary candidate.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use timbre_core::model::Recommendation;
use timbre_core::{Dataset, DEFAULT_TOP_N};

use crate::similarity::cosine;

const fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

/// A recommendation query as a service would receive it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendRequest {
    pub song_title: String,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl RecommendRequest {
    #[must_use]
    pub fn new(song_title: impl Into<String>) -> Self {
        Self {
            song_title: song_title.into(),
            top_n: DEFAULT_TOP_N,
        }
    }

    #[must_use]
    pub const fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }
}

/// Answer to a [`RecommendRequest`].
///
/// `found == false` means the title is not in the catalog. `found == true`
/// with no recommendations means the song's cluster has no other members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub found: bool,
    pub recommendations: Vec<Recommendation>,
}

impl RecommendResponse {
    #[must_use]
    pub const fn not_found() -> Self {
        Self {
            found: false,
            recommendations: Vec::new(),
        }
    }
}

/// Ranks cluster neighbours of a song by feature similarity.
///
/// Cheap to clone; clones share the same immutable [`Dataset`].
#[derive(Debug, Clone)]
pub struct Recommender {
    dataset: Arc<Dataset>,
}

impl Recommender {
    #[must_use]
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self { dataset }
    }

    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Up to `top_n` songs from the same cluster as `song_title`, most
    /// similar first.
    ///
    /// Empty when the title is unknown, when the cluster has no other
    /// members, or when `top_n` is zero.
    pub fn recommend(&self, song_title: &str, top_n: usize) -> Vec<Recommendation> {
        self.query(&RecommendRequest {
            song_title: song_title.to_string(),
            top_n,
        })
        .recommendations
    }

    /// Like [`recommend`](Self::recommend), but reports whether the title
    /// was found.
    pub fn query(&self, request: &RecommendRequest) -> RecommendResponse {
        let Some((row, _)) = self.dataset.find(&request.song_title) else {
            log::debug!("No song titled {:?}", request.song_title);
            return RecommendResponse::not_found();
        };

        RecommendResponse {
            found: true,
            recommendations: self.recommend_row(row, request.top_n),
        }
    }

    /// Recommendations for the song at catalog row `row`.
    ///
    /// Empty for an out-of-range row.
    pub fn recommend_row(&self, row: usize, top_n: usize) -> Vec<Recommendation> {
        self.rank(row, top_n)
            .into_iter()
            .filter_map(|(candidate, similarity)| {
                self.dataset
                    .song(candidate)
                    .map(|song| Recommendation::from_record(song, similarity))
            })
            .collect()
    }

    /// `(row, similarity)` for the best `top_n` cluster neighbours of `row`.
    fn rank(&self, row: usize, top_n: usize) -> Vec<(usize, f64)> {
        if top_n == 0 {
            return Vec::new();
        }
        let (Some(song), Some(query)) = (self.dataset.song(row), self.dataset.features(row)) else {
            return Vec::new();
        };

        let members = self.dataset.cluster_members(song.cluster_id);
        let mut scored: Vec<(usize, f64)> = members
            .iter()
            .copied()
            .filter(|&candidate| candidate != row)
            .filter_map(|candidate| {
                self.dataset
                    .features(candidate)
                    .map(|vector| (candidate, cosine(query, vector)))
            })
            .collect();

        // Stable: equal scores stay in catalog order.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(top_n);

        log::debug!(
            "Ranked {} neighbours of {:?} in cluster {}, keeping {}",
            members.len().saturating_sub(1),
            song.title,
            song.cluster_id,
            scored.len()
        );

        scored
    }
}
