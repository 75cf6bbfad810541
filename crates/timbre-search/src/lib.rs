//! Cluster-aware similarity search for timbre.
//!
//! Ranks the members of a song's cluster by cosine similarity to the song's
//! audio feature vector.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod recommend;
pub mod similarity;

pub use recommend::{RecommendRequest, RecommendResponse, Recommender};
pub use timbre_core::DEFAULT_TOP_N;
pub use similarity::{cosine, cosine_similarity};
