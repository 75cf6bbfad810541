pub mod features;
pub mod ids;
pub mod song;

pub use features::{max_abs, FeatureVector};
pub use ids::{ClusterId, SongId};
pub use song::{Recommendation, SongRecord};
