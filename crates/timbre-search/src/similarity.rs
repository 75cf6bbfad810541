//! Cosine similarity.
//!
//! A zero-magnitude vector has similarity `0.0` to everything, itself
//! included. Each vector is divided by its largest absolute component
//! first, so finite inputs of any magnitude give a finite score. Results
//! are clamped to `[-1, 1]`; anything non-finite becomes `0.0`.

use timbre_core::model::{max_abs, FeatureVector};

/// Cosine similarity of two raw slices.
///
/// Returns `0.0` for empty or differently sized inputs.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (scale_a, scale_b) = (max_abs(a), max_abs(b));
    if scale_a == 0.0 || scale_b == 0.0 {
        return 0.0;
    }

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;

    for (x, y) in a.iter().zip(b) {
        let (x, y) = (x / scale_a, y / scale_b);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    normalize(dot, norm_a.sqrt() * norm_b.sqrt())
}

/// Cosine similarity of two feature vectors, reusing their cached norms.
pub fn cosine(a: &FeatureVector, b: &FeatureVector) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }
    normalize(a.scaled_dot(b), a.scaled_norm() * b.scaled_norm())
}

fn normalize(dot: f64, denom: f64) -> f64 {
    let similarity = dot / denom;
    if denom > 0.0 && similarity.is_finite() {
        similarity.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}
