use serde::{Deserialize, Serialize};

/// One song's audio feature vector.
///
/// The norm is computed once on construction. It is kept as the largest
/// absolute component (`scale`) times the norm of the vector divided by
/// that component, so very large or very small finite values neither
/// overflow nor underflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<f64>", into = "Vec<f64>")]
pub struct FeatureVector {
    values: Vec<f64>,
    scale: f64,
    scaled_norm: f64,
}

impl FeatureVector {
    #[must_use]
    pub fn new(values: Vec<f64>) -> Self {
        let scale = max_abs(&values);
        let scaled_norm = if scale > 0.0 && scale.is_finite() {
            values
                .iter()
                .map(|v| (v / scale) * (v / scale))
                .sum::<f64>()
                .sqrt()
        } else {
            0.0
        };
        Self {
            values,
            scale,
            scaled_norm,
        }
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of dimensions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Euclidean magnitude. May be infinite when the true norm exceeds
    /// `f64::MAX`; use [`scaled_norm`](Self::scaled_norm) for arithmetic.
    #[must_use]
    pub fn norm(&self) -> f64 {
        self.scale * self.scaled_norm
    }

    /// Largest absolute component, `0.0` for a zero vector.
    #[must_use]
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    /// Norm of the vector divided by [`scale`](Self::scale). At least `1.0`
    /// for a non-zero vector, `0.0` for a zero vector.
    #[must_use]
    pub const fn scaled_norm(&self) -> f64 {
        self.scaled_norm
    }

    /// Position of the first NaN or infinite value, if any.
    #[must_use]
    pub fn first_non_finite(&self) -> Option<usize> {
        self.values.iter().position(|v| !v.is_finite())
    }

    /// Dot product over the shared prefix of both vectors.
    #[must_use]
    pub fn dot(&self, other: &Self) -> f64 {
        self.values
            .iter()
            .zip(&other.values)
            .map(|(a, b)| a * b)
            .sum()
    }

    /// Dot product of both vectors after dividing each by its own scale.
    /// `0.0` when either is a zero vector.
    #[must_use]
    pub fn scaled_dot(&self, other: &Self) -> f64 {
        if self.scaled_norm == 0.0 || other.scaled_norm == 0.0 {
            return 0.0;
        }
        self.values
            .iter()
            .zip(&other.values)
            .map(|(a, b)| (a / self.scale) * (b / other.scale))
            .sum()
    }
}

/// Largest absolute value, `0.0` for an empty slice.
#[must_use]
pub fn max_abs(values: &[f64]) -> f64 {
    values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
}

impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

impl From<FeatureVector> for Vec<f64> {
    fn from(vector: FeatureVector) -> Self {
        vector.values
    }
}
