use serde::{Deserialize, Serialize};

/// A dense embedding vector
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Vector {
    data: Vec<f32>,
}

impl Vector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    #[inline]
    #[must_use]
    pub fn zeros(dim: usize) -> Self {
        Self {
            data: vec![0.0; dim],
        }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    #[must_use]
    pub fn into_inner(self) -> Vec<f32> {
        self.data
    }

    /// Dot product, accumulated in f64.
    ///
    /// Returns `None` when the dimensions differ.
    #[inline]
    pub fn dot(&self, other: &Vector) -> Option<f64> {
        if self.dim() != other.dim() {
            return None;
        }
        Some(dot_product(&self.data, &other.data))
    }

    #[inline]
    pub fn norm(&self) -> f64 {
        dot_product(&self.data, &self.data).sqrt()
    }

    /// Raw cosine similarity in [-1.0, 1.0].
    ///
    /// Zero-norm vectors are orthogonal to everything and yield 0.0.
    /// Returns `None` when the dimensions differ.
    #[inline]
    pub fn cosine_similarity(&self, other: &Vector) -> Option<f64> {
        let dot = self.dot(other)?;
        let norm_a = self.norm();
        let norm_b = other.norm();

        if norm_a == 0.0 || norm_b == 0.0 {
            return Some(0.0);
        }

        let cosine = dot / (norm_a * norm_b);
        if cosine.is_finite() {
            Some(cosine)
        } else {
            Some(0.0)
        }
    }

    /// Normalize the vector to unit length in place
    #[inline]
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > f64::from(f32::EPSILON) {
            let inv_norm = (1.0 / norm) as f32;
            for x in &mut self.data {
                *x *= inv_norm;
            }
        }
    }

    /// Get normalized copy
    #[inline]
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut v = self.clone();
        v.normalize();
        v
    }
}

impl From<Vec<f32>> for Vector {
    fn from(data: Vec<f32>) -> Self {
        Self::new(data)
    }
}

/// Scalar dot product with two accumulators.
///
/// Summation order is fixed so the same inputs give bit-identical results
/// on every platform.
#[inline]
fn dot_product(a: &[f32], b: &[f32]) -> f64 {
    let mut dot0 = 0.0f64;
    let mut dot1 = 0.0f64;

    let chunks = a.chunks_exact(4);
    let remainder = chunks.remainder().len();
    for (a_chunk, b_chunk) in chunks.zip(b.chunks_exact(4)) {
        dot0 += f64::from(a_chunk[0]) * f64::from(b_chunk[0])
            + f64::from(a_chunk[1]) * f64::from(b_chunk[1]);
        dot1 += f64::from(a_chunk[2]) * f64::from(b_chunk[2])
            + f64::from(a_chunk[3]) * f64::from(b_chunk[3]);
    }

    for i in (a.len() - remainder)..a.len() {
        dot0 += f64::from(a[i]) * f64::from(b[i]);
    }

    dot0 + dot1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let v1 = Vector::new(vec![1.0, 0.0]);
        let v2 = Vector::new(vec![1.0, 0.0]);
        assert!((v1.cosine_similarity(&v2).unwrap() - 1.0).abs() < 1e-9);

        let v3 = Vector::new(vec![1.0, 0.0]);
        let v4 = Vector::new(vec![0.0, 1.0]);
        assert!(v3.cosine_similarity(&v4).unwrap().abs() < 1e-9);
    }

    #[test]
    fn test_cosine_zero_norm_is_zero() {
        let zero = Vector::zeros(3);
        let v = Vector::new(vec![1.0, 2.0, 3.0]);
        assert_eq!(zero.cosine_similarity(&v), Some(0.0));
        assert_eq!(zero.cosine_similarity(&zero), Some(0.0));
    }

    #[test]
    fn test_cosine_dimension_mismatch() {
        let v1 = Vector::new(vec![1.0, 0.0]);
        let v2 = Vector::new(vec![1.0, 0.0, 0.0]);
        assert!(v1.cosine_similarity(&v2).is_none());
    }

    #[test]
    fn test_dot_handles_remainder() {
        let v1 = Vector::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let v2 = Vector::new(vec![1.0; 6]);
        assert_eq!(v1.dot(&v2), Some(21.0));
    }

    #[test]
    fn test_normalize() {
        let v = Vector::new(vec![3.0, 4.0]).normalized();
        assert!((v.norm() - 1.0).abs() < 1e-6);

        let mut zero = Vector::zeros(4);
        zero.normalize();
        assert_eq!(zero.as_slice(), &[0.0; 4]);
    }

    #[test]
    fn test_serde_is_plain_array() {
        let v = Vector::new(vec![0.5, 0.25]);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "[0.5,0.25]");
    }
}
