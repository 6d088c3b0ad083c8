//! Embedder contract and a deterministic hash-based implementation.
//!
//! The ranking engine never computes embeddings itself: callers obtain
//! vectors from an [`Embedder`] before ranking and pass them in on the
//! [`Query`](crate::Query) and [`Candidate`](crate::Candidate) values.
//! Embedders are long-lived and shared by reference, so loading a model
//! happens once per process.

use crate::vector::Vector;

/// Maps text to a fixed-length, L2-normalized vector.
///
/// Implementations must be deterministic for a given [`model_id`](Embedder::model_id).
/// Vectors produced under different model ids are not comparable.
pub trait Embedder: Send + Sync {
    /// Identifier of the model (and version) producing the vectors
    fn model_id(&self) -> &str;

    /// Length of every vector produced
    fn dimension(&self) -> usize;

    /// Embed a single text. Blank text yields the zero vector.
    fn embed(&self, text: &str) -> Vector;

    /// Embed many texts, preserving order
    fn embed_batch(&self, texts: &[&str]) -> Vec<Vector> {
        texts.iter().map(|t| self.embed(t)).collect()
    }
}

/// FNV-1a offset basis (64-bit)
const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;

/// FNV-1a prime (64-bit)
const FNV_PRIME: u64 = 0x0100_0000_01b3;

/// Default embedding dimension
pub const DEFAULT_HASH_DIM: usize = 384;

/// Lexical embedder hashing character trigrams and words into buckets.
///
/// Not semantic, but stable across processes and platforms, needs no model
/// files, and keeps the cosine path usable when no ML embedder is wired in.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimension: usize,
    model_id: String,
}

impl HashEmbedder {
    /// # Panics
    ///
    /// Panics if `dimension` is zero.
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        assert!(dimension > 0, "dimension must be > 0");
        Self {
            dimension,
            model_id: format!("fnv-trigram-{}", dimension),
        }
    }

    fn bucket(&self, token: &str) -> usize {
        (fnv1a(token.as_bytes()) % self.dimension as u64) as usize
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_HASH_DIM)
    }
}

impl Embedder for HashEmbedder {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, text: &str) -> Vector {
        let mut vector = vec![0.0f32; self.dimension];
        let lowered = text.trim().to_lowercase();
        if lowered.is_empty() {
            return Vector::new(vector);
        }

        let padded: Vec<char> = format!("  {}  ", lowered).chars().collect();
        let mut trigram = String::with_capacity(12);
        for window in padded.windows(3) {
            trigram.clear();
            trigram.extend(window.iter());
            vector[self.bucket(&trigram)] += 1.0;
        }

        // Words contribute more than trigrams
        for word in lowered.split_whitespace() {
            vector[self.bucket(word)] += 2.0;
        }

        let mut vector = Vector::new(vector);
        vector.normalize();
        vector
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET;
    for &b in bytes {
        hash ^= u64::from(b);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}
