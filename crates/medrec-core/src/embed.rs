//! Page embedding providers.
//!
//! The model that turns page text into vectors lives outside this crate.
//! [`EmbeddingProvider`] is the seam: [`PrecomputedEmbeddings`] replays
//! vectors produced elsewhere, and [`HashingEmbedder`] is a deterministic
//! bag-of-words fallback.

use crate::error::{CoreError, Result};

/// Default bucket count of [`HashingEmbedder`].
pub const DEFAULT_HASHING_DIMENSION: usize = 256;

pub trait EmbeddingProvider {
    /// One vector per text, index-aligned.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;
    fn dimension(&self) -> usize;
}

impl<T: EmbeddingProvider + ?Sized> EmbeddingProvider for Box<T> {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        (**self).embed_batch(texts)
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }
}

/// Scales `vector` to unit length; zero vectors are left untouched.
pub fn normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}

/// Vectors computed ahead of time, one per page in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct PrecomputedEmbeddings {
    vectors: Vec<Vec<f32>>,
    dimension: usize,
}

impl PrecomputedEmbeddings {
    /// Validates that all vectors share one dimension and normalizes them.
    pub fn new(mut vectors: Vec<Vec<f32>>) -> Result<Self> {
        let dimension = vectors.first().map_or(0, Vec::len);
        for (index, vector) in vectors.iter_mut().enumerate() {
            if vector.len() != dimension {
                return Err(CoreError::EmbeddingDimension {
                    index,
                    expected: dimension,
                    actual: vector.len(),
                });
            }
            normalize(vector);
        }
        Ok(Self { vectors, dimension })
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

impl EmbeddingProvider for PrecomputedEmbeddings {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.len() != self.vectors.len() {
            return Err(CoreError::EmbeddingCount {
                expected: texts.len(),
                actual: self.vectors.len(),
            });
        }
        Ok(self.vectors.clone())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Hashes lower-cased alphanumeric tokens into a fixed number of buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_HASHING_DIMENSION)
    }
}

impl HashingEmbedder {
    /// A dimension of zero is raised to one.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; self.dimension];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
        {
            let bucket = fnv1a(&token.to_lowercase()) % self.dimension as u64;
            vector[bucket as usize] += 1.0;
        }
        normalize(&mut vector);
        vector
    }
}

impl EmbeddingProvider for HashingEmbedder {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed(text)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

fn fnv1a(token: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    token.bytes().fold(OFFSET, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(PRIME)
    })
}
