//! Similarity method selection
//!
//! Callers name a method with a string (`"jaccard"`, `"tfidf"`, ...). The
//! name is parsed once at the boundary into [`SimilarityMethod`]; from then
//! on dispatch is an exhaustive `match`.

use serde::{Deserialize, Serialize};
use simrank_core::Error;
use std::str::FromStr;

/// The interchangeable ranking strategies
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMethod {
    /// Cosine over caller-supplied embeddings
    Cosine,
    /// Jaccard over character bigram sets
    Jaccard,
    /// Normalized edit distance
    Levenshtein,
    /// Dice overlap of character bigram bags
    Ngram,
    /// Jaccard over word sets
    WordOverlap,
    /// Cosine over TF-IDF vectors built per call
    Tfidf,
}

impl SimilarityMethod {
    /// Every method, in catalog order
    pub const ALL: [SimilarityMethod; 6] = [
        SimilarityMethod::Cosine,
        SimilarityMethod::Jaccard,
        SimilarityMethod::Levenshtein,
        SimilarityMethod::Ngram,
        SimilarityMethod::WordOverlap,
        SimilarityMethod::Tfidf,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SimilarityMethod::Cosine => "cosine",
            SimilarityMethod::Jaccard => "jaccard",
            SimilarityMethod::Levenshtein => "levenshtein",
            SimilarityMethod::Ngram => "ngram",
            SimilarityMethod::WordOverlap => "word_overlap",
            SimilarityMethod::Tfidf => "tfidf",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SimilarityMethod::Cosine => "Cosine similarity over text embeddings (vector based, most accurate)",
            SimilarityMethod::Jaccard => "Jaccard similarity over character bigrams",
            SimilarityMethod::Levenshtein => "Edit distance similarity",
            SimilarityMethod::Ngram => "Character n-gram overlap (Dice coefficient)",
            SimilarityMethod::WordOverlap => "Word overlap similarity",
            SimilarityMethod::Tfidf => "TF-IDF cosine similarity",
        }
    }

    /// Whether the method needs embeddings for the query and every candidate
    pub fn requires_embedding(&self) -> bool {
        matches!(self, SimilarityMethod::Cosine)
    }
}

impl std::fmt::Display for SimilarityMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SimilarityMethod {
    type Err = Error;

    /// Case-insensitive; surrounding whitespace is ignored.
    ///
    /// An empty name is an invalid argument, an unknown name is reported
    /// verbatim as unsupported.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidArgument("method must not be empty".to_string()));
        }

        let lowered = trimmed.to_ascii_lowercase();
        SimilarityMethod::ALL
            .into_iter()
            .find(|m| m.name() == lowered)
            .ok_or_else(|| Error::UnsupportedMethod(s.to_string()))
    }
}

/// Catalog entry describing one method
#[derive(Debug, Clone, Serialize)]
pub struct MethodInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub requires_embedding: bool,
}

impl From<SimilarityMethod> for MethodInfo {
    fn from(method: SimilarityMethod) -> Self {
        Self {
            name: method.name(),
            description: method.description(),
            requires_embedding: method.requires_embedding(),
        }
    }
}

/// Describe every supported method, in catalog order
pub fn method_catalog() -> Vec<MethodInfo> {
    SimilarityMethod::ALL.into_iter().map(MethodInfo::from).collect()
}
