//! Engine configuration
//!
//! Tunables that used to be scattered constants in request handlers live
//! here, with serde defaults so a partial JSON file is a valid config.

use crate::method::SimilarityMethod;
use crate::metrics::{DEFAULT_MIN_WORD_LEN, DEFAULT_NGRAM};
use crate::tfidf::{TfidfConfig, DEFAULT_MAX_FEATURES};
use serde::{Deserialize, Serialize};
use simrank_core::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Method used when a request does not name one
    pub default_method: SimilarityMethod,

    /// Result count used when a request does not give one
    pub default_limit: usize,

    /// Upper bound on any requested result count
    pub max_limit: usize,

    /// Threshold applied to cosine requests that do not supply one
    pub cosine_threshold: f32,

    /// Optional threshold applied to keyword recommendations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword_threshold: Option<f32>,

    /// Character n-gram size for jaccard and ngram methods
    pub ngram_size: usize,

    /// Minimum word length (characters) for word overlap
    pub min_word_len: usize,

    /// Vocabulary cap for TF-IDF
    pub tfidf_max_features: usize,

    /// Word n-gram range (inclusive) for TF-IDF terms
    pub tfidf_ngram_range: (usize, usize),

    /// Maximum number of candidates fetched from the store per request
    pub candidate_pool: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_method: SimilarityMethod::Jaccard,
            default_limit: 10,
            max_limit: 100,
            cosine_threshold: 0.5,
            keyword_threshold: None,
            ngram_size: DEFAULT_NGRAM,
            min_word_len: DEFAULT_MIN_WORD_LEN,
            tfidf_max_features: DEFAULT_MAX_FEATURES,
            tfidf_ngram_range: (1, 2),
            candidate_pool: 1000,
        }
    }
}

impl EngineConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig =
            serde_json::from_str(json).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_limit == 0 || self.max_limit == 0 {
            return Err(Error::InvalidConfig("limits must be positive".into()));
        }
        if self.default_limit > self.max_limit {
            return Err(Error::InvalidConfig(format!(
                "default_limit {} exceeds max_limit {}",
                self.default_limit, self.max_limit
            )));
        }
        check_threshold("cosine_threshold", self.cosine_threshold)?;
        if let Some(t) = self.keyword_threshold {
            check_threshold("keyword_threshold", t)?;
        }
        if self.ngram_size == 0 {
            return Err(Error::InvalidConfig("ngram_size must be positive".into()));
        }
        if self.tfidf_max_features == 0 {
            return Err(Error::InvalidConfig("tfidf_max_features must be positive".into()));
        }
        let (lo, hi) = self.tfidf_ngram_range;
        if lo == 0 || lo > hi {
            return Err(Error::InvalidConfig(format!(
                "invalid tfidf_ngram_range ({}, {})",
                lo, hi
            )));
        }
        if self.candidate_pool == 0 {
            return Err(Error::InvalidConfig("candidate_pool must be positive".into()));
        }
        Ok(())
    }

    pub fn tfidf(&self) -> TfidfConfig {
        TfidfConfig {
            max_features: self.tfidf_max_features,
            ngram_range: self.tfidf_ngram_range,
        }
    }
}

fn check_threshold(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!("{} must be within [0, 1], got {}", name, value)))
    }
}
