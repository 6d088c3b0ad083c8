//! Ranking orchestrator
//!
//! Turns `query + candidates + method` into an ordered, thresholded top-K
//! list. Every call is pure: it reads only its inputs and the engine
//! configuration, so a [`Ranker`] can be shared freely between threads.

use crate::config::EngineConfig;
use crate::explain::{RankResponse, RankStats};
use crate::method::SimilarityMethod;
use crate::metrics::{
    cosine_similarity, jaccard_ngram_similarity, levenshtein_similarity, ngram_similarity_n,
    word_overlap_similarity_with,
};
use crate::tfidf::tfidf_scores_with;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use simrank_core::{normalize, Candidate, CandidateId, Error, Query, Result};
use tracing::debug;

/// One entry of a ranked list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedResult {
    pub id: CandidateId,
    /// Display text as supplied by the caller
    pub text: String,
    pub score: f32,
    /// 1-based position in the list
    pub rank: usize,
}

/// A self-contained ranking request, used for batch ranking
#[derive(Debug, Clone)]
pub struct RankRequest {
    pub query: Query,
    pub candidates: Vec<Candidate>,
    pub method: SimilarityMethod,
    pub top_k: usize,
    pub threshold: Option<f32>,
}

impl RankRequest {
    pub fn new(query: Query, candidates: Vec<Candidate>, method: SimilarityMethod, top_k: usize) -> Self {
        Self {
            query,
            candidates,
            method,
            top_k,
            threshold: None,
        }
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = Some(threshold);
        self
    }
}

/// Raw per-candidate scores, in candidate order
#[derive(Debug, Clone, PartialEq)]
pub struct Scores {
    pub values: Vec<f32>,
    /// Set when the method could not extract any signal (TF-IDF only)
    pub degraded: bool,
}

/// Scores and ranks candidates with any [`SimilarityMethod`]
#[derive(Debug, Clone, Default)]
pub struct Ranker {
    config: EngineConfig,
}

impl Ranker {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Rank candidates against the query.
    ///
    /// Scores every candidate, drops those strictly below `threshold`, sorts
    /// by descending score (ties keep input order) and keeps the first
    /// `top_k`.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidArgument`] if `top_k` is zero or `threshold` is not
    ///   a finite value in [0, 1]
    /// * [`Error::MissingEmbeddings`] for cosine when the query or any
    ///   candidate has no embedding
    /// * [`Error::DimensionMismatch`] for cosine when a candidate embedding
    ///   differs in length from the query's
    pub fn rank(
        &self,
        query: &Query,
        candidates: &[Candidate],
        method: SimilarityMethod,
        top_k: usize,
        threshold: Option<f32>,
    ) -> Result<Vec<RankedResult>> {
        self.rank_detailed(query, candidates, method, top_k, threshold)
            .map(|response| response.results)
    }

    /// Same as [`Ranker::rank`], with the method given by name.
    ///
    /// Fails with [`Error::UnsupportedMethod`] for unknown names and
    /// [`Error::InvalidArgument`] for an empty name.
    pub fn rank_named(
        &self,
        query: &Query,
        candidates: &[Candidate],
        method: &str,
        top_k: usize,
        threshold: Option<f32>,
    ) -> Result<Vec<RankedResult>> {
        let method: SimilarityMethod = method.parse()?;
        self.rank(query, candidates, method, top_k, threshold)
    }

    /// Rank and report summary statistics alongside the list.
    pub fn rank_detailed(
        &self,
        query: &Query,
        candidates: &[Candidate],
        method: SimilarityMethod,
        top_k: usize,
        threshold: Option<f32>,
    ) -> Result<RankResponse> {
        validate_top_k(top_k)?;
        if let Some(t) = threshold {
            validate_threshold(t)?;
        }

        let scores = self.score(query, candidates, method)?;

        let mut ranked: Vec<(usize, f32)> = scores
            .values
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, score)| threshold.map_or(true, |t| score >= t))
            .collect();
        let passed_threshold = ranked.len();

        // sort_by is stable, so equal scores keep candidate order
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(top_k);

        let results: Vec<RankedResult> = ranked
            .into_iter()
            .enumerate()
            .map(|(pos, (idx, score))| RankedResult {
                id: candidates[idx].id.clone(),
                text: candidates[idx].text.clone(),
                score,
                rank: pos + 1,
            })
            .collect();

        debug!(
            "Ranked {} candidates with {}: {} passed threshold, {} returned",
            candidates.len(),
            method,
            passed_threshold,
            results.len()
        );

        let stats = RankStats::compute(&results, candidates.len(), passed_threshold);
        Ok(RankResponse {
            method,
            results,
            stats,
            degraded: scores.degraded,
        })
    }

    /// Score every candidate without sorting or truncating.
    ///
    /// Texts are normalized before lexical scoring.
    pub fn score(&self, query: &Query, candidates: &[Candidate], method: SimilarityMethod) -> Result<Scores> {
        let n = self.config.ngram_size;
        let min_len = self.config.min_word_len;
        let metric: Box<dyn Fn(&str, &str) -> f32> = match method {
            SimilarityMethod::Cosine => return self.score_cosine(query, candidates),
            SimilarityMethod::Tfidf => return Ok(self.score_tfidf(query, candidates)),
            SimilarityMethod::Jaccard => Box::new(move |q: &str, t: &str| jaccard_ngram_similarity(q, t, n)),
            SimilarityMethod::Levenshtein => Box::new(levenshtein_similarity),
            SimilarityMethod::Ngram => Box::new(move |q: &str, t: &str| ngram_similarity_n(q, t, n)),
            SimilarityMethod::WordOverlap => Box::new(move |q: &str, t: &str| word_overlap_similarity_with(q, t, min_len)),
        };

        let q = normalize(&query.text);
        let values = candidates
            .iter()
            .map(|c| metric(&q, &normalize(&c.text)))
            .collect();

        Ok(Scores {
            values,
            degraded: false,
        })
    }

    fn score_tfidf(&self, query: &Query, candidates: &[Candidate]) -> Scores {
        let q = normalize(&query.text);
        let texts: Vec<String> = candidates.iter().map(|c| normalize(&c.text)).collect();
        let outcome = tfidf_scores_with(&q, &texts, &self.config.tfidf());
        Scores {
            values: outcome.scores,
            degraded: outcome.degraded,
        }
    }

    fn score_cosine(&self, query: &Query, candidates: &[Candidate]) -> Result<Scores> {
        let query_embedding = query
            .embedding
            .as_ref()
            .ok_or_else(|| Error::MissingEmbeddings("query has no embedding".to_string()))?;

        let missing: Vec<String> = candidates
            .iter()
            .filter(|c| c.embedding.is_none())
            .map(|c| c.id.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(Error::MissingEmbeddings(format!(
                "{} of {} candidates have no embedding (first: {})",
                missing.len(),
                candidates.len(),
                missing[0]
            )));
        }

        let mut values = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let embedding = match &candidate.embedding {
                Some(e) => e,
                None => return Err(Error::MissingEmbeddings(candidate.id.to_string())),
            };
            let score = cosine_similarity(query_embedding, embedding).ok_or_else(|| Error::DimensionMismatch {
                candidate: candidate.id.to_string(),
                expected: query_embedding.dim(),
                actual: embedding.dim(),
            })?;
            values.push(score);
        }

        Ok(Scores {
            values,
            degraded: false,
        })
    }

    /// Rank independent requests in parallel.
    ///
    /// Output order matches request order; one failing request does not
    /// affect the others.
    pub fn rank_batch(&self, requests: &[RankRequest]) -> Vec<Result<RankResponse>> {
        requests
            .par_iter()
            .map(|r| self.rank_detailed(&r.query, &r.candidates, r.method, r.top_k, r.threshold))
            .collect()
    }
}

fn validate_top_k(top_k: usize) -> Result<()> {
    if top_k == 0 {
        return Err(Error::InvalidArgument("top_k must be positive".to_string()));
    }
    Ok(())
}

fn validate_threshold(threshold: f32) -> Result<()> {
    if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
        return Err(Error::InvalidArgument(format!(
            "threshold must be within [0, 1], got {}",
            threshold
        )));
    }
    Ok(())
}
