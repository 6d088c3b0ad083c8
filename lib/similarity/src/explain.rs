//! Response structures for ranking calls
//!
//! Wraps a ranked list with the method that produced it and summary
//! statistics, in the shape transport adapters serialize directly.

use crate::method::SimilarityMethod;
use crate::rank::RankedResult;
use serde::Serialize;

/// A ranked list plus how it was produced
#[derive(Debug, Clone, Serialize)]
pub struct RankResponse {
    pub method: SimilarityMethod,
    pub results: Vec<RankedResult>,
    pub stats: RankStats,
    /// True when the scores carry no information (see TF-IDF degradation)
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub degraded: bool,
}

/// Summary statistics for a ranking call
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RankStats {
    /// Number of candidates scored
    pub candidates_count: usize,
    /// Number of candidates at or above the threshold
    pub passed_threshold: usize,
    /// Number of results returned
    pub results_count: usize,
    /// Score of best result
    pub best_score: f32,
    /// Average score of results
    pub avg_score: f32,
}

impl RankStats {
    /// Compute stats from a sorted result list
    pub fn compute(results: &[RankedResult], candidates_count: usize, passed_threshold: usize) -> Self {
        if results.is_empty() {
            return Self {
                candidates_count,
                passed_threshold,
                results_count: 0,
                best_score: 0.0,
                avg_score: 0.0,
            };
        }

        let sum: f64 = results.iter().map(|r| f64::from(r.score)).sum();
        Self {
            candidates_count,
            passed_threshold,
            results_count: results.len(),
            best_score: results[0].score,
            avg_score: (sum / results.len() as f64) as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simrank_core::CandidateId;

    fn ranked(id: u64, score: f32, rank: usize) -> RankedResult {
        RankedResult {
            id: CandidateId::Integer(id),
            text: format!("title {}", id),
            score,
            rank,
        }
    }

    #[test]
    fn test_stats() {
        let results = vec![ranked(1, 0.9, 1), ranked(2, 0.6, 2), ranked(3, 0.3, 3)];
        let stats = RankStats::compute(&results, 10, 4);

        assert_eq!(stats.candidates_count, 10);
        assert_eq!(stats.passed_threshold, 4);
        assert_eq!(stats.results_count, 3);
        assert_eq!(stats.best_score, 0.9);
        assert!((stats.avg_score - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_stats_empty() {
        let stats = RankStats::compute(&[], 5, 0);
        assert_eq!(stats.results_count, 0);
        assert_eq!(stats.best_score, 0.0);
        assert_eq!(stats.avg_score, 0.0);
    }

    #[test]
    fn test_response_serialization() {
        let results = vec![ranked(7, 0.75, 1)];
        let stats = RankStats::compute(&results, 1, 1);
        let response = RankResponse {
            method: SimilarityMethod::WordOverlap,
            results,
            stats,
            degraded: false,
        };
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["method"], "word_overlap");
        assert_eq!(json["results"][0]["id"], 7);
        assert_eq!(json["results"][0]["rank"], 1);
        assert_eq!(json["stats"]["results_count"], 1);
        assert!(json.get("degraded").is_none());
    }

    #[test]
    fn test_degraded_is_serialized_when_set() {
        let response = RankResponse {
            method: SimilarityMethod::Tfidf,
            results: Vec::new(),
            stats: RankStats::compute(&[], 0, 0),
            degraded: true,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["degraded"], true);
    }
}
