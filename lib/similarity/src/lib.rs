//! # simrank Similarity
//!
//! The similarity ranking engine: pairwise metrics, TF-IDF scoring,
//! method dispatch and the top-K ranking protocol.
//!
//! ## Features
//!
//! - **Metrics**: Jaccard, Levenshtein, character n-gram (Dice), word overlap
//!   and embedding cosine, all in [0, 1]
//! - **TF-IDF**: per-call vocabulary over `candidates ++ [query]`
//! - **Dispatch**: method names parsed once into [`SimilarityMethod`]
//! - **Ranking**: stable descending sort, threshold before top-K, batch
//!   ranking over a rayon pool
//!
//! ## Example
//!
//! ```rust
//! use simrank_core::{Candidate, Query};
//! use simrank_similarity::{Ranker, SimilarityMethod};
//!
//! let ranker = Ranker::default();
//! let candidates = Candidate::from_texts(["제주 여행", "서울 맛집", "제주 카페"]);
//! let results = ranker
//!     .rank(&Query::new("제주"), &candidates, SimilarityMethod::WordOverlap, 2, None)
//!     .unwrap();
//!
//! assert_eq!(results[0].text, "제주 여행");
//! assert_eq!(results[1].text, "제주 카페");
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Query +   │────>│  normalize  │────>│   metric /  │
//! │ candidates  │     │             │     │   TF-IDF    │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                      ┌─────────────┐           │
//!                      │   Ranker    │<──────────┘
//!                      │ (threshold, │
//!                      │  sort, topK)│
//!                      └─────────────┘
//!                             │
//!                      ┌─────────────┐
//!                      │RankResponse │
//!                      │  (+ stats)  │
//!                      └─────────────┘
//! ```

pub mod config;
pub mod explain;
pub mod method;
pub mod metrics;
pub mod rank;
pub mod tfidf;

pub use config::EngineConfig;
pub use explain::{RankResponse, RankStats};
pub use method::{method_catalog, MethodInfo, SimilarityMethod};
pub use metrics::{
    cosine_similarity, jaccard_ngram_similarity, jaccard_similarity, levenshtein_distance,
    levenshtein_similarity, ngram_similarity, ngram_similarity_n, word_overlap_similarity,
    word_overlap_similarity_with,
};
pub use rank::{RankRequest, RankedResult, Ranker, Scores};
pub use tfidf::{tfidf_scores, tfidf_scores_with, TfidfConfig, TfidfOutcome};
