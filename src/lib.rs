//! # simrank
//!
//! Similar-title and keyword recommendation for a video catalog.
//!
//! simrank ranks free-text queries against candidate titles or tags with a
//! choice of interchangeable similarity methods: character and word based
//! lexical metrics, per-call TF-IDF, and cosine over precomputed
//! embeddings.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! simrank serve --catalog videos.json --http-port 8000
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use simrank::prelude::*;
//!
//! let ranker = Ranker::default();
//! let candidates = Candidate::from_texts(["제주 여행", "서울 맛집", "제주 카페"]);
//!
//! let results = ranker
//!     .rank_named(&Query::new("제주"), &candidates, "word_overlap", 2, None)
//!     .unwrap();
//! assert_eq!(results.len(), 2);
//!
//! let err = ranker
//!     .rank_named(&Query::new("제주"), &candidates, "unknown_method", 2, None)
//!     .unwrap_err();
//! assert!(matches!(err, Error::UnsupportedMethod(_)));
//! ```
//!
//! ## Crate Structure
//!
//! - `simrank-core` - Candidates, vectors, text normalization, embedder contract, errors
//! - `simrank-similarity` - Metrics, TF-IDF, method dispatch and the ranker
//! - `simrank-storage` - Video catalog, embedding store and embedding pipeline
//! - `simrank-api` - Search service and REST endpoints
//!
//! ## Methods
//!
//! | name           | compares                          |
//! |----------------|-----------------------------------|
//! | `cosine`       | embeddings (query + candidates)   |
//! | `jaccard`      | character bigram sets             |
//! | `levenshtein`  | edit distance                     |
//! | `ngram`        | character bigram bags (Dice)      |
//! | `word_overlap` | word sets                         |
//! | `tfidf`        | TF-IDF vectors built per call     |

// Re-export core types
pub use simrank_core::{
    normalize, Candidate, CandidateId, Embedder, Error, HashEmbedder, Query, Result, Vector,
};

// Re-export the engine
pub use simrank_similarity::{
    method_catalog, EngineConfig, MethodInfo, RankRequest, RankResponse, RankStats, RankedResult,
    Ranker, SimilarityMethod, TfidfConfig,
};

// Re-export storage
pub use simrank_storage::{
    CandidateStore, Catalog, EmbeddingPipeline, EmbeddingStats, EmbeddingStore, EmbeddingType, Video,
};

// Re-export API
pub use simrank_api::{RestApi, SearchService};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        normalize, Candidate, CandidateId, CandidateStore, Catalog, Embedder, EmbeddingStore,
        EmbeddingType, EngineConfig, Error, HashEmbedder, Query, RankedResult, Ranker, Result,
        SearchService, SimilarityMethod, Vector, Video,
    };
}

/// Pairwise similarity metrics
pub mod metrics {
    pub use simrank_similarity::metrics::*;
    pub use simrank_similarity::tfidf::{tfidf_scores, tfidf_scores_with};
}
