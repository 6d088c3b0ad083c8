//! Request-scoped search operations
//!
//! [`SearchService`] wires the catalog, the embedding store and the
//! embedder into ranking calls. It owns no global state: every handle is
//! injected at construction and shared through `Arc`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use simrank_core::{normalize, Candidate, CandidateId, Embedder, Error, Query, Result};
use simrank_similarity::{method_catalog, EngineConfig, MethodInfo, RankStats, Ranker, SimilarityMethod};
use simrank_storage::{CandidateStore, EmbeddingStats, EmbeddingStore, EmbeddingType, Video};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// A video matched by `/similar_search`
#[derive(Debug, Clone, Serialize)]
pub struct VideoHit {
    pub id: String,
    pub video_yid: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub similarity_score: f32,
    pub rank: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub method: SimilarityMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding_type: Option<EmbeddingType>,
    pub results: Vec<VideoHit>,
    pub stats: RankStats,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub degraded: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct KeywordHit {
    pub keyword: String,
    pub similarity_score: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct KeywordResponse {
    pub query: String,
    pub method: SimilarityMethod,
    pub results: Vec<KeywordHit>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub degraded: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MethodsResponse {
    pub methods: Vec<MethodInfo>,
    pub embedding_types: Vec<EmbeddingType>,
    pub default_method: SimilarityMethod,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbeddingProgress {
    pub total_videos: usize,
    pub embedded_videos: usize,
    pub progress_percent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbeddingStatsResponse {
    /// Model id of the embedder serving cosine queries
    pub model: String,
    pub progress: EmbeddingProgress,
    #[serde(flatten)]
    pub stats: EmbeddingStats,
}

pub struct SearchService {
    catalog: Arc<dyn CandidateStore>,
    embeddings: Arc<EmbeddingStore>,
    embedder: Arc<dyn Embedder>,
    ranker: Ranker,
}

impl SearchService {
    pub fn new(
        catalog: Arc<dyn CandidateStore>,
        embeddings: Arc<EmbeddingStore>,
        embedder: Arc<dyn Embedder>,
        config: EngineConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            catalog,
            embeddings,
            embedder,
            ranker: Ranker::new(config),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        self.ranker.config()
    }

    /// Rank catalog titles against `q`.
    ///
    /// Cosine compares the query embedding with stored embeddings of the
    /// given type; videos without one are left out of the pool. Cosine
    /// falls back to the configured threshold when none is given.
    pub fn similar_search(
        &self,
        q: &str,
        method: Option<&str>,
        embedding_type: EmbeddingType,
        limit: Option<usize>,
        threshold: Option<f32>,
    ) -> Result<SearchResponse> {
        let q = require_query(q)?;
        let method = self.resolve_method(method)?;
        let limit = self.resolve_limit(limit)?;

        let videos = self.catalog.fetch_candidates(Some(self.config().candidate_pool));

        let (query, candidates, threshold) = if method == SimilarityMethod::Cosine {
            let model = self.embedder.model_id();
            let embedded: Vec<&Video> = videos
                .iter()
                .filter(|v| self.embeddings.contains(v.id, embedding_type, model))
                .collect();
            let ids: Vec<u64> = embedded.iter().map(|v| v.id).collect();
            let vectors = match self.embeddings.aligned(&ids, embedding_type, model) {
                Some(vectors) if !vectors.is_empty() => vectors,
                _ => {
                    return Err(Error::MissingEmbeddings(format!(
                        "no {} embeddings for model {}",
                        embedding_type, model
                    )))
                }
            };
            let candidates: Vec<Candidate> = embedded
                .iter()
                .zip(vectors)
                .map(|(v, e)| v.to_candidate().with_embedding(e))
                .collect();
            debug!(
                "Cosine pool: {} of {} videos have {} embeddings",
                candidates.len(),
                videos.len(),
                embedding_type
            );
            let query = Query::new(q.clone()).with_embedding(self.embedder.embed(&normalize(&q)));
            let threshold = threshold.or(Some(self.config().cosine_threshold));
            (query, candidates, threshold)
        } else {
            let candidates = videos.iter().map(Video::to_candidate).collect();
            (Query::new(q.clone()), candidates, threshold)
        };

        let response = self.ranker.rank_detailed(&query, &candidates, method, limit, threshold)?;

        let by_id: HashMap<u64, &Video> = videos.iter().map(|v| (v.id, v)).collect();
        let results = response
            .results
            .iter()
            .filter_map(|r| match r.id {
                CandidateId::Integer(id) => by_id.get(&id).map(|v| VideoHit {
                    id: v.id.to_string(),
                    video_yid: v.video_yid.clone(),
                    title: v.title.clone(),
                    description: v.description.clone(),
                    published_at: v.published_at,
                    tags: v.tags.clone(),
                    similarity_score: r.score,
                    rank: r.rank,
                }),
                _ => None,
            })
            .collect();

        Ok(SearchResponse {
            query: q,
            method,
            embedding_type: (method == SimilarityMethod::Cosine).then_some(embedding_type),
            results,
            stats: response.stats,
            degraded: response.degraded,
        })
    }

    /// Rank the distinct tag vocabulary against `q`.
    pub fn similar_keywords(&self, q: &str, method: Option<&str>, limit: Option<usize>) -> Result<KeywordResponse> {
        let q = require_query(q)?;
        let method = self.resolve_method(method)?;
        let limit = self.resolve_limit(limit)?;

        let tags = self.catalog.distinct_tags();
        if tags.is_empty() {
            return Ok(KeywordResponse {
                query: q,
                method,
                results: Vec::new(),
                degraded: false,
            });
        }

        let (query, candidates) = if method.requires_embedding() {
            let texts: Vec<&str> = tags.iter().map(String::as_str).collect();
            let vectors = self.embedder.embed_batch(&texts);
            let candidates = tags
                .iter()
                .zip(vectors)
                .map(|(t, v)| Candidate::new(t.as_str(), t.as_str()).with_embedding(v))
                .collect::<Vec<_>>();
            let query = Query::new(q.clone()).with_embedding(self.embedder.embed(&normalize(&q)));
            (query, candidates)
        } else {
            let candidates = tags.iter().map(|t| Candidate::new(t.as_str(), t.as_str())).collect();
            (Query::new(q.clone()), candidates)
        };

        let response = self.ranker.rank_detailed(
            &query,
            &candidates,
            method,
            limit,
            self.config().keyword_threshold,
        )?;

        Ok(KeywordResponse {
            query: q,
            method,
            results: response
                .results
                .into_iter()
                .map(|r| KeywordHit {
                    keyword: r.text,
                    similarity_score: r.score,
                })
                .collect(),
            degraded: response.degraded,
        })
    }

    pub fn search_methods(&self) -> MethodsResponse {
        MethodsResponse {
            methods: method_catalog(),
            embedding_types: EmbeddingType::ALL.to_vec(),
            default_method: self.config().default_method,
        }
    }

    pub fn embedding_stats(&self) -> EmbeddingStatsResponse {
        let model = self.embedder.model_id().to_string();
        let total_videos = self.catalog.len();
        let embedded_videos = self.embeddings.embedded_videos(&model);
        let progress_percent = if total_videos == 0 {
            0.0
        } else {
            (embedded_videos as f64 / total_videos as f64 * 1000.0).round() / 10.0
        };

        EmbeddingStatsResponse {
            model,
            progress: EmbeddingProgress {
                total_videos,
                embedded_videos,
                progress_percent,
            },
            stats: self.embeddings.stats(),
        }
    }

    fn resolve_method(&self, method: Option<&str>) -> Result<SimilarityMethod> {
        match method {
            Some(name) => name.parse(),
            None => Ok(self.config().default_method),
        }
    }

    fn resolve_limit(&self, limit: Option<usize>) -> Result<usize> {
        let limit = limit.unwrap_or(self.config().default_limit);
        if limit == 0 || limit > self.config().max_limit {
            return Err(Error::InvalidArgument(format!(
                "limit must be between 1 and {}, got {}",
                self.config().max_limit,
                limit
            )));
        }
        Ok(limit)
    }
}

fn require_query(q: &str) -> Result<String> {
    let trimmed = q.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidArgument("query must not be empty".to_string()));
    }
    Ok(trimmed.to_string())
}
