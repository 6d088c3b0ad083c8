pub mod rest;
pub mod service;

pub use rest::RestApi;
pub use service::{
    EmbeddingProgress, EmbeddingStatsResponse, KeywordHit, KeywordResponse, MethodsResponse,
    SearchResponse, SearchService, VideoHit,
};
