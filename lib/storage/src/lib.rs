pub mod catalog;
pub mod embedding_store;
pub mod pipeline;
pub mod video;

pub use catalog::{CandidateStore, Catalog};
pub use embedding_store::{EmbeddingKey, EmbeddingStats, EmbeddingStore};
pub use pipeline::{EmbeddingPipeline, PipelineReport, DEFAULT_BATCH_SIZE};
pub use video::{EmbeddingType, Video};
