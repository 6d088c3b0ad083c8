//! Embedding generation
//!
//! Fills the [`EmbeddingStore`] for every catalog video that has no vector
//! yet for a given embedding type and the embedder's model.

use crate::catalog::CandidateStore;
use crate::embedding_store::{EmbeddingKey, EmbeddingStore};
use crate::video::EmbeddingType;
use serde::Serialize;
use simrank_core::{Embedder, Error, Result};
use std::collections::BTreeMap;
use tracing::{debug, info};

pub const DEFAULT_BATCH_SIZE: usize = 32;

/// Per-type counts from one pipeline run
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct PipelineReport {
    /// Vectors written, by embedding type
    pub embedded: BTreeMap<String, usize>,
    /// Videos that already had a vector, by embedding type
    pub skipped: BTreeMap<String, usize>,
}

impl PipelineReport {
    pub fn total_embedded(&self) -> usize {
        self.embedded.values().sum()
    }
}

pub struct EmbeddingPipeline<'a> {
    videos: &'a dyn CandidateStore,
    embeddings: &'a EmbeddingStore,
    embedder: &'a dyn Embedder,
    batch_size: usize,
}

impl<'a> EmbeddingPipeline<'a> {
    pub fn new(videos: &'a dyn CandidateStore, embeddings: &'a EmbeddingStore, embedder: &'a dyn Embedder) -> Self {
        Self {
            videos,
            embeddings,
            embedder,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Embed every video missing a vector for each of `types`.
    pub fn run(&self, types: &[EmbeddingType]) -> Result<PipelineReport> {
        if self.batch_size == 0 {
            return Err(Error::InvalidArgument("batch_size must be positive".to_string()));
        }

        let model = self.embedder.model_id();
        let videos = self.videos.fetch_candidates(None);
        let mut report = PipelineReport::default();

        for &embedding_type in types {
            let pending: Vec<_> = videos
                .iter()
                .filter(|v| !self.embeddings.contains(v.id, embedding_type, model))
                .collect();
            let skipped = videos.len() - pending.len();

            info!(
                "Embedding {} videos as {} with {} ({} already done)",
                pending.len(),
                embedding_type,
                model,
                skipped
            );

            let mut embedded = 0;
            for (batch_no, batch) in pending.chunks(self.batch_size).enumerate() {
                let texts: Vec<String> = batch.iter().map(|v| v.embedding_text(embedding_type)).collect();
                let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
                let vectors = self.embedder.embed_batch(&refs);

                for (video, vector) in batch.iter().zip(vectors) {
                    self.embeddings
                        .put(EmbeddingKey::new(video.id, embedding_type, model), vector)?;
                    embedded += 1;
                }
                debug!("Batch {} done: {}/{}", batch_no + 1, embedded, pending.len());
            }

            report.embedded.insert(embedding_type.to_string(), embedded);
            report.skipped.insert(embedding_type.to_string(), skipped);
        }

        Ok(report)
    }
}
