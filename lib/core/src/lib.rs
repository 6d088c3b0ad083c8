//! # simrank Core
//!
//! Core library for the simrank similarity engine.
//!
//! This crate provides the data model shared by every other crate:
//!
//! - [`Candidate`] / [`CandidateId`] - an item compared against a query
//! - [`Query`] - free-text query with an optional precomputed embedding
//! - [`Vector`] - dense embedding vector with cosine similarity
//! - [`normalize`] - the text normalizer applied before any comparison
//! - [`Embedder`] - the embedding collaborator contract, plus [`HashEmbedder`]
//! - [`Error`] - the error taxonomy surfaced by ranking calls
//!
//! ## Example
//!
//! ```rust
//! use simrank_core::{normalize, Candidate, Embedder, HashEmbedder, Query};
//!
//! let embedder = HashEmbedder::new(64);
//! let text = normalize("제주도 &amp; 맛집 😀");
//! let query = Query::new(text.clone()).with_embedding(embedder.embed(&text));
//! let candidate = Candidate::new("v1", "제주 여행").with_embedding(embedder.embed("제주 여행"));
//! assert!(query.embedding.is_some() && candidate.embedding.is_some());
//! ```

pub mod candidate;
pub mod embedder;
pub mod error;
pub mod normalize;
pub mod vector;

pub use candidate::{Candidate, CandidateId, Query};
pub use embedder::{Embedder, HashEmbedder, DEFAULT_HASH_DIM};
pub use error::{Error, Result};
pub use normalize::normalize;
pub use vector::Vector;
