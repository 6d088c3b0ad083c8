use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::vector::Vector;

/// Opaque identifier of a candidate
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CandidateId {
    Integer(u64),
    Uuid(Uuid),
    String(String),
}

impl std::fmt::Display for CandidateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CandidateId::String(s) => write!(f, "{}", s),
            CandidateId::Uuid(u) => write!(f, "{}", u),
            CandidateId::Integer(i) => write!(f, "{}", i),
        }
    }
}

impl From<String> for CandidateId {
    fn from(s: String) -> Self {
        CandidateId::String(s)
    }
}

impl From<&str> for CandidateId {
    fn from(s: &str) -> Self {
        CandidateId::String(s.to_string())
    }
}

impl From<u64> for CandidateId {
    fn from(i: u64) -> Self {
        CandidateId::Integer(i)
    }
}

impl From<Uuid> for CandidateId {
    fn from(u: Uuid) -> Self {
        CandidateId::Uuid(u)
    }
}

/// An item compared against a query: a title, a tag, a keyword.
///
/// Candidates are supplied as an ordered sequence. The order carries no
/// ranking meaning but breaks score ties.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candidate {
    pub id: CandidateId,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vector>,
}

impl Candidate {
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<CandidateId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            embedding: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_embedding(mut self, embedding: Vector) -> Self {
        self.embedding = Some(embedding);
        self
    }

    /// Build candidates from bare texts, using the position as the id.
    pub fn from_texts<I, S>(texts: I) -> Vec<Candidate>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| Candidate::new(i as u64, text))
            .collect()
    }
}

/// The free-text query a ranking call compares candidates against
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Query {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vector>,
}

impl Query {
    #[inline]
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            embedding: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_embedding(mut self, embedding: Vector) -> Self {
        self.embedding = Some(embedding);
        self
    }
}
