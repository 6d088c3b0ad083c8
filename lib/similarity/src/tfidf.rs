//! TF-IDF scoring
//!
//! Builds a term-frequency / inverse-document-frequency vector space over
//! `candidates ++ [query]` and scores each candidate by the cosine between
//! its vector and the query's. The vocabulary is rebuilt on every call and
//! never shared, so scores depend only on the inputs of that call.
//!
//! Weights follow the smoothed form
//!
//! ```text
//! idf(t)   = ln((1 + N) / (1 + df(t))) + 1
//! w(t, d)  = count(t, d) * idf(t)
//! ```
//!
//! and every document vector is L2-normalized, so the cosine is a plain
//! dot product and always lies in [0, 1].

use ahash::{AHashMap, AHashSet};
use tracing::warn;

/// Default vocabulary cap
pub const DEFAULT_MAX_FEATURES: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TfidfConfig {
    /// Keep at most this many terms, by corpus-wide frequency
    pub max_features: usize,
    /// Word n-gram sizes (inclusive) used as terms
    pub ngram_range: (usize, usize),
}

impl Default for TfidfConfig {
    fn default() -> Self {
        Self {
            max_features: DEFAULT_MAX_FEATURES,
            ngram_range: (1, 2),
        }
    }
}

/// Per-candidate scores, in candidate order.
///
/// `degraded` is set when the vector space carries no information for this
/// query (empty vocabulary, or no query term in it); all scores are 0.0 then.
#[derive(Debug, Clone, PartialEq)]
pub struct TfidfOutcome {
    pub scores: Vec<f32>,
    pub degraded: bool,
}

impl TfidfOutcome {
    fn zeros(len: usize) -> Self {
        Self {
            scores: vec![0.0; len],
            degraded: true,
        }
    }
}

/// Score candidates against the query with the default configuration.
pub fn tfidf_scores<S: AsRef<str>>(query: &str, candidates: &[S]) -> Vec<f32> {
    tfidf_scores_with(query, candidates, &TfidfConfig::default()).scores
}

/// Score candidates against the query.
///
/// Never fails: a degenerate vector space yields all-zero scores with
/// [`TfidfOutcome::degraded`] set.
pub fn tfidf_scores_with<S: AsRef<str>>(
    query: &str,
    candidates: &[S],
    config: &TfidfConfig,
) -> TfidfOutcome {
    if candidates.is_empty() {
        return TfidfOutcome {
            scores: Vec::new(),
            degraded: false,
        };
    }

    let documents: Vec<Vec<String>> = candidates
        .iter()
        .map(|c| c.as_ref())
        .chain(std::iter::once(query))
        .map(|text| terms(&tokenize(text), config.ngram_range))
        .collect();

    let vocabulary = match Vocabulary::build(&documents, config.max_features) {
        Some(v) => v,
        None => {
            warn!(
                candidates = candidates.len(),
                "TF-IDF vocabulary is empty, returning zero scores"
            );
            return TfidfOutcome::zeros(candidates.len());
        }
    };

    let vectors: Vec<SparseVector> = documents
        .iter()
        .map(|doc| vocabulary.vectorize(doc))
        .collect();

    let (query_vector, candidate_vectors) = match vectors.split_last() {
        Some(split) => split,
        None => return TfidfOutcome::zeros(candidates.len()),
    };

    if query_vector.is_empty() {
        warn!(
            vocabulary = vocabulary.len(),
            "TF-IDF query has no terms in the vocabulary, returning zero scores"
        );
        return TfidfOutcome::zeros(candidates.len());
    }

    let scores = candidate_vectors
        .iter()
        .map(|v| query_vector.dot(v).clamp(0.0, 1.0) as f32)
        .collect();

    TfidfOutcome {
        scores,
        degraded: false,
    }
}

/// Lowercase word tokens of two or more characters.
///
/// Words are maximal runs of alphanumeric characters or `_`.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|s| s.chars().count() >= 2)
        .map(str::to_string)
        .collect()
}

/// Word n-grams for every size in `range`, joined by a single space
fn terms(tokens: &[String], range: (usize, usize)) -> Vec<String> {
    let (lo, hi) = (range.0.max(1), range.1.max(range.0.max(1)));
    let mut out = Vec::new();
    for n in lo..=hi {
        if tokens.len() < n {
            break;
        }
        out.extend(tokens.windows(n).map(|w| w.join(" ")));
    }
    out
}

/// Term index and smoothed idf weights, built fresh for one call.
#[derive(Debug)]
struct Vocabulary {
    index: AHashMap<String, usize>,
    idf: Vec<f64>,
}

impl Vocabulary {
    /// Returns `None` when no document has any term.
    fn build(documents: &[Vec<String>], max_features: usize) -> Option<Self> {
        // term -> (corpus frequency, document frequency)
        let mut stats: AHashMap<&str, (u64, u32)> = AHashMap::new();
        for doc in documents {
            let mut seen: AHashSet<&str> = AHashSet::with_capacity(doc.len());
            for term in doc {
                let entry = stats.entry(term.as_str()).or_insert((0, 0));
                entry.0 += 1;
                if seen.insert(term.as_str()) {
                    entry.1 += 1;
                }
            }
        }

        if stats.is_empty() {
            return None;
        }

        let mut selected: Vec<(&str, u64, u32)> =
            stats.into_iter().map(|(t, (tf, df))| (t, tf, df)).collect();

        if selected.len() > max_features {
            // Most frequent first; ties resolved alphabetically
            selected.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
            selected.truncate(max_features);
        }
        selected.sort_unstable_by(|a, b| a.0.cmp(b.0));

        let n_docs = documents.len() as f64;
        let mut index = AHashMap::with_capacity(selected.len());
        let mut idf = Vec::with_capacity(selected.len());
        for (i, (term, _, df)) in selected.into_iter().enumerate() {
            index.insert(term.to_string(), i);
            idf.push(((1.0 + n_docs) / (1.0 + f64::from(df))).ln() + 1.0);
        }

        Some(Self { index, idf })
    }

    fn len(&self) -> usize {
        self.idf.len()
    }

    fn vectorize(&self, doc: &[String]) -> SparseVector {
        let mut counts: AHashMap<usize, u32> = AHashMap::new();
        for term in doc {
            if let Some(&i) = self.index.get(term.as_str()) {
                *counts.entry(i).or_insert(0) += 1;
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(i, c)| (i, f64::from(c) * self.idf[i]))
            .collect();
        entries.sort_unstable_by_key(|&(i, _)| i);

        let mut vector = SparseVector { entries };
        vector.normalize();
        vector
    }
}

/// Sparse vector with entries sorted by term index
#[derive(Debug, Clone, PartialEq)]
struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn normalize(&mut self) {
        let norm = self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut self.entries {
                *w /= norm;
            }
        }
    }

    fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a_w) = self.entries[i];
            let (b_idx, b_w) = other.entries[j];
            match a_idx.cmp(&b_idx) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}
