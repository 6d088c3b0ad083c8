//! Pairwise similarity metrics
//!
//! Every function returns a finite score in [0.0, 1.0] where 1.0 means
//! identical. Inputs are expected to be normalized already (see
//! [`simrank_core::normalize`]); lengths and n-grams are counted in
//! Unicode scalar values, so Hangul syllables count as one character each.
//!
//! Empty inputs use fixed sentinels rather than dividing by zero: two empty
//! inputs score 1.0, exactly one empty input scores 0.0.

use ahash::{AHashMap, AHashSet};
use simrank_core::Vector;

/// Default character n-gram size for Jaccard and n-gram similarity
pub const DEFAULT_NGRAM: usize = 2;

/// Default minimum token length (in characters) for word overlap
pub const DEFAULT_MIN_WORD_LEN: usize = 2;

/// Jaccard similarity over character bigram sets.
pub fn jaccard_similarity(a: &str, b: &str) -> f32 {
    jaccard_ngram_similarity(a, b, DEFAULT_NGRAM)
}

/// Jaccard similarity over character n-gram sets.
///
/// Whitespace is stripped before extracting n-grams. A string too short for
/// one n-gram after stripping contributes its unstripped text instead.
pub fn jaccard_ngram_similarity(a: &str, b: &str, n: usize) -> f32 {
    let stripped_a = strip_whitespace(a);
    let stripped_b = strip_whitespace(b);
    if let Some(sentinel) = empty_sentinel(stripped_a.is_empty(), stripped_b.is_empty()) {
        return sentinel;
    }

    let set_a: AHashSet<&str> = stripped_ngrams(a, &stripped_a, n).into_iter().collect();
    let set_b: AHashSet<&str> = stripped_ngrams(b, &stripped_b, n).into_iter().collect();

    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.len() + set_b.len() - intersection;
    ratio(intersection, union)
}

/// Levenshtein edit distance in characters (insert, delete, substitute).
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1) // deletion
                .min(curr[j] + 1) // insertion
                .min(prev[j] + cost); // substitution
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// `1 - distance / max(len(a), len(b))`
pub fn levenshtein_similarity(a: &str, b: &str) -> f32 {
    if let Some(sentinel) = empty_sentinel(a.is_empty(), b.is_empty()) {
        return sentinel;
    }

    let max_len = a.chars().count().max(b.chars().count());
    let distance = levenshtein_distance(a, b);
    (1.0 - distance as f64 / max_len as f64) as f32
}

/// Dice-style overlap of character bigram bags.
pub fn ngram_similarity(a: &str, b: &str) -> f32 {
    ngram_similarity_n(a, b, DEFAULT_NGRAM)
}

/// Dice-style overlap of character n-gram bags (with multiplicity):
/// `2 * Σ min(count_a(g), count_b(g)) / (|grams_a| + |grams_b|)`.
pub fn ngram_similarity_n(a: &str, b: &str, n: usize) -> f32 {
    let stripped_a = strip_whitespace(a);
    let stripped_b = strip_whitespace(b);
    if let Some(sentinel) = empty_sentinel(stripped_a.is_empty(), stripped_b.is_empty()) {
        return sentinel;
    }

    let grams_a = stripped_ngrams(a, &stripped_a, n);
    let grams_b = stripped_ngrams(b, &stripped_b, n);

    let mut counts_a: AHashMap<&str, usize> = AHashMap::with_capacity(grams_a.len());
    for &g in &grams_a {
        *counts_a.entry(g).or_insert(0) += 1;
    }
    let mut counts_b: AHashMap<&str, usize> = AHashMap::with_capacity(grams_b.len());
    for &g in &grams_b {
        *counts_b.entry(g).or_insert(0) += 1;
    }

    let common: usize = counts_a
        .iter()
        .filter_map(|(g, &ca)| counts_b.get(g).map(|&cb| ca.min(cb)))
        .sum();

    ratio(2 * common, grams_a.len() + grams_b.len())
}

/// Jaccard similarity of whitespace-separated word sets.
pub fn word_overlap_similarity(a: &str, b: &str) -> f32 {
    word_overlap_similarity_with(a, b, DEFAULT_MIN_WORD_LEN)
}

/// Jaccard similarity of word sets, ignoring words shorter than
/// `min_len` characters.
pub fn word_overlap_similarity_with(a: &str, b: &str, min_len: usize) -> f32 {
    let words_a = word_set(a, min_len);
    let words_b = word_set(b, min_len);
    if let Some(sentinel) = empty_sentinel(words_a.is_empty(), words_b.is_empty()) {
        return sentinel;
    }

    let intersection = words_a.intersection(&words_b).count();
    let union = words_a.len() + words_b.len() - intersection;
    ratio(intersection, union)
}

/// Cosine similarity between two embedding vectors, clamped to [0.0, 1.0].
///
/// Zero-norm vectors score 0.0. Anti-correlated vectors are treated as
/// having no similarity. Returns `None` when the dimensions differ.
pub fn cosine_similarity(a: &Vector, b: &Vector) -> Option<f32> {
    a.cosine_similarity(b).map(|c| c.clamp(0.0, 1.0) as f32)
}

fn empty_sentinel(a_empty: bool, b_empty: bool) -> Option<f32> {
    match (a_empty, b_empty) {
        (true, true) => Some(1.0),
        (true, false) | (false, true) => Some(0.0),
        (false, false) => None,
    }
}

fn ratio(numerator: usize, denominator: usize) -> f32 {
    if denominator == 0 {
        0.0
    } else {
        (numerator as f64 / denominator as f64) as f32
    }
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

fn word_set(text: &str, min_len: usize) -> AHashSet<&str> {
    text.split_whitespace()
        .filter(|w| w.chars().count() >= min_len)
        .collect()
}

fn stripped_ngrams<'a>(raw: &'a str, stripped: &'a str, n: usize) -> Vec<&'a str> {
    if stripped.chars().count() < n.max(1) {
        vec![raw]
    } else {
        char_ngrams(stripped, n)
    }
}

/// Contiguous character n-grams as slices of `text`.
///
/// Text shorter than `n` characters yields itself as the single n-gram.
pub(crate) fn char_ngrams(text: &str, n: usize) -> Vec<&str> {
    let n = n.max(1);
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let char_count = bounds.len() - 1;

    if char_count < n {
        return vec![text];
    }

    (0..=char_count - n)
        .map(|i| &text[bounds[i]..bounds[i + n]])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "제주도 맛집",
        "제주 여행 코스",
        "제주 카페 투어",
        "서울 맛집",
        "부산 여행",
        "kitten",
        "sitting",
        "a",
        "",
    ];

    #[test]
    fn test_char_ngrams() {
        assert_eq!(char_ngrams("제주도", 2), vec!["제주", "주도"]);
        assert_eq!(char_ngrams("abc", 3), vec!["abc"]);
        assert_eq!(char_ngrams("a", 2), vec!["a"]);
        assert_eq!(char_ngrams("", 2), vec![""]);
    }

    #[test]
    fn test_jaccard_identical_korean() {
        assert_eq!(jaccard_similarity("제주도 맛집", "제주도 맛집"), 1.0);
    }

    #[test]
    fn test_jaccard_values() {
        // {제주, 주도, 도맛, 맛집} vs {서울, 울맛, 맛집}: 1 shared of 6
        let sim = jaccard_similarity("제주도 맛집", "서울 맛집");
        assert!((sim - 1.0 / 6.0).abs() < 1e-6);

        // spaces are ignored
        assert_eq!(jaccard_similarity("제주 도", "제주도"), 1.0);
    }

    #[test]
    fn test_jaccard_short_strings_use_whole_text() {
        assert_eq!(jaccard_similarity("a", "a"), 1.0);
        assert_eq!(jaccard_similarity("a", "ab"), 0.0);
    }

    #[test]
    fn test_short_strings_keep_their_whitespace() {
        assert_eq!(jaccard_ngram_similarity("a b", "ab", 3), 0.0);
        assert_eq!(jaccard_ngram_similarity("a b", "a b", 3), 1.0);
        assert_eq!(ngram_similarity_n("a b", "ab", 3), 0.0);
        // long enough for one n-gram, so whitespace is still stripped
        assert_eq!(jaccard_ngram_similarity("a bc", "abc", 3), 1.0);
    }

    #[test]
    fn test_jaccard_empty_policy() {
        assert_eq!(jaccard_similarity("", ""), 1.0);
        assert_eq!(jaccard_similarity("", "abc"), 0.0);
        assert_eq!(jaccard_similarity("abc", "   "), 0.0);
    }

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("제주도", "제주"), 1);
        assert_eq!(levenshtein_distance("flaw", "lawn"), 2);
    }

    #[test]
    fn test_levenshtein_similarity() {
        assert_eq!(levenshtein_similarity("", "abc"), 0.0);
        assert_eq!(levenshtein_similarity("", ""), 1.0);
        let sim = levenshtein_similarity("kitten", "sitting");
        assert!((sim - (1.0 - 3.0 / 7.0)).abs() < 1e-6);
        // counted in characters, not bytes
        let sim = levenshtein_similarity("제주도", "제주");
        assert!((sim - (1.0 - 1.0 / 3.0)).abs() < 1e-6);
    }

    #[test]
    fn test_ngram_counts_multiplicity() {
        // "aaa" -> [aa, aa], "aa" -> [aa]: 2 * 1 / 3
        let sim = ngram_similarity("aaa", "aa");
        assert!((sim - 2.0 / 3.0).abs() < 1e-6);
        // plain Jaccard on sets would give 1.0
        assert_eq!(jaccard_similarity("aaa", "aa"), 1.0);
    }

    #[test]
    fn test_ngram_values() {
        // [제주, 주도, 도맛, 맛집] vs [서울, 울맛, 맛집]: 2 * 1 / 7
        let sim = ngram_similarity("제주도 맛집", "서울 맛집");
        assert!((sim - 2.0 / 7.0).abs() < 1e-6);
    }

    #[test]
    fn test_ngram_empty_policy() {
        assert_eq!(ngram_similarity("", ""), 1.0);
        assert_eq!(ngram_similarity("ab", ""), 0.0);
    }

    #[test]
    fn test_word_overlap() {
        assert_eq!(word_overlap_similarity("제주", "제주 여행"), 0.5);
        assert_eq!(word_overlap_similarity("제주", "서울 맛집"), 0.0);
        // single-character words are ignored
        assert_eq!(word_overlap_similarity("a 제주", "b 제주"), 1.0);
    }

    #[test]
    fn test_word_overlap_empty_policy() {
        assert_eq!(word_overlap_similarity("", ""), 1.0);
        assert_eq!(word_overlap_similarity("a b", "c"), 1.0);
        assert_eq!(word_overlap_similarity("a", "제주"), 0.0);
    }

    #[test]
    fn test_cosine_clamped() {
        let a = Vector::new(vec![1.0, 0.0]);
        let b = Vector::new(vec![-1.0, 0.0]);
        assert_eq!(cosine_similarity(&a, &b), Some(0.0));
        assert_eq!(cosine_similarity(&a, &a), Some(1.0));
        assert_eq!(cosine_similarity(&a, &Vector::zeros(2)), Some(0.0));
        assert_eq!(cosine_similarity(&a, &Vector::zeros(3)), None);
    }

    #[test]
    fn test_identity() {
        for s in SAMPLES.iter().filter(|s| !s.is_empty()) {
            assert_eq!(jaccard_similarity(s, s), 1.0, "jaccard {s}");
            assert_eq!(levenshtein_similarity(s, s), 1.0, "levenshtein {s}");
            assert_eq!(ngram_similarity(s, s), 1.0, "ngram {s}");
            assert_eq!(word_overlap_similarity(s, s), 1.0, "word_overlap {s}");
        }
    }

    #[test]
    fn test_symmetry_and_range() {
        let metrics: [(&str, fn(&str, &str) -> f32); 4] = [
            ("jaccard", jaccard_similarity),
            ("levenshtein", levenshtein_similarity),
            ("ngram", ngram_similarity),
            ("word_overlap", word_overlap_similarity),
        ];
        for (name, metric) in metrics {
            for a in SAMPLES {
                for b in SAMPLES {
                    let ab = metric(a, b);
                    let ba = metric(b, a);
                    assert_eq!(ab, ba, "{name} not symmetric for {a:?}, {b:?}");
                    assert!((0.0..=1.0).contains(&ab), "{name} out of range: {ab}");
                    assert!(ab.is_finite());
                }
            }
        }
    }
}
