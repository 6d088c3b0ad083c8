// Integration tests for simrank
use simrank::metrics::{jaccard_similarity, levenshtein_similarity, tfidf_scores};
use simrank::prelude::*;
use simrank::{EmbeddingPipeline, RankRequest};
use std::sync::Arc;
use tempfile::tempdir;

fn titles() -> Vec<Candidate> {
    Candidate::from_texts(["제주 여행", "서울 맛집", "제주 카페"])
}

#[test]
fn test_identical_titles_score_one() {
    assert_eq!(jaccard_similarity("제주도 맛집", "제주도 맛집"), 1.0);
}

#[test]
fn test_levenshtein_empty_inputs() {
    assert_eq!(levenshtein_similarity("", "abc"), 0.0);
    assert_eq!(levenshtein_similarity("", ""), 1.0);
}

#[test]
fn test_word_overlap_ranking() {
    let ranker = Ranker::default();
    let results = ranker
        .rank_named(&Query::new("제주"), &titles(), "word_overlap", 2, None)
        .unwrap();

    let texts: Vec<&str> = results.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts, vec!["제주 여행", "제주 카페"]);
    assert!(results.iter().all(|r| r.score == 0.5));
}

#[test]
fn test_unknown_method() {
    let ranker = Ranker::default();
    let err = ranker
        .rank_named(&Query::new("제주"), &titles(), "unknown_method", 2, None)
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedMethod(_)));
    assert!(err.is_client_error());
}

#[test]
fn test_cosine_requires_embeddings() {
    let ranker = Ranker::default();
    let err = ranker
        .rank_named(&Query::new("제주"), &titles(), "cosine", 2, None)
        .unwrap_err();
    assert!(matches!(err, Error::MissingEmbeddings(_)));
}

#[test]
fn test_tfidf_all_empty() {
    assert_eq!(tfidf_scores("", &["", "", ""]), vec![0.0, 0.0, 0.0]);
}

#[test]
fn test_every_method_is_bounded_and_deterministic() {
    let embedder = HashEmbedder::new(64);
    let texts = ["제주 여행 코스 추천", "서울 맛집 투어", "제주도 카페 베스트", "부산 해운대 맛집", ""];
    let candidates: Vec<Candidate> = texts
        .iter()
        .enumerate()
        .map(|(i, t)| Candidate::new(i as u64, *t).with_embedding(embedder.embed(&normalize(t))))
        .collect();
    let query = Query::new("제주 맛집").with_embedding(embedder.embed("제주 맛집"));
    let ranker = Ranker::default();

    for method in SimilarityMethod::ALL {
        let first = ranker.rank(&query, &candidates, method, 3, None).unwrap();
        let second = ranker.rank(&query, &candidates, method, 3, None).unwrap();
        assert_eq!(first, second, "{} is not deterministic", method);
        assert!(first.len() <= 3);
        assert!(first.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(first.iter().all(|r| (0.0..=1.0).contains(&r.score)));
    }
}

#[test]
fn test_batch_ranking() {
    let ranker = Ranker::default();
    let requests: Vec<RankRequest> = ["제주", "서울", "카페"]
        .iter()
        .map(|q| RankRequest::new(Query::new(*q), titles(), SimilarityMethod::Ngram, 1))
        .collect();

    let responses = ranker.rank_batch(&requests);
    let top: Vec<String> = responses
        .into_iter()
        .map(|r| r.unwrap().results[0].text.clone())
        .collect();
    assert_eq!(top, vec!["제주 여행", "서울 맛집", "제주 카페"]);
}

#[test]
fn test_catalog_to_search_end_to_end() {
    let dir = tempdir().unwrap();
    let catalog_path = dir.path().join("videos.json");
    let embeddings_path = dir.path().join("embeddings.bin");

    std::fs::write(
        &catalog_path,
        r#"[
            {"id": 1, "video_yid": "a1", "title": "제주 여행 코스 &amp; 맛집", "tags": ["제주", "여행"],
             "published_at": "2024-06-01T00:00:00Z"},
            {"id": 2, "video_yid": "b2", "title": "서울 맛집 추천", "tags": ["서울", "맛집"],
             "published_at": "2024-06-02T00:00:00Z"},
            {"id": 3, "video_yid": "c3", "title": "", "tags": ["ignored"]}
        ]"#,
    )
    .unwrap();

    let catalog = Arc::new(Catalog::load_json(&catalog_path).unwrap());
    assert_eq!(catalog.len(), 2);

    let embedder = Arc::new(HashEmbedder::new(64));
    let embeddings = EmbeddingStore::new();
    let report = EmbeddingPipeline::new(catalog.as_ref(), &embeddings, embedder.as_ref())
        .run(&[EmbeddingType::Title, EmbeddingType::FullText])
        .unwrap();
    assert_eq!(report.total_embedded(), 4);
    embeddings.save(&embeddings_path).unwrap();

    let embeddings = Arc::new(EmbeddingStore::load(&embeddings_path).unwrap());
    let service = SearchService::new(catalog, embeddings, embedder, EngineConfig::default()).unwrap();

    let response = service
        .similar_search("제주 여행 코스 & 맛집", Some("cosine"), EmbeddingType::Title, Some(5), None)
        .unwrap();
    assert_eq!(response.results[0].video_yid, "a1");

    let response = service
        .similar_search("서울 맛집", Some("tfidf"), EmbeddingType::Title, Some(5), None)
        .unwrap();
    assert_eq!(response.results[0].video_yid, "b2");
    assert!(!response.degraded);

    let keywords = service.similar_keywords("맛집", Some("jaccard"), Some(3)).unwrap();
    assert_eq!(keywords.results[0].keyword, "맛집");
    assert!(keywords.results.iter().all(|k| k.keyword != "ignored"));

    let stats = service.embedding_stats();
    assert_eq!(stats.progress.embedded_videos, 2);
    assert_eq!(stats.stats.total_embeddings, 4);
}

#[test]
fn test_config_file_drives_defaults() {
    let config = EngineConfig::from_json(r#"{"default_method": "levenshtein", "default_limit": 1}"#).unwrap();
    let catalog = Arc::new(Catalog::from_videos(vec![
        Video::new(1, "제주 여행"),
        Video::new(2, "제주 여행기"),
    ]));
    let service = SearchService::new(
        catalog,
        Arc::new(EmbeddingStore::new()),
        Arc::new(HashEmbedder::new(16)),
        config,
    )
    .unwrap();

    let response = service
        .similar_search("제주 여행기", None, EmbeddingType::Title, None, None)
        .unwrap();
    assert_eq!(response.method, SimilarityMethod::Levenshtein);
    assert_eq!(response.results.len(), 1);
    assert_eq!(response.results[0].id, "2");
}
