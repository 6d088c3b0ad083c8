//! In-memory video catalog
//!
//! Serves ranking candidates newest-first and the distinct tag vocabulary
//! used for keyword recommendations.

use crate::video::Video;
use parking_lot::RwLock;
use simrank_core::{normalize, Error, Result};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use tracing::{info, warn};

/// Source of ranking candidates.
///
/// Implementations hold no ranking logic.
pub trait CandidateStore: Send + Sync {
    /// Videos ordered newest-first (ties by ascending id), at most `limit`
    fn fetch_candidates(&self, limit: Option<usize>) -> Vec<Video>;

    /// Sorted, de-duplicated, non-empty tags across all videos
    fn distinct_tags(&self) -> Vec<String>;

    fn get(&self, id: u64) -> Option<Video>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Thread-safe catalog of videos keyed by id
#[derive(Debug, Default)]
pub struct Catalog {
    videos: RwLock<HashMap<u64, Video>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog, skipping videos whose title normalizes to empty.
    pub fn from_videos<I: IntoIterator<Item = Video>>(videos: I) -> Self {
        let catalog = Self::new();
        for video in videos {
            catalog.upsert(video);
        }
        catalog
    }

    /// Load a JSON array of videos.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let videos: Vec<Video> = serde_json::from_str(&data)
            .map_err(|e| Error::Serialization(format!("{}: {}", path.display(), e)))?;
        let total = videos.len();
        let catalog = Self::from_videos(videos);
        info!("Loaded {} of {} videos from {:?}", catalog.len(), total, path);
        Ok(catalog)
    }

    /// Insert or replace a video. Returns false if it was skipped.
    pub fn upsert(&self, video: Video) -> bool {
        if normalize(&video.title).is_empty() {
            warn!("Skipping video {} with empty title", video.id);
            return false;
        }
        self.videos.write().insert(video.id, video);
        true
    }
}

impl CandidateStore for Catalog {
    fn fetch_candidates(&self, limit: Option<usize>) -> Vec<Video> {
        let mut videos: Vec<Video> = self.videos.read().values().cloned().collect();
        // None sorts before Some, so reversing the date order puts undated videos last
        videos.sort_by(|a, b| b.published_at.cmp(&a.published_at).then(a.id.cmp(&b.id)));
        if let Some(limit) = limit {
            videos.truncate(limit);
        }
        videos
    }

    fn distinct_tags(&self) -> Vec<String> {
        let videos = self.videos.read();
        let tags: BTreeSet<String> = videos
            .values()
            .flat_map(|v| v.tags.iter())
            .map(|t| normalize(t))
            .filter(|t| !t.is_empty())
            .collect();
        tags.into_iter().collect()
    }

    fn get(&self, id: u64) -> Option<Video> {
        self.videos.read().get(&id).cloned()
    }

    fn len(&self) -> usize {
        self.videos.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn dated(id: u64, title: &str, day: u32) -> Video {
        Video::new(id, title).with_published_at(Utc.with_ymd_and_hms(2024, 3, day, 0, 0, 0).unwrap())
    }

    #[test]
    fn test_fetch_newest_first_with_id_tiebreak() {
        let catalog = Catalog::from_videos(vec![
            dated(3, "c", 1),
            dated(1, "a", 5),
            Video::new(4, "undated"),
            dated(2, "b", 5),
        ]);

        let ids: Vec<u64> = catalog.fetch_candidates(None).iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);

        let ids: Vec<u64> = catalog.fetch_candidates(Some(2)).iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_empty_titles_are_skipped() {
        let catalog = Catalog::new();
        assert!(!catalog.upsert(Video::new(1, "  😀 ")));
        assert!(catalog.upsert(Video::new(2, "제주")));
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get(1).is_none());
    }

    #[test]
    fn test_upsert_replaces() {
        let catalog = Catalog::new();
        catalog.upsert(Video::new(1, "old"));
        catalog.upsert(Video::new(1, "new"));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(1).map(|v| v.title), Some("new".to_string()));
    }

    #[test]
    fn test_distinct_tags() {
        let catalog = Catalog::from_videos(vec![
            Video::new(1, "a").with_tags(["제주", "여행", " "]),
            Video::new(2, "b").with_tags(["여행", "맛집", "제주 "]),
        ]);
        assert_eq!(catalog.distinct_tags(), vec!["맛집", "여행", "제주"]);
    }

    #[test]
    fn test_load_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"id": 1, "video_yid": "abc", "title": "제주 여행", "tags": ["제주"]}},
                {{"id": 2, "title": ""}},
                {{"id": 3, "title": "서울 맛집", "published_at": "2024-01-01T00:00:00Z"}}
            ]"#
        )
        .unwrap();

        let catalog = Catalog::load_json(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(1).map(|v| v.video_yid), Some("abc".to_string()));
    }

    #[test]
    fn test_load_json_malformed() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        assert!(matches!(Catalog::load_json(file.path()), Err(Error::Serialization(_))));
    }
}
