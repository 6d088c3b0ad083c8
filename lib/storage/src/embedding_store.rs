//! Embedding store
//!
//! Holds one vector per (video, embedding type, model). Vectors produced by
//! different models are never mixed: every lookup names the model.
//!
//! Snapshots are bincode-encoded and written atomically, so a crash during
//! [`EmbeddingStore::save`] leaves the previous file intact.

use crate::video::EmbeddingType;
use atomicwrites::{AtomicFile, OverwriteBehavior};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use simrank_core::{Error, Result, Vector};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::Write;
use std::path::Path;
use tracing::info;

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EmbeddingKey {
    pub video_id: u64,
    pub embedding_type: EmbeddingType,
    pub model: String,
}

impl EmbeddingKey {
    pub fn new(video_id: u64, embedding_type: EmbeddingType, model: impl Into<String>) -> Self {
        Self {
            video_id,
            embedding_type,
            model: model.into(),
        }
    }
}

/// Counts reported by [`EmbeddingStore::stats`]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingStats {
    pub total_embeddings: usize,
    pub type_counts: BTreeMap<String, usize>,
    pub model_counts: BTreeMap<String, usize>,
    /// Vector dimension per model
    pub dimensions: BTreeMap<String, usize>,
}

#[derive(Serialize, Deserialize)]
struct EmbeddingSnapshot {
    version: u32,
    entries: Vec<(EmbeddingKey, Vec<f32>)>,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<EmbeddingKey, Vector>,
    /// Dimension of the first vector stored per model
    dimensions: HashMap<String, usize>,
}

#[derive(Debug, Default)]
pub struct EmbeddingStore {
    inner: RwLock<Inner>,
}

impl EmbeddingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a vector, replacing any previous one for the same key.
    ///
    /// All vectors of one model must share a dimension.
    pub fn put(&self, key: EmbeddingKey, vector: Vector) -> Result<()> {
        let mut inner = self.inner.write();
        let expected = *inner
            .dimensions
            .entry(key.model.clone())
            .or_insert(vector.dim());
        if expected != vector.dim() {
            return Err(Error::DimensionMismatch {
                candidate: key.video_id.to_string(),
                expected,
                actual: vector.dim(),
            });
        }
        inner.entries.insert(key, vector);
        Ok(())
    }

    pub fn get(&self, video_id: u64, embedding_type: EmbeddingType, model: &str) -> Option<Vector> {
        self.inner
            .read()
            .entries
            .get(&EmbeddingKey::new(video_id, embedding_type, model))
            .cloned()
    }

    pub fn contains(&self, video_id: u64, embedding_type: EmbeddingType, model: &str) -> bool {
        self.inner
            .read()
            .entries
            .contains_key(&EmbeddingKey::new(video_id, embedding_type, model))
    }

    /// Vectors for `ids`, in order, or `None` if any is missing
    pub fn aligned(&self, ids: &[u64], embedding_type: EmbeddingType, model: &str) -> Option<Vec<Vector>> {
        let inner = self.inner.read();
        ids.iter()
            .map(|&id| inner.entries.get(&EmbeddingKey::new(id, embedding_type, model)).cloned())
            .collect()
    }

    /// Number of distinct videos with at least one vector from `model`
    pub fn embedded_videos(&self, model: &str) -> usize {
        let inner = self.inner.read();
        let ids: HashSet<u64> = inner
            .entries
            .keys()
            .filter(|k| k.model == model)
            .map(|k| k.video_id)
            .collect();
        ids.len()
    }

    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }

    pub fn stats(&self) -> EmbeddingStats {
        let inner = self.inner.read();
        let mut stats = EmbeddingStats {
            total_embeddings: inner.entries.len(),
            ..Default::default()
        };
        for key in inner.entries.keys() {
            *stats.type_counts.entry(key.embedding_type.to_string()).or_insert(0) += 1;
            *stats.model_counts.entry(key.model.clone()).or_insert(0) += 1;
        }
        for (model, &dim) in &inner.dimensions {
            if stats.model_counts.contains_key(model) {
                stats.dimensions.insert(model.clone(), dim);
            }
        }
        stats
    }

    /// Write a snapshot to `path`, replacing it atomically.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut entries: Vec<(EmbeddingKey, Vec<f32>)> = self
            .inner
            .read()
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.as_slice().to_vec()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        let count = entries.len();

        let snapshot = EmbeddingSnapshot {
            version: SNAPSHOT_VERSION,
            entries,
        };
        let data = bincode::serialize(&snapshot).map_err(|e| Error::Serialization(e.to_string()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
            .write(|f| f.write_all(&data))
            .map_err(|e| Error::Storage(format!("failed to write {}: {}", path.display(), e)))?;

        info!("Saved {} embeddings to {:?}", count, path);
        Ok(())
    }

    /// Read a snapshot written by [`EmbeddingStore::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let snapshot: EmbeddingSnapshot =
            bincode::deserialize(&data).map_err(|e| Error::Serialization(e.to_string()))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(Error::Storage(format!(
                "unsupported embedding snapshot version {} in {}",
                snapshot.version,
                path.display()
            )));
        }

        let store = Self::new();
        for (key, data) in snapshot.entries {
            store.put(key, Vector::new(data))?;
        }
        info!("Loaded {} embeddings from {:?}", store.len(), path);
        Ok(store)
    }

    /// Load `path` if it exists, otherwise start empty.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn key(id: u64, t: EmbeddingType) -> EmbeddingKey {
        EmbeddingKey::new(id, t, "m1")
    }

    #[test]
    fn test_put_get() {
        let store = EmbeddingStore::new();
        store.put(key(1, EmbeddingType::Title), Vector::new(vec![1.0, 0.0])).unwrap();

        assert_eq!(
            store.get(1, EmbeddingType::Title, "m1"),
            Some(Vector::new(vec![1.0, 0.0]))
        );
        assert!(store.get(1, EmbeddingType::FullText, "m1").is_none());
        assert!(store.get(1, EmbeddingType::Title, "m2").is_none());
    }

    #[test]
    fn test_dimension_is_fixed_per_model() {
        let store = EmbeddingStore::new();
        store.put(key(1, EmbeddingType::Title), Vector::new(vec![1.0, 0.0])).unwrap();
        let err = store
            .put(key(2, EmbeddingType::Title), Vector::new(vec![1.0, 0.0, 0.0]))
            .unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { expected: 2, actual: 3, .. }));

        store
            .put(EmbeddingKey::new(2, EmbeddingType::Title, "m2"), Vector::new(vec![1.0, 0.0, 0.0]))
            .unwrap();
    }

    #[test]
    fn test_aligned() {
        let store = EmbeddingStore::new();
        store.put(key(1, EmbeddingType::Title), Vector::new(vec![1.0, 0.0])).unwrap();
        store.put(key(2, EmbeddingType::Title), Vector::new(vec![0.0, 1.0])).unwrap();

        let vectors = store.aligned(&[2, 1], EmbeddingType::Title, "m1").unwrap();
        assert_eq!(vectors[0], Vector::new(vec![0.0, 1.0]));
        assert_eq!(vectors[1], Vector::new(vec![1.0, 0.0]));

        assert!(store.aligned(&[1, 3], EmbeddingType::Title, "m1").is_none());
        assert_eq!(store.aligned(&[], EmbeddingType::Title, "m1"), Some(vec![]));
    }

    #[test]
    fn test_stats() {
        let store = EmbeddingStore::new();
        store.put(key(1, EmbeddingType::Title), Vector::new(vec![1.0, 0.0])).unwrap();
        store.put(key(1, EmbeddingType::FullText), Vector::new(vec![1.0, 0.0])).unwrap();
        store.put(key(2, EmbeddingType::Title), Vector::new(vec![0.0, 1.0])).unwrap();

        let stats = store.stats();
        assert_eq!(stats.total_embeddings, 3);
        assert_eq!(stats.type_counts["title"], 2);
        assert_eq!(stats.type_counts["full_text"], 1);
        assert_eq!(stats.model_counts["m1"], 3);
        assert_eq!(stats.dimensions["m1"], 2);
        assert_eq!(store.embedded_videos("m1"), 2);
        assert_eq!(store.embedded_videos("m2"), 0);
    }

    #[test]
    fn test_save_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("embeddings.bin");

        let store = EmbeddingStore::new();
        store.put(key(1, EmbeddingType::Title), Vector::new(vec![0.6, 0.8])).unwrap();
        store.put(key(2, EmbeddingType::TitleDesc), Vector::new(vec![1.0, 0.0])).unwrap();
        store.save(&path).unwrap();

        let loaded = EmbeddingStore::load(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.stats(), store.stats());
        assert_eq!(
            loaded.get(1, EmbeddingType::Title, "m1"),
            Some(Vector::new(vec![0.6, 0.8]))
        );
    }

    #[test]
    fn test_open_missing_is_empty() {
        let dir = tempdir().unwrap();
        let store = EmbeddingStore::open(dir.path().join("absent.bin")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.bin");
        std::fs::write(&path, b"\x01\x02").unwrap();
        assert!(matches!(EmbeddingStore::load(&path), Err(Error::Serialization(_))));
    }
}
