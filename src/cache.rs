//! Lookup cache: pair-key formatting, persistent stores and the in-memory
//! document memo that merges entries before writing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{GlosaError, Result};
use crate::result::LookupResult;

const PAIR_SEPARATOR: &str = "-";

/// Order-independent key for a language pair: `(es, en)` and `(en, es)` both
/// give `en-es`.
pub fn format_key(from: &str, to: &str) -> String {
    let mut codes = [from, to];
    codes.sort_unstable();
    codes.join(PAIR_SEPARATOR)
}

/// Full address of a cached lookup
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheAddress {
    pub pair_key: String,
    pub query: String,
}

impl CacheAddress {
    pub fn new(from: &str, to: &str, query: &str) -> Self {
        Self {
            pair_key: format_key(from, to),
            query: query.to_string(),
        }
    }
}

/// All cached lookups of one language pair, stored and loaded as a unit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheDocument {
    pub name: String,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub data: BTreeMap<String, LookupResult>,
}

impl CacheDocument {
    pub fn new(pair_key: &str) -> Self {
        Self {
            name: pair_key.to_string(),
            updated_at: None,
            data: BTreeMap::new(),
        }
    }
}

/// Durable storage for cache documents, one document per pair key
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Load the document of a pair, `None` when nothing was stored yet
    async fn read(&self, pair_key: &str) -> Result<Option<CacheDocument>>;

    /// Replace the whole document of a pair
    async fn write(&self, pair_key: &str, document: &CacheDocument) -> Result<()>;

    /// Pair keys that currently have a document
    async fn pairs(&self) -> Result<Vec<String>>;

    /// Delete the document of a pair, returning whether one existed
    async fn remove(&self, pair_key: &str) -> Result<bool>;
}

/// Stores each pair as `<dir>/<pair_key>.json`
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn document_path(&self, pair_key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", pair_key))
    }
}

#[async_trait]
impl CacheStore for JsonFileStore {
    async fn read(&self, pair_key: &str) -> Result<Option<CacheDocument>> {
        let path = self.document_path(pair_key);
        if !path.exists() {
            return Ok(None);
        }

        let content = tokio::fs::read_to_string(&path).await?;
        match serde_json::from_str::<CacheDocument>(&content) {
            Ok(document) => {
                debug!("Loaded cache document {} ({} entries)", pair_key, document.data.len());
                Ok(Some(document))
            }
            Err(e) => {
                // An unreadable document is treated as empty and rewritten on the next store
                warn!("Failed to parse cache document {}: {}", path.display(), e);
                Ok(None)
            }
        }
    }

    async fn write(&self, pair_key: &str, document: &CacheDocument) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            GlosaError::Cache(format!("Failed to create cache directory {}: {}", self.dir.display(), e))
        })?;

        let content = serde_json::to_string_pretty(document)?;
        let path = self.document_path(pair_key);
        tokio::fs::write(&path, content).await.map_err(|e| {
            GlosaError::Cache(format!("Failed to write cache document {}: {}", path.display(), e))
        })?;

        debug!("Saved cache document {} ({} entries)", pair_key, document.data.len());
        Ok(())
    }

    async fn pairs(&self) -> Result<Vec<String>> {
        let mut pairs = Vec::new();
        if let Ok(mut entries) = tokio::fs::read_dir(&self.dir).await {
            while let Ok(Some(entry)) = entries.next_entry().await {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "json") {
                    if let Some(stem) = path.file_stem() {
                        pairs.push(stem.to_string_lossy().to_string());
                    }
                }
            }
        }
        pairs.sort();
        Ok(pairs)
    }

    async fn remove(&self, pair_key: &str) -> Result<bool> {
        let path = self.document_path(pair_key);
        if !path.exists() {
            return Ok(false);
        }
        tokio::fs::remove_file(&path).await?;
        info!("Removed cache document {}", path.display());
        Ok(true)
    }
}

/// Keeps documents in memory only; used for `--no-cache` sessions
#[derive(Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<String, CacheDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn read(&self, pair_key: &str) -> Result<Option<CacheDocument>> {
        Ok(self.documents.lock().await.get(pair_key).cloned())
    }

    async fn write(&self, pair_key: &str, document: &CacheDocument) -> Result<()> {
        self.documents
            .lock()
            .await
            .insert(pair_key.to_string(), document.clone());
        Ok(())
    }

    async fn pairs(&self) -> Result<Vec<String>> {
        let mut pairs: Vec<String> = self.documents.lock().await.keys().cloned().collect();
        pairs.sort();
        Ok(pairs)
    }

    async fn remove(&self, pair_key: &str) -> Result<bool> {
        Ok(self.documents.lock().await.remove(pair_key).is_some())
    }
}

/// Cache front-end: memoizes loaded documents and merges new entries into
/// them before writing the whole document back.
pub struct Cache {
    store: Box<dyn CacheStore>,
    loaded: Mutex<HashMap<String, CacheDocument>>,
}

impl Cache {
    pub fn new(store: Box<dyn CacheStore>) -> Self {
        Self {
            store,
            loaded: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &dyn CacheStore {
        self.store.as_ref()
    }

    /// Cached result stored at `address`
    pub async fn get(&self, address: &CacheAddress) -> Result<Option<LookupResult>> {
        let mut loaded = self.loaded.lock().await;
        let document = Self::ensure_loaded(self.store.as_ref(), &mut loaded, &address.pair_key).await?;
        Ok(document.data.get(&address.query).cloned())
    }

    /// Insert `result` at `address` and persist the pair's document.
    /// The memoized document only changes once the store accepted the write.
    pub async fn put(&self, address: &CacheAddress, result: LookupResult) -> Result<()> {
        let mut loaded = self.loaded.lock().await;
        let current = Self::ensure_loaded(self.store.as_ref(), &mut loaded, &address.pair_key).await?;

        let mut updated = current.clone();
        updated.data.insert(address.query.clone(), result);
        updated.updated_at = Some(Utc::now());
        self.store.write(&address.pair_key, &updated).await?;

        *current = updated;
        Ok(())
    }

    /// Drop the memoized document of a pair and delete it from the store
    pub async fn clear_pair(&self, pair_key: &str) -> Result<bool> {
        self.loaded.lock().await.remove(pair_key);
        self.store.remove(pair_key).await
    }

    async fn ensure_loaded<'a>(
        store: &dyn CacheStore,
        loaded: &'a mut HashMap<String, CacheDocument>,
        pair_key: &str,
    ) -> Result<&'a mut CacheDocument> {
        if !loaded.contains_key(pair_key) {
            let document = store
                .read(pair_key)
                .await?
                .unwrap_or_else(|| CacheDocument::new(pair_key));
            loaded.insert(pair_key.to_string(), document);
        }
        loaded
            .get_mut(pair_key)
            .ok_or_else(|| GlosaError::Cache(format!("Cache document {} not loaded", pair_key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::{LanguageSideResult, TranslationBlock};

    fn result_with(word: &str) -> LookupResult {
        let mut pos = TranslationBlock::new();
        pos.insert("noun".to_string(), vec![word.to_string()]);
        let mut result = LookupResult::default();
        result.sides.insert("en".to_string(), LanguageSideResult { pos, audio: None });
        result.sides.insert("es".to_string(), LanguageSideResult::default());
        result.extras.insert("en".to_string(), None);
        result.extras.insert("es".to_string(), None);
        result
    }

    #[test]
    fn test_format_key_is_order_independent() {
        assert_eq!(format_key("es", "en"), "en-es");
        assert_eq!(format_key("en", "es"), "en-es");
        assert_eq!(format_key("de", "de"), "de-de");
        for (a, b) in [("pt", "fr"), ("ja", "zh"), ("sv", "nl")] {
            assert_eq!(format_key(a, b), format_key(b, a));
        }
    }

    #[tokio::test]
    async fn test_memory_cache_roundtrip() {
        let cache = Cache::new(Box::new(MemoryStore::new()));
        let address = CacheAddress::new("es", "en", "casa");

        assert!(cache.get(&address).await.unwrap().is_none());
        cache.put(&address, result_with("house")).await.unwrap();
        assert_eq!(cache.get(&address).await.unwrap(), Some(result_with("house")));

        let reversed = CacheAddress::new("en", "es", "casa");
        assert_eq!(cache.get(&reversed).await.unwrap(), Some(result_with("house")));
    }

    #[tokio::test]
    async fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let address = CacheAddress::new("es", "en", "perro");

        let cache = Cache::new(Box::new(JsonFileStore::new(dir.path())));
        cache.put(&address, result_with("dog")).await.unwrap();
        cache.put(&CacheAddress::new("es", "en", "gato"), result_with("cat")).await.unwrap();

        assert!(dir.path().join("en-es.json").exists());

        let reopened = Cache::new(Box::new(JsonFileStore::new(dir.path())));
        assert_eq!(reopened.get(&address).await.unwrap(), Some(result_with("dog")));

        let document = JsonFileStore::new(dir.path()).read("en-es").await.unwrap().unwrap();
        assert_eq!(document.name, "en-es");
        assert_eq!(document.data.len(), 2);
        assert!(document.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_file_store_pairs_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());

        assert!(store.pairs().await.unwrap().is_empty());
        store.write("en-es", &CacheDocument::new("en-es")).await.unwrap();
        store.write("de-en", &CacheDocument::new("de-en")).await.unwrap();
        assert_eq!(store.pairs().await.unwrap(), vec!["de-en", "en-es"]);

        assert!(store.remove("en-es").await.unwrap());
        assert!(!store.remove("en-es").await.unwrap());
        assert_eq!(store.pairs().await.unwrap(), vec!["de-en"]);
    }

    #[tokio::test]
    async fn test_corrupt_document_reads_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("en-es.json"), "{ not json").unwrap();

        let store = JsonFileStore::new(dir.path());
        assert!(store.read("en-es").await.unwrap().is_none());
    }

    /// Store that loads nothing and rejects every write
    struct ReadOnlyStore;

    #[async_trait]
    impl CacheStore for ReadOnlyStore {
        async fn read(&self, _pair_key: &str) -> Result<Option<CacheDocument>> {
            Ok(None)
        }

        async fn write(&self, _pair_key: &str, _document: &CacheDocument) -> Result<()> {
            Err(GlosaError::Cache("disk full".to_string()))
        }

        async fn pairs(&self) -> Result<Vec<String>> {
            Ok(Vec::new())
        }

        async fn remove(&self, _pair_key: &str) -> Result<bool> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn test_rejected_write_leaves_memo_unchanged() {
        let cache = Cache::new(Box::new(ReadOnlyStore));
        let address = CacheAddress::new("es", "en", "casa");

        let error = cache.put(&address, result_with("house")).await.unwrap_err();
        assert!(matches!(error, GlosaError::Cache(_)));
        assert!(cache.get(&address).await.unwrap().is_none());
    }
}
