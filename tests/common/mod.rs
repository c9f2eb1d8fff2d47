//! Shared helpers for the glosa integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use glosa::cache::{CacheDocument, CacheStore};
use glosa::config::Config;
use glosa::error::{GlosaError, Result};
use glosa::locale::LocaleTable;
use glosa::lookup::Dictionary;
use glosa::transport::{FetchResponse, Transport};

/// Behavior of the mock transport
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Answers every request with this status and body
    Respond { status: u16, body: String },
    /// Fails every request at the transport level
    Failing,
}

/// Transport double counting requests and recording requested URLs
#[derive(Clone)]
pub struct MockTransport {
    behavior: MockBehavior,
    calls: Arc<AtomicUsize>,
    urls: Arc<Mutex<Vec<String>>>,
}

impl MockTransport {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            calls: Arc::new(AtomicUsize::new(0)),
            urls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn serving(body: &str) -> Self {
        Self::new(MockBehavior::Respond {
            status: 200,
            body: body.to_string(),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn fetch(&self, url: &str) -> Result<FetchResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.to_string());

        match &self.behavior {
            MockBehavior::Respond { status, body } => Ok(FetchResponse {
                status: *status,
                body: body.as_bytes().to_vec(),
            }),
            MockBehavior::Failing => Err(GlosaError::Fetch("connection refused".to_string())),
        }
    }
}

/// Cache store whose writes always fail, as on a full or read-only disk
pub struct RejectingStore;

#[async_trait]
impl CacheStore for RejectingStore {
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

/// Dictionary over the default configuration with test collaborators
pub fn dictionary(transport: &MockTransport, store: Box<dyn CacheStore>) -> Dictionary {
    let config = Config::default();
    let locales = LocaleTable::new(config.locales.clone()).unwrap();
    Dictionary::new(config.server, locales, Box::new(transport.clone()), store)
}

/// Contents of a file under `tests/fixtures`
pub fn fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    std::fs::read_to_string(path).unwrap()
}
