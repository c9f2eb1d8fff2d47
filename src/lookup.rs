//! Cache-first lookup gateway.

use reqwest::Url;
use tracing::{debug, info, warn};

use crate::cache::{Cache, CacheAddress, CacheStore, JsonFileStore, MemoryStore};
use crate::config::{Config, ServerConfig};
use crate::error::{GlosaError, Result};
use crate::extract::MarkupExtractor;
use crate::locale::{LocaleEntry, LocaleTable};
use crate::normalize::normalize;
use crate::result::{assemble, LookupResult};
use crate::transport::{HttpTransport, Transport};

/// Language pair and switches of one lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupOptions {
    pub from: String,
    pub to: String,
    pub with_audio: bool,
}

impl LookupOptions {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            with_audio: false,
        }
    }

    pub fn with_audio(mut self, with_audio: bool) -> Self {
        self.with_audio = with_audio;
        self
    }
}

/// Where a lookup result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Cache,
    Remote,
}

impl Origin {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::Remote => "remote",
        }
    }
}

#[derive(Debug)]
pub struct LookupOutcome {
    pub result: LookupResult,
    pub origin: Origin,
    /// Set when the result was fetched but could not be written to the cache
    pub persist_error: Option<GlosaError>,
}

impl LookupOutcome {
    pub fn is_cached(&self) -> bool {
        self.origin == Origin::Cache
    }
}

pub struct Dictionary {
    server: ServerConfig,
    locales: LocaleTable,
    transport: Box<dyn Transport>,
    cache: Cache,
    extractor: MarkupExtractor,
}

impl Dictionary {
    pub fn new(
        server: ServerConfig,
        locales: LocaleTable,
        transport: Box<dyn Transport>,
        store: Box<dyn CacheStore>,
    ) -> Self {
        let extractor = MarkupExtractor::new(&server.audio_base_url);
        Self {
            server,
            locales,
            transport,
            cache: Cache::new(store),
            extractor,
        }
    }

    /// Build a dictionary talking to the configured site. With `persistent`
    /// unset lookups are only cached for the lifetime of the process.
    pub fn from_config(config: &Config, persistent: bool) -> Result<Self> {
        let locales = LocaleTable::new(config.locales.clone())?;
        let transport = HttpTransport::new(&config.server)?;

        let store: Box<dyn CacheStore> = if persistent && config.cache.enabled {
            let dir = config.cache_dir();
            info!("Using cache directory {}", dir.display());
            Box::new(JsonFileStore::new(dir))
        } else {
            info!("Persistent cache disabled, caching in memory only");
            Box::new(MemoryStore::new())
        };

        Ok(Self::new(config.server.clone(), locales, Box::new(transport), store))
    }

    pub fn locales(&self) -> &LocaleTable {
        &self.locales
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Search address for `query` between two locales
    pub fn search_url(&self, from: &LocaleEntry, to: &LocaleEntry, query: &str) -> Result<String> {
        let base = format!(
            "{}/{}-{}/{}",
            self.server.base_url.trim_end_matches('/'),
            from.name,
            to.name,
            self.server.search_path.trim_start_matches('/')
        );
        let mut url = Url::parse(&base)
            .map_err(|e| GlosaError::Config(format!("Invalid search address '{}': {}", base, e)))?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("query", query);
            for option in self.server.query_options.split('&').filter(|o| !o.is_empty()) {
                match option.split_once('=') {
                    Some((key, value)) => pairs.append_pair(key, value),
                    None => pairs.append_key_only(option),
                };
            }
        }

        Ok(url.to_string())
    }

    /// Look `query` up, serving from the cache when possible
    pub async fn lookup(&self, query: &str, options: &LookupOptions) -> Result<LookupOutcome> {
        let (from, to) = self.locales.resolve_pair(&options.from, &options.to)?;

        let query = normalize(query.trim());
        if query.is_empty() {
            return Err(GlosaError::BadOptions("empty query".to_string()));
        }

        let address = CacheAddress::new(&from.code, &to.code, &query);
        match self.cache.get(&address).await {
            Ok(Some(result)) => {
                debug!("Cache hit for '{}' in {}", address.query, address.pair_key);
                return Ok(LookupOutcome {
                    result,
                    origin: Origin::Cache,
                    persist_error: None,
                });
            }
            Ok(None) => debug!("Cache miss for '{}' in {}", address.query, address.pair_key),
            Err(e) => warn!("Failed to read cache for {}: {}", address.pair_key, e),
        }

        let url = self.search_url(from, to, &query)?;
        info!("Fetching '{}' ({} -> {})", query, from.code, to.code);

        let response = self.transport.fetch(&url).await?;
        if !response.is_success() {
            return Err(GlosaError::Fetch(format!(
                "{} answered with status {}",
                url, response.status
            )));
        }

        let parts = self
            .extractor
            .extract(&response.text(), from, to, options.with_audio);
        let result = assemble(&from.code, &to.code, parts);

        let persist_error = if result.is_empty() {
            info!("No translations found for '{}', not caching", query);
            None
        } else {
            match self.cache.put(&address, result.clone()).await {
                Ok(()) => None,
                Err(e) => {
                    warn!("Failed to save lookup to cache: {}", e);
                    Some(e)
                }
            }
        };

        Ok(LookupOutcome {
            result,
            origin: Origin::Remote,
            persist_error,
        })
    }
}
