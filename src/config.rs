use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;
use crate::error::{GlosaError, Result};
use crate::locale::LocaleEntry;

// Default values for optional configuration keys
fn default_timeout_secs() -> u64 {
    15
}

fn default_user_agent() -> String {
    format!("glosa/{}", env!("CARGO_PKG_VERSION"))
}

fn default_cache_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub cache: CacheConfig,
    pub session: SessionConfig,
    pub locales: Vec<LocaleEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base address of the dictionary site
    pub base_url: String,
    /// Search path appended after the `<from>-<to>` segment
    pub search_path: String,
    /// Default query-string options sent with every search (e.g. "source=auto")
    pub query_options: String,
    /// Base address of pronunciation files
    pub audio_base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Directory holding one JSON document per language pair.
    /// Defaults to `<data dir>/glosa/cache` when unset.
    pub dir: Option<PathBuf>,
    /// Persist lookups across sessions
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Language code looked up from
    pub from: String,
    /// Language code translated to
    pub to: String,
    /// Resolve pronunciation URLs
    #[serde(default)]
    pub with_audio: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                base_url: "https://www.linguee.com".to_string(),
                search_path: "search".to_string(),
                query_options: "source=auto".to_string(),
                audio_base_url: "https://www.linguee.com/mp3".to_string(),
                timeout_secs: default_timeout_secs(),
                user_agent: default_user_agent(),
            },
            cache: CacheConfig {
                dir: None,
                enabled: true,
            },
            session: SessionConfig {
                from: "es".to_string(),
                to: "en".to_string(),
                with_audio: false,
            },
            locales: default_locales(),
        }
    }
}

/// Locales served by the Linguee layout
fn default_locales() -> Vec<LocaleEntry> {
    [
        ("bg", "bulgarian", "BG"),
        ("cs", "czech", "CS"),
        ("da", "danish", "DA"),
        ("de", "german", "DE"),
        ("el", "greek", "EL"),
        ("en", "english", "EN"),
        ("es", "spanish", "ES"),
        ("et", "estonian", "ET"),
        ("fi", "finnish", "FI"),
        ("fr", "french", "FR"),
        ("hu", "hungarian", "HU"),
        ("it", "italian", "IT"),
        ("ja", "japanese", "JA"),
        ("lt", "lithuanian", "LT"),
        ("lv", "latvian", "LV"),
        ("mt", "maltese", "MT"),
        ("nl", "dutch", "NL"),
        ("pl", "polish", "PL"),
        ("pt", "portuguese", "PT"),
        ("ro", "romanian", "RO"),
        ("ru", "russian", "RU"),
        ("sk", "slovak", "SK"),
        ("sl", "slovene", "SL"),
        ("sv", "swedish", "SV"),
        ("zh", "chinese", "ZH"),
    ]
    .into_iter()
    .map(|(code, name, context)| LocaleEntry::new(code, name, context))
    .collect()
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| GlosaError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| GlosaError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| GlosaError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| GlosaError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Load an explicit config file, then `./glosa.toml`, then built-in defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                if Path::new("glosa.toml").exists() {
                    info!("Found glosa.toml in current directory, loading...");
                    Self::from_file("glosa.toml")
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Directory where cache documents live
    pub fn cache_dir(&self) -> PathBuf {
        self.cache
            .dir
            .clone()
            .unwrap_or_else(|| data_dir().join("cache"))
    }
}

/// Per-user data directory, falling back to `.glosa` in the working directory
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("glosa"))
        .unwrap_or_else(|| PathBuf::from(".glosa"))
}
