use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{GlosaError, Result};

/// A language the dictionary site can serve
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleEntry {
    /// Short language code used on the command line (e.g. "es")
    pub code: String,
    /// Identifier the site uses in its URLs (e.g. "spanish")
    pub name: String,
    /// Value of `data-source-lang` marking this language's half of a page
    pub context: String,
}

impl LocaleEntry {
    pub fn new(code: &str, name: &str, context: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            context: context.to_string(),
        }
    }

    /// CSS selector scoping extraction to this language's half of a page
    pub fn context_selector(&self) -> String {
        format!("[data-source-lang=\"{}\"]", self.context)
    }
}

/// Immutable lookup table from language code to locale entry
#[derive(Debug, Clone)]
pub struct LocaleTable {
    entries: IndexMap<String, LocaleEntry>,
}

impl LocaleTable {
    pub fn new(entries: Vec<LocaleEntry>) -> Result<Self> {
        let mut map = IndexMap::with_capacity(entries.len());
        for entry in entries {
            if entry.code.trim().is_empty() {
                return Err(GlosaError::Config("Locale entry with empty code".to_string()));
            }
            if map.contains_key(&entry.code) {
                return Err(GlosaError::Config(format!(
                    "Duplicate locale code '{}'",
                    entry.code
                )));
            }
            map.insert(entry.code.clone(), entry);
        }
        Ok(Self { entries: map })
    }

    pub fn get(&self, code: &str) -> Option<&LocaleEntry> {
        self.entries.get(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = &LocaleEntry> {
        self.entries.values()
    }

    /// Resolve both codes of a pair, failing with `BadOptions` on unknown codes
    pub fn resolve_pair(&self, from: &str, to: &str) -> Result<(&LocaleEntry, &LocaleEntry)> {
        match (self.get(from), self.get(to)) {
            (Some(from), Some(to)) => Ok((from, to)),
            (None, _) => Err(GlosaError::BadOptions(format!("unsupported language '{}'", from))),
            (_, None) => Err(GlosaError::BadOptions(format!("unsupported language '{}'", to))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> LocaleTable {
        LocaleTable::new(vec![
            LocaleEntry::new("en", "english", "EN"),
            LocaleEntry::new("es", "spanish", "ES"),
        ])
        .unwrap()
    }

    #[test]
    fn test_resolve_known_pair() {
        let table = table();
        let (from, to) = table.resolve_pair("es", "en").unwrap();
        assert_eq!(from.name, "spanish");
        assert_eq!(to.context, "EN");
    }

    #[test]
    fn test_unknown_code_is_bad_options() {
        let table = table();
        assert!(matches!(table.resolve_pair("xx", "en"), Err(GlosaError::BadOptions(_))));
        assert!(matches!(table.resolve_pair("en", "xx"), Err(GlosaError::BadOptions(_))));
    }

    #[test]
    fn test_duplicate_codes_rejected() {
        let result = LocaleTable::new(vec![
            LocaleEntry::new("en", "english", "EN"),
            LocaleEntry::new("en", "english", "EN"),
        ]);
        assert!(matches!(result, Err(GlosaError::Config(_))));
    }

    #[test]
    fn test_context_selector() {
        let entry = LocaleEntry::new("es", "spanish", "ES");
        assert_eq!(entry.context_selector(), "[data-source-lang=\"ES\"]");
    }
}
