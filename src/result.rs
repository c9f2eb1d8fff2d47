//! Lookup data model and the assembler combining extractor output.

use indexmap::IndexMap;
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

const EXTRAS_PREFIX: &str = "extras-";
const EXAMPLES_KEY: &str = "examples";

/// Translations grouped by part-of-speech tag.
///
/// Tags keep first-seen order and translations keep document order. The empty
/// tag holds translations the page did not categorize.
pub type TranslationBlock = IndexMap<String, Vec<String>>;

/// Everything extracted for one language of a lookup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageSideResult {
    pub pos: TranslationBlock,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
}

impl LanguageSideResult {
    pub fn is_empty(&self) -> bool {
        self.pos.is_empty()
    }
}

/// A cleaned example sentence pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleSentence {
    pub from: String,
    pub to: String,
}

/// Inflected word forms found on the page, already attributed to a language
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordForms {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Result of a lookup, keyed by language code.
///
/// Serialized flat as
/// `{"extras-<from>", "extras-<to>", "<from>", "<to>", "examples"}`, which is
/// also the shape stored in cache documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupResult {
    pub extras: IndexMap<String, Option<String>>,
    pub sides: IndexMap<String, LanguageSideResult>,
    pub examples: Vec<ExampleSentence>,
}

impl LookupResult {
    /// Side keyed by `code`, if the result covers that language
    pub fn side(&self, code: &str) -> Option<&LanguageSideResult> {
        self.sides.get(code)
    }

    /// Word forms keyed by `code`
    pub fn extras_for(&self, code: &str) -> Option<&str> {
        self.extras.get(code).and_then(|e| e.as_deref())
    }

    /// A result is empty when no side produced any translation
    pub fn is_empty(&self) -> bool {
        self.sides.values().all(LanguageSideResult::is_empty)
    }

    pub fn translation_count(&self) -> usize {
        self.sides
            .values()
            .flat_map(|side| side.pos.values())
            .map(Vec::len)
            .sum()
    }
}

impl Serialize for LookupResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.extras.len() + self.sides.len() + 1;
        let mut map = serializer.serialize_map(Some(len))?;
        for (code, extras) in &self.extras {
            map.serialize_entry(&format!("{}{}", EXTRAS_PREFIX, code), extras)?;
        }
        for (code, side) in &self.sides {
            map.serialize_entry(code, side)?;
        }
        map.serialize_entry(EXAMPLES_KEY, &self.examples)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for LookupResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = IndexMap::<String, serde_json::Value>::deserialize(deserializer)?;
        let mut result = LookupResult::default();

        for (key, value) in fields {
            if key == EXAMPLES_KEY {
                result.examples = serde_json::from_value(value).map_err(de::Error::custom)?;
            } else if let Some(code) = key.strip_prefix(EXTRAS_PREFIX) {
                let extras = serde_json::from_value(value).map_err(de::Error::custom)?;
                result.extras.insert(code.to_string(), extras);
            } else {
                let side = serde_json::from_value(value).map_err(de::Error::custom)?;
                result.sides.insert(key, side);
            }
        }

        Ok(result)
    }
}

/// Extractor output for one lookup, before it is keyed by language code
#[derive(Debug, Clone, Default)]
pub struct ExtractedParts {
    /// Translations found in the `from` language's half of the page
    pub from_context: LanguageSideResult,
    /// Translations found in the `to` language's half of the page
    pub to_context: LanguageSideResult,
    pub forms: WordForms,
    pub examples: Vec<ExampleSentence>,
}

/// Key extractor output by the requested codes.
///
/// The page lists, inside one language's half, the translations *into* the
/// other language, so the `from` half is reported under `to` and vice versa.
pub fn assemble(from: &str, to: &str, parts: ExtractedParts) -> LookupResult {
    let mut extras = IndexMap::with_capacity(2);
    extras.insert(from.to_string(), parts.forms.from);
    extras.insert(to.to_string(), parts.forms.to);

    let mut sides = IndexMap::with_capacity(2);
    sides.insert(from.to_string(), parts.to_context);
    sides.insert(to.to_string(), parts.from_context);

    LookupResult {
        extras,
        sides,
        examples: parts.examples,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn side(tag: &str, words: &[&str]) -> LanguageSideResult {
        let mut pos = TranslationBlock::new();
        pos.insert(tag.to_string(), words.iter().map(|w| w.to_string()).collect());
        LanguageSideResult { pos, audio: None }
    }

    fn sample() -> LookupResult {
        assemble(
            "es",
            "en",
            ExtractedParts {
                from_context: side("noun", &["house", "home"]),
                to_context: side("", &["casa"]),
                forms: WordForms {
                    from: None,
                    to: Some("casas pl".to_string()),
                },
                examples: vec![ExampleSentence {
                    from: "Mi casa es grande.".to_string(),
                    to: "My house is big.".to_string(),
                }],
            },
        )
    }

    #[test]
    fn test_assemble_keys_by_request_direction() {
        let result = sample();
        assert_eq!(result.side("en").unwrap().pos["noun"], vec!["house", "home"]);
        assert_eq!(result.side("es").unwrap().pos[""], vec!["casa"]);
        assert_eq!(result.extras_for("en"), Some("casas pl"));
        assert_eq!(result.extras_for("es"), None);
        assert_eq!(result.translation_count(), 3);
    }

    #[test]
    fn test_flat_json_shape() {
        let value = serde_json::to_value(sample()).unwrap();
        let object = value.as_object().unwrap();

        assert!(object.contains_key("extras-es"));
        assert!(object["extras-es"].is_null());
        assert_eq!(object["extras-en"], "casas pl");
        assert_eq!(object["en"]["pos"]["noun"][1], "home");
        assert!(object["en"].get("audio").is_none());
        assert_eq!(object["examples"][0]["to"], "My house is big.");
    }

    #[test]
    fn test_json_roundtrip_is_deep_equal() {
        let result = sample();
        let text = serde_json::to_string(&result).unwrap();
        let parsed: LookupResult = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, result);
    }

    #[test]
    fn test_emptiness() {
        let empty = assemble("es", "en", ExtractedParts::default());
        assert!(empty.is_empty());
        assert!(!sample().is_empty());
    }
}
