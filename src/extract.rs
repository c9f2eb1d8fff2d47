//! Extraction of translations, pronunciation, word forms and example
//! sentences from a dictionary result page.
//!
//! Every field is best-effort: structure missing from the page yields an
//! empty value for that field and never fails the whole extraction.

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::locale::LocaleEntry;
use crate::result::{ExampleSentence, ExtractedParts, LanguageSideResult, TranslationBlock, WordForms};

static TAG_TRANS: LazyLock<Selector> = LazyLock::new(|| selector(".tag_trans"));
static DICT_LINK: LazyLock<Selector> = LazyLock::new(|| selector(".dictLink"));
static TAG_TYPE: LazyLock<Selector> = LazyLock::new(|| selector(".tag_type"));
static AUDIO: LazyLock<Selector> = LazyLock::new(|| selector(".exact .lemma_desc .audio"));
static TAG_FORMS: LazyLock<Selector> = LazyLock::new(|| selector(".tag_forms"));
static EXAMPLE_ROW: LazyLock<Selector> = LazyLock::new(|| selector(".result_table tr"));
static SENTENCE_LEFT: LazyLock<Selector> = LazyLock::new(|| selector("td.sentence.left"));
static SENTENCE_RIGHT: LazyLock<Selector> = LazyLock::new(|| selector("td.sentence.right2"));

/// Classes of annotation elements mixed into example sentences
const REMOVABLE_CLASSES: [&str; 3] = ["source_url", "source_url_spacer", "behindLinkDiv"];

/// Marker the site uses for elided text inside example sentences
const ELISION_MARKER: &str = "[...]";

const CONTEXT_ATTRIBUTE: &str = "data-source-lang";

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

pub struct MarkupExtractor {
    audio_base_url: String,
}

impl MarkupExtractor {
    pub fn new(audio_base_url: &str) -> Self {
        Self {
            audio_base_url: audio_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Run every extraction over a raw page
    pub fn extract(
        &self,
        markup: &str,
        from: &LocaleEntry,
        to: &LocaleEntry,
        with_audio: bool,
    ) -> ExtractedParts {
        let document = Html::parse_document(markup);

        let audio = if with_audio { self.audio(&document) } else { None };

        let from_context = LanguageSideResult {
            pos: self.translations(&document, from),
            audio: audio.clone(),
        };
        let to_context = LanguageSideResult {
            pos: self.translations(&document, to),
            audio,
        };

        ExtractedParts {
            from_context,
            to_context,
            forms: self.word_forms(&document, from, to),
            examples: self.examples(&document),
        }
    }

    /// Exact-match translations inside one language's half of the page,
    /// grouped by part-of-speech label
    pub fn translations(&self, document: &Html, context: &LocaleEntry) -> TranslationBlock {
        let mut block = TranslationBlock::new();

        let css = format!("{} .exact .translation_desc", context.context_selector());
        let entries = match Selector::parse(&css) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Invalid context selector for '{}': {:?}", context.code, e);
                return block;
            }
        };

        for entry in document.select(&entries) {
            let Some(trans) = entry.select(&TAG_TRANS).next() else {
                debug!("Translation entry without .tag_trans in context {}", context.context);
                continue;
            };

            let translation = joined_text(trans.select(&DICT_LINK));
            if translation.is_empty() {
                continue;
            }
            let tag = joined_text(trans.select(&TAG_TYPE));

            block.entry(tag).or_default().push(translation);
        }

        debug!(
            "Extracted {} tag groups from context {}",
            block.len(),
            context.context
        );
        block
    }

    /// Playback URL of the first pronunciation control in the exact-match section
    pub fn audio(&self, document: &Html) -> Option<String> {
        let onclick = document
            .select(&AUDIO)
            .find_map(|control| control.value().attr("onclick"))?;

        let argument = parse_play_sound(onclick)?;
        Some(format!("{}/{}.mp3", self.audio_base_url, argument))
    }

    /// Inflection forms, attributed to a language.
    ///
    /// The page does not label forms, so the first one belongs to `to` and the
    /// second to `from`. When every forms element sits inside a language's half
    /// of the page that placement is used instead.
    pub fn word_forms(&self, document: &Html, from: &LocaleEntry, to: &LocaleEntry) -> WordForms {
        let found: Vec<(Option<String>, String)> = document
            .select(&TAG_FORMS)
            .map(|element| (enclosing_context(element), collapse_whitespace(&element.text().collect::<String>())))
            .filter(|(_, text)| !text.is_empty())
            .collect();

        if found.is_empty() {
            return WordForms::default();
        }

        let labeled = found.iter().all(|(context, _)| context.is_some());
        if labeled {
            // Forms inside the `from` half describe the word reported under `to`
            let mut forms = WordForms::default();
            for (context, text) in &found {
                let context = context.as_deref();
                if context == Some(from.context.as_str()) && forms.to.is_none() {
                    forms.to = Some(text.clone());
                } else if context == Some(to.context.as_str()) && forms.from.is_none() {
                    forms.from = Some(text.clone());
                }
            }
            if forms.from.is_some() || forms.to.is_some() {
                return forms;
            }
        }

        let mut positional = found.into_iter().map(|(_, text)| text);
        WordForms {
            to: positional.next(),
            from: positional.next(),
        }
    }

    /// Cleaned example sentence pairs from the examples table
    pub fn examples(&self, document: &Html) -> Vec<ExampleSentence> {
        let mut examples = Vec::new();

        for row in document.select(&EXAMPLE_ROW) {
            let (Some(left), Some(right)) = (
                row.select(&SENTENCE_LEFT).next(),
                row.select(&SENTENCE_RIGHT).next(),
            ) else {
                continue;
            };

            let from = clean_sentence(left);
            let to = clean_sentence(right);
            if from.is_empty() || to.is_empty() {
                debug!("Skipping example row with an empty side");
                continue;
            }

            examples.push(ExampleSentence { from, to });
        }

        examples
    }
}

/// Concatenated, trimmed text of all matched elements
fn joined_text<'a>(elements: impl Iterator<Item = ElementRef<'a>>) -> String {
    elements
        .flat_map(|element| element.text())
        .collect::<String>()
        .trim()
        .to_string()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `data-source-lang` of the closest ancestor carrying one
fn enclosing_context(element: ElementRef<'_>) -> Option<String> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find_map(|ancestor| ancestor.value().attr(CONTEXT_ATTRIBUTE))
        .map(str::to_string)
}

/// First argument of an `onclick="playSound(this,"EN/ab/abc-101","...");"` payload
fn parse_play_sound(onclick: &str) -> Option<String> {
    let payload = onclick
        .trim()
        .replacen("playSound(this,", "[", 1)
        .replacen(");", "]", 1);

    let arguments: Vec<serde_json::Value> = match serde_json::from_str(&payload) {
        Ok(arguments) => arguments,
        Err(e) => {
            debug!("Unparseable pronunciation payload {:?}: {}", onclick, e);
            return None;
        }
    };

    arguments
        .first()
        .and_then(|first| first.as_str())
        .filter(|first| !first.is_empty())
        .map(str::to_string)
}

/// Text of one example sentence cell with annotations removed
fn clean_sentence(cell: ElementRef<'_>) -> String {
    // Sentences are usually wrapped in a `.wrap` container inside the cell
    let container = cell
        .children()
        .filter_map(ElementRef::wrap)
        .find(|child| child.value().classes().any(|class| class == "wrap"))
        .unwrap_or(cell);

    let removable: Vec<String> = container
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| {
            child
                .value()
                .classes()
                .any(|class| REMOVABLE_CLASSES.contains(&class))
        })
        .map(|child| child.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect();

    let text: String = container.text().collect();
    clean_sentence_text(&text, &removable)
}

/// Line-based cleaning of sentence text.
///
/// Drops blank lines and lines equal to a removable text, strips removable
/// texts from the remaining lines, joins them with spaces and replaces the
/// elision marker with a space.
pub fn clean_sentence_text(text: &str, removable: &[String]) -> String {
    let lines: Vec<String> = text
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !removable.iter().any(|r| r.as_str() == *line))
        .map(|line| {
            removable
                .iter()
                .fold(line.to_string(), |acc, r| acc.replace(r.as_str(), ""))
        })
        .filter(|line| !line.trim().is_empty())
        .collect();

    let joined = lines.join(" ");
    let elided = joined.split(ELISION_MARKER).collect::<Vec<_>>().join(" ");
    collapse_whitespace(&elided)
}
