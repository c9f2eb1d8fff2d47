//! Interactive prompt around the lookup gateway.

use console::style;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::debug;

use crate::error::Result;
use crate::locale::LocaleTable;
use crate::lookup::{Dictionary, LookupOptions};
use crate::render::{render_origin, render_result};

const PROMPT: &str = "translate := ";
const CHANGE_LANGUAGES: &str = "lang";
const KEEP_CURRENT: &str = "q";

/// What the user answered when asked for a new language
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageChoice {
    Keep,
    Change(String),
    Unknown(String),
}

pub fn parse_language_choice(input: &str, locales: &LocaleTable) -> LanguageChoice {
    let input = input.trim();
    if input == KEEP_CURRENT {
        LanguageChoice::Keep
    } else if locales.contains(input) {
        LanguageChoice::Change(input.to_string())
    } else {
        LanguageChoice::Unknown(input.to_string())
    }
}

pub struct Repl<'a> {
    dictionary: &'a Dictionary,
    options: LookupOptions,
    lines: Lines<BufReader<Stdin>>,
}

impl<'a> Repl<'a> {
    pub fn new(dictionary: &'a Dictionary, options: LookupOptions) -> Self {
        Self {
            dictionary,
            options,
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        loop {
            let Some(input) = self.prompt(&style(PROMPT).magenta().bold().to_string()).await? else {
                break;
            };
            let input = input.trim().to_string();

            match input.as_str() {
                "exit" | "quit" => break,
                "" => continue,
                CHANGE_LANGUAGES => {
                    let message = self.change_languages().await?;
                    println!("{}", message);
                }
                word => self.translate(word).await,
            }
        }
        Ok(())
    }

    async fn translate(&self, word: &str) {
        match self.dictionary.lookup(word, &self.options).await {
            Ok(outcome) => {
                println!("{}", render_origin(&outcome));
                if let Some(e) = &outcome.persist_error {
                    println!("{}", style(format!("Not cached: {}", e)).yellow());
                }
                println!("{}", render_result(&outcome.result, &self.options));
            }
            Err(e) => println!("{}", style(e).red().bold()),
        }
    }

    /// Ask for a new language pair; keeping the current source cancels
    async fn change_languages(&mut self) -> Result<String> {
        let previous_from = self.options.from.clone();
        let Some(from) = self.ask_language("from", &previous_from).await? else {
            return Ok(style("Cancelled").red().bold().to_string());
        };
        if from == previous_from {
            return Ok(style("Cancelled").red().bold().to_string());
        }

        let previous_to = self.options.to.clone();
        let to = self.ask_language("to", &previous_to).await?.unwrap_or(previous_to);

        self.options.from = from;
        self.options.to = to;
        debug!("Language pair changed to {} -> {}", self.options.from, self.options.to);

        Ok(format!(
            "{}, new values: {} -> {}",
            style("Done").green().bold(),
            self.options.from,
            self.options.to
        ))
    }

    /// Keeps asking until a known code or `q` is given. `None` on end of input.
    async fn ask_language(&mut self, label: &str, current: &str) -> Result<Option<String>> {
        loop {
            let Some(input) = self.prompt(&format!("Change {}\n[{}] -> ", label, current)).await? else {
                return Ok(None);
            };

            match parse_language_choice(&input, self.dictionary.locales()) {
                LanguageChoice::Keep => return Ok(Some(current.to_string())),
                LanguageChoice::Change(code) => return Ok(Some(code)),
                LanguageChoice::Unknown(code) => {
                    println!("{}", style(format!("Language '{}' not found.", code)).red().bold());
                    let available: Vec<&str> = self.dictionary.locales().codes().collect();
                    println!("Available languages: {}", available.join(","));
                }
            }
        }
    }

    async fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        print!("{}", text);
        std::io::stdout().flush()?;
        Ok(self.lines.next_line().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::LocaleEntry;

    #[test]
    fn test_parse_language_choice() {
        let locales = LocaleTable::new(vec![
            LocaleEntry::new("en", "english", "EN"),
            LocaleEntry::new("de", "german", "DE"),
        ])
        .unwrap();

        assert_eq!(parse_language_choice("q", &locales), LanguageChoice::Keep);
        assert_eq!(parse_language_choice(" de ", &locales), LanguageChoice::Change("de".to_string()));
        assert_eq!(parse_language_choice("xx", &locales), LanguageChoice::Unknown("xx".to_string()));
    }

    #[test]
    fn test_blank_language_answer_is_unknown() {
        let locales = LocaleTable::new(vec![LocaleEntry::new("en", "english", "EN")]).unwrap();

        assert_eq!(parse_language_choice("", &locales), LanguageChoice::Unknown(String::new()));
        assert_eq!(parse_language_choice("  ", &locales), LanguageChoice::Unknown(String::new()));
    }
}
