use console::{style, Attribute};

use crate::lookup::{LookupOutcome, LookupOptions};
use crate::result::{LanguageSideResult, LookupResult};

/// Label shown for translations the page did not categorize
const UNCATEGORIZED_LABEL: &str = "dict";

/// Text rendering of a lookup result in the request's direction
pub fn render_result(result: &LookupResult, options: &LookupOptions) -> String {
    let mut out = String::new();

    for code in [&options.from, &options.to] {
        out.push_str(&render_title(code, result.extras_for(code)));
        out.push('\n');
        if let Some(side) = result.side(code) {
            out.push_str(&render_side(side));
        }
        out.push('\n');
    }

    if !result.examples.is_empty() {
        out.push_str(&format!("{}\n", style("examples").attr(Attribute::Underlined)));
        for example in &result.examples {
            out.push_str(&format!(" {} {}\n", style("<").magenta(), example.from));
            out.push_str(&format!(" {} {}\n", style(">").green(), example.to));
        }
    }

    out
}

fn render_title(code: &str, extras: Option<&str>) -> String {
    match extras {
        Some(extras) => format!(
            "{}  {}",
            style(code).attr(Attribute::Underlined),
            style(extras).white().bold()
        ),
        None => format!("{}", style(code).attr(Attribute::Underlined)),
    }
}

fn render_side(side: &LanguageSideResult) -> String {
    let mut out = String::new();
    for (tag, translations) in &side.pos {
        let label = if tag.is_empty() { UNCATEGORIZED_LABEL } else { tag.as_str() };
        out.push_str(&format!(
            " > {}: {}\n",
            style(label).blue().bold(),
            translations.join(", ")
        ));
    }
    if let Some(audio) = &side.audio {
        out.push_str(&format!(" {} {}\n", style("audio:").dim(), audio));
    }
    out
}

/// Provenance note printed after the prompt line
pub fn render_origin(outcome: &LookupOutcome) -> String {
    format!("{}", style(format!("(from {})", outcome.origin.label())).white())
}
