use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Node};

use super::text::truncate_with_ellipsis;

const NON_CONTENT_ELEMENTS: [&str; 5] = ["script", "style", "nav", "footer", "aside"];

static SENTENCE_BREAK: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"[.!?]\s+").ok());

/// Thresholds for picking an answer out of a scraped page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelevanceConfig {
    /// Most sentences kept from one page.
    pub max_sentences: usize,
    /// Sentences of at most this many characters are ignored.
    pub short_sentence_chars: usize,
    pub max_answer_chars: usize,
    /// Pages whose visible text is not longer than this are skipped.
    pub min_page_chars: usize,
    pub search_result_count: usize,
    pub max_pages: usize,
}

impl Default for RelevanceConfig {
    fn default() -> Self {
        Self {
            max_sentences: 4,
            short_sentence_chars: 20,
            max_answer_chars: 800,
            min_page_chars: 200,
            search_result_count: 3,
            max_pages: 2,
        }
    }
}

/// Visible text of an HTML page with non-content elements removed and
/// whitespace normalized to single spaces.
pub fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut raw = String::new();
    collect_text(document.root_element(), &mut raw);

    raw.lines()
        .map(str::trim)
        .flat_map(|line| line.split("  "))
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    if NON_CONTENT_ELEMENTS.contains(&element.value().name()) {
        return;
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, out);
                }
            }
            _ => {}
        }
    }
}

pub fn split_sentences(text: &str) -> Vec<&str> {
    let Some(sentence_break) = SENTENCE_BREAK.as_ref() else {
        return vec![text];
    };

    let mut sentences = Vec::new();
    let mut start = 0;
    for found in sentence_break.find_iter(text) {
        // The terminator is a single ASCII byte and stays with its sentence.
        sentences.push(&text[start..found.start() + 1]);
        start = found.end();
    }
    sentences.push(&text[start..]);
    sentences
}

/// Joins the first sentences of `text` that mention any word of `query`,
/// or `None` when no sentence qualifies.
pub fn relevant_excerpt(text: &str, query: &str, config: &RelevanceConfig) -> Option<String> {
    let query_words = query
        .to_lowercase()
        .split_whitespace()
        .map(ToString::to_string)
        .collect::<Vec<_>>();

    let mut relevant = Vec::new();
    for sentence in split_sentences(text) {
        let lower = sentence.to_lowercase();
        if query_words.iter().any(|word| lower.contains(word.as_str()))
            && sentence.chars().count() > config.short_sentence_chars
        {
            relevant.push(sentence);
        }
        if relevant.len() >= config.max_sentences {
            break;
        }
    }

    if relevant.is_empty() {
        return None;
    }

    Some(truncate_with_ellipsis(
        &relevant.join(" "),
        config.max_answer_chars,
    ))
}
