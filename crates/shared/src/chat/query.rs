use std::sync::LazyLock;

use regex::Regex;

use super::text::title_case;

static QUESTION_TEMPLATES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"what is (.*)",
        r"who is (.*)",
        r"tell me about (.*)",
        r"explain (.*)",
        r"what are (.*)",
        r"how does (.*)",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

static LEADING_FILLER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(the|a|an|about)\s+").ok());

/// Turns a user utterance into a knowledge-base search query.
pub fn extract_query(text: &str) -> String {
    let normalized = text.to_lowercase().trim().replace('?', "");

    for template in QUESTION_TEMPLATES.iter() {
        let Some(subject) = template
            .captures(&normalized)
            .and_then(|captures| captures.get(1))
        else {
            continue;
        };

        let subject = subject.as_str().trim();
        let subject = match LEADING_FILLER.as_ref() {
            Some(filler) => filler.replace(subject, ""),
            None => subject.into(),
        };
        return title_case(&subject);
    }

    title_case(&normalized)
}
