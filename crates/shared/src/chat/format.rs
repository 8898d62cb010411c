use rand::Rng;
use rand::seq::SliceRandom;

use super::resolvers::LookupResult;
use super::text::collapse_whitespace;

pub const SUGGESTED_TOPICS: [&str; 15] = [
    "Artificial Intelligence",
    "Machine Learning",
    "Quantum Computing",
    "Albert Einstein",
    "Leonardo da Vinci",
    "Marie Curie",
    "Solar System",
    "Black Holes",
    "Climate Change",
    "Ancient Egypt",
    "World War II",
    "Roman Empire",
    "Human Brain",
    "DNA",
    "Photosynthesis",
];

pub const SUGGESTION_COUNT: usize = 3;
pub const FALLBACK_TIP: &str = "💡 **Tip:** Be specific and check spelling!";

pub fn format_response(result: Option<&LookupResult>, query: &str) -> String {
    format_response_with_rng(result, query, &mut rand::thread_rng())
}

pub fn format_response_with_rng<R: Rng + ?Sized>(
    result: Option<&LookupResult>,
    query: &str,
    rng: &mut R,
) -> String {
    let Some(result) = result else {
        return fallback_response(query, rng);
    };

    let mut response = format!(
        "📚 **About {query}:**\n\n{}",
        collapse_whitespace(&result.answer)
    );

    match result.url.as_deref() {
        Some(url) if url.to_lowercase().contains("wikipedia") => {
            response.push_str(&format!(
                "\n\n🔗 **Source:** [Wikipedia - {}]({url})",
                result.source
            ));
        }
        Some(url) => {
            response.push_str(&format!("\n\n🔗 **Source:** [{}]({url})", result.source));
        }
        None => {
            response.push_str(&format!("\n\n🔗 *Information from {}*", result.source));
        }
    }

    response
}

fn fallback_response<R: Rng + ?Sized>(query: &str, rng: &mut R) -> String {
    let suggestions = SUGGESTED_TOPICS
        .choose_multiple(rng, SUGGESTION_COUNT)
        .map(|topic| format!("\n• {topic}"))
        .collect::<String>();

    format!(
        "I couldn't find information about '{query}'. Try these topics:{suggestions}\n\n{FALLBACK_TIP}"
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::{FALLBACK_TIP, SUGGESTED_TOPICS, format_response, format_response_with_rng};
    use crate::chat::resolvers::{LookupOrigin, LookupResult};

    fn result(url: Option<&str>) -> LookupResult {
        LookupResult {
            answer: "Gravity   is a\n fundamental interaction.".to_string(),
            source: "Gravity".to_string(),
            url: url.map(ToString::to_string),
            origin: LookupOrigin::KnowledgeBase,
        }
    }

    fn bullets(response: &str) -> Vec<&str> {
        response
            .lines()
            .filter_map(|line| line.strip_prefix("• "))
            .collect()
    }

    #[test]
    fn fallback_lists_three_distinct_known_topics() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let response = format_response_with_rng(None, "Qzxquery123", &mut rng);

            let topics = bullets(&response);
            assert_eq!(topics.len(), 3);
            assert_eq!(topics.iter().collect::<HashSet<_>>().len(), 3);
            assert!(topics.iter().all(|topic| SUGGESTED_TOPICS.contains(topic)));
            assert!(response.starts_with(
                "I couldn't find information about 'Qzxquery123'. Try these topics:\n• "
            ));
            assert!(response.ends_with(FALLBACK_TIP));
        }
    }

    #[test]
    fn wikipedia_urls_get_labeled_link() {
        let response = format_response(
            Some(&result(Some("https://en.wikipedia.org/wiki/Gravity"))),
            "Gravity",
        );

        assert_eq!(
            response,
            "📚 **About Gravity:**\n\nGravity is a fundamental interaction.\n\n🔗 **Source:** [Wikipedia - Gravity](https://en.wikipedia.org/wiki/Gravity)"
        );
    }

    #[test]
    fn other_urls_get_plain_link() {
        let response = format_response(Some(&result(Some("https://physics.example/g"))), "Gravity");

        assert!(response.ends_with("🔗 **Source:** [Gravity](https://physics.example/g)"));
    }

    #[test]
    fn missing_url_falls_back_to_source_note() {
        let response = format_response(Some(&result(None)), "Gravity");

        assert!(response.contains("**About Gravity:**"));
        assert!(response.ends_with("🔗 *Information from Gravity*"));
    }
}
