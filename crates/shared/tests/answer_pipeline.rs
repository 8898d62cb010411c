use std::sync::Arc;

use shared::chat::{
    AnswerResolver, CONVERSATION_HISTORY_LIMIT, ConversationRouter, ConversationState,
    FALLBACK_TIP, GREETING_REPLIES, RelevanceConfig, SHORT_INPUT_REPLY, SUGGESTED_TOPICS,
    UNCLEAR_QUERY_REPLY,
};
use shared::lookup::{PageSummary, StubLookupClient};

const EINSTEIN_PAGE: &str = "<html><body>\n<nav>Einstein Einstein Einstein menu</nav>\n<p>Albert Einstein was a theoretical physicist who developed the theory of relativity.</p>\n<p>Einstein received the Nobel Prize in Physics in 1921 for the photoelectric effect.</p>\n<p>The rest of this page talks about unrelated subjects so that it is long enough to be read.</p>\n</body></html>";

fn router_with(client: StubLookupClient) -> (ConversationRouter, Arc<StubLookupClient>) {
    let client = Arc::new(client);
    let answers = AnswerResolver::new(client.clone(), RelevanceConfig::default());
    (ConversationRouter::new(answers), client)
}

fn gravity_client() -> StubLookupClient {
    StubLookupClient::new().with_summary(
        "Gravity",
        PageSummary::new(
            "Gravity",
            "Gravity is a fundamental interaction which causes mutual attraction between all things that have mass.",
        )
        .with_page_url("https://en.wikipedia.org/wiki/Gravity"),
    )
}

#[tokio::test]
async fn question_is_answered_from_the_knowledge_base() {
    let (router, client) = router_with(gravity_client());
    let mut state = ConversationState::default();

    let response = router.process_message(&mut state, "What is gravity?").await;

    assert_eq!(
        response,
        "📚 **About Gravity:**\n\nGravity is a fundamental interaction which causes mutual attraction between all things that have mass.\n\n🔗 **Source:** [Wikipedia - Gravity](https://en.wikipedia.org/wiki/Gravity)"
    );
    assert_eq!(client.calls(), vec!["summary:Gravity".to_string()]);
    assert_eq!(state.history().len(), 1);
    assert_eq!(
        state.history().back().map(|turn| turn.user_text.as_str()),
        Some("What is gravity?")
    );
}

#[tokio::test]
async fn misspelled_title_recovers_through_title_search() {
    let client = StubLookupClient::new()
        .with_title_search("Albert Einstien", &["Albert Einstein", "Einstein family"])
        .with_summary(
            "Albert Einstein",
            PageSummary::new(
                "Albert Einstein",
                "Albert Einstein was a German-born theoretical physicist.",
            ),
        );
    let (router, client) = router_with(client);
    let mut state = ConversationState::default();

    let response = router
        .process_message(&mut state, "Who is Albert Einstien?")
        .await;

    assert!(response.starts_with("📚 **About Albert Einstien:**\n\nAlbert Einstein was"));
    assert!(response.ends_with("🔗 *Information from Albert Einstein*"));
    assert_eq!(
        client.calls(),
        vec![
            "summary:Albert_Einstien".to_string(),
            "titles:Albert Einstien".to_string(),
            "summary:Albert_Einstein".to_string(),
        ]
    );
}

#[tokio::test]
async fn knowledge_base_miss_falls_through_to_web_search() {
    let client = StubLookupClient::new()
        .with_web_results("Einstein", &["https://bio.example/einstein"])
        .with_page("https://bio.example/einstein", EINSTEIN_PAGE);
    let (router, _client) = router_with(client);
    let mut state = ConversationState::default();

    let response = router
        .process_message(&mut state, "Tell me about Einstein")
        .await;

    assert!(response.starts_with("📚 **About Einstein:**\n\nAlbert Einstein was a theoretical physicist"));
    assert!(response.contains("Nobel Prize"));
    assert!(response.ends_with("🔗 *Information from https://bio.example/einstein*"));
}

#[tokio::test]
async fn unknown_topic_gets_suggestions() {
    let (router, _client) = router_with(StubLookupClient::new());
    let mut state = ConversationState::default();

    let response = router
        .process_message(&mut state, "Qzxquery123 blorf snark")
        .await;

    assert!(response.starts_with(
        "I couldn't find information about 'Qzxquery123 Blorf Snark'. Try these topics:"
    ));
    let suggestions = response
        .lines()
        .filter_map(|line| line.strip_prefix("• "))
        .collect::<Vec<_>>();
    assert_eq!(suggestions.len(), 3);
    assert!(suggestions.iter().all(|topic| SUGGESTED_TOPICS.contains(topic)));
    assert!(response.ends_with(FALLBACK_TIP));
    assert_eq!(state.history().len(), 1);
}

#[tokio::test]
async fn canned_replies_skip_lookups_and_history() {
    let (router, client) = router_with(gravity_client());
    let mut state = ConversationState::default();

    let greeting = router.process_message(&mut state, "hi").await;
    let mixed = router.process_message(&mut state, "hello, bye").await;
    let farewell = router.process_message(&mut state, "Goodbye for now").await;

    assert!(GREETING_REPLIES.contains(&greeting.as_str()));
    assert!(GREETING_REPLIES.contains(&mixed.as_str()));
    assert_eq!(farewell, "Goodbye! 👋");
    assert!(client.calls().is_empty());
    assert!(state.history().is_empty());
}

#[tokio::test]
async fn embedded_keywords_do_not_trigger_canned_replies() {
    let client = StubLookupClient::new().with_summary(
        "Machine Learning",
        PageSummary::new("Machine learning", "Machine learning is a field of study."),
    );
    let (router, _client) = router_with(client);
    let mut state = ConversationState::default();

    let response = router
        .process_message(&mut state, "What is machine learning?")
        .await;

    assert!(response.starts_with("📚 **About Machine Learning:**"));
}

#[tokio::test]
async fn short_and_unclear_inputs_are_rejected_without_lookups() {
    let (router, client) = router_with(gravity_client());
    let mut state = ConversationState::default();

    assert_eq!(
        router.process_message(&mut state, "gravity please").await,
        SHORT_INPUT_REPLY
    );
    assert_eq!(
        router.process_message(&mut state, "what is ???").await,
        UNCLEAR_QUERY_REPLY
    );
    assert!(client.calls().is_empty());
    assert!(state.history().is_empty());
}

#[tokio::test]
async fn history_is_bounded_across_many_questions() {
    let (router, _client) = router_with(gravity_client());
    let mut state = ConversationState::default();

    for _ in 0..(CONVERSATION_HISTORY_LIMIT + 5) {
        router.process_message(&mut state, "What is gravity?").await;
    }

    assert_eq!(state.history().len(), CONVERSATION_HISTORY_LIMIT);
}

#[tokio::test]
async fn sessions_do_not_share_history() {
    let (router, _client) = router_with(gravity_client());
    let mut first = ConversationState::default();
    let second = ConversationState::default();

    router.process_message(&mut first, "What is gravity?").await;

    assert_eq!(first.history().len(), 1);
    assert!(second.history().is_empty());
}
