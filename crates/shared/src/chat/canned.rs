use chrono::{DateTime, Local};
use rand::RngCore;
use rand::seq::SliceRandom;

pub const GREETING_REPLIES: [&str; 3] = [
    "Hello! 👋 Ask me anything!",
    "Hi there! 😊 What would you like to know?",
    "Hey! Ready to help!",
];
pub const FAREWELL_REPLY: &str = "Goodbye! 👋";
pub const GRATITUDE_REPLY: &str = "You're welcome! 😊";
pub const IDENTITY_REPLY: &str = "I'm SmartChatBot! 🤖";
pub const HELP_REPLY: &str =
    "Ask me questions like: 'What is AI?', 'Who was Einstein?', 'Explain quantum physics'";
pub const FACT_REPLIES: [&str; 4] = [
    "🧠 Your brain generates enough electricity to power a small light bulb!",
    "🌌 There are more stars than grains of sand on Earth!",
    "🐜 Ants never sleep!",
    "💧 71% of Earth is water, but only 2.5% is freshwater!",
];
pub const JOKE_REPLIES: [&str; 2] = [
    "😂 Why don't scientists trust atoms? Because they make up everything!",
    "🐻 What do you call a bear with no teeth? A gummy bear!",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CannedTopic {
    Greeting,
    Farewell,
    Gratitude,
    Identity,
    Time,
    Date,
    Help,
    Fact,
    Joke,
}

struct CannedRule {
    topic: CannedTopic,
    matches: fn(&Utterance) -> bool,
    respond: fn(&mut dyn RngCore, DateTime<Local>) -> String,
}

// Evaluated top to bottom; the first matching rule answers.
static CANNED_RULES: [CannedRule; 9] = [
    CannedRule {
        topic: CannedTopic::Greeting,
        matches: |utterance| {
            utterance.has_any_keyword(&["hello", "hey"]) || utterance.has_any_word(&["hi"])
        },
        respond: |rng, _| pick(&GREETING_REPLIES, rng),
    },
    CannedRule {
        topic: CannedTopic::Farewell,
        matches: |utterance| utterance.has_any_keyword(&["bye", "goodbye"]),
        respond: |_, _| FAREWELL_REPLY.to_string(),
    },
    CannedRule {
        topic: CannedTopic::Gratitude,
        matches: |utterance| utterance.has_word_starting_with("thank"),
        respond: |_, _| GRATITUDE_REPLY.to_string(),
    },
    CannedRule {
        topic: CannedTopic::Identity,
        matches: |utterance| {
            utterance.contains_phrase("your name") || utterance.contains_phrase("who are you")
        },
        respond: |_, _| IDENTITY_REPLY.to_string(),
    },
    CannedRule {
        topic: CannedTopic::Time,
        matches: |utterance| utterance.has_any_keyword(&["time"]),
        respond: |_, now| time_reply(now),
    },
    CannedRule {
        topic: CannedTopic::Date,
        matches: |utterance| utterance.has_any_keyword(&["date"]),
        respond: |_, now| date_reply(now),
    },
    CannedRule {
        topic: CannedTopic::Help,
        matches: |utterance| utterance.has_any_keyword(&["help"]),
        respond: |_, _| HELP_REPLY.to_string(),
    },
    CannedRule {
        topic: CannedTopic::Fact,
        matches: |utterance| utterance.has_any_keyword(&["fact"]),
        respond: |rng, _| pick(&FACT_REPLIES, rng),
    },
    CannedRule {
        topic: CannedTopic::Joke,
        matches: |utterance| utterance.has_any_keyword(&["joke"]),
        respond: |rng, _| pick(&JOKE_REPLIES, rng),
    },
];

struct Utterance {
    lower: String,
    words: Vec<String>,
}

impl Utterance {
    fn new(input: &str) -> Self {
        let lower = input.to_lowercase();
        let words = lower
            .split(|ch: char| !ch.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .map(ToString::to_string)
            .collect();
        Self { lower, words }
    }

    fn has_any_word(&self, keywords: &[&str]) -> bool {
        self.words
            .iter()
            .any(|word| keywords.contains(&word.as_str()))
    }

    /// Whole-word match that also accepts the keyword with a trailing `s`.
    fn has_any_keyword(&self, keywords: &[&str]) -> bool {
        self.words.iter().any(|word| {
            let singular = word.strip_suffix('s').unwrap_or(word.as_str());
            keywords.contains(&word.as_str()) || keywords.contains(&singular)
        })
    }

    fn has_word_starting_with(&self, prefix: &str) -> bool {
        self.words.iter().any(|word| word.starts_with(prefix))
    }

    fn contains_phrase(&self, phrase: &str) -> bool {
        self.lower.contains(phrase)
    }
}

pub fn matched_topic(input: &str) -> Option<CannedTopic> {
    let utterance = Utterance::new(input);
    CANNED_RULES
        .iter()
        .find(|rule| (rule.matches)(&utterance))
        .map(|rule| rule.topic)
}

/// Reply for the first canned topic the input mentions, if any.
pub fn canned_reply(input: &str, now: DateTime<Local>, rng: &mut dyn RngCore) -> Option<String> {
    let utterance = Utterance::new(input);
    CANNED_RULES
        .iter()
        .find(|rule| (rule.matches)(&utterance))
        .map(|rule| (rule.respond)(rng, now))
}

pub fn time_reply(now: DateTime<Local>) -> String {
    format!("⏰ {}", now.format("%I:%M %p"))
}

pub fn date_reply(now: DateTime<Local>) -> String {
    format!("📅 {}", now.format("%A, %B %d, %Y"))
}

fn pick(replies: &[&str], rng: &mut dyn RngCore) -> String {
    replies.choose(rng).copied().unwrap_or_default().to_string()
}
