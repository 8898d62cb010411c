use super::text::title_case;

const NAME_PATTERNS: [&str; 4] = ["my name is", "i am", "i'm", "call me"];

pub fn is_name_message(text: &str) -> bool {
    let lower = text.to_lowercase();
    NAME_PATTERNS.iter().any(|pattern| lower.contains(pattern))
}

/// Pulls the word after the first self-introduction phrase that is followed
/// by one. Patterns are tried in a fixed order, so "i am not sure" yields
/// `Some("Not")`.
pub fn extract_name(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    NAME_PATTERNS.iter().find_map(|pattern| {
        let (_, rest) = lower.split_once(pattern)?;
        rest.split_whitespace().next().map(title_case)
    })
}

#[cfg(test)]
mod tests {
    use super::{extract_name, is_name_message};

    #[test]
    fn detects_introductions() {
        assert!(is_name_message("Hi, my name is Ada"));
        assert!(is_name_message("I'm Grace"));
        assert!(is_name_message("please CALL ME ishmael"));
        assert!(!is_name_message("What is gravity?"));
    }

    #[test]
    fn extracts_and_capitalizes_the_following_token() {
        assert_eq!(extract_name("My name is ada lovelace"), Some("Ada".to_string()));
        assert_eq!(extract_name("call me ISHMAEL."), Some("Ishmael.".to_string()));
        assert_eq!(extract_name("i'm grace"), Some("Grace".to_string()));
    }

    #[test]
    fn pattern_without_following_token_yields_nothing() {
        assert_eq!(extract_name("what I am"), None);
        assert_eq!(extract_name("my name is   "), None);
        assert_eq!(extract_name("nothing to see"), None);
    }

    #[test]
    fn earlier_pattern_wins() {
        assert_eq!(extract_name("my name is bob and i am tired"), Some("Bob".to_string()));
        assert_eq!(extract_name("i am not sure"), Some("Not".to_string()));
    }

    #[test]
    fn falls_through_to_next_pattern_when_first_has_no_token() {
        assert_eq!(extract_name("call me maybe, i am"), Some("Maybe,".to_string()));
        assert_eq!(extract_name("i'm sam, my name is"), Some("Sam,".to_string()));
    }
}
