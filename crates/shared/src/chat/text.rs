/// Upper-cases every letter that does not follow another letter and
/// lower-cases the rest, so `"the roman EMPIRE"` becomes `"The Roman Empire"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_is_letter = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if previous_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(ch);
            previous_is_letter = false;
        }
    }
    out
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cuts `text` to `max_chars` characters and marks the cut with `...`.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let mut truncated = text.chars().take(max_chars).collect::<String>();
    truncated.push_str("...");
    truncated
}

#[cfg(test)]
mod tests {
    use super::{collapse_whitespace, title_case, truncate_with_ellipsis};

    #[test]
    fn title_case_follows_letter_boundaries() {
        assert_eq!(title_case("artificial intelligence"), "Artificial Intelligence");
        assert_eq!(title_case("WORLD war ii"), "World War Ii");
        assert_eq!(title_case("3d printing"), "3D Printing");
        assert_eq!(title_case("o'neil"), "O'Neil");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn collapse_whitespace_joins_runs() {
        assert_eq!(collapse_whitespace("  a\n\n b\t c  "), "a b c");
    }

    #[test]
    fn truncate_counts_characters_not_bytes() {
        assert_eq!(truncate_with_ellipsis("héllo", 5), "héllo");
        assert_eq!(truncate_with_ellipsis("héllo wörld", 5), "héllo...");
    }
}
