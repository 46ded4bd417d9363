//! Text analyzer — turns raw strings into a canonical token stream.
//!
//! Deliberately minimal: no stemming, no stopword removal, no Unicode word
//! segmentation. A token is a maximal run of letter/number code points,
//! lower-cased, kept only if it is at least two code points long. That's the
//! whole algorithm; it has no failure modes.

/// Analyze `text` into an ordered sequence of tokens, repetitions preserved.
///
/// Source order is preserved so term frequency can be computed downstream by
/// simply counting. Empty input yields an empty sequence.
pub fn analyze(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        if ch.is_alphabetic() || ch.is_numeric() {
            for lower in ch.to_lowercase() {
                current.push(lower);
            }
        } else if !current.is_empty() {
            push_token(&mut tokens, &mut current);
        }
    }
    if !current.is_empty() {
        push_token(&mut tokens, &mut current);
    }

    tokens
}

fn push_token(tokens: &mut Vec<String>, current: &mut String) {
    if current.chars().count() >= 2 {
        tokens.push(std::mem::take(current));
    } else {
        current.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(analyze("").is_empty());
    }

    #[test]
    fn lowercases_and_splits_on_non_alphanumeric() {
        let tokens = analyze("Go Programming Language!");
        assert_eq!(tokens, vec!["go", "programming", "language"]);
    }

    #[test]
    fn single_character_runs_are_dropped() {
        let tokens = analyze("a b c de foo bar");
        assert_eq!(tokens, vec!["de", "foo", "bar"]);
    }

    #[test]
    fn repetitions_are_preserved_in_source_order() {
        let tokens = analyze("go go go rust");
        assert_eq!(tokens, vec!["go", "go", "go", "rust"]);
    }

    #[test]
    fn digits_count_as_token_characters() {
        let tokens = analyze("rust2024 is great");
        assert_eq!(tokens, vec!["rust2024", "is", "great"]);
    }

    #[test]
    fn numbers_alone_still_form_tokens_when_long_enough() {
        // The analyzer has no notion of "word" vs "number" — only the
        // letter-or-number predicate.
        let tokens = analyze("42 is the answer");
        assert_eq!(tokens, vec!["42", "is", "the", "answer"]);
    }

    #[test]
    fn unicode_letters_are_tokenized_and_lowercased() {
        let tokens = analyze("CAFÉ Naïve");
        assert_eq!(tokens, vec!["café", "naïve"]);
    }

    #[test]
    fn punctuation_only_input_yields_no_tokens() {
        assert!(analyze("... --- !!! ???").is_empty());
    }

    #[test]
    fn whitespace_and_punctuation_both_separate_runs() {
        let tokens = analyze("hello,world;foo.bar");
        assert_eq!(tokens, vec!["hello", "world", "foo", "bar"]);
    }
}
