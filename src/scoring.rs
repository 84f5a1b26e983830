//! Similarity scoring between candidate text and the searched fragment.

use std::collections::HashMap;

/// Score for an exact (case-insensitive) match.
pub const EXACT_MATCH: f64 = 1.0;

/// Score when one string contains the other.
pub const CONTAINS_MATCH: f64 = 0.8;

/// Discount applied to snippet scores; title matches are the stronger signal.
pub const SNIPPET_DISCOUNT: f64 = 0.8;

/// Tokens this short or shorter are ignored during overlap counting.
const MIN_TOKEN_LEN: usize = 3;

/// Scores how well `text` matches `fragment`, in `[0, 1]`.
///
/// Case-insensitive and whitespace-trimmed. Exact match scores 1.0, a
/// substring match 0.8, otherwise the share of shared tokens longer than
/// three characters relative to the longer token list. A repeated token
/// only matches as many times as it occurs on both sides.
pub fn similarity(text: &str, fragment: &str) -> f64 {
    let s1 = text.trim().to_lowercase();
    let s2 = fragment.trim().to_lowercase();

    if s1.is_empty() || s2.is_empty() {
        return 0.0;
    }
    if s1 == s2 {
        return EXACT_MATCH;
    }
    if s1.contains(&s2) || s2.contains(&s1) {
        return CONTAINS_MATCH;
    }

    let words1: Vec<&str> = s1.split_whitespace().collect();
    let words2: Vec<&str> = s2.split_whitespace().collect();
    if words1.is_empty() || words2.is_empty() {
        return 0.0;
    }

    // Each long token of `fragment` can be matched once.
    let mut available: HashMap<&str, usize> = HashMap::new();
    for word in words2.iter().filter(|w| is_long(w)) {
        *available.entry(*word).or_default() += 1;
    }
    let mut matches = 0usize;
    for word in words1.iter().filter(|w| is_long(w)) {
        if let Some(count) = available.get_mut(word).filter(|c| **c > 0) {
            *count -= 1;
            matches += 1;
        }
    }

    matches as f64 / words1.len().max(words2.len()) as f64
}

fn is_long(word: &str) -> bool {
    word.chars().count() > MIN_TOKEN_LEN
}

/// Final score of a candidate: the best of its title score and its
/// discounted snippet score.
pub fn candidate_score(title: &str, snippet: Option<&str>, fragment: &str) -> f64 {
    let title_score = similarity(title, fragment);
    let snippet_score = snippet
        .map(|s| similarity(s, fragment) * SNIPPET_DISCOUNT)
        .unwrap_or(0.0);
    title_score.max(snippet_score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert_eq!(similarity("hello world", "hello world"), 1.0);
        assert_eq!(similarity("Hello World", "hello world"), 1.0);
        assert_eq!(similarity("  hello world ", "hello world"), 1.0);
    }

    #[test]
    fn test_reflexive() {
        for s in ["a", "rust", "the quick brown fox", "ÜNICODE Text"] {
            assert_eq!(similarity(s, s), 1.0);
        }
    }

    #[test]
    fn test_substring_match() {
        assert_eq!(similarity("hello world and more", "hello world"), 0.8);
        assert_eq!(similarity("world", "Hello World"), 0.8);
    }

    #[test]
    fn test_empty_scores_zero() {
        assert_eq!(similarity("", "anything"), 0.0);
        assert_eq!(similarity("anything", ""), 0.0);
        assert_eq!(similarity("", ""), 0.0);
        assert_eq!(similarity("   ", "anything"), 0.0);
    }

    #[test]
    fn test_token_overlap() {
        // "rust" and "guide" shared; max(3, 4) tokens
        let score = similarity("rust beginner guide", "complete rust guide online");
        assert!((score - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_short_tokens_ignored() {
        // only "the" and "and" overlap, both too short
        assert_eq!(similarity("the cat and dog", "the bird and fish"), 0.0);
    }

    #[test]
    fn test_unrelated_scores_zero() {
        assert_eq!(similarity("unrelated page", "hello world"), 0.0);
    }

    #[test]
    fn test_symmetric() {
        let pairs = [
            ("rust beginner guide", "complete rust guide online"),
            ("hello world", "hello"),
            ("alpha beta gamma", "gamma delta"),
            ("", "x"),
            ("same same same", "same"),
        ];
        for (a, b) in pairs {
            assert_eq!(similarity(a, b), similarity(b, a), "{a:?} vs {b:?}");
        }
    }

    #[test]
    fn test_repeated_tokens_stay_in_range() {
        // "hello" twice on each side, "there" vs "world" differ
        let score = similarity("hello hello there", "hello hello world");
        assert!((score - 2.0 / 3.0).abs() < f64::EPSILON);

        let score = similarity("words words words", "words other");
        assert!((score - 1.0 / 3.0).abs() < f64::EPSILON);

        for (a, b) in [
            ("data data data data", "data data data science"),
            ("rust rust rust", "rust rust cargo"),
        ] {
            let score = similarity(a, b);
            assert!((0.0..=1.0).contains(&score), "{a:?} vs {b:?} = {score}");
        }
    }

    #[test]
    fn test_candidate_score_prefers_title() {
        let score = candidate_score("hello world", Some("unrelated"), "hello world");
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_candidate_score_discounts_snippet() {
        let score = candidate_score("unrelated page", Some("hello world"), "hello world");
        assert!((score - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn test_candidate_score_without_snippet() {
        assert_eq!(candidate_score("unrelated page", None, "hello world"), 0.0);
    }
}
