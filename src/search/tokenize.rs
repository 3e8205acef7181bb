use std::collections::HashSet;

/// Maximum number of query terms kept after filtering.
pub const MAX_QUERY_TERMS: usize = 24;

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "from", "how", "i", "if", "in",
    "into", "is", "it", "of", "on", "or", "s", "that", "the", "their", "this", "to", "what",
    "when", "where", "which", "who", "why", "with", "you", "your", "does",
];

fn is_term_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '_' | '.' | '/' | '-')
}

/// Lower-case `text` and collapse every run of characters outside
/// `[a-z0-9_./-]` into a single space, with no leading or trailing space.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        if is_term_char(c) {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            pending_space = true;
        }
    }

    out
}

/// Split a question into distinct search terms, in first-seen order.
///
/// Terms shorter than two characters and stopwords are dropped; at most
/// [`MAX_QUERY_TERMS`] are kept.
pub fn tokenize(query: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    normalize(query)
        .split(' ')
        .filter(|w| w.chars().count() >= 2 && !STOPWORDS.contains(w))
        .filter(|w| seen.insert(w.to_string()))
        .take(MAX_QUERY_TERMS)
        .map(str::to_string)
        .collect()
}

/// A question prepared for scoring.
#[derive(Debug, Clone)]
pub struct QueryTerms {
    /// The whole question, normalized.
    pub normalized: String,
    pub terms: Vec<String>,
}

impl QueryTerms {
    pub fn parse(question: &str) -> Self {
        Self {
            normalized: normalize(question),
            terms: tokenize(question),
        }
    }
}
