//! Query and description tokenizing

/// Function words and task-framing verbs that carry no search signal
pub const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "of", "to", "in", "on", "at", "for", "with", "by",
    "from", "as", "is", "are", "was", "were", "be", "been", "it", "its", "this", "that", "these",
    "those", "i", "me", "my", "we", "our", "you", "your", "please", "can", "could", "would",
    "should", "will", "some", "any", "into", "using", "use", "want", "need", "which", "what",
    "how", "generate", "create", "make", "show", "draw", "display", "code", "program",
];

/// Lower-case, split on whitespace and strip edge punctuation
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Lower-case and collapse runs of whitespace
pub fn normalize(text: &str) -> String {
    text.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(&token)
}

/// Terms to search for, with stop words and one-letter tokens removed
///
/// When filtering leaves nothing, the unfiltered query is searched instead,
/// so a non-empty query never turns into an empty search.
pub fn search_terms(query: &str) -> Vec<String> {
    let tokens = tokenize(query);

    let mut terms: Vec<String> = Vec::new();
    for token in &tokens {
        if token.chars().count() > 1 && !is_stop_word(token) && !terms.contains(token) {
            terms.push(token.clone());
        }
    }

    if !terms.is_empty() {
        return terms;
    }

    if tokens.is_empty() {
        query.to_lowercase().split_whitespace().map(str::to_string).collect()
    } else {
        tokens
    }
}

/// Levenshtein distance between `a` and `b` is at most one
pub fn within_one_edit(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (shorter, longer) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };

    match longer.len() - shorter.len() {
        0 => shorter.iter().zip(longer.iter()).filter(|(x, y)| x != y).count() <= 1,
        1 => {
            // First mismatch marks the inserted char; the tails must then agree
            let split = shorter
                .iter()
                .zip(longer.iter())
                .position(|(x, y)| x != y)
                .unwrap_or(shorter.len());
            shorter[split..] == longer[split + 1..]
        }
        _ => false,
    }
}
