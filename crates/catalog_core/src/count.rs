/// Parse the trailing numeric token of a counter text such as `"1,502 results"`.
///
/// Tokens are scanned from the end; the first one made only of ASCII digits
/// once thousands separators and surrounding punctuation are removed wins.
/// Returns `None` when no token qualifies or the value overflows.
pub fn parse_count(text: &str) -> Option<u64> {
    text.split_whitespace().rev().find_map(parse_token)
}

fn parse_token(token: &str) -> Option<u64> {
    // A leading minus is a negative number, not punctuation.
    if token.starts_with('-') && token.len() > 1 {
        return None;
    }
    let trimmed = token.trim_matches(|c: char| !c.is_ascii_digit());
    if trimmed.is_empty() {
        return None;
    }
    let digits: String = trimmed.chars().filter(|c| !is_separator(*c)).collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn is_separator(c: char) -> bool {
    matches!(c, ',' | '.' | '\'' | '_' | '\u{a0}' | '\u{202f}')
}
