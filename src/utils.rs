/// Collapse a multi-line prompt onto a single line and cap its length so the
/// attempt log stays one readable line per entry. Truncation counts chars,
/// not bytes, so it never splits a multi-byte character.
pub fn condense_prompt(s: &str, max_chars: usize) -> String {
    let flattened = s.replace('\n', " ");
    if flattened.chars().count() <= max_chars {
        return flattened;
    }
    let kept: String = flattened
        .chars()
        .take(max_chars.saturating_sub(3))
        .collect();
    format!("{}...", kept)
}
