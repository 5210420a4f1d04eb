use super::Span;

/// Extracts text for a span, truncating to at most `max` bytes with a "..."
/// suffix. Truncation backs off to a char boundary.
pub fn preview(src: &str, sp: Span, max: usize) -> String {
    let end = sp.end.min(src.len());
    let s = &src[floor_char_boundary(src, sp.start.min(end))..floor_char_boundary(src, end)];
    if s.len() <= max {
        return s.to_string();
    }
    let cut = floor_char_boundary(s, max);
    format!("{}...", &s[..cut])
}

/// Largest char boundary `<= i`.
pub fn floor_char_boundary(s: &str, i: usize) -> usize {
    let mut i = i.min(s.len());
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_short_text_unchanged() {
        assert_eq!(preview("hello", Span::new(0, 5), 10), "hello");
    }

    #[test]
    fn preview_truncates_long_text() {
        assert_eq!(preview("hello world", Span::new(0, 11), 5), "hello...");
    }

    #[test]
    fn preview_backs_off_to_char_boundary() {
        // 'é' is two bytes; cutting at 2 would split it
        assert_eq!(preview("aéb", Span::new(0, 4), 2), "a...");
    }
}
