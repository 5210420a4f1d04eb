/// Footnote definitions `[^label]: text` and the label rules shared with references.
pub struct Footnote;

impl Footnote {
    pub const OPEN: &'static str = "[^";
    /// Continuation lines of a definition are indented at least this much.
    pub const CONTINUATION_INDENT: usize = 4;

    /// Length of a valid label at the start of `s` (just after `[^`), up to `]`.
    pub fn label_len(s: &str) -> Option<usize> {
        let end = s.find(']')?;
        let label = &s[..end];
        let valid = !label.is_empty()
            && !label.contains(char::is_whitespace)
            && !label.contains(['[', '^']);
        valid.then_some(end)
    }

    /// Recognises a definition line. Returns the label and the byte offset of the content.
    pub fn definition(line: &str) -> Option<(String, usize)> {
        let indent = line.len() - line.trim_start_matches(' ').len();
        if indent > 3 || !line[indent..].starts_with(Self::OPEN) {
            return None;
        }
        let label_start = indent + Self::OPEN.len();
        let len = Self::label_len(&line[label_start..])?;
        let colon = label_start + len + 1;
        if line.as_bytes().get(colon) != Some(&b':') {
            return None;
        }
        let rest = &line[colon + 1..];
        let content = colon + 1 + (rest.len() - rest.trim_start().len());
        Some((line[label_start..label_start + len].to_string(), content))
    }
}
