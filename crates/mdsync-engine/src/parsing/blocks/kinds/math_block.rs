/// Display math delimited by `$$` lines.
pub struct MathBlock;

impl MathBlock {
    pub const DELIM: &'static str = "$$";

    /// An opener is a line that is exactly `$$` (ignoring surrounding whitespace).
    pub fn opens(line: &str) -> bool {
        line.trim() == Self::DELIM
    }

    pub fn closes(line: &str) -> bool {
        Self::opens(line)
    }

    /// Single-line form `$$ latex $$`; returns the inner byte range.
    pub fn single_line(line: &str) -> Option<(usize, usize)> {
        let t = line.trim();
        if t.len() <= 2 * Self::DELIM.len() {
            return None;
        }
        let inner = t.strip_prefix(Self::DELIM)?.strip_suffix(Self::DELIM)?;
        if inner.contains(Self::DELIM) || inner.trim().is_empty() {
            return None;
        }
        let lead = line.len() - line.trim_start().len() + Self::DELIM.len();
        Some((lead, lead + inner.len()))
    }
}
