//! Line writer with container prefixes.
//!
//! Blockquotes, list items and footnote definitions prefix every line they
//! own (`> `, `- ` then `  `, `[^1]: ` then four spaces). The writer keeps a
//! stack of those prefixes and emits them lazily at the first write on each
//! line, so callers only ever write content and line breaks.

#[derive(Debug)]
struct Prefix {
    /// Written on the container's first line.
    first: String,
    /// Written on every following line.
    rest: String,
    used: bool,
}

#[derive(Debug, Default)]
pub struct MdWriter {
    out: String,
    prefixes: Vec<Prefix>,
    /// Prefixes already written on the current line.
    emitted: usize,
    line_start: usize,
    line_has_content: bool,
    content_end: usize,
}

impl MdWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> usize {
        self.out.len()
    }

    /// End of the most recently written content (prefixes and newlines excluded).
    pub fn content_end(&self) -> usize {
        self.content_end
    }

    pub fn at_line_start(&self) -> bool {
        !self.line_has_content
    }

    pub fn depth(&self) -> usize {
        self.prefixes.len()
    }

    pub fn push_prefix(&mut self, first: impl Into<String>, rest: impl Into<String>) {
        self.prefixes.push(Prefix {
            first: first.into(),
            rest: rest.into(),
            used: false,
        });
    }

    pub fn pop_prefix(&mut self) {
        self.prefixes.pop();
        self.emitted = self.emitted.min(self.prefixes.len());
    }

    /// Writes pending prefixes of the outer `depth` containers; returns the offset.
    pub fn open_prefixes(&mut self, depth: usize) -> usize {
        let depth = depth.min(self.prefixes.len());
        for p in &mut self.prefixes[self.emitted.min(depth)..depth] {
            if p.used {
                self.out.push_str(&p.rest);
            } else {
                p.used = true;
                self.out.push_str(&p.first);
            }
        }
        self.emitted = self.emitted.max(depth);
        self.out.len()
    }

    /// Offset where the innermost container's own prefix starts.
    pub fn container_start(&mut self) -> usize {
        self.open_prefixes(self.prefixes.len().saturating_sub(1))
    }

    /// Offset where content written next will start.
    pub fn content_start(&mut self) -> usize {
        self.open_prefixes(self.prefixes.len())
    }

    /// Writes text that contains no newline.
    pub fn write(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        self.content_start();
        self.out.push_str(s);
        self.line_has_content = true;
        self.content_end = self.out.len();
    }

    /// Writes text, turning each `\n` into a prefixed line break.
    pub fn write_lines(&mut self, s: &str) {
        for (i, line) in s.split('\n').enumerate() {
            if i > 0 {
                self.newline();
            }
            self.write(line);
        }
    }

    /// Ends the current line. A line without content keeps only the prefixes
    /// of started containers, with trailing whitespace removed.
    pub fn newline(&mut self) {
        if !self.line_has_content {
            if self.emitted == 0 {
                for p in self.prefixes.iter().filter(|p| p.used) {
                    self.out.push_str(&p.rest);
                }
            }
            let trimmed = self.out[self.line_start..].trim_end().len();
            self.out.truncate(self.line_start + trimmed);
        }
        self.out.push('\n');
        self.line_start = self.out.len();
        self.emitted = 0;
        self.line_has_content = false;
    }

    /// Ends the current line and writes one empty (prefix-only) line.
    pub fn blank_line(&mut self) {
        self.newline();
        self.newline();
    }

    pub fn finish(self) -> String {
        self.out
    }
}
