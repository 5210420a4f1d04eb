use xi_rope::Rope;

use super::Span;

/// A reference to a single line in the rope with its byte span.
#[derive(Debug, Clone)]
pub struct LineRef {
    /// Byte span of this line in the rope (includes newline if present).
    pub span: Span,
    /// The line text as a string.
    pub text: String,
}

/// Returns an iterator over lines with their byte spans.
///
/// Uses `lines_raw` to preserve newline characters, which is important for
/// accurate span tracking during block parsing.
pub fn lines_with_spans(rope: &Rope) -> impl Iterator<Item = LineRef> + '_ {
    let mut offset = 0usize;
    rope.lines_raw(..).map(move |line| {
        let start = offset;
        let len = line.len();
        offset += len;
        LineRef {
            span: Span { start, end: offset },
            text: line.into_owned(),
        }
    })
}

/// A view of one physical line, possibly with container prefixes stripped.
///
/// Holds offsets only; the text is sliced from the source on demand so views
/// can be copied freely while the block parser recurses into containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    /// Full physical line including its newline.
    pub raw: Span,
    /// Start of the content after stripped prefixes.
    pub start: usize,
    /// End of the content, excluding `\r\n` / `\n`.
    pub end: usize,
}

impl Line {
    pub fn text<'s>(&self, src: &'s str) -> &'s str {
        &src[self.start..self.end]
    }

    pub fn content(&self) -> Span {
        Span::new(self.start, self.end)
    }

    /// Content start through the physical line end (newline included).
    pub fn tail(&self) -> Span {
        Span::new(self.start, self.raw.end)
    }

    pub fn is_blank(&self, src: &str) -> bool {
        self.text(src).trim().is_empty()
    }

    /// Leading indentation in columns (tabs advance to the next multiple of 4).
    pub fn indent(&self, src: &str) -> usize {
        let mut col = 0;
        for b in self.text(src).bytes() {
            match b {
                b' ' => col += 1,
                b'\t' => col += 4 - col % 4,
                _ => break,
            }
        }
        col
    }

    /// Drops `n` bytes from the front of the content.
    #[must_use]
    pub fn skip(&self, n: usize) -> Line {
        Line {
            start: (self.start + n).min(self.end),
            ..*self
        }
    }

    /// Drops up to `cols` columns of leading whitespace.
    #[must_use]
    pub fn dedent(&self, src: &str, cols: usize) -> Line {
        let mut col = 0;
        let mut n = 0;
        for b in self.text(src).bytes() {
            if col >= cols {
                break;
            }
            match b {
                b' ' => col += 1,
                b'\t' => col += 4 - col % 4,
                _ => break,
            }
            n += 1;
        }
        self.skip(n)
    }

    /// Drops all leading whitespace.
    #[must_use]
    pub fn trim_start(&self, src: &str) -> Line {
        let t = self.text(src);
        self.skip(t.len() - t.trim_start().len())
    }
}

/// Splits a rope into line views covering the whole text.
pub fn line_table(rope: &Rope) -> Vec<Line> {
    lines_with_spans(rope)
        .map(|lr| {
            let content = lr.text.trim_end_matches(['\n', '\r']).len();
            Line {
                raw: lr.span,
                start: lr.span.start,
                end: lr.span.start + content,
            }
        })
        .collect()
}
