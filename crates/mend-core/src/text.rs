//! Line bookkeeping and indentation helpers shared by the correction engine.

pub use text_size::TextSize;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

/// Pre-computed line start offsets for a particular text snapshot.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LineIndex {
    line_starts: Vec<TextSize>,
    line_ends: Vec<TextSize>,
    text_len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut line_starts = Vec::with_capacity(64);
        let mut line_ends = Vec::with_capacity(64);
        line_starts.push(TextSize::from(0));

        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => {
                    line_ends.push(TextSize::from(i as u32));
                    line_starts.push(TextSize::from((i + 1) as u32));
                    i += 1;
                }
                b'\r' => {
                    line_ends.push(TextSize::from(i as u32));
                    let step = if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                    line_starts.push(TextSize::from((i + step) as u32));
                    i += step;
                }
                _ => i += 1,
            }
        }

        line_ends.push(TextSize::from(text.len() as u32));

        Self {
            line_starts,
            line_ends,
            text_len: TextSize::from(text.len() as u32),
        }
    }

    #[inline]
    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }

    #[inline]
    pub fn line_start(&self, line: u32) -> Option<usize> {
        self.line_starts.get(line as usize).map(|s| u32::from(*s) as usize)
    }

    /// Offset of the line terminator (or EOF) of `line`.
    #[inline]
    pub fn line_end(&self, line: u32) -> Option<usize> {
        self.line_ends.get(line as usize).map(|s| u32::from(*s) as usize)
    }

    /// Offset just past the line terminator of `line` (the next line's start, or EOF).
    pub fn line_end_with_terminator(&self, line: u32) -> Option<usize> {
        self.line_start(line + 1)
            .or_else(|| self.line_end(line))
    }

    pub fn line_of(&self, offset: usize) -> u32 {
        let offset = TextSize::from(offset as u32).min(self.text_len);
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line as u32,
            Err(insert) => insert.saturating_sub(1) as u32,
        }
    }

    pub fn line_col(&self, offset: usize) -> LineCol {
        let line = self.line_of(offset);
        let start = self.line_start(line).unwrap_or(0);
        let end = self.line_end(line).unwrap_or(start);
        LineCol {
            line,
            col: (offset.min(end) - start) as u32,
        }
    }

    pub fn offset(&self, line_col: LineCol) -> Option<usize> {
        let start = self.line_start(line_col.line)?;
        let end = self.line_end(line_col.line)?;
        let offset = start + line_col.col as usize;
        (offset <= end).then_some(offset)
    }
}

/// Offset of the first byte of the line containing `offset`.
pub fn line_start(text: &str, offset: usize) -> usize {
    let offset = offset.min(text.len());
    text[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0)
}

/// Offset of the `\n` terminating the line containing `offset` (or EOF).
pub fn line_end(text: &str, offset: usize) -> usize {
    let offset = offset.min(text.len());
    text[offset..]
        .find('\n')
        .map(|i| offset + i)
        .unwrap_or(text.len())
}

/// Offset just past the `\n` terminating the line containing `offset` (or EOF).
pub fn line_end_with_newline(text: &str, offset: usize) -> usize {
    let end = line_end(text, offset);
    if end < text.len() {
        end + 1
    } else {
        end
    }
}

/// The leading whitespace of the line containing `offset`.
pub fn indentation_at(text: &str, offset: usize) -> &str {
    let start = line_start(text, offset);
    let rest = &text[start..];
    let len = rest
        .bytes()
        .take_while(|b| *b == b' ' || *b == b'\t')
        .count();
    &rest[..len]
}

/// `true` when only whitespace precedes `offset` on its line.
pub fn is_first_on_line(text: &str, offset: usize) -> bool {
    let start = line_start(text, offset);
    text[start..offset.min(text.len())]
        .bytes()
        .all(|b| b == b' ' || b == b'\t')
}

/// `true` when only whitespace follows `offset` on its line.
pub fn is_last_on_line(text: &str, offset: usize) -> bool {
    let end = line_end(text, offset);
    text[offset.min(end)..end]
        .bytes()
        .all(|b| b == b' ' || b == b'\t' || b == b'\r')
}

/// Guess the indentation unit used by `text`: a tab, or the smallest non-zero run of
/// leading spaces. Defaults to four spaces.
pub fn detect_indent_unit(text: &str) -> String {
    let mut min_spaces: Option<usize> = None;
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if line.starts_with('\t') {
            return "\t".to_string();
        }
        let spaces = line.bytes().take_while(|b| *b == b' ').count();
        // Javadoc continuation lines (` * foo`) are indented by one extra space.
        if spaces > 0 && !line[spaces..].starts_with('*') {
            min_spaces = Some(min_spaces.map_or(spaces, |m| m.min(spaces)));
        }
    }
    " ".repeat(min_spaces.unwrap_or(4))
}

/// Prefix every non-empty line of `text` with `indent`.
pub fn indent_lines(text: &str, indent: &str) -> String {
    let mut out = String::with_capacity(text.len() + indent.len() * 4);
    for (idx, line) in text.split('\n').enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        if !line.is_empty() {
            out.push_str(indent);
        }
        out.push_str(line);
    }
    out
}

/// Count blank lines immediately preceding `offset`'s line.
pub fn blank_lines_before(text: &str, offset: usize) -> usize {
    let mut count = 0;
    let mut start = line_start(text, offset);
    while start > 0 {
        let prev_start = line_start(text, start - 1);
        if text[prev_start..start - 1].trim().is_empty() {
            count += 1;
            start = prev_start;
        } else {
            break;
        }
    }
    count
}
