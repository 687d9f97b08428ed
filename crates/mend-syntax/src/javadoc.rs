//! Block-tag structure of `/** ... */` comments.

use mend_core::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Javadoc {
    /// From `/**` to `*/` inclusive.
    pub range: Span,
    pub tags: Vec<JavadocTag>,
    /// Start of the line holding the closing `*/` when it sits on its own line, else the
    /// offset of `*/` itself.
    pub close_line_start: usize,
    /// `true` when `*/` is the only content on its line.
    pub close_on_own_line: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavadocTag {
    /// Tag name without `@` (`param`, `return`, `throws`).
    pub name: String,
    /// First word after the tag name (`a`, `<T>`, `IOException`).
    pub arg: Option<String>,
    pub arg_range: Option<Span>,
    /// From `@` to the end of the tag's text on its last line.
    pub range: Span,
    /// Whole lines occupied by the tag including continuation lines and the trailing
    /// newline. Equal to `range` when the tag does not start its own line.
    pub lines: Span,
    pub on_own_line: bool,
}

impl JavadocTag {
    pub fn is_param(&self) -> bool {
        self.name == "param"
    }

    pub fn is_type_param(&self) -> bool {
        self.is_param() && self.arg.as_deref().is_some_and(|a| a.starts_with('<'))
    }

    pub fn is_throws(&self) -> bool {
        matches!(self.name.as_str(), "throws" | "exception")
    }

    pub fn is_return(&self) -> bool {
        self.name == "return"
    }
}

impl Javadoc {
    /// Parse the comment spanning `range` in `text`.
    pub fn parse(text: &str, range: Span) -> Javadoc {
        let comment = range.slice(text);
        let mut tags: Vec<JavadocTag> = Vec::new();
        let mut close_line_start = range.end.saturating_sub(2);
        let mut close_on_own_line = false;

        let mut line_start = range.start;
        let mut first = true;
        for raw_line in comment.split_inclusive('\n') {
            let line_len = raw_line.len();
            let line_end = line_start + line_len;
            let content_end = line_start + raw_line.trim_end_matches(['\n', '\r']).len();

            // Skip leading whitespace, the opening `/**` and one `*` decoration.
            let bytes = text.as_bytes();
            let skip_ws = |mut c: usize| {
                while c < content_end && matches!(bytes[c], b' ' | b'\t') {
                    c += 1;
                }
                c
            };
            let mut cursor = skip_ws(line_start);
            if first && text[cursor..content_end].starts_with("/**") {
                cursor += 3;
            } else if text[cursor..content_end].starts_with('*')
                && !text[cursor..content_end].starts_with("*/")
            {
                cursor += 1;
            }
            cursor = skip_ws(cursor);

            let rest = &text[cursor..content_end];
            let is_close_line = rest.starts_with("*/");
            let close_pos = rest.find("*/").map(|i| cursor + i);
            let text_end = close_pos.unwrap_or(content_end);
            let line_text_end = trim_end_offset(text, cursor, text_end);

            if is_close_line {
                close_on_own_line = !first;
                close_line_start = if first { cursor } else { line_start };
            } else if let Some(pos) = close_pos {
                close_line_start = pos;
            }

            if rest.starts_with('@') {
                let tag_start = cursor;
                let name_end = word_end(text, tag_start + 1, text_end);
                let name = text[tag_start + 1..name_end].to_string();
                let arg_start = skip_spaces(text, name_end, text_end);
                let arg_end = word_end(text, arg_start, text_end);
                let (arg, arg_range) = if arg_end > arg_start {
                    (
                        Some(text[arg_start..arg_end].to_string()),
                        Some(Span::new(arg_start, arg_end)),
                    )
                } else {
                    (None, None)
                };
                let on_own_line = !first && close_pos.is_none();
                let end = line_text_end.max(name_end);
                tags.push(JavadocTag {
                    name,
                    arg,
                    arg_range,
                    range: Span::new(tag_start, end),
                    lines: if on_own_line {
                        Span::new(line_start, line_end)
                    } else {
                        Span::new(tag_start, end)
                    },
                    on_own_line,
                });
            } else if !is_close_line && !rest.trim().is_empty() && close_pos.is_none() {
                if let Some(tag) = tags.last_mut() {
                    if tag.on_own_line {
                        tag.lines = Span::new(tag.lines.start, line_end);
                        tag.range = Span::new(tag.range.start, line_text_end);
                    }
                }
            }

            line_start = line_end;
            first = false;
        }

        Javadoc {
            range,
            tags,
            close_line_start,
            close_on_own_line,
        }
    }

    pub fn param_tag(&self, name: &str) -> Option<&JavadocTag> {
        self.tags
            .iter()
            .find(|t| t.is_param() && t.arg.as_deref() == Some(name))
    }

    pub fn return_tag(&self) -> Option<&JavadocTag> {
        self.tags.iter().find(|t| t.is_return())
    }

    pub fn throws_tag(&self, simple_name: &str) -> Option<&JavadocTag> {
        self.tags.iter().find(|t| {
            t.is_throws()
                && t.arg
                    .as_deref()
                    .is_some_and(|a| a.rsplit('.').next() == Some(simple_name))
        })
    }

    /// The tag whose text contains `offset`.
    pub fn tag_at(&self, offset: usize) -> Option<&JavadocTag> {
        self.tags
            .iter()
            .find(|t| t.range.contains(offset) || t.lines.contains(offset))
    }
}

fn word_end(text: &str, start: usize, limit: usize) -> usize {
    let mut end = start;
    for (i, c) in text[start..limit].char_indices() {
        if c.is_whitespace() {
            return start + i;
        }
        end = start + i + c.len_utf8();
    }
    end
}

fn skip_spaces(text: &str, mut pos: usize, limit: usize) -> usize {
    let bytes = text.as_bytes();
    while pos < limit && matches!(bytes[pos], b' ' | b'\t') {
        pos += 1;
    }
    pos
}

fn trim_end_offset(text: &str, start: usize, end: usize) -> usize {
    start + text[start..end].trim_end().len()
}
