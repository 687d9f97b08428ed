use mend_core::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) text: String,
    pub(crate) range: Span,
    /// The last `/** ... */` comment between the previous token and this one.
    pub(crate) doc: Option<Span>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Ident,
    IntLiteral,
    LongLiteral,
    FloatLiteral,
    DoubleLiteral,
    CharLiteral,
    StringLiteral,
    At,
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Semi,
    Comma,
    Dot,
    Ellipsis,
    Question,
    Colon,
    ColonColon,
    Arrow,
    Eq,
    Lt,
    Gt,
    /// Any other operator; the token text holds the operator.
    Op,
    Unknown,
}

/// Multi-character operators, longest first. `>`-prefixed operators other than `>=` are
/// deliberately absent so nested generic closers stay separate tokens.
const OPERATORS: &[&str] = &[
    "<<=", "==", "!=", "<=", ">=", "&&", "||", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=",
    "|=", "^=", "<<",
];

pub(crate) struct Lexer<'a> {
    text: &'a str,
    offset: usize,
    pos: usize,
    pending_doc: Option<Span>,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(text: &'a str, offset: usize) -> Self {
        Lexer {
            text,
            offset,
            pos: 0,
            pending_doc: None,
        }
    }

    fn remaining(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn peek_char_n(&self, n: usize) -> Option<char> {
        self.remaining().chars().nth(n)
    }

    fn bump_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn current_offset(&self) -> usize {
        self.offset + self.pos
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while matches!(self.peek_char(), Some(c) if c.is_whitespace()) {
                self.bump_char();
            }

            let rem = self.remaining();
            if rem.starts_with("//") {
                while let Some(c) = self.bump_char() {
                    if c == '\n' {
                        break;
                    }
                }
                continue;
            }

            if rem.starts_with("/*") {
                let start = self.current_offset();
                let is_doc = rem.starts_with("/**") && !rem.starts_with("/**/");
                self.bump_char();
                self.bump_char();
                while !self.remaining().is_empty() && !self.remaining().starts_with("*/") {
                    self.bump_char();
                }
                if self.remaining().starts_with("*/") {
                    self.bump_char();
                    self.bump_char();
                }
                if is_doc {
                    self.pending_doc = Some(Span::new(start, self.current_offset()));
                }
                continue;
            }

            break;
        }
    }

    fn lex_identifier(&mut self, first: char) -> String {
        let mut out = String::new();
        out.push(first);
        while let Some(c) = self.peek_char() {
            if unicode_ident::is_xid_continue(c) || c == '$' {
                out.push(c);
                self.bump_char();
            } else {
                break;
            }
        }
        out
    }

    fn lex_number(&mut self, first: char) -> (TokenKind, String) {
        let mut out = String::new();
        out.push(first);
        let mut kind = TokenKind::IntLiteral;

        let is_hex = first == '0' && matches!(self.peek_char(), Some('x' | 'X'));
        if is_hex || (first == '0' && matches!(self.peek_char(), Some('b' | 'B'))) {
            if let Some(c) = self.bump_char() {
                out.push(c);
            }
            while let Some(c) = self.peek_char() {
                if c.is_ascii_hexdigit() || c == '_' {
                    out.push(c);
                    self.bump_char();
                } else {
                    break;
                }
            }
        } else {
            let mut seen_dot = first == '.';
            if seen_dot {
                kind = TokenKind::DoubleLiteral;
            }
            while let Some(c) = self.peek_char() {
                if c.is_ascii_digit() || c == '_' {
                    out.push(c);
                    self.bump_char();
                } else if c == '.'
                    && !seen_dot
                    && self.peek_char_n(1).is_some_and(|n| n.is_ascii_digit() || !n.is_alphabetic())
                    && self.peek_char_n(1) != Some('.')
                {
                    seen_dot = true;
                    kind = TokenKind::DoubleLiteral;
                    out.push(c);
                    self.bump_char();
                } else if matches!(c, 'e' | 'E') {
                    kind = TokenKind::DoubleLiteral;
                    out.push(c);
                    self.bump_char();
                    if let Some(sign @ ('+' | '-')) = self.peek_char() {
                        out.push(sign);
                        self.bump_char();
                    }
                } else {
                    break;
                }
            }
        }

        match self.peek_char() {
            Some(c @ ('l' | 'L')) => {
                out.push(c);
                self.bump_char();
                kind = TokenKind::LongLiteral;
            }
            Some(c @ ('f' | 'F')) if !is_hex => {
                out.push(c);
                self.bump_char();
                kind = TokenKind::FloatLiteral;
            }
            Some(c @ ('d' | 'D')) if !is_hex => {
                out.push(c);
                self.bump_char();
                kind = TokenKind::DoubleLiteral;
            }
            _ => {}
        }
        (kind, out)
    }

    fn lex_quoted(&mut self, quote: char) -> String {
        let mut out = String::new();
        // opening quote already consumed
        out.push(quote);

        if quote == '"' && self.remaining().starts_with("\"\"") {
            // Text block.
            out.push_str("\"\"");
            self.bump_char();
            self.bump_char();
            while !self.remaining().is_empty() && !self.remaining().starts_with("\"\"\"") {
                if let Some(c) = self.bump_char() {
                    out.push(c);
                    if c == '\\' {
                        if let Some(escaped) = self.bump_char() {
                            out.push(escaped);
                        }
                    }
                }
            }
            for _ in 0..3 {
                if let Some(c) = self.bump_char() {
                    out.push(c);
                }
            }
            return out;
        }

        while let Some(c) = self.bump_char() {
            out.push(c);
            match c {
                c if c == quote => break,
                '\n' => break,
                '\\' => {
                    if let Some(escaped) = self.bump_char() {
                        out.push(escaped);
                    }
                }
                _ => {}
            }
        }
        out
    }

    fn next_token(&mut self) -> Option<Token> {
        self.skip_whitespace_and_comments();
        let doc = self.pending_doc.take();
        let start = self.current_offset();
        let ch = self.bump_char()?;

        let (kind, text) = match ch {
            '{' => (TokenKind::LBrace, "{".to_string()),
            '}' => (TokenKind::RBrace, "}".to_string()),
            '(' => (TokenKind::LParen, "(".to_string()),
            ')' => (TokenKind::RParen, ")".to_string()),
            '[' => (TokenKind::LBracket, "[".to_string()),
            ']' => (TokenKind::RBracket, "]".to_string()),
            ';' => (TokenKind::Semi, ";".to_string()),
            ',' => (TokenKind::Comma, ",".to_string()),
            '@' => (TokenKind::At, "@".to_string()),
            '?' => (TokenKind::Question, "?".to_string()),
            '.' if self.peek_char().is_some_and(|c| c.is_ascii_digit()) => self.lex_number('.'),
            '.' if self.remaining().starts_with("..") => {
                self.bump_char();
                self.bump_char();
                (TokenKind::Ellipsis, "...".to_string())
            }
            '.' => (TokenKind::Dot, ".".to_string()),
            ':' if self.peek_char() == Some(':') => {
                self.bump_char();
                (TokenKind::ColonColon, "::".to_string())
            }
            ':' => (TokenKind::Colon, ":".to_string()),
            '-' if self.peek_char() == Some('>') => {
                self.bump_char();
                (TokenKind::Arrow, "->".to_string())
            }
            '"' | '\'' => {
                let lit = self.lex_quoted(ch);
                let kind = if ch == '"' {
                    TokenKind::StringLiteral
                } else {
                    TokenKind::CharLiteral
                };
                (kind, lit)
            }
            c if c.is_ascii_digit() => self.lex_number(c),
            c if unicode_ident::is_xid_start(c) || c == '_' || c == '$' => {
                (TokenKind::Ident, self.lex_identifier(c))
            }
            c => {
                let rest = &self.text[self.pos - c.len_utf8()..];
                if let Some(op) = OPERATORS.iter().find(|op| rest.starts_with(**op)) {
                    for _ in 1..op.len() {
                        self.bump_char();
                    }
                    (TokenKind::Op, (*op).to_string())
                } else {
                    let kind = match c {
                        '=' => TokenKind::Eq,
                        '<' => TokenKind::Lt,
                        '>' => TokenKind::Gt,
                        '+' | '-' | '*' | '/' | '%' | '!' | '~' | '&' | '|' | '^' => TokenKind::Op,
                        _ => TokenKind::Unknown,
                    };
                    (kind, c.to_string())
                }
            }
        };

        let range = Span::new(start, self.current_offset());
        Some(Token {
            kind,
            text,
            range,
            doc,
        })
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}
