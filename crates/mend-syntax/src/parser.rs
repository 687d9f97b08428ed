//! Recursive-descent parser over the token stream.
//!
//! The parser never fails: malformed input produces `Expr::Missing` / `Stmt::Other`
//! nodes and parsing resumes at the next plausible boundary.

use mend_core::Span;

use crate::ast;
use crate::javadoc::Javadoc;
use crate::lexer::{Token, TokenKind};

const MODIFIER_KEYWORDS: &[&str] = &[
    "public",
    "protected",
    "private",
    "static",
    "final",
    "abstract",
    "default",
    "synchronized",
    "native",
    "transient",
    "volatile",
    "sealed",
    "strictfp",
];

const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void",
];

/// Keywords that can never start a type reference.
const NON_TYPE_KEYWORDS: &[&str] = &[
    "new", "return", "throw", "this", "super", "if", "else", "while", "do", "for", "try",
    "catch", "finally", "switch", "case", "break", "continue", "true", "false", "null",
    "instanceof", "class", "interface", "enum", "import", "package", "assert",
];

const ASSIGN_OPS: &[&str] = &["+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<="];

pub(crate) struct Parser<'a> {
    text: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(text: &'a str, tokens: Vec<Token>) -> Self {
        Parser {
            text,
            tokens,
            pos: 0,
        }
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_n(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n)
    }

    fn at_kind(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|token| token.kind == kind)
    }

    fn nth_is(&self, n: usize, kind: TokenKind) -> bool {
        self.peek_n(n).is_some_and(|token| token.kind == kind)
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        self.peek()
            .is_some_and(|token| token.kind == TokenKind::Ident && token.text == keyword)
    }

    fn at_op(&self, op: &str) -> bool {
        self.peek()
            .is_some_and(|token| token.kind == TokenKind::Op && token.text == op)
    }

    fn bump(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos)?.clone();
        self.pos += 1;
        Some(tok)
    }

    /// End offset of the last consumed token.
    fn prev_end(&self) -> usize {
        self.pos
            .checked_sub(1)
            .and_then(|idx| self.tokens.get(idx))
            .map(|t| t.range.end)
            .unwrap_or(0)
    }

    fn current_start(&self) -> usize {
        self.peek()
            .map(|t| t.range.start)
            .unwrap_or_else(|| self.text.len())
    }

    /// Consume a token of `kind`, or synthesize an empty one without consuming anything.
    fn expect_kind(&mut self, kind: TokenKind) -> Token {
        if self.at_kind(kind) {
            if let Some(tok) = self.bump() {
                return tok;
            }
        }
        tracing::trace!(target: "mend.syntax", ?kind, offset = self.prev_end(), "missing token");
        let at = self.prev_end();
        Token {
            kind,
            text: String::new(),
            range: Span::empty(at),
            doc: None,
        }
    }

    fn expect_ident(&mut self) -> Token {
        self.expect_kind(TokenKind::Ident)
    }

    fn doc_at(&self, token_idx: usize) -> Option<Javadoc> {
        let span = self.tokens.get(token_idx)?.doc?;
        Some(Javadoc::parse(self.text, span))
    }

    fn skip_balanced(&mut self, open: TokenKind, close: TokenKind) {
        if !self.at_kind(open) {
            return;
        }
        self.bump();
        let mut depth = 1usize;
        while !self.is_eof() && depth > 0 {
            match self.peek().map(|t| t.kind) {
                Some(k) if k == open => depth += 1,
                Some(k) if k == close => depth -= 1,
                _ => {}
            }
            self.bump();
        }
    }

    /// Collect the text of a balanced token run, inserting a space between adjacent
    /// word-like tokens (`? extends Number`).
    fn collect_balanced(&mut self, open: TokenKind, close: TokenKind) -> (String, usize) {
        if !self.at_kind(open) {
            return (String::new(), self.current_start());
        }
        let mut text = String::new();
        let mut end = self.current_start();
        let mut depth = 0usize;
        let mut prev_wordy = false;
        while let Some(tok) = self.bump() {
            if tok.kind == open {
                depth += 1;
            } else if tok.kind == close {
                depth = depth.saturating_sub(1);
            }
            let wordy = matches!(tok.kind, TokenKind::Ident | TokenKind::Question);
            if wordy && prev_wordy {
                text.push(' ');
            }
            if tok.kind == TokenKind::Op && tok.text == "&" {
                text.push_str(" & ");
            } else {
                text.push_str(&tok.text);
            }
            prev_wordy = wordy;
            end = tok.range.end;
            if depth == 0 {
                break;
            }
        }
        (text, end)
    }

    /// Index of the token closing the bracket opened at `self.pos`.
    fn matching_close(&self, open: TokenKind, close: TokenKind) -> Option<usize> {
        let mut depth = 0usize;
        for (idx, tok) in self.tokens.iter().enumerate().skip(self.pos) {
            if tok.kind == open {
                depth += 1;
            } else if tok.kind == close {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(idx);
                }
            }
        }
        None
    }

    // ------------------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------------------

    pub(crate) fn parse_compilation_unit(&mut self, len: usize) -> ast::CompilationUnit {
        let package = if self.at_keyword("package")
            || (self.at_kind(TokenKind::At) && self.package_follows_annotations())
        {
            self.parse_modifiers();
            Some(self.parse_package_decl())
        } else {
            None
        };

        let mut imports = Vec::new();
        while self.at_keyword("import") {
            imports.push(self.parse_import_decl());
        }

        let mut types = Vec::new();
        while !self.is_eof() {
            let before = self.pos;
            if let Some(decl) = self.parse_type_decl() {
                types.push(decl);
            }
            if self.pos == before {
                self.bump();
            }
        }

        ast::CompilationUnit {
            package,
            imports,
            types,
            range: Span::new(0, len),
        }
    }

    fn package_follows_annotations(&self) -> bool {
        self.tokens[self.pos..]
            .iter()
            .find(|t| t.kind == TokenKind::Ident && (t.text == "package" || t.text == "class"))
            .is_some_and(|t| t.text == "package")
    }

    fn parse_package_decl(&mut self) -> ast::PackageDecl {
        let kw = self.expect_ident();
        let (name, _) = self.parse_qualified_name();
        let semi = self.expect_kind(TokenKind::Semi);
        ast::PackageDecl {
            name,
            range: Span::new(kw.range.start, semi.range.end),
        }
    }

    fn parse_import_decl(&mut self) -> ast::ImportDecl {
        let kw = self.expect_ident();
        let mut is_static = false;
        if self.at_keyword("static") {
            is_static = true;
            self.bump();
        }

        let mut parts = Vec::new();
        let first = self.expect_ident();
        parts.push(first.text);

        let mut is_star = false;
        while self.at_kind(TokenKind::Dot) {
            self.bump();
            if self.at_op("*") {
                self.bump();
                is_star = true;
                break;
            }
            let part = self.expect_ident();
            parts.push(part.text);
        }

        let semi = self.expect_kind(TokenKind::Semi);

        ast::ImportDecl {
            is_static,
            is_star,
            path: parts.join("."),
            range: Span::new(kw.range.start, semi.range.end),
        }
    }

    fn parse_qualified_name(&mut self) -> (String, Span) {
        let first = self.expect_ident();
        let start = first.range.start;
        let mut end = first.range.end;
        let mut parts = vec![first.text];

        while self.at_kind(TokenKind::Dot) && self.nth_is(1, TokenKind::Ident) {
            self.bump();
            let part = self.expect_ident();
            end = part.range.end;
            parts.push(part.text);
        }

        (parts.join("."), Span::new(start, end))
    }

    fn parse_modifiers(&mut self) -> ast::Modifiers {
        let mut modifiers = ast::Modifiers::default();
        loop {
            if self.at_kind(TokenKind::At) {
                if self
                    .peek_n(1)
                    .is_some_and(|t| t.kind == TokenKind::Ident && t.text == "interface")
                {
                    break;
                }
                let at = self.bump().map(|t| t.range.start).unwrap_or(0);
                let mut name = String::new();
                if self.at_kind(TokenKind::Ident) {
                    name = self.parse_qualified_name().0;
                }
                if self.at_kind(TokenKind::LParen) {
                    self.skip_balanced(TokenKind::LParen, TokenKind::RParen);
                }
                modifiers.annotations.push(ast::Annotation {
                    name,
                    range: Span::new(at, self.prev_end()),
                });
                continue;
            }

            if self.at_keyword("non")
                && self.peek_n(1).is_some_and(|t| t.kind == TokenKind::Op && t.text == "-")
                && self
                    .peek_n(2)
                    .is_some_and(|t| t.kind == TokenKind::Ident && t.text == "sealed")
            {
                let start = self.current_start();
                self.bump();
                self.bump();
                self.bump();
                modifiers.keywords.push(ast::Modifier {
                    keyword: "non-sealed".to_string(),
                    range: Span::new(start, self.prev_end()),
                });
                continue;
            }

            let is_modifier = self
                .peek()
                .is_some_and(|tok| {
                    tok.kind == TokenKind::Ident && MODIFIER_KEYWORDS.contains(&tok.text.as_str())
                });
            if is_modifier {
                if self.at_keyword("static") && self.nth_is(1, TokenKind::LBrace) {
                    break;
                }
                // `default` inside a switch is handled by the statement parser.
                if self.at_keyword("default") && self.nth_is(1, TokenKind::Colon) {
                    break;
                }
                if let Some(tok) = self.bump() {
                    modifiers.keywords.push(ast::Modifier {
                        keyword: tok.text,
                        range: tok.range,
                    });
                }
                continue;
            }

            break;
        }
        modifiers
    }

    fn at_type_decl_keyword(&self) -> bool {
        if self.at_kind(TokenKind::At) {
            return self
                .peek_n(1)
                .is_some_and(|t| t.kind == TokenKind::Ident && t.text == "interface");
        }
        match self.peek() {
            Some(tok) if tok.kind == TokenKind::Ident => match tok.text.as_str() {
                "class" | "interface" | "enum" => true,
                "record" => self.nth_is(1, TokenKind::Ident) && self.nth_is(2, TokenKind::LParen)
                    || self.nth_is(1, TokenKind::Ident) && self.nth_is(2, TokenKind::Lt),
                _ => false,
            },
            _ => false,
        }
    }

    pub(crate) fn parse_type_decl(&mut self) -> Option<ast::TypeDecl> {
        let start_pos = self.pos;
        let start = self.peek()?.range.start;
        let javadoc = self.doc_at(start_pos);

        let modifiers = self.parse_modifiers();

        if !self.at_type_decl_keyword() {
            self.pos = start_pos;
            return None;
        }

        let kind = if self.at_kind(TokenKind::At) {
            self.bump();
            self.bump();
            ast::TypeKind::Annotation
        } else {
            let kw = self.bump()?;
            match kw.text.as_str() {
                "class" => ast::TypeKind::Class,
                "interface" => ast::TypeKind::Interface,
                "enum" => ast::TypeKind::Enum,
                _ => ast::TypeKind::Record,
            }
        };

        let name = self.expect_ident();

        let (type_params, type_params_range) = if self.at_kind(TokenKind::Lt) {
            let (params, range) = self.parse_type_params();
            (params, Some(range))
        } else {
            (Vec::new(), None)
        };

        let record_components = if kind == ast::TypeKind::Record && self.at_kind(TokenKind::LParen)
        {
            self.parse_param_list().0
        } else {
            Vec::new()
        };

        let mut extends = Vec::new();
        let mut implements = Vec::new();
        loop {
            if self.at_keyword("extends") {
                self.bump();
                extends = self.parse_type_ref_list();
            } else if self.at_keyword("implements") {
                self.bump();
                implements = self.parse_type_ref_list();
            } else if self.at_keyword("permits") {
                self.bump();
                self.parse_type_ref_list();
            } else {
                break;
            }
        }

        let (members, enum_constants, body_range) = self.parse_type_body(&name.text, kind);
        let decl_start = modifiers.start().unwrap_or(start).min(start);

        Some(ast::TypeDecl {
            kind,
            modifiers,
            javadoc,
            name: name.text,
            name_range: name.range,
            type_params,
            type_params_range,
            extends,
            implements,
            record_components,
            enum_constants,
            members,
            body_range,
            range: Span::new(decl_start, body_range.end),
        })
    }

    fn parse_type_ref_list(&mut self) -> Vec<ast::TypeRef> {
        let mut out = Vec::new();
        while let Some(ty) = self.parse_type_ref() {
            out.push(ty);
            if self.at_kind(TokenKind::Comma) {
                self.bump();
            } else {
                break;
            }
        }
        out
    }

    fn parse_type_params(&mut self) -> (Vec<ast::TypeParam>, Span) {
        let lt = self.expect_kind(TokenKind::Lt);
        let mut params = Vec::new();
        while !self.is_eof() && !self.at_kind(TokenKind::Gt) {
            self.parse_modifiers();
            if !self.at_kind(TokenKind::Ident) {
                self.bump();
                continue;
            }
            let name = self.expect_ident();
            let mut bounds = Vec::new();
            if self.at_keyword("extends") {
                self.bump();
                while let Some(bound) = self.parse_type_ref() {
                    bounds.push(bound);
                    if self.at_op("&") {
                        self.bump();
                    } else {
                        break;
                    }
                }
            }
            let end = bounds.last().map(|b| b.range.end).unwrap_or(name.range.end);
            params.push(ast::TypeParam {
                range: Span::new(name.range.start, end),
                name: name.text,
                name_range: name.range,
                bounds,
            });
            if self.at_kind(TokenKind::Comma) {
                self.bump();
            }
        }
        let gt = self.expect_kind(TokenKind::Gt);
        (params, Span::new(lt.range.start, gt.range.end))
    }

    fn parse_type_body(
        &mut self,
        type_name: &str,
        kind: ast::TypeKind,
    ) -> (Vec<ast::MemberDecl>, Vec<ast::EnumConstant>, Span) {
        while !self.at_kind(TokenKind::LBrace) && !self.is_eof() {
            self.bump();
        }
        let lbrace = self.expect_kind(TokenKind::LBrace);
        let body_start = lbrace.range.start;

        let enum_constants = if kind == ast::TypeKind::Enum {
            self.parse_enum_constants()
        } else {
            Vec::new()
        };

        let members = self.parse_members(type_name);

        let rbrace = self.expect_kind(TokenKind::RBrace);
        let body_range = Span::new(body_start, rbrace.range.end);
        (members, enum_constants, body_range)
    }

    fn parse_members(&mut self, type_name: &str) -> Vec<ast::MemberDecl> {
        let mut members = Vec::new();
        while !self.is_eof() && !self.at_kind(TokenKind::RBrace) {
            let before = self.pos;
            if self.at_kind(TokenKind::Semi) {
                self.bump();
                continue;
            }
            if let Some(member) = self.parse_member_decl(type_name) {
                members.push(member);
            }
            if self.pos == before {
                tracing::trace!(
                    target: "mend.syntax",
                    offset = self.current_start(),
                    "skipping token in type body"
                );
                self.bump();
            }
        }
        members
    }

    fn parse_enum_constants(&mut self) -> Vec<ast::EnumConstant> {
        let mut constants = Vec::new();

        if self.at_kind(TokenKind::Semi) {
            self.bump();
            return constants;
        }

        loop {
            if self.at_kind(TokenKind::Semi) {
                self.bump();
                break;
            }
            if self.at_kind(TokenKind::RBrace) {
                break;
            }

            self.parse_modifiers();
            if !self.at_kind(TokenKind::Ident) {
                break;
            }

            let name = self.expect_ident();
            let mut args = Vec::new();
            if self.at_kind(TokenKind::LParen) {
                args = self.parse_arg_list().0;
            }
            if self.at_kind(TokenKind::LBrace) {
                self.skip_balanced(TokenKind::LBrace, TokenKind::RBrace);
            }
            constants.push(ast::EnumConstant {
                range: Span::new(name.range.start, self.prev_end()),
                name: name.text,
                name_range: name.range,
                args,
            });

            if self.at_kind(TokenKind::Comma) {
                self.bump();
                continue;
            }
            if self.at_kind(TokenKind::Semi) {
                self.bump();
                break;
            }
            if self.at_kind(TokenKind::RBrace) {
                break;
            }
            self.bump();
        }
        constants
    }

    fn parse_member_decl(&mut self, enclosing_type: &str) -> Option<ast::MemberDecl> {
        let start_pos = self.pos;
        let start = self.peek()?.range.start;
        let javadoc = self.doc_at(start_pos);

        if self.at_type_decl_keyword() || self.type_decl_after_modifiers() {
            if let Some(decl) = self.parse_type_decl() {
                return Some(ast::MemberDecl::Type(decl));
            }
        }

        let modifiers = self.parse_modifiers();

        if self.at_keyword("static") && self.nth_is(1, TokenKind::LBrace) {
            self.bump();
            let body = self.parse_block();
            let range = Span::new(start, body.range.end);
            return Some(ast::MemberDecl::Initializer(ast::InitializerDecl {
                is_static: true,
                body,
                range,
            }));
        }

        if self.at_kind(TokenKind::LBrace) {
            let body = self.parse_block();
            let range = Span::new(start, body.range.end);
            return Some(ast::MemberDecl::Initializer(ast::InitializerDecl {
                is_static: false,
                body,
                range,
            }));
        }

        let (type_params, type_params_range) = if self.at_kind(TokenKind::Lt) {
            let (params, range) = self.parse_type_params();
            (params, Some(range))
        } else {
            (Vec::new(), None)
        };

        // Constructors (including compact record constructors), and methods written
        // without a return type.
        let at_ident = |name: Option<&str>| {
            self.peek()
                .is_some_and(|t| t.kind == TokenKind::Ident && name.map_or(true, |n| t.text == n))
        };
        if (at_ident(None) && self.nth_is(1, TokenKind::LParen))
            || (at_ident(Some(enclosing_type)) && self.nth_is(1, TokenKind::LBrace))
        {
            let name = self.expect_ident();
            let (params, params_range) = if self.at_kind(TokenKind::LParen) {
                self.parse_param_list()
            } else {
                (Vec::new(), Span::empty(name.range.end))
            };
            let (throws, throws_range) = self.parse_throws_clause();
            let body = self.parse_block();
            let range = Span::new(start, body.range.end);
            return Some(ast::MemberDecl::Method(ast::MethodDecl {
                modifiers,
                javadoc,
                type_params,
                type_params_range,
                return_ty: None,
                name: name.text,
                name_range: name.range,
                params,
                params_range,
                throws,
                throws_range,
                body: Some(body),
                range,
            }));
        }

        let return_ty = self.parse_type_ref()?;
        if !self.at_kind(TokenKind::Ident) {
            tracing::trace!(
                target: "mend.syntax",
                offset = return_ty.range.start,
                "member without a name"
            );
            return None;
        }
        let name = self.expect_ident();

        if self.at_kind(TokenKind::LParen) {
            let (params, params_range) = self.parse_param_list();
            while self.at_kind(TokenKind::LBracket) && self.nth_is(1, TokenKind::RBracket) {
                self.bump();
                self.bump();
            }
            let (throws, throws_range) = self.parse_throws_clause();
            if self.at_keyword("default") {
                // Annotation type element default value: `int value() default 1;`
                self.bump();
                self.parse_var_init();
            }

            let body = if self.at_kind(TokenKind::LBrace) {
                Some(self.parse_block())
            } else {
                self.expect_kind(TokenKind::Semi);
                None
            };

            let end = body
                .as_ref()
                .map(|b| b.range.end)
                .unwrap_or_else(|| self.prev_end());
            let range = Span::new(start, end);
            return Some(ast::MemberDecl::Method(ast::MethodDecl {
                modifiers,
                javadoc,
                type_params,
                type_params_range,
                return_ty: Some(return_ty),
                name: name.text,
                name_range: name.range,
                params,
                params_range,
                throws,
                throws_range,
                body,
                range,
            }));
        }

        // Field: rewind to the name and parse the declarator list.
        self.pos -= 1;
        let declarators = self.parse_var_declarators();
        let semi = self.expect_kind(TokenKind::Semi);
        let range = Span::new(start, semi.range.end);
        Some(ast::MemberDecl::Field(ast::FieldDecl {
            modifiers,
            javadoc,
            ty: return_ty,
            declarators,
            range,
        }))
    }

    fn type_decl_after_modifiers(&mut self) -> bool {
        let save = self.pos;
        self.parse_modifiers();
        let result = self.at_type_decl_keyword();
        self.pos = save;
        result
    }

    fn parse_throws_clause(&mut self) -> (Vec<ast::TypeRef>, Option<Span>) {
        if !self.at_keyword("throws") {
            return (Vec::new(), None);
        }
        let kw = self.bump().map(|t| t.range).unwrap_or_default();
        let types = self.parse_type_ref_list();
        let end = types.last().map(|t| t.range.end).unwrap_or(kw.end);
        (types, Some(Span::new(kw.start, end)))
    }

    pub(crate) fn parse_type_ref(&mut self) -> Option<ast::TypeRef> {
        self.parse_type_ref_inner(true)
    }

    fn parse_type_ref_inner(&mut self, with_dims: bool) -> Option<ast::TypeRef> {
        let first = self.peek()?;
        if first.kind != TokenKind::Ident || NON_TYPE_KEYWORDS.contains(&first.text.as_str()) {
            return None;
        }
        let first = self.expect_ident();
        let start = first.range.start;
        let mut end = first.range.end;
        let mut text = first.text;

        loop {
            if self.at_kind(TokenKind::Lt) {
                let (generic_text, generic_end) =
                    self.collect_balanced(TokenKind::Lt, TokenKind::Gt);
                text.push_str(&generic_text);
                end = generic_end;
            }
            if self.at_kind(TokenKind::Dot) && self.nth_is(1, TokenKind::Ident) {
                let is_class_lit = self.peek_n(1).is_some_and(|t| t.text == "class");
                if is_class_lit {
                    break;
                }
                self.bump();
                let part = self.expect_ident();
                text.push('.');
                text.push_str(&part.text);
                end = part.range.end;
                continue;
            }
            break;
        }

        if with_dims {
            while self.at_kind(TokenKind::LBracket) && self.nth_is(1, TokenKind::RBracket) {
                self.bump();
                let rb = self.expect_kind(TokenKind::RBracket);
                text.push_str("[]");
                end = rb.range.end;
            }
        }

        Some(ast::TypeRef {
            text,
            range: Span::new(start, end),
        })
    }

    fn parse_param_list(&mut self) -> (Vec<ast::Param>, Span) {
        let lparen = self.expect_kind(TokenKind::LParen);
        let mut params = Vec::new();
        while !self.is_eof() && !self.at_kind(TokenKind::RParen) {
            let before = self.pos;
            let param_start = self.current_start();
            let modifiers = self.parse_modifiers();
            if let Some(mut ty) = self.parse_type_ref() {
                let mut varargs = false;
                if self.at_kind(TokenKind::Ellipsis) {
                    let dots = self.bump().map(|t| t.range.end).unwrap_or(ty.range.end);
                    ty.text.push_str("...");
                    ty.range = Span::new(ty.range.start, dots);
                    varargs = true;
                }

                let name = self.expect_ident();
                while self.at_kind(TokenKind::LBracket) && self.nth_is(1, TokenKind::RBracket) {
                    self.bump();
                    self.bump();
                    ty.text.push_str("[]");
                }
                let range = Span::new(param_start.min(ty.range.start), self.prev_end());
                params.push(ast::Param {
                    modifiers,
                    ty,
                    varargs,
                    name: name.text,
                    name_range: name.range,
                    range,
                });
            }

            if self.at_kind(TokenKind::Comma) {
                self.bump();
            } else if self.pos == before {
                self.bump();
            }
        }
        let rparen = self.expect_kind(TokenKind::RParen);
        (params, Span::new(lparen.range.start, rparen.range.end))
    }

    fn parse_var_declarators(&mut self) -> Vec<ast::VarDeclarator> {
        let mut declarators = Vec::new();
        loop {
            if !self.at_kind(TokenKind::Ident) {
                break;
            }
            let name = self.expect_ident();
            let mut dims = 0;
            while self.at_kind(TokenKind::LBracket) && self.nth_is(1, TokenKind::RBracket) {
                self.bump();
                self.bump();
                dims += 1;
            }
            let mut init = None;
            if self.at_kind(TokenKind::Eq) {
                self.bump();
                init = Some(self.parse_var_init());
            }
            declarators.push(ast::VarDeclarator {
                range: Span::new(name.range.start, self.prev_end()),
                name: name.text,
                name_range: name.range,
                dims,
                init,
            });
            if self.at_kind(TokenKind::Comma) {
                self.bump();
                continue;
            }
            break;
        }
        declarators
    }

    fn parse_var_init(&mut self) -> ast::Expr {
        if self.at_kind(TokenKind::LBrace) {
            return ast::Expr::ArrayInit(self.parse_array_init());
        }
        self.parse_expr_or_missing()
    }

    fn parse_array_init(&mut self) -> ast::ArrayInitExpr {
        let lbrace = self.expect_kind(TokenKind::LBrace);
        let mut elements = Vec::new();
        while !self.is_eof() && !self.at_kind(TokenKind::RBrace) {
            let before = self.pos;
            elements.push(self.parse_var_init());
            if self.at_kind(TokenKind::Comma) {
                self.bump();
            } else if self.pos == before {
                self.bump();
            }
        }
        let rbrace = self.expect_kind(TokenKind::RBrace);
        ast::ArrayInitExpr {
            elements,
            range: Span::new(lbrace.range.start, rbrace.range.end),
        }
    }

    // ------------------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------------------

    pub(crate) fn parse_block(&mut self) -> ast::Block {
        let lbrace = self.expect_kind(TokenKind::LBrace);
        let start = lbrace.range.start;
        let mut statements = Vec::new();
        while !self.is_eof() && !self.at_kind(TokenKind::RBrace) {
            let before = self.pos;
            if let Some(stmt) = self.parse_stmt() {
                statements.push(stmt);
            }
            if self.pos == before {
                self.bump();
            }
        }
        let rbrace = self.expect_kind(TokenKind::RBrace);
        ast::Block {
            statements,
            range: Span::new(start, rbrace.range.end),
        }
    }

    fn parse_stmt(&mut self) -> Option<ast::Stmt> {
        let tok = self.peek()?.clone();

        match tok.kind {
            TokenKind::Semi => {
                self.bump();
                return Some(ast::Stmt::Empty(tok.range));
            }
            TokenKind::LBrace => return Some(ast::Stmt::Block(self.parse_block())),
            TokenKind::Ident | TokenKind::At => {}
            _ => return Some(self.parse_expr_stmt()),
        }

        if self.nth_is(1, TokenKind::Colon)
            && !NON_TYPE_KEYWORDS.contains(&tok.text.as_str())
            && tok.text != "default"
        {
            self.bump();
            self.bump();
            let body = self.parse_stmt().unwrap_or(ast::Stmt::Empty(Span::empty(self.prev_end())));
            return Some(ast::Stmt::Labeled(ast::LabeledStmt {
                label: tok.text,
                range: Span::new(tok.range.start, body.range().end),
                body: Box::new(body),
            }));
        }

        match tok.text.as_str() {
            "return" => {
                self.bump();
                let expr = if self.at_kind(TokenKind::Semi) {
                    None
                } else {
                    Some(self.parse_expr_or_missing())
                };
                let semi = self.expect_kind(TokenKind::Semi);
                Some(ast::Stmt::Return(ast::ReturnStmt {
                    expr,
                    range: Span::new(tok.range.start, semi.range.end),
                }))
            }
            "throw" => {
                self.bump();
                let expr = self.parse_expr_or_missing();
                let semi = self.expect_kind(TokenKind::Semi);
                Some(ast::Stmt::Throw(ast::ThrowStmt {
                    expr,
                    range: Span::new(tok.range.start, semi.range.end),
                }))
            }
            "if" => {
                self.bump();
                let cond = self.parse_paren_expr();
                let then_branch = self.parse_sub_stmt();
                let else_branch = if self.at_keyword("else") {
                    self.bump();
                    Some(Box::new(self.parse_sub_stmt()))
                } else {
                    None
                };
                let end = else_branch
                    .as_ref()
                    .map(|s| s.range().end)
                    .unwrap_or_else(|| then_branch.range().end);
                Some(ast::Stmt::If(ast::IfStmt {
                    cond,
                    then_branch: Box::new(then_branch),
                    else_branch,
                    range: Span::new(tok.range.start, end),
                }))
            }
            "while" => {
                self.bump();
                let cond = self.parse_paren_expr();
                let body = self.parse_sub_stmt();
                Some(ast::Stmt::While(ast::WhileStmt {
                    cond,
                    range: Span::new(tok.range.start, body.range().end),
                    body: Box::new(body),
                }))
            }
            "do" => {
                self.bump();
                let body = self.parse_sub_stmt();
                if self.at_keyword("while") {
                    self.bump();
                }
                let cond = self.parse_paren_expr();
                let semi = self.expect_kind(TokenKind::Semi);
                Some(ast::Stmt::Do(ast::DoStmt {
                    body: Box::new(body),
                    cond,
                    range: Span::new(tok.range.start, semi.range.end),
                }))
            }
            "for" => Some(self.parse_for_stmt()),
            "try" => Some(self.parse_try_stmt()),
            "switch" if self.nth_is(1, TokenKind::LParen) => Some(self.parse_switch_stmt()),
            "synchronized" if self.nth_is(1, TokenKind::LParen) => {
                self.bump();
                let lock = self.parse_paren_expr();
                let body = self.parse_block();
                Some(ast::Stmt::Sync(ast::SyncStmt {
                    lock,
                    range: Span::new(tok.range.start, body.range.end),
                    body,
                }))
            }
            "break" | "continue" | "assert" => Some(self.skip_opaque_stmt()),
            "yield" if !self.nth_is(1, TokenKind::Eq) && !self.nth_is(1, TokenKind::Dot) => {
                Some(self.skip_opaque_stmt())
            }
            _ => {
                if self.at_type_decl_keyword() || self.type_decl_after_modifiers() {
                    if let Some(decl) = self.parse_type_decl() {
                        return Some(ast::Stmt::LocalType(Box::new(decl)));
                    }
                }
                if let Some(local) = self.try_parse_local_var_stmt() {
                    return Some(ast::Stmt::LocalVar(local));
                }
                Some(self.parse_expr_stmt())
            }
        }
    }

    fn parse_sub_stmt(&mut self) -> ast::Stmt {
        let at = self.prev_end();
        self.parse_stmt().unwrap_or(ast::Stmt::Empty(Span::empty(at)))
    }

    fn parse_expr_stmt(&mut self) -> ast::Stmt {
        let start = self.current_start();
        let expr = self.parse_expr_or_missing();
        let semi = self.expect_kind(TokenKind::Semi);
        ast::Stmt::Expr(ast::ExprStmt {
            range: Span::new(start.min(expr.range().start), semi.range.end.max(expr.range().end)),
            expr,
        })
    }

    fn skip_opaque_stmt(&mut self) -> ast::Stmt {
        let start = self.current_start();
        while !self.is_eof() && !self.at_kind(TokenKind::Semi) && !self.at_kind(TokenKind::RBrace) {
            if self.at_kind(TokenKind::LParen) {
                self.skip_balanced(TokenKind::LParen, TokenKind::RParen);
                continue;
            }
            self.bump();
        }
        let semi = self.expect_kind(TokenKind::Semi);
        ast::Stmt::Other(Span::new(start, semi.range.end))
    }

    fn parse_paren_expr(&mut self) -> ast::Expr {
        self.expect_kind(TokenKind::LParen);
        let expr = self.parse_expr_or_missing();
        self.expect_kind(TokenKind::RParen);
        expr
    }

    fn try_parse_local_var_decl(&mut self) -> Option<ast::LocalVarStmt> {
        let start_pos = self.pos;
        let start = self.peek()?.range.start;

        let modifiers = self.parse_modifiers();
        let ty = match self.parse_type_ref() {
            Some(ty) => ty,
            None => {
                self.pos = start_pos;
                return None;
            }
        };

        let follows = self.peek_n(1).map(|t| t.kind);
        if !self.at_kind(TokenKind::Ident)
            || !matches!(
                follows,
                Some(TokenKind::Eq | TokenKind::Semi | TokenKind::Comma | TokenKind::LBracket)
            )
        {
            self.pos = start_pos;
            return None;
        }

        let declarators = self.parse_var_declarators();
        let start = modifiers.start().unwrap_or(start).min(ty.range.start);
        Some(ast::LocalVarStmt {
            modifiers,
            ty,
            declarators,
            range: Span::new(start, self.prev_end()),
        })
    }

    fn try_parse_local_var_stmt(&mut self) -> Option<ast::LocalVarStmt> {
        let mut local = self.try_parse_local_var_decl()?;
        let semi = self.expect_kind(TokenKind::Semi);
        local.range = Span::new(local.range.start, semi.range.end);
        Some(local)
    }

    fn parse_for_stmt(&mut self) -> ast::Stmt {
        let kw = self.bump().map(|t| t.range).unwrap_or_default();
        self.expect_kind(TokenKind::LParen);

        // Enhanced for: `for (Type name : expr)`. A lone name before the colon is kept
        // as the type of a variable with an empty name.
        let save = self.pos;
        let var_start = self.current_start();
        let modifiers = self.parse_modifiers();
        if let Some(ty) = self.parse_type_ref() {
            let named = self.at_kind(TokenKind::Ident) && self.nth_is(1, TokenKind::Colon);
            if named || self.at_kind(TokenKind::Colon) {
                let (name, name_range) = if named {
                    let name = self.expect_ident();
                    (name.text, name.range)
                } else {
                    tracing::trace!(
                        target: "mend.syntax",
                        offset = ty.range.end,
                        "foreach variable without a name"
                    );
                    (String::new(), Span::empty(ty.range.end))
                };
                self.bump();
                let iterable = self.parse_expr_or_missing();
                self.expect_kind(TokenKind::RParen);
                let body = self.parse_sub_stmt();
                let var = ast::Param {
                    modifiers,
                    range: Span::new(var_start, name_range.end),
                    ty,
                    varargs: false,
                    name,
                    name_range,
                };
                return ast::Stmt::ForEach(ast::ForEachStmt {
                    var,
                    iterable,
                    range: Span::new(kw.start, body.range().end),
                    body: Box::new(body),
                });
            }
        }
        self.pos = save;

        let mut init = Vec::new();
        if let Some(local) = self.try_parse_local_var_decl() {
            init.push(ast::Stmt::LocalVar(local));
        } else {
            while !self.is_eof()
                && !self.at_kind(TokenKind::Semi)
                && !self.at_kind(TokenKind::RParen)
            {
                let before = self.pos;
                let expr = self.parse_expr_or_missing();
                let range = expr.range();
                init.push(ast::Stmt::Expr(ast::ExprStmt { expr, range }));
                if self.at_kind(TokenKind::Comma) {
                    self.bump();
                } else if self.pos == before {
                    self.bump();
                }
            }
        }
        self.expect_kind(TokenKind::Semi);
        let cond = if self.at_kind(TokenKind::Semi) {
            None
        } else {
            Some(self.parse_expr_or_missing())
        };
        self.expect_kind(TokenKind::Semi);
        let mut update = Vec::new();
        while !self.is_eof() && !self.at_kind(TokenKind::RParen) {
            let before = self.pos;
            update.push(self.parse_expr_or_missing());
            if self.at_kind(TokenKind::Comma) {
                self.bump();
            } else if self.pos == before {
                self.bump();
            }
        }
        self.expect_kind(TokenKind::RParen);
        let body = self.parse_sub_stmt();
        ast::Stmt::For(ast::ForStmt {
            init,
            cond,
            update,
            range: Span::new(kw.start, body.range().end),
            body: Box::new(body),
        })
    }

    fn parse_try_stmt(&mut self) -> ast::Stmt {
        let kw = self.bump().map(|t| t.range).unwrap_or_default();
        let mut resources = Vec::new();
        let mut resources_range = None;
        if self.at_kind(TokenKind::LParen) {
            let lparen = self.expect_kind(TokenKind::LParen);
            while !self.is_eof() && !self.at_kind(TokenKind::RParen) {
                let before = self.pos;
                if let Some(decl) = self.try_parse_local_var_decl() {
                    resources.push(ast::Resource::Decl(decl));
                } else {
                    resources.push(ast::Resource::Expr(self.parse_expr_or_missing()));
                }
                if self.at_kind(TokenKind::Semi) {
                    self.bump();
                } else if self.pos == before {
                    self.bump();
                }
            }
            let rparen = self.expect_kind(TokenKind::RParen);
            resources_range = Some(Span::new(lparen.range.start, rparen.range.end));
        }

        let body = self.parse_block();
        let mut catches = Vec::new();
        while self.at_keyword("catch") {
            let catch_kw = self.bump().map(|t| t.range).unwrap_or_default();
            self.expect_kind(TokenKind::LParen);
            self.parse_modifiers();
            let mut types = Vec::new();
            while let Some(ty) = self.parse_type_ref() {
                types.push(ty);
                if self.at_op("|") {
                    self.bump();
                } else {
                    break;
                }
            }
            let name = self.expect_ident();
            self.expect_kind(TokenKind::RParen);
            let block = self.parse_block();
            catches.push(ast::CatchClause {
                types,
                name: name.text,
                name_range: name.range,
                range: Span::new(catch_kw.start, block.range.end),
                body: block,
            });
        }
        let finally = if self.at_keyword("finally") {
            self.bump();
            Some(self.parse_block())
        } else {
            None
        };

        let end = finally
            .as_ref()
            .map(|b| b.range.end)
            .or_else(|| catches.last().map(|c| c.range.end))
            .unwrap_or(body.range.end);
        ast::Stmt::Try(ast::TryStmt {
            resources,
            resources_range,
            body,
            catches,
            finally,
            range: Span::new(kw.start, end),
        })
    }

    fn parse_switch_stmt(&mut self) -> ast::Stmt {
        let kw = self.bump().map(|t| t.range).unwrap_or_default();
        let selector = self.parse_paren_expr();
        self.expect_kind(TokenKind::LBrace);
        let mut statements = Vec::new();
        while !self.is_eof() && !self.at_kind(TokenKind::RBrace) {
            let before = self.pos;
            if self.at_keyword("case") || self.at_keyword("default") {
                // Skip the label up to `:` or `->`.
                while !self.is_eof()
                    && !self.at_kind(TokenKind::Colon)
                    && !self.at_kind(TokenKind::Arrow)
                    && !self.at_kind(TokenKind::RBrace)
                {
                    if self.at_kind(TokenKind::LParen) {
                        self.skip_balanced(TokenKind::LParen, TokenKind::RParen);
                        continue;
                    }
                    self.bump();
                }
                self.bump();
                continue;
            }
            if let Some(stmt) = self.parse_stmt() {
                statements.push(stmt);
            }
            if self.pos == before {
                self.bump();
            }
        }
        let rbrace = self.expect_kind(TokenKind::RBrace);
        ast::Stmt::Switch(ast::SwitchStmt {
            selector,
            statements,
            range: Span::new(kw.start, rbrace.range.end),
        })
    }

    // ------------------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------------------

    fn parse_expr_or_missing(&mut self) -> ast::Expr {
        let at = self.current_start();
        self.parse_expr()
            .unwrap_or(ast::Expr::Missing(Span::empty(at)))
    }

    pub(crate) fn parse_expr(&mut self) -> Option<ast::Expr> {
        if self.is_lambda_start() {
            return self.parse_lambda();
        }
        let lhs = self.parse_ternary()?;

        let assign_op = if self.at_kind(TokenKind::Eq) {
            Some((String::from("="), 1))
        } else if self
            .peek()
            .is_some_and(|t| t.kind == TokenKind::Op && ASSIGN_OPS.contains(&t.text.as_str()))
        {
            self.peek().map(|t| (t.text.clone(), 1))
        } else if self.adjacent_gts(2) && self.nth_is_op(2, ">=") {
            Some((String::from(">>>="), 3))
        } else if self.adjacent_gts(1) && self.nth_is_op(1, ">=") {
            Some((String::from(">>="), 2))
        } else {
            None
        };

        let Some((op, count)) = assign_op else {
            return Some(lhs);
        };
        for _ in 0..count {
            self.bump();
        }
        let rhs = self.parse_expr_or_missing();
        let range = Span::new(lhs.range().start, rhs.range().end.max(lhs.range().end));
        Some(ast::Expr::Assign(ast::AssignExpr {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            range,
        }))
    }

    fn nth_is_op(&self, n: usize, op: &str) -> bool {
        self.peek_n(n)
            .is_some_and(|t| t.kind == TokenKind::Op && t.text == op)
    }

    /// `true` if the next `count` tokens are `>` tokens with no whitespace between them
    /// and the token following them.
    fn adjacent_gts(&self, count: usize) -> bool {
        for i in 0..count {
            let (Some(a), Some(b)) = (self.peek_n(i), self.peek_n(i + 1)) else {
                return false;
            };
            if a.kind != TokenKind::Gt || a.range.end != b.range.start {
                return false;
            }
        }
        true
    }

    fn parse_ternary(&mut self) -> Option<ast::Expr> {
        let cond = self.parse_binary(1)?;
        if !self.at_kind(TokenKind::Question) {
            return Some(cond);
        }
        self.bump();
        let then_expr = self.parse_expr_or_missing();
        self.expect_kind(TokenKind::Colon);
        let else_expr = if self.is_lambda_start() {
            self.parse_lambda()
        } else {
            self.parse_ternary()
        }
        .unwrap_or(ast::Expr::Missing(Span::empty(self.prev_end())));
        let range = Span::new(cond.range().start, else_expr.range().end);
        Some(ast::Expr::Conditional(ast::ConditionalExpr {
            cond: Box::new(cond),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(else_expr),
            range,
        }))
    }

    /// Peek the binary operator at the cursor and how many tokens it spans.
    fn peek_binary_op(&self) -> Option<(ast::BinaryOp, usize)> {
        let tok = self.peek()?;
        let op = match tok.kind {
            TokenKind::Lt => ast::BinaryOp::Lt,
            TokenKind::Gt => {
                if self.adjacent_gts(2) && self.nth_is(2, TokenKind::Gt) {
                    return Some((ast::BinaryOp::UShr, 3));
                }
                if self.adjacent_gts(1) && self.nth_is(1, TokenKind::Gt) {
                    if self.adjacent_gts(2) && self.nth_is_op(2, ">=") {
                        return None;
                    }
                    return Some((ast::BinaryOp::Shr, 2));
                }
                if self.adjacent_gts(1) && self.nth_is_op(1, ">=") {
                    return None;
                }
                ast::BinaryOp::Gt
            }
            TokenKind::Op => match tok.text.as_str() {
                "||" => ast::BinaryOp::OrOr,
                "&&" => ast::BinaryOp::AndAnd,
                "|" => ast::BinaryOp::Or,
                "^" => ast::BinaryOp::Xor,
                "&" => ast::BinaryOp::And,
                "==" => ast::BinaryOp::EqEq,
                "!=" => ast::BinaryOp::NotEq,
                "<=" => ast::BinaryOp::Le,
                ">=" => ast::BinaryOp::Ge,
                "<<" => ast::BinaryOp::Shl,
                "+" => ast::BinaryOp::Add,
                "-" => ast::BinaryOp::Sub,
                "*" => ast::BinaryOp::Mul,
                "/" => ast::BinaryOp::Div,
                "%" => ast::BinaryOp::Rem,
                _ => return None,
            },
            _ => return None,
        };
        Some((op, 1))
    }

    fn parse_binary(&mut self, min_prec: u8) -> Option<ast::Expr> {
        let mut lhs = self.parse_unary()?;
        loop {
            if self.at_keyword("instanceof") {
                if 7 < min_prec {
                    break;
                }
                self.bump();
                self.parse_modifiers();
                let ty = self.parse_type_ref().unwrap_or(ast::TypeRef {
                    text: String::new(),
                    range: Span::empty(self.prev_end()),
                });
                // Pattern binding: `o instanceof String s`.
                if self.at_kind(TokenKind::Ident) && !self.at_keyword("instanceof") {
                    self.bump();
                }
                let range = Span::new(lhs.range().start, self.prev_end());
                lhs = ast::Expr::InstanceOf(ast::InstanceOfExpr {
                    expr: Box::new(lhs),
                    ty,
                    range,
                });
                continue;
            }

            let Some((op, count)) = self.peek_binary_op() else {
                break;
            };
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            for _ in 0..count {
                self.bump();
            }
            let rhs = self
                .parse_binary(prec + 1)
                .unwrap_or(ast::Expr::Missing(Span::empty(self.prev_end())));
            let range = Span::new(lhs.range().start, rhs.range().end.max(lhs.range().end));
            lhs = ast::Expr::Binary(ast::BinaryExpr {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                range,
            });
        }
        Some(lhs)
    }

    fn parse_unary(&mut self) -> Option<ast::Expr> {
        let tok = self.peek()?;
        if tok.kind == TokenKind::Op
            && matches!(tok.text.as_str(), "+" | "-" | "!" | "~" | "++" | "--")
        {
            let tok = self.bump()?;
            let operand = self
                .parse_unary()
                .unwrap_or(ast::Expr::Missing(Span::empty(tok.range.end)));
            let range = Span::new(tok.range.start, operand.range().end);
            return Some(ast::Expr::Unary(ast::UnaryExpr {
                op: tok.text,
                prefix: true,
                operand: Box::new(operand),
                range,
            }));
        }

        if tok.kind == TokenKind::LParen {
            if let Some(cast) = self.try_parse_cast() {
                return Some(cast);
            }
        }

        self.parse_postfix()
    }

    fn try_parse_cast(&mut self) -> Option<ast::Expr> {
        let save = self.pos;
        let lparen = self.bump()?;
        let is_primitive = self
            .peek()
            .is_some_and(|t| t.kind == TokenKind::Ident && PRIMITIVES.contains(&t.text.as_str()));
        let Some(mut ty) = self.parse_type_ref() else {
            self.pos = save;
            return None;
        };
        while self.at_op("&") {
            self.bump();
            if let Some(extra) = self.parse_type_ref() {
                ty.text.push_str(" & ");
                ty.text.push_str(&extra.text);
                ty.range = Span::new(ty.range.start, extra.range.end);
            }
        }
        if !self.at_kind(TokenKind::RParen) {
            self.pos = save;
            return None;
        }
        self.bump();

        let starts_operand = self.peek().is_some_and(|t| match t.kind {
            TokenKind::Ident => t.text != "instanceof",
            TokenKind::IntLiteral
            | TokenKind::LongLiteral
            | TokenKind::FloatLiteral
            | TokenKind::DoubleLiteral
            | TokenKind::CharLiteral
            | TokenKind::StringLiteral
            | TokenKind::LParen => true,
            TokenKind::Op => {
                matches!(t.text.as_str(), "!" | "~")
                    || (is_primitive && matches!(t.text.as_str(), "+" | "-" | "++" | "--"))
            }
            _ => false,
        });
        if !starts_operand {
            self.pos = save;
            return None;
        }

        let operand = if self.is_lambda_start() {
            self.parse_lambda()
        } else {
            self.parse_unary()
        }
        .unwrap_or(ast::Expr::Missing(Span::empty(self.prev_end())));
        let range = Span::new(lparen.range.start, operand.range().end);
        Some(ast::Expr::Cast(ast::CastExpr {
            ty,
            expr: Box::new(operand),
            range,
        }))
    }

    fn parse_postfix(&mut self) -> Option<ast::Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.at_kind(TokenKind::Dot) {
                self.bump();
                if self.at_kind(TokenKind::Lt) {
                    self.skip_balanced(TokenKind::Lt, TokenKind::Gt);
                }
                if self.at_keyword("new") {
                    // Qualified inner class creation: `outer.new Inner()`.
                    expr = self.parse_primary()?;
                    continue;
                }
                if self.at_keyword("class") {
                    let kw = self.bump()?;
                    let ty = ast::TypeRef {
                        text: crate::render::flatten_expr(&expr),
                        range: expr.range(),
                    };
                    expr = ast::Expr::ClassLit(ast::ClassLitExpr {
                        ty,
                        range: Span::new(expr.range().start, kw.range.end),
                    });
                    continue;
                }
                if self.at_keyword("this") {
                    let kw = self.bump()?;
                    expr = ast::Expr::This(Span::new(expr.range().start, kw.range.end));
                    continue;
                }
                let name = self.expect_ident();
                if self.at_kind(TokenKind::LParen) {
                    let (args, args_range) = self.parse_arg_list();
                    let range = Span::new(expr.range().start, args_range.end);
                    expr = ast::Expr::Call(ast::CallExpr {
                        receiver: Some(Box::new(expr)),
                        name: name.text,
                        name_range: name.range,
                        args,
                        args_range,
                        range,
                    });
                } else {
                    let range = Span::new(expr.range().start, name.range.end.max(expr.range().end));
                    expr = ast::Expr::FieldAccess(ast::FieldAccessExpr {
                        receiver: Box::new(expr),
                        name: name.text,
                        name_range: name.range,
                        range,
                    });
                }
                continue;
            }

            if self.at_kind(TokenKind::LBracket) {
                if self.nth_is(1, TokenKind::RBracket) {
                    // `String[].class`
                    let mut text = crate::render::flatten_expr(&expr);
                    while self.at_kind(TokenKind::LBracket) && self.nth_is(1, TokenKind::RBracket) {
                        self.bump();
                        self.bump();
                        text.push_str("[]");
                    }
                    if self.at_kind(TokenKind::Dot)
                        && self.peek_n(1).is_some_and(|t| t.text == "class")
                    {
                        self.bump();
                        let kw = self.bump()?;
                        expr = ast::Expr::ClassLit(ast::ClassLitExpr {
                            ty: ast::TypeRef {
                                text,
                                range: expr.range(),
                            },
                            range: Span::new(expr.range().start, kw.range.end),
                        });
                        continue;
                    }
                    break;
                }
                self.bump();
                let index = self.parse_expr_or_missing();
                let rb = self.expect_kind(TokenKind::RBracket);
                let range = Span::new(expr.range().start, rb.range.end.max(index.range().end));
                expr = ast::Expr::ArrayAccess(ast::ArrayAccessExpr {
                    array: Box::new(expr),
                    index: Box::new(index),
                    range,
                });
                continue;
            }

            if self.at_kind(TokenKind::ColonColon) {
                self.bump();
                if self.at_kind(TokenKind::Lt) {
                    self.skip_balanced(TokenKind::Lt, TokenKind::Gt);
                }
                let name = self.bump().map(|t| (t.text, t.range.end)).unwrap_or_default();
                let range = Span::new(expr.range().start, name.1.max(expr.range().end));
                expr = ast::Expr::MethodRef(ast::MethodRefExpr {
                    target: Box::new(expr),
                    name: name.0,
                    range,
                });
                continue;
            }

            if self.at_op("++") || self.at_op("--") {
                let tok = self.bump()?;
                let range = Span::new(expr.range().start, tok.range.end);
                expr = ast::Expr::Unary(ast::UnaryExpr {
                    op: tok.text,
                    prefix: false,
                    operand: Box::new(expr),
                    range,
                });
                continue;
            }

            break;
        }
        Some(expr)
    }

    fn literal(kind: ast::LiteralKind, tok: Token) -> ast::Expr {
        ast::Expr::Literal(ast::LiteralExpr {
            kind,
            value: tok.text,
            range: tok.range,
        })
    }

    fn parse_primary(&mut self) -> Option<ast::Expr> {
        let tok = self.peek()?.clone();
        match tok.kind {
            TokenKind::RParen
            | TokenKind::RBrace
            | TokenKind::RBracket
            | TokenKind::Semi
            | TokenKind::Comma => {
                return None;
            }
            _ => {}
        }
        let tok = self.bump()?;
        let expr = match tok.kind {
            TokenKind::IntLiteral => Self::literal(ast::LiteralKind::Int, tok),
            TokenKind::LongLiteral => Self::literal(ast::LiteralKind::Long, tok),
            TokenKind::FloatLiteral => Self::literal(ast::LiteralKind::Float, tok),
            TokenKind::DoubleLiteral => Self::literal(ast::LiteralKind::Double, tok),
            TokenKind::CharLiteral => Self::literal(ast::LiteralKind::Char, tok),
            TokenKind::StringLiteral => Self::literal(ast::LiteralKind::String, tok),
            TokenKind::LParen => {
                let inner = self.parse_expr_or_missing();
                let rparen = self.expect_kind(TokenKind::RParen);
                ast::Expr::Paren(ast::ParenExpr {
                    range: Span::new(tok.range.start, rparen.range.end.max(inner.range().end)),
                    inner: Box::new(inner),
                })
            }
            TokenKind::LBrace => {
                self.pos -= 1;
                ast::Expr::ArrayInit(self.parse_array_init())
            }
            TokenKind::Ident => match tok.text.as_str() {
                "true" | "false" => Self::literal(ast::LiteralKind::Bool, tok),
                "null" => Self::literal(ast::LiteralKind::Null, tok),
                "new" => self.parse_new(tok.range.start),
                "switch" if self.at_kind(TokenKind::LParen) => {
                    self.skip_balanced(TokenKind::LParen, TokenKind::RParen);
                    self.skip_balanced(TokenKind::LBrace, TokenKind::RBrace);
                    ast::Expr::Missing(Span::new(tok.range.start, self.prev_end()))
                }
                "this" | "super" if self.at_kind(TokenKind::LParen) => {
                    let (args, args_range) = self.parse_arg_list();
                    ast::Expr::Call(ast::CallExpr {
                        receiver: None,
                        name: tok.text,
                        name_range: tok.range,
                        args,
                        args_range,
                        range: Span::new(tok.range.start, args_range.end),
                    })
                }
                "this" => ast::Expr::This(tok.range),
                "super" => ast::Expr::Super(tok.range),
                name if PRIMITIVES.contains(&name) => {
                    // `int.class`, `int[].class`
                    let mut text = tok.text.clone();
                    while self.at_kind(TokenKind::LBracket) && self.nth_is(1, TokenKind::RBracket) {
                        self.bump();
                        self.bump();
                        text.push_str("[]");
                    }
                    if self.at_kind(TokenKind::Dot)
                        && self.peek_n(1).is_some_and(|t| t.text == "class")
                    {
                        self.bump();
                        let kw = self.bump()?;
                        ast::Expr::ClassLit(ast::ClassLitExpr {
                            ty: ast::TypeRef {
                                text,
                                range: tok.range,
                            },
                            range: Span::new(tok.range.start, kw.range.end),
                        })
                    } else {
                        ast::Expr::Name(ast::NameExpr {
                            name: tok.text,
                            range: tok.range,
                        })
                    }
                }
                _ => {
                    if self.at_kind(TokenKind::LParen) {
                        let (args, args_range) = self.parse_arg_list();
                        ast::Expr::Call(ast::CallExpr {
                            receiver: None,
                            name: tok.text,
                            name_range: tok.range,
                            args,
                            args_range,
                            range: Span::new(tok.range.start, args_range.end),
                        })
                    } else {
                        ast::Expr::Name(ast::NameExpr {
                            name: tok.text,
                            range: tok.range,
                        })
                    }
                }
            },
            _ => {
                tracing::trace!(
                    target: "mend.syntax",
                    token = %tok.text,
                    offset = tok.range.start,
                    "unexpected token in expression"
                );
                ast::Expr::Missing(tok.range)
            }
        };
        Some(expr)
    }

    fn parse_new(&mut self, start: usize) -> ast::Expr {
        if self.at_kind(TokenKind::Lt) {
            self.skip_balanced(TokenKind::Lt, TokenKind::Gt);
        }
        self.parse_modifiers();
        let Some(ty) = self.parse_type_ref_inner(false) else {
            return ast::Expr::Missing(Span::new(start, self.prev_end()));
        };

        if self.at_kind(TokenKind::LBracket) {
            let mut dims = Vec::new();
            while self.at_kind(TokenKind::LBracket) {
                self.bump();
                if self.at_kind(TokenKind::RBracket) {
                    self.bump();
                    dims.push(None);
                } else {
                    let dim = self.parse_expr_or_missing();
                    self.expect_kind(TokenKind::RBracket);
                    dims.push(Some(dim));
                }
            }
            let init = if self.at_kind(TokenKind::LBrace) {
                Some(self.parse_array_init())
            } else {
                None
            };
            return ast::Expr::NewArray(ast::NewArrayExpr {
                elem_ty: ty,
                dims,
                init,
                range: Span::new(start, self.prev_end()),
            });
        }

        let (args, args_range) = if self.at_kind(TokenKind::LParen) {
            self.parse_arg_list()
        } else {
            (Vec::new(), Span::empty(self.prev_end()))
        };
        let body = if self.at_kind(TokenKind::LBrace) {
            self.bump();
            let members = self.parse_members("");
            self.expect_kind(TokenKind::RBrace);
            Some(members)
        } else {
            None
        };
        ast::Expr::New(ast::NewExpr {
            ty,
            args,
            args_range,
            body,
            range: Span::new(start, self.prev_end()),
        })
    }

    fn parse_arg_list(&mut self) -> (Vec<ast::Expr>, Span) {
        let lparen = self.expect_kind(TokenKind::LParen);
        let mut args = Vec::new();
        while !self.is_eof() && !self.at_kind(TokenKind::RParen) {
            let before = self.pos;
            if let Some(expr) = self.parse_expr() {
                args.push(expr);
            }
            if self.at_kind(TokenKind::Comma) {
                self.bump();
            } else if self.at_kind(TokenKind::Semi) || self.at_kind(TokenKind::RBrace) {
                break;
            } else if self.pos == before {
                self.bump();
            }
        }
        let rparen = self.expect_kind(TokenKind::RParen);
        let end = if rparen.range.is_empty() {
            self.prev_end()
        } else {
            rparen.range.end
        };
        (args, Span::new(lparen.range.start, end))
    }

    fn is_lambda_start(&self) -> bool {
        match self.peek().map(|t| t.kind) {
            Some(TokenKind::Ident) => self.nth_is(1, TokenKind::Arrow),
            Some(TokenKind::LParen) => self
                .matching_close(TokenKind::LParen, TokenKind::RParen)
                .and_then(|idx| self.tokens.get(idx + 1))
                .is_some_and(|t| t.kind == TokenKind::Arrow),
            _ => false,
        }
    }

    fn parse_lambda(&mut self) -> Option<ast::Expr> {
        let start = self.current_start();
        let mut params = Vec::new();
        if self.at_kind(TokenKind::Ident) {
            let name = self.expect_ident();
            params.push(ast::LambdaParam {
                ty: None,
                name: name.text,
                name_range: name.range,
            });
        } else {
            self.expect_kind(TokenKind::LParen);
            while !self.is_eof() && !self.at_kind(TokenKind::RParen) {
                let before = self.pos;
                self.parse_modifiers();
                let untyped = self.at_kind(TokenKind::Ident)
                    && (self.nth_is(1, TokenKind::Comma) || self.nth_is(1, TokenKind::RParen));
                if untyped {
                    let name = self.expect_ident();
                    params.push(ast::LambdaParam {
                        ty: None,
                        name: name.text,
                        name_range: name.range,
                    });
                } else if let Some(ty) = self.parse_type_ref() {
                    if self.at_kind(TokenKind::Ellipsis) {
                        self.bump();
                    }
                    let name = self.expect_ident();
                    params.push(ast::LambdaParam {
                        ty: Some(ty),
                        name: name.text,
                        name_range: name.range,
                    });
                }
                if self.at_kind(TokenKind::Comma) {
                    self.bump();
                } else if self.pos == before {
                    self.bump();
                }
            }
            self.expect_kind(TokenKind::RParen);
        }
        self.expect_kind(TokenKind::Arrow);
        let body = if self.at_kind(TokenKind::LBrace) {
            ast::LambdaBody::Block(self.parse_block())
        } else {
            ast::LambdaBody::Expr(Box::new(self.parse_expr_or_missing()))
        };
        Some(ast::Expr::Lambda(ast::LambdaExpr {
            params,
            body,
            range: Span::new(start, self.prev_end()),
        }))
    }
}
