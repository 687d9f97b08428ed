//! Error-tolerant Java parsing for the correction engine.
//!
//! The parser is a small recursive-descent parser over a hand-written lexer. It produces
//! an owned AST with byte spans and never fails; unparseable regions become
//! `Expr::Missing` or `Stmt::Other` nodes.

pub mod ast;
pub mod javadoc;
mod lexer;
mod outline;
mod parser;
pub mod render;
pub mod visit;

pub use outline::{outline, OutlineItem};

use lexer::Lexer;
use parser::Parser;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parse {
    compilation_unit: ast::CompilationUnit,
}

impl Parse {
    #[must_use]
    pub fn compilation_unit(&self) -> &ast::CompilationUnit {
        &self.compilation_unit
    }

    #[must_use]
    pub fn into_compilation_unit(self) -> ast::CompilationUnit {
        self.compilation_unit
    }
}

#[must_use]
pub fn parse(text: &str) -> Parse {
    let tokens = Lexer::new(text, 0).collect();
    let mut parser = Parser::new(text, tokens);
    let compilation_unit = parser.parse_compilation_unit(text.len());
    Parse { compilation_unit }
}

/// Parse a standalone expression, such as a field initializer or default value.
#[must_use]
pub fn parse_expression(text: &str) -> Option<ast::Expr> {
    let tokens = Lexer::new(text, 0).collect();
    let mut parser = Parser::new(text, tokens);
    parser.parse_expr()
}

/// Parse a standalone type reference such as `Map<String, List<Integer>>[]`.
#[must_use]
pub fn parse_type_ref(text: &str) -> Option<ast::TypeRef> {
    let tokens = Lexer::new(text, 0).collect();
    let mut parser = Parser::new(text, tokens);
    parser.parse_type_ref()
}
