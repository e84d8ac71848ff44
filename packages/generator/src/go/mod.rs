/**
 * Go Source Module
 *
 * Lexer, declaration parser and comment extraction for Go source files.
 */
pub mod ast;
pub mod comments;
pub mod lexer;
pub mod parser;

pub use ast::*;
pub use comments::{extract_comment_lines, CommentLine};
pub use lexer::Lexer;
pub use parser::Parser;
