//! Comment Extraction
//!
//! Pulls the text lines out of every comment in a Go file, with the comment
//! markers removed.

use super::lexer::{Comment, Lexer};
use crate::error::GoSyntaxError;

/// One line of comment text, tagged with its source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentLine {
    pub line: usize,
    pub text: String,
}

/// Strip `//`, `/*` and `*/` and split the comment into lines.
pub fn comment_text(comment: &Comment) -> Vec<String> {
    if let Some(body) = comment.text.strip_prefix("//") {
        return vec![body.to_string()];
    }
    let body = comment
        .text
        .strip_prefix("/*")
        .and_then(|rest| rest.strip_suffix("*/"))
        .unwrap_or(&comment.text);
    body.lines()
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect()
}

/// Every comment line of a Go source file, in source order.
pub fn extract_comment_lines(source: &str) -> Result<Vec<CommentLine>, GoSyntaxError> {
    let lexed = Lexer::new().tokenize(source)?;
    let mut lines = Vec::new();
    for comment in &lexed.comments {
        for (offset, text) in comment_text(comment).into_iter().enumerate() {
            lines.push(CommentLine {
                line: comment.line + offset,
                text,
            });
        }
    }
    Ok(lines)
}
