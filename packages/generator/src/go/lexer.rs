/**
 * Go Lexer
 *
 * Tokenizes Go source text, applying Go's automatic semicolon insertion and
 * collecting comments on the side.
 */
use crate::chars;
use crate::error::GoSyntaxError;

/// Token kinds produced by the Go lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    Keyword,
    Int,
    Float,
    Imaginary,
    Rune,
    String,
    Operator,
    /// Explicit `;` or one inserted at a line break
    Semicolon,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub offset: usize,
    pub line: usize,
}

impl Token {
    pub fn is_identifier(&self) -> bool {
        self.kind == TokenKind::Identifier
    }

    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text == keyword
    }

    pub fn is_operator(&self, operator: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == operator
    }

    pub fn is_semicolon(&self) -> bool {
        self.kind == TokenKind::Semicolon
    }

    fn triggers_semicolon(&self) -> bool {
        match self.kind {
            TokenKind::Identifier
            | TokenKind::Int
            | TokenKind::Float
            | TokenKind::Imaginary
            | TokenKind::Rune
            | TokenKind::String => true,
            TokenKind::Keyword => matches!(
                self.text.as_str(),
                "break" | "continue" | "fallthrough" | "return"
            ),
            TokenKind::Operator => matches!(self.text.as_str(), "++" | "--" | ")" | "]" | "}"),
            TokenKind::Semicolon => false,
        }
    }
}

/// Comment as written in the source, markers included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    pub offset: usize,
    pub line: usize,
}

impl Comment {
    pub fn is_line_comment(&self) -> bool {
        self.text.starts_with("//")
    }
}

/// Output of a scan: the token stream and every comment.
#[derive(Debug, Clone, Default)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    pub comments: Vec<Comment>,
}

const KEYWORDS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else",
    "fallthrough", "for", "func", "go", "goto", "if", "import", "interface", "map",
    "package", "range", "return", "select", "struct", "switch", "type", "var",
];

// Longest operators first so the first prefix match wins.
const OPERATORS: &[&str] = &[
    "<<=", ">>=", "&^=", "...", "&&", "||", "<-", "++", "--", "==", "!=", "<=", ">=", ":=",
    "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<", ">>", "&^", "+", "-", "*", "/",
    "%", "&", "|", "^", "<", ">", "=", "!", "(", ")", "[", "]", "{", "}", ",", ".", ":",
    "~",
];

/// Go lexer
pub struct Lexer;

impl Lexer {
    pub fn new() -> Self {
        Lexer
    }

    pub fn tokenize(&self, text: &str) -> Result<Lexed, GoSyntaxError> {
        Scanner::new(text).scan()
    }
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}

struct Scanner<'a> {
    input: &'a str,
    index: usize,
    line: usize,
    lexed: Lexed,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        let index = if input.starts_with(chars::BOM) {
            chars::BOM.len_utf8()
        } else {
            0
        };
        Scanner {
            input,
            index,
            line: 1,
            lexed: Lexed::default(),
        }
    }

    fn peek(&self) -> char {
        self.input[self.index..].chars().next().unwrap_or(chars::EOF)
    }

    fn peek_at(&self, ahead: usize) -> char {
        self.input[self.index..].chars().nth(ahead).unwrap_or(chars::EOF)
    }

    fn at_end(&self) -> bool {
        self.index >= self.input.len()
    }

    fn advance(&mut self) -> char {
        let ch = self.peek();
        self.index += ch.len_utf8();
        if ch == chars::NEWLINE {
            self.line += 1;
        }
        ch
    }

    fn error(&self, message: impl Into<String>) -> GoSyntaxError {
        GoSyntaxError::new(self.line, message)
    }

    fn needs_semicolon(&self) -> bool {
        self.lexed
            .tokens
            .last()
            .map_or(false, Token::triggers_semicolon)
    }

    fn insert_semicolon(&mut self, offset: usize, line: usize) {
        if self.needs_semicolon() {
            self.lexed.tokens.push(Token {
                kind: TokenKind::Semicolon,
                text: String::from("\n"),
                offset,
                line,
            });
        }
    }

    fn push(&mut self, kind: TokenKind, start: usize, line: usize) {
        self.lexed.tokens.push(Token {
            kind,
            text: self.input[start..self.index].to_string(),
            offset: start,
            line,
        });
    }

    fn scan(mut self) -> Result<Lexed, GoSyntaxError> {
        while !self.at_end() {
            let ch = self.peek();
            let start = self.index;
            let line = self.line;

            if ch == chars::NEWLINE {
                self.insert_semicolon(start, line);
                self.advance();
                continue;
            }
            if chars::is_whitespace(ch) {
                self.advance();
                continue;
            }
            if ch == chars::SLASH && self.peek_at(1) == chars::SLASH {
                self.scan_line_comment(start, line);
                continue;
            }
            if ch == chars::SLASH && self.peek_at(1) == chars::STAR {
                self.scan_general_comment(start, line)?;
                continue;
            }
            if chars::is_identifier_start(ch) {
                self.scan_identifier(start, line);
                continue;
            }
            if chars::is_digit(ch) || (ch == chars::PERIOD && chars::is_digit(self.peek_at(1))) {
                self.scan_number(start, line);
                continue;
            }
            match ch {
                chars::DQ => self.scan_string(start, line)?,
                chars::BT => self.scan_raw_string(start, line)?,
                chars::SQ => self.scan_rune(start, line)?,
                chars::SEMICOLON => {
                    self.advance();
                    self.push(TokenKind::Semicolon, start, line);
                }
                _ => self.scan_operator(start, line)?,
            }
        }
        let end = self.input.len();
        self.insert_semicolon(end, self.line);
        Ok(self.lexed)
    }

    fn scan_line_comment(&mut self, start: usize, line: usize) {
        while !self.at_end() && self.peek() != chars::NEWLINE {
            self.advance();
        }
        self.lexed.comments.push(Comment {
            text: self.input[start..self.index].trim_end_matches(chars::RETURN).to_string(),
            offset: start,
            line,
        });
    }

    fn scan_general_comment(&mut self, start: usize, line: usize) -> Result<(), GoSyntaxError> {
        self.advance();
        self.advance();
        let mut spans_lines = false;
        loop {
            if self.at_end() {
                return Err(GoSyntaxError::new(line, "comment not terminated"));
            }
            if self.peek() == chars::STAR && self.peek_at(1) == chars::SLASH {
                self.advance();
                self.advance();
                break;
            }
            if self.advance() == chars::NEWLINE {
                spans_lines = true;
            }
        }
        self.lexed.comments.push(Comment {
            text: self.input[start..self.index].to_string(),
            offset: start,
            line,
        });
        // A general comment containing a newline acts like a newline.
        if spans_lines {
            self.insert_semicolon(start, line);
        }
        Ok(())
    }

    fn scan_identifier(&mut self, start: usize, line: usize) {
        while chars::is_identifier_part(self.peek()) {
            self.advance();
        }
        let kind = if KEYWORDS.contains(&&self.input[start..self.index]) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        self.push(kind, start, line);
    }

    fn scan_number(&mut self, start: usize, line: usize) {
        let hex = self.peek() == '0' && matches!(self.peek_at(1), 'x' | 'X');
        let mut kind = TokenKind::Int;
        loop {
            let ch = self.peek();
            if ch.is_ascii_alphanumeric() || ch == chars::UNDERSCORE {
                let exponent = if hex {
                    matches!(ch, 'p' | 'P')
                } else {
                    matches!(ch, 'e' | 'E')
                };
                self.advance();
                if exponent {
                    kind = TokenKind::Float;
                    if matches!(self.peek(), '+' | '-') {
                        self.advance();
                    }
                }
            } else if ch == chars::PERIOD {
                kind = TokenKind::Float;
                self.advance();
            } else {
                break;
            }
        }
        if self.input[start..self.index].ends_with('i') {
            kind = TokenKind::Imaginary;
        }
        self.push(kind, start, line);
    }

    fn scan_escaped_until(&mut self, quote: char, what: &str) -> Result<(), GoSyntaxError> {
        self.advance();
        loop {
            let ch = self.peek();
            if self.at_end() || ch == chars::NEWLINE {
                return Err(self.error(format!("{} literal not terminated", what)));
            }
            self.advance();
            if ch == chars::BACKSLASH {
                if self.at_end() {
                    return Err(self.error(format!("{} literal not terminated", what)));
                }
                self.advance();
            } else if ch == quote {
                return Ok(());
            }
        }
    }

    fn scan_string(&mut self, start: usize, line: usize) -> Result<(), GoSyntaxError> {
        self.scan_escaped_until(chars::DQ, "string")?;
        self.push(TokenKind::String, start, line);
        Ok(())
    }

    fn scan_rune(&mut self, start: usize, line: usize) -> Result<(), GoSyntaxError> {
        self.scan_escaped_until(chars::SQ, "rune")?;
        self.push(TokenKind::Rune, start, line);
        Ok(())
    }

    fn scan_raw_string(&mut self, start: usize, line: usize) -> Result<(), GoSyntaxError> {
        self.advance();
        loop {
            if self.at_end() {
                return Err(GoSyntaxError::new(line, "raw string literal not terminated"));
            }
            if self.advance() == chars::BT {
                break;
            }
        }
        self.push(TokenKind::String, start, line);
        Ok(())
    }

    fn scan_operator(&mut self, start: usize, line: usize) -> Result<(), GoSyntaxError> {
        let rest = &self.input[self.index..];
        let operator = OPERATORS
            .iter()
            .find(|op| rest.starts_with(*op))
            .ok_or_else(|| self.error(format!("unexpected character '{}'", self.peek())))?;
        self.index += operator.len();
        self.push(TokenKind::Operator, start, line);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<(TokenKind, String)> {
        Lexer::new()
            .tokenize(text)
            .unwrap()
            .tokens
            .into_iter()
            .map(|t| (t.kind, t.text))
            .collect()
    }

    #[test]
    fn test_semicolon_inserted_after_identifier_at_newline() {
        let tokens = kinds("package foo\n");
        assert_eq!(
            tokens,
            vec![
                (TokenKind::Keyword, "package".to_string()),
                (TokenKind::Identifier, "foo".to_string()),
                (TokenKind::Semicolon, "\n".to_string()),
            ]
        );
    }

    #[test]
    fn test_no_semicolon_after_open_brace() {
        let tokens = kinds("func f() {\n}\n");
        let semis = tokens.iter().filter(|(k, _)| *k == TokenKind::Semicolon).count();
        assert_eq!(semis, 1);
    }

    #[test]
    fn test_comments_collected() {
        let lexed = Lexer::new()
            .tokenize("// apig gen:x\npackage p /* inline */\n")
            .unwrap();
        assert_eq!(lexed.comments.len(), 2);
        assert_eq!(lexed.comments[0].text, "// apig gen:x");
        assert_eq!(lexed.comments[0].line, 1);
        assert_eq!(lexed.comments[1].text, "/* inline */");
    }

    #[test]
    fn test_literals() {
        let tokens = kinds("1 0x1F 1.5e-3 2i 'a' \"s\\\"x\" `raw\nline`");
        let got: Vec<TokenKind> = tokens.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            got,
            vec![
                TokenKind::Int,
                TokenKind::Int,
                TokenKind::Float,
                TokenKind::Imaginary,
                TokenKind::Rune,
                TokenKind::String,
                TokenKind::String,
                TokenKind::Semicolon,
            ]
        );
    }

    #[test]
    fn test_longest_operator_wins() {
        let tokens = kinds("a...b <-c");
        assert_eq!(tokens[1], (TokenKind::Operator, "...".to_string()));
        assert_eq!(tokens[3], (TokenKind::Operator, "<-".to_string()));
    }

    #[test]
    fn test_leading_byte_order_mark_is_skipped() {
        let lexed = Lexer::new()
            .tokenize("\u{FEFF}package foo\n// apig fooAll:bar\n")
            .unwrap();
        assert_eq!(lexed.tokens[0].text, "package");
        assert_eq!(lexed.tokens[0].offset, 3);
        assert_eq!(lexed.comments[0].line, 2);

        let err = Lexer::new().tokenize("package foo\n\u{FEFF}\n").unwrap_err();
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_unterminated_string_is_error() {
        let err = Lexer::new().tokenize("x := \"abc\n").unwrap_err();
        assert_eq!(err.line, 1);
    }
}
