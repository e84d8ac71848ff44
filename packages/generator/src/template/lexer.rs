/**
 * Template Lexer
 *
 * Splits template text into literal text and `{{ ... }}` actions. Trim markers
 * (`{{- ` and ` -}}`) are applied to the neighbouring text here, so the parser
 * only ever sees final literal text.
 */
use crate::chars;
use crate::error::TemplateError;

const LEFT_DELIM: &str = "{{";
const RIGHT_DELIM: &str = "}}";
const LEFT_COMMENT: &str = "/*";
const RIGHT_COMMENT: &str = "*/";

/// Token inside an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionToken {
    /// Function name or keyword (`if`, `range`, `else`, `end`)
    Ident(String),
    /// Field chain relative to dot; empty for `.` itself
    Field(Vec<String>),
    /// Field chain relative to `$`; empty for `$` itself
    Variable(Vec<String>),
    Str(String),
    Bool(bool),
    Pipe,
    LParen,
    RParen,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Action {
        tokens: Vec<ActionToken>,
        offset: usize,
    },
}

/// Template lexer
pub struct Lexer<'n> {
    name: &'n str,
}

impl<'n> Lexer<'n> {
    pub fn new(name: &'n str) -> Self {
        Lexer { name }
    }

    pub fn tokenize(&self, text: &str) -> Result<Vec<Segment>, TemplateError> {
        Scanner::new(self.name, text).scan()
    }
}

struct Scanner<'a> {
    name: &'a str,
    input: &'a str,
    index: usize,
    trim_next_text: bool,
    segments: Vec<Segment>,
}

impl<'a> Scanner<'a> {
    fn new(name: &'a str, input: &'a str) -> Self {
        Scanner {
            name,
            input,
            index: 0,
            trim_next_text: false,
            segments: Vec::new(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.index..]
    }

    fn peek(&self) -> char {
        self.rest().chars().next().unwrap_or(chars::EOF)
    }

    fn peek_at(&self, ahead: usize) -> char {
        self.rest().chars().nth(ahead).unwrap_or(chars::EOF)
    }

    fn advance(&mut self) -> char {
        let ch = self.peek();
        self.index += ch.len_utf8();
        ch
    }

    fn error(&self, offset: usize, message: impl Into<String>) -> TemplateError {
        TemplateError::Parse {
            name: self.name.to_string(),
            offset,
            message: message.into(),
        }
    }

    fn push_text(&mut self, mut text: &str, trim_end: bool) {
        if self.trim_next_text {
            text = text.trim_start();
        }
        if trim_end {
            text = text.trim_end();
        }
        if !text.is_empty() {
            self.segments.push(Segment::Text(text.to_string()));
        }
    }

    fn scan(mut self) -> Result<Vec<Segment>, TemplateError> {
        loop {
            let rest = self.rest();
            let open = match rest.find(LEFT_DELIM) {
                Some(open) => open,
                None => {
                    self.push_text(rest, false);
                    return Ok(self.segments);
                }
            };

            let offset = self.index + open;
            let after = &rest[open + LEFT_DELIM.len()..];
            let trim_left = after.starts_with(chars::MINUS)
                && after[1..].chars().next().map_or(false, chars::is_whitespace);

            self.push_text(&rest[..open], trim_left);
            self.index = offset + LEFT_DELIM.len() + usize::from(trim_left);
            self.trim_next_text = false;

            self.skip_whitespace();
            if self.rest().starts_with(LEFT_COMMENT) {
                self.scan_comment(offset)?;
                continue;
            }

            let tokens = self.scan_action(offset)?;
            self.segments.push(Segment::Action { tokens, offset });
        }
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.index;
        while chars::is_whitespace(self.peek()) {
            self.advance();
        }
        self.index > start
    }

    /// Consume a closing delimiter if one starts here, recording a trim marker.
    fn close_action(&mut self, after_space: bool) -> bool {
        if after_space && self.rest().starts_with("-}}") {
            self.index += 3;
            self.trim_next_text = true;
            return true;
        }
        if self.rest().starts_with(RIGHT_DELIM) {
            self.index += RIGHT_DELIM.len();
            return true;
        }
        false
    }

    fn scan_comment(&mut self, offset: usize) -> Result<(), TemplateError> {
        let end = self
            .rest()
            .find(RIGHT_COMMENT)
            .ok_or_else(|| self.error(offset, "unclosed comment"))?;
        self.index += end + RIGHT_COMMENT.len();
        let spaced = self.skip_whitespace();
        if self.close_action(spaced) {
            Ok(())
        } else {
            Err(self.error(offset, "comment ends before closing delimiter"))
        }
    }

    fn scan_action(&mut self, offset: usize) -> Result<Vec<ActionToken>, TemplateError> {
        let mut tokens = Vec::new();
        let mut spaced = true;
        loop {
            if self.close_action(spaced) {
                return Ok(tokens);
            }
            let ch = self.peek();
            let start = self.index;
            match ch {
                chars::EOF => return Err(self.error(offset, "unclosed action")),
                chars::BAR => {
                    self.advance();
                    tokens.push(ActionToken::Pipe);
                }
                chars::LPAREN => {
                    self.advance();
                    tokens.push(ActionToken::LParen);
                }
                chars::RPAREN => {
                    self.advance();
                    tokens.push(ActionToken::RParen);
                }
                chars::DQ => tokens.push(ActionToken::Str(self.scan_string(start)?)),
                chars::BT => tokens.push(ActionToken::Str(self.scan_raw_string(start)?)),
                chars::PERIOD => tokens.push(ActionToken::Field(self.scan_path())),
                chars::DOLLAR => {
                    self.advance();
                    if chars::is_identifier_start(self.peek()) {
                        return Err(self.error(start, "template variables are not supported"));
                    }
                    tokens.push(ActionToken::Variable(self.scan_path()));
                }
                _ if chars::is_identifier_start(ch) => {
                    let word = self.scan_identifier();
                    tokens.push(match word {
                        "true" => ActionToken::Bool(true),
                        "false" => ActionToken::Bool(false),
                        _ => ActionToken::Ident(word.to_string()),
                    });
                }
                _ if chars::is_whitespace(ch) => {}
                _ => {
                    return Err(self.error(start, format!("unexpected {:?} in action", ch)));
                }
            }
            spaced = self.skip_whitespace();
        }
    }

    fn scan_identifier(&mut self) -> &'a str {
        let start = self.index;
        while chars::is_identifier_part(self.peek()) {
            self.advance();
        }
        &self.input[start..self.index]
    }

    /// `.A.B` or a lone `.`
    fn scan_path(&mut self) -> Vec<String> {
        let mut path = Vec::new();
        while self.peek() == chars::PERIOD {
            if !chars::is_identifier_start(self.peek_at(1)) {
                if path.is_empty() {
                    self.advance();
                }
                break;
            }
            self.advance();
            path.push(self.scan_identifier().to_string());
        }
        path
    }

    fn scan_string(&mut self, start: usize) -> Result<String, TemplateError> {
        self.advance();
        let mut value = String::new();
        loop {
            match self.advance() {
                chars::DQ => return Ok(value),
                chars::EOF | chars::NEWLINE => {
                    return Err(self.error(start, "unterminated quoted string"));
                }
                chars::BACKSLASH => match self.advance() {
                    'n' => value.push(chars::NEWLINE),
                    't' => value.push(chars::TAB),
                    chars::BACKSLASH => value.push(chars::BACKSLASH),
                    chars::DQ => value.push(chars::DQ),
                    other => {
                        return Err(self.error(start, format!("unknown escape '\\{}'", other)));
                    }
                },
                ch => value.push(ch),
            }
        }
    }

    fn scan_raw_string(&mut self, start: usize) -> Result<String, TemplateError> {
        self.advance();
        let end = self
            .rest()
            .find(chars::BT)
            .ok_or_else(|| self.error(start, "unterminated raw string"))?;
        let value = self.rest()[..end].to_string();
        self.index += end + 1;
        Ok(value)
    }
}
