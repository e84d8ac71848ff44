/**
 * Go Declaration Parser
 *
 * Recursive descent over the token stream. Reads the package clause and every
 * top-level function signature; all other declarations and every function body
 * are skipped by bracket balancing.
 */
use super::ast::*;
use super::lexer::{Lexer, Token, TokenKind};
use crate::error::GoSyntaxError;

type ParseResult<T> = Result<T, GoSyntaxError>;

/// Parser for Go source files
pub struct Parser {
    lexer: Lexer,
}

impl Parser {
    pub fn new() -> Self {
        Parser {
            lexer: Lexer::new(),
        }
    }

    /// Parse a whole file into its package name and function declarations.
    pub fn parse_file(&self, text: &str) -> ParseResult<SourceFile> {
        let lexed = self.lexer.tokenize(text)?;
        ParseDecls::new(lexed.tokens).parse_file()
    }

    /// Parse a standalone type expression, e.g. `[]*Thing`.
    pub fn parse_type(&self, text: &str) -> ParseResult<TypeExpr> {
        let lexed = self.lexer.tokenize(text)?;
        let mut parser = ParseDecls::new(lexed.tokens);
        let ty = parser.parse_type()?;
        parser.skip_semicolons();
        if let Some(token) = parser.peek() {
            return Err(parser.unexpected(token, "end of type"));
        }
        Ok(ty)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Entry of a parameter list before Go's grouping rule is applied.
enum ParamEntry {
    /// A lone identifier: either a name awaiting a type, or a type itself.
    Bare(String, usize),
    Named(String, TypeExpr),
    Type(TypeExpr),
}

struct ParseDecls {
    tokens: Vec<Token>,
    index: usize,
}

impl ParseDecls {
    fn new(tokens: Vec<Token>) -> Self {
        ParseDecls { tokens, index: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn peek_at(&self, ahead: usize) -> Option<&Token> {
        self.tokens.get(self.index + ahead)
    }

    fn current_line(&self) -> usize {
        self.peek()
            .or_else(|| self.tokens.last())
            .map_or(1, |t| t.line)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned();
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn at_operator(&self, operator: &str) -> bool {
        self.peek().map_or(false, |t| t.is_operator(operator))
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        self.peek().map_or(false, |t| t.is_keyword(keyword))
    }

    fn unexpected(&self, token: &Token, expected: &str) -> GoSyntaxError {
        let found = if token.is_semicolon() {
            "newline or ';'".to_string()
        } else {
            format!("'{}'", token.text)
        };
        GoSyntaxError::new(token.line, format!("expected {}, found {}", expected, found))
    }

    fn eof(&self, expected: &str) -> GoSyntaxError {
        GoSyntaxError::new(
            self.current_line(),
            format!("expected {}, found end of file", expected),
        )
    }

    fn expect_operator(&mut self, operator: &str) -> ParseResult<()> {
        match self.peek() {
            Some(token) if token.is_operator(operator) => {
                self.index += 1;
                Ok(())
            }
            Some(token) => Err(self.unexpected(token, &format!("'{}'", operator))),
            None => Err(self.eof(&format!("'{}'", operator))),
        }
    }

    fn expect_identifier(&mut self) -> ParseResult<String> {
        match self.peek() {
            Some(token) if token.is_identifier() => {
                let text = token.text.clone();
                self.index += 1;
                Ok(text)
            }
            Some(token) => Err(self.unexpected(token, "identifier")),
            None => Err(self.eof("identifier")),
        }
    }

    fn skip_semicolons(&mut self) {
        while self.peek().map_or(false, Token::is_semicolon) {
            self.index += 1;
        }
    }

    fn parse_file(mut self) -> ParseResult<SourceFile> {
        self.skip_semicolons();
        match self.peek() {
            Some(token) if token.is_keyword("package") => self.index += 1,
            Some(token) => return Err(self.unexpected(token, "'package'")),
            None => return Err(self.eof("'package'")),
        }
        let package = self.expect_identifier()?;

        let mut funcs = Vec::new();
        loop {
            self.skip_semicolons();
            if self.peek().is_none() {
                break;
            }
            if self.at_keyword("func") {
                funcs.push(self.parse_func_decl()?);
            } else {
                self.skip_declaration()?;
            }
        }
        Ok(SourceFile { package, funcs })
    }

    /// Skip an `import`, `type`, `var` or `const` declaration.
    fn skip_declaration(&mut self) -> ParseResult<()> {
        let mut depth = 0usize;
        while let Some(token) = self.advance() {
            if token.kind == TokenKind::Operator {
                match token.text.as_str() {
                    "(" | "[" | "{" => depth += 1,
                    ")" | "]" | "}" => {
                        depth = depth
                            .checked_sub(1)
                            .ok_or_else(|| self.unexpected(&token, "declaration"))?;
                    }
                    _ => {}
                }
            } else if token.is_semicolon() && depth == 0 {
                return Ok(());
            }
        }
        if depth > 0 {
            return Err(self.eof("closing bracket"));
        }
        Ok(())
    }

    /// Consume a balanced `open ... close` group starting at the current token.
    fn skip_balanced(&mut self, open: &str, close: &str) -> ParseResult<()> {
        self.expect_operator(open)?;
        let mut depth = 1usize;
        while let Some(token) = self.advance() {
            if token.is_operator(open) {
                depth += 1;
            } else if token.is_operator(close) {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
        }
        Err(self.eof(&format!("'{}'", close)))
    }

    fn parse_func_decl(&mut self) -> ParseResult<FuncDecl> {
        let line = self.current_line();
        self.index += 1; // func

        let receiver = if self.at_operator("(") {
            Some(self.parse_parameters()?)
        } else {
            None
        };
        let name = self.expect_identifier()?;

        let has_type_params = self.at_operator("[");
        if has_type_params {
            self.skip_balanced("[", "]")?;
        }

        let signature = self.parse_signature()?;
        if self.at_operator("{") {
            self.skip_balanced("{", "}")?;
        }

        Ok(FuncDecl {
            name,
            receiver,
            has_type_params,
            signature,
            line,
        })
    }

    fn parse_signature(&mut self) -> ParseResult<Signature> {
        let params = self.parse_parameters()?;
        let results = self.parse_results()?;
        Ok(Signature { params, results })
    }

    fn parse_results(&mut self) -> ParseResult<Vec<Field>> {
        if self.at_operator("(") {
            return self.parse_parameters();
        }
        if self.at_type_start() {
            return Ok(vec![Field::unnamed(self.parse_type()?)]);
        }
        Ok(Vec::new())
    }

    fn at_type_start(&self) -> bool {
        self.peek().map_or(false, starts_type)
    }

    /// Parse `( ... )` and apply Go's name grouping rule.
    fn parse_parameters(&mut self) -> ParseResult<Vec<Field>> {
        self.expect_operator("(")?;
        let mut entries = Vec::new();
        loop {
            self.skip_semicolons();
            if self.at_operator(")") {
                self.index += 1;
                break;
            }
            entries.push(self.parse_param_entry()?);
            self.skip_semicolons();
            if self.at_operator(",") {
                self.index += 1;
            } else if !self.at_operator(")") {
                return match self.peek() {
                    Some(token) => Err(self.unexpected(token, "',' or ')'")),
                    None => Err(self.eof("')'")),
                };
            }
        }
        group_parameters(entries)
    }

    fn parse_param_entry(&mut self) -> ParseResult<ParamEntry> {
        let token = match self.peek() {
            Some(token) => token.clone(),
            None => return Err(self.eof("parameter")),
        };
        if !token.is_identifier() {
            return Ok(ParamEntry::Type(self.parse_type_or_ellipsis()?));
        }

        let next = self.peek_at(1).cloned();
        match next {
            Some(next) if next.is_operator(".") => {
                Ok(ParamEntry::Type(self.parse_type_or_ellipsis()?))
            }
            Some(next) if next.is_operator(",") || next.is_operator(")") => {
                self.index += 1;
                Ok(ParamEntry::Bare(token.text, token.line))
            }
            Some(next) if next.is_operator("[") => {
                // `a []int` / `a [4]int` name a parameter; `T[int]` is a generic type.
                if self.bracket_starts_type(self.index + 1) {
                    self.index += 1;
                    Ok(ParamEntry::Named(token.text, self.parse_type()?))
                } else {
                    Ok(ParamEntry::Type(self.parse_type()?))
                }
            }
            _ => {
                self.index += 1;
                Ok(ParamEntry::Named(token.text, self.parse_type_or_ellipsis()?))
            }
        }
    }

    /// True when the token after the `[...]` group at `open` begins a type.
    fn bracket_starts_type(&self, open: usize) -> bool {
        let mut depth = 0usize;
        let mut index = open;
        while let Some(token) = self.tokens.get(index) {
            if token.is_operator("[") {
                depth += 1;
            } else if token.is_operator("]") {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            index += 1;
        }
        self.tokens.get(index + 1).map_or(false, starts_type)
    }

    fn parse_type_or_ellipsis(&mut self) -> ParseResult<TypeExpr> {
        if self.at_operator("...") {
            self.index += 1;
            return Ok(TypeExpr::Ellipsis(Box::new(self.parse_type()?)));
        }
        self.parse_type()
    }

    fn parse_type(&mut self) -> ParseResult<TypeExpr> {
        let token = match self.peek() {
            Some(token) => token.clone(),
            None => return Err(self.eof("type")),
        };

        match token.kind {
            TokenKind::Identifier => self.parse_type_name(),
            TokenKind::Keyword => match token.text.as_str() {
                "map" => {
                    self.index += 1;
                    self.expect_operator("[")?;
                    let key = self.parse_type()?;
                    self.expect_operator("]")?;
                    let value = self.parse_type()?;
                    Ok(TypeExpr::Map {
                        key: Box::new(key),
                        value: Box::new(value),
                    })
                }
                "chan" => {
                    self.index += 1;
                    let dir = if self.at_operator("<-") {
                        self.index += 1;
                        ChanDir::Send
                    } else {
                        ChanDir::Both
                    };
                    Ok(TypeExpr::Chan {
                        dir,
                        elem: Box::new(self.parse_type()?),
                    })
                }
                "func" => {
                    self.index += 1;
                    Ok(TypeExpr::Func(Box::new(self.parse_signature()?)))
                }
                "struct" => {
                    self.index += 1;
                    self.skip_balanced("{", "}")?;
                    Ok(TypeExpr::Struct)
                }
                "interface" => {
                    self.index += 1;
                    self.skip_balanced("{", "}")?;
                    Ok(TypeExpr::Interface)
                }
                _ => Err(self.unexpected(&token, "type")),
            },
            TokenKind::Operator => match token.text.as_str() {
                "*" => {
                    self.index += 1;
                    Ok(TypeExpr::Pointer(Box::new(self.parse_type()?)))
                }
                "[" => {
                    self.index += 1;
                    if self.at_operator("]") {
                        self.index += 1;
                        return Ok(TypeExpr::Slice(Box::new(self.parse_type()?)));
                    }
                    let mut len = String::new();
                    while let Some(part) = self.advance() {
                        if part.is_operator("]") {
                            return Ok(TypeExpr::Array {
                                len,
                                elem: Box::new(self.parse_type()?),
                            });
                        }
                        len.push_str(&part.text);
                    }
                    Err(self.eof("']'"))
                }
                "(" => {
                    self.index += 1;
                    let inner = self.parse_type()?;
                    self.expect_operator(")")?;
                    Ok(TypeExpr::Paren(Box::new(inner)))
                }
                "<-" => {
                    self.index += 1;
                    if !self.at_keyword("chan") {
                        return match self.peek() {
                            Some(next) => Err(self.unexpected(next, "'chan'")),
                            None => Err(self.eof("'chan'")),
                        };
                    }
                    self.index += 1;
                    Ok(TypeExpr::Chan {
                        dir: ChanDir::Recv,
                        elem: Box::new(self.parse_type()?),
                    })
                }
                _ => Err(self.unexpected(&token, "type")),
            },
            _ => Err(self.unexpected(&token, "type")),
        }
    }

    fn parse_type_name(&mut self) -> ParseResult<TypeExpr> {
        let first = self.expect_identifier()?;
        let named = if self.at_operator(".") {
            self.index += 1;
            let name = self.expect_identifier()?;
            TypeExpr::Named {
                package: Some(first),
                name,
            }
        } else {
            TypeExpr::named(first)
        };

        if !self.at_operator("[") || self.peek_at(1).map_or(false, |t| t.is_operator("]")) {
            return Ok(named);
        }
        self.index += 1;
        let mut args = vec![self.parse_type()?];
        while self.at_operator(",") {
            self.index += 1;
            if self.at_operator("]") {
                break;
            }
            args.push(self.parse_type()?);
        }
        self.expect_operator("]")?;
        Ok(TypeExpr::Generic {
            base: Box::new(named),
            args,
        })
    }
}

fn starts_type(token: &Token) -> bool {
    match token.kind {
        TokenKind::Identifier => true,
        TokenKind::Keyword => matches!(
            token.text.as_str(),
            "map" | "chan" | "func" | "struct" | "interface"
        ),
        TokenKind::Operator => matches!(token.text.as_str(), "*" | "[" | "(" | "<-"),
        _ => false,
    }
}

/// Apply Go's rule: if any entry carries a name, every bare identifier is a name
/// sharing the type of the next named entry; otherwise every entry is a type.
fn group_parameters(entries: Vec<ParamEntry>) -> ParseResult<Vec<Field>> {
    let has_names = entries
        .iter()
        .any(|entry| matches!(entry, ParamEntry::Named(..)));

    if !has_names {
        return Ok(entries
            .into_iter()
            .map(|entry| match entry {
                ParamEntry::Bare(name, _) => Field::unnamed(TypeExpr::named(name)),
                ParamEntry::Type(ty) => Field::unnamed(ty),
                ParamEntry::Named(name, ty) => Field::new(vec![name], ty),
            })
            .collect());
    }

    let mut fields = Vec::new();
    let mut pending: Vec<String> = Vec::new();
    let mut last_line = 0;
    for entry in entries {
        match entry {
            ParamEntry::Bare(name, line) => {
                pending.push(name);
                last_line = line;
            }
            ParamEntry::Named(name, ty) => {
                pending.push(name);
                fields.push(Field::new(std::mem::take(&mut pending), ty));
            }
            ParamEntry::Type(ty) => {
                return Err(GoSyntaxError::new(
                    last_line,
                    format!("mixed named and unnamed parameters ({})", ty.shape()),
                ));
            }
        }
    }
    if !pending.is_empty() {
        return Err(GoSyntaxError::new(
            last_line,
            format!("missing type for parameter '{}'", pending.join(", ")),
        ));
    }
    Ok(fields)
}
