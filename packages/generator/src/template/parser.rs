/**
 * Template Parser
 *
 * Builds the node tree from lexed segments: literal text, output actions and
 * the `if` / `range` control structures with their `else` branches.
 */
use super::funcs;
use super::lexer::{ActionToken, Segment};
use crate::error::TemplateError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Field(Vec<String>),
    Variable(Vec<String>),
    Str(String),
    Bool(bool),
    Func(String),
    Sub(Pipeline),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub operands: Vec<Operand>,
}

/// Commands joined by `|`; each result feeds the next command's last argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Output(Pipeline),
    If {
        condition: Pipeline,
        then_branch: Vec<Node>,
        else_branch: Vec<Node>,
    },
    Range {
        pipeline: Pipeline,
        body: Vec<Node>,
        else_branch: Vec<Node>,
    },
}

/// What stopped a node list.
enum Terminator {
    Eof,
    End,
    Else,
    ElseIf(Pipeline),
}

pub struct Parser<'n> {
    name: &'n str,
}

impl<'n> Parser<'n> {
    pub fn new(name: &'n str) -> Self {
        Parser { name }
    }

    pub fn parse(&self, segments: Vec<Segment>) -> Result<Vec<Node>, TemplateError> {
        let mut state = ParseNodes {
            name: self.name,
            segments: segments.into_iter(),
            offset: 0,
        };
        let (nodes, terminator) = state.parse_list()?;
        match terminator {
            Terminator::Eof => Ok(nodes),
            Terminator::End => Err(state.error("unexpected {{end}}")),
            Terminator::Else | Terminator::ElseIf(_) => Err(state.error("unexpected {{else}}")),
        }
    }
}

struct ParseNodes<'n> {
    name: &'n str,
    segments: std::vec::IntoIter<Segment>,
    /// Offset of the last action seen, for error reporting.
    offset: usize,
}

impl<'n> ParseNodes<'n> {
    fn error(&self, message: impl Into<String>) -> TemplateError {
        TemplateError::Parse {
            name: self.name.to_string(),
            offset: self.offset,
            message: message.into(),
        }
    }

    fn parse_list(&mut self) -> Result<(Vec<Node>, Terminator), TemplateError> {
        let mut nodes = Vec::new();
        while let Some(segment) = self.segments.next() {
            let (tokens, offset) = match segment {
                Segment::Text(text) => {
                    nodes.push(Node::Text(text));
                    continue;
                }
                Segment::Action { tokens, offset } => (tokens, offset),
            };
            self.offset = offset;

            match tokens.first() {
                Some(ActionToken::Ident(word)) if word == "end" => {
                    self.expect_bare(&tokens, "end")?;
                    return Ok((nodes, Terminator::End));
                }
                Some(ActionToken::Ident(word)) if word == "else" => {
                    return match tokens.get(1) {
                        None => Ok((nodes, Terminator::Else)),
                        Some(ActionToken::Ident(word)) if word == "if" => {
                            let condition = self.parse_pipeline(&tokens[2..], "if")?;
                            Ok((nodes, Terminator::ElseIf(condition)))
                        }
                        Some(_) => Err(self.error("unexpected operand after else")),
                    };
                }
                Some(ActionToken::Ident(word)) if word == "if" => {
                    let condition = self.parse_pipeline(&tokens[1..], "if")?;
                    nodes.push(self.parse_if(condition)?);
                }
                Some(ActionToken::Ident(word)) if word == "range" => {
                    let pipeline = self.parse_pipeline(&tokens[1..], "range")?;
                    nodes.push(self.parse_range(pipeline)?);
                }
                _ => nodes.push(Node::Output(self.parse_pipeline(&tokens, "command")?)),
            }
        }
        Ok((nodes, Terminator::Eof))
    }

    fn expect_bare(&self, tokens: &[ActionToken], keyword: &str) -> Result<(), TemplateError> {
        if tokens.len() == 1 {
            Ok(())
        } else {
            Err(self.error(format!("unexpected operand after {}", keyword)))
        }
    }

    fn parse_if(&mut self, condition: Pipeline) -> Result<Node, TemplateError> {
        let (then_branch, terminator) = self.parse_list()?;
        let else_branch = match terminator {
            Terminator::End => Vec::new(),
            Terminator::Else => self.parse_else_body()?,
            // `{{else if}}` shares the enclosing `{{end}}`.
            Terminator::ElseIf(nested) => vec![self.parse_if(nested)?],
            Terminator::Eof => return Err(self.error("unexpected EOF in if")),
        };
        Ok(Node::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn parse_range(&mut self, pipeline: Pipeline) -> Result<Node, TemplateError> {
        let (body, terminator) = self.parse_list()?;
        let else_branch = match terminator {
            Terminator::End => Vec::new(),
            Terminator::Else => self.parse_else_body()?,
            Terminator::ElseIf(_) => return Err(self.error("{{else if}} inside range")),
            Terminator::Eof => return Err(self.error("unexpected EOF in range")),
        };
        Ok(Node::Range {
            pipeline,
            body,
            else_branch,
        })
    }

    fn parse_else_body(&mut self) -> Result<Vec<Node>, TemplateError> {
        match self.parse_list()? {
            (nodes, Terminator::End) => Ok(nodes),
            (_, Terminator::Eof) => Err(self.error("unexpected EOF after else")),
            _ => Err(self.error("expected {{end}} after else branch")),
        }
    }

    fn parse_pipeline(&self, tokens: &[ActionToken], context: &str) -> Result<Pipeline, TemplateError> {
        if tokens.is_empty() {
            return Err(self.error(format!("missing value for {}", context)));
        }

        let mut commands = Vec::new();
        let mut depth = 0usize;
        let mut start = 0;
        for (i, token) in tokens.iter().enumerate() {
            match token {
                ActionToken::LParen => depth += 1,
                ActionToken::RParen => {
                    depth = depth
                        .checked_sub(1)
                        .ok_or_else(|| self.error("unexpected right paren"))?;
                }
                ActionToken::Pipe if depth == 0 => {
                    commands.push(self.parse_command(&tokens[start..i])?);
                    start = i + 1;
                }
                _ => {}
            }
        }
        if depth != 0 {
            return Err(self.error("unclosed left paren"));
        }
        commands.push(self.parse_command(&tokens[start..])?);
        Ok(Pipeline { commands })
    }

    fn parse_command(&self, tokens: &[ActionToken]) -> Result<Command, TemplateError> {
        if tokens.is_empty() {
            return Err(self.error("missing command"));
        }

        let mut operands = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            let operand = match &tokens[i] {
                ActionToken::Field(path) => Operand::Field(path.clone()),
                ActionToken::Variable(path) => Operand::Variable(path.clone()),
                ActionToken::Str(value) => Operand::Str(value.clone()),
                ActionToken::Bool(value) => Operand::Bool(*value),
                ActionToken::Ident(name) => {
                    if !funcs::is_builtin(name) {
                        return Err(self.error(format!("function {:?} not defined", name)));
                    }
                    Operand::Func(name.clone())
                }
                ActionToken::LParen => {
                    let close = matching_paren(tokens, i)
                        .ok_or_else(|| self.error("unclosed left paren"))?;
                    let inner = self.parse_pipeline(&tokens[i + 1..close], "parenthesized pipeline")?;
                    i = close;
                    Operand::Sub(inner)
                }
                ActionToken::RParen => return Err(self.error("unexpected right paren")),
                ActionToken::Pipe => return Err(self.error("missing command")),
            };
            operands.push(operand);
            i += 1;
        }
        Ok(Command { operands })
    }
}

fn matching_paren(tokens: &[ActionToken], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        match token {
            ActionToken::LParen => depth += 1,
            ActionToken::RParen => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::lexer::Lexer;

    fn parse(text: &str) -> Result<Vec<Node>, TemplateError> {
        let segments = Lexer::new("t").tokenize(text)?;
        Parser::new("t").parse(segments)
    }

    #[test]
    fn test_if_else() {
        let nodes = parse("{{if .A}}yes{{else}}no{{end}}").unwrap();
        match &nodes[0] {
            Node::If {
                then_branch,
                else_branch,
                ..
            } => {
                assert_eq!(then_branch, &vec![Node::Text("yes".to_string())]);
                assert_eq!(else_branch, &vec![Node::Text("no".to_string())]);
            }
            other => panic!("expected if, got {:?}", other),
        }
    }

    #[test]
    fn test_else_if_nests() {
        let nodes = parse("{{if .A}}a{{else if .B}}b{{else}}c{{end}}").unwrap();
        assert_eq!(nodes.len(), 1);
        match &nodes[0] {
            Node::If { else_branch, .. } => {
                assert!(matches!(else_branch.as_slice(), [Node::If { .. }]));
            }
            other => panic!("expected if, got {:?}", other),
        }
    }

    #[test]
    fn test_pipeline_commands() {
        let nodes = parse(r#"{{ .Items | join ", " | upper }}"#).unwrap();
        match &nodes[0] {
            Node::Output(pipeline) => {
                assert_eq!(pipeline.commands.len(), 3);
                assert_eq!(
                    pipeline.commands[1].operands,
                    vec![Operand::Func("join".to_string()), Operand::Str(", ".to_string())]
                );
            }
            other => panic!("expected output, got {:?}", other),
        }
    }

    #[test]
    fn test_parenthesized_operand() {
        let nodes = parse(r#"{{ upper (join "," .Items) }}"#).unwrap();
        match &nodes[0] {
            Node::Output(pipeline) => {
                assert!(matches!(pipeline.commands[0].operands[1], Operand::Sub(_)));
            }
            other => panic!("expected output, got {:?}", other),
        }
    }

    #[test]
    fn test_structure_errors() {
        assert!(parse("{{if .A}}open").is_err());
        assert!(parse("{{end}}").is_err());
        assert!(parse("{{range .A}}{{else if .B}}{{end}}").is_err());
        assert!(parse("{{ nosuch .A }}").is_err());
        assert!(parse("{{ .A | }}").is_err());
        assert!(parse("{{if}}{{end}}").is_err());
    }
}
