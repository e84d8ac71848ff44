//! Template execution

use super::funcs;
use super::parser::{Command, Node, Operand, Pipeline};
use super::value::Value;

/// Walks a node tree against one root value.
pub(crate) struct Executor<'a> {
    root: &'a Value,
}

impl<'a> Executor<'a> {
    pub(crate) fn new(root: &'a Value) -> Self {
        Executor { root }
    }

    pub(crate) fn walk(&self, out: &mut String, nodes: &[Node], dot: &Value) -> Result<(), String> {
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Output(pipeline) => {
                    let value = self.eval_pipeline(pipeline, dot)?;
                    out.push_str(&value.print()?);
                }
                Node::If {
                    condition,
                    then_branch,
                    else_branch,
                } => {
                    if self.eval_pipeline(condition, dot)?.is_truthy() {
                        self.walk(out, then_branch, dot)?;
                    } else {
                        self.walk(out, else_branch, dot)?;
                    }
                }
                Node::Range {
                    pipeline,
                    body,
                    else_branch,
                } => {
                    let items: Vec<Value> = match self.eval_pipeline(pipeline, dot)? {
                        Value::List(items) => items,
                        Value::Map(entries) => entries.into_values().collect(),
                        Value::Null => Vec::new(),
                        other => return Err(format!("range can't iterate over {}", other.kind())),
                    };
                    if items.is_empty() {
                        self.walk(out, else_branch, dot)?;
                    }
                    for item in &items {
                        self.walk(out, body, item)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn eval_pipeline(&self, pipeline: &Pipeline, dot: &Value) -> Result<Value, String> {
        let mut piped = None;
        for command in &pipeline.commands {
            piped = Some(self.eval_command(command, dot, piped)?);
        }
        Ok(piped.unwrap_or_default())
    }

    fn eval_command(&self, command: &Command, dot: &Value, piped: Option<Value>) -> Result<Value, String> {
        match command.operands.split_first() {
            Some((Operand::Func(name), rest)) => {
                let mut args = rest
                    .iter()
                    .map(|operand| self.eval_operand(operand, dot))
                    .collect::<Result<Vec<_>, _>>()?;
                args.extend(piped);
                funcs::call(self.root, name, args)
            }
            Some((operand, [])) => {
                if piped.is_some() {
                    return Err(String::from("can't pipe a value into a non-function"));
                }
                self.eval_operand(operand, dot)
            }
            Some(_) => Err(String::from("can't give argument to non-function")),
            None => Err(String::from("empty command")),
        }
    }

    fn eval_operand(&self, operand: &Operand, dot: &Value) -> Result<Value, String> {
        match operand {
            Operand::Field(path) => dot.lookup(path).cloned(),
            Operand::Variable(path) => self.root.lookup(path).cloned(),
            Operand::Str(value) => Ok(Value::Str(value.clone())),
            Operand::Bool(value) => Ok(Value::Bool(*value)),
            Operand::Func(name) => funcs::call(self.root, name, Vec::new()),
            Operand::Sub(pipeline) => self.eval_pipeline(pipeline, dot),
        }
    }
}
