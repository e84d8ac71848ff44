/**
 * Template Module
 *
 * A small text template engine in the style of Go's text/template: output
 * actions, if/else, range/else, pipelines and a fixed set of functions.
 */
mod exec;
pub mod funcs;
pub mod lexer;
pub mod parser;
pub mod value;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::TemplateError;
use exec::Executor;
use parser::Node;

pub use value::Value;

/// A compiled template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    name: String,
    source_path: Option<PathBuf>,
    nodes: Vec<Node>,
}

impl Template {
    pub fn compile(name: impl Into<String>, text: &str) -> Result<Template, TemplateError> {
        let name = name.into();
        let segments = lexer::Lexer::new(&name).tokenize(text)?;
        let nodes = parser::Parser::new(&name).parse(segments)?;
        Ok(Template {
            name,
            source_path: None,
            nodes,
        })
    }

    /// Read and compile a template file.
    pub fn load(name: impl Into<String>, path: &Path) -> Result<Template, TemplateError> {
        let text = fs::read_to_string(path).map_err(|e| TemplateError::Load {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let mut template = Template::compile(name, &text)?;
        template.source_path = Some(path.to_path_buf());
        Ok(template)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub fn render(&self, data: &Value) -> Result<String, TemplateError> {
        let mut out = String::new();
        Executor::new(data)
            .walk(&mut out, &self.nodes, data)
            .map_err(|message| TemplateError::Render {
                name: self.name.clone(),
                message,
            })?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn data() -> Value {
        let mut root = IndexMap::new();
        root.insert("Name".to_string(), Value::from("Send"));
        root.insert(
            "Items".to_string(),
            Value::List(vec!["a".into(), "b".into(), "c".into()]),
        );
        root.insert("Empty".to_string(), Value::List(vec![]));
        Value::Map(root)
    }

    fn render(text: &str) -> Result<String, TemplateError> {
        Template::compile("t", text)?.render(&data())
    }

    #[test]
    fn test_output_and_functions() {
        assert_eq!(render("func {{.Name}}()").unwrap(), "func Send()");
        assert_eq!(render(r#"{{ .Items | join ", " }}"#).unwrap(), "a, b, c");
        assert_eq!(render(r#"{{ conjoin "and" .Items }}"#).unwrap(), "a, b, and c");
        assert_eq!(render("{{ .Name | lower | upper }}").unwrap(), "SEND");
    }

    #[test]
    fn test_range_binds_dot_and_root() {
        assert_eq!(
            render("{{range .Items}}{{.}}{{$.Name}};{{end}}").unwrap(),
            "aSend;bSend;cSend;"
        );
        assert_eq!(render("{{range .Empty}}x{{else}}none{{end}}").unwrap(), "none");
    }

    #[test]
    fn test_conditionals() {
        assert_eq!(render("{{if .Empty}}y{{else}}n{{end}}").unwrap(), "n");
        assert_eq!(render(r#"{{if eq .Name "Send"}}y{{end}}"#).unwrap(), "y");
        assert_eq!(render("{{if not .Items}}y{{else if .Name}}z{{end}}").unwrap(), "z");
    }

    #[test]
    fn test_missing_key_is_error() {
        let err = render("{{.Nope}}").unwrap_err();
        assert!(matches!(err, TemplateError::Render { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Template::load("t", Path::new("/no/such/template.tmpl")).unwrap_err();
        assert!(matches!(err, TemplateError::Load { .. }));
    }
}
