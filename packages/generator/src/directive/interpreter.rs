//! Directive Interpreter
//!
//! Turns tokenized directive fields into global registrations and at most one
//! definition per line.

use std::fmt;

use crate::chars;
use crate::config::{DefConfig, GeneratorOptions, GlobalConfig};
use crate::directive::tokenizer;
use crate::error::DirectiveError;
use crate::template::Template;

/// Suffix marking a field as a global registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialKey {
    Args,
    Template,
    Return,
    All,
}

impl SpecialKey {
    /// Order in which suffixes are tried.
    pub const ALL: [SpecialKey; 4] = [
        SpecialKey::Args,
        SpecialKey::Template,
        SpecialKey::Return,
        SpecialKey::All,
    ];

    pub fn suffix(self) -> &'static str {
        match self {
            SpecialKey::Args => "Args",
            SpecialKey::Template => "Template",
            SpecialKey::Return => "Return",
            SpecialKey::All => "All",
        }
    }
}

/// Classified field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKey<'a> {
    Special { key: SpecialKey, extra: &'a str },
    Args,
    Gen,
    Alias,
    Return,
    Template,
    Option(&'a str),
}

impl<'a> FieldKey<'a> {
    pub fn classify(name: &'a str) -> FieldKey<'a> {
        for key in SpecialKey::ALL {
            if let Some(extra) = name.strip_suffix(key.suffix()) {
                if !extra.is_empty() {
                    return FieldKey::Special { key, extra };
                }
            }
        }
        match name {
            "args" => FieldKey::Args,
            "gen" => FieldKey::Gen,
            "alias" => FieldKey::Alias,
            "return" => FieldKey::Return,
            "template" => FieldKey::Template,
            other => FieldKey::Option(other),
        }
    }
}

/// Non-fatal problem found while interpreting directives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// Result of interpreting one comment line.
#[derive(Debug, Default)]
pub struct LineOutcome {
    pub definition: Option<DefConfig>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Split `name:value`, trimming both sides.
pub fn split_field(field: &str) -> Result<(&str, &str), DirectiveError> {
    match field.split_once(chars::COLON) {
        Some((name, value)) => Ok((name.trim(), value.trim())),
        None => Err(DirectiveError::Malformed {
            field: field.to_string(),
        }),
    }
}

pub struct DirectiveInterpreter<'o> {
    options: &'o GeneratorOptions,
}

impl<'o> DirectiveInterpreter<'o> {
    pub fn new(options: &'o GeneratorOptions) -> Self {
        DirectiveInterpreter { options }
    }

    /// Interpret one comment line. Lines that are not directives yield an
    /// empty outcome.
    pub fn interpret_line(&self, global: &mut GlobalConfig, line: usize, text: &str) -> LineOutcome {
        let mut outcome = LineOutcome::default();
        let fields = match tokenizer::tokenize(text) {
            Some(fields) => fields,
            None => return outcome,
        };

        let mut def = DefConfig::default();

        for field in fields.iter().skip(1) {
            let (name, raw_value) = match split_field(field) {
                Ok(parts) => parts,
                Err(err) => {
                    tracing::warn!(line, error = %err, "skipping directive field");
                    outcome.diagnostics.push(Diagnostic {
                        line,
                        message: err.to_string(),
                    });
                    continue;
                }
            };
            let key = FieldKey::classify(name);
            tracing::debug!(line, field = name, key = ?key, "directive field");

            if key == FieldKey::Gen {
                def.generator_ref = raw_value.to_string();
                continue;
            }

            let value = chars::strip_outer_quotes(raw_value).to_string();
            match key {
                FieldKey::Special { key, extra } => {
                    if let Err(message) = self.register(global, key, extra, value) {
                        tracing::warn!(line, name = extra, "{}", message);
                        outcome.diagnostics.push(Diagnostic { line, message });
                    }
                }
                FieldKey::Args => def.arguments_alias = value,
                FieldKey::Alias => def.alias = value,
                FieldKey::Return => def.return_alias = value,
                FieldKey::Template => def.template_name = value,
                FieldKey::Option(name) => {
                    def.options.insert(name.to_string(), value);
                }
                FieldKey::Gen => {}
            }
        }

        // An empty `gen:` names nothing to generate.
        if !def.generator_ref.is_empty() {
            def.line = line;
            outcome.definition = Some(def);
        }
        outcome
    }

    fn register(
        &self,
        global: &mut GlobalConfig,
        key: SpecialKey,
        extra: &str,
        value: String,
    ) -> Result<(), String> {
        match key {
            SpecialKey::All => {
                global.options.insert(extra.to_string(), value);
            }
            SpecialKey::Args => {
                global.argument_aliases.insert(extra.to_string(), value);
            }
            SpecialKey::Return => {
                global.return_aliases.insert(extra.to_string(), value);
            }
            SpecialKey::Template => {
                let path = self.options.template_path(&value);
                let template = Template::load(extra, &path).map_err(|e| e.to_string())?;
                tracing::debug!(name = extra, path = %path.display(), "registered template");
                global.templates.insert(extra.to_string(), template);
            }
        }
        Ok(())
    }
}
