//! Emission Driver
//!
//! Builds the render data for a definition and writes the rendered template to
//! the output sink.

use std::io::Write;
use std::path::PathBuf;

use indexmap::IndexMap;

use crate::config::{DefConfig, GlobalConfig};
use crate::descriptor::{FieldDescriptor, SymbolDescriptor};
use crate::error::{GeneratorError, Result, TemplateError};
use crate::template::Value;

fn entries<const N: usize>(pairs: [(&str, Value); N]) -> IndexMap<String, Value> {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

fn string_list(items: &[String]) -> Value {
    Value::List(items.iter().map(|s| Value::from(s.as_str())).collect())
}

/// `{ Name, Type, IsError }`, printed as `name type`.
pub fn field_value(field: &FieldDescriptor) -> Value {
    Value::object_with_display(
        entries([
            ("Name", Value::from(field.name())),
            ("Type", Value::from(field.type_string())),
            ("IsError", Value::from(field.is_error())),
        ]),
        field.to_string(),
    )
}

fn field_list(fields: &[FieldDescriptor]) -> Value {
    Value::List(fields.iter().map(field_value).collect())
}

pub fn symbol_value(symbol: &SymbolDescriptor) -> Value {
    Value::object_with_display(
        entries([
            ("Package", Value::from(symbol.package_name.as_str())),
            ("Name", Value::from(symbol.callable_name.as_str())),
            ("Receivers", field_list(&symbol.receiver_fields)),
            ("Arguments", field_list(&symbol.argument_fields)),
            ("Returns", field_list(&symbol.return_fields)),
        ]),
        format!("{}.{}", symbol.package_name, symbol.callable_name),
    )
}

pub fn global_value(global: &GlobalConfig) -> Value {
    let names: Vec<String> = global.templates.keys().cloned().collect();
    Value::object(entries([
        ("Options", Value::string_map(&global.options)),
        ("Arguments", Value::string_map(&global.argument_aliases)),
        ("Returns", Value::string_map(&global.return_aliases)),
        ("Templates", string_list(&names)),
    ]))
}

pub fn definition_value(def: &DefConfig, symbol: &SymbolDescriptor) -> Value {
    Value::object(entries([
        ("Generator", Value::from(def.generator_ref.as_str())),
        ("Method", Value::from(def.method_name.as_str())),
        ("OnType", string_list(&def.on_type)),
        ("Alias", Value::from(def.alias.as_str())),
        ("Arguments", Value::from(def.arguments_alias.as_str())),
        ("Return", Value::from(def.return_alias.as_str())),
        ("Template", Value::from(def.template_name.as_str())),
        ("Options", Value::string_map(&def.options)),
        ("Symbol", symbol_value(symbol)),
    ]))
}

/// Root data: `{ Global, Definition }`.
pub fn render_context(global: &GlobalConfig, def: &DefConfig, symbol: &SymbolDescriptor) -> Value {
    Value::Map(entries([
        ("Global", global_value(global)),
        ("Definition", definition_value(def, symbol)),
    ]))
}

/// Renders definitions against a frozen registry into a sink.
pub struct Emitter<'g, W> {
    global: &'g GlobalConfig,
    sink: W,
}

impl<'g, W: Write> Emitter<'g, W> {
    pub fn new(global: &'g GlobalConfig, sink: W) -> Self {
        Emitter { global, sink }
    }

    /// Render one definition. Returns `false` when it has no resolved symbol.
    pub fn emit(&mut self, def: &DefConfig) -> Result<bool> {
        let symbol = match def.resolved_symbol() {
            Some(symbol) => symbol,
            None => {
                tracing::debug!(generator = %def.generator_ref, "no resolved symbol, nothing to render");
                return Ok(false);
            }
        };
        let template = self
            .global
            .template(&def.template_name)
            .ok_or_else(|| TemplateError::NotRegistered {
                name: def.template_name.clone(),
            })?;

        let mut text = template.render(&render_context(self.global, def, symbol))?;
        if !text.ends_with('\n') {
            text.push('\n');
        }
        self.sink
            .write_all(text.as_bytes())
            .map_err(|e| GeneratorError::io(PathBuf::from("<output>"), e))?;
        tracing::debug!(generator = %def.generator_ref, template = template.name(), "rendered");
        Ok(true)
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}
