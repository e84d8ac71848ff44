//! Render data
//!
//! The tree a template is rendered against.

use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Str(String),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
    /// Record with named fields and an optional printed form.
    Object {
        fields: IndexMap<String, Value>,
        display: Option<String>,
    },
}

impl Value {
    pub fn object(fields: IndexMap<String, Value>) -> Value {
        Value::Object {
            fields,
            display: None,
        }
    }

    pub fn object_with_display(fields: IndexMap<String, Value>, display: impl Into<String>) -> Value {
        Value::Object {
            fields,
            display: Some(display.into()),
        }
    }

    pub fn string_map(map: &IndexMap<String, String>) -> Value {
        Value::Map(
            map.iter()
                .map(|(k, v)| (k.clone(), Value::Str(v.clone())))
                .collect(),
        )
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "nil",
            Value::Bool(_) => "bool",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Object { .. } => "object",
        }
    }

    /// Field or map entry by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(entries) | Value::Object { fields: entries, .. } => entries.get(key),
            _ => None,
        }
    }

    /// Follow a field chain. A missing key is an error, never an empty value.
    pub fn lookup(&self, path: &[String]) -> Result<&Value, String> {
        let mut current = self;
        for key in path {
            current = match current {
                Value::Map(entries) | Value::Object { fields: entries, .. } => entries
                    .get(key)
                    .ok_or_else(|| format!("map has no entry for key {:?}", key))?,
                Value::Null => return Err(format!("nil data; no entry for key {:?}", key)),
                other => {
                    return Err(format!("can't evaluate field {} in type {}", key, other.kind()));
                }
            };
        }
        Ok(current)
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Map(entries) => !entries.is_empty(),
            Value::Object { .. } => true,
        }
    }

    /// Printed form used by output actions.
    pub fn print(&self) -> Result<String, String> {
        match self {
            Value::Null => Ok(String::new()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Str(s) => Ok(s.clone()),
            Value::List(items) => {
                let printed = items.iter().map(Value::print).collect::<Result<Vec<_>, _>>()?;
                Ok(format!("[{}]", printed.join(" ")))
            }
            Value::Map(_) => Err(String::from("can't print a map")),
            Value::Object {
                display: Some(display),
                ..
            } => Ok(display.clone()),
            Value::Object { display: None, .. } => {
                Err(String::from("can't print an object without a display form"))
            }
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(entries: IndexMap<String, Value>) -> Self {
        Value::Map(entries)
    }
}
