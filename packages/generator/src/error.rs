//! Error Types
//!
//! One enum per stage of the pipeline, folded into `GeneratorError` at the top.

use std::path::PathBuf;

use thiserror::Error;

/// A directive field that could not be split into `name:value`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectiveError {
    #[error("malformed directive field '{field}': expected 'name:value'")]
    Malformed { field: String },
}

/// Syntax error raised while scanning or parsing Go source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{file}:{line}: {message}")]
pub struct GoSyntaxError {
    pub file: String,
    pub line: usize,
    pub message: String,
}

impl GoSyntaxError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        GoSyntaxError {
            file: String::from("<source>"),
            line,
            message: message.into(),
        }
    }

    pub fn in_file(mut self, file: impl Into<String>) -> Self {
        self.file = file.into();
        self
    }
}

/// Failures while turning a generator reference into a symbol descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("invalid generator reference '{reference}': {reason}")]
    InvalidReference { reference: String, reason: String },

    #[error("cannot find package '{import_path}' (searched: {searched})")]
    PackageNotFound { import_path: String, searched: String },

    #[error("failed to load package '{import_path}': {message}")]
    PackageLoad { import_path: String, message: String },

    #[error("could not locate reference: {reference}")]
    SymbolNotFound { reference: String },

    #[error("unsupported field type in {callable}: {shape}")]
    UnsupportedFieldType { callable: String, shape: String },
}

/// Template registration and rendering failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("failed to load template '{}': {message}", path.display())]
    Load { path: PathBuf, message: String },

    #[error("template '{name}': parse error at offset {offset}: {message}")]
    Parse {
        name: String,
        offset: usize,
        message: String,
    },

    #[error("template '{name}' is not registered")]
    NotRegistered { name: String },

    #[error("template '{name}': {message}")]
    Render { name: String, message: String },
}

/// Top-level error for a generator run.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error(transparent)]
    Directive(#[from] DirectiveError),

    #[error(transparent)]
    Syntax(#[from] GoSyntaxError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("i/o error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GeneratorError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GeneratorError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, GeneratorError>;
