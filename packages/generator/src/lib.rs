#![deny(clippy::all)]

/**
 * apigen
 *
 * Source-to-source generator driven by `apig` comment directives in Go files
 */

// Shared
pub mod chars;
pub mod config;
pub mod descriptor;
pub mod error;

// Directive handling
pub mod directive;

// Go declaration syntax and symbol resolution
pub mod go;
pub mod loader;
pub mod reducer;
pub mod resolver;

// Output
pub mod emit;
pub mod pipeline;
pub mod template;

// Re-exports
pub use config::{DefConfig, GeneratorOptions, GlobalConfig};
pub use descriptor::{FieldDescriptor, SymbolDescriptor, TypeDescriptor};
pub use directive::{Diagnostic, DirectiveInterpreter, FieldKey, SpecialKey};
pub use error::{
    DirectiveError, GeneratorError, GoSyntaxError, ResolveError, Result, TemplateError,
};
pub use loader::{FsPackageLoader, LoadedPackage, MemoryPackageLoader, PackageLoader, SourceUnit};
pub use pipeline::{DefinitionFailure, GenerationReport, Generator, Interpretation};
pub use resolver::{SymbolRef, SymbolResolver, UnsupportedTypePolicy};
pub use template::{Template, Value};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
