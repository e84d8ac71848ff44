//! Generator Configuration
//!
//! The process-wide registry built from global directives, the per-definition
//! record built from each `gen:` directive, and the options a run starts with.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::chars;
use crate::descriptor::SymbolDescriptor;
use crate::error::ResolveError;
use crate::loader::PackageLoader;
use crate::resolver::{SymbolResolver, UnsupportedTypePolicy, METHOD_MARKER};
use crate::template::Template;

/// Settings for one generator run.
#[derive(Debug, Clone, Default)]
pub struct GeneratorOptions {
    /// Base directory for relative template paths.
    pub template_root: Option<PathBuf>,
    /// Directories searched for import paths before `$GOPATH`.
    pub package_roots: Vec<PathBuf>,
    pub unsupported_types: UnsupportedTypePolicy,
}

impl GeneratorOptions {
    /// Resolve a template path against the template root.
    pub fn template_path(&self, value: &str) -> PathBuf {
        let path = Path::new(value);
        match &self.template_root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// Registry filled by global directives (`<name>All`, `<name>Args`,
/// `<name>Return`, `<name>Template`). Later registrations overwrite earlier ones.
#[derive(Debug, Clone, Default)]
pub struct GlobalConfig {
    pub options: IndexMap<String, String>,
    pub argument_aliases: IndexMap<String, String>,
    pub return_aliases: IndexMap<String, String>,
    pub templates: IndexMap<String, Template>,
}

impl GlobalConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn template(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }
}

/// One generation request, built from a directive line carrying `gen:`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefConfig {
    pub generator_ref: String,
    pub on_type: Vec<String>,
    pub method_name: String,
    pub alias: String,
    pub arguments_alias: String,
    pub return_alias: String,
    pub template_name: String,
    pub options: IndexMap<String, String>,
    /// Source line of the directive.
    pub line: usize,
    resolved_symbol: Option<SymbolDescriptor>,
}

impl DefConfig {
    pub fn new(generator_ref: impl Into<String>) -> Self {
        DefConfig {
            generator_ref: generator_ref.into(),
            ..Self::default()
        }
    }

    pub fn resolved_symbol(&self) -> Option<&SymbolDescriptor> {
        self.resolved_symbol.as_ref()
    }

    /// Substitute registered aliases into the aliasable fields.
    pub fn apply_aliases(&mut self, global: &GlobalConfig) {
        if let Some(value) = global.argument_aliases.get(&self.arguments_alias) {
            self.arguments_alias = chars::remove_quotation_marks(value);
        }
        if let Some(value) = global.return_aliases.get(&self.return_alias) {
            self.return_alias = value.clone();
        }
    }

    /// Split the generator reference into receiver types and method name.
    pub fn split_reference(&mut self) {
        match self.generator_ref.find(METHOD_MARKER) {
            Some(idx) if idx > 0 => {
                self.on_type = self.generator_ref[..idx]
                    .split(',')
                    .map(str::to_string)
                    .collect();
                self.method_name = self.generator_ref[idx + METHOD_MARKER.len()..].to_string();
            }
            _ => {
                self.on_type.clear();
                self.method_name = self.generator_ref.clone();
            }
        }
    }

    /// Finalize against the frozen registry: aliases, reference split, then
    /// symbol resolution. The descriptor is attached only on success.
    pub fn setup<L: PackageLoader>(
        &mut self,
        global: &GlobalConfig,
        resolver: &SymbolResolver<L>,
    ) -> Result<&SymbolDescriptor, ResolveError> {
        self.apply_aliases(global);
        self.split_reference();

        if self.resolved_symbol.is_none() {
            self.resolved_symbol = Some(resolver.resolve(&self.generator_ref)?);
        }
        match &self.resolved_symbol {
            Some(symbol) => Ok(symbol),
            None => Err(ResolveError::SymbolNotFound {
                reference: self.generator_ref.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::MemoryPackageLoader;

    fn global() -> GlobalConfig {
        let mut global = GlobalConfig::new();
        global
            .argument_aliases
            .insert("std".to_string(), "\"ctx context.Context\"".to_string());
        global
            .return_aliases
            .insert("res".to_string(), "\"(*Result, error)\"".to_string());
        global
    }

    #[test]
    fn test_apply_aliases() {
        let mut def = DefConfig::new("pkg.F");
        def.arguments_alias = "std".to_string();
        def.return_alias = "res".to_string();
        def.apply_aliases(&global());
        assert_eq!(def.arguments_alias, "ctx context.Context");
        assert_eq!(def.return_alias, "\"(*Result, error)\"");
    }

    #[test]
    fn test_alias_miss_keeps_value() {
        let mut def = DefConfig::new("pkg.F");
        def.arguments_alias = "a, b int".to_string();
        def.apply_aliases(&global());
        assert_eq!(def.arguments_alias, "a, b int");
    }

    #[test]
    fn test_split_reference() {
        let mut def = DefConfig::new("pkg.Widget->Send");
        def.split_reference();
        assert_eq!(def.on_type, vec!["pkg.Widget"]);
        assert_eq!(def.method_name, "Send");

        let mut def = DefConfig::new("pkg.Send");
        def.split_reference();
        assert!(def.on_type.is_empty());
        assert_eq!(def.method_name, "pkg.Send");
    }

    #[test]
    fn test_setup_attaches_symbol_once() {
        let loader = MemoryPackageLoader::new()
            .with_file("pkg", "f.go", "package pkg\nfunc F(a int) {}\n");
        let resolver = SymbolResolver::new(loader);
        let mut def = DefConfig::new("pkg.F");
        let symbol = def.setup(&GlobalConfig::new(), &resolver).unwrap().clone();
        assert_eq!(symbol.argument_fields.len(), 1);
        assert_eq!(def.resolved_symbol(), Some(&symbol));
    }

    #[test]
    fn test_setup_failure_leaves_symbol_empty() {
        let resolver = SymbolResolver::new(MemoryPackageLoader::new());
        let mut def = DefConfig::new("pkg.F");
        assert!(def.setup(&GlobalConfig::new(), &resolver).is_err());
        assert!(def.resolved_symbol().is_none());
    }

    #[test]
    fn test_template_path() {
        let options = GeneratorOptions {
            template_root: Some(PathBuf::from("/tpl")),
            ..Default::default()
        };
        assert_eq!(options.template_path("send.tmpl"), PathBuf::from("/tpl/send.tmpl"));
        assert_eq!(options.template_path("/abs/x.tmpl"), PathBuf::from("/abs/x.tmpl"));
    }
}
