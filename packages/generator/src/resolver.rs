//! Symbol Resolver
//!
//! Maps a generator reference such as `example.com/widgets.Widget->Send` to the
//! function or method it names and builds its descriptor.

use serde::Deserialize;
use smallvec::SmallVec;

use crate::descriptor::{FieldDescriptor, SymbolDescriptor};
use crate::error::ResolveError;
use crate::go::ast::FuncDecl;
use crate::go::Parser;
use crate::loader::PackageLoader;
use crate::reducer::{reduce_fields, UnsupportedShape};

/// Marker separating a receiver filter from the callable name.
pub const METHOD_MARKER: &str = "->";

/// What to do when a candidate declaration uses a type that cannot be described.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnsupportedTypePolicy {
    /// Fail the whole resolution.
    #[default]
    Abort,
    /// Treat the declaration as a non-match and keep scanning.
    Skip,
}

/// Parsed generator reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRef {
    pub raw: String,
    pub package_path: String,
    pub receiver_filter: SmallVec<[String; 2]>,
    pub callable: String,
}

impl SymbolRef {
    pub fn parse(raw: &str) -> Result<SymbolRef, ResolveError> {
        let dot = raw.rfind('.').ok_or_else(|| ResolveError::InvalidReference {
            reference: raw.to_string(),
            reason: String::from("expected '<package>.<name>'"),
        })?;
        let package_path = &raw[..dot];
        if package_path.is_empty() {
            return Err(ResolveError::InvalidReference {
                reference: raw.to_string(),
                reason: String::from("empty package path"),
            });
        }

        let bare = &raw[dot + 1..];
        let (receiver_filter, callable) = match bare.find(METHOD_MARKER) {
            Some(idx) if idx > 0 => (
                bare[..idx].split(',').map(str::to_string).collect(),
                &bare[idx + METHOD_MARKER.len()..],
            ),
            _ => (SmallVec::new(), bare),
        };

        Ok(SymbolRef {
            raw: raw.to_string(),
            package_path: package_path.to_string(),
            receiver_filter,
            callable: callable.to_string(),
        })
    }

    pub fn has_receiver_filter(&self) -> bool {
        !self.receiver_filter.is_empty()
    }
}

/// Filter entries match the receiver's rendered type, with or without its `*`.
fn receiver_matches(filter: &[String], receivers: &[FieldDescriptor]) -> bool {
    filter.len() == receivers.len()
        && filter.iter().zip(receivers).all(|(wanted, field)| {
            let rendered = field.type_string();
            *wanted == rendered || rendered.strip_prefix('*') == Some(wanted.as_str())
        })
}

/// Resolver over a package loader.
pub struct SymbolResolver<L> {
    loader: L,
    parser: Parser,
    policy: UnsupportedTypePolicy,
}

impl<L: PackageLoader> SymbolResolver<L> {
    pub fn new(loader: L) -> Self {
        SymbolResolver {
            loader,
            parser: Parser::new(),
            policy: UnsupportedTypePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: UnsupportedTypePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> UnsupportedTypePolicy {
        self.policy
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Resolve a raw reference string.
    pub fn resolve(&self, reference: &str) -> Result<SymbolDescriptor, ResolveError> {
        let symbol = SymbolRef::parse(reference)?;
        self.resolve_ref(&symbol)
    }

    pub fn resolve_ref(&self, symbol: &SymbolRef) -> Result<SymbolDescriptor, ResolveError> {
        let package = self.loader.load(&symbol.package_path)?;

        for unit in &package.sources {
            let file = match self.parser.parse_file(&unit.text) {
                Ok(file) => file,
                Err(err) => {
                    let err = err.in_file(unit.path.display().to_string());
                    tracing::warn!(error = %err, "skipping unparsable source file");
                    continue;
                }
            };

            for decl in file.funcs.iter().filter(|d| d.name == symbol.callable) {
                match self.build(&package.name, decl, symbol) {
                    Ok(Some(descriptor)) => {
                        tracing::debug!(
                            reference = %symbol.raw,
                            file = %unit.path.display(),
                            line = decl.line,
                            "resolved symbol"
                        );
                        return Ok(descriptor);
                    }
                    Ok(None) => continue,
                    Err(UnsupportedShape(shape)) => match self.policy {
                        UnsupportedTypePolicy::Abort => {
                            return Err(ResolveError::UnsupportedFieldType {
                                callable: symbol.raw.clone(),
                                shape,
                            });
                        }
                        UnsupportedTypePolicy::Skip => {
                            tracing::debug!(
                                reference = %symbol.raw,
                                line = decl.line,
                                shape = %shape,
                                "skipping candidate with unsupported field type"
                            );
                        }
                    },
                }
            }
        }

        Err(ResolveError::SymbolNotFound {
            reference: symbol.raw.clone(),
        })
    }

    /// Build the descriptor for a same-named declaration, or `None` when its
    /// receiver does not fit the filter.
    fn build(
        &self,
        package_name: &str,
        decl: &FuncDecl,
        symbol: &SymbolRef,
    ) -> Result<Option<SymbolDescriptor>, UnsupportedShape> {
        let receiver_fields = match (&decl.receiver, symbol.has_receiver_filter()) {
            (Some(_), false) | (None, true) => return Ok(None),
            (None, false) => Vec::new(),
            (Some(receiver), true) => {
                let fields = reduce_fields(receiver)?;
                if !receiver_matches(&symbol.receiver_filter, &fields) {
                    return Ok(None);
                }
                fields
            }
        };

        Ok(Some(SymbolDescriptor {
            package_name: package_name.to_string(),
            callable_name: symbol.callable.clone(),
            receiver_fields,
            argument_fields: reduce_fields(&decl.signature.params)?,
            return_fields: reduce_fields(&decl.signature.results)?,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_reference() {
        let symbol = SymbolRef::parse("example.com/widgets.NewWidget").unwrap();
        assert_eq!(symbol.package_path, "example.com/widgets");
        assert_eq!(symbol.callable, "NewWidget");
        assert!(!symbol.has_receiver_filter());
    }

    #[test]
    fn test_parse_receiver_filter() {
        let symbol = SymbolRef::parse("pkg.*Widget,Other->Send").unwrap();
        assert_eq!(symbol.package_path, "pkg");
        assert_eq!(symbol.receiver_filter.as_slice(), ["*Widget", "Other"]);
        assert_eq!(symbol.callable, "Send");
    }

    #[test]
    fn test_parse_marker_at_start_is_part_of_name() {
        let symbol = SymbolRef::parse("pkg.->Send").unwrap();
        assert!(!symbol.has_receiver_filter());
        assert_eq!(symbol.callable, "->Send");
    }

    #[test]
    fn test_parse_without_package() {
        assert!(matches!(
            SymbolRef::parse("Send"),
            Err(ResolveError::InvalidReference { .. })
        ));
        assert!(SymbolRef::parse(".Send").is_err());
    }
}
