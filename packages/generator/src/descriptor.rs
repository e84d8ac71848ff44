//! Type Descriptor Model
//!
//! Portable description of a resolved callable: where it lives, and the
//! receiver, argument and return fields of its signature.

use std::fmt;

/// Name of the type that marks a field as an error result.
pub const ERROR_TYPE_NAME: &str = "error";

/// Closed type shape a field may take.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    Named(String),
    Slice(Box<TypeDescriptor>),
    Pointer(Box<TypeDescriptor>),
}

impl TypeDescriptor {
    pub fn named(name: impl Into<String>) -> Self {
        TypeDescriptor::Named(name.into())
    }

    pub fn slice(inner: TypeDescriptor) -> Self {
        TypeDescriptor::Slice(Box::new(inner))
    }

    pub fn pointer(inner: TypeDescriptor) -> Self {
        TypeDescriptor::Pointer(Box::new(inner))
    }

    /// Render back to source form, e.g. `[]*Widget`.
    pub fn render(&self) -> String {
        match self {
            TypeDescriptor::Named(name) => name.clone(),
            TypeDescriptor::Slice(inner) => format!("[]{}", inner.render()),
            TypeDescriptor::Pointer(inner) => format!("*{}", inner.render()),
        }
    }

    /// Innermost named type.
    pub fn base_name(&self) -> &str {
        match self {
            TypeDescriptor::Named(name) => name,
            TypeDescriptor::Slice(inner) | TypeDescriptor::Pointer(inner) => inner.base_name(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, TypeDescriptor::Named(name) if name == ERROR_TYPE_NAME)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// One receiver, parameter or result binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    name: String,
    ty: TypeDescriptor,
    is_error: bool,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        let is_error = ty.is_error();
        FieldDescriptor {
            name: name.into(),
            ty,
            is_error,
        }
    }

    pub fn unnamed(ty: TypeDescriptor) -> Self {
        FieldDescriptor::new(String::new(), ty)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &TypeDescriptor {
        &self.ty
    }

    pub fn type_string(&self) -> String {
        self.ty.render()
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.ty)
        } else {
            write!(f, "{} {}", self.name, self.ty)
        }
    }
}

/// Fully resolved callable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolDescriptor {
    pub package_name: String,
    pub callable_name: String,
    pub receiver_fields: Vec<FieldDescriptor>,
    pub argument_fields: Vec<FieldDescriptor>,
    pub return_fields: Vec<FieldDescriptor>,
}

impl SymbolDescriptor {
    pub fn is_method(&self) -> bool {
        !self.receiver_fields.is_empty()
    }

    /// True when the last result is an error.
    pub fn returns_error(&self) -> bool {
        self.return_fields.last().map_or(false, FieldDescriptor::is_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_nested_type() {
        let ty = TypeDescriptor::slice(TypeDescriptor::pointer(TypeDescriptor::named("Thing")));
        assert_eq!(ty.render(), "[]*Thing");
        assert_eq!(ty.base_name(), "Thing");
    }

    #[test]
    fn test_field_display() {
        let named = FieldDescriptor::new("msg", TypeDescriptor::named("string"));
        assert_eq!(named.to_string(), "msg string");
        let unnamed = FieldDescriptor::unnamed(TypeDescriptor::named("error"));
        assert_eq!(unnamed.to_string(), "error");
        assert!(unnamed.is_error());
    }

    #[test]
    fn test_error_flag_only_for_bare_error() {
        assert!(!FieldDescriptor::unnamed(TypeDescriptor::slice(TypeDescriptor::named("error")))
            .is_error());
        assert!(!FieldDescriptor::unnamed(TypeDescriptor::named("errors.Error")).is_error());
    }
}
