/**
 * Go Declaration AST
 *
 * Only the parts of a Go file the resolver looks at: the package clause and the
 * signatures of top-level functions and methods.
 */

/// Channel direction of a `chan` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

/// Go type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// `Name` or `pkg.Name`
    Named {
        package: Option<String>,
        name: String,
    },
    /// `Name[A, B]`
    Generic {
        base: Box<TypeExpr>,
        args: Vec<TypeExpr>,
    },
    Pointer(Box<TypeExpr>),
    Slice(Box<TypeExpr>),
    Array {
        len: String,
        elem: Box<TypeExpr>,
    },
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    Chan {
        dir: ChanDir,
        elem: Box<TypeExpr>,
    },
    Func(Box<Signature>),
    Struct,
    Interface,
    /// `...T` in the last parameter
    Ellipsis(Box<TypeExpr>),
    Paren(Box<TypeExpr>),
}

impl TypeExpr {
    pub fn named(name: impl Into<String>) -> Self {
        TypeExpr::Named {
            package: None,
            name: name.into(),
        }
    }

    /// Short label for the shape, used in diagnostics.
    pub fn shape(&self) -> &'static str {
        match self {
            TypeExpr::Named { .. } => "named type",
            TypeExpr::Generic { .. } => "generic instantiation",
            TypeExpr::Pointer(_) => "pointer type",
            TypeExpr::Slice(_) => "slice type",
            TypeExpr::Array { .. } => "array type",
            TypeExpr::Map { .. } => "map type",
            TypeExpr::Chan { .. } => "channel type",
            TypeExpr::Func(_) => "function type",
            TypeExpr::Struct => "struct literal type",
            TypeExpr::Interface => "interface literal type",
            TypeExpr::Ellipsis(_) => "variadic parameter",
            TypeExpr::Paren(_) => "parenthesized type",
        }
    }
}

/// One entry of a parameter, result or receiver list.
///
/// `a, b int` is a single field with two names; an unnamed field has none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub names: Vec<String>,
    pub ty: TypeExpr,
}

impl Field {
    pub fn new(names: Vec<String>, ty: TypeExpr) -> Self {
        Field { names, ty }
    }

    pub fn unnamed(ty: TypeExpr) -> Self {
        Field { names: Vec::new(), ty }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Signature {
    pub params: Vec<Field>,
    pub results: Vec<Field>,
}

/// Top-level `func` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    pub name: String,
    pub receiver: Option<Vec<Field>>,
    pub has_type_params: bool,
    pub signature: Signature,
    pub line: usize,
}

impl FuncDecl {
    pub fn is_method(&self) -> bool {
        self.receiver.is_some()
    }
}

/// Parsed Go source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub package: String,
    pub funcs: Vec<FuncDecl>,
}
