//! Field Reducer
//!
//! Turns Go AST fields into field descriptors. Only named types, slices and
//! pointers to named types can be described.

use crate::descriptor::{FieldDescriptor, TypeDescriptor};
use crate::go::ast::{Field, TypeExpr};

/// Why a type expression could not be reduced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedShape(pub String);

/// Reduce a type expression to a descriptor.
pub fn reduce_type(expr: &TypeExpr) -> Result<TypeDescriptor, UnsupportedShape> {
    match expr {
        TypeExpr::Named { package: None, name } => Ok(TypeDescriptor::named(name.as_str())),
        TypeExpr::Named {
            package: Some(package),
            name,
        } => Ok(TypeDescriptor::named(format!("{}.{}", package, name))),
        TypeExpr::Slice(elem) => Ok(TypeDescriptor::slice(reduce_type(elem)?)),
        TypeExpr::Pointer(target) => match target.as_ref() {
            TypeExpr::Named { .. } => Ok(TypeDescriptor::pointer(reduce_type(target)?)),
            other => Err(UnsupportedShape(format!("pointer to {}", other.shape()))),
        },
        other => Err(UnsupportedShape(other.shape().to_string())),
    }
}

/// Reduce one field into one descriptor per bound name, or a single unnamed one.
pub fn reduce_field(field: &Field) -> Result<Vec<FieldDescriptor>, UnsupportedShape> {
    let ty = reduce_type(&field.ty)?;
    if field.names.is_empty() {
        return Ok(vec![FieldDescriptor::unnamed(ty)]);
    }
    Ok(field
        .names
        .iter()
        .map(|name| FieldDescriptor::new(name.as_str(), ty.clone()))
        .collect())
}

/// Reduce a whole parameter, result or receiver list, keeping declared order.
pub fn reduce_fields(fields: &[Field]) -> Result<Vec<FieldDescriptor>, UnsupportedShape> {
    let mut reduced = Vec::with_capacity(fields.len());
    for field in fields {
        reduced.extend(reduce_field(field)?);
    }
    Ok(reduced)
}
