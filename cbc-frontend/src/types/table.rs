//! Type table: canonical types by syntactic reference
//!
//! The table is built before semantic analysis (named aggregates are
//! registered by the resolver) and read-only during it. It also pins the
//! platform integer types the conversion algebra needs.

use super::Type;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Syntactic reference to a type, as written in source
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeRef {
    Void,
    Char,
    UnsignedChar,
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    Long,
    UnsignedLong,
    Pointer(Box<TypeRef>),
    Array(Box<TypeRef>, Option<u64>),
    Struct(String),
    Union(String),
}

/// Mapping from type references to canonical type values (ILP32 platform)
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    named: HashMap<TypeRef, Type>,
}

impl TypeTable {
    /// The ILP32 table: int, long, and pointers are all 4 bytes.
    pub fn ilp32() -> Self {
        Self::default()
    }

    /// Register a named aggregate type.
    pub fn define(&mut self, type_ref: TypeRef, ty: Type) {
        self.named.insert(type_ref, ty);
    }

    /// Resolve a reference to its canonical type. Composite references are
    /// resolved structurally; named aggregates must have been registered.
    pub fn get(&self, type_ref: &TypeRef) -> Option<Type> {
        match type_ref {
            TypeRef::Void => Some(Type::Void),
            TypeRef::Char => Some(Type::Char),
            TypeRef::UnsignedChar => Some(Type::UnsignedChar),
            TypeRef::Short => Some(Type::Short),
            TypeRef::UnsignedShort => Some(Type::UnsignedShort),
            TypeRef::Int => Some(Type::Int),
            TypeRef::UnsignedInt => Some(Type::UnsignedInt),
            TypeRef::Long => Some(Type::Long),
            TypeRef::UnsignedLong => Some(Type::UnsignedLong),
            TypeRef::Pointer(base) => self.get(base).map(|base| Type::Pointer {
                base: Box::new(base),
            }),
            TypeRef::Array(element, size) => self.get(element).map(|element_type| Type::Array {
                element_type: Box::new(element_type),
                size: *size,
            }),
            TypeRef::Struct(_) | TypeRef::Union(_) => self.named.get(type_ref).cloned(),
        }
    }

    /// Byte size of the referenced type, when complete.
    pub fn size_of(&self, type_ref: &TypeRef) -> Option<u64> {
        self.get(type_ref).and_then(|t| t.size())
    }

    pub fn signed_int(&self) -> Type {
        Type::Int
    }

    pub fn unsigned_int(&self) -> Type {
        Type::UnsignedInt
    }

    pub fn signed_long(&self) -> Type {
        Type::Long
    }

    pub fn unsigned_long(&self) -> Type {
        Type::UnsignedLong
    }

    /// The signed integer type used for pointer differences and
    /// pointer-arithmetic scaling literals.
    pub fn ptr_diff_type(&self) -> Type {
        Type::Long
    }

    pub fn ptr_diff_type_ref(&self) -> TypeRef {
        TypeRef::Long
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StructField;

    #[test]
    fn test_scalar_resolution() {
        let table = TypeTable::ilp32();
        assert_eq!(table.get(&TypeRef::Int), Some(Type::Int));
        assert_eq!(table.get(&TypeRef::UnsignedLong), Some(Type::UnsignedLong));
        assert_eq!(table.size_of(&TypeRef::Short), Some(2));
    }

    #[test]
    fn test_composite_resolution() {
        let table = TypeTable::ilp32();
        let int_ptr = table.get(&TypeRef::Pointer(Box::new(TypeRef::Int))).unwrap();
        assert!(int_ptr.is_pointer());
        assert_eq!(int_ptr.base_type(), Some(&Type::Int));

        let array = table
            .get(&TypeRef::Array(Box::new(TypeRef::Char), Some(16)))
            .unwrap();
        assert!(array.is_allocated_array());
        assert_eq!(array.size(), Some(16));
    }

    #[test]
    fn test_named_types() {
        let mut table = TypeTable::ilp32();
        let point = Type::Struct {
            name: "point".to_string(),
            fields: vec![
                StructField {
                    name: "x".to_string(),
                    field_type: Type::Int,
                },
                StructField {
                    name: "y".to_string(),
                    field_type: Type::Int,
                },
            ],
        };
        table.define(TypeRef::Struct("point".to_string()), point.clone());

        assert_eq!(table.get(&TypeRef::Struct("point".to_string())), Some(point));
        assert_eq!(table.size_of(&TypeRef::Struct("point".to_string())), Some(8));
        assert_eq!(table.get(&TypeRef::Struct("missing".to_string())), None);
    }

    #[test]
    fn test_platform_accessors() {
        let table = TypeTable::ilp32();
        assert_eq!(table.signed_int(), Type::Int);
        assert_eq!(table.unsigned_int(), Type::UnsignedInt);
        assert_eq!(table.signed_long(), Type::Long);
        assert_eq!(table.unsigned_long(), Type::UnsignedLong);
        assert_eq!(table.ptr_diff_type(), Type::Long);
        assert_eq!(table.signed_int().size(), table.signed_long().size());
    }
}
