//! Type system definitions for cbc
//!
//! This module defines the type system used throughout the compiler:
//! the platform integer types, pointers, arrays, structs, unions, and
//! function types, together with the predicates and relations the type
//! checker drives its decisions with.

pub mod table;

pub use table::{TypeRef, TypeTable};

use serde::{Deserialize, Serialize};
use std::fmt;

/// cbc type system (ILP32: int and long are both 4 bytes, as are pointers)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Type {
    /// Void type
    Void,

    /// Character types (char is signed)
    Char,
    UnsignedChar,

    /// Integer types
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    Long,
    UnsignedLong,

    /// Pointer to another type
    Pointer { base: Box<Type> },

    /// Array type; a missing size marks an incomplete array
    Array {
        element_type: Box<Type>,
        size: Option<u64>,
    },

    /// Struct type
    Struct {
        name: String,
        fields: Vec<StructField>,
    },

    /// Union type
    Union {
        name: String,
        fields: Vec<StructField>,
    },

    /// Function type
    Function {
        return_type: Box<Type>,
        parameters: Vec<Type>,
        is_variadic: bool,
    },
}

impl Type {
    /// Get the size of this type in bytes (ILP32)
    ///
    /// Incomplete arrays and functions have no size. Void sizes as one byte
    /// so that `void*` arithmetic in compound assignments scales by 1.
    pub fn size(&self) -> Option<u64> {
        match self {
            Type::Void => Some(1),
            Type::Char | Type::UnsignedChar => Some(1),
            Type::Short | Type::UnsignedShort => Some(2),
            Type::Int | Type::UnsignedInt => Some(4),
            Type::Long | Type::UnsignedLong => Some(4),
            Type::Pointer { .. } => Some(4),
            Type::Array {
                element_type,
                size: Some(count),
            } => element_type.size().map(|elem_size| elem_size * count),
            Type::Array { size: None, .. } => None,
            Type::Struct { fields, .. } => {
                let mut total = 0;
                for field in fields {
                    total += field.field_type.size()?;
                }
                Some(total)
            }
            Type::Union { fields, .. } => {
                fields.iter().filter_map(|f| f.field_type.size()).max()
            }
            Type::Function { .. } => None,
        }
    }

    /// Check whether `value` is representable in this integer type
    pub fn is_in_domain(&self, value: i64) -> bool {
        match self {
            Type::Char => (-0x80..=0x7f).contains(&value),
            Type::UnsignedChar => (0..=0xff).contains(&value),
            Type::Short => (-0x8000..=0x7fff).contains(&value),
            Type::UnsignedShort => (0..=0xffff).contains(&value),
            Type::Int | Type::Long => {
                (i64::from(i32::MIN)..=i64::from(i32::MAX)).contains(&value)
            }
            Type::UnsignedInt | Type::UnsignedLong => (0..=i64::from(u32::MAX)).contains(&value),
            _ => false,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Type::Char
                | Type::UnsignedChar
                | Type::Short
                | Type::UnsignedShort
                | Type::Int
                | Type::UnsignedInt
                | Type::Long
                | Type::UnsignedLong
        )
    }

    pub fn is_signed(&self) -> bool {
        matches!(self, Type::Char | Type::Short | Type::Int | Type::Long)
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, Type::Pointer { .. })
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array { .. })
    }

    pub fn is_incomplete_array(&self) -> bool {
        matches!(self, Type::Array { size: None, .. })
    }

    pub fn is_allocated_array(&self) -> bool {
        matches!(self, Type::Array { size: Some(_), .. })
    }

    /// Pointers and arrays; the `*` operator applies to both since arrays
    /// decay to pointers in operand positions.
    pub fn is_dereferable(&self) -> bool {
        matches!(self, Type::Pointer { .. } | Type::Array { .. })
    }

    /// Integers and dereferable values
    pub fn is_scalar(&self) -> bool {
        self.is_integer() || self.is_dereferable()
    }

    pub fn is_struct(&self) -> bool {
        matches!(self, Type::Struct { .. })
    }

    pub fn is_union(&self) -> bool {
        matches!(self, Type::Union { .. })
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Type::Function { .. })
    }

    /// Pointer base or array element type
    pub fn base_type(&self) -> Option<&Type> {
        match self {
            Type::Pointer { base } => Some(base),
            Type::Array { element_type, .. } => Some(element_type),
            _ => None,
        }
    }

    /// Return type, for function types
    pub fn return_type(&self) -> Option<&Type> {
        match self {
            Type::Function { return_type, .. } => Some(return_type),
            _ => None,
        }
    }

    /// Whether a call with `argc` arguments matches this function type
    pub fn accepts_argc(&self, argc: usize) -> bool {
        match self {
            Type::Function {
                parameters,
                is_variadic,
                ..
            } => {
                if *is_variadic {
                    argc >= parameters.len()
                } else {
                    argc == parameters.len()
                }
            }
            _ => false,
        }
    }

    /// Directed compatibility: a `self`-value can stand where an `other`
    /// value is expected without a warning.
    pub fn is_compatible(&self, other: &Type) -> bool {
        if self.is_integer() {
            return other.is_integer() && self.size() <= other.size();
        }
        match self {
            Type::Void => other.is_void(),
            Type::Pointer { base } => match other {
                Type::Pointer { base: other_base } => {
                    if base.is_void() || other_base.is_void() {
                        return true;
                    }
                    base.is_compatible(other_base) && base.size() == other_base.size()
                }
                _ => false,
            },
            Type::Array { element_type, .. } => match other.base_type() {
                Some(other_base) if other.is_dereferable() => {
                    if other_base.is_void() {
                        return true;
                    }
                    element_type.is_compatible(other_base)
                        && element_type.size() == other_base.size()
                }
                _ => false,
            },
            Type::Struct { .. } | Type::Union { .. } | Type::Function { .. } => self == other,
            _ => false,
        }
    }

    /// Broader convertibility, including warning-eligible conversions
    pub fn is_castable_to(&self, target: &Type) -> bool {
        if self.is_integer() {
            return target.is_integer() || target.is_pointer();
        }
        match self {
            Type::Void => target.is_void(),
            Type::Pointer { .. } => target.is_pointer() || target.is_integer(),
            Type::Array { .. } => {
                target.is_pointer() || target.is_array() || target.is_integer()
            }
            Type::Struct { .. } | Type::Union { .. } => self == target,
            Type::Function { .. } => target.is_pointer(),
            _ => false,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Void => write!(f, "void"),
            Type::Char => write!(f, "char"),
            Type::UnsignedChar => write!(f, "unsigned char"),
            Type::Short => write!(f, "short"),
            Type::UnsignedShort => write!(f, "unsigned short"),
            Type::Int => write!(f, "int"),
            Type::UnsignedInt => write!(f, "unsigned int"),
            Type::Long => write!(f, "long"),
            Type::UnsignedLong => write!(f, "unsigned long"),
            Type::Pointer { base } => write!(f, "{base}*"),
            Type::Array {
                element_type,
                size: Some(n),
            } => write!(f, "{element_type}[{n}]"),
            Type::Array {
                element_type,
                size: None,
            } => write!(f, "{element_type}[]"),
            Type::Function {
                return_type,
                parameters,
                is_variadic,
            } => {
                write!(f, "{return_type} (")?;
                for (i, param) in parameters.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{param}")?;
                }
                if *is_variadic {
                    write!(f, ", ...")?;
                }
                write!(f, ")")
            }
            Type::Struct { name, .. } => write!(f, "struct {name}"),
            Type::Union { name, .. } => write!(f, "union {name}"),
        }
    }
}

/// Struct/union field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructField {
    pub name: String,
    pub field_type: Type,
}

/// Shorthand for a pointer type
pub fn pointer_to(base: Type) -> Type {
    Type::Pointer {
        base: Box::new(base),
    }
}
