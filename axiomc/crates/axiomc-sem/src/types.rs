//! The Axiom type system.
//!
//! Types are a small tagged union: four primitives, homogeneous lists,
//! objects with ordered properties, and `Unknown`, the element type of an
//! empty list literal, which structurally unifies with anything.

use std::fmt;

use indexmap::IndexMap;

use axiomc_par::ast::{PrimType, TypeAnno};

/// A type in the rule language.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    /// 64-bit signed integer
    Int,
    /// UTF-8 string
    String,
    /// Boolean
    Bool,
    /// Instant in time (ISO-8601)
    Date,
    /// Element type of an empty list literal; matches any type
    Unknown,
    /// Homogeneous list
    List(Box<Type>),
    /// Object with ordered properties
    Object(IndexMap<String, Type>),
}

impl Type {
    /// Structural equality with `Unknown` as a wildcard on either side.
    ///
    /// Lists compare element-wise; objects must carry the same property
    /// set with pairwise-compatible types.
    pub fn compatible(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Unknown, _) | (_, Type::Unknown) => true,
            (Type::List(a), Type::List(b)) => a.compatible(b),
            (Type::Object(a), Type::Object(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(key, ta)| b.get(key).is_some_and(|tb| ta.compatible(tb)))
            }
            _ => self == other,
        }
    }

    /// Lowers a syntactic annotation (`int`, `string[]`, ...) to its type.
    pub fn from_anno(anno: &TypeAnno) -> Type {
        let prim = match anno.prim {
            PrimType::Int => Type::Int,
            PrimType::String => Type::String,
            PrimType::Bool => Type::Bool,
            PrimType::Date => Type::Date,
        };
        if anno.is_list {
            Type::List(Box::new(prim))
        } else {
            prim
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => f.write_str("int"),
            Type::String => f.write_str("string"),
            Type::Bool => f.write_str("bool"),
            Type::Date => f.write_str("date"),
            Type::Unknown => f.write_str("unknown"),
            Type::List(elem) => write!(f, "{elem}[]"),
            Type::Object(props) => {
                f.write_str("{")?;
                for (i, (key, ty)) in props.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {ty}")?;
                }
                f.write_str("}")
            }
        }
    }
}
