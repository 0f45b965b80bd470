//! Type system for Choco
//!
//! Defines the declared types carried by the typed program tree, from the
//! type checker through closure conversion and code generation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared type of a parameter, local, field or global
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "kebab-case")]
pub enum Type {
    /// `int`
    Int,
    /// `bool`
    Bool,
    /// `str`
    Str,
    /// The type of `None`
    None,
    /// `object`, the root of the class hierarchy
    Object,
    /// Instance of a user-defined (or synthesized) class
    Class { name: String },
    /// `[T]`
    List { elem: Box<Type> },
    /// `Callable[[A, B], R]`
    Callable { params: Vec<Type>, ret: Box<Type> },
}

impl Type {
    /// Shorthand for a class instance type.
    pub fn class(name: impl Into<String>) -> Self {
        Type::Class { name: name.into() }
    }

    /// Shorthand for a list type.
    pub fn list(elem: Type) -> Self {
        Type::List { elem: Box::new(elem) }
    }

    /// Shorthand for a callable type.
    pub fn callable(params: Vec<Type>, ret: Type) -> Self {
        Type::Callable {
            params,
            ret: Box::new(ret),
        }
    }

    /// Check if this is a numeric type (defaults to zero)
    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int)
    }

    /// Check if this type is a value type rather than a reference
    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Int | Type::Bool | Type::None)
    }

    /// Check if `None` is a valid value of this type
    pub fn is_nullable(&self) -> bool {
        !matches!(self, Type::Int | Type::Bool)
    }

    /// Name of the class for class instance types
    pub fn class_name(&self) -> Option<&str> {
        match self {
            Type::Class { name } => Some(name),
            _ => None,
        }
    }

    /// Number of parameters for callable types
    pub fn arity(&self) -> Option<usize> {
        match self {
            Type::Callable { params, .. } => Some(params.len()),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Bool => write!(f, "bool"),
            Type::Str => write!(f, "str"),
            Type::None => write!(f, "None"),
            Type::Object => write!(f, "object"),
            Type::Class { name } => write!(f, "{}", name),
            Type::List { elem } => write!(f, "[{}]", elem),
            Type::Callable { params, ret } => {
                write!(f, "Callable[[")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", p)?;
                }
                write!(f, "], {}]", ret)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_callable() {
        let ty = Type::callable(vec![Type::Int, Type::Bool], Type::Int);
        assert_eq!(ty.to_string(), "Callable[[int, bool], int]");
        assert_eq!(ty.arity(), Some(2));
    }

    #[test]
    fn test_nullable() {
        assert!(!Type::Int.is_nullable());
        assert!(!Type::Bool.is_nullable());
        assert!(Type::class("Clo_0_adder").is_nullable());
        assert!(Type::list(Type::Int).is_nullable());
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_string(&Type::class("Point")).unwrap();
        assert_eq!(json, r#"{"tag":"class","name":"Point"}"#);
        let back: Type = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Type::class("Point"));
    }
}
