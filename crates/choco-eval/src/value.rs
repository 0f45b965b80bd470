//! Runtime values

use indexmap::IndexMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A runtime value. Objects and lists are shared: cloning a `Value` copies
/// the reference, not the contents.
#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Bool(bool),
    None,
    Str(Rc<str>),
    Object(Rc<Object>),
    List(Rc<RefCell<Vec<Value>>>),
    Tuple(Rc<[Value]>),
    /// A top-level function used as a value
    Function(Rc<str>),
}

/// An instance of a class.
#[derive(Debug)]
pub struct Object {
    pub class: String,
    pub fields: RefCell<IndexMap<String, Value>>,
}

impl Value {
    pub fn str(s: &str) -> Self {
        Value::Str(Rc::from(s))
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(RefCell::new(items)))
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Int(i) => *i != 0,
            Value::Bool(b) => *b,
            Value::None => false,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.borrow().is_empty(),
            Value::Tuple(items) => !items.is_empty(),
            Value::Object(_) | Value::Function(_) => true,
        }
    }

    pub fn type_name(&self) -> String {
        match self {
            Value::Int(_) => "int".into(),
            Value::Bool(_) => "bool".into(),
            Value::None => "None".into(),
            Value::Str(_) => "str".into(),
            Value::Object(obj) => obj.class.clone(),
            Value::List(_) => "list".into(),
            Value::Tuple(_) => "tuple".into(),
            Value::Function(_) => "function".into(),
        }
    }

    /// Structural equality for primitives and sequences, identity for
    /// objects.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::None, Value::None) => true,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => {
                Rc::ptr_eq(a, b) || seq_equals(&a.borrow(), &b.borrow())
            }
            (Value::Tuple(a), Value::Tuple(b)) => seq_equals(a, b),
            (Value::Function(a), Value::Function(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// `is`: identity for objects and lists, `None is None`.
    pub fn is(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    fn fmt_repr(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "'{}'", s),
            other => write!(f, "{}", other),
        }
    }
}

fn seq_equals(a: &[Value], b: &[Value]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.equals(y))
}

fn fmt_items(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        item.fmt_repr(f)?;
    }
    Ok(())
}

/// The form `print` writes.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::None => f.write_str("None"),
            Value::Str(s) => f.write_str(s),
            Value::Object(obj) => write!(f, "<{} object>", obj.class),
            Value::List(items) => {
                f.write_str("[")?;
                fmt_items(f, &items.borrow())?;
                f.write_str("]")
            }
            Value::Tuple(items) => {
                f.write_str("(")?;
                fmt_items(f, items)?;
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            Value::Function(name) => write!(f, "<function {}>", name),
        }
    }
}
