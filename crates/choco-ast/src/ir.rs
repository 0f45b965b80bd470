//! Typed program tree definitions
//!
//! This is the tree the type checker hands to the lowering passes and the
//! code generator consumes. Every node is serde-serializable; the JSON form
//! uses a `tag` field per variant, mirroring the front end's output.

use crate::visit::{walk_expr, Visitor};
use choco_diagnostics::Span;
use choco_types::Type;
use serde::{Deserialize, Serialize};

/// A whole program (one source file)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Program {
    /// Top-level function definitions
    #[serde(default)]
    pub funs: Vec<FunDef>,
    /// Class definitions, in declaration order
    #[serde(default)]
    pub classes: Vec<Class>,
    /// Global variable initializers
    #[serde(default)]
    pub inits: Vec<VarInit>,
    /// Top-level statements to execute
    #[serde(default)]
    pub stmts: Vec<Stmt>,
}

impl Program {
    pub fn function(&self, name: &str) -> Option<&FunDef> {
        self.funs.iter().find(|f| f.name == name)
    }

    pub fn class(&self, name: &str) -> Option<&Class> {
        self.classes.iter().find(|c| c.name == name)
    }

    pub fn global(&self, name: &str) -> Option<&VarInit> {
        self.inits.iter().find(|v| v.name == name)
    }
}

/// A function, method or (before closure conversion) nested function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunDef {
    pub name: String,
    pub params: Vec<Param>,
    pub ret: Type,
    /// Local variable declarations, all hoisted to the top of the body
    #[serde(default)]
    pub inits: Vec<VarInit>,
    pub body: Vec<Stmt>,
    #[serde(default)]
    pub span: Span,
}

impl FunDef {
    /// Number of declared parameters (a method's receiver included).
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Iterate over every name bound by this function itself.
    pub fn binders(&self) -> impl Iterator<Item = &str> {
        self.params
            .iter()
            .map(|p| p.name.as_str())
            .chain(self.inits.iter().map(|v| v.name.as_str()))
    }
}

/// A function parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub ty: Type,
}

/// A typed variable with its initial literal value (`x: int = 0`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarInit {
    pub name: String,
    pub ty: Type,
    pub value: Literal,
}

/// A class definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    pub name: String,
    pub fields: Vec<VarInit>,
    pub methods: Vec<FunDef>,
}

impl Class {
    pub fn method(&self, name: &str) -> Option<&FunDef> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn field(&self, name: &str) -> Option<&VarInit> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Literal constant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "kebab-case")]
pub enum Literal {
    Num { value: i64 },
    Bool { value: bool },
    Str { value: String },
    None,
}

impl Literal {
    /// Default value of a freshly allocated slot of type `ty`:
    /// zero for numbers, `False` for booleans, `None` for everything else.
    pub fn default_for(ty: &Type) -> Self {
        match ty {
            ty if ty.is_numeric() => Literal::Num { value: 0 },
            Type::Bool => Literal::Bool { value: false },
            _ => Literal::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UniOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BinOp {
    Plus,
    Minus,
    Mul,
    IDiv,
    Mod,
    Eq,
    Neq,
    Lte,
    Gte,
    Lt,
    Gt,
    Is,
    And,
    Or,
}

/// Target of a destructuring assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "kebab-case")]
pub enum AssignTarget {
    Id { name: String },
    Field { obj: Expr, field: String },
    Index { obj: Expr, index: Expr },
    /// `_`
    Ignore,
}

/// One element on the left of `a, *b, c = ...`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestructureTarget {
    pub target: AssignTarget,
    #[serde(default)]
    pub starred: bool,
}

/// Statement in a function body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "kebab-case")]
pub enum Stmt {
    /// `x = value`
    Assign { name: String, value: Expr },
    /// `a, b = value`
    AssignDestructure {
        targets: Vec<DestructureTarget>,
        value: Expr,
    },
    Return { value: Option<Expr> },
    Expr { expr: Expr },
    /// `obj.field = value`
    FieldAssign {
        obj: Expr,
        field: String,
        value: Expr,
    },
    /// `obj[index] = value`
    IndexAssign { obj: Expr, index: Expr, value: Expr },
    If {
        cond: Expr,
        thn: Vec<Stmt>,
        els: Vec<Stmt>,
    },
    While { cond: Expr, body: Vec<Stmt> },
    /// `for var in iterable: body else: els`
    For {
        var: String,
        iterable: Expr,
        body: Vec<Stmt>,
        #[serde(default)]
        els: Option<Vec<Stmt>>,
    },
    Pass,
    Nonlocal { name: String },
    Global { name: String },
    Break,
    Continue,
    /// Nested function definition; removed by closure conversion
    Closure { func: FunDef },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompKind {
    List,
    Set,
}

/// Expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tag", rename_all = "kebab-case")]
pub enum Expr {
    Literal { value: Literal },
    Id {
        name: String,
        #[serde(default)]
        span: Span,
    },
    #[serde(rename = "uniop")]
    UniOp { op: UniOp, expr: Box<Expr> },
    #[serde(rename = "binop")]
    BinOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// One-argument builtin (`print`, `len`, `abs`)
    #[serde(rename = "builtin1")]
    Builtin1 { name: String, arg: Box<Expr> },
    /// Two-argument builtin (`max`, `min`, `pow`)
    #[serde(rename = "builtin2")]
    Builtin2 {
        name: String,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Call of a function, a class constructor or a callable value
    Call { callee: Box<Expr>, args: Vec<Expr> },
    /// `obj.field`
    Lookup { obj: Box<Expr>, field: String },
    /// `obj[index]`
    Index { obj: Box<Expr>, index: Box<Expr> },
    /// `obj.method(args)`
    MethodCall {
        obj: Box<Expr>,
        method: String,
        args: Vec<Expr>,
    },
    List { elems: Vec<Expr> },
    Set { elems: Vec<Expr> },
    /// `[elem for var in iterable if cond]`; `var` is bound in `elem` and `cond`
    Comprehension {
        kind: CompKind,
        elem: Box<Expr>,
        var: String,
        iterable: Box<Expr>,
        #[serde(default)]
        cond: Option<Box<Expr>>,
    },
    /// `thn if cond else els`
    IfExpr {
        cond: Box<Expr>,
        thn: Box<Expr>,
        els: Box<Expr>,
    },
    /// Bare value tuple `a, b`
    Tuple { elems: Vec<Expr> },
    /// Class instantiation; lowered to `Call` before any lowering pass runs
    Construct {
        name: String,
        #[serde(default)]
        span: Span,
    },
    Lambda {
        params: Vec<Param>,
        ret: Type,
        body: Box<Expr>,
        #[serde(default)]
        span: Span,
    },
}

impl Expr {
    /// Span of the leftmost node in the expression that carries one, or
    /// [`Span::DUMMY`] when none does.
    pub fn span(&self) -> Span {
        match FirstSpan.visit_expr(self) {
            Ok(()) => Span::DUMMY,
            Err(span) => span,
        }
    }

    /// Name of the callee when it is a plain identifier.
    pub fn as_id(&self) -> Option<&str> {
        match self {
            Expr::Id { name, .. } => Some(name),
            _ => None,
        }
    }
}

struct FirstSpan;

impl Visitor for FirstSpan {
    type Error = Span;

    fn visit_expr(&mut self, expr: &Expr) -> Result<(), Span> {
        match expr {
            Expr::Id { span, .. } | Expr::Construct { span, .. } | Expr::Lambda { span, .. }
                if !span.is_dummy() =>
            {
                Err(*span)
            }
            _ => walk_expr(self, expr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_literals() {
        assert_eq!(Literal::default_for(&Type::Int), Literal::Num { value: 0 });
        assert_eq!(Literal::default_for(&Type::Bool), Literal::Bool { value: false });
        assert_eq!(Literal::default_for(&Type::Str), Literal::None);
        assert_eq!(Literal::default_for(&Type::class("Clo_0_f")), Literal::None);
        assert_eq!(
            Literal::default_for(&Type::callable(vec![Type::Int], Type::Int)),
            Literal::None
        );
    }

    #[test]
    fn test_json_tags() {
        let stmt: Stmt = serde_json::from_str(
            r#"{"tag":"field-assign","obj":{"tag":"id","name":"adder"},"field":"a",
                "value":{"tag":"binop","op":"plus",
                         "left":{"tag":"literal","value":{"tag":"num","value":1}},
                         "right":{"tag":"id","name":"a"}}}"#,
        )
        .unwrap();
        match stmt {
            Stmt::FieldAssign { obj, field, value } => {
                assert_eq!(obj.as_id(), Some("adder"));
                assert_eq!(field, "a");
                assert!(matches!(value, Expr::BinOp { op: BinOp::Plus, .. }));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_binders() {
        let f = FunDef {
            name: "adder".into(),
            params: vec![Param { name: "b".into(), ty: Type::Int }],
            ret: Type::Int,
            inits: vec![VarInit {
                name: "t".into(),
                ty: Type::Int,
                value: Literal::Num { value: 0 },
            }],
            body: vec![],
            span: Span::DUMMY,
        };
        assert_eq!(f.binders().collect::<Vec<_>>(), vec!["b", "t"]);
        assert_eq!(f.arity(), 1);
    }

    #[test]
    fn test_expr_span_is_leftmost_known() {
        let at = |start| Span::new(choco_diagnostics::FileId(0), start, start + 1);
        let expr = Expr::BinOp {
            op: BinOp::Plus,
            left: Box::new(Expr::Literal {
                value: Literal::Num { value: 1 },
            }),
            right: Box::new(Expr::Call {
                callee: Box::new(Expr::Id {
                    name: "f".into(),
                    span: at(4),
                }),
                args: vec![Expr::Id {
                    name: "x".into(),
                    span: at(6),
                }],
            }),
        };
        assert_eq!(expr.span(), at(4));
        assert!(Expr::Literal { value: Literal::None }.span().is_dummy());
    }
}
