//! Terse constructors for building trees by hand.
//!
//! Used by tests throughout the workspace and by tools that synthesize
//! code. All spans are [`Span::DUMMY`].

use crate::ir::*;
use choco_diagnostics::Span;
use choco_types::Type;

pub fn id(name: &str) -> Expr {
    Expr::Id {
        name: name.to_string(),
        span: Span::DUMMY,
    }
}

pub fn int(value: i64) -> Expr {
    Expr::Literal {
        value: Literal::Num { value },
    }
}

pub fn bool_lit(value: bool) -> Expr {
    Expr::Literal {
        value: Literal::Bool { value },
    }
}

pub fn str_lit(value: &str) -> Expr {
    Expr::Literal {
        value: Literal::Str {
            value: value.to_string(),
        },
    }
}

pub fn none() -> Expr {
    Expr::Literal {
        value: Literal::None,
    }
}

pub fn uniop(op: UniOp, expr: Expr) -> Expr {
    Expr::UniOp {
        op,
        expr: Box::new(expr),
    }
}

pub fn binop(op: BinOp, left: Expr, right: Expr) -> Expr {
    Expr::BinOp {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

pub fn builtin1(name: &str, arg: Expr) -> Expr {
    Expr::Builtin1 {
        name: name.to_string(),
        arg: Box::new(arg),
    }
}

pub fn builtin2(name: &str, left: Expr, right: Expr) -> Expr {
    Expr::Builtin2 {
        name: name.to_string(),
        left: Box::new(left),
        right: Box::new(right),
    }
}

/// `print(arg)`
pub fn print(arg: Expr) -> Stmt {
    expr_stmt(builtin1("print", arg))
}

pub fn call(callee: Expr, args: Vec<Expr>) -> Expr {
    Expr::Call {
        callee: Box::new(callee),
        args,
    }
}

pub fn lookup(obj: Expr, field: &str) -> Expr {
    Expr::Lookup {
        obj: Box::new(obj),
        field: field.to_string(),
    }
}

pub fn index(obj: Expr, index: Expr) -> Expr {
    Expr::Index {
        obj: Box::new(obj),
        index: Box::new(index),
    }
}

pub fn method_call(obj: Expr, method: &str, args: Vec<Expr>) -> Expr {
    Expr::MethodCall {
        obj: Box::new(obj),
        method: method.to_string(),
        args,
    }
}

pub fn list(elems: Vec<Expr>) -> Expr {
    Expr::List { elems }
}

pub fn set(elems: Vec<Expr>) -> Expr {
    Expr::Set { elems }
}

pub fn tuple(elems: Vec<Expr>) -> Expr {
    Expr::Tuple { elems }
}

/// `[elem for var in iterable if cond]`
pub fn comprehension(elem: Expr, var: &str, iterable: Expr, cond: Option<Expr>) -> Expr {
    Expr::Comprehension {
        kind: CompKind::List,
        elem: Box::new(elem),
        var: var.to_string(),
        iterable: Box::new(iterable),
        cond: cond.map(Box::new),
    }
}

pub fn if_expr(cond: Expr, thn: Expr, els: Expr) -> Expr {
    Expr::IfExpr {
        cond: Box::new(cond),
        thn: Box::new(thn),
        els: Box::new(els),
    }
}

pub fn lambda(params: Vec<Param>, ret: Type, body: Expr) -> Expr {
    Expr::Lambda {
        params,
        ret,
        body: Box::new(body),
        span: Span::DUMMY,
    }
}

pub fn assign(name: &str, value: Expr) -> Stmt {
    Stmt::Assign {
        name: name.to_string(),
        value,
    }
}

pub fn ret(value: Expr) -> Stmt {
    Stmt::Return { value: Some(value) }
}

pub fn expr_stmt(expr: Expr) -> Stmt {
    Stmt::Expr { expr }
}

pub fn field_assign(obj: Expr, field: &str, value: Expr) -> Stmt {
    Stmt::FieldAssign {
        obj,
        field: field.to_string(),
        value,
    }
}

pub fn index_assign(obj: Expr, index: Expr, value: Expr) -> Stmt {
    Stmt::IndexAssign { obj, index, value }
}

pub fn if_stmt(cond: Expr, thn: Vec<Stmt>, els: Vec<Stmt>) -> Stmt {
    Stmt::If { cond, thn, els }
}

pub fn while_stmt(cond: Expr, body: Vec<Stmt>) -> Stmt {
    Stmt::While { cond, body }
}

pub fn for_each(var: &str, iterable: Expr, body: Vec<Stmt>) -> Stmt {
    Stmt::For {
        var: var.to_string(),
        iterable,
        body,
        els: None,
    }
}

pub fn closure(func: FunDef) -> Stmt {
    Stmt::Closure { func }
}

pub fn param(name: &str, ty: Type) -> Param {
    Param {
        name: name.to_string(),
        ty,
    }
}

/// `name: ty = <default for ty>`
pub fn var(name: &str, ty: Type) -> VarInit {
    VarInit {
        name: name.to_string(),
        value: Literal::default_for(&ty),
        ty,
    }
}

/// `name: int = value`
pub fn int_var(name: &str, value: i64) -> VarInit {
    VarInit {
        name: name.to_string(),
        ty: Type::Int,
        value: Literal::Num { value },
    }
}

pub fn fun(name: &str, params: Vec<Param>, ret: Type, inits: Vec<VarInit>, body: Vec<Stmt>) -> FunDef {
    FunDef {
        name: name.to_string(),
        params,
        ret,
        inits,
        body,
        span: Span::DUMMY,
    }
}
