//! Building the class that replaces a closure, and the statements that
//! instantiate it where the closure was declared.

use crate::capture::Captures;
use crate::config::ClosureConfig;
use choco_ast::{Class, Expr, FunDef, Literal, Param, Stmt, VarInit};
use choco_diagnostics::Span;
use choco_types::Type;

/// The lifted form of one closure.
#[derive(Debug, Clone, PartialEq)]
pub struct LiftedClosure {
    pub class: Class,
    /// Replaces the closure declaration in the enclosing body
    pub init_stmts: Vec<Stmt>,
    /// Local declaration of the closure's name in the enclosing function
    pub slot: VarInit,
    /// Parameters of the original closure, receiver excluded
    pub arity: usize,
}

/// Lift `closure`, whose body has already been rewritten against
/// `captures`, into class `class_name`.
pub fn lift(
    closure: FunDef,
    class_name: String,
    captures: &Captures,
    receiver: String,
    config: &ClosureConfig,
) -> LiftedClosure {
    let class_ty = Type::class(class_name.clone());
    let arity = closure.params.len();
    let FunDef {
        name,
        params,
        ret,
        inits,
        body,
        span,
    } = closure;

    let fields = captures
        .iter()
        .map(|(name, ty)| VarInit {
            name: name.to_string(),
            ty: ty.clone(),
            value: Literal::default_for(ty),
        })
        .collect();

    let mut call_params = Vec::with_capacity(params.len() + 1);
    call_params.push(Param {
        name: receiver.clone(),
        ty: class_ty.clone(),
    });
    call_params.extend(params);
    let call = FunDef {
        name: config.call_method.clone(),
        params: call_params,
        ret,
        inits,
        body,
        span,
    };

    let constructor = FunDef {
        name: config.constructor.clone(),
        params: vec![Param {
            name: receiver,
            ty: class_ty.clone(),
        }],
        ret: Type::None,
        inits: Vec::new(),
        body: Vec::new(),
        span: Span::DUMMY,
    };

    let init_stmts = instantiate(&name, &class_name, captures, span);
    let slot = VarInit {
        name,
        value: Literal::default_for(&class_ty),
        ty: class_ty,
    };

    LiftedClosure {
        class: Class {
            name: class_name,
            fields,
            methods: vec![call, constructor],
        },
        init_stmts,
        slot,
        arity,
    }
}

/// `name = Class()` followed by `name.v = v` for every capture.
fn instantiate(name: &str, class_name: &str, captures: &Captures, span: Span) -> Vec<Stmt> {
    let id = |n: &str| Expr::Id {
        name: n.to_string(),
        span,
    };
    let mut stmts = Vec::with_capacity(captures.len() + 1);
    stmts.push(Stmt::Assign {
        name: name.to_string(),
        value: Expr::Call {
            callee: Box::new(id(class_name)),
            args: Vec::new(),
        },
    });
    stmts.extend(captures.names().map(|v| Stmt::FieldAssign {
        obj: id(name),
        field: v.to_string(),
        value: id(v),
    }));
    stmts
}
