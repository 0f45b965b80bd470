//! Shared traversal over every statement and expression variant.
//!
//! [`Visitor`] walks a tree by reference, [`Folder`] rebuilds it by value.
//! The `walk_*` and `super_fold_*` functions are the single place where the
//! variant set is enumerated; both match exhaustively, so a new variant
//! fails to compile here until every traversal knows what to do with it.
//!
//! Names that a statement *writes* (assignment targets, loop variables) are
//! reported through `visit_binding` / `fold_binding` instead of
//! `visit_expr`, and a comprehension's loop variable is announced with
//! `enter_binder` / `exit_binder` around the sub-expressions it scopes over.

use crate::ir::{AssignTarget, DestructureTarget, Expr, FunDef, Stmt};

/// Read-only traversal. Every hook has a default that recurses.
pub trait Visitor: Sized {
    type Error;

    fn visit_block(&mut self, stmts: &[Stmt]) -> Result<(), Self::Error> {
        stmts.iter().try_for_each(|s| self.visit_stmt(s))
    }

    fn visit_stmt(&mut self, stmt: &Stmt) -> Result<(), Self::Error> {
        walk_stmt(self, stmt)
    }

    fn visit_expr(&mut self, expr: &Expr) -> Result<(), Self::Error> {
        walk_expr(self, expr)
    }

    /// A nested function definition.
    fn visit_closure(&mut self, func: &FunDef) -> Result<(), Self::Error> {
        self.visit_block(&func.body)
    }

    /// A name written by an assignment or loop header.
    fn visit_binding(&mut self, _name: &str) -> Result<(), Self::Error> {
        Ok(())
    }

    fn enter_binder(&mut self, _name: &str) {}

    fn exit_binder(&mut self, _name: &str) {}
}

pub fn walk_stmt<V: Visitor>(v: &mut V, stmt: &Stmt) -> Result<(), V::Error> {
    match stmt {
        Stmt::Assign { name, value } => {
            v.visit_expr(value)?;
            v.visit_binding(name)
        }
        Stmt::AssignDestructure { targets, value } => {
            v.visit_expr(value)?;
            targets.iter().try_for_each(|t| walk_target(v, &t.target))
        }
        Stmt::Return { value } => match value {
            Some(value) => v.visit_expr(value),
            None => Ok(()),
        },
        Stmt::Expr { expr } => v.visit_expr(expr),
        Stmt::FieldAssign { obj, value, .. } => {
            v.visit_expr(obj)?;
            v.visit_expr(value)
        }
        Stmt::IndexAssign { obj, index, value } => {
            v.visit_expr(obj)?;
            v.visit_expr(index)?;
            v.visit_expr(value)
        }
        Stmt::If { cond, thn, els } => {
            v.visit_expr(cond)?;
            v.visit_block(thn)?;
            v.visit_block(els)
        }
        Stmt::While { cond, body } => {
            v.visit_expr(cond)?;
            v.visit_block(body)
        }
        Stmt::For {
            var,
            iterable,
            body,
            els,
        } => {
            v.visit_expr(iterable)?;
            v.visit_binding(var)?;
            v.visit_block(body)?;
            match els {
                Some(els) => v.visit_block(els),
                None => Ok(()),
            }
        }
        Stmt::Pass
        | Stmt::Nonlocal { .. }
        | Stmt::Global { .. }
        | Stmt::Break
        | Stmt::Continue => Ok(()),
        Stmt::Closure { func } => v.visit_closure(func),
    }
}

fn walk_target<V: Visitor>(v: &mut V, target: &AssignTarget) -> Result<(), V::Error> {
    match target {
        AssignTarget::Id { name } => v.visit_binding(name),
        AssignTarget::Field { obj, .. } => v.visit_expr(obj),
        AssignTarget::Index { obj, index } => {
            v.visit_expr(obj)?;
            v.visit_expr(index)
        }
        AssignTarget::Ignore => Ok(()),
    }
}

pub fn walk_expr<V: Visitor>(v: &mut V, expr: &Expr) -> Result<(), V::Error> {
    match expr {
        Expr::Literal { .. } | Expr::Id { .. } | Expr::Construct { .. } => Ok(()),
        Expr::UniOp { expr, .. } => v.visit_expr(expr),
        Expr::BinOp { left, right, .. } | Expr::Builtin2 { left, right, .. } => {
            v.visit_expr(left)?;
            v.visit_expr(right)
        }
        Expr::Builtin1 { arg, .. } => v.visit_expr(arg),
        Expr::Call { callee, args } => {
            v.visit_expr(callee)?;
            args.iter().try_for_each(|a| v.visit_expr(a))
        }
        Expr::Lookup { obj, .. } => v.visit_expr(obj),
        Expr::Index { obj, index } => {
            v.visit_expr(obj)?;
            v.visit_expr(index)
        }
        Expr::MethodCall { obj, args, .. } => {
            v.visit_expr(obj)?;
            args.iter().try_for_each(|a| v.visit_expr(a))
        }
        Expr::List { elems } | Expr::Set { elems } | Expr::Tuple { elems } => {
            elems.iter().try_for_each(|e| v.visit_expr(e))
        }
        Expr::Comprehension {
            elem,
            var,
            iterable,
            cond,
            ..
        } => {
            v.visit_expr(iterable)?;
            v.enter_binder(var);
            let scoped = v.visit_expr(elem).and_then(|()| match cond {
                Some(cond) => v.visit_expr(cond),
                None => Ok(()),
            });
            v.exit_binder(var);
            scoped
        }
        Expr::IfExpr { cond, thn, els } => {
            v.visit_expr(cond)?;
            v.visit_expr(thn)?;
            v.visit_expr(els)
        }
        Expr::Lambda { params, body, .. } => {
            for p in params {
                v.enter_binder(&p.name);
            }
            let result = v.visit_expr(body);
            for p in params.iter().rev() {
                v.exit_binder(&p.name);
            }
            result
        }
    }
}

/// Rebuilding traversal. Every hook has a default that rebuilds the node
/// from its folded children.
pub trait Folder: Sized {
    type Error;

    fn fold_block(&mut self, stmts: Vec<Stmt>) -> Result<Vec<Stmt>, Self::Error> {
        stmts.into_iter().map(|s| self.fold_stmt(s)).collect()
    }

    fn fold_stmt(&mut self, stmt: Stmt) -> Result<Stmt, Self::Error> {
        super_fold_stmt(self, stmt)
    }

    fn fold_expr(&mut self, expr: Expr) -> Result<Expr, Self::Error> {
        super_fold_expr(self, expr)
    }

    fn fold_closure(&mut self, func: FunDef) -> Result<FunDef, Self::Error> {
        let body = self.fold_block(func.body)?;
        Ok(FunDef { body, ..func })
    }

    /// A name written by an assignment or loop header.
    fn fold_binding(&mut self, name: String) -> Result<String, Self::Error> {
        Ok(name)
    }

    fn enter_binder(&mut self, _name: &str) {}

    fn exit_binder(&mut self, _name: &str) {}
}

pub fn super_fold_stmt<F: Folder>(f: &mut F, stmt: Stmt) -> Result<Stmt, F::Error> {
    Ok(match stmt {
        Stmt::Assign { name, value } => {
            let value = f.fold_expr(value)?;
            Stmt::Assign {
                name: f.fold_binding(name)?,
                value,
            }
        }
        Stmt::AssignDestructure { targets, value } => {
            let value = f.fold_expr(value)?;
            let targets = targets
                .into_iter()
                .map(|t| {
                    Ok(DestructureTarget {
                        target: fold_target(f, t.target)?,
                        starred: t.starred,
                    })
                })
                .collect::<Result<_, _>>()?;
            Stmt::AssignDestructure { targets, value }
        }
        Stmt::Return { value } => Stmt::Return {
            value: value.map(|e| f.fold_expr(e)).transpose()?,
        },
        Stmt::Expr { expr } => Stmt::Expr {
            expr: f.fold_expr(expr)?,
        },
        Stmt::FieldAssign { obj, field, value } => Stmt::FieldAssign {
            obj: f.fold_expr(obj)?,
            field,
            value: f.fold_expr(value)?,
        },
        Stmt::IndexAssign { obj, index, value } => Stmt::IndexAssign {
            obj: f.fold_expr(obj)?,
            index: f.fold_expr(index)?,
            value: f.fold_expr(value)?,
        },
        Stmt::If { cond, thn, els } => Stmt::If {
            cond: f.fold_expr(cond)?,
            thn: f.fold_block(thn)?,
            els: f.fold_block(els)?,
        },
        Stmt::While { cond, body } => Stmt::While {
            cond: f.fold_expr(cond)?,
            body: f.fold_block(body)?,
        },
        Stmt::For {
            var,
            iterable,
            body,
            els,
        } => {
            let iterable = f.fold_expr(iterable)?;
            Stmt::For {
                var: f.fold_binding(var)?,
                iterable,
                body: f.fold_block(body)?,
                els: els.map(|b| f.fold_block(b)).transpose()?,
            }
        }
        stmt @ (Stmt::Pass
        | Stmt::Nonlocal { .. }
        | Stmt::Global { .. }
        | Stmt::Break
        | Stmt::Continue) => stmt,
        Stmt::Closure { func } => Stmt::Closure {
            func: f.fold_closure(func)?,
        },
    })
}

fn fold_target<F: Folder>(f: &mut F, target: AssignTarget) -> Result<AssignTarget, F::Error> {
    Ok(match target {
        AssignTarget::Id { name } => AssignTarget::Id {
            name: f.fold_binding(name)?,
        },
        AssignTarget::Field { obj, field } => AssignTarget::Field {
            obj: f.fold_expr(obj)?,
            field,
        },
        AssignTarget::Index { obj, index } => AssignTarget::Index {
            obj: f.fold_expr(obj)?,
            index: f.fold_expr(index)?,
        },
        AssignTarget::Ignore => AssignTarget::Ignore,
    })
}

fn fold_box<F: Folder>(f: &mut F, expr: Box<Expr>) -> Result<Box<Expr>, F::Error> {
    Ok(Box::new(f.fold_expr(*expr)?))
}

fn fold_all<F: Folder>(f: &mut F, exprs: Vec<Expr>) -> Result<Vec<Expr>, F::Error> {
    exprs.into_iter().map(|e| f.fold_expr(e)).collect()
}

pub fn super_fold_expr<F: Folder>(f: &mut F, expr: Expr) -> Result<Expr, F::Error> {
    Ok(match expr {
        expr @ (Expr::Literal { .. } | Expr::Id { .. } | Expr::Construct { .. }) => expr,
        Expr::UniOp { op, expr } => Expr::UniOp {
            op,
            expr: fold_box(f, expr)?,
        },
        Expr::BinOp { op, left, right } => Expr::BinOp {
            op,
            left: fold_box(f, left)?,
            right: fold_box(f, right)?,
        },
        Expr::Builtin1 { name, arg } => Expr::Builtin1 {
            name,
            arg: fold_box(f, arg)?,
        },
        Expr::Builtin2 { name, left, right } => Expr::Builtin2 {
            name,
            left: fold_box(f, left)?,
            right: fold_box(f, right)?,
        },
        Expr::Call { callee, args } => Expr::Call {
            callee: fold_box(f, callee)?,
            args: fold_all(f, args)?,
        },
        Expr::Lookup { obj, field } => Expr::Lookup {
            obj: fold_box(f, obj)?,
            field,
        },
        Expr::Index { obj, index } => Expr::Index {
            obj: fold_box(f, obj)?,
            index: fold_box(f, index)?,
        },
        Expr::MethodCall { obj, method, args } => Expr::MethodCall {
            obj: fold_box(f, obj)?,
            method,
            args: fold_all(f, args)?,
        },
        Expr::List { elems } => Expr::List {
            elems: fold_all(f, elems)?,
        },
        Expr::Set { elems } => Expr::Set {
            elems: fold_all(f, elems)?,
        },
        Expr::Tuple { elems } => Expr::Tuple {
            elems: fold_all(f, elems)?,
        },
        Expr::Comprehension {
            kind,
            elem,
            var,
            iterable,
            cond,
        } => {
            let iterable = fold_box(f, iterable)?;
            f.enter_binder(&var);
            let scoped = fold_box(f, elem).and_then(|elem| {
                let cond = cond.map(|c| fold_box(f, c)).transpose()?;
                Ok((elem, cond))
            });
            f.exit_binder(&var);
            let (elem, cond) = scoped?;
            Expr::Comprehension {
                kind,
                elem,
                var,
                iterable,
                cond,
            }
        }
        Expr::IfExpr { cond, thn, els } => Expr::IfExpr {
            cond: fold_box(f, cond)?,
            thn: fold_box(f, thn)?,
            els: fold_box(f, els)?,
        },
        Expr::Lambda {
            params,
            ret,
            body,
            span,
        } => {
            for p in &params {
                f.enter_binder(&p.name);
            }
            let body = fold_box(f, body);
            for p in params.iter().rev() {
                f.exit_binder(&p.name);
            }
            Expr::Lambda {
                params,
                ret,
                body: body?,
                span,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::*;
    use std::convert::Infallible;

    #[derive(Default)]
    struct Reads {
        names: Vec<String>,
        writes: Vec<String>,
        bound: Vec<String>,
    }

    impl Visitor for Reads {
        type Error = Infallible;

        fn visit_expr(&mut self, expr: &Expr) -> Result<(), Infallible> {
            if let Expr::Id { name, .. } = expr {
                if !self.bound.contains(name) {
                    self.names.push(name.clone());
                }
            }
            walk_expr(self, expr)
        }

        fn visit_binding(&mut self, name: &str) -> Result<(), Infallible> {
            self.writes.push(name.to_string());
            Ok(())
        }

        fn enter_binder(&mut self, name: &str) {
            self.bound.push(name.to_string());
        }

        fn exit_binder(&mut self, _name: &str) {
            self.bound.pop();
        }
    }

    #[test]
    fn test_visitor_reads_and_writes() {
        let body = vec![
            assign("x", binop(crate::BinOp::Plus, id("a"), id("b"))),
            for_each("i", id("xs"), vec![expr_stmt(call(id("f"), vec![id("i")]))]),
            ret(comprehension(id("i"), "i", id("ys"), Some(id("c")))),
        ];
        let mut reads = Reads::default();
        reads.visit_block(&body).unwrap();
        assert_eq!(reads.names, vec!["a", "b", "xs", "f", "i", "ys", "c"]);
        assert_eq!(reads.writes, vec!["x", "i"]);
    }

    struct Rename;

    impl Folder for Rename {
        type Error = Infallible;

        fn fold_expr(&mut self, expr: Expr) -> Result<Expr, Infallible> {
            match expr {
                Expr::Id { name, span } if name == "old" => Ok(Expr::Id {
                    name: "new".into(),
                    span,
                }),
                other => super_fold_expr(self, other),
            }
        }
    }

    #[test]
    fn test_folder_rebuilds_nested() {
        let stmt = if_stmt(
            id("old"),
            vec![field_assign(id("o"), "f", index(id("old"), int(0)))],
            vec![while_stmt(bool_lit(true), vec![expr_stmt(id("old"))])],
        );
        let folded = Rename.fold_stmt(stmt).unwrap();
        let expected = if_stmt(
            id("new"),
            vec![field_assign(id("o"), "f", index(id("new"), int(0)))],
            vec![while_stmt(bool_lit(true), vec![expr_stmt(id("new"))])],
        );
        assert_eq!(folded, expected);
    }
}
