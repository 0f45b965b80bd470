//! Rewriting a closure body so captured variables are read through the
//! receiver of the call method.

use crate::capture::Captures;
use crate::error::{ClosureError, Result, Unsupported};
use choco_ast::visit::{super_fold_expr, super_fold_stmt};
use choco_ast::{Expr, Folder, FunDef, Stmt};
use choco_diagnostics::Span;

/// Replace every read of a captured name in `body` with `receiver.name`.
///
/// `closure` is the closure's own name, used in errors; `span` is its
/// declaration.
pub fn rewrite_captures(
    closure: &str,
    span: Span,
    body: Vec<Stmt>,
    captures: &Captures,
    receiver: &str,
) -> Result<Vec<Stmt>> {
    let mut rewriter = CaptureRewriter {
        closure,
        span,
        captures,
        receiver,
        scoped: Vec::new(),
        binding_span: span,
    };
    rewriter.fold_block(body)
}

struct CaptureRewriter<'a> {
    closure: &'a str,
    span: Span,
    captures: &'a Captures,
    receiver: &'a str,
    scoped: Vec<String>,
    /// Where the statement whose targets are being folded starts
    binding_span: Span,
}

impl CaptureRewriter<'_> {
    fn is_captured(&self, name: &str) -> bool {
        self.captures.contains(name) && !self.scoped.iter().any(|s| s == name)
    }
}

/// Best source position for the names a statement writes: the assigned
/// value, or the iterable of a loop.
fn binding_span(stmt: &Stmt) -> Option<Span> {
    let span = match stmt {
        Stmt::Assign { value, .. } | Stmt::AssignDestructure { value, .. } => value.span(),
        Stmt::For { iterable, .. } => iterable.span(),
        _ => return None,
    };
    (!span.is_dummy()).then_some(span)
}

impl Folder for CaptureRewriter<'_> {
    type Error = ClosureError;

    fn fold_stmt(&mut self, stmt: Stmt) -> Result<Stmt> {
        self.binding_span = binding_span(&stmt).unwrap_or(self.span);
        super_fold_stmt(self, stmt)
    }

    fn fold_expr(&mut self, expr: Expr) -> Result<Expr> {
        match expr {
            Expr::Id { name, span } if self.is_captured(&name) => Ok(Expr::Lookup {
                obj: Box::new(Expr::Id {
                    name: self.receiver.to_string(),
                    span,
                }),
                field: name,
            }),
            Expr::Lambda { span, .. } => Err(ClosureError::unsupported(
                Unsupported::Lambda {
                    function: self.closure.to_string(),
                },
                span,
            )),
            Expr::Construct { name, span } => Err(ClosureError::internal(
                format!("unlowered constructor of `{}` in closure `{}`", name, self.closure),
                span,
            )),
            other => super_fold_expr(self, other),
        }
    }

    fn fold_closure(&mut self, func: FunDef) -> Result<FunDef> {
        Err(ClosureError::unsupported(
            Unsupported::NestedClosure {
                name: func.name,
                outer: self.closure.to_string(),
                outer_span: self.span,
            },
            func.span,
        ))
    }

    fn fold_binding(&mut self, name: String) -> Result<String> {
        if self.is_captured(&name) {
            return Err(ClosureError::unsupported(
                Unsupported::CapturedWrite {
                    name,
                    closure: self.closure.to_string(),
                },
                self.binding_span,
            ));
        }
        Ok(name)
    }

    fn enter_binder(&mut self, name: &str) {
        self.scoped.push(name.to_string());
    }

    fn exit_binder(&mut self, _name: &str) {
        self.scoped.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use choco_ast::build::*;
    use choco_ast::{AssignTarget, BinOp, DestructureTarget};
    use choco_diagnostics::FileId;
    use choco_types::Type;
    use pretty_assertions::assert_eq;

    fn captures(names: &[&str]) -> Captures {
        names.iter().map(|n| (n.to_string(), Type::Int)).collect()
    }

    fn rewrite(body: Vec<Stmt>, names: &[&str]) -> Result<Vec<Stmt>> {
        rewrite_captures("g", Span::DUMMY, body, &captures(names), "self")
    }

    #[test]
    fn test_reads_become_field_lookups() {
        let body = vec![
            ret(binop(BinOp::Plus, id("a"), id("b"))),
            if_stmt(
                binop(BinOp::Gt, id("a"), int(0)),
                vec![print(method_call(id("a"), "m", vec![id("b")]))],
                vec![],
            ),
        ];
        let expected = vec![
            ret(binop(BinOp::Plus, lookup(id("self"), "a"), id("b"))),
            if_stmt(
                binop(BinOp::Gt, lookup(id("self"), "a"), int(0)),
                vec![print(method_call(lookup(id("self"), "a"), "m", vec![id("b")]))],
                vec![],
            ),
        ];
        assert_eq!(rewrite(body, &["a"]).unwrap(), expected);
    }

    #[test]
    fn test_comprehension_variable_shadows_capture() {
        let body = vec![ret(comprehension(
            binop(BinOp::Plus, id("x"), id("k")),
            "x",
            id("x"),
            None,
        ))];
        // the iterable is outside the binder's scope
        let expected = vec![ret(comprehension(
            binop(BinOp::Plus, id("x"), lookup(id("self"), "k")),
            "x",
            lookup(id("self"), "x"),
            None,
        ))];
        assert_eq!(rewrite(body, &["x", "k"]).unwrap(), expected);
    }

    #[test]
    fn test_uncaptured_names_untouched() {
        let body = vec![
            assign("t", call(id("helper"), vec![id("t")])),
            field_assign(id("o"), "f", id("t")),
        ];
        assert_eq!(rewrite(body.clone(), &["a"]).unwrap(), body);
    }

    #[test]
    fn test_captured_writes_rejected() {
        for body in [
            vec![assign("a", int(1))],
            vec![for_each("a", list(vec![]), vec![])],
            vec![Stmt::AssignDestructure {
                targets: vec![DestructureTarget {
                    target: AssignTarget::Id { name: "a".into() },
                    starred: false,
                }],
                value: tuple(vec![int(1)]),
            }],
        ] {
            let err = rewrite(body, &["a"]).unwrap_err();
            assert!(
                matches!(
                    &err,
                    ClosureError::Unsupported {
                        feature: Unsupported::CapturedWrite { name, .. },
                        ..
                    } if name == "a"
                ),
                "unexpected {:?}",
                err
            );
        }
    }

    #[test]
    fn test_nested_closure_and_lambda_rejected() {
        let body = vec![closure(fun("h", vec![], Type::None, vec![], vec![]))];
        assert_eq!(rewrite(body, &[]).unwrap_err().code().as_str(), "U001");

        let body = vec![ret(lambda(vec![], Type::Int, int(1)))];
        assert_eq!(rewrite(body, &[]).unwrap_err().code().as_str(), "U002");
    }

    #[test]
    fn test_captured_write_points_at_assignment() {
        let at = |start| Span::new(FileId(0), start, start + 1);
        let value = Expr::Id {
            name: "b".into(),
            span: at(40),
        };
        let body = vec![print(int(1)), assign("a", value)];
        let err = rewrite_captures("g", at(10), body, &captures(&["a"]), "self").unwrap_err();
        assert_eq!(err.span(), at(40));

        // no position on the statement: fall back to the declaration
        let err = rewrite_captures("g", at(10), vec![assign("a", int(1))], &captures(&["a"]), "self")
            .unwrap_err();
        assert_eq!(err.span(), at(10));
    }
}
