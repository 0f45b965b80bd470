//! Names a closure body reads.

use crate::error::{ClosureError, Result, Unsupported};
use choco_ast::visit::walk_expr;
use choco_ast::{Expr, FunDef, Stmt, Visitor};
use choco_diagnostics::Span;
use indexmap::{IndexMap, IndexSet};

/// Every identifier a closure body reads, keyed by name in first-read order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Reads {
    /// Span of the first read of each name
    pub names: IndexMap<String, Span>,
    /// Names the body declares `global`
    pub globals: IndexSet<String>,
    /// Names the body declares `nonlocal`
    pub nonlocals: IndexSet<String>,
    /// Comprehension variables and lambda parameters bound anywhere in the
    /// body
    pub scoped: IndexSet<String>,
}

impl Reads {
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Span)> {
        self.names.iter().map(|(name, span)| (name.as_str(), *span))
    }

    /// Whether `name` appears in the body as a read or a scoped binder.
    pub fn mentions(&self, name: &str) -> bool {
        self.contains(name) || self.scoped.contains(name)
    }
}

/// Collect the reads of `func`'s body.
///
/// Comprehension variables are not reads within the sub-expressions they
/// scope over. A closure nested in `func`, or a lambda anywhere in it, is
/// an error.
pub fn collect_reads(func: &FunDef) -> Result<Reads> {
    let mut collector = ReadCollector {
        owner: func,
        reads: Reads::default(),
        scoped: Vec::new(),
    };
    collector.visit_block(&func.body)?;
    Ok(collector.reads)
}

struct ReadCollector<'a> {
    owner: &'a FunDef,
    reads: Reads,
    scoped: Vec<String>,
}

impl Visitor for ReadCollector<'_> {
    type Error = ClosureError;

    fn visit_stmt(&mut self, stmt: &Stmt) -> Result<()> {
        match stmt {
            Stmt::Global { name } => {
                self.reads.globals.insert(name.clone());
            }
            Stmt::Nonlocal { name } => {
                self.reads.nonlocals.insert(name.clone());
            }
            _ => {}
        }
        choco_ast::visit::walk_stmt(self, stmt)
    }

    fn visit_expr(&mut self, expr: &Expr) -> Result<()> {
        match expr {
            Expr::Id { name, span } => {
                if !self.scoped.iter().any(|s| s == name) {
                    self.reads.names.entry(name.clone()).or_insert(*span);
                }
                Ok(())
            }
            Expr::Lambda { span, .. } => Err(ClosureError::unsupported(
                Unsupported::Lambda {
                    function: self.owner.name.clone(),
                },
                *span,
            )),
            Expr::Construct { name, span } => Err(ClosureError::internal(
                format!("unlowered constructor of `{}` in closure `{}`", name, self.owner.name),
                *span,
            )),
            _ => walk_expr(self, expr),
        }
    }

    fn visit_closure(&mut self, func: &FunDef) -> Result<()> {
        Err(ClosureError::unsupported(
            Unsupported::NestedClosure {
                name: func.name.clone(),
                outer: self.owner.name.clone(),
                outer_span: self.owner.span,
            },
            func.span,
        ))
    }

    fn enter_binder(&mut self, name: &str) {
        self.reads.scoped.insert(name.to_string());
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
    use choco_ast::{BinOp, CompKind};
    use choco_types::Type;

    fn names(reads: &Reads) -> Vec<&str> {
        reads.names.keys().map(String::as_str).collect()
    }

    #[test]
    fn test_first_read_order() {
        let f = fun(
            "adder",
            vec![param("b", Type::Int)],
            Type::Int,
            vec![],
            vec![
                assign("t", binop(BinOp::Plus, id("b"), id("a"))),
                ret(binop(BinOp::Plus, id("a"), id("t"))),
            ],
        );
        let reads = collect_reads(&f).unwrap();
        assert_eq!(names(&reads), vec!["b", "a", "t"]);
    }

    #[test]
    fn test_callee_is_a_read() {
        let f = fun(
            "g",
            vec![],
            Type::Int,
            vec![],
            vec![ret(call(id("helper"), vec![id("x")]))],
        );
        let reads = collect_reads(&f).unwrap();
        assert_eq!(names(&reads), vec!["helper", "x"]);
    }

    #[test]
    fn test_comprehension_variable_is_scoped() {
        let f = fun(
            "g",
            vec![],
            Type::list(Type::Int),
            vec![],
            vec![
                ret(comprehension(
                    binop(BinOp::Plus, id("x"), id("k")),
                    "x",
                    id("xs"),
                    Some(binop(BinOp::Gt, id("x"), int(0))),
                )),
                // `x` read again outside the comprehension is a real read
                expr_stmt(id("x")),
            ],
        );
        let reads = collect_reads(&f).unwrap();
        assert_eq!(names(&reads), vec!["xs", "k", "x"]);
        assert!(reads.scoped.contains("x"));
    }

    #[test]
    fn test_scoped_binder_is_mentioned() {
        let f = fun(
            "g",
            vec![],
            Type::list(Type::Int),
            vec![],
            vec![ret(comprehension(
                binop(BinOp::Plus, id("self"), id("a")),
                "self",
                list(vec![int(1), int(2)]),
                None,
            ))],
        );
        let reads = collect_reads(&f).unwrap();
        assert_eq!(names(&reads), vec!["a"]);
        assert!(!reads.contains("self"));
        assert!(reads.mentions("self"));
    }

    #[test]
    fn test_set_comprehension_and_writes() {
        let f = fun(
            "g",
            vec![],
            Type::None,
            vec![],
            vec![
                assign("y", Expr::Comprehension {
                    kind: CompKind::Set,
                    elem: Box::new(id("v")),
                    var: "v".into(),
                    iterable: Box::new(id("vs")),
                    cond: None,
                }),
                Stmt::Global { name: "counter".into() },
                Stmt::Nonlocal { name: "total".into() },
            ],
        );
        let reads = collect_reads(&f).unwrap();
        // an assignment target alone is not a read
        assert_eq!(names(&reads), vec!["vs"]);
        assert!(reads.globals.contains("counter"));
        assert!(reads.nonlocals.contains("total"));
    }

    #[test]
    fn test_nested_closure_rejected() {
        let f = fun(
            "outer",
            vec![],
            Type::None,
            vec![],
            vec![if_stmt(
                bool_lit(true),
                vec![closure(fun("inner", vec![], Type::None, vec![], vec![]))],
                vec![],
            )],
        );
        let err = collect_reads(&f).unwrap_err();
        match err {
            ClosureError::Unsupported {
                feature: Unsupported::NestedClosure { name, outer, .. },
                ..
            } => {
                assert_eq!(name, "inner");
                assert_eq!(outer, "outer");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_lambda_and_construct_rejected() {
        let f = fun(
            "g",
            vec![],
            Type::None,
            vec![],
            vec![expr_stmt(lambda(vec![param("x", Type::Int)], Type::Int, id("x")))],
        );
        assert!(matches!(
            collect_reads(&f),
            Err(ClosureError::Unsupported {
                feature: Unsupported::Lambda { .. },
                ..
            })
        ));

        let f = fun(
            "g",
            vec![],
            Type::None,
            vec![],
            vec![expr_stmt(Expr::Construct {
                name: "C".into(),
                span: Span::DUMMY,
            })],
        );
        assert!(matches!(collect_reads(&f), Err(ClosureError::Internal { .. })));
    }
}
