//! Deciding which reads of a closure become fields of its class.

use crate::error::{ClosureError, Result, Unsupported};
use crate::free_vars::Reads;
use choco_ast::{FunDef, Param, Program, VarInit};
use choco_types::Type;
use indexmap::IndexMap;
use std::collections::HashSet;

/// Variables a closure captures from its enclosing function, with their
/// declared types, in first-read order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Captures {
    vars: IndexMap<String, Type>,
}

impl Captures {
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Type> {
        self.vars.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Type)> {
        self.vars.iter().map(|(name, ty)| (name.as_str(), ty))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl FromIterator<(String, Type)> for Captures {
    fn from_iter<I: IntoIterator<Item = (String, Type)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().collect(),
        }
    }
}

/// Parameters and locals of the function a closure is declared in.
pub struct EnclosingScope<'a> {
    params: &'a [Param],
    inits: &'a [VarInit],
}

impl<'a> EnclosingScope<'a> {
    pub fn new(params: &'a [Param], inits: &'a [VarInit]) -> Self {
        Self { params, inits }
    }

    pub fn lookup(&self, name: &str) -> Option<&'a Type> {
        self.params
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.ty)
            .or_else(|| self.inits.iter().find(|v| v.name == name).map(|v| &v.ty))
    }
}

/// Names visible everywhere: global variables, top-level functions and
/// classes. Taken once from the program as it was before conversion.
#[derive(Debug, Default, Clone)]
pub struct GlobalScope {
    names: HashSet<String>,
}

impl GlobalScope {
    pub fn of(program: &Program) -> Self {
        let names = program
            .inits
            .iter()
            .map(|v| v.name.clone())
            .chain(program.funs.iter().map(|f| f.name.clone()))
            .chain(program.classes.iter().map(|c| c.name.clone()))
            .collect();
        Self { names }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

/// Sort each read of `closure` into bound, captured or global.
///
/// Names the closure binds itself are skipped, then enclosing locals are
/// captured, then globals are left alone. An enclosing local shadows a
/// global of the same name unless the closure declares the name `global`.
/// Anything else is an unresolved identifier.
///
/// A `nonlocal` declaration of an enclosing variable is a write to a
/// capture and is rejected even when the closure never reads the name.
pub fn classify(
    closure: &FunDef,
    reads: &Reads,
    enclosing: &EnclosingScope<'_>,
    globals: &GlobalScope,
) -> Result<Captures> {
    if let Some(name) = reads.nonlocals.first() {
        if enclosing.lookup(name).is_none() {
            return Err(ClosureError::UnresolvedIdentifier {
                name: name.clone(),
                closure: closure.name.clone(),
                span: closure.span,
            });
        }
        return Err(ClosureError::unsupported(
            Unsupported::CapturedWrite {
                name: name.clone(),
                closure: closure.name.clone(),
            },
            closure.span,
        ));
    }

    let bound: HashSet<&str> = closure.binders().collect();
    let mut captures = IndexMap::new();
    for (name, span) in reads.iter() {
        if bound.contains(name) {
            continue;
        }
        let declared_global = reads.globals.contains(name);
        if !declared_global {
            if let Some(ty) = enclosing.lookup(name) {
                captures.insert(name.to_string(), ty.clone());
                continue;
            }
        }
        if globals.contains(name) {
            continue;
        }
        return Err(ClosureError::UnresolvedIdentifier {
            name: name.to_string(),
            closure: closure.name.clone(),
            span,
        });
    }
    Ok(Captures { vars: captures })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::free_vars::collect_reads;
    use choco_ast::build::*;
    use choco_ast::{BinOp, Stmt};
    use pretty_assertions::assert_eq;

    fn program() -> Program {
        Program {
            inits: vec![int_var("g", 10)],
            funs: vec![fun("helper", vec![], Type::Int, vec![], vec![ret(int(1))])],
            ..Program::default()
        }
    }

    fn captures_of(closure: &FunDef, params: &[Param], inits: &[VarInit]) -> Result<Captures> {
        let reads = collect_reads(closure)?;
        classify(
            closure,
            &reads,
            &EnclosingScope::new(params, inits),
            &GlobalScope::of(&program()),
        )
    }

    #[test]
    fn test_captures_enclosing_param_and_local() {
        let adder = fun(
            "adder",
            vec![param("b", Type::Int)],
            Type::Int,
            vec![],
            vec![ret(binop(
                BinOp::Plus,
                binop(BinOp::Plus, id("t"), id("b")),
                binop(BinOp::Plus, id("a"), call(id("helper"), vec![])),
            ))],
        );
        let captures = captures_of(&adder, &[param("a", Type::Int)], &[var("t", Type::Bool)]).unwrap();
        let got: Vec<(&str, &Type)> = captures.iter().collect();
        assert_eq!(got, vec![("t", &Type::Bool), ("a", &Type::Int)]);
    }

    #[test]
    fn test_own_binders_are_not_captured() {
        let f = fun(
            "f",
            vec![param("a", Type::Int)],
            Type::Int,
            vec![int_var("x", 0)],
            vec![ret(binop(BinOp::Plus, id("a"), id("x")))],
        );
        let captures = captures_of(&f, &[param("a", Type::Int)], &[int_var("x", 3)]).unwrap();
        assert!(captures.is_empty());
    }

    #[test]
    fn test_local_shadows_global() {
        let f = fun("f", vec![], Type::Int, vec![], vec![ret(id("g"))]);
        let captures = captures_of(&f, &[], &[int_var("g", 1)]).unwrap();
        assert_eq!(captures.get("g"), Some(&Type::Int));

        let f = fun(
            "f",
            vec![],
            Type::Int,
            vec![],
            vec![Stmt::Global { name: "g".into() }, ret(id("g"))],
        );
        let captures = captures_of(&f, &[], &[int_var("g", 1)]).unwrap();
        assert!(captures.is_empty());
    }

    #[test]
    fn test_unresolved() {
        let f = fun("f", vec![], Type::Int, vec![], vec![ret(id("zz"))]);
        let err = captures_of(&f, &[], &[]).unwrap_err();
        assert_eq!(
            err,
            ClosureError::UnresolvedIdentifier {
                name: "zz".into(),
                closure: "f".into(),
                span: choco_diagnostics::Span::DUMMY,
            }
        );
    }

    #[test]
    fn test_nonlocal_of_enclosing_variable_rejected() {
        let g = fun(
            "g",
            vec![],
            Type::None,
            vec![],
            vec![Stmt::Nonlocal { name: "x".into() }, assign("x", int(5))],
        );
        let err = captures_of(&g, &[], &[int_var("x", 1)]).unwrap_err();
        assert_eq!(
            err,
            ClosureError::Unsupported {
                feature: Unsupported::CapturedWrite {
                    name: "x".into(),
                    closure: "g".into(),
                },
                span: choco_diagnostics::Span::DUMMY,
            }
        );

        let err = captures_of(&g, &[], &[]).unwrap_err();
        assert!(matches!(err, ClosureError::UnresolvedIdentifier { name, .. } if name == "x"));
    }
}
