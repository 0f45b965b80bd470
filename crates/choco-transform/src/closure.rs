//! Closure conversion
//!
//! Every function declared inside a top-level function is lifted into a
//! fresh class. The class holds one field per variable the closure reads
//! from its enclosing function, and its call method holds the closure's
//! body with those reads redirected through the receiver. The declaration
//! itself becomes an instantiation of the class followed by one field
//! store per captured variable, so captures are by value at the point the
//! closure is declared.
//!
//! ```text
//! def getAdder(a: int) -> Callable[[int], int]:      class Clo_0_adder(object):
//!     def adder(b: int) -> int:                          a: int = 0
//!         return a + b                                   def __call__(self: Clo_0_adder, b: int) -> int:
//!     return adder                                           return self.a + b
//!                                                        def __init__(self: Clo_0_adder) -> None:
//!                                                            pass
//!
//!                                                    def getAdder(a: int) -> Callable[[int], int]:
//!                                                        adder: Clo_0_adder = None
//!                                                        adder = Clo_0_adder()
//!                                                        adder.a = a
//!                                                        return adder
//! ```

use crate::capture::{classify, EnclosingScope, GlobalScope};
use crate::config::ClosureConfig;
use crate::error::{ClosureError, Result, Unsupported};
use crate::free_vars::collect_reads;
use crate::rewrite::rewrite_captures;
use crate::synth::lift;
use choco_ast::visit::{super_fold_expr, walk_stmt};
use choco_ast::{Class, Expr, Folder, FunDef, Param, Program, Stmt, VarInit, Visitor};
use choco_diagnostics::Span;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// What a run of closure conversion generated, for the code generator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosureArtifacts {
    /// Synthesized class names, in generation order
    pub class_names: Vec<String>,
    /// Distinct call arities (receiver excluded) of the converted closures
    pub arities: BTreeSet<usize>,
}

/// Bookkeeping for one invocation of the pass. Reset at the start of
/// every [`ClosureRun::convert`].
#[derive(Debug, Default)]
pub struct ClosureRun {
    counter: usize,
    class_names: Vec<String>,
    arities: BTreeSet<usize>,
}

impl ClosureRun {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.counter = 0;
        self.class_names.clear();
        self.arities.clear();
    }

    pub fn class_names(&self) -> &[String] {
        &self.class_names
    }

    pub fn arities(&self) -> &BTreeSet<usize> {
        &self.arities
    }

    pub fn artifacts(&self) -> ClosureArtifacts {
        ClosureArtifacts {
            class_names: self.class_names.clone(),
            arities: self.arities.clone(),
        }
    }

    fn fresh_class_name(&mut self, prefix: &str, closure: &str, globals: &GlobalScope) -> String {
        loop {
            let name = format!("{}_{}_{}", prefix, self.counter, closure);
            self.counter += 1;
            if !globals.contains(&name) {
                return name;
            }
        }
    }

    fn record(&mut self, class_name: &str, arity: usize) {
        self.class_names.push(class_name.to_string());
        self.arities.insert(arity);
    }

    /// Convert every closure in `program`.
    ///
    /// On error `program` is left exactly as it was and the run holds no
    /// artifacts.
    pub fn convert(&mut self, program: &mut Program, config: &ClosureConfig) -> Result<()> {
        self.reset();
        log::debug!("before closure conversion:\n{}", program);
        let result = self.convert_all(program, config);
        match result {
            Ok((funs, lifted)) => {
                program.funs = funs;
                program.classes.extend(lifted);
                log::debug!(
                    "closure conversion lifted {} closure(s):\n{}",
                    self.class_names.len(),
                    program
                );
                Ok(())
            }
            Err(err) => {
                self.reset();
                Err(err)
            }
        }
    }

    fn convert_all(
        &mut self,
        program: &Program,
        config: &ClosureConfig,
    ) -> Result<(Vec<FunDef>, Vec<Class>)> {
        reject_closures_in_methods(&program.classes)?;
        reject_top_level_closures(&program.stmts)?;

        let globals = GlobalScope::of(program);
        let mut funs = program.funs.clone();
        let mut lifted = Vec::new();
        for func in &mut funs {
            let body = std::mem::take(&mut func.body);
            let mut converter = FunctionConverter {
                function: &func.name,
                params: &func.params,
                inits: &mut func.inits,
                globals: &globals,
                lifted: &mut lifted,
                run: &mut *self,
                config,
            };
            let body = converter.fold_block(body)?;
            func.body = body;
        }
        Ok((funs, lifted))
    }
}

/// Convert every closure in `program` with the default naming conventions.
pub fn convert_closures(program: &mut Program) -> Result<ClosureArtifacts> {
    convert_closures_with(program, &ClosureConfig::default())
}

pub fn convert_closures_with(
    program: &mut Program,
    config: &ClosureConfig,
) -> Result<ClosureArtifacts> {
    let mut run = ClosureRun::new();
    run.convert(program, config)?;
    Ok(run.artifacts())
}

/// Lifts the closures of one top-level function, splicing each one's
/// instantiation in place of its declaration.
struct FunctionConverter<'a> {
    function: &'a str,
    params: &'a [Param],
    inits: &'a mut Vec<VarInit>,
    globals: &'a GlobalScope,
    lifted: &'a mut Vec<Class>,
    run: &'a mut ClosureRun,
    config: &'a ClosureConfig,
}

impl FunctionConverter<'_> {
    fn lift_closure(&mut self, mut closure: FunDef) -> Result<Vec<Stmt>> {
        let reads = collect_reads(&closure)?;
        let captures = classify(
            &closure,
            &reads,
            &EnclosingScope::new(self.params, self.inits.as_slice()),
            self.globals,
        )?;

        let receiver = fresh_receiver(&self.config.receiver, &closure, |n| reads.mentions(n));
        let class_name = self.run.fresh_class_name(
            &self.config.class_prefix,
            &closure.name,
            self.globals,
        );
        log::trace!(
            "lifting `{}` in `{}` into {} capturing [{}]",
            closure.name,
            self.function,
            class_name,
            captures.names().collect::<Vec<_>>().join(", ")
        );

        let body = std::mem::take(&mut closure.body);
        closure.body = rewrite_captures(&closure.name, closure.span, body, &captures, &receiver)?;
        let lifted = lift(closure, class_name, &captures, receiver, self.config);

        self.run.record(&lifted.class.name, lifted.arity);
        match self.inits.iter_mut().find(|v| v.name == lifted.slot.name) {
            Some(existing) => *existing = lifted.slot,
            None => self.inits.push(lifted.slot),
        }
        self.lifted.push(lifted.class);
        Ok(lifted.init_stmts)
    }
}

impl Folder for FunctionConverter<'_> {
    type Error = ClosureError;

    fn fold_block(&mut self, stmts: Vec<Stmt>) -> Result<Vec<Stmt>> {
        let mut out = Vec::with_capacity(stmts.len());
        for stmt in stmts {
            match stmt {
                Stmt::Closure { func } => out.extend(self.lift_closure(func)?),
                other => out.push(self.fold_stmt(other)?),
            }
        }
        Ok(out)
    }

    fn fold_expr(&mut self, expr: Expr) -> Result<Expr> {
        match expr {
            Expr::Lambda { span, .. } => Err(ClosureError::unsupported(
                Unsupported::Lambda {
                    function: self.function.to_string(),
                },
                span,
            )),
            other => super_fold_expr(self, other),
        }
    }

    fn fold_closure(&mut self, func: FunDef) -> Result<FunDef> {
        Err(ClosureError::internal(
            format!("closure `{}` outside a statement list", func.name),
            func.span,
        ))
    }
}

/// `base`, with underscores appended until it clashes with nothing the
/// closure binds or reads, comprehension variables included.
fn fresh_receiver(base: &str, closure: &FunDef, is_mentioned: impl Fn(&str) -> bool) -> String {
    let mut name = base.to_string();
    while is_mentioned(&name) || closure.binders().any(|b| b == name) {
        name.push('_');
    }
    name
}

/// Finds the first closure declared anywhere in a statement list.
struct FirstClosure;

impl Visitor for FirstClosure {
    type Error = (String, Span);

    fn visit_stmt(&mut self, stmt: &Stmt) -> std::result::Result<(), (String, Span)> {
        match stmt {
            Stmt::Closure { func } => Err((func.name.clone(), func.span)),
            _ => walk_stmt(self, stmt),
        }
    }
}

fn reject_closures_in_methods(classes: &[Class]) -> Result<()> {
    for class in classes {
        for method in &class.methods {
            if let Err((name, span)) = FirstClosure.visit_block(&method.body) {
                return Err(ClosureError::unsupported(
                    Unsupported::ClosureInMethod {
                        name,
                        class: class.name.clone(),
                        method: method.name.clone(),
                    },
                    span,
                ));
            }
        }
    }
    Ok(())
}

fn reject_top_level_closures(stmts: &[Stmt]) -> Result<()> {
    match FirstClosure.visit_block(stmts) {
        Ok(()) => Ok(()),
        Err((name, span)) => Err(ClosureError::internal(
            format!("function `{}` declared among top-level statements", name),
            span,
        )),
    }
}
