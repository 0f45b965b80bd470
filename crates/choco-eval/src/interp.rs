//! Tree-walking interpreter

use crate::env::Frame;
use crate::error::{EvalError, EvalResult};
use crate::value::{Object, Value};
use choco_ast::{
    AssignTarget, BinOp, Class, CompKind, DestructureTarget, Expr, FunDef, Literal, Program, Stmt,
    UniOp,
};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Calls nested deeper than this abort evaluation.
pub const DEFAULT_MAX_DEPTH: usize = 200;

/// How a statement finished.
enum Flow {
    Normal,
    Break,
    Continue,
    Return(Value),
}

/// Evaluates a closure-free program.
pub struct Interpreter<'p> {
    program: &'p Program,
    globals: HashMap<String, Value>,
    frames: Vec<Frame>,
    output: String,
    initialized: bool,
    max_depth: usize,
    call_method: String,
    constructor: String,
}

/// Run `program` and return everything it printed.
pub fn run(program: &Program) -> EvalResult<String> {
    Interpreter::new(program).run()
}

impl<'p> Interpreter<'p> {
    pub fn new(program: &'p Program) -> Self {
        Self {
            program,
            globals: HashMap::new(),
            frames: Vec::new(),
            output: String::new(),
            initialized: false,
            max_depth: DEFAULT_MAX_DEPTH,
            call_method: "__call__".to_string(),
            constructor: "__init__".to_string(),
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Method names used for calling objects and constructing them.
    pub fn with_conventions(mut self, call_method: &str, constructor: &str) -> Self {
        self.call_method = call_method.to_string();
        self.constructor = constructor.to_string();
        self
    }

    /// Output printed so far.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Initialize globals, execute the top-level statements and return the
    /// printed output.
    pub fn run(mut self) -> EvalResult<String> {
        self.init_globals();
        let program = self.program;
        log::debug!(
            "evaluating {} top-level statement(s), {} global(s)",
            program.stmts.len(),
            program.inits.len()
        );
        match self.exec_block(&program.stmts)? {
            Flow::Normal | Flow::Return(_) => Ok(self.output),
            Flow::Break => Err(EvalError::OutsideLoop("break")),
            Flow::Continue => Err(EvalError::OutsideLoop("continue")),
        }
    }

    /// Call the top-level function `name`.
    pub fn call(&mut self, name: &str, args: Vec<Value>) -> EvalResult<Value> {
        self.init_globals();
        let program = self.program;
        let func = program
            .function(name)
            .ok_or_else(|| EvalError::UndefinedVariable(name.to_string()))?;
        self.call_function(func, args)
    }

    /// Call any callable value: a function or an object with a call method.
    pub fn call_value(&mut self, callee: Value, args: Vec<Value>) -> EvalResult<Value> {
        match callee {
            Value::Function(name) => self.call(&name, args),
            Value::Object(obj) => {
                let method = self.call_method.clone();
                self.invoke(obj, &method, args)
            }
            other => Err(EvalError::NotCallable(other.type_name())),
        }
    }

    fn init_globals(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;
        for init in &self.program.inits {
            self.globals.insert(init.name.clone(), literal(&init.value));
        }
    }

    fn call_function(&mut self, func: &FunDef, args: Vec<Value>) -> EvalResult<Value> {
        if args.len() != func.params.len() {
            return Err(EvalError::ArityMismatch {
                function: func.name.clone(),
                expected: func.params.len(),
                actual: args.len(),
            });
        }
        if self.frames.len() >= self.max_depth {
            return Err(EvalError::RecursionLimit(self.max_depth));
        }
        log::trace!("call {}/{} at depth {}", func.name, args.len(), self.frames.len());

        let vars = func
            .params
            .iter()
            .map(|p| p.name.clone())
            .zip(args)
            .chain(func.inits.iter().map(|v| (v.name.clone(), literal(&v.value))))
            .collect();
        self.frames.push(Frame::new(vars));
        let flow = self.exec_block(&func.body);
        self.frames.pop();

        match flow? {
            Flow::Normal => Ok(Value::None),
            Flow::Return(value) => Ok(value),
            Flow::Break => Err(EvalError::OutsideLoop("break")),
            Flow::Continue => Err(EvalError::OutsideLoop("continue")),
        }
    }

    fn invoke(&mut self, obj: Rc<Object>, method: &str, args: Vec<Value>) -> EvalResult<Value> {
        let program = self.program;
        let func = program
            .class(&obj.class)
            .and_then(|c| c.method(method))
            .ok_or_else(|| EvalError::NoSuchMethod {
                class: obj.class.clone(),
                method: method.to_string(),
            })?;
        let mut full = Vec::with_capacity(args.len() + 1);
        full.push(Value::Object(obj));
        full.extend(args);
        self.call_function(func, full)
    }

    /// Allocate an instance with default field values, then run its
    /// constructor.
    fn instantiate(&mut self, class: &Class, args: Vec<Value>) -> EvalResult<Value> {
        let fields: IndexMap<String, Value> = class
            .fields
            .iter()
            .map(|f| (f.name.clone(), literal(&f.value)))
            .collect();
        let obj = Rc::new(Object {
            class: class.name.clone(),
            fields: RefCell::new(fields),
        });
        if class.method(&self.constructor).is_some() {
            let constructor = self.constructor.clone();
            self.invoke(obj.clone(), &constructor, args)?;
        } else if !args.is_empty() {
            return Err(EvalError::ArityMismatch {
                function: class.name.clone(),
                expected: 0,
                actual: args.len(),
            });
        }
        Ok(Value::Object(obj))
    }

    // --- names ---

    fn is_variable(&self, name: &str) -> bool {
        self.frames.last().map_or(false, |f| f.has_local(name)) || self.globals.contains_key(name)
    }

    fn lookup(&self, name: &str) -> EvalResult<Value> {
        if let Some(value) = self.frames.last().and_then(|f| f.get(name)) {
            return Ok(value.clone());
        }
        if let Some(value) = self.globals.get(name) {
            return Ok(value.clone());
        }
        if self.program.function(name).is_some() {
            return Ok(Value::Function(Rc::from(name)));
        }
        Err(EvalError::UndefinedVariable(name.to_string()))
    }

    fn store(&mut self, name: &str, value: Value) {
        match self.frames.last_mut() {
            Some(frame)
                if !frame.is_global(name)
                    && (frame.has_local(name) || !self.globals.contains_key(name)) =>
            {
                frame.set(name, value)
            }
            _ => {
                self.globals.insert(name.to_string(), value);
            }
        }
    }

    fn shadow(&mut self, name: &str, value: Value) -> Option<Value> {
        match self.frames.last_mut() {
            Some(frame) => frame.shadow(name, value),
            None => self.globals.insert(name.to_string(), value),
        }
    }

    fn restore(&mut self, name: &str, previous: Option<Value>) {
        match self.frames.last_mut() {
            Some(frame) => frame.restore(name, previous),
            None => match previous {
                Some(value) => {
                    self.globals.insert(name.to_string(), value);
                }
                None => {
                    self.globals.remove(name);
                }
            },
        }
    }

    // --- statements ---

    fn exec_block(&mut self, stmts: &[Stmt]) -> EvalResult<Flow> {
        for stmt in stmts {
            match self.exec(stmt)? {
                Flow::Normal => {}
                other => return Ok(other),
            }
        }
        Ok(Flow::Normal)
    }

    fn exec(&mut self, stmt: &Stmt) -> EvalResult<Flow> {
        match stmt {
            Stmt::Assign { name, value } => {
                let value = self.eval(value)?;
                self.store(name, value);
            }
            Stmt::AssignDestructure { targets, value } => {
                let value = self.eval(value)?;
                self.destructure(targets, value)?;
            }
            Stmt::Return { value } => {
                let value = match value {
                    Some(value) => self.eval(value)?,
                    None => Value::None,
                };
                return Ok(Flow::Return(value));
            }
            Stmt::Expr { expr } => {
                self.eval(expr)?;
            }
            Stmt::FieldAssign { obj, field, value } => {
                let obj = self.eval(obj)?;
                let value = self.eval(value)?;
                set_field(&obj, field, value)?;
            }
            Stmt::IndexAssign { obj, index, value } => {
                let obj = self.eval(obj)?;
                let index = self.eval(index)?;
                let value = self.eval(value)?;
                set_index(&obj, &index, value)?;
            }
            Stmt::If { cond, thn, els } => {
                return if self.eval(cond)?.is_truthy() {
                    self.exec_block(thn)
                } else {
                    self.exec_block(els)
                };
            }
            Stmt::While { cond, body } => {
                while self.eval(cond)?.is_truthy() {
                    match self.exec_block(body)? {
                        Flow::Break => break,
                        Flow::Normal | Flow::Continue => {}
                        ret @ Flow::Return(_) => return Ok(ret),
                    }
                }
            }
            Stmt::For {
                var,
                iterable,
                body,
                els,
            } => {
                let items = self.eval(iterable).and_then(|v| items_of(&v, "for"))?;
                let mut broke = false;
                for item in items {
                    self.store(var, item);
                    match self.exec_block(body)? {
                        Flow::Break => {
                            broke = true;
                            break;
                        }
                        Flow::Normal | Flow::Continue => {}
                        ret @ Flow::Return(_) => return Ok(ret),
                    }
                }
                if let (false, Some(els)) = (broke, els) {
                    return self.exec_block(els);
                }
            }
            Stmt::Pass => {}
            Stmt::Nonlocal { .. } => return Err(EvalError::Unsupported("nonlocal".into())),
            Stmt::Global { name } => {
                if let Some(frame) = self.frames.last_mut() {
                    frame.declare_global(name);
                }
            }
            Stmt::Break => return Ok(Flow::Break),
            Stmt::Continue => return Ok(Flow::Continue),
            Stmt::Closure { func } => return Err(EvalError::UnconvertedClosure(func.name.clone())),
        }
        Ok(Flow::Normal)
    }

    fn destructure(&mut self, targets: &[DestructureTarget], value: Value) -> EvalResult<()> {
        let items = items_of(&value, "unpack")?;
        let star = targets.iter().position(|t| t.starred);
        let fixed = targets.len() - usize::from(star.is_some());
        let too_few = items.len() < fixed;
        if too_few || (star.is_none() && items.len() != fixed) {
            return Err(EvalError::Unpack {
                expected: fixed,
                actual: items.len(),
            });
        }

        let mut items = items.into_iter();
        for (i, target) in targets.iter().enumerate() {
            let value = if Some(i) == star {
                let rest = items.len() - (targets.len() - i - 1);
                Value::list(items.by_ref().take(rest).collect())
            } else {
                items.next().unwrap_or(Value::None)
            };
            self.assign_target(&target.target, value)?;
        }
        Ok(())
    }

    fn assign_target(&mut self, target: &AssignTarget, value: Value) -> EvalResult<()> {
        match target {
            AssignTarget::Id { name } => {
                self.store(name, value);
                Ok(())
            }
            AssignTarget::Field { obj, field } => {
                let obj = self.eval(obj)?;
                set_field(&obj, field, value)
            }
            AssignTarget::Index { obj, index } => {
                let obj = self.eval(obj)?;
                let index = self.eval(index)?;
                set_index(&obj, &index, value)
            }
            AssignTarget::Ignore => Ok(()),
        }
    }

    // --- expressions ---

    fn eval_all(&mut self, exprs: &[Expr]) -> EvalResult<Vec<Value>> {
        exprs.iter().map(|e| self.eval(e)).collect()
    }

    pub fn eval(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Literal { value } => Ok(literal(value)),
            Expr::Id { name, .. } => self.lookup(name),
            Expr::UniOp { op, expr } => {
                let value = self.eval(expr)?;
                match (op, value) {
                    (UniOp::Not, value) => Ok(Value::Bool(!value.is_truthy())),
                    (UniOp::Neg, Value::Int(i)) => i
                        .checked_neg()
                        .map(Value::Int)
                        .ok_or_else(|| EvalError::Overflow("-".into())),
                    (UniOp::Neg, other) => Err(type_error("int", &other, "-")),
                }
            }
            Expr::BinOp {
                op: BinOp::And,
                left,
                right,
            } => {
                let left = self.eval(left)?;
                if left.is_truthy() {
                    self.eval(right)
                } else {
                    Ok(left)
                }
            }
            Expr::BinOp {
                op: BinOp::Or,
                left,
                right,
            } => {
                let left = self.eval(left)?;
                if left.is_truthy() {
                    Ok(left)
                } else {
                    self.eval(right)
                }
            }
            Expr::BinOp { op, left, right } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                binary(*op, left, right)
            }
            Expr::Builtin1 { name, arg } => {
                let arg = self.eval(arg)?;
                self.builtin1(name, arg)
            }
            Expr::Builtin2 { name, left, right } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                apply_builtin2(name, left, right)
            }
            Expr::Call { callee, args } => {
                let program = self.program;
                let target = match callee.as_id() {
                    Some(name) if !self.is_variable(name) => {
                        if let Some(class) = program.class(name) {
                            let args = self.eval_all(args)?;
                            return self.instantiate(class, args);
                        }
                        self.lookup(name)?
                    }
                    _ => self.eval(callee)?,
                };
                let args = self.eval_all(args)?;
                self.call_value(target, args)
            }
            Expr::Lookup { obj, field } => {
                let obj = self.eval(obj)?;
                get_field(&obj, field)
            }
            Expr::Index { obj, index } => {
                let obj = self.eval(obj)?;
                let index = self.eval(index)?;
                get_index(&obj, &index)
            }
            Expr::MethodCall { obj, method, args } => {
                let obj = self.eval(obj)?;
                let args = self.eval_all(args)?;
                match obj {
                    Value::Object(obj) => self.invoke(obj, method, args),
                    Value::List(items) if method == "append" && args.len() == 1 => {
                        items.borrow_mut().extend(args);
                        Ok(Value::None)
                    }
                    other => Err(EvalError::NoSuchMethod {
                        class: other.type_name(),
                        method: method.clone(),
                    }),
                }
            }
            Expr::List { elems } => Ok(Value::list(self.eval_all(elems)?)),
            Expr::Set { elems } => Ok(Value::list(dedup(self.eval_all(elems)?))),
            Expr::Tuple { elems } => Ok(Value::Tuple(Rc::from(self.eval_all(elems)?))),
            Expr::Comprehension {
                kind,
                elem,
                var,
                iterable,
                cond,
            } => {
                let items = self.eval(iterable).and_then(|v| items_of(&v, "comprehension"))?;
                let mut out = Vec::new();
                let mut saved = None;
                let mut result = Ok(());
                for item in items {
                    let shadowed = self.shadow(var, item);
                    saved.get_or_insert(shadowed);
                    result = self.comprehension_step(elem, cond.as_deref(), &mut out);
                    if result.is_err() {
                        break;
                    }
                }
                if let Some(previous) = saved {
                    self.restore(var, previous);
                }
                result?;
                Ok(Value::list(match kind {
                    CompKind::List => out,
                    CompKind::Set => dedup(out),
                }))
            }
            Expr::IfExpr { cond, thn, els } => {
                if self.eval(cond)?.is_truthy() {
                    self.eval(thn)
                } else {
                    self.eval(els)
                }
            }
            Expr::Construct { name, .. } => {
                let program = self.program;
                let class = program
                    .class(name)
                    .ok_or_else(|| EvalError::UndefinedVariable(name.clone()))?;
                self.instantiate(class, Vec::new())
            }
            Expr::Lambda { .. } => Err(EvalError::Unsupported("lambda".into())),
        }
    }

    fn comprehension_step(
        &mut self,
        elem: &Expr,
        cond: Option<&Expr>,
        out: &mut Vec<Value>,
    ) -> EvalResult<()> {
        let keep = match cond {
            Some(cond) => self.eval(cond)?.is_truthy(),
            None => true,
        };
        if keep {
            out.push(self.eval(elem)?);
        }
        Ok(())
    }

    fn builtin1(&mut self, name: &str, arg: Value) -> EvalResult<Value> {
        match name {
            "print" => {
                self.output.push_str(&arg.to_string());
                self.output.push('\n');
                Ok(Value::None)
            }
            "len" => {
                let len = match &arg {
                    Value::Str(s) => s.chars().count(),
                    Value::List(items) => items.borrow().len(),
                    Value::Tuple(items) => items.len(),
                    other => return Err(type_error("str or list", other, "len")),
                };
                Ok(Value::Int(len as i64))
            }
            "abs" => match arg {
                Value::Int(i) => i
                    .checked_abs()
                    .map(Value::Int)
                    .ok_or_else(|| EvalError::Overflow("abs".into())),
                other => Err(type_error("int", &other, "abs")),
            },
            other => Err(EvalError::Unsupported(format!("builtin `{}`", other))),
        }
    }
}

fn literal(lit: &Literal) -> Value {
    match lit {
        Literal::Num { value } => Value::Int(*value),
        Literal::Bool { value } => Value::Bool(*value),
        Literal::Str { value } => Value::str(value),
        Literal::None => Value::None,
    }
}

fn type_error(expected: &str, actual: &Value, operation: &str) -> EvalError {
    EvalError::TypeError {
        expected: expected.to_string(),
        actual: actual.type_name(),
        operation: operation.to_string(),
    }
}

fn dedup(values: Vec<Value>) -> Vec<Value> {
    let mut out: Vec<Value> = Vec::with_capacity(values.len());
    for v in values {
        if !out.iter().any(|seen| seen.equals(&v)) {
            out.push(v);
        }
    }
    out
}

fn items_of(value: &Value, operation: &str) -> EvalResult<Vec<Value>> {
    match value {
        Value::List(items) => Ok(items.borrow().clone()),
        Value::Tuple(items) => Ok(items.to_vec()),
        Value::Str(s) => Ok(s.chars().map(|c| Value::str(&c.to_string())).collect()),
        other => Err(type_error("iterable", other, operation)),
    }
}

fn get_field(obj: &Value, field: &str) -> EvalResult<Value> {
    match obj {
        Value::Object(obj) => obj
            .fields
            .borrow()
            .get(field)
            .cloned()
            .ok_or_else(|| EvalError::NoSuchField {
                class: obj.class.clone(),
                field: field.to_string(),
            }),
        other => Err(type_error("object", other, &format!(".{}", field))),
    }
}

fn set_field(obj: &Value, field: &str, value: Value) -> EvalResult<()> {
    match obj {
        Value::Object(obj) => match obj.fields.borrow_mut().get_mut(field) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(EvalError::NoSuchField {
                class: obj.class.clone(),
                field: field.to_string(),
            }),
        },
        other => Err(type_error("object", other, &format!(".{}", field))),
    }
}

fn checked_index(index: &Value, length: usize) -> EvalResult<usize> {
    match index {
        Value::Int(i) if *i >= 0 && (*i as usize) < length => Ok(*i as usize),
        Value::Int(i) => Err(EvalError::IndexOutOfBounds { index: *i, length }),
        other => Err(type_error("int", other, "[]")),
    }
}

fn get_index(obj: &Value, index: &Value) -> EvalResult<Value> {
    match obj {
        Value::List(items) => {
            let items = items.borrow();
            Ok(items[checked_index(index, items.len())?].clone())
        }
        Value::Tuple(items) => Ok(items[checked_index(index, items.len())?].clone()),
        Value::Str(s) => {
            let chars: Vec<char> = s.chars().collect();
            let c = chars[checked_index(index, chars.len())?];
            Ok(Value::str(&c.to_string()))
        }
        other => Err(type_error("list or str", other, "[]")),
    }
}

fn set_index(obj: &Value, index: &Value, value: Value) -> EvalResult<()> {
    match obj {
        Value::List(items) => {
            let mut items = items.borrow_mut();
            let i = checked_index(index, items.len())?;
            items[i] = value;
            Ok(())
        }
        other => Err(type_error("list", other, "[]=")),
    }
}

fn floor_div(a: i64, b: i64) -> EvalResult<i64> {
    if b == 0 {
        return Err(EvalError::DivisionByZero);
    }
    let q = a.checked_div(b).ok_or_else(|| EvalError::Overflow("//".into()))?;
    Ok(if a % b != 0 && ((a < 0) != (b < 0)) { q - 1 } else { q })
}

fn floor_mod(a: i64, b: i64) -> EvalResult<i64> {
    if b == 0 {
        return Err(EvalError::DivisionByZero);
    }
    let r = a.checked_rem(b).ok_or_else(|| EvalError::Overflow("%".into()))?;
    Ok(if r != 0 && ((r < 0) != (b < 0)) { r + b } else { r })
}

fn binary(op: BinOp, left: Value, right: Value) -> EvalResult<Value> {
    let overflow = || EvalError::Overflow(op.to_string());
    match (op, &left, &right) {
        (BinOp::Eq, _, _) => Ok(Value::Bool(left.equals(&right))),
        (BinOp::Neq, _, _) => Ok(Value::Bool(!left.equals(&right))),
        (BinOp::Is, _, _) => Ok(Value::Bool(left.is(&right))),
        (BinOp::Plus, Value::Int(a), Value::Int(b)) => {
            a.checked_add(*b).map(Value::Int).ok_or_else(overflow)
        }
        (BinOp::Minus, Value::Int(a), Value::Int(b)) => {
            a.checked_sub(*b).map(Value::Int).ok_or_else(overflow)
        }
        (BinOp::Mul, Value::Int(a), Value::Int(b)) => {
            a.checked_mul(*b).map(Value::Int).ok_or_else(overflow)
        }
        (BinOp::IDiv, Value::Int(a), Value::Int(b)) => floor_div(*a, *b).map(Value::Int),
        (BinOp::Mod, Value::Int(a), Value::Int(b)) => floor_mod(*a, *b).map(Value::Int),
        (BinOp::Plus, Value::Str(a), Value::Str(b)) => Ok(Value::str(&format!("{}{}", a, b))),
        (BinOp::Plus, Value::List(a), Value::List(b)) => {
            let mut items = a.borrow().clone();
            items.extend(b.borrow().iter().cloned());
            Ok(Value::list(items))
        }
        (BinOp::Lt | BinOp::Lte | BinOp::Gt | BinOp::Gte, Value::Int(a), Value::Int(b)) => {
            Ok(Value::Bool(compare(op, a.cmp(b))))
        }
        (BinOp::Lt | BinOp::Lte | BinOp::Gt | BinOp::Gte, Value::Str(a), Value::Str(b)) => {
            Ok(Value::Bool(compare(op, a.cmp(b))))
        }
        _ => Err(EvalError::TypeError {
            expected: "operands of matching types".into(),
            actual: format!("{} and {}", left.type_name(), right.type_name()),
            operation: op.to_string(),
        }),
    }
}

fn compare(op: BinOp, ordering: std::cmp::Ordering) -> bool {
    use std::cmp::Ordering::*;
    match op {
        BinOp::Lt => ordering == Less,
        BinOp::Lte => ordering != Greater,
        BinOp::Gt => ordering == Greater,
        _ => ordering != Less,
    }
}

fn apply_builtin2(name: &str, left: Value, right: Value) -> EvalResult<Value> {
    let (a, b) = match (&left, &right) {
        (Value::Int(a), Value::Int(b)) => (*a, *b),
        (Value::Int(_), other) | (other, _) => return Err(type_error("int", other, name)),
    };
    match name {
        "max" => Ok(Value::Int(a.max(b))),
        "min" => Ok(Value::Int(a.min(b))),
        "pow" => {
            let exp = u32::try_from(b)
                .map_err(|_| EvalError::Unsupported("negative exponent".into()))?;
            a.checked_pow(exp)
                .map(Value::Int)
                .ok_or_else(|| EvalError::Overflow("pow".into()))
        }
        other => Err(EvalError::Unsupported(format!("builtin `{}`", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use choco_ast::build::*;
    use choco_types::Type;
    use pretty_assertions::assert_eq;

    fn program(funs: Vec<FunDef>, stmts: Vec<Stmt>) -> Program {
        Program {
            funs,
            stmts,
            ..Program::default()
        }
    }

    #[test]
    fn test_arithmetic_and_print() {
        let p = program(
            vec![],
            vec![
                print(binop(BinOp::IDiv, int(-7), int(2))),
                print(binop(BinOp::Mod, int(-7), int(2))),
                print(builtin2("pow", int(2), int(10))),
                print(binop(BinOp::And, bool_lit(true), bool_lit(false))),
                print(binop(BinOp::Plus, str_lit("ab"), str_lit("c"))),
            ],
        );
        assert_eq!(run(&p).unwrap(), "-4\n1\n1024\nFalse\nabc\n");
    }

    #[test]
    fn test_recursion_limit() {
        let forever = fun(
            "forever",
            vec![],
            Type::Int,
            vec![],
            vec![ret(call(id("forever"), vec![]))],
        );
        let p = program(vec![forever], vec![expr_stmt(call(id("forever"), vec![]))]);
        let err = Interpreter::new(&p).with_max_depth(10).run().unwrap_err();
        assert_eq!(err, EvalError::RecursionLimit(10));
    }

    #[test]
    fn test_loops_and_comprehensions() {
        let p = Program {
            inits: vec![int_var("total", 0)],
            stmts: vec![
                for_each(
                    "x",
                    list(vec![int(1), int(2), int(3)]),
                    vec![assign("total", binop(BinOp::Plus, id("total"), id("x")))],
                ),
                print(id("total")),
                print(comprehension(
                    binop(BinOp::Mul, id("x"), int(10)),
                    "x",
                    list(vec![int(1), int(2), int(3)]),
                    Some(binop(BinOp::Gt, id("x"), int(1))),
                )),
                // the comprehension restored the loop variable
                print(id("x")),
            ],
            ..Program::default()
        };
        assert_eq!(run(&p).unwrap(), "6\n[20, 30]\n3\n");
    }

    #[test]
    fn test_unconverted_closure() {
        let f = fun(
            "f",
            vec![],
            Type::None,
            vec![],
            vec![closure(fun("g", vec![], Type::None, vec![], vec![]))],
        );
        let p = program(vec![f], vec![expr_stmt(call(id("f"), vec![]))]);
        assert_eq!(run(&p).unwrap_err(), EvalError::UnconvertedClosure("g".into()));
    }

    #[test]
    fn test_arity_mismatch() {
        let f = fun("f", vec![param("a", Type::Int)], Type::Int, vec![], vec![ret(id("a"))]);
        let p = program(vec![f], vec![expr_stmt(call(id("f"), vec![]))]);
        assert!(matches!(run(&p), Err(EvalError::ArityMismatch { expected: 1, actual: 0, .. })));
    }
}
