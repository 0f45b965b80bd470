//! Python-like rendering of the program tree, for debug dumps and diffs.

use crate::ir::*;
use std::fmt::{self, Display, Formatter, Write};

const INDENT: &str = "    ";

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Num { value } => write!(f, "{}", value),
            Literal::Bool { value: true } => write!(f, "True"),
            Literal::Bool { value: false } => write!(f, "False"),
            Literal::Str { value } => write!(f, "{:?}", value),
            Literal::None => write!(f, "None"),
        }
    }
}

impl Display for UniOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UniOp::Neg => "-",
            UniOp::Not => "not ",
        })
    }
}

impl Display for BinOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BinOp::Plus => "+",
            BinOp::Minus => "-",
            BinOp::Mul => "*",
            BinOp::IDiv => "//",
            BinOp::Mod => "%",
            BinOp::Eq => "==",
            BinOp::Neq => "!=",
            BinOp::Lte => "<=",
            BinOp::Gte => ">=",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Is => "is",
            BinOp::And => "and",
            BinOp::Or => "or",
        })
    }
}

fn comma_separated(f: &mut Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal { value } => write!(f, "{}", value),
            Expr::Id { name, .. } => f.write_str(name),
            Expr::UniOp { op, expr } => write!(f, "({}{})", op, expr),
            Expr::BinOp { op, left, right } => write!(f, "({} {} {})", left, op, right),
            Expr::Builtin1 { name, arg } => write!(f, "{}({})", name, arg),
            Expr::Builtin2 { name, left, right } => write!(f, "{}({}, {})", name, left, right),
            Expr::Call { callee, args } => {
                write!(f, "{}(", callee)?;
                comma_separated(f, args)?;
                f.write_char(')')
            }
            Expr::Lookup { obj, field } => write!(f, "{}.{}", obj, field),
            Expr::Index { obj, index } => write!(f, "{}[{}]", obj, index),
            Expr::MethodCall { obj, method, args } => {
                write!(f, "{}.{}(", obj, method)?;
                comma_separated(f, args)?;
                f.write_char(')')
            }
            Expr::List { elems } => {
                f.write_char('[')?;
                comma_separated(f, elems)?;
                f.write_char(']')
            }
            Expr::Set { elems } => {
                f.write_char('{')?;
                comma_separated(f, elems)?;
                f.write_char('}')
            }
            Expr::Tuple { elems } => {
                f.write_char('(')?;
                comma_separated(f, elems)?;
                if elems.len() == 1 {
                    f.write_char(',')?;
                }
                f.write_char(')')
            }
            Expr::Comprehension {
                kind,
                elem,
                var,
                iterable,
                cond,
            } => {
                let (open, close) = match kind {
                    CompKind::List => ('[', ']'),
                    CompKind::Set => ('{', '}'),
                };
                write!(f, "{}{} for {} in {}", open, elem, var, iterable)?;
                if let Some(cond) = cond {
                    write!(f, " if {}", cond)?;
                }
                f.write_char(close)
            }
            Expr::IfExpr { cond, thn, els } => write!(f, "({} if {} else {})", thn, cond, els),
            Expr::Construct { name, .. } => write!(f, "new {}()", name),
            Expr::Lambda { params, body, .. } => {
                f.write_str("(lambda")?;
                for (i, p) in params.iter().enumerate() {
                    f.write_str(if i == 0 { " " } else { ", " })?;
                    f.write_str(&p.name)?;
                }
                write!(f, ": {})", body)
            }
        }
    }
}

impl Display for AssignTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AssignTarget::Id { name } => f.write_str(name),
            AssignTarget::Field { obj, field } => write!(f, "{}.{}", obj, field),
            AssignTarget::Index { obj, index } => write!(f, "{}[{}]", obj, index),
            AssignTarget::Ignore => f.write_char('_'),
        }
    }
}

fn write_block(out: &mut String, stmts: &[Stmt], depth: usize) -> fmt::Result {
    if stmts.is_empty() {
        return writeln!(out, "{}pass", INDENT.repeat(depth));
    }
    stmts.iter().try_for_each(|s| write_stmt(out, s, depth))
}

fn write_stmt(out: &mut String, stmt: &Stmt, depth: usize) -> fmt::Result {
    let pad = INDENT.repeat(depth);
    match stmt {
        Stmt::Assign { name, value } => writeln!(out, "{}{} = {}", pad, name, value),
        Stmt::AssignDestructure { targets, value } => {
            out.push_str(&pad);
            for (i, t) in targets.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                if t.starred {
                    out.push('*');
                }
                write!(out, "{}", t.target)?;
            }
            writeln!(out, " = {}", value)
        }
        Stmt::Return { value: Some(value) } => writeln!(out, "{}return {}", pad, value),
        Stmt::Return { value: None } => writeln!(out, "{}return", pad),
        Stmt::Expr { expr } => writeln!(out, "{}{}", pad, expr),
        Stmt::FieldAssign { obj, field, value } => {
            writeln!(out, "{}{}.{} = {}", pad, obj, field, value)
        }
        Stmt::IndexAssign { obj, index, value } => {
            writeln!(out, "{}{}[{}] = {}", pad, obj, index, value)
        }
        Stmt::If { cond, thn, els } => {
            writeln!(out, "{}if {}:", pad, cond)?;
            write_block(out, thn, depth + 1)?;
            if !els.is_empty() {
                writeln!(out, "{}else:", pad)?;
                write_block(out, els, depth + 1)?;
            }
            Ok(())
        }
        Stmt::While { cond, body } => {
            writeln!(out, "{}while {}:", pad, cond)?;
            write_block(out, body, depth + 1)
        }
        Stmt::For {
            var,
            iterable,
            body,
            els,
        } => {
            writeln!(out, "{}for {} in {}:", pad, var, iterable)?;
            write_block(out, body, depth + 1)?;
            if let Some(els) = els {
                writeln!(out, "{}else:", pad)?;
                write_block(out, els, depth + 1)?;
            }
            Ok(())
        }
        Stmt::Pass => writeln!(out, "{}pass", pad),
        Stmt::Nonlocal { name } => writeln!(out, "{}nonlocal {}", pad, name),
        Stmt::Global { name } => writeln!(out, "{}global {}", pad, name),
        Stmt::Break => writeln!(out, "{}break", pad),
        Stmt::Continue => writeln!(out, "{}continue", pad),
        Stmt::Closure { func } => write_fun(out, func, depth),
    }
}

fn write_var(out: &mut String, v: &VarInit, depth: usize) -> fmt::Result {
    writeln!(out, "{}{}: {} = {}", INDENT.repeat(depth), v.name, v.ty, v.value)
}

fn write_fun(out: &mut String, func: &FunDef, depth: usize) -> fmt::Result {
    write!(out, "{}def {}(", INDENT.repeat(depth), func.name)?;
    for (i, p) in func.params.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write!(out, "{}: {}", p.name, p.ty)?;
    }
    writeln!(out, ") -> {}:", func.ret)?;
    for v in &func.inits {
        write_var(out, v, depth + 1)?;
    }
    if func.inits.is_empty() || !func.body.is_empty() {
        write_block(out, &func.body, depth + 1)?;
    }
    Ok(())
}

impl Display for Stmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        write_stmt(&mut out, self, 0)?;
        f.write_str(out.trim_end())
    }
}

impl Display for FunDef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        write_fun(&mut out, self, 0)?;
        f.write_str(&out)
    }
}

impl Display for Class {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        writeln!(out, "class {}(object):", self.name)?;
        for field in &self.fields {
            write_var(&mut out, field, 1)?;
        }
        for method in &self.methods {
            write_fun(&mut out, method, 1)?;
        }
        if self.fields.is_empty() && self.methods.is_empty() {
            writeln!(out, "{}pass", INDENT)?;
        }
        f.write_str(&out)
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        for v in &self.inits {
            write_var(&mut out, v, 0)?;
        }
        for class in &self.classes {
            write!(out, "{}", class)?;
        }
        for func in &self.funs {
            write_fun(&mut out, func, 0)?;
        }
        for stmt in &self.stmts {
            write_stmt(&mut out, stmt, 0)?;
        }
        f.write_str(&out)
    }
}
