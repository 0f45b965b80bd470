//! Reference evaluator for Choco
//!
//! Interprets a closure-free program directly on the tree, so lowered
//! output can be checked by running it. Closures must be converted first:
//! a nested function definition is an evaluation error.
//!
//! ```
//! use choco_ast::build::*;
//! use choco_ast::{BinOp, Program};
//!
//! let program = Program {
//!     stmts: vec![print(binop(BinOp::Plus, int(1), int(2)))],
//!     ..Program::default()
//! };
//! assert_eq!(choco_eval::run(&program).unwrap(), "3\n");
//! ```

mod env;
pub mod error;
pub mod interp;
pub mod value;

pub use error::{EvalError, EvalResult};
pub use interp::{run, Interpreter, DEFAULT_MAX_DEPTH};
pub use value::{Object, Value};
