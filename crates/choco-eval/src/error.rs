use thiserror::Error;

pub type EvalResult<T> = Result<T, EvalError>;

/// Errors that abort evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("name `{0}` is not defined")]
    UndefinedVariable(String),

    #[error("{operation}: expected {expected}, got {actual}")]
    TypeError {
        expected: String,
        actual: String,
        operation: String,
    },

    #[error("`{function}` takes {expected} argument(s) but {actual} were given")]
    ArityMismatch {
        function: String,
        expected: usize,
        actual: usize,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow in `{0}`")]
    Overflow(String),

    #[error("index {index} out of range for length {length}")]
    IndexOutOfBounds { index: i64, length: usize },

    #[error("`{class}` object has no attribute `{field}`")]
    NoSuchField { class: String, field: String },

    #[error("`{class}` object has no method `{method}`")]
    NoSuchMethod { class: String, method: String },

    #[error("`{0}` value is not callable")]
    NotCallable(String),

    #[error("cannot unpack {actual} value(s) into {expected} target(s)")]
    Unpack { expected: usize, actual: usize },

    #[error("function `{0}` was not closure-converted")]
    UnconvertedClosure(String),

    #[error("maximum call depth of {0} exceeded")]
    RecursionLimit(usize),

    #[error("`{0}` outside a loop")]
    OutsideLoop(&'static str),

    #[error("{0} is not supported by the evaluator")]
    Unsupported(String),
}
