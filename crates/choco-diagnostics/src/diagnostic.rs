//! Diagnostic types for compiler errors and warnings.

use crate::span::{Label, Span};
use serde::{Deserialize, Serialize};

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Diagnostic codes, grouped by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    // Resolution errors (R001-R099)
    /// A name read inside a closure is bound nowhere
    UnresolvedIdentifier,

    // Unsupported features (U001-U099)
    /// Closure declared inside another closure
    NestedClosure,
    /// Lambda expression
    LambdaExpression,
    /// Assignment to a variable captured from the enclosing function
    CapturedWrite,
    /// Closure declared inside a class method
    ClosureInMethod,

    // Internal errors (I001-I099)
    /// Pass-ordering bug or violated tree invariant
    InternalError,
}

impl DiagnosticCode {
    pub const ALL: &'static [DiagnosticCode] = &[
        Self::UnresolvedIdentifier,
        Self::NestedClosure,
        Self::LambdaExpression,
        Self::CapturedWrite,
        Self::ClosureInMethod,
        Self::InternalError,
    ];

    /// Get the code string (e.g., "U001").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnresolvedIdentifier => "R001",
            Self::NestedClosure => "U001",
            Self::LambdaExpression => "U002",
            Self::CapturedWrite => "U003",
            Self::ClosureInMethod => "U004",
            Self::InternalError => "I001",
        }
    }

    /// Look a code up by its string form, case-insensitively.
    pub fn parse(code: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(code))
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::UnresolvedIdentifier => "Unresolved Identifier",
            Self::NestedClosure => "Nested Closure",
            Self::LambdaExpression => "Lambda Expression",
            Self::CapturedWrite => "Write to Captured Variable",
            Self::ClosureInMethod => "Closure in Method",
            Self::InternalError => "Internal Compiler Error",
        }
    }

    pub fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Long-form explanation shown by `choco explain`.
    pub fn explanation(&self) -> &'static str {
        match self {
            Self::UnresolvedIdentifier => {
                "A closure reads a name that is not one of its own parameters or locals, \
                 not a parameter or local of the function that declares it, and not a \
                 global variable, function or class. Declare the variable in the \
                 enclosing function or at the top level."
            }
            Self::NestedClosure => {
                "Closures may only be declared directly inside a top-level function. \
                 A function declared inside a closure cannot be converted; move it to \
                 the enclosing function and pass what it needs explicitly."
            }
            Self::LambdaExpression => {
                "Lambda expressions are not supported. They are rejected in every \
                 top-level function, including functions that declare no closure, and \
                 in every closure body. Use a nested `def` instead."
            }
            Self::CapturedWrite => {
                "Closures capture variables by value when they are created, so a \
                 closure cannot assign to a variable of its enclosing function. Keep \
                 the state in an object and mutate one of its fields instead."
            }
            Self::ClosureInMethod => {
                "Functions declared inside class methods are not supported. Declare the \
                 helper as a top-level function or as another method."
            }
            Self::InternalError => {
                "The compiler reached a state that an earlier stage should have ruled \
                 out. This is a bug in the compiler, not in the program."
            }
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A compiler diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    /// Short message (single line)
    pub message: String,
    /// Help text
    pub help: Option<String>,
    /// Primary span (where the error is)
    pub span: Span,
    /// Related locations
    pub labels: Vec<Label>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::new(code, Severity::Error, message)
    }

    /// Create a new warning diagnostic.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> DiagnosticBuilder {
        DiagnosticBuilder::new(code, Severity::Warning, message)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

/// Builder for constructing diagnostics fluently.
pub struct DiagnosticBuilder {
    inner: Diagnostic,
}

impl DiagnosticBuilder {
    pub fn new(code: DiagnosticCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            inner: Diagnostic {
                code,
                severity,
                message: message.into(),
                help: None,
                span: Span::DUMMY,
                labels: Vec::new(),
            },
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.inner.span = span;
        self
    }

    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.inner.labels.push(Label::new(span, message));
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.inner.help = Some(help.into());
        self
    }

    pub fn build(self) -> Diagnostic {
        self.inner
    }
}

/// Collection of diagnostics with summary counts.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    pub items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(|d| d.is_error())
    }

    pub fn error_count(&self) -> usize {
        self.items.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.items.iter().filter(|d| d.is_warning()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }
}

impl From<Diagnostic> for Diagnostics {
    fn from(diagnostic: Diagnostic) -> Self {
        Self {
            items: vec![diagnostic],
        }
    }
}
