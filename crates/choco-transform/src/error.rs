//! Errors raised by the lowering passes.

use choco_diagnostics::{Diagnostic, DiagnosticCode, Span};
use thiserror::Error;

/// Constructs closure conversion refuses to handle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Unsupported {
    #[error("closure `{name}` declared inside closure `{outer}`")]
    NestedClosure {
        name: String,
        outer: String,
        outer_span: Span,
    },
    #[error("lambda expression in `{function}`")]
    Lambda { function: String },
    #[error("assignment to `{name}`, which closure `{closure}` captures from its enclosing function")]
    CapturedWrite { name: String, closure: String },
    #[error("closure `{name}` declared inside method `{class}.{method}`")]
    ClosureInMethod {
        name: String,
        class: String,
        method: String,
    },
}

/// A fatal closure-conversion failure. The pass aborts on the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClosureError {
    #[error("unknown variable `{name}` in closure `{closure}`")]
    UnresolvedIdentifier {
        name: String,
        closure: String,
        span: Span,
    },

    #[error("not supported: {feature}")]
    Unsupported { feature: Unsupported, span: Span },

    #[error("internal error: {message}")]
    Internal { message: String, span: Span },
}

impl ClosureError {
    pub(crate) fn unsupported(feature: Unsupported, span: Span) -> Self {
        ClosureError::Unsupported { feature, span }
    }

    pub(crate) fn internal(message: impl Into<String>, span: Span) -> Self {
        ClosureError::Internal {
            message: message.into(),
            span,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            ClosureError::UnresolvedIdentifier { span, .. }
            | ClosureError::Unsupported { span, .. }
            | ClosureError::Internal { span, .. } => *span,
        }
    }

    pub fn code(&self) -> DiagnosticCode {
        match self {
            ClosureError::UnresolvedIdentifier { .. } => DiagnosticCode::UnresolvedIdentifier,
            ClosureError::Unsupported { feature, .. } => match feature {
                Unsupported::NestedClosure { .. } => DiagnosticCode::NestedClosure,
                Unsupported::Lambda { .. } => DiagnosticCode::LambdaExpression,
                Unsupported::CapturedWrite { .. } => DiagnosticCode::CapturedWrite,
                Unsupported::ClosureInMethod { .. } => DiagnosticCode::ClosureInMethod,
            },
            ClosureError::Internal { .. } => DiagnosticCode::InternalError,
        }
    }

    /// Render as a compiler diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let builder = Diagnostic::error(self.code(), self.to_string()).with_span(self.span());
        match self {
            ClosureError::UnresolvedIdentifier { name, .. } => builder.with_help(format!(
                "declare `{}` in the enclosing function or as a global variable",
                name
            )),
            ClosureError::Unsupported {
                feature: Unsupported::NestedClosure { outer, outer_span, .. },
                ..
            } => builder
                .with_label(*outer_span, format!("enclosing closure `{}` declared here", outer))
                .with_help("declare the function directly inside a top-level function"),
            ClosureError::Unsupported { .. } => builder,
            ClosureError::Internal { .. } => {
                builder.with_help("this is a compiler bug; please report it")
            }
        }
        .build()
    }
}

pub type Result<T> = std::result::Result<T, ClosureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = ClosureError::UnresolvedIdentifier {
            name: "zz".into(),
            closure: "adder".into(),
            span: Span::DUMMY,
        };
        assert_eq!(err.to_string(), "unknown variable `zz` in closure `adder`");
        assert_eq!(err.code().as_str(), "R001");

        let err = ClosureError::unsupported(
            Unsupported::NestedClosure {
                name: "g".into(),
                outer: "f".into(),
                outer_span: Span::DUMMY,
            },
            Span::DUMMY,
        );
        assert_eq!(err.to_string(), "not supported: closure `g` declared inside closure `f`");
        assert_eq!(err.code().as_str(), "U001");
    }

    #[test]
    fn test_diagnostic_notes() {
        let outer_span = Span::new(choco_diagnostics::FileId(0), 10, 20);
        let err = ClosureError::unsupported(
            Unsupported::NestedClosure {
                name: "g".into(),
                outer: "f".into(),
                outer_span,
            },
            Span::DUMMY,
        );
        let diag = err.to_diagnostic();
        assert!(diag.is_error());
        assert_eq!(diag.labels.len(), 1);
        assert_eq!(diag.labels[0].span, outer_span);
    }
}
