//! Diagnostic infrastructure for the Choco compiler.
//!
//! Compiler stages report failures as [`Diagnostic`]s carrying an error
//! code, a primary [`Span`] and optional notes; the driver renders them
//! against a [`SourceCache`] with one of the emitters.
//!
//! # Example
//!
//! ```
//! use choco_diagnostics::{
//!     Diagnostic, DiagnosticCode, DiagnosticEmitter, SourceCache, Span, TerminalEmitter,
//! };
//!
//! let mut cache = SourceCache::new();
//! let file_id = cache.add_file("adder.py", "def f():\n    return zz\n".to_string());
//!
//! let diag = Diagnostic::error(DiagnosticCode::UnresolvedIdentifier, "unknown variable `zz`")
//!     .with_span(Span::new(file_id, 20, 22))
//!     .with_help("declare `zz` in the enclosing function")
//!     .build();
//!
//! let mut out = Vec::new();
//! TerminalEmitter::new(&mut out, false).emit(&diag, &cache).unwrap();
//! assert!(String::from_utf8(out).unwrap().contains("adder.py:2:12"));
//! ```

pub mod diagnostic;
pub mod emitter;
pub mod source_cache;
pub mod span;

pub use diagnostic::{Diagnostic, DiagnosticBuilder, DiagnosticCode, Diagnostics, Severity};
pub use emitter::{DiagnosticEmitter, JsonEmitter, TerminalEmitter};
pub use source_cache::{SourceCache, SourceFile};
pub use span::{FileId, Label, Location, Span};
