//! Lowering passes for Choco
//!
//! Passes run on the typed program tree between the type checker and the
//! code generator:
//! - Closure conversion (nested functions become classes)

pub mod capture;
pub mod closure;
pub mod config;
pub mod error;
pub mod free_vars;
pub mod rewrite;
pub mod synth;

// Re-export main transformation functions
pub use closure::{convert_closures, convert_closures_with, ClosureArtifacts, ClosureRun};
pub use config::ClosureConfig;
pub use error::{ClosureError, Unsupported};
