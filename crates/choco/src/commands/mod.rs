//! CLI command implementations

pub mod explain;
pub mod lower;
pub mod run;

use anyhow::{Context, Result};
use choco_ast::Program;
use choco_diagnostics::{
    DiagnosticEmitter, Diagnostics, JsonEmitter, SourceCache, TerminalEmitter,
};
use choco_transform::ClosureError;
use std::fs;
use std::path::Path;

use crate::OutputFormat;

/// Read a type-checked program tree from its JSON form.
pub(crate) fn read_program(path: &Path) -> Result<Program> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("{} is not a valid program tree", path.display()))
}

/// Render a failed lowering pass. `source`, when given, is the file the
/// tree's spans point into and enables source snippets.
pub(crate) fn report_failure(
    err: &ClosureError,
    source: Option<&Path>,
    format: OutputFormat,
    use_color: bool,
) -> Result<()> {
    let mut cache = SourceCache::new();
    if let Some(path) = source {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        cache.add_file(path, text);
    }

    let diagnostics = Diagnostics::from(err.to_diagnostic());
    match format {
        OutputFormat::Text => {
            let stderr = std::io::stderr();
            let mut emitter = TerminalEmitter::new(stderr.lock(), use_color);
            emitter.emit_all(&diagnostics, &cache)?;
            emitter.emit_summary(&diagnostics)?;
        }
        OutputFormat::Json => {
            let mut emitter = JsonEmitter::new(std::io::stdout().lock());
            emitter.emit_all(&diagnostics, &cache)?;
        }
    }
    Ok(())
}
