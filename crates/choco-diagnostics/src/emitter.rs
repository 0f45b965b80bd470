//! Diagnostic emitters for terminal and JSON output.

use crate::diagnostic::{Diagnostic, Diagnostics, Severity};
use crate::source_cache::SourceCache;
use std::io::Write;

/// Trait for emitting diagnostics in various formats.
pub trait DiagnosticEmitter {
    /// Emit a single diagnostic.
    fn emit(&mut self, diagnostic: &Diagnostic, cache: &SourceCache) -> std::io::Result<()>;

    /// Emit multiple diagnostics.
    fn emit_all(&mut self, diagnostics: &Diagnostics, cache: &SourceCache) -> std::io::Result<()> {
        for diag in diagnostics.iter() {
            self.emit(diag, cache)?;
        }
        Ok(())
    }

    /// Emit a summary line.
    fn emit_summary(&mut self, diagnostics: &Diagnostics) -> std::io::Result<()>;
}

/// Terminal output with optional ANSI colors and a source snippet.
pub struct TerminalEmitter<W: Write> {
    writer: W,
    colored: bool,
}

impl<W: Write> TerminalEmitter<W> {
    pub fn new(writer: W, colored: bool) -> Self {
        Self { writer, colored }
    }

    fn paint(&self, code: &'static str) -> &'static str {
        if self.colored {
            code
        } else {
            ""
        }
    }

    fn severity_color(&self, severity: Severity) -> &'static str {
        match severity {
            Severity::Error => self.paint("\x1b[31m"),
            Severity::Warning => self.paint("\x1b[33m"),
        }
    }
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic, cache: &SourceCache) -> std::io::Result<()> {
        let color = self.severity_color(diagnostic.severity);
        let reset = self.paint("\x1b[0m");
        let bold = self.paint("\x1b[1m");
        let cyan = self.paint("\x1b[36m");

        // error[R001]: message
        writeln!(
            self.writer,
            "{}{}{}[{}]{}: {}",
            bold,
            color,
            diagnostic.severity,
            diagnostic.code,
            reset,
            diagnostic.message
        )?;

        if let Some(loc) = cache.location(diagnostic.span) {
            writeln!(self.writer, "  {}-->{} {}", cyan, reset, loc)?;

            if let Some(file) = cache.get_file(diagnostic.span.file_id) {
                let (line_num, start_col) = file.line_column(diagnostic.span.start);
                if let Some(line_text) = file.line_text(line_num) {
                    let gutter = line_num.to_string();
                    let padding = " ".repeat(gutter.len());
                    let indent = " ".repeat((start_col - 1) as usize);
                    let room = line_text.len().saturating_sub((start_col - 1) as usize);
                    let carets = "^".repeat((diagnostic.span.len() as usize).min(room).max(1));

                    writeln!(self.writer, "{} {}|{}", padding, cyan, reset)?;
                    writeln!(self.writer, "{}{} |{} {}", cyan, gutter, reset, line_text)?;
                    writeln!(
                        self.writer,
                        "{} {}|{} {}{}{}{}",
                        padding, cyan, reset, indent, color, carets, reset
                    )?;
                }
            }
        }

        for label in &diagnostic.labels {
            match cache.location(label.span) {
                Some(loc) => writeln!(
                    self.writer,
                    "  {}note{}: {} ({})",
                    cyan, reset, label.message, loc
                )?,
                None => writeln!(self.writer, "  {}note{}: {}", cyan, reset, label.message)?,
            }
        }

        if let Some(help) = &diagnostic.help {
            writeln!(self.writer, "  {}= help:{} {}", cyan, reset, help)?;
        }

        writeln!(self.writer)?;
        Ok(())
    }

    fn emit_summary(&mut self, diagnostics: &Diagnostics) -> std::io::Result<()> {
        let errors = diagnostics.error_count();
        if errors == 0 {
            return Ok(());
        }
        let color = self.severity_color(Severity::Error);
        let reset = self.paint("\x1b[0m");
        writeln!(
            self.writer,
            "{}{} error{} emitted{}",
            color,
            errors,
            if errors == 1 { "" } else { "s" },
            reset
        )
    }
}

/// One JSON object per line, for tooling.
pub struct JsonEmitter<W: Write> {
    writer: W,
}

impl<W: Write> JsonEmitter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> DiagnosticEmitter for JsonEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic, cache: &SourceCache) -> std::io::Result<()> {
        let location = |span| {
            cache.location(span).map(|l| {
                serde_json::json!({
                    "file": l.file,
                    "line": l.line,
                    "column": l.column,
                })
            })
        };

        let json = serde_json::json!({
            "code": diagnostic.code.as_str(),
            "severity": diagnostic.severity.as_str(),
            "message": diagnostic.message,
            "location": location(diagnostic.span),
            "span": if diagnostic.span.is_dummy() {
                serde_json::Value::Null
            } else {
                serde_json::json!({
                    "start": diagnostic.span.start,
                    "end": diagnostic.span.end,
                })
            },
            "help": diagnostic.help,
            "notes": diagnostic.labels.iter().map(|l| serde_json::json!({
                "message": l.message,
                "location": location(l.span),
            })).collect::<Vec<_>>(),
        });

        serde_json::to_writer(&mut self.writer, &json)?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn emit_summary(&mut self, diagnostics: &Diagnostics) -> std::io::Result<()> {
        let summary = serde_json::json!({
            "type": "summary",
            "errors": diagnostics.error_count(),
            "warnings": diagnostics.warning_count(),
        });
        serde_json::to_writer(&mut self.writer, &summary)?;
        writeln!(self.writer)?;
        Ok(())
    }
}
