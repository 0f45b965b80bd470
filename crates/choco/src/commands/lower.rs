//! Lower command - closure conversion on a program tree

use anyhow::{Context, Result};
use choco_transform::ClosureRun;
use clap::Args;
use similar::{ChangeTag, TextDiff};
use std::fs;
use std::path::PathBuf;

use super::{read_program, report_failure};
use crate::config::ChocoConfig;
use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct LowerArgs {
    /// Type-checked program tree (JSON)
    pub input: PathBuf,

    /// Write the lowered tree to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also emit the synthesized class names and call arities
    #[arg(long)]
    pub artifacts: bool,

    /// Show a diff of the program before and after lowering
    #[arg(long)]
    pub diff: bool,

    /// Source file the tree's spans refer to, for diagnostic snippets
    #[arg(long)]
    pub source: Option<PathBuf>,
}

pub fn run(
    args: LowerArgs,
    config: &ChocoConfig,
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
) -> Result<()> {
    let mut program = read_program(&args.input)?;
    let before = args.diff.then(|| program.to_string());

    let mut run = ClosureRun::new();
    if let Err(err) = run.convert(&mut program, &config.closures) {
        report_failure(&err, args.source.as_deref(), format, use_color)?;
        std::process::exit(1);
    }
    let artifacts = run.artifacts();
    log::info!(
        "{}: converted {} closure(s)",
        args.input.display(),
        artifacts.class_names.len()
    );

    let json = if args.artifacts {
        serde_json::to_string_pretty(&serde_json::json!({
            "program": program,
            "artifacts": artifacts,
        }))?
    } else {
        serde_json::to_string_pretty(&program)?
    };

    match &args.output {
        Some(path) => {
            fs::write(path, format!("{}\n", json))
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        None => println!("{}", json),
    }

    if let Some(before) = before {
        print_diff(&before, &program.to_string(), use_color);
    }

    if let (Some(path), OutputFormat::Text, false) = (&args.output, format, quiet) {
        let summary = format!(
            "{} closure(s) converted, written to {}",
            artifacts.class_names.len(),
            path.display()
        );
        if use_color {
            println!("{}", console::style(summary).green().bold());
        } else {
            println!("{}", summary);
        }
    }

    Ok(())
}

/// Line diff of the rendered program, on stderr so stdout stays JSON.
fn print_diff(before: &str, after: &str, use_color: bool) {
    let diff = TextDiff::from_lines(before, after);
    for change in diff.iter_all_changes() {
        let line = match change.tag() {
            ChangeTag::Delete => format!("-{}", change),
            ChangeTag::Insert => format!("+{}", change),
            ChangeTag::Equal => format!(" {}", change),
        };
        let line = line.trim_end_matches('\n');
        match (use_color, change.tag()) {
            (true, ChangeTag::Delete) => eprintln!("{}", console::style(line).red()),
            (true, ChangeTag::Insert) => eprintln!("{}", console::style(line).green()),
            _ => eprintln!("{}", line),
        }
    }
}
