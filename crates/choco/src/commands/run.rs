//! Run command - lower a program, then evaluate it

use anyhow::{Context, Result};
use choco_eval::{Interpreter, DEFAULT_MAX_DEPTH};
use choco_transform::convert_closures_with;
use clap::Args;
use std::path::PathBuf;

use super::{read_program, report_failure};
use crate::config::ChocoConfig;
use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Type-checked program tree (JSON)
    pub input: PathBuf,

    /// Evaluate the tree as given, without closure conversion
    #[arg(long)]
    pub no_lower: bool,

    /// Maximum call depth
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Source file the tree's spans refer to, for diagnostic snippets
    #[arg(long)]
    pub source: Option<PathBuf>,
}

pub fn run(args: RunArgs, config: &ChocoConfig, format: OutputFormat, use_color: bool) -> Result<()> {
    let mut program = read_program(&args.input)?;

    if !args.no_lower {
        if let Err(err) = convert_closures_with(&mut program, &config.closures) {
            report_failure(&err, args.source.as_deref(), format, use_color)?;
            std::process::exit(1);
        }
    }

    let closures = &config.closures;
    let output = Interpreter::new(&program)
        .with_max_depth(args.max_depth)
        .with_conventions(&closures.call_method, &closures.constructor)
        .run()
        .with_context(|| format!("Evaluation of {} failed", args.input.display()))?;

    match format {
        OutputFormat::Text => print!("{}", output),
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "output": output }));
        }
    }
    Ok(())
}
