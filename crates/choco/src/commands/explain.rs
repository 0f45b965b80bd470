//! Explain command - explain diagnostic codes

use anyhow::{anyhow, Result};
use choco_diagnostics::DiagnosticCode;
use clap::Args;

use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct ExplainArgs {
    /// Diagnostic code to explain (e.g., U001, R001)
    pub code: String,
}

struct Extra {
    code: DiagnosticCode,
    example: Option<&'static str>,
    related: &'static [&'static str],
}

const EXTRAS: &[Extra] = &[
    Extra {
        code: DiagnosticCode::UnresolvedIdentifier,
        example: Some("def f() -> int:\n    def g() -> int:\n        return missing\n    return g()"),
        related: &[],
    },
    Extra {
        code: DiagnosticCode::NestedClosure,
        example: Some("def f() -> int:\n    def g() -> int:\n        def h() -> int:\n            return 1\n        return h()\n    return g()"),
        related: &["U004"],
    },
    Extra {
        code: DiagnosticCode::LambdaExpression,
        example: Some("f = lambda x: x + 1"),
        related: &[],
    },
    Extra {
        code: DiagnosticCode::CapturedWrite,
        example: Some("def counter() -> int:\n    n: int = 0\n    def bump() -> int:\n        n = n + 1\n        return n\n    return bump()"),
        related: &[],
    },
    Extra {
        code: DiagnosticCode::ClosureInMethod,
        example: Some("class A(object):\n    def m(self: A) -> int:\n        def helper() -> int:\n            return 1\n        return helper()"),
        related: &["U001"],
    },
    Extra {
        code: DiagnosticCode::InternalError,
        example: None,
        related: &[],
    },
];

pub fn run(args: ExplainArgs, format: OutputFormat, use_color: bool) -> Result<()> {
    let code = DiagnosticCode::parse(&args.code)
        .ok_or_else(|| anyhow!("Unknown diagnostic code: {}", args.code.to_uppercase()))?;
    let extra = EXTRAS.iter().find(|e| e.code == code);
    let example = extra.and_then(|e| e.example);
    let related = extra.map(|e| e.related).unwrap_or(&[]);
    let title = code.title();

    match format {
        OutputFormat::Text => {
            let rule = "=".repeat(code.as_str().len() + title.len() + 2);
            if use_color {
                println!(
                    "\n{}: {}\n{}",
                    console::style(code.as_str()).bold().cyan(),
                    console::style(title).bold(),
                    rule
                );
            } else {
                println!("\n{}: {}\n{}", code, title, rule);
            }

            println!("\n{}\n", code.explanation());

            if let Some(example) = example {
                if use_color {
                    println!("{}:", console::style("Example").bold());
                } else {
                    println!("Example:");
                }
                for line in example.lines() {
                    println!("  {}", line);
                }
                println!();
            }

            if !related.is_empty() {
                if use_color {
                    println!("{}: {}", console::style("Related").dim(), related.join(", "));
                } else {
                    println!("Related: {}", related.join(", "));
                }
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "code": code.as_str(),
                "title": title,
                "description": code.explanation(),
                "example": example,
                "related": related,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_code_has_extras() {
        for code in DiagnosticCode::ALL {
            assert!(EXTRAS.iter().any(|e| e.code == *code), "{} missing", code);
        }
    }

    #[test]
    fn test_unknown_code() {
        let args = ExplainArgs { code: "z999".into() };
        let err = run(args, OutputFormat::Json, false).unwrap_err();
        assert_eq!(err.to_string(), "Unknown diagnostic code: Z999");
    }
}
