//! `yacis`: the command-line driver (§6.2), wiring parse → check → lower →
//! evaluate → emit and reporting the compiler's one fatal diagnostic, if
//! any, to stderr.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

/// Compiles a Yac source file to MIPS assembly.
#[derive(Parser, Debug)]
#[command(name = "yacis")]
struct Args {
    /// Path to the Yac source file.
    src: PathBuf,
    /// Path to write the generated assembly to. Prints to stdout if omitted.
    out: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let source = match fs::read_to_string(&args.src) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: could not read {}: {err}", args.src.display());
            return ExitCode::FAILURE;
        }
    };

    let asm = match compile(&source) {
        Ok(asm) => asm,
        Err(diagnostic) => {
            eprintln!("{diagnostic}");
            return ExitCode::FAILURE;
        }
    };

    match args.out {
        Some(out) => {
            if let Err(err) = fs::write(&out, asm) {
                eprintln!("error: could not write {}: {err}", out.display());
                return ExitCode::FAILURE;
            }
        }
        None => print!("{asm}"),
    }

    ExitCode::SUCCESS
}

/// The whole pipeline for a single source file: parse → check → lower →
/// evaluate → emit. Halts at the first diagnostic, per the language's
/// fatal-at-first-detection failure model (§4.7).
fn compile(source: &str) -> yac_core::Result<String> {
    let mut program = yac_syntax::parse(source)?;
    yac_compiler::check(&mut program)?;
    yac_compiler::lower(&mut program);
    let outputs = yac_vm::evaluate(&program);
    Ok(yac_emit::emit(&outputs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_a_simple_program_to_assembly() {
        let asm = compile("add 2 (mul 3 4)\n").unwrap();
        assert!(asm.starts_with("main:"));
        assert!(asm.contains("addiu $a0, $zero, 14"));
    }

    #[test]
    fn reports_the_exact_diagnostic_wire_format() {
        let err = compile("y\n").unwrap_err();
        assert_eq!(format!("{err}"), "1:1 - DefineError: Variable hasn't been defined.");
    }

    #[test]
    fn parse_errors_feed_the_same_diagnostic_taxonomy() {
        let err = compile("x = \n").unwrap_err();
        assert!(format!("{err}").contains("ParseError"));
    }
}
