// se binary: load a tally file, apportion seats, emit one JSON report.
//
// Wires up exit codes, typed error mapping, CLI parsing, stderr logging, and
// the validate-only short-circuit. All math lives in se_pipeline/se_algo.

#![forbid(unsafe_code)]

mod args;

mod exitcodes {
    /// Exit codes shared with the test harness.
    pub const OK: i32 = 0;
    pub const VALIDATION: i32 = 2;
    pub const IO: i32 = 4;
    pub const ENGINE: i32 = 5;
}

use std::fmt;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use args::{parse_and_validate as parse_cli, Args};
use se_io::IoError;
use se_pipeline::{build_report, run_file, EngineMeta, PipelineError};

/// Central error type for CLI → exit-code mapping.
#[derive(Debug)]
enum MainError {
    /// Input cannot describe a run (bad JSON, bad tokens, bad counts).
    Validation(String),
    /// Filesystem trouble (missing input, unwritable output).
    Io(String),
    /// Internal failures (report serialization).
    Engine(String),
}

impl fmt::Display for MainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MainError::Validation(m) => write!(f, "validate: {m}"),
            MainError::Io(m) => write!(f, "io: {m}"),
            MainError::Engine(m) => write!(f, "engine: {m}"),
        }
    }
}

fn main() -> ExitCode {
    let args = match parse_cli() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("se: error: {e}");
            return ExitCode::from(exitcodes::VALIDATION as u8);
        }
    };

    init_logging(args.quiet);

    let outcome = if args.validate_only {
        validate_only(&args)
    } else {
        run_once(&args)
    };

    let rc = match outcome {
        Ok(()) => exitcodes::OK,
        Err(e) => {
            eprintln!("se: error: {e}");
            map_error(&e)
        }
    };

    ExitCode::from(rc as u8)
}

/// Logs go to stderr so stdout stays a clean report stream. `RUST_LOG` wins
/// over both defaults when set.
fn init_logging(quiet: bool) {
    let fallback = if quiet { "error" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Validate-only path: load + boundary checks, no apportionment, no report.
fn validate_only(args: &Args) -> Result<(), MainError> {
    se_io::loader::load_tally(&args.input, args.method)
        .map_err(PipelineError::from)
        .map_err(map_pipeline_err)?;
    if !args.quiet {
        eprintln!("validate-only: input OK");
    }
    Ok(())
}

/// Full run path: load → apportion → report to `--out` or stdout.
fn run_once(args: &Args) -> Result<(), MainError> {
    let engine = EngineMeta {
        name: env!("CARGO_BIN_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let (request, outcome) = run_file(&args.input, args.method).map_err(map_pipeline_err)?;
    let report = build_report(&request, &outcome, engine);

    match &args.out {
        Some(path) => {
            se_io::loader::write_json(path, &report, args.pretty).map_err(map_write_err)?;
            if !args.quiet {
                eprintln!("report written to {}", path.display());
            }
        }
        None => {
            let text = if args.pretty {
                serde_json::to_string_pretty(&report)
            } else {
                serde_json::to_string(&report)
            }
            .map_err(|e| MainError::Engine(format!("report to JSON: {e}")))?;
            println!("{text}");
        }
    }
    Ok(())
}

/// Map typed errors to the exit-code table.
fn map_error(e: &MainError) -> i32 {
    use exitcodes::*;
    match e {
        MainError::Validation(_) => VALIDATION,
        MainError::Io(_) => IO,
        MainError::Engine(_) => ENGINE,
    }
}

fn map_pipeline_err(e: PipelineError) -> MainError {
    match e {
        PipelineError::Io(m) => MainError::Io(m),
        PipelineError::Validate(m) => MainError::Validation(m),
    }
}

/// Errors out of `write_json`: filesystem trouble is I/O, a serialization
/// failure is internal.
fn map_write_err(e: IoError) -> MainError {
    let msg = e.to_string();
    match e {
        IoError::Write { .. } => MainError::Io(msg),
        _ => MainError::Engine(msg),
    }
}
