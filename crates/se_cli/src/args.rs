// Deterministic, offline CLI argument parsing surface (types + checks).
//
// Rules:
// - No networked paths (reject any scheme:// like http/https/file)
// - --method overrides the tally file's own token
// - --validate-only loads and validates without apportioning

use clap::Parser;
use std::path::{Path, PathBuf};

use se_core::AllocationMethod;

/// Parsed CLI arguments (raw).
#[derive(Debug, Parser, Clone)]
#[command(
    name = "se",
    disable_help_subcommand = true,
    about = "Offline, deterministic seat apportionment for party tallies"
)]
pub struct Args {
    /// Tally JSON path.
    #[arg(long)]
    pub input: PathBuf,

    /// Allocation method override (sainte_lague | rock); wins over the file's token.
    #[arg(long, value_parser = parse_method)]
    pub method: Option<AllocationMethod>,

    /// Report path; omit to print the report to stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Pretty-print the report JSON.
    #[arg(long)]
    pub pretty: bool,

    /// Load and validate the tally, then stop before apportioning.
    #[arg(long)]
    pub validate_only: bool,

    /// Only log errors.
    #[arg(long)]
    pub quiet: bool,
}

/// Errors surfaced by argument validation.
/// Keep messages short/stable (handy for scripts/tests).
#[derive(Debug)]
pub enum CliError {
    NonLocalPath(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::NonLocalPath(p) => write!(f, "path must be a local file (no scheme): {p}"),
        }
    }
}
impl std::error::Error for CliError {}

/// Entry point used by main.rs. Existence of `--input` is not checked here;
/// the loader reports missing files as read errors.
pub fn parse_and_validate() -> Result<Args, CliError> {
    let args = Args::parse();

    ensure_local_path(&args.input)?;
    if let Some(out) = &args.out {
        ensure_local_path(out)?;
    }

    Ok(args)
}

/// Method token parser for `--method`; accepts the same spellings as tally files.
pub fn parse_method(s: &str) -> Result<AllocationMethod, String> {
    s.parse::<AllocationMethod>()
        .map_err(|_| format!("unknown method {s:?} (expected: sainte_lague | rock)"))
}

/// Reject any explicit URI scheme (e.g., http://, https://, file://).
#[inline]
fn has_scheme(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    lower.contains("://")
        || lower.starts_with("http:")
        || lower.starts_with("https:")
        || lower.starts_with("file:")
}

/// Ensure a provided path string is local (no scheme).
#[inline]
fn ensure_local_path(p: &Path) -> Result<(), CliError> {
    if let Some(s) = p.to_str() {
        if has_scheme(s) {
            return Err(CliError::NonLocalPath(s.to_string()));
        }
    }
    Ok(())
}
