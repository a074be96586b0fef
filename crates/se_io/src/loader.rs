//! File loading: path → [`TallyFile`] → validated [`ComputationRequest`].
//!
//! Reads are capped. A tally file is a small document; anything past the cap
//! is treated as not-a-tally-file instead of being read to exhaustion.

use std::fs;
use std::io::Read as _;
use std::path::Path;

use serde::Serialize;

use se_core::AllocationMethod;

use crate::model::{ComputationRequest, TallyFile};
use crate::{IoError, IoResult};

const MAX_TALLY_BYTES: usize = 16 * 1024 * 1024; // 16 MiB

/// Read and parse `path`, then validate into a request. The optional method
/// override (the CLI flag) wins over the file's own token.
pub fn load_tally(
    path: &Path,
    method_override: Option<AllocationMethod>,
) -> IoResult<ComputationRequest> {
    let mut f = fs::File::open(path).map_err(|e| read_err(path, &e))?;
    let mut buf = Vec::new();
    f.by_ref()
        .take(MAX_TALLY_BYTES as u64)
        .read_to_end(&mut buf)
        .map_err(|e| read_err(path, &e))?;
    let file: TallyFile = serde_json::from_slice(&buf)?;
    file.into_request(method_override)
}

/// Same as [`load_tally`] but from an in-memory document.
pub fn load_tally_str(
    text: &str,
    method_override: Option<AllocationMethod>,
) -> IoResult<ComputationRequest> {
    let file: TallyFile = serde_json::from_str(text)?;
    file.into_request(method_override)
}

/// Serialize `doc` as a single JSON document (with trailing newline) to `path`.
pub fn write_json<T: Serialize>(path: &Path, doc: &T, pretty: bool) -> IoResult<()> {
    let mut bytes = if pretty {
        serde_json::to_vec_pretty(doc)?
    } else {
        serde_json::to_vec(doc)?
    };
    bytes.push(b'\n');
    fs::write(path, bytes).map_err(|e| IoError::Write {
        path: path.display().to_string(),
        msg: e.to_string(),
    })
}

fn read_err(path: &Path, e: &std::io::Error) -> IoError {
    IoError::Read {
        path: path.display().to_string(),
        msg: e.to_string(),
    }
}

// ----------------------------- tests -----------------------------
