//! se_io — JSON boundary for the seat engine: tally files in, reports out.
//!
//! - Wire types and their validation live in [`model`]; path handling in
//!   [`loader`].
//! - Shared error type (`IoError`) with `From` conversions used across modules.
//! - Boundary failures are reported, never coerced: a malformed weight is an
//!   error, not a zero.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Unified error for se_io (used by model/loader).
#[derive(Debug, Error)]
pub enum IoError {
    /// Filesystem errors while reading an input file.
    #[error("read {path}: {msg}")]
    Read { path: String, msg: String },

    /// Filesystem errors while writing a report.
    #[error("write {path}: {msg}")]
    Write { path: String, msg: String },

    /// JSON (de)serialization errors with a JSON-Pointer-ish location.
    #[error("json error at {pointer}: {msg}")]
    Json { pointer: String, msg: String },

    /// Party or district identifier rejected by `se_core`.
    #[error("invalid token {0:?}")]
    Token(String),

    /// Weight rejected by `se_core` (NaN, infinite, negative, unparseable).
    #[error("invalid weight {raw:?} for party {party:?}")]
    Weight { party: String, raw: String },

    /// The same party named twice in one table.
    #[error("duplicate party {0:?}")]
    DuplicateParty(String),

    /// The same district named twice.
    #[error("duplicate district {0:?}")]
    DuplicateDistrict(String),

    /// Seat counts that cannot describe a house.
    #[error("independent seats ({independent}) exceed total seats ({total})")]
    Seats { total: u32, independent: u32 },

    /// Unrecognized allocation-method token.
    #[error("unknown method {0:?}")]
    Method(String),
}

pub type IoResult<T> = Result<T, IoError>;

/* ---------------- From conversions (used by file modules) ---------------- */

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        // serde_json doesn't keep a pointer; callers enrich this when they can.
        IoError::Json {
            pointer: "/".to_string(),
            msg: e.to_string(),
        }
    }
}

pub mod loader;
pub mod model;

/* ---------------- Public prelude ----------------
   Lightweight re-exports so downstream crates can do:
     use se_io::prelude::*;
------------------------------------------------- */

pub mod prelude {
    pub use crate::loader::{load_tally, load_tally_str, write_json};
    pub use crate::model::{ComputationRequest, TallyFile};
    pub use crate::{IoError, IoResult};
}
