// crates/se_algo/src/lib.rs
#![forbid(unsafe_code)]

//! se_algo — Allocation layer: divisor and quota seat apportionment,
//! overhang correction, and district winners. Depends only on `se_core`.
//!
//! Everything here is pure and RNG-free; identical inputs produce identical
//! seats on every platform. Every tie resolves by canonical table order
//! (first-encountered party wins), never by lot and never by id ordering.

pub use se_core::{
    DirectMandateResult, DirectMandateTable, SeatAllocation, VoteTable,
};

// ----------------------------- File modules -----------------------------

pub mod district;
pub mod divisor;
pub mod overhang;
pub mod rock;
pub mod sainte_lague;

use crate::overhang::OverhangReport;

// ----------------------------- Outcome bundle ---------------------------

/// Result bundle for one apportionment run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Apportionment {
    /// Final seats per party (every normalized party, zero-seat parties included).
    pub seats: SeatAllocation,
    /// Proportional base before overhang correction and floors.
    pub base: SeatAllocation,
    /// List-seat house size the final distribution ran at.
    pub house_size: u32,
    /// Overhang found against the base run.
    pub overhang: OverhangReport,
    /// True when overhang grew the house.
    pub corrected: bool,
}

impl Apportionment {
    pub(crate) fn uncorrected(
        base: SeatAllocation,
        house_size: u32,
        overhang: OverhangReport,
    ) -> Self {
        Self {
            seats: base.clone(),
            base,
            house_size,
            overhang,
            corrected: false,
        }
    }
}

// Tight, explicit re-exports (avoid wildcard export drift).
pub use district::district_winners;
pub use divisor::allocate_highest_quotient;
pub use rock::{allocate_rock, apportion_rock};
pub use sainte_lague::{allocate_sainte_lague, apportion_sainte_lague};
