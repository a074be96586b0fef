//! Sainte-Laguë seat assignment with overhang detection and leveling seats.
//!
//! Contract:
//! - `remaining = total_seats - independent_seats` (saturating).
//! - Base run: highest-quotient allocation at `remaining`.
//! - Overhang (direct wins above the base entitlement) grows the house by
//!   the total overhang, once; the divisor run repeats at the grown size.
//! - Every normalized party then gets at least its direct-mandate floor; the
//!   floor may push the final sum above the grown house size.
//!
//! Determinism: the tie contract of the divisor core (table order) applies
//! to both runs.

use se_core::{DirectMandateTable, SeatAllocation, VoteTable};

use crate::divisor::allocate_highest_quotient;
use crate::overhang::{analyze, apply_direct_floor};
use crate::Apportionment;

/// Full outcome including base run, overhang report, and house size.
pub fn apportion_sainte_lague(
    votes: &VoteTable,
    total_seats: u32,
    direct: &DirectMandateTable,
    independent_seats: u32,
) -> Apportionment {
    let remaining = total_seats.saturating_sub(independent_seats);
    let table = votes.normalized();

    if table.is_empty() {
        return Apportionment::uncorrected(SeatAllocation::new(), remaining, Default::default());
    }

    let base = allocate_highest_quotient(remaining, &table);

    if direct.is_empty() {
        return Apportionment::uncorrected(base, remaining, Default::default());
    }

    let overhang = analyze(&table, &base, direct);
    if overhang.is_zero() {
        return Apportionment::uncorrected(base, remaining, overhang);
    }

    // One leveling pass: rerun at the grown house, then hold the floor.
    let grown = remaining.saturating_add(overhang.total);
    let adjusted = allocate_highest_quotient(grown, &table);
    let seats = apply_direct_floor(adjusted, direct);

    Apportionment {
        seats,
        base,
        house_size: grown,
        overhang,
        corrected: true,
    }
}

/// Seats-only entry point.
pub fn allocate_sainte_lague(
    votes: &VoteTable,
    total_seats: u32,
    direct: &DirectMandateTable,
    independent_seats: u32,
) -> SeatAllocation {
    apportion_sainte_lague(votes, total_seats, direct, independent_seats).seats
}
