//! Highest-averages divisor core (odd divisors 1, 3, 5, …).
//!
//! Contract:
//! - Seed every party of the given table with 0 seats.
//! - Award `seats` sequentially by picking the max of w / (2*s + 1).
//! - Exact ties resolve to the earliest party in table order.
//! - A seat is awarded only while the best quotient is strictly positive;
//!   on a normalized table that guard is a formality, it stays explicit for
//!   direct callers.
//!
//! Determinism:
//! - Scans iterate in canonical table order; no RNG anywhere.
//! - No division in comparisons (cross-multiply; exact whenever weights are
//!   integer-valued, total order for fractional weights via `total_cmp`).

use core::cmp::Ordering;

use se_core::{PartyId, SeatAllocation, VoteTable};

/// Allocate `seats` over `votes` with odd divisors.
///
/// Notes:
/// - `seats == 0` returns the all-zero seeded map.
/// - An empty table returns an empty map.
pub fn allocate_highest_quotient(seats: u32, votes: &VoteTable) -> SeatAllocation {
    // Seed output with every party; zero-seat parties stay visible.
    let mut alloc: SeatAllocation = votes.parties().map(|p| (p.clone(), 0)).collect();
    if seats == 0 || votes.is_empty() {
        return alloc;
    }

    for _round in 0..seats {
        let mut best: Option<(&PartyId, f64, u32)> = None;
        for (party, weight) in votes.iter() {
            let w = weight.get();
            let s = alloc.get(party).copied().unwrap_or(0);
            match best {
                None => best = Some((party, w, s)),
                Some((_, b_w, b_s)) => {
                    if cmp_quotients(w, s, b_w, b_s) == Ordering::Greater {
                        best = Some((party, w, s));
                    }
                    // Equal keeps the current best: earlier table order wins.
                }
            }
        }

        match best {
            // Positive best quotient <=> positive weight (divisors are >= 1).
            Some((winner, w, _)) if w > 0.0 => {
                let winner = winner.clone();
                if let Some(s) = alloc.get_mut(&winner) {
                    *s = s.saturating_add(1);
                }
            }
            // All weights are zero: stop, never assign by tie-break alone.
            _ => break,
        }
    }

    alloc
}

/// Compare q_a = w_a / (2*s_a+1) vs q_b = w_b / (2*s_b+1) by cross-multiplying.
fn cmp_quotients(w_a: f64, s_a: u32, w_b: f64, s_b: u32) -> Ordering {
    let d_a = (2u64 * u64::from(s_a) + 1) as f64;
    let d_b = (2u64 * u64::from(s_b) + 1) as f64;
    (w_a * d_b).total_cmp(&(w_b * d_a))
}
