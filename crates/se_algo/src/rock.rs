//! "Rock" quota allocation: ideal claims with floors, ranking-key residual
//! distribution, overhang correction by house inflation, and the majority
//! clause.
//!
//! Contract:
//! - Ideal claim per party: w * seats / total(w) (multiply before dividing;
//!   integer-weight cases stay exact).
//! - Base seats are the floored claims; the residual goes to parties ranked
//!   by claim / ceil(claim), integer claims last (key -1). Equal keys rank
//!   by table order; the walk cycles if seats outlast candidates.
//! - Overhang counts only among parties holding at least one base seat. It
//!   inflates the house to max(floor(max_ratio * remaining), remaining +
//!   total_overhang) rounded up to even, where ratio_p = direct_p / claim_p
//!   over the overhung parties. The recompute runs over the seat holders
//!   only, with plain largest-fractional-part residuals.
//! - The direct-mandate floor then applies to every normalized party, also
//!   to parties the recompute excluded.
//! - Majority clause: a party with more than half of the weight must hold
//!   more than half of `remaining`; one seat moves over from the
//!   weakest-keyed seat holder that sits above its own floor.
//!
//! Determinism:
//! - The tool this replaces drew lots between equal ranking keys; here every
//!   tie resolves by canonical table order instead, and residual ranking
//!   uses a stable sort so equal keys keep that order.

use se_core::{DirectMandateTable, PartyId, SeatAllocation, VoteTable};

use crate::overhang::{analyze, apply_direct_floor};
use crate::Apportionment;

/// Residual ranking key for the quota run.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ResidualRanking {
    /// claim / ceil(claim); integer claims sink to -1.
    RatioKey,
    /// Plain fractional part (used by the overhang recompute).
    FractionalPart,
}

/// Full outcome including base run, overhang report, and house size.
pub fn apportion_rock(
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

    let base = quota_run(&table, remaining, ResidualRanking::RatioKey);

    // Overhang is judged among seat holders only; a party without a base
    // seat cannot stretch the house (its mandates survive via the floor).
    let holders = table.filtered(|p, _| base.get(p).copied().unwrap_or(0) > 0);
    let overhang = analyze(&holders, &base, direct);

    let (seats, house_size, corrected) = if overhang.is_zero() {
        (base.clone(), remaining, false)
    } else {
        let claims = ideal_claims(&table, remaining);
        let grown = inflated_house(&claims, remaining, direct, &overhang);
        let recomputed = quota_run(&holders, grown, ResidualRanking::FractionalPart);
        // Parties outside the holder universe keep their base seats (zero).
        let merged: SeatAllocation = table
            .parties()
            .map(|p| (p.clone(), recomputed.get(p).copied().unwrap_or(0)))
            .collect();
        (merged, grown, true)
    };

    let mut seats = apply_direct_floor(seats, direct);
    apply_majority_clause(&table, remaining, direct, &mut seats);

    Apportionment {
        seats,
        base,
        house_size,
        overhang,
        corrected,
    }
}

/// Seats-only entry point.
pub fn allocate_rock(
    votes: &VoteTable,
    total_seats: u32,
    direct: &DirectMandateTable,
    independent_seats: u32,
) -> SeatAllocation {
    apportion_rock(votes, total_seats, direct, independent_seats).seats
}

// ----------------------------- Quota core -----------------------------

/// Ideal claims in table order: w * seats / total.
fn ideal_claims(table: &VoteTable, seats: u32) -> Vec<(PartyId, f64)> {
    let total = table.total();
    table
        .iter()
        .map(|(p, w)| {
            let claim = if total > 0.0 {
                w.get() * f64::from(seats) / total
            } else {
                0.0
            };
            (p.clone(), claim)
        })
        .collect()
}

/// Floors plus residual distribution over the ranking.
fn quota_run(table: &VoteTable, seats: u32, ranking: ResidualRanking) -> SeatAllocation {
    let mut alloc: SeatAllocation = table.parties().map(|p| (p.clone(), 0)).collect();
    if seats == 0 || table.is_empty() || table.total() <= 0.0 {
        return alloc;
    }

    let claims = ideal_claims(table, seats);

    let mut assigned: u64 = 0;
    for (party, claim) in &claims {
        let f = floor_u32(*claim);
        assigned = assigned.saturating_add(u64::from(f));
        if let Some(s) = alloc.get_mut(party) {
            *s = f;
        }
    }

    // Hare floors never exceed the house; the residual is what is left.
    let residual = u64::from(seats).saturating_sub(assigned) as u32;
    if residual == 0 {
        return alloc;
    }

    let ranked = ranked_parties(&claims, ranking);
    let n = ranked.len();
    let mut given = 0u32;
    let mut idx = 0usize;
    while given < residual {
        let (ref party, _) = ranked[idx];
        if let Some(s) = alloc.get_mut(party) {
            *s = s.saturating_add(1);
        }
        given += 1;
        idx += 1;
        if idx == n {
            idx = 0; // cycle if seats outlast candidates (degenerate claims)
        }
    }

    alloc
}

/// Ranking for residual seats, strongest key first. The sort is stable, so
/// equal keys keep table order.
fn ranked_parties(claims: &[(PartyId, f64)], ranking: ResidualRanking) -> Vec<(PartyId, f64)> {
    let mut ranked: Vec<(PartyId, f64)> = claims
        .iter()
        .map(|(p, claim)| {
            let key = match ranking {
                ResidualRanking::RatioKey => ratio_key(*claim),
                ResidualRanking::FractionalPart => claim.fract(),
            };
            (p.clone(), key)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}

/// Integer claims are already fully served and sink below every fraction.
fn ratio_key(claim: f64) -> f64 {
    if claim.fract() == 0.0 {
        -1.0
    } else {
        claim / claim.ceil()
    }
}

fn floor_u32(claim: f64) -> u32 {
    let f = claim.floor();
    if f >= f64::from(u32::MAX) {
        u32::MAX
    } else if f > 0.0 {
        f as u32
    } else {
        0
    }
}

// ----------------------------- Overhang correction -----------------------------

/// New house size under overhang: the strongest direct/claim ratio scales
/// the house, floored, but never below remaining + total overhang; odd
/// results round up to the next even number.
fn inflated_house(
    claims: &[(PartyId, f64)],
    remaining: u32,
    direct: &DirectMandateTable,
    overhang: &crate::overhang::OverhangReport,
) -> u32 {
    let mut max_ratio: f64 = 0.0;
    for (party, claim) in claims {
        let oh = overhang.by_party.get(party).copied().unwrap_or(0);
        if oh == 0 || *claim <= 0.0 {
            continue;
        }
        let d = direct.get(party).copied().unwrap_or(0);
        let ratio = f64::from(d) / *claim;
        if ratio > max_ratio {
            max_ratio = ratio;
        }
    }

    let by_ratio = floor_u32(max_ratio * f64::from(remaining));
    let by_growth = remaining.saturating_add(overhang.total);
    round_up_to_even(by_ratio.max(by_growth))
}

fn round_up_to_even(n: u32) -> u32 {
    if n % 2 == 0 {
        n
    } else {
        n.saturating_add(1)
    }
}

// ----------------------------- Majority clause -----------------------------

/// A party holding more than half of the weight must hold more than half of
/// the original house. One seat moves from the weakest-ranked seat holder;
/// donors keep their own direct-mandate floor, and with no eligible donor
/// the allocation stands.
fn apply_majority_clause(
    table: &VoteTable,
    remaining: u32,
    direct: &DirectMandateTable,
    seats: &mut SeatAllocation,
) {
    if remaining == 0 {
        return;
    }
    let total = table.total();
    let majority = table
        .iter()
        .find(|(_, w)| w.get() * 2.0 > total)
        .map(|(p, _)| p.clone());
    let recipient = match majority {
        Some(p) => p,
        None => return,
    };

    let held = seats.get(&recipient).copied().unwrap_or(0);
    if 2 * u64::from(held) > u64::from(remaining) {
        return; // already above half
    }

    // Weakest key last: walk the base ranking from the back. A donor must
    // hold a seat above its own floor so the transfer cannot undo it.
    let ranked = ranked_parties(&ideal_claims(table, remaining), ResidualRanking::RatioKey);
    let donor = ranked.iter().rev().map(|(p, _)| p).find(|p| {
        let held = seats.get(*p).copied().unwrap_or(0);
        let floor = direct.get(*p).copied().unwrap_or(0);
        **p != recipient && held >= 1 && held > floor
    });

    if let Some(donor) = donor {
        let donor = donor.clone();
        if let Some(s) = seats.get_mut(&donor) {
            *s -= 1;
        }
        if let Some(s) = seats.get_mut(&recipient) {
            *s = s.saturating_add(1);
        }
    }
}
