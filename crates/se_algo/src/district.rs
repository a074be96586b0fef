//! District winner aggregation (first past the post per district).
//!
//! Contract:
//! - Winner = strictly greatest weight in the district table; exact ties go
//!   to the earlier party in table order.
//! - Districts without a positive weight are skipped: no winner, no count.
//! - Districts iterate in document order; counts land in a per-party map.

use se_core::{DirectMandateResult, DistrictVotes, PartyId, VoteTable};

/// Winner per district plus summed win counts per party.
pub fn district_winners(district_votes: &DistrictVotes) -> DirectMandateResult {
    let mut result = DirectMandateResult::default();
    for (district, votes) in district_votes.iter() {
        if let Some(winner) = plurality_winner(votes) {
            let count = result.counts.entry(winner.clone()).or_insert(0);
            *count = count.saturating_add(1);
            result.districts.insert(district.clone(), winner);
        }
    }
    result
}

/// Scan in table order, keeping the first maximum. Zero weights never win.
fn plurality_winner(votes: &VoteTable) -> Option<PartyId> {
    let mut best: Option<(&PartyId, f64)> = None;
    for (party, weight) in votes.iter() {
        let w = weight.get();
        if w <= 0.0 {
            continue;
        }
        match best {
            None => best = Some((party, w)),
            Some((_, b_w)) if w > b_w => best = Some((party, w)),
            _ => {} // ties keep the earlier party
        }
    }
    best.map(|(p, _)| p.clone())
}
