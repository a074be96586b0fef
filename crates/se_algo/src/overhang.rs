//! Overhang analysis: direct district wins in excess of a party's
//! proportional entitlement, plus the direct-mandate floor.

use std::collections::BTreeMap;

use se_core::{DirectMandateTable, PartyId, SeatAllocation, VoteTable};

/// Per-party overhang against a base allocation.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct OverhangReport {
    pub by_party: BTreeMap<PartyId, u32>,
    pub total: u32,
}

impl OverhangReport {
    pub fn is_zero(&self) -> bool {
        self.total == 0
    }
}

/// Compare a base allocation with direct wins, party by party.
///
/// Only parties of the given table count: direct wins of parties outside it
/// (zero-vote parties, unknown ids) never create overhang.
pub fn analyze(
    votes: &VoteTable,
    base: &SeatAllocation,
    direct: &DirectMandateTable,
) -> OverhangReport {
    let mut by_party = BTreeMap::new();
    let mut total = 0u32;
    for party in votes.parties() {
        let b = base.get(party).copied().unwrap_or(0);
        let d = direct.get(party).copied().unwrap_or(0);
        let oh = d.saturating_sub(b);
        total = total.saturating_add(oh);
        by_party.insert(party.clone(), oh);
    }
    OverhangReport { by_party, total }
}

/// Raise every party already in `alloc` to its direct-mandate floor.
///
/// Parties absent from `alloc` (filtered out by normalization) are never
/// added: a party without votes keeps zero seats no matter its wins.
pub fn apply_direct_floor(
    mut alloc: SeatAllocation,
    direct: &DirectMandateTable,
) -> SeatAllocation {
    for (party, seats) in alloc.iter_mut() {
        if let Some(&d) = direct.get(party) {
            if d > *seats {
                *seats = d;
            }
        }
    }
    alloc
}

#[cfg(test)]
mod tests {
    use super::*;
    use se_core::{PartyId, Weight};

    fn p(s: &str) -> PartyId {
        PartyId::new(s).unwrap()
    }

    fn table(pairs: &[(&str, f64)]) -> VoteTable {
        VoteTable::from_pairs(
            pairs
                .iter()
                .map(|(q, w)| (p(q), Weight::new(*w).unwrap())),
        )
        .unwrap()
    }

    #[test]
    fn detects_per_party_excess() {
        let votes = table(&[("A", 50.0), ("B", 30.0)]);
        let base: SeatAllocation = [(p("A"), 4), (p("B"), 2)].into_iter().collect();
        let direct: DirectMandateTable = [(p("A"), 6), (p("B"), 1)].into_iter().collect();
        let report = analyze(&votes, &base, &direct);
        assert_eq!(report.by_party[&p("A")], 2);
        assert_eq!(report.by_party[&p("B")], 0);
        assert_eq!(report.total, 2);
    }

    #[test]
    fn ignores_parties_outside_the_table() {
        let votes = table(&[("A", 50.0)]);
        let base: SeatAllocation = [(p("A"), 3)].into_iter().collect();
        let direct: DirectMandateTable = [(p("Z"), 9)].into_iter().collect();
        let report = analyze(&votes, &base, &direct);
        assert!(report.is_zero());
        assert!(!report.by_party.contains_key(&p("Z")));
    }

    #[test]
    fn floor_raises_but_never_inserts() {
        let alloc: SeatAllocation = [(p("A"), 1), (p("B"), 4)].into_iter().collect();
        let direct: DirectMandateTable =
            [(p("A"), 3), (p("B"), 2), (p("Z"), 5)].into_iter().collect();
        let floored = apply_direct_floor(alloc, &direct);
        assert_eq!(floored[&p("A")], 3);
        assert_eq!(floored[&p("B")], 4);
        assert!(!floored.contains_key(&p("Z")));
    }
}
