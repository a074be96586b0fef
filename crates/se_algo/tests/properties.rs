//! Property tests for the allocation layer.

use proptest::prelude::*;

use se_algo::{allocate_rock, allocate_sainte_lague, apportion_rock, apportion_sainte_lague};
use se_core::{DirectMandateTable, PartyId, VoteTable, Weight};

fn party(i: usize) -> PartyId {
    PartyId::new(format!("P{i:02}")).unwrap()
}

fn table_from(weights: &[u32]) -> VoteTable {
    VoteTable::from_pairs(
        weights
            .iter()
            .enumerate()
            .map(|(i, w)| (party(i), Weight::new(f64::from(*w)).unwrap())),
    )
    .unwrap()
}

fn mandates_from(counts: &[u32]) -> DirectMandateTable {
    counts
        .iter()
        .enumerate()
        .filter(|(_, c)| **c > 0)
        .map(|(i, c)| (party(i), *c))
        .collect()
}

proptest! {
    // Without direct mandates the house is filled exactly, as long as
    // anyone has votes at all.
    #[test]
    fn house_is_filled_exactly(
        weights in prop::collection::vec(0u32..10_000, 1..10),
        seats in 0u32..200,
    ) {
        let votes = table_from(&weights);
        let empty = DirectMandateTable::new();
        let expected = if weights.iter().any(|w| *w > 0) { seats } else { 0 };

        let sl = allocate_sainte_lague(&votes, seats, &empty, 0);
        prop_assert_eq!(sl.values().sum::<u32>(), expected);

        let rock = allocate_rock(&votes, seats, &empty, 0);
        prop_assert_eq!(rock.values().sum::<u32>(), expected);
    }

    // Every party with votes ends at or above its direct-mandate floor.
    #[test]
    fn direct_floor_holds(
        weights in prop::collection::vec(1u32..10_000, 1..10),
        seats in 1u32..120,
        direct in prop::collection::vec(0u32..6, 10),
    ) {
        let votes = table_from(&weights);
        let mandates = mandates_from(&direct);

        for alloc in [
            allocate_sainte_lague(&votes, seats, &mandates, 0),
            allocate_rock(&votes, seats, &mandates, 0),
        ] {
            for i in 0..weights.len() {
                let id = party(i);
                let held = alloc.get(&id).copied().unwrap_or(0);
                let floor = mandates.get(&id).copied().unwrap_or(0);
                prop_assert!(
                    held >= floor,
                    "party {} holds {} below its floor {}",
                    id, held, floor,
                );
            }
        }
    }

    // A party without votes never appears in the result, no matter how many
    // districts it won.
    #[test]
    fn zero_vote_parties_stay_out(
        weights in prop::collection::vec(1u32..10_000, 1..8),
        seats in 1u32..120,
        ghost_wins in 1u32..5,
    ) {
        let ghost = PartyId::new("GHOST").unwrap();
        let mut pairs: Vec<(PartyId, Weight)> = weights
            .iter()
            .enumerate()
            .map(|(i, w)| (party(i), Weight::new(f64::from(*w)).unwrap()))
            .collect();
        pairs.push((ghost.clone(), Weight::ZERO));
        let votes = VoteTable::from_pairs(pairs).unwrap();
        let mandates: DirectMandateTable = [(ghost.clone(), ghost_wins)].into_iter().collect();

        let sl = allocate_sainte_lague(&votes, seats, &mandates, 0);
        prop_assert!(!sl.contains_key(&ghost));

        let rock = allocate_rock(&votes, seats, &mandates, 0);
        prop_assert!(!rock.contains_key(&ghost));
    }

    // Overhang correction only ever grows the house; leveling never takes a
    // seat a party already had in the base run.
    #[test]
    fn overhang_only_adds(
        weights in prop::collection::vec(1u32..10_000, 1..10),
        seats in 1u32..120,
        direct in prop::collection::vec(0u32..6, 10),
    ) {
        let votes = table_from(&weights);
        let mandates = mandates_from(&direct);

        let sl = apportion_sainte_lague(&votes, seats, &mandates, 0);
        prop_assert!(sl.house_size >= seats);
        for (id, base) in &sl.base {
            prop_assert!(sl.seats.get(id).copied().unwrap_or(0) >= *base);
        }

        let rock = apportion_rock(&votes, seats, &mandates, 0);
        prop_assert!(rock.house_size >= seats);
        prop_assert!(rock.seats.values().sum::<u32>() >= seats);
    }

    // No hidden state: the same request always produces the same seats.
    #[test]
    fn runs_are_reproducible(
        weights in prop::collection::vec(0u32..10_000, 1..10),
        seats in 0u32..200,
        direct in prop::collection::vec(0u32..6, 10),
        independents in 0u32..10,
    ) {
        let votes = table_from(&weights);
        let mandates = mandates_from(&direct);

        let a = apportion_sainte_lague(&votes, seats, &mandates, independents);
        let b = apportion_sainte_lague(&votes, seats, &mandates, independents);
        prop_assert_eq!(a, b);

        let c = apportion_rock(&votes, seats, &mandates, independents);
        let d = apportion_rock(&votes, seats, &mandates, independents);
        prop_assert_eq!(c, d);
    }
}
