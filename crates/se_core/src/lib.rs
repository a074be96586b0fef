//! se_core — Core domain types and ordering contracts for the seat engine.
//!
//! This crate is **I/O-free**. It defines the stable types/APIs used across
//! the engine (`se_io`, `se_algo`, `se_pipeline`, `se_cli`):
//!
//! - Tokens: `PartyId`, `DistrictId`
//! - Weight domain: non-negative finite vote weights, fail-fast parsing
//! - Tables: `VoteTable` (canonical order), `DistrictVotes`
//! - Result shapes: `SeatAllocation`, `DirectMandateResult`
//! - `AllocationMethod` with stable wire tokens
//!
//! Serialization derives are gated behind the `serde` feature.

#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod errors {
    use core::fmt;

    /// Minimal error set for core-domain validation & parsing.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub enum CoreError {
        InvalidToken,
        InvalidWeight(&'static str),
        DuplicateParty,
        DuplicateDistrict,
        UnknownMethod,
    }

    impl fmt::Display for CoreError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                CoreError::InvalidToken => write!(f, "invalid token"),
                CoreError::InvalidWeight(k) => write!(f, "invalid weight: {k}"),
                CoreError::DuplicateParty => write!(f, "duplicate party"),
                CoreError::DuplicateDistrict => write!(f, "duplicate district"),
                CoreError::UnknownMethod => write!(f, "unknown allocation method"),
            }
        }
    }
}

pub mod tokens {
    //! Identifier tokens (`PartyId`, `DistrictId`).
    //!
    //! Tokens are the user-facing names of parties and districts ("SPD",
    //! "CDU/CSU", "Wahlkreis 61"). Accepted: 1..=64 chars, no control
    //! characters, not blank.

    use crate::errors::CoreError;
    use alloc::string::String;
    use core::fmt;
    use core::str::FromStr;

    #[cfg(feature = "serde")]
    use serde::de::{Error as DeError, Unexpected};
    #[cfg(feature = "serde")]
    use serde::{Deserialize, Deserializer, Serialize};

    pub(crate) fn is_token(s: &str) -> bool {
        let len = s.chars().count();
        (1..=64).contains(&len)
            && !s.chars().all(char::is_whitespace)
            && !s.chars().any(char::is_control)
    }

    macro_rules! def_token {
        ($name:ident) => {
            #[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
            #[cfg_attr(feature = "serde", derive(Serialize))]
            pub struct $name(String);

            impl $name {
                pub fn new(s: impl Into<String>) -> Result<Self, CoreError> {
                    let s = s.into();
                    if is_token(&s) {
                        Ok(Self(s))
                    } else {
                        Err(CoreError::InvalidToken)
                    }
                }

                pub fn as_str(&self) -> &str {
                    &self.0
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.0)
                }
            }

            impl FromStr for $name {
                type Err = CoreError;
                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    Self::new(s)
                }
            }

            #[cfg(feature = "serde")]
            impl<'de> Deserialize<'de> for $name {
                fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
                    let s = String::deserialize(d)?;
                    if is_token(&s) {
                        Ok(Self(s))
                    } else {
                        Err(D::Error::invalid_value(
                            Unexpected::Str(&s),
                            &"printable token, 1..=64 chars",
                        ))
                    }
                }
            }
        };
    }

    def_token!(PartyId);
    def_token!(DistrictId);
}

pub mod weights {
    //! Vote weight domain.
    //!
    //! Weights are non-negative finite `f64` values; fractional weights occur
    //! with weighted or delegated voting. Construction is the single gate:
    //! NaN, infinities, and negatives never enter the engine, and malformed
    //! numeric strings fail loudly instead of coercing to zero.

    use crate::errors::CoreError;
    use core::fmt;
    use core::str::FromStr;

    #[cfg(feature = "serde")]
    use serde::de::{Error as DeError, Unexpected};
    #[cfg(feature = "serde")]
    use serde::{Deserialize, Deserializer, Serialize};

    #[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
    #[cfg_attr(feature = "serde", derive(Serialize))]
    pub struct Weight(f64);

    impl Weight {
        pub const ZERO: Weight = Weight(0.0);

        pub fn new(v: f64) -> Result<Self, CoreError> {
            if v.is_nan() {
                Err(CoreError::InvalidWeight("nan"))
            } else if v.is_infinite() {
                Err(CoreError::InvalidWeight("infinite"))
            } else if v < 0.0 {
                Err(CoreError::InvalidWeight("negative"))
            } else {
                // -0.0 folds to +0.0 so zero weights compare and print uniformly.
                Ok(Self(v + 0.0))
            }
        }

        pub fn get(self) -> f64 {
            self.0
        }

        pub fn is_zero(self) -> bool {
            self.0 == 0.0
        }
    }

    impl fmt::Display for Weight {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    impl FromStr for Weight {
        type Err = CoreError;
        fn from_str(s: &str) -> Result<Self, Self::Err> {
            let v: f64 = s
                .trim()
                .parse()
                .map_err(|_| CoreError::InvalidWeight("unparseable"))?;
            Self::new(v)
        }
    }

    #[cfg(feature = "serde")]
    impl<'de> Deserialize<'de> for Weight {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            let v = f64::deserialize(d)?;
            Weight::new(v).map_err(|_| {
                D::Error::invalid_value(Unexpected::Float(v), &"finite non-negative number")
            })
        }
    }
}

pub mod entities {
    //! Vote tables and result shapes.
    //!
    //! `VoteTable` keeps parties in first-encountered order; that order is
    //! the canonical tie-break order everywhere in the engine. Result maps
    //! use `BTreeMap` for stable iteration and serialization only — no
    //! tie-break ever keys off the lexicographic order of an id.

    use alloc::collections::BTreeMap;
    use alloc::vec::Vec;

    use crate::errors::CoreError;
    use crate::tokens::{DistrictId, PartyId};
    use crate::weights::Weight;

    /// Seats per party. Every normalized party appears, zero-seat parties included.
    pub type SeatAllocation = BTreeMap<PartyId, u32>;

    /// District wins per party. Parties absent here hold zero mandates.
    pub type DirectMandateTable = BTreeMap<PartyId, u32>;

    /// Party vote totals in canonical (first-encountered) order.
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct VoteTable {
        entries: Vec<(PartyId, Weight)>,
    }

    impl VoteTable {
        pub fn new() -> Self {
            Self { entries: Vec::new() }
        }

        /// Appends a party. Duplicate keys are rejected, not merged.
        pub fn insert(&mut self, party: PartyId, weight: Weight) -> Result<(), CoreError> {
            if self.get(&party).is_some() {
                return Err(CoreError::DuplicateParty);
            }
            self.entries.push((party, weight));
            Ok(())
        }

        pub fn from_pairs<I>(pairs: I) -> Result<Self, CoreError>
        where
            I: IntoIterator<Item = (PartyId, Weight)>,
        {
            let mut table = Self::new();
            for (party, weight) in pairs {
                table.insert(party, weight)?;
            }
            Ok(table)
        }

        /// Linear scan; party counts are small (tens, not thousands).
        pub fn get(&self, party: &PartyId) -> Option<Weight> {
            self.entries.iter().find(|(p, _)| p == party).map(|(_, w)| *w)
        }

        pub fn iter(&self) -> impl Iterator<Item = (&PartyId, Weight)> + '_ {
            self.entries.iter().map(|(p, w)| (p, *w))
        }

        pub fn parties(&self) -> impl Iterator<Item = &PartyId> + '_ {
            self.entries.iter().map(|(p, _)| p)
        }

        pub fn len(&self) -> usize {
            self.entries.len()
        }

        pub fn is_empty(&self) -> bool {
            self.entries.is_empty()
        }

        /// Sum of all weights.
        pub fn total(&self) -> f64 {
            self.entries.iter().map(|(_, w)| w.get()).sum()
        }

        /// Sub-table retaining matching entries, order preserved.
        pub fn filtered(&self, mut keep: impl FnMut(&PartyId, Weight) -> bool) -> VoteTable {
            VoteTable {
                entries: self
                    .entries
                    .iter()
                    .filter(|(p, w)| keep(p, *w))
                    .cloned()
                    .collect(),
            }
        }

        /// Drops zero-weight parties, preserving order. Allocators operate on
        /// normalized tables only; a party filtered here can never win a seat.
        pub fn normalized(&self) -> VoteTable {
            self.filtered(|_, w| !w.is_zero())
        }
    }

    /// Per-district vote tables in document order.
    #[derive(Clone, Debug, Default)]
    pub struct DistrictVotes {
        districts: Vec<(DistrictId, VoteTable)>,
    }

    impl DistrictVotes {
        pub fn new() -> Self {
            Self { districts: Vec::new() }
        }

        pub fn insert(&mut self, district: DistrictId, votes: VoteTable) -> Result<(), CoreError> {
            if self.districts.iter().any(|(d, _)| *d == district) {
                return Err(CoreError::DuplicateDistrict);
            }
            self.districts.push((district, votes));
            Ok(())
        }

        pub fn iter(&self) -> impl Iterator<Item = (&DistrictId, &VoteTable)> + '_ {
            self.districts.iter().map(|(d, t)| (d, t))
        }

        pub fn len(&self) -> usize {
            self.districts.len()
        }

        pub fn is_empty(&self) -> bool {
            self.districts.is_empty()
        }
    }

    /// Winner per district plus summed win counts per party.
    #[derive(Clone, Debug, Default, PartialEq)]
    pub struct DirectMandateResult {
        pub counts: DirectMandateTable,
        pub districts: BTreeMap<DistrictId, PartyId>,
    }
}

pub mod method {
    //! Apportionment method selection with stable wire tokens.

    use crate::errors::CoreError;
    use alloc::string::String;
    use core::fmt;
    use core::str::FromStr;

    #[cfg(feature = "serde")]
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub enum AllocationMethod {
        #[cfg_attr(feature = "serde", serde(rename = "sainte_lague"))]
        SainteLague,
        #[cfg_attr(feature = "serde", serde(rename = "rock"))]
        Rock,
    }

    impl AllocationMethod {
        pub const ALL: [AllocationMethod; 2] =
            [AllocationMethod::SainteLague, AllocationMethod::Rock];

        pub fn as_str(self) -> &'static str {
            match self {
                AllocationMethod::SainteLague => "sainte_lague",
                AllocationMethod::Rock => "rock",
            }
        }
    }

    impl fmt::Display for AllocationMethod {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    impl FromStr for AllocationMethod {
        type Err = CoreError;
        /// Accepts canonical tokens plus legacy spellings, case-insensitive.
        fn from_str(s: &str) -> Result<Self, Self::Err> {
            let lower: String = s.trim().to_lowercase();
            match lower.as_str() {
                "sainte_lague" | "sainte-lague" | "saintelague" => {
                    Ok(AllocationMethod::SainteLague)
                }
                "rock" => Ok(AllocationMethod::Rock),
                _ => Err(CoreError::UnknownMethod),
            }
        }
    }
}

pub use entities::{
    DirectMandateResult, DirectMandateTable, DistrictVotes, SeatAllocation, VoteTable,
};
pub use errors::CoreError;
pub use method::AllocationMethod;
pub use tokens::{DistrictId, PartyId};
pub use weights::Weight;
