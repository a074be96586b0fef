//! Wire model for tally files and its conversion into validated core types.
//!
//! Contract:
//! - Entry arrays carry party order; the order in the file is the order the
//!   engine breaks ties in.
//! - `weight` accepts a JSON number or a numeric string; both go through
//!   `se_core::Weight` and fail loudly when malformed.
//! - Conversion rejects bad tokens, duplicates, and impossible seat counts
//!   with field-specific errors.

use serde::Deserialize;

use se_core::{
    AllocationMethod, DirectMandateTable, DistrictId, DistrictVotes, PartyId, VoteTable, Weight,
};

use crate::{IoError, IoResult};

// ----------------------------- wire types -----------------------------

/// Top-level tally file as written on disk.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TallyFile {
    /// Method token ("sainte_lague", "rock", legacy spellings accepted).
    pub method: String,
    pub total_seats: u32,
    #[serde(default)]
    pub independent_seats: u32,
    pub votes: Vec<VoteEntry>,
    pub direct_mandates: Option<Vec<MandateEntry>>,
    pub district_votes: Option<Vec<DistrictEntry>>,
}

/// One `{ "party": …, "weight": … }` row.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VoteEntry {
    pub party: String,
    pub weight: WeightField,
}

/// Weight as the file writes it: a JSON number or a numeric string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum WeightField {
    Num(f64),
    Text(String),
}

/// One `{ "party": …, "count": … }` row of won constituencies.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MandateEntry {
    pub party: String,
    pub count: u32,
}

/// One `{ "district": …, "votes": [ … ] }` row.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DistrictEntry {
    pub district: String,
    pub votes: Vec<VoteEntry>,
}

// ----------------------------- validated request -----------------------------

/// Fully validated engine input. Everything in here is well-formed.
#[derive(Clone, Debug)]
pub struct ComputationRequest {
    pub method: AllocationMethod,
    pub total_seats: u32,
    pub independent_seats: u32,
    pub votes: VoteTable,
    /// Explicit table from the file, if any. When both this and
    /// `district_votes` are present the explicit table wins downstream.
    pub direct_mandates: Option<DirectMandateTable>,
    pub district_votes: Option<DistrictVotes>,
}

impl TallyFile {
    /// Validate and convert into core types. `method_override` (the CLI flag)
    /// wins over the file's own token.
    pub fn into_request(
        self,
        method_override: Option<AllocationMethod>,
    ) -> IoResult<ComputationRequest> {
        if self.independent_seats > self.total_seats {
            return Err(IoError::Seats {
                total: self.total_seats,
                independent: self.independent_seats,
            });
        }
        let method = match method_override {
            Some(m) => m,
            None => parse_method(&self.method)?,
        };
        let votes = vote_table(&self.votes)?;
        let direct_mandates = match &self.direct_mandates {
            Some(rows) => Some(mandate_table(rows)?),
            None => None,
        };
        let district_votes = match &self.district_votes {
            Some(rows) => Some(district_table(rows)?),
            None => None,
        };
        Ok(ComputationRequest {
            method,
            total_seats: self.total_seats,
            independent_seats: self.independent_seats,
            votes,
            direct_mandates,
            district_votes,
        })
    }
}

impl WeightField {
    fn to_weight(&self, party: &str) -> IoResult<Weight> {
        let parsed = match self {
            WeightField::Num(v) => Weight::new(*v),
            WeightField::Text(s) => s.parse::<Weight>(),
        };
        parsed.map_err(|_| IoError::Weight {
            party: party.to_string(),
            raw: self.raw(),
        })
    }

    fn raw(&self) -> String {
        match self {
            WeightField::Num(v) => v.to_string(),
            WeightField::Text(s) => s.clone(),
        }
    }
}

// ----------------------------- field conversions -----------------------------

fn parse_method(token: &str) -> IoResult<AllocationMethod> {
    token
        .parse::<AllocationMethod>()
        .map_err(|_| IoError::Method(token.to_string()))
}

fn party_id(raw: &str) -> IoResult<PartyId> {
    PartyId::new(raw).map_err(|_| IoError::Token(raw.to_string()))
}

fn vote_table(rows: &[VoteEntry]) -> IoResult<VoteTable> {
    let mut table = VoteTable::new();
    for row in rows {
        let party = party_id(&row.party)?;
        let weight = row.weight.to_weight(&row.party)?;
        table
            .insert(party, weight)
            .map_err(|_| IoError::DuplicateParty(row.party.clone()))?;
    }
    Ok(table)
}

fn mandate_table(rows: &[MandateEntry]) -> IoResult<DirectMandateTable> {
    let mut table = DirectMandateTable::new();
    for row in rows {
        let party = party_id(&row.party)?;
        if table.insert(party, row.count).is_some() {
            return Err(IoError::DuplicateParty(row.party.clone()));
        }
    }
    Ok(table)
}

fn district_table(rows: &[DistrictEntry]) -> IoResult<DistrictVotes> {
    let mut districts = DistrictVotes::new();
    for row in rows {
        let district = DistrictId::new(row.district.as_str())
            .map_err(|_| IoError::Token(row.district.clone()))?;
        let votes = vote_table(&row.votes)?;
        districts
            .insert(district, votes)
            .map_err(|_| IoError::DuplicateDistrict(row.district.clone()))?;
    }
    Ok(districts)
}

// ----------------------------- tests -----------------------------
