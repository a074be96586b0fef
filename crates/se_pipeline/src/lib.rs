//! se_pipeline — deterministic orchestration surface for the seat engine
//! (load → validate → dispatch → apportion → report).
//!
//! This crate stays I/O-free apart from the [`run_file`] convenience and
//! delegates JSON to `se_io` and math to `se_algo`. Every operation callers
//! need is reachable from here: the per-method entry points, the
//! string-token dispatcher, district winners, and the outcome/report shapes.

#![forbid(unsafe_code)]

use std::fmt;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use se_algo::{apportion_rock, apportion_sainte_lague, district_winners, Apportionment};
use se_core::{
    AllocationMethod, DirectMandateResult, DirectMandateTable, DistrictId, DistrictVotes, PartyId,
    SeatAllocation, VoteTable,
};
use se_io::model::ComputationRequest;
use se_io::IoError;

// ----------------------------- errors -----------------------------

/// Single error surface for pipeline orchestration.
#[derive(Debug)]
pub enum PipelineError {
    /// Filesystem trouble (missing input, unwritable output).
    Io(String),
    /// The input cannot describe a run (bad JSON, bad tokens, bad counts).
    Validate(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Io(m) => write!(f, "io: {m}"),
            PipelineError::Validate(m) => write!(f, "validate: {m}"),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<IoError> for PipelineError {
    fn from(e: IoError) -> Self {
        let msg = e.to_string();
        match e {
            IoError::Read { .. } | IoError::Write { .. } => PipelineError::Io(msg),
            IoError::Json { .. }
            | IoError::Token(_)
            | IoError::Weight { .. }
            | IoError::DuplicateParty(_)
            | IoError::DuplicateDistrict(_)
            | IoError::Seats { .. }
            | IoError::Method(_) => PipelineError::Validate(msg),
        }
    }
}

// ----------------------------- method surface -----------------------------

/// Sainte-Laguë apportionment, seats only.
pub fn sainte_lague(
    votes: &VoteTable,
    total_seats: u32,
    direct_mandates: &DirectMandateTable,
    independent_seats: u32,
) -> SeatAllocation {
    apportion_sainte_lague(votes, total_seats, direct_mandates, independent_seats).seats
}

/// Rock quota apportionment, seats only.
pub fn rock(
    votes: &VoteTable,
    total_seats: u32,
    direct_mandates: &DirectMandateTable,
    independent_seats: u32,
) -> SeatAllocation {
    apportion_rock(votes, total_seats, direct_mandates, independent_seats).seats
}

/// Plurality winner per district plus summed win counts per party.
pub fn calculate_district_winners(district_votes: &DistrictVotes) -> DirectMandateResult {
    district_winners(district_votes)
}

/// String-token dispatcher. Unknown tokens log a warning and yield an empty
/// allocation; they never abort a run.
pub fn calculate_seats(
    method: &str,
    votes: &VoteTable,
    total_seats: u32,
    direct_mandates: &DirectMandateTable,
    independent_seats: u32,
) -> SeatAllocation {
    match method.parse::<AllocationMethod>() {
        Ok(AllocationMethod::SainteLague) => {
            sainte_lague(votes, total_seats, direct_mandates, independent_seats)
        }
        Ok(AllocationMethod::Rock) => rock(votes, total_seats, direct_mandates, independent_seats),
        Err(_) => {
            warn!(token = method, "unknown allocation method, no seats assigned");
            SeatAllocation::new()
        }
    }
}

// ----------------------------- outcome -----------------------------

/// Where the direct-mandate table of a run came from.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MandateSource {
    None,
    Explicit,
    Districts,
}

/// Everything one engine run produces.
#[derive(Clone, Debug)]
pub struct EngineOutcome {
    pub method: AllocationMethod,
    pub apportionment: Apportionment,
    pub independent_seats: u32,
    pub mandate_source: MandateSource,
    /// The table the allocator actually saw (explicit or derived).
    pub direct_mandates: DirectMandateTable,
    /// Winner detail, present whenever district votes were supplied.
    pub districts: Option<DirectMandateResult>,
}

impl EngineOutcome {
    /// Final party seats plus the independents.
    pub fn effective_house(&self) -> u32 {
        let party: u32 = self.apportionment.seats.values().sum();
        party.saturating_add(self.independent_seats)
    }
}

/// Run one validated request end to end.
///
/// `ComputationRequest` fields are public, so seat counts are re-checked
/// here; requests from `se_io` always pass.
pub fn run(request: &ComputationRequest) -> Result<EngineOutcome, PipelineError> {
    if request.independent_seats > request.total_seats {
        return Err(PipelineError::Validate(format!(
            "independent seats ({}) exceed total seats ({})",
            request.independent_seats, request.total_seats
        )));
    }

    let districts = request.district_votes.as_ref().map(calculate_district_winners);

    let (direct_mandates, mandate_source) = match (&request.direct_mandates, &districts) {
        (Some(explicit), Some(_)) => {
            warn!("explicit direct_mandates shadow the district-vote winners");
            (explicit.clone(), MandateSource::Explicit)
        }
        (Some(explicit), None) => (explicit.clone(), MandateSource::Explicit),
        (None, Some(derived)) => (derived.counts.clone(), MandateSource::Districts),
        (None, None) => (DirectMandateTable::new(), MandateSource::None),
    };

    debug!(
        method = %request.method,
        total_seats = request.total_seats,
        parties = request.votes.len(),
        "apportioning"
    );

    let apportionment = match request.method {
        AllocationMethod::SainteLague => apportion_sainte_lague(
            &request.votes,
            request.total_seats,
            &direct_mandates,
            request.independent_seats,
        ),
        AllocationMethod::Rock => apportion_rock(
            &request.votes,
            request.total_seats,
            &direct_mandates,
            request.independent_seats,
        ),
    };

    Ok(EngineOutcome {
        method: request.method,
        apportionment,
        independent_seats: request.independent_seats,
        mandate_source,
        direct_mandates,
        districts,
    })
}

/// Load a tally file and run it.
pub fn run_file(
    path: &Path,
    method_override: Option<AllocationMethod>,
) -> Result<(ComputationRequest, EngineOutcome), PipelineError> {
    let request = se_io::loader::load_tally(path, method_override)?;
    let outcome = run(&request)?;
    Ok((request, outcome))
}

// ----------------------------- report doc -----------------------------

/// Engine identifiers stamped into every report (supplied by the binary).
#[derive(Clone, Debug, Serialize)]
pub struct EngineMeta {
    pub name: String,
    pub version: String,
}

/// Seat report document: stable field names, party rows in tally order.
#[derive(Clone, Debug, Serialize)]
pub struct SeatReport {
    pub engine: EngineMeta,
    pub method: AllocationMethod,
    pub total_seats: u32,
    pub independent_seats: u32,
    /// Final party seats plus independents; equals `total_seats` unless
    /// overhang or a majority transfer stretched the house.
    pub house_size: u32,
    pub corrected: bool,
    pub mandate_source: MandateSource,
    pub overhang_total: u32,
    pub seats: Vec<PartySeats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district_winners: Option<Vec<DistrictWinner>>,
}

/// One row per party of the input tally, in tally order.
#[derive(Clone, Debug, Serialize)]
pub struct PartySeats {
    pub party: PartyId,
    pub seats: u32,
    pub base: u32,
    pub direct: u32,
    pub overhang: u32,
}

#[derive(Clone, Debug, Serialize)]
pub struct DistrictWinner {
    pub district: DistrictId,
    pub winner: PartyId,
}

/// Shape an outcome into the wire report.
pub fn build_report(
    request: &ComputationRequest,
    outcome: &EngineOutcome,
    engine: EngineMeta,
) -> SeatReport {
    let a = &outcome.apportionment;
    let seats: Vec<PartySeats> = request
        .votes
        .parties()
        .map(|p| PartySeats {
            party: p.clone(),
            seats: a.seats.get(p).copied().unwrap_or(0),
            base: a.base.get(p).copied().unwrap_or(0),
            direct: outcome.direct_mandates.get(p).copied().unwrap_or(0),
            overhang: a.overhang.by_party.get(p).copied().unwrap_or(0),
        })
        .collect();

    let district_winners = outcome.districts.as_ref().map(|d| {
        d.districts
            .iter()
            .map(|(district, winner)| DistrictWinner {
                district: district.clone(),
                winner: winner.clone(),
            })
            .collect()
    });

    SeatReport {
        engine,
        method: outcome.method,
        total_seats: request.total_seats,
        independent_seats: outcome.independent_seats,
        house_size: outcome.effective_house(),
        corrected: a.corrected,
        mandate_source: outcome.mandate_source,
        overhang_total: a.overhang.total,
        seats,
        district_winners,
    }
}

// ----------------------------- tests -----------------------------
