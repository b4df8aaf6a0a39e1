//! Capacity-only burst approximation for rate-limit rules.
//!
//! The burst is treated as arriving in one instant: window durations are
//! ignored and nothing refills. The overall verdict compares the burst
//! against a fixed reference capacity rather than the rule's bands; the
//! per-band breakdown uses each band's real capacity.

use serde::{Deserialize, Serialize};

use crate::Rule;

/// Capacity behind the overall `allowed`/`consumed`/`remaining` figures.
pub const SIMULATION_REFERENCE_CAPACITY: u64 = 10;

/// Hypothetical traffic entered in the simulation panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationInput {
    /// Partition key the traffic would carry (IP, user id, or API key).
    pub key: String,
    /// Request path the traffic would target.
    pub path: String,
    /// Number of requests arriving at once.
    pub burst: u64,
}

impl Default for SimulationInput {
    fn default() -> Self {
        Self {
            key: "192.168.1.100".to_owned(),
            path: "/api/orders".to_owned(),
            burst: 15,
        }
    }
}

/// Outcome of the burst against one band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BandSimulation {
    /// Band label.
    pub label: String,
    /// Band capacity.
    pub capacity: u64,
    /// Units the band absorbed.
    pub consumed: u64,
    /// Units left in the band.
    pub remaining: u64,
    /// Whether the burst went past the band's capacity.
    pub exceeded: bool,
}

/// Result of one simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    /// Overall verdict against the reference capacity.
    pub allowed: bool,
    /// Units consumed from the reference capacity.
    pub consumed: u64,
    /// Units left in the reference capacity.
    pub remaining: u64,
    /// Per-band breakdown in rule order.
    pub bands: Vec<BandSimulation>,
}

impl SimulationResult {
    /// Returns whether no band was exceeded.
    #[must_use]
    pub fn all_bands_within_capacity(&self) -> bool {
        self.bands.iter().all(|band| !band.exceeded)
    }

    /// Returns the first band, in rule order, that the burst exceeded.
    #[must_use]
    pub fn first_exceeded_band(&self) -> Option<&BandSimulation> {
        self.bands.iter().find(|band| band.exceeded)
    }
}

/// Runs the burst approximation for `rule`.
#[must_use]
pub fn simulate(rule: &Rule, burst: u64) -> SimulationResult {
    let bands = rule
        .bands
        .iter()
        .map(|band| BandSimulation {
            label: band.label.clone(),
            capacity: band.capacity,
            consumed: burst.min(band.capacity),
            remaining: band.capacity.saturating_sub(burst),
            exceeded: burst > band.capacity,
        })
        .collect();

    SimulationResult {
        allowed: burst <= SIMULATION_REFERENCE_CAPACITY,
        consumed: burst.min(SIMULATION_REFERENCE_CAPACITY),
        remaining: SIMULATION_REFERENCE_CAPACITY.saturating_sub(burst),
        bands,
    }
}
