//! Per-region statistics lookup.
//!
//! Region attribute tables arrive from external sources that do not
//! always cover every region id. Lookups return an explicit
//! [`PopulationLookup`] instead of failing or silently defaulting;
//! callers zero-fill on `Missing` and record the gap through the
//! logging channel, leaving control flow unchanged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Result of a region statistics lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PopulationLookup {
    Found(f64),
    Missing,
}

impl PopulationLookup {
    /// Zero-fill a missing value, recording a warning.
    pub fn or_zero(self, region_id: u64) -> f64 {
        match self {
            PopulationLookup::Found(value) => value,
            PopulationLookup::Missing => {
                warn!(region_id, "region missing from statistics table, zero-filled");
                0.0
            }
        }
    }
}

/// Region id keyed statistics table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegionStats {
    population: BTreeMap<u64, f64>,
}

impl RegionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, region_id: u64, population: f64) {
        self.population.insert(region_id, population);
    }

    pub fn population(&self, region_id: u64) -> PopulationLookup {
        match self.population.get(&region_id) {
            Some(&value) => PopulationLookup::Found(value),
            None => PopulationLookup::Missing,
        }
    }

    pub fn len(&self) -> usize {
        self.population.len()
    }

    pub fn is_empty(&self) -> bool {
        self.population.is_empty()
    }
}
