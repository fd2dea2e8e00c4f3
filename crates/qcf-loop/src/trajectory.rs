//! Append-only record of completed iterations.

use serde::{Deserialize, Serialize};

/// One completed iteration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryEntry {
    /// Zero-based iteration index.
    pub iteration: usize,
    /// Coupling parameter the operator was built with.
    pub coupling_parameter: f64,
    /// Energy the oracle returned for that operator.
    pub minimum_energy: f64,
}

/// Ordered samples, one per completed iteration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trajectory {
    entries: Vec<TrajectoryEntry>,
}

impl Trajectory {
    /// Create an empty trajectory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. No deduplication or reordering.
    pub fn record(&mut self, entry: TrajectoryEntry) {
        self.entries.push(entry);
    }

    /// Entries in recording order.
    pub fn snapshot(&self) -> &[TrajectoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent entry.
    pub fn last(&self) -> Option<&TrajectoryEntry> {
        self.entries.last()
    }

    /// Coupling parameters, aligned with [`Self::energy_series`].
    pub fn coupling_series(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.coupling_parameter).collect()
    }

    /// Energies, aligned with [`Self::coupling_series`].
    pub fn energy_series(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.minimum_energy).collect()
    }
}
