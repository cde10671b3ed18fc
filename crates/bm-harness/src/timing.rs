//! Observed-timing strategies for the timing monitor.
//!
//! Real measurement belongs to a rig; these sources stand in for it and are
//! deterministic so suite runs reproduce.

use sha2::{Digest, Sha256};

/// Supplies the observed transition time for a monitor evaluation.
pub trait TimingSource: Send + Sync {
    /// Short label reported in monitor details.
    fn name(&self) -> &str;

    /// Observed time in milliseconds for `monitor_id` on case `tc_id`.
    fn observe(&self, tc_id: &str, monitor_id: &str, budget_ms: u64) -> u64;
}

/// Draws in `[budget/2, budget]` from a hash of seed, case id and monitor id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeededTimingSource {
    seed: i64,
}

impl SeededTimingSource {
    pub fn new(seed: i64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> i64 {
        self.seed
    }
}

impl TimingSource for SeededTimingSource {
    fn name(&self) -> &str {
        "seeded"
    }

    fn observe(&self, tc_id: &str, monitor_id: &str, budget_ms: u64) -> u64 {
        let mut hasher = Sha256::new();
        hasher.update(self.seed.to_le_bytes());
        hasher.update(tc_id.as_bytes());
        hasher.update([0u8]);
        hasher.update(monitor_id.as_bytes());
        let digest = hasher.finalize();

        let mut word = [0u8; 8];
        word.copy_from_slice(&digest[..8]);
        let draw = u64::from_le_bytes(word);

        let low = budget_ms / 2;
        let span = budget_ms - low + 1;
        low + draw % span
    }
}

/// Always observes the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedTimingSource {
    observed_ms: u64,
}

impl FixedTimingSource {
    pub fn new(observed_ms: u64) -> Self {
        Self { observed_ms }
    }
}

impl TimingSource for FixedTimingSource {
    fn name(&self) -> &str {
        "fixed"
    }

    fn observe(&self, _tc_id: &str, _monitor_id: &str, _budget_ms: u64) -> u64 {
        self.observed_ms
    }
}
