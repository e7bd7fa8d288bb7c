use anyhow::{bail, Result};

use crate::site_pair::{JointState, PairId};

/// Observation counts for one pair, indexed by [`JointState::index`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PairTally {
    counts: [u32; 4],
}

impl PairTally {
    pub fn increment(&mut self, state: JointState) {
        self.counts[state.index()] += 1;
    }

    pub fn get(&self, state: JointState) -> u32 {
        self.counts[state.index()]
    }

    /// Counts in output column order: ZZ, Zz, zZ, zz.
    pub fn counts(&self) -> [u32; 4] {
        self.counts
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn merge(&mut self, other: &PairTally) {
        for (count, add) in self.counts.iter_mut().zip(other.counts) {
            *count += add;
        }
    }
}

/// One [`PairTally`] per catalogue pair, zero-initialised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TallyTable {
    tallies: Vec<PairTally>,
}

impl TallyTable {
    pub fn new(num_pairs: usize) -> Self {
        Self {
            tallies: vec![PairTally::default(); num_pairs],
        }
    }

    pub fn record(&mut self, pair: PairId, state: JointState) {
        self.tallies[pair].increment(state);
    }

    pub fn get(&self, pair: PairId) -> Option<&PairTally> {
        self.tallies.get(pair)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PairId, &PairTally)> {
        self.tallies.iter().enumerate()
    }

    /// Adds another table of the same catalogue into this one.
    pub fn merge(&mut self, other: &TallyTable) -> Result<()> {
        if self.tallies.len() != other.tallies.len() {
            bail!(
                "Cannot merge tally tables of different sizes ({} and {})",
                self.tallies.len(),
                other.tallies.len()
            );
        }
        for (tally, add) in self.tallies.iter_mut().zip(&other.tallies) {
            tally.merge(add);
        }
        Ok(())
    }
}
