use anyhow::{bail, Result};
use log::warn;

use crate::{
    locate::PairLocator,
    read::AlignedRead,
    site_pair::{JointState, PairCatalog},
    tally::TallyTable,
};

/// What to do when a located pair does not show two CpG calls in a read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InvalidStatePolicy {
    /// Log a warning and skip the observation.
    #[default]
    Warn,
    /// Fail the run.
    Abort,
}

/// Outcome of reading one pair off one read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    Valid(JointState),
    /// Holds the symbols found at the offsets, or a description of why
    /// no symbols could be read.
    Invalid(String),
}

impl Observation {
    pub fn from_calls(calls: &[u8], offsets: Option<(usize, usize)>) -> Self {
        let Some((first, second)) = offsets else {
            return Observation::Invalid("pair not on read".to_string());
        };
        match (calls.get(first), calls.get(second)) {
            (Some(&a), Some(&b)) => match JointState::from_calls(a, b) {
                Some(state) => Observation::Valid(state),
                None => Observation::Invalid(format!("{}{}", a as char, b as char)),
            },
            _ => Observation::Invalid("offset beyond read end".to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregationStats {
    pub reads_seen: u64,
    /// Reads with at least one located pair.
    pub reads_used: u64,
    pub located: u64,
    pub valid: u64,
    pub skipped: u64,
}

impl AggregationStats {
    pub fn merge(&mut self, other: &AggregationStats) {
        self.reads_seen += other.reads_seen;
        self.reads_used += other.reads_used;
        self.located += other.located;
        self.valid += other.valid;
        self.skipped += other.skipped;
    }
}

/// Folds reads into a [`TallyTable`] for the pairs of its locator.
pub struct Aggregator {
    locator: PairLocator,
    policy: InvalidStatePolicy,
}

impl Aggregator {
    pub fn new(locator: PairLocator, policy: InvalidStatePolicy) -> Self {
        Self { locator, policy }
    }

    pub fn catalog(&self) -> &PairCatalog {
        self.locator.catalog()
    }

    /// Zeroed table covering every catalogue pair.
    pub fn new_table(&self) -> TallyTable {
        TallyTable::new(self.catalog().len())
    }

    /// Records every located pair of `read` into `table`.
    ///
    /// Fails on a malformed alignment, or on an invalid observation under
    /// [`InvalidStatePolicy::Abort`].
    pub fn process_read(
        &self,
        read: &AlignedRead,
        table: &mut TallyTable,
        stats: &mut AggregationStats,
    ) -> Result<()> {
        stats.reads_seen += 1;

        let located = self.locator.locate(read);
        if located.is_empty() {
            return Ok(());
        }
        stats.reads_used += 1;

        let calls = read.reference_calls()?;

        for located_pair in located {
            stats.located += 1;
            match Observation::from_calls(&calls, located_pair.offsets) {
                Observation::Valid(state) => {
                    table.record(located_pair.pair, state);
                    stats.valid += 1;
                }
                Observation::Invalid(observed) => {
                    let pair = self
                        .catalog()
                        .get(located_pair.pair)
                        .map(|p| format!("({}, {}, {})", p.chrom, p.cpg1, p.cpg2))
                        .unwrap_or_else(|| format!("#{}", located_pair.pair));
                    let message = format!(
                        "Did not find a z or Z at the expected position {} within read {} (found: {})",
                        pair, read.name, observed
                    );
                    match self.policy {
                        InvalidStatePolicy::Warn => {
                            warn!("{}", message);
                            stats.skipped += 1;
                        }
                        InvalidStatePolicy::Abort => bail!(message),
                    }
                }
            }
        }

        Ok(())
    }
}
