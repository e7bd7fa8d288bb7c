use std::fmt::Display;

use ahash::AHashMap;
use anyhow::{bail, Result};

use crate::{
    calls::{METHYLATED_CPG, UNMETHYLATED_CPG},
    strand::Strand,
};

/// Index of a pair inside a [`PairCatalog`].
pub type PairId = usize;

/// Two linked CpG sites on one chromosome.
///
/// `cpg1` is the 0-based start of the first CpG and `cpg2` the exclusive end
/// of the second CpG, so the pair covers `[cpg1, cpg2)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SitePair {
    pub chrom: String,
    pub cpg1: u64,
    pub cpg2: u64,
}

impl SitePair {
    pub fn new(chrom: String, cpg1: u64, cpg2: u64) -> Result<Self> {
        if cpg1 >= cpg2 {
            bail!(
                "Invalid CpG pair {}:{}-{}: first position must be smaller than the second",
                chrom,
                cpg1,
                cpg2
            );
        }
        Ok(Self { chrom, cpg1, cpg2 })
    }

    /// Whether the pair lies inside the half-open span `[start, end)`.
    pub fn is_within(&self, start: u64, end: u64) -> bool {
        self.cpg1 >= start && self.cpg2 <= end
    }

    /// Offsets of the two methylation calls within a reference-frame call
    /// string starting at `ref_start`.
    ///
    /// The second CpG starts two bases before `cpg2`; both calls move by
    /// [`Strand::cytosine_shift`]. Returns `None` when either call would fall
    /// before `ref_start`.
    pub fn call_offsets(&self, ref_start: u64, strand: Strand) -> Option<(usize, usize)> {
        let shift = strand.cytosine_shift();
        let first = (self.cpg1 + shift).checked_sub(ref_start)?;
        let second = (self.cpg2 + shift)
            .checked_sub(2)?
            .checked_sub(ref_start)?;
        Some((first as usize, second as usize))
    }
}

impl Display for SitePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}-{}", self.chrom, self.cpg1, self.cpg2)
    }
}

/// Joint methylation state of the two CpGs of a pair within one read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JointState {
    BothMethylated,
    FirstMethylated,
    SecondMethylated,
    NeitherMethylated,
}

impl JointState {
    pub const ALL: [JointState; 4] = [
        JointState::BothMethylated,
        JointState::FirstMethylated,
        JointState::SecondMethylated,
        JointState::NeitherMethylated,
    ];

    /// Returns `None` unless both calls are CpG calls (`Z` or `z`).
    pub fn from_calls(first: u8, second: u8) -> Option<Self> {
        match (first, second) {
            (METHYLATED_CPG, METHYLATED_CPG) => Some(JointState::BothMethylated),
            (METHYLATED_CPG, UNMETHYLATED_CPG) => Some(JointState::FirstMethylated),
            (UNMETHYLATED_CPG, METHYLATED_CPG) => Some(JointState::SecondMethylated),
            (UNMETHYLATED_CPG, UNMETHYLATED_CPG) => Some(JointState::NeitherMethylated),
            _ => None,
        }
    }

    /// Column position in the output table.
    pub fn index(&self) -> usize {
        match self {
            JointState::BothMethylated => 0,
            JointState::FirstMethylated => 1,
            JointState::SecondMethylated => 2,
            JointState::NeitherMethylated => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            JointState::BothMethylated => "ZZ",
            JointState::FirstMethylated => "Zz",
            JointState::SecondMethylated => "zZ",
            JointState::NeitherMethylated => "zz",
        }
    }
}

/// Ordered, de-duplicated set of every pair a run tracks.
#[derive(Debug, Default)]
pub struct PairCatalog {
    pairs: Vec<SitePair>,
    ids: AHashMap<SitePair, PairId>,
}

impl PairCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pair and returns its id. Re-inserting a known pair returns the
    /// existing id.
    pub fn insert(&mut self, pair: SitePair) -> PairId {
        if let Some(&id) = self.ids.get(&pair) {
            return id;
        }
        let id = self.pairs.len();
        self.ids.insert(pair.clone(), id);
        self.pairs.push(pair);
        id
    }

    pub fn get(&self, id: PairId) -> Option<&SitePair> {
        self.pairs.get(id)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PairId, &SitePair)> {
        self.pairs.iter().enumerate()
    }
}
