use std::borrow::Cow;

use anyhow::{Context, Result};

use crate::{
    cigar::{reference_len, CigarOp},
    remap::remap_calls,
    strand::Strand,
};

/// A mapped read with its read-frame methylation calls.
///
/// `start`/`end` form the half-open reference span; `end` is derived from the
/// CIGAR operations so the span always agrees with them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedRead {
    pub name: String,
    pub contig: String,
    pub start: u64,
    pub end: u64,
    pub strand: Strand,
    pub mapq: u8,
    pub cigar: Vec<CigarOp>,
    pub calls: Vec<u8>,
}

impl AlignedRead {
    pub fn new(
        name: String,
        contig: String,
        start: u64,
        strand: Strand,
        mapq: u8,
        cigar: Vec<CigarOp>,
        calls: Vec<u8>,
    ) -> Self {
        let end = start + reference_len(&cigar) as u64;
        Self {
            name,
            contig,
            start,
            end,
            strand,
            mapq,
            cigar,
            calls,
        }
    }

    /// Call string in reference coordinates, see [`remap_calls`].
    pub fn reference_calls(&self) -> Result<Cow<'_, [u8]>> {
        remap_calls(&self.calls, &self.cigar).with_context(|| {
            format!(
                "Malformed alignment for read '{}' at {}:{}",
                self.name, self.contig, self.start
            )
        })
    }
}
