use anyhow::{bail, Context, Result};
use methylome::{AlignedRead, CigarKind, CigarOp, Strand};
use rust_htslib::bam::{
    self,
    record::{Aux, Cigar},
    HeaderView, Record,
};

/// Bismark methylation call tag.
const METHYLATION_CALL_TAG: &[u8] = b"XM";

pub fn contig_names(header: &HeaderView) -> Vec<String> {
    header
        .target_names()
        .iter()
        .map(|name| String::from_utf8_lossy(name).into_owned())
        .collect()
}

pub fn read_name(record: &Record) -> String {
    String::from_utf8_lossy(record.qname()).into_owned()
}

pub fn cigar_ops(record: &Record) -> Vec<CigarOp> {
    record
        .cigar()
        .iter()
        .filter_map(|op| match *op {
            Cigar::Match(len) | Cigar::Equal(len) | Cigar::Diff(len) => {
                Some(CigarOp::new(CigarKind::ConsumesBoth, len))
            }
            Cigar::Del(len) | Cigar::RefSkip(len) => {
                Some(CigarOp::new(CigarKind::ReferenceOnly, len))
            }
            Cigar::Ins(len) | Cigar::SoftClip(len) => Some(CigarOp::new(CigarKind::ReadOnly, len)),
            Cigar::HardClip(_) | Cigar::Pad(_) => None,
        })
        .collect()
}

/// Read-frame methylation calls from the `XM` tag.
pub fn methylation_calls(record: &Record) -> Result<Vec<u8>> {
    match record.aux(METHYLATION_CALL_TAG) {
        Ok(Aux::String(calls)) => Ok(calls.as_bytes().to_vec()),
        Ok(other) => bail!(
            "XM tag of read '{}' is not a string: {:?}",
            read_name(record),
            other
        ),
        Err(_) => bail!(
            "Read '{}' has no XM methylation call tag",
            read_name(record)
        ),
    }
}

/// Converts a BAM record, returning `None` for unmapped reads.
pub fn to_aligned_read(record: &Record, contigs: &[String]) -> Result<Option<AlignedRead>> {
    if record.is_unmapped() || record.tid() < 0 {
        return Ok(None);
    }

    let name = read_name(record);
    let contig = contigs
        .get(record.tid() as usize)
        .with_context(|| format!("Read '{}' refers to an unknown reference id {}", name, record.tid()))?
        .clone();
    let start = u64::try_from(record.pos())
        .with_context(|| format!("Read '{}' has a negative position", name))?;
    let calls = methylation_calls(record)?;

    Ok(Some(AlignedRead::new(
        name,
        contig,
        start,
        Strand::from_is_reverse(record.is_reverse()),
        record.mapq(),
        cigar_ops(record),
        calls,
    )))
}

/// Reads alignments in batches of mapped reads.
pub struct BatchLoader<R> {
    reader: R,
    contigs: Vec<String>,
    batch_size: usize,
    record: Record,
    unmapped: u64,
}

impl<R: bam::Read> BatchLoader<R> {
    pub fn new(reader: R, contigs: Vec<String>, batch_size: usize) -> Self {
        let size = if batch_size == 0 { 1 } else { batch_size };

        BatchLoader {
            reader,
            contigs,
            batch_size: size,
            record: Record::new(),
            unmapped: 0,
        }
    }

    /// Unmapped reads skipped so far.
    pub fn unmapped(&self) -> u64 {
        self.unmapped
    }
}

impl<R: bam::Read> Iterator for BatchLoader<R> {
    type Item = Result<Vec<AlignedRead>>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut batch = Vec::with_capacity(self.batch_size);

        while batch.len() < self.batch_size {
            match self.reader.read(&mut self.record) {
                None => break,
                Some(Err(e)) => {
                    return Some(Err(
                        anyhow::Error::from(e).context("Failed to read alignment record")
                    ))
                }
                Some(Ok(())) => {}
            }

            match to_aligned_read(&self.record, &self.contigs) {
                Ok(Some(read)) => batch.push(read),
                Ok(None) => self.unmapped += 1,
                Err(e) => return Some(Err(e)),
            }
        }

        if batch.is_empty() {
            None
        } else {
            Some(Ok(batch))
        }
    }
}
