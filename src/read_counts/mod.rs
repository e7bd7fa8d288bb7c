use anyhow::{Context, Result};
use flate2::{write::GzEncoder, Compression};
use humantime::format_duration;
use log::info;
use methylome::calls::CallCounts;
use rust_htslib::bam::{self, Record};
use std::{
    fs::File,
    io::{BufWriter, Write},
    time::Instant,
};

use crate::{
    data::bam::{methylation_calls, read_name},
    utils::prepare_output,
};

pub mod args;

pub use args::ReadCountsArgs;

pub const READ_COUNTS_FILE_SUFFIX: &str = ".tab.gz";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadCountSummary {
    pub written: u64,
    /// Unmapped records, which carry no methylation calls.
    pub unmapped: u64,
}

/// Writes one line of call counts per mapped read.
pub fn write_read_counts<R: bam::Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    trim_start: usize,
    trim_end: usize,
) -> Result<ReadCountSummary> {
    let mut record = Record::new();
    let mut summary = ReadCountSummary::default();

    while let Some(result) = reader.read(&mut record) {
        result.context("Failed to read alignment record")?;
        if record.is_unmapped() {
            summary.unmapped += 1;
            continue;
        }

        let name = read_name(&record);
        let calls = methylation_calls(&record)?;
        let counts = CallCounts::from_calls(&calls, trim_start, trim_end)
            .with_context(|| format!("Invalid methylation calls in read '{}'", name))?;

        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            name,
            counts.methylated_cpg,
            counts.unmethylated_cpg,
            counts.methylated_other,
            counts.unmethylated_other,
            counts.not_c,
            counts.total()
        )?;
        summary.written += 1;
    }
    Ok(summary)
}

pub fn extract_read_counts(args: ReadCountsArgs) -> Result<()> {
    info!(
        "Running methpairs 'read-counts' (trimming {} bases at the start and {} at the end)",
        args.trim_start, args.trim_end
    );

    let outpath = prepare_output(&args.output, READ_COUNTS_FILE_SUFFIX)?;
    let mut reader = bam::Reader::from_path(&args.bam)
        .with_context(|| format!("Failed to open alignments at: '{}'", args.bam))?;

    let outfile = File::create(&outpath)
        .with_context(|| format!("Failed to create file at: {:?}", outpath))?;
    let mut encoder = GzEncoder::new(BufWriter::new(outfile), Compression::default());

    let duration = Instant::now();
    let summary = write_read_counts(&mut reader, &mut encoder, args.trim_start, args.trim_end)?;
    encoder.finish()?.flush()?;

    info!(
        "Wrote call counts for {} reads to {:?} in {}",
        summary.written,
        outpath,
        format_duration(duration.elapsed())
    );
    info!("Skipped {} unmapped reads", summary.unmapped);
    Ok(())
}
