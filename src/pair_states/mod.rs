use anyhow::{Context, Result};
use bytesize::ByteSize;
use humantime::format_duration;
use log::{info, warn};
use methylome::{Aggregator, InvalidStatePolicy, PairLocator};
use rust_htslib::bam::{self, Read};
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    time::Instant,
};

use crate::{
    data::bam::{contig_names, BatchLoader},
    data_load::{load_pair_catalog, load_read_pairs},
    processing::calculate_pair_states,
    utils::prepare_output,
};

pub mod args;
pub mod output;

pub use args::PairStatesArgs;
use output::{write_pair_states, PAIR_STATES_FILE_SUFFIX};

pub fn extract_pair_states(args: PairStatesArgs) -> Result<()> {
    info!(
        "Running methpairs 'pair-states' with {} threads",
        &args.threads
    );

    let outpath = prepare_output(&args.output, PAIR_STATES_FILE_SUFFIX)?;

    let policy = if args.strict {
        InvalidStatePolicy::Abort
    } else {
        InvalidStatePolicy::Warn
    };

    let locator = match (&args.pairs, &args.read_pairs) {
        (_, Some(read_pairs)) => {
            info!("Loading read-indexed CpG pairs");
            let (catalog, index) = load_read_pairs(read_pairs)?;
            PairLocator::indexed(catalog, index, args.min_map_qual)
        }
        (Some(pairs), None) => {
            info!("Loading CpG pairs");
            let catalog = load_pair_catalog(pairs)?;
            PairLocator::geometric(catalog, args.min_map_qual)
        }
        (None, None) => anyhow::bail!("No CpG pairs provided. Use --pairs or --read-pairs."),
    };

    if locator.catalog().is_empty() {
        warn!("No CpG pairs loaded; the output will only contain a header.");
    }
    let aggregator = Aggregator::new(locator, policy);

    let reader = bam::Reader::from_path(&args.bam)
        .with_context(|| format!("Failed to open alignments at: '{}'", args.bam))?;
    if let Ok(metadata) = fs::metadata(&args.bam) {
        info!(
            "Processing alignments from '{}' ({})",
            args.bam,
            ByteSize::b(metadata.len())
        );
    }
    let contigs = contig_names(reader.header());
    let mut batch_loader = BatchLoader::new(reader, contigs, args.batch_size);

    let duration = Instant::now();
    let (table, stats) = calculate_pair_states(&aggregator, &mut batch_loader, args.threads)?;
    info!(
        "Counting pair states took: {}",
        format_duration(duration.elapsed())
    );
    info!(
        "Reads: {} mapped ({} unmapped skipped), {} overlapping at least one pair",
        stats.reads_seen,
        batch_loader.unmapped(),
        stats.reads_used
    );
    info!(
        "Pair observations: {} located, {} counted, {} skipped",
        stats.located, stats.valid, stats.skipped
    );

    let outfile = File::create(&outpath)
        .with_context(|| format!("Failed to create file at: {:?}", outpath))?;
    let mut writer = BufWriter::new(outfile);
    let rows = write_pair_states(
        &mut writer,
        aggregator.catalog(),
        &table,
        args.min_coverage,
    )?;
    writer.flush()?;

    info!("Wrote {} CpG pairs to {:?}", rows, outpath);
    Ok(())
}
