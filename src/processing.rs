use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use methylome::{AggregationStats, AlignedRead, Aggregator, TallyTable};
use rayon::prelude::*;

/// Folds a slice of reads into a fresh table.
fn aggregate_chunk(
    aggregator: &Aggregator,
    reads: &[AlignedRead],
) -> Result<(TallyTable, AggregationStats)> {
    let mut table = aggregator.new_table();
    let mut stats = AggregationStats::default();
    for read in reads {
        aggregator.process_read(read, &mut table, &mut stats)?;
    }
    Ok((table, stats))
}

/// Runs every batch of reads through the aggregator.
///
/// With more than one thread each batch is split into one chunk per thread;
/// chunks fill private tables that are summed into the run table.
pub fn calculate_pair_states<I>(
    aggregator: &Aggregator,
    batches: I,
    num_threads: usize,
) -> Result<(TallyTable, AggregationStats)>
where
    I: IntoIterator<Item = Result<Vec<AlignedRead>>>,
{
    let pool = if num_threads > 1 {
        Some(
            rayon::ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .build()
                .context("Could not initialize threadpool")?,
        )
    } else {
        None
    };

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] {human_pos} reads processed ({per_sec})",
        )
        .context("Invalid progress bar template")?,
    );

    let mut table = aggregator.new_table();
    let mut stats = AggregationStats::default();

    for (batch_number, batch) in batches.into_iter().enumerate() {
        let reads = batch?;
        debug!("Processing batch {} with {} reads", batch_number + 1, reads.len());

        match &pool {
            Some(pool) => {
                let chunk_size = reads.len().div_ceil(num_threads).max(1);
                let (batch_table, batch_stats) = pool.install(|| {
                    reads
                        .par_chunks(chunk_size)
                        .map(|chunk| aggregate_chunk(aggregator, chunk))
                        .try_reduce(
                            || (aggregator.new_table(), AggregationStats::default()),
                            |(mut table_a, mut stats_a), (table_b, stats_b)| {
                                table_a.merge(&table_b)?;
                                stats_a.merge(&stats_b);
                                Ok((table_a, stats_a))
                            },
                        )
                })?;
                table.merge(&batch_table)?;
                stats.merge(&batch_stats);
            }
            None => {
                for read in &reads {
                    aggregator.process_read(read, &mut table, &mut stats)?;
                }
            }
        }

        pb.inc(reads.len() as u64);
    }

    pb.finish_with_message("Finished processing all reads.");

    Ok((table, stats))
}
