use anyhow::{Context, Result};
use humantime::format_duration;
use log::info;
use methylome::adjacency::AdjacencyScanner;
use std::{
    fs::File,
    io::{BufRead, BufWriter, Write},
    time::Instant,
};

use crate::{
    data::{bedgraph::BedGraphReader, open_text},
    utils::prepare_output,
};

pub mod args;

pub use args::AdjacentPairsArgs;

pub const ADJACENT_PAIRS_FILE_SUFFIX: &str = ".bed";

/// Writes one `chrom cpg1 cpg2` line per adjacent pair found in a bedGraph
/// and returns the number of pairs written.
pub fn write_adjacent_pairs<R: BufRead, W: Write>(
    input: R,
    writer: &mut W,
    scanner: &mut AdjacencyScanner,
    tab_separated: bool,
) -> Result<usize> {
    let mut num_pairs = 0;
    for site in BedGraphReader::new(input, tab_separated) {
        if let Some(pair) = scanner.push(&site?)? {
            writeln!(writer, "{}\t{}\t{}", pair.chrom, pair.cpg1, pair.cpg2)?;
            num_pairs += 1;
        }
    }
    Ok(num_pairs)
}

pub fn extract_adjacent_pairs(args: AdjacentPairsArgs) -> Result<()> {
    info!(
        "Running methpairs 'adjacent-pairs' with a maximum distance of {}",
        args.max_distance
    );

    let outpath = prepare_output(&args.output, ADJACENT_PAIRS_FILE_SUFFIX)?;
    let input = open_text(&args.input)?;

    let outfile = File::create(&outpath)
        .with_context(|| format!("Failed to create file at: {:?}", outpath))?;
    let mut writer = BufWriter::new(outfile);
    let mut scanner = AdjacencyScanner::new(args.max_distance, args.min_site_coverage);

    let duration = Instant::now();
    let num_pairs = write_adjacent_pairs(input, &mut writer, &mut scanner, args.tab_separated)
        .with_context(|| format!("Error reading CpG sites from: '{}'", args.input))?;
    writer.flush()?;

    info!(
        "Wrote {} CpG pairs to {:?} in {}",
        num_pairs,
        outpath,
        format_duration(duration.elapsed())
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_write_adjacent_pairs() -> Result<()> {
        let data = "track type=bedGraph\n\
                    chr1\t100\t102\t100\t2\t0\n\
                    chr1\t104\t106\t50\t1\t1\n\
                    chr1\t105\t107\t0\t0\t4\n\
                    chr1\t400\t402\t0\t0\t4\n\
                    chr2\t10\t12\t100\t3\t0\n\
                    chr2\t20\t22\t100\t3\t0\n";
        let mut out = Vec::new();
        let mut scanner = AdjacencyScanner::new(200, 0);

        let num_pairs = write_adjacent_pairs(Cursor::new(data), &mut out, &mut scanner, false)?;

        assert_eq!(num_pairs, 2);
        assert_eq!(
            String::from_utf8(out)?,
            "chr1\t100\t106\nchr2\t10\t22\n"
        );
        Ok(())
    }

    #[test]
    fn test_unsorted_input_fails() {
        let data = "chr1\t100\t102\t100\t2\t0\nchr1\t50\t52\t100\t2\t0\n";
        let mut out = Vec::new();
        let mut scanner = AdjacencyScanner::new(200, 0);

        let result = write_adjacent_pairs(Cursor::new(data), &mut out, &mut scanner, false);
        assert!(result.is_err());
    }

    #[test]
    fn test_space_separated_pileometh_output() -> Result<()> {
        let data = "track type=\"bedGraph\" description=\"sample CpG merged methylation levels\"\n\
                    chr1 105 107 50 1 1\n\
                    chr1 107 109 100 2 0\n";
        let mut out = Vec::new();
        let mut scanner = AdjacencyScanner::new(200, 0);

        let num_pairs = write_adjacent_pairs(Cursor::new(data), &mut out, &mut scanner, false)?;

        assert_eq!(num_pairs, 1);
        assert_eq!(String::from_utf8(out)?, "chr1\t105\t109\n");
        Ok(())
    }
}
