use clap::Parser;

#[derive(Parser, Debug)]
pub struct PairStatesArgs {
    #[arg(
        short,
        long,
        required = true,
        help = "Aligned reads (BAM or SAM) carrying Bismark XM methylation call tags."
    )]
    pub bam: String,

    #[arg(
        short,
        long,
        required_unless_present = "read_pairs",
        conflicts_with = "read_pairs",
        help = "CpG pairs to count, one per line: chr, cpg1, cpg2. Pairs are located by read coordinates."
    )]
    pub pairs: Option<String>,

    #[arg(
        short,
        long,
        help = "CpG pairs assigned to reads, one per line: read name, chr, cpg1, cpg2. Lines do not need to be sorted."
    )]
    pub read_pairs: Option<String>,

    #[arg(short, long, required = true, help = "Prefix for the output file.")]
    pub output: String,

    #[arg(
        long,
        default_value_t = 0,
        help = "Minimum mapping quality for a read to be counted."
    )]
    pub min_map_qual: u8,

    #[arg(
        long,
        default_value_t = 0,
        help = "Minimum number of valid observations for a pair to be reported."
    )]
    pub min_coverage: u32,

    #[arg(
        long,
        default_value_t = false,
        help = "Abort on the first pair without two CpG calls instead of warning and skipping it."
    )]
    pub strict: bool,

    #[arg(short, long, default_value_t = 1)]
    pub threads: usize,

    #[arg(
        long,
        default_value_t = 100_000,
        help = "Number of reads to load at a time. Lower number will use less memory."
    )]
    pub batch_size: usize,
}
