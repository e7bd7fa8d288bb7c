use clap::Parser;

#[derive(Parser, Debug)]
pub struct AdjacentPairsArgs {
    #[arg(
        short,
        long,
        required = true,
        help = "Merged-context CpG bedGraph (chrom, start, end, percent, n_methylated, n_unmethylated), optionally gzipped."
    )]
    pub input: String,

    #[arg(short, long, required = true, help = "Prefix for the output file (list of CpG pairs).")]
    pub output: String,

    #[arg(
        short = 'd',
        long,
        default_value_t = 200,
        help = "Maximum distance between adjacent CpGs; usually the maximum read length."
    )]
    pub max_distance: u64,

    #[arg(
        long,
        default_value_t = 0,
        help = "Ignore CpG sites covered by fewer reads."
    )]
    pub min_site_coverage: u32,

    #[arg(
        long,
        default_value_t = false,
        help = "Columns are separated by tabs only. By default any whitespace separates columns."
    )]
    pub tab_separated: bool,
}
