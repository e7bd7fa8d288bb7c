use clap::Parser;

#[derive(Parser, Debug)]
pub struct ReadCountsArgs {
    #[arg(
        short,
        long,
        required = true,
        help = "Aligned reads (BAM or SAM) carrying Bismark XM methylation call tags."
    )]
    pub bam: String,

    #[arg(short, long, required = true, help = "Prefix for the output file of counts per read.")]
    pub output: String,

    #[arg(
        long,
        default_value_t = 0,
        help = "Number of bases to ignore at the start of each read."
    )]
    pub trim_start: usize,

    #[arg(
        long,
        default_value_t = 0,
        help = "Number of bases to ignore at the end of each read."
    )]
    pub trim_end: usize,
}
