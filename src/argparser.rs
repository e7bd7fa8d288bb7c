use clap::{Parser, Subcommand};

use crate::{
    adjacent_pairs::AdjacentPairsArgs, pair_states::PairStatesArgs, read_counts::ReadCountsArgs,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Count joint methylation states of CpG pairs across aligned reads.
    PairStates(PairStatesArgs),
    /// Build the list of adjacent CpG pairs from a CpG bedGraph.
    AdjacentPairs(AdjacentPairsArgs),
    /// Count methylation calls per read.
    ReadCounts(ReadCountsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{error::ErrorKind, CommandFactory};

    fn try_parse(cmd: &str) -> Result<Args, clap::Error> {
        Args::try_parse_from(cmd.split_whitespace())
    }

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_pair_states_defaults() {
        let args = try_parse("methpairs pair-states -b reads.bam -p pairs.bed -o out/sample_").unwrap();
        let Commands::PairStates(args) = args.command else {
            panic!("expected pair-states");
        };
        assert_eq!(args.bam, "reads.bam");
        assert_eq!(args.pairs.as_deref(), Some("pairs.bed"));
        assert_eq!(args.read_pairs, None);
        assert_eq!(args.min_map_qual, 0);
        assert_eq!(args.min_coverage, 0);
        assert!(!args.strict);
        assert_eq!(args.threads, 1);
    }

    #[test]
    fn test_pair_states_needs_one_pair_source() {
        let missing = try_parse("methpairs pair-states -b reads.bam -o out_");
        assert_eq!(
            missing.unwrap_err().kind(),
            ErrorKind::MissingRequiredArgument
        );

        let both = try_parse("methpairs pair-states -b reads.bam -p a.bed -r b.txt -o out_");
        assert_eq!(both.unwrap_err().kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_adjacent_pairs_args() {
        let args = try_parse("methpairs adjacent-pairs -i cpgs.bedGraph -o pairs -d 150").unwrap();
        let Commands::AdjacentPairs(args) = args.command else {
            panic!("expected adjacent-pairs");
        };
        assert_eq!(args.max_distance, 150);
        assert_eq!(args.min_site_coverage, 0);
        assert!(!args.tab_separated);
    }

    #[test]
    fn test_no_subcommand() {
        let result = try_parse("methpairs");
        assert_eq!(
            result.unwrap_err().kind(),
            ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        );
    }
}
