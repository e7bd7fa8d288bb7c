use anyhow::Result;
use clap::Parser;
use humantime::format_duration;
use log::info;
use std::time::Instant;

mod adjacent_pairs;
mod argparser;
mod data;
mod data_load;
mod pair_states;
mod processing;
mod read_counts;
mod utils;

use argparser::{Args, Commands};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let total_duration = Instant::now();
    match args.command {
        Commands::PairStates(pair_states_args) => {
            pair_states::extract_pair_states(pair_states_args)?;
        }
        Commands::AdjacentPairs(adjacent_pairs_args) => {
            adjacent_pairs::extract_adjacent_pairs(adjacent_pairs_args)?;
        }
        Commands::ReadCounts(read_counts_args) => {
            read_counts::extract_read_counts(read_counts_args)?;
        }
    }

    info!(
        "Total time elapsed: {}",
        format_duration(total_duration.elapsed())
    );
    Ok(())
}
