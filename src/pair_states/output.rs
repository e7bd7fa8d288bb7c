use anyhow::Result;
use methylome::{JointState, PairCatalog, TallyTable};
use std::io::Write;

pub const PAIR_STATES_FILE_SUFFIX: &str = "CpG_pair_states.txt";

/// Writes the header and one row per pair with at least `min_coverage`
/// valid observations. Returns the number of rows written.
pub fn write_pair_states<W: Write>(
    writer: &mut W,
    catalog: &PairCatalog,
    table: &TallyTable,
    min_coverage: u32,
) -> Result<usize> {
    let states: Vec<&str> = JointState::ALL.iter().map(JointState::label).collect();
    writeln!(writer, "chr\tcpg1\tcpg2\t{}", states.join("\t"))?;

    let mut rows = 0;
    for (id, pair) in catalog.iter() {
        let Some(tally) = table.get(id) else {
            continue;
        };
        if tally.total() < min_coverage {
            continue;
        }

        let [both, first_only, second_only, neither] = tally.counts();
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            pair.chrom, pair.cpg1, pair.cpg2, both, first_only, second_only, neither
        )?;
        rows += 1;
    }

    Ok(rows)
}
