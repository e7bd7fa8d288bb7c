use anyhow::{anyhow, Context, Result};
use csv::StringRecord;
use log::info;
use methylome::{PairCatalog, ReadPairIndex, SitePair};
use std::{io::BufRead, path::Path};

use crate::data::{open_text, tsv_reader};

fn parse_pair(record: &StringRecord, offset: usize, line: u64) -> Result<SitePair> {
    let chrom = record
        .get(offset)
        .ok_or_else(|| anyhow!("Missing chromosome at line {}", line))?
        .to_string();

    let cpg1_str = record
        .get(offset + 1)
        .ok_or_else(|| anyhow!("Missing cpg1 position at line {}", line))?;
    let cpg1: u64 = cpg1_str
        .parse()
        .with_context(|| format!("Invalid cpg1 position '{}' at line {}", cpg1_str, line))?;

    let cpg2_str = record
        .get(offset + 2)
        .ok_or_else(|| anyhow!("Missing cpg2 position at line {}", line))?;
    let cpg2: u64 = cpg2_str
        .parse()
        .with_context(|| format!("Invalid cpg2 position '{}' at line {}", cpg2_str, line))?;

    SitePair::new(chrom, cpg1, cpg2).with_context(|| format!("Invalid pair at line {}", line))
}

/// Reads a pair table with one `chr cpg1 cpg2` pair per line.
pub fn read_pair_catalog<R: BufRead>(reader: R) -> Result<PairCatalog> {
    let mut rdr = tsv_reader(reader);
    let mut record = StringRecord::new();
    let mut catalog = PairCatalog::new();

    while rdr.read_record(&mut record)? {
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        catalog.insert(parse_pair(&record, 0, line)?);
    }
    Ok(catalog)
}

/// Reads a read-indexed pair table with one `read chr cpg1 cpg2` entry per
/// line. Entries of one read may appear anywhere in the file.
pub fn read_read_pairs<R: BufRead>(reader: R) -> Result<(PairCatalog, ReadPairIndex)> {
    let mut rdr = tsv_reader(reader);
    let mut record = StringRecord::new();
    let mut catalog = PairCatalog::new();
    let mut index = ReadPairIndex::new();

    while rdr.read_record(&mut record)? {
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let read_name = record
            .get(0)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| anyhow!("Missing read name at line {}", line))?
            .to_string();
        let pair = parse_pair(&record, 1, line)?;

        let id = catalog.insert(pair);
        index.insert(read_name, id);
    }
    Ok((catalog, index))
}

pub fn load_pair_catalog<P: AsRef<Path>>(path: P) -> Result<PairCatalog> {
    let path = path.as_ref();
    let catalog = read_pair_catalog(open_text(path)?)
        .with_context(|| format!("Error loading CpG pairs from path: {:?}", path))?;
    info!("Loaded {} CpG pairs", catalog.len());
    Ok(catalog)
}

pub fn load_read_pairs<P: AsRef<Path>>(path: P) -> Result<(PairCatalog, ReadPairIndex)> {
    let path = path.as_ref();
    let (catalog, index) = read_read_pairs(open_text(path)?)
        .with_context(|| format!("Error loading read CpG pairs from path: {:?}", path))?;
    info!(
        "Loaded {} CpG pairs assigned to {} reads",
        catalog.len(),
        index.num_reads()
    );
    Ok((catalog, index))
}
