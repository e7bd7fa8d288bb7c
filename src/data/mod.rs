pub mod bam;
pub mod bedgraph;

use anyhow::{Context, Result};
use flate2::bufread::MultiGzDecoder;
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

/// Opens a text file for buffered reading, decompressing `.gz` files.
pub fn open_text<P: AsRef<Path>>(path: P) -> Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Failed to open file at: {:?}", path))?;
    let reader = BufReader::new(file);

    let is_gzip = path
        .extension()
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    if is_gzip {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(reader))))
    } else {
        Ok(Box::new(reader))
    }
}

/// Tab-separated, headerless reader used for every tabular input.
pub fn tsv_reader<R: BufRead>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b'\t')
        .flexible(true)
        .quoting(false)
        .from_reader(reader)
}
