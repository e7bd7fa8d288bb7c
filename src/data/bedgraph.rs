use anyhow::{Context, Result};
use csv::StringRecord;
use methylome::adjacency::CpgSite;
use std::io::BufRead;

/// Iterates the CpG sites of a bedGraph, skipping `track` and `browser`
/// header lines.
///
/// Columns are split on any run of whitespace unless `tab_separated` is set,
/// in which case only tabs separate columns.
pub struct BedGraphReader<R> {
    reader: R,
    tab_separated: bool,
    line: String,
    line_number: u64,
    record: StringRecord,
}

impl<R: BufRead> BedGraphReader<R> {
    pub fn new(reader: R, tab_separated: bool) -> Self {
        Self {
            reader,
            tab_separated,
            line: String::new(),
            line_number: 0,
            record: StringRecord::new(),
        }
    }

    fn fill_record(&mut self) {
        let line = self.line.trim_end_matches(['\n', '\r']);
        self.record.clear();
        if self.tab_separated {
            line.split('\t').for_each(|field| self.record.push_field(field));
        } else {
            line.split_whitespace()
                .for_each(|field| self.record.push_field(field));
        }
    }
}

impl<R: BufRead> Iterator for BedGraphReader<R> {
    type Item = Result<CpgSite>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.line.clear();
            self.line_number += 1;
            match self.reader.read_line(&mut self.line) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => {
                    let line = self.line_number;
                    return Some(
                        Err(e).with_context(|| format!("Failed to read bedGraph line {}", line)),
                    );
                }
            }

            self.fill_record();
            let first = self.record.get(0).unwrap_or_default();
            if first.starts_with("track") || first.starts_with("browser") || first.is_empty() {
                continue;
            }

            let line = self.line_number;
            return Some(
                self.record
                    .deserialize::<CpgSite>(None)
                    .with_context(|| format!("Invalid CpG record at bedGraph line {}", line)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_bedgraph() -> Result<()> {
        let data = "track type=\"bedGraph\" description=\"sample CpG methylation levels\"\n\
                    chr1\t100\t102\t50\t1\t1\n\
                    chr1\t105\t107\t100\t3\t0\n";
        let sites: Vec<CpgSite> =
            BedGraphReader::new(Cursor::new(data), false).collect::<Result<_>>()?;

        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].chrom, "chr1");
        assert_eq!(sites[0].start, 100);
        assert_eq!(sites[0].end, 102);
        assert_eq!(sites[0].coverage(), 2);
        assert_eq!(sites[1].coverage(), 3);
        Ok(())
    }

    #[test]
    fn test_space_separated_bedgraph() -> Result<()> {
        let data = "track type=bedGraph\n\
                    chr1 105 107 50 1 1\n\
                    chr1  107\t109   100 2 0\r\n";
        let sites: Vec<CpgSite> =
            BedGraphReader::new(Cursor::new(data), false).collect::<Result<_>>()?;

        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].start, 105);
        assert_eq!(sites[0].coverage(), 2);
        assert_eq!(sites[1].start, 107);
        assert_eq!(sites[1].end, 109);
        assert_eq!(sites[1].n_methylated, 2);
        Ok(())
    }

    #[test]
    fn test_tab_separated_keeps_spaces_in_fields() {
        let data = "chr1\t100\t102\t50\t1\t1\nchr1 105 107 50 1 1\n";
        let result: Result<Vec<CpgSite>> = BedGraphReader::new(Cursor::new(data), true).collect();
        assert_eq!(
            result.unwrap_err().to_string(),
            "Invalid CpG record at bedGraph line 2"
        );
    }

    #[test]
    fn test_missing_columns() {
        let data = "track name=cpgs\nchr1\t100\t102\t50\n";
        let result: Result<Vec<CpgSite>> = BedGraphReader::new(Cursor::new(data), false).collect();
        assert_eq!(
            result.unwrap_err().to_string(),
            "Invalid CpG record at bedGraph line 2"
        );
    }
}
