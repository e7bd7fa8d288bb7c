use ahash::AHashSet;
use anyhow::{bail, Result};
use serde::de::IgnoredAny;
use serde::Deserialize;

use crate::site_pair::SitePair;

/// One row of a merged-context CpG bedGraph
/// (`chrom start end percent n_methylated n_unmethylated`).
#[derive(Debug, Deserialize)]
pub struct CpgSite {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
    _percent: IgnoredAny,
    pub n_methylated: u32,
    pub n_unmethylated: u32,
}

impl CpgSite {
    pub fn new(chrom: String, start: u64, end: u64, n_methylated: u32, n_unmethylated: u32) -> Self {
        Self {
            chrom,
            start,
            end,
            _percent: IgnoredAny,
            n_methylated,
            n_unmethylated,
        }
    }

    pub fn coverage(&self) -> u32 {
        self.n_methylated + self.n_unmethylated
    }
}

/// Turns a position-sorted stream of CpG sites into pairs of neighbouring
/// sites at most `max_distance` apart.
///
/// A pair spans from the start of the earlier site to the end of the later
/// one. Sites closer than two bases are never paired.
pub struct AdjacencyScanner {
    max_distance: u64,
    min_site_coverage: u32,
    previous: Option<(String, u64)>,
    finished_chroms: AHashSet<String>,
}

impl AdjacencyScanner {
    pub fn new(max_distance: u64, min_site_coverage: u32) -> Self {
        Self {
            max_distance,
            min_site_coverage,
            previous: None,
            finished_chroms: AHashSet::new(),
        }
    }

    /// Feeds the next site and returns the pair it closes, if any.
    ///
    /// Fails when sites are out of order within a chromosome or a chromosome
    /// reappears after another one started.
    pub fn push(&mut self, site: &CpgSite) -> Result<Option<SitePair>> {
        if site.end <= site.start {
            bail!(
                "Invalid CpG site {}:{}-{}: end must be greater than start",
                site.chrom,
                site.start,
                site.end
            );
        }
        if site.coverage() < self.min_site_coverage {
            return Ok(None);
        }

        let pair = match self.previous.take() {
            Some((chrom, prev_start)) if chrom == site.chrom => {
                if site.start < prev_start {
                    bail!(
                        "CpG sites are not sorted: {}:{} follows {}:{}",
                        site.chrom,
                        site.start,
                        chrom,
                        prev_start
                    );
                }
                let distance = site.start - prev_start;
                if distance > 1 && distance <= self.max_distance {
                    Some(SitePair::new(chrom, prev_start, site.end)?)
                } else {
                    None
                }
            }
            Some((chrom, _)) => {
                if self.finished_chroms.contains(&site.chrom) {
                    bail!(
                        "CpG sites are not grouped by chromosome: '{}' appears again after '{}'",
                        site.chrom,
                        chrom
                    );
                }
                self.finished_chroms.insert(chrom);
                None
            }
            None => None,
        };

        self.previous = Some((site.chrom.clone(), site.start));
        Ok(pair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(chrom: &str, start: u64, coverage: u32) -> CpgSite {
        CpgSite::new(chrom.to_string(), start, start + 2, coverage, 0)
    }

    fn scan(scanner: &mut AdjacencyScanner, sites: &[CpgSite]) -> Result<Vec<SitePair>> {
        let mut pairs = Vec::new();
        for s in sites {
            if let Some(pair) = scanner.push(s)? {
                pairs.push(pair);
            }
        }
        Ok(pairs)
    }

    #[test]
    fn test_adjacent_pairs_within_distance() -> Result<()> {
        let mut scanner = AdjacencyScanner::new(10, 0);
        let sites = [
            site("chr1", 100, 5),
            site("chr1", 105, 5),
            site("chr1", 130, 5),
            site("chr1", 138, 5),
            site("chr2", 140, 5),
            site("chr2", 144, 5),
        ];
        let pairs = scan(&mut scanner, &sites)?;

        assert_eq!(
            pairs,
            vec![
                SitePair::new("chr1".to_string(), 100, 107)?,
                SitePair::new("chr1".to_string(), 130, 140)?,
                SitePair::new("chr2".to_string(), 140, 146)?,
            ]
        );
        Ok(())
    }

    #[test]
    fn test_distance_boundaries() -> Result<()> {
        let mut scanner = AdjacencyScanner::new(4, 0);
        let sites = [
            site("chr1", 10, 1),
            site("chr1", 11, 1),
            site("chr1", 15, 1),
            site("chr1", 20, 1),
        ];
        let pairs = scan(&mut scanner, &sites)?;

        // 10->11 is too close, 11->15 is exactly max distance, 15->20 too far.
        assert_eq!(pairs, vec![SitePair::new("chr1".to_string(), 11, 17)?]);
        Ok(())
    }

    #[test]
    fn test_low_coverage_sites_ignored() -> Result<()> {
        let mut scanner = AdjacencyScanner::new(200, 3);
        let sites = [site("chr1", 10, 5), site("chr1", 20, 1), site("chr1", 30, 4)];
        let pairs = scan(&mut scanner, &sites)?;

        assert_eq!(pairs, vec![SitePair::new("chr1".to_string(), 10, 32)?]);
        Ok(())
    }

    #[test]
    fn test_unsorted_sites_rejected() {
        let mut scanner = AdjacencyScanner::new(200, 0);
        let result = scan(&mut scanner, &[site("chr1", 50, 1), site("chr1", 40, 1)]);
        assert_eq!(
            result.unwrap_err().to_string(),
            "CpG sites are not sorted: chr1:40 follows chr1:50"
        );
    }

    #[test]
    fn test_chromosome_revisited_rejected() {
        let mut scanner = AdjacencyScanner::new(200, 0);
        let result = scan(
            &mut scanner,
            &[site("chr1", 10, 1), site("chr2", 10, 1), site("chr1", 20, 1)],
        );
        assert!(result.is_err());
    }
}
