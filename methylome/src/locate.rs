use ahash::AHashMap;

use crate::{
    read::AlignedRead,
    site_pair::{PairCatalog, PairId},
};

/// Chooses which catalogue pairs a read may report on.
pub trait PairSelection {
    fn candidates(&self, read: &AlignedRead) -> Vec<PairId>;
}

/// Per-chromosome pairs sorted by first position, queried by binary search
/// for pairs fully contained in a read's reference span.
#[derive(Debug, Default)]
pub struct GeometricIndex {
    by_chrom: AHashMap<String, Vec<(u64, u64, PairId)>>,
}

impl GeometricIndex {
    pub fn new(catalog: &PairCatalog) -> Self {
        let mut by_chrom: AHashMap<String, Vec<(u64, u64, PairId)>> = AHashMap::new();
        for (id, pair) in catalog.iter() {
            by_chrom
                .entry(pair.chrom.clone())
                .or_default()
                .push((pair.cpg1, pair.cpg2, id));
        }
        for entries in by_chrom.values_mut() {
            entries.sort_unstable();
        }
        Self { by_chrom }
    }
}

impl PairSelection for GeometricIndex {
    fn candidates(&self, read: &AlignedRead) -> Vec<PairId> {
        let Some(entries) = self.by_chrom.get(&read.contig) else {
            return Vec::new();
        };

        let first = entries.partition_point(|&(cpg1, _, _)| cpg1 < read.start);
        entries[first..]
            .iter()
            .take_while(|&&(cpg1, _, _)| cpg1 < read.end)
            .filter(|&&(_, cpg2, _)| cpg2 <= read.end)
            .map(|&(_, _, id)| id)
            .collect()
    }
}

/// Pairs assigned to reads by name, typically from an external interval
/// intersection.
#[derive(Debug, Default)]
pub struct ReadPairIndex {
    pairs_by_read: AHashMap<String, Vec<PairId>>,
}

impl ReadPairIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns a pair to a read. Lines for one read do not need to be adjacent.
    pub fn insert(&mut self, read_name: String, id: PairId) {
        let ids = self.pairs_by_read.entry(read_name).or_default();
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    pub fn num_reads(&self) -> usize {
        self.pairs_by_read.len()
    }
}

impl PairSelection for ReadPairIndex {
    fn candidates(&self, read: &AlignedRead) -> Vec<PairId> {
        self.pairs_by_read
            .get(&read.name)
            .cloned()
            .unwrap_or_default()
    }
}

/// A pair selected for a read together with the offsets of its two calls in
/// the read's reference-frame call string. `offsets` is `None` when the pair
/// cannot be placed on the read at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatedPair {
    pub pair: PairId,
    pub offsets: Option<(usize, usize)>,
}

pub struct PairLocator {
    catalog: PairCatalog,
    selection: Box<dyn PairSelection + Send + Sync>,
    min_mapq: u8,
}

impl PairLocator {
    pub fn new(
        catalog: PairCatalog,
        selection: Box<dyn PairSelection + Send + Sync>,
        min_mapq: u8,
    ) -> Self {
        Self {
            catalog,
            selection,
            min_mapq,
        }
    }

    /// Locates pairs by containment in the read's reference span.
    pub fn geometric(catalog: PairCatalog, min_mapq: u8) -> Self {
        let index = GeometricIndex::new(&catalog);
        Self::new(catalog, Box::new(index), min_mapq)
    }

    /// Locates pairs by read name.
    pub fn indexed(catalog: PairCatalog, index: ReadPairIndex, min_mapq: u8) -> Self {
        Self::new(catalog, Box::new(index), min_mapq)
    }

    pub fn catalog(&self) -> &PairCatalog {
        &self.catalog
    }

    pub fn locate(&self, read: &AlignedRead) -> Vec<LocatedPair> {
        if read.mapq < self.min_mapq {
            return Vec::new();
        }

        self.selection
            .candidates(read)
            .into_iter()
            .filter_map(|id| {
                let pair = self.catalog.get(id)?;
                let offsets = if pair.chrom == read.contig {
                    pair.call_offsets(read.start, read.strand)
                } else {
                    None
                };
                Some(LocatedPair { pair: id, offsets })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{cigar::parse_cigar, site_pair::SitePair, strand::Strand};

    fn read(name: &str, contig: &str, start: u64, cigar: &str, strand: Strand, mapq: u8) -> AlignedRead {
        let ops = parse_cigar(cigar).unwrap();
        let len = crate::cigar::read_len(&ops);
        AlignedRead::new(
            name.to_string(),
            contig.to_string(),
            start,
            strand,
            mapq,
            ops,
            vec![b'.'; len],
        )
    }

    fn catalog(pairs: &[(&str, u64, u64)]) -> PairCatalog {
        let mut catalog = PairCatalog::new();
        for &(chrom, cpg1, cpg2) in pairs {
            catalog.insert(SitePair::new(chrom.to_string(), cpg1, cpg2).unwrap());
        }
        catalog
    }

    #[test]
    fn test_geometric_matches_linear_scan() {
        let catalog = catalog(&[
            ("chr1", 95, 103),
            ("chr1", 100, 106),
            ("chr1", 105, 109),
            ("chr1", 112, 120),
            ("chr1", 115, 121),
            ("chr1", 130, 140),
            ("chr2", 105, 109),
        ]);
        let index = GeometricIndex::new(&catalog);

        for (start, cigar) in [(100, "20M"), (90, "5M10D20M"), (110, "11M"), (0, "50M")] {
            let r = read("R", "chr1", start, cigar, Strand::Positive, 60);
            let mut expected: Vec<PairId> = catalog
                .iter()
                .filter(|(_, p)| p.chrom == "chr1" && p.is_within(r.start, r.end))
                .map(|(id, _)| id)
                .collect();
            let mut found = index.candidates(&r);
            expected.sort();
            found.sort();
            assert_eq!(found, expected, "read at {} {}", start, cigar);
        }
    }

    #[test]
    fn test_geometric_unknown_contig() {
        let index = GeometricIndex::new(&catalog(&[("chr1", 105, 109)]));
        let r = read("R", "chrM", 100, "20M", Strand::Positive, 60);
        assert!(index.candidates(&r).is_empty());
    }

    #[test]
    fn test_locate_forward_and_reverse() {
        let locator = PairLocator::geometric(catalog(&[("chr1", 105, 109)]), 0);

        let fwd = read("R1", "chr1", 100, "20M", Strand::Positive, 60);
        assert_eq!(
            locator.locate(&fwd),
            vec![LocatedPair {
                pair: 0,
                offsets: Some((5, 7))
            }]
        );

        let rev = read("R2", "chr1", 100, "20M", Strand::Negative, 60);
        assert_eq!(
            locator.locate(&rev),
            vec![LocatedPair {
                pair: 0,
                offsets: Some((6, 8))
            }]
        );
    }

    #[test]
    fn test_min_mapq_excludes_read() {
        let pairs = [("chr1", 105, 109)];
        let geometric = PairLocator::geometric(catalog(&pairs), 30);

        let mut index = ReadPairIndex::new();
        index.insert("R1".to_string(), 0);
        let indexed = PairLocator::indexed(catalog(&pairs), index, 30);

        let low = read("R1", "chr1", 100, "20M", Strand::Positive, 29);
        assert!(geometric.locate(&low).is_empty());
        assert!(indexed.locate(&low).is_empty());

        let ok = read("R1", "chr1", 100, "20M", Strand::Positive, 30);
        assert_eq!(geometric.locate(&ok).len(), 1);
        assert_eq!(indexed.locate(&ok).len(), 1);
    }

    #[test]
    fn test_indexed_lookup() {
        let pairs = catalog(&[("chr1", 105, 109), ("chr1", 110, 116), ("chr2", 105, 109)]);
        let mut index = ReadPairIndex::new();
        index.insert("R1".to_string(), 0);
        index.insert("R2".to_string(), 1);
        index.insert("R1".to_string(), 2);
        index.insert("R1".to_string(), 0);
        assert_eq!(index.num_reads(), 2);

        let locator = PairLocator::indexed(pairs, index, 0);

        let r1 = read("R1", "chr1", 100, "20M", Strand::Positive, 60);
        assert_eq!(
            locator.locate(&r1),
            vec![
                LocatedPair {
                    pair: 0,
                    offsets: Some((5, 7))
                },
                LocatedPair {
                    pair: 2,
                    offsets: None
                },
            ]
        );

        let unknown = read("R9", "chr1", 100, "20M", Strand::Positive, 60);
        assert!(locator.locate(&unknown).is_empty());
    }
}
