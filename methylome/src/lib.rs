pub mod adjacency;
pub mod aggregate;
pub mod calls;
pub mod cigar;
pub mod locate;
pub mod read;
pub mod remap;
pub mod site_pair;
pub mod strand;
pub mod tally;

pub use aggregate::{AggregationStats, Aggregator, InvalidStatePolicy};
pub use cigar::{CigarKind, CigarOp};
pub use locate::{PairLocator, ReadPairIndex};
pub use read::AlignedRead;
pub use site_pair::{JointState, PairCatalog, PairId, SitePair};
pub use strand::Strand;
pub use tally::{PairTally, TallyTable};
