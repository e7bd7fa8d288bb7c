use std::fmt::Display;

/// Orientation of an aligned read relative to the reference.
#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum Strand {
    Positive,
    Negative,
}

impl Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            Strand::Positive => '+',
            Strand::Negative => '-',
        };
        write!(f, "{}", symbol)
    }
}

impl Strand {
    /// Maps the SAM reverse-complement flag onto a strand.
    pub fn from_is_reverse(is_reverse: bool) -> Self {
        if is_reverse {
            Strand::Negative
        } else {
            Strand::Positive
        }
    }

    /// Distance from the start of a CpG to the base carrying its call.
    ///
    /// Bisulfite calls of reverse strand reads sit on the G of the CpG.
    pub fn cytosine_shift(&self) -> u64 {
        match self {
            Strand::Positive => 0,
            Strand::Negative => 1,
        }
    }
}
