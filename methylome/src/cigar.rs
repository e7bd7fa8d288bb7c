use anyhow::{bail, Context, Result};

/// How a CIGAR operation moves through the read and reference frames.
///
/// Hard clips and padding consume neither frame and are never stored as a
/// `CigarOp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CigarKind {
    /// `M`, `=`, `X`
    ConsumesBoth,
    /// `D`, `N`
    ReferenceOnly,
    /// `I`, `S`
    ReadOnly,
}

impl CigarKind {
    /// Classifies a SAM operation character. Returns `Ok(None)` for `H` and `P`.
    pub fn from_op_char(op: char) -> Result<Option<Self>> {
        match op {
            'M' | '=' | 'X' => Ok(Some(CigarKind::ConsumesBoth)),
            'D' | 'N' => Ok(Some(CigarKind::ReferenceOnly)),
            'I' | 'S' => Ok(Some(CigarKind::ReadOnly)),
            'H' | 'P' => Ok(None),
            _ => bail!("Unsupported CIGAR operation: {}", op),
        }
    }

    pub fn consumes_read(&self) -> bool {
        matches!(self, CigarKind::ConsumesBoth | CigarKind::ReadOnly)
    }

    pub fn consumes_reference(&self) -> bool {
        matches!(self, CigarKind::ConsumesBoth | CigarKind::ReferenceOnly)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CigarOp {
    pub kind: CigarKind,
    pub len: u32,
}

impl CigarOp {
    pub fn new(kind: CigarKind, len: u32) -> Self {
        Self { kind, len }
    }
}

/// Parses a SAM CIGAR string such as `10M2D8M`.
///
/// `*` yields an empty operation list. Hard clips and padding are dropped.
pub fn parse_cigar(cigar: &str) -> Result<Vec<CigarOp>> {
    if cigar == "*" {
        return Ok(Vec::new());
    }

    let mut ops = Vec::new();
    let mut num_start = 0;

    for (i, c) in cigar.char_indices() {
        if c.is_ascii_digit() {
            continue;
        }
        let len_str = &cigar[num_start..i];
        let len: u32 = len_str.parse().with_context(|| {
            format!("Invalid operation length '{}' in CIGAR '{}'", len_str, cigar)
        })?;
        if let Some(kind) = CigarKind::from_op_char(c)? {
            ops.push(CigarOp::new(kind, len));
        }
        num_start = i + c.len_utf8();
    }

    if num_start != cigar.len() {
        bail!("CIGAR '{}' ends without an operation", cigar);
    }

    Ok(ops)
}

/// Number of read bases described by the operations.
pub fn read_len(ops: &[CigarOp]) -> usize {
    ops.iter()
        .filter(|op| op.kind.consumes_read())
        .map(|op| op.len as usize)
        .sum()
}

/// Number of reference bases spanned by the operations.
pub fn reference_len(ops: &[CigarOp]) -> usize {
    ops.iter()
        .filter(|op| op.kind.consumes_reference())
        .map(|op| op.len as usize)
        .sum()
}
