use std::borrow::Cow;

use anyhow::{bail, Result};

use crate::{
    calls::UNCALLED,
    cigar::{read_len, reference_len, CigarKind, CigarOp},
};

/// Projects a read-frame call string onto the reference span of its alignment.
///
/// Matched bases keep their call, deleted or skipped reference bases are
/// filled with [`UNCALLED`], and inserted or soft-clipped bases are dropped.
/// The result has one symbol per reference base covered by the alignment.
///
/// When every operation consumes both frames the input is returned borrowed.
///
/// # Errors
/// Fails when the call string length differs from the number of read bases
/// described by the CIGAR operations.
pub fn remap_calls<'a>(calls: &'a [u8], ops: &[CigarOp]) -> Result<Cow<'a, [u8]>> {
    let expected = read_len(ops);
    if calls.len() != expected {
        bail!(
            "Call string length ({}) does not match the read length described by the CIGAR ({})",
            calls.len(),
            expected
        );
    }

    if ops.iter().all(|op| op.kind == CigarKind::ConsumesBoth) {
        return Ok(Cow::Borrowed(calls));
    }

    let mut remapped = Vec::with_capacity(reference_len(ops));
    let mut read_pos = 0;

    for op in ops {
        let len = op.len as usize;
        match op.kind {
            CigarKind::ConsumesBoth => {
                remapped.extend_from_slice(&calls[read_pos..read_pos + len]);
                read_pos += len;
            }
            CigarKind::ReferenceOnly => {
                remapped.resize(remapped.len() + len, UNCALLED);
            }
            CigarKind::ReadOnly => {
                read_pos += len;
            }
        }
    }

    Ok(Cow::Owned(remapped))
}
