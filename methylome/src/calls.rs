use anyhow::{bail, Result};

/// Methylated cytosine in CpG context.
pub const METHYLATED_CPG: u8 = b'Z';
/// Unmethylated cytosine in CpG context.
pub const UNMETHYLATED_CPG: u8 = b'z';
/// Position that is not a cytosine.
pub const NOT_A_CALL: u8 = b'.';
/// Reference position the read does not cover (deletion or splice gap).
pub const UNCALLED: u8 = b'_';

/// Per-read tally of the Bismark `XM` methylation call alphabet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub methylated_cpg: u32,
    pub unmethylated_cpg: u32,
    pub methylated_other: u32,
    pub unmethylated_other: u32,
    pub not_c: u32,
}

impl CallCounts {
    /// Counts the calls of a read-frame call string, ignoring `trim_start`
    /// symbols at the beginning and `trim_end` symbols at the end.
    ///
    /// Fails on any symbol outside `Z z X x H h U u .`.
    pub fn from_calls(calls: &[u8], trim_start: usize, trim_end: usize) -> Result<Self> {
        let end = calls.len().saturating_sub(trim_end);
        let start = trim_start.min(end);

        let mut counts = Self::default();
        for &call in &calls[start..end] {
            match call {
                METHYLATED_CPG => counts.methylated_cpg += 1,
                UNMETHYLATED_CPG => counts.unmethylated_cpg += 1,
                b'X' | b'H' | b'U' => counts.methylated_other += 1,
                b'x' | b'h' | b'u' => counts.unmethylated_other += 1,
                NOT_A_CALL => counts.not_c += 1,
                other => bail!(
                    "Unexpected methylation call '{}' in call string",
                    other as char
                ),
            }
        }
        Ok(counts)
    }

    pub fn total(&self) -> u32 {
        self.methylated_cpg
            + self.unmethylated_cpg
            + self.methylated_other
            + self.unmethylated_other
            + self.not_c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_calls() -> Result<()> {
        let counts = CallCounts::from_calls(b"Z.z.XxHhUu..Z", 0, 0)?;
        assert_eq!(
            counts,
            CallCounts {
                methylated_cpg: 2,
                unmethylated_cpg: 1,
                methylated_other: 3,
                unmethylated_other: 3,
                not_c: 4,
            }
        );
        assert_eq!(counts.total(), 13);
        Ok(())
    }

    #[test]
    fn test_trimmed_counts() -> Result<()> {
        let counts = CallCounts::from_calls(b"ZZz..zz", 2, 2)?;
        assert_eq!(counts.methylated_cpg, 0);
        assert_eq!(counts.unmethylated_cpg, 1);
        assert_eq!(counts.not_c, 2);
        assert_eq!(counts.total(), 3);
        Ok(())
    }

    #[test]
    fn test_trim_longer_than_read() -> Result<()> {
        let counts = CallCounts::from_calls(b"Zz", 3, 4)?;
        assert_eq!(counts.total(), 0);
        Ok(())
    }

    #[test]
    fn test_unknown_symbol() {
        let result = CallCounts::from_calls(b"Z.N", 0, 0);
        assert_eq!(
            result.unwrap_err().to_string(),
            "Unexpected methylation call 'N' in call string"
        );
    }
}
