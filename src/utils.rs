use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

/// Joins an output prefix and a file suffix, creating the parent directory.
pub fn prepare_output(prefix: &str, suffix: &str) -> Result<PathBuf> {
    let outpath = PathBuf::from(format!("{}{}", prefix, suffix));
    if let Some(parent) = outpath.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Could not create parent directory: {:?}", parent))?;
        }
    }
    Ok(outpath)
}
