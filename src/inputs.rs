use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use glob::glob;

use crate::matcher::is_vendored;

/// Expands glob patterns into a sorted, de-duplicated list of files. Files
/// inside vendored trees are skipped.
pub fn expand_inputs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut out: BTreeSet<PathBuf> = BTreeSet::new();
    for pat in patterns {
        let mut matched = false;
        for path in glob(pat)
            .with_context(|| format!("bad glob pattern: {}", pat))?
            .flatten()
        {
            matched = true;
            if !path.is_file() || is_vendored(&path) {
                continue;
            }
            out.insert(path);
        }
        if !matched {
            bail!("no files match: {}", pat);
        }
    }
    Ok(out.into_iter().collect())
}
