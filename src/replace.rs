use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::debug;

use crate::config::resolve_pathbuf;
use crate::host::normalize_path;
use crate::matcher::is_vendored;
use crate::plugin::{LoadArgs, LoadResult, Plugin};

pub type ReplaceMap = HashMap<PathBuf, String>;

/// Parses `PATH=TEXT` and `PATH=@FILE` entries. Relative paths, including the
/// `@FILE` source, are resolved against `base`.
pub fn parse_replace_flags(flags: &[String], base: Option<&Path>) -> Result<ReplaceMap> {
    let mut out = ReplaceMap::new();
    for raw in flags {
        let (path, value) = raw
            .split_once('=')
            .ok_or_else(|| anyhow!("replace entry requires 'PATH=TEXT': {}", raw))?;
        let path = path.trim();
        if path.is_empty() {
            return Err(anyhow!("replace entry has an empty path: {}", raw));
        }
        let text = match value.strip_prefix('@') {
            Some(src) => {
                let src = resolve_pathbuf(base, src.trim());
                fs::read_to_string(&src).with_context(|| {
                    format!("failed to read replacement for {}: {}", path, src.display())
                })?
            }
            None => value.to_string(),
        };
        out.insert(normalize_path(&resolve_pathbuf(base, path)), text);
    }
    Ok(out)
}

/// Serves fixed contents for exact file paths.
pub struct ReplaceModules {
    map: ReplaceMap,
}

impl ReplaceModules {
    pub const NAME: &'static str = "replace-modules";

    pub fn new(map: ReplaceMap) -> Self {
        Self { map }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn replacement(&self, path: &Path) -> Option<&str> {
        if is_vendored(path) {
            return None;
        }
        self.map.get(path).map(String::as_str)
    }
}

#[async_trait]
impl Plugin for ReplaceModules {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn on_load(&self, args: &LoadArgs) -> Result<Option<LoadResult>> {
        if !args.is_file() {
            return Ok(None);
        }
        let path = Path::new(&args.path);
        Ok(self.replacement(path).map(|text| {
            debug!("{}: replacing {}", Self::NAME, path.display());
            LoadResult::new(text)
        }))
    }
}
