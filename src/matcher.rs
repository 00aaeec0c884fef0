use std::path::{Component, Path};

use anyhow::{Context, Result};
use regex::Regex;

/// Directory name that marks third-party code.
pub const VENDOR_DIR: &str = "node_modules";

#[derive(Debug, Clone)]
pub enum Matcher {
    All,
    Nothing,
    Extensions(Vec<String>),
    Pattern(Regex),
}

impl Matcher {
    pub fn extensions<I, S>(exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let exts = exts
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_string())
            .filter(|e| !e.is_empty())
            .collect::<Vec<_>>();
        if exts.is_empty() {
            Matcher::Nothing
        } else {
            Matcher::Extensions(exts)
        }
    }

    pub fn pattern(re: &str) -> Result<Self> {
        let re = Regex::new(re).with_context(|| format!("bad pattern: {}", re))?;
        Ok(Matcher::Pattern(re))
    }

    /// Matches any of `names` exactly, optionally followed by `/subpath`.
    pub fn module_names<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::scheme_module_names("", names)
    }

    /// Like [`Matcher::module_names`], also accepting names written with an
    /// optional `scheme` prefix such as `node:`.
    pub fn scheme_module_names<I, S>(scheme: &str, names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let alts = names
            .into_iter()
            .map(|n| regex::escape(n.as_ref()))
            .collect::<Vec<_>>();
        if alts.is_empty() {
            return Ok(Matcher::Nothing);
        }
        let scheme = if scheme.is_empty() {
            String::new()
        } else {
            format!("(?:{})?", regex::escape(scheme))
        };
        Self::pattern(&format!("^{}(?:{})(?:/.+)?$", scheme, alts.join("|")))
    }

    pub fn matches(&self, s: &str) -> bool {
        match self {
            Matcher::All => true,
            Matcher::Nothing => false,
            Matcher::Extensions(exts) => match Path::new(s).extension() {
                Some(ext) => exts.iter().any(|e| ext == e.as_str()),
                None => false,
            },
            Matcher::Pattern(re) => re.is_match(s),
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Matcher::extensions(["js", "mjs", "cjs"])
    }
}

pub fn is_vendored(path: &Path) -> bool {
    path.components()
        .any(|c| matches!(c, Component::Normal(name) if name == VENDOR_DIR))
}
