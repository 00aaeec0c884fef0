use std::fmt;
use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;

/// Namespace of modules backed by a file on disk.
pub const FILE_NAMESPACE: &str = "file";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub file: String,
    pub line: usize,
    pub column: usize,
}

/// A diagnostic produced while loading a file. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub location: Option<Location>,
}

impl Message {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            location: None,
        }
    }

    pub fn at(mut self, file: impl Into<String>, line: usize, column: usize) -> Self {
        self.location = Some(Location {
            file: file.into(),
            line,
            column,
        });
        self
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(loc) => write!(f, "{}:{}:{}: {}", loc.file, loc.line, loc.column, self.text),
            None => f.write_str(&self.text),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolveArgs {
    pub path: String,
    pub importer: Option<PathBuf>,
    pub namespace: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveResult {
    pub path: String,
    pub namespace: String,
}

impl ResolveResult {
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            namespace: FILE_NAMESPACE.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadArgs {
    pub path: String,
    pub namespace: String,
}

impl LoadArgs {
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            namespace: FILE_NAMESPACE.to_string(),
        }
    }

    pub fn is_file(&self) -> bool {
        self.namespace == FILE_NAMESPACE
    }
}

impl From<ResolveResult> for LoadArgs {
    fn from(r: ResolveResult) -> Self {
        Self {
            path: r.path,
            namespace: r.namespace,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadResult {
    pub contents: String,
    pub warnings: Vec<Message>,
}

impl LoadResult {
    pub fn new(contents: impl Into<String>) -> Self {
        Self {
            contents: contents.into(),
            warnings: Vec::new(),
        }
    }
}

/// Hooks a bundler host calls while resolving specifiers and loading modules.
///
/// Returning `Ok(None)` declines the request so later plugins, or the host's
/// default behavior, handle it.
#[async_trait]
pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;

    async fn on_resolve(&self, _args: &ResolveArgs) -> Result<Option<ResolveResult>> {
        Ok(None)
    }

    async fn on_load(&self, _args: &LoadArgs) -> Result<Option<LoadResult>> {
        Ok(None)
    }
}
