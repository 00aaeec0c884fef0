use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use regex::Regex;

use crate::plugin::Message;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoaderOutput {
    pub code: String,
    pub warnings: Vec<Message>,
}

impl LoaderOutput {
    pub fn new(code: String) -> Self {
        Self {
            code,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(code: String, warnings: Vec<Message>) -> Self {
        Self { code, warnings }
    }
}

/// A single text rewrite applied to a source file before bundling.
///
/// A loader with nothing to do returns the code it was given. `Err` is reserved
/// for input it cannot safely process, and fails the whole file.
#[async_trait]
pub trait PartialLoader: Send + Sync {
    fn name(&self) -> &str;

    async fn apply(&self, code: String, path: &Path) -> Result<LoaderOutput>;
}

pub struct FnLoader<F> {
    name: String,
    f: F,
}

#[async_trait]
impl<F> PartialLoader for FnLoader<F>
where
    F: Fn(String, &Path) -> Result<LoaderOutput> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn apply(&self, code: String, path: &Path) -> Result<LoaderOutput> {
        (self.f)(code, path)
    }
}

pub fn from_fn<F>(name: impl Into<String>, f: F) -> Arc<dyn PartialLoader>
where
    F: Fn(String, &Path) -> Result<LoaderOutput> + Send + Sync + 'static,
{
    Arc::new(FnLoader {
        name: name.into(),
        f,
    })
}

/// Drops `getModuleDirectory(import.meta)` calls, which have no meaning once
/// the module is bundled.
pub struct RmGetModuleDirectory {
    re: Regex,
}

impl RmGetModuleDirectory {
    pub const NAME: &'static str = "rm-get-module-directory";

    pub fn new() -> Result<Self> {
        Ok(Self {
            re: Regex::new(r"getModuleDirectory\(import\.meta\)")?,
        })
    }
}

#[async_trait]
impl PartialLoader for RmGetModuleDirectory {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn apply(&self, code: String, _path: &Path) -> Result<LoaderOutput> {
        if !self.re.is_match(&code) {
            return Ok(LoaderOutput::new(code));
        }
        let code = self.re.replace_all(&code, r#""""#).into_owned();
        Ok(LoaderOutput::new(code))
    }
}

#[derive(Debug, Clone, Default)]
pub struct InlineOutput {
    pub code: Option<String>,
    pub warnings: Vec<Message>,
}

/// Replaces file-system reads with the contents they would produce.
#[async_trait]
pub trait Inliner: Send + Sync {
    async fn inline(&self, code: &str, path: &Path) -> Result<InlineOutput>;
}

pub struct InlineFs {
    inliner: Arc<dyn Inliner>,
}

impl InlineFs {
    pub const NAME: &'static str = "inline-fs";

    pub fn new(inliner: Arc<dyn Inliner>) -> Self {
        Self { inliner }
    }
}

#[async_trait]
impl PartialLoader for InlineFs {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn apply(&self, code: String, path: &Path) -> Result<LoaderOutput> {
        let out = self.inliner.inline(&code, path).await?;
        Ok(LoaderOutput::with_warnings(
            out.code.unwrap_or(code),
            out.warnings,
        ))
    }
}

#[derive(Clone, Default)]
pub struct LoaderRegistry {
    loaders: BTreeMap<String, Arc<dyn PartialLoader>>,
}

impl LoaderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn standard() -> Result<Self> {
        let mut reg = Self::new();
        reg.register(Arc::new(RmGetModuleDirectory::new()?));
        Ok(reg)
    }

    pub fn with_inliner(mut self, inliner: Arc<dyn Inliner>) -> Self {
        self.register(Arc::new(InlineFs::new(inliner)));
        self
    }

    pub fn register(&mut self, loader: Arc<dyn PartialLoader>) {
        self.loaders.insert(loader.name().to_string(), loader);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn PartialLoader>> {
        self.loaders.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        self.loaders.keys().map(String::as_str).collect()
    }

    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Arc<dyn PartialLoader>>> {
        names
            .iter()
            .map(|n| {
                let n = n.as_ref();
                self.get(n).ok_or_else(|| {
                    anyhow!(
                        "unknown loader: {} (known: {})",
                        n,
                        self.names().join(", ")
                    )
                })
            })
            .collect()
    }
}
