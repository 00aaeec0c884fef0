use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;

use crate::loader::PartialLoader;
use crate::matcher::{is_vendored, Matcher};
use crate::plugin::{LoadArgs, LoadResult, Message, Plugin};

/// Folds each eligible file through an ordered list of partial loaders.
pub struct BulkLoader {
    loaders: Vec<Arc<dyn PartialLoader>>,
    filter: Matcher,
}

impl BulkLoader {
    pub const NAME: &'static str = "bulk-loader";

    pub fn new(loaders: Vec<Arc<dyn PartialLoader>>) -> Self {
        Self {
            loaders,
            filter: Matcher::default(),
        }
    }

    pub fn with_filter(mut self, filter: Matcher) -> Self {
        self.filter = filter;
        self
    }

    pub fn loader_names(&self) -> Vec<&str> {
        self.loaders.iter().map(|l| l.name()).collect()
    }

    /// Runs `code` through every loader in order. Fails as a whole if any
    /// loader fails.
    pub async fn transform(&self, mut code: String, path: &Path) -> Result<LoadResult> {
        let mut warnings: Vec<Message> = Vec::new();
        for loader in &self.loaders {
            let out = loader.apply(code, path).await.with_context(|| {
                format!("loader '{}' failed on {}", loader.name(), path.display())
            })?;
            code = out.code;
            warnings.extend(out.warnings);
        }
        Ok(LoadResult {
            contents: code,
            warnings,
        })
    }
}

#[async_trait]
impl Plugin for BulkLoader {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn on_load(&self, args: &LoadArgs) -> Result<Option<LoadResult>> {
        if !args.is_file() || !self.filter.matches(&args.path) {
            return Ok(None);
        }
        let path = Path::new(&args.path);
        if is_vendored(path) {
            return Ok(None);
        }
        let code = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        debug!(
            "{}: {} loader(s) on {}",
            Self::NAME,
            self.loaders.len(),
            path.display()
        );
        self.transform(code, path).await.map(Some)
    }
}
