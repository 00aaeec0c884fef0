use std::sync::Arc;

use anyhow::Result;

use crate::builtins::{BuiltinSet, IgnoreBuiltins};
use crate::bulk::BulkLoader;
use crate::host::{Host, DEFAULT_CONCURRENCY};
use crate::loader::LoaderRegistry;
use crate::matcher::Matcher;
use crate::plugin::Plugin;
use crate::replace::{ReplaceMap, ReplaceModules};

/// Everything one build needs, fixed before the first file is loaded.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub loaders: Vec<String>,
    pub replace: ReplaceMap,
    pub builtins: BuiltinSet,
    pub extensions: Vec<String>,
    pub concurrency: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            loaders: Vec::new(),
            replace: ReplaceMap::new(),
            builtins: BuiltinSet::node(),
            extensions: vec!["js".into(), "mjs".into(), "cjs".into()],
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl BuildOptions {
    /// Plugins in the order the host consults them: builtins first, then
    /// replacements, so a replaced path never reaches the loaders.
    pub fn plugins(&self, registry: &LoaderRegistry) -> Result<Vec<Arc<dyn Plugin>>> {
        let mut plugins: Vec<Arc<dyn Plugin>> = Vec::new();
        if !self.builtins.is_empty() {
            plugins.push(Arc::new(IgnoreBuiltins::new(&self.builtins)?));
        }
        if !self.replace.is_empty() {
            plugins.push(Arc::new(ReplaceModules::new(self.replace.clone())));
        }
        let loaders = registry.select(self.loaders.as_slice())?;
        let bulk = BulkLoader::new(loaders).with_filter(Matcher::extensions(&self.extensions));
        plugins.push(Arc::new(bulk));
        Ok(plugins)
    }

    pub fn host(&self, registry: &LoaderRegistry) -> Result<Host> {
        Ok(Host::new(self.plugins(registry)?).with_concurrency(self.concurrency))
    }
}
