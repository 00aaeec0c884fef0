use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use futures::stream::{self, StreamExt};
use log::{debug, warn};

use crate::plugin::{LoadArgs, LoadResult, Plugin, ResolveArgs, ResolveResult, FILE_NAMESPACE};

pub const DEFAULT_CONCURRENCY: usize = 8;

/// Drives registered plugins the way a bundler would: in registration order,
/// first non-declining plugin wins, default behavior when all decline.
pub struct Host {
    plugins: Vec<Arc<dyn Plugin>>,
    concurrency: usize,
}

impl Host {
    pub fn new(plugins: Vec<Arc<dyn Plugin>>) -> Self {
        Self {
            plugins,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    pub async fn resolve(&self, specifier: &str, importer: Option<&Path>) -> Result<ResolveResult> {
        let args = ResolveArgs {
            path: specifier.to_string(),
            importer: importer.map(Path::to_path_buf),
            namespace: FILE_NAMESPACE.to_string(),
        };
        for plugin in &self.plugins {
            let res = plugin.on_resolve(&args).await.with_context(|| {
                format!("plugin '{}' failed to resolve {}", plugin.name(), specifier)
            })?;
            if let Some(r) = res {
                debug!(
                    "{} resolved {} -> {}:{}",
                    plugin.name(),
                    specifier,
                    r.namespace,
                    r.path
                );
                return Ok(r);
            }
        }
        default_resolve(specifier, importer)
    }

    pub async fn load(&self, args: &LoadArgs) -> Result<LoadResult> {
        for plugin in &self.plugins {
            let res = plugin.on_load(args).await.with_context(|| {
                format!("plugin '{}' failed to load {}", plugin.name(), args.path)
            })?;
            if let Some(r) = res {
                debug!("{} loaded {}:{}", plugin.name(), args.namespace, args.path);
                for w in &r.warnings {
                    warn!("[{}] {}", plugin.name(), w);
                }
                return Ok(r);
            }
        }
        if !args.is_file() {
            bail!("no plugin loads {}:{}", args.namespace, args.path);
        }
        let contents = tokio::fs::read_to_string(&args.path)
            .await
            .with_context(|| format!("failed to read {}", args.path))?;
        Ok(LoadResult::new(contents))
    }

    /// Loads every path from the `file` namespace, at most `concurrency` at a
    /// time. Results keep the input order.
    pub async fn load_all(&self, paths: &[PathBuf]) -> Vec<(PathBuf, Result<LoadResult>)> {
        stream::iter(paths.iter().cloned())
            .map(|p| async move {
                let args = LoadArgs::file(p.to_string_lossy());
                let res = self.load(&args).await;
                (p, res)
            })
            .buffered(self.concurrency)
            .collect()
            .await
    }
}

fn default_resolve(specifier: &str, importer: Option<&Path>) -> Result<ResolveResult> {
    let spec = Path::new(specifier);
    let path = if spec.is_absolute() {
        spec.to_path_buf()
    } else if specifier.starts_with("./") || specifier.starts_with("../") {
        let dir = match importer.and_then(Path::parent) {
            Some(d) => d.to_path_buf(),
            None => std::env::current_dir().context("failed to read current directory")?,
        };
        dir.join(spec)
    } else {
        bail!("could not resolve \"{}\"", specifier);
    };
    Ok(ResolveResult::file(normalize_path(&path).to_string_lossy()))
}

/// Lexically removes `.` and `..` components.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for c in path.components() {
        match c {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}
