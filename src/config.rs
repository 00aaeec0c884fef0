use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config as cfg;
use log::debug;
use serde::Deserialize;

/// Keys whose `BULKLOAD_BUILD_<KEY>` values are comma-separated lists.
const LIST_KEYS: [&str; 5] = [
    "build.loaders",
    "build.replace",
    "build.builtins",
    "build.extensions",
    "build.inputs",
];

pub const CONFIG_CANDIDATES: [&str; 4] = [
    "bulkload.toml",
    "bulkload.yaml",
    "bulkload.yml",
    "bulkload.json",
];

#[derive(Debug, Default, Deserialize, Clone)]
pub struct BuildConfig {
    pub loaders: Option<Vec<String>>,
    pub replace: Option<Vec<String>>,
    pub builtins: Option<Vec<String>>,
    pub extensions: Option<Vec<String>>,
    pub inputs: Option<Vec<String>>,
    pub outdir: Option<String>,
    pub concurrency: Option<usize>,
}

#[derive(Debug, Default, Deserialize, Clone)]
struct RootConfig {
    pub build: Option<BuildConfig>,
}

pub struct LoadedConfig {
    pub cfg: BuildConfig,
    pub dir: Option<PathBuf>,
}

pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    if let Some(p) = explicit {
        return load_from_path(p);
    }
    let cwd = std::env::current_dir()?;
    discover_config(&cwd)
}

pub fn discover_config(dir: &Path) -> Result<LoadedConfig> {
    for name in &CONFIG_CANDIDATES {
        let path = dir.join(name);
        if path.is_file() {
            return load_from_path(&path);
        }
    }
    let conf = cfg::Config::builder()
        .add_source(env_overlay())
        .build()
        .context("failed to read config from environment")?;
    let root = conf
        .try_deserialize::<RootConfig>()
        .context("failed to parse config from environment")?;
    Ok(LoadedConfig {
        cfg: root.build.unwrap_or_default(),
        dir: None,
    })
}

fn load_from_path(path: &Path) -> Result<LoadedConfig> {
    debug!("loading config from {}", path.display());
    let conf = cfg::Config::builder()
        .add_source(cfg::File::from(path))
        .add_source(env_overlay())
        .build()
        .with_context(|| format!("failed to read config at {}", path.display()))?;
    let root = conf
        .try_deserialize::<RootConfig>()
        .with_context(|| format!("failed to parse config at {}", path.display()))?;
    let cfg = root.build.unwrap_or_default();
    let dir = path.parent().map(|p| p.to_path_buf());
    Ok(LoadedConfig { cfg, dir })
}

/// `BULKLOAD_BUILD_<KEY>` overrides; list keys take comma-separated values.
fn env_overlay() -> cfg::Environment {
    LIST_KEYS.iter().fold(
        cfg::Environment::with_prefix("BULKLOAD")
            .separator("_")
            .try_parsing(true)
            .list_separator(","),
        |env, key| env.with_list_parse_key(key),
    )
}

pub fn resolve_path_like(base: Option<&Path>, value: &str) -> String {
    resolve_pathbuf(base, value).to_string_lossy().to_string()
}

pub fn resolve_pathbuf(base: Option<&Path>, value: &str) -> PathBuf {
    let p = Path::new(value);
    if p.is_absolute() {
        p.to_path_buf()
    } else if let Some(b) = base {
        b.join(p)
    } else {
        p.to_path_buf()
    }
}
