#![allow(clippy::collapsible_if)]
mod builtins;
mod bulk;
mod config;
mod host;
mod inputs;
mod loader;
mod matcher;
mod options;
mod plugin;
mod replace;

pub use builtins::{
    BuiltinSet, IgnoreBuiltins, IGNORE_BUILTINS_NAMESPACE, NODE_BUILTINS, NODE_SCHEME,
};
pub use bulk::BulkLoader;
pub use config::{
    discover_config, load_config, resolve_path_like, resolve_pathbuf, BuildConfig, LoadedConfig,
};
pub use host::{normalize_path, Host, DEFAULT_CONCURRENCY};
pub use inputs::expand_inputs;
pub use loader::{
    from_fn, FnLoader, InlineFs, InlineOutput, Inliner, LoaderOutput, LoaderRegistry, PartialLoader,
    RmGetModuleDirectory,
};
pub use matcher::{is_vendored, Matcher, VENDOR_DIR};
pub use options::BuildOptions;
pub use plugin::{
    LoadArgs, LoadResult, Location, Message, Plugin, ResolveArgs, ResolveResult, FILE_NAMESPACE,
};
pub use replace::{parse_replace_flags, ReplaceMap, ReplaceModules};
