use anyhow::Result;
use async_trait::async_trait;
use log::debug;

use crate::matcher::Matcher;
use crate::plugin::{LoadArgs, LoadResult, Plugin, ResolveArgs, ResolveResult};

pub const IGNORE_BUILTINS_NAMESPACE: &str = "ignore-builtins";

/// Scheme Node.js accepts in front of any builtin name (`node:fs`).
pub const NODE_SCHEME: &str = "node:";

/// Node.js builtin modules. Subpaths such as `fs/promises` and the `node:`
/// spelling are covered by the matcher and need not be listed.
pub const NODE_BUILTINS: &[&str] = &[
    "assert",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "domain",
    "events",
    "fs",
    "http",
    "http2",
    "https",
    "inspector",
    "module",
    "net",
    "os",
    "path",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "repl",
    "stream",
    "string_decoder",
    "sys",
    "timers",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuiltinSet {
    names: Vec<String>,
}

impl BuiltinSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::default();
        for n in names {
            set.insert(n);
        }
        set
    }

    pub fn node() -> Self {
        Self::new(NODE_BUILTINS.iter().copied())
    }

    pub fn insert(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !name.is_empty() && !self.names.contains(&name) {
            self.names.push(name);
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn matcher(&self) -> Result<Matcher> {
        Matcher::scheme_module_names(NODE_SCHEME, &self.names)
    }
}

/// Resolves builtin module specifiers to an empty module instead of letting
/// the bundler look for them on disk.
pub struct IgnoreBuiltins {
    matcher: Matcher,
}

impl IgnoreBuiltins {
    pub const NAME: &'static str = "ignore-builtins";

    pub fn new(builtins: &BuiltinSet) -> Result<Self> {
        Ok(Self {
            matcher: builtins.matcher()?,
        })
    }

    pub fn node() -> Result<Self> {
        Self::new(&BuiltinSet::node())
    }

    pub fn matches(&self, specifier: &str) -> bool {
        self.matcher.matches(specifier)
    }
}

#[async_trait]
impl Plugin for IgnoreBuiltins {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn on_resolve(&self, args: &ResolveArgs) -> Result<Option<ResolveResult>> {
        if !self.matcher.matches(&args.path) {
            return Ok(None);
        }
        debug!("{}: suppressing {}", Self::NAME, args.path);
        Ok(Some(ResolveResult {
            path: args.path.clone(),
            namespace: IGNORE_BUILTINS_NAMESPACE.to_string(),
        }))
    }

    async fn on_load(&self, args: &LoadArgs) -> Result<Option<LoadResult>> {
        if args.namespace != IGNORE_BUILTINS_NAMESPACE {
            return Ok(None);
        }
        Ok(Some(LoadResult::default()))
    }
}
