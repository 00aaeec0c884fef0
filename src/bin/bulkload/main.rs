#![allow(clippy::collapsible_if)]
use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{bail, Context, Result};
use bulkload::{
    expand_inputs, load_config, normalize_path, parse_replace_flags, resolve_path_like,
    resolve_pathbuf, BuildOptions, BuiltinSet, LoadArgs, LoadedConfig, LoaderRegistry,
    FILE_NAMESPACE,
};
use clap::{ArgAction, Args, Parser, Subcommand};
use log::{error, info};

/// bulkload: partial loaders and resolution plugins for JavaScript bundling
#[derive(Parser, Debug)]
#[command(
    name = "bulkload",
    version,
    about = "Run source files through partial loaders and module plugins"
)]
struct Cli {
    /// Log debug output (overrides RUST_LOG)
    #[arg(short, long, global = true, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load files through the plugin pipeline and write the results
    Load(LoadCmd),
    /// Resolve a module specifier through the plugin pipeline
    Resolve(ResolveCmd),
    /// List available partial loaders
    Loaders,
}

#[derive(Args, Debug)]
struct PluginArgs {
    /// Partial loaders to apply, in order
    #[arg(long = "loader", value_name = "NAME", action = ArgAction::Append)]
    loaders: Vec<String>,

    /// Replace a module: PATH=TEXT or PATH=@FILE
    #[arg(long = "replace", value_name = "ENTRY", action = ArgAction::Append)]
    replace: Vec<String>,

    /// Extra builtin module names to suppress
    #[arg(long = "builtin", value_name = "NAME", action = ArgAction::Append)]
    builtins: Vec<String>,

    /// Do not suppress the Node.js builtin modules by default
    #[arg(long = "no-default-builtins", action = ArgAction::SetTrue, default_value_t = false)]
    no_default_builtins: bool,

    /// File extensions eligible for the partial loaders
    #[arg(long = "ext", value_name = "EXT", action = ArgAction::Append)]
    extensions: Vec<String>,

    /// Path to config file; if omitted, auto-discovers bulkload.{toml,yaml,yml,json}
    #[arg(long = "config", value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct LoadCmd {
    /// Input files or glob patterns
    #[arg(value_name = "INPUT")]
    inputs: Vec<String>,

    #[command(flatten)]
    plugins: PluginArgs,

    /// Output directory; prints to stdout when omitted
    #[arg(short = 'o', long = "outdir", value_name = "DIR")]
    outdir: Option<PathBuf>,

    /// Maximum number of files loaded at once
    #[arg(long = "concurrency", value_name = "N")]
    concurrency: Option<usize>,
}

#[derive(Parser, Debug)]
struct ResolveCmd {
    /// Module specifier (e.g. fs/promises or ./lib/a.js)
    #[arg(value_name = "SPECIFIER")]
    specifier: String,

    /// File that contains the import
    #[arg(long = "importer", value_name = "FILE")]
    importer: Option<PathBuf>,

    #[command(flatten)]
    plugins: PluginArgs,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
    match real_main(cli).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(1)
        }
    }
}

async fn real_main(cli: Cli) -> Result<()> {
    let registry = LoaderRegistry::standard()?;
    match cli.command {
        Commands::Load(cmd) => run_load(cmd, &registry).await,
        Commands::Resolve(cmd) => run_resolve(cmd, &registry).await,
        Commands::Loaders => {
            for name in registry.names() {
                println!("{}", name);
            }
            Ok(())
        }
    }
}

/// Effective options: config < env < CLI. Lists given on the CLI replace the
/// configured ones; `--builtin` adds to whichever builtin set applies.
fn build_options(args: &PluginArgs, loaded: &LoadedConfig, cwd: &Path) -> Result<BuildOptions> {
    let base = loaded.dir.as_deref().map(|d| cwd.join(d));
    let defaults = BuildOptions::default();

    let loaders = if !args.loaders.is_empty() {
        args.loaders.clone()
    } else {
        loaded.cfg.loaders.clone().unwrap_or_default()
    };

    let replace = if !args.replace.is_empty() {
        parse_replace_flags(&args.replace, Some(cwd))?
    } else {
        let entries = loaded.cfg.replace.clone().unwrap_or_default();
        parse_replace_flags(&entries, base.as_deref())?
    };

    let mut builtins = if args.no_default_builtins {
        BuiltinSet::default()
    } else if let Some(names) = &loaded.cfg.builtins {
        BuiltinSet::new(names.iter().cloned())
    } else {
        defaults.builtins
    };
    for n in &args.builtins {
        builtins.insert(n.clone());
    }

    let extensions = if !args.extensions.is_empty() {
        args.extensions.clone()
    } else {
        loaded.cfg.extensions.clone().unwrap_or(defaults.extensions)
    };

    Ok(BuildOptions {
        loaders,
        replace,
        builtins,
        extensions,
        concurrency: loaded.cfg.concurrency.unwrap_or(defaults.concurrency),
    })
}

async fn run_load(cmd: LoadCmd, registry: &LoaderRegistry) -> Result<()> {
    let cwd = std::env::current_dir().context("failed to read current directory")?;
    let loaded = load_config(cmd.plugins.config.as_deref())?;
    let base = loaded.dir.as_deref().map(|d| cwd.join(d));

    let mut opts = build_options(&cmd.plugins, &loaded, &cwd)?;
    if let Some(n) = cmd.concurrency {
        opts.concurrency = n;
    }

    let patterns: Vec<String> = if !cmd.inputs.is_empty() {
        cmd.inputs.clone()
    } else {
        loaded
            .cfg
            .inputs
            .clone()
            .unwrap_or_default()
            .iter()
            // resolve relative to config file dir
            .map(|p| resolve_path_like(base.as_deref(), p))
            .collect()
    };
    if patterns.is_empty() {
        bail!("no inputs given");
    }

    let outdir: Option<PathBuf> = if let Some(o) = &cmd.outdir {
        Some(o.clone())
    } else {
        loaded
            .cfg
            .outdir
            .as_deref()
            .map(|s| resolve_pathbuf(base.as_deref(), s))
    };

    let files: Vec<PathBuf> = expand_inputs(&patterns)?
        .into_iter()
        .map(|p| normalize_path(&cwd.join(p)))
        .collect();
    info!(
        "loading {} file(s) with loaders [{}]",
        files.len(),
        opts.loaders.join(", ")
    );

    let out_root = output_root(&files, &cwd);
    let host = opts.host(registry)?;
    let results = host.load_all(&files).await;

    let mut failed = 0usize;
    let mut warnings = 0usize;
    for (path, res) in results {
        let out = match res {
            Ok(r) => r,
            Err(err) => {
                error!("{:#}", err);
                failed += 1;
                continue;
            }
        };
        warnings += out.warnings.len();
        match &outdir {
            Some(dir) => {
                let rel = path.strip_prefix(&out_root).with_context(|| {
                    format!("{} is outside {}", path.display(), out_root.display())
                })?;
                let target = dir.join(rel);
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&target, out.contents)
                    .with_context(|| format!("failed to write {}", target.display()))?;
            }
            None => {
                println!("// {}", path.display());
                print!("{}", out.contents);
                if !out.contents.ends_with('\n') {
                    println!();
                }
            }
        }
    }

    info!(
        "done: {} loaded, {} failed, {} warning(s)",
        files.len() - failed,
        failed,
        warnings
    );
    if failed > 0 {
        bail!("{} of {} file(s) failed to load", failed, files.len());
    }
    Ok(())
}

/// Directory that outputs are mirrored from: the working directory when it
/// holds every input, otherwise the inputs' deepest common ancestor.
fn output_root(files: &[PathBuf], cwd: &Path) -> PathBuf {
    if files.iter().all(|f| f.starts_with(cwd)) {
        return cwd.to_path_buf();
    }
    let mut root = match files.first().and_then(|f| f.parent()) {
        Some(p) => p.to_path_buf(),
        None => return PathBuf::from("/"),
    };
    for f in &files[1..] {
        while !f.starts_with(&root) {
            if !root.pop() {
                break;
            }
        }
    }
    root
}

async fn run_resolve(cmd: ResolveCmd, registry: &LoaderRegistry) -> Result<()> {
    let cwd = std::env::current_dir().context("failed to read current directory")?;
    let loaded = load_config(cmd.plugins.config.as_deref())?;
    let opts = build_options(&cmd.plugins, &loaded, &cwd)?;
    let host = opts.host(registry)?;

    let importer = cmd.importer.as_ref().map(|p| normalize_path(&cwd.join(p)));
    let resolved = host.resolve(&cmd.specifier, importer.as_deref()).await?;
    println!("{}:{}", resolved.namespace, resolved.path);
    if resolved.namespace != FILE_NAMESPACE {
        let contents = host.load(&LoadArgs::from(resolved)).await?;
        println!("contents: {} byte(s)", contents.contents.len());
    }
    Ok(())
}
