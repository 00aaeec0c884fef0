use bulkload::*;

fn resolve_args(spec: &str) -> ResolveArgs {
    ResolveArgs {
        path: spec.to_string(),
        importer: None,
        namespace: FILE_NAMESPACE.to_string(),
    }
}

#[tokio::test]
async fn builtin_and_subpath_are_claimed() {
    let plugin = IgnoreBuiltins::node().expect("plugin");
    for spec in ["fs", "fs/promises", "child_process", "stream/web"] {
        let res = plugin
            .on_resolve(&resolve_args(spec))
            .await
            .expect("resolve")
            .expect("claimed");
        assert_eq!(res.path, spec);
        assert_eq!(res.namespace, IGNORE_BUILTINS_NAMESPACE);
    }
}

#[tokio::test]
async fn shared_prefix_is_not_claimed() {
    let plugin = IgnoreBuiltins::node().expect("plugin");
    for spec in ["fsx", "pathological", "./fs", "@scope/fs", "utility/x"] {
        let res = plugin.on_resolve(&resolve_args(spec)).await.expect("resolve");
        assert!(res.is_none(), "{spec} should not be suppressed");
    }
}

#[tokio::test]
async fn claimed_modules_load_empty() {
    let plugin = IgnoreBuiltins::node().expect("plugin");
    let resolved = plugin
        .on_resolve(&resolve_args("path/posix"))
        .await
        .expect("resolve")
        .expect("claimed");
    let out = plugin
        .on_load(&LoadArgs::from(resolved))
        .await
        .expect("load")
        .expect("claimed");
    assert_eq!(out.contents, "");
    assert!(out.warnings.is_empty());
}

#[tokio::test]
async fn file_namespace_loads_are_declined() {
    let plugin = IgnoreBuiltins::node().expect("plugin");
    let out = plugin.on_load(&LoadArgs::file("fs")).await.expect("load");
    assert!(out.is_none());
}

#[tokio::test]
async fn custom_set_replaces_defaults() {
    let set = BuiltinSet::new(["electron", "lighthouse-logger"]);
    let plugin = IgnoreBuiltins::new(&set).expect("plugin");
    assert!(plugin.matches("electron"));
    assert!(plugin.matches("electron/main"));
    assert!(plugin.matches("lighthouse-logger"));
    assert!(!plugin.matches("fs"));
}

#[test]
fn builtin_set_dedups_and_skips_empty() {
    let mut set = BuiltinSet::new(["fs", "fs", ""]);
    set.insert("os");
    set.insert("fs");
    assert_eq!(set.names(), ["fs".to_string(), "os".to_string()]);
    assert!(BuiltinSet::default().is_empty());
    assert_eq!(BuiltinSet::node().names().len(), NODE_BUILTINS.len());
}

#[tokio::test]
async fn empty_set_claims_nothing() {
    let plugin = IgnoreBuiltins::new(&BuiltinSet::default()).expect("plugin");
    let res = plugin.on_resolve(&resolve_args("fs")).await.expect("resolve");
    assert!(res.is_none());
}

#[tokio::test]
async fn node_scheme_and_sys_are_claimed() {
    let plugin = IgnoreBuiltins::node().expect("plugin");
    for spec in ["node:fs", "node:fs/promises", "sys", "node:sys"] {
        let res = plugin
            .on_resolve(&resolve_args(spec))
            .await
            .expect("resolve")
            .expect("claimed");
        assert_eq!(res.path, spec);
        assert_eq!(res.namespace, IGNORE_BUILTINS_NAMESPACE);
    }
    assert!(!plugin.matches("node:fsx"));
}
