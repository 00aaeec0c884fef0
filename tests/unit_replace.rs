use std::path::{Path, PathBuf};

use bulkload::*;

mod common;

fn replacer() -> ReplaceModules {
    let mut map = ReplaceMap::new();
    map.insert(
        PathBuf::from("/app/src/report/renderer.js"),
        "export default {};".to_string(),
    );
    ReplaceModules::new(map)
}

#[test]
fn parse_replace_flags_literal_and_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    common::write_file(dir.path(), "stubs/net.js", "export const get = () => null;\n");

    let flags = vec![
        "src/a.js=export {};".to_string(),
        "/abs/b.js=@stubs/net.js".to_string(),
        "./src/../src/c.js=x=y".to_string(),
    ];
    let map = parse_replace_flags(&flags, Some(dir.path())).expect("parse");
    assert_eq!(map.len(), 3);
    assert_eq!(
        map.get(&dir.path().join("src/a.js")).map(String::as_str),
        Some("export {};")
    );
    assert_eq!(
        map.get(Path::new("/abs/b.js")).map(String::as_str),
        Some("export const get = () => null;\n")
    );
    // keys are normalized; only the first '=' separates path from text
    assert_eq!(
        map.get(&dir.path().join("src/c.js")).map(String::as_str),
        Some("x=y")
    );
}

#[test]
fn parse_replace_flags_requires_separator() {
    let err = parse_replace_flags(&["src/a.js".to_string()], None).unwrap_err();
    assert!(format!("{err}").contains("PATH=TEXT"));

    let err = parse_replace_flags(&["=text".to_string()], None).unwrap_err();
    assert!(format!("{err}").contains("empty path"));
}

#[test]
fn parse_replace_flags_missing_source_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = parse_replace_flags(&["a.js=@nope.js".to_string()], Some(dir.path())).unwrap_err();
    assert!(format!("{err}").contains("failed to read replacement for a.js"));
}

#[tokio::test]
async fn exact_path_returns_mapped_text() {
    let out = replacer()
        .on_load(&LoadArgs::file("/app/src/report/renderer.js"))
        .await
        .expect("load")
        .expect("claimed");
    assert_eq!(out, LoadResult::new("export default {};"));
}

#[tokio::test]
async fn near_misses_fall_through() {
    let r = replacer();
    for path in [
        "/app/src/report/renderer.js.map",
        "/app/src/report/renderer.jsx",
        "/app/src/report/Renderer.js",
        "/app/src/report/renderer",
    ] {
        let out = r.on_load(&LoadArgs::file(path)).await.expect("load");
        assert!(out.is_none(), "{path} should not be replaced");
    }
}

#[tokio::test]
async fn vendored_and_foreign_namespaces_fall_through() {
    let mut map = ReplaceMap::new();
    map.insert(PathBuf::from("/app/node_modules/dep/index.js"), "x".into());
    map.insert(PathBuf::from("fs"), "y".into());
    let r = ReplaceModules::new(map);

    let out = r
        .on_load(&LoadArgs::file("/app/node_modules/dep/index.js"))
        .await
        .expect("load");
    assert!(out.is_none());

    let args = LoadArgs {
        path: "fs".into(),
        namespace: IGNORE_BUILTINS_NAMESPACE.into(),
    };
    assert!(r.on_load(&args).await.expect("load").is_none());
}

#[test]
fn replacement_lookup() {
    let r = replacer();
    assert_eq!(r.len(), 1);
    assert!(!r.is_empty());
    assert_eq!(
        r.replacement(Path::new("/app/src/report/renderer.js")),
        Some("export default {};")
    );
    assert_eq!(r.replacement(Path::new("/app/src/other.js")), None);
}
