#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::anyhow;
use bulkload::*;
use regex::Regex;

pub fn write_file(dir: &Path, rel: &str, contents: &str) -> PathBuf {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(&path, contents).expect("write fixture");
    path
}

pub fn path_str(p: &Path) -> String {
    p.to_string_lossy().into_owned()
}

pub fn identity() -> Arc<dyn PartialLoader> {
    from_fn("identity", |code, _path| Ok(LoaderOutput::new(code)))
}

pub fn append(name: &str, suffix: &'static str) -> Arc<dyn PartialLoader> {
    from_fn(name, move |code, _path| Ok(LoaderOutput::new(code + suffix)))
}

pub fn failing(name: &str) -> Arc<dyn PartialLoader> {
    from_fn(name, |_code, path| {
        Err(anyhow!("unterminated template literal in {}", path.display()))
    })
}

pub fn warn_with(name: &str, text: &'static str) -> Arc<dyn PartialLoader> {
    from_fn(name, move |code, path| {
        let w = Message::new(text).at(path.display().to_string(), 1, 0);
        Ok(LoaderOutput::with_warnings(code, vec![w]))
    })
}

pub fn strip_comments() -> Arc<dyn PartialLoader> {
    let re = Regex::new(r"//[^\n]*|/\*[\s\S]*?\*/").expect("regex");
    from_fn("strip-comments", move |code, _path| {
        Ok(LoaderOutput::new(re.replace_all(&code, "").into_owned()))
    })
}

pub fn upper_case_strings() -> Arc<dyn PartialLoader> {
    let re = Regex::new(r#"'[^'\n]*'|"[^"\n]*""#).expect("regex");
    from_fn("upper-case-strings", move |code, _path| {
        let out = re.replace_all(&code, |caps: &regex::Captures| caps[0].to_uppercase());
        Ok(LoaderOutput::new(out.into_owned()))
    })
}
