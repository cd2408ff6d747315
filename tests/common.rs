// tests/common.rs

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

#[allow(dead_code)] // Not every integration test binary uses every helper.
pub fn asset_cache_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("asset-cache"))
}

#[allow(dead_code)]
pub fn create_file(dir: &Path, relative_path: &str, content: &str) -> std::io::Result<PathBuf> {
    let path = dir.join(relative_path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, content)?;
    Ok(path)
}

#[allow(dead_code)]
pub fn scene(body: &str) -> String {
    format!(
        "<?xml version=\"1.0\" ?>\n<mujoco model=\"test\">\n  <asset>\n{body}\n  </asset>\n</mujoco>\n"
    )
}
