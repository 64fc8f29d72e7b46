//! Location of the per-user `.momo` directory.
//!
//! `MOMO_HOME` points the CLI at another directory (tests, portable installs);
//! otherwise it is `$HOME/.momo`.

use anyhow::{bail, Context, Result};
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

pub fn momo_home() -> Result<PathBuf> {
    resolve_home(std::env::var_os("MOMO_HOME"), std::env::var_os("HOME"))
}

fn resolve_home(momo_home: Option<OsString>, home: Option<OsString>) -> Result<PathBuf> {
    if let Some(dir) = momo_home.filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    match home.filter(|h| !h.is_empty()) {
        Some(home) => Ok(PathBuf::from(home).join(".momo")),
        None => bail!("neither MOMO_HOME nor HOME is set"),
    }
}

/// `momo_home()`, created if missing. Only writers call this.
pub fn ensure_momo_home() -> Result<PathBuf> {
    let dir = momo_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}
