use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use chrono_tz::Tz;
use clap::ValueEnum;
use momo_ingest::Dialect;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::{ensure_momo_home, momo_home};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub parse: ParseSection,
    #[serde(default)]
    pub display: DisplaySection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ParseSection {
    pub dialect: DialectChoice,
    /// IANA zone used to decide "this year" for exports without years
    pub timezone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplaySection {
    pub currency_label: String,
}

/// Dialect selection as written in config or on the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DialectChoice {
    #[default]
    Auto,
    Short,
    Full,
}

impl DialectChoice {
    pub fn resolve(self) -> Option<Dialect> {
        match self {
            DialectChoice::Auto => None,
            DialectChoice::Short => Some(Dialect::Short),
            DialectChoice::Full => Some(Dialect::Full),
        }
    }
}

impl Default for ParseSection {
    fn default() -> Self {
        Self {
            dialect: DialectChoice::Auto,
            timezone: "Africa/Kigali".to_string(),
        }
    }
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            currency_label: momo_core::CURRENCY.to_string(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(momo_home()?.join("config.toml"))
}

/// Read the config file, falling back to defaults when it does not exist.
pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = ensure_momo_home()?.join("config.toml");
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

/// Current calendar year in the IANA zone `tz`.
pub fn reference_year(tz: &str) -> Result<i32> {
    let tz: Tz = tz
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))?;
    Ok(Utc::now().with_timezone(&tz).year())
}
