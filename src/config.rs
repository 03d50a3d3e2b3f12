use std::path::{Path, PathBuf};

use color_eyre::eyre::{eyre, Result, WrapErr};
use serde::Deserialize;

use crate::theme::ThemeConfig;

pub const APP_NAME: &str = "calendar-event-entry";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite file the events are written to.
    pub database: Option<PathBuf>,
    pub log_level: Option<String>,
    pub theme: ThemeConfig,
}

impl Config {
    /// Load `path`, or the default config file when `path` is `None`.
    ///
    /// A missing default file yields the defaults; an explicitly named file
    /// must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_path() {
                Some(p) if p.exists() => p,
                _ => return Ok(Self::default()),
            },
        };

        let content = std::fs::read_to_string(&path)
            .wrap_err_with(|| format!("reading config {}", path.display()))?;
        Self::parse(&content).wrap_err_with(|| format!("parsing config {}", path.display()))
    }

    fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database {
            Some(p) => Ok(p.clone()),
            None => Ok(data_dir()?.join("events.db")),
        }
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }
}

fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME).join("config.toml"))
}

pub fn data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|d| d.join(APP_NAME))
        .ok_or_else(|| eyre!("cannot determine the user data directory"))
}
