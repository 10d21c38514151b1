use std::error::Error;
use std::fmt;
use std::io::{self, IsTerminal};
use std::path::Path;

use serde::Deserialize;

use crate::projection::{ParseFilterError, PriorityFilter, SortKey, StatusFilter, TableQuery};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn enabled(self) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => {
                std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal()
            }
        }
    }

    fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "auto" | "" => Ok(ColorMode::Auto),
            "always" | "on" => Ok(ColorMode::Always),
            "never" | "off" => Ok(ColorMode::Never),
            _ => Err(ConfigError::InvalidValue(format!(
                "invalid display.color '{}': expected one of auto, always, never",
                raw
            ))),
        }
    }
}

/// Startup selections: the initial table query and terminal color handling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    pub query: TableQuery,
    pub color: ColorMode,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfigFile {
    view: RawView,
    display: RawDisplay,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawView {
    status: Option<String>,
    priority: Option<String>,
    sort: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawDisplay {
    color: Option<String>,
}

impl Config {
    /// A missing file yields the defaults; an unreadable or invalid one is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file; using defaults");
                return Ok(Self::default());
            }
            Err(err) => return Err(ConfigError::Io(err)),
        };
        Self::from_toml(&raw)
    }

    pub(crate) fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let file: RawConfigFile = toml::from_str(raw)?;
        let mut query = TableQuery::default();
        if let Some(status) = file.view.status.as_deref() {
            query.status = status.parse::<StatusFilter>()?;
        }
        if let Some(priority) = file.view.priority.as_deref() {
            query.priority = priority.parse::<PriorityFilter>()?;
        }
        if let Some(sort) = file.view.sort.as_deref() {
            query.sort = sort.parse::<SortKey>()?;
        }
        let color = match file.display.color.as_deref() {
            Some(raw) => ColorMode::parse(raw)?,
            None => ColorMode::default(),
        };
        Ok(Self { query, color })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Toml(toml::de::Error),
    InvalidValue(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "unable to read config: {}", err),
            ConfigError::Toml(err) => write!(f, "invalid config TOML: {}", err),
            ConfigError::InvalidValue(message) => write!(f, "{}", message),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Toml(err) => Some(err),
            ConfigError::InvalidValue(_) => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        ConfigError::Toml(value)
    }
}

impl From<ParseFilterError> for ConfigError {
    fn from(value: ParseFilterError) -> Self {
        ConfigError::InvalidValue(value.to_string())
    }
}
