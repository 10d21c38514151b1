use std::error::Error;
use std::fmt;

use crate::chart::TerminalChartBackend;
use crate::config::{Config, ConfigError};
use crate::domain::task::{ParsePriorityError, TaskId};
use crate::form::FormError;
use crate::projection::ParseFilterError;
use crate::repository::TaskRepository;
use crate::store::{SqliteStore, StoreError};
use crate::wiring::Dashboard;

pub type TerminalDashboard = Dashboard<SqliteStore, TerminalChartBackend>;

/// Opens the SQLite-backed repository at `db_path`, creating parent
/// directories on first use, and wires it to a terminal chart.
pub fn open_dashboard(db_path: &str, config: &Config) -> Result<TerminalDashboard, AppError> {
    ensure_parent_dir(db_path)?;
    let store = SqliteStore::open(db_path)?;
    let repository = TaskRepository::open(store);
    let backend = TerminalChartBackend::new(config.color.enabled());
    Ok(Dashboard::new(repository, config.query, backend))
}

fn ensure_parent_dir(path: &str) -> Result<(), AppError> {
    if let Some(parent) = std::path::Path::new(path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[derive(Debug)]
pub enum AppError {
    Io(std::io::Error),
    Store(StoreError),
    Config(ConfigError),
    Form(FormError),
    Filter(ParseFilterError),
    NotFound(TaskId),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Io(err) => write!(f, "I/O error: {}", err),
            AppError::Store(err) => write!(f, "{}", err),
            AppError::Config(err) => write!(f, "config error: {}", err),
            AppError::Form(err) => write!(f, "{}", err),
            AppError::Filter(err) => write!(f, "{}", err),
            AppError::NotFound(id) => write!(f, "task '{}' not found", id),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AppError::Io(err) => Some(err),
            AppError::Store(err) => Some(err),
            AppError::Config(err) => Some(err),
            AppError::Form(err) => Some(err),
            AppError::Filter(err) => Some(err),
            AppError::NotFound(_) => None,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        AppError::Io(value)
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        AppError::Store(value)
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        AppError::Config(value)
    }
}

impl From<FormError> for AppError {
    fn from(value: FormError) -> Self {
        AppError::Form(value)
    }
}

impl From<ParseFilterError> for AppError {
    fn from(value: ParseFilterError) -> Self {
        AppError::Filter(value)
    }
}

impl From<ParsePriorityError> for AppError {
    fn from(value: ParsePriorityError) -> Self {
        AppError::Form(FormError::InvalidPriority(value))
    }
}
