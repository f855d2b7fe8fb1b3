use std::path::PathBuf;
use thiserror::Error;

/// Malformed run parameters or catalog. Raised before any solve attempt.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("number of slots must be positive")]
    NonPositiveSlots,
    #[error("budget must be a non-negative number, got {0}")]
    InvalidBudget(f64),
    #[error("empty slot cost must be a non-negative number, got {0}")]
    InvalidEmptySlotCost(f64),
    #[error("catalog contains no items")]
    EmptyCatalog,
    #[error("duplicate catalog item: {0}")]
    DuplicateItem(String),
    #[error("catalog item name is reserved: {0}")]
    ReservedItemName(String),
    #[error("{field} of item {item} must be a non-negative number, got {value}")]
    InvalidCoefficient {
        item: String,
        field: &'static str,
        value: f64,
    },
}

/// An allocation table was requested from a run that has no allocation.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("allocation table requested for an infeasible run")]
pub struct InvalidStateError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    InvalidState(#[from] InvalidStateError),
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
