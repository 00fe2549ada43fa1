//! Error types for cellbench
//!
//! Every variant is a local, recoverable condition: the requested action is
//! aborted and the caller sees the message. Nothing here is fatal.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// cellbench error types
#[derive(Error, Debug)]
pub enum Error {
    /// Unknown cell type, mode, or a value outside its domain
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Curve simulation requested with zero current
    #[error("Division by zero: {0}")]
    DivisionByZero(String),

    /// Load/compare/select referencing an unknown experiment
    #[error("Experiment not found: {0}")]
    NotFound(String),

    /// Summary statistics requested over zero cells
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// Creating an experiment whose name is already taken
    #[error("Experiment name already exists: {0}")]
    DuplicateName(String),

    /// Cell count outside the configured bounds
    #[error("Cell count {requested} out of range (allowed {min}..={max})")]
    CellCountOutOfRange {
        /// Requested number of cells
        requested: usize,
        /// Configured minimum
        min: usize,
        /// Configured maximum
        max: usize,
    },

    /// Per-slot edit referencing a slot the experiment does not have
    #[error("Cell slot {0} does not exist")]
    SlotNotFound(usize),

    /// Session id with no open session
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// CSV import error
    #[error("CSV parse error: {0}")]
    ParseError(String),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// JSON (config or snapshot) error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV encoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
