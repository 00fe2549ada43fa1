//! Bench configuration
//!
//! Bounds and names the dashboard starts from. The library never reads files
//! or the environment; callers hand in a `BenchConfig` (or a JSON string for
//! [`BenchConfig::from_json_str`]).

use serde::{Deserialize, Serialize};

use crate::cell::CellType;
use crate::{Error, Result};

/// Smallest bank size any configuration may allow.
pub const MIN_CELLS: usize = 1;

/// Largest bank size any configuration may allow.
pub const MAX_CELLS: usize = 24;

/// Bench configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Minimum number of cell slots
    pub min_cells: usize,
    /// Maximum number of cell slots
    pub max_cells: usize,
    /// Slot count of a fresh experiment
    pub default_cell_count: usize,
    /// Chemistry used when new slots are created
    pub default_cell_type: CellType,
    /// Bench name shown in the footer
    pub bench_name: String,
    /// Group name shown in the footer
    pub group_name: String,
    /// Experiment selected in a fresh session
    pub default_experiment: String,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            min_cells: MIN_CELLS,
            max_cells: MAX_CELLS,
            default_cell_count: 8,
            default_cell_type: CellType::Nmc,
            bench_name: "Bench_001".to_string(),
            group_name: "Group_A".to_string(),
            default_experiment: "Default Experiment".to_string(),
        }
    }
}

impl BenchConfig {
    /// Create a new config builder
    #[must_use]
    pub fn builder() -> BenchConfigBuilder {
        BenchConfigBuilder::default()
    }

    /// Parse a JSON document; absent fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `Json` for malformed input and `InvalidArgument` if the
    /// resulting bounds are inconsistent.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check bounds and names.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` unless
    /// `1 <= min_cells <= default_cell_count <= max_cells <= 24` and all
    /// names are non-empty.
    pub fn validate(&self) -> Result<()> {
        if self.min_cells < MIN_CELLS || self.max_cells > MAX_CELLS {
            return Err(Error::InvalidArgument(format!(
                "cell bounds {}..={} exceed {MIN_CELLS}..={MAX_CELLS}",
                self.min_cells, self.max_cells
            )));
        }
        if !(self.min_cells <= self.default_cell_count
            && self.default_cell_count <= self.max_cells)
        {
            return Err(Error::InvalidArgument(format!(
                "default cell count {} not within {}..={}",
                self.default_cell_count, self.min_cells, self.max_cells
            )));
        }
        for (field, value) in [
            ("bench_name", &self.bench_name),
            ("group_name", &self.group_name),
            ("default_experiment", &self.default_experiment),
        ] {
            if value.trim().is_empty() {
                return Err(Error::InvalidArgument(format!("{field} must not be empty")));
            }
        }
        Ok(())
    }

    /// Check a requested slot count against the bounds.
    ///
    /// # Errors
    ///
    /// Returns `CellCountOutOfRange` if `n` is outside `min_cells..=max_cells`.
    pub fn check_cell_count(&self, n: usize) -> Result<usize> {
        if n < self.min_cells || n > self.max_cells {
            return Err(Error::CellCountOutOfRange {
                requested: n,
                min: self.min_cells,
                max: self.max_cells,
            });
        }
        Ok(n)
    }
}

/// Bench config builder
#[derive(Debug, Default)]
pub struct BenchConfigBuilder {
    config: BenchConfig,
}

impl BenchConfigBuilder {
    /// Set the minimum slot count
    #[must_use]
    pub const fn min_cells(mut self, n: usize) -> Self {
        self.config.min_cells = n;
        self
    }

    /// Set the maximum slot count
    #[must_use]
    pub const fn max_cells(mut self, n: usize) -> Self {
        self.config.max_cells = n;
        self
    }

    /// Set the slot count of a fresh experiment
    #[must_use]
    pub const fn default_cell_count(mut self, n: usize) -> Self {
        self.config.default_cell_count = n;
        self
    }

    /// Set the chemistry for new slots
    #[must_use]
    pub const fn default_cell_type(mut self, cell_type: CellType) -> Self {
        self.config.default_cell_type = cell_type;
        self
    }

    /// Set the bench name
    #[must_use]
    pub fn bench_name(mut self, name: impl Into<String>) -> Self {
        self.config.bench_name = name.into();
        self
    }

    /// Set the group name
    #[must_use]
    pub fn group_name(mut self, name: impl Into<String>) -> Self {
        self.config.group_name = name.into();
        self
    }

    /// Set the initially selected experiment
    #[must_use]
    pub fn default_experiment(mut self, name: impl Into<String>) -> Self {
        self.config.default_experiment = name.into();
        self
    }

    /// Build the config
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the bounds or names are inconsistent
    pub fn build(self) -> Result<BenchConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
