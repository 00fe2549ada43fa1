//! Summary/Insights calculator
//!
//! Descriptive statistics over a bank of cells: min/max/mean per parameter
//! with the slot that achieved each extreme, and the list of cells whose
//! voltage sits outside their chemistry's band.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cell::{slot_label, CellRecord};
use crate::{Error, Result};

/// A measured parameter of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Parameter {
    /// Temperature (°C)
    Temperature,
    /// Voltage (V)
    Voltage,
    /// Current (A)
    Current,
    /// Capacity (mAh)
    Capacity,
}

impl Parameter {
    /// All parameters, in insight-panel order.
    pub const ALL: [Self; 4] = [
        Self::Temperature,
        Self::Voltage,
        Self::Current,
        Self::Capacity,
    ];

    /// Unit suffix.
    #[must_use]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Temperature => "°C",
            Self::Voltage => "V",
            Self::Current => "A",
            Self::Capacity => "mAh",
        }
    }

    /// Read this parameter from a cell.
    #[must_use]
    pub const fn value(self, cell: &CellRecord) -> f64 {
        match self {
            Self::Temperature => cell.temperature(),
            Self::Voltage => cell.voltage(),
            Self::Current => cell.current(),
            Self::Capacity => cell.capacity(),
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Temperature => "Temperature",
            Self::Voltage => "Voltage",
            Self::Current => "Current",
            Self::Capacity => "Capacity",
        })
    }
}

/// Voltage status of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellStatus {
    /// Voltage inside the band (bounds included)
    Normal,
    /// Voltage strictly outside the band
    OutOfRange,
}

impl CellStatus {
    /// Status of a cell.
    #[must_use]
    pub fn of(cell: &CellRecord) -> Self {
        if cell.is_out_of_range() {
            Self::OutOfRange
        } else {
            Self::Normal
        }
    }

    /// Display label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::OutOfRange => "Out of Range",
        }
    }
}

impl fmt::Display for CellStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Min/max/mean of one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterStats {
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
    /// Arithmetic mean
    pub mean: f64,
    /// Slot holding the smallest value (first occurrence)
    pub min_slot: usize,
    /// Slot holding the largest value (first occurrence)
    pub max_slot: usize,
}

/// Aggregate insights over a bank of cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of cells summarized
    pub cell_count: usize,
    /// Temperature statistics
    pub temperature: ParameterStats,
    /// Voltage statistics
    pub voltage: ParameterStats,
    /// Current statistics
    pub current: ParameterStats,
    /// Capacity statistics
    pub capacity: ParameterStats,
    /// Slots whose voltage is outside their band, ascending
    pub out_of_range: Vec<usize>,
}

impl Summary {
    /// Statistics of one parameter.
    #[must_use]
    pub const fn stats(&self, parameter: Parameter) -> &ParameterStats {
        match parameter {
            Parameter::Temperature => &self.temperature,
            Parameter::Voltage => &self.voltage,
            Parameter::Current => &self.current,
            Parameter::Capacity => &self.capacity,
        }
    }

    /// Out-of-range slots as display labels ("Cell N").
    #[must_use]
    pub fn out_of_range_labels(&self) -> Vec<String> {
        self.out_of_range.iter().copied().map(slot_label).collect()
    }

    /// True when no cell is out of range.
    #[must_use]
    pub fn all_within_range(&self) -> bool {
        self.out_of_range.is_empty()
    }

    /// One-line voltage status for the insights panel.
    #[must_use]
    pub fn voltage_status(&self) -> String {
        if self.all_within_range() {
            "All cells within nominal range".to_string()
        } else {
            format!(
                "Cells outside nominal voltage range: {}",
                self.out_of_range_labels().join(", ")
            )
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cells: {}", self.cell_count)?;
        for parameter in Parameter::ALL {
            let s = self.stats(parameter);
            let unit = parameter.unit();
            writeln!(
                f,
                "{parameter}: avg {:.2} {unit} | highest {} {:.2} {unit} | lowest {} {:.2} {unit}",
                s.mean,
                slot_label(s.max_slot),
                s.max,
                slot_label(s.min_slot),
                s.min,
            )?;
        }
        write!(f, "{}", self.voltage_status())
    }
}

/// Summarize a bank of cells.
///
/// # Errors
///
/// Returns `EmptyInput` if `cells` is empty.
///
/// # Example
///
/// ```rust
/// use cellbench::cell::{CellRecord, CellType};
/// use cellbench::summary::summarize;
///
/// let cells = vec![
///     CellRecord::builder(1, CellType::Nmc).temperature(30.0).build()?,
///     CellRecord::builder(2, CellType::Nmc).temperature(34.0).voltage(4.2).build()?,
/// ];
/// let summary = summarize(&cells)?;
/// assert_eq!(summary.temperature.max_slot, 2);
/// assert_eq!(summary.out_of_range_labels(), vec!["Cell 2"]);
/// # Ok::<(), cellbench::Error>(())
/// ```
pub fn summarize(cells: &[CellRecord]) -> Result<Summary> {
    if cells.is_empty() {
        return Err(Error::EmptyInput(
            "summary statistics need at least one cell".to_string(),
        ));
    }

    Ok(Summary {
        cell_count: cells.len(),
        temperature: parameter_stats(cells, Parameter::Temperature),
        voltage: parameter_stats(cells, Parameter::Voltage),
        current: parameter_stats(cells, Parameter::Current),
        capacity: parameter_stats(cells, Parameter::Capacity),
        out_of_range: out_of_range(cells),
    })
}

/// Slots whose voltage is strictly outside their band, ascending.
#[must_use]
pub fn out_of_range(cells: &[CellRecord]) -> Vec<usize> {
    let mut slots: Vec<usize> = cells
        .iter()
        .filter(|c| c.is_out_of_range())
        .map(CellRecord::slot_index)
        .collect();
    slots.sort_unstable();
    slots
}

/// Callers guarantee `cells` is non-empty.
#[allow(clippy::cast_precision_loss)]
fn parameter_stats(cells: &[CellRecord], parameter: Parameter) -> ParameterStats {
    let first = &cells[0];
    let mut stats = ParameterStats {
        min: parameter.value(first),
        max: parameter.value(first),
        mean: 0.0,
        min_slot: first.slot_index(),
        max_slot: first.slot_index(),
    };
    let mut sum = 0.0;

    for cell in cells {
        let value = parameter.value(cell);
        sum += value;
        if value < stats.min {
            stats.min = value;
            stats.min_slot = cell.slot_index();
        }
        if value > stats.max {
            stats.max = value;
            stats.max_slot = cell.slot_index();
        }
    }

    stats.mean = sum / cells.len() as f64;
    stats
}
