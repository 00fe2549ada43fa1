//! Cell Record - one test slot of the bench

use serde::{Deserialize, Serialize};

use super::{CellType, VoltageBand};
use crate::generator::CellDefaults;
use crate::{Error, Result};

/// Accepted temperature domain (°C).
pub const TEMPERATURE_DOMAIN: (f64, f64) = (0.0, 100.0);
/// Accepted current domain (A).
pub const CURRENT_DOMAIN: (f64, f64) = (0.0, 20.0);
/// Accepted voltage domain (V).
pub const VOLTAGE_DOMAIN: (f64, f64) = (0.0, 5.0);
/// Accepted capacity domain (mAh).
pub const CAPACITY_DOMAIN: (f64, f64) = (0.0, 20_000.0);

/// One battery cell's test slot.
///
/// `min_voltage`/`max_voltage` are never set directly: they are derived from
/// the cell type and rewritten whenever the type changes. Deserialization goes
/// through [`CellRecordBuilder`], so a stored band is re-derived and
/// out-of-domain measurements are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredCell")]
pub struct CellRecord {
    slot_index: usize,
    cell_type: CellType,
    voltage: f64,
    max_voltage: f64,
    min_voltage: f64,
    temperature: f64,
    current: f64,
    capacity: f64,
}

impl CellRecord {
    /// Create a record for `slot_index` (1-based) from a set of defaults.
    ///
    /// The band is taken from `defaults.cell_type`, not from the
    /// `min_voltage`/`max_voltage` fields of `defaults`.
    #[must_use]
    pub fn from_defaults(slot_index: usize, defaults: &CellDefaults) -> Self {
        let band = defaults.cell_type.voltage_band();
        Self {
            slot_index,
            cell_type: defaults.cell_type,
            voltage: defaults.voltage,
            max_voltage: band.max,
            min_voltage: band.min,
            temperature: defaults.temperature,
            current: defaults.current,
            capacity: defaults.capacity,
        }
    }

    /// Create a builder with explicit measurements (useful for tests and
    /// CSV import).
    #[must_use]
    pub fn builder(slot_index: usize, cell_type: CellType) -> CellRecordBuilder {
        CellRecordBuilder::new(slot_index, cell_type)
    }

    /// 1-based slot index.
    #[must_use]
    pub const fn slot_index(&self) -> usize {
        self.slot_index
    }

    /// Display label, e.g. "Cell 3".
    #[must_use]
    pub fn label(&self) -> String {
        slot_label(self.slot_index)
    }

    /// Chemistry.
    #[must_use]
    pub const fn cell_type(&self) -> CellType {
        self.cell_type
    }

    /// Measured voltage (V).
    #[must_use]
    pub const fn voltage(&self) -> f64 {
        self.voltage
    }

    /// Upper band bound (V).
    #[must_use]
    pub const fn max_voltage(&self) -> f64 {
        self.max_voltage
    }

    /// Lower band bound (V).
    #[must_use]
    pub const fn min_voltage(&self) -> f64 {
        self.min_voltage
    }

    /// Voltage band as a value.
    #[must_use]
    pub const fn band(&self) -> VoltageBand {
        VoltageBand {
            min: self.min_voltage,
            max: self.max_voltage,
        }
    }

    /// Temperature (°C).
    #[must_use]
    pub const fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Current (A).
    #[must_use]
    pub const fn current(&self) -> f64 {
        self.current
    }

    /// Capacity (mAh).
    #[must_use]
    pub const fn capacity(&self) -> f64 {
        self.capacity
    }

    /// True when the voltage lies strictly outside the band.
    #[must_use]
    pub fn is_out_of_range(&self) -> bool {
        self.voltage < self.min_voltage || self.voltage > self.max_voltage
    }

    /// Change the chemistry and re-derive the band, overwriting the old one.
    pub fn set_cell_type(&mut self, cell_type: CellType) {
        let band = cell_type.voltage_band();
        self.cell_type = cell_type;
        self.min_voltage = band.min;
        self.max_voltage = band.max;
    }

    /// Overwrite every measurement and the type with `defaults`.
    pub fn apply_defaults(&mut self, defaults: &CellDefaults) {
        *self = Self::from_defaults(self.slot_index, defaults);
    }

    /// Set the temperature.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the value is not finite or outside [0, 100].
    pub fn set_temperature(&mut self, value: f64) -> Result<()> {
        self.temperature = check_domain("temperature", value, TEMPERATURE_DOMAIN)?;
        Ok(())
    }

    /// Set the current.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the value is not finite or outside [0, 20].
    pub fn set_current(&mut self, value: f64) -> Result<()> {
        self.current = check_domain("current", value, CURRENT_DOMAIN)?;
        Ok(())
    }

    /// Set the measured voltage. The band is not touched.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the value is not finite or outside [0, 5].
    pub fn set_voltage(&mut self, value: f64) -> Result<()> {
        self.voltage = check_domain("voltage", value, VOLTAGE_DOMAIN)?;
        Ok(())
    }

    /// Set the capacity.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the value is not finite or outside [0, 20000].
    pub fn set_capacity(&mut self, value: f64) -> Result<()> {
        self.capacity = check_domain("capacity", value, CAPACITY_DOMAIN)?;
        Ok(())
    }
}

/// Builder for `CellRecord`.
///
/// Starts from the chemistry's nominal voltage with zeroed measurements.
#[derive(Debug)]
pub struct CellRecordBuilder {
    slot_index: usize,
    cell_type: CellType,
    voltage: f64,
    temperature: f64,
    current: f64,
    capacity: f64,
}

impl CellRecordBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub const fn new(slot_index: usize, cell_type: CellType) -> Self {
        Self {
            slot_index,
            cell_type,
            voltage: cell_type.nominal_voltage(),
            temperature: 0.0,
            current: 0.0,
            capacity: 0.0,
        }
    }

    /// Set the voltage.
    #[must_use]
    pub const fn voltage(mut self, voltage: f64) -> Self {
        self.voltage = voltage;
        self
    }

    /// Set the temperature.
    #[must_use]
    pub const fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the current.
    #[must_use]
    pub const fn current(mut self, current: f64) -> Self {
        self.current = current;
        self
    }

    /// Set the capacity.
    #[must_use]
    pub const fn capacity(mut self, capacity: f64) -> Self {
        self.capacity = capacity;
        self
    }

    /// Build the `CellRecord`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the slot index is zero or any measurement
    /// is outside its domain.
    pub fn build(self) -> Result<CellRecord> {
        if self.slot_index == 0 {
            return Err(Error::InvalidArgument(
                "slot index is 1-based and must be positive".to_string(),
            ));
        }
        let band = self.cell_type.voltage_band();
        Ok(CellRecord {
            slot_index: self.slot_index,
            cell_type: self.cell_type,
            voltage: check_domain("voltage", self.voltage, VOLTAGE_DOMAIN)?,
            max_voltage: band.max,
            min_voltage: band.min,
            temperature: check_domain("temperature", self.temperature, TEMPERATURE_DOMAIN)?,
            current: check_domain("current", self.current, CURRENT_DOMAIN)?,
            capacity: check_domain("capacity", self.capacity, CAPACITY_DOMAIN)?,
        })
    }
}

/// Serialized shape of a `CellRecord`. The band fields are ignored on input.
#[derive(Deserialize)]
struct StoredCell {
    slot_index: usize,
    cell_type: CellType,
    voltage: f64,
    temperature: f64,
    current: f64,
    capacity: f64,
}

impl TryFrom<StoredCell> for CellRecord {
    type Error = Error;

    fn try_from(stored: StoredCell) -> Result<Self> {
        CellRecordBuilder::new(stored.slot_index, stored.cell_type)
            .voltage(stored.voltage)
            .temperature(stored.temperature)
            .current(stored.current)
            .capacity(stored.capacity)
            .build()
    }
}

/// Display label for a slot ("Cell N").
#[must_use]
pub fn slot_label(slot_index: usize) -> String {
    format!("Cell {slot_index}")
}

fn check_domain(field: &str, value: f64, (lo, hi): (f64, f64)) -> Result<f64> {
    if value.is_finite() && value >= lo && value <= hi {
        Ok(value)
    } else {
        Err(Error::InvalidArgument(format!(
            "{field} {value} outside [{lo}, {hi}]"
        )))
    }
}
