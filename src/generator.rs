//! Default and preset values per cell type
//!
//! `defaults_for` draws the randomized part (temperature, current, capacity)
//! from a caller-supplied random source, so tests can seed it and get exact
//! values back. `preset_for` is fully deterministic.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::cell::CellType;
use crate::{Error, Result};

/// Temperature range for generated defaults (°C).
pub const DEFAULT_TEMPERATURE_RANGE: (f64, f64) = (25.0, 40.0);

/// Current range for generated defaults (A).
pub const DEFAULT_CURRENT_RANGE: (f64, f64) = (1.0, 5.0);

/// Full set of values used to (re)initialise one cell slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellDefaults {
    /// Chemistry these values belong to
    pub cell_type: CellType,
    /// Measured voltage (V)
    pub voltage: f64,
    /// Upper band bound (V)
    pub max_voltage: f64,
    /// Lower band bound (V)
    pub min_voltage: f64,
    /// Temperature (°C)
    pub temperature: f64,
    /// Current (A)
    pub current: f64,
    /// Capacity (mAh)
    pub capacity: f64,
}

/// Capacity range for generated defaults (mAh).
#[must_use]
pub const fn capacity_range(cell_type: CellType) -> (f64, f64) {
    match cell_type {
        CellType::Lfp => (2500.0, 3500.0),
        CellType::Nmc => (2800.0, 3800.0),
    }
}

/// Generate defaults for a chemistry.
///
/// Voltage and band are fixed per type; temperature is uniform in [25, 40]
/// rounded to 0.1, current uniform in [1, 5] rounded to 0.01, capacity
/// uniform in the type's range rounded to an integer.
///
/// # Example
///
/// ```rust
/// use cellbench::cell::CellType;
/// use cellbench::generator::defaults_for;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let d = defaults_for(CellType::Lfp, &mut rng);
/// assert!((d.voltage - 3.2).abs() < f64::EPSILON);
/// assert!((2500.0..=3500.0).contains(&d.capacity));
/// ```
pub fn defaults_for<R: Rng + ?Sized>(cell_type: CellType, rng: &mut R) -> CellDefaults {
    let band = cell_type.voltage_band();
    let (t_lo, t_hi) = DEFAULT_TEMPERATURE_RANGE;
    let (i_lo, i_hi) = DEFAULT_CURRENT_RANGE;
    let (c_lo, c_hi) = capacity_range(cell_type);

    CellDefaults {
        cell_type,
        voltage: cell_type.nominal_voltage(),
        max_voltage: band.max,
        min_voltage: band.min,
        temperature: round_to(rng.gen_range(t_lo..=t_hi), 1),
        current: round_to(rng.gen_range(i_lo..=i_hi), 2),
        capacity: rng.gen_range(c_lo..=c_hi).round(),
    }
}

/// Generate defaults from a textual cell type ("LFP"/"NMC").
///
/// # Errors
///
/// Returns `InvalidArgument` for an unknown cell type.
pub fn defaults_for_label<R: Rng + ?Sized>(label: &str, rng: &mut R) -> Result<CellDefaults> {
    let cell_type = label.parse::<CellType>()?;
    Ok(defaults_for(cell_type, rng))
}

/// Pick a chemistry uniformly at random (used by "randomize all").
pub fn random_cell_type<R: Rng + ?Sized>(rng: &mut R) -> CellType {
    if rng.gen_bool(0.5) {
        CellType::Nmc
    } else {
        CellType::Lfp
    }
}

/// Named test scenario overriding generated defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestMode {
    /// Constant-current charge
    Charging,
    /// Constant-current discharge
    Discharging,
    /// High-rate performance run
    Performance,
}

impl TestMode {
    /// All modes, in menu order.
    pub const ALL: [Self; 3] = [Self::Charging, Self::Discharging, Self::Performance];

    /// Lower-case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Charging => "charging",
            Self::Discharging => "discharging",
            Self::Performance => "performance",
        }
    }
}

impl fmt::Display for TestMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "charging" => Ok(Self::Charging),
            "discharging" => Ok(Self::Discharging),
            "performance" => Ok(Self::Performance),
            other => Err(Error::InvalidArgument(format!(
                "unknown test mode '{other}' (expected charging, discharging or performance)"
            ))),
        }
    }
}

/// Scenario constants: (voltage, temperature, current, capacity).
const fn preset_table(mode: TestMode, cell_type: CellType) -> (f64, f64, f64, f64) {
    match (mode, cell_type) {
        (TestMode::Charging, CellType::Lfp) => (3.3, 30.0, 2.0, 3000.0),
        (TestMode::Charging, CellType::Nmc) => (3.9, 32.0, 2.5, 3300.0),
        (TestMode::Discharging, CellType::Lfp) => (3.0, 35.0, 3.0, 2900.0),
        (TestMode::Discharging, CellType::Nmc) => (3.4, 36.0, 3.5, 3200.0),
        (TestMode::Performance, CellType::Lfp) => (3.25, 28.0, 5.0, 3400.0),
        (TestMode::Performance, CellType::Nmc) => (3.7, 30.0, 6.0, 3700.0),
    }
}

/// Fixed scenario values for a mode and chemistry.
///
/// Voltage, temperature, current and capacity come from the scenario table;
/// the band is the chemistry's.
#[must_use]
pub const fn preset_for(mode: TestMode, cell_type: CellType) -> CellDefaults {
    let band = cell_type.voltage_band();
    let (voltage, temperature, current, capacity) = preset_table(mode, cell_type);
    CellDefaults {
        cell_type,
        voltage,
        max_voltage: band.max,
        min_voltage: band.min,
        temperature,
        current,
        capacity,
    }
}

/// Round to `decimals` places.
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
