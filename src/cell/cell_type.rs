//! Cell chemistry and its voltage band

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Lithium-ion chemistry of a cell.
///
/// The chemistry is only a label selecting a constants table: it decides the
/// voltage band and the nominal voltage used for generated defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellType {
    /// Lithium iron phosphate
    #[serde(rename = "LFP")]
    Lfp,
    /// Lithium nickel manganese cobalt oxide
    #[default]
    #[serde(rename = "NMC")]
    Nmc,
}

impl CellType {
    /// All chemistries, in selector order.
    pub const ALL: [Self; 2] = [Self::Nmc, Self::Lfp];

    /// Voltage band `[min, max]` for this chemistry.
    #[must_use]
    pub const fn voltage_band(self) -> VoltageBand {
        match self {
            Self::Lfp => VoltageBand { min: 2.8, max: 3.4 },
            Self::Nmc => VoltageBand { min: 3.2, max: 4.0 },
        }
    }

    /// Nominal (resting) voltage used for generated defaults.
    #[must_use]
    pub const fn nominal_voltage(self) -> f64 {
        match self {
            Self::Lfp => 3.2,
            Self::Nmc => 3.6,
        }
    }

    /// Display label ("LFP" / "NMC").
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lfp => "LFP",
            Self::Nmc => "NMC",
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CellType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LFP" => Ok(Self::Lfp),
            "NMC" => Ok(Self::Nmc),
            other => Err(Error::InvalidArgument(format!(
                "unknown cell type '{other}' (expected LFP or NMC)"
            ))),
        }
    }
}

/// Inclusive voltage band of a chemistry.
///
/// `min <= max` always holds because bands only come from
/// [`CellType::voltage_band`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoltageBand {
    /// Lower bound in volts
    pub min: f64,
    /// Upper bound in volts
    pub max: f64,
}

impl VoltageBand {
    /// True when `voltage` lies inside the band; both bounds count as inside.
    #[must_use]
    pub fn contains(&self, voltage: f64) -> bool {
        voltage >= self.min && voltage <= self.max
    }
}
