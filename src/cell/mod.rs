//! Cell Record Model
//!
//! A cell slot holds measured values (voltage, temperature, current,
//! capacity) plus a voltage band derived solely from its chemistry.
//!
//! ```rust
//! use cellbench::cell::{CellRecord, CellType};
//!
//! let mut cell = CellRecord::builder(1, CellType::Lfp).voltage(3.3).build()?;
//! assert!(!cell.is_out_of_range());
//!
//! // Switching chemistry re-derives the band
//! cell.set_cell_type(CellType::Nmc);
//! assert!((cell.min_voltage() - 3.2).abs() < f64::EPSILON);
//! # Ok::<(), cellbench::Error>(())
//! ```

mod cell_type;
mod record;

pub use cell_type::{CellType, VoltageBand};
pub use record::{
    slot_label, CellRecord, CellRecordBuilder, CAPACITY_DOMAIN, CURRENT_DOMAIN,
    TEMPERATURE_DOMAIN, VOLTAGE_DOMAIN,
};
