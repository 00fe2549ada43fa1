//! Headless dashboard controller
//!
//! Every control of the interactive surface (text fields, type selector,
//! cell-count stepper, per-cell inputs, randomize/preset/save/load/export
//! buttons, compare multi-select) maps to one method here. Rendering is left
//! to whatever front end drives this type.
//!
//! The dashboard keeps a *working copy* of the selected experiment that edits
//! go to, separate from the saved copy in the [`ExperimentStore`]. Saving
//! copies the working copy into the store; loading replaces the working copy
//! with a deep clone of the saved one.
//!
//! Failed actions return an error and leave both copies untouched.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::cell::{CellRecord, CellType};
use crate::config::BenchConfig;
use crate::curve::{charge_profile, discharge_profile, Curve};
use crate::experiment::{Experiment, ExperimentStore};
use crate::export::{rows_for, to_csv};
use crate::generator::TestMode;
use crate::summary::{summarize, Summary};
use crate::{Error, Result};

/// Editable numeric field of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellField {
    /// Temperature (°C), 0..=100
    Temperature,
    /// Current (A), 0..=20
    Current,
    /// Voltage (V), 0..=5
    Voltage,
    /// Capacity (mAh), 0..=20000
    Capacity,
}

/// Session state of one dashboard user.
#[derive(Debug)]
pub struct Dashboard<R = StdRng> {
    config: BenchConfig,
    store: ExperimentStore,
    working: Experiment,
    bench_name: String,
    group_name: String,
    primary_cell_type: CellType,
    rng: R,
}

impl Dashboard<StdRng> {
    /// Create a dashboard seeded from system entropy.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the configuration is inconsistent.
    pub fn new(config: BenchConfig) -> Result<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create a dashboard with a reproducible random stream.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the configuration is inconsistent.
    pub fn seeded(config: BenchConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Dashboard<R> {
    /// Create a dashboard drawing randomness from `rng`.
    ///
    /// The store starts with one empty experiment (`config.default_experiment`)
    /// selected, and the working copy holds `config.default_cell_count` slots
    /// of `config.default_cell_type`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the configuration is inconsistent.
    pub fn with_rng(config: BenchConfig, rng: R) -> Result<Self> {
        config.validate()?;
        let mut store = ExperimentStore::with_config(config.clone());
        let working = store.create(&config.default_experiment)?.clone();

        let mut dashboard = Self {
            bench_name: config.bench_name.clone(),
            group_name: config.group_name.clone(),
            primary_cell_type: config.default_cell_type,
            working,
            store,
            config,
            rng,
        };
        dashboard.fill_to(dashboard.config.default_cell_count);
        Ok(dashboard)
    }

    /// Configuration in effect.
    #[must_use]
    pub const fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Saved experiments.
    #[must_use]
    pub const fn store(&self) -> &ExperimentStore {
        &self.store
    }

    /// Working copy of the selected experiment.
    #[must_use]
    pub const fn working(&self) -> &Experiment {
        &self.working
    }

    /// Name of the selected experiment.
    #[must_use]
    pub fn current_name(&self) -> &str {
        self.working.name()
    }

    /// Number of slots in the working copy.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.working.cell_count()
    }

    /// Bench name field.
    #[must_use]
    pub fn bench_name(&self) -> &str {
        &self.bench_name
    }

    /// Group name field.
    #[must_use]
    pub fn group_name(&self) -> &str {
        &self.group_name
    }

    /// Primary cell type selector.
    #[must_use]
    pub const fn primary_cell_type(&self) -> CellType {
        self.primary_cell_type
    }

    /// Set the bench name field.
    pub fn set_bench_name(&mut self, name: impl Into<String>) {
        self.bench_name = name.into();
    }

    /// Set the group name field.
    pub fn set_group_name(&mut self, name: impl Into<String>) {
        self.group_name = name.into();
    }

    /// Set the chemistry given to newly created slots.
    pub fn set_primary_cell_type(&mut self, cell_type: CellType) {
        self.primary_cell_type = cell_type;
        self.working.set_primary_cell_type(cell_type);
    }

    /// Cell-count stepper.
    ///
    /// # Errors
    ///
    /// Returns `CellCountOutOfRange` outside the configured bounds.
    pub fn set_cell_count(&mut self, n: usize) -> Result<()> {
        let n = self.config.check_cell_count(n).map_err(|e| {
            warn!(error = %e, "rejected cell count");
            e
        })?;
        self.fill_to(n);
        debug!(cells = n, "cell count changed");
        Ok(())
    }

    /// Per-cell type selector. Re-derives that cell's voltage band.
    ///
    /// # Errors
    ///
    /// Returns `SlotNotFound` for an unknown slot.
    pub fn set_cell_type(&mut self, slot: usize, cell_type: CellType) -> Result<()> {
        self.working.cell_mut(slot)?.set_cell_type(cell_type);
        debug!(slot, %cell_type, "cell type changed");
        Ok(())
    }

    /// Per-cell numeric input.
    ///
    /// # Errors
    ///
    /// Returns `SlotNotFound` for an unknown slot and `InvalidArgument` for a
    /// value outside the field's domain.
    pub fn edit_cell(&mut self, slot: usize, field: CellField, value: f64) -> Result<()> {
        let cell = self.working.cell_mut(slot)?;
        let result = match field {
            CellField::Temperature => cell.set_temperature(value),
            CellField::Current => cell.set_current(value),
            CellField::Voltage => cell.set_voltage(value),
            CellField::Capacity => cell.set_capacity(value),
        };
        if let Err(e) = &result {
            warn!(slot, ?field, error = %e, "rejected cell edit");
        }
        result
    }

    /// "Randomize all": every slot gets a random chemistry with fresh
    /// defaults, then the experiment is saved.
    ///
    /// # Errors
    ///
    /// Same as [`save_current`](Self::save_current).
    pub fn randomize_all(&mut self) -> Result<()> {
        self.working.randomize_all(&mut self.rng);
        info!(experiment = self.working.name(), "randomized all cells");
        self.save_current()
    }

    /// "Apply preset": scenario values for each slot's own chemistry.
    pub fn apply_preset(&mut self, mode: TestMode) {
        self.working.apply_preset(mode);
        info!(experiment = self.working.name(), %mode, "applied preset");
    }

    /// "Save experiment": copy the working copy into the store.
    ///
    /// # Errors
    ///
    /// Returns `CellCountOutOfRange` if the working copy's slot count is
    /// outside the configured bounds.
    pub fn save_current(&mut self) -> Result<()> {
        self.working
            .set_metadata(self.bench_name.clone(), self.group_name.clone());
        let name = self.working.name().to_string();
        self.store.save(&name, self.working.clone())
    }

    /// "Load experiment": select `name` and replace the working copy with a
    /// deep clone of the saved one. A saved experiment without cells is
    /// filled to the current slot count.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no experiment has that name.
    pub fn load(&mut self, name: &str) -> Result<()> {
        let loaded = self.store.load(name).map_err(|e| {
            warn!(error = %e, "load failed");
            e
        })?;
        self.store.select(name)?;

        let n = self.working.cell_count();
        self.working = loaded;
        if self.working.is_empty() {
            self.fill_to(n);
        }
        info!(experiment = name, cells = self.working.cell_count(), "loaded experiment");
        Ok(())
    }

    /// "Create new experiment": select a new, empty experiment whose working
    /// copy is filled to the current slot count.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a blank name and `DuplicateName` if the
    /// name is taken.
    pub fn create_experiment(&mut self, name: &str) -> Result<()> {
        let n = self.working.cell_count();
        let mut fresh = match self.store.create(name) {
            Ok(experiment) => experiment.clone(),
            Err(e) => {
                warn!(error = %e, "create failed");
                return Err(e);
            }
        };
        fresh.set_primary_cell_type(self.primary_cell_type);
        self.working = fresh;
        self.fill_to(n);
        Ok(())
    }

    /// "Export CSV": save, then render the current experiment.
    ///
    /// # Errors
    ///
    /// Returns the error of [`save_current`](Self::save_current), or `Csv` if
    /// encoding fails.
    pub fn export_csv(&mut self) -> Result<String> {
        self.save_current()?;
        to_csv(&rows_for(self.working.cells()))
    }

    /// Compare saved experiments as one CSV, tagged by experiment name.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if any name is unknown; nothing is rendered then.
    pub fn compare_csv(&self, names: &[&str]) -> Result<String> {
        to_csv(&self.store.compare(names)?)
    }

    /// Insights over the working copy.
    ///
    /// # Errors
    ///
    /// Returns `EmptyInput` if the working copy has no cells.
    pub fn summary(&self) -> Result<Summary> {
        summarize(self.working.cells())
    }

    /// Charge profile per slot.
    ///
    /// # Errors
    ///
    /// Returns `DivisionByZero` if a cell has zero current, or
    /// `InvalidArgument` for unusable inputs. No profile is returned then.
    pub fn charging_profiles(&mut self) -> Result<Vec<(usize, Curve)>> {
        self.profiles(charge_profile)
    }

    /// Discharge profile per slot.
    ///
    /// # Errors
    ///
    /// Same as [`charging_profiles`](Self::charging_profiles).
    pub fn discharging_profiles(&mut self) -> Result<Vec<(usize, Curve)>> {
        self.profiles(discharge_profile)
    }

    /// Footer line describing the bench configuration.
    #[must_use]
    pub fn footer(&self) -> String {
        format!(
            "Bench: {} | Group: {} | Primary Cell Type: {}",
            self.bench_name, self.group_name, self.primary_cell_type
        )
    }

    fn profiles(
        &mut self,
        generate: fn(&CellRecord, &mut R) -> Result<Curve>,
    ) -> Result<Vec<(usize, Curve)>> {
        self.working
            .cells()
            .iter()
            .map(|cell| {
                generate(cell, &mut self.rng)
                    .map(|curve| (cell.slot_index(), curve))
                    .map_err(|e| slot_error(cell.slot_index(), e))
            })
            .collect()
    }

    fn fill_to(&mut self, n: usize) {
        self.working.resize(n, self.primary_cell_type, &mut self.rng);
    }
}

fn slot_error(slot: usize, error: Error) -> Error {
    warn!(slot, error = %error, "profile generation failed");
    error
}
